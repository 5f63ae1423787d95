//! Simulation of the robot in an environment with obstacles.
//!
//! Each tick advances the range sensor, derives the repulsive force acting on the robot's
//! footprint corners from the sensed point cloud, adds the force tracking the commanded velocity
//! and integrates the robot's motion over one fixed timestep.

use std::time::Duration;

use tracing::{info, trace};

use crate::domain::{
    Angle, ConfigError, Environment, FieldConfig, Force, Obstacle, Pose, Position, PotentialField,
    Robot, RobotConfig, Scanner, ScannerConfig, Velocity,
};

/// Construction-time parameters, fixed for the lifetime of a [`Simulator`].
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationConfig {
    pub robot: RobotConfig,
    pub start: Position,
    /// Held constant during the simulation.
    pub heading: Angle,
    pub scanner: ScannerConfig,
    pub field: FieldConfig,
    pub timestep: Duration,
    pub obstacles: Vec<Obstacle>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            robot: RobotConfig::default(),
            start: Position::new(3.0, 2.0),
            heading: Angle::new(0.0),
            scanner: ScannerConfig::default(),
            field: FieldConfig::default(),
            timestep: Duration::from_millis(20),
            obstacles: Vec::new(),
        }
    }
}

/// State observed after one tick. Borrows the simulator's point cloud.
#[derive(Clone, Debug, PartialEq)]
pub struct Telemetry<'a> {
    /// Simulation time at which the tick started.
    pub time: f64,
    pub pose: Pose,
    pub velocity: Velocity,
    pub commanded_velocity: Velocity,
    /// Sensed obstacle points in the global frame.
    pub point_cloud: &'a [Position],
    /// Sample ages in seconds, parallel to `point_cloud`.
    pub ages: Vec<f64>,
    /// Repulsive force per footprint corner, ordered as [`crate::domain::Corner::iter`].
    pub corner_forces: [Force; 4],
    pub repulsive_force: Force,
    pub tracking_force: Force,
}

impl Telemetry<'_> {
    pub fn net_force(&self) -> Force {
        self.repulsive_force + self.tracking_force
    }
}

pub struct Simulator {
    robot: Robot,
    scanner: Scanner,
    field: PotentialField,
    environment: Environment,
    timestep: Duration,
    time: f64,
}

impl Simulator {
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        if config.timestep.is_zero() {
            return Err(ConfigError::Timestep(config.timestep.as_secs_f64()));
        }
        let robot = Robot::new(config.start, config.heading, config.robot)?;
        let scanner = Scanner::new(config.scanner)?;
        let field = PotentialField::new(config.field)?;

        info!(
            obstacles = config.obstacles.len(),
            timestep = ?config.timestep,
            "simulation ready"
        );

        Ok(Self {
            robot,
            scanner,
            field,
            environment: Environment::new(config.obstacles),
            timestep: config.timestep,
            time: 0.0,
        })
    }

    /// Current simulation time in seconds.
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn robot(&self) -> &Robot {
        &self.robot
    }

    pub fn scanner(&self) -> &Scanner {
        &self.scanner
    }

    pub fn field(&self) -> &PotentialField {
        &self.field
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Advances the simulation by one timestep starting at the internal clock.
    pub fn tick(&mut self, commanded_velocity: Velocity) -> Telemetry<'_> {
        self.step(self.time, commanded_velocity)
    }

    /// Advances the simulation by one timestep starting at `time`. The clock is set to
    /// `time + timestep` afterwards.
    pub fn step(&mut self, time: f64, commanded_velocity: Velocity) -> Telemetry<'_> {
        self.robot.set_commanded_velocity(commanded_velocity);

        let points = self
            .scanner
            .scan(time, self.robot.pose(), &self.environment);
        let (corner_forces, repulsive_force) =
            self.field.corner_forces(&self.robot.corners(), points);
        let tracking_force = self.robot.tracking_force();

        self.robot
            .integrate(repulsive_force + tracking_force, self.timestep);
        self.time = time + self.timestep.as_secs_f64();

        trace!(
            time,
            x = self.robot.position().x(),
            y = self.robot.position().y(),
            repulsive = repulsive_force.norm(),
            "tick"
        );

        Telemetry {
            time,
            pose: self.robot.pose(),
            velocity: self.robot.velocity(),
            commanded_velocity,
            point_cloud: self.scanner.global_points(),
            ages: self.scanner.ages(),
            corner_forces,
            repulsive_force,
            tracking_force,
        }
    }
}
