//! Rectangular robot body with unit mass, driven by a net force.
//!
//! The robot's front is facing along the positive x-axis of its own frame, its left side along
//! the positive y-axis.

use std::{slice::Iter, time::Duration};

use tracing::trace;

use super::{
    error::{non_negative, positive},
    Angle, ConfigError, Force, Pose, Position, Velocity,
};

/// Below this speed no rescaling is attempted.
const SPEED_EPSILON: f64 = 1e-8;

#[derive(Clone, Debug, PartialEq)]
pub struct Robot {
    position: Position,
    velocity: Velocity,
    commanded_velocity: Velocity,
    heading: Angle,
    config: RobotConfig,
}

impl Robot {
    pub fn new(
        position: Position,
        heading: Angle,
        config: RobotConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        if !position.is_finite() {
            return Err(ConfigError::StartPosition);
        }
        Ok(Self {
            position,
            velocity: Velocity::zeros(),
            commanded_velocity: Velocity::zeros(),
            heading,
            config,
        })
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn velocity(&self) -> Velocity {
        self.velocity
    }

    pub fn commanded_velocity(&self) -> Velocity {
        self.commanded_velocity
    }

    pub fn heading(&self) -> Angle {
        self.heading
    }

    pub fn pose(&self) -> Pose {
        Pose::new(self.position, self.heading)
    }

    pub fn config(&self) -> &RobotConfig {
        &self.config
    }

    /// Target velocity supplied by the command source. The only state writable from outside.
    pub fn set_commanded_velocity(&mut self, velocity: Velocity) {
        self.commanded_velocity = velocity;
    }

    pub fn local_corner_position(&self, corner: Corner) -> Position {
        Position::new(
            match corner {
                Corner::FrontLeft | Corner::FrontRight => self.config.half_length,
                Corner::RearLeft | Corner::RearRight => -self.config.half_length,
            },
            match corner {
                Corner::FrontLeft | Corner::RearLeft => self.config.half_width,
                Corner::FrontRight | Corner::RearRight => -self.config.half_width,
            },
        )
    }

    pub fn corner_position(&self, corner: Corner) -> Position {
        self.pose().to_global(self.local_corner_position(corner))
    }

    /// Footprint corners in the global frame, ordered as [`Corner::iter`].
    pub fn corners(&self) -> [Position; 4] {
        Corner::ALL.map(|corner| self.corner_position(corner))
    }

    /// Proportional controller force steering the velocity towards the commanded velocity.
    pub fn tracking_force(&self) -> Force {
        self.config.tracking_gain * (self.commanded_velocity - self.velocity)
    }

    /// Explicit Euler step treating `force` as acceleration. The speed is limited to the
    /// configured maximum before the position is advanced.
    pub fn integrate(&mut self, force: Force, dt: Duration) {
        let dt = dt.as_secs_f64();

        self.velocity += force * dt;

        let speed = self.velocity.norm();
        if speed > self.config.max_speed && speed > SPEED_EPSILON {
            trace!(speed, max_speed = self.config.max_speed, "clamping speed");
            self.velocity *= self.config.max_speed / speed;
        }

        self.position = self.position + self.velocity * dt;
    }
}

/// All distances are offsets from the center of the robot.
#[derive(Clone, Debug, PartialEq)]
pub struct RobotConfig {
    pub half_width: f64,
    pub half_length: f64,
    /// m/s.
    pub max_speed: f64,
    /// Gain `K` of the tracking force `K · (commanded velocity - velocity)`.
    pub tracking_gain: f64,
}

impl RobotConfig {
    pub const fn new(
        half_width: f64,
        half_length: f64,
        max_speed: f64,
        tracking_gain: f64,
    ) -> Self {
        Self {
            half_width,
            half_length,
            max_speed,
            tracking_gain,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !positive(self.half_width) {
            return Err(ConfigError::BodyDimension {
                name: "half width",
                value: self.half_width,
            });
        }
        if !positive(self.half_length) {
            return Err(ConfigError::BodyDimension {
                name: "half length",
                value: self.half_length,
            });
        }
        if !positive(self.max_speed) {
            return Err(ConfigError::MaxSpeed(self.max_speed));
        }
        if !non_negative(self.tracking_gain) {
            return Err(ConfigError::Gain {
                name: "tracking",
                value: self.tracking_gain,
            });
        }
        Ok(())
    }
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self::new(0.4, 0.5, 2.0, 8.0)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub enum Corner {
    RearRight,
    RearLeft,
    FrontLeft,
    FrontRight,
}

impl Corner {
    const ALL: [Corner; 4] = [
        Corner::RearRight,
        Corner::RearLeft,
        Corner::FrontLeft,
        Corner::FrontRight,
    ];

    pub fn iter() -> Iter<'static, Corner> {
        Self::ALL.iter()
    }
}
