//! Headless driver running the simulation with a constant commanded velocity and logging the
//! resulting telemetry.

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;

use rover_avoidance::{
    domain::{Angle, ConfigError, Obstacle, PolarForce, Position, ScannerConfig, Velocity},
    SimulationConfig, Simulator,
};

#[derive(Parser)]
#[command(name = "rover-avoidance")]
#[command(about = "Potential field obstacle avoidance with a simulated rotating range sensor")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Number of simulation ticks
    #[arg(short, long, default_value = "500")]
    ticks: usize,

    /// Log telemetry every n ticks
    #[arg(long, default_value = "25")]
    log_every: usize,

    /// Commanded velocity, x component (m/s)
    #[arg(long, default_value = "0.0", allow_hyphen_values = true)]
    cmd_x: f64,

    /// Commanded velocity, y component (m/s)
    #[arg(long, default_value = "0.0", allow_hyphen_values = true)]
    cmd_y: f64,

    /// Start position, x (m)
    #[arg(long, default_value = "3.0", allow_hyphen_values = true)]
    start_x: f64,

    /// Start position, y (m)
    #[arg(long, default_value = "2.0", allow_hyphen_values = true)]
    start_y: f64,

    /// Range noise standard deviation (m)
    #[arg(long, default_value = "0.01")]
    noise: f64,

    /// Seed of the range noise
    #[arg(long, default_value = "0")]
    seed: u64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(default_level.into())
                .from_env_lossy(),
        )
        .init();

    let config = SimulationConfig {
        start: Position::new(cli.start_x, cli.start_y),
        scanner: ScannerConfig {
            noise_std_dev: cli.noise,
            seed: cli.seed,
            ..ScannerConfig::default()
        },
        timestep: Duration::from_millis(20),
        obstacles: create_environment()?,
        ..SimulationConfig::default()
    };
    let mut simulator = Simulator::new(config)?;
    if let Some(bounds) = simulator.environment().bounds() {
        info!(
            width = bounds.width(),
            height = bounds.height(),
            "environment loaded"
        );
    }

    let command = Velocity::new(cli.cmd_x, cli.cmd_y);
    let log_every = cli.log_every.max(1);

    for tick in 0..cli.ticks {
        let telemetry = simulator.tick(command);
        if tick % log_every == 0 {
            let repulsive = PolarForce::from(telemetry.repulsive_force);
            info!(
                time = %format!("{:.2}", telemetry.time),
                x = %format!("{:.3}", telemetry.pose.position.x()),
                y = %format!("{:.3}", telemetry.pose.position.y()),
                speed = %format!("{:.3}", telemetry.velocity.norm()),
                points = telemetry.point_cloud.len(),
                repulsive = %format!("{:.3}", repulsive.linear),
                direction = %format!("{:.1}", Angle::new(repulsive.angular).to_deg()),
                "tick {tick}"
            );
        }
    }

    let robot = simulator.robot();
    info!(
        time = %format!("{:.2}", simulator.time()),
        x = %format!("{:.3}", robot.position().x()),
        y = %format!("{:.3}", robot.position().y()),
        "simulation finished"
    );

    Ok(())
}

/// A round pillar inside a walled area open towards the lower right.
fn create_environment() -> Result<Vec<Obstacle>, ConfigError> {
    Ok(vec![
        Obstacle::circle(Position::new(0.0, 0.0), 0.5)?,
        Obstacle::polygon(vec![
            Position::new(-4.0, -4.0),
            Position::new(-4.0, 5.0),
            Position::new(4.0, 5.0),
            Position::new(4.0, 4.0),
            Position::new(-3.0, 2.0),
            Position::new(-3.0, -4.0),
        ])?,
    ])
}
