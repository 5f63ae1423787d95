//! The domain module encapsulates the simulation kernel: obstacle geometry, the rotating range
//! sensor, the potential field and the robot body.
//!
//! It has no notion of rendering, input devices or message transport. Those collaborators only
//! feed commanded velocities in and read telemetry out through [`crate::simulator`].

mod basis;
mod environment;
mod error;
mod field;
mod geometry;
mod noise;
mod robot;
mod scanner;

pub use basis::{Angle, Force, Pose, Position, Vector, Velocity};
pub use environment::Environment;
pub use error::ConfigError;
pub use field::{FieldConfig, PolarForce, PotentialField};
pub use geometry::{BoundingBox, Circle, Obstacle, Polygon};
pub use noise::RangeNoise;
pub use robot::{Corner, Robot, RobotConfig};
pub use scanner::{Beam, ScanBuffer, ScanSample, Scanner, ScannerConfig};
