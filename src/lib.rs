//! Deterministic 2-D simulation of a robot avoiding static obstacles with a rotating range sensor
//! and an artificial potential field.


pub mod domain;
pub mod simulator;

pub use simulator::{SimulationConfig, Simulator, Telemetry};
