use thiserror::Error;

/// Invalid construction-time parameter. Rejected before the simulation starts.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("beam count must be at least 1, got {0}")]
    BeamCount(usize),
    #[error("max range must be positive and finite, got {0}")]
    MaxRange(f64),
    #[error("revolution rate must be positive and finite, got {0} Hz")]
    RevolutionRate(f64),
    #[error("noise standard deviation must be non-negative and finite, got {0}")]
    NoiseStdDev(f64),
    #[error("polygon obstacle needs at least one vertex")]
    EmptyPolygon,
    #[error("polygon obstacle has a non-finite vertex at index {0}")]
    PolygonVertex(usize),
    #[error("circle obstacle radius must be positive and finite, got {0}")]
    CircleRadius(f64),
    #[error("circle obstacle center must be finite")]
    CircleCenter,
    #[error("influence radius must be positive and finite, got {0}")]
    InfluenceRadius(f64),
    #[error("{name} gain must be non-negative and finite, got {value}")]
    Gain { name: &'static str, value: f64 },
    #[error("max speed must be positive and finite, got {0}")]
    MaxSpeed(f64),
    #[error("robot {name} must be positive and finite, got {value}")]
    BodyDimension { name: &'static str, value: f64 },
    #[error("robot start position must be finite")]
    StartPosition,
    #[error("timestep must be positive and finite, got {0} s")]
    Timestep(f64),
}

pub(crate) fn positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

pub(crate) fn non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}
