//! Artificial potential field.
//!
//! Every obstacle point within the influence radius `R` is the center of a Gaussian potential
//! well `U(d) = gain · exp(-(d/σ)²)` with `σ = R/2`. The repulsive force is its negative gradient
//! `F(d) = (2d/σ²) · U(d)`, pointing from the obstacle point to the query point. With this choice
//! of `σ` the force has almost vanished at the influence boundary.

use super::{
    error::{non_negative, positive},
    ConfigError, Force, Position,
};

/// Distances below this are floored to avoid dividing by zero.
const DISTANCE_EPSILON: f64 = 1e-6;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldConfig {
    pub gain: f64,
    /// Meters.
    pub influence_radius: f64,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            gain: 0.7,
            influence_radius: 0.2,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PotentialField {
    gain: f64,
    influence_radius: f64,
    sigma: f64,
}

impl PotentialField {
    pub fn new(config: FieldConfig) -> Result<Self, ConfigError> {
        if !non_negative(config.gain) {
            return Err(ConfigError::Gain {
                name: "repulsive",
                value: config.gain,
            });
        }
        if !positive(config.influence_radius) {
            return Err(ConfigError::InfluenceRadius(config.influence_radius));
        }
        Ok(Self {
            gain: config.gain,
            influence_radius: config.influence_radius,
            sigma: config.influence_radius / 2.0,
        })
    }

    pub fn influence_radius(&self) -> f64 {
        self.influence_radius
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    pub fn potential(&self, distance: f64) -> f64 {
        self.gain * (-(distance / self.sigma).powi(2)).exp()
    }

    /// Magnitude of the repulsive force at `distance` from a single obstacle point.
    pub fn magnitude(&self, distance: f64) -> f64 {
        (2.0 * distance / self.sigma.powi(2)) * self.potential(distance)
    }

    /// Sum of the repulsive forces of all `points` acting on `query`.
    pub fn force_at(&self, query: Position, points: &[Position]) -> Force {
        points
            .iter()
            .filter_map(|point| {
                let offset = query - *point;
                let distance = offset.norm();
                (distance <= self.influence_radius).then(|| {
                    let distance = distance.max(DISTANCE_EPSILON);
                    offset / distance * self.magnitude(distance)
                })
            })
            .fold(Force::zeros(), |total, force| total + force)
    }

    /// Force at each of the `corners` and their sum.
    pub fn corner_forces<const N: usize>(
        &self,
        corners: &[Position; N],
        points: &[Position],
    ) -> ([Force; N], Force) {
        let forces = corners.map(|corner| self.force_at(corner, points));
        let total = forces.iter().fold(Force::zeros(), |total, f| total + f);
        (forces, total)
    }
}

/// Force given as magnitude and direction.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PolarForce {
    pub linear: f64,
    /// Radians, counterclockwise from the x-axis. Zero for a vanishing force.
    pub angular: f64,
}

impl From<Force> for PolarForce {
    fn from(value: Force) -> Self {
        let linear = value.norm();
        let angular = if linear > DISTANCE_EPSILON {
            value.y.atan2(value.x)
        } else {
            0.0
        };
        Self { linear, angular }
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::{FRAC_1_SQRT_2, PI};

    use approx::assert_abs_diff_eq;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    const EPSILON: f64 = 1e-9;

    fn field() -> PotentialField {
        PotentialField::new(FieldConfig::default()).unwrap()
    }

    #[test]
    fn test_no_points_in_range() {
        let points = [Position::new(1.0, 0.0), Position::new(0.0, -0.21)];
        assert_eq!(field().force_at(Position::new(0.0, 0.0), &points), Force::zeros());
        assert_eq!(field().force_at(Position::new(0.0, 0.0), &[]), Force::zeros());
    }

    #[test]
    fn test_force_at_sigma() {
        let field = field();
        let sigma = field.sigma();
        let force = field.force_at(Position::new(sigma, 0.0), &[Position::new(0.0, 0.0)]);
        let expected = (2.0 * sigma / sigma.powi(2)) * 0.7 * (-1.0_f64).exp();
        assert_abs_diff_eq!(force.norm(), expected, epsilon = EPSILON);
        assert_abs_diff_eq!(force, Force::new(expected, 0.0), epsilon = EPSILON);
    }

    #[rstest]
    #[case::right(Position::new(0.1, 0.0), 0.0)]
    #[case::up(Position::new(0.0, 0.1), 0.5 * PI)]
    #[case::left_down(Position::new(-0.05, -0.05), -0.75 * PI)]
    fn test_force_points_away_from_obstacle(#[case] query: Position, #[case] angle: f64) {
        let force = field().force_at(query, &[Position::new(0.0, 0.0)]);
        assert_abs_diff_eq!(PolarForce::from(force).angular, angle, epsilon = EPSILON);
    }

    #[test]
    fn test_magnitude_decreases_towards_boundary() {
        let field = field();
        let start = field.sigma() * FRAC_1_SQRT_2;
        let steps = 50;
        let magnitudes = (0..=steps)
            .map(|i| {
                let d = start + (field.influence_radius() - start) * i as f64 / steps as f64;
                field
                    .force_at(Position::new(d, 0.0), &[Position::new(0.0, 0.0)])
                    .norm()
            })
            .collect::<Vec<_>>();
        assert!(magnitudes.windows(2).all(|w| w[1] < w[0]));
        assert!(magnitudes[steps] < 0.1 * magnitudes[0]);
    }

    #[test]
    fn test_coincident_point_gives_no_direction() {
        let force = field().force_at(Position::new(1.0, 1.0), &[Position::new(1.0, 1.0)]);
        assert!(force.iter().all(|f| f.is_finite()));
        assert_abs_diff_eq!(force.norm(), 0.0);
    }

    #[test]
    fn test_symmetric_points_cancel() {
        let points = [Position::new(0.1, 0.0), Position::new(-0.1, 0.0)];
        assert_abs_diff_eq!(
            field().force_at(Position::new(0.0, 0.0), &points),
            Force::zeros(),
            epsilon = EPSILON
        );
    }

    #[test]
    fn test_corner_forces_sum() {
        let corners = [
            Position::new(-0.5, -0.4),
            Position::new(-0.5, 0.4),
            Position::new(0.5, 0.4),
            Position::new(0.5, -0.4),
        ];
        let points = [Position::new(0.6, 0.4), Position::new(-0.5, -0.5)];
        let (forces, total) = field().corner_forces(&corners, &points);
        assert_abs_diff_eq!(forces[0], Force::new(0.0, field().magnitude(0.1)), epsilon = EPSILON);
        assert_eq!(forces[1], Force::zeros());
        assert_abs_diff_eq!(forces[2], Force::new(-field().magnitude(0.1), 0.0), epsilon = EPSILON);
        assert_eq!(forces[3], Force::zeros());
        assert_abs_diff_eq!(total, forces[0] + forces[2], epsilon = EPSILON);
    }

    #[test]
    fn test_polar_force() {
        let polar = PolarForce::from(Force::new(0.0, -2.0));
        assert_abs_diff_eq!(polar.linear, 2.0);
        assert_abs_diff_eq!(polar.angular, -0.5 * PI);
        assert_eq!(PolarForce::from(Force::zeros()), PolarForce::default());
    }

    #[rstest]
    #[case(FieldConfig { gain: -1.0, influence_radius: 0.2 })]
    #[case(FieldConfig { gain: 0.7, influence_radius: 0.0 })]
    #[case(FieldConfig { gain: 0.7, influence_radius: f64::NAN })]
    fn test_invalid_config(#[case] config: FieldConfig) {
        assert!(PotentialField::new(config).is_err());
    }
}
