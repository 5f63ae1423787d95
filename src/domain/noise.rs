//! Seedable range noise.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::Normal;

use super::{error::non_negative, ConfigError};

/// Zero-mean Gaussian noise source. The same seed yields the same sequence.
#[derive(Clone, Debug)]
pub struct RangeNoise {
    rng: ChaCha8Rng,
    distribution: Option<Normal<f64>>,
}

impl RangeNoise {
    pub fn new(std_dev: f64, seed: u64) -> Result<Self, ConfigError> {
        if !non_negative(std_dev) {
            return Err(ConfigError::NoiseStdDev(std_dev));
        }
        let distribution = if std_dev > 0.0 {
            Some(Normal::new(0.0, std_dev).map_err(|_| ConfigError::NoiseStdDev(std_dev))?)
        } else {
            None
        };
        Ok(Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            distribution,
        })
    }

    pub fn sample(&mut self) -> f64 {
        match &self.distribution {
            Some(distribution) => self.rng.sample(distribution),
            None => 0.0,
        }
    }

    /// Adds noise to a measured distance and clamps the result to be non-negative.
    pub fn perturb(&mut self, distance: f64) -> f64 {
        (distance + self.sample()).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_deterministic_seed() {
        let mut noise1 = RangeNoise::new(0.5, 42).unwrap();
        let mut noise2 = RangeNoise::new(0.5, 42).unwrap();

        for _ in 0..100 {
            assert_eq!(noise1.sample(), noise2.sample());
        }
    }

    #[test]
    fn test_zero_std_dev() {
        let mut noise = RangeNoise::new(0.0, 7).unwrap();
        for _ in 0..10 {
            assert_eq!(noise.perturb(1.25), 1.25);
        }
    }

    #[test]
    fn test_perturb_is_non_negative() {
        let mut noise = RangeNoise::new(1.0, 3).unwrap();
        assert!((0..1000).all(|_| noise.perturb(0.0) >= 0.0));
    }

    #[test]
    fn test_sample_statistics() {
        let mut noise = RangeNoise::new(0.1, 11).unwrap();
        let samples = (0..10_000).map(|_| noise.sample()).collect::<Vec<_>>();
        let mean = samples.iter().sum::<f64>() / samples.len() as f64;
        let variance =
            samples.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / samples.len() as f64;
        assert!(mean.abs() < 0.01);
        assert!((variance.sqrt() - 0.1).abs() < 0.01);
    }

    #[test]
    fn test_invalid_std_dev() {
        assert_eq!(
            RangeNoise::new(-0.1, 0).unwrap_err(),
            ConfigError::NoiseStdDev(-0.1)
        );
        assert!(RangeNoise::new(f64::INFINITY, 0).is_err());
    }
}
