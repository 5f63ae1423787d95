//! Rotating-beam range sensor.
//!
//! The sensor completes one revolution of `beam_count` beams per scan period. Instead of sweeping
//! all beams at once, each call to [`Scanner::scan`] emits only the beams that became due since
//! the previous call, so a partial revolution stays visible as a mix of fresh and stale samples.
//! Scheduling is anchored to the simulation time passed in, never to wall-clock time.

use std::{collections::VecDeque, f64::consts::TAU};

use rayon::prelude::*;
use tracing::{debug, info, trace};

use super::{
    error::{non_negative, positive},
    ConfigError, Environment, Pose, Position, RangeNoise, Vector,
};

#[derive(Clone, Debug, PartialEq)]
pub struct ScannerConfig {
    pub beam_count: usize,
    /// Meters. Beams without a hit report this distance.
    pub max_range: f64,
    /// Meters.
    pub noise_std_dev: f64,
    /// Revolutions per second.
    pub revolution_rate: f64,
    pub seed: u64,
}

impl ScannerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.beam_count == 0 {
            return Err(ConfigError::BeamCount(self.beam_count));
        }
        if !positive(self.max_range) {
            return Err(ConfigError::MaxRange(self.max_range));
        }
        if !non_negative(self.noise_std_dev) {
            return Err(ConfigError::NoiseStdDev(self.noise_std_dev));
        }
        if !positive(self.revolution_rate) {
            return Err(ConfigError::RevolutionRate(self.revolution_rate));
        }
        Ok(())
    }

    pub fn beams_per_second(&self) -> f64 {
        self.beam_count as f64 * self.revolution_rate
    }

    /// Seconds per revolution.
    pub fn scan_period(&self) -> f64 {
        self.revolution_rate.recip()
    }
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            beam_count: 90,
            max_range: 5.0,
            noise_std_dev: 0.01,
            revolution_rate: 15.0,
            seed: 0,
        }
    }
}

/// Fixed beam direction in the robot frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Beam {
    index: usize,
    direction: Vector,
}

impl Beam {
    fn new(index: usize, beam_count: usize) -> Self {
        let angle = TAU * index as f64 / beam_count as f64;
        Self {
            index,
            direction: Vector::new(angle.cos(), angle.sin()),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn direction(&self) -> Vector {
        self.direction
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScanSample {
    /// Index of the beam that produced the sample.
    pub beam: usize,
    /// Measured point in the robot frame.
    pub point: Position,
    /// Simulation time in seconds since capture.
    pub age: f64,
}

/// Sliding window over the most recent revolution. Holds at most `capacity` samples, oldest first.
#[derive(Clone, Debug, PartialEq)]
pub struct ScanBuffer {
    samples: VecDeque<ScanSample>,
    capacity: usize,
}

impl ScanBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    pub fn push(&mut self, sample: ScanSample) {
        self.samples.push_back(sample);
        self.trim();
    }

    /// Evicts the oldest samples beyond capacity.
    pub fn trim(&mut self) {
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    pub fn age(&mut self, elapsed: f64) {
        for sample in self.samples.iter_mut() {
            sample.age += elapsed;
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &ScanSample> {
        self.samples.iter()
    }
}

pub struct Scanner {
    config: ScannerConfig,
    beams: Vec<Beam>,
    buffer: ScanBuffer,
    cursor: usize,
    last_update: f64,
    /// Fractional beams owed from previous calls. Carried over so the beam rate does not
    /// depend on the tick rate.
    beam_credit: f64,
    max_beams_per_scan: usize,
    global_points: Vec<Position>,
    noise: RangeNoise,
}

impl Scanner {
    pub fn new(config: ScannerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let noise = RangeNoise::new(config.noise_std_dev, config.seed)?;
        let beams = (0..config.beam_count)
            .map(|i| Beam::new(i, config.beam_count))
            .collect();
        let max_beams_per_scan = config.beams_per_second().ceil() as usize;

        info!(
            beam_count = config.beam_count,
            revolution_rate = config.revolution_rate,
            max_range = config.max_range,
            "scanner ready"
        );

        Ok(Self {
            buffer: ScanBuffer::new(config.beam_count),
            beams,
            cursor: 0,
            last_update: 0.0,
            beam_credit: 0.0,
            max_beams_per_scan,
            global_points: Vec::new(),
            noise,
            config,
        })
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    pub fn beams(&self) -> &[Beam] {
        &self.beams
    }

    pub fn buffer(&self) -> &ScanBuffer {
        &self.buffer
    }

    /// Index of the next beam to be emitted.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn last_update(&self) -> f64 {
        self.last_update
    }

    /// Point cloud in the global frame, projected with the pose of the last call that advanced
    /// the time.
    pub fn global_points(&self) -> &[Position] {
        &self.global_points
    }

    pub fn local_points(&self) -> Vec<Position> {
        self.buffer.iter().map(|s| s.point).collect()
    }

    pub fn ages(&self) -> Vec<f64> {
        self.buffer.iter().map(|s| s.age).collect()
    }

    pub fn is_full_revolution(&self) -> bool {
        self.buffer.len() == self.buffer.capacity()
    }

    /// Emits all beams due between the previous call and `time` and returns the updated point
    /// cloud in the global frame.
    ///
    /// The whole buffer is re-projected with `pose`, including samples captured at earlier poses,
    /// even if no beam is due. If `time` does not advance, the previous point cloud is returned
    /// unchanged.
    pub fn scan(&mut self, time: f64, pose: Pose, environment: &Environment) -> &[Position] {
        let elapsed = time - self.last_update;
        if elapsed <= 0.0 {
            if elapsed < 0.0 {
                debug!(time, last_update = self.last_update, "ignoring scan in the past");
            }
            return &self.global_points;
        }

        self.buffer.age(elapsed);
        self.last_update = time;

        let owed = self.config.beams_per_second() * elapsed + self.beam_credit;
        let due = owed.floor();
        if due < 1.0 {
            self.beam_credit = owed;
            trace!(time, owed, "no beam due");
        } else {
            let count = (due as usize).min(self.max_beams_per_scan);
            self.beam_credit = owed - due;
            self.buffer.trim();
            self.emit(count, pose, environment);
        }

        self.global_points = self
            .buffer
            .iter()
            .map(|s| pose.to_global(s.point))
            .collect();

        &self.global_points
    }

    fn emit(&mut self, count: usize, pose: Pose, environment: &Environment) {
        let beam_count = self.config.beam_count;
        let max_range = self.config.max_range;
        let rotation = pose.heading.rotation();
        let indices = (0..count)
            .map(|k| (self.cursor + k) % beam_count)
            .collect::<Vec<_>>();

        let distances = indices
            .par_iter()
            .map(|&i| {
                environment.distance_to_next_obstacle(
                    pose.position,
                    rotation * self.beams[i].direction,
                    max_range,
                )
            })
            .collect::<Vec<_>>();

        // Noise is drawn in beam order to keep runs reproducible.
        for (&i, distance) in indices.iter().zip(distances) {
            let distance = self.noise.perturb(distance);
            self.buffer.push(ScanSample {
                beam: i,
                point: Position::from(self.beams[i].direction * distance),
                age: 0.0,
            });
        }

        if self.cursor + count >= beam_count {
            debug!(time = self.last_update, "scan revolution completed");
        }
        self.cursor = (self.cursor + count) % beam_count;
    }
}
