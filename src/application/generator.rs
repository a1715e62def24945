// Value generation - perturbs a target reading with bounded noise
use crate::domain::reading::Reading;
use chrono::Utc;
use rand::Rng;

/// Produces simulated sensor readings drifting around a target.
///
/// Each channel gets an independent deviation fraction drawn uniformly from
/// `[-deviation_fraction, +deviation_fraction)`; the generated value is
/// `target * (1 + deviation)`. Pure apart from the injected RNG.
pub struct ValueGenerator {
    deviation_fraction: f64,
}

impl ValueGenerator {
    pub fn new(deviation_fraction: f64) -> Self {
        Self { deviation_fraction }
    }

    /// Generate a perturbed reading around `target`, stamped with the
    /// current time and flagged as measured.
    pub fn generate<R: Rng>(&self, target: &Reading, rng: &mut R) -> Reading {
        Reading {
            temperature: self.perturb(target.temperature, rng),
            humidity: self.perturb(target.humidity, rng),
            pressure: self.perturb(target.pressure, rng),
            speed: self.perturb(target.speed, rng),
            timestamp: Utc::now(),
            is_target: false,
        }
    }

    fn perturb<R: Rng>(&self, base: f64, rng: &mut R) -> f64 {
        let deviation = (rng.gen_range(0.0..1.0) - 0.5) * 2.0 * self.deviation_fraction;
        base * (1.0 + deviation)
    }
}
