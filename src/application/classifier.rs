// Defect classification - threshold check plus random latent defects
use crate::domain::reading::Reading;
use rand::Rng;

/// Classifies generated readings as defective or in-spec.
///
/// A reading is defective when any channel's relative deviation from its
/// target exceeds `threshold`, or when the per-reading latent-defect draw
/// fires (probability `random_defect_probability`). Setting the probability
/// to zero disables the random term, which is how tests make the verdict
/// deterministic.
pub struct DefectClassifier {
    threshold: f64,
    random_defect_probability: f64,
}

impl DefectClassifier {
    pub fn new(threshold: f64, random_defect_probability: f64) -> Self {
        Self {
            threshold,
            random_defect_probability,
        }
    }

    pub fn is_defective<R: Rng>(&self, reading: &Reading, target: &Reading, rng: &mut R) -> bool {
        let out_of_spec = reading
            .channels()
            .into_iter()
            .zip(target.channels())
            .any(|(value, target_value)| self.channel_out_of_spec(value, target_value));
        let latent_defect = rng.gen_range(0.0..1.0) < self.random_defect_probability;
        out_of_spec || latent_defect
    }

    /// A zero target channel cannot hold a relative tolerance, so it always
    /// counts as out of spec. The deviation is taken against the target's
    /// magnitude so negative targets behave like positive ones.
    fn channel_out_of_spec(&self, value: f64, target_value: f64) -> bool {
        if target_value == 0.0 {
            return true;
        }
        (value - target_value).abs() / target_value.abs() > self.threshold
    }
}
