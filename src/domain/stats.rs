// Production stats domain model
use serde::{Deserialize, Serialize};

/// Cumulative production counters, independent of any single process.
///
/// Invariant: `defective_products <= total_products`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub total_products: u64,
    pub defective_products: u64,
}

impl Stats {
    /// Count one generated reading, defective or not.
    pub fn record(&mut self, defective: bool) {
        self.total_products += 1;
        if defective {
            self.defective_products += 1;
        }
    }
}
