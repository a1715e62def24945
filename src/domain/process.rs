// Process domain model
use super::reading::Reading;
use serde::{Deserialize, Serialize};

/// How many generated readings each process keeps, oldest evicted first.
pub const HISTORY_LIMIT: usize = 60;

pub type ProcessId = String;

/// One simulated production run.
///
/// Stopping a process only clears `is_running`; the record itself is never
/// deleted, so a stopped process keeps its last reading and history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Process {
    pub id: ProcessId,
    pub target_params: Reading,
    pub current_params: Option<Reading>,
    pub is_running: bool,
    pub history: Vec<Reading>,
}

impl Process {
    pub fn new(id: ProcessId, target_params: Reading) -> Self {
        Self {
            id,
            target_params,
            current_params: None,
            is_running: true,
            history: Vec::new(),
        }
    }

    /// Record a generated reading as the latest and append it to the history,
    /// keeping only the most recent `HISTORY_LIMIT` entries.
    pub fn advance(&mut self, reading: Reading) {
        self.current_params = Some(reading.clone());
        self.history.push(reading);
        if self.history.len() > HISTORY_LIMIT {
            let excess = self.history.len() - HISTORY_LIMIT;
            self.history.drain(..excess);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generated(speed: f64) -> Reading {
        Reading {
            is_target: false,
            ..Reading::target(25.0, 60.0, 1013.0, speed)
        }
    }

    #[test]
    fn new_process_is_running_with_empty_history() {
        let process = Process::new("1".into(), Reading::target(25.0, 60.0, 1013.0, 100.0));
        assert!(process.is_running);
        assert!(process.current_params.is_none());
        assert!(process.history.is_empty());
    }

    #[test]
    fn advance_sets_current_params() {
        let mut process = Process::new("1".into(), Reading::target(25.0, 60.0, 1013.0, 100.0));
        let reading = generated(101.0);
        process.advance(reading.clone());
        assert_eq!(process.current_params, Some(reading.clone()));
        assert_eq!(process.history, vec![reading]);
    }

    #[test]
    fn history_is_bounded_to_the_most_recent_sixty() {
        let mut process = Process::new("1".into(), Reading::target(25.0, 60.0, 1013.0, 100.0));
        for i in 0..100 {
            process.advance(generated(i as f64));
        }
        assert_eq!(process.history.len(), HISTORY_LIMIT);
        // The most recent 60 survive, in chronological order.
        let speeds: Vec<f64> = process.history.iter().map(|r| r.speed).collect();
        let expected: Vec<f64> = (40..100).map(|i| i as f64).collect();
        assert_eq!(speeds, expected);
        assert_eq!(process.current_params.as_ref().unwrap().speed, 99.0);
    }
}
