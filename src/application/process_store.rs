// Process store - the collection of running and stopped production runs
use crate::application::state_cache::StateCache;
use crate::domain::process::{Process, ProcessId};
use crate::domain::reading::Reading;
use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

/// Cache key for the serialized process list.
pub const PROCESS_STATE_KEY: &str = "production_processes";

/// Owns the process collection.
///
/// All mutations go through this store and each one flushes the whole
/// serialized list to the local cache, so readers always observe a
/// consistent snapshot and a restart picks up where the session left off.
pub struct ProcessStore {
    processes: RwLock<Vec<Process>>,
    sequence: AtomicU64,
    cache: Arc<dyn StateCache>,
}

impl ProcessStore {
    /// Rehydrate the store from the local cache. A missing or unreadable
    /// blob starts the session with an empty collection.
    pub fn load(cache: Arc<dyn StateCache>) -> Self {
        let processes = match cache.read(PROCESS_STATE_KEY) {
            Ok(Some(blob)) => match serde_json::from_str::<Vec<Process>>(&blob) {
                Ok(processes) => processes,
                Err(e) => {
                    tracing::warn!("discarding unreadable process state: {e}");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!("failed to read process state: {e:#}");
                Vec::new()
            }
        };

        Self {
            processes: RwLock::new(processes),
            sequence: AtomicU64::new(0),
            cache,
        }
    }

    /// Create a new running process around `target` and return its id.
    pub fn start(&self, target: Reading) -> ProcessId {
        let id = self.next_id();
        let mut processes = self.processes.write().unwrap();
        processes.push(Process::new(id.clone(), target));
        self.persist(&processes);
        id
    }

    /// Stop the matching process. The record stays resident; only the
    /// running flag changes. Returns false when the id is unknown.
    pub fn stop(&self, id: &str) -> bool {
        let mut processes = self.processes.write().unwrap();
        let Some(process) = processes.iter_mut().find(|p| p.id == id) else {
            return false;
        };
        process.is_running = false;
        self.persist(&processes);
        true
    }

    /// Replace the target of the matching process; takes effect on the next
    /// tick and leaves past history untouched.
    pub fn update_target(&self, id: &str, target: Reading) -> bool {
        let mut processes = self.processes.write().unwrap();
        let Some(process) = processes.iter_mut().find(|p| p.id == id) else {
            return false;
        };
        process.target_params = target;
        self.persist(&processes);
        true
    }

    /// Record a generated reading for the matching process. Invoked by the
    /// tick scheduler only.
    pub fn advance(&self, id: &str, reading: Reading) -> bool {
        let mut processes = self.processes.write().unwrap();
        let Some(process) = processes.iter_mut().find(|p| p.id == id) else {
            return false;
        };
        process.advance(reading);
        self.persist(&processes);
        true
    }

    /// Consistent point-in-time copy of the whole collection.
    pub fn snapshot(&self) -> Vec<Process> {
        self.processes.read().unwrap().clone()
    }

    // Ids are time-based with a monotonic suffix so two starts inside the
    // same millisecond still get distinct ids.
    fn next_id(&self) -> ProcessId {
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
        format!("{}-{}", Utc::now().timestamp_millis(), sequence)
    }

    // Called with the write lock held so cache contents follow mutation
    // order. A failed write costs at most the latest state on restart.
    fn persist(&self, processes: &[Process]) {
        match serde_json::to_string(processes) {
            Ok(blob) => {
                if let Err(e) = self.cache.write(PROCESS_STATE_KEY, &blob) {
                    tracing::warn!("failed to persist process state: {e:#}");
                }
            }
            Err(e) => tracing::warn!("failed to serialize process state: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::state_cache::MemoryCache;

    fn store() -> (Arc<MemoryCache>, ProcessStore) {
        let cache = Arc::new(MemoryCache::new());
        let store = ProcessStore::load(cache.clone());
        (cache, store)
    }

    fn target() -> Reading {
        Reading::target(25.0, 60.0, 1013.0, 100.0)
    }

    fn generated(speed: f64) -> Reading {
        Reading {
            is_target: false,
            ..Reading::target(25.0, 60.0, 1013.0, speed)
        }
    }

    #[test]
    fn start_creates_a_running_process() {
        let (_, store) = store();
        let id = store.start(target());

        let snapshot = store.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].id, id);
        assert!(snapshot[0].is_running);
        assert!(snapshot[0].current_params.is_none());
        assert!(snapshot[0].history.is_empty());
    }

    #[test]
    fn starts_in_the_same_instant_get_distinct_ids() {
        let (_, store) = store();
        let first = store.start(target());
        let second = store.start(target());
        assert_ne!(first, second);
    }

    #[test]
    fn stop_flips_the_running_flag_and_keeps_the_record() {
        let (_, store) = store();
        let id = store.start(target());

        assert!(store.stop(&id));
        let snapshot = store.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert!(!snapshot[0].is_running);
    }

    #[test]
    fn unknown_ids_are_a_no_op() {
        let (_, store) = store();
        store.start(target());

        assert!(!store.stop("missing"));
        assert!(!store.update_target("missing", target()));
        assert!(!store.advance("missing", generated(100.0)));
        assert_eq!(store.snapshot().len(), 1);
    }

    #[test]
    fn update_target_replaces_the_target_only() {
        let (_, store) = store();
        let id = store.start(target());
        store.advance(&id, generated(101.0));

        let new_target = Reading::target(30.0, 50.0, 1000.0, 200.0);
        assert!(store.update_target(&id, new_target.clone()));

        let process = &store.snapshot()[0];
        assert_eq!(process.target_params, new_target);
        // Past history is not rewritten.
        assert_eq!(process.history.len(), 1);
        assert_eq!(process.history[0].speed, 101.0);
    }

    #[test]
    fn snapshots_are_isolated_from_the_store() {
        let (_, store) = store();
        let id = store.start(target());

        let mut snapshot = store.snapshot();
        snapshot[0].is_running = false;
        snapshot.clear();

        let process = &store.snapshot()[0];
        assert_eq!(process.id, id);
        assert!(process.is_running);
    }

    #[test]
    fn state_survives_a_reload_through_the_cache() {
        let (cache, store) = store();
        let id = store.start(target());
        store.advance(&id, generated(101.0));
        store.stop(&id);

        let reloaded = ProcessStore::load(cache);
        let snapshot = reloaded.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].id, id);
        assert!(!snapshot[0].is_running);
        assert_eq!(snapshot[0].history.len(), 1);
    }

    #[test]
    fn an_unreadable_blob_starts_empty() {
        let cache = Arc::new(MemoryCache::new());
        cache.write(PROCESS_STATE_KEY, "not json").unwrap();

        let store = ProcessStore::load(cache);
        assert!(store.snapshot().is_empty());
    }
}
