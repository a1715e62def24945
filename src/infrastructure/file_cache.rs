// File-backed implementation of the local state cache
use crate::application::state_cache::StateCache;
use anyhow::Context;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

/// Stores each cache key as one JSON file under a configured directory.
/// Writes are whole-value overwrites, matching the cache contract.
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    /// Open the cache directory, creating it if needed.
    pub fn open(dir: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create state directory {}", dir.display()))?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl StateCache for FileCache {
    fn read(&self, key: &str) -> anyhow::Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("failed to read state entry {key}")),
        }
    }

    fn write(&self, key: &str, value: &str) -> anyhow::Result<()> {
        fs::write(self.path_for(key), value)
            .with_context(|| format!("failed to write state entry {key}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    static DIR_COUNTER: AtomicU32 = AtomicU32::new(0);

    fn scratch_dir() -> PathBuf {
        std::env::temp_dir().join(format!(
            "production-telemetry-test-{}-{}",
            std::process::id(),
            DIR_COUNTER.fetch_add(1, Ordering::Relaxed)
        ))
    }

    #[test]
    fn missing_keys_read_as_none() {
        let dir = scratch_dir();
        let cache = FileCache::open(&dir).unwrap();
        assert!(cache.read("production_stats").unwrap().is_none());
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn entries_round_trip_and_overwrite() {
        let dir = scratch_dir();
        let cache = FileCache::open(&dir).unwrap();

        cache.write("production_stats", "{\"total_products\":1}").unwrap();
        assert_eq!(
            cache.read("production_stats").unwrap().as_deref(),
            Some("{\"total_products\":1}")
        );

        cache.write("production_stats", "{\"total_products\":9}").unwrap();
        assert_eq!(
            cache.read("production_stats").unwrap().as_deref(),
            Some("{\"total_products\":9}")
        );

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn keys_map_to_separate_files() {
        let dir = scratch_dir();
        let cache = FileCache::open(&dir).unwrap();

        cache.write("production_stats", "{}").unwrap();
        cache.write("production_processes", "[]").unwrap();

        assert!(dir.join("production_stats.json").is_file());
        assert!(dir.join("production_processes.json").is_file());
        let _ = fs::remove_dir_all(dir);
    }
}
