//! Document store.
//!
//! The whole collection is one JSON array. Every request loads it, mutates it
//! in memory and writes it back in full; the last writer wins.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

use crate::error::DatepollResult;
use crate::event::Event;

/// Load/write contract for the event collection.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// The full collection, newest first.
    async fn load(&self) -> DatepollResult<Vec<Event>>;

    /// Replace the stored collection with `events`.
    async fn write(&self, events: &[Event]) -> DatepollResult<()>;
}

/// A JSON array in a single file.
///
/// Writes through one store (and its clones) are serialized. Each write also
/// gets its own temp file, so separate stores on the same path never share one.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore {
            path: path.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "events.json".into());
        name.push(format!(".{}.tmp", uuid::Uuid::new_v4().simple()));
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl EventStore for JsonFileStore {
    async fn load(&self) -> DatepollResult<Vec<Event>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        Ok(serde_json::from_str(&content)?)
    }

    async fn write(&self, events: &[Event]) -> DatepollResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(events)?;
        let _guard = self.write_lock.lock().await;

        // Write next to the target and rename so readers never see half a document
        let tmp = self.temp_path();
        if let Err(e) = tokio::fs::write(&tmp, content).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        if let Err(e) = tokio::fs::rename(&tmp, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }

        tracing::trace!(path = %self.path.display(), count = events.len(), "wrote event document");
        Ok(())
    }
}

/// In-process collection, for tests and ephemeral servers.
#[derive(Debug, Default)]
pub struct MemoryStore {
    events: RwLock<Vec<Event>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_events(events: Vec<Event>) -> Self {
        MemoryStore {
            events: RwLock::new(events),
        }
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn load(&self) -> DatepollResult<Vec<Event>> {
        Ok(self.events.read().await.clone())
    }

    async fn write(&self, events: &[Event]) -> DatepollResult<()> {
        *self.events.write().await = events.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DatepollError;
    use chrono::NaiveDate;

    fn sample() -> Event {
        Event::new(
            "Standup".into(),
            "alice".into(),
            Some("daily".into()),
            vec![NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()],
        )
    }

    #[tokio::test]
    async fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("events.json"));
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_write_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested/db/events.json"));
        let events = vec![sample(), sample()];

        store.write(&events).await.unwrap();

        assert_eq!(store.load().await.unwrap(), events);

        let leftovers: Vec<_> = std::fs::read_dir(dir.path().join("nested/db"))
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(leftovers, vec![std::ffi::OsString::from("events.json")]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_writes_keep_document_readable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.json");
        let store = JsonFileStore::new(&path);
        // A second store on the same file only shares the path, not the lock
        let other = JsonFileStore::new(&path);

        for _ in 0..20 {
            let mut tasks = Vec::new();
            for n in 0..8 {
                let store = if n % 2 == 0 { store.clone() } else { other.clone() };
                tasks.push(tokio::spawn(async move {
                    let events = vec![sample(); n + 1];
                    store.write(&events).await
                }));
            }

            for task in tasks {
                task.await.unwrap().unwrap();
            }

            let loaded = store.load().await.unwrap();
            assert!((1..=8).contains(&loaded.len()));
        }
    }

    #[test]
    fn test_temp_paths_are_unique() {
        let store = JsonFileStore::new("/srv/datepoll/events.json");
        let (a, b) = (store.temp_path(), store.temp_path());

        assert_ne!(a, b);
        assert_eq!(a.parent(), Some(Path::new("/srv/datepoll")));
    }

    #[tokio::test]
    async fn test_write_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("events.json"));

        store.write(&[sample(), sample()]).await.unwrap();
        store.write(&[]).await.unwrap();

        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = JsonFileStore::new(path).load().await.unwrap_err();
        assert!(matches!(err, DatepollError::Serialization(_)));
    }

    #[tokio::test]
    async fn test_memory_store() {
        let store = MemoryStore::new();
        let events = vec![sample()];
        store.write(&events).await.unwrap();
        assert_eq!(store.load().await.unwrap(), events);
    }
}
