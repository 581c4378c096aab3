//! Recent dictionary searches: a capped, deduplicated list kept in memory
//! and mirrored to one JSON file.
//!
//! The file is read once when the store opens. An unreadable or corrupt file
//! degrades to an empty list (with a warning) rather than failing startup,
//! and write failures are logged and otherwise ignored: history is a
//! convenience, never a reason to take the tutor down.

use std::path::{Path, PathBuf};

use tokio::sync::RwLock;
use tracing::{debug, error, warn};

use crate::domain::SearchHistoryEntry;
use crate::util::now_millis;

/// Most recent searches kept; older ones fall off the end.
pub const HISTORY_CAP: usize = 10;

pub struct HistoryStore {
    path: Option<PathBuf>,
    entries: RwLock<Vec<SearchHistoryEntry>>,
}

impl HistoryStore {
    /// Open the store backed by `path`, loading whatever is already there.
    pub fn open(path: PathBuf) -> Self {
        let entries = read_entries(&path);
        debug!(target: "nihongo_backend", path = %path.display(), count = entries.len(), "History store opened");
        Self { path: Some(path), entries: RwLock::new(entries) }
    }

    /// Store with no backing file; history lives for the process only.
    pub fn in_memory() -> Self {
        Self { path: None, entries: RwLock::new(Vec::new()) }
    }

    /// HISTORY_PATH picks the backing file (default `data/search_history.json`).
    /// Setting it to an empty string disables persistence.
    pub fn from_env() -> Self {
        match std::env::var("HISTORY_PATH") {
            Ok(v) if v.trim().is_empty() => Self::in_memory(),
            Ok(v) => Self::open(PathBuf::from(v)),
            Err(_) => Self::open(PathBuf::from("data/search_history.json")),
        }
    }

    /// Current entries, newest first.
    pub async fn load(&self) -> Vec<SearchHistoryEntry> {
        self.entries.read().await.clone()
    }

    /// Record a successful lookup. Any entry for the same word (compared
    /// case-insensitively) is removed, the new one goes to the front, and the
    /// list is truncated to [`HISTORY_CAP`].
    pub async fn record(&self, word: &str) -> Vec<SearchHistoryEntry> {
        let mut entries = self.entries.write().await;
        let key = word.to_lowercase();
        entries.retain(|e| e.word.to_lowercase() != key);
        entries.insert(0, SearchHistoryEntry { word: word.to_string(), timestamp: now_millis() });
        entries.truncate(HISTORY_CAP);
        self.persist(&entries);
        entries.clone()
    }

    /// Drop every entry, in memory and on disk.
    pub async fn clear(&self) -> Vec<SearchHistoryEntry> {
        let mut entries = self.entries.write().await;
        entries.clear();
        self.persist(&entries);
        entries.clone()
    }

    fn persist(&self, entries: &[SearchHistoryEntry]) {
        let Some(path) = &self.path else { return };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                if let Err(e) = std::fs::create_dir_all(parent) {
                    error!(target: "nihongo_backend", path = %path.display(), error = %e, "Failed to create history directory");
                    return;
                }
            }
        }
        match serde_json::to_string(entries) {
            Ok(json) => {
                if let Err(e) = std::fs::write(path, json) {
                    error!(target: "nihongo_backend", path = %path.display(), error = %e, "Failed to write history file");
                }
            }
            Err(e) => {
                error!(target: "nihongo_backend", error = %e, "Failed to encode history");
            }
        }
    }
}

fn read_entries(path: &Path) -> Vec<SearchHistoryEntry> {
    if !path.exists() {
        return Vec::new();
    }
    match std::fs::read_to_string(path) {
        Ok(s) => match serde_json::from_str::<Vec<SearchHistoryEntry>>(&s) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(target: "nihongo_backend", path = %path.display(), error = %e, "History file is corrupt; starting empty");
                Vec::new()
            }
        },
        Err(e) => {
            warn!(target: "nihongo_backend", path = %path.display(), error = %e, "History file unreadable; starting empty");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_history_path() -> PathBuf {
        std::env::temp_dir().join(format!("nihongo-history-test-{}.json", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn record_dedups_case_insensitively_and_prepends() {
        let store = HistoryStore::in_memory();
        store.record("Taberu").await;
        store.record("neko").await;
        let entries = store.record("TABERU").await;

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].word, "TABERU");
        assert_eq!(entries[1].word, "neko");
    }

    #[tokio::test]
    async fn record_caps_at_ten_newest_first() {
        let store = HistoryStore::in_memory();
        for i in 1..=12 {
            store.record(&format!("word{}", i)).await;
        }
        let entries = store.load().await;
        assert_eq!(entries.len(), HISTORY_CAP);
        assert_eq!(entries[0].word, "word12");
        assert!(entries.iter().all(|e| e.word != "word1" && e.word != "word2"));
    }

    #[tokio::test]
    async fn entries_survive_reopen() {
        let path = temp_history_path();
        {
            let store = HistoryStore::open(path.clone());
            store.record("猫").await;
            store.record("犬").await;
        }
        let reopened = HistoryStore::open(path.clone());
        let entries = reopened.load().await;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].word, "犬");
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn corrupt_file_degrades_to_empty() {
        let path = temp_history_path();
        std::fs::write(&path, "not json at all").unwrap();
        let store = HistoryStore::open(path.clone());
        assert!(store.load().await.is_empty());
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn clear_empties_memory_and_disk() {
        let path = temp_history_path();
        {
            let store = HistoryStore::open(path.clone());
            store.record("水").await;
            assert_eq!(store.clear().await.len(), 0);
        }
        let reopened = HistoryStore::open(path.clone());
        assert!(reopened.load().await.is_empty());
        let _ = std::fs::remove_file(&path);
    }
}
