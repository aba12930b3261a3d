//! History Store: a capped, deduplicated, order-preserving local cache of
//! past reports, rehydrated at startup from the key-value capability.

use anyhow::Result;
use uuid::Uuid;

use crate::capabilities::KeyValueStore;
use crate::models::HistoryEntry;

const STORAGE_KEY: &str = "underthehood_history";
const HISTORY_CAP: usize = 10;

pub struct HistoryStore {
    store: Box<dyn KeyValueStore>,
    entries: Vec<HistoryEntry>,
}

impl HistoryStore {
    /// Rehydrate from persisted storage. Corrupt or unreadable state is
    /// logged and treated as an empty history, never surfaced as an error.
    pub fn load(store: Box<dyn KeyValueStore>) -> Self {
        let entries = match store.get(STORAGE_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<HistoryEntry>>(&raw) {
                Ok(entries) => entries,
                Err(err) => {
                    eprintln!("Discarding corrupt history snapshot: {err}");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(err) => {
                eprintln!("Failed to load history: {err}");
                Vec::new()
            }
        };
        Self { store, entries }
    }

    /// Most recent first.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn find(&self, id: Uuid) -> Option<&HistoryEntry> {
        self.entries.iter().find(|entry| entry.id() == id)
    }

    /// Idempotent by id: saving an already-present report leaves the list
    /// unchanged. Otherwise prepends, truncates to the cap, and persists the
    /// full snapshot synchronously.
    pub fn save(&mut self, entry: HistoryEntry) -> Result<()> {
        if self.entries.iter().any(|e| e.id() == entry.id()) {
            return Ok(());
        }
        self.entries.insert(0, entry);
        self.entries.truncate(HISTORY_CAP);
        self.persist()
    }

    /// Empty the list and remove persisted state. Gated on an explicit user
    /// confirmation; `clear(false)` is a no-op.
    pub fn clear(&mut self, confirmed: bool) -> Result<()> {
        if !confirmed {
            return Ok(());
        }
        self.entries.clear();
        self.store.remove(STORAGE_KEY)
    }

    fn persist(&mut self) -> Result<()> {
        let snapshot = serde_json::to_string(&self.entries)?;
        self.store.set(STORAGE_KEY, &snapshot)
    }
}
