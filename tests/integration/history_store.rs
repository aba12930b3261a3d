use popthehood::capabilities::{FileStore, KeyValueStore, MemoryStore};
use popthehood::contracts::parse_tire_analysis;
use popthehood::{HistoryEntry, HistoryStore};
use tempfile::TempDir;

use super::support::tire_body;

fn tire_entry(score: f64) -> HistoryEntry {
    HistoryEntry::Tire(parse_tire_analysis(&tire_body(score)).unwrap())
}

#[test]
fn cap_keeps_the_ten_most_recent_newest_first() {
    let mut store = HistoryStore::load(Box::new(MemoryStore::new()));
    let entries: Vec<HistoryEntry> = (0..11).map(|i| tire_entry(f64::from(i))).collect();
    for entry in &entries {
        store.save(entry.clone()).unwrap();
    }
    assert_eq!(store.entries().len(), 10);
    // The first saved entry fell off; the last saved is in front.
    assert_eq!(store.entries()[0].id(), entries[10].id());
    assert_eq!(store.entries()[9].id(), entries[1].id());
}

#[test]
fn save_is_idempotent_by_id() {
    let mut store = HistoryStore::load(Box::new(MemoryStore::new()));
    let first = tire_entry(70.0);
    let second = tire_entry(30.0);
    store.save(first.clone()).unwrap();
    store.save(second.clone()).unwrap();

    let before: Vec<_> = store.entries().iter().map(HistoryEntry::id).collect();
    store.save(first.clone()).unwrap();
    let after: Vec<_> = store.entries().iter().map(HistoryEntry::id).collect();
    assert_eq!(before, after, "duplicate id leaves content and order unchanged");
    assert_eq!(store.entries().len(), 2);
}

#[test]
fn history_survives_a_reload() {
    let workspace = TempDir::new().unwrap();
    let entry = tire_entry(64.0);
    {
        let store = FileStore::at(workspace.path().to_path_buf());
        let mut history = HistoryStore::load(Box::new(store));
        history.save(entry.clone()).unwrap();
    }
    let reloaded = HistoryStore::load(Box::new(FileStore::at(workspace.path().to_path_buf())));
    assert_eq!(reloaded.entries().len(), 1);
    assert_eq!(reloaded.entries()[0].id(), entry.id());
    assert!(reloaded.find(entry.id()).is_some());
}

#[test]
fn corrupt_persisted_state_degrades_to_empty() {
    let workspace = TempDir::new().unwrap();
    let mut store = FileStore::at(workspace.path().to_path_buf());
    store.set("underthehood_history", "{not valid json").unwrap();

    let history = HistoryStore::load(Box::new(store));
    assert!(history.entries().is_empty());
}

#[test]
fn clear_is_gated_on_confirmation() {
    let workspace = TempDir::new().unwrap();
    let mut history =
        HistoryStore::load(Box::new(FileStore::at(workspace.path().to_path_buf())));
    history.save(tire_entry(55.0)).unwrap();

    history.clear(false).unwrap();
    assert_eq!(history.entries().len(), 1, "unconfirmed clear is a no-op");

    history.clear(true).unwrap();
    assert!(history.entries().is_empty());

    let reloaded = HistoryStore::load(Box::new(FileStore::at(workspace.path().to_path_buf())));
    assert!(reloaded.entries().is_empty(), "persisted state removed");
}
