use crate::models::{HabitEntry, StoreData};
use chrono::{DateTime, Local};
use serde_json::Value;
use tracing::warn;

pub const HISTORY_KEY: &str = "history";
pub const BACKUP_KEY: &str = "history_backup";
pub const FUN_MODE_KEY: &str = "fun_mode";
pub const HABIT_KEYS: [&str; 4] = ["hab1", "hab2", "hab3", "hab4"];
pub const DONE_KEYS: [&str; 4] = ["done1", "done2", "done3", "done4"];

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn timestamp(now: DateTime<Local>) -> String {
    now.format(TIMESTAMP_FORMAT).to_string()
}

/// Decode the stored history value. Absent means empty; a value that is
/// not a JSON array means the stored data is corrupt, which is logged
/// and treated as empty rather than breaking every caller.
pub fn decode_history(raw: Option<&str>) -> Vec<HabitEntry> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(items)) => decode_entries(items),
        Ok(_) => {
            warn!("stored history is not an array, treating as empty");
            Vec::new()
        }
        Err(err) => {
            warn!("stored history does not parse, treating as empty: {err}");
            Vec::new()
        }
    }
}

/// Decode array elements one by one so a single malformed element does
/// not discard the rest of the history.
pub fn decode_entries(items: Vec<Value>) -> Vec<HabitEntry> {
    let mut entries = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<HabitEntry>(item) {
            Ok(entry) => entries.push(entry),
            Err(err) => warn!("skipping malformed history entry {index}: {err}"),
        }
    }
    entries
}

fn write_history(store: &mut StoreData, entries: &[HabitEntry]) {
    match serde_json::to_string(entries) {
        Ok(encoded) => store.set(HISTORY_KEY, encoded),
        Err(err) => warn!("failed to encode history: {err}"),
    }
}

pub fn append_entry(store: &mut StoreData, entry: HabitEntry) -> usize {
    let mut entries = decode_history(store.get(HISTORY_KEY));
    entries.push(entry);
    write_history(store, &entries);
    entries.len()
}

/// Append-at-end merge: imported entries land after the existing ones,
/// in file order. Duplicates are kept.
pub fn merge_entries(store: &mut StoreData, imported: Vec<HabitEntry>) -> usize {
    let mut entries = decode_history(store.get(HISTORY_KEY));
    entries.extend(imported);
    write_history(store, &entries);
    entries.len()
}

/// Snapshot the raw history value into the backup slot, then drop the
/// history and all completion flags. An absent history leaves any prior
/// backup in place.
pub fn clear_history(store: &mut StoreData) {
    if let Some(raw) = store.get(HISTORY_KEY) {
        let snapshot = raw.to_string();
        store.set(BACKUP_KEY, snapshot);
    }
    store.remove(HISTORY_KEY);
    for key in DONE_KEYS {
        store.remove(key);
    }
}

/// Single-level undo: the backup becomes the history again and is
/// consumed. Returns false when there is nothing to restore.
pub fn undo_clear(store: &mut StoreData) -> bool {
    let Some(backup) = store.get(BACKUP_KEY) else {
        return false;
    };
    let restored = backup.to_string();
    store.set(HISTORY_KEY, restored);
    store.remove(BACKUP_KEY);
    true
}

pub fn done_flags(store: &StoreData) -> [bool; 4] {
    DONE_KEYS.map(|key| store.get(key) == Some("true"))
}

pub fn fun_mode(store: &StoreData) -> bool {
    store.get(FUN_MODE_KEY) == Some("true")
}

pub fn toggle_fun_mode(store: &mut StoreData) -> bool {
    let enabled = !fun_mode(store);
    store.set(FUN_MODE_KEY, if enabled { "true" } else { "false" });
    enabled
}
