use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Persisted key-value store, serialized as one flat JSON object.
///
/// Everything the application remembers lives here as a string value:
/// the four habit slots, the completion flags, the JSON-encoded history
/// array, the single backup snapshot, and the fun-mode flag.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StoreData {
    #[serde(flatten)]
    values: BTreeMap<String, String>,
}

impl StoreData {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_string(), value.into());
    }

    pub fn remove(&mut self, key: &str) {
        self.values.remove(key);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }
}

/// One logged session. Field names are the external JSON shape and must
/// not change: stored history, import files and the export download all
/// use this exact layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitEntry {
    #[serde(default)]
    pub hab1: String,
    #[serde(default)]
    pub hab2: String,
    #[serde(default)]
    pub hab3: String,
    #[serde(default)]
    pub hab4: String,
    #[serde(default)]
    pub date: String,
}

impl HabitEntry {
    pub fn slots(&self) -> [&str; 4] {
        [&self.hab1, &self.hab2, &self.hab3, &self.hab4]
    }
}

#[derive(Debug, Deserialize)]
pub struct SaveRequest {
    #[serde(default)]
    pub hab1: String,
    #[serde(default)]
    pub hab2: String,
    #[serde(default)]
    pub hab3: String,
    #[serde(default)]
    pub hab4: String,
}

#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub entry: HabitEntry,
    pub total_entries: usize,
}

#[derive(Debug, Deserialize)]
pub struct CheckRequest {
    pub slot: u8,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TodayResponse {
    pub hab1: String,
    pub hab2: String,
    pub hab3: String,
    pub hab4: String,
    pub done1: bool,
    pub done2: bool,
    pub done3: bool,
    pub done4: bool,
    pub fun_mode: bool,
}

#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub imported: usize,
    pub total_entries: usize,
}

#[derive(Debug, Serialize)]
pub struct FunModeResponse {
    pub fun_mode: bool,
}

#[derive(Debug, Serialize)]
pub struct TrendPoint {
    pub date: String,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total_entries: usize,
    pub complete_sessions: usize,
    pub success_rate: u32,
    pub current_streak: u32,
    pub habit_frequency: BTreeMap<String, usize>,
    pub trend_last_7_days: Vec<TrendPoint>,
}

#[derive(Debug, Serialize)]
pub struct PingResponse {
    pub ok: bool,
    pub time: String,
}
