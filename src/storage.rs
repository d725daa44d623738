use crate::models::StoreData;
use std::{env, path::Path, path::PathBuf};
use tokio::fs;
use tracing::{error, warn};

pub fn resolve_data_path() -> Result<PathBuf, std::io::Error> {
    if let Ok(path) = env::var("HABITS_DATA_PATH") {
        return Ok(PathBuf::from(path));
    }

    Ok(PathBuf::from("data/storage.json"))
}

/// A missing or unreadable data file is never an error: the tracker
/// starts over with an empty store and the cause goes to the log.
pub async fn load_store(path: &Path) -> StoreData {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(store) => store,
            Err(err) => {
                error!("failed to parse store file: {err}");
                StoreData::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => StoreData::default(),
        Err(err) => {
            error!("failed to read store file: {err}");
            StoreData::default()
        }
    }
}

/// Write failures (full disk, missing directory, storage disabled) are
/// warned and swallowed; the in-memory store keeps the mutation and the
/// next successful persist picks it up.
pub async fn persist_store(path: &Path, store: &StoreData) {
    let payload = match serde_json::to_vec_pretty(store) {
        Ok(payload) => payload,
        Err(err) => {
            warn!("failed to encode store: {err}");
            return;
        }
    };
    if let Err(err) = fs::write(path, payload).await {
        warn!("failed to write store file: {err}");
    }
}
