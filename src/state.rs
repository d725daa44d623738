use crate::models::StoreData;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub store: Arc<Mutex<StoreData>>,
}

impl AppState {
    pub fn new(data_path: PathBuf, store: StoreData) -> Self {
        Self {
            data_path,
            store: Arc::new(Mutex::new(store)),
        }
    }
}
