use crate::errors::AppError;
use crate::history;
use crate::models::{
    CheckRequest, FunModeResponse, HabitEntry, ImportResponse, PingResponse, SaveRequest,
    SaveResponse, StatsResponse, StoreData, TodayResponse,
};
use crate::state::AppState;
use crate::stats::build_stats;
use crate::storage::persist_store;
use crate::ui::{render_index, render_stats};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse},
    Json,
};
use chrono::Local;
use serde_json::Value;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let store = state.store.lock().await;
    let entries = history::decode_history(store.get(history::HISTORY_KEY));
    Html(render_index(&store, &entries))
}

pub async fn stats_page() -> Html<String> {
    Html(render_stats())
}

pub async fn get_today(State(state): State<AppState>) -> Json<TodayResponse> {
    let store = state.store.lock().await;
    Json(today_response(&store))
}

pub async fn save(
    State(state): State<AppState>,
    Json(payload): Json<SaveRequest>,
) -> Json<SaveResponse> {
    let entry = HabitEntry {
        hab1: payload.hab1.trim().to_string(),
        hab2: payload.hab2.trim().to_string(),
        hab3: payload.hab3.trim().to_string(),
        hab4: payload.hab4.trim().to_string(),
        date: history::timestamp(Local::now()),
    };

    let mut store = state.store.lock().await;
    for (key, value) in history::HABIT_KEYS.iter().zip(entry.slots()) {
        store.set(key, value);
    }
    let total_entries = history::append_entry(&mut store, entry.clone());
    persist_store(&state.data_path, &store).await;

    Json(SaveResponse {
        entry,
        total_entries,
    })
}

pub async fn check(
    State(state): State<AppState>,
    Json(payload): Json<CheckRequest>,
) -> Result<Json<TodayResponse>, AppError> {
    if !(1..=4).contains(&payload.slot) {
        return Err(AppError::bad_request("slot must be between 1 and 4"));
    }

    let mut store = state.store.lock().await;
    store.set(history::DONE_KEYS[usize::from(payload.slot - 1)], "true");
    persist_store(&state.data_path, &store).await;

    Ok(Json(today_response(&store)))
}

pub async fn get_history(State(state): State<AppState>) -> Json<Vec<HabitEntry>> {
    let store = state.store.lock().await;
    Json(history::decode_history(store.get(history::HISTORY_KEY)))
}

pub async fn get_stats(State(state): State<AppState>) -> Json<StatsResponse> {
    let store = state.store.lock().await;
    let entries = history::decode_history(store.get(history::HISTORY_KEY));
    Json(build_stats(&entries))
}

/// Merge an uploaded history file. Anything but a top-level array is
/// rejected outright, leaving the stored history untouched.
pub async fn import(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<Json<ImportResponse>, AppError> {
    let Value::Array(items) = payload else {
        return Err(AppError::bad_request("import file must be a JSON array"));
    };

    let entries = history::decode_entries(items);
    let imported = entries.len();
    let mut store = state.store.lock().await;
    let total_entries = history::merge_entries(&mut store, entries);
    persist_store(&state.data_path, &store).await;

    Ok(Json(ImportResponse {
        imported,
        total_entries,
    }))
}

pub async fn export(State(state): State<AppState>) -> impl IntoResponse {
    let store = state.store.lock().await;
    let raw = store
        .get(history::HISTORY_KEY)
        .unwrap_or("[]")
        .to_string();
    (
        [
            (header::CONTENT_TYPE, "application/json"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"habit_history.json\"",
            ),
        ],
        raw,
    )
}

pub async fn clear(State(state): State<AppState>) -> StatusCode {
    let mut store = state.store.lock().await;
    history::clear_history(&mut store);
    persist_store(&state.data_path, &store).await;
    StatusCode::NO_CONTENT
}

pub async fn undo(State(state): State<AppState>) -> Result<Json<Vec<HabitEntry>>, AppError> {
    let mut store = state.store.lock().await;
    if !history::undo_clear(&mut store) {
        return Err(AppError::bad_request("nothing to restore"));
    }
    persist_store(&state.data_path, &store).await;

    Ok(Json(history::decode_history(
        store.get(history::HISTORY_KEY),
    )))
}

pub async fn toggle_fun(State(state): State<AppState>) -> Json<FunModeResponse> {
    let mut store = state.store.lock().await;
    let fun_mode = history::toggle_fun_mode(&mut store);
    persist_store(&state.data_path, &store).await;
    Json(FunModeResponse { fun_mode })
}

pub async fn ping() -> Json<PingResponse> {
    Json(PingResponse {
        ok: true,
        time: Local::now().to_rfc3339(),
    })
}

fn today_response(store: &StoreData) -> TodayResponse {
    let slot = |key: &str| store.get(key).unwrap_or("").to_string();
    let [done1, done2, done3, done4] = history::done_flags(store);
    TodayResponse {
        hab1: slot("hab1"),
        hab2: slot("hab2"),
        hab3: slot("hab3"),
        hab4: slot("hab4"),
        done1,
        done2,
        done3,
        done4,
        fun_mode: history::fun_mode(store),
    }
}
