use once_cell::sync::Lazy;
use reqwest::Client;
use serde::Deserialize;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct Entry {
    hab1: String,
    #[allow(dead_code)]
    hab2: String,
    #[allow(dead_code)]
    hab3: String,
    #[allow(dead_code)]
    hab4: String,
    date: String,
}

#[derive(Debug, Deserialize)]
struct Today {
    hab1: String,
    done2: bool,
    fun_mode: bool,
}

#[derive(Debug, Deserialize)]
struct ImportResult {
    imported: usize,
    total_entries: usize,
}

#[derive(Debug, Deserialize)]
struct Ping {
    ok: bool,
    time: String,
}

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn unique_data_path() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!(
        "habit_tracker_http_{}_{}.json",
        std::process::id(),
        nanos
    ));
    path.to_string_lossy().to_string()
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/ping")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server() -> TestServer {
    let port = pick_free_port();
    let data_path = unique_data_path();
    let child = Command::new(env!("CARGO_BIN_EXE_habit_tracker"))
        .env("PORT", port.to_string())
        .env("HABITS_DATA_PATH", data_path)
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    *guard = Some(Arc::clone(&server));
    server
}

async fn fetch_history(client: &Client, base_url: &str) -> Vec<Entry> {
    client
        .get(format!("{base_url}/api/history"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

#[tokio::test]
async fn http_ping_reports_liveness() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let ping: Ping = client
        .get(format!("{}/api/ping", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert!(ping.ok);
    assert!(!ping.time.is_empty());
}

#[tokio::test]
async fn http_save_appends_entry_and_updates_today() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before = fetch_history(&client, &server.base_url).await.len();

    let response = client
        .post(format!("{}/api/save", server.base_url))
        .json(&serde_json::json!({
            "hab1": "  morning run  ",
            "hab2": "reading",
            "hab3": "water",
            "hab4": "sleep early"
        }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let history = fetch_history(&client, &server.base_url).await;
    assert_eq!(history.len(), before + 1);
    let last = history.last().unwrap();
    assert_eq!(last.hab1, "morning run");
    assert!(!last.date.is_empty());

    let today: Today = client
        .get(format!("{}/api/today", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(today.hab1, "morning run");
}

#[tokio::test]
async fn http_check_flags_slot_and_rejects_bad_slot() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let rejected = client
        .post(format!("{}/api/check", server.base_url))
        .json(&serde_json::json!({ "slot": 5 }))
        .send()
        .await
        .unwrap();
    assert_eq!(rejected.status(), reqwest::StatusCode::BAD_REQUEST);

    let today: Today = client
        .post(format!("{}/api/check", server.base_url))
        .json(&serde_json::json!({ "slot": 2 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(today.done2);
}

#[tokio::test]
async fn http_import_merges_after_existing_entries() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before = fetch_history(&client, &server.base_url).await.len();

    let result: ImportResult = client
        .post(format!("{}/api/import", server.base_url))
        .json(&serde_json::json!([
            { "hab1": "imported a", "hab2": "", "hab3": "", "hab4": "", "date": "2026-08-01 10:00:00" },
            { "hab1": "imported b", "hab2": "", "hab3": "", "hab4": "", "date": "2026-08-02 10:00:00" },
            { "hab1": "imported c", "hab2": "", "hab3": "", "hab4": "", "date": "2026-08-03 10:00:00" }
        ]))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(result.imported, 3);
    assert_eq!(result.total_entries, before + 3);

    let history = fetch_history(&client, &server.base_url).await;
    assert_eq!(history.len(), before + 3);
    let tail: Vec<&str> = history[before..].iter().map(|e| e.hab1.as_str()).collect();
    assert_eq!(tail, ["imported a", "imported b", "imported c"]);
}

#[tokio::test]
async fn http_import_rejects_non_array_and_keeps_history() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before = fetch_history(&client, &server.base_url).await.len();

    let response = client
        .post(format!("{}/api/import", server.base_url))
        .json(&serde_json::json!({ "hab1": "not an array" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);

    let after = fetch_history(&client, &server.base_url).await.len();
    assert_eq!(after, before);
}

#[tokio::test]
async fn http_clear_then_undo_restores_single_level() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let saved = client
        .post(format!("{}/api/save", server.base_url))
        .json(&serde_json::json!({
            "hab1": "undo target", "hab2": "", "hab3": "", "hab4": ""
        }))
        .send()
        .await
        .unwrap();
    assert!(saved.status().is_success());
    let expected = fetch_history(&client, &server.base_url).await.len();

    let cleared = client
        .post(format!("{}/api/clear", server.base_url))
        .send()
        .await
        .unwrap();
    assert!(cleared.status().is_success());
    assert!(fetch_history(&client, &server.base_url).await.is_empty());

    let restored: Vec<Entry> = client
        .post(format!("{}/api/undo", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(restored.len(), expected);
    assert_eq!(restored.last().unwrap().hab1, "undo target");

    // the backup is single level, a second undo has nothing to offer
    let second = client
        .post(format!("{}/api/undo", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(second.status(), reqwest::StatusCode::BAD_REQUEST);
    let after = fetch_history(&client, &server.base_url).await;
    assert_eq!(after.len(), expected);
}

#[tokio::test]
async fn http_export_serves_stored_history_json() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .get(format!("{}/api/export", server.base_url))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let disposition = response
        .headers()
        .get("content-disposition")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(disposition.contains("attachment"));

    let body = response.text().await.unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert!(parsed.is_array());
}

#[tokio::test]
async fn http_fun_mode_toggles_and_shows_in_today() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let today: Today = client
        .get(format!("{}/api/today", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let before = today.fun_mode;

    let toggled = client
        .post(format!("{}/api/fun", server.base_url))
        .send()
        .await
        .unwrap();
    assert!(toggled.status().is_success());

    let today: Today = client
        .get(format!("{}/api/today", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(today.fun_mode, !before);
}
