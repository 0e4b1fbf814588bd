use once_cell::sync::Lazy;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct Notification {
    kind: String,
    message: String,
    dismiss_after_ms: u64,
}

#[derive(Debug, Deserialize)]
struct WeightRow {
    index: usize,
    date: String,
    weight: f64,
    trend: f64,
}

#[derive(Debug, Deserialize)]
struct WeightsResponse {
    entries: Vec<WeightRow>,
    stats: Value,
}

#[derive(Debug, Deserialize)]
struct WeightMutation {
    notification: Notification,
    entries: Vec<WeightRow>,
}

#[derive(Debug, Deserialize)]
struct Tooltip {
    date: String,
    weight: String,
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

fn unique_data_dir() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("fit_tracker_http_{}_{}", std::process::id(), nanos));
    path.to_string_lossy().to_string()
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/weights/stats")).send().await {
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
    let data_dir = unique_data_dir();
    let child = Command::new(env!("CARGO_BIN_EXE_fit_tracker"))
        .env("PORT", port.to_string())
        .env("APP_DATA_DIR", data_dir)
        .env("CHART_WIDTH", "400")
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

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
    #[cfg(unix)]
    cleanup::register(server.child.id());
    *guard = Some(Arc::clone(&server));
    server
}

async fn weights(client: &Client, base_url: &str) -> WeightsResponse {
    client
        .get(format!("{base_url}/api/weights"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

async fn add_weight(client: &Client, base_url: &str, date: &str, weight: f64) -> reqwest::Response {
    client
        .post(format!("{base_url}/api/weights"))
        .json(&json!({ "date": date, "weight": weight }))
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn http_add_weight_grows_listing() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before = weights(&client, &server.base_url).await;
    let response = add_weight(&client, &server.base_url, "2001-02-03", 81.5).await;
    assert!(response.status().is_success());
    let mutation: WeightMutation = response.json().await.unwrap();
    assert_eq!(mutation.notification.kind, "success");
    assert_eq!(mutation.notification.dismiss_after_ms, 3000);

    let after = weights(&client, &server.base_url).await;
    assert_eq!(after.entries.len(), before.entries.len() + 1);
    assert_eq!(mutation.entries.len(), after.entries.len());
    assert!(after.entries.iter().any(|row| row.date == "2001-02-03" && row.weight == 81.5));
    assert_eq!(after.stats["state"], "summary");
}

#[tokio::test]
async fn http_duplicate_date_is_rejected() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let first = add_weight(&client, &server.base_url, "2002-05-06", 70.0).await;
    assert!(first.status().is_success());
    let count = weights(&client, &server.base_url).await.entries.len();

    let second = add_weight(&client, &server.base_url, "2002-05-06", 71.0).await;
    assert_eq!(second.status(), reqwest::StatusCode::BAD_REQUEST);
    let notification: Notification = second.json().await.unwrap();
    assert_eq!(notification.kind, "error");
    assert!(notification.message.contains("already exists"));

    assert_eq!(weights(&client, &server.base_url).await.entries.len(), count);
}

#[tokio::test]
async fn http_missing_weight_is_rejected() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/weights", server.base_url))
        .json(&json!({ "date": "2003-01-01", "weight": "" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    let notification: Notification = response.json().await.unwrap();
    assert_eq!(notification.message, "Please fill in all fields");
}

#[tokio::test]
async fn http_malformed_requests_get_error_notifications() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let wrong_type = client
        .post(format!("{}/api/weights", server.base_url))
        .json(&json!({ "date": "2004-01-01", "weight": true }))
        .send()
        .await
        .unwrap();
    assert!(wrong_type.status().is_client_error());
    let notification: Notification = wrong_type.json().await.unwrap();
    assert_eq!(notification.kind, "error");
    assert_eq!(notification.dismiss_after_ms, 3000);

    let bad_index = client
        .delete(format!("{}/api/weights/abc", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(bad_index.status(), reqwest::StatusCode::BAD_REQUEST);
    let notification: Notification = bad_index.json().await.unwrap();
    assert_eq!(notification.kind, "error");

    let bad_id = client
        .delete(format!("{}/api/workouts/not-a-uuid", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(bad_id.status(), reqwest::StatusCode::BAD_REQUEST);
    let notification: Notification = bad_id.json().await.unwrap();
    assert_eq!(notification.kind, "error");
}

#[tokio::test]
async fn http_delete_weight_by_position() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    // Far in the future so it is always the newest entry.
    add_weight(&client, &server.base_url, "2999-12-31", 65.0).await;
    let listing = weights(&client, &server.base_url).await;
    assert_eq!(listing.entries[0].date, "2999-12-31");
    assert_eq!(listing.entries[0].index, 0);

    let response = client
        .delete(format!("{}/api/weights/0", server.base_url))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let after = weights(&client, &server.base_url).await;
    assert_eq!(after.entries.len(), listing.entries.len() - 1);
    assert!(after.entries.iter().all(|row| row.date != "2999-12-31"));

    let missing = client
        .delete(format!("{}/api/weights/9999", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), reqwest::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn http_hover_and_chart_follow_the_samples() {
    let server = spawn_server().await;
    let client = Client::new();

    for (date, weight) in [("2026-10-01", 70.0), ("2026-10-02", 72.0), ("2026-10-03", 74.0)] {
        assert!(add_weight(&client, &server.base_url, date, weight).await.status().is_success());
    }
    let listing = weights(&client, &server.base_url).await;
    assert_eq!(listing.entries[0].trend, 2.0);
    assert_eq!(listing.entries[2].trend, 0.0);
    assert_eq!(listing.stats["average"], 72.0);

    // 400px wide canvas: points at (40,260), (200,150), (360,40).
    let tooltip: Option<Tooltip> = client
        .get(format!("{}/api/weights/hover?x=205&y=152&width=400", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let tooltip = tooltip.expect("pointer is next to the middle point");
    assert_eq!(tooltip.date, "10/2/2026");
    assert_eq!(tooltip.weight, "72 kg");

    let nothing: Option<Tooltip> = client
        .get(format!("{}/api/weights/hover?x=120&y=100&width=400", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(nothing.is_none());

    let chart = client
        .get(format!("{}/api/weights/chart.svg?x=205&y=152", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(chart.headers()["content-type"], "image/svg+xml");
    let svg = chart.text().await.unwrap();
    assert!(svg.contains(r#"<circle cx="200" cy="150" r="6""#));
    assert!(svg.contains(">74.0</text>"));

    let page = client.get(&server.base_url).send().await.unwrap().text().await.unwrap();
    assert!(page.contains("Oct 3, 2026"));
}

#[tokio::test]
async fn http_food_and_workout_logs() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let food: Value = client
        .post(format!("{}/api/food", server.base_url))
        .json(&json!({ "name": "Banana", "calories": "105" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(food["notification"]["kind"], "success");
    assert!(food["total_calories"].as_u64().unwrap() >= 105);
    let id = food["entries"]
        .as_array()
        .unwrap()
        .iter()
        .find(|entry| entry["name"] == "Banana")
        .unwrap()["id"]
        .as_str()
        .unwrap()
        .to_string();
    let deleted = client
        .delete(format!("{}/api/food/{id}", server.base_url))
        .send()
        .await
        .unwrap();
    assert!(deleted.status().is_success());

    let workout = client
        .post(format!("{}/api/workouts", server.base_url))
        .json(&json!({
            "date": "2026-10-18",
            "kind": "cardio",
            "duration": 30,
            "calories": 280,
            "notes": "easy run"
        }))
        .send()
        .await
        .unwrap();
    assert!(workout.status().is_success());
    let listing: Value = client
        .get(format!("{}/api/workouts", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(listing["workouts"]
        .as_array()
        .unwrap()
        .iter()
        .any(|w| w["notes"] == "easy run" && w["kind"] == "cardio"));

    let suggestions: Value = client
        .get(format!("{}/api/workouts/suggestions/strength", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(suggestions[0]["name"], "Push-ups");

    let unknown = client
        .get(format!("{}/api/workouts/suggestions/zumba", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(unknown.status(), reqwest::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn http_goals_faq_and_dashboard() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let plan: Value = client
        .post(format!("{}/api/goals", server.base_url))
        .json(&json!({
            "current_weight": 90,
            "target_weight": 80,
            "timeframe": 20,
            "activity_level": "sedentary"
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(plan["weekly_target"], 0.5);
    assert_eq!(plan["daily_calories"], 1500);

    let faq: Value = client
        .get(format!("{}/api/faq?q=hiit&open=3", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let items = faq.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["open"], true);

    let dashboard: Value = client
        .get(format!("{}/api/dashboard", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(dashboard["last_7_days"].as_array().unwrap().len(), 7);
    assert_eq!(dashboard["weekly_totals"].as_array().unwrap().len(), 4);
}
