use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct ActivityResponse {
    id: i64,
    #[serde(rename = "type")]
    kind: String,
    duration: u32,
    calories: u32,
}

struct TestServer {
    base_url: String,
    child: Child,
    _data_dir: tempfile::TempDir,
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

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/settings")).send().await {
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
    let data_dir = tempfile::tempdir().expect("create data dir");
    // The server creates the directory itself on startup.
    let store_dir = data_dir.path().join("fitness").join("data");
    let child = Command::new(env!("CARGO_BIN_EXE_fitness_tracker"))
        .env("PORT", port.to_string())
        .env("FITNESS_DATA_DIR", &store_dir)
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer {
        base_url,
        child,
        _data_dir: data_dir,
    }
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

async fn list_activities(client: &Client, base_url: &str) -> Vec<ActivityResponse> {
    client
        .get(format!("{base_url}/api/activities"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

#[tokio::test]
async fn http_activity_create_then_delete() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before = list_activities(&client, &server.base_url).await;

    let response = client
        .post(format!("{}/api/activities", server.base_url))
        .json(&json!({ "type": "Cycling", "duration": 45, "calories": 410 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: ActivityResponse = response.json().await.unwrap();
    assert_eq!(created.kind, "Cycling");
    assert_eq!(created.duration, 45);

    let after = list_activities(&client, &server.base_url).await;
    assert_eq!(after.len(), before.len() + 1);
    assert_eq!(after[0].id, created.id);
    assert_eq!(after[0].calories, 410);

    let response = client
        .delete(format!("{}/api/activities/{}", server.base_url, created.id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let remaining = list_activities(&client, &server.base_url).await;
    assert_eq!(remaining.len(), before.len());
    assert!(remaining.iter().all(|activity| activity.id != created.id));
}

#[tokio::test]
async fn http_missing_fields_are_rejected() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before = list_activities(&client, &server.base_url).await;
    let response = client
        .post(format!("{}/api/activities", server.base_url))
        .json(&json!({ "type": "Running", "duration": 20 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let message = response.text().await.unwrap();
    assert!(message.contains("required"));

    let after = list_activities(&client, &server.base_url).await;
    assert_eq!(after.len(), before.len());
}

#[tokio::test]
async fn http_blank_inputs_count_as_missing() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before = list_activities(&client, &server.base_url).await;
    for (path, body) in [
        ("activities", json!({ "type": "", "duration": 30, "calories": 100 })),
        ("activities", json!({ "type": "Yoga", "duration": 30, "calories": "" })),
        ("meals", json!({ "type": "", "calories": 500 })),
        ("heart-rate", json!({ "bpm": "", "type": "resting" })),
    ] {
        let response = client
            .post(format!("{}/api/{path}", server.base_url))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{path} {body}");
        let message = response.text().await.unwrap();
        assert!(message.contains("required"), "{message}");
    }

    let after = list_activities(&client, &server.base_url).await;
    assert_eq!(after.len(), before.len());
}

#[tokio::test]
async fn http_started_workout_carries_catalog_details() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/workouts/2/start", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let completed: Value = response.json().await.unwrap();
    assert_eq!(completed["workoutId"], 2);
    assert!(!completed["exercises"].as_array().unwrap().is_empty());
    assert!(completed["description"].as_str().is_some());
    assert!(completed["video"].as_str().is_some());
    assert!(completed["completedDate"].as_str().is_some());
}

#[tokio::test]
async fn http_profile_drives_bmi_and_calorie_target() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let summary: Value = client
        .put(format!("{}/api/profile", server.base_url))
        .json(&json!({ "name": "Alex", "height": 180, "weight": 75, "goal": "Weight Loss" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(summary["bmi"]["value"], 23.1);
    assert_eq!(summary["bmi"]["category"], "Normal weight");
    assert_eq!(summary["suggestedCalories"], 1440);

    let nutrition: Value = client
        .get(format!("{}/api/stats/nutrition", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(nutrition["suggestedCalories"], 1440);
    assert_eq!(nutrition["last7Days"].as_array().unwrap().len(), 7);
}

#[tokio::test]
async fn http_schedule_and_end_time() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let end: Value = client
        .get(format!("{}/api/end-time?start=09:00&duration=45", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(end["endTime"], "09:45");

    let scheduled: Value = client
        .post(format!("{}/api/schedule", server.base_url))
        .json(&json!({ "workoutId": 3, "date": "2026-06-01", "startTime": "18:30" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(scheduled["name"], "Full Body Burn");
    let id = scheduled["id"].as_i64().unwrap();

    let response = client
        .put(format!("{}/api/schedule/{id}", server.base_url))
        .json(&json!({ "workoutId": 6, "date": "2026-06-02", "startTime": "07:00" }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let updated: Value = response.json().await.unwrap();
    assert_eq!(updated["id"].as_i64(), Some(id));
    assert_eq!(updated["name"], "Fat Burning HIIT");

    let response = client
        .post(format!("{}/api/schedule", server.base_url))
        .json(&json!({ "workoutId": 42, "date": "2026-06-01" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn http_export_has_six_sections() {
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
        .get(reqwest::header::CONTENT_DISPOSITION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(disposition.contains("fitness-tracker-data-"));

    let bundle: Value = response.json().await.unwrap();
    let object = bundle.as_object().unwrap();
    assert_eq!(object.len(), 6);
    for key in [
        "activities",
        "meals",
        "heartRateData",
        "profile",
        "scheduledWorkouts",
        "settings",
    ] {
        assert!(object.contains_key(key), "missing {key}");
    }
}
