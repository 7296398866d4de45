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
struct SessionResponse {
    email: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct SessionInfo {
    email: String,
}

#[derive(Debug, Deserialize)]
struct EntryResponse {
    id: u64,
    created_at: String,
    situation: String,
    automatic_thought: String,
    emotion: String,
    emotion_intensity: u8,
    cognitive_distortion: Option<String>,
    rational_response: String,
    outcome: String,
}

#[derive(Debug, Deserialize)]
struct SeriesPoint {
    date: String,
    intensity: u8,
}

#[derive(Debug, Deserialize)]
struct WorksheetResponse {
    id: u64,
    kind: String,
    data: serde_json::Value,
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
        "mood_tracker_http_{}_{}.json",
        std::process::id(),
        nanos
    ));
    path.to_string_lossy().to_string()
}

fn unique_email(tag: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{tag}+{nanos}@example.com")
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/login")).send().await {
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
    let child = Command::new(env!("CARGO_BIN_EXE_mood_tracker"))
        .env("PORT", port.to_string())
        .env("APP_DATA_PATH", data_path)
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

async fn create_account(client: &Client, base_url: &str, tag: &str) -> SessionResponse {
    let email = unique_email(tag);
    client
        .post(format!("{base_url}/api/auth/signup"))
        .json(&serde_json::json!({ "email": email, "password": "hunter2" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

fn entry_payload() -> serde_json::Value {
    serde_json::json!({
        "situation": "Meeting",
        "automatic_thought": "I'll fail",
        "emotion": "Anxiety",
        "emotion_intensity": 8,
        "cognitive_distortion": "Magnification or Minimization",
        "rational_response": "I've prepared well",
        "outcome": ""
    })
}

async fn list_entries(client: &Client, base_url: &str, token: &str) -> Vec<EntryResponse> {
    client
        .get(format!("{base_url}/api/entries"))
        .bearer_auth(token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

#[tokio::test]
async fn http_signup_opens_a_session() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let session = create_account(&client, &server.base_url, "signup").await;
    assert!(!session.token.is_empty());
    assert!(session.email.ends_with("@example.com"));

    let info: SessionInfo = client
        .get(format!("{}/api/session", server.base_url))
        .bearer_auth(&session.token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(info.email, session.email);
}

#[tokio::test]
async fn http_login_rejects_bad_credentials() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let session = create_account(&client, &server.base_url, "login").await;

    let wrong = client
        .post(format!("{}/api/auth/login", server.base_url))
        .json(&serde_json::json!({ "email": session.email, "password": "nope" }))
        .send()
        .await
        .unwrap();
    assert_eq!(wrong.status(), 401);

    let right = client
        .post(format!("{}/api/auth/login", server.base_url))
        .json(&serde_json::json!({ "email": session.email, "password": "hunter2" }))
        .send()
        .await
        .unwrap();
    assert!(right.status().is_success());
}

#[tokio::test]
async fn http_api_requires_a_session() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    for path in ["/api/session", "/api/entries", "/api/entries/series", "/api/worksheets"] {
        let response = client
            .get(format!("{}{path}", server.base_url))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 401, "{path} should be guarded");
    }
}

#[tokio::test]
async fn http_insert_lists_and_charts_the_entry() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let session = create_account(&client, &server.base_url, "insert").await;

    let created = client
        .post(format!("{}/api/entries", server.base_url))
        .bearer_auth(&session.token)
        .json(&entry_payload())
        .send()
        .await
        .unwrap();
    assert_eq!(created.status(), 201);

    let entries = list_entries(&client, &server.base_url, &session.token).await;
    assert_eq!(entries.len(), 1);
    let entry = &entries[0];
    assert_eq!(entry.situation, "Meeting");
    assert_eq!(entry.automatic_thought, "I'll fail");
    assert_eq!(entry.emotion, "Anxiety");
    assert_eq!(entry.emotion_intensity, 8);
    assert_eq!(
        entry.cognitive_distortion.as_deref(),
        Some("Magnification or Minimization")
    );
    assert_eq!(entry.rational_response, "I've prepared well");
    assert_eq!(entry.outcome, "");

    let series: Vec<SeriesPoint> = client
        .get(format!("{}/api/entries/series", server.base_url))
        .bearer_auth(&session.token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(series.len(), 1);
    assert_eq!(series[0].intensity, 8);
    assert_eq!(series[0].date, entry.created_at[..10]);
}

#[tokio::test]
async fn http_patch_updates_only_sent_fields() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let session = create_account(&client, &server.base_url, "patch").await;

    let created: EntryResponse = client
        .post(format!("{}/api/entries", server.base_url))
        .bearer_auth(&session.token)
        .json(&entry_payload())
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let merged: EntryResponse = client
        .patch(format!("{}/api/entries/{}", server.base_url, created.id))
        .bearer_auth(&session.token)
        .json(&serde_json::json!({ "emotion_intensity": 3 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(merged.id, created.id);
    assert_eq!(merged.emotion_intensity, 3);
    assert_eq!(merged.situation, created.situation);
    assert_eq!(merged.automatic_thought, created.automatic_thought);
    assert_eq!(merged.emotion, created.emotion);
    assert_eq!(merged.cognitive_distortion, created.cognitive_distortion);
    assert_eq!(merged.rational_response, created.rational_response);
    assert_eq!(merged.outcome, created.outcome);
    assert_eq!(merged.created_at, created.created_at);

    // a no-op patch returns the record unchanged
    let unchanged: EntryResponse = client
        .patch(format!("{}/api/entries/{}", server.base_url, created.id))
        .bearer_auth(&session.token)
        .json(&serde_json::json!({}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(unchanged.emotion_intensity, 3);
    assert_eq!(unchanged.situation, created.situation);

    let entries = list_entries(&client, &server.base_url, &session.token).await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].emotion_intensity, 3);
}

#[tokio::test]
async fn http_delete_removes_exactly_one_entry() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let session = create_account(&client, &server.base_url, "delete").await;

    let first: EntryResponse = client
        .post(format!("{}/api/entries", server.base_url))
        .bearer_auth(&session.token)
        .json(&entry_payload())
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let second: EntryResponse = client
        .post(format!("{}/api/entries", server.base_url))
        .bearer_auth(&session.token)
        .json(&entry_payload())
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let deleted = client
        .delete(format!("{}/api/entries/{}", server.base_url, first.id))
        .bearer_auth(&session.token)
        .send()
        .await
        .unwrap();
    assert_eq!(deleted.status(), 204);

    let entries = list_entries(&client, &server.base_url, &session.token).await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].id, second.id);

    let again = client
        .delete(format!("{}/api/entries/{}", server.base_url, first.id))
        .bearer_auth(&session.token)
        .send()
        .await
        .unwrap();
    assert_eq!(again.status(), 404);
}

#[tokio::test]
async fn http_rejected_insert_stores_nothing() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let session = create_account(&client, &server.base_url, "invalid").await;

    let mut blank = entry_payload();
    blank["situation"] = serde_json::json!("   ");
    let response = client
        .post(format!("{}/api/entries", server.base_url))
        .bearer_auth(&session.token)
        .json(&blank)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let mut out_of_range = entry_payload();
    out_of_range["emotion_intensity"] = serde_json::json!(11);
    let response = client
        .post(format!("{}/api/entries", server.base_url))
        .bearer_auth(&session.token)
        .json(&out_of_range)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let mut unknown_label = entry_payload();
    unknown_label["cognitive_distortion"] = serde_json::json!("Catastrophizing");
    let response = client
        .post(format!("{}/api/entries", server.base_url))
        .bearer_auth(&session.token)
        .json(&unknown_label)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 422);

    assert!(list_entries(&client, &server.base_url, &session.token)
        .await
        .is_empty());
}

#[tokio::test]
async fn http_entries_are_scoped_per_user() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let owner = create_account(&client, &server.base_url, "owner").await;
    let other = create_account(&client, &server.base_url, "other").await;

    let created: EntryResponse = client
        .post(format!("{}/api/entries", server.base_url))
        .bearer_auth(&owner.token)
        .json(&entry_payload())
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert!(list_entries(&client, &server.base_url, &other.token)
        .await
        .is_empty());

    let foreign_patch = client
        .patch(format!("{}/api/entries/{}", server.base_url, created.id))
        .bearer_auth(&other.token)
        .json(&serde_json::json!({ "emotion_intensity": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(foreign_patch.status(), 404);

    let foreign_delete = client
        .delete(format!("{}/api/entries/{}", server.base_url, created.id))
        .bearer_auth(&other.token)
        .send()
        .await
        .unwrap();
    assert_eq!(foreign_delete.status(), 404);

    let entries = list_entries(&client, &server.base_url, &owner.token).await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].emotion_intensity, 8);
}

#[tokio::test]
async fn http_worksheets_round_trip() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let session = create_account(&client, &server.base_url, "worksheets").await;

    let thought_record = serde_json::json!({
        "kind": "thought-record",
        "data": {
            "situation": "Presentation",
            "automaticThought": "Everyone will notice my mistakes",
            "emotion": "Anxious",
            "emotionIntensity": 7,
            "evidenceFor": "I stumbled once before",
            "evidenceAgainst": "Most talks went fine",
            "cognitiveDistortion": "Overgeneralization",
            "balancedThought": "One rough talk doesn't define me",
            "newEmotionIntensity": 4
        }
    });
    let created = client
        .post(format!("{}/api/worksheets", server.base_url))
        .bearer_auth(&session.token)
        .json(&thought_record)
        .send()
        .await
        .unwrap();
    assert_eq!(created.status(), 201);

    let progress = serde_json::json!({
        "kind": "weekly-progress",
        "data": {
            "weeklyGoals": ["sleep", "walk", "journal"],
            "achievements": "kept the streak",
            "challenges": "late nights",
            "nextSteps": "earlier alarm"
        }
    });
    let created = client
        .post(format!("{}/api/worksheets", server.base_url))
        .bearer_auth(&session.token)
        .json(&progress)
        .send()
        .await
        .unwrap();
    assert_eq!(created.status(), 201);

    let listed: Vec<WorksheetResponse> = client
        .get(format!("{}/api/worksheets", server.base_url))
        .bearer_auth(&session.token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].kind, "thought-record");
    assert_eq!(listed[1].kind, "weekly-progress");
    assert!(listed[0].id < listed[1].id);
    assert_eq!(listed[0].data["emotionIntensity"], 7);

    let two_goals = serde_json::json!({
        "kind": "weekly-progress",
        "data": {
            "weeklyGoals": ["sleep", "walk"],
            "achievements": "",
            "challenges": "",
            "nextSteps": ""
        }
    });
    let rejected = client
        .post(format!("{}/api/worksheets", server.base_url))
        .bearer_auth(&session.token)
        .json(&two_goals)
        .send()
        .await
        .unwrap();
    assert_eq!(rejected.status(), 400);

    let unknown_domain = serde_json::json!({
        "kind": "activity-log",
        "data": {
            "date": "2026-01-05",
            "activities": [
                {"domain": "Gardening", "hours": "1 hour", "moodBefore": 4, "moodAfter": 6}
            ]
        }
    });
    let rejected = client
        .post(format!("{}/api/worksheets", server.base_url))
        .bearer_auth(&session.token)
        .json(&unknown_domain)
        .send()
        .await
        .unwrap();
    assert_eq!(rejected.status(), 422);
}

#[tokio::test]
async fn http_logout_invalidates_the_token() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let session = create_account(&client, &server.base_url, "logout").await;

    let logout = client
        .post(format!("{}/api/auth/logout", server.base_url))
        .bearer_auth(&session.token)
        .send()
        .await
        .unwrap();
    assert_eq!(logout.status(), 204);

    let after = client
        .get(format!("{}/api/session", server.base_url))
        .bearer_auth(&session.token)
        .send()
        .await
        .unwrap();
    assert_eq!(after.status(), 401);
}
