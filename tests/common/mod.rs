#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use qr_admin_api::{app, config::AppConfig, state::AppState};

pub const TEST_EMAIL: &str = "admin@example.com";
pub const TEST_PASSWORD: &str = "correct-password";
pub const VALID_TOKEN: &str = "test-access-token";
pub const REFRESH_TOKEN: &str = "test-refresh-token";

/// In-memory stand-in for the hosted store, with call counters so tests can
/// assert which requests actually left the API under test.
#[derive(Default)]
pub struct StubStore {
    pub icon_types: Mutex<Vec<Value>>,
    pub qr_codes: Mutex<Vec<Value>>,
    pub objects: Mutex<HashSet<String>>,
    /// Number of token-validation calls received by the auth provider.
    pub get_user_hits: AtomicUsize,
    /// When set, any storage upload is answered as a duplicate object.
    pub fail_uploads_as_duplicate: AtomicBool,
}

impl StubStore {
    pub fn seed_icon(&self, code: &str, name: &str, sort_order: i64, is_active: bool) {
        self.icon_types.lock().unwrap().push(json!({
            "id": uuid(),
            "code": code,
            "name": name,
            "svg_data": "<svg/>",
            "background_color": null,
            "sort_order": sort_order,
            "is_active": is_active,
        }));
    }

    pub fn seed_qr(&self, name: &str, icon_type: &str, sort_order: i64, is_active: bool) -> String {
        let id = uuid();
        self.qr_codes.lock().unwrap().push(json!({
            "id": id,
            "name": name,
            "filename": format!("{}.png", name),
            "image_url": format!("https://cdn.example/{}.png", name),
            "display_url": "https://pay.example",
            "icon_type": icon_type,
            "sort_order": sort_order,
            "is_active": is_active,
            "display_type": "name",
        }));
        id
    }

    pub fn icon_rows(&self) -> Vec<Value> {
        self.icon_types.lock().unwrap().clone()
    }

    pub fn qr_rows(&self) -> Vec<Value> {
        self.qr_codes.lock().unwrap().clone()
    }
}

fn uuid() -> String {
    // uuid-shaped but derived from a counter; good enough for row identity
    static NEXT: AtomicUsize = AtomicUsize::new(1);
    let n = NEXT.fetch_add(1, Ordering::Relaxed);
    format!("00000000-0000-4000-8000-{:012x}", n)
}

pub struct TestApp {
    pub base_url: String,
    pub store: Arc<StubStore>,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Serve a fresh app instance against a fresh stub store, both on free
/// ports, and wait for readiness.
pub async fn spawn_app() -> Result<TestApp> {
    let store = Arc::new(StubStore::default());

    let stub_port = portpicker::pick_unused_port().context("failed to pick stub port")?;
    let stub_listener = tokio::net::TcpListener::bind(("127.0.0.1", stub_port)).await?;
    let stub = stub_router(store.clone());
    tokio::spawn(async move {
        axum::serve(stub_listener, stub).await.expect("stub server");
    });

    let app_port = portpicker::pick_unused_port().context("failed to pick app port")?;
    let config = AppConfig {
        supabase_url: format!("http://127.0.0.1:{}", stub_port),
        supabase_anon_key: "test-anon-key".to_string(),
        storage_bucket: "qr-images".to_string(),
        port: app_port,
    };
    let app_listener = tokio::net::TcpListener::bind(("127.0.0.1", app_port)).await?;
    let router = app(AppState::new(config));
    tokio::spawn(async move {
        axum::serve(app_listener, router).await.expect("app server");
    });

    let test_app = TestApp {
        base_url: format!("http://127.0.0.1:{}", app_port),
        store,
    };
    wait_ready(&test_app.base_url, Duration::from_secs(10)).await?;
    Ok(test_app)
}

async fn wait_ready(base_url: &str, timeout: Duration) -> Result<()> {
    let client = reqwest::Client::new();
    let deadline = Instant::now() + timeout;
    loop {
        if Instant::now() > deadline {
            anyhow::bail!("server did not become ready on {}", base_url);
        }
        if let Ok(resp) = client.get(format!("{}/health", base_url)).send().await {
            if resp.status() == reqwest::StatusCode::OK {
                return Ok(());
            }
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}

// ---------------------------------------------------------------------------
// Stub Supabase surface: GoTrue auth, PostgREST data API, Storage
// ---------------------------------------------------------------------------

fn stub_router(store: Arc<StubStore>) -> Router {
    Router::new()
        .route("/auth/v1/token", post(auth_token))
        .route("/auth/v1/user", get(auth_user))
        .route(
            "/rest/v1/:table",
            get(rest_get).post(rest_post).patch(rest_patch).delete(rest_delete),
        )
        .route("/storage/v1/object/:bucket/:name", post(storage_upload))
        .with_state(store)
}

async fn auth_token(
    Query(params): Query<Vec<(String, String)>>,
    Json(body): Json<Value>,
) -> Response {
    let grant = params
        .iter()
        .find(|(k, _)| k == "grant_type")
        .map(|(_, v)| v.as_str());
    let email = body.get("email").and_then(|v| v.as_str());
    let password = body.get("password").and_then(|v| v.as_str());

    if grant == Some("password") && email == Some(TEST_EMAIL) && password == Some(TEST_PASSWORD) {
        return Json(json!({
            "access_token": VALID_TOKEN,
            "token_type": "bearer",
            "expires_in": 3600,
            "expires_at": 1893456000i64,
            "refresh_token": REFRESH_TOKEN,
            "user": { "id": "user-1", "email": TEST_EMAIL },
        }))
        .into_response();
    }

    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "error": "invalid_grant",
            "error_description": "Invalid login credentials"
        })),
    )
        .into_response()
}

async fn auth_user(State(store): State<Arc<StubStore>>, headers: HeaderMap) -> Response {
    store.get_user_hits.fetch_add(1, Ordering::SeqCst);

    let bearer = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));
    if bearer == Some(VALID_TOKEN) {
        Json(json!({ "id": "user-1", "email": TEST_EMAIL })).into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "msg": "invalid JWT" })),
        )
            .into_response()
    }
}

struct RestQuery {
    filters: Vec<(String, String)>,
    limit: Option<usize>,
}

fn parse_rest_query(params: Vec<(String, String)>) -> RestQuery {
    let mut filters = Vec::new();
    let mut limit = None;
    for (key, value) in params {
        match key.as_str() {
            "select" | "order" => {}
            "limit" => limit = value.parse().ok(),
            _ => {
                if let Some(rest) = value.strip_prefix("eq.") {
                    filters.push((key, rest.to_string()));
                }
            }
        }
    }
    RestQuery { filters, limit }
}

fn row_matches(row: &Value, filters: &[(String, String)]) -> bool {
    filters.iter().all(|(column, expected)| match row.get(column) {
        Some(Value::String(s)) => s == expected,
        Some(Value::Bool(b)) => b.to_string() == *expected,
        Some(Value::Number(n)) => n.to_string() == *expected,
        _ => false,
    })
}

fn table_rows<'a>(store: &'a StubStore, table: &str) -> Option<&'a Mutex<Vec<Value>>> {
    match table {
        "icon_types" => Some(&store.icon_types),
        "qr_codes" => Some(&store.qr_codes),
        _ => None,
    }
}

async fn rest_get(
    State(store): State<Arc<StubStore>>,
    Path(table): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    let Some(rows) = table_rows(&store, &table) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let query = parse_rest_query(params);

    let mut matched: Vec<Value> = rows
        .lock()
        .unwrap()
        .iter()
        .filter(|row| row_matches(row, &query.filters))
        .cloned()
        .collect();
    matched.sort_by_key(|row| row.get("sort_order").and_then(|v| v.as_i64()).unwrap_or(0));
    if let Some(limit) = query.limit {
        matched.truncate(limit);
    }
    Json(matched).into_response()
}

async fn rest_post(
    State(store): State<Arc<StubStore>>,
    Path(table): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let Some(rows) = table_rows(&store, &table) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let mut row = body;
    let mut guard = rows.lock().unwrap();

    if table == "icon_types" {
        let code = row.get("code").and_then(|v| v.as_str()).unwrap_or("");
        if guard
            .iter()
            .any(|existing| existing.get("code").and_then(|v| v.as_str()) == Some(code))
        {
            return (
                StatusCode::CONFLICT,
                Json(json!({
                    "code": "23505",
                    "message": "duplicate key value violates unique constraint"
                })),
            )
                .into_response();
        }
    }

    row["id"] = json!(uuid());
    guard.push(row.clone());
    (StatusCode::CREATED, Json(json!([row]))).into_response()
}

async fn rest_patch(
    State(store): State<Arc<StubStore>>,
    Path(table): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
    Json(patch): Json<Value>,
) -> Response {
    let Some(rows) = table_rows(&store, &table) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let query = parse_rest_query(params);
    let patch = patch.as_object().cloned().unwrap_or_default();

    let mut updated = Vec::new();
    for row in rows.lock().unwrap().iter_mut() {
        if row_matches(row, &query.filters) {
            for (key, value) in &patch {
                row[key] = value.clone();
            }
            updated.push(row.clone());
        }
    }
    Json(updated).into_response()
}

async fn rest_delete(
    State(store): State<Arc<StubStore>>,
    Path(table): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    let Some(rows) = table_rows(&store, &table) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let query = parse_rest_query(params);
    rows.lock()
        .unwrap()
        .retain(|row| !row_matches(row, &query.filters));
    StatusCode::NO_CONTENT.into_response()
}

async fn storage_upload(
    State(store): State<Arc<StubStore>>,
    Path((bucket, name)): Path<(String, String)>,
) -> Response {
    let key = format!("{}/{}", bucket, name);
    let duplicate = store.fail_uploads_as_duplicate.load(Ordering::SeqCst)
        || !store.objects.lock().unwrap().insert(key.clone());
    if duplicate {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "The resource already exists" })),
        )
            .into_response();
    }
    Json(json!({ "Key": key })).into_response()
}
