//! Local stand-in for the e-dream backend and its object storage.
//!
//! One axum server bound to an ephemeral port serves both the upload-session
//! endpoints and the presigned part URLs they hand out, and records every
//! call so tests can assert on the traffic.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashSet};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use bytes::Bytes;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub const API_KEY: &str = "test-key";
pub const UPLOAD_ID: &str = "upl-1";
pub const CREATED_UUID: &str = "dream-new";

#[derive(Default)]
pub struct Recorded {
    pub creates: Vec<(String, Value)>,
    pub refreshes: Vec<(String, Value)>,
    pub completes: Vec<(String, Value)>,
    pub puts: Vec<(u32, String, Bytes)>,
    pub stored: BTreeMap<u32, Bytes>,
    fail_once: HashSet<u32>,
}

#[derive(Clone)]
struct AppState {
    base_url: String,
    files: Arc<BTreeMap<String, Bytes>>,
    recorded: Arc<Mutex<Recorded>>,
}

/// Handle to a running mock server.
pub struct MockServer {
    pub base_url: String,
    recorded: Arc<Mutex<Recorded>>,
    handle: JoinHandle<()>,
}

impl MockServer {
    /// Start a server that serves `files` under `/files/<name>`.
    pub async fn start(files: &[(&str, &[u8])]) -> Self {
        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
            .await
            .unwrap();
        let port = listener.local_addr().unwrap().port();
        let base_url = format!("http://127.0.0.1:{port}");

        let recorded = Arc::new(Mutex::new(Recorded::default()));
        let state = AppState {
            base_url: base_url.clone(),
            files: Arc::new(
                files
                    .iter()
                    .map(|(name, data)| ((*name).to_string(), Bytes::copy_from_slice(data)))
                    .collect(),
            ),
            recorded: Arc::clone(&recorded),
        };

        let app = Router::new()
            .route("/dream/create-multipart-upload", post(create_unattached))
            .route("/dream/:id/create-multipart-upload", post(create_for))
            .route("/dream/:id/refresh-multipart-upload", post(refresh))
            .route("/dream/:id/complete-multipart-upload", post(complete))
            .route("/storage/:part", put(put_part))
            .route("/files/:name", get(get_file))
            .with_state(state);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            recorded,
            handle,
        }
    }

    /// The first PUT of `part` answers 500.
    pub fn fail_part_once(&self, part: u32) {
        self.recorded.lock().unwrap().fail_once.insert(part);
    }

    pub fn recorded(&self) -> std::sync::MutexGuard<'_, Recorded> {
        self.recorded.lock().unwrap()
    }

    /// Concatenation of every stored part, in part order.
    pub fn assembled(&self) -> Vec<u8> {
        self.recorded()
            .stored
            .values()
            .flat_map(|b| b.iter().copied())
            .collect()
    }

    pub fn file_url(&self, name: &str) -> String {
        format!("{}/files/{name}", self.base_url)
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Api-Key {API_KEY}"))
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"success": false, "message": "Invalid API key"})),
    )
        .into_response()
}

fn part_urls(base_url: &str, body: &Value) -> Vec<String> {
    let parts = body["parts"].as_u64().unwrap_or(0);
    (1..=parts)
        .map(|n| format!("{base_url}/storage/{n}?X-Amz-Signature=initial"))
        .collect()
}

async fn create_unattached(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let urls = part_urls(&state.base_url, &body);
    state
        .recorded
        .lock()
        .unwrap()
        .creates
        .push(("/dream/create-multipart-upload".to_string(), body.clone()));
    Json(json!({
        "success": true,
        "data": {
            "uploadId": UPLOAD_ID,
            "urls": urls,
            "dream": {"uuid": CREATED_UUID, "name": body["name"], "status": "none"}
        }
    }))
    .into_response()
}

async fn create_for(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    if id == "missing" {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"success": false, "message": "Dream not found"})),
        )
            .into_response();
    }
    let urls = part_urls(&state.base_url, &body);
    state
        .recorded
        .lock()
        .unwrap()
        .creates
        .push((format!("/dream/{id}/create-multipart-upload"), body));
    Json(json!({"success": true, "data": {"uploadId": UPLOAD_ID, "urls": urls}})).into_response()
}

async fn refresh(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let part = body["part"].as_u64().unwrap_or(0);
    state
        .recorded
        .lock()
        .unwrap()
        .refreshes
        .push((id, body));
    Json(json!({
        "success": true,
        "data": {"url": format!("{}/storage/{part}?X-Amz-Signature=refreshed", state.base_url)}
    }))
    .into_response()
}

async fn complete(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    state
        .recorded
        .lock()
        .unwrap()
        .completes
        .push((id.clone(), body));
    Json(json!({
        "success": true,
        "data": {"dream": {"id": 7, "uuid": id, "status": "queue"}}
    }))
    .into_response()
}

async fn put_part(
    State(state): State<AppState>,
    Path(part): Path<u32>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let mut recorded = state.recorded.lock().unwrap();
    recorded.puts.push((part, content_type, body.clone()));
    if recorded.fail_once.remove(&part) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    recorded.stored.insert(part, body);
    (StatusCode::OK, [(header::ETAG, format!("\"etag-{part}\""))]).into_response()
}

async fn get_file(State(state): State<AppState>, Path(name): Path<String>) -> Response {
    match state.files.get(&name) {
        Some(data) => (StatusCode::OK, data.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
