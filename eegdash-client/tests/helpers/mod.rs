//! Fake analysis backend for integration tests
//!
//! An axum server on an ephemeral port that records every request and
//! replies with canned responses keyed by `"METHOD /path"`. Unconfigured
//! routes answer 404 with a JSON error body.

#![allow(dead_code)]

use axum::body::Bytes;
use axum::extract::{Multipart, State};
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use eegdash_client::ClientContext;
use eegdash_common::MemoryStorage;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One request as the backend saw it
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    /// Path relative to `/api`
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    /// JSON body, or multipart fields as a JSON object
    pub body: Option<Value>,
}

#[derive(Debug, Clone)]
struct Canned {
    status: u16,
    content_type: &'static str,
    body: Vec<u8>,
}

#[derive(Default)]
pub struct BackendState {
    requests: Mutex<Vec<Recorded>>,
    responses: Mutex<HashMap<String, Canned>>,
    /// Upload failures keyed by uploaded file name
    upload_failures: Mutex<HashMap<String, Canned>>,
}

pub struct FakeBackend {
    pub base_url: String,
    state: Arc<BackendState>,
}

impl FakeBackend {
    pub async fn start() -> Self {
        let state = Arc::new(BackendState::default());
        let app = Router::new()
            .route("/api/upload", post(upload))
            .fallback(record)
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake backend");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("fake backend");
        });

        Self {
            base_url: format!("http://{}/api", addr),
            state,
        }
    }

    /// Reply to `method path` with a JSON body
    pub fn respond(&self, method: &str, path: &str, status: u16, body: Value) {
        self.respond_raw(method, path, status, "application/json", body.to_string().into_bytes());
    }

    pub fn respond_raw(&self, method: &str, path: &str, status: u16, content_type: &'static str, body: Vec<u8>) {
        self.state.responses.lock().unwrap().insert(
            format!("{} {}", method, path),
            Canned {
                status,
                content_type,
                body,
            },
        );
    }

    /// Fail uploads of `file_name` with a JSON body
    pub fn fail_upload(&self, file_name: &str, status: u16, body: Value) {
        self.state.upload_failures.lock().unwrap().insert(
            file_name.to_string(),
            Canned {
                status,
                content_type: "application/json",
                body: body.to_string().into_bytes(),
            },
        );
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.requests.lock().unwrap().clone()
    }

    /// Requests matching `method path`
    pub fn requests_to(&self, method: &str, path: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }
}

fn relative(uri: &Uri) -> String {
    uri.path().strip_prefix("/api").unwrap_or(uri.path()).to_string()
}

fn header_value(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn reply(canned: Option<Canned>) -> Response {
    let canned = canned.unwrap_or(Canned {
        status: 404,
        content_type: "application/json",
        body: json!({"error": "route not configured"}).to_string().into_bytes(),
    });
    (
        StatusCode::from_u16(canned.status).expect("valid status"),
        [(header::CONTENT_TYPE, canned.content_type)],
        canned.body,
    )
        .into_response()
}

async fn record(
    State(state): State<Arc<BackendState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = relative(&uri);
    let key = format!("{} {}", method, path);

    state.requests.lock().unwrap().push(Recorded {
        method: method.to_string(),
        path,
        query: uri.query().map(str::to_string),
        authorization: header_value(&headers, header::AUTHORIZATION),
        content_type: header_value(&headers, header::CONTENT_TYPE),
        body: serde_json::from_slice(&body).ok(),
    });

    let canned = state.responses.lock().unwrap().get(&key).cloned();
    reply(canned)
}

async fn upload(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    let mut fields = Map::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        if let Some(file_name) = field.file_name() {
            fields.insert("file_name".to_string(), Value::String(file_name.to_string()));
        }
        let data = field.bytes().await.unwrap_or_default();
        fields.insert(name, Value::String(String::from_utf8_lossy(&data).to_string()));
    }

    let file_name = fields
        .get("file_name")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    state.requests.lock().unwrap().push(Recorded {
        method: "POST".to_string(),
        path: "/upload".to_string(),
        query: None,
        authorization: header_value(&headers, header::AUTHORIZATION),
        content_type: header_value(&headers, header::CONTENT_TYPE),
        body: Some(Value::Object(fields)),
    });

    if let Some(failure) = state.upload_failures.lock().unwrap().get(&file_name).cloned() {
        return reply(Some(failure));
    }
    let canned = state.responses.lock().unwrap().get("POST /upload").cloned();
    reply(canned)
}

/// Client wired to `backend` over in-memory storage
pub fn client(backend: &FakeBackend) -> (ClientContext, Arc<MemoryStorage>) {
    let storage = Arc::new(MemoryStorage::new());
    let context = ClientContext::with_storage(&backend.base_url, storage.clone())
        .expect("client context");
    (context, storage)
}

pub fn job_json(id: u64, status: &str) -> Value {
    json!({
        "id": id,
        "user_id": 1,
        "patient_id": format!("PT-{}", id),
        "file_name": format!("rec_{}.edf", id),
        "file_path": format!("uploads/rec_{}.edf", id),
        "file_size": 2048,
        "status": status,
        "priority": "normal",
        "progress": 0,
        "estimated_time": 5,
        "created_at": "2024-05-01T10:00:00Z",
        "updated_at": "2024-05-01T10:00:00Z"
    })
}

pub fn user_json() -> Value {
    json!({"id": 7, "username": "dr_lee", "role": "admin"})
}

/// Bound on any single wait in async tests
pub const WAIT: Duration = Duration::from_secs(5);
