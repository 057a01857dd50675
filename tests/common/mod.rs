//! Stub PocketBase collection used by the integration tests.
//!
//! Serves `/api/collections/files/records` (GET list, POST multipart create)
//! and `/api/collections/files/records/:id` (PATCH, DELETE) from an axum
//! router on a background current-thread runtime. Every endpoint can be told
//! which status to answer with.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch};
use axum::{Json, Router};
use serde_json::{json, Value};

pub const COLLECTION_PATH: &str = "/api/collections/files/records";

/// What the stub saw in a multipart create.
#[derive(Debug, Clone, PartialEq)]
pub struct SeenUpload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub size: usize,
    pub name_field: Option<String>,
}

#[derive(Default)]
pub struct Stub {
    pub records: Mutex<Vec<Value>>,
    pub uploads: Mutex<Vec<SeenUpload>>,
    pub patches: Mutex<Vec<(String, Value)>>,
    /// Status of the create endpoint. A success status still creates the
    /// record; anything else rejects it. Defaults to 200.
    pub create_status: Mutex<Option<StatusCode>>,
    /// Status of the update endpoint, same rules. Defaults to 200.
    pub patch_status: Mutex<Option<StatusCode>>,
    /// Status of the delete endpoint for a known id, same rules. Defaults
    /// to 200. Unknown ids always answer 404.
    pub delete_status: Mutex<Option<StatusCode>>,
    /// Drop the `file` field from create responses.
    pub omit_file_field: AtomicBool,
    pub requests: AtomicUsize,
    next_id: AtomicUsize,
}

pub struct StubServer {
    pub addr: SocketAddr,
    pub state: Arc<Stub>,
}

impl StubServer {
    /// Collection records URL, the value a user stores with `config --set`.
    pub fn url(&self) -> String {
        format!("http://{}{}", self.addr, COLLECTION_PATH)
    }

    /// URL of a collection the stub does not serve.
    pub fn missing_url(&self) -> String {
        format!("http://{}/api/collections/missing/records", self.addr)
    }

    pub fn requests(&self) -> usize {
        self.state.requests.load(Ordering::SeqCst)
    }
}

/// Bind on an ephemeral port and serve until the test process exits.
pub fn spawn() -> StubServer {
    let state = Arc::new(Stub::default());
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind stub");
    listener.set_nonblocking(true).expect("nonblocking");
    let addr = listener.local_addr().expect("local addr");

    let app = Router::new()
        .route(COLLECTION_PATH, get(list).post(create))
        .route(&format!("{COLLECTION_PATH}/:id"), patch(update).delete(remove))
        .with_state(state.clone());

    std::thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("runtime");
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::from_std(listener).expect("tokio listener");
            axum::serve(listener, app).await.expect("serve");
        });
    });

    StubServer { addr, state }
}

/// An address nothing listens on.
pub fn dead_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{addr}{COLLECTION_PATH}")
}

async fn list(State(stub): State<Arc<Stub>>) -> Response {
    stub.requests.fetch_add(1, Ordering::SeqCst);
    let items = stub.records.lock().unwrap().clone();
    let total = items.len();
    Json(json!({
        "page": 1,
        "perPage": 30,
        "totalItems": total,
        "totalPages": if total == 0 { 0 } else { 1 },
        "items": items,
    }))
    .into_response()
}

async fn create(State(stub): State<Arc<Stub>>, mut multipart: Multipart) -> Response {
    stub.requests.fetch_add(1, Ordering::SeqCst);
    let mut seen = SeenUpload {
        file_name: None,
        content_type: None,
        size: 0,
        name_field: None,
    };
    while let Ok(Some(field)) = multipart.next_field().await {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "file" => {
                seen.file_name = field.file_name().map(str::to_string);
                seen.content_type = field.content_type().map(str::to_string);
                seen.size = field.bytes().await.map(|b| b.len()).unwrap_or_default();
            }
            "name" => seen.name_field = field.text().await.ok(),
            _ => {}
        }
    }
    stub.uploads.lock().unwrap().push(seen.clone());

    let status = configured(&stub.create_status);
    if !status.is_success() {
        return rejected(status);
    }

    let n = stub.next_id.fetch_add(1, Ordering::SeqCst) + 1;
    let mut record = json!({
        "id": format!("r{n}"),
        "collectionId": "pbc_files",
        "collectionName": "files",
        "file": seen.file_name.unwrap_or_default(),
        "name": seen.name_field.unwrap_or_default(),
        "link": "",
        "created": "2024-01-01 00:00:00.000Z",
    });
    if stub.omit_file_field.load(Ordering::SeqCst) {
        if let Some(map) = record.as_object_mut() {
            map.remove("file");
        }
    }
    stub.records.lock().unwrap().push(record.clone());
    (status, Json(record)).into_response()
}

async fn update(
    State(stub): State<Arc<Stub>>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    stub.requests.fetch_add(1, Ordering::SeqCst);
    stub.patches.lock().unwrap().push((id.clone(), body.clone()));

    let status = configured(&stub.patch_status);
    if !status.is_success() {
        return rejected(status);
    }

    let mut records = stub.records.lock().unwrap();
    match records.iter_mut().find(|r| r["id"] == id.as_str()) {
        Some(record) => {
            if let Some(link) = body.get("link") {
                record["link"] = link.clone();
            }
            (status, Json(record.clone())).into_response()
        }
        None => not_found(),
    }
}

async fn remove(State(stub): State<Arc<Stub>>, Path(id): Path<String>) -> Response {
    stub.requests.fetch_add(1, Ordering::SeqCst);
    let mut records = stub.records.lock().unwrap();
    if !records.iter().any(|r| r["id"] == id.as_str()) {
        return not_found();
    }
    let status = configured(&stub.delete_status);
    if !status.is_success() {
        return rejected(status);
    }
    records.retain(|r| r["id"] != id.as_str());
    if status == StatusCode::NO_CONTENT {
        return status.into_response();
    }
    (status, Json(json!({}))).into_response()
}

fn configured(slot: &Mutex<Option<StatusCode>>) -> StatusCode {
    let status = *slot.lock().unwrap();
    status.unwrap_or(StatusCode::OK)
}

fn rejected(status: StatusCode) -> Response {
    (status, Json(json!({ "message": "rejected by stub" }))).into_response()
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "code": 404,
            "message": "The requested resource wasn't found.",
            "data": {},
        })),
    )
        .into_response()
}
