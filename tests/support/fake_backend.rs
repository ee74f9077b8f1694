use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use intake::models::Import;
use serde_json::json;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

type SharedState = Arc<Mutex<FakeState>>;

#[derive(Default)]
pub struct FakeState {
    rows: Vec<Import>,
    objects: BTreeMap<String, Vec<u8>>,
    fail_rest: bool,
}

/// In-process stand-in for the remote backend: a PostgREST-style `imports`
/// resource plus the object storage surface, enough to drive the gateway
/// end to end.
#[derive(Clone)]
pub struct FakeBackend {
    pub base_url: String,
    state: SharedState,
}

impl FakeBackend {
    pub async fn spawn() -> Self {
        let state: SharedState = Arc::new(Mutex::new(FakeState::default()));

        let app = Router::new()
            .route(
                "/rest/v1/imports",
                get(list_imports).post(insert_import).delete(delete_imports),
            )
            .route("/storage/v1/object/list/:bucket", post(list_objects))
            .route(
                "/storage/v1/object/sign/:bucket/*path",
                post(sign_object).get(serve_signed),
            )
            .route("/storage/v1/object/:bucket/*path", post(upload_object))
            .route("/storage/v1/object/:bucket", delete(delete_objects))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    pub fn seed_row(&self, import: Import) {
        self.state.lock().unwrap().rows.push(import);
    }

    pub fn rows(&self) -> Vec<Import> {
        self.state.lock().unwrap().rows.clone()
    }

    pub fn object_paths(&self) -> Vec<String> {
        self.state.lock().unwrap().objects.keys().cloned().collect()
    }

    /// Make every REST call answer HTTP 500
    pub fn set_fail_rest(&self, fail: bool) {
        self.state.lock().unwrap().fail_rest = fail;
    }
}

async fn list_imports(
    State(state): State<SharedState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let state = state.lock().unwrap();
    if state.fail_rest {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    let mut rows: Vec<Import> = state
        .rows
        .iter()
        .filter(|row| row_matches(row, &params))
        .cloned()
        .collect();
    rows.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

    let total = rows.len();
    let offset: usize = params
        .get("offset")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);
    let limit: usize = params
        .get("limit")
        .and_then(|v| v.parse().ok())
        .unwrap_or(usize::MAX);
    let items: Vec<Import> = rows.into_iter().skip(offset).take(limit).collect();

    let end = if items.is_empty() {
        offset
    } else {
        offset + items.len() - 1
    };
    let content_range = format!("{}-{}/{}", offset, end, total);

    ([(header::CONTENT_RANGE, content_range)], Json(items)).into_response()
}

async fn insert_import(State(state): State<SharedState>, Json(row): Json<Import>) -> Response {
    let mut state = state.lock().unwrap();
    if state.fail_rest {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    state.rows.push(row.clone());
    (StatusCode::CREATED, Json(vec![row])).into_response()
}

async fn delete_imports(
    State(state): State<SharedState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let mut state = state.lock().unwrap();
    if state.fail_rest {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    let id = params
        .get("id")
        .and_then(|v| v.strip_prefix("eq."))
        .unwrap_or_default()
        .to_string();

    let (removed, kept): (Vec<Import>, Vec<Import>) =
        state.rows.drain(..).partition(|row| row.id == id);
    state.rows = kept;

    Json(removed).into_response()
}

fn row_matches(row: &Import, params: &HashMap<String, String>) -> bool {
    if let Some(status) = params.get("status").and_then(|v| v.strip_prefix("eq.")) {
        if row.status.as_str() != status {
            return false;
        }
    }

    if let Some(id) = params.get("id").and_then(|v| v.strip_prefix("eq.")) {
        if row.id != id {
            return false;
        }
    }

    if let Some(pattern) = params.get("name").and_then(|v| v.strip_prefix("ilike.")) {
        if !ilike_matches(&row.name, pattern) {
            return false;
        }
    }

    if let Some(compound) = params.get("or") {
        let inner = compound.trim_start_matches('(').trim_end_matches(')');
        let mut any = false;
        for clause in inner.split(',') {
            if let Some(pattern) = clause.strip_prefix("name.ilike.") {
                if ilike_matches(&row.name, pattern) {
                    any = true;
                }
            } else if let Some(id) = clause.strip_prefix("id.eq.") {
                if row.id == id {
                    any = true;
                }
            }
        }
        if !any {
            return false;
        }
    }

    true
}

fn ilike_matches(value: &str, pattern: &str) -> bool {
    let needle = pattern.trim_matches('*').to_lowercase();
    value.to_lowercase().contains(&needle)
}

async fn upload_object(
    State(state): State<SharedState>,
    Path((_bucket, path)): Path<(String, String)>,
    body: Bytes,
) -> StatusCode {
    state.lock().unwrap().objects.insert(path, body.to_vec());
    StatusCode::OK
}

async fn list_objects(
    State(state): State<SharedState>,
    Path(_bucket): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> Response {
    let prefix = body["prefix"].as_str().unwrap_or_default();
    let limit = body["limit"].as_u64().unwrap_or(100) as usize;

    let state = state.lock().unwrap();
    let dir_prefix = format!("{}/", prefix);
    let mut entries: Vec<(String, u64)> = state
        .objects
        .iter()
        .filter_map(|(key, bytes)| {
            key.strip_prefix(&dir_prefix)
                .map(|name| (name.to_string(), bytes.len() as u64))
        })
        .collect();
    entries.sort();

    let listed: Vec<serde_json::Value> = entries
        .into_iter()
        .take(limit)
        .map(|(name, size)| json!({ "name": name, "metadata": { "size": size } }))
        .collect();

    Json(listed).into_response()
}

async fn sign_object(Path((bucket, path)): Path<(String, String)>) -> Response {
    Json(json!({
        "signedURL": format!("/object/sign/{}/{}?token=fake", bucket, path)
    }))
    .into_response()
}

async fn serve_signed(
    State(state): State<SharedState>,
    Path((_bucket, path)): Path<(String, String)>,
) -> Response {
    match state.lock().unwrap().objects.get(&path) {
        Some(bytes) => bytes.clone().into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn delete_objects(
    State(state): State<SharedState>,
    Path(_bucket): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> StatusCode {
    let prefixes: Vec<String> = body["prefixes"]
        .as_array()
        .map(|values| {
            values
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default();

    let mut state = state.lock().unwrap();
    state.objects.retain(|key, _| {
        !prefixes
            .iter()
            .any(|p| key == p || key.starts_with(&format!("{}/", p)))
    });

    StatusCode::OK
}
