// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process stand-in for the REST backend.
//!
//! Routes mirror the real backend closely enough for the client: collection
//! routes with trailing slashes, partial `PUT`s merged into stored records,
//! invitation codes resolved on `PUT /usuario/{id}`. Every request is logged
//! and any route prefix can be made to fail with a 500.

#![allow(dead_code)]

use axum::{
    body::Body,
    extract::{Path, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use robust_client::models::{Activity, ActivityInstance, ActivityStatus, Group, User, Vote};
use robust_client::ApiClient;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex, MutexGuard};

pub const JWKS_JSON: &str = include_str!("../fixtures/jwks.json");

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub body: Option<Value>,
    pub authorization: Option<String>,
}

#[derive(Default)]
pub struct MockData {
    pub users: Vec<User>,
    pub groups: Vec<Group>,
    pub activities: Vec<Activity>,
    pub completions: Vec<ActivityInstance>,
    pub votes: Vec<Vote>,
    pub requests: Vec<RecordedRequest>,
    /// `(method, path prefix)` pairs answered with a 500.
    pub failures: Vec<(String, String)>,
}

#[derive(Clone, Default)]
pub struct MockBackend {
    data: Arc<Mutex<MockData>>,
}

impl MockBackend {
    pub fn data(&self) -> MutexGuard<'_, MockData> {
        self.data.lock().unwrap()
    }

    pub fn fail(&self, method: &str, path_prefix: &str) {
        self.data()
            .failures
            .push((method.to_string(), path_prefix.to_string()));
    }

    pub fn clear_failures(&self) {
        self.data().failures.clear();
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.data().requests.clone()
    }

    /// Requests with the given method whose path starts with `prefix`.
    pub fn requests_to(&self, method: &str, prefix: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path.starts_with(prefix))
            .collect()
    }

    pub fn activity(&self, id: i64) -> Option<Activity> {
        self.data().activities.iter().find(|a| a.id == id).cloned()
    }

    pub fn user(&self, id: &str) -> Option<User> {
        self.data().users.iter().find(|u| u.id == id).cloned()
    }
}

pub struct TestServer {
    pub base_url: String,
    pub backend: MockBackend,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    pub fn api(&self) -> ApiClient {
        ApiClient::new(&self.base_url)
    }

    pub fn jwks_url(&self) -> String {
        format!("{}/jwks", self.base_url.trim_end_matches('/'))
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Start a mock backend on an ephemeral port.
pub async fn spawn_backend(backend: MockBackend) -> TestServer {
    let app = router(backend.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestServer {
        base_url: format!("http://{addr}/"),
        backend,
        handle,
    }
}

fn router(backend: MockBackend) -> Router {
    Router::new()
        .route("/actividad/", get(list_activities).post(create_activity))
        .route(
            "/actividad/{id}",
            get(get_activity).put(update_activity).delete(delete_activity),
        )
        .route("/actividad/grupo/{id}", get(list_group_activities))
        .route(
            "/actividad_usuario/",
            get(list_completions).post(create_completion),
        )
        .route(
            "/actividad_usuario/{id}",
            get(get_completion)
                .put(update_completion)
                .delete(delete_completion),
        )
        .route("/actividad_usuario/votar", post(submit_vote))
        .route("/actividad_usuario/usuario/{id}", get(list_user_completions))
        .route(
            "/actividad_usuario/actividad/{id}",
            get(list_activity_completions),
        )
        .route("/grupo/", get(list_groups).post(create_group))
        .route(
            "/grupo/{id}",
            get(get_group).put(update_group).delete(delete_group),
        )
        .route("/usuario/", get(list_users).post(create_user))
        .route(
            "/usuario/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/usuario/grupo/{id}", get(list_group_users))
        .route("/jwks", get(jwks))
        .layer(middleware::from_fn_with_state(backend.clone(), record))
        .with_state(backend)
}

/// Log the request and apply configured failures.
async fn record(State(backend): State<MockBackend>, req: Request, next: Next) -> Response {
    let (parts, body) = req.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_default();
    let method = parts.method.to_string();
    let path = parts.uri.path().to_string();

    let failing = {
        let mut data = backend.data();
        data.requests.push(RecordedRequest {
            method: method.clone(),
            path: path.clone(),
            body: serde_json::from_slice(&bytes).ok(),
            authorization: parts
                .headers
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
        });
        data.failures
            .iter()
            .any(|(m, prefix)| *m == method && path.starts_with(prefix.as_str()))
    };

    if failing {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "injected failure"})),
        )
            .into_response();
    }

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

fn not_found(what: &str) -> Response {
    (StatusCode::NOT_FOUND, Json(json!({"error": format!("{what} not found")}))).into_response()
}

fn message(text: &str) -> Response {
    Json(json!({"message": text})).into_response()
}

/// Merge a partial JSON object into a record.
fn merge<T: Serialize + DeserializeOwned>(record: &mut T, patch: &Value) {
    let mut current = serde_json::to_value(&*record).unwrap();
    if let (Some(target), Some(fields)) = (current.as_object_mut(), patch.as_object()) {
        for (key, value) in fields {
            target.insert(key.clone(), value.clone());
        }
    }
    *record = serde_json::from_value(current).unwrap();
}

// ─── Activities ──────────────────────────────────────────────

async fn list_activities(State(backend): State<MockBackend>) -> Json<Vec<Activity>> {
    Json(backend.data().activities.clone())
}

async fn list_group_activities(
    State(backend): State<MockBackend>,
    Path(group_id): Path<i64>,
) -> Json<Vec<Activity>> {
    let data = backend.data();
    Json(
        data.activities
            .iter()
            .filter(|a| a.group_id == group_id)
            .cloned()
            .collect(),
    )
}

async fn get_activity(State(backend): State<MockBackend>, Path(id): Path<i64>) -> Response {
    match backend.activity(id) {
        Some(activity) => Json(activity).into_response(),
        None => not_found("activity"),
    }
}

async fn create_activity(
    State(backend): State<MockBackend>,
    Json(mut activity): Json<Activity>,
) -> Response {
    let mut data = backend.data();
    activity.id = data.activities.iter().map(|a| a.id).max().unwrap_or(0) + 1;
    activity.created_at = "Mon, 01 Jan 2024 10:00:00 GMT".to_string();
    let id = activity.id;
    data.activities.push(activity);
    (StatusCode::CREATED, Json(json!({"message": "created", "idAct": id}))).into_response()
}

async fn update_activity(
    State(backend): State<MockBackend>,
    Path(id): Path<i64>,
    Json(patch): Json<Value>,
) -> Response {
    let mut data = backend.data();
    match data.activities.iter_mut().find(|a| a.id == id) {
        Some(activity) => {
            merge(activity, &patch);
            message("updated")
        }
        None => not_found("activity"),
    }
}

async fn delete_activity(State(backend): State<MockBackend>, Path(id): Path<i64>) -> Response {
    let mut data = backend.data();
    let before = data.activities.len();
    data.activities.retain(|a| a.id != id);
    if data.activities.len() == before {
        return not_found("activity");
    }
    message("deleted")
}

// ─── Completions and votes ───────────────────────────────────

async fn create_completion(
    State(backend): State<MockBackend>,
    Json(mut record): Json<ActivityInstance>,
) -> Response {
    let mut data = backend.data();
    record.id = data.completions.len() as i64 + 1;
    record.completed_at = "Tue, 02 Jan 2024 09:30:00 GMT".to_string();
    data.completions.push(record);
    (StatusCode::CREATED, Json(json!({"message": "created"}))).into_response()
}

async fn list_completions(State(backend): State<MockBackend>) -> Json<Vec<ActivityInstance>> {
    Json(backend.data().completions.clone())
}

async fn get_completion(State(backend): State<MockBackend>, Path(id): Path<i64>) -> Response {
    let data = backend.data();
    match data.completions.iter().find(|c| c.id == id) {
        Some(record) => Json(record.clone()).into_response(),
        None => not_found("completion"),
    }
}

async fn update_completion(
    State(backend): State<MockBackend>,
    Path(id): Path<i64>,
    Json(patch): Json<Value>,
) -> Response {
    let mut data = backend.data();
    match data.completions.iter_mut().find(|c| c.id == id) {
        Some(record) => {
            merge(record, &patch);
            message("updated")
        }
        None => not_found("completion"),
    }
}

async fn delete_completion(State(backend): State<MockBackend>, Path(id): Path<i64>) -> Response {
    let mut data = backend.data();
    let before = data.completions.len();
    data.completions.retain(|c| c.id != id);
    if data.completions.len() == before {
        return not_found("completion");
    }
    message("deleted")
}

async fn list_activity_completions(
    State(backend): State<MockBackend>,
    Path(activity_id): Path<i64>,
) -> Json<Vec<ActivityInstance>> {
    let data = backend.data();
    Json(
        data.completions
            .iter()
            .filter(|c| c.activity_id == activity_id)
            .cloned()
            .collect(),
    )
}

async fn list_user_completions(
    State(backend): State<MockBackend>,
    Path(user_id): Path<String>,
) -> Json<Vec<ActivityInstance>> {
    let data = backend.data();
    Json(
        data.completions
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect(),
    )
}

/// Records the vote and updates the tally the way the backend reports it.
async fn submit_vote(State(backend): State<MockBackend>, Json(vote): Json<Vote>) -> Response {
    let mut data = backend.data();
    let Some(activity) = data.activities.iter_mut().find(|a| a.id == vote.activity_id) else {
        return not_found("activity");
    };
    if vote.approve {
        activity.favorable_votes = Some(activity.favorable_votes.unwrap_or(0) + 1);
    }
    activity.user_has_voted = Some(true);
    let (yes, total) = activity.vote_tally();
    if total > 0 && yes * 2 > total {
        activity.status = ActivityStatus::Approved;
    }
    data.votes.push(vote);
    (StatusCode::CREATED, Json(json!({"message": "vote recorded"}))).into_response()
}

// ─── Groups ──────────────────────────────────────────────────

async fn list_groups(State(backend): State<MockBackend>) -> Json<Vec<Group>> {
    Json(backend.data().groups.clone())
}

async fn get_group(State(backend): State<MockBackend>, Path(id): Path<i64>) -> Response {
    let data = backend.data();
    match data.groups.iter().find(|g| g.id == id) {
        Some(group) => Json(group.clone()).into_response(),
        None => not_found("group"),
    }
}

async fn create_group(
    State(backend): State<MockBackend>,
    Json(mut group): Json<Group>,
) -> Response {
    let mut data = backend.data();
    group.id = data.groups.iter().map(|g| g.id).max().unwrap_or(0) + 1;
    group.invitation_code = format!("INV{}", group.id);
    data.groups.push(group);
    (StatusCode::CREATED, Json(json!({"message": "created"}))).into_response()
}

async fn update_group(
    State(backend): State<MockBackend>,
    Path(id): Path<i64>,
    Json(patch): Json<Value>,
) -> Response {
    let mut data = backend.data();
    match data.groups.iter_mut().find(|g| g.id == id) {
        Some(group) => {
            merge(group, &patch);
            message("updated")
        }
        None => not_found("group"),
    }
}

async fn delete_group(State(backend): State<MockBackend>, Path(id): Path<i64>) -> Response {
    let mut data = backend.data();
    let before = data.groups.len();
    data.groups.retain(|g| g.id != id);
    if data.groups.len() == before {
        return not_found("group");
    }
    message("deleted")
}

// ─── Users ───────────────────────────────────────────────────

async fn list_users(State(backend): State<MockBackend>) -> Json<Vec<User>> {
    Json(backend.data().users.clone())
}

async fn list_group_users(
    State(backend): State<MockBackend>,
    Path(group_id): Path<i64>,
) -> Json<Vec<User>> {
    let data = backend.data();
    Json(
        data.users
            .iter()
            .filter(|u| u.group_id == Some(group_id))
            .cloned()
            .collect(),
    )
}

async fn delete_user(State(backend): State<MockBackend>, Path(id): Path<String>) -> Response {
    let mut data = backend.data();
    let before = data.users.len();
    data.users.retain(|u| u.id != id);
    if data.users.len() == before {
        return not_found("user");
    }
    message("deleted")
}

async fn get_user(State(backend): State<MockBackend>, Path(id): Path<String>) -> Response {
    match backend.user(&id) {
        Some(user) => Json(user).into_response(),
        None => not_found("user"),
    }
}

async fn create_user(State(backend): State<MockBackend>, Json(user): Json<User>) -> Response {
    let mut data = backend.data();
    if data.users.iter().any(|u| u.id == user.id) {
        return (StatusCode::CONFLICT, Json(json!({"error": "exists"}))).into_response();
    }
    data.users.push(user);
    (StatusCode::CREATED, Json(json!({"message": "created"}))).into_response()
}

async fn update_user(
    State(backend): State<MockBackend>,
    Path(id): Path<String>,
    Json(mut patch): Json<Value>,
) -> Response {
    let mut data = backend.data();

    let code = patch
        .as_object_mut()
        .and_then(|fields| fields.remove("codigo_invitacion"));
    let joined_group = match code {
        Some(code) => {
            let code = code.as_str().unwrap_or_default();
            match data.groups.iter().find(|g| g.invitation_code == code) {
                Some(group) => Some(group.id),
                None => return not_found("invitation code"),
            }
        }
        None => None,
    };

    let Some(user) = data.users.iter_mut().find(|u| u.id == id) else {
        return not_found("user");
    };
    merge(user, &patch);
    if joined_group.is_some() {
        user.group_id = joined_group;
    }
    message("updated")
}

async fn jwks() -> Response {
    (
        [
            (header::CONTENT_TYPE, "application/json"),
            (header::CACHE_CONTROL, "public, max-age=600"),
        ],
        JWKS_JSON,
    )
        .into_response()
}

// ─── Fixtures ────────────────────────────────────────────────

pub fn activity(id: i64, group_id: i64, status: &str) -> Activity {
    Activity {
        id,
        name: format!("Actividad {id}"),
        description: String::new(),
        frequency: "semanal".to_string(),
        difficulty: 2,
        unpleasantness: 3,
        points: 10 * id as i32,
        group_id,
        created_at: "Mon, 01 Jan 2024 10:00:00 GMT".to_string(),
        creator_id: "uid-creator".to_string(),
        status: ActivityStatus::from(status),
        favorable_votes: None,
        eligible_voters: None,
        user_has_voted: None,
    }
}

pub fn pending_activity(id: i64, group_id: i64, yes: u32, members: u32, voted: bool) -> Activity {
    Activity {
        favorable_votes: Some(yes),
        eligible_voters: Some(members),
        user_has_voted: Some(voted),
        ..activity(id, group_id, "pendiente")
    }
}

pub fn user(id: &str, name: &str, group_id: Option<i64>, is_admin: bool) -> User {
    User {
        group_id,
        is_admin,
        ..User::new_member(id, Some(name), None)
    }
}

pub fn group(id: i64, code: &str, creator_id: &str) -> Group {
    Group {
        id,
        invitation_code: code.to_string(),
        ..Group::draft(&format!("Piso {id}"), "Compartido", creator_id)
    }
}
