// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! REST backend client.
//!
//! One method per backend endpoint. The client holds no state besides the
//! connection pool and optional bearer credential, so it is cheap to clone and
//! hand to every state holder.

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{
    Activity, ActivityInstance, ActivityUpdate, CompletionUpdate, Group, GroupUpdate,
    PartialUpdate, User, UserUpdate, Vote,
};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Loose JSON object returned by write endpoints, usually `{"message": ...}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiMessage {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// Backend API client.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    bearer_token: Option<String>,
}

impl ApiClient {
    /// Create a client for the given base URL.
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            bearer_token: None,
        }
    }

    /// Create a client from configuration (timeout and session credential).
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.http_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("failed building HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            bearer_token: config.session_token.clone(),
        })
    }

    /// Forward a session credential as `Authorization: Bearer`.
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ─── Activities ──────────────────────────────────────────────

    pub async fn list_activities(&self) -> Result<Vec<Activity>> {
        self.get_json("actividad/").await
    }

    pub async fn get_activity(&self, activity_id: i64) -> Result<Activity> {
        self.get_json(&format!("actividad/{}", activity_id)).await
    }

    pub async fn list_group_activities(&self, group_id: i64) -> Result<Vec<Activity>> {
        self.get_json(&format!("actividad/grupo/{}", group_id)).await
    }

    pub async fn create_activity(&self, activity: &Activity) -> Result<ApiMessage> {
        self.send_json(Method::POST, "actividad/", Some(activity))
            .await
    }

    pub async fn update_activity(
        &self,
        activity_id: i64,
        update: &ActivityUpdate,
    ) -> Result<ApiMessage> {
        let body = update.validated()?;
        self.send_json(Method::PUT, &format!("actividad/{}", activity_id), Some(body))
            .await
    }

    pub async fn delete_activity(&self, activity_id: i64) -> Result<ApiMessage> {
        self.send_json::<()>(Method::DELETE, &format!("actividad/{}", activity_id), None)
            .await
    }

    // ─── Completion records ──────────────────────────────────────

    pub async fn list_completions(&self) -> Result<Vec<ActivityInstance>> {
        self.get_json("actividad_usuario/").await
    }

    pub async fn get_completion(&self, completion_id: i64) -> Result<ActivityInstance> {
        self.get_json(&format!("actividad_usuario/{}", completion_id))
            .await
    }

    pub async fn list_user_completions(&self, user_id: &str) -> Result<Vec<ActivityInstance>> {
        self.get_json(&format!(
            "actividad_usuario/usuario/{}",
            urlencoding::encode(user_id)
        ))
        .await
    }

    pub async fn list_activity_completions(
        &self,
        activity_id: i64,
    ) -> Result<Vec<ActivityInstance>> {
        self.get_json(&format!("actividad_usuario/actividad/{}", activity_id))
            .await
    }

    pub async fn create_completion(&self, record: &ActivityInstance) -> Result<ApiMessage> {
        self.send_json(Method::POST, "actividad_usuario/", Some(record))
            .await
    }

    /// Correct a completion record (admin tooling).
    pub async fn update_completion(
        &self,
        completion_id: i64,
        update: &CompletionUpdate,
    ) -> Result<ApiMessage> {
        let body = update.validated()?;
        self.send_json(
            Method::PUT,
            &format!("actividad_usuario/{}", completion_id),
            Some(body),
        )
        .await
    }

    pub async fn delete_completion(&self, completion_id: i64) -> Result<ApiMessage> {
        self.send_json::<()>(
            Method::DELETE,
            &format!("actividad_usuario/{}", completion_id),
            None,
        )
        .await
    }

    /// Submit a vote. Tallying and status promotion happen server side.
    pub async fn submit_vote(&self, vote: &Vote) -> Result<ApiMessage> {
        self.send_json(Method::POST, "actividad_usuario/votar", Some(vote))
            .await
    }

    // ─── Groups ──────────────────────────────────────────────────

    pub async fn list_groups(&self) -> Result<Vec<Group>> {
        self.get_json("grupo/").await
    }

    pub async fn get_group(&self, group_id: i64) -> Result<Group> {
        self.get_json(&format!("grupo/{}", group_id)).await
    }

    pub async fn create_group(&self, group: &Group) -> Result<ApiMessage> {
        self.send_json(Method::POST, "grupo/", Some(group)).await
    }

    pub async fn update_group(&self, group_id: i64, update: &GroupUpdate) -> Result<ApiMessage> {
        let body = update.validated()?;
        self.send_json(Method::PUT, &format!("grupo/{}", group_id), Some(body))
            .await
    }

    pub async fn delete_group(&self, group_id: i64) -> Result<ApiMessage> {
        self.send_json::<()>(Method::DELETE, &format!("grupo/{}", group_id), None)
            .await
    }

    // ─── Users ───────────────────────────────────────────────────

    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.get_json("usuario/").await
    }

    pub async fn get_user(&self, user_id: &str) -> Result<User> {
        self.get_json(&format!("usuario/{}", urlencoding::encode(user_id)))
            .await
    }

    pub async fn list_group_users(&self, group_id: i64) -> Result<Vec<User>> {
        self.get_json(&format!("usuario/grupo/{}", group_id)).await
    }

    pub async fn create_user(&self, user: &User) -> Result<ApiMessage> {
        self.send_json(Method::POST, "usuario/", Some(user)).await
    }

    pub async fn update_user(&self, user_id: &str, update: &UserUpdate) -> Result<ApiMessage> {
        let body = update.validated()?;
        self.send_json(
            Method::PUT,
            &format!("usuario/{}", urlencoding::encode(user_id)),
            Some(body),
        )
        .await
    }

    pub async fn delete_user(&self, user_id: &str) -> Result<ApiMessage> {
        self.send_json::<()>(
            Method::DELETE,
            &format!("usuario/{}", urlencoding::encode(user_id)),
            None,
        )
        .await
    }

    // ─── Plumbing ────────────────────────────────────────────────

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match &self.bearer_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Generic GET request with JSON response.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        tracing::debug!(method = "GET", path, "API request");

        let response = self
            .request(Method::GET, path)
            .send()
            .await
            .map_err(|e| AppError::Transport(e.to_string()))?;

        check_response_json(response).await
    }

    /// Write request with optional JSON body and a loose JSON object response.
    async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<ApiMessage> {
        tracing::debug!(method = %method, path, "API request");

        let mut builder = self.request(method, path);
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| AppError::Transport(e.to_string()))?;

        let response = ensure_success(response).await?;

        // Some endpoints answer with an empty body; that is still a success.
        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::Transport(e.to_string()))?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(ApiMessage::default());
        }
        serde_json::from_slice(&bytes).map_err(|e| AppError::Decode(e.to_string()))
    }
}

/// Pass successful responses through; turn anything else into
/// `AppError::Status`, keeping the body for diagnostics.
async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let url = response.url().to_string();
    let body = response.text().await.unwrap_or_default();
    tracing::warn!(status = %status, url = %url, "API request failed");
    Err(AppError::Status { status, body })
}

/// Check response status and parse the JSON body.
async fn check_response_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    ensure_success(response)
        .await?
        .json()
        .await
        .map_err(|e| AppError::Decode(e.to_string()))
}
