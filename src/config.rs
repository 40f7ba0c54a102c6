//! Client configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honoured for local development.

use std::env;
use std::time::Duration;

/// Backend used when `API_BASE_URL` is not set.
pub const DEFAULT_API_BASE_URL: &str = "https://robustbackend-p8z8.onrender.com/";

/// Client configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the REST backend (with or without trailing slash)
    pub api_base_url: String,
    /// Identity provider project; enables ID token verification when set
    pub firebase_project_id: Option<String>,
    /// Per-request timeout. `None` leaves requests unbounded.
    pub http_timeout: Option<Duration>,
    /// Bearer credential forwarded to the backend, if any
    pub session_token: Option<String>,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8080/".to_string(),
            firebase_project_id: Some("test-project".to_string()),
            http_timeout: None,
            session_token: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let api_base_url =
            env::var("API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());
        if !api_base_url.starts_with("http://") && !api_base_url.starts_with("https://") {
            return Err(ConfigError::Invalid {
                name: "API_BASE_URL",
                value: api_base_url,
            });
        }

        let http_timeout = match env::var("HTTP_TIMEOUT_SECS") {
            Ok(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| ConfigError::Invalid {
                    name: "HTTP_TIMEOUT_SECS",
                    value: raw.clone(),
                })?;
                Some(Duration::from_secs(secs))
            }
            Err(_) => None,
        };

        Ok(Self {
            api_base_url,
            firebase_project_id: non_empty_var("FIREBASE_PROJECT_ID"),
            http_timeout,
            session_token: non_empty_var("ROBUST_SESSION_TOKEN"),
        })
    }
}

impl Config {
    /// Project id needed to verify ID tokens.
    pub fn require_project_id(&self) -> Result<&str, ConfigError> {
        self.firebase_project_id
            .as_deref()
            .ok_or(ConfigError::Missing("FIREBASE_PROJECT_ID"))
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}
