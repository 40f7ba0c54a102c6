// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

mod common;

use common::{spawn_backend, user, MockBackend};
use reqwest::StatusCode;
use robust_client::config::Config;
use robust_client::error::AppError;
use robust_client::models::{UserUpdate, Vote};
use robust_client::services::IdentityError;
use robust_client::ApiClient;

#[test]
fn test_is_not_found_matches_only_404() {
    let err = AppError::Status {
        status: StatusCode::NOT_FOUND,
        body: String::new(),
    };
    assert!(err.is_not_found());
    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));

    let err = AppError::Status {
        status: StatusCode::BAD_REQUEST,
        body: String::new(),
    };
    assert!(!err.is_not_found());

    let err = AppError::Transport("connection reset".to_string());
    assert!(!err.is_not_found());
    assert_eq!(err.status(), None);
}

#[test]
fn test_identity_errors_map_to_app_errors() {
    let err: AppError = IdentityError::Forbidden("expired".to_string()).into();
    assert!(matches!(err, AppError::Unauthorized(_)));

    let err: AppError = IdentityError::Transient("jwks down".to_string()).into();
    assert!(matches!(err, AppError::Transport(_)));
}

#[tokio::test]
async fn test_missing_record_is_status_error_with_body() {
    let server = spawn_backend(MockBackend::default()).await;

    let err = server.api().get_user("uid-missing").await.unwrap_err();

    assert!(err.is_not_found());
    match err {
        AppError::Status { body, .. } => assert!(body.contains("user not found")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_server_error_is_status_error() {
    let server = spawn_backend(MockBackend::default()).await;
    server.backend.fail("POST", "/actividad_usuario/votar");

    let err = server
        .api()
        .submit_vote(&Vote::new(1, "uid-1", true))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
}

#[tokio::test]
async fn test_unreachable_backend_is_transport_error() {
    // Discard port; nothing listens there.
    let api = ApiClient::new("http://127.0.0.1:9/");
    let err = api.list_groups().await.unwrap_err();
    assert!(matches!(err, AppError::Transport(_)));
}

#[tokio::test]
async fn test_write_response_message_is_decoded() {
    let backend = MockBackend::default();
    backend.data().users = vec![user("uid-1", "Ana", None, false)];
    let server = spawn_backend(backend).await;

    let reply = server
        .api()
        .update_user("uid-1", &UserUpdate::admin(true))
        .await
        .unwrap();

    assert_eq!(reply.message.as_deref(), Some("updated"));
}

#[tokio::test]
async fn test_user_ids_are_percent_encoded() {
    let backend = MockBackend::default();
    backend.data().users = vec![user("google|42 x", "Ana", None, false)];
    let server = spawn_backend(backend).await;

    let fetched = server.api().get_user("google|42 x").await.unwrap();

    assert_eq!(fetched.id, "google|42 x");
    let requests = server.backend.requests();
    assert_eq!(requests[0].path, "/usuario/google%7C42%20x");
}

#[tokio::test]
async fn test_session_token_is_forwarded() {
    let server = spawn_backend(MockBackend::default()).await;
    let config = Config {
        api_base_url: server.base_url.clone(),
        session_token: Some("secret-token".to_string()),
        ..Config::default()
    };

    let api = ApiClient::from_config(&config).unwrap();
    api.list_users().await.unwrap();

    let requests = server.backend.requests();
    assert_eq!(
        requests[0].authorization.as_deref(),
        Some("Bearer secret-token")
    );

    server.api().list_users().await.unwrap();
    assert_eq!(server.backend.requests()[1].authorization, None);
}
