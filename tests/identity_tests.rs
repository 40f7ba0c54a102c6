// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! ID token verification against a fixed RSA key pair.
//!
//! Tokens are signed with `tests/fixtures/id_token_test_key.pem`; the matching
//! public key is served both as a static key and through the mock JWKS route.

mod common;

use common::{spawn_backend, MockBackend};
use jsonwebtoken::{encode, Algorithm, DecodingKey, EncodingKey, Header};
use robust_client::services::{IdTokenVerifier, IdentityError};
use robust_client::state::{LoginState, Notice, UiEvent};
use serde_json::{json, Value};
use std::time::{SystemTime, UNIX_EPOCH};

const PROJECT: &str = "chores-test";
const KID: &str = "test-key-1";
const PRIVATE_KEY: &[u8] = include_bytes!("fixtures/id_token_test_key.pem");
const PUBLIC_KEY: &[u8] = include_bytes!("fixtures/id_token_test_key.pub.pem");

fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

fn claims(sub: &str) -> Value {
    let now = now();
    json!({
        "iss": format!("https://securetoken.google.com/{PROJECT}"),
        "aud": PROJECT,
        "sub": sub,
        "iat": now - 10,
        "exp": now + 3600,
        "email": "ana@example.com",
        "name": "Ana García",
        "picture": "https://example.com/ana.png",
    })
}

fn sign(claims: &Value, kid: Option<&str>) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = kid.map(str::to_string);
    let key = EncodingKey::from_rsa_pem(PRIVATE_KEY).expect("Failed to load test key");
    encode(&header, claims, &key).expect("Failed to sign token")
}

fn static_verifier() -> IdTokenVerifier {
    let key = DecodingKey::from_rsa_pem(PUBLIC_KEY).expect("Failed to load public key");
    IdTokenVerifier::new_with_static_key(PROJECT, KID, key).unwrap()
}

#[tokio::test]
async fn test_valid_token_yields_identity() {
    let token = sign(&claims("uid-1"), Some(KID));

    let identity = static_verifier().verify(&token).await.unwrap();

    assert_eq!(identity.subject, "uid-1");
    assert_eq!(identity.email.as_deref(), Some("ana@example.com"));
    assert_eq!(identity.name.as_deref(), Some("Ana García"));
    assert_eq!(identity.picture.as_deref(), Some("https://example.com/ana.png"));
}

#[tokio::test]
async fn test_bearer_prefix_is_accepted() {
    let token = sign(&claims("uid-1"), Some(KID));
    let identity = static_verifier()
        .verify(&format!("Bearer {token}"))
        .await
        .unwrap();
    assert_eq!(identity.subject, "uid-1");
}

#[tokio::test]
async fn test_rejections_are_forbidden() {
    let verifier = static_verifier();

    let mut wrong_audience = claims("uid-1");
    wrong_audience["aud"] = json!("someone-else");

    let mut wrong_issuer = claims("uid-1");
    wrong_issuer["iss"] = json!("https://accounts.example.com");

    let mut expired = claims("uid-1");
    expired["exp"] = json!(now() - 3600);

    let mut future_iat = claims("uid-1");
    future_iat["iat"] = json!(now() + 3600);

    let cases = [
        ("wrong audience", sign(&wrong_audience, Some(KID))),
        ("wrong issuer", sign(&wrong_issuer, Some(KID))),
        ("expired", sign(&expired, Some(KID))),
        ("issued in the future", sign(&future_iat, Some(KID))),
        ("empty subject", sign(&claims(" "), Some(KID))),
        ("missing kid", sign(&claims("uid-1"), None)),
        ("unknown kid", sign(&claims("uid-1"), Some("other-key"))),
        ("garbage", "not.a.jwt".to_string()),
    ];

    for (case, token) in cases {
        let err = verifier.verify(&token).await.unwrap_err();
        assert!(
            matches!(err, IdentityError::Forbidden(_)),
            "{case}: expected Forbidden, got {err:?}"
        );
    }
}

#[tokio::test]
async fn test_jwks_keys_are_fetched_once_and_cached() {
    let server = spawn_backend(MockBackend::default()).await;
    let verifier = IdTokenVerifier::with_jwks_url(PROJECT, &server.jwks_url()).unwrap();

    for sub in ["uid-1", "uid-2", "uid-3"] {
        let token = sign(&claims(sub), Some(KID));
        assert_eq!(verifier.verify(&token).await.unwrap().subject, sub);
    }

    assert_eq!(server.backend.requests_to("GET", "/jwks").len(), 1);
}

#[tokio::test]
async fn test_unknown_kid_forces_one_refresh() {
    let server = spawn_backend(MockBackend::default()).await;
    let verifier = IdTokenVerifier::with_jwks_url(PROJECT, &server.jwks_url()).unwrap();
    verifier
        .verify(&sign(&claims("uid-1"), Some(KID)))
        .await
        .unwrap();

    let err = verifier
        .verify(&sign(&claims("uid-1"), Some("rotated-key")))
        .await
        .unwrap_err();

    assert!(matches!(err, IdentityError::Forbidden(_)));
    assert_eq!(server.backend.requests_to("GET", "/jwks").len(), 2);
}

#[tokio::test]
async fn test_unreachable_jwks_is_transient() {
    let server = spawn_backend(MockBackend::default()).await;
    server.backend.fail("GET", "/jwks");
    let verifier = IdTokenVerifier::with_jwks_url(PROJECT, &server.jwks_url()).unwrap();

    let err = verifier
        .verify(&sign(&claims("uid-1"), Some(KID)))
        .await
        .unwrap_err();

    assert!(matches!(err, IdentityError::Transient(_)));
}

#[tokio::test]
async fn test_login_with_token_provisions_subject() {
    let server = spawn_backend(MockBackend::default()).await;
    let (login, mut events) = LoginState::new(server.api());
    let token = sign(&claims("uid-77"), Some(KID));

    let user = login
        .login_with_token(&static_verifier(), &token)
        .await
        .unwrap();

    assert_eq!(user.id, "uid-77");
    assert_eq!(user.name, "Ana García");
    assert_eq!(events.drain(), vec![UiEvent::LoginComplete]);
}

#[tokio::test]
async fn test_login_with_bad_token_never_reaches_backend() {
    let server = spawn_backend(MockBackend::default()).await;
    let (login, mut events) = LoginState::new(server.api());

    assert!(login
        .login_with_token(&static_verifier(), "not.a.jwt")
        .await
        .is_none());

    assert!(server.backend.requests().is_empty());
    assert_eq!(events.drain(), vec![UiEvent::Toast(Notice::LoginRejected)]);
}
