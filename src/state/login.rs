// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sign-in: make sure the authenticated identity has a backend user.

use std::sync::Arc;

use tokio::sync::watch;

use super::events::{event_channel, EventReceiver, EventSender, UiEvent};
use super::{Notice, Published};
use crate::models::User;
use crate::services::{ApiClient, IdTokenVerifier, VerifiedIdentity};

#[derive(Clone)]
pub struct LoginState {
    inner: Arc<LoginInner>,
}

struct LoginInner {
    api: ApiClient,
    /// Loading flag.
    view: Published<bool>,
    events: EventSender,
}

impl LoginState {
    pub fn new(api: ApiClient) -> (Self, EventReceiver) {
        let (events, receiver) = event_channel("login");
        let state = Self {
            inner: Arc::new(LoginInner {
                api,
                view: Published::default(),
                events,
            }),
        };
        (state, receiver)
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.inner.view.subscribe()
    }

    pub fn is_loading(&self) -> bool {
        self.inner.view.get()
    }

    /// Verify an ID token, then log in as its subject.
    pub async fn login_with_token(
        &self,
        verifier: &IdTokenVerifier,
        id_token: &str,
    ) -> Option<User> {
        match verifier.verify(id_token).await {
            Ok(identity) => self.login(&identity).await,
            Err(e) => {
                tracing::warn!(error = %e, "ID token rejected");
                self.inner.events.toast(Notice::LoginRejected);
                None
            }
        }
    }

    /// Look the user up, creating it on first login.
    pub async fn login(&self, identity: &VerifiedIdentity) -> Option<User> {
        let inner = &self.inner;
        let user_id = identity.subject.as_str();
        inner.view.update(|loading| *loading = true);

        let user = match inner.api.get_user(user_id).await {
            Ok(user) => {
                tracing::info!(user_id, "Existing user signed in");
                Some(user)
            }
            Err(e) if e.is_not_found() => self.register(identity).await,
            Err(e) => {
                tracing::warn!(user_id, error = %e, "Failed to verify user");
                inner.events.toast(Notice::LoginVerifyFailed);
                None
            }
        };

        inner.view.update(|loading| *loading = false);
        if user.is_some() {
            inner.events.emit(UiEvent::LoginComplete);
        }
        user
    }

    async fn register(&self, identity: &VerifiedIdentity) -> Option<User> {
        let user = User::new_member(
            &identity.subject,
            identity.name.as_deref(),
            identity.picture.as_deref(),
        );
        tracing::info!(user_id = %user.id, name = %user.name, "Registering new user");

        match self.inner.api.create_user(&user).await {
            Ok(_) => Some(user),
            Err(e) => {
                tracing::warn!(user_id = %user.id, error = %e, "Failed to register user");
                self.inner.events.toast(Notice::LoginRegisterFailed);
                None
            }
        }
    }
}
