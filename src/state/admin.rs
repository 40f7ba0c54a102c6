// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Admin user list and per-user editing.

use std::sync::Arc;

use tokio::sync::watch;

use super::events::{event_channel, EventReceiver, EventSender, UiEvent};
use super::{Notice, Published};
use crate::models::{User, UserUpdate};
use crate::services::ApiClient;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdminUsersView {
    pub loading: bool,
    /// Last fetched list, unfiltered.
    pub all_users: Vec<User>,
    /// `all_users` filtered by `query`.
    pub users: Vec<User>,
    pub query: String,
}

/// Case-insensitive substring match on the display name. A blank query
/// matches everyone.
fn filter_users(users: &[User], query: &str) -> Vec<User> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return users.to_vec();
    }
    users
        .iter()
        .filter(|u| u.name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

#[derive(Clone)]
pub struct AdminUsersState {
    inner: Arc<AdminInner<AdminUsersView>>,
}

struct AdminInner<V> {
    api: ApiClient,
    view: Published<V>,
    events: EventSender,
}

impl AdminUsersState {
    pub fn new(api: ApiClient) -> (Self, EventReceiver) {
        let (events, receiver) = event_channel("admin_users");
        let state = Self {
            inner: Arc::new(AdminInner {
                api,
                view: Published::default(),
                events,
            }),
        };
        (state, receiver)
    }

    pub fn subscribe(&self) -> watch::Receiver<AdminUsersView> {
        self.inner.view.subscribe()
    }

    pub fn snapshot(&self) -> AdminUsersView {
        self.inner.view.get()
    }

    /// Fetch every user and re-apply the current query.
    pub async fn fetch(&self) -> bool {
        let inner = &self.inner;
        inner.view.update(|v| v.loading = true);

        match inner.api.list_users().await {
            Ok(users) => {
                tracing::debug!(count = users.len(), "Fetched users");
                inner.view.update(|v| {
                    v.users = filter_users(&users, &v.query);
                    v.all_users = users;
                    v.loading = false;
                });
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to list users");
                inner.view.update(|v| v.loading = false);
                inner.events.toast(Notice::LoadUsersFailed);
                false
            }
        }
    }

    /// Filter the last fetched list locally.
    pub fn search(&self, query: &str) {
        self.inner.view.update(|v| {
            v.query = query.to_string();
            v.users = filter_users(&v.all_users, query);
        });
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditUserView {
    pub loading: bool,
    pub user: Option<User>,
}

#[derive(Clone)]
pub struct EditUserState {
    inner: Arc<AdminInner<EditUserView>>,
}

impl EditUserState {
    pub fn new(api: ApiClient) -> (Self, EventReceiver) {
        let (events, receiver) = event_channel("edit_user");
        let state = Self {
            inner: Arc::new(AdminInner {
                api,
                view: Published::default(),
                events,
            }),
        };
        (state, receiver)
    }

    pub fn subscribe(&self) -> watch::Receiver<EditUserView> {
        self.inner.view.subscribe()
    }

    pub fn snapshot(&self) -> EditUserView {
        self.inner.view.get()
    }

    pub async fn load(&self, user_id: &str) -> bool {
        let inner = &self.inner;
        inner.view.update(|v| v.loading = true);

        match inner.api.get_user(user_id).await {
            Ok(user) => {
                inner.view.update(|v| {
                    v.user = Some(user);
                    v.loading = false;
                });
                true
            }
            Err(e) => {
                tracing::warn!(user_id, error = %e, "Failed to load user");
                inner.view.update(|v| v.loading = false);
                inner.events.toast(Notice::LoadUserFailed);
                false
            }
        }
    }

    /// Grant or revoke the admin flag.
    pub async fn set_admin(&self, user_id: &str, is_admin: bool) -> bool {
        let inner = &self.inner;
        tracing::info!(user_id, is_admin, "Changing admin flag");
        inner.view.update(|v| v.loading = true);

        match inner
            .api
            .update_user(user_id, &UserUpdate::admin(is_admin))
            .await
        {
            Ok(_) => {
                inner.view.update(|v| {
                    if let Some(user) = v.user.as_mut().filter(|u| u.id == user_id) {
                        user.is_admin = is_admin;
                    }
                    v.loading = false;
                });
                inner.events.toast(Notice::UserUpdated);
                inner.events.emit(UiEvent::OperationComplete);
                true
            }
            Err(e) => {
                tracing::warn!(user_id, error = %e, "Failed to update user");
                inner.view.update(|v| v.loading = false);
                inner.events.toast(Notice::UserUpdateFailed);
                false
            }
        }
    }
}
