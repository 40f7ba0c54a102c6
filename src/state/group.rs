//! Group screen and group editor.

use std::sync::Arc;

use tokio::sync::watch;
use validator::Validate;

use super::events::{event_channel, EventReceiver, EventSender, UiEvent};
use super::{Notice, Published};
use crate::models::{Group, GroupForm, GroupUpdate, User, UserUpdate};
use crate::services::ApiClient;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupView {
    pub loading: bool,
    pub user: Option<User>,
    /// `None` when the user has not joined a group (or it failed to load).
    pub group: Option<Group>,
    /// Current user created the group; drives the edit affordance.
    pub is_creator: bool,
}

/// The current user's group membership.
#[derive(Clone)]
pub struct GroupState {
    inner: Arc<GroupInner>,
}

struct GroupInner {
    api: ApiClient,
    view: Published<GroupView>,
    events: EventSender,
}

impl GroupState {
    pub fn new(api: ApiClient) -> (Self, EventReceiver) {
        let (events, receiver) = event_channel("group");
        let state = Self {
            inner: Arc::new(GroupInner {
                api,
                view: Published::default(),
                events,
            }),
        };
        (state, receiver)
    }

    pub fn subscribe(&self) -> watch::Receiver<GroupView> {
        self.inner.view.subscribe()
    }

    pub fn snapshot(&self) -> GroupView {
        self.inner.view.get()
    }

    /// Load the user and, if affiliated, their group.
    pub async fn load(&self, user_id: &str) -> bool {
        let inner = &self.inner;
        inner.view.update(|v| v.loading = true);

        let user = match inner.api.get_user(user_id).await {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!(user_id, error = %e, "Failed to load user");
                inner.view.update(|v| v.loading = false);
                inner.events.toast(Notice::LoadUserFailed);
                return false;
            }
        };

        let Some(group_id) = user.group_id else {
            tracing::debug!(user_id, "User has no group");
            inner.view.update(|v| {
                v.user = Some(user);
                v.group = None;
                v.is_creator = false;
                v.loading = false;
            });
            return true;
        };

        match inner.api.get_group(group_id).await {
            Ok(group) => {
                let is_creator = group.is_created_by(&user.id);
                inner.view.update(|v| {
                    v.user = Some(user);
                    v.group = Some(group);
                    v.is_creator = is_creator;
                    v.loading = false;
                });
                true
            }
            Err(e) => {
                tracing::warn!(user_id, group_id, error = %e, "Failed to load group");
                inner.view.update(|v| {
                    v.user = Some(user);
                    v.group = None;
                    v.is_creator = false;
                    v.loading = false;
                });
                inner.events.toast(Notice::LoadGroupFailed);
                false
            }
        }
    }

    /// Join a group with an invitation code, then reload.
    pub async fn join(&self, user_id: &str, code: &str) -> bool {
        let inner = &self.inner;
        if code.trim().is_empty() {
            inner.events.toast(Notice::EmptyInvitationCode);
            return false;
        }

        tracing::info!(user_id, "Joining group");
        inner.view.update(|v| v.loading = true);

        match inner
            .api
            .update_user(user_id, &UserUpdate::join_group(code))
            .await
        {
            Ok(_) => {
                inner.events.toast(Notice::JoinSucceeded);
                inner.events.emit(UiEvent::JoinSucceeded);
                self.load(user_id).await;
                true
            }
            Err(e) => {
                // Unknown code and server failure look the same to the user.
                tracing::warn!(user_id, error = %e, "Join failed");
                inner.view.update(|v| v.loading = false);
                inner.events.toast(Notice::JoinFailed);
                false
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupEditorView {
    pub loading: bool,
    pub group: Option<Group>,
}

/// Create, edit or delete a group.
#[derive(Clone)]
pub struct GroupEditorState {
    inner: Arc<GroupEditorInner>,
}

struct GroupEditorInner {
    api: ApiClient,
    view: Published<GroupEditorView>,
    events: EventSender,
}

impl GroupEditorState {
    pub fn new(api: ApiClient) -> (Self, EventReceiver) {
        let (events, receiver) = event_channel("group_editor");
        let state = Self {
            inner: Arc::new(GroupEditorInner {
                api,
                view: Published::default(),
                events,
            }),
        };
        (state, receiver)
    }

    pub fn subscribe(&self) -> watch::Receiver<GroupEditorView> {
        self.inner.view.subscribe()
    }

    pub fn snapshot(&self) -> GroupEditorView {
        self.inner.view.get()
    }

    pub async fn load(&self, group_id: i64) -> bool {
        let inner = &self.inner;
        inner.view.update(|v| v.loading = true);

        match inner.api.get_group(group_id).await {
            Ok(group) => {
                inner.view.update(|v| {
                    v.group = Some(group);
                    v.loading = false;
                });
                true
            }
            Err(e) => {
                tracing::warn!(group_id, error = %e, "Failed to load group");
                inner.view.update(|v| v.loading = false);
                inner.events.toast(Notice::LoadGroupFailed);
                false
            }
        }
    }

    pub async fn create(&self, form: GroupForm, creator_id: &str) -> bool {
        let form = GroupForm {
            name: form.name.trim().to_string(),
            description: form.description.trim().to_string(),
        };
        if let Err(e) = form.validate() {
            tracing::debug!(error = %e, "Rejected group form");
            self.inner.events.toast(Notice::InvalidForm);
            return false;
        }

        tracing::info!(creator_id, name = %form.name, "Creating group");
        self.inner.view.update(|v| v.loading = true);
        let group = Group::draft(&form.name, &form.description, creator_id);
        self.finish(
            self.inner.api.create_group(&group).await,
            Notice::GroupCreated,
            Notice::GroupCreateFailed,
        )
    }

    pub async fn update(&self, group_id: i64, update: &GroupUpdate) -> bool {
        tracing::info!(group_id, "Updating group");
        self.inner.view.update(|v| v.loading = true);
        self.finish(
            self.inner.api.update_group(group_id, update).await,
            Notice::GroupUpdated,
            Notice::GroupUpdateFailed,
        )
    }

    pub async fn delete(&self, group_id: i64) -> bool {
        tracing::info!(group_id, "Deleting group");
        self.inner.view.update(|v| v.loading = true);
        let ok = self.finish(
            self.inner.api.delete_group(group_id).await,
            Notice::GroupDeleted,
            Notice::GroupDeleteFailed,
        );
        if ok {
            self.inner.view.update(|v| v.group = None);
        }
        ok
    }

    fn finish<T>(&self, result: crate::error::Result<T>, done: Notice, failed: Notice) -> bool {
        let events = &self.inner.events;
        self.inner.view.update(|v| v.loading = false);
        match result {
            Ok(_) => {
                events.toast(done);
                events.emit(UiEvent::OperationComplete);
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Group operation failed");
                events.toast(Notice::for_failure(&e, failed));
                false
            }
        }
    }
}
