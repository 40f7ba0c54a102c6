// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Propose, edit and delete activities.

use std::sync::Arc;

use tokio::sync::watch;
use validator::Validate;

use super::events::{event_channel, EventReceiver, EventSender, UiEvent};
use super::{Notice, Published};
use crate::error::Result;
use crate::models::{Activity, ActivityProposal, ActivityUpdate};
use crate::services::ApiClient;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivityEditorView {
    pub loading: bool,
    /// Activity being edited, once loaded.
    pub activity: Option<Activity>,
}

#[derive(Clone)]
pub struct ActivityEditorState {
    inner: Arc<EditorInner>,
}

struct EditorInner {
    api: ApiClient,
    view: Published<ActivityEditorView>,
    events: EventSender,
}

impl ActivityEditorState {
    pub fn new(api: ApiClient) -> (Self, EventReceiver) {
        let (events, receiver) = event_channel("activity_editor");
        let state = Self {
            inner: Arc::new(EditorInner {
                api,
                view: Published::default(),
                events,
            }),
        };
        (state, receiver)
    }

    pub fn subscribe(&self) -> watch::Receiver<ActivityEditorView> {
        self.inner.view.subscribe()
    }

    pub fn snapshot(&self) -> ActivityEditorView {
        self.inner.view.get()
    }

    pub async fn load(&self, activity_id: i64) -> bool {
        let inner = &self.inner;
        inner.view.update(|v| v.loading = true);

        match inner.api.get_activity(activity_id).await {
            Ok(activity) => {
                inner.view.update(|v| {
                    v.activity = Some(activity);
                    v.loading = false;
                });
                true
            }
            Err(e) => {
                tracing::warn!(activity_id, error = %e, "Failed to load activity");
                inner.view.update(|v| v.loading = false);
                inner.events.toast(Notice::LoadActivityFailed);
                false
            }
        }
    }

    /// Propose a new activity. Admin proposals start approved, everyone
    /// else's go to the vote.
    pub async fn propose(&self, proposal: ActivityProposal) -> bool {
        if let Err(e) = proposal.validate() {
            tracing::debug!(error = %e, "Rejected activity proposal");
            self.inner.events.toast(Notice::InvalidForm);
            return false;
        }

        let activity = proposal.into_activity();
        tracing::info!(
            group_id = activity.group_id,
            creator_id = %activity.creator_id,
            status = %activity.status,
            "Proposing activity"
        );
        self.inner.view.update(|v| v.loading = true);
        let result = self.inner.api.create_activity(&activity).await;
        self.finish(result, Notice::ActivityProposed, Notice::ActivityProposeFailed)
    }

    pub async fn update(&self, activity_id: i64, update: &ActivityUpdate) -> bool {
        tracing::info!(activity_id, "Updating activity");
        self.inner.view.update(|v| v.loading = true);
        let result = self.inner.api.update_activity(activity_id, update).await;
        self.finish(result, Notice::ActivityUpdated, Notice::ActivityUpdateFailed)
    }

    pub async fn delete(&self, activity_id: i64) -> bool {
        tracing::info!(activity_id, "Deleting activity");
        self.inner.view.update(|v| v.loading = true);
        let result = self.inner.api.delete_activity(activity_id).await;
        let ok = self.finish(result, Notice::ActivityDeleted, Notice::ActivityDeleteFailed);
        if ok {
            self.inner.view.update(|v| v.activity = None);
        }
        ok
    }

    fn finish<T>(&self, result: Result<T>, done: Notice, failed: Notice) -> bool {
        let events = &self.inner.events;
        self.inner.view.update(|v| v.loading = false);
        match result {
            Ok(_) => {
                events.toast(done);
                events.emit(UiEvent::OperationComplete);
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Activity operation failed");
                events.toast(Notice::for_failure(&e, failed));
                false
            }
        }
    }
}
