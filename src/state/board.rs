// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Group activity board: status columns, transitions, voting and completions.

use std::sync::Arc;

use tokio::sync::watch;

use super::events::{event_channel, EventReceiver, EventSender};
use super::{Notice, Published};
use crate::models::{ActivityBoard, ActivityInstance, ActivityStatus, ActivityUpdate, Vote};
use crate::services::ApiClient;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardView {
    pub loading: bool,
    /// Set once the first fetch succeeded.
    pub loaded: bool,
    pub board: ActivityBoard,
}

/// Direction of a swipe on a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    /// aprobada → en_progreso → hecha
    Forward,
    Back,
}

/// Board holder for one group, acting as one user.
#[derive(Clone)]
pub struct BoardState {
    inner: Arc<BoardInner>,
}

struct BoardInner {
    api: ApiClient,
    group_id: i64,
    user_id: String,
    view: Published<BoardView>,
    events: EventSender,
}

impl BoardState {
    pub fn new(api: ApiClient, group_id: i64, user_id: &str) -> (Self, EventReceiver) {
        let (events, receiver) = event_channel("board");
        let state = Self {
            inner: Arc::new(BoardInner {
                api,
                group_id,
                user_id: user_id.to_string(),
                view: Published::default(),
                events,
            }),
        };
        (state, receiver)
    }

    pub fn group_id(&self) -> i64 {
        self.inner.group_id
    }

    pub fn subscribe(&self) -> watch::Receiver<BoardView> {
        self.inner.view.subscribe()
    }

    pub fn snapshot(&self) -> BoardView {
        self.inner.view.get()
    }

    /// Fetch the group's activities and republish the columns.
    ///
    /// On failure the previous board stays published. Returns whether the
    /// fetch succeeded.
    pub async fn refresh(&self) -> bool {
        let inner = &self.inner;
        inner.view.update(|v| v.loading = true);

        match inner.api.list_group_activities(inner.group_id).await {
            Ok(activities) => {
                let board = ActivityBoard::partition(activities);
                tracing::debug!(
                    group_id = inner.group_id,
                    pending = board.pending.len(),
                    todo = board.todo.len(),
                    in_progress = board.in_progress.len(),
                    done = board.done.len(),
                    "Board refreshed"
                );
                inner.view.update(|v| {
                    v.board = board;
                    v.loaded = true;
                    v.loading = false;
                });
                true
            }
            Err(e) => {
                tracing::warn!(group_id = inner.group_id, error = %e, "Failed to load group activities");
                inner.view.update(|v| v.loading = false);
                inner.events.toast(Notice::LoadActivitiesFailed);
                false
            }
        }
    }

    /// Ask the backend to move an activity to `target`.
    ///
    /// The board is re-fetched afterwards whether or not the request
    /// succeeded, which also reverts any optimistic move.
    pub async fn move_activity(&self, activity_id: i64, target: ActivityStatus) -> bool {
        self.change_status(activity_id, target).await.0
    }

    /// Statuses the card can be moved to from its current column.
    pub fn offered_moves(&self, activity_id: i64) -> Vec<ActivityStatus> {
        self.inner.view.with(|v| {
            let Some(activity) = v.board.find(activity_id) else {
                return Vec::new();
            };
            [
                ActivityStatus::Approved,
                ActivityStatus::InProgress,
                ActivityStatus::Done,
            ]
            .into_iter()
            .filter(|target| activity.status.can_transition_to(target))
            .collect()
        })
    }

    /// Returns whether the backend accepted the change and whether the
    /// follow-up refresh succeeded.
    async fn change_status(&self, activity_id: i64, target: ActivityStatus) -> (bool, bool) {
        let inner = &self.inner;
        tracing::info!(
            group_id = inner.group_id,
            activity_id,
            target = %target,
            "Changing activity status"
        );
        inner.view.update(|v| v.loading = true);

        let update = ActivityUpdate::status(target);
        let ok = match inner.api.update_activity(activity_id, &update).await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(activity_id, error = %e, "Status change failed");
                inner
                    .events
                    .toast(Notice::for_failure(&e, Notice::StatusChangeFailed));
                false
            }
        };

        let refreshed = self.refresh().await;
        (ok, refreshed)
    }

    /// Move a card one column along the workflow, optimistically.
    ///
    /// Swiping past either end of the workflow, or on a card that is not on
    /// the board, does nothing. If the backend refuses the move and the board
    /// cannot be re-fetched either, the card goes back where it was.
    pub async fn swipe(&self, activity_id: i64, direction: SwipeDirection) -> bool {
        let inner = &self.inner;
        let current = inner
            .view
            .with(|v| v.board.find(activity_id).map(|a| a.status.clone()));
        let Some(current) = current else {
            tracing::debug!(activity_id, "Swipe on unknown activity ignored");
            return false;
        };

        let target = match direction {
            SwipeDirection::Forward => current.next(),
            SwipeDirection::Back => current.previous(),
        };
        let Some(target) = target else {
            tracing::debug!(activity_id, status = %current, ?direction, "Swipe past end of workflow ignored");
            return false;
        };

        let previous = inner.view.with(|v| v.board.clone());
        inner.view.update(|v| {
            v.board.move_to(activity_id, &target);
        });

        let (ok, refreshed) = self.change_status(activity_id, target).await;
        if !ok && !refreshed {
            tracing::debug!(activity_id, status = %current, "Reverting optimistic move");
            inner.view.update(|v| v.board = previous);
        }
        ok
    }

    /// Cast the current user's vote on a pending activity.
    ///
    /// Nothing is sent when the activity is not on the board, is no longer
    /// pending, or already carries this user's vote.
    pub async fn vote(&self, activity_id: i64, approve: bool) -> bool {
        let inner = &self.inner;
        let refusal = inner.view.with(|v| match v.board.find(activity_id) {
            Some(activity) if activity.can_vote() => None,
            Some(activity) if activity.status == ActivityStatus::Pending => {
                Some(Notice::VoteUnavailable)
            }
            _ => Some(Notice::VoteNotOpen),
        });
        if let Some(notice) = refusal {
            tracing::info!(activity_id, user_id = %inner.user_id, "Vote not offered, skipping");
            inner.events.toast(notice);
            return false;
        }

        tracing::info!(activity_id, user_id = %inner.user_id, approve, "Submitting vote");
        inner.view.update(|v| v.loading = true);

        let vote = Vote::new(activity_id, &inner.user_id, approve);
        let ok = match inner.api.submit_vote(&vote).await {
            Ok(_) => {
                inner.events.toast(Notice::VoteRecorded);
                true
            }
            Err(e) => {
                tracing::warn!(activity_id, error = %e, "Vote submission failed");
                inner.events.toast(Notice::for_failure(&e, Notice::VoteFailed));
                false
            }
        };

        // Tally and status may have changed server side.
        self.refresh().await;
        ok
    }

    /// Record that the current user completed an activity on the board.
    pub async fn record_completion(&self, activity_id: i64, comment: Option<&str>) -> bool {
        let inner = &self.inner;
        let record = inner.view.with(|v| {
            v.board
                .find(activity_id)
                .map(|activity| ActivityInstance::for_activity(activity, &inner.user_id, comment))
        });
        let Some(record) = record else {
            tracing::info!(activity_id, "Completion for activity not on the board");
            inner.events.toast(Notice::CompletionFailed);
            return false;
        };

        tracing::info!(
            activity_id,
            user_id = %inner.user_id,
            points = record.points_awarded,
            "Recording completion"
        );
        inner.view.update(|v| v.loading = true);

        let ok = match inner.api.create_completion(&record).await {
            Ok(_) => {
                inner.events.toast(Notice::CompletionRecorded);
                true
            }
            Err(e) => {
                tracing::warn!(activity_id, error = %e, "Recording completion failed");
                inner
                    .events
                    .toast(Notice::for_failure(&e, Notice::CompletionFailed));
                false
            }
        };

        self.refresh().await;
        ok
    }
}
