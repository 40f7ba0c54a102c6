// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Group activity board: the flat activity list split into status columns.

use serde::Serialize;

use super::{Activity, ActivityStatus};

/// Activities of one group bucketed by status.
///
/// Each bucket keeps the order in which the backend returned the records.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ActivityBoard {
    /// "pendiente": open for voting
    pub pending: Vec<Activity>,
    /// "aprobada"
    pub todo: Vec<Activity>,
    /// "en_progreso"
    pub in_progress: Vec<Activity>,
    /// "hecha"
    pub done: Vec<Activity>,
}

impl ActivityBoard {
    /// Partition activities by status.
    ///
    /// Records with any other status (rejected, or vocabulary the client does
    /// not know yet) are dropped without error.
    pub fn partition(activities: impl IntoIterator<Item = Activity>) -> Self {
        let mut board = Self::default();
        let mut dropped = 0usize;

        for activity in activities {
            match board.bucket_mut(&activity.status) {
                Some(bucket) => bucket.push(activity),
                None => dropped += 1,
            }
        }

        if dropped > 0 {
            tracing::debug!(dropped, "Skipped activities outside the board statuses");
        }

        board
    }

    /// Bucket for a status, `None` for statuses that are not on the board.
    pub fn bucket(&self, status: &ActivityStatus) -> Option<&[Activity]> {
        match status {
            ActivityStatus::Pending => Some(&self.pending),
            ActivityStatus::Approved => Some(&self.todo),
            ActivityStatus::InProgress => Some(&self.in_progress),
            ActivityStatus::Done => Some(&self.done),
            _ => None,
        }
    }

    fn bucket_mut(&mut self, status: &ActivityStatus) -> Option<&mut Vec<Activity>> {
        match status {
            ActivityStatus::Pending => Some(&mut self.pending),
            ActivityStatus::Approved => Some(&mut self.todo),
            ActivityStatus::InProgress => Some(&mut self.in_progress),
            ActivityStatus::Done => Some(&mut self.done),
            _ => None,
        }
    }

    /// Find an activity in any bucket.
    pub fn find(&self, activity_id: i64) -> Option<&Activity> {
        self.iter().find(|a| a.id == activity_id)
    }

    /// All activities, bucket by bucket.
    pub fn iter(&self) -> impl Iterator<Item = &Activity> {
        self.pending
            .iter()
            .chain(&self.todo)
            .chain(&self.in_progress)
            .chain(&self.done)
    }

    pub fn len(&self) -> usize {
        self.pending.len() + self.todo.len() + self.in_progress.len() + self.done.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Move a card to another column locally (optimistic UI update).
    ///
    /// The card is appended to the target column. Returns `false` when the
    /// activity is unknown or the target is not a board column.
    pub fn move_to(&mut self, activity_id: i64, target: &ActivityStatus) -> bool {
        if self.bucket(target).is_none() {
            return false;
        }

        let Some(mut activity) = self.take(activity_id) else {
            return false;
        };
        activity.status = target.clone();
        if let Some(bucket) = self.bucket_mut(target) {
            bucket.push(activity);
        }
        true
    }

    fn take(&mut self, activity_id: i64) -> Option<Activity> {
        for bucket in [
            &mut self.pending,
            &mut self.todo,
            &mut self.in_progress,
            &mut self.done,
        ] {
            if let Some(pos) = bucket.iter().position(|a| a.id == activity_id) {
                return Some(bucket.remove(pos));
            }
        }
        None
    }
}
