// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models mirroring the backend schema.

pub mod activity;
pub mod board;
pub mod completion;
pub mod group;
pub mod stats;
pub mod user;

pub use activity::{Activity, ActivityProposal, ActivityStatus, ActivityUpdate};
pub use board::ActivityBoard;
pub use completion::{ActivityInstance, CompletionUpdate, Vote};
pub use group::{Group, GroupForm, GroupUpdate};
pub use stats::ScoreChart;
pub use user::{User, UserUpdate};

use crate::error::{AppError, Result};
use serde::Serialize;
use validator::Validate;

/// A `PUT` payload that carries only the fields being changed.
pub trait PartialUpdate: Serialize + Validate {
    /// True when no field is set.
    fn is_empty(&self) -> bool;

    /// Reject empty or invalid updates before they are serialized.
    fn validated(&self) -> Result<&Self> {
        if self.is_empty() {
            return Err(AppError::Validation("update has no fields set".to_string()));
        }
        self.validate()?;
        Ok(self)
    }
}
