// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity model, status lifecycle and the typed write payloads.

use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

use super::PartialUpdate;

/// Point value the backend uses as a base for newly proposed activities.
pub const DEFAULT_ACTIVITY_POINTS: i32 = 100;

/// Lifecycle status of an activity as reported by the backend.
///
/// Unrecognized strings are preserved verbatim so they round-trip, but they
/// never land on the board.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActivityStatus {
    /// Proposed, waiting for votes ("pendiente")
    Pending,
    /// Approved, not started ("aprobada")
    Approved,
    /// Being worked on ("en_progreso")
    InProgress,
    /// Completed ("hecha")
    Done,
    /// Voted down ("rechazada")
    Rejected,
    Unknown(String),
}

impl ActivityStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ActivityStatus::Pending => "pendiente",
            ActivityStatus::Approved => "aprobada",
            ActivityStatus::InProgress => "en_progreso",
            ActivityStatus::Done => "hecha",
            ActivityStatus::Rejected => "rechazada",
            ActivityStatus::Unknown(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, ActivityStatus::Unknown(_))
    }

    /// Whether the lifecycle allows moving from `self` to `target`.
    ///
    /// Pending activities are resolved by votes (server side); the three
    /// board columns can be moved between freely, including undo moves.
    pub fn can_transition_to(&self, target: &ActivityStatus) -> bool {
        use ActivityStatus::*;
        match (self, target) {
            (Pending, Approved) | (Pending, Rejected) => true,
            (a, b) if a == b => false,
            (Approved | InProgress | Done, Approved | InProgress | Done) => true,
            _ => false,
        }
    }

    /// Column to the right on the board.
    pub fn next(&self) -> Option<ActivityStatus> {
        match self {
            ActivityStatus::Approved => Some(ActivityStatus::InProgress),
            ActivityStatus::InProgress => Some(ActivityStatus::Done),
            _ => None,
        }
    }

    /// Column to the left on the board.
    pub fn previous(&self) -> Option<ActivityStatus> {
        match self {
            ActivityStatus::Done => Some(ActivityStatus::InProgress),
            ActivityStatus::InProgress => Some(ActivityStatus::Approved),
            _ => None,
        }
    }
}

impl From<String> for ActivityStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "pendiente" => ActivityStatus::Pending,
            "aprobada" => ActivityStatus::Approved,
            "en_progreso" => ActivityStatus::InProgress,
            "hecha" => ActivityStatus::Done,
            "rechazada" => ActivityStatus::Rejected,
            _ => ActivityStatus::Unknown(raw),
        }
    }
}

impl From<&str> for ActivityStatus {
    fn from(raw: &str) -> Self {
        ActivityStatus::from(raw.to_string())
    }
}

impl From<ActivityStatus> for String {
    fn from(status: ActivityStatus) -> Self {
        match status {
            ActivityStatus::Unknown(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ActivityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An activity (chore) belonging to a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    #[serde(rename = "idAct")]
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion", default)]
    pub description: String,
    /// Free-form label such as "diaria" or "semanal"
    #[serde(rename = "frecuencia", default)]
    pub frequency: String,
    /// 1-5
    #[serde(rename = "dificultad")]
    pub difficulty: i32,
    /// 1-5
    #[serde(rename = "desagradable")]
    pub unpleasantness: i32,
    #[serde(rename = "puntaje")]
    pub points: i32,
    #[serde(rename = "idGru")]
    pub group_id: i64,
    #[serde(rename = "fCreacion", default)]
    pub created_at: String,
    #[serde(rename = "creador")]
    pub creator_id: String,
    #[serde(rename = "estado")]
    pub status: ActivityStatus,

    // Voting fields, computed by the backend for the requesting user.
    #[serde(
        rename = "votos_a_favor",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub favorable_votes: Option<u32>,
    #[serde(
        rename = "total_miembros_grupo",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub eligible_voters: Option<u32>,
    #[serde(
        rename = "ha_votado_usuario",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub user_has_voted: Option<bool>,
}

impl Activity {
    /// Favorable votes and eligible voters, as reported by the server.
    pub fn vote_tally(&self) -> (u32, u32) {
        (
            self.favorable_votes.unwrap_or(0),
            self.eligible_voters.unwrap_or(0),
        )
    }

    pub fn has_voted(&self) -> bool {
        self.user_has_voted.unwrap_or(false)
    }

    /// Vote controls are only offered on pending activities the current
    /// user has not voted on yet.
    pub fn can_vote(&self) -> bool {
        self.status == ActivityStatus::Pending && !self.has_voted()
    }
}

/// Form data for proposing a new activity.
#[derive(Debug, Clone, Validate)]
pub struct ActivityProposal {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 1000))]
    pub description: String,
    #[validate(length(min = 1, max = 50))]
    pub frequency: String,
    #[validate(range(min = 1, max = 5))]
    pub difficulty: i32,
    #[validate(range(min = 1, max = 5))]
    pub unpleasantness: i32,
    pub group_id: i64,
    #[validate(length(min = 1))]
    pub creator_id: String,
    /// Admin proposals skip the vote and start approved.
    pub creator_is_admin: bool,
}

impl ActivityProposal {
    /// Build the creation payload. Id, creation date and final point value
    /// are assigned by the backend.
    pub fn into_activity(self) -> Activity {
        let status = if self.creator_is_admin {
            ActivityStatus::Approved
        } else {
            ActivityStatus::Pending
        };

        Activity {
            id: 0,
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            frequency: self.frequency.trim().to_string(),
            difficulty: self.difficulty,
            unpleasantness: self.unpleasantness,
            points: DEFAULT_ACTIVITY_POINTS,
            group_id: self.group_id,
            created_at: String::new(),
            creator_id: self.creator_id,
            status,
            favorable_votes: None,
            eligible_voters: None,
            user_has_voted: None,
        }
    }
}

/// Partial update for `PUT /actividad/{id}`; only set fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Validate)]
pub struct ActivityUpdate {
    #[serde(rename = "nombre", skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[serde(rename = "descripcion", skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[serde(rename = "frecuencia", skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 50))]
    pub frequency: Option<String>,
    #[serde(rename = "dificultad", skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, max = 5))]
    pub difficulty: Option<i32>,
    #[serde(rename = "desagradable", skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, max = 5))]
    pub unpleasantness: Option<i32>,
    #[serde(rename = "puntaje", skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0))]
    pub points: Option<i32>,
    #[serde(rename = "estado", skip_serializing_if = "Option::is_none")]
    pub status: Option<ActivityStatus>,
}

impl ActivityUpdate {
    /// Update carrying only a status change.
    pub fn status(status: ActivityStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

impl PartialUpdate for ActivityUpdate {
    fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
