// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Completion records and votes.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{Activity, PartialUpdate};

/// A user's completion of an activity on a given date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityInstance {
    #[serde(rename = "idActUsu")]
    pub id: i64,
    #[serde(rename = "idAct")]
    pub activity_id: i64,
    #[serde(rename = "idUsu")]
    pub user_id: String,
    /// Server formatted, e.g. "Mon, 01 Jan 2024 10:00:00 GMT"
    #[serde(rename = "fechaCompletada", default)]
    pub completed_at: String,
    #[serde(rename = "comentario", default)]
    pub comment: Option<String>,
    #[serde(rename = "puntajeObtenido")]
    pub points_awarded: i64,
}

impl ActivityInstance {
    /// Creation payload awarding the activity's point value.
    pub fn for_activity(activity: &Activity, user_id: &str, comment: Option<&str>) -> Self {
        Self {
            id: 0,
            activity_id: activity.id,
            user_id: user_id.to_string(),
            completed_at: String::new(),
            comment: comment
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
            points_awarded: i64::from(activity.points),
        }
    }
}

/// Correction for `PUT /actividad_usuario/{id}`; only set fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Validate)]
pub struct CompletionUpdate {
    #[serde(rename = "comentario", skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 500))]
    pub comment: Option<String>,
    #[serde(rename = "puntajeObtenido", skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0))]
    pub points_awarded: Option<i64>,
}

impl CompletionUpdate {
    pub fn comment(comment: &str) -> Self {
        Self {
            comment: Some(comment.trim().to_string()),
            ..Self::default()
        }
    }
}

impl PartialUpdate for CompletionUpdate {
    fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A single approval or rejection of a pending activity.
///
/// Id and timestamp are assigned by the backend, which is also the only
/// guard against duplicate votes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vote {
    #[serde(rename = "idVoto")]
    pub id: i64,
    #[serde(rename = "idAct")]
    pub activity_id: i64,
    #[serde(rename = "idUsu")]
    pub user_id: String,
    #[serde(rename = "aprobado")]
    pub approve: bool,
    #[serde(rename = "fechaVoto", default)]
    pub cast_at: String,
}

impl Vote {
    pub fn new(activity_id: i64, user_id: &str, approve: bool) -> Self {
        Self {
            id: 0,
            activity_id,
            user_id: user_id.to_string(),
            approve,
            cast_at: String::new(),
        }
    }
}
