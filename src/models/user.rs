//! User model and profile updates.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::PartialUpdate;

/// Display name used when the identity provider does not supply one.
pub const DEFAULT_DISPLAY_NAME: &str = "User";

/// User profile as stored by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Identity provider subject (also the backend key)
    #[serde(rename = "idUsu")]
    pub id: String,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "puntajeMes", default)]
    pub monthly_score: i64,
    #[serde(rename = "puntajeTotal", default)]
    pub total_score: i64,
    #[serde(rename = "fechaRegistro", default)]
    pub registered_at: String,
    #[serde(rename = "ultimaActividad", default)]
    pub last_activity_at: Option<String>,
    /// Avatar URL
    #[serde(rename = "imagen", default)]
    pub image: Option<String>,
    /// `None` while the user has not joined a group
    #[serde(rename = "idGru", default)]
    pub group_id: Option<i64>,
    #[serde(rename = "esAdmin", default)]
    pub is_admin: bool,
}

impl User {
    /// Record for a first login. Dates and scores are managed by the backend.
    pub fn new_member(id: &str, name: Option<&str>, image: Option<&str>) -> Self {
        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(DEFAULT_DISPLAY_NAME);

        Self {
            id: id.to_string(),
            name: name.to_string(),
            monthly_score: 0,
            total_score: 0,
            registered_at: String::new(),
            last_activity_at: None,
            image: image.map(str::to_string),
            group_id: None,
            is_admin: false,
        }
    }

    /// First word of the display name, for greetings.
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(DEFAULT_DISPLAY_NAME)
    }
}

/// Partial update for `PUT /usuario/{id}`.
///
/// Setting `invitation_code` asks the backend to resolve the code and move the
/// user into that group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Validate)]
pub struct UserUpdate {
    #[serde(rename = "nombre", skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[serde(rename = "imagen", skip_serializing_if = "Option::is_none")]
    #[validate(url)]
    pub image: Option<String>,
    #[serde(rename = "esAdmin", skip_serializing_if = "Option::is_none")]
    pub is_admin: Option<bool>,
    #[serde(rename = "codigo_invitacion", skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 64))]
    pub invitation_code: Option<String>,
}

impl UserUpdate {
    pub fn join_group(code: &str) -> Self {
        Self {
            invitation_code: Some(code.trim().to_string()),
            ..Self::default()
        }
    }

    pub fn admin(is_admin: bool) -> Self {
        Self {
            is_admin: Some(is_admin),
            ..Self::default()
        }
    }
}

impl PartialUpdate for UserUpdate {
    fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
