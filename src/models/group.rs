//! Group model.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::PartialUpdate;

/// A group of users sharing a set of activities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    #[serde(rename = "idGru")]
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion", default)]
    pub description: String,
    #[serde(rename = "fechaCreacion", default)]
    pub created_at: String,
    /// Join token handed out to new members
    #[serde(rename = "codigoInvitacion", default)]
    pub invitation_code: String,
    /// Creator user id; only the creator may edit or delete the group
    #[serde(rename = "creador")]
    pub creator_id: String,
    #[serde(rename = "imagen", default)]
    pub image: Option<String>,
}

impl Group {
    /// Creation payload. The backend assigns id, date and invitation code.
    pub fn draft(name: &str, description: &str, creator_id: &str) -> Self {
        Self {
            id: 0,
            name: name.trim().to_string(),
            description: description.trim().to_string(),
            created_at: String::new(),
            invitation_code: String::new(),
            creator_id: creator_id.to_string(),
            image: None,
        }
    }

    pub fn is_created_by(&self, user_id: &str) -> bool {
        self.creator_id == user_id
    }
}

/// Form data for creating a group.
#[derive(Debug, Clone, Validate)]
pub struct GroupForm {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 1000))]
    pub description: String,
}

/// Partial update for `PUT /grupo/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Validate)]
pub struct GroupUpdate {
    #[serde(rename = "nombre", skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[serde(rename = "descripcion", skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[serde(rename = "imagen", skip_serializing_if = "Option::is_none")]
    #[validate(url)]
    pub image: Option<String>,
}

impl PartialUpdate for GroupUpdate {
    fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
