//! User-facing notices (toasts).
//!
//! Failures are reported with one generic message per operation; transport
//! errors, error statuses and bad bodies are not told apart.

use std::fmt;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Notice {
    // Board
    LoadActivitiesFailed,
    StatusChangeFailed,
    VoteRecorded,
    VoteFailed,
    VoteUnavailable,
    VoteNotOpen,
    CompletionRecorded,
    CompletionFailed,

    // Group
    LoadUserFailed,
    LoadGroupFailed,
    EmptyInvitationCode,
    JoinSucceeded,
    JoinFailed,
    GroupCreated,
    GroupCreateFailed,
    GroupUpdated,
    GroupUpdateFailed,
    GroupDeleted,
    GroupDeleteFailed,

    // Activity editor
    LoadActivityFailed,
    ActivityProposed,
    ActivityProposeFailed,
    ActivityUpdated,
    ActivityUpdateFailed,
    ActivityDeleted,
    ActivityDeleteFailed,

    // Dashboard and admin
    DashboardLoadFailed,
    LoadUsersFailed,
    UserUpdated,
    UserUpdateFailed,

    // Login
    LoginRejected,
    LoginVerifyFailed,
    LoginRegisterFailed,

    InvalidForm,
}

impl Notice {
    pub fn message(&self) -> &'static str {
        match self {
            Notice::LoadActivitiesFailed => "No se pudieron cargar las actividades del grupo.",
            Notice::StatusChangeFailed => "No se pudo actualizar el estado de la actividad.",
            Notice::VoteRecorded => "Voto registrado.",
            Notice::VoteFailed => "No se pudo registrar el voto.",
            Notice::VoteUnavailable => "Ya has votado esta actividad.",
            Notice::VoteNotOpen => "Esta actividad no está abierta a votación.",
            Notice::CompletionRecorded => "¡Actividad completada!",
            Notice::CompletionFailed => "No se pudo registrar la actividad completada.",
            Notice::LoadUserFailed => "Error al obtener datos del usuario.",
            Notice::LoadGroupFailed => "Error al obtener datos del grupo.",
            Notice::EmptyInvitationCode => "El código no puede estar vacío.",
            Notice::JoinSucceeded => "¡Te has unido al grupo con éxito!",
            Notice::JoinFailed => {
                "No se pudo unir al grupo. Código inválido o error del servidor."
            }
            Notice::GroupCreated => "Grupo creado con éxito.",
            Notice::GroupCreateFailed => "Error al crear el grupo.",
            Notice::GroupUpdated => "Grupo actualizado con éxito.",
            Notice::GroupUpdateFailed => "Error al actualizar el grupo.",
            Notice::GroupDeleted => "Grupo eliminado.",
            Notice::GroupDeleteFailed => "Error al eliminar el grupo.",
            Notice::LoadActivityFailed => "Error al cargar la actividad.",
            Notice::ActivityProposed => "Actividad propuesta con éxito.",
            Notice::ActivityProposeFailed => "Error al proponer la actividad.",
            Notice::ActivityUpdated => "Actividad actualizada con éxito.",
            Notice::ActivityUpdateFailed => "Error al actualizar la actividad.",
            Notice::ActivityDeleted => "Actividad eliminada.",
            Notice::ActivityDeleteFailed => "Error al eliminar la actividad.",
            Notice::DashboardLoadFailed => "No se pudieron cargar tus puntuaciones.",
            Notice::LoadUsersFailed => "Error al cargar los usuarios.",
            Notice::UserUpdated => "Usuario actualizado con éxito.",
            Notice::UserUpdateFailed => "No se pudo actualizar el usuario.",
            Notice::LoginRejected => "No se pudo validar tu sesión.",
            Notice::LoginVerifyFailed => "Error al verificar el usuario.",
            Notice::LoginRegisterFailed => "Error al registrar el usuario.",
            Notice::InvalidForm => "Revisa los datos del formulario.",
        }
    }

    /// Notice for a failed operation: local validation problems get their own
    /// message, everything else the operation's generic one.
    pub fn for_failure(err: &AppError, operation: Notice) -> Notice {
        match err {
            AppError::Validation(_) => Notice::InvalidForm,
            _ => operation,
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}
