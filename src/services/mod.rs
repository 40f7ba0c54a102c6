// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - remote collaborators.

pub mod api;
pub mod identity;

pub use api::{ApiClient, ApiMessage};
pub use identity::{IdTokenVerifier, IdentityError, VerifiedIdentity};
