// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Robust: client for a shared-chores backend.
//!
//! Groups of users propose household activities, vote them onto a shared
//! board, move them through the workflow and earn points for completing them.
//! This crate provides the typed REST client, ID token verification and the
//! per-screen state holders driving a front end.

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod state;

pub use config::Config;
pub use error::{AppError, Result};
pub use services::ApiClient;
