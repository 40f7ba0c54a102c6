// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Screen state holders.
//!
//! A holder is a cheaply cloneable handle shared between a view and the tasks
//! working for it. The latest state is published on a `watch` channel; one-shot
//! events (toasts, navigation, completion) go out on the holder's event channel.

pub mod activity_editor;
pub mod admin;
pub mod board;
pub mod dashboard;
pub mod events;
pub mod group;
pub mod login;
pub mod notice;
pub mod scope;

pub use activity_editor::{ActivityEditorState, ActivityEditorView};
pub use admin::{AdminUsersState, AdminUsersView, EditUserState, EditUserView};
pub use board::{BoardState, BoardView, SwipeDirection};
pub use dashboard::{DashboardState, DashboardView};
pub use events::{event_channel, EventReceiver, EventSender, UiEvent};
pub use group::{GroupEditorState, GroupEditorView, GroupState, GroupView};
pub use login::LoginState;
pub use notice::Notice;
pub use scope::ViewScope;

use tokio::sync::watch;

/// Latest value of a holder's state, observable by any number of views.
#[derive(Debug)]
pub struct Published<T> {
    tx: watch::Sender<T>,
}

impl<T: Clone> Published<T> {
    pub fn new(initial: T) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx }
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }

    /// Copy of the current value.
    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }

    /// Read without cloning the whole state.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.tx.borrow())
    }

    /// Modify in place and notify subscribers. Works with no subscribers.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        self.tx.send_modify(f);
    }
}

impl<T: Clone + Default> Default for Published<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
