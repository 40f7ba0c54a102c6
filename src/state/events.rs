// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! One-shot UI events.
//!
//! Each state holder owns the sending half of an unbounded channel; the view
//! that created the holder owns the receiving half. An event is delivered to
//! that receiver exactly once and there is nothing to reset after reading.

use tokio::sync::mpsc;

use super::Notice;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// Show a transient message.
    Toast(Notice),
    /// A create/update/delete finished; the editing view can close.
    OperationComplete,
    /// The user joined a group.
    JoinSucceeded,
    /// The signed-in user exists in the backend.
    LoginComplete,
    NavigateToGroup,
    NavigateToAdmin,
}

/// Sending half, cloned into every task a holder spawns.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: mpsc::UnboundedSender<UiEvent>,
    source: &'static str,
}

/// Receiving half, owned by the view.
#[derive(Debug)]
pub struct EventReceiver {
    rx: mpsc::UnboundedReceiver<UiEvent>,
}

/// Create an event channel for the holder named `source` (used in logs).
pub fn event_channel(source: &'static str) -> (EventSender, EventReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (EventSender { tx, source }, EventReceiver { rx })
}

impl EventSender {
    pub fn emit(&self, event: UiEvent) {
        tracing::debug!(source = self.source, event = ?event, "UI event");
        if self.tx.send(event).is_err() {
            // View is gone; late results are dropped.
            tracing::debug!(source = self.source, "Event receiver closed, dropping event");
        }
    }

    pub fn toast(&self, notice: Notice) {
        self.emit(UiEvent::Toast(notice));
    }
}

impl EventReceiver {
    /// Wait for the next event. `None` once every sender is gone.
    pub async fn recv(&mut self) -> Option<UiEvent> {
        self.rx.recv().await
    }

    /// Next event if one is already queued.
    pub fn try_recv(&mut self) -> Option<UiEvent> {
        self.rx.try_recv().ok()
    }

    /// Everything queued so far, in emission order.
    pub fn drain(&mut self) -> Vec<UiEvent> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }
}
