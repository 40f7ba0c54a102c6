// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Lifetime of a view's background work.

use std::future::Future;

use tokio::task::JoinSet;

/// Tasks started on behalf of one view.
///
/// Dropping the scope aborts whatever is still running, so a request that
/// completes after the view is gone never publishes into it.
#[derive(Default)]
pub struct ViewScope {
    name: &'static str,
    tasks: JoinSet<()>,
}

impl ViewScope {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            tasks: JoinSet::new(),
        }
    }

    /// Fire-and-forget a holder operation.
    pub fn spawn<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.tasks.spawn(task);
    }

    /// Number of tasks not yet reaped.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Wait for every spawned task to finish.
    pub async fn join_all(&mut self) {
        while let Some(result) = self.tasks.join_next().await {
            if let Err(e) = result {
                if e.is_panic() {
                    tracing::error!(scope = self.name, error = %e, "View task panicked");
                }
            }
        }
    }

    /// Cancel all in-flight work now.
    pub fn cancel(&mut self) {
        if !self.tasks.is_empty() {
            tracing::debug!(scope = self.name, tasks = self.tasks.len(), "Cancelling view tasks");
        }
        self.tasks.abort_all();
    }
}

impl Drop for ViewScope {
    fn drop(&mut self) {
        self.cancel();
    }
}
