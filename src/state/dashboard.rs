//! Home dashboard: score chart, admin flag and navigation.

use std::sync::Arc;

use tokio::sync::watch;

use super::events::{event_channel, EventReceiver, EventSender, UiEvent};
use super::{Notice, Published};
use crate::models::ScoreChart;
use crate::services::ApiClient;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardView {
    pub loading: bool,
    pub chart: ScoreChart,
    /// Shows the admin entry point. Cosmetic only.
    pub is_admin: bool,
}

#[derive(Clone)]
pub struct DashboardState {
    inner: Arc<DashboardInner>,
}

struct DashboardInner {
    api: ApiClient,
    view: Published<DashboardView>,
    events: EventSender,
}

impl DashboardState {
    pub fn new(api: ApiClient) -> (Self, EventReceiver) {
        let (events, receiver) = event_channel("dashboard");
        let state = Self {
            inner: Arc::new(DashboardInner {
                api,
                view: Published::default(),
                events,
            }),
        };
        (state, receiver)
    }

    pub fn subscribe(&self) -> watch::Receiver<DashboardView> {
        self.inner.view.subscribe()
    }

    pub fn snapshot(&self) -> DashboardView {
        self.inner.view.get()
    }

    /// Fetch the user's completions and publish points per day.
    pub async fn load_scores(&self, user_id: &str) -> bool {
        let inner = &self.inner;
        inner.view.update(|v| v.loading = true);

        match inner.api.list_user_completions(user_id).await {
            Ok(records) => {
                let chart = ScoreChart::from_completions(&records);
                tracing::debug!(
                    user_id,
                    records = records.len(),
                    days = chart.days.len(),
                    total = chart.total(),
                    "Score chart built"
                );
                inner.view.update(|v| {
                    v.chart = chart;
                    v.loading = false;
                });
                true
            }
            Err(e) => {
                tracing::warn!(user_id, error = %e, "Failed to load completions");
                inner.view.update(|v| v.loading = false);
                inner.events.toast(Notice::DashboardLoadFailed);
                false
            }
        }
    }

    /// Look up whether the user is an admin. Failures leave the flag alone
    /// and are not shown.
    pub async fn check_admin(&self, user_id: &str) {
        match self.inner.api.get_user(user_id).await {
            Ok(user) => self.inner.view.update(|v| v.is_admin = user.is_admin),
            Err(e) => tracing::debug!(user_id, error = %e, "Admin check failed"),
        }
    }

    pub fn open_group(&self) {
        self.inner.events.emit(UiEvent::NavigateToGroup);
    }

    pub fn open_admin(&self) {
        self.inner.events.emit(UiEvent::NavigateToAdmin);
    }
}
