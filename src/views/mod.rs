//! Page Views
//!
//! Each page is a small state machine:
//!
//! ```text
//! LOADING ──► READY(data)
//!         └─► FAILED(message)
//! ```
//!
//! Every page surfaces a failed fetch as `Failed` (with a retry affordance in
//! the front end); none of them masks an error as an empty `Ready`.
//!
//! - **users**: search by name/email, status counts
//! - **products**: search + category filter, revenue/sales totals
//! - **analytics**: per-field totals and conversion rates
//! - **dashboard**: remote overview plus first-N slices
//! - **format**: number/money display helpers shared by the front ends

pub mod analytics;
pub mod dashboard;
pub mod format;
pub mod products;
pub mod users;

pub use analytics::{conversion_rate, AnalyticsPage, AnalyticsTotals, DayRow};
pub use dashboard::{DashboardPage, RECENT_USERS, TOP_PRODUCTS};
pub use products::{categories, filter_products, ProductTotals, ProductsPage, ALL_CATEGORIES};
pub use users::{filter_users, StatusCounts, UsersPage};

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::task::JoinHandle;

use crate::client::ApiResult;

/// Load state of one page
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> ViewState<T> {
    /// Map a fetch result onto the shared failure policy
    pub fn from_result(result: ApiResult<T>) -> Self {
        match result {
            Ok(data) => ViewState::Ready(data),
            Err(e) => {
                tracing::warn!(error = %e, "View fetch failed");
                ViewState::Failed(e.to_string())
            }
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ViewState<U> {
        match self {
            ViewState::Loading => ViewState::Loading,
            ViewState::Ready(data) => ViewState::Ready(f(data)),
            ViewState::Failed(message) => ViewState::Failed(message),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            ViewState::Ready(data) => Some(data),
            _ => None,
        }
    }
}

struct Slot<T> {
    generation: u64,
    state: ViewState<T>,
}

/// Holder of one mounted page's state
///
/// Each `mount` starts a new generation; a fetch only lands if its
/// generation is still current. Unmounting (or dropping the slot) aborts
/// the in-flight fetch.
pub struct ViewSlot<T> {
    shared: Arc<Mutex<Slot<T>>>,
    task: Option<JoinHandle<()>>,
}

fn lock<T>(shared: &Mutex<Slot<T>>) -> MutexGuard<'_, Slot<T>> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<T: Clone + Send + 'static> ViewSlot<T> {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Mutex::new(Slot {
                generation: 0,
                state: ViewState::Loading,
            })),
            task: None,
        }
    }

    /// Start loading; returns the generation of this mount
    pub fn mount<F>(&mut self, fetch: F) -> u64
    where
        F: Future<Output = ApiResult<T>> + Send + 'static,
    {
        self.abort_task();

        let generation = {
            let mut slot = lock(&self.shared);
            slot.generation += 1;
            slot.state = ViewState::Loading;
            slot.generation
        };

        let shared = Arc::clone(&self.shared);
        self.task = Some(tokio::spawn(async move {
            let result = fetch.await;
            deliver(&shared, generation, result);
        }));

        generation
    }

    /// Drop interest in any in-flight fetch
    pub fn unmount(&mut self) {
        self.abort_task();
        lock(&self.shared).generation += 1;
    }

    /// Record a fetch result for `generation`; stale results are discarded
    pub fn deliver(&self, generation: u64, result: ApiResult<T>) -> bool {
        deliver(&self.shared, generation, result)
    }

    pub fn state(&self) -> ViewState<T> {
        lock(&self.shared).state.clone()
    }

    pub fn generation(&self) -> u64 {
        lock(&self.shared).generation
    }

    /// Wait for the current fetch (if any) and return the resulting state
    pub async fn settled(&mut self) -> ViewState<T> {
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                if !e.is_cancelled() {
                    tracing::error!(error = %e, "View fetch task panicked");
                }
            }
        }
        self.state()
    }

    fn abort_task(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

fn deliver<T>(shared: &Mutex<Slot<T>>, generation: u64, result: ApiResult<T>) -> bool {
    let mut slot = lock(shared);
    if slot.generation != generation {
        tracing::debug!(
            stale = generation,
            current = slot.generation,
            "Discarding stale view result"
        );
        return false;
    }
    slot.state = ViewState::from_result(result);
    true
}

impl<T: Clone + Send + 'static> Default for ViewSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for ViewSlot<T> {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ApiError;
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn test_mount_resolves_ready() {
        let mut slot = ViewSlot::new();
        assert!(slot.state().is_loading());

        slot.mount(async { Ok(vec![1, 2, 3]) });
        assert_eq!(slot.settled().await, ViewState::Ready(vec![1, 2, 3]));
    }

    #[tokio::test]
    async fn test_mount_resolves_failed() {
        let mut slot: ViewSlot<Vec<u8>> = ViewSlot::new();

        slot.mount(async { Err(ApiError::Timeout) });
        assert_eq!(
            slot.settled().await,
            ViewState::Failed("Request timeout".to_string())
        );
    }

    #[tokio::test]
    async fn test_remount_discards_earlier_fetch() {
        let mut slot = ViewSlot::new();
        let (tx, rx) = oneshot::channel::<u32>();

        let first = slot.mount(async move { Ok(rx.await.unwrap_or(0)) });
        let second = slot.mount(async { Ok(2) });
        assert!(second > first);

        // The first fetch was aborted; releasing it changes nothing
        let _ = tx.send(1);
        assert_eq!(slot.settled().await, ViewState::Ready(2));
    }

    #[tokio::test]
    async fn test_stale_delivery_is_ignored() {
        let mut slot = ViewSlot::new();
        let stale = slot.mount(async { Ok("first") });
        slot.settled().await;

        slot.unmount();
        assert!(!slot.deliver(stale, Ok("late")));
        assert_eq!(slot.state(), ViewState::Ready("first"));

        assert!(slot.deliver(slot.generation(), Ok("current")));
        assert_eq!(slot.state(), ViewState::Ready("current"));
    }

    #[tokio::test]
    async fn test_unmount_aborts_pending_fetch() {
        let mut slot: ViewSlot<u32> = ViewSlot::new();
        slot.mount(std::future::pending());
        slot.unmount();

        assert!(slot.settled().await.is_loading());
    }

    #[test]
    fn test_view_state_map() {
        let state: ViewState<u32> = ViewState::Ready(2);
        assert_eq!(state.map(|n| n * 10), ViewState::Ready(20));

        let failed: ViewState<u32> = ViewState::Failed("x".to_string());
        assert_eq!(failed.map(|n| n * 10).ready(), None);
    }
}
