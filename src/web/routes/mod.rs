//! Web Routes
//!
//! Route handlers organized by page.

pub mod analytics;
pub mod auth;
pub mod dashboard;
pub mod health;
pub mod products;
pub mod theme;
pub mod users;

use axum::{http::StatusCode, response::Response};
use std::future::Future;

use crate::client::ApiResult;
use crate::shell::NavShell;
use crate::views::{ViewSlot, ViewState};
use crate::web::error::WebResult;
use crate::web::pages::{render_with_status, CheckingPage, FailedPage};

/// Run one page fetch in a view slot
///
/// The slot owns the fetch task, so a request dropped mid-flight (client
/// went away) aborts it.
pub(crate) async fn load<T, F>(fetch: F) -> ViewState<T>
where
    T: Clone + Send + 'static,
    F: Future<Output = ApiResult<T>> + Send + 'static,
{
    let mut slot = ViewSlot::new();
    slot.mount(fetch);
    slot.settled().await
}

/// Render READY through `ready`; FAILED becomes the retry page
pub(crate) fn respond<T>(
    state: ViewState<T>,
    shell: NavShell,
    retry_href: String,
    ready: impl FnOnce(T, NavShell) -> WebResult<Response>,
) -> WebResult<Response> {
    match state {
        ViewState::Ready(data) => ready(data, shell),
        ViewState::Failed(message) => render_with_status(
            StatusCode::BAD_GATEWAY,
            &FailedPage {
                shell,
                message,
                retry_href,
            },
        ),
        ViewState::Loading => render_with_status(StatusCode::SERVICE_UNAVAILABLE, &CheckingPage),
    }
}
