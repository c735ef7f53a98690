//! Analytics Route
//!
//! - GET /analytics - Totals and per-day conversion rates

use axum::{extract::State, response::Response, Extension};
use std::sync::Arc;

use crate::session::Identity;
use crate::shell::Route;
use crate::views::AnalyticsPage;
use crate::web::error::WebResult;
use crate::web::pages::{analytics_cards, render, AnalyticsTemplate, DayRowView};
use crate::web::routes::{load, respond};
use crate::web::state::AppState;

/// GET /analytics
pub async fn analytics(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
) -> WebResult<Response> {
    let api = Arc::clone(&state.api);
    let view = load(async move { api.list_analytics().await.map(AnalyticsPage::new) }).await;

    let shell = state.shell(Route::Analytics, &identity.email);
    respond(view, shell, Route::Analytics.path().to_string(), |page, shell| {
        render(&AnalyticsTemplate {
            shell,
            cards: analytics_cards(&page.totals()),
            rows: page.rows().into_iter().map(DayRowView::from).collect(),
        })
    })
}
