//! Dashboard Route
//!
//! - GET /dashboard - Overview cards, recent users, top products

use axum::{extract::State, response::Response, Extension};
use std::sync::Arc;

use crate::session::Identity;
use crate::shell::Route;
use crate::views::format::{format_count, format_money, format_percent};
use crate::views::DashboardPage;
use crate::web::error::WebResult;
use crate::web::pages::{render, DashboardTemplate, ProductRow, StatCard, UserRow};
use crate::web::routes::{load, respond};
use crate::web::state::AppState;

/// GET /dashboard
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
) -> WebResult<Response> {
    let api = Arc::clone(&state.api);
    let view = load(async move { api.get_dashboard_overview().await.map(DashboardPage::new) }).await;

    let shell = state.shell(Route::Dashboard, &identity.email);
    respond(view, shell, Route::Dashboard.path().to_string(), |page, shell| {
        let overview = page.overview();
        render(&DashboardTemplate {
            shell,
            cards: vec![
                StatCard::new("Total Users", format_count(overview.total_users)),
                StatCard::new("Active Users", format_count(overview.active_users)),
                StatCard::new("Revenue", format_money(overview.revenue)),
                StatCard::new("Growth", format_percent(overview.growth)),
            ],
            recent_users: page.recent_users().iter().map(UserRow::from).collect(),
            top_products: page.top_products().iter().map(ProductRow::from).collect(),
        })
    })
}
