//! Theme Route
//!
//! - POST /theme - Flip light/dark and go back

use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::preferences::Theme;
use crate::shell::{safe_return_path, Route};
use crate::web::error::WebResult;
use crate::web::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ThemeForm {
    pub next: Option<String>,
}

/// POST /theme
pub async fn toggle_theme(
    State(state): State<Arc<AppState>>,
    Form(form): Form<ThemeForm>,
) -> WebResult<Response> {
    Theme::toggle(state.store.as_ref())?;

    let target = if state.session.current().is_authenticated() {
        safe_return_path(form.next.as_deref(), Route::Dashboard)
    } else {
        crate::guard::PUBLIC_ENTRY.to_string()
    };
    Ok(Redirect::to(&target).into_response())
}
