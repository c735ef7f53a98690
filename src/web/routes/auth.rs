//! Sign-in and Logout Routes
//!
//! - GET / - Sign-in page (public entry)
//! - POST /login - Submit credentials
//! - GET /logout - Logout confirmation (protected)
//! - POST /logout - Sign out

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Extension, Form,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::guard::{GuardState, RouteGuard, PUBLIC_ENTRY};
use crate::session::{Identity, SessionError};
use crate::shell::{safe_return_path, Confirmation, NavShell, Route};
use crate::web::error::WebResult;
use crate::web::pages::{render, render_with_status, CheckingPage, ConfirmTemplate, SignInPage};
use crate::web::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LogoutQuery {
    pub from: Option<String>,
}

fn sign_in(state: &AppState, email: &str, error: &str) -> SignInPage {
    SignInPage {
        theme_class: state.theme().css_class(),
        email: email.to_string(),
        error: error.to_string(),
    }
}

/// GET /
///
/// Signed-in visitors go straight to the dashboard.
pub async fn sign_in_page(State(state): State<Arc<AppState>>) -> WebResult<Response> {
    match RouteGuard::new(&state.session).state() {
        GuardState::Authenticated(_) => Ok(Redirect::to(Route::Dashboard.path()).into_response()),
        GuardState::Checking => render_with_status(StatusCode::SERVICE_UNAVAILABLE, &CheckingPage),
        GuardState::Unauthenticated => render(&sign_in(&state, "", "")),
    }
}

/// POST /login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Form(form): Form<LoginForm>,
) -> WebResult<Response> {
    match state.session.login(&form.email, &form.password).await {
        Ok(_) => Ok(Redirect::to(Route::Dashboard.path()).into_response()),
        Err(SessionError::InvalidCredentials) => render_with_status(
            StatusCode::UNAUTHORIZED,
            &sign_in(&state, &form.email, "Invalid email or password"),
        ),
        Err(e) => Err(e.into()),
    }
}

/// GET /logout
pub async fn confirm_logout(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Query(query): Query<LogoutQuery>,
) -> WebResult<Response> {
    let back = safe_return_path(query.from.as_deref(), Route::Dashboard);
    let active = Route::from_path(&back).unwrap_or(Route::Dashboard);

    let shell = NavShell::new(active, "Logout")
        .with_user(&identity.email)
        .with_theme(state.theme());

    render(&ConfirmTemplate {
        shell,
        confirm: Confirmation::logout(back),
    })
}

/// POST /logout
pub async fn logout(State(state): State<Arc<AppState>>) -> WebResult<Response> {
    state.session.logout()?;
    Ok(Redirect::to(PUBLIC_ENTRY).into_response())
}
