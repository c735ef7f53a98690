//! Route guard as axum middleware
//!
//! Layered onto every protected route. An authenticated request continues
//! with the [`Identity`](crate::session::Identity) inserted as a request
//! extension; handlers take it with `Extension<Identity>`.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use std::sync::Arc;

use crate::guard::{GuardDecision, RouteGuard};
use crate::web::pages::{render_with_status, CheckingPage};
use crate::web::state::AppState;

pub async fn require_session(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    match RouteGuard::new(&state.session).decide() {
        GuardDecision::Render(identity) => {
            req.extensions_mut().insert(identity);
            next.run(req).await
        }
        GuardDecision::Redirect(to) => {
            tracing::debug!(path = %req.uri().path(), "Not signed in, redirecting");
            Redirect::to(to).into_response()
        }
        GuardDecision::Placeholder => {
            render_with_status(StatusCode::SERVICE_UNAVAILABLE, &CheckingPage).into_response()
        }
    }
}
