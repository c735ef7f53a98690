//! Web Front End
//!
//! Server-rendered admin pages, built with Axum and askama.
//!
//! # Routes
//!
//! ## Public
//! - `GET /` - Sign-in page
//! - `POST /login` - Submit credentials
//! - `POST /theme` - Toggle light/dark
//! - `GET /health` - Process status
//!
//! ## Protected (behind the route guard)
//! - `GET /dashboard` - Overview
//! - `GET /users?q=` - Users, `POST /users` - Add a user
//! - `GET /analytics` - Analytics
//! - `GET /products?q=&category=` - Products, `GET /products/:id` - One product
//! - `GET /logout` - Confirm, `POST /logout` - Sign out
//!
//! One server holds one session: this is a single-operator dashboard, the
//! server-side counterpart of a browser's local storage.

pub mod error;
pub mod guard;
pub mod pages;
pub mod routes;
pub mod state;

pub use error::{WebError, WebResult};
pub use state::AppState;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Build the router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let shared_state = Arc::new(state);

    let public_routes = Router::new()
        .route("/", get(routes::auth::sign_in_page))
        .route("/login", post(routes::auth::login))
        .route("/theme", post(routes::theme::toggle_theme))
        .route("/health", get(routes::health::health));

    let protected_routes = Router::new()
        .route("/dashboard", get(routes::dashboard::dashboard))
        .route(
            "/users",
            get(routes::users::list_users).post(routes::users::create_user),
        )
        .route("/analytics", get(routes::analytics::analytics))
        .route("/products", get(routes::products::list_products))
        .route("/products/:id", get(routes::products::product_detail))
        .route(
            "/logout",
            get(routes::auth::confirm_logout).post(routes::auth::logout),
        )
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&shared_state),
            guard::require_session,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(shared_state)
}

/// Start the web server
pub async fn serve(state: AppState, addr: &str) -> Result<(), WebError> {
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("admin-dash listening on http://{}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| WebError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("admin-dash shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
