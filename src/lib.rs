//! # admin-dash
//!
//! Admin dashboard over a remote users/products/analytics API, with a
//! server-rendered web front end and a terminal client sharing one core.
//!
//! ## Features
//!
//! - **Session store**: remote login with an offline fallback allow-list,
//!   persisted atomically in a key-value store
//! - **Route guard**: protected pages wait for the session check, then
//!   render or redirect to the sign-in page
//! - **Page views**: load/ready/failed state per page, stale fetches discarded
//! - **Local user cache**: users the remote refuses to create are kept locally
//!
//! ## Modules
//!
//! - [`storage`]: Key-value store with atomic batches (memory and JSON file)
//! - [`client`]: Remote API client behind the [`DashboardApi`] trait
//! - [`session`]: Session store and fallback login
//! - [`guard`]: Route guard state machine
//! - [`views`]: Per-page derived values and the view slot
//! - [`web`]: Axum front end
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use admin_dash::{ApiClient, Config, FileStore, SessionStore};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load_default(None)?;
//!     let store = Arc::new(FileStore::open(&config.storage.path)?);
//!     let api = Arc::new(ApiClient::new(config.api.client_config())?);
//!
//!     let session = SessionStore::new(store, api, config.auth.token_issuer());
//!     session.restore();
//!
//!     let response = session.login("user1@example.com", "password123").await?;
//!     println!("Signed in as {}", response.email);
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod directory;
pub mod error;
pub mod guard;
pub mod logging;
pub mod preferences;
pub mod session;
pub mod shell;
pub mod storage;
pub mod token;
pub mod views;
pub mod web;

#[cfg(test)]
mod testing;

// Re-export top-level types for convenience
pub use client::{
    AnalyticsDay, ApiClient, ApiClientConfig, ApiError, ApiResult, DashboardApi, DashboardData,
    DashboardOverview, LoginResponse, NewUser, Product, RecordId, User, UserStatus,
};

pub use config::{Config, ConfigError, LoggingConfig};

pub use directory::{CreateOutcome, UserDirectory};

pub use error::ErrorKind;

pub use guard::{GuardDecision, GuardState, RouteGuard, PUBLIC_ENTRY};

pub use preferences::Theme;

pub use session::{Identity, SessionError, SessionState, SessionStore};

pub use shell::{Confirmation, NavShell, Route};

pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError, StorageResult, StoreOp};

pub use token::LocalTokenIssuer;

pub use views::{ViewSlot, ViewState};

pub use web::{build_router, serve, AppState, WebError};
