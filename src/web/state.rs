//! Application State
//!
//! Shared state accessible by all web handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use std::sync::Arc;
use std::time::Instant;

use crate::client::DashboardApi;
use crate::directory::UserDirectory;
use crate::preferences::Theme;
use crate::session::SessionStore;
use crate::shell::{NavShell, Route};
use crate::storage::KeyValueStore;
use crate::token::LocalTokenIssuer;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Who is signed in to this dashboard
    pub session: Arc<SessionStore>,
    /// Remote API every page reads from
    pub api: Arc<dyn DashboardApi>,
    /// Remote users plus the local write-through cache
    pub directory: UserDirectory,
    /// Persisted session entries and preferences
    pub store: Arc<dyn KeyValueStore>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    /// Build the state and its session store around one key-value store
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        api: Arc<dyn DashboardApi>,
        issuer: LocalTokenIssuer,
    ) -> Self {
        let session = Arc::new(SessionStore::new(
            Arc::clone(&store),
            Arc::clone(&api),
            issuer,
        ));
        Self::with_session(session, store, api)
    }

    /// Build the state around an existing session store
    pub fn with_session(
        session: Arc<SessionStore>,
        store: Arc<dyn KeyValueStore>,
        api: Arc<dyn DashboardApi>,
    ) -> Self {
        Self {
            session,
            directory: UserDirectory::new(Arc::clone(&api), Arc::clone(&store)),
            api,
            store,
            start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    pub fn theme(&self) -> Theme {
        Theme::load(self.store.as_ref())
    }

    /// Page chrome for a protected route
    pub fn shell(&self, route: Route, email: &str) -> NavShell {
        NavShell::for_route(route)
            .with_user(email)
            .with_theme(self.theme())
    }
}
