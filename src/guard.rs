//! Route Guard
//!
//! Gates protected pages on the session:
//!
//! ```text
//! CHECKING ──► AUTHENTICATED   (render)
//!          └─► UNAUTHENTICATED (redirect to PUBLIC_ENTRY)
//! ```
//!
//! While the session is still checking, the guard asks for a placeholder so
//! neither the protected page nor the sign-in page flashes up.

use tokio::sync::watch;

use crate::session::{Identity, SessionState, SessionStore};

/// Route unauthenticated visitors are sent to
pub const PUBLIC_ENTRY: &str = "/";

/// Guard state derived from a session snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardState {
    Checking,
    Authenticated(Identity),
    Unauthenticated,
}

impl From<&SessionState> for GuardState {
    fn from(session: &SessionState) -> Self {
        if session.is_checking {
            return GuardState::Checking;
        }
        match &session.identity {
            Some(identity) => GuardState::Authenticated(identity.clone()),
            None => GuardState::Unauthenticated,
        }
    }
}

/// What the front end should do for a protected route
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Show a neutral loading placeholder
    Placeholder,
    /// Render the protected content for this identity
    Render(Identity),
    /// Send the visitor elsewhere
    Redirect(&'static str),
}

impl GuardState {
    pub fn decision(&self) -> GuardDecision {
        match self {
            GuardState::Checking => GuardDecision::Placeholder,
            GuardState::Authenticated(identity) => GuardDecision::Render(identity.clone()),
            GuardState::Unauthenticated => GuardDecision::Redirect(PUBLIC_ENTRY),
        }
    }
}

/// Guard bound to one session store
pub struct RouteGuard {
    session: watch::Receiver<SessionState>,
}

impl RouteGuard {
    pub fn new(session: &SessionStore) -> Self {
        Self {
            session: session.subscribe(),
        }
    }

    pub fn state(&self) -> GuardState {
        GuardState::from(&*self.session.borrow())
    }

    pub fn decide(&self) -> GuardDecision {
        self.state().decision()
    }

    /// Wait for the next session transition and re-evaluate
    ///
    /// Returns `None` once the session store is gone.
    pub async fn changed(&mut self) -> Option<GuardState> {
        self.session.changed().await.ok()?;
        Some(GuardState::from(&*self.session.borrow_and_update()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::DashboardApi;
    use crate::storage::MemoryStore;
    use crate::testing::FakeApi;
    use crate::token::LocalTokenIssuer;
    use chrono::Duration;
    use std::sync::Arc;

    fn session() -> SessionStore {
        SessionStore::new(
            Arc::new(MemoryStore::new()),
            Arc::new(FakeApi::down()) as Arc<dyn DashboardApi>,
            LocalTokenIssuer::new(b"guard", Duration::hours(1)),
        )
    }

    #[test]
    fn test_checking_renders_placeholder() {
        let session = session();
        let guard = RouteGuard::new(&session);

        assert_eq!(guard.state(), GuardState::Checking);
        assert_eq!(guard.decide(), GuardDecision::Placeholder);
    }

    #[test]
    fn test_unauthenticated_redirects() {
        let session = session();
        session.restore();
        let guard = RouteGuard::new(&session);

        assert_eq!(guard.decide(), GuardDecision::Redirect(PUBLIC_ENTRY));
    }

    #[tokio::test]
    async fn test_logout_elsewhere_reevaluates() {
        let session = session();
        session.restore();
        session.login("user1@example.com", "password123").await.unwrap();

        let mut guard = RouteGuard::new(&session);
        assert!(matches!(guard.decide(), GuardDecision::Render(ref id) if id.email == "user1@example.com"));

        session.logout().unwrap();
        assert_eq!(guard.changed().await, Some(GuardState::Unauthenticated));
        assert_eq!(guard.decide(), GuardDecision::Redirect(PUBLIC_ENTRY));
    }

    #[tokio::test]
    async fn test_changed_ends_with_session() {
        let session = session();
        let mut guard = RouteGuard::new(&session);
        drop(session);

        assert_eq!(guard.changed().await, None);
    }
}
