//! Session Store
//!
//! Single source of truth for "who is logged in". The identity is persisted
//! as two key-value entries, `token` and `user`, which are always written and
//! removed together in one atomic batch.
//!
//! State transitions are published on a `tokio::sync::watch` channel so the
//! route guard (and anything else) can react to a logout immediately.
//!
//! ```text
//!            restore()
//!  CHECKING ───────────► { identity: Some | None, is_checking: false }
//!                              │ login() ▲        │ logout()
//!                              ▼         │        ▼
//!                          Some(identity) ──► None
//! ```

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;

use crate::client::{ApiError, DashboardApi, LoginResponse, RecordId};
use crate::error::ErrorKind;
use crate::storage::{keys, KeyValueStore, StorageError, StoreOp};
use crate::token::{LocalTokenIssuer, TokenCheck};

/// Demo accounts accepted when the remote login endpoint is unavailable
pub static FALLBACK_ACCOUNTS: [FallbackAccount; 3] = [
    FallbackAccount {
        email: "user1@example.com",
        password: "password123",
        id: 1,
    },
    FallbackAccount {
        email: "john@example.com",
        password: "password123",
        id: 2,
    },
    FallbackAccount {
        email: "jane@example.com",
        password: "password123",
        id: 3,
    },
];

/// One entry of the fallback allow-list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackAccount {
    pub email: &'static str,
    pub password: &'static str,
    pub id: i64,
}

/// Find the fallback account matching an email/password pair exactly
pub fn find_fallback_account(email: &str, password: &str) -> Option<&'static FallbackAccount> {
    FALLBACK_ACCOUNTS
        .iter()
        .find(|acc| acc.email == email && acc.password == password)
}

/// The authenticated user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: RecordId,
    pub email: String,
    pub token: String,
}

impl Identity {
    pub fn profile(&self) -> Profile {
        Profile {
            id: self.id.clone(),
            email: self.email.clone(),
        }
    }
}

impl From<LoginResponse> for Identity {
    fn from(response: LoginResponse) -> Self {
        Self {
            id: response.id,
            email: response.email,
            token: response.token,
        }
    }
}

/// The persisted `user` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: RecordId,
    pub email: String,
}

/// Snapshot of the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub identity: Option<Identity>,
    /// True only until the first `restore()` completes
    pub is_checking: bool,
}

impl SessionState {
    fn checking() -> Self {
        Self {
            identity: None,
            is_checking: true,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }
}

/// How a login succeeded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginSource {
    Remote,
    Fallback,
}

/// Errors from session operations
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Session storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Failed to issue local token: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Failed to encode session profile: {0}")]
    Encode(#[from] serde_json::Error),
}

impl SessionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SessionError::InvalidCredentials => ErrorKind::InvalidCredentials,
            SessionError::Storage(_) => ErrorKind::Storage,
            SessionError::Token(_) | SessionError::Encode(_) => ErrorKind::Internal,
        }
    }
}

/// Owner of the current identity
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
    api: Arc<dyn DashboardApi>,
    issuer: LocalTokenIssuer,
    state: watch::Sender<SessionState>,
    restored: AtomicBool,
}

impl SessionStore {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        api: Arc<dyn DashboardApi>,
        issuer: LocalTokenIssuer,
    ) -> Self {
        let (state, _) = watch::channel(SessionState::checking());
        Self {
            store,
            api,
            issuer,
            state,
            restored: AtomicBool::new(false),
        }
    }

    /// Current snapshot
    pub fn current(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn identity(&self) -> Option<Identity> {
        self.state.borrow().identity.clone()
    }

    /// Observe every future transition
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Issuer used for fallback tokens
    pub fn token_issuer(&self) -> &LocalTokenIssuer {
        &self.issuer
    }

    /// Restore the identity persisted by a previous run
    ///
    /// Only the first call reads storage; later calls return the current
    /// state untouched. `is_checking` is cleared in every case.
    pub fn restore(&self) -> SessionState {
        if self.restored.swap(true, Ordering::SeqCst) {
            return self.current();
        }

        let identity = match self.read_persisted() {
            Ok(identity) => identity.and_then(|identity| self.still_valid(identity)),
            Err(e) => {
                tracing::warn!(error = %e, "Could not restore session, starting signed out");
                None
            }
        };

        match &identity {
            Some(identity) => tracing::info!(email = %identity.email, "Restored session"),
            None => tracing::debug!("No persisted session"),
        }

        let next = SessionState {
            identity,
            is_checking: false,
        };
        self.state.send_replace(next.clone());
        next
    }

    fn read_persisted(&self) -> Result<Option<Identity>, SessionError> {
        let token = self.store.get(keys::TOKEN)?;
        let user = self.store.get(keys::USER)?;

        let (Some(token), Some(user)) = (token, user) else {
            return Ok(None);
        };
        if token.is_empty() {
            return Ok(None);
        }

        let profile: Profile = serde_json::from_str(&user)?;
        Ok(Some(Identity {
            id: profile.id,
            email: profile.email,
            token,
        }))
    }

    /// Drop a locally issued token that has expired or was not signed here
    fn still_valid(&self, identity: Identity) -> Option<Identity> {
        let reason = match self.issuer.check(&identity.token) {
            TokenCheck::Foreign | TokenCheck::Valid(_) => return Some(identity),
            TokenCheck::Expired => "expired",
            TokenCheck::Invalid => "bad signature",
        };

        tracing::warn!(email = %identity.email, reason, "Discarding persisted local session");
        if let Err(e) = self
            .store
            .apply(vec![StoreOp::remove(keys::TOKEN), StoreOp::remove(keys::USER)])
        {
            tracing::warn!(error = %e, "Could not clear discarded session");
        }
        None
    }

    /// Sign in, falling back to the demo allow-list when the remote is down
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, SessionError> {
        if email.is_empty() || password.is_empty() {
            return Err(SessionError::InvalidCredentials);
        }

        let (response, source) = match self.api.authenticate(email, password).await {
            Ok(response) => (response, LoginSource::Remote),
            Err(e) => (self.fallback_login(email, password, &e)?, LoginSource::Fallback),
        };

        let identity = Identity::from(response.clone());
        self.persist(&identity)?;

        tracing::info!(email = %identity.email, source = ?source, "Signed in");
        self.state.send_replace(SessionState {
            identity: Some(identity),
            is_checking: false,
        });

        Ok(response)
    }

    fn fallback_login(
        &self,
        email: &str,
        password: &str,
        cause: &ApiError,
    ) -> Result<LoginResponse, SessionError> {
        tracing::warn!(error = %cause, "Remote login failed, using fallback authentication");

        let account =
            find_fallback_account(email, password).ok_or(SessionError::InvalidCredentials)?;

        let id = RecordId::Number(account.id);
        let token = self.issuer.issue(&id, email)?;
        Ok(LoginResponse {
            id,
            email: email.to_string(),
            token,
        })
    }

    fn persist(&self, identity: &Identity) -> Result<(), SessionError> {
        let profile = serde_json::to_string(&identity.profile())?;
        self.store.apply(vec![
            StoreOp::set(keys::TOKEN, identity.token.as_str()),
            StoreOp::set(keys::USER, profile),
        ])?;
        Ok(())
    }

    /// Forget the identity; always leaves both entries absent
    pub fn logout(&self) -> Result<(), SessionError> {
        self.store
            .apply(vec![StoreOp::remove(keys::TOKEN), StoreOp::remove(keys::USER)])?;

        let previous = self.state.send_replace(SessionState {
            identity: None,
            is_checking: false,
        });
        if let Some(identity) = previous.identity {
            tracing::info!(email = %identity.email, "Signed out");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::testing::FakeApi;
    use chrono::Duration;

    fn session_with(store: Arc<MemoryStore>, api: FakeApi) -> (SessionStore, Arc<FakeApi>) {
        let api = Arc::new(api);
        let session = SessionStore::new(
            store,
            Arc::clone(&api) as Arc<dyn DashboardApi>,
            LocalTokenIssuer::new(b"test", Duration::hours(1)),
        );
        (session, api)
    }

    #[tokio::test]
    async fn test_empty_credentials_rejected_before_network() {
        let (session, api) = session_with(Arc::new(MemoryStore::new()), FakeApi::down());

        for (email, password) in [("", "password123"), ("user1@example.com", ""), ("", "")] {
            let err = session.login(email, password).await.unwrap_err();
            assert!(matches!(err, SessionError::InvalidCredentials));
        }
        assert_eq!(api.auth_calls(), 0);
    }

    #[tokio::test]
    async fn test_fallback_login_when_remote_down() {
        let store = Arc::new(MemoryStore::new());
        let (session, api) = session_with(Arc::clone(&store), FakeApi::down());

        let response = session.login("user1@example.com", "password123").await.unwrap();
        assert_eq!(api.auth_calls(), 1);
        assert_eq!(response.id, RecordId::Number(1));

        let identity = session.identity().unwrap();
        assert_eq!(identity.id, RecordId::Number(1));
        assert_eq!(identity.email, "user1@example.com");
        assert!(session.token_issuer().verify(&identity.token).is_ok());

        assert_eq!(store.get(keys::TOKEN).unwrap(), Some(identity.token.clone()));
        let profile: Profile = serde_json::from_str(&store.get(keys::USER).unwrap().unwrap()).unwrap();
        assert_eq!(profile, identity.profile());
    }

    #[tokio::test]
    async fn test_unknown_account_rejected_after_remote_failure() {
        let store = Arc::new(MemoryStore::new());
        let (session, api) = session_with(Arc::clone(&store), FakeApi::down());

        let err = session.login("nope@example.com", "wrong").await.unwrap_err();
        assert!(matches!(err, SessionError::InvalidCredentials));
        assert_eq!(err.kind(), ErrorKind::InvalidCredentials);
        assert_eq!(api.auth_calls(), 1);
        assert!(store.is_empty());
        assert!(session.identity().is_none());
    }

    #[tokio::test]
    async fn test_remote_login_persists_response() {
        let store = Arc::new(MemoryStore::new());
        let api = FakeApi {
            login: Some(LoginResponse {
                id: RecordId::Text("abc".to_string()),
                email: "remote@example.com".to_string(),
                token: "remote-token".to_string(),
            }),
            ..Default::default()
        };
        let (session, _) = session_with(Arc::clone(&store), api);

        let response = session.login("remote@example.com", "pw").await.unwrap();
        assert_eq!(response.token, "remote-token");
        assert_eq!(store.get(keys::TOKEN).unwrap().as_deref(), Some("remote-token"));
        assert_eq!(
            store.get(keys::USER).unwrap().as_deref(),
            Some(r#"{"id":"abc","email":"remote@example.com"}"#)
        );
    }

    #[tokio::test]
    async fn test_logout_clears_everything() {
        let store = Arc::new(MemoryStore::new());
        let (session, _) = session_with(Arc::clone(&store), FakeApi::down());
        session.login("jane@example.com", "password123").await.unwrap();

        session.logout().unwrap();
        assert!(session.identity().is_none());
        assert_eq!(store.get(keys::TOKEN).unwrap(), None);
        assert_eq!(store.get(keys::USER).unwrap(), None);

        // Idempotent when already signed out
        session.logout().unwrap();
        assert!(!session.current().is_authenticated());
    }

    #[test]
    fn test_restore_without_token() {
        let store = Arc::new(MemoryStore::with_entries([(keys::USER, r#"{"id":1,"email":"a@b.c"}"#)]));
        let (session, _) = session_with(store, FakeApi::down());
        assert!(session.current().is_checking);

        let state = session.restore();
        assert!(state.identity.is_none());
        assert!(!state.is_checking);
    }

    #[test]
    fn test_restore_with_corrupt_profile() {
        let store = Arc::new(MemoryStore::with_entries([
            (keys::TOKEN, "t"),
            (keys::USER, "{not json"),
        ]));
        let (session, _) = session_with(store, FakeApi::down());

        let state = session.restore();
        assert!(state.identity.is_none());
        assert!(!state.is_checking);
    }

    #[tokio::test]
    async fn test_persist_then_restore_round_trip() {
        let store = Arc::new(MemoryStore::new());
        let (first, _) = session_with(Arc::clone(&store), FakeApi::down());
        first.login("john@example.com", "password123").await.unwrap();
        let original = first.identity().unwrap();

        let (second, _) = session_with(store, FakeApi::down());
        let restored = second.restore().identity.unwrap();
        assert_eq!(restored, original);
    }

    #[tokio::test]
    async fn test_restore_discards_expired_local_token() {
        let store = Arc::new(MemoryStore::new());
        let expired = SessionStore::new(
            Arc::clone(&store) as Arc<dyn KeyValueStore>,
            Arc::new(FakeApi::down()),
            LocalTokenIssuer::new(b"test", Duration::hours(-2)),
        );
        expired.login("jane@example.com", "password123").await.unwrap();
        assert!(store.get(keys::TOKEN).unwrap().is_some());

        let (session, _) = session_with(Arc::clone(&store), FakeApi::down());
        let state = session.restore();
        assert!(state.identity.is_none());
        assert!(!state.is_checking);
        assert_eq!(store.get(keys::TOKEN).unwrap(), None);
        assert_eq!(store.get(keys::USER).unwrap(), None);
    }

    #[tokio::test]
    async fn test_restore_discards_token_signed_elsewhere() {
        let store = Arc::new(MemoryStore::new());
        let elsewhere = SessionStore::new(
            Arc::clone(&store) as Arc<dyn KeyValueStore>,
            Arc::new(FakeApi::down()),
            LocalTokenIssuer::new(b"another-secret", Duration::hours(1)),
        );
        elsewhere.login("john@example.com", "password123").await.unwrap();

        let (session, _) = session_with(Arc::clone(&store), FakeApi::down());
        assert!(session.restore().identity.is_none());
        assert_eq!(store.get(keys::TOKEN).unwrap(), None);
    }

    #[test]
    fn test_restore_keeps_remote_token() {
        let store = Arc::new(MemoryStore::with_entries([
            (keys::TOKEN, "remote-token"),
            (keys::USER, r#"{"id":"abc","email":"remote@example.com"}"#),
        ]));
        let (session, _) = session_with(store, FakeApi::down());

        let identity = session.restore().identity.unwrap();
        assert_eq!(identity.token, "remote-token");
    }

    #[tokio::test]
    async fn test_restore_runs_once() {
        let store = Arc::new(MemoryStore::new());
        let (session, _) = session_with(Arc::clone(&store), FakeApi::down());
        assert!(session.restore().identity.is_none());

        session.login("user1@example.com", "password123").await.unwrap();
        // A second restore must not clobber the live session
        assert!(session.restore().identity.is_some());
    }

    #[tokio::test]
    async fn test_subscribers_see_transitions() {
        let (session, _) = session_with(Arc::new(MemoryStore::new()), FakeApi::down());
        let mut rx = session.subscribe();
        session.restore();
        rx.changed().await.unwrap();
        assert!(!rx.borrow_and_update().is_checking);

        session.login("user1@example.com", "password123").await.unwrap();
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_authenticated());

        session.logout().unwrap();
        rx.changed().await.unwrap();
        assert!(!rx.borrow_and_update().is_authenticated());
    }

    #[test]
    fn test_find_fallback_account_is_exact() {
        assert_eq!(find_fallback_account("john@example.com", "password123").map(|a| a.id), Some(2));
        assert!(find_fallback_account("JOHN@example.com", "password123").is_none());
        assert!(find_fallback_account("john@example.com", "Password123").is_none());
    }
}
