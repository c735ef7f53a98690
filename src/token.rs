//! Local session tokens
//!
//! When the remote login endpoint is down, the fallback accounts still need
//! a token to persist. These are HS256 JWTs signed with a secret that never
//! leaves this process or its config file. They only prove "this dashboard
//! issued it"; they are never sent to the remote API.
//!
//! On restore, a persisted token carrying our `iss` is checked before the
//! session is trusted. With an ephemeral secret (no `[auth] token_secret`)
//! the signature cannot survive a restart, so only the expiry is checked.

use chrono::{Duration, Utc};
use jsonwebtoken::dangerous::insecure_decode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::client::RecordId;

/// `iss` claim of every locally issued token
pub const LOCAL_ISSUER: &str = "admin-dash";

const LEEWAY_SECS: i64 = 30;

/// Claims carried by a locally issued token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalClaims {
    pub iss: String,
    /// Subject (user id)
    pub sub: String,
    pub email: String,
    /// Issued at (Unix seconds)
    pub iat: i64,
    /// Expiration (Unix seconds)
    pub exp: i64,
}

/// Signs and checks fallback session tokens
#[derive(Clone)]
pub struct LocalTokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
    /// False when the secret dies with the process
    persistent_secret: bool,
}

/// Outcome of checking a persisted token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenCheck {
    /// Not issued here (a remote token); nothing to check
    Foreign,
    Valid(LocalClaims),
    Expired,
    /// Ours by `iss`, but the signature does not match
    Invalid,
}

impl std::fmt::Debug for LocalTokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalTokenIssuer")
            .field("ttl", &self.ttl)
            .field("persistent_secret", &self.persistent_secret)
            .finish_non_exhaustive()
    }
}

impl LocalTokenIssuer {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            ttl,
            persistent_secret: true,
        }
    }

    /// Issuer with a throwaway secret; tokens die with the process
    pub fn ephemeral(ttl: Duration) -> Self {
        let secret = format!(
            "{}{}",
            uuid::Uuid::new_v4().simple(),
            uuid::Uuid::new_v4().simple()
        );
        Self {
            persistent_secret: false,
            ..Self::new(secret.as_bytes(), ttl)
        }
    }

    pub fn issue(&self, id: &RecordId, email: &str) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = LocalClaims {
            iss: LOCAL_ISSUER.to_string(),
            sub: id.to_string(),
            email: email.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
    }

    pub fn verify(&self, token: &str) -> Result<LocalClaims, jsonwebtoken::errors::Error> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = LEEWAY_SECS as u64;
        validation.set_issuer(&[LOCAL_ISSUER]);

        decode::<LocalClaims>(token, &self.decoding_key, &validation).map(|data| data.claims)
    }

    /// Decide whether a persisted token may still back a session
    pub fn check(&self, token: &str) -> TokenCheck {
        let claims = match insecure_decode::<LocalClaims>(token) {
            Ok(data) if data.claims.iss == LOCAL_ISSUER => data.claims,
            _ => return TokenCheck::Foreign,
        };

        if !self.persistent_secret {
            return if claims.exp + LEEWAY_SECS < Utc::now().timestamp() {
                TokenCheck::Expired
            } else {
                TokenCheck::Valid(claims)
            };
        }

        match self.verify(token) {
            Ok(claims) => TokenCheck::Valid(claims),
            Err(e) if matches!(e.kind(), ErrorKind::ExpiredSignature) => TokenCheck::Expired,
            Err(_) => TokenCheck::Invalid,
        }
    }
}
