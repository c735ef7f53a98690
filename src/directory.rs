//! User Directory
//!
//! Creating a user is best-effort: the remote store may be read-only. When
//! the remote create fails, the record is kept in the `localUsers` entry
//! instead, and listings merge it back in.

use chrono::Utc;
use std::sync::Arc;

use crate::client::{ApiResult, DashboardApi, NewUser, RecordId, User};
use crate::storage::{keys, KeyValueStore, StorageResult};
use crate::views::UsersPage;

/// Where a newly created user ended up
#[derive(Debug, Clone, PartialEq)]
pub enum CreateOutcome {
    Remote(User),
    /// Remote create failed; stored in `localUsers`
    Local(User),
}

impl CreateOutcome {
    pub fn user(&self) -> &User {
        match self {
            CreateOutcome::Remote(user) | CreateOutcome::Local(user) => user,
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, CreateOutcome::Local(_))
    }
}

/// Users from the remote API plus the local write-through cache
#[derive(Clone)]
pub struct UserDirectory {
    api: Arc<dyn DashboardApi>,
    store: Arc<dyn KeyValueStore>,
}

impl UserDirectory {
    pub fn new(api: Arc<dyn DashboardApi>, store: Arc<dyn KeyValueStore>) -> Self {
        Self { api, store }
    }

    /// Users whose remote create failed
    ///
    /// A corrupt entry is logged and treated as empty.
    pub fn local_users(&self) -> StorageResult<Vec<User>> {
        Ok(decode_local_users(self.store.get(keys::LOCAL_USERS)?.as_deref()))
    }

    /// Remote users merged with local ones
    ///
    /// A remote failure is returned as-is so the page can show it.
    pub async fn load_page(&self) -> ApiResult<UsersPage> {
        let remote = self.api.list_users().await?;
        let local = self.local_users().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Could not read local users");
            Vec::new()
        });
        Ok(UsersPage::new(remote, local))
    }

    /// Append under the store's write lock so concurrent creates all land
    fn append_local(&self, user: &User) -> StorageResult<()> {
        self.store.update(keys::LOCAL_USERS, &mut |raw| {
            let mut local = decode_local_users(raw.as_deref());
            local.push(user.clone());
            Ok(Some(serde_json::to_string(&local)?))
        })
    }

    pub async fn create(&self, payload: NewUser) -> StorageResult<CreateOutcome> {
        match self.api.create_user(&payload).await {
            Ok(user) => {
                tracing::info!(email = %user.email, "Created user remotely");
                Ok(CreateOutcome::Remote(user))
            }
            Err(e) => {
                tracing::warn!(error = %e, email = %payload.email, "Remote create failed, keeping user locally");
                let user = User {
                    id: RecordId::Text(format!("local-{}", uuid::Uuid::new_v4().simple())),
                    name: payload.name,
                    email: payload.email,
                    status: payload.status,
                    join_date: Some(Utc::now().format("%Y-%m-%d").to_string()),
                };

                self.append_local(&user)?;

                Ok(CreateOutcome::Local(user))
            }
        }
    }
}

fn decode_local_users(raw: Option<&str>) -> Vec<User> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    serde_json::from_str(raw).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Ignoring unreadable localUsers entry");
        Vec::new()
    })
}
