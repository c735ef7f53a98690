//! Remote Dashboard API
//!
//! Thin HTTP wrapper over the one remote origin every page reads from.
//!
//! # Endpoints
//!
//! - `POST /api/login` - Authenticate, returns `{id, email, token}`
//! - `GET /api/users` - List users
//! - `POST /api/users` - Create a user (best-effort, the remote may be read-only)
//! - `GET /api/dashboard` - Overview aggregate plus recent users/products
//! - `GET /api/analytics` - Daily analytics rows
//! - `GET /api/products` - List products
//! - `GET /api/products/:id` - One product
//!
//! Callers depend on the [`DashboardApi`] trait rather than on
//! [`ApiClient`] so sessions and views can run against a fake.

mod error;
mod http;
mod types;

pub use error::{ApiError, ApiResult};
pub use http::{ApiClient, ApiClientConfig, DEFAULT_API_BASE};
pub use types::{
    AnalyticsDay, DashboardData, DashboardOverview, LoginRequest, LoginResponse, NewUser,
    Product, RecordId, User, UserStatus,
};

use async_trait::async_trait;

/// Operations the dashboard needs from the remote API
#[async_trait]
pub trait DashboardApi: Send + Sync {
    /// Exchange credentials for a session token
    async fn authenticate(&self, email: &str, password: &str) -> ApiResult<LoginResponse>;

    async fn list_users(&self) -> ApiResult<Vec<User>>;

    async fn get_dashboard_overview(&self) -> ApiResult<DashboardData>;

    async fn list_analytics(&self) -> ApiResult<Vec<AnalyticsDay>>;

    async fn list_products(&self) -> ApiResult<Vec<Product>>;

    async fn get_product(&self, id: &str) -> ApiResult<Product>;

    /// Create a user remotely. Failure is expected and non-fatal.
    async fn create_user(&self, payload: &NewUser) -> ApiResult<User>;
}
