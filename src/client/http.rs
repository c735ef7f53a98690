//! Remote API HTTP client
//!
//! reqwest-backed implementation of [`DashboardApi`].

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;

use super::{
    AnalyticsDay, ApiError, ApiResult, DashboardApi, DashboardData, LoginRequest, LoginResponse,
    NewUser, Product, User,
};

/// Default remote origin
pub const DEFAULT_API_BASE: &str = "https://task-api-eight-flax.vercel.app";

/// Configuration for the remote API client
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Origin of the remote API (no trailing `/api`)
    pub base_url: String,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
    /// Extra attempts for idempotent GETs (POSTs are never retried)
    pub max_retries: u32,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            request_timeout_ms: 10_000,
            max_retries: 1,
        }
    }
}

impl ApiClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }
}

/// Remote dashboard API client
pub struct ApiClient {
    client: Client,
    config: ApiClientConfig,
}

impl ApiClient {
    /// Create a new client with the given configuration
    pub fn new(config: ApiClientConfig) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(ApiError::Request)?;

        Ok(Self { client, config })
    }

    /// Get the current configuration
    pub fn config(&self) -> &ApiClientConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// GET with retry on transport errors and 5xx
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let url = self.url(path);
        let mut attempt = 0;

        loop {
            let result = match self.client.get(&url).send().await {
                Ok(response) => read_json(response).await,
                Err(e) => Err(ApiError::from_transport(e)),
            };

            match result {
                Err(err) if attempt < self.config.max_retries && is_retryable(&err) => {
                    attempt += 1;
                    // Quadratic backoff: 250ms, 1s, 2.25s...
                    let delay = Duration::from_millis(250 * u64::from(attempt).pow(2));
                    tracing::debug!(
                        url = %url,
                        attempt,
                        error = %err,
                        "Retrying remote GET in {:?}",
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
                other => return other,
            }
        }
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(ApiError::from_transport)?;

        read_json(response).await
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(ApiError::Status {
            status: status.as_u16(),
            message,
        });
    }

    response.json::<T>().await.map_err(ApiError::from_transport)
}

fn is_retryable(err: &ApiError) -> bool {
    match err {
        ApiError::Unreachable(_) | ApiError::Timeout | ApiError::Request(_) => true,
        ApiError::Status { status, .. } => *status >= 500,
        ApiError::Decode(_) => false,
    }
}

#[async_trait]
impl DashboardApi for ApiClient {
    async fn authenticate(&self, email: &str, password: &str) -> ApiResult<LoginResponse> {
        self.post_json("/api/login", &LoginRequest { email, password })
            .await
    }

    async fn list_users(&self) -> ApiResult<Vec<User>> {
        self.get_json("/api/users").await
    }

    async fn get_dashboard_overview(&self) -> ApiResult<DashboardData> {
        self.get_json("/api/dashboard").await
    }

    async fn list_analytics(&self) -> ApiResult<Vec<AnalyticsDay>> {
        self.get_json("/api/analytics").await
    }

    async fn list_products(&self) -> ApiResult<Vec<Product>> {
        self.get_json("/api/products").await
    }

    async fn get_product(&self, id: &str) -> ApiResult<Product> {
        self.get_json(&format!("/api/products/{}", urlencoding::encode(id)))
            .await
    }

    async fn create_user(&self, payload: &NewUser) -> ApiResult<User> {
        self.post_json("/api/users", payload).await
    }
}
