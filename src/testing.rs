//! In-process fake of the remote API for unit tests.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::client::{
    AnalyticsDay, ApiError, ApiResult, DashboardApi, DashboardData, DashboardOverview,
    LoginResponse, NewUser, Product, RecordId, User, UserStatus,
};

/// Scriptable [`DashboardApi`]
///
/// `None` fields answer with `ApiError::Unreachable`.
#[derive(Default)]
pub struct FakeApi {
    pub login: Option<LoginResponse>,
    pub users: Option<Vec<User>>,
    pub dashboard: Option<DashboardData>,
    pub analytics: Option<Vec<AnalyticsDay>>,
    pub products: Option<Vec<Product>>,
    pub accept_creates: bool,
    pub auth_calls: AtomicUsize,
    pub created: Mutex<Vec<NewUser>>,
}

impl FakeApi {
    /// Every call fails as if the remote were down
    pub fn down() -> Self {
        Self::default()
    }

    /// Every read succeeds with the sample data; login and create still fail
    pub fn with_sample_data() -> Self {
        Self {
            users: Some(sample_users()),
            dashboard: Some(sample_dashboard()),
            analytics: Some(sample_analytics()),
            products: Some(sample_products()),
            ..Default::default()
        }
    }

    pub fn auth_calls(&self) -> usize {
        self.auth_calls.load(Ordering::SeqCst)
    }
}

fn down<T>() -> ApiResult<T> {
    Err(ApiError::Unreachable("fake remote is down".to_string()))
}

#[async_trait]
impl DashboardApi for FakeApi {
    async fn authenticate(&self, _email: &str, _password: &str) -> ApiResult<LoginResponse> {
        self.auth_calls.fetch_add(1, Ordering::SeqCst);
        self.login.clone().map_or_else(down, Ok)
    }

    async fn list_users(&self) -> ApiResult<Vec<User>> {
        self.users.clone().map_or_else(down, Ok)
    }

    async fn get_dashboard_overview(&self) -> ApiResult<DashboardData> {
        self.dashboard.clone().map_or_else(down, Ok)
    }

    async fn list_analytics(&self) -> ApiResult<Vec<AnalyticsDay>> {
        self.analytics.clone().map_or_else(down, Ok)
    }

    async fn list_products(&self) -> ApiResult<Vec<Product>> {
        self.products.clone().map_or_else(down, Ok)
    }

    async fn get_product(&self, id: &str) -> ApiResult<Product> {
        let products = self.products.clone().map_or_else(down, Ok)?;
        products
            .into_iter()
            .find(|p| p.id.to_string() == id)
            .ok_or_else(|| ApiError::Status {
                status: 404,
                message: format!("product {} not found", id),
            })
    }

    async fn create_user(&self, payload: &NewUser) -> ApiResult<User> {
        if !self.accept_creates {
            return down();
        }
        let mut created = self
            .created
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        created.push(payload.clone());
        Ok(User {
            id: RecordId::Number(100 + created.len() as i64),
            name: payload.name.clone(),
            email: payload.email.clone(),
            status: payload.status,
            join_date: Some("2024-06-01".to_string()),
        })
    }
}

pub fn user(id: i64, name: &str, email: &str, status: UserStatus) -> User {
    User {
        id: RecordId::Number(id),
        name: name.to_string(),
        email: email.to_string(),
        status,
        join_date: Some("2024-01-01".to_string()),
    }
}

pub fn product(id: i64, name: &str, category: &str, price: f64, sales: u64) -> Product {
    Product {
        id: RecordId::Number(id),
        name: name.to_string(),
        category: category.to_string(),
        price,
        sales,
    }
}

pub fn day(date: &str, views: u64, clicks: u64, conversions: u64) -> AnalyticsDay {
    AnalyticsDay {
        date: date.to_string(),
        views,
        clicks,
        conversions,
    }
}

pub fn sample_users() -> Vec<User> {
    vec![
        user(1, "Alice Johnson", "alice@example.com", UserStatus::Active),
        user(2, "Bob Smith", "bob@example.com", UserStatus::Inactive),
        user(3, "Carol White", "carol@shop.io", UserStatus::Active),
    ]
}

pub fn sample_products() -> Vec<Product> {
    vec![
        product(1, "Laptop", "electronics", 1000.0, 5),
        product(2, "Desk Lamp", "home", 25.5, 10),
        product(3, "Headphones", "electronics", 150.0, 2),
    ]
}

pub fn sample_analytics() -> Vec<AnalyticsDay> {
    vec![day("2024-03-01", 10, 5, 1), day("2024-03-02", 20, 5, 1)]
}

pub fn sample_dashboard() -> DashboardData {
    DashboardData {
        overview: DashboardOverview {
            total_users: 1250,
            active_users: 980,
            revenue: 54_321.5,
            growth: 12.5,
        },
        users: (1..=7)
            .map(|i| user(i, &format!("User {}", i), &format!("u{}@example.com", i), UserStatus::Active))
            .collect(),
        products: (1..=6)
            .map(|i| product(i, &format!("Product {}", i), "misc", 10.0, i as u64))
            .collect(),
    }
}
