//! Remote payload shapes
//!
//! These are display payloads: the dashboard reads them as-is and only does
//! arithmetic on them. Field names follow the remote API's camelCase.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier that the remote API sends either as a number or as a string
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{}", n),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        RecordId::Number(n)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        RecordId::Text(s.to_string())
    }
}

/// Body of `POST /api/login`
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Successful login response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub id: RecordId,
    pub email: String,
    pub token: String,
}

/// Account status as reported by the remote API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Inactive,
    /// Any other value the remote sends; shown, never counted
    #[serde(other)]
    Unknown,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "active",
            UserStatus::Inactive => "inactive",
            UserStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(UserStatus::Active),
            "inactive" => Ok(UserStatus::Inactive),
            other => Err(format!("unknown user status: {}", other)),
        }
    }
}

/// A user row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: RecordId,
    pub name: String,
    pub email: String,
    pub status: UserStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join_date: Option<String>,
}

/// Body of `POST /api/users`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub status: UserStatus,
}

/// A product row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: RecordId,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub sales: u64,
}

impl Product {
    /// Revenue contributed by this product (price × sales)
    pub fn revenue(&self) -> f64 {
        self.price * self.sales as f64
    }
}

/// Headline numbers of `GET /api/dashboard`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardOverview {
    pub total_users: u64,
    pub active_users: u64,
    pub revenue: f64,
    pub growth: f64,
}

/// Full body of `GET /api/dashboard`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardData {
    pub overview: DashboardOverview,
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub products: Vec<Product>,
}

/// One row of `GET /api/analytics`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsDay {
    pub date: String,
    pub views: u64,
    pub clicks: u64,
    pub conversions: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_id_accepts_number_or_string() {
        let n: RecordId = serde_json::from_str("7").unwrap();
        let s: RecordId = serde_json::from_str(r#""u-7""#).unwrap();
        assert_eq!(n, RecordId::Number(7));
        assert_eq!(s, RecordId::Text("u-7".to_string()));
        assert_eq!(n.to_string(), "7");
        assert_eq!(s.to_string(), "u-7");
    }

    #[test]
    fn test_user_camel_case_and_missing_join_date() {
        let user: User = serde_json::from_str(
            r#"{"id":1,"name":"Ann","email":"ann@example.com","status":"active","joinDate":"2024-01-15"}"#,
        )
        .unwrap();
        assert_eq!(user.join_date.as_deref(), Some("2024-01-15"));
        assert_eq!(user.status, UserStatus::Active);

        let user: User = serde_json::from_str(
            r#"{"id":"x","name":"Bo","email":"bo@example.com","status":"inactive","extra":true}"#,
        )
        .unwrap();
        assert_eq!(user.join_date, None);
        assert_eq!(user.status, UserStatus::Inactive);
    }

    #[test]
    fn test_unexpected_status_does_not_fail_the_list() {
        let users: Vec<User> = serde_json::from_str(
            r#"[{"id":1,"name":"Ann","email":"ann@example.com","status":"suspended"},
                {"id":2,"name":"Bo","email":"bo@example.com","status":"active"}]"#,
        )
        .unwrap();
        assert_eq!(users[0].status, UserStatus::Unknown);
        assert_eq!(users[0].status.as_str(), "unknown");
        assert_eq!(users[1].status, UserStatus::Active);
        assert!("suspended".parse::<UserStatus>().is_err());
    }

    #[test]
    fn test_dashboard_data_nested_overview() {
        let data: DashboardData = serde_json::from_str(
            r#"{"overview":{"totalUsers":1200,"activeUsers":900,"revenue":45000.5,"growth":12.5}}"#,
        )
        .unwrap();
        assert_eq!(data.overview.total_users, 1200);
        assert_eq!(data.overview.active_users, 900);
        assert!(data.users.is_empty());
        assert!(data.products.is_empty());
    }

    #[test]
    fn test_product_revenue() {
        let product = Product {
            id: 1.into(),
            name: "Lamp".to_string(),
            category: "home".to_string(),
            price: 12.5,
            sales: 4,
        };
        assert_eq!(product.revenue(), 50.0);
    }

    #[test]
    fn test_user_status_parse() {
        assert_eq!("Active".parse::<UserStatus>().unwrap(), UserStatus::Active);
        assert!("banned".parse::<UserStatus>().is_err());
    }
}
