//! Page templates and the display rows they are filled from
//!
//! Numbers are formatted on the Rust side; templates only print strings.

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::client::{Product, User};
use crate::shell::{Confirmation, NavShell};
use crate::views::format::{format_count, format_money, format_percent};
use crate::views::{AnalyticsTotals, DayRow, ProductTotals, StatusCounts};
use crate::web::error::WebResult;

/// One summary card
#[derive(Debug, Clone)]
pub struct StatCard {
    pub label: &'static str,
    pub value: String,
}

impl StatCard {
    pub fn new(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub status: &'static str,
    pub join_date: String,
    pub local: bool,
}

impl From<&User> for UserRow {
    fn from(user: &User) -> Self {
        let id = user.id.to_string();
        Self {
            local: id.starts_with("local-"),
            id,
            name: user.name.clone(),
            email: user.email.clone(),
            status: user.status.as_str(),
            join_date: user.join_date.clone().unwrap_or_else(|| "-".to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProductRow {
    pub id: String,
    pub href: String,
    pub name: String,
    pub category: String,
    pub price: String,
    pub sales: String,
    pub revenue: String,
}

impl From<&Product> for ProductRow {
    fn from(product: &Product) -> Self {
        let id = product.id.to_string();
        Self {
            href: format!("/products/{}", urlencoding::encode(&id)),
            id,
            name: product.name.clone(),
            category: product.category.clone(),
            price: format_money(product.price),
            sales: format_count(product.sales),
            revenue: format_money(product.revenue()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DayRowView {
    pub date: String,
    pub views: String,
    pub clicks: String,
    pub conversions: String,
    pub rate: String,
}

impl From<DayRow> for DayRowView {
    fn from(row: DayRow) -> Self {
        Self {
            date: row.date,
            views: format_count(row.views),
            clicks: format_count(row.clicks),
            conversions: format_count(row.conversions),
            rate: format_percent(row.conversion_rate),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CategoryOption {
    pub value: String,
    pub selected: bool,
}

pub fn analytics_cards(totals: &AnalyticsTotals) -> Vec<StatCard> {
    vec![
        StatCard::new("Total Views", format_count(totals.views)),
        StatCard::new("Total Clicks", format_count(totals.clicks)),
        StatCard::new("Conversions", format_count(totals.conversions)),
        StatCard::new("Conversion Rate", format_percent(totals.conversion_rate)),
    ]
}

pub fn product_cards(totals: &ProductTotals) -> Vec<StatCard> {
    vec![
        StatCard::new("Products", format_count(totals.products as u64)),
        StatCard::new("Total Sales", format_count(totals.sales)),
        StatCard::new("Total Revenue", format_money(totals.revenue)),
    ]
}

pub fn user_cards(counts: &StatusCounts) -> Vec<StatCard> {
    vec![
        StatCard::new("Total Users", format_count(counts.total as u64)),
        StatCard::new("Active", format_count(counts.active as u64)),
        StatCard::new("Inactive", format_count(counts.inactive as u64)),
    ]
}

// =============================================================================
// Templates
// =============================================================================

#[derive(Template)]
#[template(path = "signin.html")]
pub struct SignInPage {
    pub theme_class: &'static str,
    pub email: String,
    pub error: String,
}

/// Shown while the session is still being restored
#[derive(Template)]
#[template(path = "checking.html")]
pub struct CheckingPage;

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorPage {
    pub code: &'static str,
    pub message: String,
    pub request_id: String,
}

/// FAILED state of any page, with a retry link
#[derive(Template)]
#[template(path = "failed.html")]
pub struct FailedPage {
    pub shell: NavShell,
    pub message: String,
    pub retry_href: String,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub shell: NavShell,
    pub cards: Vec<StatCard>,
    pub recent_users: Vec<UserRow>,
    pub top_products: Vec<ProductRow>,
}

#[derive(Template)]
#[template(path = "users.html")]
pub struct UsersTemplate {
    pub shell: NavShell,
    pub cards: Vec<StatCard>,
    pub search: String,
    pub notice: String,
    pub users: Vec<UserRow>,
}

#[derive(Template)]
#[template(path = "analytics.html")]
pub struct AnalyticsTemplate {
    pub shell: NavShell,
    pub cards: Vec<StatCard>,
    pub rows: Vec<DayRowView>,
}

#[derive(Template)]
#[template(path = "products.html")]
pub struct ProductsTemplate {
    pub shell: NavShell,
    pub cards: Vec<StatCard>,
    pub search: String,
    pub categories: Vec<CategoryOption>,
    pub products: Vec<ProductRow>,
}

#[derive(Template)]
#[template(path = "product.html")]
pub struct ProductTemplate {
    pub shell: NavShell,
    pub product: ProductRow,
}

#[derive(Template)]
#[template(path = "confirm.html")]
pub struct ConfirmTemplate {
    pub shell: NavShell,
    pub confirm: Confirmation,
}

/// Render a template as a 200 response
pub fn render<T: Template>(template: &T) -> WebResult<Response> {
    render_with_status(StatusCode::OK, template)
}

pub fn render_with_status<T: Template>(status: StatusCode, template: &T) -> WebResult<Response> {
    let html = template.render()?;
    Ok((status, Html(html)).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::UserStatus;
    use crate::shell::Route;
    use crate::testing::{product, user};

    #[test]
    fn test_product_row_formatting() {
        let row = ProductRow::from(&product(7, "Desk Lamp", "home", 25.5, 10));
        assert_eq!(row.href, "/products/7");
        assert_eq!(row.price, "$25.50");
        assert_eq!(row.revenue, "$255.00");
    }

    #[test]
    fn test_user_row_marks_local() {
        let mut u = user(1, "Alice", "alice@example.com", UserStatus::Active);
        assert!(!UserRow::from(&u).local);

        u.id = "local-abc".into();
        u.join_date = None;
        let row = UserRow::from(&u);
        assert!(row.local);
        assert_eq!(row.join_date, "-");
    }

    #[test]
    fn test_failed_page_escapes_message() {
        let page = FailedPage {
            shell: NavShell::for_route(Route::Users),
            message: "<script>".to_string(),
            retry_href: "/users".to_string(),
        };
        let html = page.render().unwrap();
        assert!(html.contains("&lt;script&gt;"));
    }
}
