//! Dashboard page

use crate::client::{DashboardData, DashboardOverview, Product, User};

/// Users listed in the "recent users" table
pub const RECENT_USERS: usize = 5;
/// Products listed in the "top products" panel
pub const TOP_PRODUCTS: usize = 4;

/// Remote overview, displayed without local filtering
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardPage {
    pub data: DashboardData,
}

impl DashboardPage {
    pub fn new(data: DashboardData) -> Self {
        Self { data }
    }

    pub fn overview(&self) -> &DashboardOverview {
        &self.data.overview
    }

    pub fn recent_users(&self) -> &[User] {
        let n = self.data.users.len().min(RECENT_USERS);
        &self.data.users[..n]
    }

    pub fn top_products(&self) -> &[Product] {
        let n = self.data.products.len().min(TOP_PRODUCTS);
        &self.data.products[..n]
    }
}
