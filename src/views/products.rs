//! Products page

use crate::client::Product;

/// Category value that disables the category filter
pub const ALL_CATEGORIES: &str = "all";

/// Catalogue-wide totals
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProductTotals {
    pub products: usize,
    /// Σ price × sales
    pub revenue: f64,
    /// Σ sales
    pub sales: u64,
}

impl ProductTotals {
    pub fn from_products(products: &[Product]) -> Self {
        Self {
            products: products.len(),
            revenue: products.iter().map(Product::revenue).sum(),
            sales: products.iter().map(|p| p.sales).sum(),
        }
    }
}

/// Products shown on the products page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductsPage {
    pub products: Vec<Product>,
}

impl ProductsPage {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    pub fn filter(&self, search: &str, category: &str) -> Vec<&Product> {
        filter_products(&self.products, search, category)
    }

    pub fn categories(&self) -> Vec<String> {
        categories(&self.products)
    }

    pub fn totals(&self) -> ProductTotals {
        ProductTotals::from_products(&self.products)
    }
}

/// Case-insensitive substring on name AND exact category (or "all")
pub fn filter_products<'a>(products: &'a [Product], search: &str, category: &str) -> Vec<&'a Product> {
    let needle = search.trim().to_lowercase();
    let any_category = category.is_empty() || category == ALL_CATEGORIES;

    products
        .iter()
        .filter(|p| needle.is_empty() || p.name.to_lowercase().contains(&needle))
        .filter(|p| any_category || p.category == category)
        .collect()
}

/// `"all"` followed by each distinct category in first-seen order
pub fn categories(products: &[Product]) -> Vec<String> {
    let mut out = vec![ALL_CATEGORIES.to_string()];
    for product in products {
        if !out.iter().any(|c| c == &product.category) {
            out.push(product.category.clone());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{product, sample_products};

    #[test]
    fn test_search_is_case_insensitive() {
        let products = vec![product(1, "A", "x", 1.0, 1), product(2, "B", "y", 1.0, 1)];

        let filtered = filter_products(&products, "a", ALL_CATEGORIES);
        assert_eq!(filtered, vec![&products[0]]);
    }

    #[test]
    fn test_category_filter_combines_with_search() {
        let products = sample_products();

        let electronics = filter_products(&products, "", "electronics");
        assert_eq!(electronics.len(), 2);

        let phones = filter_products(&products, "phone", "electronics");
        assert_eq!(phones.len(), 1);
        assert_eq!(phones[0].name, "Headphones");

        assert!(filter_products(&products, "lamp", "electronics").is_empty());
    }

    #[test]
    fn test_categories_first_seen_order() {
        assert_eq!(categories(&sample_products()), vec!["all", "electronics", "home"]);
        assert_eq!(categories(&[]), vec!["all"]);
    }

    #[test]
    fn test_totals() {
        let totals = ProductsPage::new(sample_products()).totals();
        assert_eq!(totals.products, 3);
        assert_eq!(totals.sales, 17);
        assert_eq!(totals.revenue, 5000.0 + 255.0 + 300.0);
    }
}
