//! Product Routes
//!
//! - GET /products?q=&category= - Filterable catalogue with totals
//! - GET /products/:id - One product

use axum::{
    extract::{Path, Query, State},
    response::Response,
    Extension,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::session::Identity;
use crate::shell::Route;
use crate::views::{ProductsPage, ALL_CATEGORIES};
use crate::web::error::WebResult;
use crate::web::pages::{
    product_cards, render, CategoryOption, ProductRow, ProductTemplate, ProductsTemplate,
};
use crate::web::routes::{load, respond};
use crate::web::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ProductsQuery {
    #[serde(default)]
    pub q: String,
    pub category: Option<String>,
}

/// GET /products
///
/// Totals cover the whole catalogue; the table shows the filtered rows.
pub async fn list_products(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Query(query): Query<ProductsQuery>,
) -> WebResult<Response> {
    let api = Arc::clone(&state.api);
    let view = load(async move { api.list_products().await.map(ProductsPage::new) }).await;

    let category = query
        .category
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| ALL_CATEGORIES.to_string());
    let retry = format!(
        "/products?q={}&category={}",
        urlencoding::encode(&query.q),
        urlencoding::encode(&category)
    );

    let shell = state.shell(Route::Products, &identity.email);
    respond(view, shell, retry, |page, shell| {
        let categories = page
            .categories()
            .into_iter()
            .map(|value| CategoryOption {
                selected: value == category,
                value,
            })
            .collect();

        render(&ProductsTemplate {
            shell,
            cards: product_cards(&page.totals()),
            categories,
            products: page
                .filter(&query.q, &category)
                .into_iter()
                .map(ProductRow::from)
                .collect(),
            search: query.q.clone(),
        })
    })
}

/// GET /products/:id
pub async fn product_detail(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> WebResult<Response> {
    let api = Arc::clone(&state.api);
    let fetch_id = id.clone();
    let view = load(async move { api.get_product(&fetch_id).await }).await;

    let retry = format!("/products/{}", urlencoding::encode(&id));
    let shell = state.shell(Route::Products, &identity.email);
    respond(view, shell, retry, |product, mut shell| {
        shell.title = product.name.clone();
        render(&ProductTemplate {
            shell,
            product: ProductRow::from(&product),
        })
    })
}
