//! # Product Filter
//!
//! Storefront filtering for `GET /products`.
//!
//! ## Query
//! - `category`: exact category name, `Vse` (all) or absent disables it
//! - `q`: case-insensitive substring of name + description, empty disables it
//!
//! Plain linear scan over the catalog, no index. The result keeps the catalog order, so newest
//! products stay on top.
use crate::models::{ALL_CATEGORIES, Product, ProductQuery};

pub fn filter_products<'a>(products: &'a [Product], query: &ProductQuery) -> Vec<&'a Product> {
    let category = query
        .category
        .as_deref()
        .filter(|c| !c.is_empty() && *c != ALL_CATEGORIES);

    let needle = query
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_lowercase);

    products
        .iter()
        .filter(|p| category.is_none_or(|c| p.category == c))
        .filter(|p| {
            needle
                .as_deref()
                .is_none_or(|n| haystack(p).contains(n))
        })
        .collect()
}

fn haystack(product: &Product) -> String {
    format!("{}{}", product.name, product.description).to_lowercase()
}
