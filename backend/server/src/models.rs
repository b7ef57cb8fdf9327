use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub const FALLBACK_CATEGORY: &str = "Drugo";
pub const ALL_CATEGORIES: &str = "Vse";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: f64,
    pub image: String,
}

#[derive(Deserialize, Default)]
pub struct NewCategory {
    pub name: Option<String>,
}

#[derive(Serialize)]
pub struct CategoryCreated {
    pub name: String,
}

/// Body of `POST /products`. Everything is optional here so that a missing
/// field surfaces as a validation error instead of a decode failure.
#[derive(Deserialize, Default)]
pub struct NewProduct {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Option<PriceInput>,
    pub image: Option<String>,
}

/// Body of `PUT /products/{id}`. Absent fields keep their stored value.
#[derive(Deserialize, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Option<PriceInput>,
    pub image: Option<String>,
}

/// Clients send prices both as numbers and as form strings.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum PriceInput {
    Number(f64),
    Text(String),
}

impl PriceInput {
    pub fn to_price(&self) -> Result<f64, AppError> {
        let price = match self {
            PriceInput::Number(n) => *n,
            PriceInput::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| AppError::Validation(format!("Price {s:?} is not a number")))?,
        };

        if !price.is_finite() || price < 0.0 {
            return Err(AppError::Validation(format!(
                "Price must be a non-negative number, got {price}"
            )));
        }

        Ok(price)
    }
}

#[derive(Deserialize, Default)]
pub struct ProductQuery {
    pub category: Option<String>,
    pub q: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub image_url: String,
}
