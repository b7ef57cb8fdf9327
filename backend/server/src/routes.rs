use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Multipart, Path, Query, State, multipart::MultipartRejection,
        rejection::JsonRejection,
    },
    http::StatusCode,
};
use tracing::warn;

use crate::{
    error::AppError,
    models::{
        CategoryCreated, NewCategory, NewProduct, Product, ProductPatch, ProductQuery,
        UploadResponse,
    },
    search::filter_products,
    state::State as AppState,
    utils::{public_url, read_upload, store_upload},
};

type Shared = State<Arc<AppState>>;

pub async fn list_categories_handler(State(state): Shared) -> Json<Vec<String>> {
    Json(state.catalog.read().list_categories().to_vec())
}

pub async fn add_category_handler(
    State(state): Shared,
    payload: Result<Json<NewCategory>, JsonRejection>,
) -> Result<(StatusCode, Json<CategoryCreated>), AppError> {
    let Json(payload) = payload.inspect_err(|e| warn!("Rejected category payload: {e}"))?;

    let name = state
        .catalog
        .write()
        .add_category(payload.name.as_deref().unwrap_or_default())?;

    Ok((StatusCode::CREATED, Json(CategoryCreated { name })))
}

pub async fn remove_category_handler(
    State(state): Shared,
    Path(name): Path<String>,
) -> StatusCode {
    state.catalog.write().remove_category(&name);

    StatusCode::NO_CONTENT
}

pub async fn list_products_handler(
    State(state): Shared,
    Query(query): Query<ProductQuery>,
) -> Json<Vec<Product>> {
    let catalog = state.catalog.read();

    Json(
        filter_products(catalog.list_products(), &query)
            .into_iter()
            .cloned()
            .collect(),
    )
}

pub async fn get_product_handler(
    State(state): Shared,
    Path(id): Path<String>,
) -> Result<Json<Product>, AppError> {
    Ok(Json(state.catalog.read().get_product(&id)?.clone()))
}

pub async fn create_product_handler(
    State(state): Shared,
    payload: Result<Json<NewProduct>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    let Json(fields) = payload.inspect_err(|e| warn!("Rejected product payload: {e}"))?;

    let product = state
        .catalog
        .write()
        .create_product(fields)
        .inspect_err(|e| warn!("Product not created: {e}"))?;

    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update_product_handler(
    State(state): Shared,
    Path(id): Path<String>,
    payload: Result<Json<ProductPatch>, JsonRejection>,
) -> Result<Json<Product>, AppError> {
    let Json(patch) = match payload {
        Ok(patch) => patch,
        Err(e) => {
            state.catalog.read().get_product(&id)?;
            warn!("Rejected patch for {id}: {e}");

            return Err(e.into());
        }
    };

    Ok(Json(state.catalog.write().update_product(&id, patch)?))
}

pub async fn delete_product_handler(
    State(state): Shared,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.catalog.write().delete_product(&id)?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn upload_handler(
    State(state): Shared,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, AppError> {
    let multipart = multipart.map_err(|e| {
        warn!("Rejected upload: {e}");
        AppError::MalformedPayload
    })?;

    let upload = read_upload(multipart)
        .await
        .inspect_err(|e| warn!("Upload failed: {e}"))?;
    let file_name = store_upload(&state.config.uploads_dir, &upload).await?;

    Ok(Json(UploadResponse {
        image_url: public_url(&state.config.public_base_url, &file_name),
    }))
}
