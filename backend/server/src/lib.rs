//! Documentation of a small shop catalog API.
//!
//! Categories, products and uploaded product images for a storefront and its admin screen.
//!
//!
//!
//! # General Infrastructure
//! - Single process, everything lives in memory (see [`database`])
//! - Browser storefront/admin talk JSON to this server, CORS is open
//! - Images are uploaded as multipart, written to a local directory and served back under `/uploads`
//! - Restarting the process drops every change, uploads on disk are kept but no longer referenced
//!
//!
//!
//! # Endpoints
//!
//! | Method & Path | Body | Success | Failure |
//! |---|---|---|---|
//! | GET /categories | - | 200, array of names | - |
//! | POST /categories | `{name}` | 201, `{name}` | 400 missing name, 409 duplicate |
//! | DELETE /categories/{name} | - | 204 | never, unknown names are a no-op |
//! | GET /products?category=&q= | - | 200, array of products, newest first | - |
//! | GET /products/{id} | - | 200, product | 404 |
//! | POST /products | `{name, description, category, price, image?}` | 201, product | 400 |
//! | PUT /products/{id} | any product fields | 200, product | 404 (checked first), 400 |
//! | DELETE /products/{id} | - | 204 | 404 |
//! | POST /upload | multipart file field `image` | 200, `{imageUrl}` | 400, 413 over limit |
//!
//! Errors come back as `{"error": "<message>"}`.
//!
//!
//!
//! # Notes
//!
//! ## Locking
//! The catalog sits behind a single `RwLock`. Every operation is synchronous and the lock is
//! never held across an `.await`, so handlers cannot interleave a read and a later write.
//! Moving the catalog to async storage would need a real transaction story.
//!
//! ## Admin Login
//! The admin screen checks a hardcoded credential in the browser. That is not a security
//! boundary, this server accepts writes from anyone who can reach it.
//!
//!
//!
//! # Setup
//!
//! Run with defaults (port 5000, uploads in `./uploads`, demo catalog).
//! ```sh
//! cargo run -p catalog
//! ```
//!
//! Behind a proxy.
//! ```sh
//! PORT=8080 PUBLIC_BASE_URL=https://shop.example/api RUST_LOG=info cargo run -p catalog
//! ```
//!
//! Start empty.
//! ```sh
//! SEED_CATALOG=false cargo run -p catalog
//! ```
//!
//! View current docs.
//! ```sh
//! cargo doc --open
//! ```
use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{Method, header::CONTENT_TYPE},
    routing::{delete, get, post},
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{fs::create_dir_all, net::TcpListener, signal};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod database;
pub mod error;
pub mod models;
pub mod routes;
pub mod search;
pub mod state;
pub mod utils;


use config::Config;
use error::AppError;
use routes::{
    add_category_handler, create_product_handler, delete_product_handler, get_product_handler,
    list_categories_handler, list_products_handler, remove_category_handler,
    update_product_handler, upload_handler,
};
use state::State;
use utils::UPLOADS_PREFIX;

pub async fn start_server() -> Result<(), AppError> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Loading config...");
    let config = Config::load()?;

    create_dir_all(&config.uploads_dir).await?;
    info!("Serving uploads from {}", config.uploads_dir.display());

    info!("Initializing state...");
    let state = State::new(config);

    info!("Starting server...");
    let app = build_router(state.clone());

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");

    Ok(())
}

pub fn build_router(state: Arc<State>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route(
            "/categories",
            get(list_categories_handler).post(add_category_handler),
        )
        .route("/categories/{name}", delete(remove_category_handler))
        .route(
            "/products",
            get(list_products_handler).post(create_product_handler),
        )
        .route(
            "/products/{id}",
            get(get_product_handler)
                .put(update_product_handler)
                .delete(delete_product_handler),
        )
        .route(
            "/upload",
            post(upload_handler).layer(DefaultBodyLimit::max(state.config.upload_limit_bytes)),
        )
        .nest_service(UPLOADS_PREFIX, ServeDir::new(&state.config.uploads_dir))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
