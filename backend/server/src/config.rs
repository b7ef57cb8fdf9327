use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use tracing::{info, warn};

use crate::error::AppError;

pub struct Config {
    pub port: u16,
    pub public_base_url: String,
    pub uploads_dir: PathBuf,
    pub upload_limit_bytes: usize,
    pub seed_catalog: bool,
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        let port: u16 = try_load("PORT", "5000")?;
        let default_base = format!("http://localhost:{port}");

        Ok(Self {
            port,
            public_base_url: trim_base_url(try_load("PUBLIC_BASE_URL", &default_base)?),
            uploads_dir: try_load("UPLOADS_DIR", "uploads")?,
            upload_limit_bytes: try_load("UPLOAD_LIMIT_BYTES", "10485760")?,
            seed_catalog: try_load("SEED_CATALOG", "true")?,
        })
    }
}

fn trim_base_url(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T, AppError>
where
    T::Err: Display,
{
    let raw = var(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    parse_value(key, &raw)
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> Result<T, AppError>
where
    T::Err: Display,
{
    raw.trim().parse().map_err(|e| {
        warn!("Invalid {key} value: {e}");
        AppError::Config(format!("invalid {key} value {raw:?}: {e}"))
    })
}
