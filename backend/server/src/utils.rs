use std::{io::ErrorKind, path::Path};

use axum::{
    extract::{Multipart, multipart::MultipartError},
    http::StatusCode,
};
use chrono::Utc;
use tokio::{
    fs::{File, OpenOptions, remove_file},
    io::AsyncWriteExt,
};
use tracing::{info, warn};

use crate::error::AppError;

pub const UPLOAD_FIELD: &str = "image";
pub const UPLOADS_PREFIX: &str = "/uploads";

pub struct UploadedFile {
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

/// Pulls the `image` file out of a multipart body. Other fields, and an `image` field sent as
/// plain text, are skipped.
pub async fn read_upload(mut multipart: Multipart) -> Result<UploadedFile, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let bytes = field.bytes().await.map_err(multipart_error)?;

        return Ok(UploadedFile {
            file_name: Some(file_name),
            bytes: bytes.to_vec(),
        });
    }

    Err(AppError::Validation("Missing file".to_string()))
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge
    } else {
        AppError::MalformedPayload
    }
}

/// `.png` for `photo.PNG`, empty when there is no usable extension.
pub fn extension(file_name: Option<&str>) -> String {
    file_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| format!(".{}", ext.to_lowercase()))
        .unwrap_or_default()
}

pub fn stored_name(millis: i64, extension: &str) -> String {
    format!("{millis}{extension}")
}

/// Writes the upload under a `<unix-millis><ext>` name, bumping the timestamp until the name is
/// free. Never overwrites an existing file.
pub async fn store_upload(dir: &Path, upload: &UploadedFile) -> Result<String, AppError> {
    let extension = extension(upload.file_name.as_deref());
    let mut millis = Utc::now().timestamp_millis();

    loop {
        let name = stored_name(millis, &extension);
        let path = dir.join(&name);

        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(mut file) => {
                if let Err(e) = write_file(&mut file, &upload.bytes).await {
                    drop(file);
                    if let Err(cleanup) = remove_file(&path).await {
                        warn!("Failed to remove partial upload {name}: {cleanup}");
                    }

                    return Err(e.into());
                }

                info!("Stored upload {name} ({} bytes)", upload.bytes.len());
                return Ok(name);
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => millis += 1,
            Err(e) => return Err(e.into()),
        }
    }
}

async fn write_file(file: &mut File, bytes: &[u8]) -> std::io::Result<()> {
    file.write_all(bytes).await?;
    file.flush().await
}

pub fn public_url(base_url: &str, file_name: &str) -> String {
    format!("{base_url}{UPLOADS_PREFIX}/{file_name}")
}
