//! # Photo Store
//!
//! Reads and writes photo files on the mounted share, keyed by national ID.
//! Every operation first goes through
//! [`ShareConnectionManager::ensure_connected`] so an unreachable share gets
//! exactly one reconnect attempt before the request fails.
//!
//! Writes always produce the canonical name `DNI<id>.jpg`; the `.jpg`
//! extension is a deliberate normalization, whatever format the data URI
//! declared. Reads match any image file containing the ID as a
//! case-insensitive substring; that weaker match is kept on purpose for
//! compatibility with files already on the share.
//!
//! Concurrent saves and reads of the same ID are not synchronized: last
//! writer wins, and a reader racing a writer can observe a torn file. In
//! practice one client at a time drives one record.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use log::info;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::ApiError;
use crate::share::ShareConnectionManager;

/// Formats accepted in the upload data URI.
const DATA_URI_FORMATS: [&str; 4] = ["png", "jpeg", "jpg", "gif"];

/// Extensions treated as photos when scanning the share.
const IMAGE_EXTENSIONS: [&str; 4] = [".jpg", ".jpeg", ".png", ".gif"];

/// A photo read back from the share.
#[derive(Debug)]
pub struct StoredPhoto {
    pub name: String,
    pub bytes: Vec<u8>,
}

pub struct PhotoStore {
    dir: PathBuf,
    share: Arc<ShareConnectionManager>,
}

impl PhotoStore {
    pub fn new(dir: PathBuf, share: Arc<ShareConnectionManager>) -> Self {
        Self { dir, share }
    }

    /// Validate and store an uploaded photo, returning the generated
    /// filename `DNI<dni>.jpg`.
    ///
    /// # Errors
    /// - `Validation` for an empty DNI, a missing payload, a malformed data
    ///   URI, or a payload that does not decode as base64, all rejected
    ///   before any share I/O
    /// - `ShareUnavailable` when the share is down and reconnecting failed
    /// - `Io` when the write itself fails
    pub async fn save(&self, dni: &str, foto_base64: Option<&str>) -> Result<String, ApiError> {
        validate_dni(dni)?;

        let payload = foto_base64
            .ok_or_else(|| ApiError::validation("No se proporcionó la imagen"))?;
        let encoded = strip_data_uri(payload)?;

        self.share
            .ensure_connected()
            .await
            .map_err(|_| ApiError::ShareUnavailable)?;

        let bytes = BASE64
            .decode(encoded)
            .map_err(|_| ApiError::validation("Formato de imagen no válido"))?;

        let file_name = format!("DNI{}.jpg", dni);
        let path = self.dir.join(&file_name);
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| ApiError::io("Error al guardar la foto", e))?;

        info!("📷 Stored photo {} ({} bytes)", file_name, bytes.len());
        Ok(file_name)
    }

    /// Look up a photo by DNI: first image file in directory-listing order
    /// whose name contains the ID, case-insensitively.
    ///
    /// Returns `Ok(None)` when nothing matches: an explicit "not found",
    /// distinct from a connectivity or I/O error.
    pub async fn find(&self, dni: &str) -> Result<Option<StoredPhoto>, ApiError> {
        validate_dni(dni)?;

        self.share
            .ensure_connected()
            .await
            .map_err(|_| ApiError::ShareUnavailable)?;

        let mut entries = tokio::fs::read_dir(&self.dir)
            .await
            .map_err(|e| ApiError::io("Error al acceder al directorio de fotos", e))?;

        let needle = dni.to_lowercase();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| ApiError::io("Error al acceder al directorio de fotos", e))?
        {
            let name = entry.file_name().to_string_lossy().into_owned();
            if !is_image_file(&name) || !name.to_lowercase().contains(&needle) {
                continue;
            }

            let bytes = tokio::fs::read(entry.path())
                .await
                .map_err(|e| ApiError::io("Error al procesar la foto", e))?;
            return Ok(Some(StoredPhoto { name, bytes }));
        }

        Ok(None)
    }
}

fn validate_dni(dni: &str) -> Result<(), ApiError> {
    if dni.trim().is_empty() {
        return Err(ApiError::validation("DNI no válido"));
    }
    Ok(())
}

/// Check the `data:image/<fmt>;base64,` prefix and return the payload that
/// follows it.
fn strip_data_uri(payload: &str) -> Result<&str, ApiError> {
    let invalid = || ApiError::validation("Formato de imagen no válido");

    let rest = payload.strip_prefix("data:image/").ok_or_else(invalid)?;
    let (format, encoded) = rest.split_once(";base64,").ok_or_else(invalid)?;
    if !DATA_URI_FORMATS.contains(&format) {
        return Err(invalid());
    }
    Ok(encoded)
}

fn is_image_file(name: &str) -> bool {
    let lower = name.to_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}
