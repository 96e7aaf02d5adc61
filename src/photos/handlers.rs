//! # Photo API Handlers
//!
//! Wire types and axum handlers for the two photo endpoints. Field names are
//! the gateway's public contract and must stay exactly as the existing
//! clients send and expect them (`fotoBase64`, `nombreArchivo`, `nombre`,
//! `archivo`).

use axum::extract::{Path, State};
use axum::Json;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::ApiError;
use crate::router::AppState;

#[derive(Debug, Deserialize)]
pub struct SaveFotoBody {
    #[serde(default, rename = "fotoBase64")]
    pub foto_base64: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FotoGuardada {
    pub mensaje: String,
    #[serde(rename = "nombreArchivo")]
    pub nombre_archivo: String,
}

#[derive(Debug, Serialize)]
pub struct FotoEncontrada {
    pub nombre: String,
    pub archivo: String,
}

/// `POST /api/fotos/:dni`
pub async fn save_foto(
    State(state): State<Arc<AppState>>,
    Path(dni): Path<String>,
    Json(body): Json<SaveFotoBody>,
) -> Result<Json<FotoGuardada>, ApiError> {
    let nombre_archivo = state
        .photos
        .save(&dni, body.foto_base64.as_deref())
        .await?;

    Ok(Json(FotoGuardada {
        mensaje: "Foto guardada exitosamente".to_string(),
        nombre_archivo,
    }))
}

/// `GET /api/fotos/:dni`. A miss is `200 null`, not an error.
pub async fn find_foto(
    State(state): State<Arc<AppState>>,
    Path(dni): Path<String>,
) -> Result<Json<Option<FotoEncontrada>>, ApiError> {
    let found = state.photos.find(&dni).await?;

    Ok(Json(found.map(|photo| FotoEncontrada {
        nombre: photo.name,
        archivo: BASE64.encode(&photo.bytes),
    })))
}
