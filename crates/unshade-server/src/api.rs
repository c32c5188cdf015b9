//! Gradient removal API handlers
//!
//! Request validation lives here, in front of the core: required fields
//! present, mode one of the two literals, all four selection keys
//! present, strengths within range. The core assumes valid input.

use axum::{response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use unshade_core::{process_gradient_removal, Mode, Selection, StrengthSettings};

use crate::error::ApiError;

/// Incoming request body. Required fields are modeled as `Option` so
/// their absence maps to the documented 400 messages instead of a
/// deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct GradientRemovalRequest {
    pub image: Option<String>,
    pub selection: Option<SelectionBody>,
    pub mode: Option<String>,
    #[serde(default)]
    pub settings: SettingsBody,
}

/// Selection with every key optional, validated for presence.
#[derive(Debug, Deserialize)]
pub struct SelectionBody {
    pub left: Option<f32>,
    pub top: Option<f32>,
    pub width: Option<f32>,
    pub height: Option<f32>,
}

/// Strength settings with the original service's defaults.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsBody {
    pub gradient_strength: f32,
    pub brightness_preservation: f32,
    pub color_preservation: f32,
}

impl Default for SettingsBody {
    fn default() -> Self {
        let defaults = StrengthSettings::default();
        Self {
            gradient_strength: defaults.gradient_strength,
            brightness_preservation: defaults.brightness_preservation,
            color_preservation: defaults.color_preservation,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GradientRemovalResponse {
    #[serde(rename = "processedImage")]
    pub processed_image: String,
    pub mode: Mode,
    pub selection: Selection,
    pub status: &'static str,
}

fn validate(
    request: GradientRemovalRequest,
) -> Result<(String, Selection, Mode, StrengthSettings), ApiError> {
    let image = request.image.ok_or(ApiError::MissingField("image"))?;
    let selection = request.selection.ok_or(ApiError::MissingField("selection"))?;
    let mode = request.mode.ok_or(ApiError::MissingField("mode"))?;

    let selection = Selection {
        left: selection.left.ok_or(ApiError::InvalidSelection)?,
        top: selection.top.ok_or(ApiError::InvalidSelection)?,
        width: selection.width.ok_or(ApiError::InvalidSelection)?,
        height: selection.height.ok_or(ApiError::InvalidSelection)?,
    };

    let mode: Mode = mode.parse().map_err(|_| ApiError::InvalidMode)?;

    let settings = StrengthSettings {
        gradient_strength: request.settings.gradient_strength,
        brightness_preservation: request.settings.brightness_preservation,
        color_preservation: request.settings.color_preservation,
    };
    for (name, value) in [
        ("gradientStrength", settings.gradient_strength),
        ("brightnessPreservation", settings.brightness_preservation),
        ("colorPreservation", settings.color_preservation),
    ] {
        if !(0.0..=1.0).contains(&value) {
            return Err(ApiError::InvalidStrength(name));
        }
    }

    Ok((image, selection, mode, settings))
}

/// `POST /api/gradient-removal`
pub async fn handle_gradient_removal(
    Json(request): Json<GradientRemovalRequest>,
) -> Result<Json<GradientRemovalResponse>, ApiError> {
    let (image, selection, mode, settings) = validate(request)?;

    info!(mode = mode.as_str(), ?selection, "gradient removal request");

    // The pipeline is CPU-bound; keep it off the async workers.
    let output = tokio::task::spawn_blocking(move || {
        process_gradient_removal(&image, selection, mode, settings)
    })
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "pipeline task panicked");
        ApiError::Internal
    })??;

    Ok(Json(GradientRemovalResponse {
        processed_image: output.image,
        mode: output.mode,
        selection: output.selection,
        status: "success",
    }))
}

/// `GET /health`
pub async fn handle_health() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": "gradient-removal-api",
    }))
}

/// `GET /api/gradient-removal/test`
pub async fn handle_test() -> impl IntoResponse {
    Json(json!({
        "message": "Gradient removal service is working",
        "available_modes": ["uniform", "advanced"],
        "status": "ready",
    }))
}
