//! Gradient removal pipeline
//!
//! Linear orchestration: decode, extract the selection, estimate a
//! correction map, apply it, re-encode. Any codec failure aborts the
//! whole pipeline; numerical edge cases inside the estimator never do.

use tracing::info;

use crate::apply::apply_correction;
use crate::codec;
use crate::error::PipelineError;
use crate::estimator;
use crate::models::{Mode, Selection, StrengthSettings};
use crate::region::extract_region;

/// Terminal pipeline result: the encoded image plus the echoed mode and
/// selection.
#[derive(Debug, Clone)]
pub struct ProcessedOutput {
    /// Corrected image as a JPEG data URL.
    pub image: String,

    /// The mode that ran.
    pub mode: Mode,

    /// The selection that was corrected.
    pub selection: Selection,
}

/// Run the full gradient removal pipeline on an encoded image.
///
/// The caller (the service shell) is responsible for validating field
/// presence and parameter ranges; the core assumes valid input.
pub fn process_gradient_removal(
    image_data_url: &str,
    selection: Selection,
    mode: Mode,
    settings: StrengthSettings,
) -> Result<ProcessedOutput, PipelineError> {
    info!(
        mode = mode.as_str(),
        gradient_strength = settings.gradient_strength,
        brightness_preservation = settings.brightness_preservation,
        color_preservation = settings.color_preservation,
        "processing gradient removal"
    );

    let image = codec::decode_data_url(image_data_url).map_err(PipelineError::Decode)?;
    info!(width = image.width, height = image.height, "decoded image");

    let region = extract_region(&image, &selection);
    info!(width = region.width, height = region.height, "extracted selection area");

    let map = estimator::estimate(&region, mode);
    let corrected = apply_correction(&image, &map, mode, &settings);

    let encoded = codec::encode_data_url(&corrected).map_err(PipelineError::Encode)?;
    info!("gradient removal completed");

    Ok(ProcessedOutput {
        image: encoded,
        mode,
        selection,
    })
}
