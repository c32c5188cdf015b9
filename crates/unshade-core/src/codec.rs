//! Transport image codec
//!
//! Images travel as base64 data URLs (`data:image/jpeg;base64,...`).
//! Decode accepts payloads with or without the scheme prefix, splitting
//! on the first comma. Encode always produces JPEG at quality 95, the
//! fixed output setting of the service.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use tracing::debug;

use crate::error::CodecError;
use crate::raster::RasterImage;

/// JPEG quality used for every encoded response.
const JPEG_QUALITY: u8 = 95;

/// Decode a base64 data URL (or bare base64 payload) into a raster.
///
/// Container format is sniffed from the decoded bytes; JPEG and PNG are
/// accepted and converted to RGB.
pub fn decode_data_url(data: &str) -> Result<RasterImage, CodecError> {
    let payload = match data.split_once(',') {
        Some((_scheme, payload)) => payload,
        None => data,
    };

    let bytes = BASE64.decode(payload)?;
    let decoded = image::load_from_memory(&bytes)
        .map_err(|e| CodecError::ImageDecode(e.to_string()))?;
    let rgb = decoded.to_rgb8();

    let (width, height) = rgb.dimensions();
    debug!(width, height, "decoded transport image");

    let data = rgb.into_raw().into_iter().map(f32::from).collect();
    // Length is guaranteed by the container decoder.
    Ok(RasterImage {
        width,
        height,
        data,
    })
}

/// Encode a raster to a JPEG data URL at the fixed quality setting.
///
/// Channel values are clamped to `[0,255]` and truncated to 8 bits.
pub fn encode_data_url(image: &RasterImage) -> Result<String, CodecError> {
    let pixels: Vec<u8> = image
        .data
        .iter()
        .map(|&v| v.clamp(0.0, 255.0) as u8)
        .collect();

    let mut bytes = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut bytes, JPEG_QUALITY);
    encoder
        .encode(&pixels, image.width, image.height, ExtendedColorType::Rgb8)
        .map_err(|e| CodecError::ImageEncode(e.to_string()))?;

    Ok(format!("data:image/jpeg;base64,{}", BASE64.encode(&bytes)))
}

/// PNG-encode a raster and wrap it in a data URL. Lossless, used to
/// build deterministic test inputs.
#[cfg(test)]
pub(crate) fn png_data_url(image: &RasterImage) -> String {
    use image::codecs::png::PngEncoder;
    use image::ImageEncoder;

    let pixels: Vec<u8> = image
        .data
        .iter()
        .map(|&v| v.clamp(0.0, 255.0) as u8)
        .collect();
    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes)
        .write_image(&pixels, image.width, image.height, ExtendedColorType::Rgb8)
        .unwrap();
    format!("data:image/png;base64,{}", BASE64.encode(&bytes))
}
