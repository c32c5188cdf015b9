//! Typed errors for the processing core
//!
//! Only codec failures surface as errors; every numerical edge case in
//! the estimator has a documented fallback so the pipeline is total
//! once the input decodes.

use thiserror::Error;

/// Failures while decoding or encoding the transport image container.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("undecodable image payload: {0}")]
    ImageDecode(String),

    #[error("failed to encode output image: {0}")]
    ImageEncode(String),
}

/// Pipeline-level failures, distinguishing client input problems from
/// internal ones.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The supplied image payload could not be decoded (client input).
    #[error("image decode failed: {0}")]
    Decode(#[source] CodecError),

    /// The corrected raster could not be re-encoded (internal).
    #[error("image encode failed: {0}")]
    Encode(#[source] CodecError),
}

impl PipelineError {
    /// True when the failure was caused by the caller's input rather
    /// than internal state.
    pub fn is_client_error(&self) -> bool {
        matches!(self, PipelineError::Decode(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_classification() {
        let decode = PipelineError::Decode(CodecError::ImageDecode("bad header".into()));
        let encode = PipelineError::Encode(CodecError::ImageEncode("io".into()));
        assert!(decode.is_client_error());
        assert!(!encode.is_client_error());
    }

    #[test]
    fn test_error_messages() {
        let err = PipelineError::Decode(CodecError::ImageDecode("truncated".into()));
        assert_eq!(err.to_string(), "image decode failed: undecodable image payload: truncated");
    }
}
