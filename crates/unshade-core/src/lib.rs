//! Unshade Core Library
//!
//! Removes uneven lighting ("gradient") artifacts from photographs of
//! fabric while preserving thread-level texture and color fidelity.
//!
//! The pipeline is a linear sequence: decode an embedded image, extract
//! the user-selected region, estimate a per-pixel multiplicative
//! correction map over that region, apply the correction to the full
//! image at multiple texture scales, and re-encode the result.

pub mod apply;
pub mod codec;
pub mod color;
pub mod diagnostics;
pub mod error;
pub mod estimator;
pub mod fft;
pub mod imageops;
pub mod models;
pub mod pattern;
pub mod pipeline;
pub mod raster;
pub mod region;

// Re-export commonly used types
pub use error::{CodecError, PipelineError};
pub use estimator::{CorrectionBounds, CorrectionMap};
pub use models::{Mode, Selection, StrengthSettings};
pub use pipeline::{process_gradient_removal, ProcessedOutput};
pub use raster::{Plane, RasterImage};
