//! Unshade HTTP service
//!
//! Thin shell around the gradient removal core: request validation,
//! routing, and error-to-status mapping. All image processing happens
//! in `unshade-core`.

pub mod api;
pub mod error;
pub mod server;

pub use server::build_router;
