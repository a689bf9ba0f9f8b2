//! Encoders for thumbnail outputs and the crop metadata sidecar.
pub mod jpeg;
pub mod metadata;
pub mod png;
pub mod tiff;

pub use metadata::{CropMetadata, create_json_sidecar};
