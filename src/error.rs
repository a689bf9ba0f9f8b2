//! Crate-level error type and `Result` alias for stable, structured error handling.
//! Converts underlying I/O, decoder and JSON errors, and provides semantic variants
//! for malformed pixel buffers, rejected configuration and failed crop searches.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(
        "Pixel buffer length {actual} does not match {width}x{height} RGBA (expected {expected})"
    )]
    InputShape {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },

    #[error(
        "No crop candidate fits a {image_width}x{image_height} image \
         (crop {crop_width}x{crop_height}, scales {min_scale}..={max_scale})"
    )]
    DegenerateSearch {
        image_width: usize,
        image_height: usize,
        crop_width: usize,
        crop_height: usize,
        min_scale: f64,
        max_scale: f64,
    },

    #[error("Unknown property: {key}")]
    UnknownProperty { key: String },

    #[error("Property {key} must be numeric, got: {value}")]
    NonNumericProperty { key: String, value: String },

    #[error("Invalid argument: {arg}={value}")]
    InvalidArgument { arg: &'static str, value: String },

    #[error("Processing error: {0}")]
    Processing(String),

    #[error("External error: {0}")]
    External(String),
}

impl Error {
    pub fn external<E: std::fmt::Display>(e: E) -> Self {
        Error::External(e.to_string())
    }
}
