//! I/O layer: decoding source images into pixel buffers and `writers` for
//! JPEG/TIFF/PNG thumbnails and JSON crop sidecars.
pub mod reader;
pub use reader::{is_supported_image, open_image, pixel_buffer_from_image};

pub mod writers;
