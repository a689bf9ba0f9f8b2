use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use std::io::Write;

use crate::error::Result;

pub fn write_rgba_png<W: Write>(writer: W, cols: usize, rows: usize, rgba_data: &[u8]) -> Result<()> {
    PngEncoder::new(writer).write_image(
        rgba_data,
        cols as u32,
        rows as u32,
        ExtendedColorType::Rgba8,
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_png_signature() {
        let mut out = Vec::new();
        write_rgba_png(&mut out, 3, 2, &[200u8; 24]).unwrap();
        assert_eq!(&out[0..8], b"\x89PNG\r\n\x1a\n");
    }
}
