use jpeg_encoder::{ColorType, Encoder};
use std::io::Write;

use crate::error::{Error, Result};

fn jpeg_dimension(value: usize) -> Result<u16> {
    u16::try_from(value).map_err(|_| Error::InvalidArgument {
        arg: "jpeg dimension",
        value: value.to_string(),
    })
}

/// Encodes interleaved RGBA as baseline JPEG. Alpha is dropped.
pub fn write_rgba_jpeg<W: Write>(
    writer: W,
    cols: usize,
    rows: usize,
    rgba_data: &[u8],
    quality: u8,
) -> Result<()> {
    let encoder = Encoder::new(writer, quality);
    encoder
        .encode(
            rgba_data,
            jpeg_dimension(cols)?,
            jpeg_dimension(rows)?,
            ColorType::Rgba,
        )
        .map_err(Error::external)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_jpeg_magic() {
        let mut out = Vec::new();
        write_rgba_jpeg(&mut out, 4, 4, &[128u8; 64], 90).unwrap();
        assert_eq!(&out[0..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn rejects_oversized_dimensions() {
        let mut out = Vec::new();
        assert!(write_rgba_jpeg(&mut out, 70_000, 1, &[], 90).is_err());
    }
}
