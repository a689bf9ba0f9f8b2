use std::io::{Seek, Write};
use tiff::encoder::{TiffEncoder, colortype};
use tiff::tags::Tag;

use crate::error::{Error, Result};

/// Encodes interleaved RGBA as an uncompressed TIFF, optionally tagging it with
/// an `ImageDescription`.
pub fn write_rgba_tiff<W: Write + Seek>(
    writer: W,
    cols: usize,
    rows: usize,
    rgba_data: &[u8],
    description: Option<&str>,
) -> Result<()> {
    let mut encoder = TiffEncoder::new(writer).map_err(Error::external)?;
    let mut image = encoder
        .new_image::<colortype::RGBA8>(cols as u32, rows as u32)
        .map_err(Error::external)?;
    if let Some(desc) = description {
        image
            .encoder()
            .write_tag(Tag::ImageDescription, desc)
            .map_err(Error::external)?;
    }
    image.write_data(rgba_data).map_err(Error::external)?;
    Ok(())
}
