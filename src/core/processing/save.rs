use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

use crate::error::{Error, Result};
use crate::io::writers::jpeg::write_rgba_jpeg;
use crate::io::writers::metadata::{CropMetadata, create_json_sidecar};
use crate::io::writers::png::write_rgba_png;
use crate::io::writers::tiff::write_rgba_tiff;
use crate::types::OutputFormat;

/// Encode an RGBA thumbnail to `output`.
///
/// The file is written to a temporary sibling and renamed into place, so an
/// interrupted run never leaves a truncated image behind. When `metadata` is
/// given, TIFF outputs embed its summary and a JSON sidecar is written when
/// `sidecar` is set.
pub fn save_thumbnail(
    rgba: &[u8],
    cols: usize,
    rows: usize,
    output: &Path,
    format: OutputFormat,
    quality: u8,
    metadata: Option<&CropMetadata<'_>>,
    sidecar: bool,
) -> Result<()> {
    let parent = match output.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let tmp = tempfile::Builder::new()
        .prefix(".smartthumb-")
        .suffix(&format!(".{}", format.extension()))
        .tempfile_in(parent)?;

    {
        let mut writer = BufWriter::new(tmp.as_file());
        match format {
            OutputFormat::JPEG => write_rgba_jpeg(&mut writer, cols, rows, rgba, quality)?,
            OutputFormat::PNG => write_rgba_png(&mut writer, cols, rows, rgba)?,
            OutputFormat::TIFF => {
                let description = metadata.map(|m| m.description());
                write_rgba_tiff(&mut writer, cols, rows, rgba, description.as_deref())?
            }
        }
        writer.flush()?;
    }

    tmp.persist(output).map_err(|e| Error::Io(e.error))?;
    info!("Saved {} {}x{} thumbnail: {:?}", format, cols, rows, output);

    if let Some(meta) = metadata.filter(|_| sidecar) {
        create_json_sidecar(output, meta)?;
    }
    Ok(())
}
