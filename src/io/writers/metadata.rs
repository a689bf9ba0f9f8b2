use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::core::params::Properties;
use crate::core::processing::resize::CropRect;
use crate::core::processing::score::Crop;
use crate::error::Result;

/// Provenance of one thumbnail: where the crop came from and how it was found.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CropMetadata<'a> {
    pub source: String,
    pub source_width: usize,
    pub source_height: usize,
    pub output_width: usize,
    pub output_height: usize,
    pub crop: CropRect,
    pub analysis_crop: &'a Crop,
    pub prescale: f64,
    pub properties: &'a Properties,
    pub tool: &'static str,
    pub version: &'static str,
    pub generated_at: String,
}

impl<'a> CropMetadata<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        source: &Path,
        source_width: usize,
        source_height: usize,
        output_width: usize,
        output_height: usize,
        crop: CropRect,
        analysis_crop: &'a Crop,
        prescale: f64,
        properties: &'a Properties,
    ) -> Self {
        Self {
            source: source.display().to_string(),
            source_width,
            source_height,
            output_width,
            output_height,
            crop,
            analysis_crop,
            prescale,
            properties,
            tool: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            generated_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Compact one-line summary for embedding in a TIFF tag.
    pub fn description(&self) -> String {
        format!(
            "{} {}: crop {}x{}+{}+{} of {}x{}, score {:.6}",
            self.tool,
            self.version,
            self.crop.width,
            self.crop.height,
            self.crop.x,
            self.crop.y,
            self.source_width,
            self.source_height,
            self.analysis_crop.score.total
        )
    }
}

/// Path of the JSON sidecar belonging to `output_path`.
pub fn sidecar_path(output_path: &Path) -> PathBuf {
    output_path.with_extension("json")
}

/// Write `meta` as pretty JSON next to `output_path`.
pub fn create_json_sidecar(output_path: &Path, meta: &CropMetadata<'_>) -> Result<PathBuf> {
    let sidecar = sidecar_path(output_path);
    let json_string = serde_json::to_string_pretty(meta)?;
    std::fs::write(&sidecar, json_string)?;

    info!("Created crop metadata sidecar: {:?}", sidecar);
    Ok(sidecar)
}
