//! Shared types and enums used across smartthumb.
//! Includes `OutputFormat`, `FitMode` and the `AnalysisChannel` layout of the
//! analysis buffers.
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(
    Copy,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Debug,
    ValueEnum,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    JPEG,
    TIFF,
    PNG,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::JPEG => "jpg",
            OutputFormat::TIFF => "tiff",
            OutputFormat::PNG => "png",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::JPEG => write!(f, "JPEG"),
            OutputFormat::TIFF => write!(f, "TIFF"),
            OutputFormat::PNG => write!(f, "PNG"),
        }
    }
}

/// How the cropped region is mapped onto the target thumbnail size.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitMode {
    /// Resize the crop straight to the target dimensions.
    Stretch,
    /// Fit the crop inside the target preserving its aspect, then pad to the target size.
    Extent,
}

impl std::fmt::Display for FitMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FitMode::Stretch => write!(f, "Stretch"),
            FitMode::Extent => write!(f, "Extent"),
        }
    }
}

/// Feature maps stored in the four channels of an analysis buffer.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum AnalysisChannel {
    Skin = 0,
    Detail = 1,
    Saturation = 2,
    Boost = 3,
}

impl AnalysisChannel {
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}
