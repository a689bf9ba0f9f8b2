use clap::Parser;
use std::path::PathBuf;

use smartthumb::{FitMode, OutputFormat};

#[derive(Parser)]
#[command(name = "smartthumb", version, about = "Content-aware thumbnail cropper")]
pub struct CliArgs {
    /// Input image (single file mode)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Input directory containing images (batch mode)
    #[arg(long)]
    pub input_dir: Option<PathBuf>,

    /// Output filename (single file mode)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output directory for batch processing (batch mode)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Thumbnail width in pixels (overrides config)
    #[arg(long)]
    pub width: Option<u32>,

    /// Thumbnail height in pixels (overrides config)
    #[arg(long)]
    pub height: Option<u32>,

    /// Output format (jpeg, tiff or png)
    #[arg(short = 'f', long, value_enum)]
    pub format: Option<OutputFormat>,

    /// JPEG quality (1-100)
    #[arg(short, long)]
    pub quality: Option<u8>,

    /// How the crop is fitted to the thumbnail (stretch or extent)
    #[arg(long, value_enum)]
    pub fit: Option<FitMode>,

    /// Analyze large images at full resolution instead of a ~256px copy
    #[arg(long, default_value_t = false)]
    pub no_prescale: bool,

    /// JSON config file: thumbnail parameters, or a bare properties object
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Property override as key=value; the value is parsed as JSON.
    /// May be repeated, e.g. --property skinWeight=2.5 --property 'skinColor=[0.8,0.6,0.5]'
    #[arg(short, long = "property", value_name = "KEY=VALUE")]
    pub properties: Vec<String>,

    /// Write a JSON sidecar with the chosen crop next to each output
    #[arg(long, default_value_t = false)]
    pub sidecar: bool,

    /// Write a <output>.analysis.png rendering of the feature maps
    #[arg(long, default_value_t = false)]
    pub debug_output: bool,

    /// Print the crop result as JSON and write nothing
    #[arg(long, default_value_t = false)]
    pub analyze: bool,

    /// Enable logging
    #[arg(long, default_value_t = false)]
    pub log: bool,

    /// Batch mode: continue processing other files when one fails
    #[arg(long, default_value_t = false)]
    pub batch: bool,
}
