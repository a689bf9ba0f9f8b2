use std::fs;
use std::path::Path;

use serde_json::{Map, Value};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use smartthumb::api::iterate_directory;
use smartthumb::io::is_supported_image;
use smartthumb::{
    Properties, ThumbnailParams, find_crop_for_path, process_directory_to_path, thumbnail_to_path,
};

use super::args::CliArgs;
use super::errors::AppError;

/// Keys that mark a config file as full thumbnail parameters rather than bare properties.
const PARAMS_KEYS: [&str; 7] = [
    "properties",
    "format",
    "quality",
    "fit",
    "prescale",
    "sidecar",
    "debug_output",
];

fn load_config(path: &Path) -> Result<ThumbnailParams, AppError> {
    let text = fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&text)?;
    let Value::Object(map) = value else {
        return Err(AppError::InvalidConfig {
            path: path.display().to_string(),
        });
    };

    if map.keys().any(|k| PARAMS_KEYS.contains(&k.as_str())) {
        Ok(serde_json::from_value(Value::Object(map))?)
    } else {
        Ok(ThumbnailParams {
            properties: Properties::from_overrides(&map)?,
            ..ThumbnailParams::default()
        })
    }
}

fn parse_property(raw: &str) -> Result<(String, Value), AppError> {
    let invalid = || AppError::InvalidProperty {
        value: raw.to_string(),
    };
    let (key, value) = raw.split_once('=').ok_or_else(invalid)?;
    let key = key.trim();
    if key.is_empty() {
        return Err(invalid());
    }
    let value = serde_json::from_str(value.trim()).map_err(|_| invalid())?;
    Ok((key.to_string(), value))
}

/// Config file, then `--property` overrides, then dedicated flags.
fn build_params(args: &CliArgs) -> Result<ThumbnailParams, AppError> {
    let mut params = match &args.config {
        Some(path) => load_config(path)?,
        None => ThumbnailParams::default(),
    };

    let mut overrides = Map::new();
    for raw in &args.properties {
        let (key, value) = parse_property(raw)?;
        overrides.insert(key, value);
    }
    if let Some(width) = args.width {
        overrides.insert("resizeWidth".to_string(), Value::from(width));
    }
    if let Some(height) = args.height {
        overrides.insert("resizeHeight".to_string(), Value::from(height));
    }
    params.properties = params.properties.merged(&overrides)?;

    if let Some(format) = args.format {
        params.format = format;
    }
    if let Some(quality) = args.quality {
        params.quality = quality;
    }
    if let Some(fit) = args.fit {
        params.fit = fit;
    }
    if args.no_prescale {
        params.prescale = false;
    }
    params.sidecar |= args.sidecar;
    params.debug_output |= args.debug_output;

    params.validate()?;
    Ok(params)
}

fn analyze_single(input: &Path, params: &ThumbnailParams) -> Result<(), AppError> {
    let result = find_crop_for_path(input, &params.properties, params.prescale)?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn analyze_directory(input_dir: &Path, params: &ThumbnailParams, batch: bool) -> Result<(), AppError> {
    let mut results = Map::new();
    for path in iterate_directory(input_dir)?.filter(|p| p.is_file() && is_supported_image(p)) {
        match find_crop_for_path(&path, &params.properties, params.prescale) {
            Ok(result) => {
                results.insert(path.display().to_string(), serde_json::to_value(result)?);
            }
            Err(e) if batch => warn!("Error analyzing {:?}: {}", path, e),
            Err(e) => return Err(e.into()),
        }
    }
    println!("{}", serde_json::to_string_pretty(&Value::Object(results))?);
    Ok(())
}

pub fn run(args: CliArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.log {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    let params = build_params(&args)?;
    info!(
        "Target {}x{}, format {}, fit {}",
        params.properties.resize_width, params.properties.resize_height, params.format, params.fit
    );

    let batch_mode = args.batch || args.input_dir.is_some();

    if batch_mode {
        let input_dir = args.input_dir.ok_or(AppError::MissingArgument {
            arg: "--input-dir".to_string(),
        })?;

        if args.analyze {
            return Ok(analyze_directory(&input_dir, &params, args.batch)?);
        }

        let output_dir = args.output_dir.ok_or(AppError::MissingArgument {
            arg: "--output-dir".to_string(),
        })?;

        info!("Starting batch processing from directory: {:?}", input_dir);
        info!("Output directory: {:?}", output_dir);

        let report = process_directory_to_path(&input_dir, &output_dir, &params, args.batch)?;

        info!("Batch processing complete!");
        info!("Processed: {}", report.processed);
        info!("Skipped: {}", report.skipped);
        info!("Errors: {}", report.errors);
    } else {
        let input = args.input.ok_or(AppError::MissingArgument {
            arg: "--input".to_string(),
        })?;

        if args.analyze {
            return Ok(analyze_single(&input, &params)?);
        }

        let output = args.output.ok_or(AppError::MissingArgument {
            arg: "--output".to_string(),
        })?;

        let result = thumbnail_to_path(&input, &output, &params)?;
        info!(
            "Successfully processed: {:?} -> {:?} (crop {}x{}+{}+{})",
            input, output, result.crop.width, result.crop.height, result.crop.x, result.crop.y
        );
    }

    Ok(())
}
