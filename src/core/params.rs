use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::types::{FitMode, OutputFormat};

/// Tuning knobs of the saliency analysis and crop search.
///
/// Built once per invocation from [`Properties::default`] merged with caller
/// overrides and never mutated afterwards. Values derived from the image size
/// (crop dimensions and the effective minimum scale) live in [`SearchGeometry`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct Properties {
    /// Target thumbnail width in pixels
    #[serde(alias = "resize_width")]
    pub resize_width: u32,
    /// Target thumbnail height in pixels
    #[serde(alias = "resize_height")]
    pub resize_height: u32,
    pub detail_weight: f64,
    /// Reference skin tone as a unit-ish RGB direction
    pub skin_color: [f64; 3],
    pub skin_bias: f64,
    pub skin_brightness_min: f64,
    pub skin_brightness_max: f64,
    pub skin_threshold: f64,
    pub skin_weight: f64,
    pub saturation_brightness_min: f64,
    pub saturation_brightness_max: f64,
    pub saturation_threshold: f64,
    pub saturation_bias: f64,
    pub saturation_weight: f64,
    /// Block size of the reduced scoring buffer
    pub score_down_sample: u32,
    /// Candidate origin stride in analysis pixels
    pub step: u32,
    pub scale_step: f64,
    pub min_scale: f64,
    pub max_scale: f64,
    pub edge_radius: f64,
    pub edge_weight: f64,
    pub outside_importance: f64,
    pub boost_weight: f64,
}

impl Default for Properties {
    fn default() -> Self {
        Self {
            resize_width: 210,
            resize_height: 210,
            detail_weight: 0.2,
            skin_color: [0.78, 0.57, 0.44],
            skin_bias: 0.01,
            skin_brightness_min: 0.2,
            skin_brightness_max: 1.0,
            skin_threshold: 0.8,
            skin_weight: 1.8,
            saturation_brightness_min: 0.05,
            saturation_brightness_max: 0.9,
            saturation_threshold: 0.4,
            saturation_bias: 0.2,
            saturation_weight: 0.1,
            score_down_sample: 8,
            step: 8,
            scale_step: 0.1,
            min_scale: 1.0,
            max_scale: 1.0,
            edge_radius: 0.4,
            edge_weight: -20.0,
            outside_importance: -0.5,
            boost_weight: 100.0,
        }
    }
}

/// Upper bound on the number of scales one search may visit.
pub const MAX_SCALE_COUNT: usize = 1000;

const INTEGER_KEYS: [&str; 4] = ["resizeWidth", "resizeHeight", "scoreDownSample", "step"];

fn canonical_key(key: &str) -> &str {
    match key {
        "resize_width" => "resizeWidth",
        "resize_height" => "resizeHeight",
        other => other,
    }
}

fn check_numeric(key: &str, value: &Value) -> Result<()> {
    let numeric = match key {
        "skinColor" => value
            .as_array()
            .is_some_and(|a| a.len() == 3 && a.iter().all(Value::is_number)),
        _ => value.is_number(),
    };
    if !numeric {
        return Err(Error::NonNumericProperty {
            key: key.to_string(),
            value: value.to_string(),
        });
    }
    if INTEGER_KEYS.contains(&key)
        && !value.as_u64().is_some_and(|v| v <= u64::from(u32::MAX))
    {
        return Err(Error::InvalidArgument {
            arg: "property",
            value: format!("{}={}", key, value),
        });
    }
    Ok(())
}

impl Properties {
    /// Defaults merged with `overrides`.
    pub fn from_overrides(overrides: &Map<String, Value>) -> Result<Self> {
        Self::default().merged(overrides)
    }

    /// Returns a copy with `overrides` applied on top of `self`.
    ///
    /// Keys are the camelCase field names (`resize_width` and `resize_height`
    /// are accepted too). Unknown keys and non-numeric values are rejected;
    /// nothing is coerced.
    pub fn merged(&self, overrides: &Map<String, Value>) -> Result<Self> {
        let Value::Object(mut merged) = serde_json::to_value(self)? else {
            return Err(Error::Processing(
                "properties did not serialize to an object".to_string(),
            ));
        };

        for (key, value) in overrides {
            let key = canonical_key(key);
            if !merged.contains_key(key) {
                return Err(Error::UnknownProperty {
                    key: key.to_string(),
                });
            }
            check_numeric(key, value)?;
            merged.insert(key.to_string(), value.clone());
        }

        let props: Properties = serde_json::from_value(Value::Object(merged))?;
        props.validate()?;
        Ok(props)
    }

    /// Rejects values the analysis cannot work with.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("resizeWidth", self.resize_width),
            ("resizeHeight", self.resize_height),
            ("scoreDownSample", self.score_down_sample),
            ("step", self.step),
        ];
        for (arg, v) in positive {
            if v == 0 {
                return Err(Error::InvalidArgument {
                    arg,
                    value: v.to_string(),
                });
            }
        }

        let floats = [
            self.detail_weight,
            self.skin_color[0],
            self.skin_color[1],
            self.skin_color[2],
            self.skin_bias,
            self.skin_brightness_min,
            self.skin_brightness_max,
            self.skin_threshold,
            self.skin_weight,
            self.saturation_brightness_min,
            self.saturation_brightness_max,
            self.saturation_threshold,
            self.saturation_bias,
            self.saturation_weight,
            self.scale_step,
            self.min_scale,
            self.max_scale,
            self.edge_radius,
            self.edge_weight,
            self.outside_importance,
            self.boost_weight,
        ];
        if let Some(v) = floats.iter().find(|v| !v.is_finite()) {
            return Err(Error::InvalidArgument {
                arg: "property",
                value: v.to_string(),
            });
        }

        if self.min_scale <= 0.0 {
            return Err(Error::InvalidArgument {
                arg: "minScale",
                value: self.min_scale.to_string(),
            });
        }
        if self.max_scale <= 0.0 {
            return Err(Error::InvalidArgument {
                arg: "maxScale",
                value: self.max_scale.to_string(),
            });
        }
        // The step must move maxScale and keep the scale list bounded.
        if self.scale_step <= 0.0
            || self.max_scale - self.scale_step >= self.max_scale
            || (self.max_scale - self.min_scale) / self.scale_step > MAX_SCALE_COUNT as f64
        {
            return Err(Error::InvalidArgument {
                arg: "scaleStep",
                value: self.scale_step.to_string(),
            });
        }
        if !(self.skin_threshold > 0.0 && self.skin_threshold < 1.0) {
            return Err(Error::InvalidArgument {
                arg: "skinThreshold",
                value: self.skin_threshold.to_string(),
            });
        }
        if !(0.0..1.0).contains(&self.saturation_threshold) {
            return Err(Error::InvalidArgument {
                arg: "saturationThreshold",
                value: self.saturation_threshold.to_string(),
            });
        }
        Ok(())
    }
}

/// Crop size and scale range of one search, derived once per image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchGeometry {
    pub crop_width: usize,
    pub crop_height: usize,
    pub min_scale: f64,
    pub max_scale: f64,
}

impl SearchGeometry {
    /// Largest crop of the target aspect that fits a `image_width x image_height`
    /// image. The effective minimum scale never drops below the target size.
    pub fn derive(props: &Properties, image_width: usize, image_height: usize) -> Self {
        let target_w = props.resize_width as f64;
        let target_h = props.resize_height as f64;
        let scale = f64::min(image_width as f64 / target_w, image_height as f64 / target_h);

        Self {
            crop_width: (target_w * scale).floor() as usize,
            crop_height: (target_h * scale).floor() as usize,
            min_scale: props.max_scale.min((1.0 / scale).max(props.min_scale)),
            max_scale: props.max_scale,
        }
    }

    /// Caller-chosen crop size, bypassing derivation.
    pub fn explicit(crop_width: usize, crop_height: usize, min_scale: f64, max_scale: f64) -> Self {
        Self {
            crop_width,
            crop_height,
            min_scale,
            max_scale,
        }
    }

    /// Crop size expressed in a buffer resampled by `factor`.
    pub fn prescaled(self, factor: f64) -> Self {
        Self {
            crop_width: (self.crop_width as f64 * factor).floor() as usize,
            crop_height: (self.crop_height as f64 * factor).floor() as usize,
            ..self
        }
    }
}

/// Thumbnail job parameters suitable for config files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThumbnailParams {
    pub properties: Properties,
    pub format: OutputFormat,
    /// Encoder quality 1..=100 (JPEG only)
    pub quality: u8,
    pub fit: FitMode,
    /// Downscale large images to ~256px before analysis
    pub prescale: bool,
    /// Write a `<output>.json` sidecar with the winning crop
    pub sidecar: bool,
    /// Write a `<output>.analysis.png` rendering of the feature maps
    pub debug_output: bool,
}

impl Default for ThumbnailParams {
    fn default() -> Self {
        Self {
            properties: Properties::default(),
            format: OutputFormat::JPEG,
            quality: 90,
            fit: FitMode::Stretch,
            prescale: true,
            sidecar: false,
            debug_output: false,
        }
    }
}

impl ThumbnailParams {
    pub fn validate(&self) -> Result<()> {
        if !(1..=100).contains(&self.quality) {
            return Err(Error::InvalidArgument {
                arg: "quality",
                value: self.quality.to_string(),
            });
        }
        self.properties.validate()
    }
}
