#![doc = r#"
smartthumb: content-aware thumbnail cropping.

This crate finds the most visually interesting crop of an image for a requested
thumbnail size. It scores every candidate window on three saliency signals (edge
detail, skin tone and color saturation), weighted toward the center of the window,
and keeps the best one. It powers the `smartthumb` CLI and can be embedded in your
own Rust applications.

Stability
---------
The public library API is experimental in initial releases and may evolve as the
crate stabilizes. Breaking changes can occur.

Add dependency
--------------
```toml
[dependencies]
smartthumb = "0.1"
```

Quick start: render a thumbnail to a file
-----------------------------------------
```rust,no_run
use std::path::Path;
use smartthumb::{thumbnail_to_path, FitMode, OutputFormat, Properties, ThumbnailParams};

fn main() -> smartthumb::Result<()> {
    let params = ThumbnailParams {
        properties: Properties {
            resize_width: 320,
            resize_height: 180,
            ..Properties::default()
        },
        format: OutputFormat::JPEG,
        quality: 85,
        fit: FitMode::Stretch,
        sidecar: true,
        ..ThumbnailParams::default()
    };

    let result = thumbnail_to_path(
        Path::new("/data/holiday.jpg"),
        Path::new("/out/holiday_thumb.jpg"),
        &params,
    )?;
    println!("cropped {:?}", result.crop);
    Ok(())
}
```

Crop search on raw pixels
-------------------------
```rust
use smartthumb::{find_best_crop, PixelBuffer, Properties};

fn main() -> smartthumb::Result<()> {
    let pixels = PixelBuffer::filled(64, 64, [128, 128, 128, 255])?;
    let props = Properties {
        resize_width: 16,
        resize_height: 16,
        ..Properties::default()
    };

    let crop = find_best_crop(&props, &pixels)?;
    assert_eq!((crop.width, crop.height), (64.0, 64.0));
    Ok(())
}
```

Overriding properties from JSON
-------------------------------
Unknown keys and non-numeric values are rejected rather than ignored.

```rust
use serde_json::json;
use smartthumb::{Error, Properties};

let overrides = json!({ "resizeWidth": 100, "skinWeight": 2.5 });
let props = Properties::from_overrides(overrides.as_object().unwrap()).unwrap();
assert_eq!(props.resize_width, 100);

let bad = json!({ "skinWieght": 2.5 });
assert!(matches!(
    Properties::from_overrides(bad.as_object().unwrap()),
    Err(Error::UnknownProperty { .. })
));
```

Batch helpers
-------------
```rust,no_run
use std::path::Path;
use smartthumb::{process_directory_to_path, ThumbnailParams};

fn main() -> smartthumb::Result<()> {
    let report = process_directory_to_path(
        Path::new("/data/photos"),
        Path::new("/out"),
        &ThumbnailParams::default(),
        true, // continue_on_error
    )?;

    println!("processed={} skipped={} errors={}", report.processed, report.skipped, report.errors);
    Ok(())
}
```

Error handling
--------------
All public functions return `smartthumb::Result<T>`; match on `smartthumb::Error` to
handle specific cases, e.g. a target size that cannot fit the image.

```rust,no_run
use std::path::Path;
use smartthumb::{find_crop_for_path, Error, Properties};

fn main() {
    match find_crop_for_path(Path::new("/data/tiny.png"), &Properties::default(), true) {
        Ok(result) => println!("{:?}", result.crop),
        Err(Error::DegenerateSearch { crop_width, crop_height, .. }) => {
            eprintln!("no {crop_width}x{crop_height} crop fits")
        }
        Err(Error::Image(e)) => eprintln!("decode error: {e}"),
        Err(other) => eprintln!("Other error: {other}"),
    }
}
```

Useful modules
--------------
- [`api`]: high-level, ergonomic entry points.
- [`core`]: parameters, saliency detectors, crop search and rendering stages.
- [`types`]: enums shared across the crate (e.g. `OutputFormat`, `FitMode`).
- [`io`]: image decoding and thumbnail/sidecar writers.
- [`error`]: crate-level `Error` and `Result`.
"#]

// Core modules (public)
pub mod api;
pub mod core;
pub mod error;
pub mod io;
pub mod types;

// Curated public API surface
// Types
pub use crate::core::params::{Properties, SearchGeometry, ThumbnailParams};
pub use crate::core::processing::buffer::{AnalysisBuffer, PixelBuffer, ReducedBuffer};
pub use crate::core::processing::resize::CropRect;
pub use crate::core::processing::score::{Crop, ScoreBreakdown};
pub use error::{Error, Result};
pub use types::{AnalysisChannel, FitMode, OutputFormat};

// Engine entry points
pub use crate::core::processing::pipeline::{analyze_pixels, find_best_crop, find_best_crop_with_geometry};

// High-level API re-exports
pub use api::{
    BatchReport, CropResult, Thumbnail, analyze_image, find_crop_for_path,
    process_directory_to_path, thumbnail_to_buffer, thumbnail_to_path,
};
