//! Analysis and rendering stages.
//!
//! `detectors` → `downsample` → `search` (scoring candidates with `score`) form
//! the crop engine behind `pipeline`; `resize`, `padding`, `visualize` and `save`
//! turn a winning crop into thumbnail files.
pub mod buffer;
pub mod detectors;
pub mod downsample;
pub mod padding;
pub mod pipeline;
pub mod resize;
pub mod save;
pub mod score;
pub mod search;
pub mod visualize;
