//! Core building blocks: typed parameters (`params`) and the processing
//! stages (`processing`) that find and render a crop. These are the primitives
//! consumed by the high-level `api` module.
pub mod params;
pub mod processing;
