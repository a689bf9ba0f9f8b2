//! Command Line Interface (CLI) layer for smartthumb.
//!
//! This module defines argument parsing (`args`), error types (`errors`),
//! and the orchestration logic (`runner`) for single-file, analyze-only and
//! batch flows. It wires user-provided options to the underlying library
//! functionality exposed via `smartthumb::api`.
//!
//! If you are embedding smartthumb into another application, prefer using
//! the high-level `smartthumb::api` module instead of calling the CLI code.
pub mod args;
pub mod errors;
pub mod runner;

pub use args::CliArgs;
pub use runner::run;
