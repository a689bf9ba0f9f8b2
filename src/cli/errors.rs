use thiserror::Error;

/// Application-specific errors for the CLI
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid property override: {value}. Expected KEY=VALUE with a JSON value")]
    InvalidProperty { value: String },

    #[error("Config file {path} must contain a JSON object")]
    InvalidConfig { path: String },

    #[error("Missing required argument: {arg}")]
    MissingArgument { arg: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Thumbnail(#[from] smartthumb::Error),
}
