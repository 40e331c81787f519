use std::path::PathBuf;

use thiserror::Error;
use vitrine_model::ModelError;

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("Invalid slide collection: {0}")]
    Model(#[from] ModelError),

    #[error("Failed to read image {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode image {path}: {message}")]
    Decode { path: PathBuf, message: String },

    #[error("Invalid viewer location: {0}")]
    InvalidLocation(#[from] url::ParseError),

    #[error("Decode task failed: {0}")]
    Task(String),

    #[error("Viewer is no longer running")]
    ViewerClosed,
}

pub type Result<T> = std::result::Result<T, ViewerError>;
