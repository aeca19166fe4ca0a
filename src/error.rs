use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the card detection crate.
///
/// "Nothing found" is never an error: stages report it through
/// [`crate::CardSelection`] and `Option` values instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("could not read image {path}: {source}")]
    ImageRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not decode image {path}: {source}")]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("could not read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("face model unavailable: {0}")]
    FaceModel(String),

    #[error("could not write {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
