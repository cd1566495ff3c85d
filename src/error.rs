//! Library error type.
//!
//! Lookup misses are not errors (they degrade to defaults); only I/O,
//! decoding and start-up problems surface here.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AtlasError {
    #[error("i/o error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("request failed for {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("invalid JSON in {what}: {source}")]
    Json {
        what: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not decode image {url}: {source}")]
    Image {
        url: String,
        #[source]
        source: image::ImageError,
    },

    #[error("malformed taxonomy table: {0}")]
    Table(#[source] csv::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("root segment `{0}` not found in taxonomy table")]
    RootNotFound(String),

    #[error("taxonomy table has no usable rows")]
    EmptyTable,
}

impl AtlasError {
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn json(what: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Json {
            what: what.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, AtlasError>;
