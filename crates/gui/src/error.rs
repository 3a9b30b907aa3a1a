//! Error types for flag group building and configuration.

use std::path::PathBuf;

/// Failure to produce a flag group for an image.
///
/// The session recovers from every variant locally: the scene keeps its
/// environment and simply has no flag group.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// No geometry exists for the requested image.
    #[error("no geometry found for image '{image_id}'")]
    UnknownImage { image_id: String },

    /// I/O error while reading generated geometry.
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The generated geometry could not be parsed.
    #[error("malformed geometry in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The image has no distinguishable colors to turn into flags.
    #[error("no distinguishable colors in image '{image_id}'")]
    NoColors { image_id: String },

    /// The builder returned a different number of meshes and depths.
    #[error("builder returned {meshes} meshes but {depths} original depths")]
    DepthCountMismatch { meshes: usize, depths: usize },
}

/// Failure to assemble the viewer configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error reading config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid value for {flag}: {message}")]
    InvalidArgument { flag: String, message: String },
}
