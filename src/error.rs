use std::path::PathBuf;

use thiserror::Error;

/// Library error type for collection loading and watching.
#[derive(Debug, Error)]
pub enum Error {
    /// The collection file could not be read.
    #[error("reading collection {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The collection file is not valid artwork JSON.
    #[error("parsing collection {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The collection document parsed, but its top level is not an array.
    #[error("collection {0} must be a JSON array of artworks")]
    NotAnArray(PathBuf),

    /// Filesystem watcher failure.
    #[error(transparent)]
    Watch(#[from] notify::Error),
}
