pub mod input;
pub mod output;

pub use input::*;
pub use output::*;

use std::path::PathBuf;

use thiserror::Error;

/// Errors from loading or persisting pipeline resources.
///
/// Fatal to the caller of the load or save operation only; the pipeline
/// itself never performs I/O.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}
