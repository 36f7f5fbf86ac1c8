//! Harness errors.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("{invalid} of {total} log lines failed validation")]
    InvalidLog { invalid: usize, total: usize },
}

/// Write `contents` to `path`, or to stdout when `path` is `None`.
pub fn write_output(path: Option<&std::path::Path>, contents: &str) -> Result<(), HarnessError> {
    match path {
        Some(path) => std::fs::write(path, contents).map_err(|source| HarnessError::Write {
            path: path.to_path_buf(),
            source,
        }),
        None => {
            print!("{contents}");
            Ok(())
        }
    }
}
