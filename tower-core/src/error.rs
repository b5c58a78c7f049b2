/// Error types for parameter files and OBJ import/export
use std::io;
use std::path::PathBuf;

/// Failure loading a parameter file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure writing or reading Wavefront OBJ text.
#[derive(Debug, thiserror::Error)]
pub enum ObjError {
    #[error("obj i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("obj parse error on line {line}: {message}")]
    Parse { line: usize, message: String },
}
