use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("artifact not found at path: {path}")]
    NotFound { path: PathBuf },

    #[error("failed to read artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("artifact file is empty: {path}")]
    EmptyFile { path: PathBuf },

    #[error("could not decode artifact {path} (rkyv: {rkyv}; json: {json})")]
    Decode {
        path: PathBuf,
        rkyv: String,
        json: String,
    },

    #[error("invalid artifact: {reason}")]
    InvalidArtifact { reason: String },

    #[error("feature dimension mismatch: model expects {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("inference failed: {reason}")]
    InferenceFailed { reason: String },
}

pub type ModelResult<T> = Result<T, ModelError>;
