//! Artifact loading.
//!
//! Each artifact file is memory-mapped and decoded as a validated `rkyv` archive
//! first, falling back to JSON. Load failures are reported per artifact so the
//! server can start without a model and answer health checks truthfully.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use memmap2::Mmap;
use rkyv::api::high::{HighDeserializer, HighValidator};
use rkyv::bytecheck::CheckBytes;
use rkyv::rancor::Error as RkyvError;
use serde::de::DeserializeOwned;
use tracing::{error, info};

use super::error::{ModelError, ModelResult};
use super::linear::{LinearClassifier, LinearModelArtifact};
use super::tfidf::{TfidfArtifact, TfidfVectorizer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactFormat {
    Rkyv,
    Json,
}

impl ArtifactFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactFormat::Rkyv => "rkyv",
            ArtifactFormat::Json => "json",
        }
    }
}

impl std::fmt::Display for ArtifactFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an artifact came from and what it contained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactInfo {
    pub path: PathBuf,
    pub format: ArtifactFormat,
    /// BLAKE3 hex digest of the file bytes.
    pub digest: String,
    pub size_bytes: u64,
}

/// Decodes one artifact file.
pub fn load_artifact<T>(path: &Path) -> ModelResult<(T, ArtifactInfo)>
where
    T: rkyv::Archive + DeserializeOwned,
    T::Archived: for<'a> CheckBytes<HighValidator<'a, RkyvError>>
        + rkyv::Deserialize<T, HighDeserializer<RkyvError>>,
{
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ModelError::NotFound {
            path: path.to_path_buf(),
        },
        _ => ModelError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    let io_err = |source: io::Error| ModelError::Io {
        path: path.to_path_buf(),
        source,
    };

    let size_bytes = file.metadata().map_err(io_err)?.len();
    if size_bytes == 0 {
        return Err(ModelError::EmptyFile {
            path: path.to_path_buf(),
        });
    }

    // SAFETY: The mapping is read-only and dropped before this function returns;
    // artifacts are not expected to be rewritten while the server starts.
    let mmap = unsafe { Mmap::map(&file) }.map_err(io_err)?;
    let bytes: &[u8] = &mmap;

    let digest = blake3::hash(bytes).to_hex().to_string();

    let (value, format) = match rkyv::from_bytes::<T, RkyvError>(bytes) {
        Ok(value) => (value, ArtifactFormat::Rkyv),
        Err(rkyv_err) => match serde_json::from_slice::<T>(bytes) {
            Ok(value) => (value, ArtifactFormat::Json),
            Err(json_err) => {
                return Err(ModelError::Decode {
                    path: path.to_path_buf(),
                    rkyv: rkyv_err.to_string(),
                    json: json_err.to_string(),
                });
            }
        },
    };

    Ok((
        value,
        ArtifactInfo {
            path: path.to_path_buf(),
            format,
            digest,
            size_bytes,
        },
    ))
}

fn load_validated<A, T>(path: &Path) -> ModelResult<(T, ArtifactInfo)>
where
    A: rkyv::Archive + DeserializeOwned,
    A::Archived: for<'a> CheckBytes<HighValidator<'a, RkyvError>>
        + rkyv::Deserialize<A, HighDeserializer<RkyvError>>,
    T: TryFrom<A, Error = ModelError>,
{
    let (artifact, info) = load_artifact::<A>(path)?;
    Ok((T::try_from(artifact)?, info))
}

/// Result of loading both artifacts at startup. Either side may be missing.
#[derive(Debug, Default)]
pub struct LoadedArtifacts {
    pub vectorizer: Option<(TfidfVectorizer, ArtifactInfo)>,
    pub model: Option<(LinearClassifier, ArtifactInfo)>,
}

impl LoadedArtifacts {
    /// Loads both artifacts, logging each outcome. Never fails.
    pub fn load(vectorizer_path: &Path, model_path: &Path) -> Self {
        let vectorizer = Self::log_outcome(
            "vectorizer",
            vectorizer_path,
            load_validated::<TfidfArtifact, TfidfVectorizer>(vectorizer_path),
        );
        let model = Self::log_outcome(
            "model",
            model_path,
            load_validated::<LinearModelArtifact, LinearClassifier>(model_path),
        );

        Self { vectorizer, model }
    }

    pub fn vectorizer_loaded(&self) -> bool {
        self.vectorizer.is_some()
    }

    pub fn model_loaded(&self) -> bool {
        self.model.is_some()
    }

    fn log_outcome<T>(
        kind: &'static str,
        path: &Path,
        outcome: ModelResult<(T, ArtifactInfo)>,
    ) -> Option<(T, ArtifactInfo)> {
        match outcome {
            Ok((value, info)) => {
                info!(
                    artifact = kind,
                    path = %info.path.display(),
                    format = %info.format,
                    digest = %info.digest,
                    size_bytes = info.size_bytes,
                    "Artifact loaded"
                );
                Some((value, info))
            }
            Err(e) => {
                error!(
                    artifact = kind,
                    path = %path.display(),
                    error = %e,
                    "Failed to load artifact"
                );
                None
            }
        }
    }
}
