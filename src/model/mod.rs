//! Pre-trained text model artifacts.
//!
//! Scoring talks to the model through two traits:
//!
//! - [`Vectorizer`]: raw text to a sparse [`FeatureVector`]
//! - [`Classifier`]: feature vector to a [`Label`], and optionally a probability
//!   distribution over the classifier's classes
//!
//! The concrete implementations are a TF-IDF vectorizer ([`TfidfVectorizer`]) and a
//! linear classifier ([`LinearClassifier`]), both decoded from artifact files by
//! [`loader`].

pub mod error;
pub mod linear;
pub mod loader;
pub mod tfidf;


pub use error::{ModelError, ModelResult};
pub use linear::{LinearClassifier, LinearKind, LinearModelArtifact};
pub use loader::{ArtifactFormat, ArtifactInfo, LoadedArtifacts, load_artifact};
pub use tfidf::{NormKind, TfidfArtifact, TfidfVectorizer};

use rkyv::{Archive, Deserialize as RkyvDeserialize, Serialize as RkyvSerialize};
use serde::{Deserialize, Serialize};

/// Converts raw text into a fixed-size numeric representation.
pub trait Vectorizer: Send + Sync {
    /// Number of features in every vector this vectorizer produces.
    fn dimension(&self) -> usize;

    fn transform(&self, text: &str) -> ModelResult<FeatureVector>;
}

/// Maps feature vectors to labels.
pub trait Classifier: Send + Sync {
    fn predict(&self, features: &FeatureVector) -> ModelResult<Label>;

    /// Class probabilities, or `None` if the model has no probability interface.
    fn predict_proba(&self, features: &FeatureVector) -> Option<ModelResult<Vec<f64>>>;
}

/// Sparse feature vector: `(index, value)` pairs sorted by index, no duplicates.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureVector {
    dimension: usize,
    entries: Vec<(usize, f64)>,
}

impl FeatureVector {
    /// Builds a vector from arbitrary pairs. Entries are sorted, duplicate indices
    /// summed, zeros dropped. Fails if an index is out of range.
    pub fn from_pairs(dimension: usize, mut pairs: Vec<(usize, f64)>) -> ModelResult<Self> {
        if let Some(&(index, _)) = pairs.iter().find(|(i, _)| *i >= dimension) {
            return Err(ModelError::InvalidArtifact {
                reason: format!("feature index {} out of range for dimension {}", index, dimension),
            });
        }

        pairs.sort_by_key(|(i, _)| *i);

        let mut entries: Vec<(usize, f64)> = Vec::with_capacity(pairs.len());
        for (index, value) in pairs {
            match entries.last_mut() {
                Some((last, acc)) if *last == index => *acc += value,
                _ => entries.push((index, value)),
            }
        }
        entries.retain(|(_, v)| *v != 0.0);

        Ok(Self { dimension, entries })
    }

    pub fn zeros(dimension: usize) -> Self {
        Self {
            dimension,
            entries: Vec::new(),
        }
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    #[inline]
    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    #[inline]
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    /// Dot product against a dense weight row.
    pub fn dot(&self, weights: &[f32]) -> ModelResult<f64> {
        if weights.len() != self.dimension {
            return Err(ModelError::DimensionMismatch {
                expected: weights.len(),
                actual: self.dimension,
            });
        }
        Ok(self
            .entries
            .iter()
            .map(|&(i, v)| v * f64::from(weights[i]))
            .sum())
    }
}

/// Class label as stored in the model: numeric (e.g. a score) or free text.
#[derive(
    Archive, RkyvSerialize, RkyvDeserialize, Serialize, Deserialize, Debug, Clone, PartialEq,
)]
#[serde(untagged)]
pub enum Label {
    Numeric(f64),
    Text(String),
}

impl Label {
    pub fn as_numeric(&self) -> Option<f64> {
        match self {
            Label::Numeric(v) => Some(*v),
            Label::Text(_) => None,
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Label::Numeric(v) => write!(f, "{}", v),
            Label::Text(s) => write!(f, "{}", s),
        }
    }
}
