//! TF-IDF vectorizer.
//!
//! Tokens are maximal runs of alphanumeric or `_` characters at least
//! [`MIN_TOKEN_CHARS`] long. Term weights are `tf * idf` (with `tf` replaced by
//! `1 + ln(tf)` under sublinear scaling), then the vector is normalized.

use std::collections::HashMap;

use rkyv::{Archive, Deserialize as RkyvDeserialize, Serialize as RkyvSerialize};
use serde::{Deserialize, Serialize};

use super::error::{ModelError, ModelResult};
use super::{FeatureVector, Vectorizer};
use crate::constants::MIN_TOKEN_CHARS;

#[derive(
    Archive,
    RkyvSerialize,
    RkyvDeserialize,
    Serialize,
    Deserialize,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
)]
#[serde(rename_all = "lowercase")]
pub enum NormKind {
    #[default]
    L2,
    L1,
    None,
}

/// Serialized vectorizer state. `terms[i]` is the term for feature `i`, with
/// inverse document frequency `idf[i]`.
#[derive(Archive, RkyvSerialize, RkyvDeserialize, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TfidfArtifact {
    pub terms: Vec<String>,
    pub idf: Vec<f32>,
    #[serde(default = "default_lowercase")]
    pub lowercase: bool,
    #[serde(default)]
    pub sublinear_tf: bool,
    #[serde(default)]
    pub norm: NormKind,
}

fn default_lowercase() -> bool {
    true
}

impl TfidfArtifact {
    /// Encodes the artifact in the archive format [`load_artifact`](super::load_artifact)
    /// tries first.
    pub fn to_rkyv_bytes(&self) -> Result<rkyv::util::AlignedVec, rkyv::rancor::Error> {
        rkyv::to_bytes::<rkyv::rancor::Error>(self)
    }
}

#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    index: HashMap<String, usize>,
    idf: Vec<f32>,
    lowercase: bool,
    sublinear_tf: bool,
    norm: NormKind,
}

impl TryFrom<TfidfArtifact> for TfidfVectorizer {
    type Error = ModelError;

    fn try_from(artifact: TfidfArtifact) -> Result<Self, Self::Error> {
        if artifact.terms.is_empty() {
            return Err(ModelError::InvalidArtifact {
                reason: "vectorizer vocabulary is empty".to_string(),
            });
        }

        if artifact.terms.len() != artifact.idf.len() {
            return Err(ModelError::InvalidArtifact {
                reason: format!(
                    "vectorizer has {} terms but {} idf weights",
                    artifact.terms.len(),
                    artifact.idf.len()
                ),
            });
        }

        if let Some(bad) = artifact.idf.iter().find(|w| !w.is_finite()) {
            return Err(ModelError::InvalidArtifact {
                reason: format!("non-finite idf weight {}", bad),
            });
        }

        let mut index = HashMap::with_capacity(artifact.terms.len());
        for (i, term) in artifact.terms.into_iter().enumerate() {
            if let Some(prev) = index.insert(term, i) {
                return Err(ModelError::InvalidArtifact {
                    reason: format!("duplicate vocabulary term at indices {} and {}", prev, i),
                });
            }
        }

        Ok(Self {
            index,
            idf: artifact.idf,
            lowercase: artifact.lowercase,
            sublinear_tf: artifact.sublinear_tf,
            norm: artifact.norm,
        })
    }
}

impl Vectorizer for TfidfVectorizer {
    fn dimension(&self) -> usize {
        self.idf.len()
    }

    fn transform(&self, text: &str) -> ModelResult<FeatureVector> {
        let text = if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };

        let mut counts: HashMap<usize, u32> = HashMap::new();
        for token in tokenize(&text) {
            if let Some(&i) = self.index.get(token) {
                *counts.entry(i).or_insert(0) += 1;
            }
        }

        let mut pairs: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(i, count)| {
                let tf = if self.sublinear_tf {
                    1.0 + f64::from(count).ln()
                } else {
                    f64::from(count)
                };
                (i, tf * f64::from(self.idf[i]))
            })
            .collect();

        let norm = match self.norm {
            NormKind::L2 => pairs.iter().map(|(_, v)| v * v).sum::<f64>().sqrt(),
            NormKind::L1 => pairs.iter().map(|(_, v)| v.abs()).sum::<f64>(),
            NormKind::None => 1.0,
        };
        if norm > 0.0 {
            for (_, v) in pairs.iter_mut() {
                *v /= norm;
            }
        }

        FeatureVector::from_pairs(self.dimension(), pairs)
    }
}

/// Splits `text` into word tokens of at least [`MIN_TOKEN_CHARS`] characters.
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|t| t.chars().count() >= MIN_TOKEN_CHARS)
}
