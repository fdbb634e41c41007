//! Linear classifiers and regressors over sparse features.
//!
//! The artifact layout follows the usual linear-model convention: a binary
//! classifier has a single weight row whose positive side is `classes[1]`, a
//! k-class classifier has one row per class.

use rkyv::{Archive, Deserialize as RkyvDeserialize, Serialize as RkyvSerialize};
use serde::{Deserialize, Serialize};

use super::error::{ModelError, ModelResult};
use super::{Classifier, FeatureVector, Label};

#[derive(
    Archive, RkyvSerialize, RkyvDeserialize, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq,
)]
#[serde(rename_all = "snake_case")]
pub enum LinearKind {
    /// Logistic regression: exposes class probabilities.
    Logistic,
    /// Margin classifier (e.g. linear SVM): labels only.
    Margin,
    /// Linear regressor: a single numeric output, no classes.
    Regression,
}

#[derive(Archive, RkyvSerialize, RkyvDeserialize, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LinearModelArtifact {
    pub kind: LinearKind,
    #[serde(default)]
    pub classes: Vec<Label>,
    pub coef: Vec<Vec<f32>>,
    pub intercept: Vec<f32>,
}

impl LinearModelArtifact {
    /// Encodes the artifact in the archive format [`load_artifact`](super::load_artifact)
    /// tries first.
    pub fn to_rkyv_bytes(&self) -> Result<rkyv::util::AlignedVec, rkyv::rancor::Error> {
        rkyv::to_bytes::<rkyv::rancor::Error>(self)
    }
}

#[derive(Debug, Clone)]
pub struct LinearClassifier {
    kind: LinearKind,
    classes: Vec<Label>,
    coef: Vec<Vec<f32>>,
    intercept: Vec<f32>,
}

impl TryFrom<LinearModelArtifact> for LinearClassifier {
    type Error = ModelError;

    fn try_from(artifact: LinearModelArtifact) -> Result<Self, Self::Error> {
        let invalid = |reason: String| ModelError::InvalidArtifact { reason };

        let rows = artifact.coef.len();
        if rows == 0 {
            return Err(invalid("model has no weight rows".to_string()));
        }

        let width = artifact.coef[0].len();
        if width == 0 {
            return Err(invalid("model weight rows are empty".to_string()));
        }
        if let Some((i, row)) = artifact
            .coef
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != width)
        {
            return Err(invalid(format!(
                "weight row {} has width {}, expected {}",
                i,
                row.len(),
                width
            )));
        }

        if artifact.intercept.len() != rows {
            return Err(invalid(format!(
                "model has {} weight rows but {} intercepts",
                rows,
                artifact.intercept.len()
            )));
        }

        let all_finite = artifact
            .coef
            .iter()
            .flatten()
            .chain(artifact.intercept.iter())
            .all(|w| w.is_finite());
        if !all_finite {
            return Err(invalid("model contains non-finite weights".to_string()));
        }

        match artifact.kind {
            LinearKind::Regression => {
                if rows != 1 {
                    return Err(invalid(format!(
                        "regression model must have exactly 1 weight row, got {}",
                        rows
                    )));
                }
            }
            LinearKind::Logistic | LinearKind::Margin => {
                let n_classes = artifact.classes.len();
                if n_classes < 2 {
                    return Err(invalid(format!(
                        "classifier needs at least 2 classes, got {}",
                        n_classes
                    )));
                }
                let expected_rows = if n_classes == 2 { 1 } else { n_classes };
                if rows != expected_rows {
                    return Err(invalid(format!(
                        "classifier with {} classes needs {} weight rows, got {}",
                        n_classes, expected_rows, rows
                    )));
                }
            }
        }

        Ok(Self {
            kind: artifact.kind,
            classes: artifact.classes,
            coef: artifact.coef,
            intercept: artifact.intercept,
        })
    }
}

impl LinearClassifier {
    /// Number of input features the weights expect.
    pub fn n_features(&self) -> usize {
        self.coef[0].len()
    }

    /// Raw decision values, one per weight row.
    pub fn decision_function(&self, features: &FeatureVector) -> ModelResult<Vec<f64>> {
        self.coef
            .iter()
            .zip(&self.intercept)
            .map(|(row, &b)| {
                let z = features.dot(row)? + f64::from(b);
                if z.is_finite() {
                    Ok(z)
                } else {
                    Err(ModelError::InferenceFailed {
                        reason: format!("non-finite decision value {}", z),
                    })
                }
            })
            .collect()
    }

    fn class_for_decision(&self, decision: &[f64]) -> ModelResult<Label> {
        let index = match decision {
            [z] => usize::from(*z > 0.0),
            many => argmax(many).ok_or_else(|| ModelError::InferenceFailed {
                reason: "empty decision vector".to_string(),
            })?,
        };
        self.classes
            .get(index)
            .cloned()
            .ok_or_else(|| ModelError::InferenceFailed {
                reason: format!("class index {} out of range", index),
            })
    }
}

impl Classifier for LinearClassifier {
    fn predict(&self, features: &FeatureVector) -> ModelResult<Label> {
        let decision = self.decision_function(features)?;
        match self.kind {
            LinearKind::Regression => Ok(Label::Numeric(decision[0])),
            LinearKind::Logistic | LinearKind::Margin => self.class_for_decision(&decision),
        }
    }

    fn predict_proba(&self, features: &FeatureVector) -> Option<ModelResult<Vec<f64>>> {
        if self.kind != LinearKind::Logistic {
            return None;
        }

        Some(self.decision_function(features).map(|decision| match decision.as_slice() {
            [z] => {
                let p = sigmoid(*z);
                vec![1.0 - p, p]
            }
            many => softmax(many),
        }))
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

fn softmax(values: &[f64]) -> Vec<f64> {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = values.iter().map(|v| (v - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

/// Index of the first maximum.
fn argmax(values: &[f64]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (i, &v)| match best {
            Some((_, b)) if v <= b => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
}
