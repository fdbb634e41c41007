//! Interview answer scoring library (used by the server binary and integration tests).
//!
//! # Public API Surface
//!
//! - [`Config`], [`ConfigError`]: server configuration from `SCORER_*` variables
//! - [`model`]: the [`Vectorizer`] / [`Classifier`] seams, the TF-IDF and linear
//!   implementations, and artifact loading ([`LoadedArtifacts`])
//! - [`scoring`]: [`AnswerEvaluator`], score-to-feedback mapping
//! - [`gateway`]: the Axum router, handlers, and [`HandlerState`]

pub mod config;
pub mod constants;
pub mod gateway;
pub mod model;
pub mod scoring;

pub use config::{Config, ConfigError};
pub use gateway::{
    ArtifactStatus, GatewayError, HandlerState, SCORER_STATUS_HEADER, create_router_with_state,
};
pub use model::{
    ArtifactFormat, ArtifactInfo, Classifier, FeatureVector, Label, LinearClassifier, LinearKind,
    LinearModelArtifact, LoadedArtifacts, ModelError, ModelResult, NormKind, TfidfArtifact,
    TfidfVectorizer, Vectorizer, load_artifact,
};
pub use scoring::{
    AnswerEvaluator, Evaluation, EvaluationOutcome, ScoreBand, ScoringError, generate_feedback,
};
