//! Cross-cutting, shared constants.
//!
//! Score thresholds are inclusive lower bounds: a score of exactly
//! [`EXCELLENT_SCORE_THRESHOLD`] is excellent, one point below is not.

/// Answers whose trimmed length (in characters) is below this are scored 0 without
/// touching the model.
pub const MIN_ANSWER_CHARS: usize = 10;

/// Score returned when inference fails, or when a model yields a non-numeric label
/// without probabilities.
pub const FALLBACK_SCORE: u8 = 50;

pub const MAX_SCORE: u8 = 100;

pub const EXCELLENT_SCORE_THRESHOLD: u8 = 80;
pub const GOOD_SCORE_THRESHOLD: u8 = 60;
pub const FAIR_SCORE_THRESHOLD: u8 = 40;

/// Word count at which an answer earns the "detailed explanation" strength.
pub const DETAILED_ANSWER_WORDS: usize = 100;

/// Below this word count a sub-excellent answer is asked for more detail.
pub const BRIEF_ANSWER_WORDS: usize = 50;

pub const DEFAULT_PORT: u16 = 5000;

pub const DEFAULT_DATASET_DIR: &str = "./dataset";
pub const VECTORIZER_FILENAME: &str = "tfidf_vectorizer.bin";
pub const MODEL_FILENAME: &str = "interview_model.bin";

/// Minimum length of a token produced by the TF-IDF tokenizer.
pub const MIN_TOKEN_CHARS: usize = 2;
