//! Canned feedback derived from a score and the answer's length.

use crate::constants::{BRIEF_ANSWER_WORDS, DETAILED_ANSWER_WORDS};

use super::types::ScoreBand;

pub const FEEDBACK_EXCELLENT: &str =
    "Excellent answer! You demonstrated strong knowledge and communication skills.";
pub const FEEDBACK_GOOD: &str =
    "Good answer with room for improvement. Consider adding more specific examples and details.";
pub const FEEDBACK_FAIR: &str =
    "Fair answer. Try to provide more comprehensive responses with better structure.";
pub const FEEDBACK_NEEDS_IMPROVEMENT: &str =
    "Needs improvement. Focus on understanding the question and providing more relevant details.";

pub const STRENGTH_DETAILED: &str = "Detailed explanation provided";
pub const IMPROVEMENT_MORE_DETAIL: &str = "Provide more detailed explanations";

/// Feedback text plus strength and improvement lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub feedback: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
}

/// Number of whitespace-separated words.
pub fn word_count(answer: &str) -> usize {
    answer.split_whitespace().count()
}

pub fn generate_feedback(score: u8, answer: &str) -> Feedback {
    let words = word_count(answer);
    let band = ScoreBand::from_score(score);

    let mut strengths: Vec<&str> = match band {
        ScoreBand::Excellent => vec![
            "Comprehensive and well-structured answer",
            "Demonstrates strong understanding",
            "Clear and articulate communication",
        ],
        ScoreBand::Good => vec!["Good understanding of the topic", "Relevant points covered"],
        ScoreBand::Fair => vec!["Basic understanding demonstrated"],
        ScoreBand::NeedsImprovement => vec![],
    };
    if words >= DETAILED_ANSWER_WORDS {
        strengths.push(STRENGTH_DETAILED);
    }

    // Improvements accumulate as the band drops.
    let mut improvements: Vec<&str> = Vec::new();
    if band < ScoreBand::Excellent {
        if words < BRIEF_ANSWER_WORDS {
            improvements.push(IMPROVEMENT_MORE_DETAIL);
        }
        improvements.push("Include specific examples to support your points");
        improvements.push("Elaborate on key concepts");
    }
    if band < ScoreBand::Good {
        improvements.push("Address all aspects of the question");
        improvements.push("Organize your thoughts more clearly");
    }
    if band < ScoreBand::Fair {
        improvements.push("Focus on understanding the core question");
        improvements.push("Provide more relevant information");
    }

    let feedback = match band {
        ScoreBand::Excellent => FEEDBACK_EXCELLENT,
        ScoreBand::Good => FEEDBACK_GOOD,
        ScoreBand::Fair => FEEDBACK_FAIR,
        ScoreBand::NeedsImprovement => FEEDBACK_NEEDS_IMPROVEMENT,
    };

    Feedback {
        feedback: feedback.to_string(),
        strengths: strengths.into_iter().map(String::from).collect(),
        improvements: improvements.into_iter().map(String::from).collect(),
    }
}
