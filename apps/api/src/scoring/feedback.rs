//! Templated feedback assembled from score bands.
//!
//! Order: relevance, clarity, confidence, then question-kind advice.
//! All band comparisons are strict `<`, so a score of exactly 60 or 80 takes
//! the better branch.

use crate::questions::models::QuestionKind;

pub const RELEVANCE_WEAK_BELOW: u32 = 60;
pub const RELEVANCE_STRONG_AT: u32 = 80;
pub const CLARITY_ADVICE_BELOW: u32 = 60;
pub const CONFIDENCE_ADVICE_BELOW: u32 = 60;
/// Behavioral answers shorter than this (in characters) get STAR advice.
pub const STAR_ADVICE_BELOW_CHARS: usize = 100;

pub const CONGRATULATIONS: &str = "Great response! You demonstrated good clarity, confidence, and relevance. Keep up the excellent work!";

const DIRECT_RELEVANCE_WEAK: &str = "Your answer doesn't fully address the technical concepts asked. Review the correct answer below to understand what was expected.";
const DIRECT_RELEVANCE_PARTIAL: &str = "You touched on some key points but could be more comprehensive. Check the correct answer for additional details.";
const DIRECT_RELEVANCE_STRONG: &str =
    "Good technical understanding! Your answer covers the main concepts well.";
const DIRECT_CLARITY: &str = "Try to be more specific and detailed in your explanations.";
const DIRECT_CONFIDENCE: &str =
    "Use more assertive language to demonstrate confidence in your technical knowledge.";

const OPEN_RELEVANCE_WEAK: &str = "Your answer could better address the key aspects of this question. Consider the key points listed below.";
const OPEN_RELEVANCE_PARTIAL: &str =
    "You covered some important points but could expand on others.";
const OPEN_RELEVANCE_STRONG: &str =
    "Excellent! You addressed the key aspects of this question well.";
const OPEN_CLARITY: &str =
    "Provide more specific examples and details to make your answer clearer.";
const OPEN_CONFIDENCE: &str =
    "Use more confident language and speak about your experiences with conviction.";
const STAR_ADVICE: &str = "For behavioral questions, use the STAR method (Situation, Task, Action, Result) to structure your response.";

/// Scores a feedback message is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreCard {
    pub clarity: u32,
    pub confidence: u32,
    pub relevance: u32,
}

/// Builds the feedback text for an answer.
///
/// When relevance is strong, clarity and confidence need no advice and the
/// STAR rule does not fire, the whole message is `CONGRATULATIONS`.
pub fn build_feedback(kind: QuestionKind, scores: ScoreCard, answer: &str) -> String {
    let direct = kind.is_direct();
    let mut sentences: Vec<&str> = Vec::with_capacity(4);
    let mut needs_attention = false;

    let relevance_sentence = if scores.relevance < RELEVANCE_WEAK_BELOW {
        needs_attention = true;
        pick(direct, DIRECT_RELEVANCE_WEAK, OPEN_RELEVANCE_WEAK)
    } else if scores.relevance < RELEVANCE_STRONG_AT {
        needs_attention = true;
        pick(direct, DIRECT_RELEVANCE_PARTIAL, OPEN_RELEVANCE_PARTIAL)
    } else {
        pick(direct, DIRECT_RELEVANCE_STRONG, OPEN_RELEVANCE_STRONG)
    };
    sentences.push(relevance_sentence);

    if scores.clarity < CLARITY_ADVICE_BELOW {
        needs_attention = true;
        sentences.push(pick(direct, DIRECT_CLARITY, OPEN_CLARITY));
    }

    if scores.confidence < CONFIDENCE_ADVICE_BELOW {
        needs_attention = true;
        sentences.push(pick(direct, DIRECT_CONFIDENCE, OPEN_CONFIDENCE));
    }

    if kind == QuestionKind::Behavioral && answer.chars().count() < STAR_ADVICE_BELOW_CHARS {
        needs_attention = true;
        sentences.push(STAR_ADVICE);
    }

    if !needs_attention {
        return CONGRATULATIONS.to_string();
    }

    sentences.join(" ").trim().to_string()
}

fn pick(direct: bool, direct_text: &'static str, open_text: &'static str) -> &'static str {
    if direct {
        direct_text
    } else {
        open_text
    }
}
