//! Heuristic score functions. Each returns an integer in `[floor, 100]`.
//!
//! Raw values are rounded to the nearest integer, then clamped. All thresholds
//! are fixed constants; they are not learned or configurable.

use std::collections::HashSet;

use crate::classifier::Sentiment;
use crate::questions::models::Question;

pub const MAX_SCORE: u32 = 100;

/// Word count at which clarity reaches full marginal credit.
pub const CLARITY_SATURATION_WORDS: f64 = 20.0;
pub const CLARITY_WEIGHT: f64 = 80.0;
pub const CLARITY_FLOOR: u32 = 20;

pub const CONFIDENCE_FLOOR: u32 = 30;

pub const RELEVANCE_FLOOR: u32 = 40;
/// Share of the question's words an answer must echo to score 100.
pub const DIRECT_OVERLAP_RATIO: f64 = 0.3;
/// Overlap words must be longer than this many characters.
pub const OVERLAP_MIN_WORD_LEN: usize = 3;
/// Key-point words must be longer than this many characters to count.
pub const KEY_POINT_MIN_WORD_LEN: usize = 4;

pub const OVERLAP_STOP_WORDS: &[&str] = &[
    "what", "how", "why", "when", "where", "which", "that", "this", "with", "from",
];

fn clamp_score(raw: f64, floor: u32) -> u32 {
    let rounded = raw.round();
    if !rounded.is_finite() {
        return floor;
    }
    (rounded.max(0.0) as u32).clamp(floor, MAX_SCORE)
}

/// Number of whitespace-separated tokens.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Elaboration proxy: grows linearly with word count, saturating at 20 words.
pub fn clarity_score(answer: &str) -> u32 {
    let words = word_count(answer) as f64;
    clamp_score(
        (words / CLARITY_SATURATION_WORDS) * CLARITY_WEIGHT + f64::from(CLARITY_FLOOR),
        CLARITY_FLOOR,
    )
}

/// Assertiveness proxy from sentiment polarity.
pub fn confidence_score(sentiment: &Sentiment) -> u32 {
    clamp_score(sentiment.positive_score() * 100.0, CONFIDENCE_FLOOR)
}

/// Relevance of `answer` to `question`, by lexical overlap for direct
/// questions and by key-point coverage otherwise.
pub fn relevance_score(answer: &str, question: &Question) -> u32 {
    if question.kind.is_direct() {
        direct_relevance(&question.text, answer)
    } else {
        key_point_relevance(answer, question.points())
    }
}

/// Distinct question words (longer than 3 chars, not stop-listed) that also
/// appear as whole words in the answer.
pub fn overlap_words(question_text: &str, answer: &str) -> HashSet<String> {
    let answer_words: HashSet<String> = answer
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect();

    question_text
        .to_lowercase()
        .split_whitespace()
        .filter(|w| w.chars().count() > OVERLAP_MIN_WORD_LEN)
        .filter(|w| !OVERLAP_STOP_WORDS.contains(w))
        .filter(|w| answer_words.contains(*w))
        .map(str::to_string)
        .collect()
}

fn direct_relevance(question_text: &str, answer: &str) -> u32 {
    let overlap = overlap_words(question_text, answer).len() as f64;
    let denominator = (word_count(question_text) as f64 * DIRECT_OVERLAP_RATIO).max(1.0);
    clamp_score((overlap / denominator) * 100.0, RELEVANCE_FLOOR)
}

fn key_point_relevance(answer: &str, points: &[String]) -> u32 {
    if points.is_empty() {
        return RELEVANCE_FLOOR;
    }
    let answer_lower = answer.to_lowercase();
    let matched = points
        .iter()
        .filter(|p| point_is_covered(&answer_lower, p))
        .count();
    clamp_score(
        (matched as f64 / points.len() as f64) * 100.0,
        RELEVANCE_FLOOR,
    )
}

/// A point counts as covered when any of its words longer than four
/// characters occurs anywhere in the (lowercased) answer, even inside
/// another word.
pub fn point_is_covered(answer_lower: &str, point: &str) -> bool {
    point
        .to_lowercase()
        .split_whitespace()
        .any(|w| w.chars().count() > KEY_POINT_MIN_WORD_LEN && answer_lower.contains(w))
}
