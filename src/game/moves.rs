//! Extraction of typed decisions from free-form agent text.
//!
//! None of these functions fail: an unusable reply is reported as `None` and
//! the calling protocol decides whether that is fatal for a round or a run.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static SPLIT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+(?:\.\d+)?);(\d+(?:\.\d+)?)").expect("split pattern is a valid regex")
});

const ACCEPT_TOKEN: &str = "ACCEPT";
const REJECT_TOKEN: &str = "REJECT";

/// Characters stripped around an accept/reject answer before matching.
const ANSWER_TRIM: &[char] = &[' ', '.', ',', ':', '\t', '\n', '$'];

/// A proposed division of the total: what the proposer keeps and what it gives.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Split {
    pub keep: f64,
    pub give: f64,
}

/// Discrete move parser bound to one move alphabet.
///
/// The word-boundary patterns are compiled once per alphabet; iteration order
/// of the alphabet is the only tie-break, so results are reproducible.
#[derive(Debug, Clone)]
pub struct MoveParser {
    alphabet: Vec<char>,
    word_patterns: Vec<Regex>,
}

impl MoveParser {
    pub fn new(alphabet: &[char]) -> Self {
        let word_patterns = alphabet
            .iter()
            .map(|token| {
                let normalized = token.to_uppercase().to_string();
                Regex::new(&format!(r"\b{}\b", regex::escape(&normalized)))
                    .expect("escaped move token is a valid regex")
            })
            .collect();
        Self {
            alphabet: alphabet.to_vec(),
            word_patterns,
        }
    }

    pub fn alphabet(&self) -> &[char] {
        &self.alphabet
    }

    /// Returns the legal move contained in `text`, first match wins:
    /// exact token, trimmed upper-cased token, standalone word, then any
    /// occurrence at all. The last step is permissive on purpose; alphabets
    /// whose letters are common in prose get degraded precision.
    pub fn parse(&self, text: &str) -> Option<char> {
        if let Some(exact) = self.alphabet.iter().find(|token| is_token(text, **token)) {
            return Some(*exact);
        }

        let normalized = text.trim().to_uppercase();
        if let Some(trimmed) = self
            .alphabet
            .iter()
            .find(|token| is_token(&normalized, upper(**token)))
        {
            return Some(*trimmed);
        }

        if let Some(index) = self
            .word_patterns
            .iter()
            .position(|pattern| pattern.is_match(&normalized))
        {
            return Some(self.alphabet[index]);
        }

        self.alphabet
            .iter()
            .find(|token| normalized.contains(upper(**token)))
            .copied()
    }
}

fn upper(token: char) -> char {
    token.to_uppercase().next().unwrap_or(token)
}

fn is_token(text: &str, token: char) -> bool {
    let mut chars = text.chars();
    chars.next() == Some(token) && chars.next().is_none()
}

/// One-off form of [`MoveParser::parse`].
pub fn parse_discrete_move(text: &str, alphabet: &[char]) -> Option<char> {
    MoveParser::new(alphabet).parse(text)
}

/// Finds the leftmost `<keep>;<give>` pair in `text`.
pub fn parse_numeric_split(text: &str) -> Option<Split> {
    let captures = SPLIT_PATTERN.captures(text)?;
    let keep = captures.get(1)?.as_str().parse::<f64>().ok()?;
    let give = captures.get(2)?.as_str().parse::<f64>().ok()?;
    Some(Split { keep, give })
}

/// `ACCEPT` is checked before `REJECT`, so a reply naming both is an accept.
pub fn parse_accept_reject(text: &str) -> Option<bool> {
    let normalized = text.trim_matches(ANSWER_TRIM).to_uppercase();
    if normalized.contains(ACCEPT_TOKEN) {
        Some(true)
    } else if normalized.contains(REJECT_TOKEN) {
        Some(false)
    } else {
        None
    }
}
