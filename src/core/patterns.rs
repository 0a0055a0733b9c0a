/// Pattern definitions for card number recognition
///
/// This module holds the regex used to spot candidate card numbers in free
/// text, plus the helpers that turn a raw match into its bare digits.

use lazy_static::lazy_static;
use regex::{Matches, Regex};

/// Candidate card number: four groups of four digits, separated by an optional
/// hyphen or space, where the first group carries a Visa, MasterCard, Discover
/// or American Express prefix.
pub const CARD_PATTERN: &str = r"\b(?:4[0-9]{3}|5[1-5][0-9]{2}|6(?:011|5[0-9]{2})|3[47][0-9]{2})[- ]?[0-9]{4}[- ]?[0-9]{4}[- ]?[0-9]{4}\b";

/// Number of digits in every card number this crate accepts
pub const CARD_DIGITS: usize = 16;

lazy_static! {
    /// Precompiled card pattern available globally
    pub static ref CARD_REGEX: Regex = Regex::new(CARD_PATTERN).expect("card pattern is a valid regex");
}

/// A raw substring of the input that looks like a card number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate<'t> {
    /// Text exactly as it appeared, separators included
    pub raw: &'t str,
    /// Byte offset of the match in the scanned text
    pub offset: usize,
}

impl<'t> Candidate<'t> {
    /// Digits of the candidate with separators removed
    pub fn normalized(&self) -> String {
        normalize(self.raw)
    }
}

/// Lazy iterator over candidates in a piece of text
pub struct Candidates<'r, 't> {
    inner: Matches<'r, 't>,
}

impl<'r, 't> Iterator for Candidates<'r, 't> {
    type Item = Candidate<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|m| Candidate {
            raw: m.as_str(),
            offset: m.start(),
        })
    }
}

/// Find candidate card numbers in `text`, in order of first occurrence
///
/// Each call starts a fresh scan, so the sequence can be restarted simply by
/// calling this again.
pub fn candidates(text: &str) -> Candidates<'static, '_> {
    Candidates {
        inner: CARD_REGEX.find_iter(text),
    }
}

/// Strip hyphens and whitespace from a card number
pub fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(|c| *c != '-' && !c.is_whitespace())
        .collect()
}
