/// Card matcher implementation
///
/// `CardMatcher` ties the recognizer, the Luhn check and the issuer table
/// together: it validates single numbers, scans text, and scans files with
/// line numbers attached to each match.

use std::fmt;
use std::path::Path;
use std::time::Instant;

use log::{debug, error, info};
use serde::Serialize;

use crate::config::Config;
use crate::core::checksum::luhn_check;
use crate::core::issuer::{classify_issuer, Issuer};
use crate::core::patterns::{self, CARD_DIGITS};
use crate::error::{FileError, ValidationError};
use crate::utils::file_utils::read_file_content;

/// Why a validation came out the way it did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationReason {
    /// Passed every check; carries the issuer derived from the BIN
    ValidWithIssuer(Issuer),
    Invalid(ValidationError),
}

impl ValidationReason {
    /// Stable machine-readable reason code
    pub fn code(&self) -> &'static str {
        match self {
            ValidationReason::ValidWithIssuer(_) => "valid-with-issuer",
            ValidationReason::Invalid(err) => err.code(),
        }
    }
}

/// Outcome of validating one card number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub reason: ValidationReason,
}

impl ValidationResult {
    fn valid(issuer: Issuer) -> Self {
        Self {
            is_valid: true,
            reason: ValidationReason::ValidWithIssuer(issuer),
        }
    }

    fn invalid(err: ValidationError) -> Self {
        Self {
            is_valid: false,
            reason: ValidationReason::Invalid(err),
        }
    }

    /// Issuer of a valid number
    pub fn issuer(&self) -> Option<Issuer> {
        match self.reason {
            ValidationReason::ValidWithIssuer(issuer) => Some(issuer),
            ValidationReason::Invalid(_) => None,
        }
    }

    /// Human-readable description of the outcome
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            ValidationReason::ValidWithIssuer(issuer) => write!(f, "valid card number ({})", issuer),
            ValidationReason::Invalid(err) => write!(f, "{}", err),
        }
    }
}

/// A card number found in text or a file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardMatch {
    /// Text as it appeared, separators included
    pub raw: String,
    /// The 16 digits with separators stripped
    pub normalized: String,
    /// Result of the Luhn check
    pub is_valid: bool,
    /// 1-based line of the first occurrence; only set by file scans
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

/// Finds and validates card numbers
#[derive(Debug, Clone)]
pub struct CardMatcher {
    /// Files larger than this many bytes are memory-mapped
    mmap_threshold: usize,
}

impl Default for CardMatcher {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl CardMatcher {
    /// Create a new CardMatcher from the given configuration
    pub fn new(config: &Config) -> Self {
        Self {
            mmap_threshold: config.mmap_threshold_bytes(),
        }
    }

    /// Validate a single card number typed or passed by the user
    ///
    /// Hyphens and whitespace are ignored. Checks run in order: digits only,
    /// exactly 16 of them, Luhn. The issuer is only classified for numbers
    /// that pass all three.
    pub fn validate_single(&self, input: &str) -> ValidationResult {
        let clean = patterns::normalize(input);

        if let Some(found) = clean.chars().find(|c| !c.is_ascii_digit()) {
            return ValidationResult::invalid(ValidationError::NonDigitContent { found });
        }

        if clean.len() != CARD_DIGITS {
            return ValidationResult::invalid(ValidationError::WrongLength { found: clean.len() });
        }

        if !luhn_check(&clean) {
            return ValidationResult::invalid(ValidationError::FailedChecksum);
        }

        ValidationResult::valid(classify_issuer(&clean[..4]))
    }

    /// Find card numbers in text and run the Luhn check on each
    ///
    /// Matches come back in order of first occurrence. Issuers are not
    /// classified here.
    pub fn scan(&self, text: &str) -> Vec<CardMatch> {
        patterns::candidates(text)
            .map(|candidate| {
                let normalized = candidate.normalized();
                let is_valid = luhn_check(&normalized);
                debug!("Candidate at byte {}: valid={}", candidate.offset, is_valid);
                CardMatch {
                    raw: candidate.raw.to_string(),
                    normalized,
                    is_valid,
                    line: None,
                }
            })
            .collect()
    }

    /// Scan a file, attaching the line number of each match
    ///
    /// A file that is missing or unreadable yields no matches; the reason is
    /// logged rather than returned. Use `try_scan_file` to get it.
    pub fn scan_file(&self, file_path: &Path) -> Vec<CardMatch> {
        match self.try_scan_file(file_path) {
            Ok(matches) => matches,
            Err(e) => {
                error!("{}", e);
                Vec::new()
            }
        }
    }

    /// Scan a file, returning why it could not be read on failure
    pub fn try_scan_file(&self, file_path: &Path) -> Result<Vec<CardMatch>, FileError> {
        info!("Scanning file: {}", file_path.display());
        let start_time = Instant::now();

        let file_content = read_file_content(file_path, self.mmap_threshold)?;
        debug!(
            "Read {} bytes from {} (memory-mapped: {})",
            file_content.size,
            file_path.display(),
            file_content.mapped
        );
        let content = file_content.content.as_str();

        let matches: Vec<CardMatch> = self
            .scan(content)
            .into_iter()
            .map(|mut card| {
                // Separators never include a newline, so every match sits on one line
                card.line = content
                    .split('\n')
                    .position(|line| line.contains(card.raw.as_str()))
                    .map(|line| line + 1);
                card
            })
            .collect();

        info!(
            "Found {} candidate(s) in {} in {:?}",
            matches.len(),
            file_path.display(),
            start_time.elapsed()
        );

        Ok(matches)
    }
}
