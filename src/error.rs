//! Failure taxonomy for the validation pipeline.
//!
//! Every stage reports a typed error; the orchestrator wraps it together with
//! the stage name into a [`crate::ValidationFailure`]. The `Display` strings
//! are the reasons shown to end users.

use crate::models::{MrzRecord, Stage};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Which external capability a provider error came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// OCR / MRZ line extraction
    Mrz,
    /// Face detection
    Face,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Mrz => write!(f, "MRZ extraction"),
            ProviderKind::Face => write!(f, "Face detection"),
        }
    }
}

/// Error returned by a capability provider
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The call did not finish within its deadline
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// The engine reported an error
    #[error("{0}")]
    Failed(String),
}

/// Structural fault in the MRZ text, distinct from a low validity score
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MrzParseError {
    /// TD3 needs exactly two lines
    #[error("expected {expected} MRZ lines, got {found}")]
    LineCount {
        /// Required count
        expected: usize,
        /// Count supplied
        found: usize,
    },

    /// A line is not the fixed TD3 width
    #[error("MRZ line {line} has {found} characters, expected {expected}")]
    LineLength {
        /// 1-based line number
        line: usize,
        /// Required width
        expected: usize,
        /// Width supplied
        found: usize,
    },

    /// Character outside `A-Z0-9<`
    #[error("invalid character {found:?} at line {line}, column {column}")]
    InvalidCharacter {
        /// 1-based line number
        line: usize,
        /// 1-based column
        column: usize,
        /// Offending character
        found: char,
    },

    /// Mandatory field is empty (all fillers)
    #[error("mandatory field `{0}` is empty")]
    MissingField(&'static str),

    /// Sex is not `M`, `F`, `X` or filler
    #[error("invalid sex marker {0:?}")]
    InvalidSex(char),
}

/// Why a validation failed
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Input could not be decoded as a bitmap
    #[error("Invalid image file: {0}")]
    InvalidImage(String),

    /// Resolution or sharpness below threshold
    #[error("{0}")]
    Quality(String),

    /// OCR returned no lines or the wrong number of lines
    #[error("MRZ not found or invalid")]
    MrzNotFound,

    /// Lines found but not in TD3 shape
    #[error("MRZ has unexpected format: {0}")]
    MrzParse(#[from] MrzParseError),

    /// Check digits disagree too much to trust the document
    #[error("MRZ checksum validation failed (valid score: {score})")]
    MrzLowConfidence {
        /// Aggregate score (at or below the threshold)
        score: u8,
        /// Parsed record with per-field validity, for diagnosis
        record: Box<MrzRecord>,
    },

    /// No face, or face in the wrong place
    #[error("{0}")]
    Layout(String),

    /// A provider exceeded its deadline
    #[error("{provider} timed out")]
    ProviderTimeout {
        /// Which provider
        provider: ProviderKind,
    },

    /// A provider returned an error
    #[error("{provider} failed: {message}")]
    ProviderFailure {
        /// Which provider
        provider: ProviderKind,
        /// Provider's own message
        message: String,
    },

    /// Cancellation observed at a stage boundary
    #[error("validation cancelled before {0} stage")]
    Cancelled(Stage),
}

impl ValidationError {
    /// Map a provider error, keeping timeouts distinct from other failures
    pub fn from_provider(provider: ProviderKind, err: ProviderError) -> Self {
        match err {
            ProviderError::Timeout(_) => ValidationError::ProviderTimeout { provider },
            ProviderError::Failed(message) => {
                ValidationError::ProviderFailure { provider, message }
            }
        }
    }

    /// True for faults of the infrastructure rather than of the submitted image
    pub fn is_provider_fault(&self) -> bool {
        matches!(
            self,
            ValidationError::ProviderTimeout { .. } | ValidationError::ProviderFailure { .. }
        )
    }
}
