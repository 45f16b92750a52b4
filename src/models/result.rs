use super::{FaceRegion, MrzRecord};
use crate::error::ValidationError;
use serde::Serialize;
use std::fmt;

/// Outcome of the image quality gate
#[derive(Debug, Clone, PartialEq)]
pub struct QualityVerdict {
    /// Whether the image may proceed
    pub passed: bool,
    /// Human-readable reason
    pub reason: String,
    /// Laplacian variance, if the resolution check let it be computed
    pub sharpness: Option<f64>,
}

/// Outcome of the layout check
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutVerdict {
    /// Whether the face sits where a passport photo should
    pub passed: bool,
    /// Human-readable reason
    pub reason: String,
    /// The box the decision was made on
    pub face: Option<FaceRegion>,
}

/// Pipeline stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Bitmap decoding, before any gate
    Decode,
    /// Resolution and sharpness
    Quality,
    /// MRZ line extraction
    MrzLocate,
    /// MRZ field parsing and check digits
    MrzParse,
    /// Face position
    Layout,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Decode => "decode",
            Stage::Quality => "quality",
            Stage::MrzLocate => "mrz_locate",
            Stage::MrzParse => "mrz_parse",
            Stage::Layout => "layout",
        };
        f.write_str(name)
    }
}

/// Terminal failure: where the pipeline stopped and why
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationFailure {
    /// Stage that failed
    pub stage: Stage,
    /// Typed cause; its `Display` is the user-facing reason
    pub error: ValidationError,
}

impl ValidationFailure {
    /// Human-readable reason
    pub fn reason(&self) -> String {
        self.error.to_string()
    }
}

/// Everything gathered by a fully successful validation
#[derive(Debug, Clone, PartialEq)]
pub struct PassportReport {
    /// Parsed MRZ, including per-field validity
    pub mrz: MrzRecord,
    /// Message from the quality gate
    pub quality_message: String,
    /// Message from the layout check
    pub layout_message: String,
    /// Face box used for the layout decision
    pub face: FaceRegion,
}

impl PassportReport {
    /// Issuing country
    pub fn country(&self) -> &str {
        &self.mrz.issuing_country
    }

    /// Passport number without fillers
    pub fn passport_number(&self) -> &str {
        self.mrz.passport_number.trimmed()
    }

    /// `"SURNAME GIVEN NAMES"`
    pub fn name(&self) -> String {
        self.mrz.display_name()
    }
}

/// Result of one validation call
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationResult {
    /// Every stage passed
    Valid(Box<PassportReport>),
    /// A stage failed; later stages did not run
    Invalid(ValidationFailure),
}

impl ValidationResult {
    pub(crate) fn fail(stage: Stage, error: ValidationError) -> Self {
        ValidationResult::Invalid(ValidationFailure { stage, error })
    }

    /// True on success
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid(_))
    }

    /// The success payload, if any
    pub fn report(&self) -> Option<&PassportReport> {
        match self {
            ValidationResult::Valid(report) => Some(report),
            ValidationResult::Invalid(_) => None,
        }
    }

    /// The failure, if any
    pub fn failure(&self) -> Option<&ValidationFailure> {
        match self {
            ValidationResult::Valid(_) => None,
            ValidationResult::Invalid(failure) => Some(failure),
        }
    }
}
