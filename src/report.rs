//! Response shape for transport adapters (HTTP handlers, CLI output).

use crate::models::{Stage, ValidationResult};
use serde::Serialize;

/// Messages from the non-MRZ checks, kept for audit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Checks {
    /// Quality gate message
    pub image_quality: String,
    /// Layout check message
    pub layout_validation: String,
}

/// Per-check MRZ validity breakdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationDetails {
    /// Aggregate score
    pub valid_score: u8,
    /// Document number check digit
    pub number_valid: bool,
    /// Birth date check digit
    pub dob_valid: bool,
    /// Expiry date check digit
    pub expiry_valid: bool,
    /// Personal number check digit
    pub personal_number_valid: bool,
    /// Composite check digit
    pub composite_valid: bool,
}

/// Serializable view of a [`ValidationResult`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Response {
    /// `{"valid": true, ...identity fields...}`
    Valid {
        /// Always true
        valid: bool,
        /// Issuing country
        country: String,
        /// Document number without fillers
        passport_number: String,
        /// YYMMDD
        birth_date: String,
        /// YYMMDD
        expiry_date: String,
        /// `SURNAME GIVEN NAMES`
        name: String,
        /// `M`, `F` or `X`
        gender: String,
        /// Nationality
        nationality: String,
        /// Stage messages
        checks: Checks,
        /// MRZ breakdown
        validation_details: ValidationDetails,
    },
    /// `{"valid": false, "error": "...", "stage": "..."}`
    Invalid {
        /// Always false
        valid: bool,
        /// Human-readable reason
        error: String,
        /// Stage that failed
        stage: Stage,
        /// MRZ breakdown when the record parsed but scored too low
        #[serde(skip_serializing_if = "Option::is_none")]
        validation_details: Option<ValidationDetails>,
    },
}

impl Response {
    /// HTTP status an adapter should use: 200, 400 for rejected input,
    /// 500 for provider faults
    pub fn status_code(result: &ValidationResult) -> u16 {
        match result {
            ValidationResult::Valid(_) => 200,
            ValidationResult::Invalid(failure) if failure.error.is_provider_fault() => 500,
            ValidationResult::Invalid(_) => 400,
        }
    }

    /// Serialize to a JSON string
    pub fn to_json(&self) -> String {
        // Plain strings, bools and integers only; serialization cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}

fn details(mrz: &crate::models::MrzRecord) -> ValidationDetails {
    ValidationDetails {
        valid_score: mrz.valid_score,
        number_valid: mrz.passport_number.valid,
        dob_valid: mrz.birth_date.valid,
        expiry_valid: mrz.expiry_date.valid,
        personal_number_valid: mrz.personal_number.valid,
        composite_valid: mrz.composite_valid,
    }
}

impl From<&ValidationResult> for Response {
    fn from(result: &ValidationResult) -> Self {
        match result {
            ValidationResult::Valid(report) => {
                let mrz = &report.mrz;
                Response::Valid {
                    valid: true,
                    country: mrz.issuing_country.clone(),
                    passport_number: mrz.passport_number.trimmed().to_string(),
                    birth_date: mrz.birth_date.value.clone(),
                    expiry_date: mrz.expiry_date.value.clone(),
                    name: mrz.display_name(),
                    gender: mrz.sex.code().to_string(),
                    nationality: mrz.nationality.clone(),
                    checks: Checks {
                        image_quality: report.quality_message.clone(),
                        layout_validation: report.layout_message.clone(),
                    },
                    validation_details: details(mrz),
                }
            }
            ValidationResult::Invalid(failure) => {
                let validation_details = match &failure.error {
                    crate::ValidationError::MrzLowConfidence { record, .. } => {
                        Some(details(record))
                    }
                    _ => None,
                };
                Response::Invalid {
                    valid: false,
                    error: failure.reason(),
                    stage: failure.stage,
                    validation_details,
                }
            }
        }
    }
}
