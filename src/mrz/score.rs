use serde::Deserialize;

/// Validity score weighting for MRZ check digits
///
/// The score starts at 100 and each failed check deducts its weight
/// (saturating at 0). A record is accepted only when the score is strictly
/// greater than `min_score`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ScorePolicy {
    /// Deduction when the document number check digit fails
    pub passport_number_weight: u8,
    /// Deduction when the birth date check digit fails
    pub birth_date_weight: u8,
    /// Deduction when the expiry date check digit fails
    pub expiry_date_weight: u8,
    /// Deduction when the composite check digit fails
    pub composite_weight: u8,
    /// Accept iff score > min_score
    pub min_score: u8,
}

impl Default for ScorePolicy {
    fn default() -> Self {
        Self {
            passport_number_weight: 25,
            birth_date_weight: 25,
            expiry_date_weight: 25,
            composite_weight: 25,
            min_score: 50,
        }
    }
}

/// Which scored checks passed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckOutcome {
    /// Document number
    pub passport_number: bool,
    /// Birth date
    pub birth_date: bool,
    /// Expiry date
    pub expiry_date: bool,
    /// Composite
    pub composite: bool,
}

impl ScorePolicy {
    /// Aggregate score in 0..=100; never increases when a check flips to failed
    pub fn score(&self, outcome: &CheckOutcome) -> u8 {
        let deductions = [
            (outcome.passport_number, self.passport_number_weight),
            (outcome.birth_date, self.birth_date_weight),
            (outcome.expiry_date, self.expiry_date_weight),
            (outcome.composite, self.composite_weight),
        ];
        deductions
            .iter()
            .filter(|(passed, _)| !passed)
            .fold(100u8, |score, &(_, weight)| score.saturating_sub(weight))
    }

    /// Strict threshold: a score equal to `min_score` is rejected
    pub fn accepts(&self, score: u8) -> bool {
        score > self.min_score
    }
}
