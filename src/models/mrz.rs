use std::fmt;

/// Width of a TD3 (passport) MRZ line
pub const TD3_LINE_LEN: usize = 44;

/// Number of MRZ lines on a TD3 document
pub const TD3_LINE_COUNT: usize = 2;

/// One normalized line of the machine readable zone
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MrzLine(String);

impl MrzLine {
    /// Normalize raw OCR output: drop whitespace, uppercase
    ///
    /// Length is not checked here; the parser rejects lines of the wrong width.
    pub fn new(raw: &str) -> Self {
        let text = raw
            .chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_uppercase)
            .collect();
        Self(text)
    }

    /// The normalized text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in characters (MRZ text is ASCII, so also bytes)
    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    /// True if nothing survived normalization
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for MrzLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Holder sex as printed in the MRZ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sex {
    /// `M`
    Male,
    /// `F`
    Female,
    /// `X` or filler
    Unspecified,
}

impl Sex {
    /// Parse the single MRZ sex character
    pub fn from_mrz(c: char) -> Option<Self> {
        match c {
            'M' => Some(Sex::Male),
            'F' => Some(Sex::Female),
            'X' | '<' => Some(Sex::Unspecified),
            _ => None,
        }
    }

    /// Single-letter code (`M`, `F`, `X`)
    pub fn code(&self) -> &'static str {
        match self {
            Sex::Male => "M",
            Sex::Female => "F",
            Sex::Unspecified => "X",
        }
    }
}

/// A field protected by its own check digit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckedField {
    /// Raw field text, fillers included
    pub value: String,
    /// Check digit character as printed
    pub check_digit: char,
    /// Whether the printed digit matches the computed one
    pub valid: bool,
}

impl CheckedField {
    /// Field text with trailing `<` fillers removed
    pub fn trimmed(&self) -> &str {
        self.value.trim_end_matches('<')
    }
}

/// Fields parsed from a TD3 MRZ with per-check validity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MrzRecord {
    /// Document code, e.g. `P<` or `PD`
    pub document_code: String,
    /// Issuing state (3 letters)
    pub issuing_country: String,
    /// Primary identifier
    pub surname: String,
    /// Secondary identifier, space separated
    pub given_names: String,
    /// Document number (9 characters)
    pub passport_number: CheckedField,
    /// Nationality (3 letters)
    pub nationality: String,
    /// Date of birth, YYMMDD
    pub birth_date: CheckedField,
    /// Sex
    pub sex: Sex,
    /// Date of expiry, YYMMDD
    pub expiry_date: CheckedField,
    /// Optional personal number (14 characters, may be all fillers)
    pub personal_number: CheckedField,
    /// Composite check digit as printed
    pub composite_check_digit: char,
    /// Whether the composite check digit matches
    pub composite_valid: bool,
    /// Aggregate score, 0-100
    pub valid_score: u8,
}

impl MrzRecord {
    /// `"SURNAME GIVEN NAMES"`, the display name used in reports
    pub fn display_name(&self) -> String {
        if self.given_names.is_empty() {
            self.surname.clone()
        } else {
            format!("{} {}", self.surname, self.given_names)
        }
    }

    /// True only if every check digit, composite included, matched
    pub fn all_checks_valid(&self) -> bool {
        self.passport_number.valid
            && self.birth_date.valid
            && self.expiry_date.valid
            && self.personal_number.valid
            && self.composite_valid
    }
}
