/// ICAO 9303 check digits (weighted modulo 10)
///
/// Character values: `0-9` → 0-9, `A-Z` → 10-35, filler `<` → 0.
/// Weights cycle `7, 3, 1` from the first character.
pub struct CheckDigit;

/// Weight cycle applied per character position
pub const WEIGHTS: [u32; 3] = [7, 3, 1];

impl CheckDigit {
    /// Numeric value of one MRZ character, `None` outside `A-Z0-9<`
    #[inline]
    pub fn char_value(c: char) -> Option<u32> {
        match c {
            '0'..='9' => Some(c as u32 - '0' as u32),
            'A'..='Z' => Some(c as u32 - 'A' as u32 + 10),
            '<' => Some(0),
            _ => None,
        }
    }

    /// Compute the check digit over `field`
    pub fn compute(field: &str) -> Option<u8> {
        let mut sum = 0u32;
        for (i, c) in field.chars().enumerate() {
            sum += Self::char_value(c)? * WEIGHTS[i % 3];
        }
        Some((sum % 10) as u8)
    }

    /// Compute over several fields as if they were concatenated
    ///
    /// The weight cycle continues across part boundaries, so order matters.
    pub fn compute_concat(parts: &[&str]) -> Option<u8> {
        let mut sum = 0u32;
        let mut i = 0usize;
        for part in parts {
            for c in part.chars() {
                sum += Self::char_value(c)? * WEIGHTS[i % 3];
                i += 1;
            }
        }
        Some((sum % 10) as u8)
    }

    /// Numeric value of a printed check digit; filler reads as 0
    pub fn printed_value(check: char) -> Option<u8> {
        match check {
            '0'..='9' => Some(check as u8 - b'0'),
            '<' => Some(0),
            _ => None,
        }
    }

    /// True if `check` is the correct check digit for `field`
    pub fn verify(field: &str, check: char) -> bool {
        match (Self::compute(field), Self::printed_value(check)) {
            (Some(computed), Some(printed)) => computed == printed,
            _ => false,
        }
    }

    /// True if `check` is the correct digit for the concatenation of `parts`
    pub fn verify_concat(parts: &[&str], check: char) -> bool {
        match (Self::compute_concat(parts), Self::printed_value(check)) {
            (Some(computed), Some(printed)) => computed == printed,
            _ => false,
        }
    }
}
