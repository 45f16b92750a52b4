use super::checksum::CheckDigit;
use super::score::{CheckOutcome, ScorePolicy};
use crate::error::MrzParseError;
use crate::models::{CheckedField, MrzLine, MrzRecord, Sex, TD3_LINE_COUNT, TD3_LINE_LEN};

/// Parse TD3 lines into fields and evaluate every check digit
///
/// Structural problems (line count, width, charset, empty mandatory fields)
/// are errors. Failed check digits are not: they lower `valid_score`, and
/// the caller decides acceptance with [`ScorePolicy::accepts`].
pub fn parse_and_validate(
    lines: &[MrzLine],
    policy: &ScorePolicy,
) -> Result<MrzRecord, MrzParseError> {
    if lines.len() != TD3_LINE_COUNT {
        return Err(MrzParseError::LineCount {
            expected: TD3_LINE_COUNT,
            found: lines.len(),
        });
    }

    for (idx, line) in lines.iter().enumerate() {
        validate_line(idx + 1, line.as_str())?;
    }

    // Both lines are now known to be 44 ASCII characters.
    let l1 = lines[0].as_str();
    let l2 = lines[1].as_str();

    let document_code = l1[0..2].trim_end_matches('<').to_string();
    if document_code.is_empty() {
        return Err(MrzParseError::MissingField("document_code"));
    }
    let issuing_country = l1[2..5].trim_end_matches('<').to_string();
    if issuing_country.is_empty() {
        return Err(MrzParseError::MissingField("issuing_country"));
    }
    let (surname, given_names) = split_names(&l1[5..44]);

    let passport_number = checked(&l2[0..9], char_at(l2, 9));
    let nationality = l2[10..13].trim_end_matches('<').to_string();
    let birth_date = checked(&l2[13..19], char_at(l2, 19));
    let sex_char = char_at(l2, 20);
    let sex = Sex::from_mrz(sex_char).ok_or(MrzParseError::InvalidSex(sex_char))?;
    let expiry_date = checked(&l2[21..27], char_at(l2, 27));
    let personal_number = checked(&l2[28..42], char_at(l2, 42));

    let composite_check_digit = char_at(l2, 43);
    let composite_valid =
        CheckDigit::verify_concat(&[&l2[0..10], &l2[13..20], &l2[21..43]], composite_check_digit);

    let valid_score = policy.score(&CheckOutcome {
        passport_number: passport_number.valid,
        birth_date: birth_date.valid,
        expiry_date: expiry_date.valid,
        composite: composite_valid,
    });

    log::debug!(
        "mrz: number={} dob={} expiry={} personal={} composite={} score={}",
        passport_number.valid,
        birth_date.valid,
        expiry_date.valid,
        personal_number.valid,
        composite_valid,
        valid_score
    );

    Ok(MrzRecord {
        document_code,
        issuing_country,
        surname,
        given_names,
        passport_number,
        nationality,
        birth_date,
        sex,
        expiry_date,
        personal_number,
        composite_check_digit,
        composite_valid,
        valid_score,
    })
}

fn validate_line(line_no: usize, line: &str) -> Result<(), MrzParseError> {
    let found = line.chars().count();
    if found != TD3_LINE_LEN {
        return Err(MrzParseError::LineLength {
            line: line_no,
            expected: TD3_LINE_LEN,
            found,
        });
    }
    if let Some((column, found)) = line
        .chars()
        .enumerate()
        .find(|(_, c)| CheckDigit::char_value(*c).is_none())
    {
        return Err(MrzParseError::InvalidCharacter {
            line: line_no,
            column: column + 1,
            found,
        });
    }
    Ok(())
}

#[inline]
fn char_at(line: &str, idx: usize) -> char {
    line.as_bytes()[idx] as char
}

fn checked(value: &str, check_digit: char) -> CheckedField {
    CheckedField {
        value: value.to_string(),
        check_digit,
        valid: CheckDigit::verify(value, check_digit),
    }
}

/// `ERIKSSON<<ANNA<MARIA<<<` → (`ERIKSSON`, `ANNA MARIA`)
fn split_names(field: &str) -> (String, String) {
    let field = field.trim_end_matches('<');
    let (primary, secondary) = field.split_once("<<").unwrap_or((field, ""));
    (filler_to_spaces(primary), filler_to_spaces(secondary))
}

fn filler_to_spaces(part: &str) -> String {
    part.split('<')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
