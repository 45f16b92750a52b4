use crate::error::ProviderError;
use crate::models::{MrzLine, RawImage, TD3_LINE_COUNT};
use crate::providers::MrzExtractor;

/// Ask the OCR provider for the MRZ band and normalize its lines
///
/// Returns `Ok(None)` when the provider found nothing or a line count other
/// than the two TD3 lines. Provider errors, including timeouts, are passed
/// through untouched so they are never mistaken for "not found".
pub fn locate_mrz(
    image: &RawImage,
    extractor: &dyn MrzExtractor,
) -> Result<Option<Vec<MrzLine>>, ProviderError> {
    let raw = extractor.extract_mrz_lines(image)?;

    let lines: Vec<MrzLine> = raw
        .iter()
        .map(|line| MrzLine::new(line))
        .filter(|line| !line.is_empty())
        .collect();

    if lines.len() != TD3_LINE_COUNT {
        log::debug!(
            "mrz: provider returned {} usable lines ({} raw), need {}",
            lines.len(),
            raw.len(),
            TD3_LINE_COUNT
        );
        return Ok(None);
    }

    Ok(Some(lines))
}

/// Height in pixels of the bottom band an OCR engine should read
///
/// `ratio` is clamped to `0.05..=1.0`; the band is at least one row and
/// never taller than the image.
pub fn mrz_band_height(image_height: u32, ratio: f32) -> u32 {
    if image_height == 0 {
        return 0;
    }
    let ratio = if ratio.is_nan() { 1.0 } else { ratio.clamp(0.05, 1.0) };
    ((image_height as f32 * ratio).round() as u32).clamp(1, image_height)
}

/// Raw OCR text to MRZ candidates: whitespace removed, short lines dropped
pub fn mrz_candidate_lines(text: &str, min_len: usize) -> Vec<String> {
    text.lines()
        .map(|l| l.chars().filter(|c| !c.is_whitespace()).collect::<String>())
        .filter(|l| l.chars().count() >= min_len)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::StaticMrzLines;

    fn image() -> RawImage {
        RawImage::from_rgb(4, 4, vec![0; 48]).unwrap()
    }

    #[test]
    fn test_two_lines_found() {
        let provider = StaticMrzLines::new(["p<uto eriksson", "", "l898902c<3"]);
        let lines = locate_mrz(&image(), &provider).unwrap().unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].as_str(), "P<UTOERIKSSON");
        assert_eq!(lines[1].as_str(), "L898902C<3");
    }

    #[test]
    fn test_no_lines_is_not_found() {
        let provider = StaticMrzLines::empty();
        assert_eq!(locate_mrz(&image(), &provider).unwrap(), None);
    }

    #[test]
    fn test_wrong_line_count_is_not_found() {
        let provider = StaticMrzLines::new(["A", "B", "C"]);
        assert_eq!(locate_mrz(&image(), &provider).unwrap(), None);
        let provider = StaticMrzLines::new(["ONLY<ONE"]);
        assert_eq!(locate_mrz(&image(), &provider).unwrap(), None);
    }

    #[test]
    fn test_band_height() {
        assert_eq!(mrz_band_height(1000, 0.35), 350);
        assert_eq!(mrz_band_height(900, 0.35), 315);
        // Clamped into 0.05..=1.0
        assert_eq!(mrz_band_height(1000, 0.0), 50);
        assert_eq!(mrz_band_height(1000, 3.0), 1000);
        assert_eq!(mrz_band_height(1000, f32::NAN), 1000);
        // At least one row
        assert_eq!(mrz_band_height(4, 0.05), 1);
        assert_eq!(mrz_band_height(0, 0.35), 0);
    }

    #[test]
    fn test_candidate_lines() {
        let text = "REPUBLIC OF UTOPIA\n\
                    P<UTOERIKSSON<<ANNA<MARIA<<<<<<<<<<<<<<<<<<<\n\
                    \n\
                    L898902C<3 UTO7408122F1204159ZE184226B<<<<<16\n";
        let lines = mrz_candidate_lines(text, 30);
        assert_eq!(
            lines,
            vec![
                "P<UTOERIKSSON<<ANNA<MARIA<<<<<<<<<<<<<<<<<<<",
                "L898902C<3UTO7408122F1204159ZE184226B<<<<<16",
            ]
        );
    }

    #[test]
    fn test_candidate_min_len_is_inclusive() {
        let exact = "A".repeat(30);
        let short = "B".repeat(29);
        let spaced = format!("{} {}", "C".repeat(15), "C".repeat(15));
        let text = format!("{}\n{}\n{}", exact, short, spaced);
        let lines = mrz_candidate_lines(&text, 30);
        assert_eq!(lines, vec![exact, "C".repeat(30)]);
    }

    #[test]
    fn test_provider_error_passes_through() {
        let provider = StaticMrzLines::failing(ProviderError::Failed("engine crashed".into()));
        assert_eq!(
            locate_mrz(&image(), &provider),
            Err(ProviderError::Failed("engine crashed".into()))
        );
    }
}
