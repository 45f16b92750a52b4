//! End-to-end validation scenarios
//!
//! These run the full pipeline on synthetic images with stub providers, so
//! they exercise stage ordering, short-circuiting and the reported reasons
//! without any OCR or face detection engine installed.

use passport_gate::mrz::ScorePolicy;
use passport_gate::providers::{FaceDetector, MrzExtractor, StaticFaces, StaticMrzLines};
use passport_gate::report::Response;
use passport_gate::{
    FaceRegion, MrzConfig, ProviderError, ProviderKind, RawImage, Stage, ValidationConfig,
    ValidationError, ValidationResult, Validator,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

// ICAO 9303 Part 4 specimen (Utopia, Anna Maria Eriksson).
const LINE1: &str = "P<UTOERIKSSON<<ANNA<MARIA<<<<<<<<<<<<<<<<<<<";
const LINE2: &str = "L898902C<3UTO7408122F1204159ZE184226B<<<<<16";
// Same record with only the composite check digit wrong.
const LINE2_BAD_COMPOSITE: &str = "L898902C<3UTO7408122F1204159ZE184226B<<<<<15";

/// Vertical 3px stripes: plenty of edges, so it clears the sharpness gate
fn sharp_image(width: u32, height: u32) -> RawImage {
    let mut pixels = Vec::with_capacity((width * height * 3) as usize);
    for _ in 0..height {
        for x in 0..width {
            let v = if (x / 3) % 2 == 0 { 15 } else { 240 };
            pixels.extend_from_slice(&[v, v, v]);
        }
    }
    RawImage::from_rgb(width, height, pixels).expect("valid buffer")
}

fn flat_image(width: u32, height: u32) -> RawImage {
    RawImage::from_rgb(width, height, vec![128; (width * height * 3) as usize])
        .expect("valid buffer")
}

fn face_at(x: u32) -> StaticFaces {
    StaticFaces::new(vec![FaceRegion::new(x, 150, 260, 320)])
}

fn validator_with(config: ValidationConfig, mrz: StaticMrzLines, faces: StaticFaces) -> Validator {
    Validator::with_providers(config, mrz, faces)
}

fn validator(mrz: StaticMrzLines, faces: StaticFaces) -> Validator {
    validator_with(ValidationConfig::default(), mrz, faces)
}

fn expect_failure(result: &ValidationResult, stage: Stage) -> &ValidationError {
    let failure = result
        .failure()
        .unwrap_or_else(|| panic!("expected failure at {}, got success", stage));
    assert_eq!(failure.stage, stage, "failed at unexpected stage: {}", failure.reason());
    &failure.error
}

/// Counts calls so tests can assert a provider never ran
struct CountingOcr {
    calls: Arc<AtomicUsize>,
}

impl MrzExtractor for CountingOcr {
    fn extract_mrz_lines(&self, _image: &RawImage) -> Result<Vec<String>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![LINE1.to_string(), LINE2.to_string()])
    }
}

struct SlowOcr;

impl MrzExtractor for SlowOcr {
    fn extract_mrz_lines(&self, _image: &RawImage) -> Result<Vec<String>, ProviderError> {
        std::thread::sleep(Duration::from_millis(400));
        Ok(Vec::new())
    }
}

#[test]
fn test_low_resolution_fails_at_quality() {
    let v = validator(StaticMrzLines::new([LINE1, LINE2]), face_at(100));
    let result = v.validate(&sharp_image(400, 300));
    let err = expect_failure(&result, Stage::Quality);
    assert!(
        err.to_string().starts_with("Image resolution too low"),
        "{}",
        err
    );
}

#[test]
fn test_quality_failure_never_calls_ocr() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mrz: Arc<dyn MrzExtractor> = Arc::new(CountingOcr {
        calls: Arc::clone(&calls),
    });
    let faces: Arc<dyn FaceDetector> = Arc::new(face_at(100));
    let v = Validator::new(ValidationConfig::default(), mrz, faces);

    let result = v.validate(&flat_image(1200, 900));
    let err = expect_failure(&result, Stage::Quality);
    assert!(err.to_string().starts_with("Image is too blurry"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    assert!(v.validate(&sharp_image(1200, 900)).is_valid());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_no_mrz_lines_fails_at_locate() {
    let v = validator(StaticMrzLines::empty(), face_at(100));
    let result = v.validate(&sharp_image(1200, 900));
    let err = expect_failure(&result, Stage::MrzLocate);
    assert_eq!(err, &ValidationError::MrzNotFound);
    assert_eq!(err.to_string(), "MRZ not found or invalid");
}

#[test]
fn test_icao_specimen_passes_end_to_end() {
    let v = validator(StaticMrzLines::new([LINE1, LINE2]), face_at(120));
    let result = v.validate(&sharp_image(1200, 900));
    let report = result.report().expect("specimen should validate");

    assert_eq!(report.mrz.passport_number.value, "L898902C<");
    assert_eq!(report.mrz.passport_number.check_digit, '3');
    assert!(report.mrz.passport_number.valid);
    assert!(report.mrz.all_checks_valid());
    assert_eq!(report.mrz.valid_score, 100);

    let json: serde_json::Value =
        serde_json::from_str(&Response::from(&result).to_json()).expect("valid json");
    assert_eq!(json["valid"], true);
    assert_eq!(json["country"], "UTO");
    assert_eq!(json["passport_number"], "L898902C");
    assert_eq!(json["birth_date"], "740812");
    assert_eq!(json["expiry_date"], "120415");
    assert_eq!(json["name"], "ERIKSSON ANNA MARIA");
    assert_eq!(json["gender"], "F");
    assert_eq!(json["nationality"], "UTO");
    assert_eq!(json["checks"]["image_quality"], "Image quality OK");
    assert_eq!(json["checks"]["layout_validation"], "Basic layout OK");
    assert_eq!(json["validation_details"]["valid_score"], 100);
}

#[test]
fn test_score_of_exactly_fifty_is_rejected() {
    let config = ValidationConfig {
        mrz: MrzConfig {
            score: ScorePolicy {
                composite_weight: 50,
                ..ScorePolicy::default()
            },
        },
        ..ValidationConfig::default()
    };
    let v = validator_with(
        config,
        StaticMrzLines::new([LINE1, LINE2_BAD_COMPOSITE]),
        face_at(120),
    );
    let result = v.validate(&sharp_image(1200, 900));
    match expect_failure(&result, Stage::MrzParse) {
        ValidationError::MrzLowConfidence { score, record } => {
            assert_eq!(*score, 50);
            assert!(!record.composite_valid);
            assert!(record.passport_number.valid);
        }
        other => panic!("expected low confidence, got {:?}", other),
    }

    let json: serde_json::Value =
        serde_json::from_str(&Response::from(&result).to_json()).expect("valid json");
    assert_eq!(json["validation_details"]["composite_valid"], false);
}

#[test]
fn test_score_of_fifty_one_is_accepted() {
    let config = ValidationConfig {
        mrz: MrzConfig {
            score: ScorePolicy {
                composite_weight: 49,
                ..ScorePolicy::default()
            },
        },
        ..ValidationConfig::default()
    };
    let v = validator_with(
        config,
        StaticMrzLines::new([LINE1, LINE2_BAD_COMPOSITE]),
        face_at(120),
    );
    let result = v.validate(&sharp_image(1200, 900));
    let report = result.report().expect("score 51 should pass");
    assert_eq!(report.mrz.valid_score, 51);
    assert!(!report.mrz.composite_valid);
}

#[test]
fn test_structural_mrz_fault_is_a_parse_error_not_a_low_score() {
    let v = validator(StaticMrzLines::new([LINE1, &LINE2[..40]]), face_at(120));
    let result = v.validate(&sharp_image(1200, 900));
    let err = expect_failure(&result, Stage::MrzParse);
    assert!(matches!(err, ValidationError::MrzParse(_)), "{:?}", err);
}

#[test]
fn test_face_position_decides_layout() {
    let width = 1200;

    let v = validator(StaticMrzLines::new([LINE1, LINE2]), face_at(width / 2));
    let result = v.validate(&sharp_image(width, 900));
    let err = expect_failure(&result, Stage::Layout);
    assert_eq!(
        err.to_string(),
        "Face position incorrect (should be on right side)"
    );

    let v = validator(StaticMrzLines::new([LINE1, LINE2]), face_at(width / 10));
    assert!(v.validate(&sharp_image(width, 900)).is_valid());
}

#[test]
fn test_no_face_fails_layout() {
    let v = validator(StaticMrzLines::new([LINE1, LINE2]), StaticFaces::empty());
    let result = v.validate(&sharp_image(1200, 900));
    let err = expect_failure(&result, Stage::Layout);
    assert_eq!(err.to_string(), "No face detected in passport photo");
}

#[test]
fn test_validate_is_idempotent() {
    let v = validator(StaticMrzLines::new([LINE1, LINE2]), face_at(120));
    let image = sharp_image(1000, 700);
    assert_eq!(v.validate(&image), v.validate(&image));

    let v = validator(StaticMrzLines::empty(), face_at(120));
    assert_eq!(v.validate(&image), v.validate(&image));
}

#[test]
fn test_ocr_timeout_is_distinct_from_not_found() {
    let config = ValidationConfig {
        provider_timeout: Some(Duration::from_millis(30)),
        ..ValidationConfig::default()
    };
    let mrz: Arc<dyn MrzExtractor> = Arc::new(SlowOcr);
    let faces: Arc<dyn FaceDetector> = Arc::new(face_at(120));
    let v = Validator::new(config, mrz, faces);

    let result = v.validate(&sharp_image(1000, 700));
    let err = expect_failure(&result, Stage::MrzLocate);
    assert_eq!(
        err,
        &ValidationError::ProviderTimeout {
            provider: ProviderKind::Mrz
        }
    );
    assert_eq!(err.to_string(), "MRZ extraction timed out");
    assert_eq!(Response::status_code(&result), 500);
}

#[test]
fn test_face_provider_error_is_a_provider_failure() {
    let v = validator(
        StaticMrzLines::new([LINE1, LINE2]),
        StaticFaces::failing(ProviderError::Failed("cascade file missing".into())),
    );
    let result = v.validate(&sharp_image(1000, 700));
    let err = expect_failure(&result, Stage::Layout);
    assert_eq!(
        err.to_string(),
        "Face detection failed: cascade file missing"
    );
    assert!(err.is_provider_fault());
}

#[test]
fn test_batch_preserves_order() {
    let v = validator(StaticMrzLines::new([LINE1, LINE2]), face_at(120));
    let images = vec![
        sharp_image(1000, 700),
        sharp_image(400, 300),
        flat_image(1000, 700),
        sharp_image(900, 650),
    ];
    let results = v.validate_batch(&images);
    assert_eq!(results.len(), 4);
    assert!(results[0].is_valid());
    assert_eq!(results[1].failure().unwrap().stage, Stage::Quality);
    assert_eq!(results[2].failure().unwrap().stage, Stage::Quality);
    assert!(results[3].is_valid());
}

#[test]
fn test_encoded_png_is_decoded_and_validated() {
    let image = sharp_image(1000, 700);
    let buf = image::RgbImage::from_raw(1000, 700, image.pixels().to_vec()).expect("buffer");
    let mut png = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(buf)
        .write_to(&mut png, image::ImageOutputFormat::Png)
        .expect("encode png");

    let v = validator(StaticMrzLines::new([LINE1, LINE2]), face_at(120));
    assert!(v.validate_bytes(png.get_ref()).is_valid());

    let result = v.validate_bytes(b"not an image");
    expect_failure(&result, Stage::Decode);
}
