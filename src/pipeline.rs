use crate::config::ValidationConfig;
use crate::error::{ProviderKind, ValidationError};
use crate::layout::check_layout;
use crate::models::{PassportReport, RawImage, Stage, ValidationResult};
use crate::mrz::{locate_mrz, parse_and_validate};
use crate::providers::{Deadline, FaceDetector, MrzExtractor};
use crate::quality::check_quality;
use rayon::prelude::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Run the gates in cost order, stopping at the first failure
///
/// `QUALITY → MRZ_LOCATE → MRZ_PARSE → LAYOUT`. Nothing is retried. The
/// cancel flag, if given, is only looked at between stages.
pub(crate) fn run_pipeline(
    image: &RawImage,
    config: &ValidationConfig,
    mrz: &dyn MrzExtractor,
    faces: &dyn FaceDetector,
    cancel: Option<&AtomicBool>,
) -> ValidationResult {
    let cancelled = |stage: Stage| -> Option<ValidationResult> {
        let flag = cancel?;
        if flag.load(Ordering::Acquire) {
            log::debug!("pipeline: cancelled before {}", stage);
            Some(ValidationResult::fail(stage, ValidationError::Cancelled(stage)))
        } else {
            None
        }
    };

    // Stage 1: resolution and sharpness
    if let Some(result) = cancelled(Stage::Quality) {
        return result;
    }
    let quality = check_quality(image, &config.quality);
    if !quality.passed {
        return ValidationResult::fail(Stage::Quality, ValidationError::Quality(quality.reason));
    }

    // Stage 2: MRZ lines from the OCR provider
    if let Some(result) = cancelled(Stage::MrzLocate) {
        return result;
    }
    let lines = match locate_mrz(image, mrz) {
        Ok(Some(lines)) => lines,
        Ok(None) => return ValidationResult::fail(Stage::MrzLocate, ValidationError::MrzNotFound),
        Err(err) => {
            log::warn!("pipeline: MRZ provider error: {}", err);
            return ValidationResult::fail(
                Stage::MrzLocate,
                ValidationError::from_provider(ProviderKind::Mrz, err),
            );
        }
    };

    // Stage 3: fields, check digits, score
    if let Some(result) = cancelled(Stage::MrzParse) {
        return result;
    }
    let policy = &config.mrz.score;
    let record = match parse_and_validate(&lines, policy) {
        Ok(record) => record,
        Err(err) => return ValidationResult::fail(Stage::MrzParse, err.into()),
    };
    if !policy.accepts(record.valid_score) {
        return ValidationResult::fail(
            Stage::MrzParse,
            ValidationError::MrzLowConfidence {
                score: record.valid_score,
                record: Box::new(record),
            },
        );
    }

    // Stage 4: face position
    if let Some(result) = cancelled(Stage::Layout) {
        return result;
    }
    let layout = match check_layout(image, faces, &config.layout) {
        Ok(verdict) => verdict,
        Err(err) => {
            log::warn!("pipeline: face provider error: {}", err);
            return ValidationResult::fail(
                Stage::Layout,
                ValidationError::from_provider(ProviderKind::Face, err),
            );
        }
    };
    if !layout.passed {
        return ValidationResult::fail(Stage::Layout, ValidationError::Layout(layout.reason));
    }

    log::info!(
        "pipeline: accepted {} passport (score {})",
        record.issuing_country,
        record.valid_score
    );

    ValidationResult::Valid(Box::new(PassportReport {
        face: layout.face.unwrap_or_default(),
        mrz: record,
        quality_message: quality.reason,
        layout_message: layout.reason,
    }))
}

/// Passport validator holding configuration and capability providers
///
/// Holds no per-call state, so one instance can serve concurrent
/// validations as long as its providers are thread-safe.
pub struct Validator {
    config: ValidationConfig,
    mrz: Arc<dyn MrzExtractor>,
    faces: Arc<dyn FaceDetector>,
}

impl Validator {
    /// Create a validator
    ///
    /// When `config.provider_timeout` is set, both providers are wrapped in a
    /// [`Deadline`].
    pub fn new(
        config: ValidationConfig,
        mrz: Arc<dyn MrzExtractor>,
        faces: Arc<dyn FaceDetector>,
    ) -> Self {
        let (mrz, faces) = match config.provider_timeout {
            Some(timeout) => {
                let mrz: Arc<dyn MrzExtractor> = Arc::new(Deadline::new(mrz, timeout));
                let faces: Arc<dyn FaceDetector> = Arc::new(Deadline::new(faces, timeout));
                (mrz, faces)
            }
            None => (mrz, faces),
        };
        Self { config, mrz, faces }
    }

    /// Create a validator from owned providers
    pub fn with_providers<M, F>(config: ValidationConfig, mrz: M, faces: F) -> Self
    where
        M: MrzExtractor + 'static,
        F: FaceDetector + 'static,
    {
        Self::new(config, Arc::new(mrz), Arc::new(faces))
    }

    /// Active configuration
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Validate a decoded image
    pub fn validate(&self, image: &RawImage) -> ValidationResult {
        run_pipeline(image, &self.config, self.mrz.as_ref(), self.faces.as_ref(), None)
    }

    /// Validate, checking `cancel` between stages
    pub fn validate_cancellable(&self, image: &RawImage, cancel: &AtomicBool) -> ValidationResult {
        run_pipeline(
            image,
            &self.config,
            self.mrz.as_ref(),
            self.faces.as_ref(),
            Some(cancel),
        )
    }

    /// Decode and validate an encoded image; undecodable input fails at `Decode`
    pub fn validate_bytes(&self, bytes: &[u8]) -> ValidationResult {
        match RawImage::decode(bytes) {
            Ok(image) => self.validate(&image),
            Err(err) => ValidationResult::fail(Stage::Decode, err),
        }
    }

    /// Validate independent images in parallel, preserving order
    pub fn validate_batch(&self, images: &[RawImage]) -> Vec<ValidationResult> {
        images.par_iter().map(|image| self.validate(image)).collect()
    }
}
