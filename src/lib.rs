//! passport_gate - passport image validation
//!
//! Checks that a submitted image is a legible machine-readable passport by
//! running it through a short-circuiting pipeline:
//!
//! 1. Quality: minimum resolution and Laplacian-variance sharpness
//! 2. MRZ: line extraction through an OCR provider, TD3 field parsing and
//!    ICAO 9303 check digits aggregated into a validity score
//! 3. Layout: the first detected face must sit in the photo area
//!
//! OCR and face detection are capability providers behind the
//! [`MrzExtractor`] and [`FaceDetector`] traits.

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Thresholds and environment overrides
pub mod config;
/// Failure taxonomy
pub mod error;
/// Face position check
pub mod layout;
/// Core data structures (RawImage, MrzRecord, ValidationResult, etc.)
pub mod models;
/// MRZ location, parsing and check digits
pub mod mrz;
/// Stage orchestration
pub mod pipeline;
/// OCR and face detection capability providers
pub mod providers;
/// Resolution and sharpness gate
pub mod quality;
/// Adapter-facing response shape
pub mod report;
/// Utility functions (grayscale)
pub mod utils;

pub use config::{LayoutConfig, MrzConfig, QualityConfig, ValidationConfig};
pub use error::{MrzParseError, ProviderError, ProviderKind, ValidationError};
pub use models::{
    CheckedField, FaceRegion, LayoutVerdict, MrzLine, MrzRecord, PassportReport, QualityVerdict,
    RawImage, Sex, Stage, ValidationFailure, ValidationResult,
};
pub use pipeline::Validator;
pub use providers::{FaceDetector, MrzExtractor};

/// Validate an image with the default thresholds
///
/// # Arguments
/// * `image` - Decoded RGB image
/// * `mrz` - OCR provider returning the MRZ lines
/// * `faces` - Face detection provider
///
/// # Example
/// ```
/// use passport_gate::providers::{StaticFaces, StaticMrzLines};
/// use passport_gate::{RawImage, Stage};
///
/// let image = RawImage::from_rgb(400, 300, vec![0u8; 400 * 300 * 3]).unwrap();
/// let result = passport_gate::validate(&image, &StaticMrzLines::empty(), &StaticFaces::empty());
/// assert_eq!(result.failure().unwrap().stage, Stage::Quality);
/// ```
pub fn validate(
    image: &RawImage,
    mrz: &dyn MrzExtractor,
    faces: &dyn FaceDetector,
) -> ValidationResult {
    pipeline::run_pipeline(image, &ValidationConfig::default(), mrz, faces, None)
}
