//! Coarse page layout check: the holder photo must be on the expected side.
//!
//! Only the first box returned by the face provider is considered. Providers
//! do not guarantee an order, so with several faces on the page (ghost image,
//! background) the decision may be made on the wrong one. This is a known
//! limitation of the check.

use crate::config::LayoutConfig;
use crate::error::ProviderError;
use crate::models::{LayoutVerdict, RawImage};
use crate::providers::FaceDetector;

/// Verify a face was found and its horizontal origin is within the allowed band
pub fn check_layout(
    image: &RawImage,
    detector: &dyn FaceDetector,
    config: &LayoutConfig,
) -> Result<LayoutVerdict, ProviderError> {
    let faces = detector.detect_faces(image)?;

    let Some(&face) = faces.first() else {
        return Ok(LayoutVerdict {
            passed: false,
            reason: "No face detected in passport photo".to_string(),
            face: None,
        });
    };

    if faces.len() > 1 {
        log::debug!("layout: {} faces detected, using the first", faces.len());
    }

    let ratio = face.x_ratio(image.width());
    if ratio > config.max_face_x_ratio {
        log::debug!(
            "layout: face x={} at {:.3} of width, limit {:.3}",
            face.x,
            ratio,
            config.max_face_x_ratio
        );
        return Ok(LayoutVerdict {
            passed: false,
            reason: "Face position incorrect (should be on right side)".to_string(),
            face: Some(face),
        });
    }

    Ok(LayoutVerdict {
        passed: true,
        reason: "Basic layout OK".to_string(),
        face: Some(face),
    })
}
