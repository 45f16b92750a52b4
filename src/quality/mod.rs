//! Image quality gate
//!
//! Cheapest stage of the pipeline: a resolution check on the header
//! dimensions, then a blur check on the Laplacian variance of the luma plane.

pub mod sharpness;

pub use sharpness::laplacian_variance;

use crate::config::QualityConfig;
use crate::models::{QualityVerdict, RawImage};
use crate::utils::grayscale::rgb_to_grayscale_parallel;

/// Screen an image for minimum resolution and sharpness
///
/// Resolution is checked first; a too-small image is rejected without
/// computing sharpness at all.
pub fn check_quality(image: &RawImage, config: &QualityConfig) -> QualityVerdict {
    let (width, height) = (image.width(), image.height());

    if width < config.min_width || height < config.min_height {
        log::debug!(
            "quality: {}x{} below minimum {}x{}",
            width,
            height,
            config.min_width,
            config.min_height
        );
        return QualityVerdict {
            passed: false,
            reason: format!(
                "Image resolution too low (min {}x{} pixels required)",
                config.min_width, config.min_height
            ),
            sharpness: None,
        };
    }

    let sharpness = sharpness_score(image);
    log::debug!("quality: sharpness {:.1} for {}x{}", sharpness, width, height);

    if sharpness < config.min_sharpness {
        return QualityVerdict {
            passed: false,
            reason: format!("Image is too blurry (sharpness score: {:.1})", sharpness),
            sharpness: Some(sharpness),
        };
    }

    QualityVerdict {
        passed: true,
        reason: "Image quality OK".to_string(),
        sharpness: Some(sharpness),
    }
}

/// Laplacian variance of the image's grayscale conversion
pub fn sharpness_score(image: &RawImage) -> f64 {
    let (w, h) = (image.width() as usize, image.height() as usize);
    let gray = rgb_to_grayscale_parallel(image.pixels(), w, h);
    laplacian_variance(&gray, w, h)
}
