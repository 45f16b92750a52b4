//! MRZ extraction using rusty-tesseract (system tesseract binary)

use super::{MrzExtractor, ProviderError};
use crate::models::RawImage;
use crate::mrz::{mrz_band_height, mrz_candidate_lines};
use image::GenericImageView;
use rusty_tesseract::{Args, Image};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

static BAND_SEQ: AtomicU64 = AtomicU64::new(0);

/// OCR-B character set used on the MRZ
const MRZ_WHITELIST: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789<";

/// Tesseract-backed [`MrzExtractor`]
///
/// Crops the bottom band of the data page, where the MRZ is printed, and
/// keeps lines long enough to be MRZ text.
#[derive(Debug, Clone)]
pub struct TesseractMrz {
    /// Fraction of the page height, measured from the bottom, sent to OCR
    pub band_ratio: f32,
    /// Lines shorter than this (after removing spaces) are dropped
    pub min_line_len: usize,
    /// Tesseract language
    pub lang: String,
}

impl Default for TesseractMrz {
    fn default() -> Self {
        Self {
            band_ratio: 0.35,
            min_line_len: 30,
            lang: "eng".to_string(),
        }
    }
}

impl TesseractMrz {
    fn args(&self) -> Args {
        let mut config_variables = HashMap::new();
        config_variables.insert(
            "tessedit_char_whitelist".to_string(),
            MRZ_WHITELIST.to_string(),
        );
        Args {
            lang: self.lang.clone(),
            config_variables,
            dpi: Some(300),
            psm: Some(6), // Single uniform block of text
            oem: Some(3),
        }
    }

    fn mrz_band(&self, image: &RawImage) -> image::DynamicImage {
        let (w, h) = (image.width(), image.height());
        let band_h = mrz_band_height(h, self.band_ratio);
        image.to_dynamic().crop_imm(0, h - band_h, w, band_h)
    }
}

/// Temporary PNG handed to the tesseract binary, removed on drop
struct BandFile(PathBuf);

impl BandFile {
    fn write(band: &image::DynamicImage) -> Result<Self, ProviderError> {
        let seq = BAND_SEQ.fetch_add(1, Ordering::Relaxed);
        let path = std::env::temp_dir().join(format!(
            "passport_gate_mrz_{}_{}.png",
            std::process::id(),
            seq
        ));
        band.save(&path)
            .map_err(|e| ProviderError::Failed(format!("failed to write MRZ band: {}", e)))?;
        Ok(Self(path))
    }
}

impl Drop for BandFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
    }
}

impl MrzExtractor for TesseractMrz {
    fn extract_mrz_lines(&self, image: &RawImage) -> Result<Vec<String>, ProviderError> {
        let band = self.mrz_band(image);
        log::debug!(
            "tesseract: OCR on {}x{} MRZ band",
            band.width(),
            band.height()
        );

        let file = BandFile::write(&band)?;
        let tess_img = Image::from_path(&file.0).map_err(|e| {
            ProviderError::Failed(format!("failed to create tesseract image: {}", e))
        })?;
        let text = rusty_tesseract::image_to_string(&tess_img, &self.args())
            .map_err(|e| ProviderError::Failed(format!("tesseract: {}", e)))?;

        let lines = mrz_candidate_lines(&text, self.min_line_len);

        log::debug!("tesseract: {} candidate MRZ lines", lines.len());
        Ok(lines)
    }
}
