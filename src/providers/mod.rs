//! Capability providers used by the pipeline
//!
//! OCR and face detection are external engines. The pipeline only sees these
//! two traits, so engines can be swapped and tests can use canned answers.
//! Implementations must be stateless per call or internally synchronized;
//! the validator shares one instance across parallel validations.

pub mod deadline;
#[cfg(feature = "tesseract")]
pub mod tesseract;

pub use deadline::Deadline;
#[cfg(feature = "tesseract")]
pub use tesseract::TesseractMrz;

pub use crate::error::ProviderError;
use crate::models::{FaceRegion, RawImage};

/// Pixel-to-text extraction of the MRZ band
pub trait MrzExtractor: Send + Sync {
    /// Return the text lines believed to form the MRZ, top to bottom
    ///
    /// An empty list means nothing was detected.
    fn extract_mrz_lines(&self, image: &RawImage) -> Result<Vec<String>, ProviderError>;
}

/// Face bounding box search
pub trait FaceDetector: Send + Sync {
    /// Return detected face boxes; only the first one is used by the layout check
    fn detect_faces(&self, image: &RawImage) -> Result<Vec<FaceRegion>, ProviderError>;
}

/// MRZ provider returning a fixed answer regardless of the image
#[derive(Debug, Clone)]
pub struct StaticMrzLines {
    answer: Result<Vec<String>, ProviderError>,
}

impl StaticMrzLines {
    /// Always return `lines`
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answer: Ok(lines.into_iter().map(Into::into).collect()),
        }
    }

    /// Always detect nothing
    pub fn empty() -> Self {
        Self { answer: Ok(Vec::new()) }
    }

    /// Always fail with `err`
    pub fn failing(err: ProviderError) -> Self {
        Self { answer: Err(err) }
    }
}

impl MrzExtractor for StaticMrzLines {
    fn extract_mrz_lines(&self, _image: &RawImage) -> Result<Vec<String>, ProviderError> {
        self.answer.clone()
    }
}

/// Face provider returning a fixed answer regardless of the image
#[derive(Debug, Clone)]
pub struct StaticFaces {
    answer: Result<Vec<FaceRegion>, ProviderError>,
}

impl StaticFaces {
    /// Always return `faces`, in this order
    pub fn new(faces: Vec<FaceRegion>) -> Self {
        Self { answer: Ok(faces) }
    }

    /// Always detect nothing
    pub fn empty() -> Self {
        Self { answer: Ok(Vec::new()) }
    }

    /// Always fail with `err`
    pub fn failing(err: ProviderError) -> Self {
        Self { answer: Err(err) }
    }
}

impl FaceDetector for StaticFaces {
    fn detect_faces(&self, _image: &RawImage) -> Result<Vec<FaceRegion>, ProviderError> {
        self.answer.clone()
    }
}
