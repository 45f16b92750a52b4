use crate::error::ValidationError;
use image::{DynamicImage, RgbImage};
use std::path::Path;

/// Decoded 8-bit RGB pixel buffer (3 bytes per pixel, row-major)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl RawImage {
    /// Wrap an existing RGB buffer
    ///
    /// Fails with [`ValidationError::InvalidImage`] if the buffer length does
    /// not match `width * height * 3` or either dimension is zero.
    pub fn from_rgb(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, ValidationError> {
        if width == 0 || height == 0 {
            return Err(ValidationError::InvalidImage(format!(
                "empty image ({}x{})",
                width, height
            )));
        }
        let expected = width as usize * height as usize * 3;
        if pixels.len() != expected {
            return Err(ValidationError::InvalidImage(format!(
                "expected {} RGB bytes for {}x{}, got {}",
                expected,
                width,
                height,
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Decode an encoded image (JPEG, PNG, ...) from memory
    pub fn decode(bytes: &[u8]) -> Result<Self, ValidationError> {
        let img = image::load_from_memory(bytes)
            .map_err(|err| ValidationError::InvalidImage(err.to_string()))?;
        Self::from_dynamic(img)
    }

    /// Decode an image file from disk
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ValidationError> {
        let img = image::open(path.as_ref()).map_err(|err| {
            ValidationError::InvalidImage(format!("{}: {}", path.as_ref().display(), err))
        })?;
        Self::from_dynamic(img)
    }

    fn from_dynamic(img: DynamicImage) -> Result<Self, ValidationError> {
        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();
        Self::from_rgb(width, height, rgb.into_raw())
    }

    /// Image width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGB bytes
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Copy into an `image` crate buffer for providers that need one
    pub fn to_dynamic(&self) -> DynamicImage {
        // Length is checked on construction, so from_raw cannot fail here.
        match RgbImage::from_raw(self.width, self.height, self.pixels.clone()) {
            Some(buf) => DynamicImage::ImageRgb8(buf),
            None => DynamicImage::new_rgb8(self.width, self.height),
        }
    }
}
