//! Utility functions for image processing
//!
//! - Grayscale conversion (RGB to luminance), sequential and row-parallel

pub mod grayscale;
