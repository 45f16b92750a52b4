/// RGB to luma conversion
/// Y = 0.299*R + 0.587*G + 0.114*B
/// Uses rounded fixed-point arithmetic: Y = (77*R + 150*G + 29*B + 128) >> 8
use rayon::prelude::*;

/// Coefficients scaled by 256; they sum to 256 so white stays 255
const COEF_R: u32 = 77;
const COEF_G: u32 = 150;
const COEF_B: u32 = 29;

#[inline]
fn luma(px: &[u8]) -> u8 {
    let lum = (COEF_R * px[0] as u32 + COEF_G * px[1] as u32 + COEF_B * px[2] as u32 + 128) >> 8;
    lum.min(255) as u8
}

/// Convert an RGB buffer to grayscale, one byte per pixel
pub fn rgb_to_grayscale(rgb: &[u8], width: usize, height: usize) -> Vec<u8> {
    let pixel_count = width * height;
    rgb[..pixel_count * 3].chunks_exact(3).map(luma).collect()
}

/// Convert RGB to grayscale using parallel processing
/// Processes rows in parallel for multi-core speedup
pub fn rgb_to_grayscale_parallel(rgb: &[u8], width: usize, height: usize) -> Vec<u8> {
    let mut gray = vec![0u8; width * height];
    if width == 0 {
        return gray;
    }

    gray.par_chunks_mut(width).enumerate().for_each(|(y, row)| {
        let src = &rgb[y * width * 3..(y + 1) * width * 3];
        for (out, px) in row.iter_mut().zip(src.chunks_exact(3)) {
            *out = luma(px);
        }
    });

    gray
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_to_grayscale() {
        // Pure white
        let gray = rgb_to_grayscale(&[255, 255, 255], 1, 1);
        assert_eq!(gray[0], 255);

        // Pure black
        let gray = rgb_to_grayscale(&[0, 0, 0], 1, 1);
        assert_eq!(gray[0], 0);

        // Pure red
        let gray = rgb_to_grayscale(&[255, 0, 0], 1, 1);
        assert!(gray[0] > 0 && gray[0] < 255);

        // Pure green
        let gray = rgb_to_grayscale(&[0, 255, 0], 1, 1);
        assert!(gray[0] > 100);
    }

    #[test]
    fn test_matches_rounded_float_weights() {
        for &(r, g, b) in &[
            (255u8, 255u8, 255u8),
            (128, 128, 128),
            (255, 0, 0),
            (0, 255, 0),
            (0, 0, 255),
            (12, 200, 77),
            (240, 15, 130),
        ] {
            let expected = (0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64).round();
            let gray = rgb_to_grayscale(&[r, g, b], 1, 1)[0] as f64;
            assert!(
                (gray - expected).abs() <= 1.0,
                "({}, {}, {}): {} vs {}",
                r,
                g,
                b,
                gray,
                expected
            );
        }
        // Gray levels map to themselves
        for v in [0u8, 1, 64, 127, 200, 254, 255] {
            assert_eq!(rgb_to_grayscale(&[v, v, v], 1, 1)[0], v);
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let (w, h) = (37, 23);
        let rgb: Vec<u8> = (0..w * h * 3).map(|i| (i * 31 % 256) as u8).collect();
        assert_eq!(
            rgb_to_grayscale(&rgb, w, h),
            rgb_to_grayscale_parallel(&rgb, w, h)
        );
    }
}
