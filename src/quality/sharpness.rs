use rayon::prelude::*;

/// Mirror an out-of-range index back into `0..len`, excluding the edge pixel
/// itself (`gfedcb|abcdefgh|gfedcba`).
#[inline]
fn reflect101(i: isize, len: usize) -> usize {
    if len == 1 {
        return 0;
    }
    let last = len as isize - 1;
    let i = if i < 0 { -i } else { i };
    let i = if i > last { 2 * last - i } else { i };
    i as usize
}

/// Variance of the 4-neighbour Laplacian `[0,1,0; 1,-4,1; 0,1,0]`
///
/// Borders are handled by reflection so every pixel contributes. Higher
/// values mean more high-frequency detail; a flat image scores 0.
pub fn laplacian_variance(gray: &[u8], width: usize, height: usize) -> f64 {
    let pixel_count = width * height;
    if pixel_count == 0 {
        return 0.0;
    }

    let (sum, sum_sq) = (0..height)
        .into_par_iter()
        .map(|y| {
            let up = reflect101(y as isize - 1, height) * width;
            let down = reflect101(y as isize + 1, height) * width;
            let row = y * width;
            let mut sum = 0.0f64;
            let mut sum_sq = 0.0f64;
            for x in 0..width {
                let left = reflect101(x as isize - 1, width);
                let right = reflect101(x as isize + 1, width);
                let lap = gray[up + x] as i32
                    + gray[down + x] as i32
                    + gray[row + left] as i32
                    + gray[row + right] as i32
                    - 4 * gray[row + x] as i32;
                let lap = lap as f64;
                sum += lap;
                sum_sq += lap * lap;
            }
            (sum, sum_sq)
        })
        .reduce(|| (0.0, 0.0), |a, b| (a.0 + b.0, a.1 + b.1));

    let n = pixel_count as f64;
    let mean = sum / n;
    (sum_sq / n - mean * mean).max(0.0)
}
