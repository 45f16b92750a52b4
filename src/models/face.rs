/// Axis-aligned face box in image pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FaceRegion {
    /// Left edge
    pub x: u32,
    /// Top edge
    pub y: u32,
    /// Box width
    pub width: u32,
    /// Box height
    pub height: u32,
}

impl FaceRegion {
    /// Create a new face box
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Horizontal origin as a fraction of the image width
    pub fn x_ratio(&self, image_width: u32) -> f64 {
        if image_width == 0 {
            return f64::INFINITY;
        }
        f64::from(self.x) / f64::from(image_width)
    }
}
