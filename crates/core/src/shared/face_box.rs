use serde::{Deserialize, Serialize};

/// Axis-aligned face box in pixel coordinates, top-left origin.
///
/// Corners come straight from the network output, so nothing guarantees
/// `x_min <= x_max` or that the box lies inside the image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FaceBox {
    pub x_min: i32,
    pub y_min: i32,
    pub x_max: i32,
    pub y_max: i32,
}

impl FaceBox {
    pub fn new(x_min: i32, y_min: i32, x_max: i32, y_max: i32) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    /// Signed extent; widened so boxes spanning the whole `i32` range
    /// do not overflow.
    pub fn width(&self) -> i64 {
        i64::from(self.x_max) - i64::from(self.x_min)
    }

    pub fn height(&self) -> i64 {
        i64::from(self.y_max) - i64::from(self.y_min)
    }

    /// Same box with swapped corners put back in order.
    pub fn normalized(&self) -> Self {
        Self {
            x_min: self.x_min.min(self.x_max),
            y_min: self.y_min.min(self.y_max),
            x_max: self.x_min.max(self.x_max),
            y_max: self.y_min.max(self.y_max),
        }
    }

    /// Clamps every coordinate into `[0, width] x [0, height]`.
    pub fn clamped(&self, width: u32, height: u32) -> Self {
        let w = i32::try_from(width).unwrap_or(i32::MAX);
        let h = i32::try_from(height).unwrap_or(i32::MAX);
        Self {
            x_min: self.x_min.clamp(0, w),
            y_min: self.y_min.clamp(0, h),
            x_max: self.x_max.clamp(0, w),
            y_max: self.y_max.clamp(0, h),
        }
    }

    pub fn iou(&self, other: &FaceBox) -> f64 {
        let a = self.normalized();
        let b = other.normalized();
        let ix1 = i64::from(a.x_min.max(b.x_min));
        let iy1 = i64::from(a.y_min.max(b.y_min));
        let ix2 = i64::from(a.x_max.min(b.x_max));
        let iy2 = i64::from(a.y_max.min(b.y_max));

        let inter = (ix2 - ix1).max(0) as f64 * (iy2 - iy1).max(0) as f64;
        if inter == 0.0 {
            return 0.0;
        }

        let area_a = a.width() as f64 * a.height() as f64;
        let area_b = b.width() as f64 * b.height() as f64;
        inter / (area_a + area_b - inter)
    }
}

impl From<FaceBox> for [i32; 4] {
    fn from(b: FaceBox) -> Self {
        [b.x_min, b.y_min, b.x_max, b.y_max]
    }
}
