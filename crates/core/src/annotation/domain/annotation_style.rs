/// Green, as in the classic OpenCV demo overlays.
pub const DEFAULT_COLOR: [u8; 3] = [0, 255, 0];

/// Label font height in pixels.
pub const DEFAULT_FONT_SIZE: f32 = 14.0;

/// How detections are drawn: one color for boxes and labels.
#[derive(Clone, Debug, PartialEq)]
pub struct AnnotationStyle {
    /// RGB color of rectangles and label text.
    pub color: [u8; 3],
    pub font_size: f32,
}

impl AnnotationStyle {
    /// Text drawn next to a box, e.g. `face: 0.9871`.
    pub fn label(&self, confidence: f32) -> String {
        format!("face: {confidence:.4}")
    }
}

impl Default for AnnotationStyle {
    fn default() -> Self {
        Self {
            color: DEFAULT_COLOR,
            font_size: DEFAULT_FONT_SIZE,
        }
    }
}
