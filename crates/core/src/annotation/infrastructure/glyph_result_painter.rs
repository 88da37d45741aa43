/// Rectangle + label overlay drawn with `imageproc` and an embedded font.
use ab_glyph::{FontRef, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;

use crate::annotation::domain::annotation_style::AnnotationStyle;
use crate::annotation::domain::result_painter::{AnnotateError, ResultPainter};
use crate::detection::domain::detection::{Detection, DetectionResult};
use crate::shared::frame::Frame;

static LABEL_FONT: &[u8] = include_bytes!("../../../assets/DejaVuSans.ttf");

pub struct GlyphResultPainter {
    font: FontRef<'static>,
    style: AnnotationStyle,
}

impl GlyphResultPainter {
    pub fn new(style: AnnotationStyle) -> Result<Self, AnnotateError> {
        let font = FontRef::try_from_slice(LABEL_FONT).map_err(|_| AnnotateError::Font)?;
        Ok(Self { font, style })
    }

    pub fn style(&self) -> &AnnotationStyle {
        &self.style
    }

    fn draw_detection(&self, canvas: &mut RgbImage, detection: &Detection) {
        let (w, h) = canvas.dimensions();
        let color = Rgb(self.style.color);
        let b = detection.face_box.normalized();

        // Edges pulled in to one pixel outside the canvas stay invisible,
        // which keeps huge boxes cheap without changing what gets drawn.
        let x0 = just_outside(b.x_min, w);
        let y0 = just_outside(b.y_min, h);
        let x1 = just_outside(b.x_max, w);
        let y1 = just_outside(b.y_max, h);
        let rect = Rect::at(x0, y0).of_size((x1 - x0 + 1) as u32, (y1 - y0 + 1) as u32);
        draw_hollow_rect_mut(canvas, rect, color);

        // Text sits on the box's top-left corner, baseline on the corner.
        let label = self.style.label(detection.confidence);
        let scale = PxScale::from(self.style.font_size);
        let (text_w, text_h) = text_size(scale, &self.font, &label);
        let text_x = detection
            .face_box
            .x_min
            .clamp(-(text_w as i32) - 1, w as i32);
        let text_y = detection
            .face_box
            .y_min
            .saturating_sub(text_h as i32)
            .clamp(-(text_h as i32) - 1, h as i32);
        draw_text_mut(canvas, color, text_x, text_y, scale, &self.font, &label);
    }
}

impl ResultPainter for GlyphResultPainter {
    fn draw_results(&self, frame: &mut Frame, result: &DetectionResult) -> Result<(), AnnotateError> {
        if frame.channels() != 3 {
            return Err(AnnotateError::FrameLayout(format!(
                "expected 3 channels, got {}",
                frame.channels()
            )));
        }
        if frame.is_empty() || result.is_empty() {
            return Ok(());
        }

        let mut canvas = RgbImage::from_raw(frame.width(), frame.height(), frame.data().to_vec())
            .ok_or_else(|| {
                AnnotateError::FrameLayout("pixel buffer does not match dimensions".into())
            })?;
        for detection in result {
            self.draw_detection(&mut canvas, detection);
        }
        frame.data_mut().copy_from_slice(canvas.as_raw());
        Ok(())
    }
}

fn just_outside(v: i32, extent: u32) -> i32 {
    v.clamp(-1, extent as i32)
}
