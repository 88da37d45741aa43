use thiserror::Error;

use crate::detection::domain::detection::DetectionResult;
use crate::shared::frame::Frame;

#[derive(Error, Debug)]
pub enum AnnotateError {
    #[error("no detection result to draw; run detection first")]
    NoDetectionResult,
    #[error("embedded label font could not be parsed")]
    Font,
    #[error("cannot draw on frame: {0}")]
    FrameLayout(String),
}

/// Overlays detections onto a frame in place.
///
/// The result is passed explicitly; painters hold no detection state.
pub trait ResultPainter: Send {
    fn draw_results(&self, frame: &mut Frame, result: &DetectionResult) -> Result<(), AnnotateError>;
}
