use crate::detection::domain::detection::DetectionResult;
use crate::detection::domain::errors::DetectionError;
use crate::shared::frame::Frame;

/// Domain interface for face detection.
///
/// `detect` returns a fresh result and keeps nothing between calls;
/// `&mut self` only reflects that running the network needs exclusive
/// access to the session.
pub trait FaceDetector: Send {
    fn detect(&mut self, frame: &Frame, threshold: f32) -> Result<DetectionResult, DetectionError>;
}
