use crate::annotation::domain::result_painter::{AnnotateError, ResultPainter};
use crate::detection::domain::detection::DetectionResult;
use crate::detection::domain::errors::DetectionError;
use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::face_box::FaceBox;
use crate::shared::frame::Frame;

/// Detect-then-draw facade that remembers the latest result.
///
/// For callers that want `get_faceboxes` followed by `draw_all_results`
/// without threading the result through themselves. Drawing before any
/// successful detection is an explicit error.
pub struct FaceDetectionSession {
    detector: Box<dyn FaceDetector>,
    painter: Box<dyn ResultPainter>,
    last_result: Option<DetectionResult>,
}

impl FaceDetectionSession {
    pub fn new(detector: Box<dyn FaceDetector>, painter: Box<dyn ResultPainter>) -> Self {
        Self {
            detector,
            painter,
            last_result: None,
        }
    }

    /// Detects faces and returns `(confidences, boxes)` as parallel lists.
    ///
    /// Replaces the stored result on success; a failed call leaves the
    /// previous result in place.
    pub fn get_faceboxes(
        &mut self,
        frame: &Frame,
        threshold: f32,
    ) -> Result<(Vec<f32>, Vec<FaceBox>), DetectionError> {
        let result = self.detector.detect(frame, threshold)?;
        let parts = (result.confidences(), result.boxes());
        self.last_result = Some(result);
        Ok(parts)
    }

    /// Draws every stored detection onto `frame`.
    pub fn draw_all_results(&self, frame: &mut Frame) -> Result<(), AnnotateError> {
        let result = self
            .last_result
            .as_ref()
            .ok_or(AnnotateError::NoDetectionResult)?;
        self.painter.draw_results(frame, result)
    }

    pub fn last_result(&self) -> Option<&DetectionResult> {
        self.last_result.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::domain::detection::Detection;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    // --- Stubs ---

    struct ScriptedDetector {
        replies: VecDeque<Result<DetectionResult, DetectionError>>,
        thresholds: Arc<Mutex<Vec<f32>>>,
    }

    impl FaceDetector for ScriptedDetector {
        fn detect(
            &mut self,
            _frame: &Frame,
            threshold: f32,
        ) -> Result<DetectionResult, DetectionError> {
            self.thresholds.lock().unwrap().push(threshold);
            self.replies
                .pop_front()
                .unwrap_or_else(|| Ok(DetectionResult::default()))
        }
    }

    struct RecordingPainter {
        drawn: Arc<Mutex<Vec<DetectionResult>>>,
    }

    impl ResultPainter for RecordingPainter {
        fn draw_results(
            &self,
            _frame: &mut Frame,
            result: &DetectionResult,
        ) -> Result<(), AnnotateError> {
            self.drawn.lock().unwrap().push(result.clone());
            Ok(())
        }
    }

    fn faces(confidences: &[f32]) -> DetectionResult {
        confidences
            .iter()
            .enumerate()
            .map(|(i, &confidence)| Detection {
                confidence,
                face_box: FaceBox::new(i as i32 * 10, 0, i as i32 * 10 + 5, 5),
            })
            .collect()
    }

    fn session(
        replies: Vec<Result<DetectionResult, DetectionError>>,
    ) -> (
        FaceDetectionSession,
        Arc<Mutex<Vec<f32>>>,
        Arc<Mutex<Vec<DetectionResult>>>,
    ) {
        let thresholds = Arc::new(Mutex::new(Vec::new()));
        let drawn = Arc::new(Mutex::new(Vec::new()));
        let detector = ScriptedDetector {
            replies: replies.into(),
            thresholds: thresholds.clone(),
        };
        let painter = RecordingPainter {
            drawn: drawn.clone(),
        };
        (
            FaceDetectionSession::new(Box::new(detector), Box::new(painter)),
            thresholds,
            drawn,
        )
    }

    #[test]
    fn test_draw_before_detect_is_error() {
        let (session, _, drawn) = session(vec![]);
        let mut frame = Frame::filled(10, 10, [0, 0, 0]);
        let err = session.draw_all_results(&mut frame).unwrap_err();
        assert!(matches!(err, AnnotateError::NoDetectionResult));
        assert!(drawn.lock().unwrap().is_empty());
    }

    #[test]
    fn test_get_faceboxes_returns_parallel_lists() {
        let (mut session, thresholds, _) = session(vec![Ok(faces(&[0.95, 0.91]))]);
        let frame = Frame::filled(10, 10, [0, 0, 0]);
        let (confidences, boxes) = session.get_faceboxes(&frame, 0.9).unwrap();
        assert_eq!(confidences, vec![0.95, 0.91]);
        assert_eq!(boxes.len(), 2);
        assert_eq!(*thresholds.lock().unwrap(), vec![0.9]);
    }

    #[test]
    fn test_draw_uses_latest_result() {
        let (mut session, _, drawn) =
            session(vec![Ok(faces(&[0.7, 0.8])), Ok(faces(&[0.99]))]);
        let mut frame = Frame::filled(10, 10, [0, 0, 0]);
        session.get_faceboxes(&frame, 0.5).unwrap();
        session.get_faceboxes(&frame, 0.5).unwrap();
        session.draw_all_results(&mut frame).unwrap();
        assert_eq!(*drawn.lock().unwrap(), vec![faces(&[0.99])]);
    }

    #[test]
    fn test_empty_detection_still_allows_draw() {
        let (mut session, _, drawn) = session(vec![Ok(DetectionResult::default())]);
        let mut frame = Frame::filled(10, 10, [0, 0, 0]);
        let (confidences, boxes) = session.get_faceboxes(&frame, 0.5).unwrap();
        assert!(confidences.is_empty() && boxes.is_empty());
        session.draw_all_results(&mut frame).unwrap();
        assert_eq!(drawn.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_failed_detect_keeps_previous_result() {
        let (mut session, _, _) = session(vec![
            Ok(faces(&[0.9])),
            Err(DetectionError::MalformedImage("empty".into())),
        ]);
        let frame = Frame::filled(10, 10, [0, 0, 0]);
        session.get_faceboxes(&frame, 0.5).unwrap();
        assert!(session.get_faceboxes(&frame, 0.5).is_err());
        assert_eq!(session.last_result(), Some(&faces(&[0.9])));
    }

    #[test]
    fn test_failed_first_detect_still_blocks_draw() {
        let (mut session, _, _) =
            session(vec![Err(DetectionError::Inference("boom".into()))]);
        let mut frame = Frame::filled(10, 10, [0, 0, 0]);
        assert!(session.get_faceboxes(&frame, 0.5).is_err());
        assert!(matches!(
            session.draw_all_results(&mut frame),
            Err(AnnotateError::NoDetectionResult)
        ));
    }
}
