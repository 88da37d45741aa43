use serde::{Deserialize, Serialize};

use crate::shared::face_box::FaceBox;

/// One accepted candidate: its score and pixel-space box.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub confidence: f32,
    #[serde(rename = "box")]
    pub face_box: FaceBox,
}

/// Detections from a single `detect` call, in the network's native order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DetectionResult {
    detections: Vec<Detection>,
}

impl DetectionResult {
    pub fn new(detections: Vec<Detection>) -> Self {
        Self { detections }
    }

    pub fn detections(&self) -> &[Detection] {
        &self.detections
    }

    pub fn len(&self) -> usize {
        self.detections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Detection> {
        self.detections.iter()
    }

    pub fn confidences(&self) -> Vec<f32> {
        self.detections.iter().map(|d| d.confidence).collect()
    }

    pub fn boxes(&self) -> Vec<FaceBox> {
        self.detections.iter().map(|d| d.face_box).collect()
    }

    /// Splits into the parallel `(confidences, boxes)` sequences.
    pub fn into_parts(self) -> (Vec<f32>, Vec<FaceBox>) {
        self.detections
            .into_iter()
            .map(|d| (d.confidence, d.face_box))
            .unzip()
    }
}

impl FromIterator<Detection> for DetectionResult {
    fn from_iter<I: IntoIterator<Item = Detection>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a DetectionResult {
    type Item = &'a Detection;
    type IntoIter = std::slice::Iter<'a, Detection>;

    fn into_iter(self) -> Self::IntoIter {
        self.detections.iter()
    }
}
