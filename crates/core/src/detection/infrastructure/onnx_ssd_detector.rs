/// SSD face detector using ONNX Runtime via `ort`.
///
/// Runs the res10 300x300 single-shot detector: fixed-size blob in, one
/// `[1, 1, N, 7]` detection tensor out, thresholded and scaled back to the
/// input frame. No NMS and no tracking; the network's own ordering is kept.
use std::borrow::Cow;
use std::path::Path;

use crate::detection::domain::detection::DetectionResult;
use crate::detection::domain::errors::DetectionError;
use crate::detection::domain::face_detector::FaceDetector;
use crate::detection::domain::preprocess_config::PreprocessConfig;
use crate::detection::domain::ssd_decoder::{
    check_output_shape, decode_detections, BoxClamping, SSD_FIELDS,
};
use crate::shared::frame::Frame;

use super::blob::blob_from_frame;
use super::execution_provider::detector_execution_providers;
use super::model_files::{ExternalWeights, ModelFiles, ModelLoadError};

/// SSD face detector backed by an ONNX Runtime session.
pub struct OnnxSsdDetector {
    session: ort::session::Session,
    config: PreprocessConfig,
    clamping: BoxClamping,
}

impl OnnxSsdDetector {
    /// Load the network described by `model`.
    ///
    /// External weights are read up front and handed to the runtime under
    /// the name the graph refers to them by. Fails with [`ModelLoadError`]
    /// when a file is missing or unreadable, when the weights are empty or
    /// unreferenced, or when the runtime cannot parse either file.
    pub fn new(
        model: &ModelFiles,
        config: PreprocessConfig,
        clamping: BoxClamping,
    ) -> Result<Self, ModelLoadError> {
        model.validate()?;
        let weights = model.read_weights()?;
        let session = build_session(&model.topology, weights).map_err(|e| ModelLoadError::Runtime {
            path: model.topology.clone(),
            reason: e.to_string(),
        })?;
        log::info!("Loaded face detector from {}", model.topology.display());

        Ok(Self {
            session,
            config,
            clamping,
        })
    }

    pub fn config(&self) -> &PreprocessConfig {
        &self.config
    }

    pub fn clamping(&self) -> BoxClamping {
        self.clamping
    }
}

fn build_session(
    topology: &Path,
    weights: Option<ExternalWeights>,
) -> Result<ort::session::Session, Box<dyn std::error::Error>> {
    let mut builder = ort::session::Session::builder()?
        .with_execution_providers(detector_execution_providers())?;
    if let Some(weights) = weights {
        builder = builder
            .with_external_initializer_file_in_memory(&weights.file_name, Cow::Owned(weights.bytes))?;
    }
    let session = builder.commit_from_file(topology)?;
    Ok(session)
}

impl FaceDetector for OnnxSsdDetector {
    fn detect(&mut self, frame: &Frame, threshold: f32) -> Result<DetectionResult, DetectionError> {
        // 1. Preprocess: resize + mean subtraction -> NCHW float32
        let blob = blob_from_frame(frame, &self.config)?;

        // 2. Inference
        let input_value = ort::value::Tensor::from_array(blob).map_err(DetectionError::inference)?;
        let outputs = self
            .session
            .run(ort::inputs![input_value])
            .map_err(DetectionError::inference)?;
        if outputs.len() == 0 {
            return Err(DetectionError::UnexpectedOutput(
                "SSD model produced no outputs".into(),
            ));
        }
        let tensor = outputs[0]
            .try_extract_array::<f32>()
            .map_err(DetectionError::inference)?;

        check_output_shape(tensor.shape())?;
        let data = tensor.as_slice().ok_or_else(|| {
            DetectionError::UnexpectedOutput("detection tensor is not contiguous".into())
        })?;

        // 3. Threshold + denormalize
        let result = decode_detections(data, frame.width(), frame.height(), threshold, self.clamping)?;
        log::debug!(
            "{} of {} candidates above {threshold}",
            result.len(),
            data.len() / SSD_FIELDS
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::face_box::FaceBox;
    use tempfile::TempDir;

    /// Loads the real model when it has been placed at the default path.
    fn load_default_model() -> Option<OnnxSsdDetector> {
        let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../..");
        let files = ModelFiles::in_dir(&root);
        if !files.topology.exists() {
            return None;
        }
        Some(
            OnnxSsdDetector::new(&files, PreprocessConfig::default(), BoxClamping::default())
                .unwrap(),
        )
    }

    fn gradient_frame(width: u32, height: u32) -> Frame {
        let mut frame = Frame::filled(width, height, [0, 0, 0]);
        {
            let mut arr = frame.as_ndarray_mut();
            for ((y, x, c), v) in arr.indexed_iter_mut() {
                *v = ((x * 3 + y * 5 + c * 40) % 256) as u8;
            }
        }
        frame
    }

    #[test]
    fn test_new_missing_topology_is_load_error() {
        let tmp = TempDir::new().unwrap();
        let files = ModelFiles::new(tmp.path().join("missing.onnx"));
        let result = OnnxSsdDetector::new(&files, PreprocessConfig::default(), BoxClamping::default());
        assert!(matches!(result, Err(ModelLoadError::Missing { .. })));
    }

    #[test]
    fn test_new_missing_weights_is_load_error() {
        let tmp = TempDir::new().unwrap();
        let topology = tmp.path().join("net.onnx");
        std::fs::write(&topology, b"not really onnx").unwrap();
        let files = ModelFiles::new(topology).with_weights(tmp.path().join("net.onnx.data"));
        let result = OnnxSsdDetector::new(&files, PreprocessConfig::default(), BoxClamping::default());
        assert!(matches!(result, Err(ModelLoadError::Missing { .. })));
    }

    #[test]
    fn test_new_unreferenced_weights_is_load_error() {
        let tmp = TempDir::new().unwrap();
        let topology = tmp.path().join("net.onnx");
        std::fs::write(&topology, b"self-contained graph").unwrap();
        let weights = tmp.path().join("unrelated.bin");
        std::fs::write(&weights, b"random weight bytes").unwrap();
        let files = ModelFiles::new(topology).with_weights(weights);
        let result = OnnxSsdDetector::new(&files, PreprocessConfig::default(), BoxClamping::default());
        assert!(matches!(result, Err(ModelLoadError::Runtime { .. })));
    }

    #[test]
    fn test_new_garbage_weights_is_runtime_error() {
        let tmp = TempDir::new().unwrap();
        let topology = tmp.path().join("net.onnx");
        std::fs::write(&topology, b"not a graph, but names net.onnx.data").unwrap();
        let weights = tmp.path().join("net.onnx.data");
        std::fs::write(&weights, b"garbage").unwrap();
        let files = ModelFiles::new(topology).with_weights(weights);
        let result = OnnxSsdDetector::new(&files, PreprocessConfig::default(), BoxClamping::default());
        assert!(matches!(result, Err(ModelLoadError::Runtime { .. })));
    }

    /// The bundled graph is self-contained, so any weights file alongside it
    /// is one it never references.
    #[test]
    fn test_model_rejects_weights_it_does_not_use() {
        let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../..");
        let files = ModelFiles::in_dir(&root);
        if !files.topology.exists() {
            return;
        }
        let Some(graph_dir) = files.topology.parent() else {
            return;
        };
        let weights = tempfile::Builder::new()
            .suffix(".facebox-test.bin")
            .tempfile_in(graph_dir)
            .unwrap();
        std::fs::write(weights.path(), b"garbage").unwrap();
        let result = OnnxSsdDetector::new(
            &files.clone().with_weights(weights.path()),
            PreprocessConfig::default(),
            BoxClamping::default(),
        );
        assert!(matches!(result, Err(ModelLoadError::Runtime { .. })));
    }

    #[test]
    fn test_new_garbage_graph_is_runtime_error() {
        let tmp = TempDir::new().unwrap();
        let topology = tmp.path().join("net.onnx");
        std::fs::write(&topology, b"definitely not a protobuf graph").unwrap();
        let result = OnnxSsdDetector::new(
            &ModelFiles::new(topology),
            PreprocessConfig::default(),
            BoxClamping::default(),
        );
        assert!(matches!(result, Err(ModelLoadError::Runtime { .. })));
    }

    #[test]
    fn test_model_blank_image_has_no_faces() {
        let Some(mut detector) = load_default_model() else {
            return;
        };
        let frame = Frame::filled(320, 240, [128, 128, 128]);
        let (confidences, boxes) = detector.detect(&frame, 0.9).unwrap().into_parts();
        assert!(confidences.is_empty());
        assert!(boxes.is_empty());
    }

    #[test]
    fn test_model_thresholds_are_monotone() {
        let Some(mut detector) = load_default_model() else {
            return;
        };
        let frame = gradient_frame(400, 300);
        let loose = detector.detect(&frame, 0.05).unwrap();
        let strict = detector.detect(&frame, 0.5).unwrap();
        assert_eq!(loose.confidences().len(), loose.boxes().len());
        assert!(loose.len() >= strict.len());
        for d in strict.iter() {
            assert!(loose.detections().contains(d));
        }
    }

    #[test]
    fn test_model_detect_is_repeatable() {
        let Some(mut detector) = load_default_model() else {
            return;
        };
        let frame = gradient_frame(123, 77);
        let first = detector.detect(&frame, 0.1).unwrap();
        let second = detector.detect(&frame, 0.1).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_model_malformed_image_is_rejected() {
        let Some(mut detector) = load_default_model() else {
            return;
        };
        let frame = Frame::new(Vec::new(), 0, 0, 3);
        assert!(matches!(
            detector.detect(&frame, 0.5),
            Err(DetectionError::MalformedImage(_))
        ));
    }

    /// Single-face fixture: `FACEBOX_FACE_FIXTURE` names the image and
    /// `FACEBOX_FACE_BOX` its ground-truth box as `x_min,y_min,x_max,y_max`.
    #[test]
    fn test_model_single_face_fixture() {
        let (Ok(image_path), Ok(truth)) = (
            std::env::var("FACEBOX_FACE_FIXTURE"),
            std::env::var("FACEBOX_FACE_BOX"),
        ) else {
            return;
        };
        let Some(mut detector) = load_default_model() else {
            return;
        };
        let coords: Vec<i32> = truth.split(',').map(|v| v.trim().parse().unwrap()).collect();
        let truth = FaceBox::new(coords[0], coords[1], coords[2], coords[3]);

        let frame = Frame::from(image::open(image_path).unwrap().to_rgb8());
        let result = detector.detect(&frame, 0.9).unwrap();

        assert_eq!(result.len(), 1);
        let detection = result.detections()[0];
        assert!(detection.confidence > 0.9);
        assert!(detection.face_box.iou(&truth) > 0.5);
    }
}
