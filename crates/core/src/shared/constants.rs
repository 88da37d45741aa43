pub const MODEL_DIR: &str = "models/face_detector";

/// ONNX export of the Caffe "res10_300x300_ssd_iter_140000" face detector.
pub const SSD_TOPOLOGY_NAME: &str = "res10_300x300_ssd_iter_140000.onnx";

/// Default confidence threshold for `detect`.
pub const DEFAULT_THRESHOLD: f32 = 0.5;

/// Threshold used by the command-line demo.
pub const DEMO_THRESHOLD: f32 = 0.9;

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];
