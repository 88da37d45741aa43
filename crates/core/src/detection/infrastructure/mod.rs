pub mod blob;
pub mod execution_provider;
pub mod model_files;
pub mod onnx_ssd_detector;
