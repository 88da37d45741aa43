use ort::execution_providers::ExecutionProviderDispatch;

/// Execution providers to register on the detector session, best first.
///
/// ONNX Runtime falls back to its CPU provider when none of these can be
/// initialized, so an empty list means "CPU only".
pub fn detector_execution_providers() -> Vec<ExecutionProviderDispatch> {
    #[cfg(target_os = "macos")]
    {
        vec![ort::execution_providers::CoreMLExecutionProvider::default().build()]
    }
    #[cfg(target_os = "windows")]
    {
        vec![ort::execution_providers::DirectMLExecutionProvider::default().build()]
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        Vec::new()
    }
}
