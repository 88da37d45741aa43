use thiserror::Error;

#[derive(Error, Debug)]
pub enum DetectionError {
    #[error("malformed image: {0}")]
    MalformedImage(String),
    #[error("inference failed: {0}")]
    Inference(String),
    #[error("unexpected detector output: {0}")]
    UnexpectedOutput(String),
}

impl DetectionError {
    pub(crate) fn inference(err: impl std::fmt::Display) -> Self {
        Self::Inference(err.to_string())
    }
}
