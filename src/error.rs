use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop a whole invocation before any image is processed.
#[derive(Debug, Error)]
pub enum InvocationError {
    #[error("no images were supplied")]
    NoImages,

    #[error("invalid model name {0:?}: must be a bare file name")]
    InvalidModelName(String),

    #[error("model file not found: {}", .0.display())]
    ModelNotFound(PathBuf),

    #[error("no model selected and no default model configured")]
    NoModelSelected,

    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
}

/// Errors raised while obtaining detections for a single image.
///
/// These never abort a batch; the affected image is skipped.
#[derive(Debug, Error)]
pub enum DetectionError {
    #[error("failed to launch detector: {0}")]
    Launch(#[from] std::io::Error),

    #[error("detector exited with {status}: {stderr}")]
    Backend { status: String, stderr: String },

    #[error("unreadable detector output: {0}")]
    Output(#[from] serde_json::Error),

    #[error("no precomputed detections for {0}")]
    UnknownImage(String),

    #[error("malformed keypoint row {row}: {reason}")]
    MalformedKeypoints { row: usize, reason: String },

    #[error("detector task failed: {0}")]
    Task(String),
}
