// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! 错误类型 (Error types)

use thiserror::Error;

pub type Result<T, E = SolutionError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum SolutionError {
    #[error("region needs at least 3 non-collinear points, got {0} usable")]
    InvalidRegion(usize),
    #[error("frame has zero area ({width}x{height})")]
    EmptyFrame { width: u32, height: u32 },
    #[error("frame size {actual:?} does not match the stream size {expected:?}")]
    FrameSizeMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },
    #[error("class index {class_id} is not in the class-name mapping ({num_classes} names)")]
    UnknownClass { class_id: usize, num_classes: usize },
    #[error("track extraction failed: {0}")]
    Extractor(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Image(#[from] image::ImageError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl SolutionError {
    pub(crate) fn extractor(err: anyhow::Error) -> Self {
        SolutionError::Extractor(err.into())
    }
}
