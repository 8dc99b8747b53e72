pub mod angles;
pub mod clip;
pub mod landmarks;
pub mod pipeline;
pub mod rules;
pub mod types;

use thiserror::Error;

use crate::video::{EstimatorError, VideoError};

pub use angles::calculate_angle;
pub use pipeline::{analyze_file, process_video};
pub use types::{ClipResult, FrameResult, JointAngles, PostureType};

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("video source error: {0}")]
    Source(VideoError),
    #[error("pose estimator error: {0}")]
    Estimator(#[from] EstimatorError),
    #[error("annotated output error: {0}")]
    Sink(VideoError),
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
