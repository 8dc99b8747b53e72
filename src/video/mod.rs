//! Video and pose-estimation ports.
//!
//! The analysis never decodes pixels or runs a model itself. It talks to a
//! [`FrameSource`] ("read next frame"), a [`PoseEstimator`] ("estimate
//! landmarks") and optionally a [`FrameSink`] ("write annotated frame"),
//! all produced by a [`VideoBackend`].

pub mod annotate;
pub mod track;

use std::path::Path;

use thiserror::Error;

use crate::analysis::landmarks::LandmarkSet;

pub use annotate::FrameAnnotation;
pub use track::TrackBackend;

#[derive(Debug, Error)]
pub enum VideoError {
    #[error("cannot open video {path}: {reason}")]
    Open { path: String, reason: String },
    #[error("frame read failed: {0}")]
    Read(String),
    #[error("unsupported video format: {0}")]
    Format(String),
    #[error("frame write failed: {0}")]
    Write(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum EstimatorError {
    #[error("inference failed: {0}")]
    Inference(String),
    #[error("estimator returned invalid output: {0}")]
    InvalidOutput(String),
}

pub type VideoResult<T> = Result<T, VideoError>;
pub type EstimatorResult<T> = Result<T, EstimatorError>;

/// Stream metadata, known once a source is open.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VideoInfo {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
}

/// One decoded frame. `data` is backend specific and only meaningful to an
/// estimator from the same backend.
#[derive(Debug, Clone)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

pub trait FrameSource: Send {
    /// `Ok(None)` at end of stream.
    fn read_frame(&mut self) -> VideoResult<Option<Frame>>;

    fn info(&self) -> VideoInfo;

    /// Releases the underlying handle. Further reads return `Ok(None)`.
    fn release(&mut self) {}
}

pub trait PoseEstimator: Send {
    /// `Ok(None)` when nobody was detected in the frame.
    fn estimate(&mut self, frame: &Frame) -> EstimatorResult<Option<LandmarkSet>>;

    /// Releases the model. Called once at the end of a processing session.
    fn close(&mut self) {}
}

pub trait FrameSink: Send {
    fn write_frame(&mut self, frame: &Frame, annotation: &FrameAnnotation) -> VideoResult<()>;

    /// Flushes and closes the output.
    fn finish(&mut self) -> VideoResult<()>;
}

/// Factory for sources, estimators and sinks.
///
/// A new estimator is created for every processing session and closed at
/// its end, so a backend holds no per-clip state.
pub trait VideoBackend: Send + Sync {
    fn name(&self) -> &'static str;

    fn open_source(&self, path: &Path) -> VideoResult<Box<dyn FrameSource>>;

    fn create_estimator(&self) -> EstimatorResult<Box<dyn PoseEstimator>>;

    fn create_sink(&self, path: &Path, info: VideoInfo) -> VideoResult<Box<dyn FrameSink>>;
}
