//! Landmark-track backend.
//!
//! A track is a JSON Lines file written by an offline landmark extractor:
//!
//! ```text
//! {"format":"posture-track","version":1,"width":1280,"height":720,"fps":30.0}
//! {"landmarks":[{"x":0.51,"y":0.22,"visibility":0.99}, ... 33 entries]}
//! {"landmarks":null}
//! ```
//!
//! Each line after the header is one decoded frame; `null` landmarks mean
//! the extractor found nobody. Blank lines are ignored. The annotated copy
//! uses the same header followed by one [`FrameAnnotation`] per line.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{
    EstimatorError, EstimatorResult, Frame, FrameAnnotation, FrameSink, FrameSource,
    PoseEstimator, VideoBackend, VideoError, VideoInfo, VideoResult,
};
use crate::analysis::landmarks::LandmarkSet;
use crate::constants::{TRACK_FORMAT, TRACK_VERSION};

/// A header line longer than this is not a track header.
const MAX_HEADER_BYTES: u64 = 64 * 1024;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackHeader {
    pub format: String,
    pub version: u32,
    pub width: u32,
    pub height: u32,
    pub fps: f64,
}

impl TrackHeader {
    pub fn new(info: VideoInfo) -> Self {
        Self {
            format: TRACK_FORMAT.to_string(),
            version: TRACK_VERSION,
            width: info.width,
            height: info.height,
            fps: info.fps,
        }
    }

    fn info(&self) -> VideoInfo {
        VideoInfo {
            width: self.width,
            height: self.height,
            fps: self.fps,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackFrame {
    #[serde(default)]
    pub landmarks: Option<LandmarkSet>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TrackBackend;

impl VideoBackend for TrackBackend {
    fn name(&self) -> &'static str {
        "landmark-track"
    }

    fn open_source(&self, path: &Path) -> VideoResult<Box<dyn FrameSource>> {
        Ok(Box::new(TrackSource::open(path)?))
    }

    fn create_estimator(&self) -> EstimatorResult<Box<dyn PoseEstimator>> {
        Ok(Box::new(TrackEstimator::new()))
    }

    fn create_sink(&self, path: &Path, info: VideoInfo) -> VideoResult<Box<dyn FrameSink>> {
        Ok(Box::new(TrackSink::create(path, info)?))
    }
}

pub struct TrackSource {
    reader: Option<BufReader<File>>,
    info: VideoInfo,
    line_no: usize,
}

impl TrackSource {
    /// Opens `path` for reading. Only a missing or unreadable file is an
    /// error; anything that is not a landmark track opens as a source with
    /// no frames.
    pub fn open(path: &Path) -> VideoResult<Self> {
        let file = File::open(path).map_err(|e| VideoError::Open {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let mut reader = BufReader::new(file);

        match read_header(&mut reader) {
            Ok((header, line_no)) => {
                tracing::debug!(
                    path = %path.display(),
                    width = header.width,
                    height = header.height,
                    fps = header.fps,
                    "Track opened"
                );
                Ok(Self {
                    reader: Some(reader),
                    info: header.info(),
                    line_no,
                })
            }
            Err(VideoError::Format(reason)) => {
                tracing::warn!(
                    path = %path.display(),
                    reason = %reason,
                    "Not a landmark track, no frames to read"
                );
                Ok(Self {
                    reader: None,
                    info: VideoInfo::default(),
                    line_no: 0,
                })
            }
            Err(VideoError::Io(e)) => Err(VideoError::Open {
                path: path.display().to_string(),
                reason: e.to_string(),
            }),
            Err(e) => Err(e),
        }
    }
}

/// 读取首个非空行作为 header，返回 header 及其行号
fn read_header(reader: &mut BufReader<File>) -> VideoResult<(TrackHeader, usize)> {
    let mut line_no = 0;
    let header_line = loop {
        let mut buf = Vec::new();
        let read = (&mut *reader)
            .take(MAX_HEADER_BYTES)
            .read_until(b'\n', &mut buf)?;
        if read == 0 {
            return Err(VideoError::Format("empty file".to_string()));
        }
        line_no += 1;
        let line = String::from_utf8(buf)
            .map_err(|_| VideoError::Format("not a landmark track".to_string()))?;
        if !line.trim().is_empty() {
            break line;
        }
    };

    let header: TrackHeader = serde_json::from_str(header_line.trim())
        .map_err(|e| VideoError::Format(format!("invalid track header: {e}")))?;
    if header.format != TRACK_FORMAT {
        return Err(VideoError::Format(format!(
            "expected format '{TRACK_FORMAT}', found '{}'",
            header.format
        )));
    }
    if header.version != TRACK_VERSION {
        return Err(VideoError::Format(format!(
            "unsupported track version {}",
            header.version
        )));
    }
    Ok((header, line_no))
}

impl FrameSource for TrackSource {
    fn read_frame(&mut self) -> VideoResult<Option<Frame>> {
        let Some(reader) = self.reader.as_mut() else {
            return Ok(None);
        };

        loop {
            let mut buf = Vec::new();
            let read = reader
                .read_until(b'\n', &mut buf)
                .map_err(|e| VideoError::Read(e.to_string()))?;
            if read == 0 {
                return Ok(None);
            }
            self.line_no += 1;

            let line = match std::str::from_utf8(&buf) {
                Ok(s) => s.trim(),
                Err(_) => {
                    return Err(VideoError::Read(format!(
                        "line {}: not valid UTF-8",
                        self.line_no
                    )))
                }
            };
            if line.is_empty() {
                continue;
            }
            // Decoding stops at the first line that is not a JSON object.
            match serde_json::from_str::<serde_json::Value>(line) {
                Ok(value) if value.is_object() => {}
                _ => {
                    return Err(VideoError::Read(format!(
                        "line {}: corrupt frame record",
                        self.line_no
                    )))
                }
            }

            return Ok(Some(Frame {
                width: self.info.width,
                height: self.info.height,
                data: line.as_bytes().to_vec(),
            }));
        }
    }

    fn info(&self) -> VideoInfo {
        self.info
    }

    fn release(&mut self) {
        if self.reader.take().is_some() {
            tracing::debug!(lines = self.line_no, "Track released");
        }
    }
}

/// Reads the landmarks an offline extractor stored in each frame record.
#[derive(Debug, Default)]
pub struct TrackEstimator {
    frames: u64,
    closed: bool,
}

impl TrackEstimator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PoseEstimator for TrackEstimator {
    fn estimate(&mut self, frame: &Frame) -> EstimatorResult<Option<LandmarkSet>> {
        if self.closed {
            return Err(EstimatorError::Inference("estimator already closed".to_string()));
        }
        self.frames += 1;
        let record: TrackFrame = serde_json::from_slice(&frame.data)
            .map_err(|e| EstimatorError::InvalidOutput(e.to_string()))?;
        Ok(record.landmarks)
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            tracing::debug!(frames = self.frames, "Estimator closed");
        }
    }
}

pub struct TrackSink {
    writer: Option<BufWriter<File>>,
}

impl TrackSink {
    pub fn create(path: &Path, info: VideoInfo) -> VideoResult<Self> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(&mut writer, &TrackHeader::new(info))?;
        writer.write_all(b"\n")?;
        Ok(Self {
            writer: Some(writer),
        })
    }
}

impl FrameSink for TrackSink {
    fn write_frame(&mut self, _frame: &Frame, annotation: &FrameAnnotation) -> VideoResult<()> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| VideoError::Write("sink already finished".to_string()))?;
        serde_json::to_writer(&mut *writer, annotation)?;
        writer.write_all(b"\n")?;
        Ok(())
    }

    fn finish(&mut self) -> VideoResult<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
        }
        Ok(())
    }
}
