//! Frame loop.
//!
//! Reads frames until the source is exhausted, estimates landmarks, computes
//! angles, then settles the clip label and finalizes every frame's flags.
//! Source, estimator and sink are released on every exit path.

use std::path::Path;

use crate::analysis::clip::{posture_from_mean_knee, VoteTally};
use crate::analysis::landmarks::LandmarkSet;
use crate::analysis::rules::{evaluate_frame, joint_angles, posture_from_knee};
use crate::analysis::types::{ClipResult, FrameResult, JointAngles, PostureType};
use crate::analysis::{AnalysisError, AnalysisResult};
use crate::config::{AnalysisConfig, MissingLandmarks, PostureStrategy};
use crate::video::{Frame, FrameAnnotation, FrameSink, FrameSource, PoseEstimator, VideoBackend};

struct PendingFrame {
    index: u64,
    angles: JointAngles,
    landmarks: Option<LandmarkSet>,
    /// Label given at capture time in vote mode.
    provisional: Option<PostureType>,
    /// Kept only when an annotated copy is being written.
    frame: Option<Frame>,
}

/// Runs the whole clip through `estimator` and returns one result per
/// recorded frame, in frame order.
pub fn process_video(
    source: &mut (dyn FrameSource + '_),
    estimator: &mut (dyn PoseEstimator + '_),
    mut sink: Option<&mut (dyn FrameSink + '_)>,
    config: &AnalysisConfig,
) -> AnalysisResult<ClipResult> {
    let outcome = run(source, estimator, &mut sink, config);

    source.release();
    estimator.close();
    let finished = match sink {
        Some(sink) => sink.finish().map_err(AnalysisError::Sink),
        None => Ok(()),
    };

    let clip = outcome?;
    finished?;
    Ok(clip)
}

fn run(
    source: &mut (dyn FrameSource + '_),
    estimator: &mut (dyn PoseEstimator + '_),
    sink: &mut Option<&mut (dyn FrameSink + '_)>,
    config: &AnalysisConfig,
) -> AnalysisResult<ClipResult> {
    let mut pending = Vec::new();
    let mut tally = VoteTally::new();
    let mut total_frames = 0_u64;
    let mut detected_frames = 0_u64;

    loop {
        let frame = match source.read_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    frame = total_frames + 1,
                    "Frame unreadable, ending stream"
                );
                break;
            }
        };
        total_frames += 1;

        let landmarks = estimator.estimate(&frame)?;
        let keep_frame = sink.is_some().then_some(frame);

        let Some(landmarks) = landmarks else {
            tracing::debug!(frame = total_frames, "No landmarks detected");
            if config.missing_landmarks == MissingLandmarks::RecordEmpty {
                pending.push(PendingFrame {
                    index: total_frames,
                    angles: JointAngles::default(),
                    landmarks: None,
                    provisional: None,
                    frame: keep_frame,
                });
            }
            continue;
        };
        detected_frames += 1;

        let angles = joint_angles(&landmarks, config.visibility_gating);
        let provisional = match config.strategy {
            PostureStrategy::MajorityVote => {
                let posture = posture_from_knee(angles.knee);
                tally.record(posture);
                Some(posture)
            }
            PostureStrategy::MeanKnee => None,
        };

        pending.push(PendingFrame {
            index: total_frames,
            angles,
            landmarks: Some(landmarks),
            provisional,
            frame: keep_frame,
        });
    }

    let posture_type = match config.strategy {
        PostureStrategy::MeanKnee => {
            posture_from_mean_knee(pending.iter().filter_map(|p| p.angles.knee))
        }
        PostureStrategy::MajorityVote => tally.winner(),
    };

    let mut frame_results = Vec::with_capacity(pending.len());
    for entry in pending {
        let posture = entry.provisional.unwrap_or(posture_type);
        let evaluation = evaluate_frame(
            &entry.angles,
            entry.landmarks.as_ref(),
            posture,
            config.visibility_gating,
        );

        let result = FrameResult {
            frame: entry.index,
            posture_type: posture,
            neck_angle: entry.angles.neck,
            back_angle: entry.angles.back,
            knee_angle: entry.angles.knee,
            flags: evaluation.flags,
            bad_posture: evaluation.bad_posture,
        };

        tracing::debug!(
            frame = result.frame,
            posture = %result.posture_type,
            neck = ?result.neck_angle,
            back = ?result.back_angle,
            knee = ?result.knee_angle,
            flags = ?result.flags,
            "Frame evaluated"
        );

        if let (Some(sink), Some(frame)) = (sink.as_mut(), entry.frame.as_ref()) {
            let annotation = FrameAnnotation::new(&result, entry.landmarks.as_ref());
            sink.write_frame(frame, &annotation).map_err(AnalysisError::Sink)?;
        }

        frame_results.push(result);
    }

    let clip = ClipResult {
        posture_type,
        total_frames,
        detected_frames,
        frame_results,
    };

    tracing::info!(
        posture = %clip.posture_type,
        strategy = %config.strategy,
        total_frames,
        detected_frames,
        recorded = clip.frame_results.len(),
        bad_frames = clip.bad_frame_count(),
        "Clip analyzed"
    );

    Ok(clip)
}

/// Opens `path` through `backend`, creates one estimator for this session and
/// optionally writes an annotated copy to `annotate_to`.
pub fn analyze_file(
    backend: &dyn VideoBackend,
    path: &Path,
    annotate_to: Option<&Path>,
    config: &AnalysisConfig,
) -> AnalysisResult<ClipResult> {
    tracing::info!(path = %path.display(), backend = backend.name(), "Processing video");

    let mut source = backend.open_source(path).map_err(AnalysisError::Source)?;

    let mut estimator = match backend.create_estimator() {
        Ok(estimator) => estimator,
        Err(e) => {
            source.release();
            return Err(e.into());
        }
    };

    let mut sink = match annotate_to {
        Some(out) => match backend.create_sink(out, source.info()) {
            Ok(sink) => Some(sink),
            Err(e) => {
                source.release();
                estimator.close();
                return Err(AnalysisError::Sink(e));
            }
        },
        None => None,
    };

    process_video(
        source.as_mut(),
        estimator.as_mut(),
        sink.as_deref_mut(),
        config,
    )
}
