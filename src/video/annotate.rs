use serde::Serialize;

use crate::analysis::landmarks::{LandmarkSet, SKELETON};
use crate::analysis::types::{FrameResult, PostureType};

/// Landmarks at or below this visibility are not drawn.
const DRAW_VISIBILITY: f64 = 0.5;

/// What gets drawn on top of one frame of the annotated copy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameAnnotation {
    pub frame: u64,
    pub posture_type: PostureType,
    pub bad_posture: bool,
    pub flags: Vec<String>,
    /// Bone segments as `[x1, y1, x2, y2]` in normalized coordinates.
    pub skeleton: Vec<[f64; 4]>,
    /// Text lines, top to bottom.
    pub overlay: Vec<String>,
}

impl FrameAnnotation {
    pub fn new(result: &FrameResult, landmarks: Option<&LandmarkSet>) -> Self {
        Self {
            frame: result.frame,
            posture_type: result.posture_type,
            bad_posture: result.bad_posture,
            flags: result.flags.clone(),
            skeleton: landmarks.map(skeleton_segments).unwrap_or_default(),
            overlay: overlay_lines(result),
        }
    }
}

pub fn skeleton_segments(landmarks: &LandmarkSet) -> Vec<[f64; 4]> {
    SKELETON
        .iter()
        .filter(|(from, to)| landmarks.all_visible(&[*from, *to], DRAW_VISIBILITY))
        .map(|(from, to)| {
            let a = landmarks.get(*from);
            let b = landmarks.get(*to);
            [a.x, a.y, b.x, b.y]
        })
        .collect()
}

fn format_angle(label: &str, angle: Option<f64>) -> String {
    match angle {
        Some(v) => format!("{label}: {v:.1}°"),
        None => format!("{label}: n/a"),
    }
}

pub fn overlay_lines(result: &FrameResult) -> Vec<String> {
    let mut lines = vec![
        format!("Posture: {}", result.posture_type),
        format_angle("Neck", result.neck_angle),
        format_angle("Back", result.back_angle),
        format_angle("Knee", result.knee_angle),
    ];
    lines.extend(result.flags.iter().cloned());
    lines
}
