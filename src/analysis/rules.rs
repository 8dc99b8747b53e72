//! Per-frame posture rules.
//!
//! Angles are taken on the left side of the body: neck at the shoulder
//! (ear–shoulder–hip), back at the hip (shoulder–hip–knee) and knee at the
//! knee (hip–knee–ankle). The thresholds are fixed and live in
//! [`crate::constants`].

use crate::analysis::angles::calculate_angle;
use crate::analysis::landmarks::{BodyLandmark, LandmarkSet};
use crate::analysis::types::{JointAngles, PostureType};
use crate::constants::{
    FLAG_SITTING_BACK, FLAG_SITTING_NECK, FLAG_SQUAT_BACK, FLAG_SQUAT_KNEE_OVER_TOE,
    FLAG_SQUAT_KNEE_STRAIGHT, KNEE_OVER_TOE_MARGIN, SITTING_BACK_RANGE, SITTING_NECK_RANGE,
    SQUAT_BACK_MAX, SQUAT_BACK_MIN, SQUAT_KNEE_ANGLE_CUTOFF, SQUAT_KNEE_MAX,
    VISIBILITY_THRESHOLD,
};

use BodyLandmark::{LeftAnkle, LeftEar, LeftFootIndex, LeftHip, LeftKnee, LeftShoulder};

const NECK: [BodyLandmark; 3] = [LeftEar, LeftShoulder, LeftHip];
const BACK: [BodyLandmark; 3] = [LeftShoulder, LeftHip, LeftKnee];
const KNEE: [BodyLandmark; 3] = [LeftHip, LeftKnee, LeftAnkle];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Evaluation {
    pub flags: Vec<String>,
    pub bad_posture: bool,
}

fn angle_at(landmarks: &LandmarkSet, ids: [BodyLandmark; 3], gating: bool) -> Option<f64> {
    if gating && !landmarks.all_visible(&ids, VISIBILITY_THRESHOLD) {
        return None;
    }
    Some(calculate_angle(
        landmarks.point(ids[0]),
        landmarks.point(ids[1]),
        landmarks.point(ids[2]),
    ))
}

/// Computes the three joint angles. With `gating` on, an angle is dropped
/// unless all three of its landmarks are visible above the threshold.
pub fn joint_angles(landmarks: &LandmarkSet, gating: bool) -> JointAngles {
    JointAngles {
        neck: angle_at(landmarks, NECK, gating),
        back: angle_at(landmarks, BACK, gating),
        knee: angle_at(landmarks, KNEE, gating),
    }
}

/// Posture suggested by a single knee angle; unknown knees read as sitting.
pub fn posture_from_knee(knee: Option<f64>) -> PostureType {
    match knee {
        Some(angle) if angle < SQUAT_KNEE_ANGLE_CUTOFF => PostureType::Squat,
        _ => PostureType::DeskSitting,
    }
}

fn within(value: f64, (lo, hi): (f64, f64)) -> bool {
    (lo..=hi).contains(&value)
}

fn knee_over_toe(landmarks: &LandmarkSet) -> bool {
    if !landmarks.all_visible(&[LeftKnee, LeftFootIndex], VISIBILITY_THRESHOLD) {
        return false;
    }
    landmarks.get(LeftKnee).x > landmarks.get(LeftFootIndex).x + KNEE_OVER_TOE_MARGIN
}

/// Applies the threshold rules for `posture`.
///
/// `landmarks` is only consulted for the knee-over-toe check, which runs
/// when `gating` is on. Rules whose angle is missing are skipped.
pub fn evaluate_frame(
    angles: &JointAngles,
    landmarks: Option<&LandmarkSet>,
    posture: PostureType,
    gating: bool,
) -> Evaluation {
    let mut flags = Vec::new();

    match posture {
        PostureType::Squat => {
            if let Some(back) = angles.back {
                if back < SQUAT_BACK_MIN || back > SQUAT_BACK_MAX {
                    flags.push(FLAG_SQUAT_BACK.to_string());
                }
            }
            if let Some(knee) = angles.knee {
                if knee > SQUAT_KNEE_MAX {
                    flags.push(FLAG_SQUAT_KNEE_STRAIGHT.to_string());
                }
            }
            if gating && landmarks.is_some_and(knee_over_toe) {
                flags.push(FLAG_SQUAT_KNEE_OVER_TOE.to_string());
            }
        }
        PostureType::DeskSitting => {
            if let Some(neck) = angles.neck {
                if !within(neck, SITTING_NECK_RANGE) {
                    flags.push(FLAG_SITTING_NECK.to_string());
                }
            }
            if let Some(back) = angles.back {
                if !within(back, SITTING_BACK_RANGE) {
                    flags.push(FLAG_SITTING_BACK.to_string());
                }
            }
        }
    }

    Evaluation {
        bad_posture: !flags.is_empty(),
        flags,
    }
}
