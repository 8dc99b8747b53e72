//! Clip-level posture decision.

use serde::Serialize;

use crate::analysis::types::PostureType;
use crate::constants::{DEFAULT_MEAN_KNEE_ANGLE, SQUAT_KNEE_ANGLE_CUTOFF};

/// Mean of the known knee angles, or [`DEFAULT_MEAN_KNEE_ANGLE`] when there are none.
pub fn mean_knee_angle<I>(knees: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = knees
        .into_iter()
        .fold((0.0, 0_u64), |(sum, count), k| (sum + k, count + 1));
    if count == 0 {
        DEFAULT_MEAN_KNEE_ANGLE
    } else {
        sum / count as f64
    }
}

/// Single global label from the whole clip's knee angles.
pub fn posture_from_mean_knee<I>(knees: I) -> PostureType
where
    I: IntoIterator<Item = f64>,
{
    if mean_knee_angle(knees) < SQUAT_KNEE_ANGLE_CUTOFF {
        PostureType::Squat
    } else {
        PostureType::DeskSitting
    }
}

/// Running per-frame vote between the two postures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VoteTally {
    pub squat: u64,
    pub desk_sitting: u64,
}

impl VoteTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, posture: PostureType) {
        match posture {
            PostureType::Squat => self.squat += 1,
            PostureType::DeskSitting => self.desk_sitting += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.squat + self.desk_sitting
    }

    /// Majority label; a tie (or no votes) goes to `desk_sitting`.
    pub fn winner(&self) -> PostureType {
        if self.squat > self.desk_sitting {
            PostureType::Squat
        } else {
            PostureType::DeskSitting
        }
    }
}
