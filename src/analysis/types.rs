use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostureType {
    Squat,
    DeskSitting,
}

impl PostureType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostureType::Squat => "squat",
            PostureType::DeskSitting => "desk_sitting",
        }
    }
}

impl fmt::Display for PostureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostureType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "squat" => Ok(PostureType::Squat),
            "desk_sitting" => Ok(PostureType::DeskSitting),
            other => Err(format!("unknown posture type: {other}")),
        }
    }
}

/// Neck, back and knee angles of one frame. `None` means the landmarks
/// behind the angle were not reliable enough to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct JointAngles {
    pub neck: Option<f64>,
    pub back: Option<f64>,
    pub knee: Option<f64>,
}

/// Per-frame outcome, serialized as one entry of `frame_results`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameResult {
    pub frame: u64,
    pub posture_type: PostureType,
    pub neck_angle: Option<f64>,
    pub back_angle: Option<f64>,
    pub knee_angle: Option<f64>,
    pub flags: Vec<String>,
    pub bad_posture: bool,
}

impl FrameResult {
    pub fn angles(&self) -> JointAngles {
        JointAngles {
            neck: self.neck_angle,
            back: self.back_angle,
            knee: self.knee_angle,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipResult {
    pub posture_type: PostureType,
    pub total_frames: u64,
    pub detected_frames: u64,
    pub frame_results: Vec<FrameResult>,
}

impl ClipResult {
    pub fn bad_frame_count(&self) -> usize {
        self.frame_results.iter().filter(|f| f.bad_posture).count()
    }
}
