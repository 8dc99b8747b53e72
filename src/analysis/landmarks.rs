//! Body landmark model.
//!
//! Landmarks follow the 33-point MediaPipe Pose topology. Coordinates are
//! normalized to the image (`x`,`y` in `[0,1]`) and carry a visibility
//! confidence in `[0,1]`.

use serde::{Deserialize, Serialize};

/// Number of landmarks in one pose estimate.
pub const LANDMARK_COUNT: usize = 33;

/// MediaPipe Pose landmark indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BodyLandmark {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl BodyLandmark {
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Bones drawn on annotated frames.
pub const SKELETON: &[(BodyLandmark, BodyLandmark)] = &[
    (BodyLandmark::LeftEar, BodyLandmark::LeftShoulder),
    (BodyLandmark::RightEar, BodyLandmark::RightShoulder),
    (BodyLandmark::LeftShoulder, BodyLandmark::RightShoulder),
    (BodyLandmark::LeftShoulder, BodyLandmark::LeftElbow),
    (BodyLandmark::LeftElbow, BodyLandmark::LeftWrist),
    (BodyLandmark::RightShoulder, BodyLandmark::RightElbow),
    (BodyLandmark::RightElbow, BodyLandmark::RightWrist),
    (BodyLandmark::LeftShoulder, BodyLandmark::LeftHip),
    (BodyLandmark::RightShoulder, BodyLandmark::RightHip),
    (BodyLandmark::LeftHip, BodyLandmark::RightHip),
    (BodyLandmark::LeftHip, BodyLandmark::LeftKnee),
    (BodyLandmark::LeftKnee, BodyLandmark::LeftAnkle),
    (BodyLandmark::LeftAnkle, BodyLandmark::LeftHeel),
    (BodyLandmark::LeftHeel, BodyLandmark::LeftFootIndex),
    (BodyLandmark::LeftAnkle, BodyLandmark::LeftFootIndex),
    (BodyLandmark::RightHip, BodyLandmark::RightKnee),
    (BodyLandmark::RightKnee, BodyLandmark::RightAnkle),
    (BodyLandmark::RightAnkle, BodyLandmark::RightHeel),
    (BodyLandmark::RightHeel, BodyLandmark::RightFootIndex),
    (BodyLandmark::RightAnkle, BodyLandmark::RightFootIndex),
];

fn default_visibility() -> f64 {
    1.0
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    #[serde(default = "default_visibility")]
    pub visibility: f64,
}

impl Landmark {
    pub fn new(x: f64, y: f64, visibility: f64) -> Self {
        Self { x, y, visibility }
    }

    pub fn point(&self) -> [f64; 2] {
        [self.x, self.y]
    }
}

impl Default for Landmark {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}

/// One frame's worth of landmarks, indexed by [`BodyLandmark`].
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkSet {
    points: [Landmark; LANDMARK_COUNT],
}

impl LandmarkSet {
    /// Builds a set from a slice, which must hold exactly [`LANDMARK_COUNT`] points.
    pub fn from_slice(points: &[Landmark]) -> Option<Self> {
        let points: [Landmark; LANDMARK_COUNT] = points.try_into().ok()?;
        Some(Self { points })
    }

    pub fn get(&self, id: BodyLandmark) -> &Landmark {
        &self.points[id.index()]
    }

    pub fn set(&mut self, id: BodyLandmark, landmark: Landmark) {
        self.points[id.index()] = landmark;
    }

    pub fn point(&self, id: BodyLandmark) -> [f64; 2] {
        self.get(id).point()
    }

    /// True when every listed landmark is strictly above `threshold`.
    pub fn all_visible(&self, ids: &[BodyLandmark], threshold: f64) -> bool {
        ids.iter().all(|id| self.get(*id).visibility > threshold)
    }
}

impl Default for LandmarkSet {
    fn default() -> Self {
        Self {
            points: [Landmark::default(); LANDMARK_COUNT],
        }
    }
}

impl Serialize for LandmarkSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.points.as_slice().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for LandmarkSet {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let points = Vec::<Landmark>::deserialize(deserializer)?;
        let len = points.len();
        LandmarkSet::from_slice(&points).ok_or_else(|| {
            serde::de::Error::invalid_length(len, &"exactly 33 pose landmarks")
        })
    }
}
