use posture_analyzer::analysis::landmarks::{BodyLandmark, Landmark, LandmarkSet};
use posture_analyzer::video::track::{TrackFrame, TrackHeader};
use posture_analyzer::video::VideoInfo;

/// 侧面站姿骨架：膝角 `knee_deg`，背角 `back_deg`，耳朵与躯干共线（颈角 180°）
pub fn pose(knee_deg: f64, back_deg: f64) -> LandmarkSet {
    let hip = [0.5, 0.5];
    let knee = [0.5, 0.7];
    let shin = (knee_deg - 90.0).to_radians();
    let torso = (90.0 - back_deg).to_radians();
    let ankle = [knee[0] + 0.2 * shin.cos(), knee[1] + 0.2 * shin.sin()];
    let shoulder = [hip[0] + 0.3 * torso.cos(), hip[1] + 0.3 * torso.sin()];
    let ear = [shoulder[0] + 0.1 * torso.cos(), shoulder[1] + 0.1 * torso.sin()];

    let mut set = LandmarkSet::default();
    set.set(BodyLandmark::LeftEar, Landmark::new(ear[0], ear[1], 0.99));
    set.set(BodyLandmark::LeftShoulder, Landmark::new(shoulder[0], shoulder[1], 0.99));
    set.set(BodyLandmark::LeftHip, Landmark::new(hip[0], hip[1], 0.99));
    set.set(BodyLandmark::LeftKnee, Landmark::new(knee[0], knee[1], 0.99));
    set.set(BodyLandmark::LeftAnkle, Landmark::new(ankle[0], ankle[1], 0.99));
    set.set(BodyLandmark::LeftFootIndex, Landmark::new(0.8, 0.95, 0.99));
    set
}

/// 以 JSON Lines 形式编码一条 landmark track，`None` 表示该帧未检测到人
pub fn track_bytes(frames: &[Option<LandmarkSet>]) -> Vec<u8> {
    let header = TrackHeader::new(VideoInfo {
        width: 640,
        height: 480,
        fps: 30.0,
    });
    let mut out = serde_json::to_string(&header).expect("header json");
    out.push('\n');
    for landmarks in frames {
        let frame = TrackFrame {
            landmarks: landmarks.clone(),
        };
        out.push_str(&serde_json::to_string(&frame).expect("frame json"));
        out.push('\n');
    }
    out.into_bytes()
}

/// 三帧深蹲（膝角 < 140°）夹一帧未检测
pub fn squat_track() -> Vec<u8> {
    track_bytes(&[
        Some(pose(95.0, 130.0)),
        None,
        Some(pose(100.0, 125.0)),
        Some(pose(110.0, 130.0)),
    ])
}

/// 坐姿：腿部角度大于 140°，上半身直立
pub fn sitting_track() -> Vec<u8> {
    track_bytes(&[Some(pose(170.0, 175.0)), Some(pose(165.0, 160.0))])
}
