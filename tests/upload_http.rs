mod common;

use axum::http::StatusCode;

use common::app::{spawn_test_app, spawn_test_app_with, spawn_test_app_with_limit};
use common::fixtures::{pose, sitting_track, squat_track, track_bytes};
use common::http::{assert_json_error, response_json, upload, upload_video};
use posture_analyzer::config::{AnalysisConfig, MissingLandmarks, PostureStrategy};

#[tokio::test]
async fn it_upload_squat_track_returns_frame_results() {
    let app = spawn_test_app().await;

    let resp = upload_video(&app.app, "squat.mp4", &squat_track()).await;
    let (status, _, body) = response_json(resp).await;
    assert_eq!(status, StatusCode::OK, "body: {body}");

    let clip = &body["frame_results"];
    assert_eq!(clip["posture_type"], "squat");
    assert_eq!(clip["total_frames"], 4);
    assert_eq!(clip["detected_frames"], 3);

    let frames = clip["frame_results"].as_array().expect("frame list");
    assert_eq!(frames.len(), 3);
    let indices: Vec<u64> = frames.iter().map(|f| f["frame"].as_u64().unwrap()).collect();
    assert_eq!(indices, vec![1, 3, 4]);
    assert!(indices.windows(2).all(|w| w[0] < w[1]));

    for frame in frames {
        assert_eq!(frame["posture_type"], "squat");
        assert_eq!(frame["bad_posture"], false);
        assert!(frame["flags"].as_array().unwrap().is_empty());
        assert!(frame["knee_angle"].as_f64().unwrap() < 140.0);
    }

    assert!(app.leftover_uploads().is_empty());
}

#[tokio::test]
async fn it_upload_without_trailing_slash_is_accepted() {
    let app = spawn_test_app().await;

    let resp = upload(&app.app, "/upload-video", "file", "desk.mp4", &sitting_track()).await;
    let (status, _, body) = response_json(resp).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["frame_results"]["posture_type"], "desk_sitting");
    assert_eq!(body["frame_results"]["frame_results"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn it_bad_squat_frames_carry_flags() {
    let app = spawn_test_app().await;

    // 背部过直 + 膝角 > 160° 的一帧，整体平均仍判为深蹲
    let track = track_bytes(&[
        Some(pose(90.0, 130.0)),
        Some(pose(95.0, 130.0)),
        Some(pose(165.0, 175.0)),
    ]);
    let resp = upload_video(&app.app, "squat.mp4", &track).await;
    let (status, _, body) = response_json(resp).await;
    assert_eq!(status, StatusCode::OK);

    let frames = body["frame_results"]["frame_results"].as_array().unwrap();
    assert_eq!(frames[0]["bad_posture"], false);
    assert_eq!(frames[2]["bad_posture"], true);
    let flags: Vec<&str> = frames[2]["flags"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f.as_str().unwrap())
        .collect();
    assert!(flags.iter().any(|f| f.starts_with("Back angle abnormal")));
    assert!(flags.iter().any(|f| f.starts_with("Knee too straight")));
}

#[tokio::test]
async fn it_majority_vote_labels_frames_individually() {
    let app = spawn_test_app_with(AnalysisConfig {
        strategy: PostureStrategy::MajorityVote,
        ..AnalysisConfig::default()
    })
    .await;

    let track = track_bytes(&[
        Some(pose(95.0, 130.0)),
        Some(pose(170.0, 170.0)),
        Some(pose(172.0, 170.0)),
    ]);
    let resp = upload_video(&app.app, "mixed.mp4", &track).await;
    let (status, _, body) = response_json(resp).await;
    assert_eq!(status, StatusCode::OK);

    let clip = &body["frame_results"];
    assert_eq!(clip["posture_type"], "desk_sitting");
    let labels: Vec<&str> = clip["frame_results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["posture_type"].as_str().unwrap())
        .collect();
    assert_eq!(labels, vec!["squat", "desk_sitting", "desk_sitting"]);
}

#[tokio::test]
async fn it_record_empty_keeps_undetected_frames() {
    let app = spawn_test_app_with(AnalysisConfig {
        missing_landmarks: MissingLandmarks::RecordEmpty,
        ..AnalysisConfig::default()
    })
    .await;

    let resp = upload_video(&app.app, "squat.mp4", &squat_track()).await;
    let (status, _, body) = response_json(resp).await;
    assert_eq!(status, StatusCode::OK);

    let frames = body["frame_results"]["frame_results"].as_array().unwrap();
    let indices: Vec<u64> = frames.iter().map(|f| f["frame"].as_u64().unwrap()).collect();
    assert_eq!(indices, vec![1, 2, 3, 4]);

    let empty = &frames[1];
    assert_eq!(empty["posture_type"], "squat");
    assert!(empty["knee_angle"].is_null());
    assert!(empty["neck_angle"].is_null());
    assert_eq!(empty["bad_posture"], false);
    assert!(app.leftover_uploads().is_empty());
}

#[tokio::test]
async fn it_non_track_upload_is_empty_desk_sitting_clip() {
    let app = spawn_test_app().await;

    let inputs: [&[u8]; 3] = [b"", b"\x00\x00\x00\x18ftypmp42", b"{\"format\":\"other\"}\n"];
    for content in inputs {
        let resp = upload_video(&app.app, "clip.mp4", content).await;
        let (status, _, body) = response_json(resp).await;
        assert_eq!(status, StatusCode::OK, "body: {body}");

        let clip = &body["frame_results"];
        assert_eq!(clip["posture_type"], "desk_sitting");
        assert_eq!(clip["total_frames"], 0);
        assert_eq!(clip["detected_frames"], 0);
        assert!(clip["frame_results"].as_array().unwrap().is_empty());
        assert!(app.leftover_uploads().is_empty());
    }
}

#[tokio::test]
async fn it_empty_track_yields_desk_sitting_without_frames() {
    let app = spawn_test_app().await;

    let resp = upload_video(&app.app, "empty.mp4", &track_bytes(&[None, None])).await;
    let (status, _, body) = response_json(resp).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["frame_results"]["posture_type"], "desk_sitting");
    assert_eq!(body["frame_results"]["total_frames"], 2);
    assert!(body["frame_results"]["frame_results"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn it_missing_file_field_is_400() {
    let app = spawn_test_app().await;

    let resp = upload(&app.app, "/upload-video/", "video", "squat.mp4", &squat_track()).await;
    let (status, _, body) = response_json(resp).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_json_error(&body, "MISSING_FILE");
    assert!(app.leftover_uploads().is_empty());
}

#[tokio::test]
async fn it_oversized_upload_is_413() {
    let app = spawn_test_app_with_limit(1024).await;

    let mut frames = Vec::new();
    for _ in 0..20 {
        frames.push(Some(pose(95.0, 130.0)));
    }
    let resp = upload_video(&app.app, "big.mp4", &track_bytes(&frames)).await;
    let (status, _, body) = response_json(resp).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["success"], false);
    assert!(app.leftover_uploads().is_empty());
}
