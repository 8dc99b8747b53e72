//! Posture analysis for exercise videos.
//!
//! Joint angles are derived from pose landmarks frame by frame, checked
//! against fixed squat / desk-sitting thresholds, and the clip gets an
//! overall posture label. Landmark estimation and video I/O sit behind the
//! traits in [`video`].

pub mod analysis;
pub mod config;
pub mod constants;
pub mod logging;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod state;
pub mod upload;
pub mod video;
