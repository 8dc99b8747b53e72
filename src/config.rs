use std::env;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use std::str::FromStr;

use serde::Serialize;

use crate::constants::DEFAULT_MAX_UPLOAD_BYTES;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    pub enable_file_logs: bool,
    pub log_dir: String,
    pub cors_origin: String,
    pub upload: UploadConfig,
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub dir: PathBuf,
    pub max_bytes: usize,
}

/// 片段级姿态判定策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PostureStrategy {
    /// 全片平均膝角 < 140° 判为深蹲，结果回填到每一帧
    #[default]
    MeanKnee,
    /// 每帧按自身膝角投票，最终取票数最多者
    MajorityVote,
}

/// 某帧没有检测到人时的处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingLandmarks {
    #[default]
    Skip,
    RecordEmpty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct AnalysisConfig {
    pub strategy: PostureStrategy,
    pub missing_landmarks: MissingLandmarks,
    pub visibility_gating: bool,
}

impl FromStr for PostureStrategy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mean_knee" | "mean" => Ok(PostureStrategy::MeanKnee),
            "majority_vote" | "vote" => Ok(PostureStrategy::MajorityVote),
            _ => Err(()),
        }
    }
}

impl FromStr for MissingLandmarks {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip" => Ok(MissingLandmarks::Skip),
            "record_empty" | "empty" => Ok(MissingLandmarks::RecordEmpty),
            _ => Err(()),
        }
    }
}

impl fmt::Display for PostureStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PostureStrategy::MeanKnee => "mean_knee",
            PostureStrategy::MajorityVote => "majority_vote",
        })
    }
}

impl fmt::Display for MissingLandmarks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MissingLandmarks::Skip => "skip",
            MissingLandmarks::RecordEmpty => "record_empty",
        })
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            host: env_or_parse("HOST", IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))),
            port: env_or_parse("PORT", 8000_u16),
            log_level: env_or("RUST_LOG", "info"),
            enable_file_logs: env_or_bool("ENABLE_FILE_LOGS", false),
            log_dir: env_or("LOG_DIR", "./logs"),
            cors_origin: env_or("CORS_ORIGIN", "*"),
            upload: UploadConfig {
                dir: env::var("UPLOAD_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| env::temp_dir()),
                max_bytes: env_or_parse("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES),
            },
            analysis: AnalysisConfig::from_env(),
        }
    }
}

impl AnalysisConfig {
    pub fn from_env() -> Self {
        Self {
            strategy: env_or_enum("POSTURE_STRATEGY", PostureStrategy::default()),
            missing_landmarks: env_or_enum("MISSING_LANDMARKS", MissingLandmarks::default()),
            visibility_gating: env_or_bool("VISIBILITY_GATING", false),
        }
    }
}

pub fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

pub fn env_or_parse<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy,
{
    match env::var(key) {
        Ok(raw) => match raw.parse::<T>() {
            Ok(v) => v,
            Err(_) => {
                tracing::warn!(
                    key,
                    value = %raw,
                    "Failed to parse env var, using default"
                );
                default
            }
        },
        Err(_) => default,
    }
}

fn env_or_enum<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy + fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.parse::<T>().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, fallback = %default, "Unknown option, using default");
            default
        }),
        Err(_) => default,
    }
}

pub fn env_or_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        Err(_) => default,
    }
}
