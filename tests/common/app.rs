use std::path::Path;
use std::sync::Arc;

use axum::Router;
use tempfile::TempDir;

use posture_analyzer::config::{AnalysisConfig, Config, UploadConfig};
use posture_analyzer::routes::build_router;
use posture_analyzer::state::AppState;
use posture_analyzer::video::TrackBackend;

pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    pub config: Config,
    upload_dir: TempDir,
}

impl TestApp {
    pub fn upload_dir(&self) -> &Path {
        self.upload_dir.path()
    }

    /// 上传目录里残留的 `temp_*` 文件
    pub fn leftover_uploads(&self) -> Vec<String> {
        std::fs::read_dir(self.upload_dir())
            .expect("read upload dir")
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().to_string())
            .filter(|name| name.starts_with("temp_"))
            .collect()
    }
}

fn spawn_with(analysis: AnalysisConfig, max_bytes: usize) -> TestApp {
    let upload_dir = tempfile::tempdir().expect("tempdir");

    // 直接构造 Config，避免 set_var 造成多线程测试环境变量竞态
    let config = Config {
        host: std::net::IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
        port: 8000,
        log_level: "info".to_string(),
        enable_file_logs: false,
        log_dir: "./logs".to_string(),
        cors_origin: "*".to_string(),
        upload: UploadConfig {
            dir: upload_dir.path().to_path_buf(),
            max_bytes,
        },
        analysis,
    };

    let state = AppState::new(&config, Arc::new(TrackBackend));
    let app = build_router(state.clone());

    TestApp {
        app,
        state,
        config,
        upload_dir,
    }
}

pub async fn spawn_test_app() -> TestApp {
    spawn_with(AnalysisConfig::default(), 16 * 1024 * 1024)
}

pub async fn spawn_test_app_with(analysis: AnalysisConfig) -> TestApp {
    spawn_with(analysis, 16 * 1024 * 1024)
}

pub async fn spawn_test_app_with_limit(max_bytes: usize) -> TestApp {
    spawn_with(AnalysisConfig::default(), max_bytes)
}
