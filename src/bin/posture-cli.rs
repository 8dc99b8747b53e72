//! `posture-cli <video-path>`
//!
//! Analyzes one video with the environment configuration and prints the
//! clip result as JSON. Set `ANNOTATE_OUTPUT` to also write an annotated copy.

use std::path::PathBuf;
use std::process::ExitCode;

use posture_analyzer::analysis::analyze_file;
use posture_analyzer::config::Config;
use posture_analyzer::logging::{init_tracing, LogConfig, LogTarget};
use posture_analyzer::video::TrackBackend;

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let mut args = std::env::args_os().skip(1);
    let Some(video) = args.next().map(PathBuf::from) else {
        eprintln!("usage: posture-cli <video-path>");
        return ExitCode::from(2);
    };

    let config = Config::from_env();
    init_tracing(&LogConfig::from_config(&config, LogTarget::Stderr));

    let annotate_to = std::env::var_os("ANNOTATE_OUTPUT").map(PathBuf::from);

    let clip = match analyze_file(
        &TrackBackend,
        &video,
        annotate_to.as_deref(),
        &config.analysis,
    ) {
        Ok(clip) => clip,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    match serde_json::to_string_pretty(&clip) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
