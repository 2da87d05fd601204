//! Moves a red circle around the window with W/A/S/D; Escape quits.

mod app;
mod config;
mod scene;

use std::process::ExitCode;

use circle_engine::logging::{init_logging, LoggingConfig};
use circle_engine::window::Runtime;

use crate::app::Application;
use crate::config::AppConfig;

fn main() -> ExitCode {
    init_logging(LoggingConfig::default());

    let config = AppConfig::default();
    let runtime = config.runtime_config();
    let gpu_init = config.gpu_init();

    match Runtime::run(runtime, gpu_init, Application::new(config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
