//! Shared launcher for the demo binaries.

use std::process::ExitCode;

use anyhow::Context;
use lumen_engine::core::{Application, SceneConfig};
use lumen_engine::error::Failure;
use lumen_engine::logging::{init_logging, LoggingConfig};
use lumen_engine::window::WindowConfig;

/// Runs `scene` in a fresh window and maps the outcome to a process exit code.
pub fn launch(title: &str, scene: SceneConfig) -> ExitCode {
    init_logging(LoggingConfig::default());

    match run(title, &scene) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err:#}");
            let code = err.downcast_ref::<Failure>().map_or(1, Failure::exit_code);
            ExitCode::from(code)
        }
    }
}

fn run(title: &str, scene: &SceneConfig) -> anyhow::Result<()> {
    let window = WindowConfig {
        title: title.to_string(),
        ..WindowConfig::default()
    };

    let ctx = Application::new()
        .with_window(window)
        .bootstrap()
        .map_err(Failure::from)
        .context("failed to bring up the render context")?;

    let adapter = ctx.adapter_summary();
    println!("Vendor:   {}", adapter.vendor);
    println!("Renderer: {}", adapter.renderer);
    println!("Version:  {}", adapter.version);

    let report = ctx
        .run(scene)
        .with_context(|| format!("scene `{}` failed", scene.label))?;

    log::info!(
        "{} frames presented, {} skipped",
        report.frames_presented,
        report.frames_skipped
    );
    Ok(())
}
