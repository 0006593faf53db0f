use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, error, info};

use sdf_marcher::camera::MovementState;
use sdf_marcher::cli::Cli;
use sdf_marcher::core::{FrameScheduler, SceneRenderer, ScriptedController, Surface};
use sdf_marcher::frame::FrameIterator;
use sdf_marcher::scene::{demo::create_demo_scene, Scene, SceneDescription};

fn load_scene(cli: &Cli) -> Result<Scene> {
    let scene = match &cli.scene {
        Some(path) => SceneDescription::from_path(path)
            .and_then(SceneDescription::into_scene)
            .with_context(|| format!("Failed to load scene {}", path.display()))?,
        None => create_demo_scene(),
    };

    if let Err(err) = scene.validate() {
        error!("Scene rejected: {err}");
        return Err(err).context("Scene failed material validation");
    }
    Ok(scene)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let scene = Arc::new(load_scene(&cli)?);
    info!(
        "Scene ready: {} objects, {} materials, {} lights",
        scene.object_count(),
        scene.materials().len(),
        scene.lights().len()
    );

    let mut controller = ScriptedController::parse(&cli.moves).context("Invalid --moves script")?;
    let mut camera = *scene.camera();
    let mut surface = Surface::new(cli.width, cli.height, cli.format.into());

    let workers = cli.worker_count();
    let mut scheduler = FrameScheduler::new(SceneRenderer::new(Arc::clone(&scene)), workers)
        .context("Failed to start render workers")?;
    info!(
        "Rendering {} frame(s) at {}x{} on {workers} workers",
        cli.frames, cli.width, cli.height
    );

    let mut frames = FrameIterator::limited(cli.frames);
    for frame in frames.by_ref() {
        let report = scheduler
            .render_frame(&mut surface, camera)
            .with_context(|| format!("Frame {} failed", frame.number))?;
        debug!(
            "Frame {} (previous took {:?}): rows per worker {:?}",
            frame.number, frame.delta, report.rows_per_worker
        );

        controller.advance();
        let movement = MovementState::from_controller(&controller);
        if !movement.is_idle() {
            camera.apply_movement(&movement);
            debug!("Camera at {} facing {}", camera.position, camera.direction());
        }
    }

    scheduler.shutdown();
    let stats = frames.stats();
    info!(
        "Rendered {} frame(s) in {:.2?} ({:.1} FPS, fastest {:?}, slowest {:?})",
        stats.frames,
        stats.elapsed,
        stats.fps(),
        stats.fastest.unwrap_or_default(),
        stats.slowest.unwrap_or_default()
    );

    if let Some(path) = &cli.output {
        surface
            .save_png(path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Saved last frame to {}", path.display());
    }

    Ok(())
}
