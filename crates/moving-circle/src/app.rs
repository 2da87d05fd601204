use anyhow::{bail, Context, Result};

use circle_engine::coords::Viewport;
use circle_engine::core::{App, AppControl, FrameCtx, StartCtx};
use circle_engine::render::{Circle, MeshBuffer, ShaderProgram};

use crate::config::AppConfig;
use crate::scene::Scene;

/// Lifecycle of the program.
enum Phase {
    /// Constructed; no window or GPU resources yet.
    Uninitialized,
    Running(Running),
    /// Resources released; nothing else will run.
    Terminated,
}

/// GPU resources owned while running. Fields drop in order: circle first.
struct Running {
    scene: Scene<MeshBuffer>,
    shader: ShaderProgram,
}

/// The moving-circle program, driven by `circle_engine::window::Runtime`.
pub struct Application {
    config: AppConfig,
    phase: Phase,
}

impl Application {
    pub fn new(config: AppConfig) -> Self {
        Self { config, phase: Phase::Uninitialized }
    }

    pub fn phase_name(&self) -> &'static str {
        match self.phase {
            Phase::Uninitialized => "uninitialized",
            Phase::Running(_) => "running",
            Phase::Terminated => "terminated",
        }
    }
}

impl App for Application {
    fn on_start(&mut self, ctx: &mut StartCtx<'_, '_>) -> Result<()> {
        if !matches!(self.phase, Phase::Uninitialized) {
            bail!("application already started ({})", self.phase_name());
        }

        let cfg = &self.config;

        let shader = ShaderProgram::new(
            ctx.device(),
            ctx.surface_format(),
            cfg.vertex_shader,
            cfg.fragment_shader,
        )
        .context("failed to build shader program")?;

        let circle = Circle::new(ctx.device(), ctx.queue(), cfg.start, cfg.radius, cfg.segments)
            .context("failed to create circle")?;

        let scene = Scene::new(circle, ctx.viewport(), cfg).context("failed to upload circle")?;

        log::info!(
            "running: circle at ({}, {}), radius {}, {} segments",
            cfg.start.x,
            cfg.start.y,
            cfg.radius,
            cfg.segments
        );
        self.phase = Phase::Running(Running { scene, shader });
        Ok(())
    }

    fn on_resize(&mut self, viewport: Viewport) -> AppControl {
        let Phase::Running(running) = &mut self.phase else {
            return AppControl::Continue;
        };

        match running.scene.resize(viewport) {
            Ok(_) => AppControl::Continue,
            Err(e) => {
                log::error!("regeneration after resize failed: {e}");
                AppControl::Exit
            }
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let Phase::Running(running) = &mut self.phase else {
            return AppControl::Exit;
        };

        let control = match running.scene.handle_input(ctx.input) {
            Ok(c) => c,
            Err(e) => {
                log::error!("regeneration after move failed: {e}");
                return AppControl::Exit;
            }
        };

        let Running { scene, shader } = running;
        let rendered = ctx.render(self.config.background, |pass| {
            shader.activate(pass);
            scene.draw(pass);
        });

        if control == AppControl::Exit || rendered == AppControl::Exit {
            AppControl::Exit
        } else {
            AppControl::Continue
        }
    }

    fn on_exit(&mut self) {
        if matches!(self.phase, Phase::Running(_)) {
            log::info!("releasing GPU resources");
        }
        self.phase = Phase::Terminated;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_uninitialized() {
        let app = Application::new(AppConfig::default());
        assert_eq!(app.phase_name(), "uninitialized");
    }

    #[test]
    fn resize_before_start_is_ignored() {
        let mut app = Application::new(AppConfig::default());
        let control = app.on_resize(Viewport::from_physical(400, 400));
        assert_eq!(control, AppControl::Continue);
        assert_eq!(app.phase_name(), "uninitialized");
    }

    #[test]
    fn exit_terminates_from_any_phase() {
        let mut app = Application::new(AppConfig::default());
        app.on_exit();
        assert_eq!(app.phase_name(), "terminated");
        app.on_exit();
        assert_eq!(app.phase_name(), "terminated");
    }
}
