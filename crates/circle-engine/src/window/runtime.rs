use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::coords::Viewport;
use crate::core::{App as CoreApp, AppControl, FrameCtx, StartCtx, WindowCtx};
use crate::device::{Gpu, GpuInit};
use crate::input::platform::translate_window_event;
use crate::input::InputState;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "circle".to_string(),
            initial_size: LogicalSize::new(800.0, 600.0),
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens the window, starts `app` and drives it until it exits.
    ///
    /// Returns the startup error if the window, the GPU context or
    /// `App::on_start` failed; `Ok(())` after a normal close.
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: 'static + CoreApp,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, gpu_init, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.startup_error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Drawable size the app is notified of for `event`.
///
/// Only `Resized` carries the final size; a scale-factor change is followed by
/// one, so it does not notify on its own.
fn app_resize(event: &WindowEvent) -> Option<PhysicalSize<u32>> {
    match event {
        WindowEvent::Resized(size) => Some(*size),
        _ => None,
    }
}

#[self_referencing]
struct WindowEntry {
    input_state: InputState,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct AppState<A>
where
    A: CoreApp + 'static,
{
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    window: Option<WindowEntry>,
    started: bool,
    stopped: bool,
    startup_error: Option<anyhow::Error>,
}

impl<A> AppState<A>
where
    A: CoreApp + 'static,
{
    fn new(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Self {
        Self {
            config,
            gpu_init,
            app,
            window: None,
            started: false,
            stopped: false,
            startup_error: None,
        }
    }

    /// Creates the window and GPU context, then runs `App::on_start`.
    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let size = window.inner_size();
        log::info!("window created: \"{}\" {}x{}", self.config.title, size.width, size.height);

        let gpu_init = self.gpu_init.clone();
        let entry = WindowEntryTryBuilder {
            input_state: InputState::default(),
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
            .try_build()
            .context("GPU initialization failed")?;

        let app = &mut self.app;
        entry
            .with(|fields| {
                let mut ctx = StartCtx {
                    window: WindowCtx {
                        id: fields.window.id(),
                        window: fields.window,
                    },
                    gpu: fields.gpu,
                };
                app.on_start(&mut ctx)
            })
            .context("application startup failed")?;

        entry.with_window(|w| w.request_redraw());
        self.window = Some(entry);
        Ok(())
    }

    /// Runs `App::on_exit` once, releases the window and GPU, and stops the loop.
    fn stop(&mut self, event_loop: &ActiveEventLoop) {
        if !self.stopped {
            self.stopped = true;
            self.app.on_exit();
            // Window and surface go after the app has released its GPU resources.
            self.window = None;
            log::info!("runtime stopped");
        }
        event_loop.exit();
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>) -> AppControl {
        let Some(entry) = self.window.as_mut() else {
            return AppControl::Continue;
        };

        entry.with_gpu_mut(|gpu| gpu.resize(new_size));
        entry.with_window(|w| w.request_redraw());

        self.app
            .on_resize(Viewport::from_physical(new_size.width, new_size.height))
    }

    fn redraw(&mut self) -> AppControl {
        let (app, window) = (&mut self.app, &mut self.window);
        let Some(entry) = window.as_mut() else {
            return AppControl::Continue;
        };

        entry.with_mut(|fields| {
            let mut ctx = FrameCtx {
                window: WindowCtx {
                    id: fields.window.id(),
                    window: fields.window,
                },
                gpu: fields.gpu,
                input: fields.input_state,
            };
            app.on_frame(&mut ctx)
        })
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: CoreApp + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.started {
            return;
        }
        self.started = true;

        if let Err(e) = self.start(event_loop) {
            log::error!("startup failed: {e:#}");
            self.startup_error = Some(e);
            self.stop(event_loop);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.stopped {
            event_loop.exit();
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw; presentation is paced by the surface present mode.
        if let Some(entry) = self.window.as_ref() {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.stopped {
            event_loop.exit();
            return;
        }

        let Some(entry) = self.window.as_mut() else {
            return;
        };
        if entry.with_window(|w| w.id()) != window_id {
            return;
        }

        if let Some(ev) = translate_window_event(&event) {
            entry.with_input_state_mut(|st| st.apply_event(&ev));
        }

        let mut control = self.app.on_window_event(&event);

        let runtime_control = match &event {
            WindowEvent::CloseRequested => {
                log::info!("window close requested");
                AppControl::Exit
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                // The new physical size follows in a `Resized` event.
                if let Some(entry) = self.window.as_mut() {
                    let size = entry.with_window(|w| w.inner_size());
                    entry.with_gpu_mut(|gpu| gpu.resize(size));
                }
                AppControl::Continue
            }

            WindowEvent::RedrawRequested => self.redraw(),

            other => match app_resize(other) {
                Some(size) => self.resize(size),
                None => AppControl::Continue,
            },
        };

        if runtime_control == AppControl::Exit {
            control = AppControl::Exit;
        }

        if control == AppControl::Exit {
            self.stop(event_loop);
        }
    }

    fn exiting(&mut self, event_loop: &ActiveEventLoop) {
        self.stop(event_loop);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resized_notifies_with_new_size() {
        let ev = WindowEvent::Resized(PhysicalSize::new(400, 400));
        assert_eq!(app_resize(&ev), Some(PhysicalSize::new(400, 400)));
    }

    #[test]
    fn other_events_do_not_notify() {
        for ev in [
            WindowEvent::Focused(true),
            WindowEvent::CloseRequested,
            WindowEvent::RedrawRequested,
        ] {
            assert_eq!(app_resize(&ev), None, "{ev:?}");
        }
    }
}
