use anyhow::Result;
use winit::event::WindowEvent;

use crate::coords::Viewport;

use super::ctx::{FrameCtx, StartCtx};

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract driven by [`crate::window::Runtime`].
///
/// Call order: `on_start` once the window and GPU exist, then any number of
/// `on_window_event` / `on_resize` / `on_frame` calls on the loop thread, then
/// `on_exit` once before the window and GPU are torn down.
pub trait App {
    /// Creates GPU resources. An error aborts startup and is returned from
    /// `Runtime::run`.
    fn on_start(&mut self, ctx: &mut StartCtx<'_, '_>) -> Result<()> {
        let _ = ctx;
        Ok(())
    }

    /// Called for every raw window event, before the runtime handles it.
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }

    /// Called after the surface has been reconfigured for a new size.
    fn on_resize(&mut self, viewport: Viewport) -> AppControl {
        let _ = viewport;
        AppControl::Continue
    }

    /// Called once per rendered frame.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;

    /// Called once when the loop is about to stop, for any reason.
    fn on_exit(&mut self) {}
}
