use circle_engine::coords::{Vec2, Viewport};
use circle_engine::core::AppControl;
use circle_engine::input::{InputState, Key};
use circle_engine::render::{Circle, DrawTarget, GeometryBuffer, GeometryError};

use crate::config::AppConfig;

/// Per-frame state of the program: the circle, the window's aspect ratio and
/// the close request.
///
/// Everything here is GPU-agnostic; the buffer type decides where vertices go.
pub struct Scene<B: GeometryBuffer> {
    circle: Circle<B>,
    viewport: Viewport,
    aspect: f32,
    move_speed: f32,
    min_bound: f32,
    max_bound: f32,
    close_requested: bool,
}

impl<B: GeometryBuffer> Scene<B> {
    /// Takes ownership of `circle` and uploads its first tessellation.
    pub fn new(
        circle: Circle<B>,
        viewport: Viewport,
        config: &AppConfig,
    ) -> Result<Self, GeometryError> {
        let aspect = viewport.aspect_ratio().unwrap_or_else(|| {
            log::warn!("initial viewport {viewport:?} has no area; assuming square");
            1.0
        });

        let mut scene = Self {
            circle,
            viewport,
            aspect,
            move_speed: config.move_speed,
            min_bound: config.min_bound,
            max_bound: config.max_bound,
            close_requested: false,
        };
        scene.circle.regenerate(aspect)?;
        Ok(scene)
    }

    /// Polls Escape and W/A/S/D for one frame.
    ///
    /// Escape requests close; the current frame still applies movement and is
    /// still drawn by the caller, but every later call returns `Exit` without
    /// reading input.
    pub fn handle_input(&mut self, input: &InputState) -> Result<AppControl, GeometryError> {
        if self.close_requested {
            return Ok(AppControl::Exit);
        }

        if input.key_down(Key::Escape) {
            log::info!("escape pressed; closing");
            self.close_requested = true;
        }

        let delta = movement_delta(input, self.move_speed);
        if !delta.is_zero() {
            self.circle.move_by(delta.x, delta.y, self.min_bound, self.max_bound);
            self.circle.regenerate(self.aspect)?;
        }

        Ok(if self.close_requested { AppControl::Exit } else { AppControl::Continue })
    }

    /// Stores the new drawable size and re-tessellates for its aspect ratio.
    ///
    /// Returns `false` when the viewport has no area (minimised window); the
    /// previous aspect ratio is kept and nothing is uploaded.
    pub fn resize(&mut self, viewport: Viewport) -> Result<bool, GeometryError> {
        self.viewport = viewport;

        let Some(aspect) = viewport.aspect_ratio() else {
            log::debug!("ignoring zero-area resize {viewport:?}");
            return Ok(false);
        };

        log::debug!("resize to {}x{}, aspect {aspect:.3}", viewport.width, viewport.height);
        self.aspect = aspect;
        self.circle.regenerate(aspect)?;
        Ok(true)
    }

    pub fn draw<T>(&self, target: &mut T)
    where
        T: DrawTarget<B::Handle> + ?Sized,
    {
        self.circle.draw(target);
    }

    pub fn circle(&self) -> &Circle<B> {
        &self.circle
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect
    }

    pub fn close_requested(&self) -> bool {
        self.close_requested
    }
}

/// Sums the held movement keys into one frame's NDC delta.
///
/// W is +y, S is -y, A is -x, D is +x; opposite keys cancel.
pub fn movement_delta(input: &InputState, speed: f32) -> Vec2 {
    let mut d = Vec2::zero();
    if input.key_down(Key::W) {
        d.y += speed;
    }
    if input.key_down(Key::S) {
        d.y -= speed;
    }
    if input.key_down(Key::A) {
        d.x -= speed;
    }
    if input.key_down(Key::D) {
        d.x += speed;
    }
    d
}

#[cfg(test)]
mod tests {
    use super::*;
    use circle_engine::render::{DrawRecorder, HeadlessBuffer};

    fn scene_at(width: u32, height: u32) -> Scene<HeadlessBuffer> {
        let cfg = AppConfig::default();
        let circle = Circle::with_buffer(
            HeadlessBuffer::new_fan(cfg.segments),
            cfg.start,
            cfg.radius,
            cfg.segments,
        )
        .unwrap();
        Scene::new(circle, Viewport::from_physical(width, height), &cfg).unwrap()
    }

    fn uploads(scene: &Scene<HeadlessBuffer>) -> usize {
        scene.circle().buffer().upload_count()
    }

    fn held(keys: &[Key]) -> InputState {
        let mut st = InputState::default();
        for k in keys {
            st.press(*k);
        }
        st
    }

    // ── startup ──────────────────────────────────────────────────────────

    #[test]
    fn new_scene_uploads_once_with_window_aspect() {
        let scene = scene_at(800, 600);
        assert_eq!(uploads(&scene), 1);
        assert!((scene.aspect_ratio() - 4.0 / 3.0).abs() < 1e-6);
        assert_eq!(scene.circle().buffer().vertex_count(), 102);
    }

    #[test]
    fn new_scene_draws_one_full_fan() {
        let scene = scene_at(800, 600);
        let mut rec = DrawRecorder::new();
        scene.draw(&mut rec);
        assert_eq!(rec.draws(), vec![0..300]);
    }

    // ── resize ───────────────────────────────────────────────────────────

    #[test]
    fn square_resize_sets_unit_aspect_and_regenerates_once() {
        let mut scene = scene_at(800, 600);
        let before = uploads(&scene);

        assert!(scene.resize(Viewport::from_physical(400, 400)).unwrap());

        assert_eq!(scene.aspect_ratio(), 1.0);
        assert_eq!(scene.viewport(), Viewport::new(400.0, 400.0));
        assert_eq!(uploads(&scene), before + 1);
    }

    #[test]
    fn resize_keeps_circle_round_without_movement() {
        let mut scene = scene_at(800, 600);
        scene.resize(Viewport::from_physical(400, 400)).unwrap();

        let v = scene.circle().buffer().vertices();
        let c = scene.circle().center();
        for p in &v[1..] {
            assert!(((p.position() - c).length() - 0.1).abs() < 1e-5);
        }
    }

    #[test]
    fn zero_area_resize_keeps_aspect_and_skips_upload() {
        let mut scene = scene_at(800, 600);
        let aspect = scene.aspect_ratio();

        assert!(!scene.resize(Viewport::from_physical(0, 0)).unwrap());

        assert_eq!(scene.aspect_ratio(), aspect);
        assert_eq!(uploads(&scene), 1);
    }

    // ── movement ─────────────────────────────────────────────────────────

    #[test]
    fn no_keys_means_no_upload() {
        let mut scene = scene_at(800, 600);
        let control = scene.handle_input(&InputState::default()).unwrap();
        assert_eq!(control, AppControl::Continue);
        assert_eq!(uploads(&scene), 1);
    }

    #[test]
    fn each_key_moves_in_its_direction() {
        let cases = [
            (Key::W, Vec2::new(0.0, 0.02)),
            (Key::S, Vec2::new(0.0, -0.02)),
            (Key::A, Vec2::new(-0.02, 0.0)),
            (Key::D, Vec2::new(0.02, 0.0)),
        ];
        for (key, expected) in cases {
            assert_eq!(movement_delta(&held(&[key]), 0.02), expected, "{key}");
        }
    }

    #[test]
    fn opposite_keys_cancel() {
        let input = held(&[Key::W, Key::S, Key::A, Key::D]);
        assert!(movement_delta(&input, 0.02).is_zero());

        let mut scene = scene_at(800, 600);
        scene.handle_input(&input).unwrap();
        assert_eq!(uploads(&scene), 1);
    }

    #[test]
    fn held_key_moves_and_regenerates_each_frame() {
        let mut scene = scene_at(800, 600);
        let input = held(&[Key::A]);
        for _ in 0..3 {
            scene.handle_input(&input).unwrap();
        }
        assert_eq!(uploads(&scene), 4);
        assert!((scene.circle().center().x - 0.44).abs() < 1e-5);
        assert_eq!(scene.circle().center().y, 0.5);
        assert_eq!(scene.circle().buffer().vertices()[0].position(), scene.circle().center());
    }

    #[test]
    fn holding_d_stops_at_right_edge() {
        let mut scene = scene_at(800, 600);
        let input = held(&[Key::D]);
        for _ in 0..100 {
            scene.handle_input(&input).unwrap();
        }
        assert_eq!(scene.circle().center(), Vec2::new(1.0, 0.5));
    }

    // ── close request ────────────────────────────────────────────────────

    #[test]
    fn escape_finishes_current_frame_then_ignores_input() {
        let mut scene = scene_at(800, 600);

        let control = scene.handle_input(&held(&[Key::Escape, Key::D])).unwrap();
        assert_eq!(control, AppControl::Exit);
        assert!(scene.close_requested());
        let center = scene.circle().center();
        assert!((center.x - 0.52).abs() < 1e-5);
        let after_close = uploads(&scene);

        let control = scene.handle_input(&held(&[Key::D])).unwrap();
        assert_eq!(control, AppControl::Exit);
        assert_eq!(scene.circle().center(), center);
        assert_eq!(uploads(&scene), after_close);
    }
}
