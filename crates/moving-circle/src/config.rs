use winit::dpi::LogicalSize;

use circle_engine::coords::Vec2;
use circle_engine::device::GpuInit;
use circle_engine::paint::Color;
use circle_engine::window::RuntimeConfig;

/// Program settings. There are no flags or config files; these are the values.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    pub width: f64,
    pub height: f64,

    /// Starting centre in NDC.
    pub start: Vec2,
    pub radius: f32,
    pub segments: u32,

    /// NDC units moved per frame while a movement key is held.
    pub move_speed: f32,

    /// The centre is clamped to `[min_bound, max_bound]` on both axes.
    pub min_bound: f32,
    pub max_bound: f32,

    pub background: Color,

    pub vertex_shader: &'static str,
    pub fragment_shader: &'static str,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Moving Circle".to_string(),
            width: 800.0,
            height: 600.0,
            start: Vec2::new(0.5, 0.5),
            radius: 0.1,
            segments: 100,
            move_speed: 0.02,
            min_bound: -1.0,
            max_bound: 1.0,
            background: Color::from_straight(0.2, 0.3, 0.3, 1.0),
            vertex_shader: include_str!("../shaders/circle.vert.wgsl"),
            fragment_shader: include_str!("../shaders/circle.frag.wgsl"),
        }
    }
}

impl AppConfig {
    pub fn runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            title: self.title.clone(),
            initial_size: LogicalSize::new(self.width, self.height),
        }
    }

    pub fn gpu_init(&self) -> GpuInit {
        GpuInit::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use circle_engine::render::check_program;

    #[test]
    fn bundled_shaders_compile_and_link() {
        let cfg = AppConfig::default();
        assert_eq!(check_program(cfg.vertex_shader, cfg.fragment_shader), Ok(()));
    }

    #[test]
    fn start_position_is_inside_bounds() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.start.clamp_each(cfg.min_bound, cfg.max_bound), cfg.start);
    }
}
