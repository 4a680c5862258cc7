use gfx_hal::window::Extent2D;

#[derive(Debug, Clone)]
pub struct Config {
    pub title: String,
    pub dims: Extent2D,
    pub min_dims: Extent2D,
    pub vertex_shader: String,
    pub fragment_shader: String,
    pub clear_color: [f32; 4],
    pub frames_in_flight: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            title: "Austrian Flag".to_owned(),
            dims: Extent2D {
                width: 800,
                height: 600,
            },
            min_dims: Extent2D {
                width: 64,
                height: 64,
            },
            vertex_shader: "shaders/vertexShader.glsl".to_owned(),
            fragment_shader: "shaders/fragmentShader.glsl".to_owned(),
            clear_color: [0.0, 0.0, 0.0, 1.0],
            frames_in_flight: 2,
        }
    }
}

impl Config {
    pub fn bootstrap() -> Self {
        Config {
            title: "Austrian Flag (bootstrap)".to_owned(),
            ..Config::default()
        }
    }

    pub fn window_builder(&self) -> winit::window::WindowBuilder {
        winit::window::WindowBuilder::new()
            .with_title(self.title.as_str())
            .with_inner_size(winit::dpi::Size::Physical(winit::dpi::PhysicalSize::new(
                self.dims.width,
                self.dims.height,
            )))
            .with_min_inner_size(winit::dpi::Size::Logical(winit::dpi::LogicalSize::new(
                self.min_dims.width as f64,
                self.min_dims.height as f64,
            )))
    }
}
