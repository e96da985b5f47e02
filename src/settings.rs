use log::info;

/// Triangle face culling rule applied per pixel via the edge-function signs.
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub enum CullMode {
    Back,
    Front,
    None,
}

/// Which lighting term(s) the pixel shading stage evaluates.
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub enum ShadingMode {
    Combined,
    ObservedArea,
    Diffuse,
    Specular,
}

/// Read-only configuration bundle consumed by the render pipeline.
///
/// Toggling between frames is supported; the pipeline reads the bundle at
/// every triangle/pixel decision point, so mutating it mid-frame is undefined.
#[derive(Clone, Debug)]
pub struct RenderSettings {
    pub cull_mode: CullMode,
    pub shading_mode: ShadingMode,
    pub use_normal_map: bool,
    pub show_depth_buffer: bool,
    pub show_bounding_box: bool,
    /// Dark uniform clear color instead of the default light gray.
    pub uniform_background: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            cull_mode: CullMode::None,
            shading_mode: ShadingMode::Combined,
            use_normal_map: true,
            show_depth_buffer: false,
            show_bounding_box: false,
            uniform_background: false,
        }
    }
}

impl RenderSettings {
    pub fn cycle_cull_mode(&mut self) {
        self.cull_mode = match self.cull_mode {
            CullMode::Back => CullMode::Front,
            CullMode::Front => CullMode::None,
            CullMode::None => CullMode::Back,
        };
        info!("cull mode = {:?}", self.cull_mode);
    }

    pub fn cycle_shading_mode(&mut self) {
        self.shading_mode = match self.shading_mode {
            ShadingMode::Combined => ShadingMode::ObservedArea,
            ShadingMode::ObservedArea => ShadingMode::Diffuse,
            ShadingMode::Diffuse => ShadingMode::Specular,
            ShadingMode::Specular => ShadingMode::Combined,
        };
        info!("shading mode = {:?}", self.shading_mode);
    }

    pub fn toggle_normal_map(&mut self) {
        self.use_normal_map = !self.use_normal_map;
        info!("use normal map = {}", self.use_normal_map);
    }

    /// The two debug visualizations are mutually exclusive.
    pub fn toggle_depth_buffer_view(&mut self) {
        self.show_depth_buffer = !self.show_depth_buffer;
        self.show_bounding_box = false;
        info!("show depth buffer = {}", self.show_depth_buffer);
    }

    pub fn toggle_bounding_box_view(&mut self) {
        self.show_bounding_box = !self.show_bounding_box;
        self.show_depth_buffer = false;
        info!("show bounding box = {}", self.show_bounding_box);
    }

    pub fn toggle_uniform_background(&mut self) {
        self.uniform_background = !self.uniform_background;
        info!("uniform background = {}", self.uniform_background);
    }
}
