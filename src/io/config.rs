use crate::settings::{CullMode, RenderSettings, ShadingMode};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// TOML-driven scene and renderer description for the demo binary.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub scene: SceneConfig,
}

#[derive(Debug, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "default_width")]
    pub width: usize,
    #[serde(default = "default_height")]
    pub height: usize,
    #[serde(default = "default_output")]
    pub output: String,

    /// "back", "front" or "none".
    #[serde(default = "default_cull_mode")]
    pub cull_mode: String,
    /// "combined", "observed_area", "diffuse" or "specular".
    #[serde(default = "default_shading_mode")]
    pub shading_mode: String,
    #[serde(default = "default_true")]
    pub use_normal_map: bool,
    #[serde(default)]
    pub show_depth_buffer: bool,
    #[serde(default)]
    pub show_bounding_box: bool,
    #[serde(default)]
    pub uniform_background: bool,
}

#[derive(Debug, Deserialize)]
pub struct CameraConfig {
    #[serde(default)]
    pub position: [f32; 3],
    #[serde(default = "default_fov")]
    pub fov_angle: f32,
}

#[derive(Debug, Default, Deserialize)]
pub struct SceneConfig {
    /// OBJ path; a built-in test triangle is used when absent.
    pub mesh: Option<String>,
    #[serde(default = "default_mesh_position")]
    pub position: [f32; 3],

    pub diffuse_map: Option<String>,
    pub normal_map: Option<String>,
    pub specular_map: Option<String>,
    pub glossiness_map: Option<String>,
}

fn default_width() -> usize {
    640
}
fn default_height() -> usize {
    480
}
fn default_output() -> String {
    "frame.png".to_string()
}
fn default_cull_mode() -> String {
    "none".to_string()
}
fn default_shading_mode() -> String {
    "combined".to_string()
}
fn default_true() -> bool {
    true
}
fn default_fov() -> f32 {
    45.0
}
fn default_mesh_position() -> [f32; 3] {
    [0.0, 0.0, 50.0]
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            output: default_output(),
            cull_mode: default_cull_mode(),
            shading_mode: default_shading_mode(),
            use_normal_map: true,
            show_depth_buffer: false,
            show_bounding_box: false,
            uniform_background: false,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            fov_angle: default_fov(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| format!("failed to read config {}: {}", path.display(), e))?;
        toml::from_str(&text).map_err(|e| format!("invalid config {}: {}", path.display(), e))
    }

    /// Resolves the string-typed options into a settings bundle.
    pub fn settings(&self) -> Result<RenderSettings, String> {
        let cull_mode = match self.render.cull_mode.as_str() {
            "back" => CullMode::Back,
            "front" => CullMode::Front,
            "none" => CullMode::None,
            other => return Err(format!("unknown cull mode '{other}'")),
        };
        let shading_mode = match self.render.shading_mode.as_str() {
            "combined" => ShadingMode::Combined,
            "observed_area" => ShadingMode::ObservedArea,
            "diffuse" => ShadingMode::Diffuse,
            "specular" => ShadingMode::Specular,
            other => return Err(format!("unknown shading mode '{other}'")),
        };

        Ok(RenderSettings {
            cull_mode,
            shading_mode,
            use_normal_map: self.render.use_normal_map,
            show_depth_buffer: self.render.show_depth_buffer,
            show_bounding_box: self.render.show_bounding_box,
            uniform_background: self.render.uniform_background,
        })
    }
}
