use crate::core::framebuffer::FrameBuffer;
use crate::core::rasterizer::Rasterizer;
use crate::pipeline::projection;
use crate::scene::camera::Camera;
use crate::scene::mesh::Mesh;
use crate::settings::RenderSettings;
use nalgebra::Vector3;

/// Clear color used when the uniform background is enabled.
const UNIFORM_CLEAR: f32 = 0.1;
/// Default light-gray clear color.
const DEFAULT_CLEAR: f32 = 0.39;

/// One-frame orchestration of the software pipeline: clear, project each
/// mesh, rasterize, then hand the finished buffer to presentation.
///
/// A frame is `begin_frame` followed by any number of `draw_mesh` calls; the
/// framebuffer is only meant to be read once the last draw returns.
pub struct SoftwareRenderer {
    pub framebuffer: FrameBuffer,
    rasterizer: Rasterizer,
}

impl SoftwareRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            framebuffer: FrameBuffer::new(width, height),
            rasterizer: Rasterizer::new(),
        }
    }

    /// Clears color and depth for a new frame.
    pub fn begin_frame(&mut self, settings: &RenderSettings) {
        let level = if settings.uniform_background {
            UNIFORM_CLEAR
        } else {
            DEFAULT_CLEAR
        };
        self.framebuffer.clear(Vector3::repeat(level));
    }

    /// Projects the mesh with the current camera and rasterizes it into the
    /// framebuffer.
    pub fn draw_mesh(&mut self, settings: &RenderSettings, camera: &Camera, mesh: &mut Mesh) {
        let world = mesh.world_matrix();
        projection::project_vertices(
            &mesh.vertices,
            &world,
            &camera.view_projection_matrix(),
            &camera.origin,
            &mut mesh.vertices_out,
        );

        self.rasterizer.draw(
            &self.framebuffer,
            settings,
            &mesh.vertices_out,
            &mesh.indices,
            mesh.topology,
            mesh.material.as_ref(),
        );
    }

    /// The finished frame as packed `0x00RRGGBB` pixels, row-major.
    pub fn frame(&self) -> Vec<u32> {
        self.framebuffer.snapshot()
    }
}
