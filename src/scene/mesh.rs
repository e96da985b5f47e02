use crate::core::geometry::{PrimitiveTopology, Vertex, VertexOut};
use crate::core::math::transform::TransformFactory;
use crate::scene::material::Material;
use nalgebra::{Matrix4, Point3, Vector2, Vector3};

/// A renderable object: geometry, topology, its world transform and the
/// texture set it uniquely owns.
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub topology: PrimitiveTopology,
    pub material: Option<Material>,

    translation: Vector3<f32>,
    yaw: f32,
    /// Radians per second around the Y-axis while animated.
    pub rotation_speed: f32,
    world_matrix: Matrix4<f32>,

    /// Per-frame projection output; reused to avoid reallocating every frame.
    pub(crate) vertices_out: Vec<VertexOut>,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>, topology: PrimitiveTopology) -> Self {
        Self {
            vertices,
            indices,
            topology,
            material: None,
            translation: Vector3::zeros(),
            yaw: 0.0,
            rotation_speed: 45.0_f32.to_radians(),
            world_matrix: Matrix4::identity(),
            vertices_out: Vec::new(),
        }
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = Some(material);
        self
    }

    pub fn set_translation(&mut self, translation: Vector3<f32>) {
        self.translation = translation;
        self.rebuild_world_matrix();
    }

    /// Advances the yaw animation by `delta_seconds`.
    pub fn update(&mut self, delta_seconds: f32) {
        self.yaw += self.rotation_speed * delta_seconds;
        self.rebuild_world_matrix();
    }

    fn rebuild_world_matrix(&mut self) {
        self.world_matrix =
            TransformFactory::translation(&self.translation) * TransformFactory::rotation_y(self.yaw);
    }

    pub fn world_matrix(&self) -> Matrix4<f32> {
        self.world_matrix
    }

    /// A white unit triangle facing -Z, useful as a fallback and in tests.
    pub fn create_test_triangle() -> Self {
        let normal = Vector3::new(0.0, 0.0, -1.0);
        let vertices = vec![
            Vertex::new(Point3::new(0.0, 0.5, 0.0), normal, Vector2::new(0.5, 0.0)),
            Vertex::new(Point3::new(0.5, -0.5, 0.0), normal, Vector2::new(1.0, 1.0)),
            Vertex::new(Point3::new(-0.5, -0.5, 0.0), normal, Vector2::new(0.0, 1.0)),
        ];
        Self::new(vertices, vec![0, 1, 2], PrimitiveTopology::TriangleList)
    }
}
