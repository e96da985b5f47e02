use nalgebra::{Point3, Vector2, Vector3, Vector4};

/// A single mesh vertex in object space, as supplied by the asset loader.
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    pub position: Point3<f32>,
    /// Base color, used as the albedo when no diffuse texture is bound.
    pub color: Vector3<f32>,
    pub uv: Vector2<f32>,
    pub normal: Vector3<f32>,
    /// Tangent vector for normal mapping (zero when the mesh carries none).
    pub tangent: Vector3<f32>,
}

impl Vertex {
    pub fn new(position: Point3<f32>, normal: Vector3<f32>, uv: Vector2<f32>) -> Self {
        Self {
            position,
            color: Vector3::new(1.0, 1.0, 1.0),
            uv,
            normal,
            tangent: Vector3::zeros(),
        }
    }
}

/// Output of the vertex projection stage; rebuilt every frame.
///
/// `position` holds post-divide X/Y/Z with the original clip-space W retained
/// for perspective-correct interpolation. Normal, tangent and view direction
/// are in world space and not normalized until after interpolation.
#[derive(Debug, Clone, Copy)]
pub struct VertexOut {
    pub position: Vector4<f32>,
    pub color: Vector3<f32>,
    pub uv: Vector2<f32>,
    pub normal: Vector3<f32>,
    pub tangent: Vector3<f32>,
    /// Camera origin to world position, unnormalized.
    pub view_direction: Vector3<f32>,
}

/// How an index buffer groups into triangles.
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub enum PrimitiveTopology {
    TriangleList,
    TriangleStrip,
}

/// Iterates the triangles of an index buffer.
///
/// Lists step by three. Strips step by one and swap the second and third
/// index on odd triangles so the winding stays consistent. Triangles with a
/// repeated index (strip restarts produce these) are skipped.
pub fn triangles(
    indices: &[u32],
    topology: PrimitiveTopology,
) -> impl Iterator<Item = [usize; 3]> + '_ {
    let (step, count) = match topology {
        PrimitiveTopology::TriangleList => (3, indices.len() / 3),
        PrimitiveTopology::TriangleStrip => (1, indices.len().saturating_sub(2)),
    };

    (0..count).filter_map(move |t| {
        let base = t * step;
        let tri = match topology {
            PrimitiveTopology::TriangleList => {
                [indices[base], indices[base + 1], indices[base + 2]]
            }
            PrimitiveTopology::TriangleStrip if t % 2 == 1 => {
                [indices[base], indices[base + 2], indices[base + 1]]
            }
            PrimitiveTopology::TriangleStrip => {
                [indices[base], indices[base + 1], indices[base + 2]]
            }
        };

        if tri[0] == tri[1] || tri[1] == tri[2] || tri[0] == tri[2] {
            return None;
        }
        Some([tri[0] as usize, tri[1] as usize, tri[2] as usize])
    })
}
