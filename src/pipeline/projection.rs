use crate::core::geometry::{Vertex, VertexOut};
use crate::core::math::transform::perspective_divide;
use nalgebra::{Matrix4, Point3};

/// Vertex projection stage: object space through world, view and projection
/// into the post-divide clip-space layout of [`VertexOut`].
///
/// Pure numeric transform, one output per input vertex. Directions are taken
/// through the world matrix only (no translation) and left unnormalized;
/// normalization happens after interpolation. The view direction is the
/// world-space vertex position relative to the camera origin.
pub fn project_vertices(
    vertices: &[Vertex],
    world: &Matrix4<f32>,
    view_projection: &Matrix4<f32>,
    camera_origin: &Point3<f32>,
    out: &mut Vec<VertexOut>,
) {
    out.clear();
    out.reserve(vertices.len());

    let world_view_projection = view_projection * world;
    let direction_transform = world.fixed_view::<3, 3>(0, 0);

    for vertex in vertices {
        let clip = world_view_projection * vertex.position.to_homogeneous();
        let world_position = world.transform_point(&vertex.position);

        out.push(VertexOut {
            position: perspective_divide(&clip),
            color: vertex.color,
            uv: vertex.uv,
            normal: direction_transform * vertex.normal,
            tangent: direction_transform * vertex.tangent,
            view_direction: world_position - camera_origin,
        });
    }
}
