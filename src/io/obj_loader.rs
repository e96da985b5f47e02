use crate::core::geometry::{PrimitiveTopology, Vertex};
use crate::scene::mesh::Mesh;
use log::{info, warn};
use nalgebra::{Point3, Vector2, Vector3};
use std::path::Path;

/// Loads an OBJ file into a single triangle-list mesh.
///
/// Sub-meshes are merged with their indices offset. Missing normals fall
/// back to +Y; tangents are accumulated from the triangle UV gradients so
/// the normal-mapping path has a basis to work with.
pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<Mesh, String> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(format!("file not found: {}", path.display()));
    }

    info!("loading OBJ file {}", path.display());

    let load_options = tobj::LoadOptions {
        triangulate: true,
        single_index: true,
        ..Default::default()
    };
    let (models, _materials) = tobj::load_obj(path, &load_options)
        .map_err(|e| format!("failed to load {}: {}", path.display(), e))?;

    let mut vertices = Vec::new();
    let mut indices = Vec::new();
    let mut index_offset = 0u32;

    for model in models {
        let mesh = &model.mesh;
        let vertex_count = mesh.positions.len() / 3;

        let has_normals = !mesh.normals.is_empty();
        let has_texcoords = !mesh.texcoords.is_empty();
        if !has_normals {
            warn!("mesh '{}' has no normals, defaulting to +Y", model.name);
        }

        for i in 0..vertex_count {
            let position = Point3::new(
                mesh.positions[i * 3],
                mesh.positions[i * 3 + 1],
                mesh.positions[i * 3 + 2],
            );
            let normal = if has_normals {
                Vector3::new(
                    mesh.normals[i * 3],
                    mesh.normals[i * 3 + 1],
                    mesh.normals[i * 3 + 2],
                )
            } else {
                Vector3::y()
            };
            let uv = if has_texcoords {
                // OBJ V points up, the sampler's V points down.
                Vector2::new(mesh.texcoords[i * 2], 1.0 - mesh.texcoords[i * 2 + 1])
            } else {
                Vector2::zeros()
            };
            vertices.push(Vertex::new(position, normal, uv));
        }

        for &index in &mesh.indices {
            indices.push(index + index_offset);
        }
        index_offset += vertex_count as u32;
    }

    accumulate_tangents(&mut vertices, &indices);

    info!(
        "OBJ loaded: {} vertices, {} indices",
        vertices.len(),
        indices.len()
    );
    Ok(Mesh::new(vertices, indices, PrimitiveTopology::TriangleList))
}

/// Per-vertex tangents from the UV gradients of each triangle, averaged and
/// orthogonalized against the vertex normal.
fn accumulate_tangents(vertices: &mut [Vertex], indices: &[u32]) {
    for triangle in indices.chunks_exact(3) {
        let [i0, i1, i2] = [
            triangle[0] as usize,
            triangle[1] as usize,
            triangle[2] as usize,
        ];

        let edge1 = vertices[i1].position - vertices[i0].position;
        let edge2 = vertices[i2].position - vertices[i0].position;
        let duv1 = vertices[i1].uv - vertices[i0].uv;
        let duv2 = vertices[i2].uv - vertices[i0].uv;

        let denom = duv1.x * duv2.y - duv1.y * duv2.x;
        if denom.abs() < 1e-9 {
            continue;
        }
        let tangent = (edge1 * duv2.y - edge2 * duv1.y) / denom;

        for &i in &[i0, i1, i2] {
            vertices[i].tangent += tangent;
        }
    }

    for vertex in vertices {
        let projected = vertex.tangent - vertex.normal * vertex.normal.dot(&vertex.tangent);
        if projected.norm_squared() > 1e-12 {
            vertex.tangent = projected.normalize();
        }
    }
}
