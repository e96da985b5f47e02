use crate::scene::texture::Texture;

/// Texture set owned by a mesh.
///
/// Two shapes exist: a plain diffuse map, or the full set needed for
/// normal-mapped specular shading. The mesh uniquely owns its textures; the
/// rasterizer only borrows them for the duration of a frame.
#[derive(Debug, Clone)]
pub enum Material {
    Diffuse {
        diffuse: Texture,
    },
    Mapped {
        diffuse: Texture,
        normal: Texture,
        specular: Texture,
        glossiness: Texture,
    },
}

impl Material {
    pub fn diffuse_map(&self) -> &Texture {
        match self {
            Material::Diffuse { diffuse } => diffuse,
            Material::Mapped { diffuse, .. } => diffuse,
        }
    }

    pub fn normal_map(&self) -> Option<&Texture> {
        match self {
            Material::Diffuse { .. } => None,
            Material::Mapped { normal, .. } => Some(normal),
        }
    }

    pub fn specular_map(&self) -> Option<&Texture> {
        match self {
            Material::Diffuse { .. } => None,
            Material::Mapped { specular, .. } => Some(specular),
        }
    }

    pub fn glossiness_map(&self) -> Option<&Texture> {
        match self {
            Material::Diffuse { .. } => None,
            Material::Mapped { glossiness, .. } => Some(glossiness),
        }
    }
}
