use crate::scene::material::Material;
use crate::settings::{CullMode, RenderSettings, ShadingMode};
use nalgebra::{Vector2, Vector3};
use std::f32::consts::PI;

/// Single fixed directional light, pointing along (0.577, -0.577, 0.577).
const LIGHT_DIRECTION: [f32; 3] = [0.577, -0.577, 0.577];
const LIGHT_INTENSITY: f32 = 7.0;
/// Multiplier for the glossiness sample when forming the Phong exponent.
const SHININESS: f32 = 25.0;
const AMBIENT: f32 = 0.025;

/// Interpolated attributes for one covered pixel, normalized where the
/// rasterizer promises it (normal, tangent, view direction).
#[derive(Debug, Clone, Copy)]
pub struct FragmentInput {
    pub color: Vector3<f32>,
    pub uv: Vector2<f32>,
    pub normal: Vector3<f32>,
    pub tangent: Vector3<f32>,
    pub view_direction: Vector3<f32>,
}

/// Pixel shading stage: a pure function of settings, interpolated attributes
/// and the mesh's texture set to a linear RGB color.
pub fn shade(
    settings: &RenderSettings,
    fragment: &FragmentInput,
    material: Option<&Material>,
) -> Vector3<f32> {
    let light_direction = Vector3::from(LIGHT_DIRECTION);

    let mut normal = fragment.normal;
    // With front faces culled only back faces remain visible; flip the
    // normal so they shade consistently.
    if settings.cull_mode == CullMode::Front {
        normal = -normal;
    }

    if settings.use_normal_map {
        if let Some(normal_map) = material.and_then(Material::normal_map) {
            normal = perturb_normal(normal, fragment.tangent, normal_map.sample(fragment.uv));
        }
    }

    let observed_area = normal.dot(&-light_direction).max(0.0);

    match settings.shading_mode {
        ShadingMode::ObservedArea => Vector3::repeat(observed_area),
        ShadingMode::Diffuse => diffuse_term(fragment, material) * LIGHT_INTENSITY * observed_area,
        ShadingMode::Specular => {
            specular_term(fragment, material, normal, light_direction) * observed_area
        }
        // The light intensity scales the diffuse term but not the specular
        // one; the source behaves this way and the image depends on it.
        ShadingMode::Combined => {
            let diffuse = diffuse_term(fragment, material) * LIGHT_INTENSITY;
            let specular = specular_term(fragment, material, normal, light_direction);
            (diffuse + specular + Vector3::repeat(AMBIENT)) * observed_area
        }
    }
}

/// Decodes a normal-map texel through the tangent-space basis
/// (tangent, normal × tangent, normal).
fn perturb_normal(normal: Vector3<f32>, tangent: Vector3<f32>, texel: Vector3<f32>) -> Vector3<f32> {
    let binormal = normal.cross(&tangent);
    let sampled = texel * 2.0 - Vector3::repeat(1.0);
    (tangent * sampled.x + binormal * sampled.y + normal * sampled.z).normalize()
}

/// Lambert diffuse: albedo / pi. The albedo is the diffuse texture when one
/// is bound, otherwise the interpolated vertex color.
fn diffuse_term(fragment: &FragmentInput, material: Option<&Material>) -> Vector3<f32> {
    let albedo = match material {
        Some(material) => material.diffuse_map().sample(fragment.uv),
        None => fragment.color,
    };
    albedo / PI
}

/// Phong specular: reflect the light around the normal and raise the
/// alignment with the eye vector to the glossiness-driven exponent.
/// Without specular/glossiness maps the term is zero.
fn specular_term(
    fragment: &FragmentInput,
    material: Option<&Material>,
    normal: Vector3<f32>,
    light_direction: Vector3<f32>,
) -> Vector3<f32> {
    let (Some(specular_map), Some(glossiness_map)) = (
        material.and_then(Material::specular_map),
        material.and_then(Material::glossiness_map),
    ) else {
        return Vector3::zeros();
    };

    let reflection = light_direction - normal * (2.0 * normal.dot(&light_direction));
    let cos_angle = reflection.dot(&-fragment.view_direction).max(0.0);
    let exponent = glossiness_map.sample(fragment.uv).x * SHININESS;

    specular_map.sample(fragment.uv) * cos_angle.powf(exponent)
}
