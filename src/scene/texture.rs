use image::RgbImage;
use log::info;
use nalgebra::{Vector2, Vector3};
use std::path::Path;

/// A 2D image resource sampled by the pixel shading stage.
///
/// Sampling is nearest-texel with wrap addressing and returns RGB in
/// [0, 1]. No gamma conversion is applied; normal and glossiness maps store
/// raw data, not colors.
#[derive(Debug, Clone)]
pub struct Texture {
    image: RgbImage,
    width: u32,
    height: u32,
}

impl Texture {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let img = image::open(path)
            .map_err(|e| format!("failed to load texture {}: {}", path.display(), e))?;

        let texture = Self::from_image(img.to_rgb8());
        info!(
            "loaded texture {} ({}x{})",
            path.display(),
            texture.width,
            texture.height
        );
        Ok(texture)
    }

    pub fn from_image(image: RgbImage) -> Self {
        let width = image.width();
        let height = image.height();
        Self {
            image,
            width,
            height,
        }
    }

    /// Samples the texel under `uv`. UVs outside [0, 1] wrap (repeat).
    pub fn sample(&self, uv: Vector2<f32>) -> Vector3<f32> {
        let x = (uv.x * self.width as f32).floor() as i64;
        let y = (uv.y * self.height as f32).floor() as i64;

        let x = x.rem_euclid(self.width as i64) as u32;
        let y = y.rem_euclid(self.height as i64) as u32;

        let texel = self.image.get_pixel(x, y);
        Vector3::new(
            texel[0] as f32 / 255.0,
            texel[1] as f32 / 255.0,
            texel[2] as f32 / 255.0,
        )
    }
}
