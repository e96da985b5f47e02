use nalgebra::{Matrix4, Point2, Point3, Vector3, Vector4};

/// Factory for the transformation matrices of the left-handed pipeline.
/// Written out explicitly to keep full control over the conventions:
/// the camera looks down +Z and depth maps to [0, 1] over [near, far].
pub struct TransformFactory;

#[rustfmt::skip]
impl TransformFactory {
    /// Rotation around the X-axis.
    pub fn rotation_x(angle_rad: f32) -> Matrix4<f32> {
        let c = angle_rad.cos();
        let s = angle_rad.sin();
        Matrix4::new(
            1.0, 0.0, 0.0, 0.0,
            0.0, c,  -s,   0.0,
            0.0, s,   c,   0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Rotation around the Y-axis.
    pub fn rotation_y(angle_rad: f32) -> Matrix4<f32> {
        let c = angle_rad.cos();
        let s = angle_rad.sin();
        Matrix4::new(
            c,   0.0, s,   0.0,
            0.0, 1.0, 0.0, 0.0,
           -s,   0.0, c,   0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Translation matrix.
    pub fn translation(translation: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new(
            1.0, 0.0, 0.0, translation.x,
            0.0, 1.0, 0.0, translation.y,
            0.0, 0.0, 1.0, translation.z,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Camera-to-world matrix from an orthonormal basis plus the camera origin.
    /// The inverse of this matrix is the view matrix.
    pub fn camera_to_world(
        right: &Vector3<f32>,
        up: &Vector3<f32>,
        forward: &Vector3<f32>,
        origin: &Point3<f32>,
    ) -> Matrix4<f32> {
        Matrix4::new(
            right.x, up.x, forward.x, origin.x,
            right.y, up.y, forward.y, origin.y,
            right.z, up.z, forward.z, origin.z,
            0.0,     0.0,  0.0,       1.0,
        )
    }

    /// Left-handed perspective projection.
    ///
    /// `fov` is the precomputed tan of half the vertical field of view.
    /// Z maps to [0, 1] over [near, far] via far/(far-near) and
    /// -(far*near)/(far-near); W receives the view-space Z for the divide.
    pub fn perspective(aspect_ratio: f32, fov: f32, near: f32, far: f32) -> Matrix4<f32> {
        let inv_fov = 1.0 / fov;
        let inv_range = 1.0 / (far - near);

        Matrix4::new(
            inv_fov / aspect_ratio, 0.0,     0.0,              0.0,
            0.0,                    inv_fov, 0.0,              0.0,
            0.0,                    0.0,     far * inv_range, -(far * near) * inv_range,
            0.0,                    0.0,     1.0,              0.0,
        )
    }
}

/// Perspective divide keeping W: X/Y/Z are divided by W, W itself is carried
/// through for perspective-correct interpolation.
///
/// A W near zero cannot be divided; the vertex is forced outside the
/// canonical view volume so the frustum test rejects the whole triangle.
#[inline]
pub fn perspective_divide(clip: &Vector4<f32>) -> Vector4<f32> {
    if clip.w.abs() < 1e-9 {
        return Vector4::new(-2.0, -2.0, -2.0, clip.w);
    }
    Vector4::new(clip.x / clip.w, clip.y / clip.w, clip.z / clip.w, clip.w)
}

/// True when a post-divide vertex lies in the canonical view volume:
/// X/Y in [-1, 1], Z in [0, 1]. NaN coordinates fail every range check and
/// are therefore rejected.
#[inline]
pub fn in_view_volume(ndc: &Vector4<f32>) -> bool {
    (-1.0..=1.0).contains(&ndc.x) && (-1.0..=1.0).contains(&ndc.y) && (0.0..=1.0).contains(&ndc.z)
}

/// Viewport transform. Y flips because NDC +Y points up while the pixel
/// origin is the top-left corner.
#[inline]
pub fn ndc_to_screen(ndc_x: f32, ndc_y: f32, width: f32, height: f32) -> Point2<f32> {
    Point2::new((ndc_x + 1.0) * 0.5 * width, (1.0 - ndc_y) * 0.5 * height)
}
