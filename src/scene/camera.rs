use crate::core::math::transform::TransformFactory;
use log::warn;
use nalgebra::{Matrix4, Point3, Vector3};

const MIN_FOV_ANGLE: f32 = 0.5;
const MAX_FOV_ANGLE: f32 = 179.5;

/// Pitch stops short of ±90° so `world-up × forward` never degenerates.
const MAX_PITCH: f32 = 89.5 * std::f32::consts::PI / 180.0;

/// Owns the camera state and derives the view and projection matrices.
///
/// The basis is left-handed: `forward` looks down +Z at yaw/pitch zero, and
/// the projection maps depth into [0, 1] over [near, far].
#[derive(Debug, Clone)]
pub struct Camera {
    pub origin: Point3<f32>,
    /// Vertical field of view in degrees, clamped to [0.5, 179.5].
    fov_angle: f32,
    /// Cached tan(fov/2).
    fov: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,

    pub forward: Vector3<f32>,
    pub up: Vector3<f32>,
    pub right: Vector3<f32>,

    total_pitch: f32,
    total_yaw: f32,

    view_matrix: Matrix4<f32>,
    inv_view_matrix: Matrix4<f32>,
    projection_matrix: Matrix4<f32>,
}

impl Camera {
    pub fn new(origin: Point3<f32>, fov_angle: f32, aspect_ratio: f32) -> Self {
        let mut camera = Self {
            origin,
            fov_angle: fov_angle.clamp(MIN_FOV_ANGLE, MAX_FOV_ANGLE),
            fov: 0.0,
            aspect_ratio,
            near: 0.1,
            far: 100.0,
            forward: Vector3::z(),
            up: Vector3::y(),
            right: Vector3::x(),
            total_pitch: 0.0,
            total_yaw: 0.0,
            view_matrix: Matrix4::identity(),
            inv_view_matrix: Matrix4::identity(),
            projection_matrix: Matrix4::identity(),
        };
        camera.calculate_view_matrix();
        camera.calculate_projection_matrix();
        camera
    }

    /// Rebuilds the orthonormal basis from `forward` and derives the view
    /// matrix by inverting the camera-to-world matrix.
    pub fn calculate_view_matrix(&mut self) {
        let mut right = Vector3::y().cross(&self.forward);
        if right.norm_squared() < 1e-8 {
            // Forward parallel to world-up; the pitch clamp should prevent
            // this, fall back to the previous right axis.
            warn!("camera forward is parallel to world up, basis kept");
            right = self.right;
        }
        self.right = right.normalize();
        self.up = self.forward.cross(&self.right).normalize();

        self.inv_view_matrix =
            TransformFactory::camera_to_world(&self.right, &self.up, &self.forward, &self.origin);
        self.view_matrix = self
            .inv_view_matrix
            .try_inverse()
            .unwrap_or_else(Matrix4::identity);
    }

    pub fn calculate_projection_matrix(&mut self) {
        self.fov = (self.fov_angle.to_radians() / 2.0).tan();
        self.projection_matrix =
            TransformFactory::perspective(self.aspect_ratio, self.fov, self.near, self.far);
    }

    /// Applies a yaw/pitch delta in radians and rebuilds the basis.
    pub fn rotate(&mut self, pitch_delta: f32, yaw_delta: f32) {
        self.total_pitch = (self.total_pitch + pitch_delta).clamp(-MAX_PITCH, MAX_PITCH);
        self.total_yaw += yaw_delta;

        let rotation = TransformFactory::rotation_y(self.total_yaw)
            * TransformFactory::rotation_x(self.total_pitch);
        self.forward = (rotation.fixed_view::<3, 3>(0, 0) * Vector3::z()).normalize();
        self.calculate_view_matrix();
    }

    /// Moves the origin by a world-space offset.
    pub fn translate(&mut self, offset: Vector3<f32>) {
        self.origin += offset;
        self.calculate_view_matrix();
    }

    pub fn set_fov_angle(&mut self, fov_angle: f32) {
        self.fov_angle = fov_angle.clamp(MIN_FOV_ANGLE, MAX_FOV_ANGLE);
        self.calculate_projection_matrix();
    }

    pub fn fov_angle(&self) -> f32 {
        self.fov_angle
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        self.view_matrix
    }

    pub fn inv_view_matrix(&self) -> Matrix4<f32> {
        self.inv_view_matrix
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection_matrix
    }

    pub fn view_projection_matrix(&self) -> Matrix4<f32> {
        self.projection_matrix * self.view_matrix
    }
}
