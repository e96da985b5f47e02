use nalgebra::{Point2, Vector3};

const EPSILON: f32 = 1e-6;

/// Edge function: the 2D cross product of the edge vector `end - start` and
/// the vector from `start` to `p`. Positive on one side of the edge,
/// negative on the other, zero on the edge itself. The sign pattern across a
/// triangle's three edges decides coverage and winding.
#[inline]
pub fn edge_function(start: Point2<f32>, end: Point2<f32>, p: Point2<f32>) -> f32 {
    let edge = end - start;
    let to_p = p - start;
    edge.x * to_p.y - edge.y * to_p.x
}

/// Twice the signed area of the screen-space triangle; the same cross
/// product the edge functions use, so the edge values normalize against it.
#[inline]
pub fn signed_area_x2(v0: Point2<f32>, v1: Point2<f32>, v2: Point2<f32>) -> f32 {
    edge_function(v0, v1, v2)
}

/// Barycentric weights from the three edge values. Each weight is the edge
/// value opposite the corresponding vertex divided by the total area, so the
/// weights evaluate to (1,0,0), (0,1,0), (0,0,1) at the vertices.
///
/// `edges` holds the edge function values for edges v0->v1, v1->v2, v2->v0.
/// Returns `None` for a degenerate (near zero area) triangle.
#[inline]
pub fn barycentric_weights(edges: [f32; 3], area_x2: f32) -> Option<Vector3<f32>> {
    if area_x2.abs() < EPSILON {
        return None;
    }
    let inv_area = 1.0 / area_x2;
    Some(Vector3::new(
        edges[1] * inv_area,
        edges[2] * inv_area,
        edges[0] * inv_area,
    ))
}

/// Screen-space depth via weight-inverse-Z interpolation:
/// `1 / (w0/z0 + w1/z1 + w2/z2)` over the post-divide Z values.
/// Returns `None` when the sum degenerates.
#[inline]
pub fn interpolate_depth(weights: Vector3<f32>, z: [f32; 3]) -> Option<f32> {
    let sum = weights.x / z[0] + weights.y / z[1] + weights.z / z[2];
    if !sum.is_finite() || sum.abs() < EPSILON {
        return None;
    }
    Some(1.0 / sum)
}

/// Perspective-correct barycentric weights.
///
/// Screen-space weights interpolate attributes that vary linearly in screen
/// space; vertex attributes vary linearly in view space, so each weight is
/// rescaled by the inverse of its vertex's clip-space W and renormalized:
///
///   correction = 1 / (w0/W0 + w1/W1 + w2/W2)
///   weight_i'  = (w_i / W_i) * correction
///
/// Returns `None` when the correction denominator degenerates.
#[inline]
pub fn perspective_correct_weights(weights: Vector3<f32>, w: [f32; 3]) -> Option<Vector3<f32>> {
    let a = weights.x / w[0];
    let b = weights.y / w[1];
    let c = weights.z / w[2];

    let sum = a + b + c;
    if !sum.is_finite() || sum.abs() < EPSILON {
        return None;
    }
    let correction = 1.0 / sum;
    Some(Vector3::new(a * correction, b * correction, c * correction))
}
