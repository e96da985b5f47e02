use crate::core::framebuffer::FrameBuffer;
use crate::core::geometry::{self, PrimitiveTopology, VertexOut};
use crate::core::math::interpolation::{
    barycentric_weights, edge_function, interpolate_depth, perspective_correct_weights,
    signed_area_x2,
};
use crate::core::math::transform::{in_view_volume, ndc_to_screen};
use crate::pipeline::shading::{self, FragmentInput};
use crate::scene::material::Material;
use crate::settings::{CullMode, RenderSettings};
use nalgebra::{Point2, Vector3};
use rayon::prelude::*;

/// Depth-buffer visualization remaps this near-plane-biased range to [0, 1].
const DEPTH_VIEW_MIN: f32 = 0.990;
const DEPTH_VIEW_MAX: f32 = 1.0;

/// Rasterization stage: converts projected triangles into shaded pixels,
/// resolving visibility against the framebuffer's depth plane.
///
/// There is no error path here. Degenerate, out-of-volume and zero-area
/// triangles are skipped; a frame always runs to completion.
pub struct Rasterizer;

impl Rasterizer {
    pub fn new() -> Self {
        Self
    }

    /// Rasterizes every triangle of an indexed vertex stream.
    pub fn draw(
        &self,
        framebuffer: &FrameBuffer,
        settings: &RenderSettings,
        vertices: &[VertexOut],
        indices: &[u32],
        topology: PrimitiveTopology,
        material: Option<&Material>,
    ) {
        for [i0, i1, i2] in geometry::triangles(indices, topology) {
            if i0 >= vertices.len() || i1 >= vertices.len() || i2 >= vertices.len() {
                continue;
            }
            self.draw_triangle(
                framebuffer,
                settings,
                [&vertices[i0], &vertices[i1], &vertices[i2]],
                material,
            );
        }
    }

    fn draw_triangle(
        &self,
        framebuffer: &FrameBuffer,
        settings: &RenderSettings,
        triangle: [&VertexOut; 3],
        material: Option<&Material>,
    ) {
        // Whole-triangle reject: any vertex outside the canonical view
        // volume drops the triangle. This is not geometric clipping.
        if triangle.iter().any(|v| !in_view_volume(&v.position)) {
            return;
        }

        let width = framebuffer.width as f32;
        let height = framebuffer.height as f32;
        let screen: [Point2<f32>; 3] = [
            ndc_to_screen(triangle[0].position.x, triangle[0].position.y, width, height),
            ndc_to_screen(triangle[1].position.x, triangle[1].position.y, width, height),
            ndc_to_screen(triangle[2].position.x, triangle[2].position.y, width, height),
        ];

        let area_x2 = signed_area_x2(screen[0], screen[1], screen[2]);
        if area_x2.abs() < 1e-6 {
            return;
        }

        let Some((start, end)) = bounding_box(&screen, framebuffer.width, framebuffer.height)
        else {
            return;
        };

        let z = [
            triangle[0].position.z,
            triangle[1].position.z,
            triangle[2].position.z,
        ];
        let w = [
            triangle[0].position.w,
            triangle[1].position.w,
            triangle[2].position.w,
        ];

        // Row-parallel pixel loop; the framebuffer's atomic depth test keeps
        // workers from racing a pixel.
        (start.1..=end.1).into_par_iter().for_each(|y| {
            for x in start.0..=end.0 {
                let pixel = Point2::new(x as f32 + 0.5, y as f32 + 0.5);

                let edges = [
                    edge_function(screen[0], screen[1], pixel),
                    edge_function(screen[1], screen[2], pixel),
                    edge_function(screen[2], screen[0], pixel),
                ];
                if !passes_cull(settings.cull_mode, edges) {
                    continue;
                }

                if settings.show_bounding_box {
                    framebuffer.set_pixel(x, y, Vector3::new(1.0, 1.0, 1.0));
                    continue;
                }

                let Some(weights) = barycentric_weights(edges, area_x2) else {
                    continue;
                };

                let Some(depth) = interpolate_depth(weights, z) else {
                    continue;
                };
                if !framebuffer.depth_test_and_update(x, y, depth) {
                    continue;
                }

                if settings.show_depth_buffer {
                    let view = (depth - DEPTH_VIEW_MIN) / (DEPTH_VIEW_MAX - DEPTH_VIEW_MIN);
                    framebuffer.set_pixel(x, y, Vector3::repeat(view.clamp(0.0, 1.0)));
                    continue;
                }

                let Some(corrected) = perspective_correct_weights(weights, w) else {
                    continue;
                };
                let fragment = interpolate_fragment(&triangle, corrected);

                let color = shading::shade(settings, &fragment, material);
                framebuffer.set_pixel(x, y, color);
            }
        });
    }
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Pixel inclusion by edge-value signs.
///
/// Back keeps pixels with no positive edge value, Front the mirror image.
/// None accepts either winding but still rejects pixels whose signs straddle
/// an edge (outside or boundary cases).
#[inline]
fn passes_cull(cull_mode: CullMode, edges: [f32; 3]) -> bool {
    match cull_mode {
        CullMode::Back => !edges.iter().any(|&e| e > 0.0),
        CullMode::Front => !edges.iter().any(|&e| e < 0.0),
        CullMode::None => {
            edges.iter().all(|&e| e >= 0.0) || edges.iter().all(|&e| e <= 0.0)
        }
    }
}

/// Integer pixel AABB of the screen-space triangle, expanded by one pixel at
/// the max corner to cover the float-to-int truncation, clamped to the
/// buffer. `None` when the triangle lies fully outside.
fn bounding_box(
    screen: &[Point2<f32>; 3],
    width: usize,
    height: usize,
) -> Option<((usize, usize), (usize, usize))> {
    let min_x = screen[0].x.min(screen[1].x).min(screen[2].x).floor() as i64;
    let min_y = screen[0].y.min(screen[1].y).min(screen[2].y).floor() as i64;
    let max_x = screen[0].x.max(screen[1].x).max(screen[2].x).floor() as i64 + 1;
    let max_y = screen[0].y.max(screen[1].y).max(screen[2].y).floor() as i64 + 1;

    if max_x < 0 || max_y < 0 || min_x >= width as i64 || min_y >= height as i64 {
        return None;
    }

    let start = (min_x.max(0) as usize, min_y.max(0) as usize);
    let end = (
        max_x.min(width as i64 - 1) as usize,
        max_y.min(height as i64 - 1) as usize,
    );
    Some((start, end))
}

/// Perspective-correct attribute interpolation over the corrected weights,
/// renormalizing the direction attributes.
fn interpolate_fragment(triangle: &[&VertexOut; 3], weights: Vector3<f32>) -> FragmentInput {
    let [v0, v1, v2] = *triangle;
    let (a, b, c) = (weights.x, weights.y, weights.z);

    FragmentInput {
        color: v0.color * a + v1.color * b + v2.color * c,
        uv: v0.uv * a + v1.uv * b + v2.uv * c,
        normal: (v0.normal * a + v1.normal * b + v2.normal * c).normalize(),
        tangent: (v0.tangent * a + v1.tangent * b + v2.tangent * c).normalize(),
        view_direction: (v0.view_direction * a + v1.view_direction * b + v2.view_direction * c)
            .normalize(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::ShadingMode;
    use nalgebra::{Vector2, Vector4};

    const WIDTH: usize = 320;
    const HEIGHT: usize = 240;

    /// VertexOut at the given screen pixel, inverted through the viewport
    /// transform, with unit W unless overridden.
    fn vertex_at_pixel(sx: f32, sy: f32, z: f32, w: f32) -> VertexOut {
        let ndc_x = sx / (0.5 * WIDTH as f32) - 1.0;
        let ndc_y = 1.0 - sy / (0.5 * HEIGHT as f32);
        VertexOut {
            position: Vector4::new(ndc_x, ndc_y, z, w),
            color: Vector3::new(1.0, 1.0, 1.0),
            uv: Vector2::zeros(),
            normal: Vector3::new(0.0, 0.0, -1.0),
            tangent: Vector3::x(),
            view_direction: Vector3::z(),
        }
    }

    fn observed_area_settings(cull_mode: CullMode) -> RenderSettings {
        RenderSettings {
            cull_mode,
            shading_mode: ShadingMode::ObservedArea,
            use_normal_map: false,
            ..Default::default()
        }
    }

    fn covered_pixels(fb: &FrameBuffer, background: u32) -> Vec<(usize, usize)> {
        let mut covered = Vec::new();
        for y in 0..fb.height {
            for x in 0..fb.width {
                if fb.pixel(x, y) != Some(background) {
                    covered.push((x, y));
                }
            }
        }
        covered
    }

    /// Coverage by depth-buffer writes. Unlike the color plane this cannot
    /// alias the background: Front culling flips the normal, which can shade
    /// an accepted pixel to black.
    fn depth_written_pixels(fb: &FrameBuffer) -> Vec<(usize, usize)> {
        let mut covered = Vec::new();
        for y in 0..fb.height {
            for x in 0..fb.width {
                if fb.depth(x, y) != Some(f32::INFINITY) {
                    covered.push((x, y));
                }
            }
        }
        covered
    }

    fn draw_triangle(
        fb: &FrameBuffer,
        settings: &RenderSettings,
        vertices: &[VertexOut],
        indices: &[u32],
    ) {
        Rasterizer::new().draw(
            fb,
            settings,
            vertices,
            indices,
            PrimitiveTopology::TriangleList,
            None,
        );
    }

    #[test]
    fn coverage_approximates_screen_area() {
        let fb = FrameBuffer::new(WIDTH, HEIGHT);
        let vertices = vec![
            vertex_at_pixel(100.0, 100.0, 0.5, 1.0),
            vertex_at_pixel(200.0, 100.0, 0.5, 1.0),
            vertex_at_pixel(150.0, 50.0, 0.5, 1.0),
        ];
        draw_triangle(&fb, &observed_area_settings(CullMode::None), &vertices, &[0, 1, 2]);

        let covered = covered_pixels(&fb, 0);
        let analytic_area = 0.5 * 100.0 * 50.0;
        let count = covered.len() as f32;
        assert!(
            (count - analytic_area).abs() < 150.0,
            "covered {count} pixels for analytic area {analytic_area}"
        );

        // Everything outside the triangle's bounding box stays untouched.
        for (x, y) in covered {
            assert!((99..=201).contains(&x), "x = {x}");
            assert!((49..=101).contains(&y), "y = {y}");
        }
    }

    #[test]
    fn out_of_volume_triangle_is_dropped() {
        let fb = FrameBuffer::new(WIDTH, HEIGHT);
        let mut vertices = vec![
            vertex_at_pixel(100.0, 100.0, 0.5, 1.0),
            vertex_at_pixel(200.0, 100.0, 0.5, 1.0),
            vertex_at_pixel(150.0, 50.0, 1.5, 1.0), // Z beyond the far plane
        ];
        draw_triangle(&fb, &observed_area_settings(CullMode::None), &vertices, &[0, 1, 2]);
        assert!(covered_pixels(&fb, 0).is_empty());

        vertices[2].position.z = 0.5;
        vertices[2].position.x = -1.5; // X outside [-1, 1]
        draw_triangle(&fb, &observed_area_settings(CullMode::None), &vertices, &[0, 1, 2]);
        assert!(covered_pixels(&fb, 0).is_empty());
    }

    #[test]
    fn nearer_triangle_wins_the_depth_test() {
        let settings = RenderSettings {
            cull_mode: CullMode::None,
            shading_mode: ShadingMode::Diffuse,
            use_normal_map: false,
            ..Default::default()
        };

        let far: Vec<_> = [(100.0, 100.0), (200.0, 100.0), (150.0, 50.0)]
            .iter()
            .map(|&(x, y)| {
                let mut v = vertex_at_pixel(x, y, 0.8, 1.0);
                v.color = Vector3::new(1.0, 0.0, 0.0);
                v
            })
            .collect();
        let near: Vec<_> = [(100.0, 100.0), (200.0, 100.0), (150.0, 50.0)]
            .iter()
            .map(|&(x, y)| {
                let mut v = vertex_at_pixel(x, y, 0.2, 1.0);
                v.color = Vector3::new(0.0, 1.0, 0.0);
                v
            })
            .collect();

        // Far first, near second; then the same scene in reverse order.
        for order in [[&far, &near], [&near, &far]] {
            let fb = FrameBuffer::new(WIDTH, HEIGHT);
            for tri in order {
                draw_triangle(&fb, &settings, tri, &[0, 1, 2]);
            }
            let sample = fb.pixel(150, 80).unwrap();
            assert_eq!(sample & 0x00FF0000, 0, "red (far) visible: {sample:08x}");
            assert_ne!(sample & 0x0000FF00, 0, "green (near) missing: {sample:08x}");
        }
    }

    #[test]
    fn cull_modes_split_coverage_by_winding() {
        let vertices = vec![
            vertex_at_pixel(100.0, 100.0, 0.5, 1.0),
            vertex_at_pixel(200.0, 100.0, 0.5, 1.0),
            vertex_at_pixel(150.0, 50.0, 1.0 - 1e-6, 1.0),
        ];
        // Same triangle, both windings.
        let indices_a = [0u32, 1, 2];
        let indices_b = [0u32, 2, 1];

        let mut coverage = Vec::new();
        for cull_mode in [CullMode::Back, CullMode::Front, CullMode::None] {
            let fb = FrameBuffer::new(WIDTH, HEIGHT);
            let settings = observed_area_settings(cull_mode);
            draw_triangle(&fb, &settings, &vertices, &indices_a);
            coverage.push(depth_written_pixels(&fb));

            let fb = FrameBuffer::new(WIDTH, HEIGHT);
            draw_triangle(&fb, &settings, &vertices, &indices_b);
            coverage.push(depth_written_pixels(&fb));
        }

        let (back_a, back_b, front_a, front_b, none_a, none_b) = (
            &coverage[0],
            &coverage[1],
            &coverage[2],
            &coverage[3],
            &coverage[4],
            &coverage[5],
        );

        // One winding passes Back, the flipped winding passes Front, and
        // what Back accepts for one winding Front accepts for the other.
        assert!(back_a.is_empty() ^ back_b.is_empty());
        assert!(front_a.is_empty() ^ front_b.is_empty());
        assert_eq!(back_a.len() + back_b.len(), front_a.len() + front_b.len());

        // None accepts both windings and matches the union of Back and Front.
        assert!(!none_a.is_empty() && !none_b.is_empty());
        assert_eq!(none_a.len(), back_a.len() + front_a.len());
        assert_eq!(none_b.len(), back_b.len() + front_b.len());
    }

    #[test]
    fn barycentric_weights_hit_unity_at_vertices() {
        let screen = [
            Point2::new(100.5, 100.5),
            Point2::new(200.5, 100.5),
            Point2::new(150.5, 50.5),
        ];
        let area = signed_area_x2(screen[0], screen[1], screen[2]);
        for (i, vertex) in screen.iter().enumerate() {
            let edges = [
                edge_function(screen[0], screen[1], *vertex),
                edge_function(screen[1], screen[2], *vertex),
                edge_function(screen[2], screen[0], *vertex),
            ];
            let weights = barycentric_weights(edges, area).unwrap();
            assert!((weights[i] - 1.0).abs() < 1e-5, "vertex {i}: {weights:?}");
            assert!((weights.x + weights.y + weights.z - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn perspective_interpolation_differs_from_affine_with_distinct_w() {
        // UVs (0,0), (1,0), (0,1) at the corners. With equal W the centroid
        // interpolates to (1/3, 1/3); distinct W must shift it.
        let screen = [
            Point2::new(100.0, 100.0),
            Point2::new(200.0, 100.0),
            Point2::new(150.0, 50.0),
        ];
        let centroid = Point2::new(150.0, (100.0 + 100.0 + 50.0) / 3.0);
        let area = signed_area_x2(screen[0], screen[1], screen[2]);
        let edges = [
            edge_function(screen[0], screen[1], centroid),
            edge_function(screen[1], screen[2], centroid),
            edge_function(screen[2], screen[0], centroid),
        ];
        let weights = barycentric_weights(edges, area).unwrap();

        let uv = [
            Vector2::new(0.0, 0.0),
            Vector2::new(1.0, 0.0),
            Vector2::new(0.0, 1.0),
        ];
        let interpolate = |w: Vector3<f32>| uv[0] * w.x + uv[1] * w.y + uv[2] * w.z;

        let equal = perspective_correct_weights(weights, [2.0, 2.0, 2.0]).unwrap();
        let at_centroid = interpolate(equal);
        assert!((at_centroid - Vector2::new(1.0 / 3.0, 1.0 / 3.0)).norm() < 1e-4);

        let distinct = perspective_correct_weights(weights, [1.0, 3.0, 5.0]).unwrap();
        let corrected = interpolate(distinct);
        assert!((corrected - at_centroid).norm() > 1e-2);
    }

    #[test]
    fn depth_view_paints_grayscale_without_shading() {
        let fb = FrameBuffer::new(WIDTH, HEIGHT);
        let settings = RenderSettings {
            cull_mode: CullMode::None,
            show_depth_buffer: true,
            ..Default::default()
        };
        let vertices = vec![
            vertex_at_pixel(100.0, 100.0, 0.995, 1.0),
            vertex_at_pixel(200.0, 100.0, 0.995, 1.0),
            vertex_at_pixel(150.0, 50.0, 0.995, 1.0),
        ];
        draw_triangle(&fb, &settings, &vertices, &[0, 1, 2]);

        let pixel = fb.pixel(150, 80).unwrap();
        let r = (pixel >> 16) & 0xFF;
        let g = (pixel >> 8) & 0xFF;
        let b = pixel & 0xFF;
        assert_eq!(r, g);
        assert_eq!(g, b);
        // 0.995 remaps to the middle of [0.990, 1.0].
        assert!((r as i32 - 127).abs() <= 2, "gray level {r}");
    }

    #[test]
    fn bounding_box_view_paints_white_and_skips_depth() {
        let fb = FrameBuffer::new(WIDTH, HEIGHT);
        let settings = RenderSettings {
            cull_mode: CullMode::None,
            show_bounding_box: true,
            ..Default::default()
        };
        let vertices = vec![
            vertex_at_pixel(100.0, 100.0, 0.5, 1.0),
            vertex_at_pixel(200.0, 100.0, 0.5, 1.0),
            vertex_at_pixel(150.0, 50.0, 0.5, 1.0),
        ];
        draw_triangle(&fb, &settings, &vertices, &[0, 1, 2]);

        assert_eq!(fb.pixel(150, 80), Some(0x00FFFFFF));
        // The visualization bypasses the depth test entirely.
        assert_eq!(fb.depth(150, 80), Some(f32::INFINITY));
    }

    #[test]
    fn bounding_box_is_clamped_to_the_buffer() {
        let fb = FrameBuffer::new(WIDTH, HEIGHT);
        // Large triangle with all vertices inside NDC but spilling past the
        // buffer edges after the one-pixel expansion at x = 0.
        let vertices = vec![
            vertex_at_pixel(0.0, 239.0, 0.5, 1.0),
            vertex_at_pixel(319.0, 239.0, 0.5, 1.0),
            vertex_at_pixel(0.0, 0.0, 0.5, 1.0),
        ];
        draw_triangle(&fb, &observed_area_settings(CullMode::None), &vertices, &[0, 1, 2]);
        assert!(!covered_pixels(&fb, 0).is_empty());
    }
}
