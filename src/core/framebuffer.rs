use atomic_float::AtomicF32;
use nalgebra::Vector3;
use std::sync::atomic::{AtomicU32, Ordering};

/// Packs a linear RGB color into a `0x00RRGGBB` pixel.
/// Channels are clamped to [0, 1]; values above 1 are never wrapped.
#[inline]
pub fn pack_rgb(color: Vector3<f32>) -> u32 {
    let r = (color.x.clamp(0.0, 1.0) * 255.0) as u32;
    let g = (color.y.clamp(0.0, 1.0) * 255.0) as u32;
    let b = (color.z.clamp(0.0, 1.0) * 255.0) as u32;
    (r << 16) | (g << 8) | b
}

/// Color and depth storage for one frame.
///
/// Both planes are atomic so the rasterizer may shade bounding-box rows in
/// parallel: the depth test is a compare-exchange loop and a color write is a
/// single word store, so no two workers can corrupt a pixel.
pub struct FrameBuffer {
    pub width: usize,
    pub height: usize,
    color: Vec<AtomicU32>,
    depth: Vec<AtomicF32>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            color: (0..size).map(|_| AtomicU32::new(0)).collect(),
            depth: (0..size).map(|_| AtomicF32::new(f32::INFINITY)).collect(),
        }
    }

    /// Resets every pixel to the clear color and every depth slot to the
    /// untouched sentinel. Called once at the start of a frame.
    pub fn clear(&mut self, color: Vector3<f32>) {
        let packed = pack_rgb(color);
        for pixel in &self.color {
            pixel.store(packed, Ordering::Relaxed);
        }
        for slot in &self.depth {
            slot.store(f32::INFINITY, Ordering::Relaxed);
        }
    }

    #[inline]
    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Depth test with strictly-closer-wins semantics: equal depths fail, so
    /// the first write for a given depth is kept. On success the slot holds
    /// the new depth when this returns.
    #[inline]
    pub fn depth_test_and_update(&self, x: usize, y: usize, new_depth: f32) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        let slot = &self.depth[self.index(x, y)];

        let mut current = slot.load(Ordering::Relaxed);
        loop {
            if !(new_depth < current) {
                return false;
            }
            match slot.compare_exchange_weak(
                current,
                new_depth,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return true,
                Err(updated) => current = updated,
            }
        }
    }

    /// Writes a linear RGB color, clamped per channel and packed to 8-bit.
    #[inline]
    pub fn set_pixel(&self, x: usize, y: usize, color: Vector3<f32>) {
        if self.in_bounds(x, y) {
            self.color[self.index(x, y)].store(pack_rgb(color), Ordering::Relaxed);
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        if !self.in_bounds(x, y) {
            return None;
        }
        Some(self.color[self.index(x, y)].load(Ordering::Relaxed))
    }

    pub fn depth(&self, x: usize, y: usize) -> Option<f32> {
        if !self.in_bounds(x, y) {
            return None;
        }
        Some(self.depth[self.index(x, y)].load(Ordering::Relaxed))
    }

    /// Copies the packed color plane out for presentation.
    pub fn snapshot(&self) -> Vec<u32> {
        self.color
            .iter()
            .map(|pixel| pixel.load(Ordering::Relaxed))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_resets_color_and_depth() {
        let mut fb = FrameBuffer::new(4, 4);
        fb.set_pixel(1, 1, Vector3::new(1.0, 0.0, 0.0));
        assert!(fb.depth_test_and_update(1, 1, 0.5));

        fb.clear(Vector3::zeros());
        assert_eq!(fb.pixel(1, 1), Some(0));
        assert_eq!(fb.depth(1, 1), Some(f32::INFINITY));
    }

    #[test]
    fn strictly_closer_depth_wins() {
        let fb = FrameBuffer::new(2, 2);
        assert!(fb.depth_test_and_update(0, 0, 0.8));
        assert!(fb.depth_test_and_update(0, 0, 0.3));
        assert!(!fb.depth_test_and_update(0, 0, 0.5));
        assert_eq!(fb.depth(0, 0), Some(0.3));
    }

    #[test]
    fn equal_depth_keeps_first_write() {
        let fb = FrameBuffer::new(2, 2);
        assert!(fb.depth_test_and_update(1, 0, 0.5));
        assert!(!fb.depth_test_and_update(1, 0, 0.5));
    }

    #[test]
    fn out_of_bounds_writes_are_ignored() {
        let fb = FrameBuffer::new(2, 2);
        assert!(!fb.depth_test_and_update(5, 0, 0.1));
        fb.set_pixel(5, 0, Vector3::new(1.0, 1.0, 1.0));
        assert_eq!(fb.pixel(5, 0), None);
    }

    #[test]
    fn pack_clamps_instead_of_wrapping() {
        assert_eq!(pack_rgb(Vector3::new(2.0, -1.0, 1.0)), 0x00FF00FF);
    }
}
