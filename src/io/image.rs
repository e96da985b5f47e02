use crate::core::framebuffer::FrameBuffer;
use image::{ImageBuffer, Rgb};
use std::path::Path;

/// Presents a finished frame by writing it to an image file.
/// The format follows the file extension.
pub fn save_framebuffer<P: AsRef<Path>>(framebuffer: &FrameBuffer, path: P) -> Result<(), String> {
    let pixels = framebuffer.snapshot();
    let width = framebuffer.width;

    let img = ImageBuffer::from_fn(width as u32, framebuffer.height as u32, |x, y| {
        let packed = pixels[y as usize * width + x as usize];
        Rgb([
            ((packed >> 16) & 0xFF) as u8,
            ((packed >> 8) & 0xFF) as u8,
            (packed & 0xFF) as u8,
        ])
    });

    let path = path.as_ref();
    img.save(path)
        .map_err(|e| format!("failed to save frame to {}: {}", path.display(), e))
}
