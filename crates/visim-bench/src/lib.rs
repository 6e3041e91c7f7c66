//! Benchmarks for visim. Run with `cargo bench -p visim-bench`.
//!
//! The library part only provides deterministic test images.

use visim_core::{RgbBuffer, RgbaImage};

/// Smooth linear-RGB gradient with a red/green split.
pub fn linear_gradient(size: u32) -> RgbBuffer {
    let s = size.max(1) as f32;
    RgbBuffer::from_fn(size, size, |x, y| {
        let u = x as f32 / s;
        let v = y as f32 / s;
        if x < size / 2 {
            [0.2 + 0.6 * u, 0.2 * v, 0.1]
        } else {
            [0.2 * v, 0.2 + 0.6 * u, 0.1]
        }
    })
}

/// Opaque RGBA version of [`linear_gradient`] in sRGB bytes.
pub fn rgba_gradient(size: u32) -> RgbaImage {
    let alpha = vec![255u8; size as usize * size as usize];
    match visim_color::convert::linear_to_rgba(&linear_gradient(size), &alpha) {
        Ok(img) => img,
        Err(_) => RgbaImage::new(size, size),
    }
}
