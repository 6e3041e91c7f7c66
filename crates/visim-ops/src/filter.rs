//! Separable Gaussian blur for single-channel planes.
//!
//! Planes are flat row-major `f32` slices. Out-of-range taps are clamped to
//! the nearest border sample (edge replication).
//!
//! # Degenerate sigmas
//!
//! [`ChannelTreatment::for_sigma`] decides how a plane is handled before
//! any kernel is built:
//!
//! | Sigma | Treatment |
//! |-------|-----------|
//! | `<= 0.01` | [`PassThrough`](ChannelTreatment::PassThrough) |
//! | `>= 0.25 * min(width, height)` | [`Flatten`](ChannelTreatment::Flatten) to the plane mean |
//! | otherwise | [`Gaussian`](ChannelTreatment::Gaussian) with radius `max(1, ceil(3 * sigma))` |
//!
//! # Example
//!
//! ```rust
//! use visim_ops::filter::{gaussian_blur, gaussian_kernel_1d};
//!
//! let k = gaussian_kernel_1d(1.0);
//! assert_eq!(k.len(), 7);
//!
//! let src = vec![0.5f32; 16 * 16];
//! let blurred = gaussian_blur(&src, 16, 16, 1.0).unwrap();
//! assert!(blurred.iter().all(|v| (v - 0.5).abs() < 1e-6));
//! ```

use serde::Serialize;
use tracing::{debug, trace};
use visim_core::Error;

use crate::OpsResult;
use crate::parallel::{for_each_row, map_rows, pairwise_sum};

/// Sigmas at or below this pass the plane through unchanged.
pub const PASSTHROUGH_SIGMA: f64 = 0.01;

/// Sigmas at or above this fraction of the shorter side flatten the plane.
pub const FLATTEN_FRACTION: f64 = 0.25;

/// How a plane is blurred for a given sigma.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ChannelTreatment {
    /// Sigma too small to matter; copy the plane.
    PassThrough,
    /// Separable convolution with the given kernel radius.
    Gaussian {
        /// Taps on each side of the centre.
        radius: usize,
    },
    /// Blur wider than the image; replace with the global mean.
    Flatten,
}

impl ChannelTreatment {
    /// Classifies `sigma` (pixels) for a `width x height` plane.
    pub fn for_sigma(sigma: f64, width: usize, height: usize) -> Self {
        let min_dim = width.min(height) as f64;
        if !(sigma > PASSTHROUGH_SIGMA) {
            Self::PassThrough
        } else if sigma >= FLATTEN_FRACTION * min_dim {
            Self::Flatten
        } else {
            Self::Gaussian {
                radius: kernel_radius(sigma),
            }
        }
    }
}

/// Kernel radius for `sigma`: `max(1, ceil(3 * sigma))`.
#[inline]
pub fn kernel_radius(sigma: f64) -> usize {
    ((3.0 * sigma).ceil() as usize).max(1)
}

/// Normalised 1D Gaussian kernel of length `2 * kernel_radius(sigma) + 1`.
pub fn gaussian_kernel_1d(sigma: f64) -> Vec<f32> {
    let radius = kernel_radius(sigma) as i64;
    let two_sigma2 = 2.0 * sigma * sigma;

    let weights: Vec<f64> = (-radius..=radius)
        .map(|x| (-((x * x) as f64) / two_sigma2).exp())
        .collect();
    let sum: f64 = weights.iter().sum();

    weights.iter().map(|w| (w / sum) as f32).collect()
}

fn check_plane(src: &[f32], width: usize, height: usize) -> OpsResult<()> {
    if width == 0 || height == 0 {
        return Err(Error::empty_image(width as u32, height as u32).into());
    }
    let expected = width * height;
    if src.len() != expected {
        return Err(Error::buffer_size(expected, src.len()).into());
    }
    Ok(())
}

/// Blurs a plane with a separable Gaussian, horizontal pass first.
///
/// Always convolves; see [`blur_plane`] for the degenerate-sigma rules.
///
/// # Errors
///
/// Returns `EmptyImage` or `BufferSize` if the plane shape is wrong.
pub fn gaussian_blur(src: &[f32], width: usize, height: usize, sigma: f64) -> OpsResult<Vec<f32>> {
    trace!(width, height, sigma, "gaussian_blur");
    check_plane(src, width, height)?;

    let kernel = gaussian_kernel_1d(sigma);
    let temp = blur_horizontal(src, width, &kernel);
    Ok(blur_vertical(&temp, width, height, &kernel))
}

/// Horizontal pass with clamped x.
fn blur_horizontal(src: &[f32], width: usize, kernel: &[f32]) -> Vec<f32> {
    let radius = (kernel.len() / 2) as isize;
    let last = width as isize - 1;
    let mut dst = vec![0.0f32; src.len()];

    for_each_row(&mut dst, width, |y, row| {
        let line = &src[y * width..(y + 1) * width];
        for (x, out) in row.iter_mut().enumerate() {
            let mut sum = 0.0f32;
            for (k, &w) in kernel.iter().enumerate() {
                let sx = (x as isize + k as isize - radius).clamp(0, last) as usize;
                sum += line[sx] * w;
            }
            *out = sum;
        }
    });
    dst
}

/// Vertical pass with clamped y.
fn blur_vertical(src: &[f32], width: usize, height: usize, kernel: &[f32]) -> Vec<f32> {
    let radius = (kernel.len() / 2) as isize;
    let last = height as isize - 1;
    let mut dst = vec![0.0f32; src.len()];

    for_each_row(&mut dst, width, |y, row| {
        for (k, &w) in kernel.iter().enumerate() {
            let sy = (y as isize + k as isize - radius).clamp(0, last) as usize;
            let line = &src[sy * width..(sy + 1) * width];
            for (out, &v) in row.iter_mut().zip(line) {
                *out += v * w;
            }
        }
    });
    dst
}

/// Mean of a plane, accumulated in `f64` with a fixed reduction order.
pub fn plane_mean(src: &[f32], width: usize) -> f64 {
    if src.is_empty() || width == 0 {
        return 0.0;
    }
    let rows = src.len() / width;
    let partial = map_rows(rows, |y| {
        src[y * width..(y + 1) * width]
            .iter()
            .map(|&v| v as f64)
            .sum::<f64>()
    });
    pairwise_sum(&partial) / src.len() as f64
}

/// Blurs a plane according to [`ChannelTreatment::for_sigma`].
///
/// # Errors
///
/// Returns `EmptyImage` or `BufferSize` if the plane shape is wrong.
pub fn blur_plane(src: &[f32], width: usize, height: usize, sigma: f64) -> OpsResult<Vec<f32>> {
    check_plane(src, width, height)?;

    match ChannelTreatment::for_sigma(sigma, width, height) {
        ChannelTreatment::PassThrough => {
            debug!(sigma, "sigma below threshold, channel passes through");
            Ok(src.to_vec())
        }
        ChannelTreatment::Flatten => {
            let mean = plane_mean(src, width);
            debug!(sigma, mean, "sigma exceeds image, channel flattened to mean");
            Ok(vec![mean as f32; src.len()])
        }
        ChannelTreatment::Gaussian { radius } => {
            debug!(sigma, radius, "gaussian blur");
            gaussian_blur(src, width, height, sigma)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_kernel_normalized_and_symmetric() {
        let k = gaussian_kernel_1d(2.3);
        assert_eq!(k.len(), 2 * 7 + 1);
        assert_abs_diff_eq!(k.iter().sum::<f32>(), 1.0, epsilon = 1e-6);
        for i in 0..k.len() / 2 {
            assert_eq!(k[i], k[k.len() - 1 - i]);
        }
        assert!(k[7] > k[6]);
    }

    #[test]
    fn test_kernel_minimum_radius() {
        assert_eq!(kernel_radius(0.02), 1);
        assert_eq!(gaussian_kernel_1d(0.02).len(), 3);
    }

    #[test]
    fn test_treatment_thresholds() {
        assert_eq!(ChannelTreatment::for_sigma(0.01, 8, 8), ChannelTreatment::PassThrough);
        assert_eq!(ChannelTreatment::for_sigma(-4.0, 8, 8), ChannelTreatment::PassThrough);
        assert_eq!(ChannelTreatment::for_sigma(f64::NAN, 8, 8), ChannelTreatment::PassThrough);
        assert_eq!(ChannelTreatment::for_sigma(2.0, 8, 16), ChannelTreatment::Flatten);
        assert_eq!(
            ChannelTreatment::for_sigma(1.99, 8, 8),
            ChannelTreatment::Gaussian { radius: 6 }
        );
    }

    #[test]
    fn test_blur_preserves_constant_plane() {
        let src = vec![0.25f32; 10 * 6];
        let out = gaussian_blur(&src, 10, 6, 1.2).unwrap();
        for v in out {
            assert_abs_diff_eq!(v, 0.25, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_blur_edge_clamping() {
        // A step edge: left half 0, right half 1. With edge replication
        // the outermost columns keep their side's value closely.
        let (w, h) = (32usize, 4usize);
        let src: Vec<f32> = (0..w * h)
            .map(|i| if i % w >= w / 2 { 1.0 } else { 0.0 })
            .collect();
        let out = gaussian_blur(&src, w, h, 1.0).unwrap();
        assert_abs_diff_eq!(out[0], 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(out[w - 1], 1.0, epsilon = 1e-6);
        // symmetric around the edge
        assert_abs_diff_eq!(out[w / 2 - 1] + out[w / 2], 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_blur_spreads_impulse() {
        let (w, h) = (9usize, 9usize);
        let mut src = vec![0.0f32; w * h];
        src[4 * w + 4] = 1.0;
        let out = gaussian_blur(&src, w, h, 1.0).unwrap();
        assert!(out[4 * w + 4] < 1.0);
        assert!(out[4 * w + 5] > 0.0);
        assert_abs_diff_eq!(out[4 * w + 3], out[4 * w + 5], epsilon = 1e-7);
        assert_abs_diff_eq!(out[3 * w + 4], out[4 * w + 3], epsilon = 1e-7);
        assert_abs_diff_eq!(out.iter().sum::<f32>(), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_blur_plane_flatten() {
        let src: Vec<f32> = (0..16).map(|i| i as f32).collect();
        let out = blur_plane(&src, 4, 4, 1.0).unwrap();
        assert!(out.iter().all(|&v| v == 7.5));
    }

    #[test]
    fn test_blur_plane_passthrough() {
        let src: Vec<f32> = (0..16).map(|i| i as f32).collect();
        assert_eq!(blur_plane(&src, 4, 4, 0.005).unwrap(), src);
    }

    #[test]
    fn test_plane_shape_errors() {
        assert!(gaussian_blur(&[0.0; 5], 2, 2, 1.0).is_err());
        let err = blur_plane(&[], 0, 3, 1.0).unwrap_err();
        assert!(matches!(
            err.as_core(),
            Some(Error::EmptyImage { width: 0, height: 3 })
        ));
    }
}
