//! Row-parallel helpers.
//!
//! Every transform partitions its work by image row. With the `parallel`
//! feature the rows go through Rayon's `par_chunks_mut`; without it the
//! same closures run in a plain loop. Results are identical either way:
//! each row is written by exactly one closure and ordered reductions are
//! collected in row order.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use visim_core::RgbBuffer;
use visim_math::Vec3;

/// Runs `f(y, row)` over each `row_len`-sized chunk of `data`.
pub fn for_each_row<F>(data: &mut [f32], row_len: usize, f: F)
where
    F: Fn(usize, &mut [f32]) + Sync + Send,
{
    if row_len == 0 {
        return;
    }
    #[cfg(feature = "parallel")]
    data.par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| f(y, row));

    #[cfg(not(feature = "parallel"))]
    data.chunks_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| f(y, row));
}

/// Evaluates `f(y)` for `0..rows`, returning results in row order.
pub fn map_rows<T, F>(rows: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        (0..rows).into_par_iter().map(f).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        (0..rows).map(f).collect()
    }
}

/// Applies a per-pixel color map, producing a new buffer.
///
/// The triplet is widened to `f64` before `f` sees it.
pub fn map_pixels<F>(src: &RgbBuffer, f: F) -> RgbBuffer
where
    F: Fn(Vec3) -> Vec3 + Sync + Send,
{
    let mut dst = src.clone();
    let row_len = src.row_len();
    for_each_row(dst.data_mut(), row_len, |_, row| {
        for px in row.chunks_exact_mut(3) {
            let out = f(Vec3::from_f32([px[0], px[1], px[2]])).to_f32();
            px.copy_from_slice(&out);
        }
    });
    dst
}

/// Pairwise sum in a fixed tree order.
///
/// The split points depend only on `items.len()`, so the result is the
/// same on every run regardless of thread count.
pub fn pairwise_sum<T>(items: &[T]) -> T
where
    T: Copy + Default + std::ops::Add<Output = T>,
{
    match items.len() {
        0 => T::default(),
        1 => items[0],
        n => {
            let (lo, hi) = items.split_at(n / 2);
            pairwise_sum(lo) + pairwise_sum(hi)
        }
    }
}
