use rayon::prelude::*;

use crate::{
    analysis::histogram::channel_stats,
    foundation::{core::PixelBuffer, math::to_u8},
};

/// Gray-world white balance: scale each channel so its mean matches the mean of all three.
///
/// A channel with a zero mean has nothing to scale and is left as is.
pub fn auto_white_balance(src: &PixelBuffer) -> PixelBuffer {
    let stats = channel_stats(src);
    let gray = (stats.mean[0] + stats.mean[1] + stats.mean[2]) / 3.0;
    let scale = stats
        .mean
        .map(|m| if m > 0.0 { (gray / m) as f32 } else { 1.0 });
    map_rgb(src, |c, v| f32::from(v) * scale[c])
}

/// Stretch each channel so its darkest value maps to 0 and its brightest to 255.
///
/// A flat channel (min == max) is left unchanged.
pub fn auto_levels(src: &PixelBuffer) -> PixelBuffer {
    let stats = channel_stats(src);
    let ranges: [Option<(f32, f32)>; 3] = std::array::from_fn(|c| {
        let (lo, hi) = (stats.min[c], stats.max[c]);
        (hi > lo).then(|| (f32::from(lo), 255.0 / f32::from(hi - lo)))
    });
    map_rgb(src, |c, v| match ranges[c] {
        Some((lo, k)) => (f32::from(v) - lo) * k,
        None => f32::from(v),
    })
}

fn map_rgb(src: &PixelBuffer, f: impl Fn(usize, u8) -> f32 + Sync) -> PixelBuffer {
    let mut out = src.clone();
    let stride = out.stride();
    out.data_mut().par_chunks_mut(stride).for_each(|row| {
        for px in row.chunks_exact_mut(4) {
            for c in 0..3 {
                px[c] = to_u8(f(c, px[c]));
            }
        }
    });
    out
}

#[cfg(test)]
#[path = "../../tests/unit/effects/auto.rs"]
mod tests;
