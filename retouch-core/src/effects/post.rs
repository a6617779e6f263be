use rayon::prelude::*;

use crate::{
    adjust::state::AdjustmentState,
    foundation::{
        core::PixelBuffer,
        math::{to_u8, unit_noise},
    },
};

/// Vignette then grain. Both are skipped when their amount is 0.
pub(crate) fn apply_post_in_place(buf: &mut PixelBuffer, adj: &AdjustmentState, grain_seed: u64) {
    vignette_in_place(buf, adj.vignette_amount, adj.vignette_radius);
    grain_in_place(buf, adj.grain, grain_seed);
}

/// Radial darkening measured from the image center in units of the half-diagonal.
///
/// A radius of 0 leaves nothing inside the falloff band, so it is a no-op.
pub(crate) fn vignette_in_place(buf: &mut PixelBuffer, amount: f32, radius: f32) {
    if amount <= 0.0 || radius <= 0.0 {
        return;
    }
    let strength = amount / 100.0;
    let radius = radius.min(1.0);
    let cx = buf.width() as f32 / 2.0;
    let cy = buf.height() as f32 / 2.0;
    let max_dist = (cx * cx + cy * cy).sqrt();
    let stride = buf.stride();

    buf.data_mut()
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, row)| {
            let dy = y as f32 + 0.5 - cy;
            for (x, px) in row.chunks_exact_mut(4).enumerate() {
                let dx = x as f32 + 0.5 - cx;
                let dist = (dx * dx + dy * dy).sqrt() / max_dist;
                let t = ((dist - (1.0 - radius)) / radius).clamp(0.0, 1.0);
                let factor = 1.0 - t * t * strength;
                for c in &mut px[..3] {
                    *c = to_u8(f32::from(*c) * factor);
                }
            }
        });
}

/// Additive uniform noise in `[-s/2, s/2)` with `s = grain / 100 * 50`, independent per channel.
///
/// Noise is a pure function of `(seed, pixel index, channel)` so renders stay reproducible.
pub(crate) fn grain_in_place(buf: &mut PixelBuffer, grain: f32, seed: u64) {
    if grain <= 0.0 {
        return;
    }
    let strength = (grain / 100.0) * 50.0;
    let width = buf.width() as u64;
    let stride = buf.stride();

    buf.data_mut()
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, px) in row.chunks_exact_mut(4).enumerate() {
                let base = ((y as u64) * width + x as u64) * 4;
                for (c, v) in px[..3].iter_mut().enumerate() {
                    let n = (unit_noise(seed, base + c as u64) - 0.5) * strength;
                    *v = to_u8(f32::from(*v) + n);
                }
            }
        });
}

#[cfg(test)]
#[path = "../../tests/unit/effects/post.rs"]
mod tests;
