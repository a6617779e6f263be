use std::time::Instant;

use crate::{
    adjust::{
        state::AdjustmentState,
        tone::{ToneParams, apply_tone_in_place},
    },
    effects::{post::apply_post_in_place, spatial::apply_spatial_in_place},
    foundation::{core::PixelBuffer, error::RetouchResult},
};

/// Seed used for grain when the caller does not pick one.
pub const DEFAULT_GRAIN_SEED: u64 = 0x5EED_6A1A_0000_0001;

/// Knobs that affect pipeline output without being part of the adjustment state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PipelineOpts {
    pub grain_seed: u64,
}

impl Default for PipelineOpts {
    fn default() -> Self {
        Self {
            grain_seed: DEFAULT_GRAIN_SEED,
        }
    }
}

/// Render `original` through the full pixel pipeline with default options.
///
/// See [`render_with`].
pub fn render(original: &PixelBuffer, adj: &AdjustmentState) -> RetouchResult<PixelBuffer> {
    render_with(original, adj, &PipelineOpts::default())
}

/// Produce a fresh working buffer from `original`.
///
/// Stages, in order:
/// 1. tone and color, per pixel, clamped once at the end
/// 2. spatial filters (clarity, dehaze, sharpen, blur)
/// 3. post effects (vignette, grain)
///
/// The function is pure: the same inputs give bit-identical output, and `original` is never
/// modified. Rotation and flips are not applied here; see [`crate::Renderer`].
#[tracing::instrument(skip_all, fields(width = original.width(), height = original.height()))]
pub fn render_with(
    original: &PixelBuffer,
    adj: &AdjustmentState,
    opts: &PipelineOpts,
) -> RetouchResult<PixelBuffer> {
    adj.validate()?;
    let started = Instant::now();

    let mut out = original.clone();
    if !adj.is_pixel_identity() {
        apply_tone_in_place(&mut out, &ToneParams::new(adj));
        apply_spatial_in_place(&mut out, adj);
        apply_post_in_place(&mut out, adj, opts.grain_seed);
    }

    tracing::debug!(
        elapsed_us = started.elapsed().as_micros() as u64,
        "pipeline render"
    );
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
