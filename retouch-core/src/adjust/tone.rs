use rayon::prelude::*;

use crate::{
    adjust::{
        color::{hsl_to_rgb, rgb_to_hsl},
        state::AdjustmentState,
    },
    foundation::{
        core::PixelBuffer,
        math::{luma, to_u8},
    },
};

/// Per-pixel tone and color parameters, resolved once per render.
///
/// `None` marks a step whose slider sits at its neutral value; those steps are skipped
/// entirely so a neutral state leaves every byte untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct ToneParams {
    exposure_mul: Option<f32>,
    brightness_add: Option<f32>,
    contrast_k: Option<f32>,
    temperature: Option<f32>,
    tint: Option<f32>,
    vibrance: Option<f32>,
    saturation_k: Option<f32>,
    hue_turns: Option<f32>,
    highlights: Option<f32>,
    shadows: Option<f32>,
}

fn active(v: f32) -> Option<f32> {
    (v != 0.0).then_some(v)
}

impl ToneParams {
    pub(crate) fn new(adj: &AdjustmentState) -> Self {
        Self {
            exposure_mul: active(adj.exposure).map(|e| 2f32.powf(e / 100.0)),
            brightness_add: active(adj.brightness).map(|b| (b / 100.0) * 255.0),
            contrast_k: active(adj.contrast).map(|c| (c + 100.0) / 100.0),
            temperature: active(adj.temperature).map(|t| t / 100.0),
            tint: active(adj.tint).map(|t| t / 100.0),
            vibrance: active(adj.vibrance).map(|v| v / 100.0),
            saturation_k: active(adj.saturation).map(|s| (s + 100.0) / 100.0),
            hue_turns: active(adj.hue).map(|h| h / 360.0),
            highlights: active(adj.highlights).map(|h| h / 100.0),
            shadows: active(adj.shadows).map(|s| s / 100.0),
        }
    }

    pub(crate) fn is_identity(&self) -> bool {
        *self == Self::default()
    }

    /// Run the ordered tone chain on one pixel. No clamping happens here.
    pub(crate) fn apply(&self, px: [f32; 3]) -> [f32; 3] {
        let [mut r, mut g, mut b] = px;

        if let Some(k) = self.exposure_mul {
            r *= k;
            g *= k;
            b *= k;
        }

        if let Some(add) = self.brightness_add {
            r += add;
            g += add;
            b += add;
        }

        if let Some(k) = self.contrast_k {
            r = (r - 128.0) * k + 128.0;
            g = (g - 128.0) * k + 128.0;
            b = (b - 128.0) * k + 128.0;
        }

        if let Some(t) = self.temperature {
            let t = t * 255.0;
            if t > 0.0 {
                r += 0.3 * t;
                g += 0.15 * t;
                b -= 0.3 * t;
            } else {
                r += 0.2 * t;
                g -= 0.05 * t;
                b -= 0.3 * t;
            }
        }

        if let Some(t) = self.tint {
            let t = t * 255.0;
            if t > 0.0 {
                r += 0.2 * t;
                g -= 0.2 * t;
                b += 0.2 * t;
            } else {
                r += 0.1 * t;
                g -= 0.2 * t;
                b += 0.1 * t;
            }
        }

        if let Some(v) = self.vibrance {
            let max = r.max(g).max(b);
            let avg = (r + g + b) / 3.0;
            // Positive vibrance moves the minor channels away from the dominant one.
            let amt = ((max - avg).abs() * 2.0 / 255.0) * -v;
            if r != max {
                r += (max - r) * amt;
            }
            if g != max {
                g += (max - g) * amt;
            }
            if b != max {
                b += (max - b) * amt;
            }
        }

        if let Some(k) = self.saturation_k {
            let gray = luma(r, g, b);
            r = gray + (r - gray) * k;
            g = gray + (g - gray) * k;
            b = gray + (b - gray) * k;
        }

        if let Some(turns) = self.hue_turns {
            let (h, s, l) = rgb_to_hsl(r / 255.0, g / 255.0, b / 255.0);
            let (nr, ng, nb) = hsl_to_rgb((h + turns).rem_euclid(1.0), s, l);
            r = nr * 255.0;
            g = ng * 255.0;
            b = nb * 255.0;
        }

        if self.highlights.is_some() || self.shadows.is_some() {
            let lum = (r + g + b) / 3.0 / 255.0;
            let k = if lum > 0.5 {
                1.0 + self.highlights.unwrap_or(0.0) * (lum - 0.5) * 2.0
            } else {
                1.0 + self.shadows.unwrap_or(0.0) * (0.5 - lum) * 2.0
            };
            r *= k;
            g *= k;
            b *= k;
        }

        [r, g, b]
    }
}

/// Apply the tone chain to every pixel in place, clamping once at the end. Alpha is kept.
pub(crate) fn apply_tone_in_place(buf: &mut PixelBuffer, params: &ToneParams) {
    if params.is_identity() {
        return;
    }
    let stride = buf.stride();
    buf.data_mut().par_chunks_mut(stride).for_each(|row| {
        for px in row.chunks_exact_mut(4) {
            let out = params.apply([f32::from(px[0]), f32::from(px[1]), f32::from(px[2])]);
            px[0] = to_u8(out[0]);
            px[1] = to_u8(out[1]);
            px[2] = to_u8(out[2]);
        }
    });
}

#[cfg(test)]
#[path = "../../tests/unit/adjust/tone.rs"]
mod tests;
