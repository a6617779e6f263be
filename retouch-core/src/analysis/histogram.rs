use crate::foundation::{core::PixelBuffer, math::luma};

/// Per-channel and luma histograms over a buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Histogram {
    pub r: [u32; 256],
    pub g: [u32; 256],
    pub b: [u32; 256],
    pub luma: [u32; 256],
}

impl Histogram {
    /// Mean of the luma histogram, 0..255.
    pub fn mean_luma(&self) -> f64 {
        let (sum, n) = self
            .luma
            .iter()
            .enumerate()
            .fold((0u64, 0u64), |(s, n), (v, &c)| {
                (s + v as u64 * u64::from(c), n + u64::from(c))
            });
        if n == 0 { 0.0 } else { sum as f64 / n as f64 }
    }
}

pub fn histogram(buf: &PixelBuffer) -> Histogram {
    let mut h = Histogram {
        r: [0; 256],
        g: [0; 256],
        b: [0; 256],
        luma: [0; 256],
    };
    for px in buf.data().chunks_exact(4) {
        h.r[px[0] as usize] += 1;
        h.g[px[1] as usize] += 1;
        h.b[px[2] as usize] += 1;
        let l = luma(f32::from(px[0]), f32::from(px[1]), f32::from(px[2]));
        h.luma[l.round().clamp(0.0, 255.0) as usize] += 1;
    }
    h
}

/// Channel sums, minima and maxima used by the auto operators.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ChannelStats {
    pub(crate) mean: [f64; 3],
    pub(crate) min: [u8; 3],
    pub(crate) max: [u8; 3],
}

pub(crate) fn channel_stats(buf: &PixelBuffer) -> ChannelStats {
    let mut sum = [0u64; 3];
    let mut min = [u8::MAX; 3];
    let mut max = [u8::MIN; 3];
    for px in buf.data().chunks_exact(4) {
        for c in 0..3 {
            sum[c] += u64::from(px[c]);
            min[c] = min[c].min(px[c]);
            max[c] = max[c].max(px[c]);
        }
    }
    let n = buf.pixel_count() as f64;
    ChannelStats {
        mean: sum.map(|s| s as f64 / n),
        min,
        max,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/analysis/histogram.rs"]
mod tests;
