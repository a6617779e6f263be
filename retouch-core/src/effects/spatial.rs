use rayon::prelude::*;

use crate::{
    adjust::state::AdjustmentState,
    foundation::{core::PixelBuffer, math::to_u8},
};

const CLARITY_RADIUS: u32 = 2;
const DEHAZE_ATMOSPHERE: f32 = 220.0;

/// Run clarity, dehaze, sharpen and blur in that order.
///
/// Every operator reads a frozen copy of its input, and an operator whose slider is 0 does not
/// touch the buffer.
pub(crate) fn apply_spatial_in_place(buf: &mut PixelBuffer, adj: &AdjustmentState) {
    clarity_in_place(buf, adj.clarity);
    dehaze_in_place(buf, adj.dehaze);
    sharpen_in_place(buf, adj.sharpness);
    box_blur_in_place(buf, adj.blur);
}

/// Local contrast: push each channel away from its radius-2 box mean.
pub(crate) fn clarity_in_place(buf: &mut PixelBuffer, clarity: f32) {
    if clarity <= 0.0 {
        return;
    }
    let strength = clarity / 100.0;
    let src = buf.clone();
    let sums = box_sums(&src, CLARITY_RADIUS);
    let count = box_area(CLARITY_RADIUS) as f32;
    let stride = buf.stride();

    buf.data_mut()
        .par_chunks_mut(stride)
        .zip(sums.par_chunks(stride))
        .for_each(|(row, sum_row)| {
            for (px, sum) in row.chunks_exact_mut(4).zip(sum_row.chunks_exact(4)) {
                for c in 0..3 {
                    let v = f32::from(px[c]);
                    let mean = sum[c] as f32 / count;
                    px[c] = to_u8(v + (v - mean) * strength);
                }
            }
        });
}

/// Constant atmospheric-light haze removal.
pub(crate) fn dehaze_in_place(buf: &mut PixelBuffer, dehaze: f32) {
    if dehaze <= 0.0 {
        return;
    }
    let transmission = 1.0 - 0.5 * (dehaze / 100.0);
    let veil = DEHAZE_ATMOSPHERE * (1.0 - transmission);
    let stride = buf.stride();

    buf.data_mut().par_chunks_mut(stride).for_each(|row| {
        for px in row.chunks_exact_mut(4) {
            for c in &mut px[..3] {
                *c = to_u8((f32::from(*c) - veil) / transmission);
            }
        }
    });
}

/// 3x3 cross sharpen kernel on interior pixels, blended with the input by `sharpness / 100`.
pub(crate) fn sharpen_in_place(buf: &mut PixelBuffer, sharpness: f32) {
    if sharpness <= 0.0 {
        return;
    }
    let (w, h) = (buf.width() as usize, buf.height() as usize);
    if w < 3 || h < 3 {
        return;
    }
    let strength = sharpness / 100.0;
    let src = buf.clone();
    let src = src.data();
    let stride = buf.stride();

    buf.data_mut()
        .par_chunks_mut(stride)
        .enumerate()
        .skip(1)
        .take(h - 2)
        .for_each(|(y, row)| {
            for x in 1..w - 1 {
                let i = y * stride + x * 4;
                for c in 0..3 {
                    let center = f32::from(src[i + c]);
                    let conv = 5.0 * center
                        - f32::from(src[i - stride + c])
                        - f32::from(src[i + stride + c])
                        - f32::from(src[i - 4 + c])
                        - f32::from(src[i + 4 + c]);
                    row[x * 4 + c] = to_u8(center + (conv - center) * strength);
                }
            }
        });
}

/// Square box blur with radius `ceil(blur / 10)` and edge-clamped sampling.
pub(crate) fn box_blur_in_place(buf: &mut PixelBuffer, blur: f32) {
    if blur <= 0.0 {
        return;
    }
    let radius = (blur / 10.0).ceil() as u32;
    let src = buf.clone();
    let sums = box_sums(&src, radius);
    let count = box_area(radius);
    let stride = buf.stride();

    buf.data_mut()
        .par_chunks_mut(stride)
        .zip(sums.par_chunks(stride))
        .for_each(|(row, sum_row)| {
            for (px, sum) in row.chunks_exact_mut(4).zip(sum_row.chunks_exact(4)) {
                for c in 0..3 {
                    px[c] = ((sum[c] + count / 2) / count) as u8;
                }
            }
        });
}

fn box_area(radius: u32) -> u32 {
    (2 * radius + 1) * (2 * radius + 1)
}

/// Per-channel sums over the `(2r+1)^2` neighbourhood with clamped edges.
///
/// Clamping is per axis, so the square sum factors into a horizontal then a vertical pass.
fn box_sums(src: &PixelBuffer, radius: u32) -> Vec<u32> {
    let w = src.width() as i64;
    let h = src.height() as i64;
    let r = i64::from(radius);
    let stride = src.stride();
    let data = src.data();

    let mut horiz = vec![0u32; data.len()];
    horiz
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, row)| {
            let base = y * stride;
            for x in 0..w {
                let mut acc = [0u32; 4];
                for dx in -r..=r {
                    let sx = (x + dx).clamp(0, w - 1) as usize;
                    let i = base + sx * 4;
                    for c in 0..4 {
                        acc[c] += u32::from(data[i + c]);
                    }
                }
                row[(x as usize) * 4..(x as usize) * 4 + 4].copy_from_slice(&acc);
            }
        });

    let mut out = vec![0u32; data.len()];
    out.par_chunks_mut(stride).enumerate().for_each(|(y, row)| {
        let y = y as i64;
        for x in 0..(w as usize) {
            let mut acc = [0u32; 4];
            for dy in -r..=r {
                let sy = (y + dy).clamp(0, h - 1) as usize;
                let i = sy * stride + x * 4;
                for c in 0..4 {
                    acc[c] += horiz[i + c];
                }
            }
            row[x * 4..x * 4 + 4].copy_from_slice(&acc);
        }
    });
    out
}

#[cfg(test)]
#[path = "../../tests/unit/effects/spatial.rs"]
mod tests;
