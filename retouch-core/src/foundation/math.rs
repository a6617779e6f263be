/// Rec. 601 style luma weights used by saturation, histograms and auto enhance.
pub(crate) const LUMA_R: f32 = 0.2989;
pub(crate) const LUMA_G: f32 = 0.587;
pub(crate) const LUMA_B: f32 = 0.114;

pub(crate) fn luma(r: f32, g: f32, b: f32) -> f32 {
    LUMA_R * r + LUMA_G * g + LUMA_B * b
}

/// Round and clamp a working value to a channel byte.
#[inline]
pub(crate) fn to_u8(v: f32) -> u8 {
    if v.is_nan() {
        return 0;
    }
    v.round().clamp(0.0, 255.0) as u8
}

/// SplitMix64 finalizer. Cheap, stateless, and stable across platforms.
#[inline]
pub(crate) fn mix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Uniform sample in `[0, 1)` derived from a seed and a stream position.
#[inline]
pub(crate) fn unit_noise(seed: u64, index: u64) -> f32 {
    let bits = mix64(seed ^ mix64(index)) >> 40;
    (bits as f32) / ((1u64 << 24) as f32)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
