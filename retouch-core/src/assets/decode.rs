use std::path::Path;

use anyhow::Context as _;

use crate::foundation::{
    core::PixelBuffer,
    error::{RetouchError, RetouchResult},
};

/// Decode any supported container into straight (non-premultiplied) RGBA8.
pub fn decode_image(bytes: &[u8]) -> RetouchResult<PixelBuffer> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| RetouchError::codec(format!("decode image from memory: {e}")))?;
    PixelBuffer::from_rgba_image(dyn_img.to_rgba8())
}

pub fn load_image(path: &Path) -> RetouchResult<PixelBuffer> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
    decode_image(&bytes)
}

impl PixelBuffer {
    /// Read and decode an image file. See [`decode_image`].
    pub fn from_path(path: impl AsRef<Path>) -> RetouchResult<Self> {
        load_image(path.as_ref())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
