use image::imageops::{self, FilterType};

use crate::foundation::{
    core::PixelBuffer,
    error::{RetouchError, RetouchResult},
};

/// Sub-rectangle in source pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    fn validate_within(&self, width: u32, height: u32) -> RetouchResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(RetouchError::validation("crop size must be > 0"));
        }
        let right = u64::from(self.x) + u64::from(self.width);
        let bottom = u64::from(self.y) + u64::from(self.height);
        if right > u64::from(width) || bottom > u64::from(height) {
            return Err(RetouchError::validation(format!(
                "crop {}x{}+{}+{} exceeds image {width}x{height}",
                self.width, self.height, self.x, self.y
            )));
        }
        Ok(())
    }
}

/// Target size for a resize.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ResizeSpec {
    pub width: u32,
    pub height: u32,
    /// Fit inside `width x height` while keeping the source aspect ratio.
    #[serde(default)]
    pub keep_aspect: bool,
}

impl ResizeSpec {
    pub fn exact(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            keep_aspect: false,
        }
    }

    pub fn fit(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            keep_aspect: true,
        }
    }

    /// Output dimensions for a `src_w x src_h` source.
    pub fn resolve(&self, src_w: u32, src_h: u32) -> RetouchResult<(u32, u32)> {
        if self.width == 0 || self.height == 0 {
            return Err(RetouchError::validation("resize target must be > 0"));
        }
        if !self.keep_aspect {
            return Ok((self.width, self.height));
        }
        let scale = (f64::from(self.width) / f64::from(src_w))
            .min(f64::from(self.height) / f64::from(src_h));
        let w = (f64::from(src_w) * scale).round().max(1.0) as u32;
        let h = (f64::from(src_h) * scale).round().max(1.0) as u32;
        Ok((w.min(self.width), h.min(self.height)))
    }
}

/// Copy out `rect`; the result is rebased to `rect.width x rect.height`.
pub fn crop(src: &PixelBuffer, rect: CropRect) -> RetouchResult<PixelBuffer> {
    rect.validate_within(src.width(), src.height())?;
    let src_stride = src.stride();
    let row_bytes = (rect.width as usize) * 4;
    let mut data = Vec::with_capacity(row_bytes * rect.height as usize);
    for y in rect.y..rect.y + rect.height {
        let start = (y as usize) * src_stride + (rect.x as usize) * 4;
        data.extend_from_slice(&src.data()[start..start + row_bytes]);
    }
    PixelBuffer::new(rect.width, rect.height, data)
}

/// Bilinear resample to the resolved target size. Same-size requests return a copy.
pub fn resize(src: &PixelBuffer, spec: ResizeSpec) -> RetouchResult<PixelBuffer> {
    let (w, h) = spec.resolve(src.width(), src.height())?;
    resize_exact(src, w, h)
}

pub(crate) fn resize_exact(src: &PixelBuffer, width: u32, height: u32) -> RetouchResult<PixelBuffer> {
    if (width, height) == src.dimensions() {
        return Ok(src.clone());
    }
    let img = src.to_rgba_image()?;
    let out = imageops::resize(&img, width, height, FilterType::Triangle);
    PixelBuffer::from_rgba_image(out)
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/resample.rs"]
mod tests;
