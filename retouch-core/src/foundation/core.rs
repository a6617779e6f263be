use crate::foundation::error::{RetouchError, RetouchResult};

pub use kurbo::{Affine, Point, Vec2};

/// Straight (non-premultiplied) RGBA8 pixel.
pub type Rgba8 = [u8; 4];

/// Owned straight-alpha RGBA8 raster.
///
/// `data.len() == width * height * 4` holds for every value of this type; the fields are private
/// so the only way in is through the checked constructors.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap raw RGBA8 bytes, checking the length against the dimensions.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> RetouchResult<Self> {
        let expected = rgba_len(width, height)?;
        if data.len() != expected {
            return Err(RetouchError::validation(format!(
                "pixel buffer length {} does not match {width}x{height}x4 = {expected}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A buffer where every pixel is `px`.
    pub fn filled(width: u32, height: u32, px: Rgba8) -> RetouchResult<Self> {
        let len = rgba_len(width, height)?;
        Self::new(width, height, px.repeat(len / 4))
    }

    /// Build a buffer by evaluating `f(x, y)` for every pixel in row-major order.
    pub fn from_fn(
        width: u32,
        height: u32,
        mut f: impl FnMut(u32, u32) -> Rgba8,
    ) -> RetouchResult<Self> {
        let mut data = Vec::with_capacity(rgba_len(width, height)?);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&f(x, y));
            }
        }
        Self::new(width, height, data)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn pixel_count(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable access to the bytes. The length cannot change through a slice.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Pixel at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    pub fn same_dimensions(&self, other: &PixelBuffer) -> bool {
        self.dimensions() == other.dimensions()
    }

    /// Row stride in bytes.
    pub fn stride(&self) -> usize {
        (self.width as usize) * 4
    }

    pub fn to_rgba_image(&self) -> RetouchResult<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.data.clone())
            .ok_or_else(|| RetouchError::evaluation("pixel buffer does not fit an RgbaImage"))
    }

    pub fn from_rgba_image(img: image::RgbaImage) -> RetouchResult<Self> {
        let (width, height) = img.dimensions();
        Self::new(width, height, img.into_raw())
    }
}

/// Byte length of a `width x height` RGBA8 raster, rejecting empty and overflowing shapes.
pub(crate) fn rgba_len(width: u32, height: u32) -> RetouchResult<usize> {
    if width == 0 || height == 0 {
        return Err(RetouchError::validation(
            "pixel buffer dimensions must be > 0",
        ));
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| RetouchError::validation("pixel buffer size overflow"))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
