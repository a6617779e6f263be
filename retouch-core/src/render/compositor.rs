use rayon::prelude::*;

use crate::{
    adjust::state::AdjustmentState,
    foundation::{
        core::{Affine, PixelBuffer, Point, Rgba8, Vec2},
        error::{RetouchError, RetouchResult},
    },
};

/// Draw-time orientation. Never baked into the working buffer.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Orientation {
    /// Clockwise, in degrees.
    pub rotation_deg: f32,
    pub flip_horizontal: bool,
    pub flip_vertical: bool,
}

impl From<&AdjustmentState> for Orientation {
    fn from(adj: &AdjustmentState) -> Self {
        Self {
            rotation_deg: adj.rotation,
            flip_horizontal: adj.flip_horizontal,
            flip_vertical: adj.flip_vertical,
        }
    }
}

impl Orientation {
    pub fn is_identity(&self) -> bool {
        let (cos, sin) = snapped_cos_sin(self.rotation_deg);
        sin == 0.0 && cos == 1.0 && !self.flip_horizontal && !self.flip_vertical
    }
}

/// Target surface size plus the source-to-surface mapping.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawTransform {
    pub width: u32,
    pub height: u32,
    pub affine: Affine,
}

impl DrawTransform {
    /// Translate to the surface center, rotate, flip, then draw the source centered on the origin.
    pub fn for_orientation(src_width: u32, src_height: u32, o: Orientation) -> Self {
        let (cos, sin) = snapped_cos_sin(o.rotation_deg);
        let (w, h) = (f64::from(src_width), f64::from(src_height));
        let out_w = (w * cos.abs() + h * sin.abs() - 1e-9).ceil().max(1.0);
        let out_h = (w * sin.abs() + h * cos.abs() - 1e-9).ceil().max(1.0);

        let sx = if o.flip_horizontal { -1.0 } else { 1.0 };
        let sy = if o.flip_vertical { -1.0 } else { 1.0 };

        let affine = Affine::translate(Vec2::new(out_w / 2.0, out_h / 2.0))
            * Affine::new([cos, sin, -sin, cos, 0.0, 0.0])
            * Affine::scale_non_uniform(sx, sy)
            * Affine::translate(Vec2::new(-w / 2.0, -h / 2.0));

        Self {
            width: out_w as u32,
            height: out_h as u32,
            affine,
        }
    }
}

/// Cosine and sine of a clockwise angle, exact for multiples of 90 degrees.
fn snapped_cos_sin(deg: f32) -> (f64, f64) {
    let deg = f64::from(deg).rem_euclid(360.0);
    if deg.fract() == 0.0 && (deg as u32).is_multiple_of(90) {
        return match deg as u32 {
            90 => (0.0, 1.0),
            180 => (-1.0, 0.0),
            270 => (0.0, -1.0),
            _ => (1.0, 0.0),
        };
    }
    let rad = deg.to_radians();
    (rad.cos(), rad.sin())
}

/// Presentation surface capability: draw a buffer through a transform onto a fresh surface.
pub trait Renderer {
    fn draw(&mut self, buffer: &PixelBuffer, transform: &DrawTransform)
    -> RetouchResult<PixelBuffer>;
}

/// Settings for [`CpuRenderer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderSettings {
    /// Fill for surface pixels not covered by the source (straight RGBA8).
    pub clear_rgba: Rgba8,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            clear_rgba: [0, 0, 0, 0],
        }
    }
}

/// Software renderer using inverse mapping with nearest-neighbour sampling.
#[derive(Clone, Debug, Default)]
pub struct CpuRenderer {
    settings: RenderSettings,
}

impl CpuRenderer {
    pub fn new(settings: RenderSettings) -> Self {
        Self { settings }
    }
}

impl Renderer for CpuRenderer {
    fn draw(
        &mut self,
        buffer: &PixelBuffer,
        transform: &DrawTransform,
    ) -> RetouchResult<PixelBuffer> {
        let det = transform.affine.determinant();
        if !det.is_finite() || det.abs() < 1e-12 {
            return Err(RetouchError::evaluation("draw transform is not invertible"));
        }
        let inv = transform.affine.inverse();
        let mut out = PixelBuffer::filled(transform.width, transform.height, self.settings.clear_rgba)?;
        let (src_w, src_h) = (i64::from(buffer.width()), i64::from(buffer.height()));
        let src = buffer.data();
        let src_stride = buffer.stride();
        let stride = out.stride();

        out.data_mut()
            .par_chunks_mut(stride)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, px) in row.chunks_exact_mut(4).enumerate() {
                    let p = inv * Point::new(x as f64 + 0.5, y as f64 + 0.5);
                    let (sx, sy) = (p.x.floor() as i64, p.y.floor() as i64);
                    if sx < 0 || sy < 0 || sx >= src_w || sy >= src_h {
                        continue;
                    }
                    let i = (sy as usize) * src_stride + (sx as usize) * 4;
                    px.copy_from_slice(&src[i..i + 4]);
                }
            });
        Ok(out)
    }
}

/// Draw `working` with the orientation carried by `adj`.
pub fn composite(
    renderer: &mut dyn Renderer,
    working: &PixelBuffer,
    adj: &AdjustmentState,
) -> RetouchResult<PixelBuffer> {
    let orientation = Orientation::from(adj);
    let transform = DrawTransform::for_orientation(working.width(), working.height(), orientation);
    renderer.draw(working, &transform)
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
