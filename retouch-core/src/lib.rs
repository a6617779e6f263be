//! Retouch is a non-destructive image adjustment and rendering engine.
//!
//! An editing session keeps three buffers: `Initial` (the pristine decode), `Original` (the
//! current baseline, rebased by crop, resize and auto enhance) and `Working` (pipeline output).
//! Adjustments are plain values; the working buffer is always recomputed from `Original`.
//!
//! # Pipeline overview
//!
//! 1. **Tone**: exposure, brightness, contrast, temperature, tint, vibrance, saturation, hue,
//!    highlights/shadows, per pixel in floating point, clamped once
//! 2. **Spatial**: clarity, dehaze, sharpen, box blur, each over a frozen copy of its input
//! 3. **Post**: vignette, then seeded grain
//! 4. **Present**: rotation and flips applied at draw time through a [`Renderer`]
//! 5. **Export** (optional): resize and encode through an [`ExportEncoder`], falling back to
//!    WebP with a warning when the requested format is unavailable
//!
//! Rendering is deterministic: the same original, state and grain seed give bit-identical
//! output. `unsafe` is forbidden in this crate.
//!
//! # Getting started
//!
//! ```no_run
//! use retouch::{Adjust, Engine, EngineOpts, ExportFormat, RenderRequest};
//!
//! # fn main() -> retouch::RetouchResult<()> {
//! let mut engine = Engine::new(EngineOpts::from_env())?;
//! engine.open_path("photo.jpg".as_ref())?;
//! engine.set(Adjust::Exposure(20.0))?;
//! engine.rotate_cw()?;
//! let (w, h) = engine.present()?.dimensions();
//! let out = engine.export(&RenderRequest::new(ExportFormat::Png, w, h))?;
//! std::fs::write("photo.png", &out.bytes).map_err(anyhow::Error::from)?;
//! # Ok(())
//! # }
//! ```
#![forbid(unsafe_code)]

mod adjust;
mod analysis;
mod assets;
mod effects;
mod encode;
mod foundation;
mod geometry;
mod render;
mod session;

pub use adjust::state::{Adjust, AdjustmentPatch, AdjustmentState};
pub use analysis::histogram::{Histogram, histogram};
pub use assets::decode::{decode_image, load_image};
pub use effects::auto::{auto_levels, auto_white_balance};
pub use encode::export::{
    ExportEncoder, ExportFormat, ExportWarning, Exported, ImageCrateEncoder, RenderRequest, export,
};
pub use foundation::core::{Affine, PixelBuffer, Point, Rgba8, Vec2};
pub use foundation::error::{RetouchError, RetouchResult};
pub use geometry::resample::{CropRect, ResizeSpec, crop, resize};
pub use render::compositor::{
    CpuRenderer, DrawTransform, Orientation, RenderSettings, Renderer, composite,
};
pub use render::pipeline::{DEFAULT_GRAIN_SEED, PipelineOpts, render, render_with};
pub use render::worker::{RenderJob, RenderOutput, RenderWorker};
pub use session::engine::Engine;
pub use session::history::{History, HistoryEntry};
pub use session::opts::{EngineOpts, HistoryPolicy, RenderMode};
pub use session::store::BufferStore;
