use std::path::Path;

use crate::{
    adjust::state::{Adjust, AdjustmentPatch, AdjustmentState},
    analysis::histogram::{Histogram, histogram},
    assets::decode::{decode_image, load_image},
    effects::auto::{auto_levels, auto_white_balance},
    encode::export::{ExportEncoder, Exported, ImageCrateEncoder, RenderRequest, export},
    foundation::{
        core::PixelBuffer,
        error::{RetouchError, RetouchResult},
    },
    geometry::resample::{CropRect, ResizeSpec, crop, resize},
    render::{
        compositor::{CpuRenderer, Renderer, composite},
        pipeline::{PipelineOpts, render_with},
        worker::{RenderJob, RenderOutput},
    },
    session::{
        history::History,
        opts::{EngineOpts, HistoryPolicy, RenderMode, build_thread_pool},
        store::BufferStore,
    },
};

/// One editing session: the three buffers, the adjustment state and its history.
///
/// Every mutation goes through `&mut self`, so a geometry change can never interleave with a
/// render of the same session. Work that leaves the engine ([`RenderJob`]) carries an `Arc`
/// snapshot plus a generation number, and [`Engine::accept`] refuses results from an older
/// generation.
pub struct Engine {
    opts: EngineOpts,
    pool: rayon::ThreadPool,
    store: BufferStore,
    state: AdjustmentState,
    history: History,
    generation: u64,
    renderer: Option<Box<dyn Renderer + Send>>,
    encoder: Box<dyn ExportEncoder + Send>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("opts", &self.opts)
            .field("state", &self.state)
            .field("history_len", &self.history.len())
            .field("generation", &self.generation)
            .field("has_renderer", &self.renderer.is_some())
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Engine with a [`CpuRenderer`] surface and the `image` crate encoder attached.
    pub fn new(opts: EngineOpts) -> RetouchResult<Self> {
        opts.validate()?;
        let pool = build_thread_pool(opts.threads)?;
        Ok(Self {
            opts,
            pool,
            store: BufferStore::default(),
            state: AdjustmentState::default(),
            history: History::default(),
            generation: 0,
            renderer: Some(Box::new(CpuRenderer::default())),
            encoder: Box::new(ImageCrateEncoder),
        })
    }

    pub fn opts(&self) -> &EngineOpts {
        &self.opts
    }

    pub fn state(&self) -> &AdjustmentState {
        &self.state
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn initial(&self) -> Option<&PixelBuffer> {
        self.store.initial()
    }

    pub fn original(&self) -> Option<&PixelBuffer> {
        self.store.original()
    }

    pub fn working(&self) -> Option<&PixelBuffer> {
        self.store.working()
    }

    /// Bumped by every change that invalidates the working buffer.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn attach_renderer(&mut self, renderer: Box<dyn Renderer + Send>) {
        self.renderer = Some(renderer);
    }

    pub fn detach_renderer(&mut self) -> Option<Box<dyn Renderer + Send>> {
        self.renderer.take()
    }

    pub fn set_encoder(&mut self, encoder: Box<dyn ExportEncoder + Send>) {
        self.encoder = encoder;
    }

    // ---- loading ----

    /// Start a new session from `buf`: previous buffers, adjustments and history are dropped.
    #[tracing::instrument(skip_all, fields(width = buf.width(), height = buf.height()))]
    pub fn open(&mut self, buf: PixelBuffer) -> RetouchResult<()> {
        self.check_size(buf.width(), buf.height())?;
        self.store.clear();
        self.state = AdjustmentState::default();
        self.history = History::default();
        self.store.load(buf);
        self.invalidate(true)
    }

    pub fn open_bytes(&mut self, bytes: &[u8]) -> RetouchResult<()> {
        self.open(decode_image(bytes)?)
    }

    pub fn open_path(&mut self, path: &Path) -> RetouchResult<()> {
        self.open(load_image(path)?)
    }

    /// Replace `Original` within the current session. `Initial` is only set if absent.
    #[tracing::instrument(skip_all, fields(width = buf.width(), height = buf.height()))]
    pub fn load(&mut self, buf: PixelBuffer) -> RetouchResult<()> {
        self.check_size(buf.width(), buf.height())?;
        self.store.load(buf);
        self.invalidate(true)
    }

    // ---- adjustments ----

    /// One tick of a continuous gesture (slider drag).
    ///
    /// Under [`HistoryPolicy::EveryTick`] the tick is committed; under
    /// [`HistoryPolicy::OnRelease`] it only previews until [`Engine::release`].
    pub fn drag(&mut self, adjust: Adjust) -> RetouchResult<()> {
        let next = self.state.with(adjust);
        self.transition(next)?;
        if self.opts.history_policy == HistoryPolicy::EveryTick {
            self.commit_if_changed();
        }
        Ok(())
    }

    /// End of a gesture. Returns whether a history entry was added.
    pub fn release(&mut self) -> bool {
        self.commit_if_changed()
    }

    /// Discrete change: a drag immediately followed by a release.
    pub fn set(&mut self, adjust: Adjust) -> RetouchResult<()> {
        self.drag(adjust)?;
        self.release();
        Ok(())
    }

    /// Merge a partial update as one discrete action.
    pub fn apply_patch(&mut self, patch: &AdjustmentPatch) -> RetouchResult<()> {
        let next = self.state.merged(patch);
        self.transition(next)?;
        self.commit_if_changed();
        Ok(())
    }

    pub fn rotate_cw(&mut self) -> RetouchResult<()> {
        self.set(Adjust::Rotation(self.state.rotate_cw().rotation))
    }

    pub fn rotate_ccw(&mut self) -> RetouchResult<()> {
        self.set(Adjust::Rotation(self.state.rotate_ccw().rotation))
    }

    /// Step back one history entry and re-render. No-op at the first entry.
    ///
    /// An uncommitted preview (a drag not yet released) is discarded first and counts as the
    /// step: the state returns to the current entry and the index does not move.
    pub fn undo(&mut self) -> RetouchResult<AdjustmentState> {
        let before = self.state;
        let next = if self.has_pending_preview() {
            self.history.current().state
        } else {
            self.history.undo()
        };
        self.restore(before, next)
    }

    /// Step forward one history entry and re-render. No-op at the tip.
    ///
    /// An uncommitted preview is discarded.
    pub fn redo(&mut self) -> RetouchResult<AdjustmentState> {
        let before = self.state;
        let next = self.history.redo();
        self.restore(before, next)
    }

    /// Whether the state holds drag ticks that no history entry records yet.
    pub fn has_pending_preview(&self) -> bool {
        self.state != self.history.current().state
    }

    /// Default adjustments over the current `Original`. Geometry stays as it is.
    pub fn reset_adjustments(&mut self) -> RetouchResult<()> {
        self.transition(AdjustmentState::default())?;
        self.commit_if_changed();
        Ok(())
    }

    /// `Original := Initial` and default adjustments.
    ///
    /// Crops and resizes are rolled back too, since they only ever replaced `Original`.
    #[tracing::instrument(skip_all)]
    pub fn full_reset(&mut self) -> RetouchResult<()> {
        self.store.restore_initial()?;
        self.state = AdjustmentState::default();
        self.commit_if_changed();
        self.invalidate(true)
    }

    // ---- geometry ----

    /// Rebase `Original` on `buf`. Adjustments are kept and re-applied.
    #[tracing::instrument(skip_all, fields(width = buf.width(), height = buf.height()))]
    pub fn commit_geometry(&mut self, buf: PixelBuffer) -> RetouchResult<()> {
        self.check_size(buf.width(), buf.height())?;
        self.store.commit_geometry(buf)?;
        self.invalidate(true)
    }

    pub fn crop(&mut self, rect: CropRect) -> RetouchResult<()> {
        let cropped = crop(self.require_original()?, rect)?;
        self.commit_geometry(cropped)
    }

    pub fn resize(&mut self, spec: ResizeSpec) -> RetouchResult<()> {
        let original = self.require_original()?;
        let (w, h) = spec.resolve(original.width(), original.height())?;
        self.check_size(w, h)?;
        let resized = self.pool.install(|| resize(original, spec))?;
        self.commit_geometry(resized)
    }

    /// Gray-world white balance baked into a new `Original`.
    pub fn auto_white_balance(&mut self) -> RetouchResult<()> {
        let original = self.require_original()?;
        let balanced = self.pool.install(|| auto_white_balance(original));
        self.commit_geometry(balanced)
    }

    /// Per-channel levels stretch baked into a new `Original`.
    pub fn auto_levels(&mut self) -> RetouchResult<()> {
        let original = self.require_original()?;
        let stretched = self.pool.install(|| auto_levels(original));
        self.commit_geometry(stretched)
    }

    // ---- output ----

    /// Draw `Working` with the current rotation and flips onto the attached surface.
    pub fn present(&mut self) -> RetouchResult<PixelBuffer> {
        let working = self.store.checked_working()?;
        let renderer = self
            .renderer
            .as_deref_mut()
            .ok_or_else(|| RetouchError::surface("no presentation surface attached"))?;
        self.pool.install(|| composite(renderer, working, &self.state))
    }

    /// Present, then resize and encode the surface.
    #[tracing::instrument(skip_all, fields(format = %request.format, width = request.width, height = request.height))]
    pub fn export(&mut self, request: &RenderRequest) -> RetouchResult<Exported> {
        self.check_size(request.width, request.height)?;
        let surface = self.present()?;
        export(&surface, request, self.encoder.as_ref())
    }

    /// Histogram of the working buffer.
    pub fn histogram(&self) -> RetouchResult<Histogram> {
        let working = self.store.checked_working()?;
        Ok(histogram(working))
    }

    // ---- deferred rendering ----

    /// Snapshot of what the working buffer should become, for a [`crate::RenderWorker`].
    pub fn render_job(&self) -> RetouchResult<RenderJob> {
        Ok(RenderJob {
            generation: self.generation,
            original: self.store.original_arc()?,
            state: self.state,
            opts: self.pipeline_opts(),
        })
    }

    /// Install a finished render as `Working` if it is still current.
    ///
    /// Returns `Ok(false)` for a stale generation; the result is dropped without being
    /// inspected. A current result that failed is returned as the error.
    pub fn accept(&mut self, output: RenderOutput) -> RetouchResult<bool> {
        if output.generation != self.generation {
            tracing::warn!(
                stale = output.generation,
                current = self.generation,
                "dropping stale render result"
            );
            return Ok(false);
        }
        let buf = output.result?;
        let original = self.require_original()?;
        if !buf.same_dimensions(original) {
            return Err(RetouchError::evaluation(format!(
                "render result is {}x{} but original is {}x{}",
                buf.width(),
                buf.height(),
                original.width(),
                original.height()
            )));
        }
        self.store.set_working(buf);
        Ok(true)
    }

    // ---- internals ----

    fn pipeline_opts(&self) -> PipelineOpts {
        PipelineOpts {
            grain_seed: self.opts.grain_seed,
        }
    }

    fn require_original(&self) -> RetouchResult<&PixelBuffer> {
        self.store
            .original()
            .ok_or_else(|| RetouchError::validation("no image loaded"))
    }

    fn check_size(&self, width: u32, height: u32) -> RetouchResult<()> {
        let pixels = u64::from(width) * u64::from(height);
        if pixels > self.opts.max_pixels {
            return Err(RetouchError::validation(format!(
                "{width}x{height} exceeds the limit of {} pixels",
                self.opts.max_pixels
            )));
        }
        Ok(())
    }

    fn commit_if_changed(&mut self) -> bool {
        if !self.has_pending_preview() {
            return false;
        }
        let entry = self.history.commit(self.state);
        tracing::debug!(seq = entry.seq, "history commit");
        true
    }

    /// Move to `next`, re-rendering only when pixel-affecting fields changed.
    fn transition(&mut self, next: AdjustmentState) -> RetouchResult<()> {
        next.validate()?;
        let needs_pixels = pixel_fields(&next) != pixel_fields(&self.state);
        let previous = std::mem::replace(&mut self.state, next);
        if let Err(e) = self.invalidate(needs_pixels) {
            self.state = previous;
            return Err(e);
        }
        Ok(())
    }

    fn restore(
        &mut self,
        before: AdjustmentState,
        next: AdjustmentState,
    ) -> RetouchResult<AdjustmentState> {
        self.state = next;
        self.invalidate(pixel_fields(&before) != pixel_fields(&next))?;
        Ok(next)
    }

    /// Bump the generation and, in immediate mode, re-render `Working` from `Original`.
    fn invalidate(&mut self, pixels_changed: bool) -> RetouchResult<()> {
        if !pixels_changed {
            return Ok(());
        }
        self.generation += 1;
        if self.opts.render_mode == RenderMode::Deferred {
            return Ok(());
        }
        let Ok(original) = self.store.original_arc() else {
            return Ok(());
        };
        let opts = self.pipeline_opts();
        let working = self
            .pool
            .install(|| render_with(&original, &self.state, &opts))?;
        self.store.set_working(working);
        Ok(())
    }
}

/// The state with draw-time fields zeroed, for deciding whether pixels must be recomputed.
fn pixel_fields(state: &AdjustmentState) -> AdjustmentState {
    AdjustmentState {
        rotation: 0.0,
        flip_horizontal: false,
        flip_vertical: false,
        ..*state
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/engine.rs"]
mod tests;
