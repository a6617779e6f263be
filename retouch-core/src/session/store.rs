use std::sync::Arc;

use crate::foundation::{
    core::PixelBuffer,
    error::{RetouchError, RetouchResult},
};

/// The three buffer roles of an editing session.
///
/// - `initial`: pristine decode, set once per session.
/// - `original`: current baseline, rebased by crop, resize and auto enhance.
/// - `working`: pipeline output derived from `original`.
///
/// Buffers sit behind `Arc` so render jobs can hold a snapshot while the session moves on.
#[derive(Clone, Debug, Default)]
pub struct BufferStore {
    initial: Option<Arc<PixelBuffer>>,
    original: Option<Arc<PixelBuffer>>,
    working: Option<Arc<PixelBuffer>>,
}

impl BufferStore {
    /// Discard every buffer.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Install a decoded image as `original`. `initial` is only set if the session has none.
    pub fn load(&mut self, buf: PixelBuffer) {
        let buf = Arc::new(buf);
        if self.initial.is_none() {
            self.initial = Some(Arc::clone(&buf));
        }
        self.working = Some(Arc::clone(&buf));
        self.original = Some(buf);
    }

    /// Replace `original` (crop, resize). `initial` is left alone.
    pub fn commit_geometry(&mut self, buf: PixelBuffer) -> RetouchResult<()> {
        if self.original.is_none() {
            return Err(RetouchError::validation("no image loaded"));
        }
        self.original = Some(Arc::new(buf));
        Ok(())
    }

    /// `original := initial`.
    pub fn restore_initial(&mut self) -> RetouchResult<()> {
        let initial = self
            .initial
            .as_ref()
            .ok_or_else(|| RetouchError::validation("no image loaded"))?;
        self.original = Some(Arc::clone(initial));
        Ok(())
    }

    pub fn set_working(&mut self, buf: PixelBuffer) {
        self.working = Some(Arc::new(buf));
    }

    pub fn initial(&self) -> Option<&PixelBuffer> {
        self.initial.as_deref()
    }

    pub fn original(&self) -> Option<&PixelBuffer> {
        self.original.as_deref()
    }

    pub fn working(&self) -> Option<&PixelBuffer> {
        self.working.as_deref()
    }

    pub(crate) fn original_arc(&self) -> RetouchResult<Arc<PixelBuffer>> {
        self.original
            .clone()
            .ok_or_else(|| RetouchError::validation("no image loaded"))
    }

    /// Working buffer, checked against the baseline it must have been derived from.
    pub(crate) fn checked_working(&self) -> RetouchResult<&PixelBuffer> {
        let (Some(original), Some(working)) = (self.original.as_deref(), self.working.as_deref())
        else {
            return Err(RetouchError::validation("no image loaded"));
        };
        if !working.same_dimensions(original) {
            return Err(RetouchError::evaluation(format!(
                "working buffer is {}x{} but original is {}x{}",
                working.width(),
                working.height(),
                original.width(),
                original.height()
            )));
        }
        Ok(working)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/store.rs"]
mod tests;
