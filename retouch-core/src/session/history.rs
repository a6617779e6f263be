use crate::adjust::state::AdjustmentState;

/// Immutable snapshot of the adjustment state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HistoryEntry {
    /// Monotonic per session; never reused after truncation.
    pub seq: u64,
    pub state: AdjustmentState,
}

/// Linear undo/redo stack over adjustment snapshots. Entry 0 is the default state.
///
/// Pixel buffers are never stored: the working buffer is re-derived from the original.
#[derive(Clone, Debug)]
pub struct History {
    entries: Vec<HistoryEntry>,
    index: usize,
    next_seq: u64,
}

impl Default for History {
    fn default() -> Self {
        Self {
            entries: vec![HistoryEntry {
                seq: 0,
                state: AdjustmentState::default(),
            }],
            index: 0,
            next_seq: 1,
        }
    }
}

impl History {
    /// Append `state` after the current entry, dropping any redo tail.
    pub fn commit(&mut self, state: AdjustmentState) -> &HistoryEntry {
        self.entries.truncate(self.index + 1);
        self.entries.push(HistoryEntry {
            seq: self.next_seq,
            state,
        });
        self.next_seq += 1;
        self.index = self.entries.len() - 1;
        &self.entries[self.index]
    }

    /// Step back one entry. At index 0 this is a no-op.
    pub fn undo(&mut self) -> AdjustmentState {
        self.index = self.index.saturating_sub(1);
        self.entries[self.index].state
    }

    /// Step forward one entry. At the tip this is a no-op.
    pub fn redo(&mut self) -> AdjustmentState {
        if self.index + 1 < self.entries.len() {
            self.index += 1;
        }
        self.entries[self.index].state
    }

    pub fn current(&self) -> &HistoryEntry {
        &self.entries[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/history.rs"]
mod tests;
