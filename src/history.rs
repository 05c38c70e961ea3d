use image::RgbaImage;

use crate::canvas::Surface;

/// Default number of snapshots retained before the oldest is evicted.
pub const DEFAULT_CAPACITY: usize = 50;

// ============================================================================
// SNAPSHOT — immutable full copy of the surface at one point in time
// ============================================================================

/// A deep copy of the surface's pixel buffer plus its dimensions. Snapshots
/// never alias the live surface, so later edits cannot corrupt history.
#[derive(Clone)]
pub struct Snapshot {
    pixels: RgbaImage,
}

impl Snapshot {
    pub fn capture(surface: &Surface) -> Self {
        Self {
            pixels: surface.image().clone(),
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Put the snapshot's pixels back on the surface. When dimensions
    /// differ (undo across a resize or load) the surface is recreated.
    pub fn restore_into(&self, surface: &mut Surface) {
        if surface.width() == self.width() && surface.height() == self.height() {
            surface.image_mut().copy_from_slice(&self.pixels);
        } else {
            *surface = Surface::from_image(self.pixels.clone());
        }
    }

    pub fn as_raw(&self) -> &[u8] {
        self.pixels.as_raw()
    }
}

// ============================================================================
// HISTORY MANAGER — bounded snapshot stack with a linear undo/redo pointer
// ============================================================================

/// Whole-surface undo/redo history. Invariant: when non-empty,
/// `0 <= index < snapshots.len()`, and `snapshots[index]` is the state the
/// live surface currently reflects (after the latest commit or undo/redo).
pub struct HistoryManager {
    snapshots: Vec<Snapshot>,
    index: usize,
    capacity: usize,
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl HistoryManager {
    pub fn new(capacity: usize) -> Self {
        Self {
            snapshots: Vec::new(),
            index: 0,
            capacity: capacity.max(1),
        }
    }

    /// Drop all history and install `baseline` as the single undoable-only-
    /// to-itself state. Called after new-canvas, file open, and share apply.
    pub fn reset(&mut self, baseline: Snapshot) {
        self.snapshots.clear();
        self.snapshots.push(baseline);
        self.index = 0;
    }

    /// Record a committed mutation. Any redo tail past the current index is
    /// discarded; if the stack then exceeds capacity the oldest snapshot is
    /// evicted and the index shifts down with it.
    pub fn push(&mut self, snapshot: Snapshot) {
        if self.index + 1 < self.snapshots.len() {
            self.snapshots.truncate(self.index + 1);
        }
        self.snapshots.push(snapshot);
        self.index = self.snapshots.len() - 1;
        while self.snapshots.len() > self.capacity {
            self.snapshots.remove(0);
            self.index = self.index.saturating_sub(1);
        }
    }

    /// Step back one state. `None` at the baseline boundary (silent no-op
    /// for the caller).
    pub fn undo(&mut self) -> Option<&Snapshot> {
        if self.index == 0 || self.snapshots.is_empty() {
            return None;
        }
        self.index -= 1;
        Some(&self.snapshots[self.index])
    }

    /// Step forward one state. `None` when already at the tail.
    pub fn redo(&mut self) -> Option<&Snapshot> {
        if self.snapshots.is_empty() || self.index + 1 >= self.snapshots.len() {
            return None;
        }
        self.index += 1;
        Some(&self.snapshots[self.index])
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        !self.snapshots.is_empty() && self.index + 1 < self.snapshots.len()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Oldest retained snapshot (eviction tests look at this edge).
    pub fn oldest(&self) -> Option<&Snapshot> {
        self.snapshots.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::BACKGROUND;
    use image::Rgba;

    fn surface_with_mark(mark: u8) -> Surface {
        let mut s = Surface::new(4, 4, BACKGROUND);
        s.set(0, 0, Rgba([mark, 0, 0, 255]));
        s
    }

    #[test]
    fn push_discards_redo_tail() {
        let mut h = HistoryManager::new(10);
        h.reset(Snapshot::capture(&surface_with_mark(0)));
        h.push(Snapshot::capture(&surface_with_mark(1)));
        h.push(Snapshot::capture(&surface_with_mark(2)));
        h.undo().unwrap();
        h.undo().unwrap();
        assert!(h.can_redo());
        h.push(Snapshot::capture(&surface_with_mark(9)));
        assert!(!h.can_redo());
        assert_eq!(h.len(), 2);
    }

    #[test]
    fn eviction_keeps_index_in_range() {
        let mut h = HistoryManager::new(3);
        h.reset(Snapshot::capture(&surface_with_mark(0)));
        for mark in 1..10 {
            h.push(Snapshot::capture(&surface_with_mark(mark)));
            assert!(h.index() < h.len());
            assert!(h.len() <= 3);
        }
        // Oldest retained state is three pushes back from the tail.
        assert_eq!(h.oldest().unwrap().as_raw()[0], 7);
    }

    #[test]
    fn undo_at_baseline_is_noop() {
        let mut h = HistoryManager::default();
        h.reset(Snapshot::capture(&surface_with_mark(0)));
        assert!(h.undo().is_none());
        assert!(h.redo().is_none());
    }
}
