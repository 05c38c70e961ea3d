// ============================================================================
// SELECTION — marquee lifecycle, floating drag, clipboard
// ============================================================================

use image::RgbaImage;

use crate::canvas::{Rect, Surface, BACKGROUND};
use crate::history::{HistoryManager, Snapshot};

/// A marquee drag must exceed this in both dimensions to produce a
/// selection; anything smaller is treated as a stray click.
pub const MIN_SELECTION: u32 = 5;

/// Where pasted content lands when no selection provides an origin.
pub const PASTE_OFFSET: (i32, i32) = (10, 10);

/// Explicit lifecycle tag. `Floating` means the pixels under the selection
/// have been lifted off the surface and follow the drag; they are written
/// back (and history recorded) only on commit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionPhase {
    Idle,
    Marqueeing,
    Floating,
}

/// The single active selection rectangle, plus its lifted content once the
/// user starts dragging it.
pub struct Selection {
    pub rect: Rect,
    pub phase: SelectionPhase,
    content: Option<RgbaImage>,
}

impl Selection {
    pub fn content(&self) -> Option<&RgbaImage> {
        self.content.as_ref()
    }
}

/// One-slot application clipboard. Copy/cut replace it wholesale; paste
/// reads without clearing.
#[derive(Default)]
pub struct Clipboard {
    image: Option<RgbaImage>,
}

impl Clipboard {
    pub fn set(&mut self, image: RgbaImage) {
        self.image = Some(image);
    }

    pub fn get(&self) -> Option<&RgbaImage> {
        self.image.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.image.is_none()
    }
}

/// Repaint ticker for the selection overlay. The UI collaborator drives
/// `tick` at its refresh cadence; cancelling on selection clear is what
/// stops the overlay from being rescheduled forever.
#[derive(Default)]
pub struct MarchingAnts {
    active: bool,
    phase: u32,
}

impl MarchingAnts {
    pub fn start(&mut self) {
        self.active = true;
        self.phase = 0;
    }

    pub fn cancel(&mut self) {
        self.active = false;
        self.phase = 0;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Advance the dash phase; returns false once cancelled so the caller
    /// stops rescheduling.
    pub fn tick(&mut self) -> bool {
        if self.active {
            self.phase = self.phase.wrapping_add(1);
        }
        self.active
    }

    pub fn phase(&self) -> u32 {
        self.phase
    }
}

struct MarqueeState {
    origin: (i32, i32),
    /// Pre-marquee pixels, restored on every preview frame and on finalize.
    base: Snapshot,
}

struct DragState {
    start: (i32, i32),
    origin: Rect,
    /// The surface with the selection's origin emptied; preview frames are
    /// this snapshot plus the floating content at the current position.
    base: Snapshot,
}

// ============================================================================
// CONTROLLER
// ============================================================================

/// Owns the active selection, the clipboard, and the overlay ticker.
/// Only one selection exists at a time; every path that discards it runs
/// through `commit` or `cut`, so the overlay ticker can never leak.
#[derive(Default)]
pub struct SelectionController {
    selection: Option<Selection>,
    clipboard: Clipboard,
    ants: MarchingAnts,
    marquee: Option<MarqueeState>,
    drag: Option<DragState>,
}

impl SelectionController {
    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    pub fn ants(&self) -> &MarchingAnts {
        &self.ants
    }

    pub fn ants_mut(&mut self) -> &mut MarchingAnts {
        &mut self.ants
    }

    /// True when `point` falls inside the active selection (pointer-down
    /// routing uses this to decide between drag and commit-then-gesture).
    pub fn hit(&self, x: i32, y: i32) -> bool {
        self.selection
            .as_ref()
            .map_or(false, |s| s.rect.contains(x, y))
    }

    pub fn is_floating(&self) -> bool {
        self.selection
            .as_ref()
            .map_or(false, |s| s.phase == SelectionPhase::Floating)
    }

    // ------------------------------------------------------------------
    // Marquee
    // ------------------------------------------------------------------

    /// Begin a marquee gesture at `origin`. Snapshots the surface so the
    /// dashed preview can be erased without a trace.
    pub fn start_marquee(&mut self, surface: &Surface, origin: (i32, i32)) {
        self.marquee = Some(MarqueeState {
            origin,
            base: Snapshot::capture(surface),
        });
    }

    /// Redraw the dashed preview rectangle for the current pointer position.
    pub fn update_marquee(&mut self, surface: &mut Surface, point: (i32, i32)) {
        let marquee = match &self.marquee {
            Some(m) => m,
            None => return,
        };
        marquee.base.restore_into(surface);
        crate::ops::draw::dashed_rect(surface, marquee.origin, point, crate::tools::MARQUEE_COLOR);
    }

    /// End the marquee. The preview is always erased; a selection is
    /// created only when both dimensions exceed [`MIN_SELECTION`].
    pub fn finalize_marquee(&mut self, surface: &mut Surface, point: (i32, i32)) {
        let marquee = match self.marquee.take() {
            Some(m) => m,
            None => return,
        };
        marquee.base.restore_into(surface);

        // Keep the selection on-canvas; a marquee dragged past the edge
        // selects only the visible part, and the minimum-size threshold
        // applies to that part.
        let rect = Rect::from_points(marquee.origin, point);
        let rect = match rect.clamped(surface.width(), surface.height()) {
            Some(r) => r,
            None => return,
        };
        if rect.w <= MIN_SELECTION || rect.h <= MIN_SELECTION {
            return;
        }
        self.selection = Some(Selection {
            rect,
            phase: SelectionPhase::Idle,
            content: None,
        });
        self.ants.start();
    }

    // ------------------------------------------------------------------
    // Floating drag
    // ------------------------------------------------------------------

    /// Start dragging the selection. On the first drag the region is lifted
    /// into floating content and its origin emptied to background; repeat
    /// drags lift the already-floating content from wherever it sits.
    pub fn begin_drag(&mut self, surface: &mut Surface, point: (i32, i32)) {
        let sel = match self.selection.as_mut() {
            Some(s) => s,
            None => return,
        };
        if sel.content.is_none() {
            sel.content = surface.read_region(sel.rect);
            if sel.content.is_none() {
                // Selection fully off-canvas; nothing to lift.
                return;
            }
        }
        sel.phase = SelectionPhase::Floating;
        surface.fill_rect(sel.rect, BACKGROUND);
        self.drag = Some(DragState {
            start: point,
            origin: sel.rect,
            base: Snapshot::capture(surface),
        });
    }

    /// Move the selection by the cumulative pointer delta and re-composite
    /// the preview (emptied base + content at the new position).
    pub fn update_drag(&mut self, surface: &mut Surface, point: (i32, i32)) {
        let (drag, sel) = match (&self.drag, self.selection.as_mut()) {
            (Some(d), Some(s)) => (d, s),
            _ => return,
        };
        let dx = point.0 - drag.start.0;
        let dy = point.1 - drag.start.1;
        sel.rect = drag.origin.translated(dx, dy);

        drag.base.restore_into(surface);
        if let Some(content) = &sel.content {
            surface.write_region(sel.rect.x, sel.rect.y, content);
        }
    }

    /// Drop the selection at its current position. The content is visible
    /// on the surface but the selection stays floating: no history yet, so
    /// it can be picked up and dragged again.
    pub fn end_drag(&mut self, surface: &mut Surface) {
        let drag = match self.drag.take() {
            Some(d) => d,
            None => return,
        };
        if let Some(sel) = &self.selection {
            drag.base.restore_into(surface);
            if let Some(content) = &sel.content {
                surface.write_region(sel.rect.x, sel.rect.y, content);
            }
        }
    }

    // ------------------------------------------------------------------
    // Commit & clipboard
    // ------------------------------------------------------------------

    /// Flush the selection. Floating content is written at its final rect
    /// and recorded in history; a never-dragged selection just dissolves
    /// (nothing changed, so nothing is pushed). Always stops the overlay.
    pub fn commit(&mut self, surface: &mut Surface, history: &mut HistoryManager) {
        self.drag = None;
        self.marquee = None;
        self.ants.cancel();
        let sel = match self.selection.take() {
            Some(s) => s,
            None => return,
        };
        if let Some(content) = &sel.content {
            surface.write_region(sel.rect.x, sel.rect.y, content);
            history.push(Snapshot::capture(surface));
        }
    }

    /// Drop the selection without writing anything back. Used when the
    /// whole document is being replaced (new/clear/load) and the floating
    /// content would be wiped regardless.
    pub fn discard(&mut self) {
        self.selection = None;
        self.drag = None;
        self.marquee = None;
        self.ants.cancel();
    }

    /// Copy the selection into the clipboard without touching the surface.
    pub fn copy(&mut self, surface: &Surface) {
        let sel = match &self.selection {
            Some(s) => s,
            None => return,
        };
        let image = match &sel.content {
            Some(content) => Some(content.clone()),
            None => surface.read_region(sel.rect),
        };
        if let Some(image) = image {
            self.clipboard.set(image);
        }
    }

    /// Copy, then remove the selected pixels (background fill) and record
    /// the cut in history.
    pub fn cut(&mut self, surface: &mut Surface, history: &mut HistoryManager) {
        if self.selection.is_none() {
            return;
        }
        self.copy(surface);
        let rect = self.selection.take().map(|s| s.rect);
        self.drag = None;
        self.ants.cancel();
        if let Some(rect) = rect {
            surface.fill_rect(rect, BACKGROUND);
            history.push(Snapshot::capture(surface));
        }
    }

    /// Paste the clipboard at the active selection's origin (committing any
    /// floating content first) or at the default offset. The pasted pixels
    /// are written immediately — the new selection is idle, not floating.
    pub fn paste(&mut self, surface: &mut Surface, history: &mut HistoryManager) {
        if self.clipboard.is_empty() {
            return;
        }
        let origin = self
            .selection
            .as_ref()
            .map(|s| (s.rect.x, s.rect.y))
            .unwrap_or(PASTE_OFFSET);
        self.commit(surface, history);

        // Clipboard stays populated; clone out the image to end the borrow.
        let image = match self.clipboard.get() {
            Some(img) => img.clone(),
            None => return,
        };
        surface.write_region(origin.0, origin.1, &image);
        history.push(Snapshot::capture(surface));

        self.selection = Some(Selection {
            rect: Rect::new(origin.0, origin.1, image.width(), image.height()),
            phase: SelectionPhase::Idle,
            content: None,
        });
        self.ants.start();
    }

    /// Select the whole surface (committing any floating content first).
    pub fn select_all(&mut self, surface: &mut Surface, history: &mut HistoryManager) {
        self.commit(surface, history);
        self.selection = Some(Selection {
            rect: surface.bounds(),
            phase: SelectionPhase::Idle,
            content: None,
        });
        self.ants.start();
    }
}
