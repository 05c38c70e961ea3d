// ============================================================================
// EDITOR SESSION — one document's surface, history, selection, and tool
// ============================================================================
//
// The session is the event-dispatch boundary: pointer events, menu
// operations, and undo/redo all enter here. Nothing in the engine is
// global, so any number of sessions can coexist (each test builds its own).

use image::{Rgba, RgbaImage};

use crate::canvas::{Surface, BACKGROUND, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::history::{HistoryManager, Snapshot};
use crate::selection::SelectionController;
use crate::share::{self, DecodedShare, ShareError};
use crate::storage::{BlobStore, KEY_CANVAS};
use crate::tools::{ToolCtx, ToolEngine, ToolKind};

pub struct EditorSession {
    surface: Surface,
    history: HistoryManager,
    selection: SelectionController,
    tools: ToolEngine,
    color: Rgba<u8>,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::with_canvas(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

impl EditorSession {
    pub fn with_canvas(width: u32, height: u32) -> Self {
        let surface = Surface::new(width, height, BACKGROUND);
        let mut history = HistoryManager::default();
        history.reset(Snapshot::capture(&surface));
        Self {
            surface,
            history,
            selection: SelectionController::default(),
            tools: ToolEngine::default(),
            color: Rgba([0, 0, 0, 255]),
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    pub fn active_tool(&self) -> ToolKind {
        self.tools.active()
    }

    pub fn active_color(&self) -> Rgba<u8> {
        self.color
    }

    pub fn set_color(&mut self, color: Rgba<u8>) {
        self.color = color;
    }

    pub fn set_tool(&mut self, tool: ToolKind) {
        let mut ctx = ToolCtx {
            surface: &mut self.surface,
            history: &mut self.history,
            selection: &mut self.selection,
            color: &mut self.color,
        };
        self.tools.set_active(tool, &mut ctx);
    }

    // ------------------------------------------------------------------
    // Pointer events
    // ------------------------------------------------------------------

    pub fn pointer_down(&mut self, x: i32, y: i32) {
        let mut ctx = ToolCtx {
            surface: &mut self.surface,
            history: &mut self.history,
            selection: &mut self.selection,
            color: &mut self.color,
        };
        self.tools.pointer_down(&mut ctx, x, y);
    }

    pub fn pointer_move(&mut self, x: i32, y: i32, constrain: bool) {
        let mut ctx = ToolCtx {
            surface: &mut self.surface,
            history: &mut self.history,
            selection: &mut self.selection,
            color: &mut self.color,
        };
        self.tools.pointer_move(&mut ctx, x, y, constrain);
    }

    pub fn pointer_up(&mut self, x: i32, y: i32, constrain: bool) {
        let mut ctx = ToolCtx {
            surface: &mut self.surface,
            history: &mut self.history,
            selection: &mut self.selection,
            color: &mut self.color,
        };
        self.tools.pointer_up(&mut ctx, x, y, constrain);
    }

    pub fn pointer_leave(&mut self) {
        let mut ctx = ToolCtx {
            surface: &mut self.surface,
            history: &mut self.history,
            selection: &mut self.selection,
            color: &mut self.color,
        };
        self.tools.pointer_leave(&mut ctx);
    }

    // ------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------

    pub fn undo(&mut self) {
        // A floating selection is an uncommitted edit; flush it so the
        // undo step starts from a consistent committed state.
        self.selection.commit(&mut self.surface, &mut self.history);
        if let Some(snapshot) = self.history.undo() {
            snapshot.restore_into(&mut self.surface);
        }
    }

    pub fn redo(&mut self) {
        self.selection.commit(&mut self.surface, &mut self.history);
        if let Some(snapshot) = self.history.redo() {
            snapshot.restore_into(&mut self.surface);
        }
    }

    // ------------------------------------------------------------------
    // Selection / clipboard commands (menu entry points)
    // ------------------------------------------------------------------

    pub fn copy(&mut self) {
        self.selection.copy(&self.surface);
    }

    pub fn cut(&mut self) {
        self.selection.cut(&mut self.surface, &mut self.history);
    }

    pub fn paste(&mut self) {
        self.selection.paste(&mut self.surface, &mut self.history);
    }

    pub fn select_all(&mut self) {
        self.selection
            .select_all(&mut self.surface, &mut self.history);
    }

    /// "Clear Selection": flush floating content and drop the marquee.
    pub fn commit_selection(&mut self) {
        self.selection.commit(&mut self.surface, &mut self.history);
    }

    /// Advance the marching-ants overlay; returns false once there is no
    /// selection so the repaint loop stops rescheduling itself.
    pub fn tick_overlay(&mut self) -> bool {
        self.selection.ants_mut().tick()
    }

    // ------------------------------------------------------------------
    // Document lifecycle
    // ------------------------------------------------------------------

    /// Fresh white canvas; history collapses to a single baseline.
    pub fn new_canvas(&mut self, width: u32, height: u32) {
        self.selection.discard();
        self.surface = Surface::new(width, height, BACKGROUND);
        self.history.reset(Snapshot::capture(&self.surface));
    }

    /// Wipe the canvas to background. Unlike `new_canvas` this is an edit:
    /// it pushes one history snapshot.
    pub fn clear_canvas(&mut self) {
        self.selection.discard();
        self.surface.clear(BACKGROUND);
        self.history.push(Snapshot::capture(&self.surface));
    }

    /// Change the canvas dimensions, copying/cropping existing content.
    /// Pushes one history snapshot.
    pub fn resize_canvas(&mut self, width: u32, height: u32) {
        self.selection.discard();
        self.surface = self.surface.resized(width, height);
        self.history.push(Snapshot::capture(&self.surface));
    }

    /// Replace the document with a loaded image of arbitrary dimensions.
    /// History resets to a single baseline.
    pub fn load_image(&mut self, image: RgbaImage) {
        self.selection.discard();
        self.surface = Surface::from_image(image);
        self.history.reset(Snapshot::capture(&self.surface));
    }

    // ------------------------------------------------------------------
    // Share / persistence
    // ------------------------------------------------------------------

    pub fn share_payload(&self) -> Result<String, ShareError> {
        share::encode(&self.surface)
    }

    /// Apply an already-decoded payload. Decoding happens first and can
    /// fail without touching this session; applying cannot fail.
    pub fn apply_share(&mut self, decoded: DecodedShare) {
        self.load_image(decoded.image);
    }

    /// Write the current canvas into the blob store under the well-known
    /// autosave key.
    pub fn autosave(&self, store: &mut dyn BlobStore) -> Result<(), String> {
        let payload = self
            .share_payload()
            .map_err(|e| format!("autosave encode failed: {}", e))?;
        store.set(KEY_CANVAS, &payload);
        Ok(())
    }

    /// Restore the autosaved canvas, if one exists and decodes cleanly.
    /// Returns true when a canvas was restored.
    pub fn restore_autosave(&mut self, store: &dyn BlobStore) -> bool {
        let payload = match store.get(KEY_CANVAS) {
            Some(p) => p,
            None => return false,
        };
        match share::decode(&payload) {
            Ok(decoded) => {
                self.apply_share(decoded);
                true
            }
            Err(e) => {
                crate::log_warn!("autosaved canvas did not decode: {}", e);
                false
            }
        }
    }
}
