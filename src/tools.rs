// ============================================================================
// TOOLS — per-tool pointer-event state machine
// ============================================================================
//
// Each gesture runs Idle → Active → (Committed | Cancelled). All transient
// state (down point, preview snapshot, last stroke point) lives in a
// GestureContext created on pointer-down and destroyed on pointer-up or
// pointer-leave, so nothing leaks across unrelated gestures.

use image::Rgba;

use crate::canvas::{Surface, BACKGROUND};
use crate::history::{HistoryManager, Snapshot};
use crate::ops::{draw, fill};
use crate::selection::SelectionController;

/// Color of the dashed marquee preview rectangle.
pub const MARQUEE_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// The fixed tool set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToolKind {
    Pencil,
    Brush,
    Eraser,
    Line,
    Rectangle,
    Circle,
    Star,
    Fill,
    Eyedropper,
    Select,
}

impl ToolKind {
    pub fn all() -> &'static [ToolKind] {
        &[
            ToolKind::Pencil,
            ToolKind::Brush,
            ToolKind::Eraser,
            ToolKind::Line,
            ToolKind::Rectangle,
            ToolKind::Circle,
            ToolKind::Star,
            ToolKind::Fill,
            ToolKind::Eyedropper,
            ToolKind::Select,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            ToolKind::Pencil => "Pencil",
            ToolKind::Brush => "Brush",
            ToolKind::Eraser => "Eraser",
            ToolKind::Line => "Line",
            ToolKind::Rectangle => "Rectangle",
            ToolKind::Circle => "Circle",
            ToolKind::Star => "Star",
            ToolKind::Fill => "Fill",
            ToolKind::Eyedropper => "Color Picker",
            ToolKind::Select => "Select",
        }
    }

    /// Stroke width for the freehand tools; `None` for everything else.
    fn stroke_width(&self) -> Option<u32> {
        match self {
            ToolKind::Pencil => Some(1),
            ToolKind::Brush => Some(5),
            ToolKind::Eraser => Some(10),
            _ => None,
        }
    }

    fn is_shape(&self) -> bool {
        matches!(
            self,
            ToolKind::Line | ToolKind::Rectangle | ToolKind::Circle | ToolKind::Star
        )
    }
}

/// What the in-flight gesture is doing.
enum GestureKind {
    /// Freehand stroke; segments rasterize continuously on pointer-move.
    /// `base` is the pre-gesture surface, compared at gesture end so a
    /// stroke that changed nothing records no history.
    Stroke {
        width: u32,
        color: Rgba<u8>,
        base: Snapshot,
    },
    /// Shape with live preview: restore the down-point snapshot, redraw.
    Shape { base: Snapshot },
    /// Selection marquee (preview handled by the SelectionController).
    Marquee,
    /// Dragging the floating selection.
    SelectionDrag,
}

/// Transient per-gesture state; exists only between pointer-down and
/// pointer-up/leave.
struct GestureContext {
    kind: GestureKind,
    origin: (i32, i32),
    last: (i32, i32),
    /// Last-seen modifier state, so pointer-leave commits the same shape
    /// the preview showed.
    constrain: bool,
}

// ============================================================================
// TOOL ENGINE
// ============================================================================

/// Borrowed view of everything a gesture may touch. The session hands one
/// of these to each pointer event; the disjoint borrows keep independent
/// sessions (and tests) trivial.
pub struct ToolCtx<'a> {
    pub surface: &'a mut Surface,
    pub history: &'a mut HistoryManager,
    pub selection: &'a mut SelectionController,
    pub color: &'a mut Rgba<u8>,
}

/// The active tool plus the current gesture, if any.
pub struct ToolEngine {
    active: ToolKind,
    gesture: Option<GestureContext>,
}

impl Default for ToolEngine {
    fn default() -> Self {
        Self {
            active: ToolKind::Pencil,
            gesture: None,
        }
    }
}

impl ToolEngine {
    pub fn active(&self) -> ToolKind {
        self.active
    }

    pub fn gesture_in_progress(&self) -> bool {
        self.gesture.is_some()
    }

    /// Switch tools. Leaving the select tool for anything else commits the
    /// active selection (flushing floating content and recording history).
    pub fn set_active(&mut self, tool: ToolKind, ctx: &mut ToolCtx<'_>) {
        if tool == self.active {
            return;
        }
        self.gesture = None;
        if tool != ToolKind::Select {
            ctx.selection.commit(ctx.surface, ctx.history);
        }
        self.active = tool;
    }

    pub fn pointer_down(&mut self, ctx: &mut ToolCtx<'_>, x: i32, y: i32) {
        if self.gesture.is_some() {
            // Non-reentrant: a second pointer-down mid-gesture is ignored.
            return;
        }

        // A click inside the active selection always starts a drag, no
        // matter which tool is selected.
        if ctx.selection.hit(x, y) {
            ctx.selection.begin_drag(ctx.surface, (x, y));
            self.gesture = Some(GestureContext {
                kind: GestureKind::SelectionDrag,
                origin: (x, y),
                last: (x, y),
                constrain: false,
            });
            return;
        }

        // A click outside the selection flushes it before the gesture
        // proceeds (no-op when no selection exists).
        ctx.selection.commit(ctx.surface, ctx.history);

        let tool = self.active;
        if let Some(width) = tool.stroke_width() {
            let color = if tool == ToolKind::Eraser {
                BACKGROUND
            } else {
                *ctx.color
            };
            let base = Snapshot::capture(ctx.surface);
            draw::stroke_segment(ctx.surface, (x, y), (x, y), width, color);
            self.gesture = Some(GestureContext {
                kind: GestureKind::Stroke { width, color, base },
                origin: (x, y),
                last: (x, y),
                constrain: false,
            });
            return;
        }

        if tool.is_shape() {
            self.gesture = Some(GestureContext {
                kind: GestureKind::Shape {
                    base: Snapshot::capture(ctx.surface),
                },
                origin: (x, y),
                last: (x, y),
                constrain: false,
            });
            return;
        }

        match tool {
            ToolKind::Fill => {
                // Click-driven: fill and commit immediately; a no-op fill
                // (seed already the fill color) records nothing.
                if fill::flood_fill(ctx.surface, x, y, *ctx.color) > 0 {
                    ctx.history.push(Snapshot::capture(ctx.surface));
                }
            }
            ToolKind::Eyedropper => {
                // Transparent pixels pick white; anything else picks the
                // pixel's RGB as an opaque color. Never mutates, never
                // pushes history.
                if let Some(px) = ctx.surface.get(x, y) {
                    *ctx.color = if px[3] == 0 {
                        BACKGROUND
                    } else {
                        Rgba([px[0], px[1], px[2], 255])
                    };
                }
            }
            ToolKind::Select => {
                ctx.selection.start_marquee(ctx.surface, (x, y));
                self.gesture = Some(GestureContext {
                    kind: GestureKind::Marquee,
                    origin: (x, y),
                    last: (x, y),
                    constrain: false,
                });
            }
            _ => {}
        }
    }

    pub fn pointer_move(&mut self, ctx: &mut ToolCtx<'_>, x: i32, y: i32, constrain: bool) {
        let gesture = match self.gesture.as_mut() {
            Some(g) => g,
            None => return,
        };
        match &gesture.kind {
            GestureKind::Stroke { width, color, .. } => {
                draw::stroke_segment(ctx.surface, gesture.last, (x, y), *width, *color);
            }
            GestureKind::Shape { base } => {
                base.restore_into(ctx.surface);
                let end = constrain_endpoint(self.active, gesture.origin, (x, y), constrain);
                render_shape(self.active, ctx.surface, gesture.origin, end, *ctx.color);
            }
            GestureKind::Marquee => {
                ctx.selection.update_marquee(ctx.surface, (x, y));
            }
            GestureKind::SelectionDrag => {
                ctx.selection.update_drag(ctx.surface, (x, y));
            }
        }
        gesture.last = (x, y);
        gesture.constrain = constrain;
    }

    pub fn pointer_up(&mut self, ctx: &mut ToolCtx<'_>, x: i32, y: i32, constrain: bool) {
        let gesture = match self.gesture.take() {
            Some(g) => g,
            None => return,
        };
        match gesture.kind {
            GestureKind::Stroke { width, color, base } => {
                draw::stroke_segment(ctx.surface, gesture.last, (x, y), width, color);
                // A stroke that changed nothing (eraser over background,
                // fully off-canvas) is not an edit.
                if ctx.surface.as_raw() != base.as_raw() {
                    ctx.history.push(Snapshot::capture(ctx.surface));
                }
            }
            GestureKind::Shape { base } => {
                base.restore_into(ctx.surface);
                let end = constrain_endpoint(self.active, gesture.origin, (x, y), constrain);
                render_shape(self.active, ctx.surface, gesture.origin, end, *ctx.color);
                if ctx.surface.as_raw() != base.as_raw() {
                    ctx.history.push(Snapshot::capture(ctx.surface));
                }
            }
            GestureKind::Marquee => {
                // Selection creation is not a history event; only its
                // eventual commit is.
                ctx.selection.finalize_marquee(ctx.surface, (x, y));
            }
            GestureKind::SelectionDrag => {
                ctx.selection.end_drag(ctx.surface);
            }
        }
    }

    /// Pointer left the surface mid-gesture: end it exactly like a
    /// pointer-up at the last seen position and modifier state.
    pub fn pointer_leave(&mut self, ctx: &mut ToolCtx<'_>) {
        let (last, constrain) = match &self.gesture {
            Some(g) => (g.last, g.constrain),
            None => return,
        };
        self.pointer_up(ctx, last.0, last.1, constrain);
    }
}

/// Apply the square/perfect-circle modifier: equal extent on both axes,
/// each axis keeping its own drag direction.
fn constrain_endpoint(
    tool: ToolKind,
    origin: (i32, i32),
    point: (i32, i32),
    constrain: bool,
) -> (i32, i32) {
    if !constrain || !matches!(tool, ToolKind::Rectangle | ToolKind::Circle) {
        return point;
    }
    let dx = point.0 - origin.0;
    let dy = point.1 - origin.1;
    let side = dx.abs().min(dy.abs());
    (
        origin.0 + side * dx.signum(),
        origin.1 + side * dy.signum(),
    )
}

fn render_shape(
    tool: ToolKind,
    surface: &mut Surface,
    origin: (i32, i32),
    end: (i32, i32),
    color: Rgba<u8>,
) {
    match tool {
        ToolKind::Line => draw::line(surface, origin, end, color),
        ToolKind::Rectangle => draw::rect_outline(surface, origin, end, color),
        ToolKind::Circle => draw::ellipse_outline(surface, origin, end, color),
        ToolKind::Star => draw::star_outline(surface, origin, end, color),
        _ => {}
    }
}
