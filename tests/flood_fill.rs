use image::Rgba;
use retropaint::canvas::{Surface, BACKGROUND};
use retropaint::ops::fill::flood_fill;
use retropaint::session::EditorSession;
use retropaint::tools::ToolKind;

#[test]
fn uniform_surface_fills_every_pixel_once() {
    let mut s = Surface::new(37, 23, Rgba([10, 20, 30, 255]));
    let filled = flood_fill(&mut s, 18, 11, Rgba([200, 100, 50, 255]));
    assert_eq!(filled, 37 * 23);
    for y in 0..23 {
        for x in 0..37 {
            assert_eq!(s.get(x, y), Some(Rgba([200, 100, 50, 255])));
        }
    }
}

#[test]
fn filling_with_existing_color_is_noop() {
    let mut s = Surface::new(16, 16, BACKGROUND);
    s.set(5, 5, Rgba([9, 9, 9, 255]));
    let before = s.as_raw().to_vec();
    let filled = flood_fill(&mut s, 0, 0, Rgba([255, 255, 255, 255]));
    assert_eq!(filled, 0);
    assert_eq!(s.as_raw(), before.as_slice());
}

#[test]
fn fill_alpha_is_forced_opaque() {
    let mut s = Surface::new(4, 4, BACKGROUND);
    flood_fill(&mut s, 0, 0, Rgba([50, 60, 70, 0]));
    assert_eq!(s.get(3, 3), Some(Rgba([50, 60, 70, 255])));
}

#[test]
fn out_of_bounds_seed_is_noop() {
    let mut s = Surface::new(8, 8, BACKGROUND);
    assert_eq!(flood_fill(&mut s, -1, 0, Rgba([0, 0, 0, 255])), 0);
    assert_eq!(flood_fill(&mut s, 8, 8, Rgba([0, 0, 0, 255])), 0);
}

#[test]
fn fill_does_not_cross_diagonal_gaps() {
    // 4-connectivity: a diagonal wall of single pixels blocks the fill.
    let mut s = Surface::new(6, 6, BACKGROUND);
    let wall = Rgba([0, 0, 0, 255]);
    for i in 0..6 {
        s.set(i, 5 - i, wall);
    }
    flood_fill(&mut s, 0, 0, Rgba([255, 0, 0, 255]));
    // Below-left of the wall stays white.
    assert_eq!(s.get(0, 5), Some(BACKGROUND));
    assert_eq!(s.get(1, 5), Some(BACKGROUND));
}

#[test]
fn fill_tool_pushes_one_snapshot_and_noop_pushes_none() {
    let mut session = EditorSession::with_canvas(12, 12);
    session.set_tool(ToolKind::Fill);
    session.set_color(Rgba([1, 2, 3, 255]));

    session.pointer_down(6, 6);
    session.pointer_up(6, 6, false);
    assert!(session.history().can_undo());
    assert_eq!(session.history().len(), 2);

    // Clicking the same spot with the same color changes nothing and
    // records nothing.
    session.pointer_down(6, 6);
    session.pointer_up(6, 6, false);
    assert_eq!(session.history().len(), 2);

    session.undo();
    assert_eq!(session.surface().get(6, 6), Some(BACKGROUND));
}
