use std::fs;

use image::{Rgba, RgbaImage};
use retropaint::canvas::BACKGROUND;
use retropaint::io::{self, SaveFormat};
use retropaint::session::EditorSession;
use retropaint::tools::ToolKind;

const INK: Rgba<u8> = Rgba([0, 0, 0, 255]);

fn dot(session: &mut EditorSession, x: i32, y: i32) {
    session.set_tool(ToolKind::Pencil);
    session.pointer_down(x, y);
    session.pointer_up(x, y, false);
}

#[test]
fn new_canvas_wipes_content_and_history() {
    let mut session = EditorSession::with_canvas(20, 20);
    dot(&mut session, 5, 5);
    dot(&mut session, 6, 6);
    assert!(session.history().can_undo());

    session.new_canvas(30, 10);
    assert_eq!(
        (session.surface().width(), session.surface().height()),
        (30, 10)
    );
    assert_eq!(session.surface().get(5, 5), Some(BACKGROUND));
    assert!(!session.history().can_undo());
    assert_eq!(session.history().len(), 1);
}

#[test]
fn clear_canvas_is_undoable() {
    let mut session = EditorSession::with_canvas(20, 20);
    dot(&mut session, 5, 5);
    session.clear_canvas();
    assert_eq!(session.surface().get(5, 5), Some(BACKGROUND));

    session.undo();
    assert_eq!(session.surface().get(5, 5), Some(INK));
}

#[test]
fn resize_crops_and_pads_with_background() {
    let mut session = EditorSession::with_canvas(20, 20);
    dot(&mut session, 3, 3);
    dot(&mut session, 18, 18);

    session.resize_canvas(10, 30);
    // Kept content survives, cropped content is gone, new rows are white.
    assert_eq!(session.surface().get(3, 3), Some(INK));
    assert_eq!(session.surface().get(18, 18), None);
    assert_eq!(session.surface().get(5, 25), Some(BACKGROUND));
}

#[test]
fn resize_clears_active_selection() {
    let mut session = EditorSession::with_canvas(20, 20);
    session.select_all();
    assert!(session.selection().selection().is_some());
    session.resize_canvas(10, 10);
    assert!(session.selection().selection().is_none());
    assert!(!session.selection().ants().is_active());
}

#[test]
fn load_image_accepts_arbitrary_dimensions() {
    let mut session = EditorSession::with_canvas(20, 20);
    dot(&mut session, 5, 5);
    let image = RgbaImage::from_pixel(7, 13, Rgba([9, 8, 7, 255]));
    session.load_image(image);

    assert_eq!(
        (session.surface().width(), session.surface().height()),
        (7, 13)
    );
    assert_eq!(session.surface().get(0, 0), Some(Rgba([9, 8, 7, 255])));
    assert!(!session.history().can_undo());
}

#[test]
fn export_and_reload_png_is_lossless() {
    let mut session = EditorSession::with_canvas(24, 24);
    dot(&mut session, 4, 4);
    dot(&mut session, 20, 20);

    let path = std::env::temp_dir().join("retropaint-test-export.png");
    io::export_surface(session.surface(), &path, SaveFormat::Png).unwrap();
    let reloaded = io::load_image(&path).unwrap();
    fs::remove_file(&path).ok();

    assert_eq!(reloaded.as_raw().as_slice(), session.surface().as_raw());
}

#[test]
fn bmp_export_keeps_dimensions() {
    let session = EditorSession::with_canvas(17, 9);
    let bytes = io::encode_surface(session.surface(), SaveFormat::Bmp).unwrap();
    let back = io::load_image_bytes(&bytes).unwrap();
    assert_eq!((back.width(), back.height()), (17, 9));
}

#[test]
fn jpeg_export_decodes_with_correct_dimensions() {
    // JPEG is lossy; only shape and decodability are guaranteed.
    let session = EditorSession::with_canvas(31, 15);
    let bytes = io::encode_surface(session.surface(), SaveFormat::Jpeg).unwrap();
    let back = io::load_image_bytes(&bytes).unwrap();
    assert_eq!((back.width(), back.height()), (31, 15));
}

#[test]
fn save_format_inference_defaults_to_png() {
    assert_eq!(SaveFormat::from_extension("PNG"), SaveFormat::Png);
    assert_eq!(SaveFormat::from_extension("jpeg"), SaveFormat::Jpeg);
    assert_eq!(SaveFormat::from_extension("bmp"), SaveFormat::Bmp);
    assert_eq!(SaveFormat::from_extension("webp"), SaveFormat::Png);
}
