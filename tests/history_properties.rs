use image::Rgba;
use retropaint::canvas::{Surface, BACKGROUND};
use retropaint::history::{HistoryManager, Snapshot};
use retropaint::session::EditorSession;
use retropaint::tools::ToolKind;

const INK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Draw a short pencil stroke; commits exactly one history snapshot.
fn stroke(session: &mut EditorSession, y: i32) {
    session.pointer_down(2, y);
    session.pointer_move(12, y, false);
    session.pointer_up(12, y, false);
}

#[test]
fn n_commits_then_n_undos_restores_baseline() {
    let mut session = EditorSession::with_canvas(32, 32);
    let baseline = session.surface().as_raw().to_vec();

    for i in 0..5 {
        stroke(&mut session, 3 + i * 4);
    }
    assert_ne!(session.surface().as_raw(), baseline.as_slice());

    for _ in 0..5 {
        session.undo();
    }
    assert_eq!(session.surface().as_raw(), baseline.as_slice());
}

#[test]
fn undo_redo_undo_matches_plain_undo() {
    let mut a = EditorSession::with_canvas(24, 24);
    let mut b = EditorSession::with_canvas(24, 24);
    for s in [&mut a, &mut b] {
        stroke(s, 4);
        stroke(s, 10);
    }

    // a: undo  |  b: undo, redo, undo
    a.undo();
    b.undo();
    b.redo();
    b.undo();
    assert_eq!(a.surface().as_raw(), b.surface().as_raw());
}

#[test]
fn undo_past_baseline_is_silent() {
    let mut session = EditorSession::with_canvas(16, 16);
    let baseline = session.surface().as_raw().to_vec();
    stroke(&mut session, 5);
    for _ in 0..10 {
        session.undo();
    }
    assert_eq!(session.surface().as_raw(), baseline.as_slice());
    // Redo is still possible exactly once.
    session.redo();
    assert_ne!(session.surface().as_raw(), baseline.as_slice());
    session.redo();
}

#[test]
fn capacity_evicts_oldest_and_preserves_second_oldest() {
    let mut history = HistoryManager::new(4);
    let mut marked = Vec::new();
    for mark in 0u8..4 {
        let mut s = Surface::new(4, 4, BACKGROUND);
        s.set(0, 0, Rgba([mark, 0, 0, 255]));
        marked.push(s.as_raw().to_vec());
        if mark == 0 {
            history.reset(Snapshot::capture(&s));
        } else {
            history.push(Snapshot::capture(&s));
        }
    }
    assert_eq!(history.len(), 4);
    let second_oldest = marked[1].clone();

    // One more push exceeds the cap: snapshot 0 is evicted and the old
    // second-oldest becomes the oldest retained state.
    let mut s = Surface::new(4, 4, BACKGROUND);
    s.set(0, 0, Rgba([9, 0, 0, 255]));
    history.push(Snapshot::capture(&s));

    assert_eq!(history.len(), 4);
    assert_eq!(history.oldest().unwrap().as_raw(), second_oldest.as_slice());
    assert!(history.index() < history.len());
}

#[test]
fn history_length_never_exceeds_cap() {
    let mut history = HistoryManager::new(3);
    let base = Surface::new(4, 4, BACKGROUND);
    history.reset(Snapshot::capture(&base));
    for _ in 0..20 {
        history.push(Snapshot::capture(&base));
        assert!(history.len() <= 3);
        assert!(history.index() < history.len());
    }
}

#[test]
fn new_edit_discards_redo_tail() {
    let mut session = EditorSession::with_canvas(20, 20);
    stroke(&mut session, 4);
    stroke(&mut session, 8);
    session.undo();
    stroke(&mut session, 14);
    // The undone stroke is no longer reachable.
    let after = session.surface().as_raw().to_vec();
    session.redo();
    assert_eq!(session.surface().as_raw(), after.as_slice());
}

#[test]
fn undo_across_resize_restores_old_dimensions() {
    let mut session = EditorSession::with_canvas(10, 10);
    session.set_tool(ToolKind::Pencil);
    stroke(&mut session, 3);
    session.resize_canvas(25, 5);
    assert_eq!(session.surface().width(), 25);
    session.undo();
    assert_eq!(
        (session.surface().width(), session.surface().height()),
        (10, 10)
    );
    assert_eq!(session.surface().get(2, 3), Some(INK));
}
