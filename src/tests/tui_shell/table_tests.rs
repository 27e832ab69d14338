use super::*;

#[test]
fn header_checkbox_tracks_selection_flags() {
    assert_eq!(header_checkbox(SelectionFlags::default()), "[ ]");
    assert_eq!(
        header_checkbox(SelectionFlags {
            all_selected: true,
            partially_selected: false,
        }),
        "[x]"
    );
    assert_eq!(
        header_checkbox(SelectionFlags {
            all_selected: false,
            partially_selected: true,
        }),
        "[-]"
    );
}

#[test]
fn window_keeps_cursor_visible() {
    assert_eq!(window_start(0, 5, 10), 0);
    assert_eq!(window_start(3, 100, 10), 0);
    assert_eq!(window_start(15, 100, 10), 6);
    assert_eq!(window_start(99, 100, 10), 90);
    assert_eq!(window_start(5, 100, 0), 0);
}

#[test]
fn snippet_joins_and_truncates() {
    let rec = Record::new("r", "2026-01-01T00:00:00Z")
        .with_field("email", "a@b.io")
        .with_field("message", "line one\nline two");
    assert_eq!(
        snippet(&rec, &["email", "message"], 80),
        "a@b.io | line one line two"
    );
    let short = snippet(&rec, &["message"], 6);
    assert_eq!(short, "line ~");
}
