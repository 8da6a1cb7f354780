use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::editor::TextEditor;

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn type_str(editor: &mut TextEditor, text: &str) {
    for ch in text.chars() {
        assert!(editor.handle_key(&key(KeyCode::Char(ch))));
    }
}

#[test]
fn typing_builds_up_the_buffer() {
    let mut editor = TextEditor::new();
    type_str(&mut editor, "{}");
    assert_eq!(editor.text(), "{}");
    assert_eq!(editor.cursor_col(), 2);
}

#[test]
fn enter_splits_the_current_line() {
    let mut editor = TextEditor::from_text("ab");
    editor.handle_key(&key(KeyCode::Right));
    assert!(editor.handle_key(&key(KeyCode::Enter)));
    assert_eq!(editor.text(), "a\nb");
    assert_eq!(editor.cursor_row(), 1);
    assert_eq!(editor.cursor_col(), 0);
}

#[test]
fn backspace_joins_lines_at_line_start() {
    let mut editor = TextEditor::from_text("a\nb");
    editor.handle_key(&key(KeyCode::Down));
    assert_eq!(editor.cursor_row(), 1);
    assert!(editor.handle_key(&key(KeyCode::Backspace)));
    assert_eq!(editor.text(), "ab");
    assert_eq!(editor.cursor_row(), 0);
    assert_eq!(editor.cursor_col(), 1);
}

#[test]
fn backspace_at_document_start_is_a_no_op() {
    let mut editor = TextEditor::from_text("x");
    assert!(!editor.handle_key(&key(KeyCode::Backspace)));
    assert_eq!(editor.text(), "x");
}

#[test]
fn delete_joins_the_next_line_at_line_end() {
    let mut editor = TextEditor::from_text("a\nb");
    editor.handle_key(&key(KeyCode::End));
    assert!(editor.handle_key(&key(KeyCode::Delete)));
    assert_eq!(editor.text(), "ab");
}

#[test]
fn navigation_is_applied_but_not_reported_as_a_change() {
    let mut editor = TextEditor::from_text("ab\ncd");
    assert!(!editor.handle_key(&key(KeyCode::Down)));
    assert!(!editor.handle_key(&key(KeyCode::End)));
    assert_eq!(editor.cursor_row(), 1);
    assert_eq!(editor.cursor_col(), 2);
    assert!(!editor.handle_key(&key(KeyCode::Up)));
    assert_eq!(editor.cursor_col(), 2);
}

#[test]
fn cursor_clamps_to_shorter_lines() {
    let mut editor = TextEditor::from_text("long line\nhi");
    editor.handle_key(&key(KeyCode::End));
    editor.handle_key(&key(KeyCode::Down));
    assert_eq!(editor.cursor_col(), 2);
}

#[test]
fn control_modified_characters_are_ignored() {
    let mut editor = TextEditor::from_text("");
    let changed = editor.handle_key(&KeyEvent::new(
        KeyCode::Char('r'),
        KeyModifiers::CONTROL,
    ));
    assert!(!changed);
    assert_eq!(editor.text(), "");
}

#[test]
fn insert_str_honors_embedded_newlines() {
    let mut editor = TextEditor::new();
    editor.insert_str("{\n  \"a\": 1\r\n}");
    assert_eq!(editor.text(), "{\n  \"a\": 1\n}");
    assert_eq!(editor.line_count(), 3);
}

#[test]
fn display_col_accounts_for_wide_glyphs() {
    let mut editor = TextEditor::new();
    editor.insert_str("日本");
    assert_eq!(editor.cursor_col(), 2);
    assert_eq!(editor.display_col(), 4);
}

#[test]
fn scroll_follows_the_cursor() {
    let mut editor = TextEditor::from_text("a\nb\nc\nd\ne");
    for _ in 0..4 {
        editor.handle_key(&key(KeyCode::Down));
    }
    editor.scroll_to_cursor(2);
    assert_eq!(editor.scroll(), 3);

    for _ in 0..4 {
        editor.handle_key(&key(KeyCode::Up));
    }
    editor.scroll_to_cursor(2);
    assert_eq!(editor.scroll(), 0);
}

#[test]
fn set_text_round_trips() {
    let mut editor = TextEditor::new();
    editor.set_text("{\n}");
    assert_eq!(editor.text(), "{\n}");
    assert_eq!(editor.cursor_row(), 0);
}
