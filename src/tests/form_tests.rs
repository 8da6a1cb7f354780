use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde_json::json;

use crate::form::{FieldState, FieldValue, FormState};
use crate::layout::SectionSchema;
use crate::schema::{FieldKind, FieldSchema, to_pointer};

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn mk_schema(name: &str, path: &[&str], kind: FieldKind) -> FieldSchema {
    let path: Vec<String> = path.iter().map(|s| s.to_string()).collect();
    FieldSchema {
        name: name.to_string(),
        pointer: to_pointer(&path),
        path,
        title: name.to_string(),
        description: None,
        kind,
        required: false,
        default: None,
        format: None,
    }
}

fn mk_field(name: &str, kind: FieldKind) -> FieldState {
    FieldState::from_schema(mk_schema(name, &[name], kind))
}

fn mk_section(id: &str, fields: Vec<FieldSchema>) -> SectionSchema {
    SectionSchema {
        id: id.to_string(),
        title: id.to_string(),
        description: None,
        fields,
    }
}

#[test]
fn typing_into_a_text_field_updates_its_value() {
    let mut field = mk_field("name", FieldKind::String);
    for ch in "Alice".chars() {
        assert!(field.handle_key(&key(KeyCode::Char(ch))));
    }
    assert!(field.dirty);
    assert_eq!(
        field.current_value().unwrap(),
        Some(json!("Alice"))
    );
}

#[test]
fn empty_text_contributes_no_value() {
    let field = mk_field("name", FieldKind::String);
    assert_eq!(field.current_value().unwrap(), None);
}

#[test]
fn integer_buffers_are_coerced_or_rejected() {
    let mut field = mk_field("age", FieldKind::Integer);
    for ch in "42".chars() {
        field.handle_key(&key(KeyCode::Char(ch)));
    }
    assert_eq!(field.current_value().unwrap(), Some(json!(42)));

    field.handle_key(&key(KeyCode::Char('x')));
    let err = field.current_value().unwrap_err();
    assert_eq!(err.pointer, "/age");
    assert!(err.message.contains("not a valid integer"));
}

#[test]
fn number_buffers_accept_fractions() {
    let mut field = mk_field("ratio", FieldKind::Number);
    for ch in "2.5".chars() {
        field.handle_key(&key(KeyCode::Char(ch)));
    }
    assert_eq!(field.current_value().unwrap(), Some(json!(2.5)));
}

#[test]
fn booleans_toggle_with_space() {
    let mut field = mk_field("flag", FieldKind::Boolean);
    assert_eq!(field.current_value().unwrap(), Some(json!(false)));
    assert!(field.handle_key(&key(KeyCode::Char(' '))));
    assert_eq!(field.current_value().unwrap(), Some(json!(true)));
    assert_eq!(field.display_value(), "[x]");
}

#[test]
fn enums_cycle_and_wrap() {
    let options = vec!["red".to_string(), "green".to_string(), "blue".to_string()];
    let mut field = mk_field("color", FieldKind::Enum(options));
    assert_eq!(field.current_value().unwrap(), Some(json!("red")));

    field.handle_key(&key(KeyCode::Right));
    assert_eq!(field.current_value().unwrap(), Some(json!("green")));

    field.handle_key(&key(KeyCode::Left));
    field.handle_key(&key(KeyCode::Left));
    assert_eq!(field.current_value().unwrap(), Some(json!("blue")));
}

#[test]
fn array_buffers_split_on_commas() {
    let mut field = mk_field("hobbies", FieldKind::Array(Box::new(FieldKind::String)));
    for ch in "reading, chess,".chars() {
        field.handle_key(&key(KeyCode::Char(ch)));
    }
    assert_eq!(
        field.current_value().unwrap(),
        Some(json!(["reading", "chess"]))
    );
}

#[test]
fn integer_arrays_coerce_each_entry() {
    let mut field = mk_field("ports", FieldKind::Array(Box::new(FieldKind::Integer)));
    for ch in "80, 443".chars() {
        field.handle_key(&key(KeyCode::Char(ch)));
    }
    assert_eq!(field.current_value().unwrap(), Some(json!([80, 443])));

    field.handle_key(&key(KeyCode::Char('x')));
    assert!(field.current_value().is_err());
}

#[test]
fn defaults_seed_the_initial_value() {
    let mut schema = mk_schema("level", &["level"], FieldKind::String);
    schema.default = Some(json!("info"));
    let field = FieldState::from_schema(schema);
    assert!(matches!(&field.value, FieldValue::Text(text) if text == "info"));
    assert!(!field.dirty);
}

#[test]
fn seeding_from_form_data_does_not_mark_dirty() {
    let sections = vec![mk_section(
        "general",
        vec![
            mk_schema("name", &["name"], FieldKind::String),
            mk_schema("newsletter", &["prefs", "newsletter"], FieldKind::Boolean),
        ],
    )];
    let mut state = FormState::from_sections(sections);
    state.seed_from_value(&json!({"name": "Alice", "prefs": {"newsletter": true}}));

    assert!(!state.sections[0].fields[0].dirty);
    assert_eq!(
        state.sections[0].fields[0].current_value().unwrap(),
        Some(json!("Alice"))
    );
    assert_eq!(
        state.sections[0].fields[1].current_value().unwrap(),
        Some(json!(true))
    );
}

#[test]
fn built_values_nest_along_field_paths() {
    let sections = vec![mk_section(
        "general",
        vec![
            mk_schema("name", &["name"], FieldKind::String),
            mk_schema("color", &["prefs", "color"], FieldKind::String),
        ],
    )];
    let mut state = FormState::from_sections(sections);
    state.seed_from_value(&json!({"name": "Bob", "prefs": {"color": "teal"}}));

    let value = state.try_build_value().unwrap();
    assert_eq!(value, json!({"name": "Bob", "prefs": {"color": "teal"}}));
}

#[test]
fn focus_wraps_across_sections_and_skips_empty_ones() {
    let sections = vec![
        mk_section("a", vec![mk_schema("a1", &["a1"], FieldKind::String)]),
        mk_section("empty", vec![]),
        mk_section(
            "b",
            vec![
                mk_schema("b1", &["b1"], FieldKind::String),
                mk_schema("b2", &["b2"], FieldKind::String),
            ],
        ),
    ];
    let mut state = FormState::from_sections(sections);
    assert_eq!(state.section_index, 0);

    state.focus_next_field();
    assert_eq!(state.section_index, 2);
    assert_eq!(state.field_index, 0);

    state.focus_next_field();
    assert_eq!(state.field_index, 1);

    state.focus_next_field();
    assert_eq!(state.section_index, 0);

    state.focus_prev_field();
    assert_eq!(state.section_index, 2);
    assert_eq!(state.field_index, 1);
}

#[test]
fn section_cycling_skips_empty_sections() {
    let sections = vec![
        mk_section("a", vec![mk_schema("a1", &["a1"], FieldKind::String)]),
        mk_section("empty", vec![]),
        mk_section("b", vec![mk_schema("b1", &["b1"], FieldKind::String)]),
    ];
    let mut state = FormState::from_sections(sections);
    state.focus_next_section(1);
    assert_eq!(state.section_index, 2);
    state.focus_next_section(1);
    assert_eq!(state.section_index, 0);
}

#[test]
fn errors_attach_by_pointer() {
    let sections = vec![mk_section(
        "general",
        vec![mk_schema("email", &["email"], FieldKind::String)],
    )];
    let mut state = FormState::from_sections(sections);

    assert!(state.set_error("/email", "is required".to_string()));
    assert!(!state.set_error("/missing", "nope".to_string()));
    assert_eq!(state.error_count(), 1);

    state.clear_errors();
    assert_eq!(state.error_count(), 0);
}
