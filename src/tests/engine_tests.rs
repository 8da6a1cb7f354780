use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde_json::{Value, json};

use crate::defaults::{DEFAULT_SCHEMA_TEXT, DEFAULT_UI_SCHEMA_TEXT};
use crate::engine::{FormEngine, SchemaFormEngine};

fn default_schema() -> Value {
    serde_json::from_str(DEFAULT_SCHEMA_TEXT).unwrap()
}

fn default_ui_schema() -> Value {
    serde_json::from_str(DEFAULT_UI_SCHEMA_TEXT).unwrap()
}

#[test]
fn builds_a_form_from_the_default_schema() {
    let engine = SchemaFormEngine;
    let form = engine
        .build(&default_schema(), None, &json!({}))
        .unwrap();
    assert!(!form.state.is_empty());
    // Two sections in the default layout: General and Preferences.
    assert_eq!(form.state.sections.len(), 2);
}

#[test]
fn ui_schema_drives_the_sectioning() {
    let engine = SchemaFormEngine;
    let ui = default_ui_schema();
    let form = engine
        .build(&default_schema(), Some(&ui), &json!({}))
        .unwrap();
    let titles: Vec<&str> = form
        .state
        .sections
        .iter()
        .map(|s| s.title.as_str())
        .collect();
    assert_eq!(
        titles,
        vec!["Personal Information", "Preferences", "Interests"]
    );
}

#[test]
fn existing_form_data_is_seeded_into_the_fields() {
    let engine = SchemaFormEngine;
    let form = engine
        .build(&default_schema(), None, &json!({"name": "Alice"}))
        .unwrap();
    let name = form.state.sections[0].fields.first().unwrap();
    assert_eq!(name.current_value().unwrap(), Some(json!("Alice")));
}

#[test]
fn change_events_carry_data_and_validation_errors() {
    let engine = SchemaFormEngine;
    let mut form = engine
        .build(&default_schema(), None, &json!({}))
        .unwrap();
    form.state.seed_from_value(&json!({"name": "Alice"}));

    let change = form.change().expect("value should build");
    assert_eq!(change.data.get("name"), Some(&json!("Alice")));
    // "email" is required but absent, so validation must complain.
    assert!(change.errors.iter().any(|e| e.contains("email")));
}

#[test]
fn a_valid_document_yields_no_errors() {
    let schema = json!({
        "type": "object",
        "properties": {"name": {"type": "string"}},
        "required": ["name"]
    });
    let engine = SchemaFormEngine;
    let mut form = engine.build(&schema, None, &json!({})).unwrap();
    form.state.seed_from_value(&json!({"name": "Bo"}));

    let change = form.change().unwrap();
    assert_eq!(change.data, json!({"name": "Bo"}));
    assert!(change.errors.is_empty());
    assert_eq!(form.state.error_count(), 0);
}

#[test]
fn uncoercible_buffers_suppress_the_change_event() {
    let schema = json!({
        "type": "object",
        "properties": {"age": {"type": "integer"}}
    });
    let engine = SchemaFormEngine;
    let mut form = engine.build(&schema, None, &json!({})).unwrap();
    let field = form.state.focused_field_mut().unwrap();
    field.handle_key(&KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE));

    assert!(form.change().is_none());
    assert_eq!(form.state.error_count(), 1);
}

#[test]
fn validation_errors_land_on_the_matching_field() {
    let schema = json!({
        "type": "object",
        "properties": {"port": {"type": "integer", "minimum": 1024}}
    });
    let engine = SchemaFormEngine;
    let mut form = engine.build(&schema, None, &json!({})).unwrap();
    form.state.seed_from_value(&json!({"port": 80}));

    let change = form.change().unwrap();
    assert_eq!(change.errors.len(), 1);
    assert!(change.errors[0].starts_with("/port"));
    assert!(form.state.sections[0].fields[0].error.is_some());
}

#[test]
fn schema_shaped_like_a_scalar_fails_to_build() {
    let engine = SchemaFormEngine;
    assert!(engine.build(&json!({"type": "string"}), None, &json!({})).is_err());
    assert!(engine.build(&json!(42), None, &json!({})).is_err());
}

#[test]
fn broken_ui_schema_shape_fails_to_build() {
    let engine = SchemaFormEngine;
    let err = engine
        .build(&default_schema(), Some(&json!({"elements": 5})), &json!({}))
        .unwrap_err();
    assert!(format!("{err:#}").contains("elements"));
}
