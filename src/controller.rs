use serde_json::{Map, Value};

use crate::defaults::{DEFAULT_SCHEMA_TEXT, DEFAULT_UI_SCHEMA_TEXT};
use crate::editor::TextEditor;

pub const SCHEMA_ERROR: &str = "Invalid JSON in schema";
pub const UI_SCHEMA_ERROR: &str = "Invalid JSON in UI schema";

/// Focusable panes of the playground.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Schema,
    UiSchema,
    Preview,
}

/// The editor/preview controller: two raw schema texts, the mirrored form
/// data, and one JSON-parse error per pane.
///
/// The preview is suppressed while either pane holds invalid JSON; the
/// displayed message always corresponds to the most recently edited pane
/// when that pane is the broken one. Parse failures never revert the
/// user's text and are cleared by the next successful parse.
#[derive(Debug, Clone)]
pub struct Controller {
    pub schema_editor: TextEditor,
    pub ui_schema_editor: TextEditor,
    form_data: Value,
    schema_error: Option<String>,
    ui_schema_error: Option<String>,
    last_edited: Pane,
}

impl Controller {
    pub fn new() -> Self {
        Self::from_texts(DEFAULT_SCHEMA_TEXT, DEFAULT_UI_SCHEMA_TEXT)
    }

    pub fn from_texts(schema_text: &str, ui_schema_text: &str) -> Self {
        let mut controller = Self {
            schema_editor: TextEditor::from_text(schema_text),
            ui_schema_editor: TextEditor::from_text(ui_schema_text),
            form_data: Value::Object(Map::new()),
            schema_error: None,
            ui_schema_error: None,
            last_edited: Pane::Schema,
        };
        controller.sync_schema();
        controller.sync_ui_schema();
        controller.last_edited = Pane::Schema;
        controller
    }

    /// Replace the schema text wholesale and revalidate.
    pub fn edit_schema(&mut self, text: &str) {
        self.schema_editor.set_text(text);
        self.sync_schema();
    }

    /// Replace the UI schema text wholesale and revalidate.
    pub fn edit_ui_schema(&mut self, text: &str) {
        self.ui_schema_editor.set_text(text);
        self.sync_ui_schema();
    }

    /// Revalidate the schema pane after an in-place edit.
    pub fn sync_schema(&mut self) {
        self.last_edited = Pane::Schema;
        let text = self.schema_editor.text();
        self.schema_error = match serde_json::from_str::<Value>(&text) {
            Ok(_) => None,
            Err(_) => Some(SCHEMA_ERROR.to_string()),
        };
    }

    /// Revalidate the UI schema pane after an in-place edit. Blank text is
    /// "no UI schema supplied", never a parse error.
    pub fn sync_ui_schema(&mut self) {
        self.last_edited = Pane::UiSchema;
        let text = self.ui_schema_editor.text();
        self.ui_schema_error = if text.trim().is_empty() {
            None
        } else {
            match serde_json::from_str::<Value>(&text) {
                Ok(_) => None,
                Err(_) => Some(UI_SCHEMA_ERROR.to_string()),
            }
        };
    }

    /// Mirror a change event from the rendering engine into the controller.
    /// The validation errors ride along only for the caller's status line;
    /// they are never stored here.
    pub fn on_form_change(&mut self, data: Value, _errors: &[String]) {
        self.form_data = data;
    }

    /// The single error message currently shown, if any: the most recently
    /// edited pane wins, otherwise whichever pane is broken.
    pub fn active_error(&self) -> Option<&str> {
        let (first, second) = match self.last_edited {
            Pane::UiSchema => (&self.ui_schema_error, &self.schema_error),
            _ => (&self.schema_error, &self.ui_schema_error),
        };
        first.as_deref().or(second.as_deref())
    }

    pub fn schema_error(&self) -> Option<&str> {
        self.schema_error.as_deref()
    }

    pub fn ui_schema_error(&self) -> Option<&str> {
        self.ui_schema_error.as_deref()
    }

    /// Whether the rendering engine may be invoked at all.
    pub fn preview_enabled(&self) -> bool {
        self.schema_error.is_none() && self.ui_schema_error.is_none()
    }

    pub fn parsed_schema(&self) -> Option<Value> {
        serde_json::from_str(&self.schema_editor.text()).ok()
    }

    pub fn parsed_ui_schema(&self) -> Option<Value> {
        let text = self.ui_schema_editor.text();
        if text.trim().is_empty() {
            return None;
        }
        serde_json::from_str(&text).ok()
    }

    pub fn form_data(&self) -> &Value {
        &self.form_data
    }

    pub fn form_data_pretty(&self) -> String {
        serde_json::to_string_pretty(&self.form_data).unwrap_or_default()
    }

    /// Restore both editors to the built-in defaults. Form data is kept and
    /// reseeded into the rebuilt preview.
    pub fn reset_to_defaults(&mut self) {
        self.edit_schema(DEFAULT_SCHEMA_TEXT);
        self.edit_ui_schema(DEFAULT_UI_SCHEMA_TEXT);
        self.last_edited = Pane::Schema;
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}
