use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde_json::{Map, Number, Value};

use crate::layout::SectionSchema;
use crate::schema::{FieldKind, FieldSchema};

#[derive(Debug, Clone)]
pub struct FieldCoercionError {
    pub pointer: String,
    pub message: String,
}

impl std::fmt::Display for FieldCoercionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.pointer, self.message)
    }
}

impl std::error::Error for FieldCoercionError {}

#[derive(Debug, Clone)]
pub enum FieldValue {
    Text(String),
    Bool(bool),
    Enum { options: Vec<String>, selected: usize },
    Array(String),
}

#[derive(Debug, Clone)]
pub struct FieldState {
    pub schema: FieldSchema,
    pub value: FieldValue,
    pub dirty: bool,
    pub error: Option<String>,
}

impl FieldState {
    pub fn from_schema(schema: FieldSchema) -> Self {
        let value = match &schema.kind {
            FieldKind::String | FieldKind::Integer | FieldKind::Number => {
                FieldValue::Text(default_text(&schema))
            }
            FieldKind::Boolean => {
                let default = schema
                    .default
                    .as_ref()
                    .and_then(Value::as_bool)
                    .unwrap_or(false);
                FieldValue::Bool(default)
            }
            FieldKind::Enum(options) => {
                let default = schema.default.as_ref().map(value_to_string);
                let selected = default
                    .and_then(|value| options.iter().position(|item| item == &value))
                    .unwrap_or(0);
                FieldValue::Enum {
                    options: options.clone(),
                    selected,
                }
            }
            FieldKind::Array(_) => {
                let default = schema
                    .default
                    .as_ref()
                    .and_then(Value::as_array)
                    .map(|items| array_to_string(items))
                    .unwrap_or_default();
                FieldValue::Array(default)
            }
        };

        FieldState {
            schema,
            value,
            dirty: false,
            error: None,
        }
    }

    /// Overwrite the field from existing form data without marking it dirty.
    pub fn seed_value(&mut self, value: &Value) {
        match &mut self.value {
            FieldValue::Text(buffer) => {
                if !value.is_null() {
                    *buffer = value_to_string(value);
                }
            }
            FieldValue::Bool(current) => {
                if let Some(flag) = value.as_bool() {
                    *current = flag;
                }
            }
            FieldValue::Enum { options, selected } => {
                let wanted = value_to_string(value);
                if let Some(position) = options.iter().position(|item| item == &wanted) {
                    *selected = position;
                }
            }
            FieldValue::Array(buffer) => {
                if let Some(items) = value.as_array() {
                    *buffer = array_to_string(items);
                }
            }
        }
    }

    /// Apply a key press to the field. Returns `true` when the value changed.
    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        let changed = match &mut self.value {
            FieldValue::Text(buffer) | FieldValue::Array(buffer) => {
                handle_text_edit(buffer, key)
            }
            FieldValue::Bool(current) => match key.code {
                KeyCode::Char(' ') | KeyCode::Enter | KeyCode::Left | KeyCode::Right => {
                    *current = !*current;
                    true
                }
                _ => false,
            },
            FieldValue::Enum { options, selected } => {
                if options.is_empty() {
                    return false;
                }
                match key.code {
                    KeyCode::Left => {
                        *selected = (*selected + options.len() - 1) % options.len();
                        true
                    }
                    KeyCode::Right | KeyCode::Char(' ') => {
                        *selected = (*selected + 1) % options.len();
                        true
                    }
                    _ => false,
                }
            }
        };

        if changed {
            self.dirty = true;
        }
        changed
    }

    pub fn current_value(&self) -> Result<Option<Value>, FieldCoercionError> {
        match &self.value {
            FieldValue::Text(buffer) => {
                coerce_scalar(buffer.trim(), &self.schema.kind, &self.schema.pointer)
            }
            FieldValue::Bool(current) => Ok(Some(Value::Bool(*current))),
            FieldValue::Enum { options, selected } => {
                Ok(options.get(*selected).cloned().map(Value::String))
            }
            FieldValue::Array(buffer) => {
                let inner = match &self.schema.kind {
                    FieldKind::Array(inner) => inner.as_ref(),
                    _ => &FieldKind::String,
                };
                let mut items = Vec::new();
                for entry in buffer.split(',') {
                    let entry = entry.trim();
                    if entry.is_empty() {
                        continue;
                    }
                    if let Some(value) = coerce_scalar(entry, inner, &self.schema.pointer)? {
                        items.push(value);
                    }
                }
                if items.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(Value::Array(items)))
                }
            }
        }
    }

    pub fn display_value(&self) -> String {
        match &self.value {
            FieldValue::Text(buffer) => {
                if buffer.is_empty() {
                    match &self.schema.format {
                        Some(format) => format!("<{format}>"),
                        None => "<empty>".to_string(),
                    }
                } else {
                    buffer.clone()
                }
            }
            FieldValue::Bool(true) => "[x]".to_string(),
            FieldValue::Bool(false) => "[ ]".to_string(),
            FieldValue::Enum { options, selected } => options
                .get(*selected)
                .cloned()
                .unwrap_or_else(|| "<none>".to_string()),
            FieldValue::Array(buffer) => {
                if buffer.is_empty() {
                    "<empty list>".to_string()
                } else {
                    buffer.clone()
                }
            }
        }
    }

    pub fn set_error(&mut self, message: String) {
        self.error = Some(message);
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }
}

#[derive(Debug, Clone)]
pub struct SectionState {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub fields: Vec<FieldState>,
}

impl SectionState {
    pub fn from_schema(section: SectionSchema) -> Self {
        Self {
            id: section.id,
            title: section.title,
            description: section.description,
            fields: section
                .fields
                .into_iter()
                .map(FieldState::from_schema)
                .collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FormState {
    pub sections: Vec<SectionState>,
    pub section_index: usize,
    pub field_index: usize,
}

impl FormState {
    pub fn from_sections(sections: Vec<SectionSchema>) -> Self {
        let mut state = Self {
            sections: sections.into_iter().map(SectionState::from_schema).collect(),
            section_index: 0,
            field_index: 0,
        };
        state.normalize_focus();
        state
    }

    pub fn is_empty(&self) -> bool {
        self.sections.iter().all(|section| section.fields.is_empty())
    }

    pub fn active_section(&self) -> Option<&SectionState> {
        self.sections.get(self.section_index)
    }

    pub fn focused_field(&self) -> Option<&FieldState> {
        self.active_section()
            .and_then(|section| section.fields.get(self.field_index))
    }

    pub fn focused_field_mut(&mut self) -> Option<&mut FieldState> {
        self.normalize_focus();
        let index = self.field_index;
        self.sections
            .get_mut(self.section_index)
            .and_then(|section| section.fields.get_mut(index))
    }

    pub fn focus_next_field(&mut self) {
        self.normalize_focus();
        let Some(section) = self.active_section() else {
            return;
        };
        if section.fields.is_empty() {
            return;
        }
        if self.field_index + 1 < section.fields.len() {
            self.field_index += 1;
        } else {
            self.advance_section(1);
        }
    }

    pub fn focus_prev_field(&mut self) {
        self.normalize_focus();
        let Some(section) = self.active_section() else {
            return;
        };
        if section.fields.is_empty() {
            return;
        }
        if self.field_index > 0 {
            self.field_index -= 1;
        } else {
            self.advance_section(-1);
            if let Some(current) = self.active_section() {
                self.field_index = current.fields.len().saturating_sub(1);
            }
        }
    }

    pub fn focus_next_section(&mut self, delta: i32) {
        self.normalize_focus();
        self.advance_section(delta);
    }

    pub fn try_build_value(&self) -> Result<Value, FieldCoercionError> {
        let mut root = Value::Object(Map::new());
        for section in &self.sections {
            for field in &section.fields {
                if let Some(value) = field.current_value()? {
                    insert_path(&mut root, &field.schema.path, value);
                }
            }
        }
        Ok(root)
    }

    pub fn seed_from_value(&mut self, value: &Value) {
        for section in &mut self.sections {
            for field in &mut section.fields {
                if let Some(subvalue) = value_at_path(value, &field.schema.path) {
                    field.seed_value(subvalue);
                }
            }
        }
    }

    pub fn clear_errors(&mut self) {
        for section in &mut self.sections {
            for field in &mut section.fields {
                field.clear_error();
            }
        }
    }

    pub fn set_error(&mut self, pointer: &str, message: String) -> bool {
        for section in &mut self.sections {
            for field in &mut section.fields {
                if field.schema.pointer == pointer {
                    field.set_error(message);
                    return true;
                }
            }
        }
        false
    }

    pub fn error_count(&self) -> usize {
        self.sections
            .iter()
            .map(|section| {
                section
                    .fields
                    .iter()
                    .filter(|field| field.error.is_some())
                    .count()
            })
            .sum()
    }

    fn advance_section(&mut self, delta: i32) {
        let populated = self
            .sections
            .iter()
            .filter(|section| !section.fields.is_empty())
            .count();
        if populated == 0 {
            return;
        }
        let len = self.sections.len() as i32;
        let mut next = self.section_index as i32;
        loop {
            next = ((next + delta) % len + len) % len;
            if !self.sections[next as usize].fields.is_empty() {
                break;
            }
        }
        self.section_index = next as usize;
        self.field_index = 0;
    }

    fn normalize_focus(&mut self) {
        if self.sections.is_empty() {
            self.section_index = 0;
            self.field_index = 0;
            return;
        }
        if self.section_index >= self.sections.len() {
            self.section_index = 0;
        }
        if self.sections[self.section_index].fields.is_empty() {
            if let Some((idx, _)) = self
                .sections
                .iter()
                .enumerate()
                .find(|(_, section)| !section.fields.is_empty())
            {
                self.section_index = idx;
                self.field_index = 0;
            } else {
                self.field_index = 0;
                return;
            }
        }
        let field_len = self.sections[self.section_index].fields.len();
        if self.field_index >= field_len {
            self.field_index = field_len.saturating_sub(1);
        }
    }
}

fn handle_text_edit(buffer: &mut String, key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Char(ch) => {
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                return false;
            }
            buffer.push(ch);
            true
        }
        KeyCode::Backspace => buffer.pop().is_some(),
        KeyCode::Delete => {
            if buffer.is_empty() {
                false
            } else {
                buffer.clear();
                true
            }
        }
        _ => false,
    }
}

fn coerce_scalar(
    text: &str,
    kind: &FieldKind,
    pointer: &str,
) -> Result<Option<Value>, FieldCoercionError> {
    if text.is_empty() {
        return Ok(None);
    }
    match kind {
        FieldKind::Integer => text
            .parse::<i64>()
            .map(|n| Some(Value::Number(n.into())))
            .map_err(|_| FieldCoercionError {
                pointer: pointer.to_string(),
                message: format!("'{text}' is not a valid integer"),
            }),
        FieldKind::Number => text
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(|n| Some(Value::Number(n)))
            .ok_or_else(|| FieldCoercionError {
                pointer: pointer.to_string(),
                message: format!("'{text}' is not a valid number"),
            }),
        FieldKind::Boolean => match text {
            "true" => Ok(Some(Value::Bool(true))),
            "false" => Ok(Some(Value::Bool(false))),
            _ => Err(FieldCoercionError {
                pointer: pointer.to_string(),
                message: format!("'{text}' is not a valid boolean"),
            }),
        },
        _ => Ok(Some(Value::String(text.to_string()))),
    }
}

fn default_text(schema: &FieldSchema) -> String {
    schema
        .default
        .as_ref()
        .map(value_to_string)
        .unwrap_or_default()
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn array_to_string(items: &[Value]) -> String {
    items
        .iter()
        .map(value_to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn insert_path(root: &mut Value, path: &[String], value: Value) {
    if path.is_empty() {
        *root = value;
        return;
    }

    if !root.is_object() {
        *root = Value::Object(Map::new());
    }

    if let Value::Object(obj) = root {
        if path.len() == 1 {
            obj.insert(path[0].clone(), value);
            return;
        }

        let entry = obj
            .entry(path[0].clone())
            .or_insert_with(|| Value::Object(Map::new()));
        insert_path(entry, &path[1..], value);
    }
}

fn value_at_path<'a>(value: &'a Value, path: &[String]) -> Option<&'a Value> {
    let mut current = value;
    for segment in path {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}
