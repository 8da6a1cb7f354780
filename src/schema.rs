use std::collections::HashSet;

use anyhow::{Context, Result, bail};
use indexmap::IndexMap;
use serde_json::Value;

/// Flat form model parsed out of a JSON Schema.
///
/// Sectioning is applied afterwards, either from a UI Schema or from the
/// object nesting hints collected here.
#[derive(Debug, Clone)]
pub struct FormModel {
    pub title: Option<String>,
    pub description: Option<String>,
    pub fields: Vec<FieldSchema>,
    /// Top-level object properties, in schema order, for default sectioning.
    pub section_hints: IndexMap<String, SectionHint>,
}

#[derive(Debug, Clone)]
pub struct SectionHint {
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    String,
    Integer,
    Number,
    Boolean,
    Enum(Vec<String>),
    Array(Box<FieldKind>),
}

#[derive(Debug, Clone)]
pub struct FieldSchema {
    pub name: String,
    pub path: Vec<String>,
    pub pointer: String,
    pub title: String,
    pub description: Option<String>,
    pub kind: FieldKind,
    pub required: bool,
    pub default: Option<Value>,
    pub format: Option<String>,
}

impl FieldSchema {
    pub fn display_label(&self) -> String {
        if self.title.eq_ignore_ascii_case(&self.name) {
            self.title.clone()
        } else {
            format!("{} ({})", self.title, self.name)
        }
    }
}

pub fn parse_form_model(schema: &Value) -> Result<FormModel> {
    ensure_object(schema)?;
    let schema_type = read_type(schema).unwrap_or_else(|| "object".to_string());
    if schema_type != "object" {
        bail!("root schema must be an object, found {schema_type}");
    }

    let mut fields = Vec::new();
    let mut section_hints = IndexMap::new();
    parse_object_fields(schema, Vec::new(), &mut fields, &mut section_hints)?;

    Ok(FormModel {
        title: read_str(schema, "title"),
        description: read_str(schema, "description"),
        fields,
        section_hints,
    })
}

fn parse_object_fields(
    schema: &Value,
    path_prefix: Vec<String>,
    fields: &mut Vec<FieldSchema>,
    hints: &mut IndexMap<String, SectionHint>,
) -> Result<()> {
    let properties = schema
        .get("properties")
        .and_then(Value::as_object)
        .context("object schema must define properties")?;
    let required = required_set(schema);

    for (name, value) in properties {
        let mut next_path = path_prefix.clone();
        next_path.push(name.clone());

        if is_object(value) {
            if path_prefix.is_empty() {
                hints.insert(
                    name.clone(),
                    SectionHint {
                        title: read_str(value, "title").unwrap_or_else(|| prettify_label(name)),
                        description: read_str(value, "description"),
                    },
                );
            }
            parse_object_fields(value, next_path, fields, hints)?;
            continue;
        }

        fields.push(build_field_schema(
            value,
            name,
            next_path,
            required.contains(name.as_str()),
        )?);
    }

    Ok(())
}

fn build_field_schema(
    value: &Value,
    name: &str,
    path: Vec<String>,
    required: bool,
) -> Result<FieldSchema> {
    let kind =
        detect_kind(value).with_context(|| format!("unsupported schema for field '{name}'"))?;
    let title = read_str(value, "title").unwrap_or_else(|| prettify_label(name));

    Ok(FieldSchema {
        name: name.to_string(),
        pointer: to_pointer(&path),
        path,
        title,
        description: read_str(value, "description"),
        kind,
        required,
        default: value.get("default").cloned(),
        format: read_str(value, "format"),
    })
}

fn detect_kind(value: &Value) -> Result<FieldKind> {
    if let Some(options) = value.get("enum").and_then(Value::as_array) {
        let options = options
            .iter()
            .map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect();
        return Ok(FieldKind::Enum(options));
    }

    match read_type(value).as_deref() {
        Some("string") | None => Ok(FieldKind::String),
        Some("integer") => Ok(FieldKind::Integer),
        Some("number") => Ok(FieldKind::Number),
        Some("boolean") => Ok(FieldKind::Boolean),
        Some("array") => {
            let items = value
                .get("items")
                .context("array schema must define items")?;
            let inner = detect_kind(items)?;
            if matches!(inner, FieldKind::Array(_)) {
                bail!("nested arrays are not supported");
            }
            Ok(FieldKind::Array(Box::new(inner)))
        }
        Some(other) => bail!("unsupported field type {other}"),
    }
}

fn read_type(value: &Value) -> Option<String> {
    match value.get("type")? {
        Value::String(s) => Some(s.to_lowercase()),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(|s| s.to_lowercase())
            .find(|s| s != "null"),
        _ => None,
    }
}

fn read_str(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

fn required_set(schema: &Value) -> HashSet<String> {
    schema
        .get("required")
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

pub fn to_pointer(path: &[String]) -> String {
    path.iter()
        .map(|segment| segment.replace('~', "~0").replace('/', "~1"))
        .fold(String::new(), |mut acc, segment| {
            acc.push('/');
            acc.push_str(&segment);
            acc
        })
}

fn is_object(value: &Value) -> bool {
    match read_type(value) {
        Some(ty) => ty == "object",
        None => value.get("properties").is_some(),
    }
}

fn ensure_object(value: &Value) -> Result<()> {
    if value.is_object() {
        Ok(())
    } else {
        bail!("schema must be a JSON object")
    }
}

pub fn prettify_label(raw: &str) -> String {
    let mut result = String::with_capacity(raw.len());
    let mut capitalize = true;
    for ch in raw.chars() {
        if ch == '_' || ch == '-' {
            result.push(' ');
            capitalize = true;
            continue;
        }
        if capitalize {
            result.push(ch.to_ascii_uppercase());
            capitalize = false;
        } else {
            result.push(ch);
        }
    }
    result.trim().to_string()
}
