use anyhow::{Context, Result, bail};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use crate::schema::{FieldSchema, FormModel, prettify_label};

/// One rendered group of controls in the preview.
#[derive(Debug, Clone)]
pub struct SectionSchema {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub fields: Vec<FieldSchema>,
}

#[derive(Debug, Clone, Deserialize)]
struct ControlElement {
    scope: String,
}

#[derive(Debug, Clone, Deserialize)]
struct GroupElement {
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    elements: Vec<Value>,
}

/// Arrange the model's fields into sections, driven by the UI Schema when
/// one is supplied and by object nesting otherwise.
pub fn arrange(model: &FormModel, ui_schema: Option<&Value>) -> Result<Vec<SectionSchema>> {
    match ui_schema {
        Some(ui) => from_ui_schema(model, ui),
        None => Ok(default_sections(model)),
    }
}

/// Default layout: root-level scalars land in a "General" section, each
/// top-level object property becomes its own section.
pub fn default_sections(model: &FormModel) -> Vec<SectionSchema> {
    let mut sections: IndexMap<String, SectionSchema> = IndexMap::new();

    for field in &model.fields {
        let (id, title, description) = if field.path.len() > 1 {
            let id = field.path[0].clone();
            match model.section_hints.get(&id) {
                Some(hint) => (id, hint.title.clone(), hint.description.clone()),
                None => (id.clone(), prettify_label(&id), None),
            }
        } else {
            ("general".to_string(), "General".to_string(), None)
        };

        sections
            .entry(id.clone())
            .or_insert_with(|| SectionSchema {
                id,
                title,
                description,
                fields: Vec::new(),
            })
            .fields
            .push(field.clone());
    }

    sections.into_values().collect()
}

fn from_ui_schema(model: &FormModel, ui_schema: &Value) -> Result<Vec<SectionSchema>> {
    if !ui_schema.is_object() {
        bail!("UI schema must be a JSON object");
    }
    let elements = ui_schema
        .get("elements")
        .and_then(Value::as_array)
        .context("UI schema must define an elements array")?;

    let mut sections = Vec::new();
    let mut loose = Vec::new();
    let mut used = Vec::new();
    collect_elements(model, elements, &mut sections, &mut loose, &mut used)?;

    if !loose.is_empty() {
        // Controls outside any Group form a leading unlabelled section.
        sections.insert(
            0,
            SectionSchema {
                id: "form".to_string(),
                title: model.title.clone().unwrap_or_else(|| "Form".to_string()),
                description: None,
                fields: loose,
            },
        );
    }

    Ok(sections)
}

fn collect_elements(
    model: &FormModel,
    elements: &[Value],
    sections: &mut Vec<SectionSchema>,
    current: &mut Vec<FieldSchema>,
    used: &mut Vec<String>,
) -> Result<()> {
    for element in elements {
        match element.get("type").and_then(Value::as_str) {
            Some("Control") => {
                let control: ControlElement = serde_json::from_value(element.clone())
                    .context("invalid Control element in UI schema")?;
                resolve_scope(model, &control.scope, current, used);
            }
            Some("Group") => {
                let group: GroupElement = serde_json::from_value(element.clone())
                    .context("invalid Group element in UI schema")?;
                let mut fields = Vec::new();
                collect_elements(model, &group.elements, sections, &mut fields, used)?;
                let title = group
                    .label
                    .unwrap_or_else(|| format!("Group {}", sections.len() + 1));
                sections.push(SectionSchema {
                    id: format!("group-{}", sections.len()),
                    title,
                    description: None,
                    fields,
                });
            }
            // Pass-through layouts contribute their children to the
            // enclosing group.
            Some("VerticalLayout") | Some("HorizontalLayout") => {
                if let Some(children) = element.get("elements").and_then(Value::as_array) {
                    collect_elements(model, children, sections, current, used)?;
                }
            }
            // Unknown element kinds are skipped, matching the tolerant
            // behavior of schema-driven form renderers.
            _ => {}
        }
    }
    Ok(())
}

/// Resolve a `#/properties/...` scope against the model. A scope naming a
/// leaf field pulls in that field; a scope naming an object pulls in every
/// field beneath it. Unknown scopes are ignored.
fn resolve_scope(
    model: &FormModel,
    scope: &str,
    out: &mut Vec<FieldSchema>,
    used: &mut Vec<String>,
) {
    let Some(path) = scope_to_path(scope) else {
        return;
    };

    for field in &model.fields {
        let matched = field.path == path
            || (field.path.len() > path.len() && field.path[..path.len()] == path[..]);
        if matched && !used.contains(&field.pointer) {
            used.push(field.pointer.clone());
            out.push(field.clone());
        }
    }
}

/// Parse `#/properties/a/properties/b` into `["a", "b"]`.
fn scope_to_path(scope: &str) -> Option<Vec<String>> {
    let rest = scope.strip_prefix("#/")?;
    let segments: Vec<&str> = rest.split('/').collect();
    if segments.is_empty() || segments.len() % 2 != 0 {
        return None;
    }

    let mut path = Vec::with_capacity(segments.len() / 2);
    for pair in segments.chunks(2) {
        if pair[0] != "properties" || pair[1].is_empty() {
            return None;
        }
        path.push(pair[1].replace("~1", "/").replace("~0", "~"));
    }
    Some(path)
}
