use anyhow::{Context, Result};
use jsonschema::{Validator, validator_for};
use serde_json::Value;

use crate::form::FormState;
use crate::layout;
use crate::schema::{FormModel, parse_form_model};

/// Change event emitted by a rendered form: the rebuilt data value plus the
/// validation errors found in it.
#[derive(Debug, Clone)]
pub struct FormChange {
    pub data: Value,
    pub errors: Vec<String>,
}

/// The rendering-engine boundary. The controller only ever hands a parsed
/// schema, an optional parsed UI schema, and the current form data across
/// this seam, so the engine stays a replaceable dependency.
pub trait FormEngine {
    fn build(
        &self,
        schema: &Value,
        ui_schema: Option<&Value>,
        data: &Value,
    ) -> Result<RenderedForm>;
}

/// A form built by the engine: the parsed model, the live field state, and
/// a compiled validator for the source schema.
#[derive(Debug)]
pub struct RenderedForm {
    pub model: FormModel,
    pub state: FormState,
    validator: Validator,
}

impl RenderedForm {
    /// Produce a change event after a preview-side edit.
    ///
    /// Returns `None` when the current field buffers cannot be coerced into
    /// a value at all; the offending field keeps an inline error and the
    /// previous data stands.
    pub fn change(&mut self) -> Option<FormChange> {
        match self.state.try_build_value() {
            Ok(data) => {
                self.state.clear_errors();
                let mut errors = Vec::new();
                for error in self.validator.iter_errors(&data) {
                    let pointer = error.instance_path.to_string();
                    let message = error.to_string();
                    self.state.set_error(&pointer, message.clone());
                    let prefix = if pointer.is_empty() {
                        "<root>".to_string()
                    } else {
                        pointer
                    };
                    errors.push(format!("{prefix}: {message}"));
                }
                Some(FormChange { data, errors })
            }
            Err(err) => {
                self.state.set_error(&err.pointer, err.message.clone());
                None
            }
        }
    }
}

/// The built-in engine: JSON Schema drives the field model, the UI Schema
/// (when present) drives sectioning, and the `jsonschema` crate validates.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaFormEngine;

impl FormEngine for SchemaFormEngine {
    fn build(
        &self,
        schema: &Value,
        ui_schema: Option<&Value>,
        data: &Value,
    ) -> Result<RenderedForm> {
        let model = parse_form_model(schema)?;
        let sections = layout::arrange(&model, ui_schema)?;
        let mut state = FormState::from_sections(sections);
        state.seed_from_value(data);
        let validator = validator_for(schema).context("failed to compile JSON schema")?;

        Ok(RenderedForm {
            model,
            state,
            validator,
        })
    }
}
