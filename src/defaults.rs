//! Built-in schema content shown in the editors on startup.

/// Default JSON Schema: a small personal-information form.
pub const DEFAULT_SCHEMA_TEXT: &str = r#"{
  "type": "object",
  "properties": {
    "name": {
      "type": "string",
      "description": "Please enter your full name"
    },
    "email": {
      "type": "string",
      "format": "email",
      "description": "Please enter your email"
    },
    "age": {
      "type": "integer",
      "description": "Please enter your age"
    },
    "preferences": {
      "type": "object",
      "properties": {
        "newsletter": {
          "type": "boolean",
          "description": "Subscribe to newsletter"
        },
        "color": {
          "type": "string",
          "enum": ["red", "green", "blue"],
          "description": "Favorite color"
        }
      }
    },
    "hobbies": {
      "type": "array",
      "items": {
        "type": "string"
      },
      "description": "Enter your hobbies"
    }
  },
  "required": ["name", "email"]
}"#;

/// Default UI Schema: groups the fields into three labelled sections.
pub const DEFAULT_UI_SCHEMA_TEXT: &str = r##"{
  "elements": [
    {
      "type": "Group",
      "label": "Personal Information",
      "elements": [
        {
          "type": "Control",
          "scope": "#/properties/name"
        },
        {
          "type": "Control",
          "scope": "#/properties/email"
        },
        {
          "type": "Control",
          "scope": "#/properties/age"
        }
      ]
    },
    {
      "type": "Group",
      "label": "Preferences",
      "elements": [
        {
          "type": "Control",
          "scope": "#/properties/preferences"
        }
      ]
    },
    {
      "type": "Group",
      "label": "Interests",
      "elements": [
        {
          "type": "Control",
          "scope": "#/properties/hobbies"
        }
      ]
    }
  ]
}"##;
