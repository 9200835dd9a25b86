//! # Field Schemas
//!
//! Declarative descriptions of one input control each. A calculator form is
//! an ordered list of [`FieldSchema`]s; the field `name` doubles as the
//! variable name the formula binds against, so it must be a valid
//! identifier.
//!
//! The five field kinds form a closed sum type. Consumers (the validator in
//! [`crate::validate`], the rendering boundary in [`crate::render`]) match
//! exhaustively on [`FieldKind`], so adding a sixth kind forces a review of
//! both. An unrecognized `type` tag fails deserialization outright rather
//! than being silently skipped.
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "name": "weightKg",
//!   "label": "Weight",
//!   "type": "number",
//!   "required": true,
//!   "unit": "kg",
//!   "min": 1.0,
//!   "max": 500.0,
//!   "step": 0.1
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// One input declaration within a calculator form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSchema {
    /// Unique key within the config; used as the variable name in formulas
    pub name: String,

    /// Display text for the control's label
    pub label: String,

    /// Kind tag plus kind-specific constraints
    #[serde(flatten)]
    pub kind: FieldKind,

    /// Whether submission requires a non-blank value
    #[serde(default)]
    pub required: bool,

    /// Optional hint text shown below the control
    #[serde(default)]
    pub help_text: Option<String>,
}

/// The closed set of input kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldKind {
    /// Numeric entry with optional unit and bounds
    Number {
        #[serde(default)]
        unit: Option<String>,
        #[serde(default)]
        min: Option<f64>,
        #[serde(default)]
        max: Option<f64>,
        #[serde(default)]
        step: Option<f64>,
    },
    /// Free text entry
    Text {
        #[serde(default)]
        max_length: Option<usize>,
    },
    /// Dropdown over a fixed option list
    Select { options: Vec<SelectOption> },
    /// Radio group over a fixed option list
    Radio { options: Vec<SelectOption> },
    /// Boolean toggle
    Checkbox,
}

impl FieldKind {
    /// Short tag for display and logging
    pub fn tag(&self) -> &'static str {
        match self {
            FieldKind::Number { .. } => "number",
            FieldKind::Text { .. } => "text",
            FieldKind::Select { .. } => "select",
            FieldKind::Radio { .. } => "radio",
            FieldKind::Checkbox => "checkbox",
        }
    }

    /// Option list for choice kinds, None for the rest
    pub fn options(&self) -> Option<&[SelectOption]> {
        match self {
            FieldKind::Select { options } | FieldKind::Radio { options } => Some(options),
            FieldKind::Number { .. } | FieldKind::Text { .. } | FieldKind::Checkbox => None,
        }
    }
}

/// One entry in a select/radio option list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: OptionValue,
    pub label: String,
}

/// Option values may be strings or numbers, matching the stored JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Number(f64),
    Text(String),
}

/// A raw value as captured from an input control, before validation.
///
/// Text inputs produce strings (the empty string is the blank state),
/// number inputs produce numbers once parseable, checkboxes produce
/// booleans. The validator coerces these into formula variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Bool(bool),
    Text(String),
}

impl RawValue {
    /// The blank state every field starts in
    pub fn blank() -> Self {
        RawValue::Text(String::new())
    }

    /// True for the empty-string blank state
    pub fn is_blank(&self) -> bool {
        matches!(self, RawValue::Text(s) if s.is_empty())
    }

    /// Numeric view of this value, if it has one.
    ///
    /// Booleans coerce to 1/0; text parses as a float. Unparseable text
    /// yields None, which constraint checks treat as "nothing to compare".
    pub fn as_number(&self) -> Option<f64> {
        match self {
            RawValue::Number(n) => Some(*n),
            RawValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            RawValue::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        RawValue::Number(n)
    }
}

impl From<bool> for RawValue {
    fn from(b: bool) -> Self {
        RawValue::Bool(b)
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

/// True if `name` is a syntactically valid variable identifier:
/// `[A-Za-z_][A-Za-z0-9_]*`.
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl FieldSchema {
    /// Convenience constructor for a number field
    pub fn number(name: impl Into<String>, label: impl Into<String>) -> Self {
        FieldSchema {
            name: name.into(),
            label: label.into(),
            kind: FieldKind::Number {
                unit: None,
                min: None,
                max: None,
                step: None,
            },
            required: false,
            help_text: None,
        }
    }

    /// Structural validation of this field declaration.
    ///
    /// Checks the identifier invariant, the non-empty-options invariant for
    /// required choice fields, and that numeric bounds are ordered.
    pub fn validate(&self) -> CalcResult<()> {
        if !is_valid_identifier(&self.name) {
            return Err(CalcError::invalid_config(
                &self.name,
                "field name is not a valid identifier",
            ));
        }
        match &self.kind {
            FieldKind::Number { min, max, .. } => {
                if let (Some(lo), Some(hi)) = (min, max) {
                    if lo > hi {
                        return Err(CalcError::invalid_config(
                            &self.name,
                            format!("min {} exceeds max {}", lo, hi),
                        ));
                    }
                }
            }
            FieldKind::Select { options } | FieldKind::Radio { options } => {
                if self.required && options.is_empty() {
                    return Err(CalcError::invalid_config(
                        &self.name,
                        "required choice field has no options",
                    ));
                }
            }
            FieldKind::Text { .. } | FieldKind::Checkbox => {}
        }
        Ok(())
    }
}
