//! # Form Validation
//!
//! Pure validation of captured input against a calculator's field list.
//! Either every field passes and the caller gets the numeric variable set
//! ready for formula evaluation, or the caller gets a per-field error map
//! and evaluation must not proceed.
//!
//! Validation feedback is expected user input, not a fault: nothing here
//! returns `CalcError`.
//!
//! ## Rules
//!
//! Per field, in declaration order:
//!
//! 1. `required` and blank/absent → "Required"; no further checks for that
//!    field this pass.
//! 2. Number fields with a present value: bound checks produce
//!    "Min {min}" / "Max {max}". Min is checked before max and the later
//!    failure overwrites the earlier one (last-write-wins); config-load
//!    validation rejects `min > max`, so both can never fire on a
//!    well-formed config.
//! 3. Text fields with a present value: "Max length {n}" when the value
//!    exceeds `max_length`. The capture UI also enforces this, but the
//!    engine cannot trust it.
//!
//! On success, blank values become `0` and everything else passes through
//! unchanged, text/select/checkbox values included (the formula may or
//! may not use them).

use std::collections::BTreeMap;

use crate::config::CalculatorConfig;
use crate::eval::Variables;
use crate::schema::{FieldKind, RawValue};

/// Captured input, keyed by field name
pub type ValueMap = BTreeMap<String, RawValue>;

/// Per-field validation messages, keyed by field name
pub type FieldErrors = BTreeMap<String, String>;

/// Validate captured values against the config's field list.
///
/// Pure function: the same config and values always produce the same
/// outcome. Fields absent from `values` are treated as blank.
pub fn validate_values(
    config: &CalculatorConfig,
    values: &ValueMap,
) -> Result<Variables, FieldErrors> {
    let mut errors = FieldErrors::new();

    for field in &config.fields {
        let value = values.get(&field.name);
        let blank = value.map(RawValue::is_blank).unwrap_or(true);

        if field.required && blank {
            errors.insert(field.name.clone(), "Required".to_string());
            continue;
        }

        if blank {
            continue;
        }
        let value = match value {
            Some(v) => v,
            None => continue,
        };

        match &field.kind {
            FieldKind::Number { min, max, .. } => {
                // unparseable text coerces to nothing and, like NaN in a
                // comparison, fails no bound
                if let Some(num) = value.as_number() {
                    let mut message = None;
                    if let Some(min) = min {
                        if num < *min {
                            message = Some(format!("Min {}", min));
                        }
                    }
                    if let Some(max) = max {
                        if num > *max {
                            message = Some(format!("Max {}", max));
                        }
                    }
                    if let Some(message) = message {
                        errors.insert(field.name.clone(), message);
                    }
                }
            }
            FieldKind::Text { max_length } => {
                if let (Some(limit), RawValue::Text(s)) = (max_length, value) {
                    if s.chars().count() > *limit {
                        errors.insert(field.name.clone(), format!("Max length {}", limit));
                    }
                }
            }
            FieldKind::Select { .. } | FieldKind::Radio { .. } | FieldKind::Checkbox => {}
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    let mut variables = Variables::new();
    for field in &config.fields {
        let bound = match values.get(&field.name) {
            Some(v) if !v.is_blank() => v.clone(),
            _ => RawValue::Number(0.0),
        };
        variables.insert(field.name.clone(), bound);
    }
    Ok(variables)
}
