//! # Rendering Boundary
//!
//! Flattened, UI-friendly projections of a calculator's field list. A
//! presentation layer (web, TUI, native) renders one control per
//! [`FieldView`] without matching on field kinds itself: every attribute a
//! generic renderer needs (label, unit, help text, bounds, step, length
//! limit, options) is already pulled flat.
//!
//! The projection matches [`FieldKind`] exhaustively, so a new field kind
//! cannot ship without a rendering decision.

use serde::{Deserialize, Serialize};

use crate::config::CalculatorConfig;
use crate::schema::{FieldKind, SelectOption};

/// Everything a generic UI needs to render one input control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldView {
    /// Field key; echo it back through `set_value`
    pub name: String,

    /// Control label
    pub label: String,

    /// Control tag: "number", "text", "select", "radio", or "checkbox"
    pub control: String,

    pub required: bool,

    pub help_text: Option<String>,

    /// Unit suffix for number controls
    pub unit: Option<String>,

    /// Lower bound for number controls
    pub min: Option<f64>,

    /// Upper bound for number controls
    pub max: Option<f64>,

    /// Increment hint for number controls
    pub step: Option<f64>,

    /// Length limit for text controls
    pub max_length: Option<usize>,

    /// Choices for select/radio controls; empty otherwise
    pub options: Vec<SelectOption>,
}

/// Project a config's fields into render views, in display order.
pub fn field_views(config: &CalculatorConfig) -> Vec<FieldView> {
    config
        .fields
        .iter()
        .map(|field| {
            let mut view = FieldView {
                name: field.name.clone(),
                label: field.label.clone(),
                control: field.kind.tag().to_string(),
                required: field.required,
                help_text: field.help_text.clone(),
                unit: None,
                min: None,
                max: None,
                step: None,
                max_length: None,
                options: Vec::new(),
            };
            match &field.kind {
                FieldKind::Number {
                    unit,
                    min,
                    max,
                    step,
                } => {
                    view.unit = unit.clone();
                    view.min = *min;
                    view.max = *max;
                    view.step = *step;
                }
                FieldKind::Text { max_length } => {
                    view.max_length = *max_length;
                }
                FieldKind::Select { options } | FieldKind::Radio { options } => {
                    view.options = options.clone();
                }
                FieldKind::Checkbox => {}
            }
            view
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::ResultConfig;
    use crate::schema::{FieldSchema, OptionValue};

    fn sample_config() -> CalculatorConfig {
        let mut weight = FieldSchema::number("weightKg", "Weight");
        weight.required = true;
        weight.help_text = Some("Use your morning weight".to_string());
        weight.kind = FieldKind::Number {
            unit: Some("kg".to_string()),
            min: Some(1.0),
            max: Some(500.0),
            step: Some(0.1),
        };

        let mut note = FieldSchema::number("note", "Note");
        note.kind = FieldKind::Text {
            max_length: Some(80),
        };

        let mut unit_choice = FieldSchema::number("unitSystem", "Units");
        unit_choice.kind = FieldKind::Select {
            options: vec![SelectOption {
                value: OptionValue::Text("metric".to_string()),
                label: "Metric".to_string(),
            }],
        };

        CalculatorConfig::new(
            "Sample",
            "sample",
            "misc",
            vec![weight, note, unit_choice],
            "weightKg",
            ResultConfig {
                label: "Result".to_string(),
                unit: None,
                format: Default::default(),
                precision: None,
                ranges: vec![],
            },
        )
    }

    #[test]
    fn test_views_preserve_declaration_order() {
        let views = field_views(&sample_config());
        let names: Vec<&str> = views.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["weightKg", "note", "unitSystem"]);
    }

    #[test]
    fn test_number_attributes_flattened() {
        let views = field_views(&sample_config());
        let weight = &views[0];
        assert_eq!(weight.control, "number");
        assert!(weight.required);
        assert_eq!(weight.unit.as_deref(), Some("kg"));
        assert_eq!(weight.min, Some(1.0));
        assert_eq!(weight.max, Some(500.0));
        assert_eq!(weight.step, Some(0.1));
        assert_eq!(weight.help_text.as_deref(), Some("Use your morning weight"));
        assert!(weight.options.is_empty());
    }

    #[test]
    fn test_text_and_select_attributes() {
        let views = field_views(&sample_config());
        assert_eq!(views[1].control, "text");
        assert_eq!(views[1].max_length, Some(80));

        assert_eq!(views[2].control, "select");
        assert_eq!(views[2].options.len(), 1);
        assert_eq!(views[2].options[0].label, "Metric");
    }
}
