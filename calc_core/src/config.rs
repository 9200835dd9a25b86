//! # Calculator Configurations
//!
//! [`CalculatorConfig`] is the aggregate root: one named, sluggable
//! calculator definition combining an ordered field list, a formula, and a
//! result-presentation spec. Configs are authored in an external management
//! surface and read here; the engine treats them as immutable for the
//! duration of an evaluation session.
//!
//! ## Structure
//!
//! ```text
//! CalculatorConfig
//! ├── identity: id, name, slug, category, icon, description
//! ├── fields: Vec<FieldSchema>   (order = display and tab order)
//! ├── formula: String            (field names as free variables)
//! ├── result: ResultConfig       (format, precision, ranges)
//! └── is_active + created_at/updated_at
//! ```
//!
//! ## Example
//!
//! ```rust
//! use calc_core::config::CalculatorConfig;
//! use calc_core::schema::FieldSchema;
//! use calc_core::result::ResultConfig;
//!
//! let config = CalculatorConfig::new(
//!     "Body Mass Index",
//!     "bmi",
//!     "health",
//!     vec![
//!         FieldSchema::number("weightKg", "Weight"),
//!         FieldSchema::number("heightM", "Height"),
//!     ],
//!     "weightKg / (heightM * heightM)",
//!     ResultConfig {
//!         label: "Your BMI".to_string(),
//!         unit: None,
//!         format: Default::default(),
//!         precision: Some(1),
//!         ranges: vec![],
//!     },
//! );
//! assert!(config.validate().is_ok());
//! ```

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{CalcError, CalcResult};
use crate::eval::Formula;
use crate::result::ResultConfig;
use crate::schema::{FieldSchema, RawValue};

/// One complete calculator definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatorConfig {
    /// Opaque stable identifier
    pub id: Uuid,

    /// Display name, e.g. "BMI Calculator"
    pub name: String,

    /// Optional longer description shown on the detail page
    #[serde(default)]
    pub description: Option<String>,

    /// Grouping tag, e.g. "financial" or "health"
    pub category: String,

    /// Unique URL-safe lookup key (case-sensitive)
    pub slug: String,

    /// Optional icon name for the listing UI
    #[serde(default)]
    pub icon: Option<String>,

    /// Ordered input declarations; order is display and tab order
    pub fields: Vec<FieldSchema>,

    /// Formula text referencing field names as free variables
    pub formula: String,

    /// Result formatting and classification spec
    pub result: ResultConfig,

    /// Governs external visibility; inactive configs are not listed
    pub is_active: bool,

    /// When the config was created
    pub created_at: DateTime<Utc>,

    /// When the config was last modified
    pub updated_at: DateTime<Utc>,
}

impl CalculatorConfig {
    /// Create a new active config with a fresh id and current timestamps.
    pub fn new(
        name: impl Into<String>,
        slug: impl Into<String>,
        category: impl Into<String>,
        fields: Vec<FieldSchema>,
        formula: impl Into<String>,
        result: ResultConfig,
    ) -> Self {
        let now = Utc::now();
        CalculatorConfig {
            id: Uuid::new_v4(),
            name: name.into(),
            description: None,
            category: category.into(),
            slug: slug.into(),
            icon: None,
            fields,
            formula: formula.into(),
            result,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Structural validation, run at load time.
    ///
    /// Rejects field-level problems (bad identifiers, `min > max`, required
    /// choice fields without options), duplicate field names, formulas that
    /// fail to compile or reference non-field variables, and degenerate
    /// result ranges. A config that passes here cannot produce a formula
    /// parse error or unknown-variable error at submit time.
    pub fn validate(&self) -> CalcResult<()> {
        if self.slug.is_empty() {
            return Err(CalcError::invalid_config(&self.name, "slug must not be empty"));
        }

        let mut seen = BTreeSet::new();
        for field in &self.fields {
            field.validate()?;
            if !seen.insert(field.name.as_str()) {
                return Err(CalcError::invalid_config(
                    &self.slug,
                    format!("duplicate field name '{}'", field.name),
                ));
            }
        }

        let formula = Formula::compile(&self.formula).map_err(|e| {
            CalcError::invalid_config(&self.slug, format!("formula does not compile: {}", e))
        })?;
        for free in formula.free_variables() {
            if !seen.contains(free.as_str()) {
                return Err(CalcError::invalid_config(
                    &self.slug,
                    format!("formula references unknown field '{}'", free),
                ));
            }
        }

        for range in &self.result.ranges {
            if let (Some(min), Some(max)) = (range.min, range.max) {
                if min >= max {
                    return Err(CalcError::invalid_config(
                        &self.slug,
                        format!("result range '{}' has min >= max", range.status),
                    ));
                }
            }
        }

        Ok(())
    }

    /// Field lookup by name
    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// The blank value map a fresh session starts from: every field
    /// present, every value empty.
    pub fn blank_values(&self) -> BTreeMap<String, RawValue> {
        self.fields
            .iter()
            .map(|f| (f.name.clone(), RawValue::blank()))
            .collect()
    }
}

/// One evaluation telemetry record, emitted fire-and-forget after a
/// successful submission. The engine never depends on it being persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: Uuid,

    /// The signed-in user, when known
    #[serde(default)]
    pub user_id: Option<Uuid>,

    pub calculator_id: Uuid,

    /// Raw submitted values, keyed by field name
    pub inputs: BTreeMap<String, RawValue>,

    /// The evaluated result; None when evaluation produced no number
    pub result: Option<f64>,

    pub created_at: DateTime<Utc>,
}

impl HistoryRecord {
    /// Build a record for one evaluation
    pub fn new(
        calculator_id: Uuid,
        user_id: Option<Uuid>,
        inputs: BTreeMap<String, RawValue>,
        result: Option<f64>,
    ) -> Self {
        HistoryRecord {
            id: Uuid::new_v4(),
            user_id,
            calculator_id,
            inputs,
            result,
            created_at: Utc::now(),
        }
    }
}
