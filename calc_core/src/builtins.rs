//! # Built-in Calculators
//!
//! The stock calculator set, expressed as plain [`CalculatorConfig`] data
//! through the generic engine, the same definitions a deployment would
//! otherwise author in the management UI. They double as realistic
//! fixtures for tests and the CLI.
//!
//! Definitions live behind a `Lazy` static; call [`seed_store`] to get a
//! [`MemoryStore`] preloaded with all of them.

use once_cell::sync::Lazy;

use crate::config::CalculatorConfig;
use crate::result::{ResultConfig, ResultFormat, ResultRange};
use crate::schema::{FieldKind, FieldSchema, OptionValue, SelectOption};
use crate::store::MemoryStore;

/// All built-in calculator definitions.
pub static BUILTINS: Lazy<Vec<CalculatorConfig>> = Lazy::new(|| {
    vec![
        bmi(),
        emi(),
        simple_interest(),
        compound_growth(),
    ]
});

/// A memory store preloaded with every built-in calculator.
pub fn seed_store() -> MemoryStore {
    let mut store = MemoryStore::new();
    for config in BUILTINS.iter() {
        // definitions are validated by the test suite; a bad one is a bug
        store
            .insert(config.clone())
            .unwrap_or_else(|e| panic!("built-in config rejected: {}", e));
    }
    store
}

fn number_field(
    name: &str,
    label: &str,
    unit: Option<&str>,
    min: f64,
    max: f64,
    step: f64,
) -> FieldSchema {
    FieldSchema {
        name: name.to_string(),
        label: label.to_string(),
        kind: FieldKind::Number {
            unit: unit.map(str::to_string),
            min: Some(min),
            max: Some(max),
            step: Some(step),
        },
        required: true,
        help_text: None,
    }
}

fn range(min: Option<f64>, max: Option<f64>, status: &str, color: &str) -> ResultRange {
    ResultRange {
        min,
        max,
        status: status.to_string(),
        color: Some(color.to_string()),
        description: None,
    }
}

fn bmi() -> CalculatorConfig {
    let mut config = CalculatorConfig::new(
        "BMI Calculator",
        "bmi",
        "health",
        vec![
            number_field("weightKg", "Weight", Some("kg"), 1.0, 500.0, 0.1),
            number_field("heightM", "Height", Some("m"), 0.5, 3.0, 0.01),
        ],
        "weightKg / (heightM * heightM)",
        ResultConfig {
            label: "Your BMI".to_string(),
            unit: None,
            format: ResultFormat::Number,
            precision: Some(1),
            ranges: vec![
                range(Some(0.0), Some(18.5), "Underweight", "blue"),
                range(Some(18.5), Some(25.0), "Normal weight", "green"),
                range(Some(25.0), Some(30.0), "Overweight", "orange"),
                range(Some(30.0), None, "Obese", "red"),
            ],
        },
    );
    config.description = Some("Body Mass Index from weight and height".to_string());
    config.icon = Some("activity".to_string());
    config
}

fn emi() -> CalculatorConfig {
    let mut config = CalculatorConfig::new(
        "EMI Calculator",
        "emi",
        "financial",
        vec![
            number_field("principal", "Loan Amount", Some("USD"), 1.0, 100_000_000.0, 100.0),
            number_field("annualRate", "Interest Rate", Some("% p.a."), 0.01, 100.0, 0.05),
            number_field("months", "Tenure", Some("months"), 1.0, 480.0, 1.0),
        ],
        "(principal * (annualRate / 1200) * pow(1 + annualRate / 1200, months)) \
         / (pow(1 + annualRate / 1200, months) - 1)",
        ResultConfig {
            label: "Monthly EMI".to_string(),
            unit: None,
            format: ResultFormat::Currency,
            precision: Some(2),
            ranges: vec![],
        },
    );
    config.description = Some("Equated monthly installment for a loan".to_string());
    config.icon = Some("credit-card".to_string());
    config
}

fn simple_interest() -> CalculatorConfig {
    let mut config = CalculatorConfig::new(
        "Simple Interest",
        "simple-interest",
        "financial",
        vec![
            number_field("principal", "Principal", Some("USD"), 1.0, 100_000_000.0, 100.0),
            number_field("ratePct", "Interest Rate", Some("% p.a."), 0.01, 100.0, 0.05),
            number_field("years", "Duration", Some("years"), 0.5, 50.0, 0.5),
        ],
        "principal * ratePct * years / 100",
        ResultConfig {
            label: "Interest Earned".to_string(),
            unit: None,
            format: ResultFormat::Currency,
            precision: Some(2),
            ranges: vec![],
        },
    );
    config.description = Some("Flat interest over the full duration".to_string());
    config.icon = Some("percent".to_string());
    config
}

fn compound_growth() -> CalculatorConfig {
    let compounding = FieldSchema {
        name: "compoundsPerYear".to_string(),
        label: "Compounding".to_string(),
        kind: FieldKind::Select {
            options: vec![
                SelectOption {
                    value: OptionValue::Number(1.0),
                    label: "Annually".to_string(),
                },
                SelectOption {
                    value: OptionValue::Number(4.0),
                    label: "Quarterly".to_string(),
                },
                SelectOption {
                    value: OptionValue::Number(12.0),
                    label: "Monthly".to_string(),
                },
            ],
        },
        required: true,
        help_text: Some("How often interest is added to the balance".to_string()),
    };

    let mut config = CalculatorConfig::new(
        "Investment Growth",
        "compound-growth",
        "financial",
        vec![
            number_field("principal", "Initial Investment", Some("USD"), 1.0, 100_000_000.0, 100.0),
            number_field("ratePct", "Annual Return", Some("%"), 0.01, 100.0, 0.05),
            number_field("years", "Duration", Some("years"), 1.0, 60.0, 1.0),
            compounding,
        ],
        "principal * pow(1 + ratePct / (100 * compoundsPerYear), compoundsPerYear * years)",
        ResultConfig {
            label: "Future Value".to_string(),
            unit: None,
            format: ResultFormat::Currency,
            precision: Some(2),
            ranges: vec![],
        },
    );
    config.description = Some("Compound growth of a one-time investment".to_string());
    config.icon = Some("trending-up".to_string());
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::RawValue;
    use crate::session::{CalculatorSession, SessionState};
    use crate::store::NullHistory;

    #[test]
    fn test_every_builtin_validates() {
        for config in BUILTINS.iter() {
            config
                .validate()
                .unwrap_or_else(|e| panic!("{} invalid: {}", config.slug, e));
        }
    }

    #[test]
    fn test_slugs_unique_and_active() {
        let store = seed_store();
        assert_eq!(store.len(), BUILTINS.len());
    }

    #[test]
    fn test_bmi_end_to_end() {
        let mut session = CalculatorSession::new(seed_store(), NullHistory, None);
        session.load("bmi");
        session.set_value("weightKg", RawValue::Number(70.0));
        session.set_value("heightM", RawValue::Number(1.75));
        session.submit();

        assert_eq!(session.result(), Some(22.9));
        let display = session.display().unwrap();
        assert_eq!(display.formatted, "22.9");
        let status = display.status.unwrap();
        assert_eq!(status.status, "Normal weight");
        assert_eq!(status.color.as_deref(), Some("green"));
    }

    #[test]
    fn test_emi_matches_closed_form() {
        let mut session = CalculatorSession::new(seed_store(), NullHistory, None);
        session.load("emi");
        session.set_value("principal", RawValue::Number(100_000.0));
        session.set_value("annualRate", RawValue::Number(12.0));
        session.set_value("months", RawValue::Number(12.0));
        session.submit();

        // mirror the engine's arithmetic (powf) to stay bit-exact
        let r = 12.0f64 / 1200.0;
        let growth = (1.0 + r).powf(12.0);
        let expected = ((100_000.0 * r * growth) / (growth - 1.0) * 100.0).round() / 100.0;
        assert_eq!(session.result(), Some(expected));

        let display = session.display().unwrap();
        assert!(display.formatted.starts_with('$'));
    }

    #[test]
    fn test_simple_interest_exact() {
        let mut session = CalculatorSession::new(seed_store(), NullHistory, None);
        session.load("simple-interest");
        session.set_value("principal", RawValue::Number(1000.0));
        session.set_value("ratePct", RawValue::Number(5.0));
        session.set_value("years", RawValue::Number(2.0));
        session.submit();

        assert_eq!(session.result(), Some(100.0));
        assert_eq!(session.display().unwrap().formatted, "$100.00");
    }

    #[test]
    fn test_compound_growth_with_select_value() {
        let mut session = CalculatorSession::new(seed_store(), NullHistory, None);
        session.load("compound-growth");
        session.set_value("principal", RawValue::Number(1000.0));
        session.set_value("ratePct", RawValue::Number(10.0));
        session.set_value("years", RawValue::Number(2.0));
        // select controls capture the option value as text
        session.set_value("compoundsPerYear", RawValue::from("1"));
        session.submit();

        assert_eq!(session.state(), &SessionState::Evaluated);
        // 1000 * 1.1^2 = 1210
        assert_eq!(session.result(), Some(1210.0));
        assert_eq!(session.display().unwrap().formatted, "$1,210.00");
    }

    #[test]
    fn test_bmi_bounds_enforced() {
        let mut session = CalculatorSession::new(seed_store(), NullHistory, None);
        session.load("bmi");
        session.set_value("weightKg", RawValue::Number(0.5));
        session.set_value("heightM", RawValue::Number(1.75));
        session.submit();

        assert_eq!(
            session.errors().get("weightKg").map(String::as_str),
            Some("Min 1")
        );
    }
}
