//! # Result Presentation
//!
//! Maps a numeric calculation outcome to a display string and an optional
//! qualitative status. Presentation is data-driven: the config declares a
//! format (plain number, currency, percentage), an optional precision, and
//! an ordered list of classification ranges.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::result::{present, ResultConfig, ResultFormat, ResultRange};
//!
//! let config = ResultConfig {
//!     label: "Your BMI".to_string(),
//!     unit: None,
//!     format: ResultFormat::Number,
//!     precision: Some(1),
//!     ranges: vec![ResultRange {
//!         min: Some(18.5),
//!         max: Some(25.0),
//!         status: "Normal weight".to_string(),
//!         color: None,
//!         description: None,
//!     }],
//! };
//!
//! let display = present(&config, Some(22.9)).unwrap();
//! assert_eq!(display.formatted, "22.9");
//! assert_eq!(display.status.unwrap().status, "Normal weight");
//! ```

use serde::{Deserialize, Serialize};

/// How the numeric result renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultFormat {
    /// Plain number; `precision` pads to fixed decimal places when set
    #[default]
    Number,
    /// Fixed USD currency, two-decimal convention with grouping
    Currency,
    /// The literal value followed by `%`, with no scaling (55 renders "55%")
    Percentage,
}

/// One classification bucket: `min <= value < max` (min inclusive, max
/// exclusive). Either bound may be absent, meaning unbounded on that side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRange {
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    pub status: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl ResultRange {
    /// Half-open membership test with optional bounds
    pub fn contains(&self, value: f64) -> bool {
        if let Some(min) = self.min {
            if value < min {
                return false;
            }
        }
        if let Some(max) = self.max {
            if value >= max {
                return false;
            }
        }
        true
    }
}

/// Result-presentation spec attached to a calculator config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultConfig {
    /// Display label, e.g. "Your BMI"
    pub label: String,

    /// Optional unit suffix shown next to the value
    #[serde(default)]
    pub unit: Option<String>,

    /// Render format (number/currency/percentage)
    #[serde(default)]
    pub format: ResultFormat,

    /// Decimal places for number formatting and evaluator rounding
    #[serde(default)]
    pub precision: Option<u32>,

    /// Ordered classification ranges; first match wins
    #[serde(default)]
    pub ranges: Vec<ResultRange>,
}

/// A fully-presented result, ready for any UI layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayResult {
    /// The result label from the config
    pub label: String,

    /// The formatted value string
    pub formatted: String,

    /// Unit suffix, if the config declares one
    pub unit: Option<String>,

    /// First matching classification range, if any
    pub status: Option<ResultRange>,
}

/// Present a result value, or nothing.
///
/// Absent values and the NaN sentinel produce `None`: the UI shows nothing
/// rather than an error.
pub fn present(config: &ResultConfig, value: Option<f64>) -> Option<DisplayResult> {
    let value = value?;
    if value.is_nan() {
        return None;
    }

    let formatted = match config.format {
        ResultFormat::Currency => format_usd(value),
        ResultFormat::Percentage => format!("{}%", value),
        ResultFormat::Number => match config.precision {
            Some(p) => format!("{:.*}", p as usize, value),
            None => format!("{}", value),
        },
    };

    let status = config.ranges.iter().find(|r| r.contains(value)).cloned();

    Some(DisplayResult {
        label: config.label.clone(),
        formatted,
        unit: config.unit.clone(),
        status,
    })
}

/// Format a value as USD: `$` prefix, thousands grouping, two decimals.
fn format_usd(value: f64) -> String {
    let negative = value < 0.0;
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::new();
    let digits = int_part.as_bytes();
    for (i, b) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*b as char);
    }

    if negative {
        format!("-${}.{}", grouped, frac_part)
    } else {
        format!("${}.{}", grouped, frac_part)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bmi_ranges() -> Vec<ResultRange> {
        let bucket = |min: Option<f64>, max: Option<f64>, status: &str| ResultRange {
            min,
            max,
            status: status.to_string(),
            color: None,
            description: None,
        };
        vec![
            bucket(Some(0.0), Some(18.5), "Underweight"),
            bucket(Some(18.5), Some(25.0), "Normal"),
            bucket(Some(25.0), Some(30.0), "Overweight"),
            bucket(Some(30.0), None, "Obese"),
        ]
    }

    fn config(format: ResultFormat, precision: Option<u32>) -> ResultConfig {
        ResultConfig {
            label: "Result".to_string(),
            unit: None,
            format,
            precision,
            ranges: bmi_ranges(),
        }
    }

    #[test]
    fn test_none_and_nan_produce_nothing() {
        let cfg = config(ResultFormat::Number, None);
        assert!(present(&cfg, None).is_none());
        assert!(present(&cfg, Some(f64::NAN)).is_none());
    }

    #[test]
    fn test_percentage_is_literal() {
        let cfg = config(ResultFormat::Percentage, None);
        let display = present(&cfg, Some(55.0)).unwrap();
        assert_eq!(display.formatted, "55%");
    }

    #[test]
    fn test_currency_grouping() {
        let cfg = config(ResultFormat::Currency, None);
        assert_eq!(present(&cfg, Some(1234567.891)).unwrap().formatted, "$1,234,567.89");
        assert_eq!(present(&cfg, Some(0.5)).unwrap().formatted, "$0.50");
        assert_eq!(present(&cfg, Some(-1234.5)).unwrap().formatted, "-$1,234.50");
        assert_eq!(present(&cfg, Some(999.0)).unwrap().formatted, "$999.00");
    }

    #[test]
    fn test_number_precision_pads() {
        let cfg = config(ResultFormat::Number, Some(2));
        assert_eq!(present(&cfg, Some(5.0)).unwrap().formatted, "5.00");

        let plain = config(ResultFormat::Number, None);
        assert_eq!(present(&plain, Some(5.0)).unwrap().formatted, "5");
        assert_eq!(present(&plain, Some(5.25)).unwrap().formatted, "5.25");
    }

    #[test]
    fn test_range_lower_bound_inclusive_upper_exclusive() {
        let cfg = config(ResultFormat::Number, Some(1));
        // 18.5 is excluded from [0, 18.5) and included in [18.5, 25)
        let display = present(&cfg, Some(18.5)).unwrap();
        assert_eq!(display.status.unwrap().status, "Normal");

        // 30 falls through to the unbounded top range
        let display = present(&cfg, Some(30.0)).unwrap();
        assert_eq!(display.status.unwrap().status, "Obese");
    }

    #[test]
    fn test_first_matching_range_wins() {
        let mut cfg = config(ResultFormat::Number, None);
        cfg.ranges.insert(
            0,
            ResultRange {
                min: None,
                max: None,
                status: "Catch-all".to_string(),
                color: None,
                description: None,
            },
        );
        let display = present(&cfg, Some(20.0)).unwrap();
        assert_eq!(display.status.unwrap().status, "Catch-all");
    }

    #[test]
    fn test_no_matching_range_means_no_status() {
        let cfg = config(ResultFormat::Number, None);
        let display = present(&cfg, Some(-5.0)).unwrap();
        assert!(display.status.is_none());
    }

    #[test]
    fn test_unit_carried_through() {
        let mut cfg = config(ResultFormat::Number, Some(1));
        cfg.unit = Some("kg/m2".to_string());
        let display = present(&cfg, Some(22.9)).unwrap();
        assert_eq!(display.unit.as_deref(), Some("kg/m2"));
    }
}
