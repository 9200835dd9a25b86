//! # Formula Evaluation
//!
//! Compiles and evaluates operator-authored arithmetic formulas against
//! named variables. Formula text is treated as untrusted input: the
//! parser only admits arithmetic, the fixed math-function table, and
//! variable references, so no file or network access is reachable from
//! evaluation.
//!
//! ## Semantics
//!
//! - Results are `f64`. A non-finite outcome (division by zero, domain
//!   errors like `sqrt(-1)`) collapses to the NaN sentinel and is returned
//!   as `Ok(f64::NAN)`: "no result to display", not a fault.
//! - A malformed formula or an unbound variable is a hard `Err` local to
//!   the call; the session contains it (see [`crate::session`]).
//! - Optional precision rounds half away from zero at the float boundary:
//!   `(v * 10^p).round() / 10^p`.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::eval::{evaluate, Variables};
//! use calc_core::schema::RawValue;
//!
//! let mut vars = Variables::new();
//! vars.insert("weightKg".to_string(), RawValue::Number(70.0));
//! vars.insert("heightM".to_string(), RawValue::Number(1.75));
//!
//! let bmi = evaluate("weightKg / (heightM * heightM)", &vars, Some(1)).unwrap();
//! assert_eq!(bmi, 22.9);
//! ```

pub mod parser;
pub mod token;

use std::collections::{BTreeMap, BTreeSet};

use crate::errors::{CalcError, CalcResult};
use crate::schema::RawValue;

use parser::Expr;

pub use parser::BinaryOp;

/// Evaluation context: variable name to captured value.
///
/// Values need not all be numeric; text/select/checkbox values pass
/// through the validator unchanged, but any variable the formula actually
/// touches must coerce to a number.
pub type Variables = BTreeMap<String, RawValue>;

/// A compiled formula, ready to evaluate against a variable set.
///
/// Compilation is cheap; callers may compile per evaluation or hold one
/// per config.
#[derive(Debug, Clone)]
pub struct Formula {
    text: String,
    ast: Expr,
}

impl Formula {
    /// Parse formula text into an evaluable form.
    pub fn compile(text: &str) -> CalcResult<Formula> {
        let tokens = token::tokenize(text)?;
        let ast = parser::parse(&tokens, text.len())?;
        Ok(Formula {
            text: text.to_string(),
            ast,
        })
    }

    /// The original formula text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Free variables referenced by the formula, excluding the built-in
    /// constants `pi` and `e`. Config validation checks these against the
    /// field list.
    pub fn free_variables(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        collect_variables(&self.ast, &mut names);
        names.remove("pi");
        names.remove("e");
        names
    }

    /// Evaluate against a variable set.
    ///
    /// Returns `Ok(f64::NAN)` for non-finite outcomes and `Err` only for
    /// unbound or non-numeric variables.
    pub fn eval(&self, vars: &Variables) -> CalcResult<f64> {
        let value = eval_expr(&self.ast, vars)?;
        if value.is_finite() {
            Ok(value)
        } else {
            Ok(f64::NAN)
        }
    }
}

/// Compile and evaluate in one call, with optional rounding.
///
/// This is the evaluator contract in one function:
/// `evaluate(formulaText, variables, precision) -> number`.
pub fn evaluate(formula: &str, vars: &Variables, precision: Option<u32>) -> CalcResult<f64> {
    let compiled = Formula::compile(formula)?;
    let value = compiled.eval(vars)?;
    if value.is_nan() {
        return Ok(value);
    }
    Ok(match precision {
        Some(p) => round_to(value, p),
        None => value,
    })
}

/// Round to `precision` decimal places: multiply up, round to nearest
/// integer (half away from zero), divide back.
pub fn round_to(value: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(precision as i32);
    (value * factor).round() / factor
}

fn collect_variables(expr: &Expr, out: &mut BTreeSet<String>) {
    match expr {
        Expr::Number(_) => {}
        Expr::Variable(name) => {
            out.insert(name.clone());
        }
        Expr::Neg(inner) => collect_variables(inner, out),
        Expr::Binary { lhs, rhs, .. } => {
            collect_variables(lhs, out);
            collect_variables(rhs, out);
        }
        Expr::Call { args, .. } => {
            for arg in args {
                collect_variables(arg, out);
            }
        }
    }
}

fn eval_expr(expr: &Expr, vars: &Variables) -> CalcResult<f64> {
    match expr {
        Expr::Number(n) => Ok(*n),
        Expr::Variable(name) => lookup(name, vars),
        Expr::Neg(inner) => Ok(-eval_expr(inner, vars)?),
        Expr::Binary { op, lhs, rhs } => {
            let lhs = eval_expr(lhs, vars)?;
            let rhs = eval_expr(rhs, vars)?;
            Ok(op.apply(lhs, rhs))
        }
        Expr::Call { func, args } => {
            let mut evaluated = Vec::with_capacity(args.len());
            for arg in args {
                evaluated.push(eval_expr(arg, vars)?);
            }
            Ok(func.apply(&evaluated))
        }
    }
}

fn lookup(name: &str, vars: &Variables) -> CalcResult<f64> {
    if let Some(raw) = vars.get(name) {
        return raw.as_number().ok_or_else(|| {
            CalcError::evaluation(format!("variable '{}' is not numeric", name))
        });
    }
    // variables shadow constants; constants only apply when unbound
    match name {
        "pi" => Ok(std::f64::consts::PI),
        "e" => Ok(std::f64::consts::E),
        _ => Err(CalcError::unknown_variable(name)),
    }
}
