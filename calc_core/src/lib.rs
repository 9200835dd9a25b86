//! # calc_core - Calcboard Calculation Engine
//!
//! `calc_core` is the computational heart of Calcboard: a config-driven
//! calculator engine. A calculator is pure data (a field list, a formula
//! string, and a result spec) and the engine renders, validates,
//! evaluates, and classifies from that data alone. All types are
//! JSON-serializable, making the engine easy to host behind a web API or
//! embed in a native shell.
//!
//! ## Design Philosophy
//!
//! - **Data-driven**: new calculators are authored, not coded
//! - **Stateless core**: validation and evaluation are pure functions;
//!   only [`session`] holds per-view state, and it gets every dependency
//!   at construction
//! - **Contained failures**: user input problems are per-field messages,
//!   formula problems are "no result"; neither crashes a session
//! - **JSON-First**: all types implement Serialize/Deserialize
//!
//! ## Quick Start
//!
//! ```rust
//! use calc_core::builtins::seed_store;
//! use calc_core::schema::RawValue;
//! use calc_core::session::CalculatorSession;
//! use calc_core::store::NullHistory;
//!
//! let mut session = CalculatorSession::new(seed_store(), NullHistory, None);
//! session.load("bmi");
//! session.set_value("weightKg", RawValue::Number(70.0));
//! session.set_value("heightM", RawValue::Number(1.75));
//! session.submit();
//!
//! assert_eq!(session.display().unwrap().formatted, "22.9");
//! ```
//!
//! ## Modules
//!
//! - [`schema`] - Field declarations (the five input kinds)
//! - [`config`] - Calculator definitions and history records
//! - [`validate`] - Form validation against a config's field list
//! - [`eval`] - Formula compilation and evaluation
//! - [`result`] - Result formatting and range classification
//! - [`session`] - Per-view orchestration state machine
//! - [`store`] - Config source / history sink boundary
//! - [`render`] - Flattened field views for UI layers
//! - [`builtins`] - The stock calculator definitions
//! - [`errors`] - Structured error types

pub mod builtins;
pub mod config;
pub mod errors;
pub mod eval;
pub mod render;
pub mod result;
pub mod schema;
pub mod session;
pub mod store;
pub mod validate;

// Re-export commonly used types at crate root for convenience
pub use config::{CalculatorConfig, HistoryRecord};
pub use errors::{CalcError, CalcResult};
pub use eval::{evaluate, Formula, Variables};
pub use result::{present, DisplayResult, ResultConfig};
pub use schema::{FieldKind, FieldSchema, RawValue};
pub use session::{CalculatorSession, SessionState};
pub use store::{ConfigStore, HistorySink};
pub use validate::{validate_values, FieldErrors};
