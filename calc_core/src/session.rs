//! # Calculator Sessions
//!
//! One [`CalculatorSession`] drives one calculator-view instance through
//! its lifecycle: load config, collect input, validate, evaluate, present.
//! Everything the session needs arrives at construction (store, history
//! sink, current user), so there is no ambient state and sessions are
//! independently testable.
//!
//! ## State machine
//!
//! ```text
//! Loading ──load ok──▶ Ready ──field change──▶ Editing
//!    │                                     ▲        │ submit, errors
//!    ├──missing──▶ NotFound                └────────┤
//!    └──fetch err─▶ LoadFailed                      │ submit, clean
//!                                                   ▼
//!                                               Evaluated
//! ```
//!
//! Switching slugs resets unconditionally to `Loading` and bumps the load
//! generation; a completion carrying a stale generation is discarded, so a
//! slow response can never overwrite a newer session's state.
//!
//! Evaluation faults are contained: a bad formula or non-finite result
//! leaves the session in `Evaluated` with nothing to display, never a
//! crash. History emission is fire-and-forget: a sink failure is logged
//! and the displayed result stands.

use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::{CalculatorConfig, HistoryRecord};
use crate::errors::{CalcError, CalcResult};
use crate::eval;
use crate::result::{present, DisplayResult};
use crate::schema::RawValue;
use crate::store::{ConfigStore, HistorySink};
use crate::validate::{validate_values, FieldErrors, ValueMap};

/// Discriminant for where a session currently stands.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// A config load is outstanding; submissions are not accepted
    Loading,
    /// The slug resolved to nothing
    NotFound,
    /// The config fetch failed; no calculator can be shown
    LoadFailed(CalcError),
    /// Config loaded, all values blank
    Ready,
    /// Values changed and/or validation errors are showing
    Editing,
    /// A submission evaluated; the result (possibly "nothing") is showing
    Evaluated,
}

/// Token tying a load completion to the request that started it.
///
/// Hosts that fetch asynchronously hold the token across the await and
/// hand it back to [`CalculatorSession::resolve_load`]; completions from a
/// superseded load are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadToken {
    generation: u64,
}

/// Orchestrates one calculator-view instance.
pub struct CalculatorSession<S, H> {
    store: S,
    history: H,
    user_id: Option<Uuid>,
    slug: String,
    generation: u64,
    state: SessionState,
    config: Option<CalculatorConfig>,
    values: ValueMap,
    errors: FieldErrors,
    result: Option<f64>,
}

impl<S: ConfigStore, H: HistorySink> CalculatorSession<S, H> {
    /// Create a session with explicit collaborators and user identity.
    pub fn new(store: S, history: H, user_id: Option<Uuid>) -> Self {
        CalculatorSession {
            store,
            history,
            user_id,
            slug: String::new(),
            generation: 0,
            state: SessionState::Loading,
            config: None,
            values: ValueMap::new(),
            errors: FieldErrors::new(),
            result: None,
        }
    }

    /// Begin loading `slug`, discarding all in-progress state.
    ///
    /// Returns the token the eventual completion must present. Any
    /// previously issued token is implicitly cancelled.
    pub fn start_load(&mut self, slug: &str) -> LoadToken {
        self.generation += 1;
        self.slug = slug.to_string();
        self.state = SessionState::Loading;
        self.config = None;
        self.values.clear();
        self.errors.clear();
        self.result = None;
        debug!(slug, generation = self.generation, "session load started");
        LoadToken {
            generation: self.generation,
        }
    }

    /// Complete a load started by [`start_load`](Self::start_load).
    ///
    /// Stale completions (the slug changed in the meantime) are dropped on
    /// the floor. A fetched config is structurally validated before the
    /// session accepts it.
    pub fn resolve_load(
        &mut self,
        token: LoadToken,
        outcome: CalcResult<Option<CalculatorConfig>>,
    ) {
        if token.generation != self.generation {
            debug!(
                stale = token.generation,
                current = self.generation,
                "discarding stale load completion"
            );
            return;
        }
        match outcome {
            Ok(Some(config)) => {
                if let Err(e) = config.validate() {
                    warn!(slug = %self.slug, error = %e, "fetched config failed validation");
                    self.state = SessionState::LoadFailed(e);
                    return;
                }
                self.values = config.blank_values();
                self.config = Some(config);
                self.state = SessionState::Ready;
            }
            Ok(None) => {
                self.state = SessionState::NotFound;
            }
            Err(e) => {
                warn!(slug = %self.slug, error = %e, "config fetch failed");
                self.state = SessionState::LoadFailed(e);
            }
        }
    }

    /// Load a calculator synchronously through the owned store.
    pub fn load(&mut self, slug: &str) {
        let token = self.start_load(slug);
        let outcome = self.store.fetch_by_slug(slug);
        self.resolve_load(token, outcome);
    }

    /// Record a field edit. Clears any prior result and moves to `Editing`.
    ///
    /// Ignored while no config is loaded; edits for names outside the field
    /// list are dropped.
    pub fn set_value(&mut self, name: &str, value: RawValue) {
        let Some(config) = &self.config else {
            return;
        };
        if config.field(name).is_none() {
            debug!(name, "ignoring edit for unknown field");
            return;
        }
        self.values.insert(name.to_string(), value);
        self.result = None;
        self.state = SessionState::Editing;
    }

    /// Submit the current values.
    ///
    /// Validation failures populate `errors` and stay in `Editing` with no
    /// result. A clean submission evaluates the formula, stores the result
    /// (the NaN sentinel included; it displays as nothing), transitions to
    /// `Evaluated`, and fire-and-forgets a history record.
    ///
    /// No-op unless a config is loaded.
    pub fn submit(&mut self) {
        let Some(config) = &self.config else {
            return;
        };

        match validate_values(config, &self.values) {
            Err(errors) => {
                self.errors = errors;
                self.result = None;
                self.state = SessionState::Editing;
            }
            Ok(variables) => {
                self.errors.clear();
                let precision = config.result.precision;
                self.result = match eval::evaluate(&config.formula, &variables, precision) {
                    Ok(value) => Some(value),
                    Err(e) => {
                        // operator-authored formula bug: contained, shown
                        // as "no result"
                        warn!(slug = %self.slug, error = %e, "formula evaluation failed");
                        None
                    }
                };
                self.state = SessionState::Evaluated;
                self.emit_history();
            }
        }
    }

    fn emit_history(&self) {
        let Some(config) = &self.config else {
            return;
        };
        let recorded = self.result.filter(|v| !v.is_nan());
        let record = HistoryRecord::new(
            config.id,
            self.user_id,
            self.values.clone(),
            recorded,
        );
        if let Err(e) = self.history.record(record) {
            warn!(slug = %self.slug, error = %e, "history write failed; result stands");
        }
    }

    /// Current state discriminant
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// The loaded config, once `Ready` or later
    pub fn config(&self) -> Option<&CalculatorConfig> {
        self.config.as_ref()
    }

    /// Current slug
    pub fn slug(&self) -> &str {
        &self.slug
    }

    /// Current raw values, keyed by field name
    pub fn values(&self) -> &ValueMap {
        &self.values
    }

    /// Current validation errors, keyed by field name
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Current numeric result, if any (may be the NaN sentinel)
    pub fn result(&self) -> Option<f64> {
        self.result
    }

    /// The presented result, or None when there is nothing to display
    pub fn display(&self) -> Option<DisplayResult> {
        let config = self.config.as_ref()?;
        present(&config.result, self.result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::{ResultConfig, ResultRange};
    use crate::schema::FieldSchema;
    use crate::store::{MemoryHistory, MemoryStore, NullHistory};

    fn bmi_config() -> CalculatorConfig {
        let mut weight = FieldSchema::number("weightKg", "Weight");
        weight.required = true;
        let mut height = FieldSchema::number("heightM", "Height");
        height.required = true;

        let bucket = |min: Option<f64>, max: Option<f64>, status: &str| ResultRange {
            min,
            max,
            status: status.to_string(),
            color: None,
            description: None,
        };

        CalculatorConfig::new(
            "BMI Calculator",
            "bmi",
            "health",
            vec![weight, height],
            "weightKg / (heightM * heightM)",
            ResultConfig {
                label: "Your BMI".to_string(),
                unit: None,
                format: Default::default(),
                precision: Some(1),
                ranges: vec![
                    bucket(Some(0.0), Some(18.5), "Underweight"),
                    bucket(Some(18.5), Some(25.0), "Normal weight"),
                    bucket(Some(25.0), Some(30.0), "Overweight"),
                    bucket(Some(30.0), None, "Obese"),
                ],
            },
        )
    }

    fn ratio_config() -> CalculatorConfig {
        CalculatorConfig::new(
            "Ratio",
            "ratio",
            "misc",
            vec![
                FieldSchema::number("a", "A"),
                FieldSchema::number("b", "B"),
            ],
            "a / b",
            ResultConfig {
                label: "Ratio".to_string(),
                unit: None,
                format: Default::default(),
                precision: None,
                ranges: vec![],
            },
        )
    }

    fn seeded_store() -> MemoryStore {
        let mut store = MemoryStore::new();
        store.insert(bmi_config()).unwrap();
        store.insert(ratio_config()).unwrap();
        store
    }

    struct FailingStore;
    impl ConfigStore for FailingStore {
        fn fetch_active(&self) -> CalcResult<Vec<CalculatorConfig>> {
            Err(CalcError::store("fetch_active", "connection refused"))
        }
        fn fetch_by_slug(&self, _slug: &str) -> CalcResult<Option<CalculatorConfig>> {
            Err(CalcError::store("fetch_by_slug", "connection refused"))
        }
    }

    struct FailingSink;
    impl HistorySink for FailingSink {
        fn record(&self, _record: HistoryRecord) -> CalcResult<()> {
            Err(CalcError::store("record", "write timeout"))
        }
    }

    #[test]
    fn test_load_ready_with_blank_values() {
        let mut session = CalculatorSession::new(seeded_store(), NullHistory, None);
        session.load("bmi");

        assert_eq!(session.state(), &SessionState::Ready);
        assert_eq!(session.values().len(), 2);
        assert!(session.values().values().all(|v| v.is_blank()));
        assert!(session.errors().is_empty());
        assert_eq!(session.result(), None);
    }

    #[test]
    fn test_missing_slug_is_not_found() {
        let mut session = CalculatorSession::new(seeded_store(), NullHistory, None);
        session.load("no-such-calculator");
        assert_eq!(session.state(), &SessionState::NotFound);
    }

    #[test]
    fn test_fetch_failure_blocks_primary_flow() {
        let mut session = CalculatorSession::new(FailingStore, NullHistory, None);
        session.load("bmi");
        assert!(matches!(session.state(), SessionState::LoadFailed(_)));

        // submissions are rejected without a config
        session.submit();
        assert!(matches!(session.state(), SessionState::LoadFailed(_)));
    }

    #[test]
    fn test_end_to_end_bmi() {
        let mut session = CalculatorSession::new(seeded_store(), NullHistory, None);
        session.load("bmi");
        session.set_value("weightKg", RawValue::Number(70.0));
        session.set_value("heightM", RawValue::Number(1.75));
        session.submit();

        assert_eq!(session.state(), &SessionState::Evaluated);
        assert_eq!(session.result(), Some(22.9));

        let display = session.display().unwrap();
        assert_eq!(display.formatted, "22.9");
        assert_eq!(display.status.unwrap().status, "Normal weight");
    }

    #[test]
    fn test_required_blank_blocks_evaluation() {
        let mut session = CalculatorSession::new(seeded_store(), NullHistory, None);
        session.load("bmi");
        session.set_value("weightKg", RawValue::Number(70.0));
        session.submit();

        assert_eq!(session.state(), &SessionState::Editing);
        assert_eq!(
            session.errors().get("heightM").map(String::as_str),
            Some("Required")
        );
        assert_eq!(session.result(), None);
        assert!(session.display().is_none());
    }

    #[test]
    fn test_field_change_clears_result() {
        let mut session = CalculatorSession::new(seeded_store(), NullHistory, None);
        session.load("bmi");
        session.set_value("weightKg", RawValue::Number(70.0));
        session.set_value("heightM", RawValue::Number(1.75));
        session.submit();
        assert!(session.result().is_some());

        session.set_value("weightKg", RawValue::Number(80.0));
        assert_eq!(session.state(), &SessionState::Editing);
        assert_eq!(session.result(), None);
    }

    #[test]
    fn test_division_by_zero_shows_nothing() {
        let mut session = CalculatorSession::new(seeded_store(), NullHistory, None);
        session.load("ratio");
        session.set_value("a", RawValue::Number(1.0));
        session.set_value("b", RawValue::Number(0.0));
        session.submit();

        assert_eq!(session.state(), &SessionState::Evaluated);
        assert!(session.result().unwrap().is_nan());
        assert!(session.display().is_none());
    }

    #[test]
    fn test_slug_switch_resets_everything() {
        let mut session = CalculatorSession::new(seeded_store(), NullHistory, None);
        session.load("bmi");
        session.set_value("weightKg", RawValue::Number(70.0));
        session.set_value("heightM", RawValue::Number(1.75));
        session.submit();
        assert!(session.result().is_some());

        session.load("ratio");
        assert_eq!(session.state(), &SessionState::Ready);
        assert_eq!(session.slug(), "ratio");
        assert!(session.errors().is_empty());
        assert_eq!(session.result(), None);
        assert!(session.values().values().all(|v| v.is_blank()));
        assert_eq!(session.config().unwrap().slug, "ratio");
    }

    #[test]
    fn test_stale_load_completion_is_discarded() {
        let mut session = CalculatorSession::new(seeded_store(), NullHistory, None);
        let stale_token = session.start_load("bmi");
        session.load("ratio");
        assert_eq!(session.config().unwrap().slug, "ratio");

        // the slow response for "bmi" arrives after the switch
        session.resolve_load(stale_token, Ok(Some(bmi_config())));
        assert_eq!(session.config().unwrap().slug, "ratio");
        assert_eq!(session.state(), &SessionState::Ready);
    }

    #[test]
    fn test_history_emitted_on_success() {
        let history = MemoryHistory::new();
        let store = seeded_store();
        let calculator_id = store.fetch_by_slug("bmi").unwrap().unwrap().id;
        let user = Uuid::new_v4();

        let mut session = CalculatorSession::new(store, &history, Some(user));
        session.load("bmi");
        session.set_value("weightKg", RawValue::Number(70.0));
        session.set_value("heightM", RawValue::Number(1.75));
        session.submit();

        let records = history.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].calculator_id, calculator_id);
        assert_eq!(records[0].user_id, Some(user));
        assert_eq!(records[0].result, Some(22.9));
        assert_eq!(
            records[0].inputs.get("weightKg"),
            Some(&RawValue::Number(70.0))
        );
    }

    #[test]
    fn test_no_history_on_validation_failure() {
        let history = MemoryHistory::new();
        let mut session = CalculatorSession::new(seeded_store(), &history, None);
        session.load("bmi");
        session.submit();
        assert!(history.records().is_empty());
    }

    #[test]
    fn test_nan_result_recorded_as_null() {
        let history = MemoryHistory::new();
        let mut session = CalculatorSession::new(seeded_store(), &history, None);
        session.load("ratio");
        session.set_value("a", RawValue::Number(1.0));
        session.set_value("b", RawValue::Number(0.0));
        session.submit();

        let records = history.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].result, None);
    }

    #[test]
    fn test_history_failure_never_blocks_result() {
        let mut session = CalculatorSession::new(seeded_store(), FailingSink, None);
        session.load("bmi");
        session.set_value("weightKg", RawValue::Number(70.0));
        session.set_value("heightM", RawValue::Number(1.75));
        session.submit();

        assert_eq!(session.state(), &SessionState::Evaluated);
        assert_eq!(session.result(), Some(22.9));
    }

    #[test]
    fn test_blank_submission_with_optional_fields_uses_zero() {
        let mut session = CalculatorSession::new(seeded_store(), NullHistory, None);
        session.load("ratio");
        session.submit();

        // 0 / 0 is the NaN sentinel, not an error
        assert_eq!(session.state(), &SessionState::Evaluated);
        assert!(session.result().unwrap().is_nan());
    }

    #[test]
    fn test_edit_for_unknown_field_ignored() {
        let mut session = CalculatorSession::new(seeded_store(), NullHistory, None);
        session.load("ratio");
        session.set_value("nonexistent", RawValue::Number(1.0));
        assert!(!session.values().contains_key("nonexistent"));
    }
}
