//! Entry point for test-orchestrator results
//!
//! The orchestrator hands over a `test_results` value of unknown shape:
//! a raw javac output string when compilation failed, or a structured
//! record when the submission compiled and ran. Explanation only applies
//! to the former; everything else degrades silently to "no feedback".

use crate::explain::Explainer;
use crate::input::{DiagnosticInput, SubmissionRequest};
use crate::locale::Locale;
use serde_json::Value;
use thiserror::Error;

/// Errors from the JSON-facing surface. The engine itself never fails;
/// these only cover payload parsing for callers speaking JSON.
#[derive(Error, Debug)]
pub enum HookError {
    #[error("invalid payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),
}

/// Feedback hook wiring a submission request to the explainer
pub struct FeedbackHook {
    explainer: Explainer,
}

impl Default for FeedbackHook {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedbackHook {
    pub fn new() -> Self {
        Self {
            explainer: Explainer::new(),
        }
    }

    pub fn explainer(&self) -> &Explainer {
        &self.explainer
    }

    /// Explain a failed run. Returns `None` when the results are not raw
    /// diagnostic text (passing runs, structured records, unexpected
    /// shapes) or when no rule fires.
    pub fn run(
        &self,
        request: &SubmissionRequest,
        results: &Value,
        locale: Locale,
    ) -> Option<String> {
        let raw = diagnostic_text(results)?;
        let input = DiagnosticInput::from_request(request, raw);
        self.explainer.explain(&input, locale)
    }

    /// JSON string surface: parse the request and results payloads, then
    /// delegate to [`FeedbackHook::run`].
    pub fn run_json(
        &self,
        request_json: &str,
        results_json: &str,
        locale: Locale,
    ) -> Result<Option<String>, HookError> {
        let request: SubmissionRequest = serde_json::from_str(request_json)?;
        let results: Value = serde_json::from_str(results_json)?;
        Ok(self.run(&request, &results, locale))
    }
}

/// Pull the raw diagnostic string out of a results value, if there is one.
///
/// Accepts the bare string, a `test_results` array whose first element is
/// a string (the orchestrator's compilation-failure shape), or a bare
/// array of strings. Structured pass/fail records yield `None`.
fn diagnostic_text(results: &Value) -> Option<&str> {
    match results {
        Value::String(s) => Some(s.as_str()),
        Value::Array(items) => items.first().and_then(Value::as_str),
        Value::Object(map) => map.get("test_results").and_then(|inner| match inner {
            Value::String(s) => Some(s.as_str()),
            Value::Array(items) => items.first().and_then(Value::as_str),
            _ => None,
        }),
        _ => None,
    }
}
