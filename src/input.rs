//! Request and diagnostic input types

use serde::{Deserialize, Serialize};

/// A submission as handed over by the test orchestrator.
///
/// `expectations` is carried for wire compatibility but never consulted
/// by the explanation engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmissionRequest {
    /// The student's submitted source code
    #[serde(default)]
    pub content: String,

    /// The test code the submission was run against
    #[serde(default)]
    pub test: String,

    /// Auxiliary declarations injected into the compilation unit
    #[serde(default)]
    pub extra: String,

    /// Expectation descriptors (ignored by this crate)
    #[serde(default)]
    pub expectations: Vec<serde_json::Value>,
}

/// Immutable per-request input to the rule evaluator.
#[derive(Debug, Clone)]
pub struct DiagnosticInput {
    /// Submitted source code
    pub source: String,
    /// Test code
    pub test: String,
    /// Auxiliary declarations
    pub extra: String,
    /// Raw javac output
    pub diagnostic: String,
}

impl DiagnosticInput {
    pub fn new(
        source: impl Into<String>,
        test: impl Into<String>,
        extra: impl Into<String>,
        diagnostic: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            test: test.into(),
            extra: extra.into(),
            diagnostic: diagnostic.into(),
        }
    }

    /// Build from a request plus the raw compiler output
    pub fn from_request(request: &SubmissionRequest, diagnostic: impl Into<String>) -> Self {
        Self::new(
            request.content.clone(),
            request.test.clone(),
            request.extra.clone(),
            diagnostic,
        )
    }

    /// All code the student controls, in lookup order
    pub fn sources(&self) -> [&str; 3] {
        [&self.source, &self.test, &self.extra]
    }
}
