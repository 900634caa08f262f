//! Error decoder and feedback generator for javac diagnostics
//!
//! Recognizes known javac error signatures in the raw output of a failed
//! compile of a student submission, extracts the offending context (source
//! line, class/method/variable names, type pairs), and renders localized,
//! human-readable explanations. Unknown output, structured results, and
//! extraction failures all degrade to "no feedback" instead of an error.
//!
//! # Example
//!
//! ```
//! use javac_doctor::{DiagnosticInput, Explainer, Locale};
//!
//! let diagnostic =
//!     "/tmp/SubmissionTest.java:6: error: ';' expected\n    Assert.assertEquals(2, 3)\n                             ^\n1 error\n";
//!
//! let explainer = Explainer::new();
//! let input = DiagnosticInput::new("class Foo {};", "", "", diagnostic);
//!
//! let feedback = explainer.explain(&input, Locale::Spanish).unwrap();
//! assert!(feedback.contains("Parece que te falta un ';'"));
//! ```

pub mod catalog;
pub mod context;
pub mod explain;
pub mod hook;
pub mod input;
pub mod locale;
pub mod rules;

// Re-export main types
pub use catalog::{substitute, MessageCatalog};
pub use context::{find_declaration, ContextFields, DeclKind, Declaration};
pub use explain::{Explainer, Explanation};
pub use hook::{FeedbackHook, HookError};
pub use input::{DiagnosticInput, SubmissionRequest};
pub use locale::Locale;
pub use rules::{Rule, RuleFamily, RuleSet};
