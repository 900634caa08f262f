//! Rule evaluation
//!
//! Pure function of the request plus the read-only rule and template
//! tables, so concurrent use needs no locking.

use crate::catalog::MessageCatalog;
use crate::context::ContextFields;
use crate::input::DiagnosticInput;
use crate::locale::Locale;
use crate::rules::{RuleFamily, RuleSet};
use serde::Serialize;
use std::collections::HashSet;

/// The structured result of a successful rule match
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Explanation {
    /// Id of the rule that fired
    pub rule_id: &'static str,
    /// Extracted context, keyed by symbolic field name
    pub fields: ContextFields,
}

/// Evaluates the rule registry against a diagnostic and renders the result
pub struct Explainer {
    rules: RuleSet,
    catalog: MessageCatalog,
}

impl Default for Explainer {
    fn default() -> Self {
        Self::new()
    }
}

impl Explainer {
    pub fn new() -> Self {
        Self {
            rules: RuleSet::new(),
            catalog: MessageCatalog::with_builtin_templates(),
        }
    }

    /// Use a custom catalog (extra locales or overridden templates)
    pub fn with_catalog(catalog: MessageCatalog) -> Self {
        Self {
            rules: RuleSet::new(),
            catalog,
        }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn catalog(&self) -> &MessageCatalog {
        &self.catalog
    }

    /// Run every rule in registry order. A family stops being considered
    /// once one of its rules fires; independent families accumulate.
    pub fn evaluate(&self, input: &DiagnosticInput) -> Vec<Explanation> {
        let mut matched: HashSet<RuleFamily> = HashSet::new();
        let mut explanations = Vec::new();

        for rule in self.rules.iter() {
            if matched.contains(&rule.family) {
                continue;
            }
            if let Some(fields) = rule.try_match(input) {
                matched.insert(rule.family);
                explanations.push(Explanation {
                    rule_id: rule.id,
                    fields,
                });
            }
        }

        explanations
    }

    /// Evaluate and render. `None` means there is no feedback to show.
    pub fn explain(&self, input: &DiagnosticInput, locale: Locale) -> Option<String> {
        let rendered = self.catalog.render(&self.evaluate(input), locale);
        if rendered.is_empty() {
            None
        } else {
            Some(rendered)
        }
    }
}
