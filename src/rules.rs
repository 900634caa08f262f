//! Rule registry for javac error signatures
//!
//! Rules are a static, ordered table: registration order is evaluation
//! order, and within a family the first matching rule wins. Narrow rules
//! are registered before the broader ones that would otherwise mask them
//! (bracket before parenthesis, caret-based rules before the line-number
//! fallbacks).

use crate::context::{
    find_declaration, invoked_signature, is_primitive, type_mismatch, ContextFields, DeclKind,
};
use crate::input::DiagnosticInput;
use regex::{Captures, Regex};
use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;

/// The javac error marker that anchors every matcher
const ERROR_MARK: &str = "[eE]rror:";

/// Caret-pointer capture: skips the rest of the message line and any
/// intermediate lines, then grabs the offending source line right before
/// the whitespace-padded `^` column marker.
const NEAR: &str = r".*(?:\n.*)*?\n[ \t]*(?P<near>\S[^\n]*)\n[ \t]+\^";

/// Rule family. Families are exclusive internally: once a rule of a family
/// fires for a request, the remaining rules of that family are skipped.
/// Explanations from distinct families concatenate in registry order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleFamily {
    /// Missing punctuation and malformed declarations
    Syntax,
    /// `cannot find symbol` variants
    Symbol,
    /// Type conversion and assignment mismatches
    Types,
    /// Missing return statements
    ControlFlow,
    /// Unimplemented abstract/interface methods
    Contract,
    /// Visibility (access privilege) mismatches
    Visibility,
    /// Constructor arity/type mismatches
    Constructor,
}

impl RuleFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleFamily::Syntax => "syntax",
            RuleFamily::Symbol => "symbol",
            RuleFamily::Types => "types",
            RuleFamily::ControlFlow => "control-flow",
            RuleFamily::Contract => "contract",
            RuleFamily::Visibility => "visibility",
            RuleFamily::Constructor => "constructor",
        }
    }
}

impl fmt::Display for RuleFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Context-extraction function run after a matcher succeeds. Returning
/// `None` means the rule did not fire.
pub type Extractor = fn(&Captures, &DiagnosticInput) -> Option<ContextFields>;

/// One recognized error signature: matcher plus extractor plus identity
pub struct Rule {
    /// Unique rule identifier, doubles as the template key
    pub id: &'static str,
    /// Family this rule belongs to
    pub family: RuleFamily,
    matcher: Regex,
    extractor: Extractor,
}

impl Rule {
    /// Apply the matcher to each error record of the raw diagnostic and,
    /// on the first textual match, run the extractor against the captures
    /// and the submitted code. Matching per record keeps a caret capture
    /// from reading across two diagnostics.
    pub fn try_match(&self, input: &DiagnosticInput) -> Option<ContextFields> {
        for record in error_records(&input.diagnostic) {
            if let Some(caps) = self.matcher.captures(record) {
                return (self.extractor)(&caps, input);
            }
        }
        None
    }
}

/// `file:line: error:` header that opens each javac error record
fn error_header() -> &'static Regex {
    static HEADER: OnceLock<Regex> = OnceLock::new();
    HEADER.get_or_init(|| {
        Regex::new(&format!(r"(?m)^.*?:\d+:\s*{}", ERROR_MARK)).unwrap()
    })
}

/// Split the raw output into per-error records. A blob carrying no
/// headers is a single record.
fn error_records(diagnostic: &str) -> Vec<&str> {
    let starts: Vec<usize> = error_header()
        .find_iter(diagnostic)
        .map(|m| m.start())
        .collect();
    if starts.is_empty() {
        return vec![diagnostic];
    }

    let mut records = Vec::with_capacity(starts.len());
    for (index, &start) in starts.iter().enumerate() {
        let end = starts.get(index + 1).copied().unwrap_or(diagnostic.len());
        records.push(&diagnostic[start..end]);
    }
    records
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("id", &self.id)
            .field("family", &self.family)
            .finish()
    }
}

/// The ordered, process-wide rule table. Built once, read-only afterward.
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleSet {
    pub fn new() -> Self {
        let rules = vec![
            // Syntax: caret-based rules first, most specific symptom first
            rule(
                "missing-bracket",
                RuleFamily::Syntax,
                &near_pattern(r" '\{' expected"),
                near_only,
            ),
            rule(
                "missing-parenthesis",
                RuleFamily::Syntax,
                &near_pattern(r" '\)' expected"),
                near_only,
            ),
            rule(
                "missing-semicolon",
                RuleFamily::Syntax,
                &near_pattern(" ';' expected"),
                near_only,
            ),
            rule(
                "missing-parameter-type",
                RuleFamily::Syntax,
                &near_pattern(" <identifier> expected"),
                near_only,
            ),
            rule(
                "missing-return-type",
                RuleFamily::Syntax,
                &near_pattern(" invalid method declaration; return type required"),
                near_only,
            ),
            // Syntax: line-number fallbacks for diagnostics without a
            // usable caret block
            rule(
                "generic-semicolon",
                RuleFamily::Syntax,
                &line_pattern("';' expected"),
                line_only,
            ),
            rule(
                "generic-parenthesis",
                RuleFamily::Syntax,
                &line_pattern(r"'[(){]' expected"),
                line_only,
            ),
            rule(
                "generic-parameter-type",
                RuleFamily::Syntax,
                &line_pattern("<identifier> expected"),
                line_only,
            ),
            // Symbol: driven by the symbol:/location: trailer lines
            rule(
                "undefined-method-in-variable",
                RuleFamily::Symbol,
                &format!(
                    r"{} cannot find symbol(?s:.*?)symbol:\s+method (?P<method>[\w$]+\([^)]*\))\s*\n\s*location:\s+variable (?P<variable>[\w$]+) of type (?P<type_name>[\w$]+)",
                    ERROR_MARK
                ),
                undefined_method_in_variable,
            ),
            rule(
                "undefined-method",
                RuleFamily::Symbol,
                &format!(
                    r"{} cannot find symbol(?s:.*?)symbol:\s+method (?P<method>[\w$]+\([^)]*\))\s*\n\s*location:\s+class (?P<class_name>[\w$]+)",
                    ERROR_MARK
                ),
                undefined_method,
            ),
            rule(
                "undefined-class",
                RuleFamily::Symbol,
                &format!(
                    r"{} cannot find symbol(?s:.*?)symbol:\s+class (?P<class_name>[\w$]+)",
                    ERROR_MARK
                ),
                undefined_class,
            ),
            rule(
                "undefined-variable",
                RuleFamily::Symbol,
                &format!(
                    r"{} cannot find symbol(?s:.*?)symbol:\s+variable (?P<variable>[\w$]+)\s*\n\s*location:\s+class (?P<class_name>[\w$]+)",
                    ERROR_MARK
                ),
                undefined_variable,
            ),
            // Types: lossy conversion is the narrower symptom
            rule(
                "lossy-conversion",
                RuleFamily::Types,
                &near_pattern(
                    r" incompatible types: possible lossy conversion from (?P<found>[\w$.\[\]]+) to (?P<required>[\w$.\[\]]+)",
                ),
                lossy_conversion,
            ),
            rule(
                "incompatible-primitives",
                RuleFamily::Types,
                &near_pattern(" incompatible types"),
                incompatible_primitives,
            ),
            rule(
                "incompatible-classes",
                RuleFamily::Types,
                &near_pattern(" incompatible types"),
                incompatible_classes,
            ),
            // Independent single-rule families
            rule(
                "missing-return",
                RuleFamily::ControlFlow,
                &format!("{} missing return statement", ERROR_MARK),
                no_context,
            ),
            rule(
                "unimplemented-abstract-method",
                RuleFamily::Contract,
                &format!(
                    r"{} (?P<class_name>[\w$]+) is not abstract and does not override abstract method (?P<method>[\w$]+\([^)]*\)) in (?P<interface>[\w$]+)",
                    ERROR_MARK
                ),
                unimplemented_abstract_method,
            ),
            rule(
                "weaker-access-privileges",
                RuleFamily::Visibility,
                &format!(
                    r"{} (?P<method>[\w$]+\([^)]*\)) in (?P<class_name>[\w$]+) cannot implement [\w$]+\([^)]*\) in [\w$]+{}(?s:.*?)attempting to assign weaker access privileges",
                    ERROR_MARK, NEAR
                ),
                weaker_access_privileges,
            ),
            rule(
                "constructor-mismatch",
                RuleFamily::Constructor,
                &format!(
                    r"{} constructor [\w$]+ in class (?P<class_name>[\w$]+) cannot be applied to given types",
                    ERROR_MARK
                ),
                constructor_mismatch,
            ),
        ];

        Self { rules }
    }

    /// Rules in registration (precedence) order
    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Look up a rule by id
    pub fn get(&self, id: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.id == id)
    }
}

fn rule(id: &'static str, family: RuleFamily, pattern: &str, extractor: Extractor) -> Rule {
    Rule {
        id,
        family,
        matcher: Regex::new(pattern).unwrap(),
        extractor,
    }
}

/// Error marker, reason phrase, then the caret capture
fn near_pattern(reason: &str) -> String {
    format!("{}{}{}", ERROR_MARK, reason, NEAR)
}

/// `file:line: error: <reason>` shape for the caret-less fallbacks
fn line_pattern(reason: &str) -> String {
    format!(r"(?m)^.*?:(?P<line>\d+):\s*{} {}", ERROR_MARK, reason)
}

fn near_fragment(caps: &Captures) -> Option<String> {
    let near = caps.name("near")?.as_str().trim();
    if near.is_empty() {
        None
    } else {
        Some(near.to_string())
    }
}

fn capture(caps: &Captures, name: &str) -> Option<String> {
    Some(caps.name(name)?.as_str().to_string())
}

fn near_only(caps: &Captures, _input: &DiagnosticInput) -> Option<ContextFields> {
    let mut fields = ContextFields::new();
    fields.set("near", near_fragment(caps)?);
    Some(fields)
}

fn line_only(caps: &Captures, _input: &DiagnosticInput) -> Option<ContextFields> {
    let mut fields = ContextFields::new();
    fields.set("line", capture(caps, "line")?);
    Some(fields)
}

fn no_context(_caps: &Captures, _input: &DiagnosticInput) -> Option<ContextFields> {
    Some(ContextFields::new())
}

/// Method name without its argument list, for declaration lookups
fn bare_name(method: &str) -> &str {
    method.split('(').next().unwrap_or(method)
}

fn undefined_method(caps: &Captures, input: &DiagnosticInput) -> Option<ContextFields> {
    let method = capture(caps, "method")?;
    let class_name = capture(caps, "class_name")?;
    let sources = input.sources();

    // Only meaningful when the class exists in the submission but the
    // method does not; anything else is some other failure.
    find_declaration(&class_name, DeclKind::Class, &sources)?;
    if find_declaration(bare_name(&method), DeclKind::Method, &sources).is_some() {
        return None;
    }

    let mut fields = ContextFields::new();
    fields.set("method", method);
    fields.set("class_name", class_name);
    Some(fields)
}

fn undefined_method_in_variable(caps: &Captures, input: &DiagnosticInput) -> Option<ContextFields> {
    let method = capture(caps, "method")?;
    let variable = capture(caps, "variable")?;
    let type_name = capture(caps, "type_name")?;
    let sources = input.sources();

    find_declaration(&type_name, DeclKind::Class, &sources)?;
    if find_declaration(bare_name(&method), DeclKind::Method, &sources).is_some() {
        return None;
    }

    let mut fields = ContextFields::new();
    fields.set("method", method);
    fields.set("variable", variable);
    fields.set("type_name", type_name);
    Some(fields)
}

fn undefined_class(caps: &Captures, input: &DiagnosticInput) -> Option<ContextFields> {
    let class_name = capture(caps, "class_name")?;

    if find_declaration(&class_name, DeclKind::Class, &input.sources()).is_some() {
        return None;
    }

    let mut fields = ContextFields::new();
    fields.set("class_name", class_name);
    Some(fields)
}

fn undefined_variable(caps: &Captures, input: &DiagnosticInput) -> Option<ContextFields> {
    let variable = capture(caps, "variable")?;
    let class_name = capture(caps, "class_name")?;
    let sources = input.sources();

    find_declaration(&class_name, DeclKind::Class, &sources)?;
    if find_declaration(&variable, DeclKind::Variable, &sources).is_some() {
        return None;
    }

    let mut fields = ContextFields::new();
    fields.set("variable", variable);
    fields.set("class_name", class_name);
    Some(fields)
}

fn lossy_conversion(caps: &Captures, _input: &DiagnosticInput) -> Option<ContextFields> {
    let mut fields = ContextFields::new();
    fields.set("found", capture(caps, "found")?);
    fields.set("required", capture(caps, "required")?);
    fields.set("near", near_fragment(caps)?);
    Some(fields)
}

fn incompatible_primitives(caps: &Captures, input: &DiagnosticInput) -> Option<ContextFields> {
    let (found, required) = type_mismatch(&input.diagnostic)?;
    if !(is_primitive(&found) && is_primitive(&required)) {
        return None;
    }

    let mut fields = ContextFields::new();
    fields.set("found", found);
    fields.set("required", required);
    fields.set("near", near_fragment(caps)?);
    Some(fields)
}

fn incompatible_classes(caps: &Captures, input: &DiagnosticInput) -> Option<ContextFields> {
    let (found, required) = type_mismatch(&input.diagnostic)?;
    // The message talks about the found class, so it must be a reference type
    if is_primitive(&found) {
        return None;
    }

    let mut fields = ContextFields::new();
    fields.set("found", found);
    fields.set("required", required);
    fields.set("near", near_fragment(caps)?);
    Some(fields)
}

fn unimplemented_abstract_method(
    caps: &Captures,
    _input: &DiagnosticInput,
) -> Option<ContextFields> {
    let mut fields = ContextFields::new();
    fields.set("class_name", capture(caps, "class_name")?);
    fields.set("method", capture(caps, "method")?);
    fields.set("interface", capture(caps, "interface")?);
    Some(fields)
}

fn weaker_access_privileges(caps: &Captures, _input: &DiagnosticInput) -> Option<ContextFields> {
    let mut fields = ContextFields::new();
    fields.set("method", capture(caps, "method")?);
    fields.set("class_name", capture(caps, "class_name")?);
    fields.set("near", near_fragment(caps)?);
    Some(fields)
}

fn constructor_mismatch(caps: &Captures, input: &DiagnosticInput) -> Option<ContextFields> {
    let class_name = capture(caps, "class_name")?;

    let mut fields = ContextFields::new();
    if let Some(signature) = invoked_signature(&input.diagnostic, &class_name) {
        fields.set("signature", signature);
    }
    fields.set("class_name", class_name);
    Some(fields)
}
