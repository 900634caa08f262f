//! Context extraction helpers shared across rules
//!
//! Everything here returns `Option`: a failed lookup means the owning rule
//! is skipped, never that evaluation aborts.

use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;

/// Named string fragments extracted from the diagnostic and source text.
///
/// Keys present depend on which rule matched; templates reference them by
/// name and unused keys are harmless.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContextFields(BTreeMap<&'static str, String>);

impl ContextFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: &'static str, value: impl Into<String>) {
        self.0.insert(key, value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(|v| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Kind of declaration the locator searches for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Class,
    Method,
    Variable,
}

/// A located declaration site
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// 1-based line number within the source it was found in
    pub line: usize,
    /// The declaring line, trimmed
    pub text: String,
}

/// Search the given sources for a declaration of `name`.
///
/// Lexical heuristics only: a class/interface/enum keyword, a method name
/// followed by `(` in declaration position, or a typed variable followed by
/// `=` or `;`. Good enough to tell "declared somewhere in the submission"
/// from "missing entirely", which is all the rules need.
pub fn find_declaration(name: &str, kind: DeclKind, sources: &[&str]) -> Option<Declaration> {
    let escaped = regex::escape(name);
    let pattern = match kind {
        DeclKind::Class => format!(r"\b(?:class|interface|enum)\s+{}\b", escaped),
        DeclKind::Method => format!(
            r"^\s*(?:(?:public|private|protected|static|final|abstract|synchronized|default|native)\s+)*[\w$<>\[\],\s]+\b{}\s*\(",
            escaped
        ),
        DeclKind::Variable => format!(
            r"^\s*(?:(?:public|private|protected|static|final)\s+)*[\w$<>\[\]]+\s+{}\s*[=;]",
            escaped
        ),
    };

    let re = match Regex::new(&pattern) {
        Ok(re) => re,
        Err(_) => return None,
    };

    for source in sources {
        for (index, line) in source.lines().enumerate() {
            if re.is_match(line) {
                return Some(Declaration {
                    line: index + 1,
                    text: line.trim().to_string(),
                });
            }
        }
    }

    None
}

/// Extract the found/required pair from a type-mismatch diagnostic.
///
/// Handles both javac forms: the modern reason phrase
/// `incompatible types: F cannot be converted to R` and the classic
/// `found : F` / `required: R` trailer lines.
pub fn type_mismatch(diagnostic: &str) -> Option<(String, String)> {
    let modern =
        Regex::new(r"incompatible types: ([\w$.\[\]]+) cannot be converted to ([\w$.\[\]]+)")
            .ok()?;
    if let Some(caps) = modern.captures(diagnostic) {
        return Some((caps[1].to_string(), caps[2].to_string()));
    }

    let classic =
        Regex::new(r"found\s*:\s*([\w$.\[\]]+)\s*\n\s*required\s*:\s*([\w$.\[\]]+)").ok()?;
    classic
        .captures(diagnostic)
        .map(|caps| (caps[1].to_string(), caps[2].to_string()))
}

/// Check whether a type token names a Java primitive
pub fn is_primitive(ty: &str) -> bool {
    matches!(
        ty,
        "byte" | "short" | "int" | "long" | "float" | "double" | "boolean" | "char"
    )
}

/// Extract the invoked constructor signature from an arity-mismatch
/// diagnostic, e.g. `Foo(int,int)` from a `found: int,int` trailer.
pub fn invoked_signature(diagnostic: &str, class_name: &str) -> Option<String> {
    let re = Regex::new(r"found:\s*([^\n;]+)").ok()?;
    let caps = re.captures(diagnostic)?;
    let args = caps[1].trim();

    if args == "no arguments" {
        Some(format!("{}()", class_name))
    } else {
        Some(format!("{}({})", class_name, args))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_class_declaration() {
        let source = "import java.util.*;\n\nclass Foo {\n  int x;\n}\n";
        let decl = find_declaration("Foo", DeclKind::Class, &[source]).unwrap();
        assert_eq!(decl.line, 3);
        assert_eq!(decl.text, "class Foo {");
    }

    #[test]
    fn test_find_interface_declaration() {
        let source = "interface Bar {\n}\n";
        assert!(find_declaration("Bar", DeclKind::Class, &[source]).is_some());
    }

    #[test]
    fn test_class_usage_is_not_a_declaration() {
        let source = "public void testFoo() {\n  Assert.assertEquals(2, new Foo());\n}\n";
        assert!(find_declaration("Foo", DeclKind::Class, &[source]).is_none());
    }

    #[test]
    fn test_find_method_declaration() {
        let source = "class Foo {\n  public int getAnInt() {\n    return 2;\n  }\n}\n";
        let decl = find_declaration("getAnInt", DeclKind::Method, &[source]).unwrap();
        assert_eq!(decl.line, 2);
        assert!(decl.text.starts_with("public int getAnInt"));
    }

    #[test]
    fn test_method_call_is_not_a_declaration() {
        let source = "void t() {\n  Assert.assertEquals(2, new Foo().getAnInt());\n}\n";
        assert!(find_declaration("getAnInt", DeclKind::Method, &[source]).is_none());
    }

    #[test]
    fn test_find_variable_declaration() {
        let source = "class Main {\n  static int unaVariable = 3;\n}\n";
        assert!(find_declaration("unaVariable", DeclKind::Variable, &[source]).is_some());
    }

    #[test]
    fn test_qualified_access_is_not_a_declaration() {
        let source = "void t() {\n  Assert.assertEquals(2, Main.unaVariable);\n}\n";
        assert!(find_declaration("unaVariable", DeclKind::Variable, &[source]).is_none());
    }

    #[test]
    fn test_declaration_searches_all_sources() {
        let test_code = "class Helper {}\n";
        let decl = find_declaration("Helper", DeclKind::Class, &["", test_code]).unwrap();
        assert_eq!(decl.text, "class Helper {}");
    }

    #[test]
    fn test_type_mismatch_modern_form() {
        let diag = "error: incompatible types: int cannot be converted to boolean\n";
        let (found, required) = type_mismatch(diag).unwrap();
        assert_eq!(found, "int");
        assert_eq!(required, "boolean");
    }

    #[test]
    fn test_type_mismatch_classic_form() {
        let diag = "error: incompatible types\nfound   : int\nrequired: boolean\n";
        let (found, required) = type_mismatch(diag).unwrap();
        assert_eq!(found, "int");
        assert_eq!(required, "boolean");
    }

    #[test]
    fn test_type_mismatch_absent() {
        assert!(type_mismatch("error: ';' expected").is_none());
    }

    #[test]
    fn test_is_primitive() {
        assert!(is_primitive("int"));
        assert!(is_primitive("boolean"));
        assert!(!is_primitive("Foo"));
        assert!(!is_primitive("String"));
    }

    #[test]
    fn test_invoked_signature_with_args() {
        let diag = "error: constructor Foo in class Foo cannot be applied to given types;\n  required: no arguments\n  found: int,int\n";
        assert_eq!(
            invoked_signature(diag, "Foo"),
            Some("Foo(int,int)".to_string())
        );
    }

    #[test]
    fn test_invoked_signature_no_args() {
        let diag = "  required: int\n  found: no arguments\n";
        assert_eq!(invoked_signature(diag, "Foo"), Some("Foo()".to_string()));
    }

    #[test]
    fn test_context_fields_roundtrip() {
        let mut fields = ContextFields::new();
        fields.set("near", "return 3;");

        assert_eq!(fields.get("near"), Some("return 3;"));
        assert_eq!(fields.get("missing"), None);
        assert!(!fields.is_empty());
    }
}
