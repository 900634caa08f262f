//! Localized message templates and rendering
//!
//! Templates are keyed by `(rule id, locale)` and reference context fields
//! by name (`{near}`, `{class_name}`, ...). Substitution fails closed: a
//! template referencing a field the explanation does not carry drops that
//! explanation from the output instead of rendering a blank hole.

use crate::context::ContextFields;
use crate::explain::Explanation;
use crate::locale::Locale;
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Template catalog with base-locale fallback
#[derive(Debug, Clone)]
pub struct MessageCatalog {
    templates: HashMap<Locale, HashMap<String, String>>,
    base_locale: Locale,
}

impl Default for MessageCatalog {
    fn default() -> Self {
        Self::with_builtin_templates()
    }
}

impl MessageCatalog {
    /// Empty catalog falling back to Spanish
    pub fn new() -> Self {
        Self {
            templates: HashMap::new(),
            base_locale: Locale::Spanish,
        }
    }

    /// Catalog preloaded with the built-in templates for every rule
    pub fn with_builtin_templates() -> Self {
        let mut catalog = Self::new();
        for (rule_id, template) in spanish_templates() {
            catalog.add_template(Locale::Spanish, rule_id, template);
        }
        for (rule_id, template) in english_templates() {
            catalog.add_template(Locale::English, rule_id, template);
        }
        catalog
    }

    /// Register or override a template
    pub fn add_template(&mut self, locale: Locale, rule_id: &str, template: &str) {
        self.templates
            .entry(locale)
            .or_default()
            .insert(rule_id.to_string(), template.to_string());
    }

    /// Look up a template, falling back to the base locale
    pub fn template(&self, rule_id: &str, locale: Locale) -> Option<&str> {
        self.templates
            .get(&locale)
            .and_then(|t| t.get(rule_id))
            .or_else(|| {
                self.templates
                    .get(&self.base_locale)
                    .and_then(|t| t.get(rule_id))
            })
            .map(|t| t.as_str())
    }

    /// Render a single explanation. `None` means the template is missing
    /// or references a field the explanation does not carry; callers that
    /// need to observe dropped explanations check this per item.
    pub fn render_one(&self, explanation: &Explanation, locale: Locale) -> Option<String> {
        let template = self.template(explanation.rule_id, locale)?;
        substitute(template, &explanation.fields)
    }

    /// Render explanations in the order produced by the evaluator.
    ///
    /// A single explanation renders bare; two or more render as a markdown
    /// bulleted list. Explanations whose template is missing or whose
    /// substitution fails are omitted; an empty result is the empty string.
    pub fn render(&self, explanations: &[Explanation], locale: Locale) -> String {
        let lines: Vec<String> = explanations
            .iter()
            .filter_map(|explanation| self.render_one(explanation, locale))
            .collect();

        match lines.len() {
            0 => String::new(),
            1 => lines.into_iter().next().unwrap_or_default(),
            _ => lines
                .iter()
                .map(|line| format!("* {}", line))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

fn placeholder() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Regex::new(r"\{([a-z_]+)\}").unwrap())
}

/// Substitute `{field}` placeholders from the context fields.
/// Returns `None` when any referenced field is absent.
pub fn substitute(template: &str, fields: &ContextFields) -> Option<String> {
    let placeholder = placeholder();

    let mut out = String::with_capacity(template.len());
    let mut last = 0;
    for caps in placeholder.captures_iter(template) {
        let whole = caps.get(0)?;
        let key = caps.get(1)?.as_str();
        let value = fields.get(key)?;
        out.push_str(&template[last..whole.start()]);
        out.push_str(value);
        last = whole.end();
    }
    out.push_str(&template[last..]);
    Some(out)
}

fn spanish_templates() -> Vec<(&'static str, &'static str)> {
    vec![
        (
            "missing-bracket",
            "Te falta una `{` cerca de `{near}`. Fijate si te sobran paréntesis o está mal escrita la declaración de clase o método.",
        ),
        (
            "missing-parenthesis",
            "Parece que te falta un '(' cerca de `{near}`",
        ),
        (
            "missing-semicolon",
            "Parece que te falta un ';' cerca de `{near}`",
        ),
        (
            "missing-parameter-type",
            "Parece que te falta el tipo de un parámetro cerca de `{near}`",
        ),
        (
            "missing-return-type",
            "Te falta especificar el tipo de retorno cerca de `{near}`",
        ),
        (
            "generic-semicolon",
            "Fijate si no te falta un `;` o una `{` cerca de la línea {line}",
        ),
        (
            "generic-parenthesis",
            "Fijate si no te falta un `(` o te sobra un `)` cerca de la línea {line}",
        ),
        (
            "generic-parameter-type",
            "Parece que hay un error de sintaxis cerca de la línea {line}. Asegurate también de que todos los parámetros declaren sus tipos.",
        ),
        (
            "undefined-method-in-variable",
            "Te falta la definición de método `{method}` en la variable `{variable}` de tipo `{type_name}`",
        ),
        (
            "undefined-method",
            "Te falta la definición de método `{method}` en la clase `{class_name}`",
        ),
        (
            "undefined-class",
            "Te falta la definición de la clase `{class_name}`",
        ),
        (
            "undefined-variable",
            "Te falta la definición de la variable `{variable}` en la clase `{class_name}`",
        ),
        (
            "lossy-conversion",
            "Estás intentando convertir un `{found}` a un `{required}`, pero `{found}` es más específico y se podrían perder datos. Si realmente querés hacerlo, agregá un `({required})` a la izquierda de la expresión, cerca de `{near}`.",
        ),
        (
            "incompatible-primitives",
            "Estás devolviendo un `{found}` donde se necesitaba un `{required}` cerca de `{near}`",
        ),
        (
            "incompatible-classes",
            "La clase `{found}` debería ser un `{required}`. Revisá si no te falta un _extends_ o _implements_ cerca de `{near}`.",
        ),
        (
            "missing-return",
            "Hay un método que debería retornar algo, pero no está retornando nada. ¡Revisá bien tu código!",
        ),
        (
            "unimplemented-abstract-method",
            "Te está faltando implementar el método `{method}` en la clase `{class_name}`, ya que está definido en `{interface}`",
        ),
        (
            "weaker-access-privileges",
            "El método `{method}` en la clase `{class_name}` debería ser público. Revisá si tiene la visibilidad correcta cerca de `{near}`.",
        ),
        (
            "constructor-mismatch",
            "El constructor de la clase `{class_name}` no existe o espera otra cantidad o tipo de argumentos",
        ),
    ]
}

fn english_templates() -> Vec<(&'static str, &'static str)> {
    vec![
        (
            "missing-bracket",
            "You seem to be missing a `{` near `{near}`. Check for extra parentheses or a malformed class or method declaration.",
        ),
        (
            "missing-parenthesis",
            "It looks like you are missing a '(' near `{near}`",
        ),
        (
            "missing-semicolon",
            "It looks like you are missing a ';' near `{near}`",
        ),
        (
            "missing-parameter-type",
            "It looks like a parameter is missing its type near `{near}`",
        ),
        (
            "missing-return-type",
            "You need to specify a return type near `{near}`",
        ),
        (
            "generic-semicolon",
            "Check whether you are missing a `;` or a `{` near line {line}",
        ),
        (
            "generic-parenthesis",
            "Check whether you are missing a `(` or have an extra `)` near line {line}",
        ),
        (
            "generic-parameter-type",
            "There seems to be a syntax error near line {line}. Also make sure every parameter declares its type.",
        ),
        (
            "undefined-method-in-variable",
            "You are missing the definition of method `{method}` on the variable `{variable}` of type `{type_name}`",
        ),
        (
            "undefined-method",
            "You are missing the definition of method `{method}` in class `{class_name}`",
        ),
        (
            "undefined-class",
            "You are missing the definition of class `{class_name}`",
        ),
        (
            "undefined-variable",
            "You are missing the definition of variable `{variable}` in class `{class_name}`",
        ),
        (
            "lossy-conversion",
            "You are trying to convert a `{found}` into a `{required}`, but `{found}` is more specific and data could be lost. If you really mean it, add a `({required})` cast to the left of the expression, near `{near}`.",
        ),
        (
            "incompatible-primitives",
            "You are returning a `{found}` where a `{required}` was needed, near `{near}`",
        ),
        (
            "incompatible-classes",
            "The class `{found}` should be a `{required}`. Check whether you are missing an _extends_ or _implements_ near `{near}`.",
        ),
        (
            "missing-return",
            "A method is supposed to return something, but it is not returning anything. Check your code!",
        ),
        (
            "unimplemented-abstract-method",
            "You still need to implement the method `{method}` in class `{class_name}`, since it is defined in `{interface}`",
        ),
        (
            "weaker-access-privileges",
            "The method `{method}` in class `{class_name}` should be public. Check its visibility near `{near}`.",
        ),
        (
            "constructor-mismatch",
            "The constructor of class `{class_name}` does not exist or expects a different number or type of arguments",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&'static str, &str)]) -> ContextFields {
        let mut fields = ContextFields::new();
        for (key, value) in pairs {
            fields.set(key, *value);
        }
        fields
    }

    #[test]
    fn test_substitute_named_fields() {
        let result = substitute(
            "falta `{near}` en `{class_name}`",
            &fields(&[("near", "return 3;"), ("class_name", "Foo")]),
        );
        assert_eq!(result, Some("falta `return 3;` en `Foo`".to_string()));
    }

    #[test]
    fn test_substitute_fails_closed_on_missing_field() {
        assert_eq!(substitute("falta `{near}`", &ContextFields::new()), None);
    }

    #[test]
    fn test_substitute_leaves_literal_braces_alone() {
        // A literal `{` token in a message is not a placeholder
        let result = substitute("Te falta una `{` cerca de `{near}`", &fields(&[("near", "x")]));
        assert_eq!(result, Some("Te falta una `{` cerca de `x`".to_string()));
    }

    #[test]
    fn test_substitute_repeated_field() {
        let result = substitute(
            "un `{found}` y otra vez `{found}`",
            &fields(&[("found", "double")]),
        );
        assert_eq!(result, Some("un `double` y otra vez `double`".to_string()));
    }

    #[test]
    fn test_every_rule_has_templates_in_both_locales() {
        let catalog = MessageCatalog::with_builtin_templates();
        let rules = crate::rules::RuleSet::new();

        for rule in rules.iter() {
            for locale in Locale::all() {
                assert!(
                    catalog.template(rule.id, locale).is_some(),
                    "rule {} has no {} template",
                    rule.id,
                    locale
                );
            }
        }
    }

    #[test]
    fn test_base_locale_fallback() {
        let mut catalog = MessageCatalog::new();
        catalog.add_template(Locale::Spanish, "only-spanish", "hola {near}");

        assert_eq!(
            catalog.template("only-spanish", Locale::English),
            Some("hola {near}")
        );
    }

    #[test]
    fn test_render_empty_is_empty_string() {
        let catalog = MessageCatalog::with_builtin_templates();
        assert_eq!(catalog.render(&[], Locale::Spanish), "");
    }

    #[test]
    fn test_render_single_has_no_bullet() {
        let catalog = MessageCatalog::with_builtin_templates();
        let explanations = vec![Explanation {
            rule_id: "undefined-class",
            fields: fields(&[("class_name", "Foo")]),
        }];

        assert_eq!(
            catalog.render(&explanations, Locale::Spanish),
            "Te falta la definición de la clase `Foo`"
        );
    }

    #[test]
    fn test_render_multiple_as_bulleted_list() {
        let catalog = MessageCatalog::with_builtin_templates();
        let explanations = vec![
            Explanation {
                rule_id: "missing-semicolon",
                fields: fields(&[("near", "a()")]),
            },
            Explanation {
                rule_id: "missing-return",
                fields: ContextFields::new(),
            },
        ];

        let rendered = catalog.render(&explanations, Locale::Spanish);
        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("* Parece que te falta un ';'"));
        assert!(lines[1].starts_with("* Hay un método"));
    }

    #[test]
    fn test_render_drops_explanation_with_missing_field() {
        // Template references {near}, but the fields carry nothing: the
        // broken explanation is omitted while the healthy one renders.
        let catalog = MessageCatalog::with_builtin_templates();
        let explanations = vec![
            Explanation {
                rule_id: "missing-semicolon",
                fields: ContextFields::new(),
            },
            Explanation {
                rule_id: "missing-return",
                fields: ContextFields::new(),
            },
        ];

        let rendered = catalog.render(&explanations, Locale::Spanish);
        assert_eq!(
            rendered,
            "Hay un método que debería retornar algo, pero no está retornando nada. ¡Revisá bien tu código!"
        );
    }

    #[test]
    fn test_render_one_reports_drops() {
        let catalog = MessageCatalog::with_builtin_templates();

        let healthy = Explanation {
            rule_id: "undefined-class",
            fields: fields(&[("class_name", "Foo")]),
        };
        assert_eq!(
            catalog.render_one(&healthy, Locale::Spanish),
            Some("Te falta la definición de la clase `Foo`".to_string())
        );

        let missing_field = Explanation {
            rule_id: "missing-semicolon",
            fields: ContextFields::new(),
        };
        assert_eq!(catalog.render_one(&missing_field, Locale::Spanish), None);

        let unknown_rule = Explanation {
            rule_id: "no-such-rule",
            fields: ContextFields::new(),
        };
        assert_eq!(catalog.render_one(&unknown_rule, Locale::Spanish), None);
    }

    #[test]
    fn test_render_drops_unknown_rule_id() {
        let catalog = MessageCatalog::with_builtin_templates();
        let explanations = vec![Explanation {
            rule_id: "no-such-rule",
            fields: ContextFields::new(),
        }];

        assert_eq!(catalog.render(&explanations, Locale::Spanish), "");
    }

    #[test]
    fn test_custom_template_override() {
        let mut catalog = MessageCatalog::with_builtin_templates();
        catalog.add_template(Locale::Spanish, "missing-return", "te falta un return");

        let explanations = vec![Explanation {
            rule_id: "missing-return",
            fields: ContextFields::new(),
        }];
        assert_eq!(
            catalog.render(&explanations, Locale::Spanish),
            "te falta un return"
        );
    }
}
