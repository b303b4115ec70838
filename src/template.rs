//! Placeholder interpolation for prompts and planning instructions.
//!
//! Both `{{key}}` and `{key}` are recognized. Placeholders the lookup cannot
//! resolve are left in place untouched.

use crate::scope::{AgenticScope, Arguments};
use regex::{Captures, Regex};
use std::sync::OnceLock;

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_.-]*)\s*\}\}|\{([A-Za-z_][A-Za-z0-9_.-]*)\}")
            .expect("valid placeholder pattern")
    })
}

/// Replace placeholders using `lookup`.
pub fn render<F>(template: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    placeholder_regex()
        .replace_all(template, |caps: &Captures<'_>| {
            let name = caps
                .get(1)
                .or_else(|| caps.get(2))
                .map(|m| m.as_str())
                .unwrap_or_default();
            lookup(name).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Replace placeholders with rendered argument values.
pub fn render_arguments(template: &str, arguments: &Arguments) -> String {
    render(template, |name| arguments.get(name).map(|v| v.render()))
}

/// Replace placeholders with rendered scope values.
pub fn render_scope(template: &str, scope: &AgenticScope) -> String {
    render(template, |name| scope.read_state_opt(name).map(|v| v.render()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::StateValue;

    #[test]
    fn test_double_brace() {
        let mut args = Arguments::new();
        args.insert("topic".into(), StateValue::from("dragons"));
        assert_eq!(
            render_arguments("Write about {{topic}}.", &args),
            "Write about dragons."
        );
        assert_eq!(render_arguments("{{ topic }}!", &args), "dragons!");
    }

    #[test]
    fn test_single_brace_from_scope() {
        let scope = AgenticScope::new();
        scope.write_state("style", "poetic");
        scope.write_state("score", 0.5);
        assert_eq!(
            render_scope("Edit in {style} style ({score})", &scope),
            "Edit in poetic style (0.5)"
        );
    }

    #[test]
    fn test_unknown_placeholders_kept() {
        let scope = AgenticScope::new();
        assert_eq!(
            render_scope("keep {unknown} and {{other}}", &scope),
            "keep {unknown} and {{other}}"
        );
    }

    #[test]
    fn test_json_braces_untouched() {
        let scope = AgenticScope::new();
        let text = r#"reply with {"action": "done"}"#;
        assert_eq!(render_scope(text, &scope), text);
    }
}
