use crate::error::{AppError, Result};

use super::ChatMessage;

/// A system instruction plus a human turn with `{name}` placeholders.
#[derive(Debug, Clone, Copy)]
pub struct PromptTemplate {
    pub system: &'static str,
    pub human: &'static str,
}

impl PromptTemplate {
    pub const fn new(system: &'static str, human: &'static str) -> Self {
        Self { system, human }
    }

    pub fn render(&self, vars: &[(&str, &str)]) -> Result<Vec<ChatMessage>> {
        Ok(vec![
            ChatMessage::system(render_text(self.system, vars)?),
            ChatMessage::user(render_text(self.human, vars)?),
        ])
    }
}

/// Substitute `{name}` placeholders in one left-to-right pass.
///
/// Substituted values are copied verbatim and never rescanned, so braces in a
/// diff or a review survive untouched. A brace group that is not an identifier
/// (`{ x }`, `{}`) is literal text; an identifier with no value is an error.
pub fn render_text(template: &str, vars: &[(&str, &str)]) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let name = after.find('}').map(|close| &after[..close]).filter(|n| is_identifier(n));
        match name {
            Some(name) => {
                let value = vars
                    .iter()
                    .find(|(key, _)| *key == name)
                    .map(|(_, value)| *value)
                    .ok_or_else(|| AppError::Template(format!("no value for {{{name}}}")))?;
                out.push_str(value);
                rest = &after[name.len() + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    Ok(out)
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::Role;

    #[test]
    fn test_substitutes_values() {
        let text = render_text("a {x} b {y}", &[("x", "1"), ("y", "2")]).unwrap();
        assert_eq!(text, "a 1 b 2");
    }

    #[test]
    fn test_values_are_not_rescanned() {
        let diff = "+fn main() { let s = \"{diff_text}\"; }";
        let text = render_text("diff:\n{diff_text}", &[("diff_text", diff)]).unwrap();
        assert_eq!(text, format!("diff:\n{diff}"));
    }

    #[test]
    fn test_non_identifier_braces_are_literal() {
        let text = render_text("{} { x } {1a} {", &[]).unwrap();
        assert_eq!(text, "{} { x } {1a} {");
    }

    #[test]
    fn test_missing_value_is_an_error() {
        let err = render_text("{missing}", &[]).unwrap_err();
        assert!(matches!(err, AppError::Template(_)));
    }

    #[test]
    fn test_render_builds_system_and_user_turns() {
        let template = PromptTemplate::new("system", "hello {name}");
        let messages = template.render(&[("name", "world")]).unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[1].role, Role::User);
        assert_eq!(messages[1].content, "hello world");
    }
}
