//! Variable expansion
//!
//! Rewrites `$NAME` references inside expansion-eligible segments. Runs once
//! per [`ArgToken`] at execution time, so a stage sees the environment as it
//! stands when the pipeline starts, not when the line was parsed.

use crate::env::Environment;
use crate::parser::ArgToken;

/// Expand one argument word against the environment.
///
/// Literal (single-quoted) segments copy verbatim. In expandable segments a
/// `$` followed by a letter or underscore names a variable: the longest run
/// of letters, digits and underscores is consumed and looked up local-first.
/// An unresolved name expands to the empty string; a bare `$` copies as-is.
pub fn expand_token(token: &ArgToken, env: &Environment) -> String {
    let mut out = String::new();
    for segment in &token.segments {
        if segment.expand {
            expand_into(&mut out, &segment.text, env);
        } else {
            out.push_str(&segment.text);
        }
    }
    out
}

fn expand_into(out: &mut String, text: &str, env: &Environment) {
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '$' {
            out.push(ch);
            continue;
        }
        match chars.peek() {
            Some(&c) if c.is_ascii_alphabetic() || c == '_' => {
                let mut name = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_ascii_alphanumeric() || c == '_' {
                        name.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                match env.get_var(&name) {
                    Some(value) => out.push_str(&value),
                    None => tracing::trace!(%name, "expansion miss"),
                }
            }
            _ => out.push('$'),
        }
    }
}
