//! Inline text rewriting
//!
//! Rewrites the visible text of a non-code line: a stray emphasis marker is
//! escaped so it renders literally, and configured code-identifier tokens are
//! wrapped in inline-literal markup. Order matters: escaping runs first,
//! because wrapping inserts marker characters that must not be re-escaped.

use std::cmp::Reverse;

/// Process-wide list of code-identifier-like tokens to wrap in inline
/// literals. Loaded once at startup and shared read-only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LiteralTokens {
    tokens: Vec<String>,
}

impl LiteralTokens {
    pub fn new(tokens: Vec<String>) -> Self {
        LiteralTokens { tokens }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl FromIterator<String> for LiteralTokens {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        LiteralTokens::new(iter.into_iter().collect())
    }
}

/// Escape a lone `*` that is not part of a real emphasis span.
///
/// A single occurrence not immediately followed by a space is treated as a
/// stray marker and replaced with ```` ``*`` ````. A `*` at the end of the
/// line is not followed by a space either, so it is escaped too.
pub fn escape_stray_emphasis(text: &str) -> String {
    let mut stars = text.match_indices('*');
    let first = stars.next();
    if stars.next().is_some() {
        return text.to_string();
    }
    match first {
        Some((pos, _)) if text[pos + 1..].chars().next() != Some(' ') => {
            text.replace('*', "``*``")
        }
        _ => text.to_string(),
    }
}

/// Wrap every configured token found in the line in inline-literal markup.
/// The earliest match wins, with the longest token taking precedence on
/// ties, and matched text is consumed as the scan advances, so a token that
/// contains another configured token wraps as itself and wrapped output is
/// never rescanned. Callers skip this on header lines to avoid corrupting
/// header values.
pub fn wrap_literal_tokens(text: &str, tokens: &LiteralTokens) -> String {
    let mut result = String::with_capacity(text.len());
    let mut rest = text;
    loop {
        let next = tokens
            .iter()
            .filter(|token| !token.is_empty())
            .filter_map(|token| rest.find(token).map(|pos| (pos, token)))
            .min_by_key(|&(pos, token)| (pos, Reverse(token.len())));
        match next {
            Some((pos, token)) => {
                result.push_str(&rest[..pos]);
                result.push_str("``");
                result.push_str(token);
                result.push_str("``");
                rest = &rest[pos + token.len()..];
            }
            None => {
                result.push_str(rest);
                return result;
            }
        }
    }
}

/// Full inline rewrite for a plain (non-code, non-header) line.
pub fn rewrite(text: &str, tokens: &LiteralTokens) -> String {
    wrap_literal_tokens(&escape_stray_emphasis(text), tokens)
}
