//! Selector compilation and path matching.
//!
//! A selector is compiled once per decode session. Selectors without `*`
//! compare byte-for-byte against the current path; selectors containing `*`
//! become [`glob::Pattern`]s, with `[` and `]` escaped first since in a
//! JSONPath they are index delimiters rather than character classes.

use glob::Pattern;

use crate::error::{StreamError, StreamResult};

/// A compiled selector predicate over the current path.
#[derive(Debug, Clone)]
pub(crate) enum Selector {
    Literal(String),
    Glob(Pattern),
}

impl Selector {
    /// Compile a JSONPath-subset selector.
    pub(crate) fn compile(expr: &str) -> StreamResult<Self> {
        if expr.contains('*') {
            let pattern = Pattern::new(&escape_brackets(expr)).map_err(StreamError::from)?;
            log::debug!("compiled glob selector {expr:?}");
            return Ok(Self::Glob(pattern));
        }
        Ok(Self::Literal(expr.to_string()))
    }

    /// Does the current path satisfy this selector?
    pub(crate) fn matches(&self, path: &[u8]) -> bool {
        match self {
            // `$.` is the conventional selector for "every top-level value"
            // and must also match the bare root path.
            Self::Literal(s) => s.as_bytes() == path || (path == b"$" && s == "$."),
            Self::Glob(p) => p.matches(&String::from_utf8_lossy(path)),
        }
    }
}

/// Rewrite `[` and `]` as single-character glob classes so they match
/// themselves.
fn escape_brackets(expr: &str) -> String {
    let mut out = String::with_capacity(expr.len() + 4);
    for c in expr.chars() {
        match c {
            '[' => out.push_str("[[]"),
            ']' => out.push_str("[]]"),
            _ => out.push(c),
        }
    }
    out
}

/// Find the first selector in registration order matching `path`.
///
/// Overlapping selectors are legal; the earliest registration wins and the
/// value is delivered to that handler only.
pub(crate) fn match_first(selectors: &[Selector], path: &[u8]) -> Option<usize> {
    selectors.iter().position(|s| s.matches(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compiled(expr: &str) -> Selector {
        Selector::compile(expr).expect("selector compiles")
    }

    #[test]
    fn literal_selectors_compare_exactly() {
        let s = compiled("$.store.bicycle");
        assert!(s.matches(b"$.store.bicycle"));
        assert!(!s.matches(b"$.store.bicycles"));
        assert!(!s.matches(b"$.store"));
    }

    #[test]
    fn root_selector_matches_bare_root() {
        let s = compiled("$.");
        assert!(s.matches(b"$"));
        assert!(!s.matches(b"$.a"));
    }

    #[test]
    fn wildcard_spans_an_index() {
        let s = compiled("$.store.book[*]");
        assert!(s.matches(b"$.store.book[0]"));
        assert!(s.matches(b"$.store.book[17]"));
        assert!(!s.matches(b"$.store.book"));
        assert!(!s.matches(b"$.store.book[0].price"));
    }

    #[test]
    fn wildcard_with_trailing_field() {
        let s = compiled("$.store.book[*].price");
        assert!(s.matches(b"$.store.book[3].price"));
        assert!(!s.matches(b"$.store.book[3].title"));
    }

    #[test]
    fn wildcard_spans_whole_runs() {
        let s = compiled("$.*.price");
        assert!(s.matches(b"$.store.bicycle.price"));
        assert!(s.matches(b"$.a.price"));
        assert!(!s.matches(b"$.price"));
    }

    #[test]
    fn brackets_are_literal_not_classes() {
        // Without escaping, `[0]` would be a character class matching "0".
        let s = compiled("$.[*]");
        assert!(s.matches(b"$.[0]"));
        assert!(!s.matches(b"$.0"));
    }

    #[test]
    fn first_match_wins_across_overlap() {
        let set = vec![compiled("$.store.*"), compiled("$.store.bicycle")];
        assert_eq!(match_first(&set, b"$.store.bicycle"), Some(0));
        assert_eq!(match_first(&set, b"$.other"), None);
    }

    #[test]
    fn bracket_escaping_uses_glob_classes() {
        assert_eq!(escape_brackets("$.a[0]"), "$.a[[]0[]]");
        assert_eq!(escape_brackets("$.plain"), "$.plain");
    }

    #[test]
    fn malformed_glob_surfaces_a_selector_error() {
        // `**` glued to other characters is rejected by the pattern parser.
        let err = Selector::compile("$.store.**x").unwrap_err();
        assert!(matches!(err, StreamError::Selector { .. }), "{err}");
    }
}
