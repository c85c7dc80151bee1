//! Trace line matching
//!
//! A trace line starts with a fixed marker (by default `%%% arrayMatrix: `)
//! immediately followed by the name of the function that emitted it.
//! Everything after the first whitespace character is ignored.

use crate::error::{Result, TallyError};
use regex::Regex;

/// Marker written by the instrumented analyzer in front of every trace record
pub const DEFAULT_PREFIX: &str = "%%% arrayMatrix: ";

/// Compiled matcher for trace lines
#[derive(Debug, Clone)]
pub struct TracePattern {
    prefix: String,
    regex: Regex,
}

impl TracePattern {
    /// Build a matcher for lines beginning with `prefix`
    ///
    /// The prefix is taken literally; regex metacharacters are escaped.
    pub fn new(prefix: &str) -> Result<Self> {
        if prefix.is_empty() {
            return Err(TallyError::InvalidPrefix(
                "prefix must not be empty".to_string(),
            ));
        }

        let regex = Regex::new(&format!(r"^{}(\S+)", regex::escape(prefix)))?;

        Ok(Self {
            prefix: prefix.to_string(),
            regex,
        })
    }

    /// The literal prefix this matcher looks for
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Extract the function name from a trace line, if the line is one
    pub fn function_name<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.regex
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_pattern() -> TracePattern {
        TracePattern::new(DEFAULT_PREFIX).unwrap()
    }

    #[test]
    fn test_default_pattern_extracts_function() {
        let pattern = default_pattern();
        assert_eq!(
            pattern.function_name("%%% arrayMatrix: eval_exp some trailing data"),
            Some("eval_exp")
        );
    }

    #[test]
    fn test_name_stops_at_newline() {
        let pattern = default_pattern();
        assert_eq!(
            pattern.function_name("%%% arrayMatrix: join\r\n"),
            Some("join")
        );
    }

    #[test]
    fn test_name_keeps_punctuation() {
        let pattern = default_pattern();
        assert_eq!(
            pattern.function_name("%%% arrayMatrix: Base.Main.special_fn(x)"),
            Some("Base.Main.special_fn(x)")
        );
    }

    #[test]
    fn test_prefix_must_start_line() {
        let pattern = default_pattern();
        assert_eq!(pattern.function_name(" %%% arrayMatrix: eval"), None);
        assert_eq!(pattern.function_name("log: %%% arrayMatrix: eval"), None);
    }

    #[test]
    fn test_prefix_without_name_does_not_match() {
        let pattern = default_pattern();
        assert_eq!(pattern.function_name("%%% arrayMatrix: "), None);
        assert_eq!(pattern.function_name("%%% arrayMatrix:    \n"), None);
        assert_eq!(pattern.function_name("%%% arrayMatrix:"), None);
    }

    #[test]
    fn test_unrelated_line_does_not_match() {
        let pattern = default_pattern();
        assert_eq!(pattern.function_name("arrayMatrix: eval"), None);
        assert_eq!(pattern.function_name(""), None);
    }

    #[test]
    fn test_custom_prefix_is_literal() {
        let pattern = TracePattern::new("[fn]+ ").unwrap();
        assert_eq!(pattern.function_name("[fn]+ main"), Some("main"));
        assert_eq!(pattern.function_name("fn main"), None);
        assert_eq!(pattern.prefix(), "[fn]+ ");
    }

    #[test]
    fn test_empty_prefix_rejected() {
        let result = TracePattern::new("");
        assert!(matches!(result, Err(TallyError::InvalidPrefix(_))));
    }
}
