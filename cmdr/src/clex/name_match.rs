// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Matching names against what the user typed in a filter or a select prompt.

use glob::{MatchOptions, Pattern};

const OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: false,
    require_literal_leading_dot: true,
};

/// `needle` occurs in `haystack`; an empty needle is everywhere.
#[must_use]
pub fn substring(haystack: &str, needle: &str, ignore_case: bool) -> bool {
    if ignore_case {
        haystack.to_lowercase().contains(&needle.to_lowercase())
    } else {
        haystack.contains(needle)
    }
}

/// The expression contains wildcards and is therefore a pattern, not a substring.
#[must_use]
pub fn is_pattern(expr: &str) -> bool { expr.contains(['*', '?', '[']) }

/// A compiled shell style pattern: `*`, `?` and `[...]`. A leading dot of a name
/// must be matched literally.
#[derive(Debug, Clone)]
pub struct NamePattern(Pattern);

impl NamePattern {
    /// `None` when the pattern is incomplete, eg: an unclosed `[`.
    #[must_use]
    pub fn new(expr: &str) -> Option<Self> { Pattern::new(expr).ok().map(Self) }

    #[must_use]
    pub fn matches(&self, name: &str) -> bool { self.0.matches_with(name, OPTIONS) }
}

/// A file panel filter: a pattern when it has wildcards, a substring otherwise.
#[derive(Debug, Clone)]
pub enum NameFilter {
    Substring(String),
    Pattern(NamePattern),
}

impl NameFilter {
    /// `None` for an incomplete pattern.
    #[must_use]
    pub fn new(expr: &str) -> Option<Self> {
        if is_pattern(expr) {
            NamePattern::new(expr).map(NameFilter::Pattern)
        } else {
            Some(NameFilter::Substring(expr.to_string()))
        }
    }

    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        match self {
            NameFilter::Substring(text) => substring(name, text, false),
            NameFilter::Pattern(pattern) => pattern.matches(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("*.rs", "main.rs", true)]
    #[test_case("*.rs", "main.rc", false)]
    #[test_case("*", ".hidden", false)]
    #[test_case(".*", ".hidden", true)]
    #[test_case("?ain.rs", "main.rs", true)]
    #[test_case("[mn]ain.rs", "nain.rs", true)]
    fn test_pattern(expr: &str, name: &str, expected: bool) {
        assert_eq!(NamePattern::new(expr).unwrap().matches(name), expected);
    }

    #[test]
    fn test_incomplete_pattern() {
        assert!(NamePattern::new("[abc").is_none());
        assert!(NameFilter::new("x[").is_none());
    }

    #[test]
    fn test_filter_kind() {
        assert!(matches!(NameFilter::new("ain"), Some(NameFilter::Substring(_))));
        assert!(NameFilter::new("ain").unwrap().matches("main.rs"));
        assert!(!NameFilter::new("ain*").unwrap().matches("main.rs"));
    }

    #[test]
    fn test_substring() {
        assert!(substring("Full Name", "full", true));
        assert!(!substring("Full Name", "full", false));
        assert!(substring("anything", "", false));
    }
}
