// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use unicode_width::UnicodeWidthChar;

/// Display width of `text` in terminal columns.
#[must_use]
pub fn display_width(text: &str) -> usize {
    text.chars()
        .map(|ch| UnicodeWidthChar::width(ch).unwrap_or(0))
        .sum()
}

/// Truncate `text` so that it occupies at most `cols` columns. Wide characters that
/// would straddle the edge are dropped.
#[must_use]
pub fn clip_to_width(text: &str, cols: usize) -> &str {
    let mut used = 0;
    for (byte_index, ch) in text.char_indices() {
        let width = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + width > cols {
            return &text[..byte_index];
        }
        used += width;
    }
    text
}

/// Truncate or right pad `text` to exactly `cols` columns.
#[must_use]
pub fn fit_to_width(text: &str, cols: usize) -> String {
    let clipped = clip_to_width(text, cols);
    let pad = cols.saturating_sub(display_width(clipped));
    let mut acc = String::with_capacity(clipped.len() + pad);
    acc.push_str(clipped);
    acc.extend(std::iter::repeat_n(' ', pad));
    acc
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    use super::*;

    #[test_case("abc", 5, "abc  " ; "pads short text")]
    #[test_case("abcdef", 3, "abc" ; "clips long text")]
    #[test_case("日本語", 5, "日本 " ; "wide char straddling the edge is dropped")]
    #[test_case("", 2, "  " ; "empty")]
    fn test_fit_to_width(input: &str, cols: usize, expected: &str) {
        assert_eq!(fit_to_width(input, cols), expected);
    }

    #[test]
    fn test_display_width() {
        assert_eq!(display_width("ab日"), 4);
    }
}
