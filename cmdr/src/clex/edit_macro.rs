// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Text inserted into the command line by function keys and paste actions.
//!
//! A macro is plain text with `$x` sequences:
//!
//! | sequence | inserted                                                   |
//! |----------|------------------------------------------------------------|
//! | `$$`     | a single `$`                                               |
//! | `$1`     | the primary directory, quoted                              |
//! | `$2`     | the secondary directory, quoted                            |
//! | `$F`     | the name under the cursor, quoted                          |
//! | `$S`     | the selected names, quoted and separated by spaces         |
//! | `$f`     | `$S` after `<esc>` when files are selected, `$F` otherwise |
//! | `$c`     | nothing, the cursor ends up here                           |
//! | `$/`     | nothing, the rest of the macro is ignored                  |
//!
//! Any other `$x` is inserted as is.

use clex_tui::{CommonResult, Key, LineBuffer, Quoting};

use super::ui_str;

/// Where the names a macro refers to come from.
#[derive(Debug, Clone, Copy)]
pub struct MacroContext<'a> {
    pub dir1: &'a str,
    pub dir2: &'a str,
    /// Name under the cursor, `None` in an empty panel.
    pub file: Option<&'a str>,
    pub selected: &'a [&'a str],
    /// Characters quoted in addition to the shell metacharacters.
    pub quote: &'a str,
    pub escape: bool,
    pub warn_select: bool,
}

/// Expand `template` into `line` at the cursor. Returns a remark for the user.
pub fn expand_macro(
    line: &mut LineBuffer,
    template: &str,
    ctx: &MacroContext<'_>,
) -> Option<&'static str> {
    let quoting = Quoting::Shell { extra: ctx.quote };
    let mut remark = None;
    let mut cursor = None;

    let after_space = line.cursor() == 0
        || line
            .cursor()
            .checked_sub(1)
            .and_then(|it| line.char_at(it))
            == Some(' ');
    let template = if after_space {
        template.trim_start_matches(' ')
    } else {
        template
    };

    let mut chars = template.chars();
    let mut literal = String::new();
    while let Some(ch) = chars.next() {
        if ch != '$' {
            literal.push(ch);
            continue;
        }
        let Some(mut code) = chars.next() else {
            literal.push('$');
            break;
        };
        line.insert_str(&literal, Quoting::Literal);
        literal.clear();

        if code == 'f' && ctx.file.is_some() {
            let selected = !ctx.selected.is_empty();
            code = if selected && ctx.escape { 'S' } else { 'F' };
            if code == 'F' && selected && ctx.warn_select {
                remark = Some(ui_str::PRESS_ESC_FOR_SELECTED);
            }
        }
        match code {
            '$' => line.insert_char('$'),
            '1' => line.insert_str(ctx.dir1, quoting),
            '2' => line.insert_str(ctx.dir2, quoting),
            'c' => cursor = Some(line.cursor()),
            'S' => {
                for (i, name) in ctx.selected.iter().enumerate() {
                    if i > 0 {
                        line.insert_char(' ');
                    }
                    line.insert_str(name, quoting);
                }
            }
            'F' | 'f' => {
                if let Some(name) = ctx.file {
                    line.insert_str(name, quoting);
                }
            }
            '/' => {
                if let Some(cursor) = cursor {
                    line.set_cursor(cursor);
                }
                return remark;
            }
            other => {
                line.insert_char('$');
                line.insert_char(other);
            }
        }
    }
    line.insert_str(&literal, Quoting::Literal);
    if let Some(cursor) = cursor {
        line.set_cursor(cursor);
    }
    remark
}

/// Result of ctrl-V.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Literal {
    Insert(char),
    Remark(&'static str),
    Nothing,
}

/// The character code a key sends when it is read raw. Function and cursor keys
/// have none.
#[must_use]
pub fn raw_code(key: Key) -> Option<u32> {
    match key {
        Key::Char(ch) => Some(u32::from(ch)),
        Key::Ctrl(ch) if ch.is_ascii_alphabetic() => {
            Some(u32::from(ch.to_ascii_lowercase()) - u32::from('a') + 1)
        }
        Key::Ctrl('@' | ' ') => Some(0),
        Key::Esc => Some(27),
        _ => None,
    }
}

fn digit(key: Key, radix: u32) -> Option<u32> {
    match key {
        Key::Char(ch) => ch.to_digit(radix),
        _ => None,
    }
}

/// ctrl-V: insert the next key literally, or a character given by its code as
/// `N N N` (decimal) or `x H H` (hex). `next` reads one raw key.
///
/// # Errors
///
/// Reading the keyboard failed.
pub fn read_literal(mut next: impl FnMut() -> CommonResult<Key>) -> CommonResult<Literal> {
    let first = next()?;

    if let Some(d1) = digit(first, 10) {
        let d2 = digit(next()?, 10);
        let d3 = digit(next()?, 10);
        let value = d2.zip(d3).map(|(d2, d3)| 100 * d1 + 10 * d2 + d3);
        return Ok(match value.and_then(code_to_char) {
            Some(ch) => Literal::Insert(ch),
            None => Literal::Remark(ui_str::CTRL_V_DECIMAL_USAGE),
        });
    }

    if matches!(first, Key::Char('x' | 'X')) {
        let h1 = digit(next()?, 16);
        let h2 = digit(next()?, 16);
        let value = h1.zip(h2).map(|(h1, h2)| 16 * h1 + h2);
        return Ok(match value.and_then(code_to_char) {
            Some(ch) => Literal::Insert(ch),
            None => Literal::Remark(ui_str::CTRL_V_HEX_USAGE),
        });
    }

    Ok(match raw_code(first) {
        Some(0) => Literal::Nothing,
        Some(code) => char::from_u32(code).map_or(Literal::Nothing, Literal::Insert),
        None => Literal::Remark(ui_str::CTRL_V_FUNCTION_KEY),
    })
}

/// Codes 1 to 255.
fn code_to_char(code: u32) -> Option<char> {
    u8::try_from(code)
        .ok()
        .filter(|it| *it > 0)
        .map(char::from)
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use pretty_assertions::assert_eq;
    use test_case::test_case;

    use super::*;

    fn ctx<'a>(selected: &'a [&'a str]) -> MacroContext<'a> {
        MacroContext {
            dir1: "/home/me",
            dir2: "/tmp/other dir",
            file: Some("a b.txt"),
            selected,
            quote: "",
            escape: false,
            warn_select: true,
        }
    }

    fn expand(before: &str, template: &str, ctx: &MacroContext<'_>) -> (String, usize, Option<&'static str>) {
        let mut line = LineBuffer::new("$ ");
        line.put_str(before);
        let remark = expand_macro(&mut line, template, ctx);
        (line.text().to_string(), line.cursor(), remark)
    }

    #[test_case("", "$f ", "a\\ b.txt " ; "f2 on an empty line")]
    #[test_case("vi", " $2", "vi /tmp/other\\ dir" ; "secondary dir")]
    #[test_case("ls", " $1/$F ", "ls /home/me/a\\ b.txt " ; "full path")]
    #[test_case("", "  echo $$HOME $x", "echo $HOME $x" ; "leading spaces and unknown codes")]
    #[test_case("", "one$/two", "one" ; "stop")]
    fn test_expand(before: &str, template: &str, expected: &str) {
        let (text, _, remark) = expand(before, template, &ctx(&[]));
        assert_eq!(text, expected);
        assert_eq!(remark, None);
    }

    #[test]
    fn test_leading_spaces_kept_after_a_word() {
        let (text, ..) = expand("ls", "  -l", &ctx(&[]));
        assert_eq!(text, "ls  -l");
    }

    #[test]
    fn test_cursor_mark() {
        let (text, cursor, _) = expand("", "tar cf $c.tar $F", &ctx(&[]));
        assert_eq!(text, "tar cf .tar a\\ b.txt");
        assert_eq!(cursor, 7);
    }

    #[test]
    fn test_selected_names() {
        let selected = ["x", "y z"];
        let (text, _, remark) = expand("", "rm $f", &ctx(&selected));
        assert_eq!(text, "rm a\\ b.txt");
        assert_eq!(remark, Some(ui_str::PRESS_ESC_FOR_SELECTED));

        let escaped = MacroContext {
            escape: true,
            ..ctx(&selected)
        };
        let (text, _, remark) = expand("", "rm $f", &escaped);
        assert_eq!(text, "rm x y\\ z");
        assert_eq!(remark, None);
    }

    #[test]
    fn test_empty_panel() {
        let empty = MacroContext {
            file: None,
            ..ctx(&[])
        };
        let (text, ..) = expand("", "cat $f!", &empty);
        assert_eq!(text, "cat !");
    }

    fn scripted(keys: &[Key]) -> impl FnMut() -> CommonResult<Key> {
        let mut keys: VecDeque<Key> = keys.iter().copied().collect();
        move || Ok(keys.pop_front().unwrap_or(Key::Esc))
    }

    #[test_case(&[Key::Char('0'), Key::Char('6'), Key::Char('4')], Literal::Insert('@') ; "decimal")]
    #[test_case(&[Key::Char('2'), Key::Char('5'), Key::Char('6')], Literal::Remark(ui_str::CTRL_V_DECIMAL_USAGE) ; "decimal out of range")]
    #[test_case(&[Key::Char('X'), Key::Char('4'), Key::Char('a')], Literal::Insert('J') ; "hex")]
    #[test_case(&[Key::Char('x'), Key::Char('g'), Key::Char('1')], Literal::Remark(ui_str::CTRL_V_HEX_USAGE) ; "bad hex")]
    #[test_case(&[Key::TAB], Literal::Insert('\t') ; "control char")]
    #[test_case(&[Key::F(5)], Literal::Remark(ui_str::CTRL_V_FUNCTION_KEY) ; "function key")]
    fn test_read_literal(keys: &[Key], expected: Literal) {
        assert_eq!(read_literal(scripted(keys)).unwrap(), expected);
    }
}
