// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Screen layout and the terminal it is painted on.
//!
//! ```text
//! row 0                    heading
//! row 1                    frame
//! rows 2 ..                panel lines
//! row panel_lines + 2      frame with the filter and the position
//! row panel_lines + 3      info line or remark
//! row panel_lines + 4      bar
//! rows panel_lines + 5 ..  command line, CMD_LINES rows
//! ```
//!
//! The app describes the screen with a [`Screen`], [`compose`] turns it into a
//! [`Frame`] of styled rows and a [`Terminal`] paints the frame.

use std::{fmt::Debug,
          io::{Stdout, Write, stdout}};

use clex_tui::{CONTINUES_RIGHT_MARK, CommonError, CommonResult, LineView, clip_to_width,
               display_width, fit_to_width};
use crossterm::{cursor::{Hide, MoveTo, Show},
                event::{self, Event, KeyCode, KeyEventKind},
                queue,
                style::{Attribute, Print, SetAttribute},
                terminal::{self, Clear, ClearType, EnterAlternateScreen,
                           LeaveAlternateScreen}};

use super::ui_str;

/// Rows besides the panel lines and the command line.
pub const FIXED_ROWS: u16 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Style {
    #[default]
    Normal,
    Bold,
    Reverse,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub style: Style,
}

/// One screen row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Row {
    pub spans: Vec<Span>,
}

impl Row {
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        let mut it = Self::default();
        it.push(text, Style::Normal);
        it
    }

    pub fn push(&mut self, text: impl Into<String>, style: Style) {
        let text = text.into();
        if !text.is_empty() {
            self.spans.push(Span { text, style });
        }
    }

    pub fn append(&mut self, other: Row) { self.spans.extend(other.spans); }

    /// The row without styles.
    #[must_use]
    pub fn text(&self) -> String { self.spans.iter().map(|it| it.text.as_str()).collect() }

    #[must_use]
    pub fn width(&self) -> usize { self.spans.iter().map(|it| display_width(&it.text)).sum() }

    /// Cut the row to `cols` columns.
    fn clip(&mut self, cols: usize) {
        let mut left = cols;
        for span in &mut self.spans {
            let clipped = clip_to_width(&span.text, left).to_string();
            left -= display_width(&clipped);
            span.text = clipped;
        }
        self.spans.retain(|it| !it.text.is_empty());
    }
}

/// A complete screen, ready to be painted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Frame {
    pub rows: Vec<Row>,
    /// Column and row of the visible cursor, hidden when `None`.
    pub cursor: Option<(u16, u16)>,
}

/// The parts of the screen the app fills in.
#[derive(Debug, Clone, Default)]
pub struct Screen {
    pub heading: Row,
    /// Panel lines, already decorated by [`panel_row`].
    pub rows: Vec<Row>,
    /// Filter label and expression while a filter is shown.
    pub filter: Option<(&'static str, String)>,
    pub position: String,
    pub info: Row,
    pub remark: Option<String>,
    pub login_at_host: String,
    pub line: Option<EditArea>,
}

#[derive(Debug, Clone)]
pub struct EditArea {
    pub view: LineView,
    pub empty: bool,
    pub bold_prompt: bool,
}

/// The output side of the file manager.
pub trait Terminal: Debug {
    /// # Errors
    ///
    /// Terminal output failures.
    fn draw(&mut self, frame: &Frame) -> CommonResult<()>;

    /// Give the terminal back to the shell, eg: before running a command.
    ///
    /// # Errors
    ///
    /// Terminal output failures.
    fn suspend(&mut self) -> CommonResult<()>;

    /// Take the terminal over again after [`Terminal::suspend`].
    ///
    /// # Errors
    ///
    /// Terminal output failures.
    fn resume(&mut self) -> CommonResult<()>;

    /// Write text while suspended.
    ///
    /// # Errors
    ///
    /// Terminal output failures.
    fn print(&mut self, text: &str) -> CommonResult<()>;

    /// Wait for one typed character while suspended. `None` when input is closed.
    ///
    /// # Errors
    ///
    /// Terminal input failures.
    fn read_char(&mut self) -> CommonResult<Option<char>>;
}

// Text fitting.

/// Pad or truncate `text` to `width` columns. A truncated text ends with the `>`
/// continuation mark unless `mark` is false.
#[must_use]
pub fn trunc(text: &str, width: usize, mark: bool) -> String {
    if display_width(text) <= width {
        return fit_to_width(text, width);
    }
    if !mark || width == 0 {
        return fit_to_width(text, width);
    }
    let mut out = fit_to_width(text, width - 1);
    out.push(CONTINUES_RIGHT_MARK);
    out
}

/// Fit a long `text` into `width` columns by dropping its middle: `abc....xyz`.
#[must_use]
pub fn squeeze(text: &str, width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= width {
        return fit_to_width(text, width);
    }
    let dots = if width >= 6 { 4 } else { 1 };
    let Some(room) = width.checked_sub(dots) else {
        return ".".repeat(width);
    };
    let part2 = 5 * room / 8;
    let part1 = room - part2;
    let head: String = chars[..part1].iter().collect();
    let tail: String = chars[chars.len() - part2..].iter().collect();
    format!("{head}{}{tail}", ".".repeat(dots))
}

// Rows.

/// The file mode heading: the primary directory in bold, then the secondary one.
/// Their widths are kept in a 5:3 ratio when both don't fit.
#[must_use]
pub fn two_dirs(dir1: &str, dir2: &str, cols: usize) -> Row {
    let width = cols.saturating_sub(2);
    let (len1, len2) = (dir1.chars().count(), dir2.chars().count());
    let (w1, w2, sq1, sq2) = if len1 + len2 <= width {
        (width - len2, len2, false, false)
    } else if len1 <= 5 * width / 8 {
        (len1, width - len1, false, true)
    } else if len2 <= 3 * width / 8 {
        (width - len2, len2, true, false)
    } else {
        (5 * width / 8, width - 5 * width / 8, true, true)
    };
    let fit = |dir: &str, w: usize, sq: bool| if sq { squeeze(dir, w) } else { trunc(dir, w, true) };

    let mut row = Row::default();
    row.push(fit(dir1, w1, sq1), Style::Bold);
    row.push("  ", Style::Normal);
    row.push(fit(dir2, w2, sq2), Style::Normal);
    row
}

/// Heading of every other mode: a space and the mode's text.
#[must_use]
pub fn heading_row(prefix: &str, bold: &str, cols: usize) -> Row {
    let mut row = Row::plain(" ");
    row.push(prefix, Style::Normal);
    let left = cols.saturating_sub(1 + display_width(prefix));
    row.push(trunc(bold, left, true), if prefix.is_empty() { Style::Normal } else { Style::Bold });
    row
}

/// Frame line under the panel: the filter on the left, the position on the right.
#[must_use]
pub fn frame_row(
    frame: char,
    cols: usize,
    filter: Option<&(&'static str, String)>,
    position: &str,
) -> Row {
    let line = |n: usize| frame.to_string().repeat(n);
    let mut row = Row::plain(line(2.min(cols)));
    let mut used = row.width();
    if let Some((label, text)) = filter {
        row.push(*label, Style::Normal);
        row.push(text.as_str(), Style::Bold);
        row.push(" >", Style::Normal);
        used = row.width();
    }
    let position_width = display_width(position);
    let fill = cols.saturating_sub(used + position_width + 2);
    row.push(line(fill), Style::Normal);
    row.push(position, Style::Normal);
    row.push(line(cols.saturating_sub(row.width())), Style::Normal);
    row.clip(cols);
    row
}

/// Decorate the body of a panel line: `> ` and ` <` around the cursor line, which is
/// shown in reverse unless `norev`.
#[must_use]
pub fn panel_row(body: Row, pancols: usize, cursor: bool, norev: bool) -> Row {
    let mut body = body;
    body.clip(pancols);
    let pad = pancols.saturating_sub(body.width());
    if !cursor {
        let mut row = Row::plain("  ");
        row.append(body);
        row.push(" ".repeat(pad + 2), Style::Normal);
        return row;
    }
    let mut row = Row::plain(">");
    if norev {
        row.push(" ", Style::Normal);
        row.append(body);
        row.push(" ".repeat(pad + 1), Style::Normal);
    } else {
        let mut text = String::from(" ");
        text.push_str(&body.text());
        text.push_str(&" ".repeat(pad + 1));
        row.push(text, Style::Reverse);
    }
    row.push("<", Style::Normal);
    row
}

/// An extra line: `--> text`, or `==> text` in bold in the help panel.
#[must_use]
pub fn extra_row(text: &str, help: bool) -> Row {
    if help {
        let mut row = Row::default();
        row.push(format!("==> {text}"), Style::Bold);
        row
    } else {
        Row::plain(format!("--> {text}"))
    }
}

/// The remark replaces the info line: `-- text --` in bold.
#[must_use]
pub fn remark_row(remark: &str, cols: usize) -> Row {
    let mut row = Row::default();
    let text = clip_to_width(remark, cols.saturating_sub(6));
    row.push(format!("-- {text} --"), Style::Bold);
    row
}

#[must_use]
pub fn bar_row(login_at_host: &str, cols: usize) -> Row {
    let right = format!("{login_at_host} ");
    let left_width = cols.saturating_sub(display_width(&right));
    let mut text = trunc(ui_str::BAR_TEXT, left_width, false);
    text.push_str(&right);
    let mut row = Row::default();
    row.push(fit_to_width(&text, cols), Style::Reverse);
    row
}

/// The command line spread over `lines` rows. Returns the rows and the cursor
/// position relative to the first of them.
#[must_use]
pub fn edit_rows(area: &EditArea, cols: usize, lines: usize) -> (Vec<Row>, (usize, usize)) {
    let cols = cols.max(1);
    let mut cells: Vec<(char, Style)> = Vec::new();
    let lead_style = if area.bold_prompt && !area.empty {
        Style::Bold
    } else {
        Style::Normal
    };
    cells.extend(area.view.lead.chars().map(|ch| (ch, lead_style)));
    cells.extend(area.view.body.chars().map(|ch| (ch, Style::Normal)));
    if area.view.continues {
        cells.push((CONTINUES_RIGHT_MARK, Style::Bold));
    }

    let mut rows = Vec::with_capacity(lines);
    for chunk in cells.chunks(cols).take(lines) {
        let mut row = Row::default();
        for (ch, style) in chunk {
            match row.spans.last_mut() {
                Some(span) if span.style == *style => span.text.push(*ch),
                _ => row.push(ch.to_string(), *style),
            }
        }
        rows.push(row);
    }
    rows.resize(lines, Row::default());
    let col = area.view.cursor_col;
    (rows, (col % cols, (col / cols).min(lines.saturating_sub(1))))
}

/// Lay the screen out on `cols` columns.
#[must_use]
pub fn compose(screen: &Screen, cols: usize, frame: char, cmd_lines: usize) -> Frame {
    let mut rows = Vec::with_capacity(screen.rows.len() + usize::from(FIXED_ROWS) + cmd_lines);
    let mut heading = screen.heading.clone();
    heading.clip(cols);
    rows.push(heading);
    rows.push(Row::plain(frame.to_string().repeat(cols)));
    rows.extend(screen.rows.iter().cloned());
    rows.push(frame_row(frame, cols, screen.filter.as_ref(), &screen.position));
    rows.push(match &screen.remark {
        Some(remark) => remark_row(remark, cols),
        None => {
            let mut info = screen.info.clone();
            info.clip(cols);
            info
        }
    });
    rows.push(bar_row(&screen.login_at_host, cols));

    let base = rows.len();
    let mut cursor = None;
    match &screen.line {
        Some(area) => {
            let (edit, (col, row)) = edit_rows(area, cols, cmd_lines);
            rows.extend(edit);
            cursor = Some((to_u16(col), to_u16(base + row)));
        }
        None => rows.extend(std::iter::repeat_n(Row::default(), cmd_lines)),
    }

    // Never paint the bottom right corner, it would scroll the screen.
    if let Some(last) = rows.last_mut() {
        last.clip(cols.saturating_sub(1));
    }
    Frame { rows, cursor }
}

fn to_u16(value: usize) -> u16 { u16::try_from(value).unwrap_or(u16::MAX) }

// The real terminal.

/// Paints frames with crossterm. The terminal must be in raw mode with the
/// alternate screen active, see [`CrosstermTerminal::start`]. Dropping it while
/// active restores the terminal.
#[derive(Debug)]
pub struct CrosstermTerminal {
    out: Stdout,
    last: Option<Frame>,
    /// Raw mode is on.
    raw: bool,
}

fn io_error(error: &std::io::Error) -> miette::Report { CommonError::from_io(error, "terminal") }

impl CrosstermTerminal {
    /// Enter raw mode and the alternate screen.
    ///
    /// # Errors
    ///
    /// The terminal refused raw mode.
    pub fn start() -> CommonResult<Self> {
        let mut it = Self {
            out: stdout(),
            last: None,
            raw: false,
        };
        it.resume()?;
        Ok(it)
    }

    fn paint(&mut self, frame: &Frame) -> std::io::Result<()> {
        queue!(self.out, Hide)?;
        for (y, row) in frame.rows.iter().enumerate() {
            let unchanged = self
                .last
                .as_ref()
                .and_then(|it| it.rows.get(y))
                .is_some_and(|it| it == row);
            if unchanged {
                continue;
            }
            queue!(self.out, MoveTo(0, to_u16(y)))?;
            for span in &row.spans {
                match span.style {
                    Style::Normal => queue!(self.out, Print(&span.text))?,
                    Style::Bold => queue!(
                        self.out,
                        SetAttribute(Attribute::Bold),
                        Print(&span.text),
                        SetAttribute(Attribute::Reset)
                    )?,
                    Style::Reverse => queue!(
                        self.out,
                        SetAttribute(Attribute::Reverse),
                        Print(&span.text),
                        SetAttribute(Attribute::Reset)
                    )?,
                }
            }
            queue!(self.out, Clear(ClearType::UntilNewLine))?;
        }
        if let Some((col, row)) = frame.cursor {
            queue!(self.out, MoveTo(col, row), Show)?;
        }
        self.out.flush()
    }
}

impl Terminal for CrosstermTerminal {
    fn draw(&mut self, frame: &Frame) -> CommonResult<()> {
        self.paint(frame).map_err(|error| io_error(&error))?;
        self.last = Some(frame.clone());
        Ok(())
    }

    fn suspend(&mut self) -> CommonResult<()> {
        queue!(self.out, Show, LeaveAlternateScreen).map_err(|error| io_error(&error))?;
        self.out.flush().map_err(|error| io_error(&error))?;
        terminal::disable_raw_mode().map_err(|error| io_error(&error))?;
        self.raw = false;
        tracing::debug!(message = "terminal suspended");
        Ok(())
    }

    fn resume(&mut self) -> CommonResult<()> {
        terminal::enable_raw_mode().map_err(|error| io_error(&error))?;
        self.raw = true;
        queue!(
            self.out,
            EnterAlternateScreen,
            MoveTo(0, 0),
            Clear(ClearType::All),
            Hide
        )
        .map_err(|error| io_error(&error))?;
        self.out.flush().map_err(|error| io_error(&error))?;
        self.last = None;
        tracing::debug!(message = "terminal resumed");
        Ok(())
    }

    fn print(&mut self, text: &str) -> CommonResult<()> {
        self.out
            .write_all(text.as_bytes())
            .and_then(|()| self.out.flush())
            .map_err(|error| io_error(&error))
    }

    /// One keypress, read in raw mode so the user doesn't have to press enter.
    fn read_char(&mut self) -> CommonResult<Option<char>> {
        terminal::enable_raw_mode().map_err(|error| io_error(&error))?;
        let result = loop {
            match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char(ch) => break Ok(Some(ch)),
                    KeyCode::Enter => break Ok(Some('\r')),
                    KeyCode::Esc => break Ok(Some('\x1b')),
                    _ => {}
                },
                Ok(_) => {}
                Err(error) => break Err(io_error(&error)),
            }
        };
        terminal::disable_raw_mode().map_err(|error| io_error(&error))?;
        result
    }
}

impl Drop for CrosstermTerminal {
    fn drop(&mut self) {
        if self.raw {
            if let Err(error) = self.suspend() {
                tracing::warn!(message = "terminal not restored", %error);
            }
        }
    }
}
