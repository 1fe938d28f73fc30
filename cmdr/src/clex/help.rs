// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The built-in, hyperlinked help.
//!
//! The help text is a list of pages. A line `@P=name @@=heading` starts a page, every
//! other line belongs to the page above it and may end with `@@=name`, a link to
//! another page. Lines starting with `#` are comments.
//!
//! The book is checked when it is loaded: the `ToC` page must exist, every link must
//! lead somewhere and every page must be reachable.

use std::collections::VecDeque;

use miette::Diagnostic;

use super::{Mode, Panel, menus::HELP_EXTRA, ui_str};

pub const BUILT_IN_HELP: &str = include_str!("help.txt");
pub const TOC_PAGE: &str = "ToC";
pub const HELP_PAGES_LIMIT: usize = 60;
pub const HELP_LINE_MAX_WIDTH: usize = 60;
/// Back steps remembered.
pub const HELP_HISTORY_LIMIT: usize = 15;

const PAGE_START: &str = "@P=";
const LINK_MARK: &str = "@@=";

#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum HelpError {
    #[error("too many help pages, limit is {}", HELP_PAGES_LIMIT)]
    #[diagnostic(code(clex::help::too_many_pages))]
    TooManyPages,

    #[error("bogus text before the first page in line {line}")]
    #[diagnostic(code(clex::help::text_before_page))]
    TextBeforePage { line: usize },

    #[error("page @P={page} is empty")]
    #[diagnostic(code(clex::help::empty_page))]
    EmptyPage { page: String },

    #[error("page @P={page} was redefined")]
    #[diagnostic(code(clex::help::redefined))]
    Redefined { page: String },

    #[error("line in the @P={page} page is longer than {} chars", HELP_LINE_MAX_WIDTH)]
    #[diagnostic(code(clex::help::line_too_long))]
    LineTooLong { page: String },

    #[error("broken link: @@={link}")]
    #[diagnostic(code(clex::help::broken_link))]
    BrokenLink { link: String },

    #[error("table of contents @P=ToC is missing")]
    #[diagnostic(code(clex::help::no_toc))]
    MissingToc,

    #[error("abandoned page: @P={page}")]
    #[diagnostic(
        code(clex::help::abandoned),
        help("link to the page from another page")
    )]
    Abandoned { page: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpLine {
    pub text: String,
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpPage {
    pub name: String,
    pub heading: String,
    pub lines: Vec<HelpLine>,
}

#[derive(Debug, Clone)]
pub struct HelpBook {
    pages: Vec<HelpPage>,
    toc: usize,
}

/// Split `text @@=link` and drop the spaces in front of the mark.
fn split_link(line: &str) -> (&str, Option<&str>) {
    match line.find(LINK_MARK) {
        Some(at) => (line[..at].trim_end(), Some(&line[at + LINK_MARK.len()..])),
        None => (line.trim_end(), None),
    }
}

impl HelpBook {
    /// # Errors
    ///
    /// The first problem found in `text`.
    pub fn parse(text: &str) -> Result<Self, HelpError> {
        let mut pages: Vec<HelpPage> = Vec::new();

        for (number, raw) in text.lines().enumerate() {
            if raw.starts_with('#') {
                continue;
            }
            let line = raw.replace(['\t', '\r'], " ");
            let (body, link) = split_link(&line);

            if let Some(name) = body.strip_prefix(PAGE_START) {
                if pages.len() == HELP_PAGES_LIMIT {
                    return Err(HelpError::TooManyPages);
                }
                if let Some(last) = pages.last() {
                    if last.lines.is_empty() {
                        return Err(HelpError::EmptyPage {
                            page: last.name.clone(),
                        });
                    }
                }
                if pages.iter().any(|it| it.name == name) {
                    return Err(HelpError::Redefined {
                        page: name.to_string(),
                    });
                }
                pages.push(HelpPage {
                    name: name.to_string(),
                    heading: link.unwrap_or(name).to_string(),
                    lines: Vec::new(),
                });
                continue;
            }

            let Some(page) = pages.last_mut() else {
                if body.is_empty() {
                    continue;
                }
                return Err(HelpError::TextBeforePage { line: number + 1 });
            };
            if body.chars().count() > HELP_LINE_MAX_WIDTH {
                return Err(HelpError::LineTooLong {
                    page: page.name.clone(),
                });
            }
            page.lines.push(HelpLine {
                text: body.to_string(),
                link: link.map(str::to_string),
            });
        }

        // Trailing blank lines of a page come from the blank line before the next one.
        for page in &mut pages {
            while page.lines.last().is_some_and(|it| it.text.is_empty() && it.link.is_none()) {
                page.lines.pop();
            }
        }

        let toc = pages
            .iter()
            .position(|it| it.name == TOC_PAGE)
            .ok_or(HelpError::MissingToc)?;

        let mut referred = vec![false; pages.len()];
        referred[toc] = true;
        for link in pages.iter().flat_map(|it| &it.lines).filter_map(|it| it.link.as_deref()) {
            match pages.iter().position(|it| it.name == link) {
                Some(pg) => referred[pg] = true,
                None => {
                    return Err(HelpError::BrokenLink {
                        link: link.to_string(),
                    });
                }
            }
        }
        if let Some(pg) = referred.iter().position(|it| !it) {
            return Err(HelpError::Abandoned {
                page: pages[pg].name.clone(),
            });
        }

        tracing::debug!(message = "help parsed", pages = pages.len());
        Ok(Self { pages, toc })
    }

    /// # Errors
    ///
    /// Only if the embedded help text is broken.
    pub fn built_in() -> Result<Self, HelpError> { Self::parse(BUILT_IN_HELP) }

    #[must_use]
    pub fn page_number(&self, name: &str) -> Option<usize> {
        self.pages.iter().position(|it| it.name == name)
    }

    #[must_use]
    pub fn page(&self, number: usize) -> Option<&HelpPage> { self.pages.get(number) }

    #[must_use]
    pub fn toc(&self) -> usize { self.toc }

    #[must_use]
    pub fn len(&self) -> usize { self.pages.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.pages.is_empty() }
}

/// The page shown when help is called from `mode`.
#[must_use]
pub fn context_page(mode: Option<Mode>) -> &'static str {
    match mode {
        Some(Mode::BmList | Mode::BmManager | Mode::BmEdit) => "bookmarks",
        Some(Mode::Cfg | Mode::CfgEditNum | Mode::CfgEditTxt) => "config",
        Some(Mode::Compare) => "compare",
        Some(Mode::Compl) => "completion",
        Some(Mode::Dir | Mode::DirSplit) => "dir",
        Some(Mode::File) => "file",
        Some(Mode::Hist) => "history",
        Some(Mode::MainMenu) => "menu",
        Some(Mode::Paste) => "paste",
        Some(Mode::Select | Mode::Deselect) => "select",
        Some(Mode::Sort) => "sort",
        Some(Mode::User | Mode::Group) => "user",
        Some(Mode::Help) | None => TOC_PAGE,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Visited {
    page: usize,
    top: i32,
    curs: i32,
}

#[derive(Debug, Clone)]
pub struct HelpPanel {
    pub pd: Panel,
    pub book: HelpBook,
    page: usize,
    history: VecDeque<Visited>,
}

impl HelpPanel {
    #[must_use]
    pub fn new(book: HelpBook) -> Self {
        let page = book.toc();
        let mut pd = Panel::new().with_extra(&HELP_EXTRA);
        pd.norev = true;
        Self {
            pd,
            book,
            page,
            history: VecDeque::with_capacity(HELP_HISTORY_LIMIT),
        }
    }

    #[must_use]
    pub fn current_page(&self) -> Option<&HelpPage> { self.book.page(self.page) }

    #[must_use]
    pub fn heading(&self) -> &str { self.current_page().map_or("", |it| it.heading.as_str()) }

    #[must_use]
    pub fn line(&self, row: usize) -> Option<&HelpLine> {
        self.current_page().and_then(|it| it.lines.get(row))
    }

    /// Open the page that explains `previous`, forgetting the back history.
    pub fn prepare(&mut self, previous: Option<Mode>, panel_lines: i32) {
        self.history.clear();
        let page = self
            .book
            .page_number(context_page(previous))
            .unwrap_or(self.book.toc());
        self.set_page(page, panel_lines);
    }

    /// The table of contents has no extra line: it is reached from every page.
    fn set_page(&mut self, page: usize, panel_lines: i32) {
        self.page = page;
        self.pd.min = if page == self.book.toc() { 0 } else { -1 };
        self.pd.top = self.pd.min;
        self.pd.curs = self.pd.min;
        let lines = self.book.page(page).map_or(&[][..], |it| it.lines.as_slice());
        self.pd.set_count(lines.len());
        if let Some(row) = lines.iter().position(|it| !it.text.is_empty()) {
            self.pd.select(row);
            self.pd.adjust(panel_lines);
        }
    }

    /// Returns a remark when there is no such page.
    pub fn goto(&mut self, name: &str, panel_lines: i32) -> Option<String> {
        let Some(page) = self.book.page_number(name) else {
            return Some(ui_str::help_page_not_found(name));
        };
        if self.history.len() == HELP_HISTORY_LIMIT {
            self.history.pop_front();
        }
        self.history.push_back(Visited {
            page: self.page,
            top: self.pd.top,
            curs: self.pd.curs,
        });
        self.set_page(page, panel_lines);
        None
    }

    /// Follow the link of the line under the cursor.
    pub fn follow_link(&mut self, panel_lines: i32) -> Option<String> {
        let link = if self.pd.valid_cursor() {
            self.pd
                .selected()
                .and_then(|row| self.line(row))
                .and_then(|it| it.link.clone())
        } else {
            Some(TOC_PAGE.to_string())
        };
        link.and_then(|it| self.goto(&it, panel_lines))
    }

    pub fn contents(&mut self, panel_lines: i32) -> Option<String> {
        if self.page == self.book.toc() {
            return None;
        }
        self.goto(TOC_PAGE, panel_lines)
    }

    pub fn back(&mut self, panel_lines: i32) -> Option<&'static str> {
        let Some(visited) = self.history.pop_back() else {
            return Some(ui_str::NO_PREVIOUS_HELP_PAGE);
        };
        self.set_page(visited.page, panel_lines);
        self.pd.top = visited.top;
        self.pd.curs = visited.curs;
        self.pd.adjust(panel_lines);
        None
    }
}
