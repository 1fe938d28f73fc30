// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use strum_macros::{Display, EnumIter};

use super::{FilterFocus, FilterLine};
use crate::Transition;

/// Text of an extra line that doesn't set its own.
pub const DEFAULT_EXTRA_LINE_TEXT: &str = "Leave this panel";

/// A synthetic line shown above the real entries of a panel. Extra lines have negative
/// indexes; pressing `<enter>` on one applies its transition and then runs its action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtraLine<M: 'static, A: 'static> {
    pub text: Option<&'static str>,
    pub info: Option<&'static str>,
    pub transition: Option<Transition<M>>,
    pub action: Option<A>,
}

impl<M, A> ExtraLine<M, A> {
    /// The usual "leave this panel" line.
    #[must_use]
    pub const fn leave() -> Self {
        Self {
            text: None,
            info: None,
            transition: Some(Transition::Return),
            action: None,
        }
    }

    #[must_use]
    pub fn text(&self) -> &'static str { self.text.unwrap_or(DEFAULT_EXTRA_LINE_TEXT) }
}

/// Cursor movements bound to keys in every list panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum PanelMove {
    Up,
    Down,
    PageUp,
    PageDown,
    Home,
    End,
}

/// The generic part of every list panel: how many entries it has, which one is at the
/// top of the screen and which one has the cursor.
///
/// Rows run from `min` (negative when there are extra lines) to `cnt - 1`. The
/// cursor is on a real entry only when [`PanelDesc::valid_cursor`] holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelDesc<M: 'static, A: 'static> {
    pub cnt: i32,
    pub top: i32,
    pub curs: i32,
    pub min: i32,
    /// Draw the cursor bar without reverse video.
    pub norev: bool,
    pub extra: &'static [ExtraLine<M, A>],
    /// `None` for panels that can't be filtered.
    pub filter: Option<FilterLine>,
    pub filtering: FilterFocus,
    /// Leaving the filter with `<enter>` keeps a non empty expression applied.
    pub sticky_filter: bool,
}

fn to_i32(n: usize) -> i32 { i32::try_from(n).unwrap_or(i32::MAX) }

impl<M, A> PanelDesc<M, A> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            cnt: 0,
            top: 0,
            curs: 0,
            min: 0,
            norev: false,
            extra: &[],
            filter: None,
            filtering: FilterFocus::Off,
            sticky_filter: false,
        }
    }

    /// Prepend extra lines; the first real entry keeps index 0.
    #[must_use]
    pub fn with_extra(mut self, extra: &'static [ExtraLine<M, A>]) -> Self {
        self.extra = extra;
        self.min = -to_i32(extra.len());
        self.top = self.min;
        self.curs = self.min;
        self
    }

    #[must_use]
    pub fn with_filter(mut self) -> Self {
        self.filter = Some(FilterLine::default());
        self
    }

    #[must_use]
    pub fn with_sticky_filter(mut self) -> Self {
        self.filter = Some(FilterLine::default());
        self.sticky_filter = true;
        self
    }

    #[must_use]
    pub fn with_cursor(mut self, curs: i32) -> Self {
        self.curs = curs;
        self
    }

    pub fn set_count(&mut self, cnt: usize) { self.cnt = to_i32(cnt); }

    /// The cursor is on a real, existing entry.
    #[must_use]
    pub fn valid_cursor(&self) -> bool { self.cnt > 0 && self.curs >= 0 && self.curs < self.cnt }

    /// Index of the entry under the cursor.
    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        if self.valid_cursor() {
            usize::try_from(self.curs).ok()
        } else {
            None
        }
    }

    /// Put the cursor on entry `index`.
    pub fn select(&mut self, index: usize) { self.curs = to_i32(index); }

    /// The extra line under the cursor, if any.
    #[must_use]
    pub fn extra_at_cursor(&self) -> Option<&ExtraLine<M, A>> {
        if self.min < 0 && self.curs < 0 {
            usize::try_from(self.curs - self.min)
                .ok()
                .and_then(|index| self.extra.get(index))
        } else {
            None
        }
    }

    #[must_use]
    pub fn is_filtering(&self) -> bool { self.filtering != FilterFocus::Off }

    /// The filter expression while filtering, `None` otherwise.
    #[must_use]
    pub fn filter_text(&self) -> Option<&str> {
        match (self.filtering, &self.filter) {
            (FilterFocus::Off, _) | (_, None) => None,
            (_, Some(filter)) => Some(filter.text()),
        }
    }

    pub fn move_cursor(&mut self, movement: PanelMove, panlines: i32) {
        match movement {
            PanelMove::Up => {
                if self.curs > self.min {
                    self.curs -= 1;
                    self.top = self.top.min(self.curs);
                }
            }
            PanelMove::Down => {
                if self.curs < self.cnt - 1 {
                    self.curs += 1;
                    self.top = self.top.max(self.curs - panlines + 1);
                }
            }
            PanelMove::Home => {
                self.curs = self.min;
                self.top = self.min;
            }
            PanelMove::End => {
                self.curs = (self.cnt - 1).max(self.min);
                self.top = self.top.max(self.curs - panlines + 1);
            }
            PanelMove::PageUp => {
                if self.curs > self.min {
                    if self.curs > self.top {
                        self.curs = self.top;
                    } else {
                        self.curs = (self.curs - panlines).max(self.min);
                        self.top = self.curs;
                    }
                }
            }
            PanelMove::PageDown => {
                if self.curs < self.cnt - 1 {
                    if self.curs < self.top + panlines - 1 {
                        self.curs = self.top + panlines - 1;
                    } else {
                        self.curs += panlines;
                    }
                    self.curs = self.curs.min(self.cnt - 1);
                    self.top = self.top.max(self.curs - panlines + 1);
                }
            }
        }
    }

    /// Bring `top` and `curs` back in bounds after the entry count or the screen
    /// height changed: both within `[min, cnt - 1]`, the cursor visible, and no blank
    /// space at the bottom if that can be avoided.
    pub fn adjust(&mut self, panlines: i32) {
        self.top = self.top.min(self.cnt - 1).max(self.min);
        self.curs = self.curs.min(self.cnt - 1).max(self.min);

        if self.top > self.curs || self.top <= self.curs - panlines {
            self.top = self.curs - panlines / 3;
        }
        self.top = self.top.min(self.cnt - panlines).max(self.min);
    }
}

impl<M, A> Default for PanelDesc<M, A> {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use strum::IntoEnumIterator;
    use test_case::test_case;

    use super::*;

    type Desc = PanelDesc<u8, u8>;

    static TWO_EXTRA: [ExtraLine<u8, u8>; 2] = [
        ExtraLine::leave(),
        ExtraLine {
            text: Some("Manage"),
            info: None,
            transition: Some(Transition::Mode(7)),
            action: Some(1),
        },
    ];

    fn desc(cnt: i32) -> Desc {
        let mut it = Desc::new();
        it.cnt = cnt;
        it
    }

    #[test]
    fn test_valid_cursor() {
        let mut it = desc(0);
        assert!(!it.valid_cursor());
        it.cnt = 3;
        assert!(it.valid_cursor());
        it.curs = 3;
        assert!(!it.valid_cursor());
        let extra = Desc::new().with_extra(&TWO_EXTRA);
        assert_eq!((extra.min, extra.curs), (-2, -2));
        assert!(!extra.valid_cursor());
    }

    #[test]
    fn test_extra_at_cursor() {
        let mut it = desc(5).with_extra(&TWO_EXTRA);
        assert_eq!(it.extra_at_cursor().unwrap().text(), DEFAULT_EXTRA_LINE_TEXT);
        it.curs = -1;
        assert_eq!(it.extra_at_cursor().unwrap().text(), "Manage");
        it.curs = 0;
        assert!(it.extra_at_cursor().is_none());
    }

    #[test_case(PanelMove::Down, 10, 11 ; "down")]
    #[test_case(PanelMove::Up, 10, 9 ; "up")]
    #[test_case(PanelMove::Home, 10, 0 ; "home")]
    #[test_case(PanelMove::End, 10, 99 ; "end")]
    #[test_case(PanelMove::PageDown, 10, 29 ; "page down from inside the page goes to its bottom")]
    #[test_case(PanelMove::PageUp, 10, 0 ; "page up from inside the page goes to its top")]
    fn test_move_cursor(movement: PanelMove, from: i32, to: i32) {
        let mut it = desc(100);
        it.curs = from;
        it.move_cursor(movement, 30);
        assert_eq!(it.curs, to);
        assert!(it.top <= it.curs && it.curs < it.top + 30);
    }

    #[test]
    fn test_moves_stay_in_bounds() {
        for movement in PanelMove::iter() {
            for curs in -2..5 {
                let mut it = desc(5).with_extra(&TWO_EXTRA);
                it.curs = curs;
                it.adjust(3);
                it.move_cursor(movement, 3);
                assert!(it.curs >= it.min && it.curs <= it.cnt - 1, "{movement} {curs}");
            }
        }
    }

    #[test]
    fn test_adjust_after_shrinking() {
        let mut it = desc(100);
        it.curs = 95;
        it.top = 80;
        it.cnt = 10;
        it.adjust(20);
        assert_eq!((it.curs, it.top), (9, 0));
    }

    #[test]
    fn test_adjust_recenters_invisible_cursor() {
        let mut it = desc(100);
        it.curs = 50;
        it.top = 0;
        it.adjust(30);
        assert_eq!(it.top, 40);
    }
}
