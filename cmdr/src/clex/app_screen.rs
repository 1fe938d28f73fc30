// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Turning the file manager's state into a [`Frame`].

use clex_tui::{Session, SessionApp};

use super::{COMPARE_ROWS, CWD_INFO_MARK, ClexApp, ConfigVar, EditArea, Frame, LineId,
            MAIN_MENU_ROWS, Mode, PASTE_MENU_ROWS, Panel, Row, Screen, SortOrder, Style, View,
            compose, extra_row, heading_row, panel_row, two_dirs, ui_str};

/// The frame character for each value of the `FRAME` variable.
const FRAME_CHARS: [char; 3] = ['-', '=', '─'];

impl ClexApp {
    pub(crate) fn compose_frame(&mut self, session: &Session<Self>) -> Frame {
        let cols = session.geometry().screen_cols;
        let panel_lines = session.geometry().panel_lines;
        let view = session.active_view();
        let mode = session.current_mode().unwrap_or(Mode::File);
        let now = chrono::Local::now().timestamp();
        let pancols = cols.saturating_sub(4);

        let panel = self.panel(view);
        let mut rows = Vec::new();
        for row in panel.top..panel.top + panel_lines {
            let body = if row < 0 {
                extra_at(panel, row).map_or_else(Row::default, |it| extra_row(it.text(), view == View::Help))
            } else if row < panel.cnt {
                self.view_row(view, usize::try_from(row).unwrap_or_default(), pancols, now)
            } else {
                rows.push(Row::default());
                continue;
            };
            rows.push(panel_row(body, pancols, row == panel.curs, panel.norev));
        }

        let filter = panel.filter.as_ref().filter(|_| panel.is_filtering()).map(|it| {
            let label = if view == View::Files && self.panels[self.primary].filter_is_pattern {
                ui_str::FILTER_LABEL_PATTERN
            } else {
                ui_str::FILTER_LABEL_SUBSTRING
            };
            (label, it.text().to_string())
        });
        let position = if view == View::Files {
            self.panels[self.primary].position_label()
        } else if panel.cnt == 0 {
            ui_str::POSITION_NO_DATA.to_string()
        } else if panel.curs >= 0 {
            format!("< {}/{} >", panel.curs + 1, panel.cnt)
        } else {
            String::new()
        };

        let screen = Screen {
            heading: self.heading(mode, cols),
            rows,
            filter,
            position,
            info: self.info_row(view, cols, now),
            remark: session.status().current().map(str::to_string),
            login_at_host: self.account.login_at_host.clone(),
            line: session.active_line().map(|id| {
                let width = (cols * self.cmd_lines).saturating_sub(1);
                let line = self.line_mut(id);
                line.adjust_offset(width);
                EditArea {
                    view: line.view(width),
                    empty: line.is_empty(),
                    bold_prompt: id == LineId::Cmd,
                }
            }),
        };
        let frame = usize::try_from(self.config.num(ConfigVar::Frame))
            .ok()
            .and_then(|it| FRAME_CHARS.get(it))
            .copied()
            .unwrap_or('-');
        compose(&screen, cols, frame, self.cmd_lines)
    }

    fn heading(&self, mode: Mode, cols: usize) -> Row {
        match mode {
            Mode::File => two_dirs(
                &self.panels[self.primary].dir,
                &self.panels[1 - self.primary].dir,
                cols,
            ),
            Mode::Help => heading_row(ui_str::HEADING_HELP, self.help.heading(), cols),
            Mode::Compl => heading_row("", &self.completion.kind.heading(), cols),
            _ => heading_row("", mode.heading(), cols),
        }
    }

    /// The body of panel row `row` of `view`.
    fn view_row(&self, view: View, row: usize, pancols: usize, now: i64) -> Row {
        match view {
            View::Files => {
                let Some(entry) = self.panels[self.primary].at(row) else {
                    return Row::default();
                };
                let mut out = Row::default();
                let text = self.format.panel_line(entry, pancols, now, &self.users);
                out.push(text, if entry.select { Style::Bold } else { Style::Normal });
                out
            }
            View::Dir => self.dir_panel.rows.get(row).map_or_else(Row::default, |it| {
                let mut out = Row::default();
                let shared = it.name.get(..it.shlen).unwrap_or_default();
                out.push(" ".repeat(shared.chars().count()), Style::Normal);
                out.push(it.name.get(it.shlen..).unwrap_or_default(), Style::Normal);
                out
            }),
            View::DirSplit => self
                .dir_split
                .rows
                .get(row)
                .map_or_else(Row::default, |it| Row::plain(it.name.get(..it.shlen).unwrap_or_default())),
            View::BmList | View::BmManager => self
                .bookmarks
                .list
                .get(row)
                .map_or_else(Row::default, Row::plain),
            View::Cfg => ConfigVar::at(row).map_or_else(Row::default, |var| {
                let width = super::CFG_VAR_LEN;
                Row::plain(format!("{:<width$} = {}", var.name(), self.config.print_value(var)))
            }),
            View::Compare => COMPARE_ROWS.get(row).map_or_else(Row::default, |it| Row::plain(*it)),
            View::Compl => self
                .completion
                .candidates
                .get(row)
                .map_or_else(Row::default, |it| {
                    if self.completion.filenames {
                        let symbol = it.file_type.map_or("    ", |ft| ft.symbol());
                        let link = if it.is_link { "->" } else { "  " };
                        Row::plain(format!("{symbol} {link} {}", it.name))
                    } else {
                        Row::plain(it.name.clone())
                    }
                }),
            View::Group => self.group_panel.rows.get(row).map_or_else(Row::default, |it| {
                Row::plain(format!("{:>6}  {}", it.gid, it.group))
            }),
            View::User => self.user_panel.rows.get(row).map_or_else(Row::default, |it| {
                Row::plain(format!("{:>6}  {:<16} {}", it.uid, it.login, it.gecos))
            }),
            View::Help => self.help.line(row).map_or_else(Row::default, |it| {
                let mut out = Row::default();
                let style = if it.link.is_some() { Style::Bold } else { Style::Normal };
                out.push(it.text.clone(), style);
                out
            }),
            View::Hist => self
                .hist_panel
                .entry(&self.history, row)
                .map_or_else(Row::default, |it| Row::plain(it.cmd.clone())),
            View::MainMenu => MAIN_MENU_ROWS.get(row).map_or_else(Row::default, |it| Row::plain(*it)),
            View::Paste => PASTE_MENU_ROWS.get(row).map_or_else(Row::default, |it| Row::plain(*it)),
            View::Sort => SortOrder::at(row).map_or_else(Row::default, |order| {
                let mark = if order == self.order { "(*)" } else { "( )" };
                Row::plain(format!("{mark} {}", order.description()))
            }),
        }
    }

    /// The info line: details about the row under the cursor.
    fn info_row(&self, view: View, cols: usize, now: i64) -> Row {
        let panel = self.panel(view);
        if panel.curs < 0 {
            return match panel.extra_at_cursor().and_then(|it| it.info) {
                Some(CWD_INFO_MARK) => Row::plain(format!(
                    "{}{}",
                    ui_str::WORKING_DIRECTORY_INFO,
                    self.panels[self.primary].dir
                )),
                Some(info) => Row::plain(info),
                None => Row::default(),
            };
        }
        match view {
            View::Files => match self.panels[self.primary].current() {
                Some(entry) => Row::plain(self.format.info_line(entry, cols, now, &self.users)),
                None => Row::plain(ui_str::NO_STATUS_INFO),
            },
            View::Cfg => self
                .cfg_panel
                .selected()
                .and_then(ConfigVar::at)
                .map_or_else(Row::default, |var| Row::plain(var.def().help)),
            View::Compl => self
                .completion
                .current()
                .and_then(|it| it.aux.clone())
                .map_or_else(Row::default, Row::plain),
            View::Hist => match self.hist_panel.current(&self.history) {
                Some(entry) if entry.failed => Row::plain(ui_str::HIST_FAILED),
                _ => Row::default(),
            },
            View::Help => self
                .help
                .line(usize::try_from(panel.curs).unwrap_or_default())
                .and_then(|it| it.link.clone())
                .map_or_else(Row::default, |link| Row::plain(format!("link: {link}"))),
            _ => Row::default(),
        }
    }
}

fn extra_at(panel: &Panel, row: i32) -> Option<&super::Extra> {
    usize::try_from(row - panel.min)
        .ok()
        .and_then(|index| panel.extra.get(index))
}
