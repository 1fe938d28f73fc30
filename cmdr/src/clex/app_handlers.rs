// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! What the actions of [`super::Action`] do to the file manager's state. The routing
//! lives in `app_main.rs`; the methods here are called from it.

use std::{fs, io, path::Path};

use clex_tui::{CommonResult, FilterFocus, LineEdit, Quoting, Session, SessionApp, Transition};
use rustix::{fs::Access, io::Errno};

use super::{Action, BookmarkAdded, ClexApp, ComplKind, ComplOutcome, ComplSources, CompareLevel,
            ConfigVar, ExecContext, ExecOutcome, Grouping, ListContext, ListFormat,
            Literal, LineId, MacroContext, Mode, SelectOp, ShellConfig, SortOrder, View,
            check_cd, compare_panels, expand_macro, history_capacity,
            key_tables::{MAIN_MENU, PASTE_MENU},
            noprompt_list, panel_size_limit, read_literal, select_matching, ui_str};

impl ClexApp {
    // Panels and directories.

    pub(crate) fn list_context(&self, dir: &str) -> ListContext {
        let hide_dotfiles = match self.config.num(ConfigVar::ShowHidden) {
            0 => false,
            1 => dir == self.account.homedir,
            _ => true,
        };
        ListContext {
            order: self.order,
            grouping: Grouping::from_config(self.config.num(ConfigVar::GroupFiles)),
            hide_dotfiles,
            normal: self.normal,
        }
    }

    /// Read the primary panel again. With `restore` the cursor goes where the
    /// directory list remembers it, otherwise it stays on the same name.
    pub(crate) fn load_panel(&mut self, session: &mut Session<Self>, restore: bool) {
        let panel_lines = session.geometry().panel_lines;
        let ctx = self.list_context(&self.panels[self.primary].dir);
        let panel = &mut self.panels[self.primary];
        let cursor_name = panel.current().map(|it| it.name.clone());
        if let Err(error) = panel.read(&ctx) {
            tracing::warn!(message = "cannot list directory", dir = %panel.dir, %error);
            session.remark(ui_str::CANNOT_LIST_DIRECTORY);
        }
        if restore {
            self.dirlist.restore(panel, panel_lines);
            return;
        }
        if let Some(row) = cursor_name.and_then(|name| panel.find(&name)) {
            panel.pd.select(row);
        }
        panel.pd.adjust(panel_lines);
    }

    pub(crate) fn reload_if_expired(&mut self, session: &mut Session<Self>) {
        let panel = &self.panels[self.primary];
        if panel.expired {
            let restore = panel.entries.is_empty();
            self.load_panel(session, restore);
        }
    }

    /// ctrl-R: read the directory again.
    pub(crate) fn reread(&mut self, session: &mut Session<Self>) {
        self.load_panel(session, false);
    }

    pub(crate) fn expire_panels(&mut self) {
        for panel in &mut self.panels {
            panel.expired = true;
        }
    }

    fn resort_panels(&mut self) {
        let grouping = Grouping::from_config(self.config.num(ConfigVar::GroupFiles));
        for panel in &mut self.panels {
            panel.resort(self.order, grouping);
        }
    }

    /// Change the primary panel's directory; `dir` may be relative to it. Returns
    /// false with a remark when the directory can't be entered.
    pub(crate) fn changedir(&mut self, session: &mut Session<Self>, dir: &str) -> bool {
        let panel_lines = session.geometry().panel_lines;
        let old_dir = self.panels[self.primary].dir.clone();
        let resolved = match resolve_dir(&Path::new(&old_dir).join(dir)) {
            Ok(it) => it,
            Err(reason) => {
                tracing::debug!(message = "change directory refused", dir, reason);
                session.remark(ui_str::cannot_change_dir(reason));
                return false;
            }
        };

        self.dirlist.save(&self.panels[self.primary]);
        if resolved != old_dir {
            tracing::debug!(message = "change directory", from = %old_dir, to = %resolved);
            let panel = &mut self.panels[self.primary];
            panel.dir = resolved;
            panel.entries.clear();
            panel.visible.clear();
            panel.pd.set_count(0);
            if panel.pd.is_filtering() {
                panel.filter_off();
            }
        }
        self.load_panel(session, true);

        if dir == ".." {
            let panel = &mut self.panels[self.primary];
            let base = Path::new(&old_dir)
                .file_name()
                .map(|it| it.to_string_lossy().into_owned());
            if let Some(row) = base.and_then(|name| panel.find(&name)) {
                panel.pd.select(row);
                panel.pd.adjust(panel_lines);
            }
        }
        true
    }

    /// ctrl-X: the secondary panel becomes the primary one.
    pub(crate) fn exchange(&mut self, session: &mut Session<Self>) {
        self.dirlist.save(&self.panels[self.primary]);
        self.primary = 1 - self.primary;
        let panel = &self.panels[self.primary];
        if !Path::new(&panel.dir).is_dir() {
            session.remark(ui_str::cannot_change_dir(ui_str::CD_NO_SUCH_DIRECTORY));
            let home = self.account.homedir.clone();
            self.changedir(session, &home);
        } else if panel.expired {
            let restore = panel.entries.is_empty();
            self.load_panel(session, restore);
        } else {
            self.dirlist.save(panel);
        }
    }

    pub(crate) fn refresh_users(&mut self, session: &mut Session<Self>) {
        self.users.refresh(chrono::Local::now().timestamp());
        for warning in self.users.take_warnings() {
            session.remark(warning);
        }
    }

    pub(crate) fn dir_panel_max(&self, session: &Session<Self>) -> usize {
        panel_size_limit(
            self.config.num(ConfigVar::DPanelSize),
            session.geometry().panel_lines,
            self.dir_panel.pd.min,
        )
    }

    // Filter and line editing.

    /// ctrl-F in `view`.
    pub(crate) fn filter_key(&mut self, session: &mut Session<Self>, view: View) {
        if self.panel(view).filter.is_none() {
            session.remark(ui_str::NO_FILTER_SUPPORT);
            return;
        }
        let focus = self.panel(view).filtering;
        match focus {
            FilterFocus::Off => {
                if view == View::Files {
                    self.panels[self.primary].filter_on();
                } else {
                    let panel = self.panel_mut(view);
                    panel.filtering = FilterFocus::Filter;
                    if let Some(filter) = panel.filter.as_mut() {
                        filter.clear();
                        filter.changed = false;
                    }
                }
            }
            _ if self.panel(view).filter.as_ref().is_some_and(|it| it.is_empty()) => {
                self.filter_off(session, view);
            }
            FilterFocus::Filter => self.panel_mut(view).filtering = FilterFocus::Line,
            FilterFocus::Line => self.panel_mut(view).filtering = FilterFocus::Filter,
        }
    }

    pub(crate) fn edit_line(&mut self, session: &Session<Self>, edit: LineEdit) {
        let cols = session.geometry().screen_cols;
        if let Some(line) = session.active_line() {
            edit.apply(self.line_mut(line), cols);
        }
    }

    /// ctrl-V: insert the next key (or a typed character code) literally.
    pub(crate) fn insert_literal(&mut self, session: &mut Session<Self>) -> CommonResult<()> {
        let Some(line) = session.active_line() else {
            return Ok(());
        };
        let literal = read_literal(|| session.read_raw_key(self))?;
        match literal {
            Literal::Insert(ch) => self.line_mut(line).insert_char(ch),
            Literal::Remark(remark) => session.remark(remark),
            Literal::Nothing => {}
        }
        Ok(())
    }

    /// Expand a `$` macro template into `line`.
    pub(crate) fn insert_macro(&mut self, session: &mut Session<Self>, line: LineId, template: &str) {
        let primary = &self.panels[self.primary];
        let selected = primary.selected_names();
        let ctx = MacroContext {
            dir1: &primary.dir,
            dir2: &self.panels[1 - self.primary].dir,
            file: primary.current().map(|it| it.name.as_str()),
            selected: &selected,
            quote: &self.quote,
            escape: session.escape_pending(),
            warn_select: self.config.flag(ConfigVar::WarnSelect),
        };
        let target = match line {
            LineId::Cmd => &mut self.cmd,
            LineId::Tmp => &mut self.tmp,
            LineId::Dir => &mut self.dir_line,
        };
        if let Some(remark) = expand_macro(target, template, &ctx) {
            session.remark(remark);
        }
    }

    pub(crate) fn full_path_template(&self) -> &'static str {
        if self.panels[self.primary].dir == "/" {
            " /$F "
        } else {
            " $1/$F "
        }
    }

    /// ctrl-A: the full path of the current file.
    pub(crate) fn full_path(&mut self, session: &mut Session<Self>) {
        let template = self.full_path_template();
        self.insert_macro(session, LineId::Cmd, template);
    }

    /// F2 inserts the current name; F3 to F12 expand their configured templates.
    pub(crate) fn function_key(&mut self, session: &mut Session<Self>, n: u8) {
        if n == 2 {
            self.insert_macro(session, LineId::Cmd, "$f ");
            return;
        }
        let Some(var) = ConfigVar::function_key(n) else {
            return;
        };
        let template = self.config.text(var).to_string();
        self.insert_macro(session, LineId::Cmd, &template);
    }

    /// ctrl-O: the target of the symbolic link under the cursor.
    pub(crate) fn paste_link(&mut self, session: &mut Session<Self>, action: Action) {
        let link = self.panels[self.primary]
            .current()
            .filter(|it| it.symlink)
            .map(|it| it.link.clone().unwrap_or_default());
        match link {
            Some(link) => {
                self.cmd.insert_str(&link, Quoting::Shell { extra: &self.quote });
                self.cmd.insert_char(' ');
            }
            None => session.remark(ui_str::NOT_A_SYMLINK),
        }
        if action == Action::InsertLink {
            leave_paste_menu(session);
        }
    }

    // File panel commands.

    /// `<tab>`: complete the word at the cursor or insert the current name.
    pub(crate) fn files_tab(&mut self, session: &mut Session<Self>) -> CommonResult<()> {
        match self.complete_line(session, LineId::Cmd, ComplKind::Auto)? {
            Some(true) => {
                let file_type = self.panels[self.primary].current().map(|it| it.file_type);
                match file_type {
                    Some(it) if it.is_exec() => self.insert_macro(session, LineId::Cmd, "./$F "),
                    Some(it) if it.is_dir() => self.insert_macro(session, LineId::Cmd, "$F/"),
                    _ => session.remark(ui_str::TYPE_FIRST_CHAR),
                }
            }
            Some(false) => self.insert_macro(session, LineId::Cmd, "$F "),
            None => {}
        }
        Ok(())
    }

    /// `<enter>`: run the command line, or act on the entry under the cursor.
    pub(crate) fn files_enter(&mut self, session: &mut Session<Self>) -> CommonResult<()> {
        if !self.cmd.is_empty() {
            let cmd = self.cmd.text().to_string();
            if self.execute(session, &cmd)? {
                self.cmd.kill();
                self.cmd_executed = true;
            }
            return Ok(());
        }
        let Some(entry) = self.panels[self.primary].current() else {
            return Ok(());
        };
        if entry.is_dir() {
            let name = entry.name.clone();
            self.changedir(session, &name);
        } else if entry.file_type.is_exec() {
            self.insert_macro(session, LineId::Cmd, "./$F ");
        }
        Ok(())
    }

    /// alt-`<enter>`: change into the directory under the cursor.
    pub(crate) fn files_cd(&mut self, session: &mut Session<Self>) {
        let name = self.panels[self.primary]
            .current()
            .filter(|it| it.is_dir())
            .map(|it| it.name.clone());
        match name {
            Some(name) => {
                self.changedir(session, &name);
            }
            None => session.remark(ui_str::NOT_A_DIRECTORY),
        }
    }

    /// Run `cmd` in the primary panel's directory. A plain `cd` is done here.
    /// Returns true when the command line should be cleared.
    fn execute(&mut self, session: &mut Session<Self>, cmd: &str) -> CommonResult<bool> {
        let tilde = |dir: &str| self.users.dir_tilde(dir, &self.account.homedir);
        if let Some(dir) = check_cd(cmd, &self.quote, &self.account.homedir, tilde) {
            if !self.changedir(session, &dir) {
                return Ok(false);
            }
            self.history.save(cmd, false);
            session.remark(ui_str::DIRECTORY_CHANGED);
            return Ok(true);
        }

        let long_width = (session.geometry().screen_cols * self.cmd_lines).saturating_sub(1);
        let ctx = ExecContext {
            cmd,
            dir: &self.panels[self.primary].dir,
            prompt_user: true,
            warn_rm: self.config.flag(ConfigVar::WarnRm),
            warn_long: self.config.flag(ConfigVar::WarnLong) && self.cmd.is_long(long_width),
        };
        let (outcome, remark) = self.executor.execute(self.term.as_mut(), &ctx)?;
        if let Some(remark) = remark {
            session.remark(remark);
        }
        match outcome {
            ExecOutcome::Declined => Ok(false),
            ExecOutcome::Finished { failed } => {
                self.history.save(cmd, failed);
                self.expire_panels();
                Ok(true)
            }
        }
    }

    pub(crate) fn select_all(&mut self, op: SelectOp) {
        self.panels[self.primary].select_with(op, |_| true);
    }

    /// `<enter>` in the select and deselect modes.
    pub(crate) fn select_files(&mut self, session: &mut Session<Self>) {
        let op = if session.current_mode() == Some(Mode::Deselect) {
            SelectOp::Deselect
        } else {
            SelectOp::Select
        };
        let expr = self.tmp.text().to_string();
        match select_matching(&mut self.panels[self.primary], &expr, op) {
            Some(changed) => {
                tracing::debug!(message = "select by pattern", expr, changed);
                session.set_transition(Transition::Return);
            }
            None => session.remark(ui_str::PATTERN_INCOMPLETE),
        }
    }

    pub(crate) fn sort_set(&mut self, session: &mut Session<Self>) {
        if let Some(order) = self.sort.selected().and_then(SortOrder::at) {
            if order != self.order {
                self.order = order;
                self.resort_panels();
                session.remark(ui_str::SORT_ORDER_CHANGED);
            }
        }
        session.set_transition(Transition::Return);
    }

    /// Compare the file panels at the level under the cursor.
    pub(crate) fn compare_panels(&mut self, session: &mut Session<Self>) {
        let level = u8::try_from(self.compare.curs).unwrap_or(0);
        let other = 1 - self.primary;
        if self.panels[other].expired {
            let ctx = self.list_context(&self.panels[other].dir);
            if let Err(error) = self.panels[other].read(&ctx) {
                tracing::warn!(message = "cannot list directory", dir = %self.panels[other].dir, %error);
                session.remark(ui_str::CANNOT_LIST_DIRECTORY);
            }
        }
        let [left, right] = &mut self.panels;
        let (first, second) = if self.primary == 0 {
            (left, right)
        } else {
            (right, left)
        };
        let report = compare_panels(first, second, CompareLevel(level));
        if first.selected_count() == 0 && second.selected_count() == 0 {
            session.remark(ui_str::COMPARE_NO_DIFFERENCE);
        }
        for warning in report.warnings() {
            session.remark(warning);
        }
        session.set_transition(Transition::Return);
    }

    // Menus.

    /// `<enter>` in the main menu runs the action of the row under the cursor.
    pub(crate) fn menu_pick(&mut self, session: &mut Session<Self>) -> CommonResult<()> {
        let action = self
            .main_menu
            .selected()
            .and_then(|row| MAIN_MENU.bindings.get(row))
            .map(|it| it.action);
        match action {
            Some(action) => self.invoke(session, action),
            None => Ok(()),
        }
    }

    pub(crate) fn paste_pick(&mut self, session: &mut Session<Self>) -> CommonResult<()> {
        let action = self
            .paste_menu
            .selected()
            .and_then(|row| PASTE_MENU.bindings.get(row))
            .map(|it| it.action);
        match action {
            Some(action) => self.invoke(session, action),
            None => Ok(()),
        }
    }

    /// A name insertion from the paste menu.
    pub(crate) fn paste_insert(&mut self, session: &mut Session<Self>, template: &str) {
        self.insert_macro(session, LineId::Cmd, template);
        leave_paste_menu(session);
    }

    // Completion.

    /// Complete the word at the cursor of `line`. Returns `Some(first)` when there is
    /// no word to complete.
    fn complete_line(
        &mut self,
        session: &mut Session<Self>,
        line: LineId,
        kind: ComplKind,
    ) -> CommonResult<Option<bool>> {
        let max = panel_size_limit(
            self.config.num(ConfigVar::CPanelSize),
            session.geometry().panel_lines,
            self.completion.pd.min,
        );
        let sources = ComplSources {
            users: &self.users,
            history: &self.history,
            home: &self.account.homedir,
            cwd: &self.panels[self.primary].dir,
            quote: (line == LineId::Cmd).then_some(self.quote.as_str()),
            max,
        };
        let target = match line {
            LineId::Cmd => &mut self.cmd,
            LineId::Tmp => &mut self.tmp,
            LineId::Dir => &mut self.dir_line,
        };
        match self.completion.complete(target, kind, &sources) {
            ComplOutcome::Nothing { first } => return Ok(Some(first)),
            ComplOutcome::Done(remark) | ComplOutcome::Partial(remark) => {
                if let Some(remark) = remark {
                    session.remark(remark);
                }
            }
            ComplOutcome::Choose(remark) => {
                if let Some(remark) = remark {
                    session.remark(remark);
                }
                session.run_mode(self, Mode::Compl)?;
            }
        }
        Ok(None)
    }

    /// A completion of a chosen kind, from the paste menu or alt-P.
    pub(crate) fn complete_from_menu(
        &mut self,
        session: &mut Session<Self>,
        kind: ComplKind,
    ) -> CommonResult<()> {
        if self.complete_line(session, LineId::Cmd, kind)?.is_some() {
            session.remark(ui_str::NOTHING_TO_COMPLETE);
        }
        leave_paste_menu(session);
        Ok(())
    }

    /// `<tab>` or `<enter>` in the completion panel.
    pub(crate) fn compl_pick(&mut self, session: &mut Session<Self>) {
        let (Some(row), Some(line)) = (self.completion.pd.selected(), session.active_line()) else {
            return;
        };
        let target = match line {
            LineId::Cmd => &mut self.cmd,
            LineId::Tmp => &mut self.tmp,
            LineId::Dir => &mut self.dir_line,
        };
        self.completion.insert_candidate(row, target);
        session.set_transition(Transition::Return);
    }

    // Directory panel.

    /// `<tab>` in the directory panels: complete the typed name, or start from the
    /// directory under the cursor.
    pub(crate) fn dir_tab(&mut self, session: &mut Session<Self>) -> CommonResult<()> {
        if !self.dir_line.is_empty() {
            if self.complete_line(session, LineId::Dir, ComplKind::Dir)?.is_some() {
                session.remark(ui_str::NOTHING_TO_COMPLETE);
            }
            return Ok(());
        }
        let dir = if session.active_view() == View::DirSplit {
            self.dir_split.selected_dir()
        } else {
            self.dir_panel.selected_dir()
        };
        if let Some(dir) = dir.map(str::to_string) {
            self.dir_line.insert_str(&dir, Quoting::Literal);
            if dir != "/" {
                self.dir_line.insert_char('/');
            }
        }
        Ok(())
    }

    /// `<enter>` in the directory panels.
    pub(crate) fn dir_enter(&mut self, session: &mut Session<Self>) {
        let split = session.active_view() == View::DirSplit;
        let norev = if split {
            self.dir_split.pd.norev
        } else {
            self.dir_panel.pd.norev
        };
        let dir = if norev {
            if self.dir_line.is_empty() {
                return;
            }
            self.users
                .dir_tilde(self.dir_line.text(), &self.account.homedir)
        } else if split {
            match self.dir_split.selected_dir() {
                Some(dir) => dir.to_string(),
                None => return,
            }
        } else {
            if self.dir_panel.selected_dir().is_some() {
                self.dir_line.kill();
                session.set_transition(Transition::Mode(Mode::DirSplit));
            }
            return;
        };

        if self.changedir(session, &dir) {
            session.set_transition(Transition::Return);
        } else {
            if dir.trim() != dir {
                session.remark(ui_str::CHECK_THE_SPACES);
            }
            session.cancel_transition();
        }
    }

    // Bookmarks.

    pub(crate) fn bm_list_enter(&mut self, session: &mut Session<Self>) {
        let Some(dir) = self
            .bm_list
            .selected()
            .and_then(|row| self.bookmarks.list.get(row))
            .cloned()
        else {
            return;
        };
        if self.changedir(session, &dir) {
            session.set_transition(Transition::Return);
        }
    }

    /// Bookmark the primary panel's directory.
    pub(crate) fn bm_list_bookmark(&mut self, session: &mut Session<Self>) {
        let dir = self.panels[self.primary].dir.clone();
        match self.bookmarks.add(&dir) {
            BookmarkAdded::Already(row) => {
                session.remark(ui_str::BM_ALREADY);
                self.bm_list.select(row);
            }
            BookmarkAdded::Full => session.remark(ui_str::BM_LIST_FULL),
            BookmarkAdded::Added(row) => {
                self.bm_list.set_count(self.bookmarks.list.len());
                self.bm_list.select(row);
                if let Err(error) = self.bookmarks.save() {
                    tracing::warn!(message = "bookmarks not saved", %error);
                    session.remark(error.to_string());
                }
            }
        }
        self.bm_list.adjust(session.geometry().panel_lines);
    }

    /// Leaving the manager saves the changes.
    pub(crate) fn bm_manager_save(&mut self, session: &mut Session<Self>) {
        match self.bookmarks.save_if_changed() {
            Ok(true) => session.remark(ui_str::BM_FILE_UPDATED),
            Ok(false) => {}
            Err(error) => {
                tracing::warn!(message = "bookmarks not saved", %error);
                session.remark(error.to_string());
            }
        }
        if session.pending_transition().is_none() {
            session.set_transition(Transition::Return);
        }
    }

    pub(crate) fn bm_manager_revert(&mut self, session: &mut Session<Self>) {
        match self.bookmarks.revert() {
            Ok(remark) => session.remark(remark),
            Err(error) => session.remark(error.to_string()),
        }
        self.bm_manager.set_count(self.bookmarks.list.len());
        self.bm_manager.adjust(session.geometry().panel_lines);
    }

    pub(crate) fn bm_manager_move(&mut self, session: &Session<Self>, action: Action) {
        let Some(row) = self.bm_manager.selected() else {
            return;
        };
        let row = if action == Action::BmMngUp {
            self.bookmarks.move_up(row)
        } else {
            self.bookmarks.move_down(row)
        };
        self.bm_manager.select(row);
        self.bm_manager.adjust(session.geometry().panel_lines);
    }

    /// Insert a new bookmark below the cursor and edit it.
    pub(crate) fn bm_manager_new(&mut self, session: &mut Session<Self>) -> CommonResult<()> {
        let Some(row) = self.bookmarks.insert_after(self.bm_manager.selected()) else {
            session.remark(ui_str::BM_LIST_FULL);
            return Ok(());
        };
        self.bm_manager.set_count(self.bookmarks.list.len());
        self.bm_manager.select(row);
        self.bm_manager.adjust(session.geometry().panel_lines);
        session.run_mode(self, Mode::BmEdit)?;
        Ok(())
    }

    pub(crate) fn bm_manager_delete(&mut self, session: &Session<Self>) {
        if let Some(row) = self.bm_manager.selected() {
            self.bookmarks.remove(row);
            self.bm_manager.set_count(self.bookmarks.list.len());
            self.bm_manager.adjust(session.geometry().panel_lines);
        }
    }

    pub(crate) fn bm_edit_complete(&mut self, session: &mut Session<Self>) -> CommonResult<()> {
        if self.complete_line(session, LineId::Tmp, ComplKind::Dir)?.is_some() {
            session.remark(ui_str::NOTHING_TO_COMPLETE);
        }
        Ok(())
    }

    pub(crate) fn bm_edit_enter(&mut self, session: &mut Session<Self>) {
        let Some(row) = self.bm_manager.selected() else {
            session.set_transition(Transition::Return);
            return;
        };
        let dir = self
            .users
            .dir_tilde(self.tmp.text(), &self.account.homedir);
        match self.bookmarks.replace(row, &dir) {
            Ok(()) => session.set_transition(Transition::Return),
            Err(remark) => session.remark(remark),
        }
    }

    // Configuration.

    /// `<enter>` on a variable: enumerated values cycle, the others are edited.
    pub(crate) fn cfg_enter(&mut self, session: &mut Session<Self>) -> CommonResult<()> {
        let Some(var) = self.cfg_panel.selected().and_then(ConfigVar::at) else {
            return Ok(());
        };
        if var.is_enumerated() {
            self.config.cycle(var);
            return Ok(());
        }
        self.cfg_edit = Some(var);
        let mode = if var.is_num() {
            Mode::CfgEditNum
        } else {
            Mode::CfgEditTxt
        };
        session.run_mode(self, mode)?;
        self.cfg_edit = None;
        Ok(())
    }

    pub(crate) fn cfg_edit_enter(&mut self, session: &mut Session<Self>, is_num: bool) {
        let Some(var) = self.cfg_edit else {
            session.set_transition(Transition::Return);
            return;
        };
        let input = self.tmp.text().to_string();
        let result = if is_num {
            self.config.edit_num(var, &input)
        } else {
            self.config.edit_text(var, &input)
        };
        match result {
            Ok(()) => session.set_transition(Transition::Return),
            Err(remark) => session.remark(remark),
        }
    }

    /// Accept the edited configuration, optionally writing it to disk.
    pub(crate) fn cfg_accept(&mut self, session: &mut Session<Self>, save: bool) {
        let changed = self.config.accept();
        tracing::info!(message = "configuration accepted", ?changed, save);
        self.apply_config(session, &changed);
        if save {
            self.save_config(session);
        }
    }

    fn save_config(&self, session: &mut Session<Self>) {
        let Some(path) = self.config_path.as_ref() else {
            return;
        };
        let written = self
            .config
            .to_json()
            .map_err(|error| error.to_string())
            .and_then(|json| fs::write(path, json).map_err(|error| error.to_string()));
        match written {
            Ok(()) => session.remark(ui_str::CFG_SAVED),
            Err(error) => {
                tracing::warn!(message = "configuration not saved", path = %path.display(), %error);
                session.remark(format!("CONFIG: {error}"));
            }
        }
    }

    /// Bring everything derived from the configuration up to date.
    fn apply_config(&mut self, session: &mut Session<Self>, changed: &[ConfigVar]) {
        let any = |vars: &[ConfigVar]| changed.iter().any(|it| vars.contains(it));

        if any(&[ConfigVar::ShellProg, ConfigVar::Prompt, ConfigVar::Quote]) {
            let (shell, warning) = ShellConfig::configure(
                self.config.text(ConfigVar::ShellProg),
                &self.account.shell,
            );
            if let Some(warning) = warning {
                session.remark(warning);
            }
            self.quote = shell.quote_chars(self.config.text(ConfigVar::Quote));
            self.cmd
                .set_prompt(shell.prompt(self.config.text(ConfigVar::Prompt), self.account.is_root));
            self.executor.shell = shell;
        }
        if any(&[ConfigVar::NopromptCmds]) {
            self.executor.noprompt = noprompt_list(self.config.text(ConfigVar::NopromptCmds));
        }
        if any(&[
            ConfigVar::Layout1,
            ConfigVar::Layout2,
            ConfigVar::Layout3,
            ConfigVar::ActiveLayout,
            ConfigVar::Kilobyte,
            ConfigVar::FmtNumber,
            ConfigVar::FmtTime,
            ConfigVar::FmtDate,
            ConfigVar::ShowLinkTarget,
        ]) {
            self.format = ListFormat::new(&self.config);
            for problem in &self.format.problems {
                session.remark(*problem);
            }
        }
        if any(&[ConfigVar::GroupFiles]) {
            self.resort_panels();
        }
        if any(&[ConfigVar::ShowHidden]) {
            self.expire_panels();
        }
        if any(&[ConfigVar::HPanelSize]) {
            self.history.reconfig(history_capacity(&self.config));
        }
    }
}

/// The paste menu closes after each of its functions.
fn leave_paste_menu(session: &mut Session<ClexApp>) {
    if session.current_mode() == Some(Mode::Paste) {
        session.set_transition(Transition::Return);
    }
}

/// The canonical name of a directory the user may enter, or why it can't be.
fn resolve_dir(path: &Path) -> Result<String, &'static str> {
    let canonical = fs::canonicalize(path).map_err(|error| errno_reason(&error))?;
    if !canonical.is_dir() {
        return Err(ui_str::CD_NOT_A_DIRECTORY);
    }
    rustix::fs::access(&canonical, Access::EXEC_OK)
        .map_err(|errno| errno_reason(&io::Error::from(errno)))?;
    Ok(canonical.to_string_lossy().into_owned())
}

fn errno_reason(error: &io::Error) -> &'static str {
    match Errno::from_io_error(error) {
        Some(Errno::ACCESS | Errno::PERM) => ui_str::CD_PERMISSION_DENIED,
        Some(Errno::NOTDIR) => ui_str::CD_NOT_A_DIRECTORY,
        Some(Errno::NOENT) => ui_str::CD_NO_SUCH_DIRECTORY,
        Some(Errno::LOOP) => ui_str::CD_LINK_LOOP,
        _ => ui_str::CD_FAILED,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_errno_reason() {
        let error = io::Error::from_raw_os_error(Errno::NOENT.raw_os_error());
        assert_eq!(errno_reason(&error), ui_str::CD_NO_SUCH_DIRECTORY);
        let error = io::Error::from_raw_os_error(Errno::ACCESS.raw_os_error());
        assert_eq!(errno_reason(&error), ui_str::CD_PERMISSION_DENIED);
        let error = io::Error::other("no errno");
        assert_eq!(errno_reason(&error), ui_str::CD_FAILED);
    }

    #[test]
    fn test_resolve_dir() {
        assert_eq!(resolve_dir(Path::new("/")), Ok("/".to_string()));
        assert_eq!(
            resolve_dir(Path::new("/no/such/dir/here")),
            Err(ui_str::CD_NO_SUCH_DIRECTORY)
        );
    }
}
