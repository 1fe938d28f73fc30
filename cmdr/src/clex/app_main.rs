// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The file manager: every panel and line it owns, the set up step of each mode and
//! the routing of actions to their handlers.

use std::path::PathBuf;

use clex_tui::{CommonResult, DispatchOutcome, FilterFocus, Geometry, LineBuffer, Session,
               SessionApp, Transition};

use super::{Account, Action, BM_LIST_EXTRA, BM_MANAGER_EXTRA, Bookmarks, CFG_EXTRA,
            CommandRunner, Completion, Config, ConfigVar, DirList, DirPanel, DirSplitPanel,
            Executor, FIXED_ROWS, FilePanel, GroupPanel, HelpBook, HelpPanel, HistPanel,
            History, LineId, ListFormat, Mode, NormalModes, Panel, ShellConfig, SortOrder,
            Terminal, UserData, UserPanel, VARS, View, compare_panel, main_menu_panel,
            noprompt_list, paste_menu_panel, sort_panel, ui_str};

/// What the app is started with; everything else is derived.
#[derive(Debug)]
pub struct AppInit {
    pub config: Config,
    /// Where "Accept+Save" writes the configuration; `None` disables saving.
    pub config_path: Option<PathBuf>,
    pub bookmarks: Bookmarks,
    pub users: UserData,
    /// Initial directory of the primary panel.
    pub cwd: String,
    /// Problems found while loading the configuration files.
    pub warnings: Vec<String>,
    pub term: Box<dyn Terminal>,
    pub runner: Box<dyn CommandRunner>,
}

#[derive(Debug)]
pub struct ClexApp {
    pub(crate) config: Config,
    pub(crate) config_path: Option<PathBuf>,
    pub(crate) format: ListFormat,
    pub(crate) users: UserData,
    pub(crate) account: Account,
    pub(crate) executor: Executor,
    pub(crate) term: Box<dyn Terminal>,
    /// Extra characters to quote when names are inserted into a line.
    pub(crate) quote: String,

    pub(crate) panels: [FilePanel; 2],
    pub(crate) primary: usize,
    pub(crate) order: SortOrder,
    pub(crate) normal: NormalModes,
    pub(crate) dirlist: DirList,
    pub(crate) dir_panel: DirPanel,
    pub(crate) dir_split: DirSplitPanel,

    pub(crate) bookmarks: Bookmarks,
    pub(crate) bm_list: Panel,
    pub(crate) bm_manager: Panel,

    pub(crate) cfg_panel: Panel,
    /// The variable being edited in one of the config edit modes.
    pub(crate) cfg_edit: Option<ConfigVar>,

    pub(crate) compare: Panel,
    pub(crate) completion: Completion,
    pub(crate) user_panel: UserPanel,
    pub(crate) group_panel: GroupPanel,
    pub(crate) help: HelpPanel,
    pub(crate) history: History,
    pub(crate) hist_panel: HistPanel,
    pub(crate) main_menu: Panel,
    pub(crate) paste_menu: Panel,
    pub(crate) sort: Panel,

    pub(crate) cmd: LineBuffer,
    pub(crate) tmp: LineBuffer,
    pub(crate) dir_line: LineBuffer,

    /// Rows of the edit area in the current screen layout.
    pub(crate) cmd_lines: usize,
    pub(crate) screen_cols: usize,
    /// Warnings found before the session started; shown once the file panel is up.
    pub(crate) pending_remarks: Vec<String>,
    /// A command ran during the last key; its edits can't be undone any more.
    pub(crate) cmd_executed: bool,
    /// The wildcard hint is given the first time the select line is shown.
    pub(crate) select_hint: bool,
}

impl ClexApp {
    /// # Errors
    ///
    /// The built in help text is corrupt.
    pub fn new(init: AppInit) -> CommonResult<Self> {
        let AppInit {
            config,
            config_path,
            bookmarks,
            mut users,
            cwd,
            warnings,
            term,
            runner,
        } = init;

        let mut pending_remarks = warnings;
        users.refresh(chrono::Local::now().timestamp());
        pending_remarks.extend(users.take_warnings().into_iter().map(str::to_string));
        let (account, warning) = Account::detect(&users);
        pending_remarks.extend(warning);

        let (shell, warning) =
            ShellConfig::configure(config.text(ConfigVar::ShellProg), &account.shell);
        pending_remarks.extend(warning);
        let quote = shell.quote_chars(config.text(ConfigVar::Quote));
        let prompt = shell.prompt(config.text(ConfigVar::Prompt), account.is_root);
        let noprompt = noprompt_list(config.text(ConfigVar::NopromptCmds));
        let executor = Executor::new(shell, noprompt, runner);

        let format = ListFormat::new(&config);
        pending_remarks.extend(format.problems.iter().map(|it| (*it).to_string()));

        let dir2 = match config.text(ConfigVar::Dir2) {
            "" => account.homedir.clone(),
            dir => users.dir_tilde(dir, &account.homedir),
        };

        let mut cfg_panel = Panel::new().with_extra(&CFG_EXTRA);
        cfg_panel.set_count(VARS.len());

        let help = HelpPanel::new(HelpBook::built_in()?);
        let history = History::new(history_capacity(&config));
        let cmd_lines = cmd_lines(&config);

        Ok(Self {
            format,
            users,
            account,
            executor,
            term,
            quote,
            panels: [FilePanel::new(cwd), FilePanel::new(dir2)],
            primary: 0,
            order: SortOrder::default(),
            normal: NormalModes::current(),
            dirlist: DirList::default(),
            dir_panel: DirPanel::default(),
            dir_split: DirSplitPanel::default(),
            bookmarks,
            bm_list: Panel::new().with_extra(&BM_LIST_EXTRA),
            bm_manager: Panel::new().with_extra(&BM_MANAGER_EXTRA),
            cfg_panel,
            cfg_edit: None,
            compare: compare_panel(),
            completion: Completion::default(),
            user_panel: UserPanel::default(),
            group_panel: GroupPanel::default(),
            help,
            history,
            hist_panel: HistPanel::default(),
            main_menu: main_menu_panel(),
            paste_menu: paste_menu_panel(),
            sort: sort_panel(SortOrder::ReversedName.index() + 1),
            cmd: LineBuffer::new(prompt),
            tmp: LineBuffer::new(""),
            dir_line: LineBuffer::new(ui_str::CHANGE_DIR_PROMPT),
            cmd_lines,
            screen_cols: 80,
            pending_remarks,
            cmd_executed: false,
            select_hint: true,
            config,
            config_path,
        })
    }

    /// The screen geometry for a terminal of `cols` x `rows`.
    #[must_use]
    pub fn geometry(&self, cols: u16, rows: u16) -> Geometry {
        let fixed = i32::from(FIXED_ROWS) + i32::try_from(self.cmd_lines).unwrap_or(2);
        Geometry {
            panel_lines: (i32::from(rows) - fixed).max(1),
            screen_cols: usize::from(cols.max(1)),
        }
    }

    #[must_use]
    pub fn primary_panel(&self) -> &FilePanel { &self.panels[self.primary] }

    #[must_use]
    pub fn command_line(&self) -> &LineBuffer { &self.cmd }

    #[must_use]
    pub fn history(&self) -> &History { &self.history }

    #[must_use]
    pub fn bookmarks(&self) -> &Bookmarks { &self.bookmarks }

    #[must_use]
    pub fn config(&self) -> &Config { &self.config }

    /// Give the terminal back to the shell for good.
    ///
    /// # Errors
    ///
    /// Terminal output failures.
    pub fn stop_terminal(&mut self) -> CommonResult<()> { self.term.suspend() }
}

pub(crate) fn history_capacity(config: &Config) -> usize {
    usize::try_from(config.num(ConfigVar::HPanelSize)).unwrap_or(1).max(1)
}

pub(crate) fn cmd_lines(config: &Config) -> usize {
    usize::try_from(config.num(ConfigVar::CmdLines)).unwrap_or(2).max(1)
}

impl SessionApp for ClexApp {
    type Mode = Mode;
    type Action = Action;
    type View = View;
    type Line = LineId;

    fn panel(&self, view: View) -> &Panel {
        match view {
            View::Files => &self.panels[self.primary].pd,
            View::Dir => &self.dir_panel.pd,
            View::DirSplit => &self.dir_split.pd,
            View::BmList => &self.bm_list,
            View::BmManager => &self.bm_manager,
            View::Cfg => &self.cfg_panel,
            View::Compare => &self.compare,
            View::Compl => &self.completion.pd,
            View::Group => &self.group_panel.pd,
            View::User => &self.user_panel.pd,
            View::Help => &self.help.pd,
            View::Hist => &self.hist_panel.pd,
            View::MainMenu => &self.main_menu,
            View::Paste => &self.paste_menu,
            View::Sort => &self.sort,
        }
    }

    fn panel_mut(&mut self, view: View) -> &mut Panel {
        match view {
            View::Files => &mut self.panels[self.primary].pd,
            View::Dir => &mut self.dir_panel.pd,
            View::DirSplit => &mut self.dir_split.pd,
            View::BmList => &mut self.bm_list,
            View::BmManager => &mut self.bm_manager,
            View::Cfg => &mut self.cfg_panel,
            View::Compare => &mut self.compare,
            View::Compl => &mut self.completion.pd,
            View::Group => &mut self.group_panel.pd,
            View::User => &mut self.user_panel.pd,
            View::Help => &mut self.help.pd,
            View::Hist => &mut self.hist_panel.pd,
            View::MainMenu => &mut self.main_menu,
            View::Paste => &mut self.paste_menu,
            View::Sort => &mut self.sort,
        }
    }

    fn line(&self, line: LineId) -> &LineBuffer {
        match line {
            LineId::Cmd => &self.cmd,
            LineId::Tmp => &self.tmp,
            LineId::Dir => &self.dir_line,
        }
    }

    fn line_mut(&mut self, line: LineId) -> &mut LineBuffer {
        match line {
            LineId::Cmd => &mut self.cmd,
            LineId::Tmp => &mut self.tmp,
            LineId::Dir => &mut self.dir_line,
        }
    }

    fn prepare(&mut self, session: &mut Session<Self>, mode: Mode) -> CommonResult<()> {
        let panel_lines = session.geometry().panel_lines;
        match mode {
            Mode::File => {
                self.reload_if_expired(session);
                for remark in std::mem::take(&mut self.pending_remarks) {
                    session.remark(remark);
                }
                session.set_view(View::Files);
                session.set_line(Some(LineId::Cmd));
            }
            Mode::Dir => {
                self.dirlist.save(&self.panels[self.primary]);
                self.dir_line.kill();
                let max = self.dir_panel_max(session);
                self.dir_panel.prepare(&self.dirlist, max);
                session.set_view(View::Dir);
                session.set_line(Some(LineId::Dir));
            }
            Mode::DirSplit => {
                let dir = self
                    .dir_panel
                    .selected_dir()
                    .unwrap_or(&self.panels[self.primary].dir)
                    .to_string();
                self.dir_split.prepare(&dir);
                session.set_view(View::DirSplit);
                session.set_line(Some(LineId::Dir));
            }
            Mode::BmList => {
                match self.bookmarks.reload_if_changed() {
                    Ok(true) => session.remark(ui_str::BM_RELOADED),
                    Ok(false) => {}
                    Err(error) => session.remark(error.to_string()),
                }
                self.bookmarks.list_prepare(&mut self.bm_list);
                session.set_view(View::BmList);
                session.set_line(None);
            }
            Mode::BmManager => {
                self.bookmarks.manager_prepare(&mut self.bm_manager);
                session.set_view(View::BmManager);
                session.set_line(None);
            }
            Mode::BmEdit => {
                let text = self
                    .bm_manager
                    .selected()
                    .and_then(|row| self.bookmarks.list.get(row))
                    .cloned()
                    .unwrap_or_default();
                self.tmp.set_prompt(ui_str::BM_EDIT_PROMPT);
                self.tmp.put_str(&text);
                session.set_view(View::BmManager);
                session.set_line(Some(LineId::Tmp));
            }
            Mode::Cfg => {
                self.config.begin_edit();
                self.cfg_panel.top = self.cfg_panel.min;
                self.cfg_panel.curs = self.cfg_panel.min;
                session.set_view(View::Cfg);
                session.set_line(None);
            }
            Mode::CfgEditNum | Mode::CfgEditTxt => {
                let Some(var) = self.cfg_edit else {
                    session.set_transition(Transition::Return);
                    return Ok(());
                };
                self.tmp.set_prompt(Config::edit_prompt(var));
                self.tmp.put_str(&self.config.print_value(var));
                session.set_view(View::Cfg);
                session.set_line(Some(LineId::Tmp));
            }
            Mode::Compare => {
                session.set_view(View::Compare);
                session.set_line(None);
            }
            Mode::Compl => session.set_view(View::Compl),
            Mode::Select | Mode::Deselect => {
                let panel = &mut self.panels[self.primary].pd;
                if panel.filtering == FilterFocus::Filter {
                    panel.filtering = FilterFocus::Line;
                }
                self.tmp.set_prompt(if mode == Mode::Select {
                    ui_str::SELECT_PROMPT
                } else {
                    ui_str::DESELECT_PROMPT
                });
                self.tmp.put_str("*");
                if self.select_hint {
                    self.select_hint = false;
                    session.remark(ui_str::WILDCARDS_HINT);
                }
                session.set_view(View::Files);
                session.set_line(Some(LineId::Tmp));
            }
            Mode::Group => {
                self.refresh_users(session);
                let panel = &mut self.group_panel;
                panel.pd.filtering = FilterFocus::Off;
                panel.rebuild(&self.users);
                panel.pd.top = panel.pd.min;
                panel.pd.curs = 0;
                session.set_view(View::Group);
                session.set_line(None);
            }
            Mode::User => {
                self.refresh_users(session);
                let panel = &mut self.user_panel;
                panel.pd.filtering = FilterFocus::Off;
                panel.rebuild(&self.users);
                panel.pd.top = panel.pd.min;
                panel.pd.curs = 0;
                session.set_view(View::User);
                session.set_line(None);
            }
            Mode::Help => {
                self.help.prepare(session.previous_mode(), panel_lines);
                session.set_view(View::Help);
                session.set_line(None);
            }
            Mode::Hist => {
                self.hist_panel.prepare(&self.history);
                session.set_view(View::Hist);
                session.set_line(Some(LineId::Cmd));
            }
            Mode::MainMenu => {
                session.set_view(View::MainMenu);
                session.set_line(None);
            }
            Mode::Paste => session.set_view(View::Paste),
            Mode::Sort => {
                self.sort.top = self.sort.min;
                self.sort.select(self.order.index());
                session.set_view(View::Sort);
                session.set_line(None);
            }
        }
        Ok(())
    }

    fn invoke(&mut self, session: &mut Session<Self>, action: Action) -> CommonResult<()> {
        let view = session.active_view();
        let panel_lines = session.geometry().panel_lines;
        match action {
            Action::Return => session.set_transition(Transition::Return),
            Action::Quit => session.set_transition(Transition::Quit),
            Action::Version => session.remark(ui_str::version_remark()),
            Action::Filter => self.filter_key(session, view),
            Action::MenuNotAvailable => session.remark(ui_str::MENU_ONLY_IN_FILE_PANEL),
            Action::Noop => {}
            Action::Enter(mode) => {
                session.run_mode(self, mode)?;
            }
            Action::Goto(mode) => session.set_transition(Transition::Mode(mode)),
            Action::Edit(edit) => self.edit_line(session, edit),
            Action::EditHint(edit, hint) => {
                self.edit_line(session, edit);
                session.remark(hint);
            }
            Action::InsertLiteral => self.insert_literal(session)?,
            Action::Undo => session.undo(self),
            Action::Redo => session.redo(self),
            Action::FilterEdit(edit) => {
                if let Some(filter) = self.panel_mut(view).filter.as_mut() {
                    filter.apply(edit);
                }
            }
            Action::Pan(movement) => self.panel_mut(view).move_cursor(movement, panel_lines),

            Action::FullPath => self.full_path(session),
            Action::PasteDir => {
                let template = if session.escape_pending() { " $1" } else { " $2" };
                self.insert_macro(session, LineId::Cmd, template);
            }
            Action::FilesTab => self.files_tab(session)?,
            Action::FilesEnter => self.files_enter(session)?,
            Action::FilesCd => self.files_cd(session),
            Action::HistNext => {
                if let Some(remark) = self.history.next(&mut self.cmd) {
                    session.remark(remark);
                }
            }
            Action::HistPrev => {
                if let Some(remark) = self.history.prev(&mut self.cmd) {
                    session.remark(remark);
                }
            }
            Action::PasteLink | Action::InsertLink => self.paste_link(session, action),
            Action::RereadUserGroup => {
                self.users.expire();
                self.refresh_users(session);
                self.reread(session);
            }
            Action::SelectToggle => self.panels[self.primary].toggle_at_cursor(panel_lines),
            Action::Exchange => self.exchange(session),
            Action::FnKey(n) => self.function_key(session, n),
            Action::CdRoot => {
                self.changedir(session, "/");
            }
            Action::CdParent => {
                self.changedir(session, "..");
            }
            Action::CdHome => {
                let home = self.account.homedir.clone();
                self.changedir(session, &home);
            }
            Action::Reread => self.reread(session),
            Action::FilterToggle => self.filter_key(session, View::Files),
            Action::SelectAll => self.select_all(super::SelectOp::Select),
            Action::SelectNone => self.select_all(super::SelectOp::Deselect),
            Action::SelectInvert => self.select_all(super::SelectOp::Toggle),
            Action::MenuPick => self.menu_pick(session)?,

            Action::Complete(kind) => self.complete_from_menu(session, kind)?,
            Action::InsertFilename => self.paste_insert(session, "$F "),
            Action::InsertFilenames => {
                if self.panels[self.primary].selected_count() == 0 {
                    session.remark(ui_str::NO_SELECTED_FILES);
                } else {
                    self.paste_insert(session, " $S ");
                }
            }
            Action::InsertFullPath => {
                let template = self.full_path_template();
                self.paste_insert(session, template);
            }
            Action::InsertDir1 => self.paste_insert(session, " $1"),
            Action::InsertDir2 => self.paste_insert(session, " $2"),
            Action::PastePick => self.paste_pick(session)?,

            Action::Compare => self.compare_panels(session),
            Action::ComplPick => self.compl_pick(session),
            Action::DirTab => self.dir_tab(session)?,
            Action::DirEnter => self.dir_enter(session),

            Action::BmListEnter => self.bm_list_enter(session),
            Action::BmListBookmark => self.bm_list_bookmark(session),
            Action::BmMngSave => self.bm_manager_save(session),
            Action::BmMngRevert => self.bm_manager_revert(session),
            Action::BmMngEdit => {
                session.run_mode(self, Mode::BmEdit)?;
            }
            Action::BmMngUp | Action::BmMngDown => self.bm_manager_move(session, action),
            Action::BmMngNew => self.bm_manager_new(session)?,
            Action::BmMngDel => self.bm_manager_delete(session),
            Action::BmEditCompl => self.bm_edit_complete(session)?,
            Action::BmEditEnter => self.bm_edit_enter(session),

            Action::CfgEnter => self.cfg_enter(session)?,
            Action::CfgStandard | Action::CfgOriginal => {
                if let Some(var) = self.cfg_panel.selected().and_then(ConfigVar::at) {
                    if action == Action::CfgStandard {
                        self.config.set_standard(var);
                    } else {
                        self.config.set_original(var);
                    }
                }
            }
            Action::CfgAccept { save } => self.cfg_accept(session, save),
            Action::CfgEditNumEnter | Action::CfgEditTextEnter => {
                self.cfg_edit_enter(session, action == Action::CfgEditNumEnter);
            }

            Action::HelpBack => {
                if let Some(remark) = self.help.back(panel_lines) {
                    session.remark(remark);
                }
            }
            Action::HelpLink => {
                if let Some(remark) = self.help.follow_link(panel_lines) {
                    session.remark(remark);
                }
            }
            Action::HelpContents => {
                if let Some(remark) = self.help.contents(panel_lines) {
                    session.remark(remark);
                }
            }

            Action::HistPaste => {
                self.hist_panel.paste(&self.history, &mut self.cmd);
                session.set_transition(Transition::Return);
            }
            Action::HistEnter => {
                if self.cmd.is_empty() {
                    self.hist_panel.paste(&self.history, &mut self.cmd);
                }
                session.set_transition(Transition::Return);
            }
            Action::HistDel => self.hist_panel.delete(&mut self.history, panel_lines),

            Action::SelectFiles => self.select_files(session),
            Action::SortSet => self.sort_set(session),
        }
        Ok(())
    }

    fn filter_update(&mut self, session: &mut Session<Self>, view: View) {
        match view {
            View::Files => {
                if let Some(remark) = self.panels[self.primary].filter_update() {
                    session.remark(remark);
                }
            }
            View::Dir => {
                let max = self.dir_panel_max(session);
                self.dir_panel.filter_update(&self.dirlist, max);
            }
            View::Hist => self.hist_panel.rebuild(&self.history),
            View::User => self.user_panel.rebuild(&self.users),
            View::Group => self.group_panel.rebuild(&self.users),
            _ => {}
        }
    }

    fn filter_off(&mut self, session: &mut Session<Self>, view: View) {
        if view == View::Files {
            self.panels[self.primary].filter_off();
            return;
        }
        let panel = self.panel_mut(view);
        panel.filtering = FilterFocus::Off;
        if let Some(filter) = panel.filter.as_mut() {
            filter.clear();
        }
        self.filter_update(session, view);
    }

    fn after_key(&mut self, session: &mut Session<Self>, mode: Mode, outcome: &DispatchOutcome) {
        match mode {
            Mode::File => {
                if self.cmd_executed {
                    self.cmd_executed = false;
                    self.cmd.history.reset();
                }
                self.reload_if_expired(session);
            }
            Mode::Compl => {
                let typed = matches!(outcome, DispatchOutcome::InsertChar(_))
                    || outcome.matched_table() == Some("edit");
                if typed {
                    session.set_transition(Transition::Return);
                }
            }
            Mode::Dir | Mode::DirSplit => {
                let norev = outcome.matched_table() != Some("panel") && !self.dir_line.is_empty();
                if mode == Mode::Dir {
                    self.dir_panel.pd.norev = norev;
                } else {
                    self.dir_split.pd.norev = norev;
                }
            }
            Mode::MainMenu => {
                if matches!(outcome.matched_table(), Some("mainmenu" | "mainmenu2")) {
                    session.set_transition(Transition::Return);
                }
            }
            _ => {}
        }
    }

    fn render(&mut self, session: &Session<Self>) -> CommonResult<()> {
        let frame = self.compose_frame(session);
        self.term.draw(&frame)
    }

    fn on_resize(&mut self, cols: u16, rows: u16) -> Geometry {
        self.cmd_lines = cmd_lines(&self.config);
        self.screen_cols = usize::from(cols.max(1));
        self.geometry(cols, rows)
    }

    fn shutdown(&mut self, session: &mut Session<Self>) {
        tracing::info!(message = "saving bookmarks on exit");
        if let Err(error) = self.bookmarks.save_if_changed() {
            tracing::warn!(message = "bookmarks not saved", %error);
            session.remark(error.to_string());
        }
    }
}
