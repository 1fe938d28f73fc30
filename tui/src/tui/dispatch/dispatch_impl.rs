// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use smallvec::SmallVec;

use crate::{CommonResult, FilterFocus, Key, KeyTable, ModeDef, Session, SessionApp,
            resolve_binding};

pub const UNBOUND_KEY_REMARK: &str = "pressed key has no function (F1 - help, ctrl-C - cancel)";

/// What [`Session::dispatch`] did with a key. Post key hooks use it to tell typed text
/// from commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A bare `<esc>`; it only prefixes the next key.
    Escape,
    /// Handled before the tables were searched (filter focus, extra line).
    Consumed,
    /// The binding at `index` of table `table` ran.
    Matched { table: &'static str, index: usize },
    /// A binding was found but needs the cursor on a real entry, and it isn't.
    Skipped { table: &'static str },
    /// The char was typed into the active line or filter.
    InsertChar(char),
    Unbound,
}

impl DispatchOutcome {
    #[must_use]
    pub fn matched_table(&self) -> Option<&'static str> {
        match self {
            DispatchOutcome::Matched { table, .. } => Some(table),
            _ => None,
        }
    }
}

impl<A: SessionApp> Session<A> {
    /// Resolve one key against the tables of `def`, followed by the edit table (or
    /// the filter edit table while the filter has focus) and the common table.
    ///
    /// # Errors
    ///
    /// Whatever the invoked action returns.
    pub fn dispatch(
        &mut self,
        app: &mut A,
        def: &ModeDef<A::Mode, A::Action>,
        key: Key,
    ) -> CommonResult<DispatchOutcome> {
        if key == Key::Esc {
            return Ok(DispatchOutcome::Escape);
        }

        let view = self.active_view();
        let focus = app.panel(view).filtering;

        if focus == FilterFocus::Filter && (key == Key::ENTER || key == Key::CANCEL) {
            let panel = app.panel_mut(view);
            let keep_applied =
                panel.sticky_filter && panel.filter.as_ref().is_some_and(|it| !it.is_empty());
            if keep_applied {
                panel.filtering = FilterFocus::Line;
            } else {
                app.filter_off(self, view);
            }
            return Ok(DispatchOutcome::Consumed);
        }

        if key == Key::ENTER {
            if let Some(extra) = app.panel(view).extra_at_cursor().copied() {
                match extra.transition {
                    Some(transition) => self.set_transition(transition),
                    None => self.cancel_transition(),
                }
                if let Some(action) = extra.action {
                    app.invoke(self, action)?;
                }
                return Ok(DispatchOutcome::Consumed);
            }
        }

        let registry = self.registry();
        let edit = if focus == FilterFocus::Filter {
            Some(registry.filter_edit)
        } else if self.active_line().is_some() {
            Some(registry.edit)
        } else {
            None
        };
        let tables: SmallVec<[&'static KeyTable<A::Action>; 6]> = def
            .tables
            .iter()
            .copied()
            .chain(edit)
            .chain(Some(registry.common))
            .collect();

        let escape = self.escape_pending();
        if let Some((table_index, index)) = resolve_binding(key.fold_case(), escape, &tables) {
            let table = tables[table_index];
            let binding = table.bindings[index];

            if binding.needs_cursor && !app.panel(view).valid_cursor() {
                return Ok(DispatchOutcome::Skipped { table: table.name });
            }

            if table.menu && def.menu_panel {
                let panel_lines = self.geometry().panel_lines;
                let panel = app.panel_mut(view);
                if let Ok(row) = i32::try_from(index) {
                    if row != panel.curs && row < panel.cnt {
                        panel.curs = row;
                        panel.adjust(panel_lines);
                    }
                }
            }

            tracing::debug!(
                message = "dispatch",
                %key,
                escape,
                table = table.name,
                action = ?binding.action
            );
            app.invoke(self, binding.action)?;
            return Ok(DispatchOutcome::Matched {
                table: table.name,
                index,
            });
        }

        if !escape {
            if let Some(ch) = key.printable() {
                if focus == FilterFocus::Filter {
                    if let Some(filter) = app.panel_mut(view).filter.as_mut() {
                        filter.insert_char(ch);
                    }
                    return Ok(DispatchOutcome::InsertChar(ch));
                }
                if let Some(line) = self.active_line() {
                    app.line_mut(line).insert_char(ch);
                    return Ok(DispatchOutcome::InsertChar(ch));
                }
            }
        }

        tracing::debug!(message = "unbound key", %key, escape);
        self.remark(UNBOUND_KEY_REMARK);
        Ok(DispatchOutcome::Unbound)
    }
}
