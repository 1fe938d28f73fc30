// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::fmt::Debug;

use super::KeyTable;
use crate::{CommonResult, SessionError};

/// Everything the kernel knows about one operation mode: the key tables searched while
/// it is active, in order, and whether its panel is a menu whose rows mirror its keys.
#[derive(Debug)]
pub struct ModeDef<M: 'static, A: 'static> {
    pub mode: M,
    pub tables: &'static [&'static KeyTable<A>],
    pub menu_panel: bool,
}

/// The static set of modes plus the three shared tables. The edit table is consulted
/// after the mode tables whenever there is an active line, or swapped for
/// `filter_edit` while a filter has the keyboard. `common` is always searched last.
#[derive(Debug)]
pub struct ModeRegistry<M: 'static, A: 'static> {
    pub modes: &'static [ModeDef<M, A>],
    pub edit: &'static KeyTable<A>,
    pub filter_edit: &'static KeyTable<A>,
    pub common: &'static KeyTable<A>,
}

impl<M, A> ModeRegistry<M, A>
where
    M: Copy + PartialEq + Debug,
{
    /// # Errors
    ///
    /// [`SessionError::UnknownMode`] when `mode` has no definition.
    pub fn lookup(&self, mode: M) -> CommonResult<&'static ModeDef<M, A>> {
        let modes: &'static [ModeDef<M, A>] = self.modes;
        match modes.iter().find(|def| def.mode == mode) {
            Some(def) => Ok(def),
            None => Err(SessionError::UnknownMode {
                mode: format!("{mode:?}"),
            }
            .into()),
        }
    }

    /// Check the registry once at startup: every mode defined once, and keyless
    /// bindings only in menu tables (nothing else could ever trigger them).
    ///
    /// # Errors
    ///
    /// [`SessionError::DuplicateMode`] or [`SessionError::CorruptTable`].
    pub fn validate(&self) -> CommonResult<()> {
        for (index, def) in self.modes.iter().enumerate() {
            if self.modes[..index].iter().any(|other| other.mode == def.mode) {
                return Err(SessionError::DuplicateMode {
                    mode: format!("{:?}", def.mode),
                }
                .into());
            }
        }

        let shared = [self.edit, self.filter_edit, self.common];
        let tables = self
            .modes
            .iter()
            .flat_map(|def| def.tables.iter().copied())
            .chain(shared);
        for table in tables {
            if !table.menu && table.bindings.iter().any(|binding| binding.key.is_none()) {
                return Err(SessionError::CorruptTable {
                    table: table.name.to_string(),
                }
                .into());
            }
        }

        tracing::debug!(message = "mode registry validated", modes = self.modes.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{Key, KeyBinding};

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Mode {
        Main,
        Menu,
        Missing,
    }

    static EMPTY: KeyTable<u8> = KeyTable {
        name: "empty",
        bindings: &[],
        menu: false,
    };

    static MAIN: KeyTable<u8> = KeyTable {
        name: "main",
        bindings: &[KeyBinding::plain(Key::Char('q'), 1)],
        menu: false,
    };

    static MENU: KeyTable<u8> = KeyTable {
        name: "menu",
        bindings: &[KeyBinding::menu_item(2), KeyBinding::plain(Key::Char('x'), 3)],
        menu: true,
    };

    static BROKEN: KeyTable<u8> = KeyTable {
        name: "broken",
        bindings: &[KeyBinding::menu_item(2)],
        menu: false,
    };

    static GOOD: ModeRegistry<Mode, u8> = ModeRegistry {
        modes: &[
            ModeDef {
                mode: Mode::Main,
                tables: &[&MAIN],
                menu_panel: false,
            },
            ModeDef {
                mode: Mode::Menu,
                tables: &[&MENU],
                menu_panel: true,
            },
        ],
        edit: &EMPTY,
        filter_edit: &EMPTY,
        common: &EMPTY,
    };

    #[test]
    fn test_lookup() {
        let def = GOOD.lookup(Mode::Menu).unwrap();
        assert!(def.menu_panel);
        assert_eq!(def.tables[0].name, "menu");

        let err = GOOD.lookup(Mode::Missing).unwrap_err();
        assert_eq!(err.to_string(), "requested operation mode Missing is invalid");
    }

    #[test]
    fn test_validate_accepts_good_registry() {
        assert!(GOOD.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_duplicates() {
        static DUP: ModeRegistry<Mode, u8> = ModeRegistry {
            modes: &[
                ModeDef {
                    mode: Mode::Main,
                    tables: &[],
                    menu_panel: false,
                },
                ModeDef {
                    mode: Mode::Main,
                    tables: &[],
                    menu_panel: false,
                },
            ],
            edit: &EMPTY,
            filter_edit: &EMPTY,
            common: &EMPTY,
        };
        let err = DUP.validate().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SessionError>(),
            Some(SessionError::DuplicateMode { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_keyless_binding_outside_menu() {
        static BAD: ModeRegistry<Mode, u8> = ModeRegistry {
            modes: &[ModeDef {
                mode: Mode::Main,
                tables: &[&BROKEN],
                menu_panel: false,
            }],
            edit: &EMPTY,
            filter_edit: &EMPTY,
            common: &EMPTY,
        };
        let err = BAD.validate().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SessionError>(),
            Some(SessionError::CorruptTable { table }) if table == "broken"
        ));
    }
}
