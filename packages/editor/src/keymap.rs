//! # Keymap
//!
//! Maps key presses from the host to editor actions. `Mod` is Ctrl or Meta,
//! so the same bindings work on every platform.
//!
//! | Keys                      | Action                    |
//! |---------------------------|---------------------------|
//! | Tab / Shift+Tab           | indent / outdent (lists)  |
//! | Mod+B, Mod+I, Mod+U       | bold, italic, underline   |
//! | Mod+Shift+7 / Mod+Shift+8 | ordered / bullet list     |
//! | Mod+Alt+0..3              | paragraph / heading 1..3  |
//! | Mod+Shift+L / E / R       | align left, center, right |
//! | Shift+Enter, Mod+Enter    | hard break                |
//! | Mod+Z                     | undo                      |
//! | Mod+Shift+Z, Mod+Y        | redo                      |

use crate::Command;
use serde::{Deserialize, Serialize};
use templet_parser::{HeadingLevel, Mark, TextAlign};

/// Platform-agnostic key, converted from the DOM `KeyboardEvent.key` value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    /// A printable key, lowercased
    Character(char),
    Tab,
    Enter,
    Other(String),
}

impl Key {
    pub fn from_name(name: &str) -> Self {
        let mut chars = name.chars();
        match (name, chars.next(), chars.next()) {
            ("Tab", _, _) => Key::Tab,
            ("Enter", _, _) => Key::Enter,
            (_, Some(c), None) => Key::Character(c.to_ascii_lowercase()),
            _ => Key::Other(name.to_string()),
        }
    }

    /// Shifted digits arrive as their symbol on US layouts
    fn digit(&self) -> Option<char> {
        match self {
            Key::Character(c) if c.is_ascii_digit() => Some(*c),
            Key::Character('&') => Some('7'),
            Key::Character('*') => Some('8'),
            _ => None,
        }
    }
}

/// Modifier state of a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Modifiers {
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub alt: bool,
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        alt: false,
        shift: false,
        meta: false,
    };

    pub const SHIFT: Self = Self {
        ctrl: false,
        alt: false,
        shift: true,
        meta: false,
    };

    pub const CTRL: Self = Self {
        ctrl: true,
        alt: false,
        shift: false,
        meta: false,
    };

    pub const CTRL_SHIFT: Self = Self {
        ctrl: true,
        alt: false,
        shift: true,
        meta: false,
    };

    /// Ctrl or Meta, whichever the platform uses
    pub fn is_mod(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// What a bound key does
#[derive(Debug, Clone, PartialEq)]
pub enum KeyAction {
    Execute(Command),
    Undo,
    Redo,
}

/// Look up the binding for a key press. `in_list_item` says whether the
/// selection sits inside a list item; Tab is only bound there.
pub fn resolve(key: &Key, modifiers: Modifiers, in_list_item: bool) -> Option<KeyAction> {
    let Modifiers { alt, shift, .. } = modifiers;
    let command = match key {
        Key::Tab if in_list_item && !modifiers.is_mod() && !alt => {
            if shift {
                Command::Outdent
            } else {
                Command::Indent
            }
        }
        Key::Enter if shift || modifiers.is_mod() => Command::InsertHardBreak,
        Key::Character(_) if modifiers.is_mod() => return resolve_mod(key, alt, shift),
        _ => return None,
    };
    Some(KeyAction::Execute(command))
}

fn resolve_mod(key: &Key, alt: bool, shift: bool) -> Option<KeyAction> {
    let command = match (key, alt, shift) {
        (Key::Character('z'), false, false) => return Some(KeyAction::Undo),
        (Key::Character('z'), false, true) | (Key::Character('y'), false, false) => {
            return Some(KeyAction::Redo)
        }
        (Key::Character('b'), false, false) => Command::ToggleMark { mark: Mark::Bold },
        (Key::Character('i'), false, false) => Command::ToggleMark { mark: Mark::Italic },
        (Key::Character('u'), false, false) => Command::ToggleMark { mark: Mark::Underline },
        (Key::Character('l'), false, true) => Command::SetTextAlign {
            align: Some(TextAlign::Left),
        },
        (Key::Character('e'), false, true) => Command::SetTextAlign {
            align: Some(TextAlign::Center),
        },
        (Key::Character('r'), false, true) => Command::SetTextAlign {
            align: Some(TextAlign::Right),
        },
        (_, false, true) => match key.digit()? {
            '7' => Command::ToggleOrderedList,
            '8' => Command::ToggleBulletList,
            _ => return None,
        },
        (_, true, false) => match key.digit()? {
            '0' => Command::SetParagraph,
            digit => {
                let level = HeadingLevel::try_from(digit.to_digit(10)? as u8).ok()?;
                Command::SetHeading { level }
            }
        },
        _ => return None,
    };
    Some(KeyAction::Execute(command))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(name: &str, modifiers: Modifiers) -> Option<KeyAction> {
        resolve(&Key::from_name(name), modifiers, false)
    }

    #[test]
    fn test_key_names() {
        assert_eq!(Key::from_name("Tab"), Key::Tab);
        assert_eq!(Key::from_name("B"), Key::Character('b'));
        assert_eq!(Key::from_name("ArrowLeft"), Key::Other("ArrowLeft".to_string()));
    }

    #[test]
    fn test_tab_only_inside_list_item() {
        assert_eq!(
            resolve(&Key::Tab, Modifiers::NONE, true),
            Some(KeyAction::Execute(Command::Indent))
        );
        assert_eq!(
            resolve(&Key::Tab, Modifiers::SHIFT, true),
            Some(KeyAction::Execute(Command::Outdent))
        );
        assert_eq!(resolve(&Key::Tab, Modifiers::NONE, false), None);
    }

    #[test]
    fn test_mark_bindings_on_both_platforms() {
        let meta = Modifiers {
            meta: true,
            ..Modifiers::NONE
        };
        let bold = Some(KeyAction::Execute(Command::ToggleMark { mark: Mark::Bold }));
        assert_eq!(press("b", Modifiers::CTRL), bold);
        assert_eq!(press("b", meta), bold);
        assert_eq!(press("b", Modifiers::NONE), None);
    }

    #[test]
    fn test_history_bindings() {
        assert_eq!(press("z", Modifiers::CTRL), Some(KeyAction::Undo));
        assert_eq!(press("Z", Modifiers::CTRL_SHIFT), Some(KeyAction::Redo));
        assert_eq!(press("y", Modifiers::CTRL), Some(KeyAction::Redo));
    }

    #[test]
    fn test_list_and_heading_bindings() {
        assert_eq!(
            press("&", Modifiers::CTRL_SHIFT),
            Some(KeyAction::Execute(Command::ToggleOrderedList))
        );
        assert_eq!(
            press("8", Modifiers::CTRL_SHIFT),
            Some(KeyAction::Execute(Command::ToggleBulletList))
        );

        let ctrl_alt = Modifiers {
            alt: true,
            ..Modifiers::CTRL
        };
        assert_eq!(press("0", ctrl_alt), Some(KeyAction::Execute(Command::SetParagraph)));
        assert_eq!(
            press("2", ctrl_alt),
            Some(KeyAction::Execute(Command::SetHeading { level: HeadingLevel::H2 }))
        );
        assert_eq!(press("4", ctrl_alt), None);
    }

    #[test]
    fn test_hard_break() {
        assert_eq!(
            press("Enter", Modifiers::SHIFT),
            Some(KeyAction::Execute(Command::InsertHardBreak))
        );
        assert_eq!(press("Enter", Modifiers::NONE), None);
    }

    #[test]
    fn test_align_bindings() {
        assert_eq!(
            press("E", Modifiers::CTRL_SHIFT),
            Some(KeyAction::Execute(Command::SetTextAlign {
                align: Some(TextAlign::Center)
            }))
        );
    }
}
