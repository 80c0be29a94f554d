//! Ordered-list nesting level and the presentation derived from it.
//!
//! The level is a closed enumeration of three states. Numbering style and
//! indentation are computed from it on every render and never stored.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("List level must be 1, 2 or 3, got {0}")]
pub struct InvalidLevel(pub u8);

/// Persisted nesting depth of an ordered list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ListLevel {
    #[default]
    One,
    Two,
    Three,
}

/// CSS numbering style for an ordered list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NumberingStyle {
    Decimal,
    LowerAlpha,
    LowerRoman,
}

impl NumberingStyle {
    pub fn css_name(self) -> &'static str {
        match self {
            NumberingStyle::Decimal => "decimal",
            NumberingStyle::LowerAlpha => "lower-alpha",
            NumberingStyle::LowerRoman => "lower-roman",
        }
    }
}

/// Presentation hint emitted next to the persisted level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Presentation {
    pub numbering: NumberingStyle,
    /// Left margin as a CSS length
    pub margin_left: &'static str,
}

impl Presentation {
    /// Inline style attribute value for the list element
    pub fn style_attribute(&self) -> String {
        format!(
            "list-style-type: {} !important; margin-left: {} !important;",
            self.numbering.css_name(),
            self.margin_left
        )
    }
}

impl ListLevel {
    pub const MIN: ListLevel = ListLevel::One;
    pub const MAX: ListLevel = ListLevel::Three;

    pub fn new(value: u8) -> Result<Self, InvalidLevel> {
        match value {
            1 => Ok(ListLevel::One),
            2 => Ok(ListLevel::Two),
            3 => Ok(ListLevel::Three),
            other => Err(InvalidLevel(other)),
        }
    }

    /// Clamp an arbitrary imported value into range
    pub fn clamped(value: i64) -> Self {
        match value {
            i64::MIN..=1 => ListLevel::One,
            2 => ListLevel::Two,
            _ => ListLevel::Three,
        }
    }

    pub fn get(self) -> u8 {
        match self {
            ListLevel::One => 1,
            ListLevel::Two => 2,
            ListLevel::Three => 3,
        }
    }

    /// Next level down, `None` at the cap
    pub fn deeper(self) -> Option<Self> {
        match self {
            ListLevel::One => Some(ListLevel::Two),
            ListLevel::Two => Some(ListLevel::Three),
            ListLevel::Three => None,
        }
    }

    /// Next level up, `None` at the floor
    pub fn shallower(self) -> Option<Self> {
        match self {
            ListLevel::One => None,
            ListLevel::Two => Some(ListLevel::One),
            ListLevel::Three => Some(ListLevel::Two),
        }
    }

    pub fn presentation(self) -> Presentation {
        match self {
            ListLevel::One => Presentation {
                numbering: NumberingStyle::Decimal,
                margin_left: "0",
            },
            ListLevel::Two => Presentation {
                numbering: NumberingStyle::LowerAlpha,
                margin_left: "1.5em",
            },
            ListLevel::Three => Presentation {
                numbering: NumberingStyle::LowerRoman,
                margin_left: "3em",
            },
        }
    }
}

impl TryFrom<u8> for ListLevel {
    type Error = InvalidLevel;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        ListLevel::new(value)
    }
}

impl From<ListLevel> for u8 {
    fn from(level: ListLevel) -> Self {
        level.get()
    }
}

impl fmt::Display for ListLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}
