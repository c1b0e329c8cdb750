//! Reserved words of the checklist language
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Keyword {
    // === DOCUMENT METADATA ===
    Project,
    Author,

    // === ITEM DEFINITIONS ===
    Item,
    State,
    Marker,
    Command,
    If,

    // === CHECKLIST LAYOUT ===
    Checklist,
    Page,
    Check,
    Text,
}

impl Keyword {
    /// Exact spelling in source
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Author => "author",
            Self::Item => "item",
            Self::State => "state",
            Self::Marker => "marker",
            Self::Command => "command",
            Self::If => "if",
            Self::Checklist => "checklist",
            Self::Page => "page",
            Self::Check => "check",
            Self::Text => "text",
        }
    }

    /// Case-sensitive keyword lookup
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "project" => Some(Self::Project),
            "author" => Some(Self::Author),
            "item" => Some(Self::Item),
            "state" => Some(Self::State),
            "marker" => Some(Self::Marker),
            "command" => Some(Self::Command),
            "if" => Some(Self::If),
            "checklist" => Some(Self::Checklist),
            "page" => Some(Self::Page),
            "check" => Some(Self::Check),
            "text" => Some(Self::Text),
            _ => None,
        }
    }

    /// Keywords that open a braced block
    pub const fn is_block_start(self) -> bool {
        matches!(
            self,
            Self::Item | Self::State | Self::If | Self::Checklist | Self::Page
        )
    }
}

impl std::fmt::Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
