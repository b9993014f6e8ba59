//! Per-principal clipboards: an ordered log of pending copy/move requests.
//!
//! Entries are never deduplicated; marking the same item twice stacks two
//! entries. Validation happens at paste time.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::namespace::ItemId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClipboardAction {
    Copy,
    Move,
}

impl ClipboardAction {
    /// Accepts `copy`, `move` and `cut` (an alias for move), any case.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "copy" => Some(ClipboardAction::Copy),
            "move" | "cut" => Some(ClipboardAction::Move),
            _ => None,
        }
    }
}

impl fmt::Display for ClipboardAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ClipboardAction::Copy => "copy",
            ClipboardAction::Move => "move",
        })
    }
}

impl FromStr for ClipboardAction {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid clipboard action: '{s}'"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipboardEntry {
    pub action: ClipboardAction,
    pub target: ItemId,
}

/// Clipboard storage keyed by principal id.
#[derive(Debug, Default, Clone)]
pub struct ClipboardStore {
    annotations: HashMap<String, Vec<ClipboardEntry>>,
}

impl ClipboardStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The principal's clipboard, created empty on first access.
    pub fn for_principal(&mut self, principal: &str) -> PrincipalClipboard<'_> {
        let contents = self.annotations.entry(principal.to_string()).or_insert_with(|| {
            debug!(principal, "clipboard created");
            Vec::new()
        });
        PrincipalClipboard { contents }
    }

    /// Read a clipboard without creating it.
    pub fn peek(&self, principal: &str) -> &[ClipboardEntry] {
        self.annotations.get(principal).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn principals(&self) -> impl Iterator<Item = &str> {
        self.annotations.keys().map(String::as_str)
    }
}

/// Mutable view of one principal's clipboard.
#[derive(Debug)]
pub struct PrincipalClipboard<'a> {
    contents: &'a mut Vec<ClipboardEntry>,
}

impl PrincipalClipboard<'_> {
    pub fn clear_contents(&mut self) {
        self.contents.clear();
    }

    /// Append one entry per target, in iteration order.
    pub fn add_items<I>(&mut self, action: ClipboardAction, targets: I)
    where
        I: IntoIterator<Item = ItemId>,
    {
        let before = self.contents.len();
        self.contents
            .extend(targets.into_iter().map(|target| ClipboardEntry { action, target }));
        debug!(%action, added = self.contents.len() - before, "clipboard items added");
    }

    pub fn set_contents(&mut self, entries: Vec<ClipboardEntry>) {
        *self.contents = entries;
    }

    pub fn contents(&self) -> &[ClipboardEntry] {
        self.contents
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_cut_as_move() {
        assert_eq!(ClipboardAction::parse("Cut"), Some(ClipboardAction::Move));
        assert_eq!("copy".parse::<ClipboardAction>(), Ok(ClipboardAction::Copy));
        assert!("paste".parse::<ClipboardAction>().is_err());
    }

    #[test]
    fn principals_are_isolated() {
        let mut store = ClipboardStore::new();
        store
            .for_principal("alice")
            .add_items(ClipboardAction::Copy, [ItemId(3)]);
        assert!(store.peek("bob").is_empty());
        assert_eq!(store.peek("alice").len(), 1);
        assert_eq!(store.principals().count(), 1);
    }
}
