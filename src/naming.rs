//! Name choosers: pick a name that is free in a target container.
//!
//! Policy:
//! - Numbered: keep the requested name if free, otherwise insert "-n" before
//!   the extension ("file1" -> "file1-2", "a.txt" -> "a-2.txt").
//! - Underscore: append "_" until the name is free ("splat" -> "splat_").
//!
//! Notes:
//! - Choosers only read the current container state. Callers serialize
//!   mutations on a container themselves.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use tracing::trace;

use crate::errors::{NamespaceError, NsResult};
use crate::namespace::{ItemId, Tree};

/// Resolves a proposed name to one not currently used in `container`.
pub trait NameChooser {
    fn choose_name(&self, tree: &Tree, container: ItemId, proposed: &str, item: ItemId) -> NsResult<String>;
}

/// Built-in chooser policies selectable from config and CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NamePolicy {
    #[default]
    Numbered,
    Underscore,
}

impl NamePolicy {
    /// Case-insensitive parse of the policy names accepted in config files.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "numbered" | "number" | "dash" => Some(NamePolicy::Numbered),
            "underscore" | "_" => Some(NamePolicy::Underscore),
            _ => None,
        }
    }

    pub fn chooser(self) -> Box<dyn NameChooser> {
        match self {
            NamePolicy::Numbered => Box::new(NumberedChooser),
            NamePolicy::Underscore => Box::new(UnderscoreChooser),
        }
    }
}

impl fmt::Display for NamePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NamePolicy::Numbered => "numbered",
            NamePolicy::Underscore => "underscore",
        })
    }
}

impl FromStr for NamePolicy {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid name policy: '{s}'"))
    }
}

/// Reject names a container cannot hold.
pub fn check_name(tree: &Tree, container: ItemId, name: &str) -> NsResult<()> {
    let invalid = |reason: &str| NamespaceError::InvalidName {
        name: name.to_string(),
        reason: reason.to_string(),
    };
    if name.is_empty() {
        return Err(invalid("empty names are not allowed"));
    }
    if name.starts_with('+') || name.starts_with('@') {
        return Err(invalid("names cannot begin with '+' or '@'"));
    }
    if name.contains('/') {
        return Err(invalid("names cannot contain '/'"));
    }
    if tree.contains(container, name)? {
        return Err(invalid("the given name is already being used"));
    }
    Ok(())
}

const MAX_TRIES: u64 = 10_000;

/// "name", "name-2", "name-3", ... with the extension kept last.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberedChooser;

impl NameChooser for NumberedChooser {
    fn choose_name(&self, tree: &Tree, container: ItemId, proposed: &str, item: ItemId) -> NsResult<String> {
        let mut cleaned = proposed.replace('/', "-");
        cleaned = cleaned.trim_start_matches(['+', '@']).to_string();
        if cleaned.is_empty() {
            cleaned = if tree.is_container(item) { "container" } else { "item" }.to_string();
        }

        let (stem, ext) = split_extension(&cleaned);
        let mut candidate = cleaned.clone();
        let mut n: u64 = 1;
        while tree.contains(container, &candidate)? {
            n += 1;
            if n > MAX_TRIES {
                return Err(NamespaceError::InvalidName {
                    name: cleaned.clone(),
                    reason: format!("no free name after {MAX_TRIES} attempts"),
                });
            }
            if n == 4 {
                trace!(name = %cleaned, %container, "numbered chooser: multiple collisions");
            }
            candidate = format!("{stem}-{n}{ext}");
        }
        check_name(tree, container, &candidate)?;
        Ok(candidate)
    }
}

/// Split at the last '.', keeping the dot with the extension.
/// A leading dot ('.env') is part of the stem.
fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(dot) if dot > 0 => name.split_at(dot),
        _ => (name, ""),
    }
}

/// Append '_' until the name is free.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnderscoreChooser;

impl NameChooser for UnderscoreChooser {
    fn choose_name(&self, tree: &Tree, container: ItemId, proposed: &str, _item: ItemId) -> NsResult<String> {
        let mut name = proposed.to_string();
        while tree.contains(container, &name)? {
            name.push('_');
        }
        check_name(tree, container, &name)?;
        Ok(name)
    }
}

/// Chooser lookup per container: a default plus explicit overrides.
pub struct NameChoosers {
    default: Box<dyn NameChooser>,
    overrides: HashMap<ItemId, Box<dyn NameChooser>>,
}

impl fmt::Debug for NameChoosers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NameChoosers")
            .field("overrides", &self.overrides.len())
            .finish()
    }
}

impl Default for NameChoosers {
    fn default() -> Self {
        Self::new(NamePolicy::default().chooser())
    }
}

impl NameChoosers {
    pub fn new(default: Box<dyn NameChooser>) -> Self {
        Self {
            default,
            overrides: HashMap::new(),
        }
    }

    pub fn set_default(&mut self, chooser: Box<dyn NameChooser>) {
        self.default = chooser;
    }

    /// Use `chooser` for `container` instead of the default.
    pub fn set_for(&mut self, container: ItemId, chooser: Box<dyn NameChooser>) {
        self.overrides.insert(container, chooser);
    }

    pub fn for_container(&self, container: ItemId) -> &dyn NameChooser {
        self.overrides
            .get(&container)
            .map(|c| c.as_ref())
            .unwrap_or(self.default.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespace::ContainerKind;

    fn container_with(names: &[&str]) -> (Tree, ItemId, ItemId) {
        let mut tree = Tree::new();
        let c = tree.create_container(ContainerKind::Plain);
        let root = tree.root();
        tree.set(root, "c", c).unwrap();
        for n in names {
            let leaf = tree.create_leaf("");
            tree.set(c, n, leaf).unwrap();
        }
        let item = tree.create_leaf("new");
        (tree, c, item)
    }

    #[test]
    fn split_extension_cases() {
        assert_eq!(split_extension("file1"), ("file1", ""));
        assert_eq!(split_extension("a.txt"), ("a", ".txt"));
        assert_eq!(split_extension("archive.tar.gz"), ("archive.tar", ".gz"));
        assert_eq!(split_extension(".env"), (".env", ""));
    }

    #[test]
    fn numbered_keeps_free_name() {
        let (tree, c, item) = container_with(&[]);
        assert_eq!(NumberedChooser.choose_name(&tree, c, "file1", item).unwrap(), "file1");
    }

    #[test]
    fn numbered_skips_taken_suffixes() {
        let (tree, c, item) = container_with(&["file1", "file1-2"]);
        assert_eq!(NumberedChooser.choose_name(&tree, c, "file1", item).unwrap(), "file1-3");
        let (tree, c, item) = container_with(&["a.txt"]);
        assert_eq!(NumberedChooser.choose_name(&tree, c, "a.txt", item).unwrap(), "a-2.txt");
    }

    #[test]
    fn numbered_cleans_up_bad_names() {
        let (tree, c, item) = container_with(&[]);
        assert_eq!(NumberedChooser.choose_name(&tree, c, "+@a/b", item).unwrap(), "a-b");
        assert_eq!(NumberedChooser.choose_name(&tree, c, "", item).unwrap(), "item");
    }

    #[test]
    fn underscore_appends_until_free() {
        let (tree, c, item) = container_with(&["splat", "splat_"]);
        assert_eq!(UnderscoreChooser.choose_name(&tree, c, "splat", item).unwrap(), "splat__");
    }

    #[test]
    fn underscore_refuses_names_the_container_cannot_hold() {
        let (tree, c, item) = container_with(&[]);
        assert!(matches!(
            UnderscoreChooser.choose_name(&tree, c, "bad/name", item),
            Err(NamespaceError::InvalidName { .. })
        ));
        assert!(UnderscoreChooser.choose_name(&tree, c, "", item).is_err());
    }

    #[test]
    fn check_name_rules() {
        let (tree, c, _) = container_with(&["taken"]);
        assert!(check_name(&tree, c, "fine").is_ok());
        assert!(check_name(&tree, c, "").is_err());
        assert!(check_name(&tree, c, "+x").is_err());
        assert!(check_name(&tree, c, "@x").is_err());
        assert!(check_name(&tree, c, "a/b").is_err());
        assert!(check_name(&tree, c, "taken").is_err());
    }

    #[test]
    fn policy_parse_and_display() {
        assert_eq!(NamePolicy::parse("Underscore"), Some(NamePolicy::Underscore));
        assert_eq!("numbered".parse::<NamePolicy>(), Ok(NamePolicy::Numbered));
        assert!("weird".parse::<NamePolicy>().is_err());
        assert_eq!(NamePolicy::Underscore.to_string(), "underscore");
    }

    #[test]
    fn overrides_take_precedence() {
        let (tree, c, item) = container_with(&["x"]);
        let mut choosers = NameChoosers::default();
        assert_eq!(choosers.for_container(c).choose_name(&tree, c, "x", item).unwrap(), "x-2");
        choosers.set_for(c, Box::new(UnderscoreChooser));
        assert_eq!(choosers.for_container(c).choose_name(&tree, c, "x", item).unwrap(), "x_");
    }
}
