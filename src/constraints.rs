//! Containment checks run before anything is inserted into a container.
//!
//! Order of checks in [`Constraints::check_object`]:
//! 1) the target must be a container (`NotAValidContainer`)
//! 2) container preconditions (`ValidationFailed`)
//! 3) the item must not be the target or one of its ancestors (`MoveIntoSelf`)
//! 4) parent constraints on the item (`ValidationFailed`)

use std::fmt;

use tracing::debug;

use crate::errors::{NamespaceError, NsResult};
use crate::namespace::{ItemId, Tree};

/// A rule consulted before `item` is placed in `container` under `name`.
/// Returning `Err(message)` rejects the placement.
pub trait Constraint {
    fn check(&self, tree: &Tree, container: ItemId, name: &str, item: ItemId) -> Result<(), String>;
}

struct FnConstraint<F>(F);

impl<F> Constraint for FnConstraint<F>
where
    F: Fn(&Tree, ItemId, &str, ItemId) -> Result<(), String>,
{
    fn check(&self, tree: &Tree, container: ItemId, name: &str, item: ItemId) -> Result<(), String> {
        (self.0)(tree, container, name, item)
    }
}

/// Precondition rejecting names that start with a given prefix.
#[derive(Debug, Clone)]
pub struct RejectNamePrefix {
    pub prefix: String,
}

impl RejectNamePrefix {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }
}

impl Constraint for RejectNamePrefix {
    fn check(&self, _tree: &Tree, _container: ItemId, name: &str, _item: ItemId) -> Result<(), String> {
        if name.starts_with(&self.prefix) {
            Err(format!("Invalid name: '{name}' starts with '{}'", self.prefix))
        } else {
            Ok(())
        }
    }
}

#[derive(Default)]
pub struct Constraints {
    preconditions: Vec<Box<dyn Constraint>>,
    parent_constraints: Vec<Box<dyn Constraint>>,
}

impl fmt::Debug for Constraints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constraints")
            .field("preconditions", &self.preconditions.len())
            .field("parent_constraints", &self.parent_constraints.len())
            .finish()
    }
}

impl Constraints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a container-side rule (checked before the cycle check).
    pub fn add_precondition(&mut self, rule: impl Constraint + 'static) {
        self.preconditions.push(Box::new(rule));
    }

    pub fn precondition<F>(&mut self, f: F)
    where
        F: Fn(&Tree, ItemId, &str, ItemId) -> Result<(), String> + 'static,
    {
        self.preconditions.push(Box::new(FnConstraint(f)));
    }

    /// Register an item-side rule about acceptable parents.
    pub fn add_parent_constraint(&mut self, rule: impl Constraint + 'static) {
        self.parent_constraints.push(Box::new(rule));
    }

    pub fn parent_constraint<F>(&mut self, f: F)
    where
        F: Fn(&Tree, ItemId, &str, ItemId) -> Result<(), String> + 'static,
    {
        self.parent_constraints.push(Box::new(FnConstraint(f)));
    }

    /// Fail if `item` may not be stored in `container` under `name`.
    pub fn check_object(&self, tree: &Tree, container: ItemId, name: &str, item: ItemId) -> NsResult<()> {
        if !tree.is_container(container) {
            return Err(NamespaceError::NotAValidContainer(container));
        }

        for rule in &self.preconditions {
            rule.check(tree, container, name, item).map_err(|msg| {
                debug!(%container, name, %item, reason = %msg, "precondition rejected item");
                NamespaceError::ValidationFailed(msg)
            })?;
        }

        if tree.is_self_or_ancestor(item, container)? {
            return Err(NamespaceError::MoveIntoSelf {
                item,
                target: container,
            });
        }

        for rule in &self.parent_constraints {
            rule.check(tree, container, name, item).map_err(|msg| {
                debug!(%container, name, %item, reason = %msg, "parent constraint rejected item");
                NamespaceError::ValidationFailed(msg)
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespace::ContainerKind;

    fn setup() -> (Tree, ItemId, ItemId) {
        let mut tree = Tree::new();
        let root = tree.root();
        let folder = tree.create_container(ContainerKind::Plain);
        tree.set(root, "folder", folder).unwrap();
        let leaf = tree.create_leaf("x");
        tree.set(root, "leaf", leaf).unwrap();
        (tree, folder, leaf)
    }

    #[test]
    fn leaf_target_is_not_a_container() {
        let (tree, _, leaf) = setup();
        let c = Constraints::new();
        assert_eq!(
            c.check_object(&tree, leaf, "x", leaf),
            Err(NamespaceError::NotAValidContainer(leaf))
        );
    }

    #[test]
    fn prefix_precondition() {
        let (tree, folder, leaf) = setup();
        let mut c = Constraints::new();
        c.add_precondition(RejectNamePrefix::new("Z"));
        assert!(matches!(
            c.check_object(&tree, folder, "ZDummy", leaf),
            Err(NamespaceError::ValidationFailed(_))
        ));
        assert!(c.check_object(&tree, folder, "newName", leaf).is_ok());
    }

    #[test]
    fn parent_constraint_reads_container_attributes() {
        let (mut tree, folder, leaf) = setup();
        let mut c = Constraints::new();
        c.parent_constraint(|tree: &Tree, container, _name: &str, _item| {
            let meta = tree.metadata(container).map_err(|e| e.to_string())?;
            if meta.attributes.contains_key("x") {
                Ok(())
            } else {
                Err("container constraint not met".to_string())
            }
        });
        assert!(c.check_object(&tree, folder, "leaf", leaf).is_err());
        tree.metadata_mut(folder).unwrap().attributes.insert("x".into(), "1".into());
        assert!(c.check_object(&tree, folder, "leaf", leaf).is_ok());
    }

    #[test]
    fn cycle_is_rejected_after_preconditions() {
        let (mut tree, folder, _) = setup();
        let sub = tree.create_container(ContainerKind::Plain);
        tree.set(folder, "sub", sub).unwrap();
        let c = Constraints::new();
        assert_eq!(
            c.check_object(&tree, sub, "folder", folder),
            Err(NamespaceError::MoveIntoSelf { item: folder, target: sub })
        );
    }
}
