//! In-place renames. Renames detect collisions instead of resolving them;
//! the ordered variant keeps the renamed entry at its position.

use tracing::{debug, info};

use crate::errors::{NamespaceError, NsResult};
use crate::namespace::{ContainerKind, ItemId, Tree};
use crate::site::Site;

use super::mover::ObjectMover;

pub trait ItemRenamer {
    /// Rename `old` to `new` and return the name the item ends up with.
    fn rename_item(&self, site: &mut Site, old: &str, new: &str) -> NsResult<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerItemRenamer {
    container: ItemId,
}

impl ContainerItemRenamer {
    pub fn new(container: ItemId) -> Self {
        Self { container }
    }
}

impl ItemRenamer for ContainerItemRenamer {
    fn rename_item(&self, site: &mut Site, old: &str, new: &str) -> NsResult<String> {
        let container = self.container;
        let item = site
            .tree
            .get(container, old)?
            .ok_or_else(|| NamespaceError::ItemNotFound {
                container,
                name: old.to_string(),
            })?;
        if site.tree.contains(container, new)? {
            return Err(NamespaceError::DuplicateName(new.to_string()));
        }
        let final_name = ObjectMover::new(item).move_to(site, container, Some(new))?;
        info!(%container, old, new = %final_name, "renamed");
        Ok(final_name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderedContainerItemRenamer {
    container: ItemId,
}

impl OrderedContainerItemRenamer {
    pub fn new(container: ItemId) -> Self {
        Self { container }
    }
}

impl ItemRenamer for OrderedContainerItemRenamer {
    fn rename_item(&self, site: &mut Site, old: &str, new: &str) -> NsResult<String> {
        let mut order = site.tree.keys(self.container)?;
        let final_name = ContainerItemRenamer::new(self.container).rename_item(site, old, new)?;
        if let Some(slot) = order.iter_mut().find(|k| k.as_str() == old) {
            *slot = final_name.clone();
        }
        site.tree.update_order(self.container, &order)?;
        debug!(container = %self.container, ?order, "sibling order restored");
        Ok(final_name)
    }
}

/// Pick the renamer matching the container's kind.
pub fn renamer_for(tree: &Tree, container: ItemId) -> NsResult<Box<dyn ItemRenamer>> {
    match tree.container_kind(container)? {
        Some(ContainerKind::Plain) => Ok(Box::new(ContainerItemRenamer::new(container))),
        Some(ContainerKind::Ordered) => Ok(Box::new(OrderedContainerItemRenamer::new(container))),
        None => Err(NamespaceError::NotAValidContainer(container)),
    }
}
