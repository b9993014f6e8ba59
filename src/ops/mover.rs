//! Relocation of a contained item to another (or the same) container.
//! Inserts at the destination before removing from the source, so the item is
//! never absent from both and a failed insert leaves the source untouched.

use tracing::{debug, info};

use crate::errors::{NamespaceError, NsResult};
use crate::events::ObjectEvent;
use crate::namespace::ItemId;
use crate::site::Site;

/// Mover bound to a single contained item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectMover {
    item: ItemId,
}

impl ObjectMover {
    pub fn new(item: ItemId) -> Self {
        Self { item }
    }

    pub fn item(&self) -> ItemId {
        self.item
    }

    /// Move the item into `target`, under `new_name` or its current name.
    ///
    /// Returns the name the item ends up with. Moving an item onto its own
    /// location is a no-op that returns the current name.
    pub fn move_to(&self, site: &mut Site, target: ItemId, new_name: Option<&str>) -> NsResult<String> {
        let item = self.item;
        let source = site.tree.parent(item)?.ok_or(NamespaceError::NotContained(item))?;
        let orig_name = site
            .tree
            .name(item)?
            .ok_or(NamespaceError::NotContained(item))?
            .to_string();
        let requested = new_name.unwrap_or(&orig_name).to_string();

        site.constraints.check_object(&site.tree, target, &requested, item)?;

        if target == source && requested == orig_name {
            debug!(%item, name = %orig_name, "move onto own location; nothing to do");
            return Ok(orig_name);
        }

        let chosen = site
            .choosers
            .for_container(target)
            .choose_name(&site.tree, target, &requested, item)?;

        if target == source && chosen == orig_name {
            debug!(%item, requested = %requested, "name chooser resolved back to the current name");
            return Ok(orig_name);
        }

        site.tree.link(target, &chosen, item)?;
        site.tree.delete(source, &orig_name)?;
        info!(%item, from = %source, to = %target, old_name = %orig_name, new_name = %chosen, "moved");

        site.events.notify(
            &mut site.tree,
            &ObjectEvent::Moved {
                object: item,
                old_parent: source,
                old_name: orig_name,
                new_parent: target,
                new_name: chosen.clone(),
            },
        )?;
        site.events
            .notify(&mut site.tree, &ObjectEvent::ContainerModified { object: target })?;
        if source != target {
            site.events
                .notify(&mut site.tree, &ObjectEvent::ContainerModified { object: source })?;
        }
        Ok(chosen)
    }

    /// Items are never pinned in place.
    pub fn moveable(&self) -> bool {
        true
    }

    /// Probe whether the item could be moved into `target`.
    ///
    /// Constraint rejections become `Ok(false)`; shape errors (not a
    /// container, move into self, stale handles) still propagate.
    pub fn moveable_to(&self, site: &Site, target: ItemId, name: Option<&str>) -> NsResult<bool> {
        probe(site, self.item, target, name)
    }
}

/// Shared by the move and copy probes.
pub(crate) fn probe(site: &Site, item: ItemId, target: ItemId, name: Option<&str>) -> NsResult<bool> {
    let name = match name {
        Some(n) => n.to_string(),
        None => site.tree.name(item)?.unwrap_or_default().to_string(),
    };
    match site.constraints.check_object(&site.tree, target, &name, item) {
        Ok(()) => Ok(true),
        Err(NamespaceError::ValidationFailed(reason)) => {
            debug!(%item, %target, name = %name, reason = %reason, "probe rejected");
            Ok(false)
        }
        Err(e) => Err(e),
    }
}
