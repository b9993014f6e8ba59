//! Duplication of an item into a container.
//! The deep copy is announced with a `Copied` event while still detached, so
//! handlers can adjust it before it becomes visible in the target.

use tracing::{debug, info, warn};

use crate::errors::NsResult;
use crate::events::ObjectEvent;
use crate::namespace::ItemId;
use crate::site::Site;

use super::mover::probe;

/// Copier bound to a single item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectCopier {
    item: ItemId,
}

impl ObjectCopier {
    pub fn new(item: ItemId) -> Self {
        Self { item }
    }

    pub fn item(&self) -> ItemId {
        self.item
    }

    /// Copy the item into `target` and return the name of the copy.
    ///
    /// There is no same-location shortcut: copying onto an occupied name
    /// always goes through the name chooser and lands as a sibling.
    pub fn copy_to(&self, site: &mut Site, target: ItemId, new_name: Option<&str>) -> NsResult<String> {
        let original = self.item;
        let requested = match new_name {
            Some(n) => n.to_string(),
            None => site.tree.name(original)?.unwrap_or_default().to_string(),
        };

        site.constraints.check_object(&site.tree, target, &requested, original)?;

        let chosen = site
            .choosers
            .for_container(target)
            .choose_name(&site.tree, target, &requested, original)?;

        let copy = site.tree.deep_copy(original)?;
        debug!(%original, %copy, "copy created; notifying");

        let announced = site
            .events
            .notify(&mut site.tree, &ObjectEvent::Copied { object: copy, original });
        if let Err(e) = announced {
            warn!(%original, %copy, error = %e, "copy handler failed; discarding copy");
            site.tree.discard(copy)?;
            return Err(e);
        }

        if let Err(e) = site.tree.set(target, &chosen, copy) {
            site.tree.discard(copy)?;
            return Err(e);
        }
        info!(%original, %copy, to = %target, name = %chosen, "copied");

        site.events.notify(
            &mut site.tree,
            &ObjectEvent::Added {
                object: copy,
                new_parent: target,
                new_name: chosen.clone(),
            },
        )?;
        site.events
            .notify(&mut site.tree, &ObjectEvent::ContainerModified { object: target })?;
        Ok(chosen)
    }

    /// Every item can be copied.
    pub fn copyable(&self) -> bool {
        true
    }

    /// Probe whether the item could be copied into `target`.
    /// Same conversion rules as [`super::ObjectMover::moveable_to`].
    pub fn copyable_to(&self, site: &Site, target: ItemId, name: Option<&str>) -> NsResult<bool> {
        probe(site, self.item, target, name)
    }
}
