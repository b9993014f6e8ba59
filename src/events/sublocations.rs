//! Re-dispatch of object events to sublocations.
//!
//! A copy notification for a subtree root is handed on to every child the
//! object exposes, with the event unchanged. Because the dispatcher is itself
//! a handler, each child's children are reached through the same bus, so
//! every node of the subtree sees the event exactly once. Sublocation graphs
//! are assumed to be acyclic.

use tracing::trace;

use crate::errors::NsResult;
use crate::namespace::{ItemId, Tree};

use super::{EventBus, ObjectEvent};

/// Optional capability: the immediate children of an object.
/// `None` means the object has no sublocations capability at all.
pub trait Sublocations {
    fn sublocations(&self, tree: &Tree, object: ItemId) -> Option<Vec<ItemId>>;
}

/// Containers expose their entries as sublocations; leaves expose nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContainerSublocations;

impl Sublocations for ContainerSublocations {
    fn sublocations(&self, tree: &Tree, object: ItemId) -> Option<Vec<ItemId>> {
        if tree.is_container(object) {
            tree.children(object).ok()
        } else {
            None
        }
    }
}

/// Hand `event` on to each sublocation of `object`.
pub fn dispatch_to_sublocations(
    provider: &dyn Sublocations,
    bus: &EventBus,
    tree: &mut Tree,
    object: ItemId,
    event: &ObjectEvent,
) -> NsResult<()> {
    let Some(subs) = provider.sublocations(tree, object) else {
        return Ok(());
    };
    trace!(%object, count = subs.len(), kind = event.kind_name(), "dispatching to sublocations");
    for sub in subs {
        bus.handle(tree, sub, event)?;
    }
    Ok(())
}

/// Wrap `provider` as a bus handler; subscribe it for copy events.
pub fn sublocation_dispatcher<S>(
    provider: S,
) -> impl Fn(&EventBus, &mut Tree, ItemId, &ObjectEvent) -> NsResult<()> + 'static
where
    S: Sublocations + 'static,
{
    move |bus, tree, object, event| dispatch_to_sublocations(&provider, bus, tree, object, event)
}
