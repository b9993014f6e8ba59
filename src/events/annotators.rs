use chrono::Utc;
use tracing::trace;

use crate::errors::NsResult;
use crate::namespace::{ItemId, Tree};

use super::{EventBus, ObjectEvent};

/// Handler stamping `metadata.created` on every object it is dispatched to.
/// Subscribe it for `EventFilter::Created` next to the sublocation dispatcher
/// so each node of a copied subtree gets its own creation time.
pub fn created_annotator() -> impl Fn(&EventBus, &mut Tree, ItemId, &ObjectEvent) -> NsResult<()> + 'static {
    |_bus, tree, target, _event| {
        let now = Utc::now();
        tree.metadata_mut(target)?.created = Some(now);
        trace!(%target, created = %now, "creation time set");
        Ok(())
    }
}
