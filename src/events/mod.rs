//! Object lifecycle events and the synchronous bus that delivers them.
//!
//! Handlers are `(target, event)` pairs in the style of object event
//! subscribers: `notify` delivers an event to handlers with the event's own
//! object as target, `handle` delivers it against any other target (used to
//! fan a copy event out over sublocations).

mod annotators;
mod sublocations;

pub use annotators::created_annotator;
pub use sublocations::{dispatch_to_sublocations, sublocation_dispatcher, ContainerSublocations, Sublocations};

use std::fmt;

use crate::errors::NsResult;
use crate::namespace::{ItemId, Tree};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectEvent {
    /// `object` is a fresh, not yet inserted copy of `original`.
    Copied { object: ItemId, original: ItemId },
    Added {
        object: ItemId,
        new_parent: ItemId,
        new_name: String,
    },
    Moved {
        object: ItemId,
        old_parent: ItemId,
        old_name: String,
        new_parent: ItemId,
        new_name: String,
    },
    ContainerModified { object: ItemId },
}

impl ObjectEvent {
    pub fn object(&self) -> ItemId {
        match self {
            ObjectEvent::Copied { object, .. }
            | ObjectEvent::Added { object, .. }
            | ObjectEvent::Moved { object, .. }
            | ObjectEvent::ContainerModified { object } => *object,
        }
    }

    /// The copied-from object, for copy events.
    pub fn original(&self) -> Option<ItemId> {
        match self {
            ObjectEvent::Copied { original, .. } => Some(*original),
            _ => None,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            ObjectEvent::Copied { .. } => "copied",
            ObjectEvent::Added { .. } => "added",
            ObjectEvent::Moved { .. } => "moved",
            ObjectEvent::ContainerModified { .. } => "container_modified",
        }
    }
}

/// Which events a handler subscribes to. Broader filters also accept their
/// specialisations: `Created` accepts copies, `Moved` accepts additions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventFilter {
    Any,
    Created,
    Copied,
    Moved,
    Added,
    ContainerModified,
}

impl EventFilter {
    pub fn accepts(self, event: &ObjectEvent) -> bool {
        match (self, event) {
            (EventFilter::Any, _) => true,
            (EventFilter::Created | EventFilter::Copied, ObjectEvent::Copied { .. }) => true,
            (EventFilter::Moved, ObjectEvent::Moved { .. } | ObjectEvent::Added { .. }) => true,
            (EventFilter::Added, ObjectEvent::Added { .. }) => true,
            (EventFilter::ContainerModified, ObjectEvent::ContainerModified { .. }) => true,
            _ => false,
        }
    }
}

pub type Handler = Box<dyn Fn(&EventBus, &mut Tree, ItemId, &ObjectEvent) -> NsResult<()>>;

#[derive(Default)]
pub struct EventBus {
    subscriptions: Vec<(EventFilter, Handler)>,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriptions", &self.subscriptions.len())
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, filter: EventFilter, handler: F)
    where
        F: Fn(&EventBus, &mut Tree, ItemId, &ObjectEvent) -> NsResult<()> + 'static,
    {
        self.subscriptions.push((filter, Box::new(handler)));
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Deliver `event` to every matching handler, targeting the event's object.
    pub fn notify(&self, tree: &mut Tree, event: &ObjectEvent) -> NsResult<()> {
        self.handle(tree, event.object(), event)
    }

    /// Deliver `event` to every matching handler with an explicit target.
    /// The first handler error stops delivery and is returned.
    pub fn handle(&self, tree: &mut Tree, target: ItemId, event: &ObjectEvent) -> NsResult<()> {
        for (filter, handler) in &self.subscriptions {
            if filter.accepts(event) {
                handler(self, tree, target, event)?;
            }
        }
        Ok(())
    }
}
