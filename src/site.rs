//! A `Site` bundles a tree with the registries the engines consult:
//! event handlers, containment constraints and name choosers.

use tracing::debug;

use crate::constraints::Constraints;
use crate::events::{created_annotator, sublocation_dispatcher, ContainerSublocations, EventBus, EventFilter};
use crate::namespace::Tree;
use crate::naming::{NameChoosers, NamePolicy};

#[derive(Debug, Default)]
pub struct Site {
    pub tree: Tree,
    pub events: EventBus,
    pub constraints: Constraints,
    pub choosers: NameChoosers,
}

impl Site {
    /// Bare site: default chooser policy, no handlers, no constraints.
    pub fn new(tree: Tree) -> Self {
        Self {
            tree,
            ..Default::default()
        }
    }

    /// Site with `policy` as default chooser and the stock copy handlers.
    pub fn with_defaults(tree: Tree, policy: NamePolicy, annotate_created: bool) -> Self {
        let mut site = Self::new(tree);
        site.choosers.set_default(policy.chooser());
        site.install_copy_handlers(annotate_created);
        site
    }

    /// Register the sublocation dispatcher for copy events and, optionally,
    /// the creation-time annotator.
    pub fn install_copy_handlers(&mut self, annotate_created: bool) {
        if annotate_created {
            self.events.subscribe(EventFilter::Created, created_annotator());
        }
        self.events
            .subscribe(EventFilter::Copied, sublocation_dispatcher(ContainerSublocations));
        debug!(handlers = self.events.len(), annotate_created, "copy handlers installed");
    }
}
