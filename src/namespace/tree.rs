//! Arena-backed tree of named items.
//!
//! The arena owns every node; containment is the entry map held by each
//! container. `parent` and `name` on a node are bookkeeping kept in sync by
//! `set`/`delete` and never decide ownership on their own.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use tracing::trace;

use crate::errors::{NamespaceError, NsResult};

use super::entries::Entries;

/// Handle to a node in a [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub(crate) usize);

impl ItemId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Capability tag of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    Plain,
    /// Keeps an explicit, caller-visible order of its keys.
    Ordered,
}

/// Metadata carried by every node and duplicated by deep copies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    pub created: Option<DateTime<Utc>>,
    pub attributes: BTreeMap<String, String>,
}

#[derive(Debug, Clone)]
enum Body {
    Leaf(String),
    Container { kind: ContainerKind, entries: Entries },
}

#[derive(Debug, Clone)]
struct Node {
    name: Option<String>,
    parent: Option<ItemId>,
    body: Body,
    meta: Metadata,
}

impl Node {
    fn detached(body: Body) -> Self {
        Self {
            name: None,
            parent: None,
            body,
            meta: Metadata::default(),
        }
    }
}

/// Slots are never reissued, so a handle to a released node stays dead and
/// cannot alias a newer item.
#[derive(Debug, Clone)]
pub struct Tree {
    slots: Vec<Option<Node>>,
    live: usize,
    root: ItemId,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// New tree with a plain root container.
    pub fn new() -> Self {
        Self::with_root(ContainerKind::Plain)
    }

    pub fn with_root(kind: ContainerKind) -> Self {
        let mut tree = Self {
            slots: Vec::new(),
            live: 0,
            root: ItemId(0),
        };
        tree.root = tree.alloc(Node::detached(Body::Container {
            kind,
            entries: Entries::new(),
        }));
        tree
    }

    pub fn root(&self) -> ItemId {
        self.root
    }

    /// Create a detached leaf holding `data`.
    pub fn create_leaf(&mut self, data: impl Into<String>) -> ItemId {
        self.alloc(Node::detached(Body::Leaf(data.into())))
    }

    /// Create a detached, empty container.
    pub fn create_container(&mut self, kind: ContainerKind) -> ItemId {
        self.alloc(Node::detached(Body::Container {
            kind,
            entries: Entries::new(),
        }))
    }

    fn alloc(&mut self, node: Node) -> ItemId {
        self.slots.push(Some(node));
        self.live += 1;
        ItemId(self.slots.len() - 1)
    }

    fn node(&self, id: ItemId) -> NsResult<&Node> {
        self.slots
            .get(id.0)
            .and_then(Option::as_ref)
            .ok_or(NamespaceError::UnknownItem(id))
    }

    fn node_mut(&mut self, id: ItemId) -> NsResult<&mut Node> {
        self.slots
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or(NamespaceError::UnknownItem(id))
    }

    /// Number of live nodes, root included.
    pub fn live_count(&self) -> usize {
        self.live
    }

    pub fn exists(&self, id: ItemId) -> bool {
        self.node(id).is_ok()
    }

    pub fn name(&self, id: ItemId) -> NsResult<Option<&str>> {
        Ok(self.node(id)?.name.as_deref())
    }

    pub fn parent(&self, id: ItemId) -> NsResult<Option<ItemId>> {
        Ok(self.node(id)?.parent)
    }

    /// `None` when the node is a leaf.
    pub fn container_kind(&self, id: ItemId) -> NsResult<Option<ContainerKind>> {
        Ok(match &self.node(id)?.body {
            Body::Container { kind, .. } => Some(*kind),
            Body::Leaf(_) => None,
        })
    }

    pub fn is_container(&self, id: ItemId) -> bool {
        matches!(self.container_kind(id), Ok(Some(_)))
    }

    /// Leaf data; `None` for containers.
    pub fn data(&self, id: ItemId) -> NsResult<Option<&str>> {
        Ok(match &self.node(id)?.body {
            Body::Leaf(data) => Some(data.as_str()),
            Body::Container { .. } => None,
        })
    }

    pub fn metadata(&self, id: ItemId) -> NsResult<&Metadata> {
        Ok(&self.node(id)?.meta)
    }

    pub fn metadata_mut(&mut self, id: ItemId) -> NsResult<&mut Metadata> {
        Ok(&mut self.node_mut(id)?.meta)
    }

    pub fn entries(&self, container: ItemId) -> NsResult<&Entries> {
        match &self.node(container)?.body {
            Body::Container { entries, .. } => Ok(entries),
            Body::Leaf(_) => Err(NamespaceError::NotAValidContainer(container)),
        }
    }

    fn entries_mut(&mut self, container: ItemId) -> NsResult<&mut Entries> {
        match &mut self.node_mut(container)?.body {
            Body::Container { entries, .. } => Ok(entries),
            Body::Leaf(_) => Err(NamespaceError::NotAValidContainer(container)),
        }
    }

    pub fn get(&self, container: ItemId, name: &str) -> NsResult<Option<ItemId>> {
        Ok(self.entries(container)?.get(name))
    }

    pub fn contains(&self, container: ItemId, name: &str) -> NsResult<bool> {
        Ok(self.entries(container)?.contains(name))
    }

    pub fn keys(&self, container: ItemId) -> NsResult<Vec<String>> {
        Ok(self.entries(container)?.keys().to_vec())
    }

    pub fn len(&self, container: ItemId) -> NsResult<usize> {
        Ok(self.entries(container)?.len())
    }

    pub fn children(&self, container: ItemId) -> NsResult<Vec<ItemId>> {
        Ok(self.entries(container)?.iter().map(|(_, id)| id).collect())
    }

    /// True if `candidate` is `of` or one of its ancestors.
    pub fn is_self_or_ancestor(&self, candidate: ItemId, of: ItemId) -> NsResult<bool> {
        let mut cursor = Some(of);
        while let Some(id) = cursor {
            if id == candidate {
                return Ok(true);
            }
            cursor = self.node(id)?.parent;
        }
        Ok(false)
    }

    /// Insert a detached `item` into `container` under `name`.
    ///
    /// An item that already has a parent is rejected; relocation goes through
    /// the mover.
    pub fn set(&mut self, container: ItemId, name: &str, item: ItemId) -> NsResult<()> {
        if self.node(item)?.parent.is_some() {
            return Err(NamespaceError::AlreadyContained(item));
        }
        self.link(container, name, item)
    }

    /// Insert `item` and update its bookkeeping, even if it is still listed
    /// in its old container. The caller removes the old entry afterwards with
    /// [`Tree::delete`].
    pub(crate) fn link(&mut self, container: ItemId, name: &str, item: ItemId) -> NsResult<()> {
        if name.is_empty() {
            return Err(NamespaceError::InvalidName {
                name: name.to_string(),
                reason: "empty names are not allowed".into(),
            });
        }
        if name.contains('/') {
            return Err(NamespaceError::InvalidName {
                name: name.to_string(),
                reason: "names cannot contain '/'".into(),
            });
        }
        self.node(item)?;
        if self.entries(container)?.contains(name) {
            return Err(NamespaceError::DuplicateName(name.to_string()));
        }
        if self.is_self_or_ancestor(item, container)? {
            return Err(NamespaceError::MoveIntoSelf {
                item,
                target: container,
            });
        }

        self.entries_mut(container)?.insert(name, item);
        let node = self.node_mut(item)?;
        node.parent = Some(container);
        node.name = Some(name.to_string());
        trace!(%container, name, %item, "entry set");
        Ok(())
    }

    /// Remove the entry `name` from `container`.
    ///
    /// If the item still belongs to this container its subtree is released;
    /// an item that has already been re-parented is only unlinked.
    pub fn delete(&mut self, container: ItemId, name: &str) -> NsResult<()> {
        let item = self
            .entries_mut(container)?
            .remove(name)
            .ok_or_else(|| NamespaceError::ItemNotFound {
                container,
                name: name.to_string(),
            })?;
        let node = self.node(item)?;
        if node.parent == Some(container) && node.name.as_deref() == Some(name) {
            self.release(item);
            trace!(%container, name, %item, "entry deleted, subtree released");
        } else {
            trace!(%container, name, %item, "stale entry unlinked");
        }
        Ok(())
    }

    /// Replace the key order of an ordered container.
    pub fn update_order(&mut self, container: ItemId, order: &[String]) -> NsResult<()> {
        match self.container_kind(container)? {
            Some(ContainerKind::Ordered) => self.entries_mut(container)?.reorder(order),
            Some(ContainerKind::Plain) => Err(NamespaceError::NotOrdered(container)),
            None => Err(NamespaceError::NotAValidContainer(container)),
        }
    }

    /// Structural duplicate of `item`'s subtree under fresh handles.
    /// The copy root is detached: no parent, no name.
    pub fn deep_copy(&mut self, item: ItemId) -> NsResult<ItemId> {
        let copy = self.copy_subtree(item, None)?;
        let node = self.node_mut(copy)?;
        node.name = None;
        Ok(copy)
    }

    fn copy_subtree(&mut self, item: ItemId, parent: Option<ItemId>) -> NsResult<ItemId> {
        let source = self.node(item)?;
        let name = source.name.clone();
        let meta = source.meta.clone();
        let (body, children) = match &source.body {
            Body::Leaf(data) => (Body::Leaf(data.clone()), Vec::new()),
            Body::Container { kind, entries } => (
                Body::Container {
                    kind: *kind,
                    entries: Entries::new(),
                },
                entries
                    .iter()
                    .map(|(k, id)| (k.to_string(), id))
                    .collect::<Vec<_>>(),
            ),
        };
        let copy = self.alloc(Node {
            name,
            parent,
            body,
            meta,
        });
        for (key, child) in children {
            let child_copy = self.copy_subtree(child, Some(copy))?;
            self.entries_mut(copy)?.insert(&key, child_copy);
        }
        Ok(copy)
    }

    /// Drop `item` and everything below it, unlinking it from its parent first.
    pub fn discard(&mut self, item: ItemId) -> NsResult<()> {
        let node = self.node(item)?;
        if let (Some(parent), Some(name)) = (node.parent, node.name.clone())
            && self.entries(parent)?.get(&name) == Some(item)
        {
            return self.delete(parent, &name);
        }
        self.release(item);
        Ok(())
    }

    fn release(&mut self, item: ItemId) {
        let mut stack = vec![item];
        while let Some(id) = stack.pop() {
            if let Some(node) = self.slots.get_mut(id.0).and_then(Option::take) {
                if let Body::Container { entries, .. } = &node.body {
                    stack.extend(entries.iter().map(|(_, child)| child));
                }
                self.live -= 1;
            }
        }
    }

    /// Resolve an absolute, `/`-separated path from the root.
    pub fn resolve_path(&self, path: &str) -> NsResult<ItemId> {
        let mut cursor = self.root;
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            cursor = self
                .get(cursor, segment)?
                .ok_or_else(|| NamespaceError::ItemNotFound {
                    container: cursor,
                    name: segment.to_string(),
                })?;
        }
        Ok(cursor)
    }

    /// Absolute path of a contained item; detached subtrees render relative to
    /// their own root as `<detached>/...`.
    pub fn path_of(&self, item: ItemId) -> NsResult<String> {
        let mut segments = Vec::new();
        let mut cursor = item;
        loop {
            let node = self.node(cursor)?;
            match (node.parent, node.name.as_deref()) {
                (Some(parent), Some(name)) => {
                    segments.push(name.to_string());
                    cursor = parent;
                }
                _ => break,
            }
        }
        segments.reverse();
        if cursor == self.root {
            Ok(format!("/{}", segments.join("/")))
        } else {
            Ok(format!("<detached>/{}", segments.join("/")))
        }
    }

    /// Indented listing of the subtree at `item`; containers end with `/`.
    pub fn render(&self, item: ItemId) -> NsResult<String> {
        let mut out = String::new();
        let label = if item == self.root {
            "/".to_string()
        } else {
            self.name(item)?.unwrap_or("<unnamed>").to_string()
        };
        self.render_into(item, &label, 0, &mut out)?;
        Ok(out)
    }

    fn render_into(&self, item: ItemId, label: &str, depth: usize, out: &mut String) -> NsResult<()> {
        let indent = "  ".repeat(depth);
        match &self.node(item)?.body {
            Body::Leaf(_) => {
                out.push_str(&format!("{indent}{label}\n"));
            }
            Body::Container { entries, .. } => {
                let suffix = if label.ends_with('/') { "" } else { "/" };
                out.push_str(&format!("{indent}{label}{suffix}\n"));
                for (key, child) in entries.iter() {
                    self.render_into(child, key, depth + 1, out)?;
                }
            }
        }
        Ok(())
    }
}
