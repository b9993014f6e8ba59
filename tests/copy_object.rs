//! Duplication engine: collision naming, pre-insertion notification and
//! rollback when a copy handler fails.

use std::cell::RefCell;
use std::rc::Rc;

use cpmove::{
    ContainerKind, EventFilter, ItemId, NamePolicy, NamespaceError, ObjectCopier, ObjectEvent, Site, Tree,
};

/// root/{a/{file1, folder/{inner}}, b/{file1}}
fn tree() -> (Tree, ItemId, ItemId) {
    let mut tree = Tree::new();
    let root = tree.root();
    let a = tree.create_container(ContainerKind::Plain);
    let b = tree.create_container(ContainerKind::Plain);
    tree.set(root, "a", a).unwrap();
    tree.set(root, "b", b).unwrap();
    let f = tree.create_leaf("one");
    tree.set(a, "file1", f).unwrap();
    let f = tree.create_leaf("other");
    tree.set(b, "file1", f).unwrap();
    let folder = tree.create_container(ContainerKind::Plain);
    tree.set(a, "folder", folder).unwrap();
    let inner = tree.create_leaf("deep");
    tree.set(folder, "inner", inner).unwrap();
    (tree, a, b)
}

#[test]
fn repeated_copies_pick_successive_names() {
    let (tree, a, b) = tree();
    let mut site = Site::new(tree);
    let file1 = site.tree.get(a, "file1").unwrap().unwrap();

    let first = ObjectCopier::new(file1).copy_to(&mut site, b, Some("file1")).unwrap();
    let second = ObjectCopier::new(file1).copy_to(&mut site, b, Some("file1")).unwrap();

    assert_eq!(first, "file1-2");
    assert_eq!(second, "file1-3");
    assert_eq!(site.tree.get(a, "file1").unwrap(), Some(file1), "source stays in place");
    let copy = site.tree.get(b, "file1-2").unwrap().unwrap();
    assert_ne!(copy, file1);
    assert_eq!(site.tree.data(copy).unwrap(), Some("one"));
}

#[test]
fn copy_onto_own_location_lands_as_a_sibling() {
    let (tree, a, _b) = tree();
    let mut site = Site::with_defaults(tree, NamePolicy::Underscore, false);
    let file1 = site.tree.get(a, "file1").unwrap().unwrap();

    let name = ObjectCopier::new(file1).copy_to(&mut site, a, None).unwrap();

    assert_eq!(name, "file1_");
    assert_eq!(site.tree.keys(a).unwrap(), vec!["file1", "folder", "file1_"]);
}

#[test]
fn copied_event_fires_once_before_insertion() {
    let (tree, a, b) = tree();
    let mut site = Site::new(tree);
    let seen: Rc<RefCell<Vec<(ItemId, Option<ItemId>, Option<ItemId>)>>> = Rc::default();
    let sink = Rc::clone(&seen);
    site.events.subscribe(EventFilter::Copied, move |_, tree, target, ev| {
        sink.borrow_mut().push((target, ev.original(), tree.parent(target)?));
        tree.metadata_mut(target)?.attributes.insert("stamp".into(), "copied".into());
        Ok(())
    });
    let file1 = site.tree.get(a, "file1").unwrap().unwrap();

    let name = ObjectCopier::new(file1).copy_to(&mut site, b, None).unwrap();
    let copy = site.tree.get(b, &name).unwrap().unwrap();

    assert_eq!(*seen.borrow(), vec![(copy, Some(file1), None)], "copy was still detached");
    assert_eq!(
        site.tree.metadata(copy).unwrap().attributes.get("stamp").map(String::as_str),
        Some("copied"),
        "handler changes made before insertion persist"
    );
    assert!(site.tree.metadata(file1).unwrap().attributes.is_empty());
}

#[test]
fn events_after_insertion_follow_the_copy() {
    let (tree, a, b) = tree();
    let mut site = Site::new(tree);
    let seen: Rc<RefCell<Vec<ObjectEvent>>> = Rc::default();
    let sink = Rc::clone(&seen);
    site.events.subscribe(EventFilter::Any, move |_, _, _, ev| {
        sink.borrow_mut().push(ev.clone());
        Ok(())
    });
    let file1 = site.tree.get(a, "file1").unwrap().unwrap();

    let name = ObjectCopier::new(file1).copy_to(&mut site, b, Some("fresh")).unwrap();
    let copy = site.tree.get(b, &name).unwrap().unwrap();

    assert_eq!(
        *seen.borrow(),
        vec![
            ObjectEvent::Copied { object: copy, original: file1 },
            ObjectEvent::Added { object: copy, new_parent: b, new_name: "fresh".into() },
            ObjectEvent::ContainerModified { object: b },
        ]
    );
}

#[test]
fn failing_copy_handler_discards_the_copy() {
    let (tree, a, b) = tree();
    let mut site = Site::new(tree);
    site.events.subscribe(EventFilter::Created, |_, _, _, _| {
        Err(NamespaceError::ValidationFailed("copies are frozen".into()))
    });
    let folder = site.tree.get(a, "folder").unwrap().unwrap();
    let live = site.tree.live_count();

    let err = ObjectCopier::new(folder).copy_to(&mut site, b, None).unwrap_err();

    assert_eq!(err, NamespaceError::ValidationFailed("copies are frozen".into()));
    assert_eq!(site.tree.keys(b).unwrap(), vec!["file1"]);
    assert_eq!(site.tree.live_count(), live, "detached copy released");
}

#[test]
fn subtree_copies_are_independent() {
    let (tree, a, b) = tree();
    let mut site = Site::new(tree);
    let folder = site.tree.get(a, "folder").unwrap().unwrap();
    let inner = site.tree.get(folder, "inner").unwrap().unwrap();

    ObjectCopier::new(folder).copy_to(&mut site, b, None).unwrap();
    let folder_copy = site.tree.get(b, "folder").unwrap().unwrap();
    let inner_copy = site.tree.get(folder_copy, "inner").unwrap().unwrap();

    assert_ne!(inner_copy, inner);
    assert_eq!(site.tree.parent(inner_copy).unwrap(), Some(folder_copy));
    assert_eq!(site.tree.path_of(inner_copy).unwrap(), "/b/folder/inner");

    site.tree.delete(folder_copy, "inner").unwrap();
    assert_eq!(site.tree.get(folder, "inner").unwrap(), Some(inner), "original subtree untouched");
}

#[test]
fn default_site_stamps_creation_time_on_every_copied_node() {
    let (tree, a, b) = tree();
    let mut site = Site::with_defaults(tree, NamePolicy::Numbered, true);
    let folder = site.tree.get(a, "folder").unwrap().unwrap();

    ObjectCopier::new(folder).copy_to(&mut site, b, None).unwrap();
    let folder_copy = site.tree.get(b, "folder").unwrap().unwrap();
    let inner_copy = site.tree.get(folder_copy, "inner").unwrap().unwrap();

    assert!(site.tree.metadata(folder_copy).unwrap().created.is_some());
    assert!(site.tree.metadata(inner_copy).unwrap().created.is_some());
    assert!(site.tree.metadata(folder).unwrap().created.is_none());
}

#[test]
fn copyable_to_reports_rejections() {
    let (tree, a, b) = tree();
    let mut site = Site::new(tree);
    site.constraints.add_precondition(cpmove::RejectNamePrefix::new("file"));
    let file1 = site.tree.get(a, "file1").unwrap().unwrap();
    let copier = ObjectCopier::new(file1);

    assert!(copier.copyable());
    assert!(!copier.copyable_to(&site, b, None).unwrap());
    assert!(copier.copyable_to(&site, b, Some("renamed")).unwrap());
    assert!(matches!(
        copier.copy_to(&mut site, b, None),
        Err(NamespaceError::ValidationFailed(_))
    ));
}

#[test]
fn invalid_chosen_name_fails_before_any_copy_exists() {
    let (tree, a, b) = tree();
    let mut site = Site::with_defaults(tree, NamePolicy::Underscore, true);
    let calls = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&calls);
    site.events.subscribe(EventFilter::Copied, move |_, _, _, _| {
        *counter.borrow_mut() += 1;
        Ok(())
    });
    let file1 = site.tree.get(a, "file1").unwrap().unwrap();
    let live = site.tree.live_count();

    let err = ObjectCopier::new(file1).copy_to(&mut site, b, Some("bad/name")).unwrap_err();

    assert!(matches!(err, NamespaceError::InvalidName { .. }), "got {err:?}");
    assert_eq!(*calls.borrow(), 0, "no Copied handler saw a doomed copy");
    assert_eq!(site.tree.live_count(), live);
    assert_eq!(site.tree.keys(b).unwrap(), vec!["file1"]);
}
