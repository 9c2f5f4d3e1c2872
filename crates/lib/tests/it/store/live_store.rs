//! MemoryStore through the `LiveStore` trait.

use std::sync::{Arc, Mutex};

use sectioned::{
    KeyPath, LiveStore, MemoryStore, Predicate, SortDescriptor,
    store::{ChangeEvent, FetchRequest},
};

use crate::helpers::*;

#[test]
fn test_fetch_through_trait_object() {
    let memory = setup_store();
    fill_group(&memory, "A", 1, 0, 3);
    fill_group(&memory, "B", 2, 0, 3);
    let store: Arc<dyn LiveStore<Item>> = memory;

    let request = FetchRequest::new(ITEMS)
        .with_predicate(Some(Predicate::new(|i: &Item| i.group == "B")))
        .sorted_by(by_rank().reversed());
    let fetched = store.fetch(&request).unwrap();

    assert_eq!(names(&fetched), vec!["B2", "B1", "B0"]);
    assert!(store.contains_type(ITEMS));
    assert!(!store.contains_type("other"));
}

#[test]
fn test_fetch_unknown_type_fails() {
    let store = setup_store();
    let err = store.fetch(&FetchRequest::new("other")).unwrap_err();
    assert!(err.is_not_found());
    assert!(err.is_store_error());
}

#[test]
fn test_ties_keep_insertion_order() {
    let store = setup_store();
    for name in ["first", "second", "third"] {
        store.insert(ITEMS, item(name, "A", 1, 7)).unwrap();
    }

    let fetched = store
        .fetch(&FetchRequest::new(ITEMS).sorted_by(by_rank()))
        .unwrap();
    assert_eq!(names(&fetched), vec!["first", "second", "third"]);
}

#[test]
fn test_sort_chain_breaks_ties() {
    let store = setup_store();
    store.insert(ITEMS, item("b", "A", 2, 1)).unwrap();
    store.insert(ITEMS, item("a", "A", 1, 1)).unwrap();
    store.insert(ITEMS, item("c", "A", 0, 0)).unwrap();

    let request = FetchRequest::new(ITEMS)
        .sorted_by(by_rank())
        .sorted_by(SortDescriptor::ascending(KeyPath::new(
            "name",
            |i: &Item| i.name.clone(),
        )));
    let fetched = store.fetch(&request).unwrap();
    assert_eq!(names(&fetched), vec!["c", "a", "b"]);
}

#[test]
fn test_listeners_only_see_their_object_type() {
    let store: Arc<MemoryStore<Item>> = Arc::new(MemoryStore::with_types([ITEMS, "archive"]));
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    store
        .subscribe(
            ITEMS,
            Arc::new(move |event: &ChangeEvent| {
                sink.lock().unwrap().push(event.object_type().to_string())
            }),
        )
        .unwrap();

    store.insert(ITEMS, item("a", "A", 1, 0)).unwrap();
    store.insert("archive", item("b", "A", 1, 0)).unwrap();

    assert_eq!(*seen.lock().unwrap(), vec![ITEMS.to_string()]);
}

#[test]
fn test_controllers_on_separate_types_are_independent() {
    let store = Arc::new(MemoryStore::with_types([ITEMS, "archive"]));
    let live = sectioned_controller(&store);
    live.perform_fetch().unwrap();
    let recorder = RecordingDelegate::new();
    live.set_delegate(&recorder);

    store.insert("archive", item("old", "A", 1, 0)).unwrap();
    assert!(recorder.take().is_empty());
    assert!(shape(&live).is_empty());

    store.insert(ITEMS, item("new", "A", 1, 0)).unwrap();
    assert_eq!(recorder.brackets(), 1);
    assert_eq!(shape(&live), vec![("A".to_string(), 1)]);
}

#[test]
fn test_change_events_serialize() {
    let event = ChangeEvent::Bulk {
        object_type: ITEMS.to_string(),
        ids: vec!["r1".into(), "r2".into()],
    };
    let json = serde_json::to_string(&event).unwrap();
    let back: ChangeEvent = serde_json::from_str(&json).unwrap();
    assert_eq!(back, event);
    assert_eq!(back.ids().len(), 2);
}
