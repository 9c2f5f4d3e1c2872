//! Fetching, sections and index-path access.

use sectioned::{
    FetchConfig, IndexPath, KeyPath, Predicate, Record, ResultsController, SortDescriptor,
};

use crate::helpers::*;

#[test]
fn test_accessors_before_fetch_are_absent() {
    let store = setup_store();
    fill_group(&store, "A", 1, 0, 2);
    let controller = sectioned_controller(&store);

    assert!(!controller.is_fetched());
    assert!(controller.fetched_objects().is_none());
    assert!(controller.sections().is_none());
    assert!(controller.section_index_titles().is_empty());
    assert!(
        controller
            .object_at_index_path(IndexPath::new(0, 0))
            .unwrap()
            .is_none()
    );
    assert!(
        controller
            .section_for_section_index_title_at_index(0)
            .unwrap()
            .is_none()
    );
    let record = store.all(ITEMS).unwrap().remove(0);
    assert!(controller.index_path_for_object(&record).is_none());
}

#[test]
fn test_unsectioned_fetch_is_one_section_in_primary_order() {
    let store = setup_store();
    store.insert(ITEMS, item("c", "x", 0, 3)).unwrap();
    store.insert(ITEMS, item("a", "y", 0, 1)).unwrap();
    store.insert(ITEMS, item("b", "x", 0, 2)).unwrap();
    let controller = unsectioned_controller(&store);
    controller.perform_fetch().unwrap();

    let sections = controller.sections().unwrap();
    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0].name(), "");
    assert_eq!(sections[0].index_title(), "");
    assert_eq!(names(sections[0].objects()), vec!["a", "b", "c"]);
    assert_eq!(names(&controller.fetched_objects().unwrap()), vec!["a", "b", "c"]);
    assert!(controller.section_index_titles().is_empty());
}

#[test]
fn test_empty_collection_has_no_sections() {
    let store = setup_store();
    let unsectioned = unsectioned_controller(&store);
    let sectioned = sectioned_controller(&store);
    unsectioned.perform_fetch().unwrap();
    sectioned.perform_fetch().unwrap();

    for controller in [unsectioned, sectioned] {
        assert!(controller.is_fetched());
        assert_eq!(controller.sections().unwrap().len(), 0);
        assert!(controller.fetched_objects().unwrap().is_empty());
        assert!(controller.section_index_titles().is_empty());
        let err = controller
            .object_at_index_path(IndexPath::new(0, 0))
            .unwrap_err();
        assert!(err.is_index_out_of_range());
    }
}

#[test]
fn test_sections_follow_section_sort_with_primary_order_inside() {
    let store = setup_store();
    // Inserted out of order on purpose.
    store.insert(ITEMS, item("b2", "B", 2, 20)).unwrap();
    store.insert(ITEMS, item("a3", "A", 1, 30)).unwrap();
    store.insert(ITEMS, item("b1", "B", 2, 10)).unwrap();
    store.insert(ITEMS, item("c1", "C", 0, 5)).unwrap();
    store.insert(ITEMS, item("a1", "A", 1, 1)).unwrap();
    let controller = sectioned_controller(&store);
    controller.perform_fetch().unwrap();

    assert_eq!(
        shape(&controller),
        vec![
            ("C".to_string(), 1),
            ("A".to_string(), 2),
            ("B".to_string(), 2),
        ]
    );
    let sections = controller.sections().unwrap();
    assert_eq!(names(sections[1].objects()), vec!["a1", "a3"]);
    assert_eq!(names(sections[2].objects()), vec!["b1", "b2"]);

    // The fetched collection keeps primary order.
    assert_eq!(
        names(&controller.fetched_objects().unwrap()),
        vec!["a1", "c1", "b1", "b2", "a3"]
    );
}

#[test]
fn test_concatenated_sections_equal_section_sorted_fetch() {
    let store = setup_store();
    fill_group(&store, "B", 2, 0, 3);
    fill_group(&store, "A", 1, 10, 2);
    fill_group(&store, "C", 3, 5, 4);
    let controller = sectioned_controller(&store);
    controller.perform_fetch().unwrap();

    let concatenated: Vec<Record<Item>> = controller
        .sections()
        .unwrap()
        .iter()
        .flat_map(|s| s.objects().to_vec())
        .collect();

    let mut expected = controller.fetched_objects().unwrap();
    expected.sort_by_key(|r| r.group_rank);
    assert_eq!(concatenated, expected);
}

#[test]
fn test_index_paths_round_trip() {
    let store = setup_store();
    fill_group(&store, "A", 1, 0, 3);
    fill_group(&store, "B", 2, 0, 1);
    fill_group(&store, "C", 3, 0, 2);
    let controller = sectioned_controller(&store);
    controller.perform_fetch().unwrap();

    let sections = controller.sections().unwrap();
    for (section, info) in sections.iter().enumerate() {
        for row in 0..info.number_of_objects() {
            let path = IndexPath::new(section, row);
            let record = controller.object_at_index_path(path).unwrap().unwrap();
            assert_eq!(controller.index_path_for_object(&record), Some(path));
            assert!(record.is_same_object(&info.objects()[row]));
        }
    }
}

#[test]
fn test_index_path_lookup_uses_record_identity() {
    let store = setup_store();
    let ids = fill_group(&store, "A", 1, 0, 2);
    let controller = sectioned_controller(&store);
    controller.perform_fetch().unwrap();

    // Same id, different payload: still the same record.
    let lookalike = Record::new(ids[1].clone(), item("other", "Z", 9, 9));
    assert_eq!(
        controller.index_path_for_object(&lookalike),
        Some(IndexPath::new(0, 1))
    );

    let stranger = Record::new("not-stored", item("A0", "A", 1, 0));
    assert!(controller.index_path_for_object(&stranger).is_none());
}

#[test]
fn test_out_of_range_paths_fail_and_leave_state() {
    let store = setup_store();
    fill_group(&store, "A", 1, 0, 2);
    let controller = sectioned_controller(&store);
    controller.perform_fetch().unwrap();
    let before = shape(&controller);

    let err = controller
        .object_at_index_path(IndexPath::new(1, 0))
        .unwrap_err();
    assert!(err.is_index_out_of_range());
    assert_eq!(err.to_string(), "Section 1 out of range (1 sections)");

    let err = controller
        .object_at_index_path(IndexPath::new(0, 2))
        .unwrap_err();
    assert!(err.is_index_out_of_range());
    assert_eq!(err.module(), "controller");

    assert_eq!(shape(&controller), before);
    assert!(
        controller
            .object_at_index_path(IndexPath::new(0, 1))
            .unwrap()
            .is_some()
    );
}

#[test]
fn test_predicate_filters_results() {
    let store = setup_store();
    fill_group(&store, "A", 1, 0, 4);
    fill_group(&store, "B", 2, 0, 4);
    let config = FetchConfig::builder(store.clone(), ITEMS, by_rank())
        .predicate(Predicate::new(|i: &Item| i.rank % 2 == 0))
        .section_sort_descriptor(by_group_rank())
        .section_name_key_path(group_key_path())
        .build()
        .unwrap();
    let controller = controller_from(config);
    controller.perform_fetch().unwrap();

    assert_eq!(
        shape(&controller),
        vec![("A".to_string(), 2), ("B".to_string(), 2)]
    );
    assert!(controller.predicate().is_some());
}

fn controller_from(config: FetchConfig<Item>) -> ResultsController<Item> {
    ResultsController::new(config).unwrap()
}

#[test]
fn test_descending_sorts() {
    let store = setup_store();
    fill_group(&store, "A", 1, 0, 3);
    fill_group(&store, "B", 2, 0, 1);
    let config = FetchConfig::builder(store.clone(), ITEMS, by_rank().reversed())
        .section_sort_descriptor(by_group_rank().reversed())
        .section_name_key_path(group_key_path())
        .build()
        .unwrap();
    let controller = controller_from(config);
    controller.perform_fetch().unwrap();

    let sections = controller.sections().unwrap();
    assert_eq!(sections[0].name(), "B");
    assert_eq!(names(sections[1].objects()), vec!["A2", "A1", "A0"]);
}

#[test]
fn test_perform_fetch_is_idempotent() {
    let store = setup_store();
    fill_group(&store, "A", 1, 0, 2);
    let controller = sectioned_controller(&store);
    controller.perform_fetch().unwrap();
    let first = shape(&controller);

    controller.perform_fetch().unwrap();
    assert_eq!(shape(&controller), first);
    assert_eq!(store.listener_count(), 1);
}

#[test]
fn test_refetch_picks_up_current_store_contents() {
    let store = setup_store();
    fill_group(&store, "A", 1, 0, 2);
    let controller = sectioned_controller(&store);
    controller.perform_fetch().unwrap();

    // Live updates keep the controller current without a refetch.
    fill_group(&store, "B", 2, 0, 1);
    assert_eq!(
        shape(&controller),
        vec![("A".to_string(), 2), ("B".to_string(), 1)]
    );

    controller.perform_fetch().unwrap();
    assert_eq!(
        shape(&controller),
        vec![("A".to_string(), 2), ("B".to_string(), 1)]
    );
}

#[test]
fn test_configuration_accessors() {
    let store = setup_store();
    let controller = sectioned_controller(&store);

    assert_eq!(controller.object_type(), ITEMS);
    assert!(controller.predicate().is_none());
    assert_eq!(controller.sort_descriptor().key_path().path(), "rank");
    assert_eq!(
        controller
            .section_sort_descriptor()
            .map(|d| d.key_path().path()),
        Some("group_rank")
    );
    assert_eq!(
        controller.section_name_key_path().map(KeyPath::path),
        Some("group")
    );
    assert!(controller.store().contains_type(ITEMS));
    assert!(controller.config().is_sectioned());
}

#[test]
fn test_unknown_object_type_is_a_configuration_error() {
    let store = setup_store();
    let config = FetchConfig::builder(store, "missing", by_rank())
        .build()
        .unwrap();
    let err = ResultsController::new(config).unwrap_err();
    assert!(err.is_configuration_error());
    assert!(err.is_not_found());
}

#[test]
fn test_half_section_configuration_is_rejected() {
    let store = setup_store();
    let err = FetchConfig::builder(store.clone(), ITEMS, by_rank())
        .section_name_key_path(group_key_path())
        .build()
        .unwrap_err();
    assert!(err.is_configuration_error());

    let err = FetchConfig::builder(store, ITEMS, by_rank())
        .section_sort_descriptor(SortDescriptor::ascending(group_key_path()))
        .build()
        .unwrap_err();
    assert!(err.is_configuration_error());
}
