//! Section index titles and title-to-section lookup.

use std::sync::Arc;

use sectioned::{ResultsController, ResultsDelegate};

use crate::helpers::*;

#[test]
fn test_default_titles_are_uppercased_initials() {
    let store = setup_store();
    fill_group(&store, "apples", 1, 0, 1);
    fill_group(&store, "avocados", 2, 0, 1);
    fill_group(&store, "bananas", 3, 0, 1);
    fill_group(&store, "cherries", 4, 0, 1);
    let controller = sectioned_controller(&store);
    controller.perform_fetch().unwrap();

    let titles: Vec<_> = controller
        .sections()
        .unwrap()
        .iter()
        .map(|s| s.index_title().to_string())
        .collect();
    assert_eq!(titles, vec!["A", "A", "B", "C"]);
    assert_eq!(controller.section_index_titles(), vec!["A", "B", "C"]);
}

#[test]
fn test_title_positions_map_to_first_matching_section() {
    let store = setup_store();
    fill_group(&store, "apples", 1, 0, 1);
    fill_group(&store, "avocados", 2, 0, 1);
    fill_group(&store, "bananas", 3, 0, 1);
    fill_group(&store, "blueberries", 4, 0, 1);
    fill_group(&store, "cherries", 5, 0, 1);
    let controller = sectioned_controller(&store);
    controller.perform_fetch().unwrap();

    let expected = [Some(0), Some(2), Some(4)];
    for (i, section) in expected.iter().enumerate() {
        assert_eq!(
            controller.section_for_section_index_title_at_index(i).unwrap(),
            *section
        );
    }

    let sections = controller.sections().unwrap();
    for (i, title) in controller.section_index_titles().iter().enumerate() {
        let section = controller
            .section_for_section_index_title_at_index(i)
            .unwrap()
            .unwrap();
        assert_eq!(sections[section].index_title(), title);
    }
}

#[test]
fn test_unnamed_section_has_no_title_entry() {
    let store = setup_store();
    fill_group(&store, "", 1, 0, 2);
    fill_group(&store, "red", 2, 0, 1);
    let controller = sectioned_controller(&store);
    controller.perform_fetch().unwrap();

    assert_eq!(names_of_sections(&controller), vec!["", "red"]);
    assert_eq!(controller.section_index_titles(), vec!["R"]);
    assert_eq!(
        controller.section_for_section_index_title_at_index(0).unwrap(),
        Some(1)
    );
}

fn names_of_sections(controller: &ResultsController<Item>) -> Vec<String> {
    controller
        .sections()
        .unwrap()
        .iter()
        .map(|s| s.name().to_string())
        .collect()
}

#[test]
fn test_title_index_out_of_range() {
    let store = setup_store();
    fill_group(&store, "apples", 1, 0, 1);
    let controller = sectioned_controller(&store);
    controller.perform_fetch().unwrap();

    let err = controller
        .section_for_section_index_title_at_index(1)
        .unwrap_err();
    assert!(err.is_index_out_of_range());
    assert_eq!(controller.section_index_titles(), vec!["A"]);
}

#[test]
fn test_title_for_section_name_without_delegate() {
    let store = setup_store();
    let controller = sectioned_controller(&store);

    assert_eq!(controller.section_index_title_for_section_name("pears"), "P");
    assert_eq!(controller.section_index_title_for_section_name(""), "");
}

/// Titles sections by their full name in brackets, except `"misc"`.
struct BracketTitles;

impl ResultsDelegate<Item> for BracketTitles {
    fn section_index_title_for_section_name(
        &self,
        _controller: &ResultsController<Item>,
        name: &str,
    ) -> Option<String> {
        (name != "misc").then(|| format!("[{name}]"))
    }
}

#[test]
fn test_delegate_overrides_titles() {
    let store = setup_store();
    fill_group(&store, "apples", 1, 0, 1);
    fill_group(&store, "misc", 2, 0, 1);
    let controller = sectioned_controller(&store);
    let delegate = Arc::new(BracketTitles);
    controller.set_delegate(&delegate);
    controller.perform_fetch().unwrap();

    assert_eq!(controller.section_index_titles(), vec!["[apples]", "M"]);
    assert_eq!(
        controller.section_index_title_for_section_name("kiwis"),
        "[kiwis]"
    );

    // Titles of sections added later go through the delegate as well.
    fill_group(&store, "oranges", 3, 0, 1);
    assert_eq!(
        controller.section_index_titles(),
        vec!["[apples]", "M", "[oranges]"]
    );
}

#[test]
fn test_titles_follow_changes() {
    let store = setup_store();
    let apples = fill_group(&store, "apples", 1, 0, 1);
    fill_group(&store, "bananas", 2, 0, 1);
    let controller = sectioned_controller(&store);
    controller.perform_fetch().unwrap();
    assert_eq!(controller.section_index_titles(), vec!["A", "B"]);

    store.delete(ITEMS, &apples[0]).unwrap();
    assert_eq!(controller.section_index_titles(), vec!["B"]);
    assert_eq!(
        controller.section_for_section_index_title_at_index(0).unwrap(),
        Some(0)
    );
}
