/// Gallery chrome: the tag filter bar and the status messages shown in
/// place of cards
use std::collections::BTreeSet;

use super::node::{Action, Element, Node};
use crate::state::tags::TagIndex;

/// One toggle button per indexed tag, in rank order
pub fn filter_bar(index: &TagIndex, selected: &BTreeSet<String>) -> Node {
    let buttons = index.tags().iter().map(|tag| {
        let mut button = Element::button(tag, "filter-btn", Action::ToggleTag(tag.clone()));
        if selected.contains(tag) {
            button = button.class("active");
        }
        Node::from(button)
    });
    Element::row("tag-filters").children(buttons).into()
}

/// Shown when no creator matches the selected tags
pub fn empty_state() -> Node {
    Element::block("gallery-empty")
        .child(Element::block("gallery-message").text("No Creators Found"))
        .child(Element::button("Clear Filters", "gallery-reset", Action::ResetFilters))
        .into()
}

/// Shown instead of the whole gallery when the data files fail to load
pub fn load_failure() -> Node {
    Element::block("gallery-empty")
        .child(Element::block("gallery-error").text("Failed To Load Creator Data"))
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::Creator;

    #[test]
    fn test_filter_bar_marks_active() {
        let creator: Creator =
            serde_json::from_str(r#"{"id": "a", "name": "A", "tags": ["VFX", "AI"]}"#).unwrap();
        let index = TagIndex::build(&[creator]);
        let selected: BTreeSet<String> = ["VFX".to_string()].into_iter().collect();

        let bar = filter_bar(&index, &selected);
        let buttons = bar.find_all("filter-btn");
        assert_eq!(buttons.len(), 2);

        let active: Vec<String> = buttons
            .iter()
            .filter(|b| b.has_class("active"))
            .map(|b| Node::Element((*b).clone()).text_content())
            .collect();
        assert_eq!(active, vec!["VFX".to_string()]);
    }

    #[test]
    fn test_empty_state_resets() {
        let node = empty_state();
        assert_eq!(node.click("gallery-reset"), Some(Action::ResetFilters));
    }
}
