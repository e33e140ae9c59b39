// =====
// TESTS: 13
// =====
//
// End-to-end render pipeline: extraction, parsing, reconciliation and
// inline placement through the public `Tracker` entry points.

use pretty_assertions::assert_eq;
use sim_tracker::app::{RenderOutcome, Settings};
use sim_tracker::ui::Position;

use crate::helpers::{
    CONTAINER, DIVIDER, card_fields, class_count, containers_in, settings, setup, text_node,
    with_block,
};

const LEGACY: &str = r#"{"current_date": "Day 1", "current_time": "Noon", "Alice": {"health": 1, "last_react": "smile"}}"#;

fn card_names(page: &sim_tracker::ui::Document, id: usize) -> Vec<String> {
    let text = text_node(page, id);
    page.find_all_by_class(text, "sim-tracker-card")
        .into_iter()
        .filter_map(|card| page.attr(card, "data-character").map(str::to_owned))
        .collect()
}

#[test]
fn legacy_block_renders_one_card_below() {
    let text = with_block("Hi there", LEGACY);
    let (mut tracker, host, mut page) = setup(Settings::default(), &[&text]);

    let outcome = tracker.render_tracker(&mut page, &host, 0);
    assert_eq!(outcome, RenderOutcome::Rendered(Position::Below));

    let node = text_node(&page, 0);
    assert_eq!(containers_in(&page, node), 1);
    assert_eq!(card_names(&page, 0), ["Alice"]);
    assert!(page.text_content(node).contains("Hi there"));
    assert_eq!(card_fields(&page, 0, "sim-tracker-date"), ["Day 1 · Noon"]);
    assert_eq!(card_fields(&page, 0, "sim-tracker-health"), ["🤕"]);
    assert_eq!(card_fields(&page, 0, "sim-tracker-reaction"), ["😊"]);
    assert_eq!(tracker.last_sim_block(), Some(LEGACY));
}

#[test]
fn rendering_twice_leaves_one_container_and_divider() {
    let text = with_block("Hi", LEGACY);
    let (mut tracker, host, mut page) = setup(Settings::default(), &[&text]);
    tracker.render_tracker(&mut page, &host, 0);
    let first = page.inner_html(text_node(&page, 0));
    tracker.render_tracker(&mut page, &host, 0);

    let node = text_node(&page, 0);
    assert_eq!(containers_in(&page, node), 1);
    assert_eq!(class_count(&page, node, DIVIDER), 1);
    assert_eq!(page.inner_html(node), first);
}

#[test]
fn yaml_block_is_accepted() {
    let yaml = "current_date: Day 2\nBob:\n  health: 2\n  relationshipStatus: Rival";
    let text = with_block("Prose", yaml);
    let (mut tracker, host, mut page) = setup(Settings::default(), &[&text]);

    let outcome = tracker.render_tracker(&mut page, &host, 0);
    assert_eq!(outcome, RenderOutcome::Rendered(Position::Below));
    assert_eq!(card_fields(&page, 0, "sim-tracker-name"), ["Bob"]);
    assert_eq!(card_fields(&page, 0, "sim-tracker-health"), ["💀"]);
    assert_eq!(card_fields(&page, 0, "sim-tracker-relationship"), ["Rival"]);
    assert_eq!(card_fields(&page, 0, "sim-tracker-date"), ["Day 2 · Unknown Time"]);
}

#[test]
fn legacy_characters_keep_source_order() {
    let body = r#"{"Zed": {"health": 0}, "current_date": "D", "Amy": {"health": 0}, "Bo": {"x": 1}}"#;
    let text = with_block("", body);
    let (mut tracker, host, mut page) = setup(Settings::default(), &[&text]);
    tracker.render_tracker(&mut page, &host, 0);
    assert_eq!(card_names(&page, 0), ["Zed", "Amy", "Bo"]);
}

#[test]
fn current_shape_renders_characters_as_given() {
    let body = r#"{"worldData": {"current_date": "Day 3", "current_time": "Dusk"},
"characters": [{"name": "Alice", "health": 2}, {"name": "Bob", "thought": "hm"}]}"#;
    let text = with_block("", body);
    let (mut tracker, host, mut page) = setup(Settings::default(), &[&text]);
    tracker.render_tracker(&mut page, &host, 0);
    assert_eq!(card_names(&page, 0), ["Alice", "Bob"]);
    assert_eq!(card_fields(&page, 0, "sim-tracker-date"), ["Day 3 · Dusk", "Day 3 · Dusk"]);
    assert_eq!(card_fields(&page, 0, "sim-tracker-thought"), ["No thought recorded.", "hm"]);
}

#[test]
fn hidden_source_block_is_not_mistaken_for_cards() {
    let body = r#"{"worldData": {"current_date": "Day 3"}, "characters": [{"name": "Bob"}]}"#;
    let text = with_block("", body);
    let (mut tracker, host, mut page) = setup(Settings::default(), &[&text]);

    let outcome = tracker.render_tracker(&mut page, &host, 0);
    assert_eq!(outcome, RenderOutcome::Rendered(Position::Below));
    assert!(page.text_content(text_node(&page, 0)).contains("Day 3"));
    assert!(card_fields(&page, 0, "sim-tracker-date").is_empty());
    assert_eq!(containers_in(&page, text_node(&page, 0)), 1);
}

#[test]
fn malformed_block_shows_exactly_one_error_marker() {
    let text = with_block("Broken", "{not valid: [");
    let (mut tracker, host, mut page) = setup(Settings::default(), &[&text]);

    assert_eq!(tracker.render_tracker(&mut page, &host, 0), RenderOutcome::ParseFailed);
    tracker.render_tracker(&mut page, &host, 0);

    let node = text_node(&page, 0);
    assert_eq!(class_count(&page, node, "sst-parse-error"), 1);
    assert_eq!(containers_in(&page, node), 0);
    assert!(page.text_content(node).contains("Invalid tracker data format in code block."));
}

#[test]
fn non_object_root_aborts_without_marker() {
    let text = with_block("List", "[1, 2, 3]");
    let (mut tracker, host, mut page) = setup(Settings::default(), &[&text]);

    assert_eq!(tracker.render_tracker(&mut page, &host, 0), RenderOutcome::InvalidShape);
    let node = text_node(&page, 0);
    assert_eq!(class_count(&page, node, "sst-parse-error"), 0);
    assert_eq!(containers_in(&page, node), 0);
}

#[test]
fn message_without_block_is_only_reformatted() {
    let (mut tracker, host, mut page) = setup(Settings::default(), &["Just *talking*"]);
    assert_eq!(tracker.render_tracker(&mut page, &host, 0), RenderOutcome::NoBlock);
    let node = text_node(&page, 0);
    assert_eq!(page.inner_html(node).trim(), "<p>Just <em>talking</em></p>");
    assert_eq!(tracker.last_sim_block(), None);
}

#[test]
fn disabled_tracker_leaves_page_untouched() {
    let text = with_block("Hi", LEGACY);
    let settings = Settings { is_enabled: false, ..Settings::default() };
    let (mut tracker, host, mut page) = setup(settings, &[&text]);
    let before = page.inner_html(page.root());

    assert_eq!(tracker.render_tracker(&mut page, &host, 0), RenderOutcome::Disabled);
    assert_eq!(page.inner_html(page.root()), before);
}

#[test]
fn unknown_message_is_a_no_op() {
    let (mut tracker, host, mut page) = setup(Settings::default(), &["hello"]);
    let before = page.inner_html(page.root());
    assert_eq!(tracker.render_tracker(&mut page, &host, 7), RenderOutcome::MissingMessage);
    assert_eq!(page.inner_html(page.root()), before);
}

#[test]
fn preparing_placeholder_clears_when_a_block_arrives() {
    let text = with_block("Hi", LEGACY);
    let (mut tracker, host, mut page) = setup(Settings::default(), &["no block yet", &text]);

    assert!(tracker.mark_preparing(&mut page, 0));
    assert!(tracker.mark_preparing(&mut page, 1));
    assert!(!tracker.mark_preparing(&mut page, 1));

    tracker.render_tracker(&mut page, &host, 0);
    tracker.render_tracker(&mut page, &host, 1);

    assert!(tracker.is_preparing(&page, 0));
    assert!(!tracker.is_preparing(&page, 1));
    let root = page.root();
    assert_eq!(class_count(&page, root, "sst-preparing-text"), 1);
}

#[test]
fn refresh_rerenders_only_messages_with_blocks() {
    let first = with_block("one", LEGACY);
    let second = with_block("two", r#"{"Bea": {"health": 0}}"#);
    let (mut tracker, host, mut page) =
        setup(settings("BELOW"), &[&first, "plain reply", &second]);

    let outcomes = tracker.refresh_all_cards(&mut page, &host);
    assert_eq!(
        outcomes,
        [
            (0, RenderOutcome::Rendered(Position::Below)),
            (2, RenderOutcome::Rendered(Position::Below)),
        ]
    );
    tracker.refresh_all_cards(&mut page, &host);

    let root = page.root();
    assert_eq!(page.find_all_by_id(root, CONTAINER).len(), 2);
    assert_eq!(containers_in(&page, text_node(&page, 1)), 0);
    assert_eq!(card_names(&page, 2), ["Bea"]);
}
