// =====
// TESTS: 7
// =====
//
// Placement dispatch through full renders: ABOVE / BELOW / MACRO anchors,
// template position markers and the no-op cases.

use pretty_assertions::assert_eq;
use sim_tracker::app::{RenderOutcome, Settings};
use sim_tracker::ui::Position;

use crate::helpers::{CONTAINER, DIVIDER, containers_in, settings, setup, text_node, with_block};

const BODY: &str = r#"{"Alice": {"health": 0}}"#;

#[test]
fn above_goes_before_reasoning_details() {
    let prose = "<details class=\"mes_reasoning_details\">thinking</details>\n\nHello";
    let text = with_block(prose, BODY);
    let (mut tracker, host, mut page) = setup(settings("ABOVE"), &[&text]);

    let outcome = tracker.render_tracker(&mut page, &host, 0);
    assert_eq!(outcome, RenderOutcome::Rendered(Position::Above));

    let node = text_node(&page, 0);
    let children = page.children(node);
    assert_eq!(page.attr(children[0], "id"), Some(CONTAINER));
    assert!(page.has_class(children[1], DIVIDER));
    assert!(page.has_class(children[2], "mes_reasoning_details"));
}

#[test]
fn above_without_reasoning_goes_first() {
    let text = with_block("Hello", BODY);
    let (mut tracker, host, mut page) = setup(settings("ABOVE"), &[&text]);
    tracker.render_tracker(&mut page, &host, 0);
    tracker.render_tracker(&mut page, &host, 0);

    let node = text_node(&page, 0);
    let children = page.children(node);
    assert_eq!(page.attr(children[0], "id"), Some(CONTAINER));
    assert!(page.has_class(children[1], DIVIDER));
    assert_eq!(containers_in(&page, node), 1);
}

#[test]
fn below_puts_divider_then_cards_last() {
    let text = with_block("Hello", BODY);
    let (mut tracker, host, mut page) = setup(settings("BOTTOM"), &[&text]);
    tracker.render_tracker(&mut page, &host, 0);

    let node = text_node(&page, 0);
    let children = page.children(node);
    let [.., divider, container] = children else {
        panic!("expected at least two children");
    };
    assert!(page.has_class(*divider, DIVIDER));
    assert_eq!(page.attr(*container, "id"), Some(CONTAINER));
}

#[test]
fn macro_replaces_placeholder_on_every_render() {
    let prose = "Before\n\n<div id=\"sst-macro-placeholder\"></div>\n\nAfter";
    let text = with_block(prose, BODY);
    let (mut tracker, host, mut page) = setup(settings("MACRO"), &[&text]);

    let outcome = tracker.render_tracker(&mut page, &host, 0);
    assert_eq!(outcome, RenderOutcome::Rendered(Position::Macro));
    tracker.render_tracker(&mut page, &host, 0);

    let node = text_node(&page, 0);
    assert_eq!(containers_in(&page, node), 1);
    assert!(page.find_by_id(node, "sst-macro-placeholder").is_none());
    assert_eq!(page.find_all_by_class(node, DIVIDER).len(), 0);
}

#[test]
fn macro_without_placeholder_changes_nothing_further() {
    let text = with_block("No macro here", BODY);
    let (mut tracker, host, mut page) = setup(settings("MACRO"), &[&text]);

    assert_eq!(tracker.render_tracker(&mut page, &host, 0), RenderOutcome::Skipped);
    assert_eq!(containers_in(&page, text_node(&page, 0)), 0);
}

#[test]
fn unknown_position_falls_back_to_below() {
    let text = with_block("Hello", BODY);
    let (mut tracker, host, mut page) = setup(settings("SIDEWAYS"), &[&text]);
    assert_eq!(tracker.position(), Position::Below);
    let outcome = tracker.render_tracker(&mut page, &host, 0);
    assert_eq!(outcome, RenderOutcome::Rendered(Position::Below));
}

#[test]
fn template_marker_overrides_configured_position() {
    let settings = Settings {
        custom_template_html: "<!-- POSITION: ABOVE -->\n<div class=\"card\"></div>".to_owned(),
        ..settings("BOTTOM")
    };
    let text = with_block("Hello", BODY);
    let (mut tracker, host, mut page) = setup(settings, &[&text]);

    assert_eq!(tracker.position(), Position::Above);
    tracker.render_tracker(&mut page, &host, 0);
    let node = text_node(&page, 0);
    assert_eq!(page.attr(page.children(node)[0], "id"), Some(CONTAINER));
}
