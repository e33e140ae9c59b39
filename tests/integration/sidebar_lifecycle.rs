// =====
// TESTS: 8
// =====
//
// Sidebar lifecycle through the tracker: lazy creation, in-place updates,
// buffering behind the generation gate, teardown and missing anchors.

use pretty_assertions::assert_eq;
use sim_tracker::app::{RenderOutcome, Tracker, TranscriptHost};
use sim_tracker::ui::dom::{Listener, NodeId};
use sim_tracker::ui::{Document, Position, Side, SidebarUpdate};

use crate::helpers::{
    containers_in, message, settings, setup, sidebar, sidebar_text, tabbed_settings, text_node,
    with_block,
};

fn roster(name: &str) -> String {
    with_block("reply", &format!(r#"{{"{name}": {{"health": 0}}}}"#))
}

#[test]
fn first_render_creates_sidebar_before_main_region() {
    let text = roster("Alice");
    let (mut tracker, host, mut page) = setup(settings("RIGHT"), &[&text]);

    let outcome = tracker.render_tracker(&mut page, &host, 0);
    assert_eq!(outcome, RenderOutcome::Rendered(Position::Right));

    let container = sidebar(&page, "right").unwrap();
    let sheld = page.get_element_by_id("sheld").unwrap();
    let root = page.root();
    assert_eq!(page.children(root), [container, sheld]);
    assert_eq!(page.listener(container), Some(Listener::TabClick));
    assert!(sidebar_text(&page, "right").contains("Alice"));
    assert_eq!(containers_in(&page, text_node(&page, 0)), 0);
    assert!(sidebar(&page, "left").is_none());
}

#[test]
fn later_renders_replace_content_in_place() {
    let (first, second) = (roster("Alice"), roster("Bob"));
    let (mut tracker, host, mut page) = setup(settings("LEFT"), &[&first, &second]);

    tracker.render_tracker(&mut page, &host, 0);
    let container = sidebar(&page, "left").unwrap();
    tracker.render_tracker(&mut page, &host, 1);

    assert_eq!(sidebar(&page, "left"), Some(container));
    let root = page.root();
    assert_eq!(page.find_all_by_id(root, "sst-global-sidebar-left").len(), 1);
    let text = sidebar_text(&page, "left");
    assert!(text.contains("Bob"));
    assert!(!text.contains("Alice"));
}

#[test]
fn gated_renders_buffer_the_latest_content_only() {
    let (v0, v1, v2) = (roster("Ann"), roster("Ben"), roster("Cal"));
    let (mut tracker, host, mut page) = setup(settings("RIGHT"), &[&v0, &v1, &v2]);
    tracker.render_tracker(&mut page, &host, 0);

    let guard = tracker.begin_generation().unwrap();
    let deferred = RenderOutcome::Deferred(Side::Right);
    assert_eq!(tracker.render_tracker(&mut page, &host, 1), deferred);
    assert_eq!(tracker.render_tracker(&mut page, &host, 2), deferred);
    assert!(sidebar_text(&page, "right").contains("Ann"));
    assert!(tracker.flush_pending_sidebars(&mut page).is_empty());
    drop(guard);

    // Clearing the gate does not apply anything by itself.
    assert!(sidebar_text(&page, "right").contains("Ann"));
    assert!(tracker.sidebars().pending(Side::Right).is_some_and(|p| p.contains("Cal")));

    let flushed = tracker.flush_pending_sidebars(&mut page);
    assert_eq!(flushed, [(Side::Right, SidebarUpdate::Replaced)]);
    let text = sidebar_text(&page, "right");
    assert!(text.contains("Cal"));
    assert!(!text.contains("Ben"));
    assert_eq!(tracker.sidebars().pending(Side::Right), None);
}

#[test]
fn first_render_after_gate_flushes_before_rendering() {
    let (v0, v1) = (roster("Ann"), roster("Ben"));
    let (mut tracker, host, mut page) = setup(settings("RIGHT"), &[&v0, &v1]);

    {
        let _guard = tracker.begin_generation().unwrap();
        tracker.update_sidebar(&mut page, Side::Left, "<p>buffered left</p>".to_owned());
        tracker.render_tracker(&mut page, &host, 1);
        assert!(sidebar(&page, "left").is_none());
    }
    tracker.render_tracker(&mut page, &host, 0);

    assert_eq!(sidebar_text(&page, "left"), "buffered left");
    assert!(sidebar_text(&page, "right").contains("Ann"));
    assert_eq!(tracker.sidebars().pending(Side::Right), None);
}

#[test]
fn teardown_removes_both_sidebars_and_allows_recreation() {
    let text = roster("Alice");
    let (mut tracker, host, mut page) = setup(settings("RIGHT"), &[&text]);
    tracker.render_tracker(&mut page, &host, 0);
    tracker.update_sidebar(&mut page, Side::Left, "<p>left</p>".to_owned());
    let right = sidebar(&page, "right").unwrap();

    tracker.remove_global_sidebars(&mut page);
    assert!(sidebar(&page, "left").is_none());
    assert!(sidebar(&page, "right").is_none());
    assert_eq!(page.listener(right), None);

    let outcome = tracker.render_tracker(&mut page, &host, 0);
    assert_eq!(outcome, RenderOutcome::Rendered(Position::Right));
    assert!(sidebar(&page, "right").is_some());
}

#[test]
fn missing_main_region_skips_sidebar_without_mutation() {
    let text = roster("Alice");
    let host = TranscriptHost::new(vec![message(&text)]);
    let mut page = Document::from_html(
        r#"<div id="chat"><div class="mes" mesid="0"><div class="mes_text"></div></div></div>"#,
    );
    let mut tracker = Tracker::new(settings("LEFT")).unwrap();

    assert_eq!(tracker.render_tracker(&mut page, &host, 0), RenderOutcome::Skipped);
    assert!(sidebar(&page, "left").is_none());
    let root = page.root();
    assert_eq!(page.children(root).len(), 1);
}

#[test]
fn refresh_updates_sidebar_from_newest_message() {
    let (old, plain, new) = (roster("Old"), "no data".to_owned(), roster("New"));
    let (mut tracker, host, mut page) = setup(settings("LEFT"), &[&old, &plain, &new]);

    let outcomes = tracker.refresh_all_cards(&mut page, &host);
    let ids: Vec<usize> = outcomes.iter().map(|(id, _)| *id).collect();
    assert_eq!(ids, [0, 2, 2]);
    let text = sidebar_text(&page, "left");
    assert!(text.contains("New"));
    assert!(!text.contains("Old"));
}

#[test]
fn tabbed_sidebar_activates_first_active_character() {
    let body = r#"{"Ann": {"inactive": true}, "Ben": {"health": 0}, "Cal": {"health": 0}}"#;
    let text = with_block("reply", body);
    let (mut tracker, host, mut page) = setup(tabbed_settings("RIGHT"), &[&text]);
    tracker.render_tracker(&mut page, &host, 0);

    let content = tracker.sidebars().content_node(&page, Side::Right).unwrap();
    let tabs = page.find_all_by_class(content, "sim-tracker-tab");
    let cards = page.find_all_by_class(content, "sim-tracker-card");
    let active = |nodes: &[NodeId]| -> Vec<usize> {
        nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| page.has_class(**node, "active"))
            .map(|(i, _)| i)
            .collect()
    };
    assert_eq!(active(&tabs), [1]);
    assert_eq!(active(&cards), [1]);
}
