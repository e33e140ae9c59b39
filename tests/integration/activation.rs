// =====
// TESTS: 5
// =====
//
// Delegated tab clicks and the mobile interactivity rule, driven through
// `Tracker::handle_click` on a rendered tabbed sidebar.

use pretty_assertions::assert_eq;
use sim_tracker::app::Tracker;
use sim_tracker::app::TranscriptHost;
use sim_tracker::ui::activation::{ActivationState, INACTIVE_MOBILE_CLASS, activation_state};
use sim_tracker::ui::dom::NodeId;
use sim_tracker::ui::{ClickOutcome, Document, Side};

use crate::helpers::{setup, sidebar, tabbed_settings, with_block};

const BODY: &str = r#"{"Ann": {"health": 0}, "Ben": {"health": 0}, "Cal": {"inactive": true}}"#;

fn rendered(viewport: u32) -> (Tracker, TranscriptHost, Document) {
    let text = with_block("reply", BODY);
    let (mut tracker, host, mut page) = setup(tabbed_settings("LEFT"), &[&text]);
    tracker.set_viewport_width(viewport);
    tracker.render_tracker(&mut page, &host, 0);
    (tracker, host, page)
}

fn content(tracker: &Tracker, page: &Document) -> NodeId {
    tracker.sidebars().content_node(page, Side::Left).unwrap()
}

fn tab(tracker: &Tracker, page: &Document, index: usize) -> NodeId {
    page.find_all_by_class(content(tracker, page), "sim-tracker-tab")[index]
}

#[test]
fn clicking_text_inside_a_tab_switches_cards() {
    let (mut tracker, _host, mut page) = rendered(1280);
    assert_eq!(activation_state(&page, content(&tracker, &page)), ActivationState::Open(0));

    let label = page.children(tab(&tracker, &page, 1))[0];
    assert_eq!(tracker.handle_click(&mut page, label), ClickOutcome::Opened(1));
    assert_eq!(activation_state(&page, content(&tracker, &page)), ActivationState::Open(1));
}

#[test]
fn clicking_the_open_tab_closes_everything() {
    let (mut tracker, _host, mut page) = rendered(1280);
    let first = tab(&tracker, &page, 0);
    assert_eq!(tracker.handle_click(&mut page, first), ClickOutcome::Closed(0));
    assert_eq!(activation_state(&page, content(&tracker, &page)), ActivationState::Closed);
}

#[test]
fn clicks_outside_tabs_and_sidebars_are_ignored() {
    let (mut tracker, _host, mut page) = rendered(1280);
    let card = page.find_first_by_class(content(&tracker, &page), "sim-tracker-card").unwrap();
    assert_eq!(tracker.handle_click(&mut page, card), ClickOutcome::Ignored);

    let chat = page.get_element_by_id("chat").unwrap();
    assert_eq!(tracker.handle_click(&mut page, chat), ClickOutcome::Ignored);
    assert_eq!(activation_state(&page, content(&tracker, &page)), ActivationState::Open(0));
}

#[test]
fn handler_survives_content_replacement() {
    let (mut tracker, host, mut page) = rendered(1280);
    tracker.render_tracker(&mut page, &host, 0);
    tracker.render_tracker(&mut page, &host, 0);

    let third = tab(&tracker, &page, 2);
    assert_eq!(tracker.handle_click(&mut page, third), ClickOutcome::Opened(2));
    assert_eq!(activation_state(&page, content(&tracker, &page)), ActivationState::Open(2));
}

#[test]
fn mobile_sidebar_goes_inert_only_while_closed() {
    let (mut tracker, host, mut page) = rendered(600);
    let container = sidebar(&page, "left").unwrap();
    assert!(!page.has_class(container, INACTIVE_MOBILE_CLASS));

    let first = tab(&tracker, &page, 0);
    tracker.handle_click(&mut page, first);
    assert!(page.has_class(container, INACTIVE_MOBILE_CLASS));

    let second = tab(&tracker, &page, 1);
    tracker.handle_click(&mut page, second);
    assert!(!page.has_class(container, INACTIVE_MOBILE_CLASS));

    tracker.handle_click(&mut page, second);
    assert!(page.has_class(container, INACTIVE_MOBILE_CLASS));
    tracker.render_tracker(&mut page, &host, 0);
    assert!(!page.has_class(container, INACTIVE_MOBILE_CLASS));
}
