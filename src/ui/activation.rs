// sim-tracker - Status tracker cards for chat messages
// Copyright (C) 2025  Simon Peter Rothgang
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use super::dom::{Document, NodeId};
use super::template::{CARD_CLASS, NARRATIVE_INACTIVE_CLASS, TAB_CLASS};

pub const ACTIVE_CLASS: &str = "active";
pub const INACTIVE_MOBILE_CLASS: &str = "sst-inactive-mobile";
const TRANSITION_CLASSES: &[&str] = &[ACTIVE_CLASS, "sliding-in", "sliding-out"];

/// Which tab/card pair under a content root is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationState {
    Closed,
    Open(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The click did not land inside a tab.
    Ignored,
    Opened(usize),
    /// The clicked tab was already open; everything is now closed.
    Closed(usize),
}

/// Viewport rule deciding whether the mobile interactivity modifier applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MobileRule {
    pub viewport_width: u32,
    pub breakpoint: u32,
}

impl MobileRule {
    #[must_use]
    pub fn new(viewport_width: u32, breakpoint: u32) -> Self {
        Self { viewport_width, breakpoint }
    }

    #[must_use]
    pub fn is_mobile(self) -> bool {
        self.viewport_width <= self.breakpoint
    }
}

fn tabs_and_cards(page: &Document, root: NodeId) -> (Vec<NodeId>, Vec<NodeId>) {
    (page.find_all_by_class(root, TAB_CLASS), page.find_all_by_class(root, CARD_CLASS))
}

fn set_active(page: &mut Document, tabs: &[NodeId], cards: &[NodeId], index: usize) {
    for node in [tabs.get(index), cards.get(index)].into_iter().flatten() {
        page.add_class(*node, ACTIVE_CLASS);
    }
}

/// Reset every pair under `root`, then open the first card not flagged
/// inactive, or the first card when all are. Returns the opened index.
pub fn activate_initial(page: &mut Document, root: NodeId) -> Option<usize> {
    let (tabs, cards) = tabs_and_cards(page, root);
    if tabs.is_empty() || cards.is_empty() {
        return None;
    }
    for &node in tabs.iter().chain(&cards) {
        for class in TRANSITION_CLASSES {
            page.remove_class(node, class);
        }
    }
    let index = cards
        .iter()
        .position(|&card| !page.has_class(card, NARRATIVE_INACTIVE_CLASS))
        .unwrap_or(0);
    set_active(page, &tabs, &cards, index);
    Some(index)
}

/// Toggle the tab containing `target` within `root`.
pub fn handle_tab_click(page: &mut Document, root: NodeId, target: NodeId) -> ClickOutcome {
    let Some(tab) = page.closest_by_class(target, TAB_CLASS) else {
        return ClickOutcome::Ignored;
    };
    if !page.is_inclusive_ancestor(root, tab) {
        return ClickOutcome::Ignored;
    }
    let (tabs, cards) = tabs_and_cards(page, root);
    let Some(index) = tabs.iter().position(|&t| t == tab) else {
        return ClickOutcome::Ignored;
    };
    let was_active = page.has_class(tab, ACTIVE_CLASS);

    for &node in tabs.iter().chain(&cards) {
        page.remove_class(node, ACTIVE_CLASS);
    }
    if was_active {
        return ClickOutcome::Closed(index);
    }
    set_active(page, &tabs, &cards, index);
    ClickOutcome::Opened(index)
}

#[must_use]
pub fn activation_state(page: &Document, root: NodeId) -> ActivationState {
    page.find_all_by_class(root, CARD_CLASS)
        .iter()
        .position(|&card| page.has_class(card, ACTIVE_CLASS))
        .map_or(ActivationState::Closed, ActivationState::Open)
}

/// On mobile viewports, mark `container` non-interactive while no card is
/// open. Desktop viewports leave the modifier untouched.
pub fn apply_interactivity(
    page: &mut Document,
    container: NodeId,
    force_active: bool,
    rule: MobileRule,
) {
    if !rule.is_mobile() {
        return;
    }
    let any_open = activation_state(page, container) != ActivationState::Closed;
    if any_open || force_active {
        page.remove_class(container, INACTIVE_MOBILE_CLASS);
    } else {
        page.add_class(container, INACTIVE_MOBILE_CLASS);
    }
}
