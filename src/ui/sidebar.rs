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

//! Persistent left/right sidebars.
//!
//! Each side is `ABSENT` until its first applied update creates the container
//! next to `#sheld`; later updates replace the content node's children in
//! place. While a generation is running updates are buffered per side, last
//! write wins, and only a later update or [`SidebarRegistry::flush`] with the
//! gate clear applies them.

use super::activation::{MobileRule, activate_initial, apply_interactivity};
use super::dom::{Document, Element, Listener, NodeId};
use crate::error::TrackerError;

/// Id of the host's main chat region the sidebars sit beside.
pub const SHELD_ID: &str = "sheld";

const CONTAINER_STYLE: &str = "position: absolute !important; top: 0 !important; \
    bottom: 0 !important; height: 100% !important; z-index: 999 !important; \
    display: flex !important; flex-direction: column !important; \
    justify-content: center !important; padding: 10px !important;";
const CONTENT_STYLE: &str = "width: auto !important; height: 100% !important; \
    max-width: 300px !important; display: block !important; position: relative !important;";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const ALL: [Self; 2] = [Self::Left, Self::Right];

    #[must_use]
    pub fn container_id(self) -> &'static str {
        match self {
            Self::Left => "sst-global-sidebar-left",
            Self::Right => "sst-global-sidebar-right",
        }
    }

    #[must_use]
    pub fn content_id(self) -> &'static str {
        match self {
            Self::Left => "sst-sidebar-left-content",
            Self::Right => "sst-sidebar-right-content",
        }
    }

    fn edge(self) -> &'static str {
        match self {
            Self::Left => "left: 0 !important;",
            Self::Right => "right: 0 !important;",
        }
    }
}

/// Per-side state: the container node once created, and buffered content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SidebarState {
    pub container: Option<NodeId>,
    pub pending: Option<String>,
}

/// Inputs an update reads from the owning context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SidebarEnv {
    pub generating: bool,
    pub mobile: MobileRule,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarUpdate {
    /// Buffered until the generation gate clears.
    Deferred,
    Created,
    Replaced,
    /// No `#sheld` on the page; nothing was changed.
    MissingAnchor,
}

#[derive(Debug, Clone, Default)]
pub struct SidebarRegistry {
    left: SidebarState,
    right: SidebarState,
}

impl SidebarRegistry {
    #[must_use]
    pub fn state(&self, side: Side) -> &SidebarState {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    fn state_mut(&mut self, side: Side) -> &mut SidebarState {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    #[must_use]
    pub fn pending(&self, side: Side) -> Option<&str> {
        self.state(side).pending.as_deref()
    }

    /// The container for `side`, if it still lives on `page`.
    #[must_use]
    pub fn container(&self, page: &Document, side: Side) -> Option<NodeId> {
        self.state(side).container.filter(|&id| page.is_attached(id))
    }

    #[must_use]
    pub fn content_node(&self, page: &Document, side: Side) -> Option<NodeId> {
        let container = self.container(page, side)?;
        page.find_by_id(container, side.content_id())
    }

    /// The side whose live container is `node`.
    #[must_use]
    pub fn side_for_container(&self, page: &Document, node: NodeId) -> Option<Side> {
        Side::ALL.into_iter().find(|&side| self.container(page, side) == Some(node))
    }

    pub fn update(
        &mut self,
        page: &mut Document,
        side: Side,
        content: String,
        env: SidebarEnv,
    ) -> SidebarUpdate {
        if env.generating {
            tracing::debug!(?side, "generation in progress; buffering sidebar content");
            self.state_mut(side).pending = Some(content);
            return SidebarUpdate::Deferred;
        }
        self.state_mut(side).pending = None;

        if let Some(content_node) = self.content_node(page, side) {
            page.set_inner_html(content_node, &content);
            self.activate(page, side, content_node, env.mobile);
            return SidebarUpdate::Replaced;
        }
        self.create(page, side, &content, env.mobile)
    }

    /// Apply buffered content for `side` when the gate is clear.
    pub fn flush(
        &mut self,
        page: &mut Document,
        side: Side,
        env: SidebarEnv,
    ) -> Option<SidebarUpdate> {
        if env.generating {
            return None;
        }
        let content = self.state_mut(side).pending.take()?;
        tracing::debug!(?side, "applying buffered sidebar content");
        Some(self.update(page, side, content, env))
    }

    /// Remove the side's container and forget it. Buffered content is kept.
    pub fn teardown(&mut self, page: &mut Document, side: Side) -> bool {
        let Some(container) = self.state_mut(side).container.take() else {
            return false;
        };
        if !page.contains(container) {
            return false;
        }
        if let Some(content) = page.find_by_id(container, side.content_id()) {
            page.replace_with_clone(content);
        }
        page.remove_listener(container);
        page.remove(container);
        tracing::info!(?side, "sidebar removed");
        true
    }

    fn create(
        &mut self,
        page: &mut Document,
        side: Side,
        content: &str,
        mobile: MobileRule,
    ) -> SidebarUpdate {
        let Some(sheld) = page.get_element_by_id(SHELD_ID) else {
            let err = TrackerError::MissingAnchor { anchor: format!("#{SHELD_ID}") };
            tracing::warn!(?side, %err, "sidebar not placed");
            return SidebarUpdate::MissingAnchor;
        };

        let container = page.create_element(
            Element::new("div")
                .with_attr("id", side.container_id())
                .with_attr("class", "vertical-container")
                .with_attr("style", &format!("{} {CONTAINER_STYLE}", side.edge())),
        );
        let content_node = page.create_element(
            Element::new("div")
                .with_attr("id", side.content_id())
                .with_attr("style", CONTENT_STYLE),
        );
        page.append_child(container, content_node);
        page.set_inner_html(content_node, content);
        page.add_listener(container, Listener::TabClick);

        if page.parent(sheld).is_some() {
            page.insert_before(sheld, container);
        } else {
            let root = page.root();
            page.append_child(root, container);
        }
        self.state_mut(side).container = Some(container);
        tracing::info!(?side, "sidebar created");

        self.activate(page, side, content_node, mobile);
        SidebarUpdate::Created
    }

    fn activate(&self, page: &mut Document, side: Side, content_node: NodeId, mobile: MobileRule) {
        activate_initial(page, content_node);
        if let Some(container) = self.container(page, side) {
            apply_interactivity(page, container, true, mobile);
        }
    }
}
