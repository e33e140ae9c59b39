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

//! The tracker context the host drives.
//!
//! [`Tracker`] owns every piece of state that outlives one render: settings,
//! the template and helper collaborators, both sidebars, the generation gate
//! and the set of messages showing a "preparing" placeholder. All entry points
//! take the page explicitly and never return render failures as errors; they
//! log and report a [`RenderOutcome`] instead.

mod gate;
pub mod host;
mod settings;

pub use gate::{GenerationGate, GenerationGuard};
pub use host::{ChatHost, ChatMessage, TranscriptHost, build_chat_page};
pub use settings::{Settings, default_settings_path, load as load_settings};

use std::collections::HashSet;

use crate::error::TrackerError;
use crate::tracker::model::reconcile;
use crate::tracker::project::project;
use crate::tracker::{BlockExtractor, ProjectionContext, format};
use crate::ui::activation::{ClickOutcome, MobileRule, apply_interactivity, handle_tab_click};
use crate::ui::dom::{Adjacent, Document, Listener, NodeId};
use crate::ui::placement::{self, PlaceOutcome, Position};
use crate::ui::sidebar::{Side, SidebarEnv, SidebarRegistry, SidebarUpdate};
use crate::ui::template::{BuiltinTemplates, CONTAINER_ID, TemplateSet, render_cards};
use crate::ui::theme::{DefaultHelpers, Helpers, PARSE_ERROR_HTML};

pub const PREPARING_CLASS: &str = "sst-preparing-text";
const PREPARING_HTML: &str =
    r#"<div class="sst-preparing-text" style="font-style: italic; opacity: 0.7;">Preparing new tracker cards...</div>"#;
pub const DEFAULT_VIEWPORT_WIDTH: u32 = 1280;
const PREVIEW_CHARS: usize = 200;

/// What a render entry point did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    Disabled,
    /// No such message, or no `.mes_text` for it on the page.
    MissingMessage,
    /// The message text was reformatted but carries no tracker block.
    NoBlock,
    /// Neither JSON nor YAML; an inline error marker was added.
    ParseFailed,
    InvalidShape,
    NoCharacters,
    Rendered(Position),
    /// Sidebar content was buffered behind the generation gate.
    Deferred(Side),
    /// Nothing to place into: no macro placeholder or no sidebar anchor.
    Skipped,
}

pub struct Tracker {
    settings: Settings,
    extractor: BlockExtractor,
    templates: Box<dyn TemplateSet>,
    helpers: Box<dyn Helpers>,
    sidebars: SidebarRegistry,
    gate: GenerationGate,
    preparing: HashSet<NodeId>,
    last_sim_block: Option<String>,
    viewport_width: u32,
}

impl Tracker {
    /// A tracker using the built-in templates and helpers.
    pub fn new(settings: Settings) -> Result<Self, TrackerError> {
        let templates = BuiltinTemplates::from_settings(&settings);
        Self::with_collaborators(settings, Box::new(templates), Box::new(DefaultHelpers))
    }

    pub fn with_collaborators(
        settings: Settings,
        templates: Box<dyn TemplateSet>,
        helpers: Box<dyn Helpers>,
    ) -> Result<Self, TrackerError> {
        let extractor = BlockExtractor::new(&settings.code_block_identifier).map_err(|e| {
            TrackerError::SettingsUnreadable { reason: format!("codeBlockIdentifier: {e}") }
        })?;
        Ok(Self {
            settings,
            extractor,
            templates,
            helpers,
            sidebars: SidebarRegistry::default(),
            gate: GenerationGate::new(),
            preparing: HashSet::new(),
            last_sim_block: None,
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
        })
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub fn sidebars(&self) -> &SidebarRegistry {
        &self.sidebars
    }

    #[must_use]
    pub fn position(&self) -> Position {
        self.templates.position()
    }

    /// Raw text of the most recently extracted tracker block.
    #[must_use]
    pub fn last_sim_block(&self) -> Option<&str> {
        self.last_sim_block.as_deref()
    }

    pub fn set_viewport_width(&mut self, px: u32) {
        self.viewport_width = px;
    }

    // -----------------------------------------------------------------------
    // Generation gate
    // -----------------------------------------------------------------------

    pub fn begin_generation(&self) -> Result<GenerationGuard, TrackerError> {
        self.gate.begin()
    }

    #[must_use]
    pub fn is_generating(&self) -> bool {
        self.gate.is_set()
    }

    fn sidebar_env(&self) -> SidebarEnv {
        SidebarEnv {
            generating: self.gate.is_set(),
            mobile: MobileRule::new(self.viewport_width, self.settings.mobile_breakpoint),
        }
    }

    // -----------------------------------------------------------------------
    // Rendering
    // -----------------------------------------------------------------------

    pub fn render_tracker(
        &mut self,
        page: &mut Document,
        host: &dyn ChatHost,
        id: usize,
    ) -> RenderOutcome {
        tracing::debug!(id, "render_tracker called");
        self.render(page, host, id, true)
    }

    pub fn render_tracker_without_sim(
        &mut self,
        page: &mut Document,
        host: &dyn ChatHost,
        id: usize,
    ) -> RenderOutcome {
        self.render(page, host, id, false)
    }

    fn render(
        &mut self,
        page: &mut Document,
        host: &dyn ChatHost,
        id: usize,
        verbose: bool,
    ) -> RenderOutcome {
        if !self.settings.is_enabled {
            return RenderOutcome::Disabled;
        }
        if !self.gate.is_set() {
            self.flush_pending_sidebars(page);
        }

        let Some(message) = host.message(id) else {
            tracing::debug!(id, "could not find message; aborting render");
            return RenderOutcome::MissingMessage;
        };
        let Some(text_node) = host::message_text_node(page, id) else {
            tracing::debug!(id, "message has no text element on the page");
            return RenderOutcome::MissingMessage;
        };

        let block = self.extractor.extract(&message.mes);
        if verbose {
            tracing::debug!(
                id,
                found = block.is_some(),
                message = %preview(&message.mes),
                "scanned message for tracker block"
            );
        }

        let display = if self.settings.hide_sim_blocks {
            self.extractor.hide_blocks(&message.mes)
        } else {
            message.mes.clone()
        };
        let formatted =
            host.format_message(&display, &message.name, message.is_system, message.is_user, id);
        page.set_inner_html(text_node, &formatted);

        let Some(block) = block else {
            return RenderOutcome::NoBlock;
        };
        if verbose {
            tracing::debug!(id, block = %preview(block.as_str()), "extracted tracker block");
        }
        self.last_sim_block = Some(block.as_str().to_owned());
        placement::remove_inline_tracker(page, text_node);
        self.clear_preparing(page, text_node);

        let tree = match format::parse(block.as_str()) {
            Ok(tree) => tree,
            Err(err) => {
                tracing::debug!(id, %err, "failed to parse tracker data");
                page.insert_adjacent_html(text_node, Adjacent::BeforeEnd, PARSE_ERROR_HTML);
                return RenderOutcome::ParseFailed;
            }
        };
        let tracker = match reconcile(&tree) {
            Ok(tracker) => tracker,
            Err(err) => {
                tracing::warn!(id, %err, "parsed tracker data is not a valid object");
                return RenderOutcome::InvalidShape;
            }
        };
        tracing::debug!(id, characters = tracker.characters.len(), "reconciled tracker data");
        if tracker.characters.is_empty() {
            return RenderOutcome::NoCharacters;
        }

        let ctx = ProjectionContext {
            default_bg_color: &self.settings.default_bg_color,
            show_thought_bubble: self.settings.show_thought_bubble,
            helpers: self.helpers.as_ref(),
        };
        let payload = project(&tracker, &ctx, self.templates.is_tabbed());
        let cards_html = render_cards(&payload, self.templates.as_ref());
        let markup = self.templates.render_wrapper(&cards_html);

        let position = self.templates.position();
        let env = self.sidebar_env();
        match placement::place(page, text_node, position, &markup, &mut self.sidebars, env) {
            PlaceOutcome::Inline
            | PlaceOutcome::Sidebar(SidebarUpdate::Created | SidebarUpdate::Replaced) => {
                RenderOutcome::Rendered(position)
            }
            PlaceOutcome::Sidebar(SidebarUpdate::Deferred) => {
                position.side().map_or(RenderOutcome::Skipped, RenderOutcome::Deferred)
            }
            PlaceOutcome::Sidebar(SidebarUpdate::MissingAnchor) | PlaceOutcome::NoPlaceholder => {
                RenderOutcome::Skipped
            }
        }
    }

    /// Re-render every chat message that carries a tracker block. Sidebars
    /// are left alone; for sidebar positions the newest such message is
    /// rendered once more so the sidebar shows its data.
    pub fn refresh_all_cards(
        &mut self,
        page: &mut Document,
        host: &dyn ChatHost,
    ) -> Vec<(usize, RenderOutcome)> {
        tracing::info!("refreshing all tracker cards");
        let Some(chat) = page.get_element_by_id(host::CHAT_ID) else {
            tracing::warn!("no #{} element; nothing to refresh", host::CHAT_ID);
            return Vec::new();
        };
        for container in page.find_all_by_id(chat, CONTAINER_ID) {
            if page.closest_by_class(container, host::MESSAGE_CLASS).is_some() {
                page.remove(container);
            }
        }

        let mut outcomes = Vec::new();
        let mut last_with_block = None;
        for id in host::message_ids(page) {
            let has_block = host.message(id).is_some_and(|m| self.extractor.contains_block(&m.mes));
            if has_block {
                outcomes.push((id, self.render_tracker_without_sim(page, host, id)));
                last_with_block = Some(id);
            }
        }

        if let Some(id) = last_with_block
            && self.templates.position().side().is_some()
        {
            tracing::debug!(id, "re-rendering newest tracker for sidebar");
            outcomes.push((id, self.render_tracker_without_sim(page, host, id)));
        }
        outcomes
    }

    // -----------------------------------------------------------------------
    // Sidebars
    // -----------------------------------------------------------------------

    pub fn update_sidebar(
        &mut self,
        page: &mut Document,
        side: Side,
        content: String,
    ) -> SidebarUpdate {
        let env = self.sidebar_env();
        self.sidebars.update(page, side, content, env)
    }

    /// Apply buffered sidebar content. Does nothing while generating.
    pub fn flush_pending_sidebars(&mut self, page: &mut Document) -> Vec<(Side, SidebarUpdate)> {
        let env = self.sidebar_env();
        Side::ALL
            .into_iter()
            .filter_map(|side| self.sidebars.flush(page, side, env).map(|update| (side, update)))
            .collect()
    }

    pub fn remove_global_sidebars(&mut self, page: &mut Document) {
        for side in Side::ALL {
            self.sidebars.teardown(page, side);
        }
    }

    /// Route a click on `target` to the sidebar whose delegated listener
    /// it reaches.
    pub fn handle_click(&mut self, page: &mut Document, target: NodeId) -> ClickOutcome {
        let rule = self.sidebar_env().mobile;
        for (owner, listener) in page.dispatch_click(target) {
            let Listener::TabClick = listener;
            let Some(side) = self.sidebars.side_for_container(page, owner) else {
                continue;
            };
            let Some(content) = self.sidebars.content_node(page, side) else {
                continue;
            };
            let outcome = handle_tab_click(page, content, target);
            match outcome {
                ClickOutcome::Ignored => {}
                ClickOutcome::Opened(_) => apply_interactivity(page, owner, true, rule),
                ClickOutcome::Closed(_) => apply_interactivity(page, owner, false, rule),
            }
            return outcome;
        }
        ClickOutcome::Ignored
    }

    // -----------------------------------------------------------------------
    // Preparing placeholder
    // -----------------------------------------------------------------------

    /// Show a "preparing" placeholder under message `id` until its next render
    /// finds a tracker block.
    pub fn mark_preparing(&mut self, page: &mut Document, id: usize) -> bool {
        let Some(text_node) = host::message_text_node(page, id) else {
            return false;
        };
        if self.preparing.contains(&text_node) {
            return false;
        }
        page.insert_adjacent_html(text_node, Adjacent::AfterEnd, PREPARING_HTML);
        self.preparing.insert(text_node);
        true
    }

    #[must_use]
    pub fn is_preparing(&self, page: &Document, id: usize) -> bool {
        host::message_text_node(page, id).is_some_and(|node| self.preparing.contains(&node))
    }

    fn clear_preparing(&mut self, page: &mut Document, text_node: NodeId) {
        let Some(block) = page.parent(text_node) else {
            return;
        };
        if let Some(placeholder) = page.find_first_by_class(block, PREPARING_CLASS) {
            page.remove(placeholder);
            self.preparing.remove(&text_node);
        }
    }
}

fn preview(text: &str) -> String {
    let mut out: String = text.chars().take(PREVIEW_CHARS).collect();
    if text.chars().nth(PREVIEW_CHARS).is_some() {
        out.push_str("...");
    }
    out
}
