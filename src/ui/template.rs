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

use std::fmt::Write as _;

use regex::Regex;

use super::placement::Position;
use crate::app::Settings;
use crate::tracker::{CardPayload, RenderPayload, TabbedPayload};

/// Id of the element wrapping every rendered set of cards.
pub const CONTAINER_ID: &str = "silly-sim-tracker-container";
pub const TABS_CLASS: &str = "sim-tracker-tabs";
pub const TAB_CLASS: &str = "sim-tracker-tab";
pub const CARD_CLASS: &str = "sim-tracker-card";
pub const NARRATIVE_INACTIVE_CLASS: &str = "narrative-inactive";

/// Compiled templates the renderer feeds payloads into.
pub trait TemplateSet {
    fn render_wrapper(&self, cards_html: &str) -> String;
    fn render_card(&self, card: &CardPayload) -> String;
    fn render_tabs(&self, payload: &TabbedPayload) -> String;
    fn is_tabbed(&self) -> bool;
    fn position(&self) -> Position;
}

/// Run the payload through the matching template: one invocation for the
/// tabbed layout, one per card otherwise.
#[must_use]
pub fn render_cards(payload: &RenderPayload, templates: &dyn TemplateSet) -> String {
    match payload {
        RenderPayload::Tabbed(tabbed) => templates.render_tabs(tabbed),
        RenderPayload::Cards(cards) => {
            cards.iter().map(|card| templates.render_card(card)).collect()
        }
    }
}

/// Whether the configured template renders all characters behind tabs.
#[must_use]
pub fn is_tabbed_template(template_file: &str, custom_template_html: &str) -> bool {
    template_file.contains("tabs") || custom_template_html.contains(TABS_CLASS)
}

/// Position declared by a `<!-- POSITION: LEFT -->` marker in template markup.
#[must_use]
pub fn extract_template_position(html: &str) -> Option<Position> {
    let marker = Regex::new(r"(?i)<!--\s*POSITION\s*:\s*([A-Z]+)\s*-->").ok()?;
    let caps = marker.captures(html)?;
    Some(Position::parse(&caps[1]))
}

/// Stock card, tabs and wrapper templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltinTemplates {
    tabbed: bool,
    position: Position,
}

impl BuiltinTemplates {
    #[must_use]
    pub fn new(tabbed: bool, position: Position) -> Self {
        Self { tabbed, position }
    }

    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        let tabbed = is_tabbed_template(&settings.template_file, &settings.custom_template_html);
        let position = extract_template_position(&settings.custom_template_html)
            .unwrap_or_else(|| Position::parse(&settings.template_position));
        Self { tabbed, position }
    }
}

impl TemplateSet for BuiltinTemplates {
    fn render_wrapper(&self, cards_html: &str) -> String {
        format!(
            r#"<div id="{CONTAINER_ID}" style="width: 100%; display: flex; flex-wrap: wrap; gap: 20px;">{cards_html}</div>"#
        )
    }

    fn render_card(&self, card: &CardPayload) -> String {
        card_markup(card)
    }

    fn render_tabs(&self, payload: &TabbedPayload) -> String {
        let mut out = format!(r#"<div class="{TABS_CLASS}"><div class="sim-tracker-tab-bar">"#);
        for card in &payload.characters {
            let _ = write!(
                out,
                r#"<button class="{TAB_CLASS}" style="background-color: {bg};">{name}</button>"#,
                bg = escape_attr(&card.derived.bg_color),
                name = escape_text(&card.character_name),
            );
        }
        out.push_str(r#"</div><div class="sim-tracker-cards">"#);
        for card in &payload.characters {
            out.push_str(&card_markup(card));
        }
        out.push_str("</div></div>");
        out
    }

    fn is_tabbed(&self) -> bool {
        self.tabbed
    }

    fn position(&self) -> Position {
        self.position
    }
}

fn card_markup(card: &CardPayload) -> String {
    let d = &card.derived;
    let mut classes = String::from(CARD_CLASS);
    if d.inactive {
        classes.push(' ');
        classes.push_str(NARRATIVE_INACTIVE_CLASS);
    }

    let mut out = format!(
        r#"<div class="{classes}" data-character="{name_attr}" style="background: linear-gradient(145deg, {bg} 0%, {dark} 100%);">"#,
        name_attr = escape_attr(&card.character_name),
        bg = escape_attr(&d.bg_color),
        dark = escape_attr(&d.darker_bg_color),
    );
    let _ = write!(
        out,
        r#"<div class="sim-tracker-header"><span class="sim-tracker-name">{name}</span><span class="sim-tracker-date">{date} · {time}</span></div>"#,
        name = escape_text(&card.character_name),
        date = escape_text(&card.current_date),
        time = escape_text(&card.current_time),
    );
    let _ = write!(
        out,
        r#"<div class="sim-tracker-status"><span class="sim-tracker-reaction">{react}</span>"#,
        react = escape_text(&d.reaction_emoji),
    );
    if let Some(icon) = &d.health_icon {
        let _ = write!(out, r#"<span class="sim-tracker-health">{}</span>"#, escape_text(icon));
    }
    let _ = write!(
        out,
        r#"<span class="sim-tracker-relationship">{rel}</span><span class="sim-tracker-desire">{desire}</span></div>"#,
        rel = escape_text(&d.relationship_status),
        desire = escape_text(&d.desire_status),
    );
    if d.show_thought_bubble {
        let _ = write!(
            out,
            r#"<div class="sim-tracker-thought">{}</div>"#,
            escape_text(&d.internal_thought)
        );
    }
    out.push_str("</div>");
    out
}

fn escape_text(text: &str) -> String {
    htmlize::escape_text(text).into_owned()
}

fn escape_attr(text: &str) -> String {
    htmlize::escape_attribute(text).into_owned()
}
