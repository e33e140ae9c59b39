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

use serde::Serialize;
use serde_json::{Map, Value};

use super::model::{CanonicalTracker, CharacterRecord, display_text, is_truthy};
use crate::ui::theme::{self, Helpers};

pub const NO_THOUGHT: &str = "No thought recorded.";
pub const UNKNOWN_STATUS: &str = "Unknown Status";
pub const UNKNOWN_DESIRE: &str = "Unknown Desire";

#[derive(Debug, Clone, Copy)]
enum Fallback {
    Text(&'static str),
    Flag(bool),
    Number(i64),
}

impl Fallback {
    fn to_value(self) -> Value {
        match self {
            Self::Text(text) => Value::String(text.to_owned()),
            Self::Flag(flag) => Value::Bool(flag),
            Self::Number(n) => Value::from(n),
        }
    }
}

/// A stat key the card always carries, the attributes consulted for it in
/// order, and what to use when every source is missing or falsy.
struct StatRule {
    key: &'static str,
    sources: &'static [&'static str],
    fallback: Fallback,
}

const STAT_RULES: &[StatRule] = &[
    StatRule {
        key: "internal_thought",
        sources: &["internal_thought", "thought"],
        fallback: Fallback::Text(NO_THOUGHT),
    },
    StatRule {
        key: "relationshipStatus",
        sources: &["relationshipStatus"],
        fallback: Fallback::Text(UNKNOWN_STATUS),
    },
    StatRule {
        key: "desireStatus",
        sources: &["desireStatus"],
        fallback: Fallback::Text(UNKNOWN_DESIRE),
    },
    StatRule { key: "inactive", sources: &["inactive"], fallback: Fallback::Flag(false) },
    StatRule { key: "inactiveReason", sources: &["inactiveReason"], fallback: Fallback::Number(0) },
];

/// Settings and collaborators the projection reads.
pub struct ProjectionContext<'a> {
    pub default_bg_color: &'a str,
    pub show_thought_bubble: bool,
    pub helpers: &'a dyn Helpers,
}

/// Display fields computed from a character's attributes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Derived {
    pub internal_thought: String,
    pub relationship_status: String,
    pub desire_status: String,
    pub inactive: bool,
    pub inactive_reason: Value,
    pub bg_color: String,
    pub darker_bg_color: String,
    pub reaction_emoji: String,
    pub health_icon: Option<String>,
    pub show_thought_bubble: bool,
}

/// View model for one character card.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardPayload {
    pub character_name: String,
    pub current_date: String,
    pub current_time: String,
    /// Source attributes with the defaulted stats written over them.
    pub stats: Map<String, Value>,
    #[serde(flatten)]
    pub derived: Derived,
}

/// View model for a tabbed template: every card plus the shared world fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TabbedPayload {
    pub characters: Vec<CardPayload>,
    pub current_date: String,
    pub current_time: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderPayload {
    /// One combined payload for a single template invocation.
    Tabbed(TabbedPayload),
    /// One payload per card, rendered independently in source order.
    Cards(Vec<CardPayload>),
}

impl RenderPayload {
    #[must_use]
    pub fn cards(&self) -> &[CardPayload] {
        match self {
            Self::Tabbed(payload) => &payload.characters,
            Self::Cards(cards) => cards,
        }
    }
}

#[must_use]
pub fn project(
    tracker: &CanonicalTracker,
    ctx: &ProjectionContext<'_>,
    tabbed: bool,
) -> RenderPayload {
    let cards: Vec<CardPayload> = tracker
        .characters
        .iter()
        .filter_map(|character| project_card(tracker, character, ctx))
        .collect();
    if tabbed {
        RenderPayload::Tabbed(TabbedPayload {
            characters: cards,
            current_date: tracker.world_data.current_date.clone(),
            current_time: tracker.world_data.current_time.clone(),
        })
    } else {
        RenderPayload::Cards(cards)
    }
}

fn project_card(
    tracker: &CanonicalTracker,
    character: &CharacterRecord,
    ctx: &ProjectionContext<'_>,
) -> Option<CardPayload> {
    if character.attributes.is_empty() {
        tracing::warn!("No stats found for character \"{}\". Skipping card.", character.name);
        return None;
    }

    let mut stats = character.attributes.clone();
    for rule in STAT_RULES {
        let value = rule
            .sources
            .iter()
            .filter_map(|key| character.attributes.get(*key))
            .find(|v| is_truthy(v))
            .cloned()
            .unwrap_or_else(|| rule.fallback.to_value());
        stats.insert(rule.key.to_owned(), value);
    }

    let text = |key: &str, fallback: &str| {
        stats.get(key).and_then(display_text).unwrap_or_else(|| fallback.to_owned())
    };
    let bg_color = character
        .attributes
        .get("bg")
        .and_then(display_text)
        .unwrap_or_else(|| ctx.default_bg_color.to_owned());
    let last_react = character.attributes.get("last_react").and_then(display_text);

    let derived = Derived {
        internal_thought: text("internal_thought", NO_THOUGHT),
        relationship_status: text("relationshipStatus", UNKNOWN_STATUS),
        desire_status: text("desireStatus", UNKNOWN_DESIRE),
        inactive: stats.get("inactive").is_some_and(is_truthy),
        inactive_reason: stats.get("inactiveReason").cloned().unwrap_or_else(|| Value::from(0)),
        darker_bg_color: ctx.helpers.darken_color(&bg_color),
        bg_color,
        reaction_emoji: ctx.helpers.reaction_emoji(last_react.as_deref()),
        health_icon: theme::health_icon(character.attributes.get("health").and_then(Value::as_f64))
            .map(str::to_owned),
        show_thought_bubble: ctx.show_thought_bubble,
    };

    Some(CardPayload {
        character_name: character.name.clone(),
        current_date: tracker.world_data.current_date.clone(),
        current_time: tracker.world_data.current_time.clone(),
        stats,
        derived,
    })
}
