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

use super::dom::{Adjacent, Document, NodeId};
use super::sidebar::{Side, SidebarEnv, SidebarRegistry, SidebarUpdate};
use super::template::CONTAINER_ID;
use super::theme::{DIVIDER_CLASS, DIVIDER_HTML};

pub const REASONING_CLASS: &str = "mes_reasoning_details";
pub const MACRO_PLACEHOLDER_ID: &str = "sst-macro-placeholder";

/// Where rendered cards go relative to their message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Position {
    Above,
    #[default]
    Below,
    Left,
    Right,
    Macro,
}

impl Position {
    /// Unrecognised names fall back to `Below`; `BOTTOM` is its older name.
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_uppercase().as_str() {
            "ABOVE" => Self::Above,
            "LEFT" => Self::Left,
            "RIGHT" => Self::Right,
            "MACRO" => Self::Macro,
            _ => Self::Below,
        }
    }

    #[must_use]
    pub fn side(self) -> Option<Side> {
        match self {
            Self::Left => Some(Side::Left),
            Self::Right => Some(Side::Right),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceOutcome {
    Inline,
    Sidebar(SidebarUpdate),
    /// MACRO with no placeholder left in the message.
    NoPlaceholder,
}

/// Insert `markup` for the message whose text node is `message` at
/// `position`, or hand it to the sidebar registry.
pub fn place(
    page: &mut Document,
    message: NodeId,
    position: Position,
    markup: &str,
    sidebars: &mut SidebarRegistry,
    env: SidebarEnv,
) -> PlaceOutcome {
    match position {
        Position::Left | Position::Right => {
            let side = if position == Position::Left { Side::Left } else { Side::Right };
            PlaceOutcome::Sidebar(sidebars.update(page, side, markup.to_owned(), env))
        }
        Position::Above => {
            remove_inline_tracker(page, message);
            let html = format!("{markup}{DIVIDER_HTML}");
            let (anchor, at) = match page.find_first_by_class(message, REASONING_CLASS) {
                Some(reasoning) => (reasoning, Adjacent::BeforeBegin),
                None => (message, Adjacent::AfterBegin),
            };
            page.insert_adjacent_html(anchor, at, &html);
            PlaceOutcome::Inline
        }
        Position::Macro => {
            let Some(placeholder) = page.find_by_id(message, MACRO_PLACEHOLDER_ID) else {
                tracing::debug!("macro placeholder not present; nothing to replace");
                return PlaceOutcome::NoPlaceholder;
            };
            remove_inline_tracker(page, message);
            page.insert_adjacent_html(placeholder, Adjacent::BeforeBegin, markup);
            page.remove(placeholder);
            PlaceOutcome::Inline
        }
        Position::Below => {
            remove_inline_tracker(page, message);
            let html = format!("{DIVIDER_HTML}{markup}");
            page.insert_adjacent_html(message, Adjacent::BeforeEnd, &html);
            PlaceOutcome::Inline
        }
    }
}

/// Drop any tracker container and divider previously placed in `message`.
pub fn remove_inline_tracker(page: &mut Document, message: NodeId) -> usize {
    let mut doomed = page.find_all_by_id(message, CONTAINER_ID);
    doomed.extend(page.find_all_by_class(message, DIVIDER_CLASS));
    let count = doomed.len();
    for node in doomed {
        page.remove(node);
    }
    count
}
