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

use std::path::Path;

use pulldown_cmark::{Options, Parser, html};
use serde::{Deserialize, Serialize};

use crate::error::TrackerError;
use crate::ui::dom::{Document, Element, NodeId};

pub const SHELD_ID: &str = crate::ui::sidebar::SHELD_ID;
pub const CHAT_ID: &str = "chat";
pub const MESSAGE_CLASS: &str = "mes";
pub const MESSAGE_TEXT_CLASS: &str = "mes_text";
pub const MESSAGE_ID_ATTR: &str = "mesid";

/// One chat message as the host stores it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(default)]
    pub name: String,
    pub mes: String,
    #[serde(default)]
    pub is_user: bool,
    #[serde(default)]
    pub is_system: bool,
}

/// Services the chat host provides to the tracker.
pub trait ChatHost {
    fn message(&self, id: usize) -> Option<&ChatMessage>;

    /// Turn raw message text into display markup.
    fn format_message(
        &self,
        text: &str,
        name: &str,
        is_system: bool,
        is_user: bool,
        id: usize,
    ) -> String;
}

/// A host backed by an in-memory transcript, formatting text as markdown.
#[derive(Debug, Clone, Default)]
pub struct TranscriptHost {
    messages: Vec<ChatMessage>,
}

impl TranscriptHost {
    #[must_use]
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self { messages }
    }

    /// Read a JSON array of chat messages.
    pub fn load(path: &Path) -> Result<Self, TrackerError> {
        let unreadable = |reason: String| TrackerError::TranscriptUnreadable {
            reason: format!("{}: {reason}", path.display()),
        };
        let raw = std::fs::read_to_string(path).map_err(|e| unreadable(e.to_string()))?;
        let messages: Vec<ChatMessage> =
            serde_json::from_str(&raw).map_err(|e| unreadable(e.to_string()))?;
        tracing::info!(count = messages.len(), path = %path.display(), "transcript loaded");
        Ok(Self::new(messages))
    }

    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }
}

impl ChatHost for TranscriptHost {
    fn message(&self, id: usize) -> Option<&ChatMessage> {
        self.messages.get(id)
    }

    fn format_message(
        &self,
        text: &str,
        _name: &str,
        _is_system: bool,
        _is_user: bool,
        _id: usize,
    ) -> String {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        let mut out = String::with_capacity(text.len() * 3 / 2);
        html::push_html(&mut out, Parser::new_ext(text, options));
        out
    }
}

/// Build the host page skeleton: `#sheld > #chat > .mes[mesid] > .mes_text`,
/// one message block per transcript entry. Text nodes start empty.
#[must_use]
pub fn build_chat_page(message_count: usize) -> Document {
    let mut page = Document::new();
    let root = page.root();
    let sheld = page.create_element(Element::new("div").with_attr("id", SHELD_ID));
    let chat = page.create_element(Element::new("div").with_attr("id", CHAT_ID));
    page.append_child(root, sheld);
    page.append_child(sheld, chat);
    for id in 0..message_count {
        let block = page.create_element(
            Element::new("div")
                .with_attr("class", MESSAGE_CLASS)
                .with_attr(MESSAGE_ID_ATTR, &id.to_string()),
        );
        let text = page.create_element(Element::new("div").with_attr("class", MESSAGE_TEXT_CLASS));
        page.append_child(chat, block);
        page.append_child(block, text);
    }
    page
}

/// The `.mes[mesid=id]` block for a message.
#[must_use]
pub fn message_block_node(page: &Document, id: usize) -> Option<NodeId> {
    let node = page.find_by_attr(page.root(), MESSAGE_ID_ATTR, &id.to_string())?;
    page.has_class(node, MESSAGE_CLASS).then_some(node)
}

/// The `.mes_text` element inside a message block.
#[must_use]
pub fn message_text_node(page: &Document, id: usize) -> Option<NodeId> {
    let block = message_block_node(page, id)?;
    page.find_first_by_class(block, MESSAGE_TEXT_CLASS)
}

/// Ids of every message block on the page, in document order.
#[must_use]
pub fn message_ids(page: &Document) -> Vec<usize> {
    page.find_all_by_class(page.root(), MESSAGE_CLASS)
        .into_iter()
        .filter_map(|node| page.attr(node, MESSAGE_ID_ATTR)?.parse().ok())
        .collect()
}
