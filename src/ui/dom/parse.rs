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

use std::cell::RefCell;
use std::rc::Rc;

use lol_html::html_content::EndTag;
use lol_html::{HandlerResult, RewriteStrSettings, doc_comments, doc_text, element, rewrite_str};

use super::{Document, Element, NodeData, NodeId, is_void};

/// Markup events in source order, as the tokenizer reports them.
#[derive(Debug)]
enum Event {
    Start { element: Element, closable: bool },
    /// End tag of the element whose `Start` sits at this index.
    End(usize),
    /// Source text with entities still encoded.
    Text(String),
    Comment(String),
}

/// Parse `html` as body content into detached nodes.
///
/// Stray end tags are dropped, an end tag closes whatever is still open
/// inside its element, and anything left open is closed at end of input.
pub(super) fn parse_fragment(doc: &mut Document, html: &str) -> Vec<NodeId> {
    build(doc, tokenize(html))
}

fn tokenize(html: &str) -> Vec<Event> {
    let events = Rc::new(RefCell::new(Vec::new()));

    let settings = RewriteStrSettings {
        element_content_handlers: vec![element!("*", |el| {
            let mut element = Element::new(&el.tag_name());
            for attr in el.attributes() {
                let name = attr.name();
                if element.attr(&name).is_none() {
                    let raw = attr.value();
                    element.attrs.push((name, htmlize::unescape(raw.as_str()).into_owned()));
                }
            }

            let start = events.borrow().len();
            let closable = !is_void(&element.tag)
                && match el.end_tag_handlers() {
                    Some(handlers) => {
                        let events = Rc::clone(&events);
                        let handler: lol_html::EndTagHandler<'static> =
                            Box::new(move |_: &mut EndTag<'_>| -> HandlerResult {
                                events.borrow_mut().push(Event::End(start));
                                Ok(())
                            });
                        handlers.push(handler);
                        true
                    }
                    None => false,
                };
            events.borrow_mut().push(Event::Start { element, closable });
            Ok(())
        })],
        document_content_handlers: vec![
            doc_text!(|chunk| {
                push_text(&mut events.borrow_mut(), chunk.as_str());
                Ok(())
            }),
            doc_comments!(|comment| {
                events.borrow_mut().push(Event::Comment(comment.text()));
                Ok(())
            }),
        ],
        strict: false,
        ..RewriteStrSettings::new()
    };

    if let Err(err) = rewrite_str(html, settings) {
        tracing::warn!(%err, "html tokenizer stopped early, keeping the markup read so far");
    }
    events.take()
}

/// Chunks of one text run arrive separately; keep them as a single node.
fn push_text(events: &mut Vec<Event>, text: &str) {
    if text.is_empty() {
        return;
    }
    match events.last_mut() {
        Some(Event::Text(run)) => run.push_str(text),
        _ => events.push(Event::Text(text.to_owned())),
    }
}

fn build(doc: &mut Document, events: Vec<Event>) -> Vec<NodeId> {
    let mut top = Vec::new();
    let mut open: Vec<(usize, NodeId)> = Vec::new();

    for (index, event) in events.into_iter().enumerate() {
        match event {
            Event::Start { element, closable } => {
                let id = doc.alloc(NodeData::Element(element));
                attach(doc, &mut top, &open, id);
                if closable {
                    open.push((index, id));
                }
            }
            Event::End(start) => {
                if let Some(depth) = open.iter().rposition(|(at, _)| *at == start) {
                    open.truncate(depth);
                }
            }
            Event::Text(text) => {
                let id = doc.alloc(NodeData::Text(text));
                attach(doc, &mut top, &open, id);
            }
            Event::Comment(text) => {
                let id = doc.alloc(NodeData::Comment(text));
                attach(doc, &mut top, &open, id);
            }
        }
    }

    top
}

fn attach(doc: &mut Document, top: &mut Vec<NodeId>, open: &[(usize, NodeId)], id: NodeId) {
    match open.last() {
        Some((_, parent)) => doc.append_child(*parent, id),
        None => top.push(id),
    }
}
