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

//! Owned document tree the tracker renders into.
//!
//! Nodes live in an arena and are addressed by [`NodeId`]. Freed slots are
//! recycled under a new generation, so a stale id stops resolving instead of
//! aliasing whatever took its place.

mod parse;

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
}

impl Element {
    #[must_use]
    pub fn new(tag: &str) -> Self {
        Self { tag: tag.to_ascii_lowercase(), attrs: Vec::new() }
    }

    #[must_use]
    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.set_attr(name, value);
        self
    }

    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.iter().find(|(n, _)| n == name).map(|(_, v)| v.as_str())
    }

    pub fn set_attr(&mut self, name: &str, value: &str) {
        let name = name.to_ascii_lowercase();
        if let Some(slot) = self.attrs.iter_mut().find(|(n, _)| *n == name) {
            value.clone_into(&mut slot.1);
        } else {
            self.attrs.push((name, value.to_owned()));
        }
    }

    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class").is_some_and(|list| list.split_whitespace().any(|c| c == class))
    }

    pub fn add_class(&mut self, class: &str) {
        if self.has_class(class) {
            return;
        }
        let next = match self.attr("class") {
            Some(list) if !list.trim().is_empty() => format!("{} {class}", list.trim()),
            _ => class.to_owned(),
        };
        self.set_attr("class", &next);
    }

    pub fn remove_class(&mut self, class: &str) {
        let Some(list) = self.attr("class") else {
            return;
        };
        let next: Vec<&str> = list.split_whitespace().filter(|c| *c != class).collect();
        let next = next.join(" ");
        self.set_attr("class", &next);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    Element(Element),
    /// Text kept as source markup; serialized verbatim.
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone)]
struct Node {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Where `insert_adjacent_html` places parsed markup relative to a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjacent {
    BeforeBegin,
    AfterBegin,
    BeforeEnd,
    AfterEnd,
}

/// Delegated event handlers a node can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listener {
    TabClick,
}

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

pub(crate) fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Slot>,
    free: Vec<usize>,
    root: NodeId,
    listeners: HashMap<NodeId, Listener>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// An empty document whose root is a `body` element.
    #[must_use]
    pub fn new() -> Self {
        let root = Node {
            data: NodeData::Element(Element::new("body")),
            parent: None,
            children: Vec::new(),
        };
        Self {
            nodes: vec![Slot { generation: 0, node: Some(root) }],
            free: Vec::new(),
            root: NodeId { index: 0, generation: 0 },
            listeners: HashMap::new(),
        }
    }

    #[must_use]
    pub fn from_html(html: &str) -> Self {
        let mut doc = Self::new();
        let root = doc.root;
        doc.set_inner_html(root, html);
        doc
    }

    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Whether `id` still resolves to a node attached under the root.
    #[must_use]
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if current == self.root {
                return true;
            }
            cursor = self.node(current).and_then(|n| n.parent);
        }
        false
    }

    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    fn alloc(&mut self, data: NodeData) -> NodeId {
        let node = Node { data, parent: None, children: Vec::new() };
        if let Some(index) = self.free.pop()
            && let Some(slot) = self.nodes.get_mut(index)
        {
            slot.node = Some(node);
            return NodeId { index, generation: slot.generation };
        }
        let index = self.nodes.len();
        self.nodes.push(Slot { generation: 0, node: Some(node) });
        NodeId { index, generation: 0 }
    }

    // -----------------------------------------------------------------------
    // Node access
    // -----------------------------------------------------------------------

    #[must_use]
    pub fn data(&self, id: NodeId) -> Option<&NodeData> {
        self.node(id).map(|n| &n.data)
    }

    #[must_use]
    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match self.data(id) {
            Some(NodeData::Element(el)) => Some(el),
            _ => None,
        }
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match self.node_mut(id).map(|n| &mut n.data) {
            Some(NodeData::Element(el)) => Some(el),
            _ => None,
        }
    }

    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or_default()
    }

    #[must_use]
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).and_then(|el| el.attr(name))
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        if let Some(el) = self.element_mut(id) {
            el.set_attr(name, value);
        }
    }

    #[must_use]
    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.element(id).is_some_and(|el| el.has_class(class))
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) {
        if let Some(el) = self.element_mut(id) {
            el.add_class(class);
        }
    }

    pub fn remove_class(&mut self, id: NodeId, class: &str) {
        if let Some(el) = self.element_mut(id) {
            el.remove_class(class);
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// All descendants of `scope` in document order, excluding `scope`.
    #[must_use]
    pub fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(scope).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    #[must_use]
    pub fn find_by_id(&self, scope: NodeId, id: &str) -> Option<NodeId> {
        self.descendants(scope)
            .into_iter()
            .find(|n| self.element(*n).and_then(Element::id) == Some(id))
    }

    #[must_use]
    pub fn find_all_by_id(&self, scope: NodeId, id: &str) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|n| self.element(*n).and_then(Element::id) == Some(id))
            .collect()
    }

    #[must_use]
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.find_by_id(self.root, id)
    }

    #[must_use]
    pub fn find_all_by_class(&self, scope: NodeId, class: &str) -> Vec<NodeId> {
        self.descendants(scope).into_iter().filter(|n| self.has_class(*n, class)).collect()
    }

    #[must_use]
    pub fn find_first_by_class(&self, scope: NodeId, class: &str) -> Option<NodeId> {
        self.descendants(scope).into_iter().find(|n| self.has_class(*n, class))
    }

    #[must_use]
    pub fn find_by_attr(&self, scope: NodeId, name: &str, value: &str) -> Option<NodeId> {
        self.descendants(scope).into_iter().find(|n| self.attr(*n, name) == Some(value))
    }

    /// Nearest inclusive ancestor carrying `class`.
    #[must_use]
    pub fn closest_by_class(&self, id: NodeId, class: &str) -> Option<NodeId> {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if self.has_class(current, class) {
                return Some(current);
            }
            cursor = self.parent(current);
        }
        None
    }

    #[must_use]
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Create a detached element.
    pub fn create_element(&mut self, element: Element) -> NodeId {
        self.alloc(NodeData::Element(element))
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if !self.contains(parent) || !self.contains(child) {
            return;
        }
        self.detach(child);
        if let Some(node) = self.node_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.node_mut(parent) {
            node.children.push(child);
        }
    }

    /// Insert `child` as the sibling immediately before `reference`.
    /// Returns false when `reference` has no parent.
    pub fn insert_before(&mut self, reference: NodeId, child: NodeId) -> bool {
        let Some(parent) = self.parent(reference) else {
            return false;
        };
        self.detach(child);
        let Some(index) = self.children(parent).iter().position(|c| *c == reference) else {
            return false;
        };
        self.insert_at(parent, index, &[child]);
        true
    }

    fn insert_at(&mut self, parent: NodeId, index: usize, new_children: &[NodeId]) {
        for child in new_children {
            if let Some(node) = self.node_mut(*child) {
                node.parent = Some(parent);
            }
        }
        if let Some(node) = self.node_mut(parent) {
            let index = index.min(node.children.len());
            node.children.splice(index..index, new_children.iter().copied());
        }
    }

    /// Unlink `id` from its parent without freeing it.
    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        if let Some(node) = self.node_mut(parent) {
            node.children.retain(|c| *c != id);
        }
        if let Some(node) = self.node_mut(id) {
            node.parent = None;
        }
    }

    /// Unlink and free `id` with its whole subtree, dropping listeners.
    pub fn remove(&mut self, id: NodeId) {
        if id == self.root || !self.contains(id) {
            return;
        }
        self.detach(id);
        let mut doomed = self.descendants(id);
        doomed.push(id);
        for node in doomed {
            self.listeners.remove(&node);
            if let Some(slot) = self.nodes.get_mut(node.index) {
                slot.node = None;
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(node.index);
            }
        }
    }

    fn clear_children(&mut self, id: NodeId) {
        for child in self.children(id).to_vec() {
            self.remove(child);
        }
    }

    /// Parse `html` into detached nodes.
    pub fn parse_fragment(&mut self, html: &str) -> Vec<NodeId> {
        parse::parse_fragment(self, html)
    }

    pub fn set_inner_html(&mut self, id: NodeId, html: &str) {
        if self.element(id).is_none() {
            return;
        }
        self.clear_children(id);
        let fragment = self.parse_fragment(html);
        let len = self.children(id).len();
        self.insert_at(id, len, &fragment);
    }

    /// Parse `html` and insert it relative to `id`. Returns the inserted
    /// top-level nodes, empty when the anchor cannot take siblings.
    pub fn insert_adjacent_html(&mut self, id: NodeId, at: Adjacent, html: &str) -> Vec<NodeId> {
        if !self.contains(id) {
            return Vec::new();
        }
        let (parent, index) = match at {
            Adjacent::AfterBegin => (id, 0),
            Adjacent::BeforeEnd => (id, self.children(id).len()),
            Adjacent::BeforeBegin | Adjacent::AfterEnd => {
                let Some(parent) = self.parent(id) else {
                    return Vec::new();
                };
                let Some(pos) = self.children(parent).iter().position(|c| *c == id) else {
                    return Vec::new();
                };
                (parent, if at == Adjacent::BeforeBegin { pos } else { pos + 1 })
            }
        };
        let fragment = self.parse_fragment(html);
        self.insert_at(parent, index, &fragment);
        fragment
    }

    fn clone_subtree(&mut self, id: NodeId) -> Option<NodeId> {
        let data = self.data(id)?.clone();
        let copy = self.alloc(data);
        for child in self.children(id).to_vec() {
            if let Some(child_copy) = self.clone_subtree(child) {
                if let Some(node) = self.node_mut(child_copy) {
                    node.parent = Some(copy);
                }
                if let Some(node) = self.node_mut(copy) {
                    node.children.push(child_copy);
                }
            }
        }
        Some(copy)
    }

    /// Swap `id` for a deep copy that carries no listeners.
    pub fn replace_with_clone(&mut self, id: NodeId) -> Option<NodeId> {
        let copy = self.clone_subtree(id)?;
        if self.insert_before(id, copy) {
            self.remove(id);
            Some(copy)
        } else {
            self.remove(copy);
            None
        }
    }

    // -----------------------------------------------------------------------
    // Events
    // -----------------------------------------------------------------------

    pub fn add_listener(&mut self, id: NodeId, listener: Listener) {
        if self.contains(id) {
            self.listeners.insert(id, listener);
        }
    }

    pub fn remove_listener(&mut self, id: NodeId) {
        self.listeners.remove(&id);
    }

    #[must_use]
    pub fn listener(&self, id: NodeId) -> Option<Listener> {
        self.listeners.get(&id).copied()
    }

    /// Listeners a click on `target` reaches, innermost first.
    #[must_use]
    pub fn dispatch_click(&self, target: NodeId) -> Vec<(NodeId, Listener)> {
        let mut out = Vec::new();
        let mut cursor = Some(target);
        while let Some(current) = cursor {
            if let Some(listener) = self.listener(current) {
                out.push((current, listener));
            }
            cursor = self.parent(current);
        }
        out
    }

    // -----------------------------------------------------------------------
    // Serialization
    // -----------------------------------------------------------------------

    #[must_use]
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        for child in self.children(id) {
            self.write_node(*child, &mut out);
        }
        out
    }

    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        for node in std::iter::once(id).chain(self.descendants(id)) {
            if let Some(NodeData::Text(text)) = self.data(node) {
                out.push_str(&htmlize::unescape(text.as_str()));
            }
        }
        out
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        match self.data(id) {
            Some(NodeData::Text(text)) => out.push_str(text),
            Some(NodeData::Comment(text)) => {
                out.push_str("<!--");
                out.push_str(text);
                out.push_str("-->");
            }
            Some(NodeData::Element(el)) => {
                out.push('<');
                out.push_str(&el.tag);
                for (name, value) in &el.attrs {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&htmlize::escape_attribute(value.as_str()));
                    out.push('"');
                }
                out.push('>');
                if is_void(&el.tag) {
                    return;
                }
                for child in self.children(id) {
                    self.write_node(*child, out);
                }
                out.push_str("</");
                out.push_str(&el.tag);
                out.push('>');
            }
            None => {}
        }
    }
}
