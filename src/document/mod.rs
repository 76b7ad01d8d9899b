// src/document/mod.rs

//! A small arena-backed document tree for the kerning rewriter.
//!
//! Nodes live in one `Vec` and refer to each other by index, so nodes can be
//! inserted and detached while the tree is being rewritten without fighting
//! over ownership. Detached nodes stay in the arena but are unreachable.
//! Walks use explicit work lists so deeply nested input cannot overflow the
//! stack.

pub mod rewrite;

#[cfg(test)]
mod tests;

use crate::font::FontDescriptor;

/// Index of a node in its [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    pub tag: String,
    pub class: Option<String>,
    /// Font set on this element; descendants inherit it.
    pub font: Option<FontDescriptor>,
    /// Explicit `letter-spacing`, if any.
    pub letter_spacing: Option<String>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn with_font(mut self, font: FontDescriptor) -> Self {
        self.font = Some(font);
        self
    }

    pub fn with_letter_spacing(mut self, spacing: impl Into<String>) -> Self {
        self.letter_spacing = Some(spacing.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
    prev_sibling: Option<NodeId>,
    next_sibling: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Document {
    /// New document whose root is `root`.
    pub fn new(root: Element) -> Self {
        let mut doc = Document {
            nodes: Vec::new(),
            root: NodeId(0),
        };
        doc.root = doc.push(NodeKind::Element(root));
        doc
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent: None,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
        });
        id
    }

    pub fn create_element(&mut self, element: Element) -> NodeId {
        self.push(NodeKind::Element(element))
    }

    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.push(NodeKind::Text(text.into()))
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match &self.nodes[id.0].kind {
            NodeKind::Element(e) => Some(e),
            NodeKind::Text(_) => None,
        }
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id.0].kind {
            NodeKind::Text(t) => Some(t),
            NodeKind::Element(_) => None,
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].next_sibling
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].first_child
    }

    /// Snapshot of the children of `id`, safe to hold while mutating.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut child = self.first_child(id);
        while let Some(c) = child {
            out.push(c);
            child = self.next_sibling(c);
        }
        out
    }

    /// Unlinks `id` from its parent and siblings. Its own subtree stays intact.
    pub fn detach(&mut self, id: NodeId) {
        let (parent, prev_sibling, next_sibling) = {
            let node = &self.nodes[id.0];
            (node.parent, node.prev_sibling, node.next_sibling)
        };

        match prev_sibling {
            Some(prev) => self.nodes[prev.0].next_sibling = next_sibling,
            None => {
                if let Some(p) = parent {
                    self.nodes[p.0].first_child = next_sibling;
                }
            }
        }
        match next_sibling {
            Some(next) => self.nodes[next.0].prev_sibling = prev_sibling,
            None => {
                if let Some(p) = parent {
                    self.nodes[p.0].last_child = prev_sibling;
                }
            }
        }

        let node = &mut self.nodes[id.0];
        node.parent = None;
        node.prev_sibling = None;
        node.next_sibling = None;
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        let last = self.nodes[parent.0].last_child;
        {
            let node = &mut self.nodes[child.0];
            node.parent = Some(parent);
            node.prev_sibling = last;
        }
        match last {
            Some(last) => self.nodes[last.0].next_sibling = Some(child),
            None => self.nodes[parent.0].first_child = Some(child),
        }
        self.nodes[parent.0].last_child = Some(child);
    }

    /// Inserts `child` right before `reference`, which must be a child of
    /// `parent`.
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: NodeId) {
        debug_assert_eq!(self.parent(reference), Some(parent));
        self.detach(child);
        let prev = self.nodes[reference.0].prev_sibling;
        {
            let node = &mut self.nodes[child.0];
            node.parent = Some(parent);
            node.prev_sibling = prev;
            node.next_sibling = Some(reference);
        }
        self.nodes[reference.0].prev_sibling = Some(child);
        match prev {
            Some(prev) => self.nodes[prev.0].next_sibling = Some(child),
            None => self.nodes[parent.0].first_child = Some(child),
        }
    }

    /// Pre-order list of `id` and all its descendants.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(node) = stack.pop() {
            out.push(node);
            let mut children = self.children(node);
            children.reverse();
            stack.extend(children);
        }
        out
    }

    /// Concatenated text of every text node under `id`, in document order.
    pub fn text_content(&self, id: NodeId) -> String {
        self.descendants(id)
            .into_iter()
            .filter_map(|n| self.text(n))
            .collect()
    }

    /// Merges adjacent text nodes and drops empty ones throughout the subtree.
    pub fn normalize(&mut self, id: NodeId) {
        for node in self.descendants(id) {
            if self.element(node).is_none() {
                continue;
            }
            let mut run_head: Option<NodeId> = None;
            for child in self.children(node) {
                let text = match &self.nodes[child.0].kind {
                    NodeKind::Text(t) => t.clone(),
                    NodeKind::Element(_) => {
                        run_head = None;
                        continue;
                    }
                };
                if text.is_empty() {
                    self.detach(child);
                    continue;
                }
                match run_head {
                    Some(head) => {
                        if let NodeKind::Text(t) = &mut self.nodes[head.0].kind {
                            t.push_str(&text);
                        }
                        self.detach(child);
                    }
                    None => run_head = Some(child),
                }
            }
        }
    }

    /// Replaces every element under `root` for which `should_unwrap` holds by
    /// its own children, then normalizes. Children moved up this way are not
    /// examined again; elements that stay are searched. Returns the number of
    /// elements removed.
    pub fn unwrap_elements<F>(&mut self, root: NodeId, should_unwrap: F) -> usize
    where
        F: Fn(&Element) -> bool,
    {
        let mut unwrapped = 0;
        let mut work = vec![root];
        while let Some(node) = work.pop() {
            for child in self.children(node) {
                let Some(element) = self.element(child) else {
                    continue;
                };
                if should_unwrap(element) {
                    for grandchild in self.children(child) {
                        self.insert_before(node, grandchild, child);
                    }
                    self.detach(child);
                    unwrapped += 1;
                } else {
                    work.push(child);
                }
            }
        }
        self.normalize(root);
        unwrapped
    }

    /// Nearest font set on `id` or one of its ancestors.
    pub fn inherited_font(&self, id: NodeId) -> Option<&FontDescriptor> {
        let mut current = Some(id);
        while let Some(node) = current {
            if let Some(font) = self.element(node).and_then(|e| e.font.as_ref()) {
                return Some(font);
            }
            current = self.parent(node);
        }
        None
    }

    /// Serializes the subtree rooted at `id` as HTML.
    pub fn to_html(&self, id: NodeId) -> String {
        enum Step {
            Enter(NodeId),
            Close(NodeId),
        }

        let mut out = String::new();
        let mut stack = vec![Step::Enter(id)];
        while let Some(step) = stack.pop() {
            match step {
                Step::Enter(node) => match &self.nodes[node.0].kind {
                    NodeKind::Text(t) => out.push_str(&escape(t)),
                    NodeKind::Element(e) => {
                        out.push_str(&open_tag(e));
                        stack.push(Step::Close(node));
                        for child in self.children(node).into_iter().rev() {
                            stack.push(Step::Enter(child));
                        }
                    }
                },
                Step::Close(node) => {
                    if let Some(e) = self.element(node) {
                        out.push_str(&format!("</{}>", e.tag));
                    }
                }
            }
        }
        out
    }
}

fn open_tag(e: &Element) -> String {
    let mut tag = format!("<{}", e.tag);
    if let Some(class) = &e.class {
        tag.push_str(&format!(" class=\"{}\"", escape(class)));
    }
    let mut style = Vec::new();
    if let Some(font) = &e.font {
        style.push(format!("font-family: {}", font.font_family));
        style.push(format!("font-style: {}", font.font_style));
        style.push(format!("font-weight: {}", font.font_weight));
    }
    if let Some(spacing) = &e.letter_spacing {
        style.push(format!("letter-spacing: {}", spacing));
    }
    if !style.is_empty() {
        tag.push_str(&format!(" style=\"{}\"", escape(&style.join("; "))));
    }
    tag.push('>');
    tag
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
