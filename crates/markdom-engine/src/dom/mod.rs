//! # Document Tree
//!
//! The parsed document is an arena: every node lives in one `Vec` owned by the
//! [`Document`] and is addressed by a [`NodeId`]. A node stores its parent id
//! (a plain back-reference, never ownership) and the ordered ids of its
//! children.
//!
//! ```text
//! nodes[0] Document          children: [1, 3]
//! nodes[1] Header "Header 1" children: [2]    parent: 0
//! nodes[2] Text "Intro"                       parent: 1
//! nodes[3] Paragraph         children: [4]    parent: 0
//! nodes[4] Text "Body"                        parent: 3
//! ```
//!
//! Reading goes through the borrowed [`Node`] handle. The side registries
//! (`headers`, `references`, `images`, `links`, `toc`, `tof`) are filled while
//! parsing and consumed once by the resolution pass, after which the
//! document is never mutated again.
//!
//! A resolved TOC or TOF lists headers or images that also stay at their
//! place in the flow. Such an entry keeps its flow parent, and the TOC/TOF
//! keeps the source position of its own marker line.

mod kinds;
mod render;

use std::fmt;
use std::sync::Arc;

use markdom_syntax::Position;

use crate::latex::LatexRenderer;

pub use kinds::{LinkForm, NodeKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    from: Position,
    to: Position,
}

/// Arena and registry lengths to return to when a construct is abandoned.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Checkpoint {
    parent: NodeId,
    nodes: usize,
    images: usize,
    links: usize,
}

impl Checkpoint {
    pub(crate) fn parent(&self) -> NodeId {
        self.parent
    }
}

#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeData>,
    pub(crate) headers: Vec<NodeId>,
    pub(crate) toc: Option<NodeId>,
    pub(crate) tof: Option<NodeId>,
    pub(crate) references: Vec<NodeId>,
    pub(crate) images: Vec<NodeId>,
    pub(crate) links: Vec<NodeId>,
    pub(crate) latex: Arc<LatexRenderer>,
    pub(crate) end: Position,
}

impl Document {
    pub(crate) fn new(latex: Arc<LatexRenderer>) -> Self {
        Self {
            nodes: vec![NodeData {
                kind: NodeKind::Document,
                parent: None,
                children: Vec::new(),
                from: Position::default(),
                to: Position::default(),
            }],
            headers: Vec::new(),
            toc: None,
            tof: None,
            references: Vec::new(),
            images: Vec::new(),
            links: Vec::new(),
            latex,
            end: Position::default(),
        }
    }

    pub fn root(&self) -> Node<'_> {
        self.node(NodeId::ROOT)
    }

    /// Panics if `id` does not belong to this document.
    pub fn node(&self, id: NodeId) -> Node<'_> {
        assert!(id.0 < self.nodes.len(), "{id:?} is not a node of this document");
        Node { doc: self, id }
    }

    pub fn get(&self, id: NodeId) -> Option<Node<'_>> {
        (id.0 < self.nodes.len()).then_some(Node { doc: self, id })
    }

    /// Headers not claimed by a table of contents.
    pub fn headers(&self) -> impl Iterator<Item = Node<'_>> {
        self.handles(&self.headers)
    }

    pub fn references(&self) -> impl Iterator<Item = Node<'_>> {
        self.handles(&self.references)
    }

    /// Images not claimed by a table of figures.
    pub fn images(&self) -> impl Iterator<Item = Node<'_>> {
        self.handles(&self.images)
    }

    /// Links written in reference or collapsed form.
    pub fn links(&self) -> impl Iterator<Item = Node<'_>> {
        self.handles(&self.links)
    }

    pub fn toc(&self) -> Option<Node<'_>> {
        self.toc.map(|id| self.node(id))
    }

    pub fn tof(&self) -> Option<Node<'_>> {
        self.tof.map(|id| self.node(id))
    }

    pub fn latex(&self) -> &Arc<LatexRenderer> {
        &self.latex
    }

    /// Position just past the last character of the source.
    pub fn end(&self) -> Position {
        self.end
    }

    /// Number of nodes, the root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// True when the source held no blocks.
    pub fn is_empty(&self) -> bool {
        self.nodes[0].children.is_empty()
    }

    pub fn to_html(&self) -> String {
        self.root().to_html()
    }

    pub fn to_markdown(&self) -> String {
        self.root().to_markdown()
    }

    fn handles<'d>(&'d self, ids: &'d [NodeId]) -> impl Iterator<Item = Node<'d>> {
        ids.iter().map(move |&id| Node { doc: self, id })
    }

    // === Construction, used by the parser ===

    /// Appends a node as the last child of `parent`.
    pub(crate) fn push(
        &mut self,
        kind: NodeKind,
        parent: NodeId,
        from: Position,
        to: Position,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            kind,
            parent: Some(parent),
            children: Vec::new(),
            from,
            to,
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    pub(crate) fn set_kind(&mut self, id: NodeId, kind: NodeKind) {
        self.nodes[id.0].kind = kind;
    }

    /// Closes a node: `to` becomes its last child's `to`, or `fallback` when it has none.
    pub(crate) fn finish(&mut self, id: NodeId, fallback: Position) {
        let to = self.nodes[id.0]
            .children
            .last()
            .map_or(fallback, |child| self.nodes[child.0].to);
        self.nodes[id.0].to = to;
    }

    pub(crate) fn checkpoint(&self, parent: NodeId) -> Checkpoint {
        Checkpoint {
            parent,
            nodes: self.nodes.len(),
            images: self.images.len(),
            links: self.links.len(),
        }
    }

    /// Drops every node created since `checkpoint`, with its registrations.
    pub(crate) fn rollback(&mut self, checkpoint: Checkpoint) {
        self.nodes.truncate(checkpoint.nodes);
        self.images.truncate(checkpoint.images);
        self.links.truncate(checkpoint.links);

        // Everything newer hangs below the checkpoint's parent.
        let children = &mut self.nodes[checkpoint.parent.0].children;
        while children.last().is_some_and(|c| c.0 >= checkpoint.nodes) {
            children.pop();
        }
    }

    // === Resolution ===

    /// Wires reference links and images to their definitions, then hands the
    /// registered images to the TOF and the registered headers to the TOC.
    pub(crate) fn resolve(&mut self) {
        let pending: Vec<NodeId> = self.links.iter().chain(&self.images).copied().collect();
        for id in pending {
            let Some(reference_id) = self.nodes[id.0]
                .kind
                .reference_id()
                .filter(|r| !r.is_empty())
                .map(str::to_owned)
            else {
                continue;
            };

            let definition = self.references.iter().find_map(|r| match &self.nodes[r.0].kind {
                NodeKind::Reference {
                    reference_id: candidate,
                    url,
                    alt,
                } if *candidate == reference_id => Some((url.clone(), alt.clone())),
                _ => None,
            });

            match definition {
                Some((url, alt)) => self.nodes[id.0].kind.set_target(&url, &alt),
                None => log::debug!("reference {reference_id:?} has no definition"),
            }
        }

        if let Some(tof) = self.tof {
            self.nodes[tof.0].children = std::mem::take(&mut self.images);
        }
        if let Some(toc) = self.toc {
            self.nodes[toc.0].children = std::mem::take(&mut self.headers);
        }
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.root().fmt(f)
    }
}

/// A borrowed view of one node.
///
/// `Display` renders the node as plain text.
#[derive(Clone, Copy)]
pub struct Node<'d> {
    doc: &'d Document,
    id: NodeId,
}

impl<'d> Node<'d> {
    fn data(&self) -> &'d NodeData {
        &self.doc.nodes[self.id.0]
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn document(&self) -> &'d Document {
        self.doc
    }

    pub fn kind(&self) -> &'d NodeKind {
        &self.data().kind
    }

    pub fn parent(&self) -> Option<Node<'d>> {
        self.data().parent.map(|id| self.doc.node(id))
    }

    pub fn children(self) -> impl Iterator<Item = Node<'d>> {
        self.doc.handles(&self.data().children)
    }

    pub fn child_count(&self) -> usize {
        self.data().children.len()
    }

    pub fn first_child(&self) -> Option<Node<'d>> {
        self.children().next()
    }

    pub fn last_child(&self) -> Option<Node<'d>> {
        self.data().children.last().map(|&id| self.doc.node(id))
    }

    pub fn from(&self) -> Position {
        self.data().from
    }

    pub fn to(&self) -> Position {
        self.data().to
    }

    /// How many lists enclose this node, not counting the node itself.
    pub fn list_depth(&self) -> usize {
        std::iter::successors(self.parent(), Node::parent)
            .filter(|ancestor| ancestor.kind().is_list())
            .count()
    }

    /// Pre-order walk below this node. TOC/TOF entries are visited under their
    /// listing as well as at their place in the flow.
    pub fn descendants(&self) -> Descendants<'d> {
        let mut stack = self.data().children.clone();
        stack.reverse();
        Descendants {
            doc: self.doc,
            stack,
        }
    }

    pub fn to_html(&self) -> String {
        render::Html(*self).to_string()
    }

    pub fn to_markdown(&self) -> String {
        render::Markdown(*self).to_string()
    }
}

impl fmt::Display for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render::plain(*self, f)
    }
}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("kind", self.kind())
            .field("from", &self.from())
            .field("to", &self.to())
            .finish()
    }
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.doc, other.doc) && self.id == other.id
    }
}

pub struct Descendants<'d> {
    doc: &'d Document,
    stack: Vec<NodeId>,
}

impl<'d> Iterator for Descendants<'d> {
    type Item = Node<'d>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = self.doc.node(id);
        self.stack.extend(node.data().children.iter().rev());
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn text(value: &str) -> NodeKind {
        NodeKind::Text {
            value: value.to_string(),
        }
    }

    fn pos(row: usize, column: usize) -> Position {
        Position::new(row, column)
    }

    fn document() -> Document {
        Document::new(Arc::new(LatexRenderer::default()))
    }

    #[test]
    fn push_links_parent_and_children() {
        let mut doc = document();
        let paragraph = doc.push(NodeKind::Paragraph, NodeId::ROOT, pos(0, 0), pos(0, 0));
        let first = doc.push(text("a"), paragraph, pos(0, 0), pos(0, 1));
        let second = doc.push(text("b"), paragraph, pos(0, 1), pos(0, 2));

        let node = doc.node(paragraph);
        let children: Vec<NodeId> = node.children().map(|c| c.id()).collect();
        assert_eq!(children, vec![first, second]);
        assert_eq!(doc.node(second).parent(), Some(node));
        assert_eq!(doc.root().parent(), None);
    }

    #[test]
    fn finish_takes_the_last_child_end() {
        let mut doc = document();
        let paragraph = doc.push(NodeKind::Paragraph, NodeId::ROOT, pos(0, 0), pos(0, 0));
        doc.finish(paragraph, pos(0, 9));
        assert_eq!(doc.node(paragraph).to(), pos(0, 9));

        doc.push(text("abc"), paragraph, pos(0, 0), pos(1, 3));
        doc.finish(paragraph, pos(0, 9));
        assert_eq!(doc.node(paragraph).to(), pos(1, 3));
    }

    #[test]
    fn rollback_forgets_abandoned_nodes() {
        let mut doc = document();
        let paragraph = doc.push(NodeKind::Paragraph, NodeId::ROOT, pos(0, 0), pos(0, 0));
        doc.push(text("keep"), paragraph, pos(0, 0), pos(0, 4));

        let checkpoint = doc.checkpoint(paragraph);
        let image = doc.push(NodeKind::Bold { marker: '*' }, paragraph, pos(0, 4), pos(0, 6));
        doc.images.push(image);
        doc.push(text("gone"), image, pos(0, 6), pos(0, 10));
        doc.rollback(checkpoint);

        assert_eq!(doc.node_count(), 3);
        assert_eq!(doc.images().count(), 0);
        assert_eq!(doc.node(paragraph).child_count(), 1);
        assert_eq!(doc.get(image), None);
    }

    #[test]
    fn list_depth_counts_enclosing_lists() {
        let mut doc = document();
        let outer = doc.push(
            NodeKind::BulletList { level: 0, marker: '-' },
            NodeId::ROOT,
            pos(0, 0),
            pos(0, 0),
        );
        let item = doc.push(NodeKind::ListItem, outer, pos(0, 0), pos(0, 0));
        let inner = doc.push(
            NodeKind::OrderedList { level: 2, start: 1 },
            item,
            pos(1, 0),
            pos(1, 0),
        );

        assert_eq!(doc.node(outer).list_depth(), 0);
        assert_eq!(doc.node(item).list_depth(), 1);
        assert_eq!(doc.node(inner).list_depth(), 1);
    }

    #[test]
    fn descendants_walk_in_document_order() {
        let mut doc = document();
        let header = doc.push(
            NodeKind::Header {
                level: 1,
                id: "Header 1".into(),
            },
            NodeId::ROOT,
            pos(0, 0),
            pos(0, 0),
        );
        doc.push(text("a"), header, pos(0, 2), pos(0, 3));
        let paragraph = doc.push(NodeKind::Paragraph, NodeId::ROOT, pos(1, 0), pos(1, 0));
        doc.push(text("b"), paragraph, pos(1, 0), pos(1, 1));

        let kinds: Vec<&NodeKind> = doc.root().descendants().map(|n| n.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                &NodeKind::Header {
                    level: 1,
                    id: "Header 1".into()
                },
                &text("a"),
                &NodeKind::Paragraph,
                &text("b"),
            ]
        );
    }
}
