use tracing::debug;

use crate::iter::{AncestorIterator, DescendantIterator, SiblingIterator};
use crate::{Attribute, ElementData, Node, NodeId, NodeKind, TextData};

/// Borrowed views of the tables a tree builder produced.
///
/// Spans stored in `nodes` index into `children`, spans stored in
/// `element_data` index into `attributes`.
#[derive(Debug, Clone, Copy)]
pub struct DomTables<'t, 'src> {
    /// Every node, indexed by [`NodeId`].
    pub nodes: &'t [Node],
    /// One record per element node.
    pub element_data: &'t [ElementData<'src>],
    /// One record per text node.
    pub text_data: &'t [TextData<'src>],
    /// Pool of sealed child lists.
    pub children: &'t [NodeId],
    /// Pool of attribute lists.
    pub attributes: &'t [Attribute<'src>],
}

/// The sealed result of parsing.
///
/// [§ 4 Nodes](https://dom.spec.whatwg.org/#nodes)
///
/// "The DOM represents a document as a tree."
///
/// The tree owns copies of the builder's tables; text and names still borrow
/// the source buffer, hence the `'src` lifetime. There is no document node.
/// The `html` element is the root and always exists; the `head` element
/// exists for every tree the builder produces but is modelled as optional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomTree<'src> {
    nodes: Box<[Node]>,
    element_data: Box<[ElementData<'src>]>,
    text_data: Box<[TextData<'src>]>,
    children: Box<[NodeId]>,
    attributes: Box<[Attribute<'src>]>,
    html: NodeId,
    head: Option<NodeId>,
}

impl<'src> DomTree<'src> {
    /// Copy `tables` into storage owned by the new tree.
    ///
    /// This copy is where the result leaves the builder's scratch storage.
    ///
    /// # Panics
    ///
    /// Panics if the tables are inconsistent: a node whose payload index is
    /// out of range or whose payload points back at a different node, a span
    /// past the end of its pool, or an `html`/`head` handle that is not an
    /// element. These indicate a bug in the builder.
    #[must_use]
    pub fn from_tables(tables: DomTables<'_, 'src>, html: NodeId, head: Option<NodeId>) -> Self {
        let tree = Self {
            nodes: tables.nodes.into(),
            element_data: tables.element_data.into(),
            text_data: tables.text_data.into(),
            children: tables.children.into(),
            attributes: tables.attributes.into(),
            html,
            head,
        };
        tree.check_consistency();
        debug!(
            nodes = tree.nodes.len(),
            elements = tree.element_data.len(),
            texts = tree.text_data.len(),
            "sealed dom tree"
        );
        tree
    }

    fn check_consistency(&self) {
        for (index, node) in self.nodes.iter().enumerate() {
            let owner = match node.kind {
                NodeKind::Element(element) => self.element_data[element.0].node,
                NodeKind::Text(text) => self.text_data[text.0].node,
            };
            assert_eq!(owner, NodeId(index), "node {index} payload belongs to {owner:?}");
            assert!(
                node.children.end() <= self.children.len(),
                "node {index} children {:?} outside pool",
                node.children
            );
        }
        for data in &self.element_data {
            assert!(
                data.attributes.end() <= self.attributes.len(),
                "element {:?} attributes outside pool",
                data.node
            );
        }
        assert!(
            self.nodes.get(self.html.0).is_some_and(Node::is_element),
            "html handle {:?} is not an element",
            self.html
        );
        if let Some(head) = self.head {
            assert!(
                self.nodes.get(head.0).is_some_and(Node::is_element),
                "head handle {head:?} is not an element"
            );
        }
    }

    /// The root `html` element.
    #[must_use]
    pub const fn html(&self) -> NodeId {
        self.html
    }

    /// The `head` element, if one was created.
    #[must_use]
    pub const fn head(&self) -> Option<NodeId> {
        self.head
    }

    /// [§ 3.1.3 The body element](https://html.spec.whatwg.org/multipage/dom.html#the-body-element-2)
    ///
    /// "The body element of a document is the first of the html element's
    /// children that is either a body element or a frameset element, or null
    /// if there is no such element."
    #[must_use]
    pub fn body(&self) -> Option<NodeId> {
        self.children(self.html).iter().copied().find(|&id| {
            self.as_element(id)
                .is_some_and(|e| e.is_named("body") || e.is_named("frameset"))
        })
    }

    /// Get a node by its ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Get a node by its ID.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this tree.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Number of nodes in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false for a built tree, which holds at least `html`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The raw node table.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// The raw element table, in document order.
    #[must_use]
    pub fn element_data(&self) -> &[ElementData<'src>] {
        &self.element_data
    }

    /// The raw text table, in document order.
    #[must_use]
    pub fn text_data(&self) -> &[TextData<'src>] {
        &self.text_data
    }

    /// Get the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Get all children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id)
            .map_or(&[][..], |n| &self.children[n.children.range()])
    }

    /// Get the first child of a node.
    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).first().copied()
    }

    /// Get the last child of a node.
    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).last().copied()
    }

    /// Get the next sibling of a node.
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.next_sibling)
    }

    /// Get the previous sibling of a node.
    #[must_use]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.prev_sibling)
    }

    /// Iterate over all ancestors of a node, from parent to `html`.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> AncestorIterator<'_, 'src> {
        AncestorIterator::new(self, self.parent(id))
    }

    /// Iterate over the siblings after a node.
    #[must_use]
    pub fn following_siblings(&self, id: NodeId) -> SiblingIterator<'_, 'src> {
        SiblingIterator::forward(self, self.next_sibling(id))
    }

    /// Iterate over the siblings before a node, nearest first.
    #[must_use]
    pub fn preceding_siblings(&self, id: NodeId) -> SiblingIterator<'_, 'src> {
        SiblingIterator::backward(self, self.prev_sibling(id))
    }

    /// Iterate over the descendants of a node in document order, excluding
    /// the node itself.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> DescendantIterator<'_, 'src> {
        DescendantIterator::new(self, id)
    }

    /// [§ 4.2.6 Descendant](https://dom.spec.whatwg.org/#concept-tree-descendant)
    ///
    /// Check if `descendant` is a descendant of `ancestor`.
    #[must_use]
    pub fn is_descendant_of(&self, descendant: NodeId, ancestor: NodeId) -> bool {
        self.ancestors(descendant).any(|id| id == ancestor)
    }

    /// Get element data if this node is an element.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData<'src>> {
        match self.get(id)?.kind {
            NodeKind::Element(index) => self.element_data.get(index.0),
            NodeKind::Text(_) => None,
        }
    }

    /// Get text data if this node is a text node.
    #[must_use]
    pub fn as_text(&self, id: NodeId) -> Option<&TextData<'src>> {
        match self.get(id)?.kind {
            NodeKind::Text(index) => self.text_data.get(index.0),
            NodeKind::Element(_) => None,
        }
    }

    /// Tag name of an element node.
    #[must_use]
    pub fn tag_name(&self, id: NodeId) -> Option<&'src [u8]> {
        self.as_element(id).map(|e| e.name)
    }

    /// True if `id` is an element with the given name (ASCII
    /// case-insensitive).
    #[must_use]
    pub fn is_element_named(&self, id: NodeId, name: &str) -> bool {
        self.as_element(id).is_some_and(|e| e.is_named(name))
    }

    /// Attributes of an element node; empty for text.
    #[must_use]
    pub fn attributes(&self, id: NodeId) -> &[Attribute<'src>] {
        self.as_element(id)
            .map_or(&[][..], |e| &self.attributes[e.attributes.range()])
    }

    /// Value of the first attribute called `name` (ASCII case-insensitive).
    #[must_use]
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&'src [u8]> {
        self.attributes(id)
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name.as_bytes()))
            .map(|a| a.value)
    }

    /// Every element called `name`, in document order.
    pub fn elements_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = NodeId> + 'a {
        self.element_data
            .iter()
            .filter(move |e| e.is_named(name))
            .map(|e| e.node)
    }

    /// [§ 4.4 textContent](https://dom.spec.whatwg.org/#dom-node-textcontent)
    ///
    /// Concatenated text of the node and its descendants, lossily decoded.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        let mut bytes = Vec::new();
        if let Some(text) = self.as_text(id) {
            bytes.extend_from_slice(text.contents);
        }
        for descendant in self.descendants(id) {
            if let Some(text) = self.as_text(descendant) {
                bytes.extend_from_slice(text.contents);
            }
        }
        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// The document title: the text of the first `title` element, if that
    /// element holds exactly one text child.
    #[must_use]
    pub fn title(&self) -> Option<String> {
        let title = self.elements_named("title").next()?;
        let &[only] = self.children(title) else {
            return None;
        };
        self.as_text(only).map(TextData::contents_lossy)
    }

    /// True if `id` is an element laid out as a block.
    #[must_use]
    pub fn is_block(&self, id: NodeId) -> bool {
        self.as_element(id).is_some_and(ElementData::is_block)
    }

    /// True if `id` is an element laid out inline.
    #[must_use]
    pub fn is_inline(&self, id: NodeId) -> bool {
        self.as_element(id).is_some_and(ElementData::is_inline)
    }
}
