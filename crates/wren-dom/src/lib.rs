//! Sealed DOM tree for the Wren HTML pipeline.
//!
//! The tree is the terminal artifact of parsing: a set of flat, read-only
//! tables addressed by integer handles, following the node model of the
//! [DOM Living Standard](https://dom.spec.whatwg.org/) loosely.
//!
//! # Design
//!
//! - Every node lives in one `nodes` table and is addressed by [`NodeId`].
//!   Parent, sibling and child relations are indices, never pointers, so the
//!   tree is cycle-free by construction and can be relocated as a whole.
//! - The payload of a node is stored in one of two side tables,
//!   [`ElementData`] or [`TextData`], selected by [`NodeKind`]. The kind and
//!   the payload index travel together, so the wrong table can't be read.
//! - Children and attributes are spans into two shared pools.
//! - Names, attribute values and text are byte slices borrowed from the
//!   source buffer. No character references are decoded.
//!
//! The tree has no mutation API. It is produced once by the tree builder in
//! `wren-html` through [`DomTree::from_tables`].

mod classify;
/// Serializable snapshot of a tree, for JSON output.
pub mod dump;
mod iter;
mod print;
mod tree;

pub use classify::{is_block_name, is_inline_name};
pub use iter::{AncestorIterator, DescendantIterator, SiblingIterator};
pub use tree::{DomTables, DomTree};

use wren_arena::Span;

/// A type-safe index into the `nodes` table of a [`DomTree`].
///
/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// The default value, `NodeId(0)`, only exists so arena-backed lists of ids
/// can be zero-filled; it is not a "no node" marker. Absence of a relation is
/// always `Option<NodeId>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct NodeId(pub usize);

/// Index into the `element_data` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementIndex(pub usize);

/// Index into the `text_data` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextIndex(pub usize);

/// "Each node has an associated node type"
///
/// Only elements and text are produced. Comments and the doctype are
/// discarded by the tokenizer, and there is no document node: the `html`
/// element is the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element)
    Element(ElementIndex),
    /// [§ 4.10 Interface Text](https://dom.spec.whatwg.org/#interface-text)
    Text(TextIndex),
}

/// A node record.
///
/// `children` is a span into the tree's child pool. It is written exactly
/// once, when the element is popped off the open-element stack, and never
/// changes afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Node {
    /// What the node is and where its payload lives.
    pub kind: NodeKind,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-parent)
    /// "An object that participates in a tree has a parent, which is either
    /// null or an object."
    pub parent: Option<NodeId>,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-previous-sibling)
    pub prev_sibling: Option<NodeId>,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-next-sibling)
    pub next_sibling: Option<NodeId>,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-child)
    /// "A node has an associated list of children"
    pub children: Span<NodeId>,
}

impl Node {
    /// A detached node with no relations yet.
    #[must_use]
    pub const fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            prev_sibling: None,
            next_sibling: None,
            children: Span::EMPTY,
        }
    }

    /// True if this is an element node.
    #[must_use]
    pub const fn is_element(&self) -> bool {
        matches!(self.kind, NodeKind::Element(_))
    }

    /// True if this is a text node.
    #[must_use]
    pub const fn is_text(&self) -> bool {
        matches!(self.kind, NodeKind::Text(_))
    }
}

/// A name/value pair from an open tag, both borrowed from the source.
///
/// A boolean attribute (`<input disabled>`) has an empty value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Attribute<'src> {
    /// Attribute name as written.
    pub name: &'src [u8],
    /// Attribute value without its quotes.
    pub value: &'src [u8],
}

impl Attribute<'_> {
    /// The name, lossily decoded.
    #[must_use]
    pub fn name_lossy(&self) -> String {
        String::from_utf8_lossy(self.name).into_owned()
    }

    /// The value, lossily decoded.
    #[must_use]
    pub fn value_lossy(&self) -> String {
        String::from_utf8_lossy(self.value).into_owned()
    }
}

/// Element-specific data.
///
/// Per [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element):
/// "When an element is created, its local name is always given."
///
/// NOTE: The name keeps the case it was written in. Comparisons against it
/// are ASCII case-insensitive everywhere in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementData<'src> {
    /// The node this data belongs to.
    pub node: NodeId,
    /// Tag name as written.
    pub name: &'src [u8],
    /// Span into the tree's attribute pool.
    pub attributes: Span<Attribute<'src>>,
    /// The open tag ended in `/>`.
    pub self_closing: bool,
}

impl ElementData<'_> {
    /// ASCII case-insensitive comparison of the tag name.
    #[must_use]
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name.as_bytes())
    }

    /// The tag name, lowercased and lossily decoded.
    #[must_use]
    pub fn name_lossy(&self) -> String {
        String::from_utf8_lossy(self.name).to_ascii_lowercase()
    }

    /// True for elements laid out as blocks.
    #[must_use]
    pub fn is_block(&self) -> bool {
        is_block_name(self.name)
    }

    /// True for elements laid out inline.
    #[must_use]
    pub fn is_inline(&self) -> bool {
        is_inline_name(self.name)
    }
}

/// Text-specific data: the raw bytes of a text run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextData<'src> {
    /// The node this data belongs to.
    pub node: NodeId,
    /// Raw content. Character references are left as written.
    pub contents: &'src [u8],
}

impl TextData<'_> {
    /// The contents, lossily decoded.
    #[must_use]
    pub fn contents_lossy(&self) -> String {
        String::from_utf8_lossy(self.contents).into_owned()
    }
}
