//! An owned, serializable copy of a [`DomTree`], used for JSON output.
//!
//! The dump mirrors the tree's flat tables: nodes are listed in [`NodeId`]
//! order and refer to each other by index, so neither building nor
//! serializing it recurses into the tree. Byte slices are decoded lossily
//! and element names are lowercased.

use serde::Serialize;

use crate::{DomTree, NodeId, NodeKind};

/// The whole tree as a flat node list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DumpTree {
    /// Index of the `html` element in `nodes`.
    pub html: usize,
    /// Index of the `head` element in `nodes`, if there is one.
    pub head: Option<usize>,
    /// Every node, indexed by its [`NodeId`].
    pub nodes: Vec<DumpNode>,
}

/// One node of a dumped tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DumpNode {
    /// An element.
    Element {
        /// Lowercased tag name.
        name: String,
        /// Attributes in source order.
        #[serde(skip_serializing_if = "Vec::is_empty")]
        attributes: Vec<DumpAttribute>,
        /// The open tag ended in `/>`.
        #[serde(skip_serializing_if = "core::ops::Not::not")]
        self_closing: bool,
        /// Index of the parent node; absent for `html`.
        #[serde(skip_serializing_if = "Option::is_none")]
        parent: Option<usize>,
        /// Indices of the child nodes in order.
        children: Vec<usize>,
    },
    /// A text run.
    Text {
        /// Text contents.
        contents: String,
        /// Index of the parent element.
        #[serde(skip_serializing_if = "Option::is_none")]
        parent: Option<usize>,
    },
}

/// A dumped attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DumpAttribute {
    /// Attribute name as written.
    pub name: String,
    /// Attribute value, empty for boolean attributes.
    pub value: String,
}

impl DomTree<'_> {
    /// Dump every node of the tree.
    #[must_use]
    pub fn dump(&self) -> DumpTree {
        DumpTree {
            html: self.html().0,
            head: self.head().map(|head| head.0),
            nodes: (0..self.len()).map(|id| self.dump_node(NodeId(id))).collect(),
        }
    }

    /// Dump the single node `id`. Relations are given as node indices.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this tree.
    #[must_use]
    pub fn dump_node(&self, id: NodeId) -> DumpNode {
        let node = self.node(id);
        let parent = node.parent.map(|parent| parent.0);
        match node.kind {
            NodeKind::Element(index) => {
                let data = &self.element_data()[index.0];
                DumpNode::Element {
                    name: data.name_lossy(),
                    attributes: self
                        .attributes(id)
                        .iter()
                        .map(|a| DumpAttribute {
                            name: a.name_lossy(),
                            value: a.value_lossy(),
                        })
                        .collect(),
                    self_closing: data.self_closing,
                    parent,
                    children: self.children(id).iter().map(|child| child.0).collect(),
                }
            }
            NodeKind::Text(index) => DumpNode::Text {
                contents: self.text_data()[index.0].contents_lossy(),
                parent,
            },
        }
    }
}
