use crate::{DomTree, NodeId};

/// Iterator over ancestors of a node.
#[derive(Debug, Clone)]
pub struct AncestorIterator<'a, 'src> {
    tree: &'a DomTree<'src>,
    current: Option<NodeId>,
}

impl<'a, 'src> AncestorIterator<'a, 'src> {
    pub(crate) const fn new(tree: &'a DomTree<'src>, start: Option<NodeId>) -> Self {
        Self {
            tree,
            current: start,
        }
    }
}

impl Iterator for AncestorIterator<'_, '_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}

/// Iterator over the siblings of a node in one direction.
#[derive(Debug, Clone)]
pub struct SiblingIterator<'a, 'src> {
    tree: &'a DomTree<'src>,
    current: Option<NodeId>,
    forward: bool,
}

impl<'a, 'src> SiblingIterator<'a, 'src> {
    pub(crate) const fn forward(tree: &'a DomTree<'src>, start: Option<NodeId>) -> Self {
        Self {
            tree,
            current: start,
            forward: true,
        }
    }

    pub(crate) const fn backward(tree: &'a DomTree<'src>, start: Option<NodeId>) -> Self {
        Self {
            tree,
            current: start,
            forward: false,
        }
    }
}

impl Iterator for SiblingIterator<'_, '_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = if self.forward {
            self.tree.next_sibling(id)
        } else {
            self.tree.prev_sibling(id)
        };
        Some(id)
    }
}

/// Pre-order iterator over the descendants of a node.
#[derive(Debug, Clone)]
pub struct DescendantIterator<'a, 'src> {
    tree: &'a DomTree<'src>,
    pending: Vec<NodeId>,
}

impl<'a, 'src> DescendantIterator<'a, 'src> {
    pub(crate) fn new(tree: &'a DomTree<'src>, root: NodeId) -> Self {
        let pending = tree.children(root).iter().rev().copied().collect();
        Self { tree, pending }
    }
}

impl Iterator for DescendantIterator<'_, '_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.pending.pop()?;
        self.pending
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}
