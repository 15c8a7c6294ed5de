use wren_arena::{Arena, ArenaConfig, ArenaKind, ArenaVec, Snapshot};
use wren_dom::NodeId;

/// An element that has been opened but not yet closed, together with the
/// children appended to it so far.
#[derive(Debug, Clone, Copy, Default)]
struct OpenElement {
    node: NodeId,
    children: ArenaVec<NodeId>,
}

/// [§ 13.2.4.3 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
///
/// "Initially, the stack of open elements is empty. The stack grows downwards;
/// the topmost node on the stack is the first one added to the stack, and the
/// bottommost node of the stack is the most recently added node in the stack."
///
/// Entries and their unsealed child lists live in two scratch arenas owned
/// by the stack. Pushing an element snapshots the child-list arena; popping
/// it hands its children to the caller for sealing and then restores that
/// snapshot. Everything above the snapshot belongs to the element and its
/// already-sealed descendants, so the arena only ever holds the lists of
/// elements that are still open.
#[derive(Debug)]
pub(super) struct OpenElementStack {
    entries: ArenaVec<OpenElement>,
    records: Arena<OpenElement>,
    children: Arena<NodeId>,
    marks: Vec<Snapshot>,
}

impl OpenElementStack {
    pub(super) fn new(config: ArenaConfig) -> Self {
        Self {
            entries: ArenaVec::new(),
            records: Arena::new(ArenaKind::Scratch, config),
            children: Arena::new(ArenaKind::Scratch, config),
            marks: Vec::new(),
        }
    }

    #[cfg(test)]
    pub(super) const fn len(&self) -> usize {
        self.entries.len()
    }

    pub(super) const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// "The current node is the bottommost node in this stack of open elements."
    pub(super) fn current_node(&self) -> Option<NodeId> {
        self.entries.last(&self.records).map(|entry| entry.node)
    }

    pub(super) fn push(&mut self, node: NodeId) {
        self.marks.push(self.children.snapshot());
        self.entries.push(
            &mut self.records,
            OpenElement {
                node,
                children: ArenaVec::new(),
            },
        );
    }

    /// Append `child` to the current node's children and return the child
    /// that preceded it, if any.
    ///
    /// # Panics
    ///
    /// Panics if the stack is empty.
    pub(super) fn append_child(&mut self, child: NodeId) -> Option<NodeId> {
        let Some(current) = self.entries.as_mut_slice(&mut self.records).last_mut() else {
            panic!("inserting {child:?} with no open element");
        };
        let previous = current.children.last(&self.children);
        current.children.push(&mut self.children, child);
        previous
    }

    /// Remove the current node and pass it to `seal` with its unsealed
    /// children. The child list is released once `seal` returns.
    pub(super) fn pop_with<R>(
        &mut self,
        seal: impl FnOnce(NodeId, &[NodeId]) -> R,
    ) -> Option<R> {
        let entry = self.entries.pop(&self.records)?;
        let sealed = seal(entry.node, entry.children.as_slice(&self.children));
        if let Some(mark) = self.marks.pop() {
            self.children.restore(mark);
        }
        Some(sealed)
    }

    /// Walk the stack from the current node down to the root.
    pub(super) fn iter_from_current(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.entries
            .as_slice(&self.records)
            .iter()
            .rev()
            .map(|entry| entry.node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pop_releases_child_lists() {
        let mut stack = OpenElementStack::new(ArenaConfig::default());
        stack.push(NodeId(0));
        let _ = stack.append_child(NodeId(1));
        let outer = stack.children.len();

        stack.push(NodeId(1));
        for child in 2..40 {
            let _ = stack.append_child(NodeId(child));
        }
        assert!(stack.children.len() > outer);

        let popped = stack.pop_with(|node, children| (node, children.len()));
        assert_eq!(popped, Some((NodeId(1), 38)));
        assert_eq!(stack.children.len(), outer);
        assert_eq!(stack.current_node(), Some(NodeId(0)));
    }

    #[test]
    fn test_parent_list_grows_after_child_is_popped() {
        let mut stack = OpenElementStack::new(ArenaConfig::default());
        stack.push(NodeId(0));
        for child in 1..=3 {
            let _ = stack.append_child(NodeId(child));
            stack.push(NodeId(child));
            let _ = stack.append_child(NodeId(child + 10));
            let _ = stack.pop_with(|_, _| ());
        }
        let previous = stack.append_child(NodeId(4));

        assert_eq!(previous, Some(NodeId(3)));
        let children = stack.pop_with(|_, children| children.to_vec());
        assert_eq!(children, Some(vec![NodeId(1), NodeId(2), NodeId(3), NodeId(4)]));
        assert!(stack.is_empty());
        assert!(stack.children.is_empty());
    }
}
