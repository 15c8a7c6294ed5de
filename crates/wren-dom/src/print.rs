use core::fmt::{self, Write};

use crate::{DomTree, NodeId, NodeKind};

/// Deepest level the outline indents to.
const MAX_OUTLINE_INDENT: usize = 40;

impl DomTree<'_> {
    /// Serialize the tree back to markup, starting at `html`.
    ///
    /// Attribute values are always written double-quoted; boolean attributes
    /// are written bare. Self-closing elements are written as `<name/>`.
    #[must_use]
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_markup(&mut out, self.html());
        out
    }

    /// Serialize the subtree rooted at `id` into `out`.
    ///
    /// The walk keeps its own stack, so nesting depth is limited only by
    /// memory.
    ///
    /// # Errors
    ///
    /// Returns any error produced by `out`.
    pub fn write_markup<W: Write>(&self, out: &mut W, id: NodeId) -> fmt::Result {
        // (node, closing): an element is pushed a second time to write its
        // end tag once its children are done.
        let mut pending = vec![(id, false)];
        while let Some((id, closing)) = pending.pop() {
            match self.node(id).kind {
                NodeKind::Text(index) => {
                    out.write_str(&self.text_data()[index.0].contents_lossy())?;
                }
                NodeKind::Element(index) => {
                    let data = &self.element_data()[index.0];
                    let name = String::from_utf8_lossy(data.name);
                    if closing {
                        write!(out, "</{name}>")?;
                        continue;
                    }
                    write!(out, "<{name}")?;
                    for attr in self.attributes(id) {
                        if attr.value.is_empty() {
                            write!(out, " {}", attr.name_lossy())?;
                        } else {
                            write!(out, " {}=\"{}\"", attr.name_lossy(), attr.value_lossy())?;
                        }
                    }
                    if data.self_closing {
                        out.write_str("/>")?;
                        continue;
                    }
                    out.write_char('>')?;
                    pending.push((id, true));
                    pending.extend(self.children(id).iter().rev().map(|&child| (child, false)));
                }
            }
        }
        Ok(())
    }

    /// An indented outline of the tree, one node per line.
    ///
    /// Text is quoted with newlines shown as `\n` and spaces as `·`, so
    /// whitespace-only runs stay visible. Indentation stops growing after
    /// 40 levels; deeper lines carry their depth as a
    /// `[depth]` prefix instead.
    #[must_use]
    pub fn outline(&self) -> String {
        let mut out = String::new();
        let mut pending = vec![(self.html(), 0)];
        while let Some((id, depth)) = pending.pop() {
            self.outline_line(&mut out, id, depth);
            pending.extend(self.children(id).iter().rev().map(|&child| (child, depth + 1)));
        }
        out
    }

    fn outline_line(&self, out: &mut String, id: NodeId, depth: usize) {
        let mut prefix = "  ".repeat(depth.min(MAX_OUTLINE_INDENT));
        if depth > MAX_OUTLINE_INDENT {
            let _ = write!(prefix, "[{depth}] ");
        }
        if let Some(data) = self.as_element(id) {
            let attrs: Vec<String> = self
                .attributes(id)
                .iter()
                .map(|a| {
                    if a.value.is_empty() {
                        a.name_lossy()
                    } else {
                        format!("{}=\"{}\"", a.name_lossy(), a.value_lossy())
                    }
                })
                .collect();
            let close = if data.self_closing { "/>" } else { ">" };
            if attrs.is_empty() {
                let _ = writeln!(out, "{prefix}<{}{close}", data.name_lossy());
            } else {
                let _ = writeln!(out, "{prefix}<{} {}{close}", data.name_lossy(), attrs.join(" "));
            }
        } else if let Some(text) = self.as_text(id) {
            let display = text
                .contents_lossy()
                .replace('\n', "\\n")
                .replace(' ', "\u{00B7}");
            let _ = writeln!(out, "{prefix}\"{display}\"");
        }
    }
}

impl fmt::Display for DomTree<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_markup(f, self.html())
    }
}
