//! HTML rendering of a parsed [`Document`][crate::Document].
//!
//! Text is escaped here; tags are rendered by the [handler][crate::registry::Handler] of their registered
//! definition, after their children.
use crate::node::{Node, NodeRef};

const LOG_TARGET: &str = "bbtree.html";

/// Escapes user text for HTML. Newlines become `<br />` when `escape_newlines` is set, and runs of two spaces keep
/// their width with `&nbsp;`.
pub fn escape_text(text: &str, escape_newlines: bool) -> String {
    let escaped = html_escape::encode_quoted_attribute(text);
    let escaped = if escape_newlines && escaped.contains('\n') {
        escaped.replace('\n', "<br />\n")
    } else {
        escaped.into_owned()
    };

    if escaped.contains("  ") {
        escaped.replace("  ", " &nbsp;")
    } else {
        escaped
    }
}

/// Renders `node` and everything below it, pushing the HTML into `out`.
/// # Remarks
/// The `out` buffer may already have contents; they are left untouched.
///
/// The walk keeps its own stack, so nesting depth is bounded by memory rather than the thread's stack.
pub(crate) fn write_node(node: NodeRef<'_>, escape_newlines: bool, out: &mut String) {
    if let Node::Text(text) = node.node() {
        out.push_str(&escape_text(text, escape_newlines));
        return;
    }

    let mut stack = vec![Frame::new(node)];

    while let Some(frame) = stack.last_mut() {
        match frame.next_child() {
            Some(child) => match child.node() {
                Node::Text(text) => frame.content.push_str(&escape_text(text, escape_newlines)),
                _ => stack.push(Frame::new(child)),
            },
            None => {
                let Some(done) = stack.pop() else {
                    break;
                };
                let html = done.finish();
                match stack.last_mut() {
                    Some(parent) => parent.content.push_str(&html),
                    None => out.push_str(&html),
                }
            }
        }
    }
}

/// A container being rendered: its next child to visit and the HTML of the children so far.
struct Frame<'a> {
    node: NodeRef<'a>,
    next: usize,
    content: String,
}

impl<'a> Frame<'a> {
    fn new(node: NodeRef<'a>) -> Self {
        Self {
            node,
            next: 0,
            content: String::new(),
        }
    }

    fn next_child(&mut self) -> Option<NodeRef<'a>> {
        let document = self.node.root();
        let id = *document.tree().children(self.node.id()).get(self.next)?;
        self.next += 1;
        Some(document.node(id))
    }

    /// The HTML of the container itself, given its rendered children.
    fn finish(self) -> String {
        let Some(tag) = self.node.node().as_tag() else {
            return self.content;
        };

        match self.node.root().registry().get(tag.name()) {
            Some(def) => def.render(&self.content, tag.attributes(), self.node),
            None => {
                log::trace!(target: LOG_TARGET, "no definition for [{}], writing it as text", tag.name());

                let name = html_escape::encode_quoted_attribute(tag.name());
                let mut out = String::with_capacity(self.content.len() + 2 * name.len() + 5);

                out.push('[');
                out.push_str(&name);
                tag.attributes().write_bbcode(&mut out);
                out.push(']');
                out.push_str(&self.content);
                out.push_str("[/");
                out.push_str(&name);
                out.push(']');
                out
            }
        }
    }
}

#[cfg(feature = "builtins")]
pub mod builtins;

#[cfg(test)]
mod tests;
