//! Single pass BBCode parser building a [`Tree`].
//!
//! The parser scans the input one character at a time, collecting either literal text or the contents of a
//! `[...]` bracket. Brackets naming a registered tag open or close containers; anything else stays literal text.
//! Badly nested input is repaired rather than rejected unless [`ParserConfig::throw_errors`] is set.
use crate::{
    error::ParseError,
    node::{Attributes, NodeId, Tree},
    registry::{TagRegistry, TEXT_NODE},
};

mod attributes;

pub(crate) use attributes::parse_attributes;

const LOG_TARGET: &str = "bbtree.parser";

/// Default for [`ParserConfig::max_depth`].
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Parser behaviour switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// Report missing end tags and block tags inside inline tags as [`ParseError`]s instead of repairing them.
    pub throw_errors: bool,
    /// Most tags that may be open at once. Open tags past this are kept as literal text.
    pub max_depth: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            throw_errors: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParserConfig {
    pub fn strict() -> Self {
        Self {
            throw_errors: true,
            ..Self::default()
        }
    }
}

/// Parsing state: the tree being built and the container new nodes go into.
pub(crate) struct Parser<'a> {
    registry: &'a TagRegistry,
    tree: &'a mut Tree,
    config: ParserConfig,
    current: NodeId,
    /// Number of tags open above `current`, counting `current` itself.
    depth: usize,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(registry: &'a TagRegistry, tree: &'a mut Tree, config: ParserConfig) -> Self {
        let current = tree.root();
        Self {
            registry,
            tree,
            config,
            current,
            depth: 0,
        }
    }

    /// Parses `input`, appending to the document node.
    pub(crate) fn parse(mut self, input: &str) -> Result<(), ParseError> {
        let input = normalize_newlines(input);

        let mut text = String::new();
        let mut bracket = String::new();
        let mut in_bracket = false;

        for ch in input.chars() {
            match ch {
                '[' => {
                    // The previous bracket never closed, so it was just text.
                    if in_bracket {
                        text.push('[');
                        text.push_str(&bracket);
                    }
                    in_bracket = true;
                    bracket.clear();
                }
                ']' if in_bracket => {
                    self.bracket(&bracket, &mut text)?;
                    in_bracket = false;
                    bracket.clear();
                }
                _ if in_bracket => bracket.push(ch),
                _ => text.push(ch),
            }
        }

        if in_bracket {
            text.push('[');
            text.push_str(&bracket);
        }
        self.text(text);

        if self.current != self.tree.root() {
            if self.config.throw_errors {
                return Err(ParseError::MissingEndTag {
                    tag: self.current_tag().unwrap_or_default().to_owned(),
                });
            }

            log::trace!(
                target: LOG_TARGET,
                "closing [{}] and its open ancestors at end of input",
                self.current_tag().unwrap_or_default()
            );
        }

        log::debug!(
            target: LOG_TARGET,
            "parsed {} bytes, {} top level nodes",
            input.len(),
            self.tree.children(self.tree.root()).len()
        );

        Ok(())
    }

    /// Handles the contents of a completed `[...]`. Anything that does not turn into a tag is appended to `text`.
    fn bracket(&mut self, contents: &str, text: &mut String) -> Result<(), ParseError> {
        let trimmed = contents.trim();
        let (name, attrs) = match trimmed.find([' ', '=']) {
            Some(idx) => trimmed.split_at(idx),
            None => (trimmed, ""),
        };

        let (closing, name) = match name.strip_prefix('/') {
            Some(name) => (true, name),
            None => (false, name),
        };

        let registry = self.registry;
        let Some(def) = registry.get(name) else {
            push_literal(text, contents);
            return Ok(());
        };
        let name = def.name();

        self.text(std::mem::take(text));

        let handled = if closing {
            self.close(name)
        } else {
            self.open(name, parse_attributes(attrs))?
        };

        if !handled {
            push_literal(text, contents);
        }

        Ok(())
    }

    fn current_tag(&self) -> Option<&str> {
        self.tree.tag_name(self.current)
    }

    /// Opens `name`. Returns false if the current container does not accept it.
    fn open(&mut self, name: &str, attributes: Attributes) -> Result<bool, ParseError> {
        let registry = self.registry;

        if let Some(current) = self.current_tag().and_then(|t| registry.get(t)) {
            if current.closed_by_open(name) {
                let current = current.name();
                self.close(current);
            }
        }

        let Some(def) = registry.get(name) else {
            return Ok(false);
        };

        if let Some(parent) = self.current_tag().and_then(|t| registry.get(t)) {
            if !parent.accepts(name) {
                log::trace!(target: LOG_TARGET, "[{}] does not accept [{}]", parent.name(), name);
                return Ok(false);
            }

            if self.config.throw_errors && def.is_block() && parent.is_inline() {
                return Err(ParseError::InvalidNesting {
                    tag: name.to_owned(),
                    parent: parent.name().to_owned(),
                });
            }
        }

        let self_closing = def.is_self_closing();
        if !self_closing && self.depth >= self.config.max_depth {
            log::trace!(target: LOG_TARGET, "[{}] would nest deeper than {}", name, self.config.max_depth);
            return Ok(false);
        }

        let node = self.tree.create_tag(name, attributes);
        self.tree.append_new(self.current, node);

        if !self_closing {
            self.current = node;
            self.depth += 1;
        }

        Ok(true)
    }

    /// Closes `name`. Returns false if nothing open matches it.
    fn close(&mut self, name: &str) -> bool {
        let registry = self.registry;

        if let Some(current) = self.current_tag().and_then(|t| registry.get(t)) {
            if current.name() != name && current.closed_by_close(name) {
                self.pop();
            }
        }

        let Some(current) = self.current_tag() else {
            log::trace!(target: LOG_TARGET, "stray [/{}] with nothing open", name);
            return false;
        };

        if current == name {
            self.pop();
            return true;
        }

        // Overlapping tags like [b][i]..[/b]..[/i]: close up to the matching ancestor, then re-open everything
        // that was skipped so its formatting carries on.
        let Some(ancestor) = self.tree.find_parent_by_tag(self.current, name) else {
            log::trace!(target: LOG_TARGET, "stray [/{}] inside [{}]", name, current);
            return false;
        };

        let mut skipped = vec![];
        let mut node = self.current;
        while node != ancestor {
            skipped.push(node);
            match self.tree.parent(node) {
                Some(parent) => node = parent,
                None => break,
            }
        }

        self.current = self.tree.parent(ancestor).unwrap_or(NodeId::ROOT);
        self.depth = self.depth.saturating_sub(skipped.len() + 1);

        for &node in skipped.iter().rev() {
            let Some(tag) = self.tree.get(node).as_tag() else {
                continue;
            };
            let (tag, attributes) = (tag.name().to_owned(), tag.attributes().clone());

            log::trace!(target: LOG_TARGET, "re-opening [{}] after [/{}]", tag, name);

            let reopened = self.tree.create_tag(tag, attributes);
            self.tree.append_new(self.current, reopened);
            self.current = reopened;
            self.depth += 1;
        }

        true
    }

    fn pop(&mut self) {
        if let Some(parent) = self.tree.parent(self.current) {
            self.current = parent;
            self.depth = self.depth.saturating_sub(1);
        }
    }

    /// Appends literal text to the current container, unless it only accepts tags.
    fn text(&mut self, text: String) {
        if text.is_empty() {
            return;
        }

        let registry = self.registry;
        if let Some(current) = self.current_tag().and_then(|t| registry.get(t)) {
            if !current.accepts(TEXT_NODE) {
                log::trace!(target: LOG_TARGET, "[{}] drops text {:?}", current.name(), text);
                return;
            }
        }

        let node = self.tree.create_text(text);
        self.tree.append_new(self.current, node);
    }
}

fn push_literal(text: &mut String, contents: &str) {
    text.push('[');
    text.push_str(contents);
    text.push(']');
}

/// Converts `\r\n` and lone `\r` to `\n`.
fn normalize_newlines(input: &str) -> std::borrow::Cow<'_, str> {
    if !input.contains('\r') {
        return input.into();
    }

    input.replace("\r\n", "\n").replace('\r', "\n").into()
}
