use std::{fmt, sync::Arc};

use bitflags::bitflags;
use static_assertions::{assert_impl_all, assert_obj_safe};

use crate::node::{Attributes, NodeRef};

/// Sentinel entry of [`BBCode::accepted_children`] that allows literal text inside the tag.
pub const TEXT_NODE: &str = "text_node";

/// Placeholder replaced by the rendered children in template handlers.
pub const CONTENT_PLACEHOLDER: &str = "%content%";

bitflags! {
    /// Auto-detection passes a tag opts out of for its whole subtree.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct AutoDetect: u8 {
        /// Skip URL detection.
        const URL = 1 << 0;
        /// Skip email detection.
        const EMAIL = 1 << 1;
        /// Skip emoticon replacement.
        const EMOTICON = 1 << 2;

        /// Skip every pass.
        const ALL = Self::URL.bits() | Self::EMAIL.bits() | Self::EMOTICON.bits();
    }
}

/// Whether a tag is inline or block level. Only consulted by the strict nesting check.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    #[default]
    Inline,
    Block,
}

/// Renders a tag node whose children have already been rendered to `content`.
///
/// Implemented for every `Fn(&str, &Attributes, NodeRef<'_>) -> String + Send + Sync`.
pub trait TagHandler: Send + Sync {
    fn render(&self, content: &str, attributes: &Attributes, node: NodeRef<'_>) -> String;
}

assert_obj_safe!(TagHandler);

impl<F> TagHandler for F
where
    F: Fn(&str, &Attributes, NodeRef<'_>) -> String + Send + Sync,
{
    fn render(&self, content: &str, attributes: &Attributes, node: NodeRef<'_>) -> String {
        self(content, attributes, node)
    }
}

/// How a tag turns into HTML.
#[derive(Clone)]
pub enum Handler {
    /// Literal HTML with every `%content%` replaced by the rendered children.
    Template(String),
    /// A function of the rendered children, the attributes and the node itself.
    Function(Arc<dyn TagHandler>),
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handler::Template(template) => f.debug_tuple("Template").field(template).finish(),
            Handler::Function(_) => f.write_str("Function(..)"),
        }
    }
}

/// Definition of one BBCode tag: its grammar rules and how it renders.
///
/// Names, [closing tags][BBCode::closing_tags] and [accepted children][BBCode::accepted_children] are stored lower
/// cased; lookups are ASCII case-insensitive.
///
/// ```
/// # use bbtree::BBCode;
/// let li = BBCode::new("*", "<li>%content%</li>")
///     .block()
///     .closing_tags(["*", "LI", "/list"]);
/// assert!(li.closed_by_open("li"));
/// assert!(li.closed_by_close("list"));
/// ```
#[derive(Debug, Clone)]
pub struct BBCode {
    name: String,
    kind: TagKind,
    handler: Handler,
    self_closing: bool,
    closing_tags: Vec<String>,
    accepted_children: Vec<String>,
    auto_detect_exclude: AutoDetect,
}

assert_impl_all!(BBCode: Send, Sync, Clone);

impl BBCode {
    /// An inline tag rendered from a template containing `%content%`.
    pub fn new(name: impl Into<String>, template: impl Into<String>) -> Self {
        Self::with_handler(name, Handler::Template(template.into()))
    }

    /// An inline tag rendered by a function.
    pub fn with_fn<F>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&str, &Attributes, NodeRef<'_>) -> String + Send + Sync + 'static,
    {
        Self::with_handler(name, Handler::Function(Arc::new(handler)))
    }

    pub fn with_handler(name: impl Into<String>, handler: Handler) -> Self {
        Self {
            name: name.into().to_ascii_lowercase(),
            kind: TagKind::Inline,
            handler,
            self_closing: false,
            closing_tags: vec![],
            accepted_children: vec![],
            auto_detect_exclude: AutoDetect::empty(),
        }
    }

    /// Marks the tag as block level.
    pub fn block(mut self) -> Self {
        self.kind = TagKind::Block;
        self
    }

    pub fn kind(mut self, kind: TagKind) -> Self {
        self.kind = kind;
        self
    }

    /// Marks the tag as self-closing: it never has children or a close tag.
    pub fn self_closing(mut self) -> Self {
        self.self_closing = true;
        self
    }

    /// Tags whose opening implicitly closes this one. An entry written `/name` means the close tag `[/name]` does.
    pub fn closing_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.closing_tags = lowercase_all(tags);
        self
    }

    /// Tags allowed directly inside this one. Empty means anything goes; include [`TEXT_NODE`] to allow text.
    pub fn accepted_children<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.accepted_children = lowercase_all(tags);
        self
    }

    /// Detection passes to skip inside this tag.
    pub fn exclude(mut self, exclude: AutoDetect) -> Self {
        self.auto_detect_exclude = exclude;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tag_kind(&self) -> TagKind {
        self.kind
    }

    pub fn is_inline(&self) -> bool {
        self.kind == TagKind::Inline
    }

    pub fn is_block(&self) -> bool {
        self.kind == TagKind::Block
    }

    pub fn handler(&self) -> &Handler {
        &self.handler
    }

    pub fn is_self_closing(&self) -> bool {
        self.self_closing
    }

    pub fn closing_tag_list(&self) -> &[String] {
        &self.closing_tags
    }

    pub fn accepted_children_list(&self) -> &[String] {
        &self.accepted_children
    }

    pub fn auto_detect_exclude(&self) -> AutoDetect {
        self.auto_detect_exclude
    }

    /// Whether opening `tag` inside this one closes this one first.
    pub fn closed_by_open(&self, tag: &str) -> bool {
        self.closing_tags.iter().any(|t| t == tag)
    }

    /// Whether the close tag `[/tag]` closes this one when the names differ.
    pub fn closed_by_close(&self, tag: &str) -> bool {
        self.closing_tags
            .iter()
            .any(|t| t == tag || t.strip_prefix('/') == Some(tag))
    }

    pub fn restricts_children(&self) -> bool {
        !self.accepted_children.is_empty()
    }

    /// Whether `child` (a tag name or [`TEXT_NODE`]) may be placed directly inside this tag.
    pub fn accepts(&self, child: &str) -> bool {
        !self.restricts_children() || self.accepted_children.iter().any(|c| c == child)
    }

    /// Renders a node of this tag given its already rendered children.
    pub fn render(&self, content: &str, attributes: &Attributes, node: NodeRef<'_>) -> String {
        match &self.handler {
            Handler::Template(template) => template.replace(CONTENT_PLACEHOLDER, content),
            Handler::Function(handler) => handler.render(content, attributes, node),
        }
    }
}

fn lowercase_all<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tags.into_iter()
        .map(|t| t.as_ref().to_ascii_lowercase())
        .collect()
}
