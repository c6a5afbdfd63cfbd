use crate::{
    error::ParseError,
    html,
    node::{NodeId, NodeRef, Tree},
    parser::{Parser, ParserConfig},
    registry::{BBCode, TagRegistry},
};

/// A parsed BBCode document: the node tree together with the registry it was parsed with.
///
/// A document is used once: [parse][Document::parse], optionally run the detection passes, then
/// [render][Document::render].
///
/// ```
/// # use bbtree::{Document, ParseError};
/// # fn main() -> Result<(), ParseError> {
/// let mut doc = Document::default();
/// let html = doc.parse("[b]hello[/b] www.example.com")?.detect_links().render();
/// assert_eq!(html, "<strong>hello</strong> <a href=\"http://www.example.com\">www.example.com</a>");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Document {
    tree: Tree,
    registry: TagRegistry,
    config: ParserConfig,
}

#[cfg(feature = "builtins")]
impl Default for Document {
    /// A lenient document with the [built-in tags][crate::html::builtins::default_tags].
    fn default() -> Self {
        Self::with_tags(crate::html::builtins::default_tags())
    }
}

impl Document {
    /// A lenient document with no tags registered.
    pub fn empty() -> Self {
        Self::new(TagRegistry::new(), ParserConfig::default())
    }

    /// A lenient document with the given tags.
    pub fn with_tags(tags: Vec<BBCode>) -> Self {
        Self::new(TagRegistry::with_tags(tags), ParserConfig::default())
    }

    pub fn new(registry: TagRegistry, config: ParserConfig) -> Self {
        Self {
            tree: Tree::new(),
            registry,
            config,
        }
    }

    /// Parses `input` into this document, appending after anything parsed before.
    ///
    /// # Errors
    /// Only when `throw_errors` is set: [`ParseError::InvalidNesting`] as soon as a block tag is opened inside an
    /// inline one, and [`ParseError::MissingEndTag`] if a tag is still open at the end. The nodes parsed up to that
    /// point stay in the document.
    pub fn parse(&mut self, input: &str) -> Result<&mut Self, ParseError> {
        Parser::new(&self.registry, &mut self.tree, self.config).parse(input)?;
        Ok(self)
    }

    /// Renders the document to HTML.
    pub fn render(&self) -> String {
        self.html(true)
    }

    /// Renders the document to HTML, converting newlines in text to `<br />` only if `escape_newlines` is set.
    pub fn html(&self, escape_newlines: bool) -> String {
        let mut out = String::new();
        html::write_node(self.root(), escape_newlines, &mut out);
        out
    }

    /// All text in the document, without tags and **unescaped**. Not safe to display as HTML.
    pub fn raw_text(&self) -> String {
        self.tree.raw_text(NodeId::ROOT)
    }

    pub fn root(&self) -> NodeRef<'_> {
        NodeRef::new(self, NodeId::ROOT)
    }

    pub fn node(&self, id: NodeId) -> NodeRef<'_> {
        NodeRef::new(self, id)
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut Tree {
        &mut self.tree
    }

    pub fn registry(&self) -> &TagRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut TagRegistry {
        &mut self.registry
    }

    /// Splits the document into its tree and registry, e.g. so the tree can be changed while reading the registry.
    pub(crate) fn parts_mut(&mut self) -> (&mut Tree, &TagRegistry) {
        (&mut self.tree, &self.registry)
    }

    pub fn throw_errors(&self) -> bool {
        self.config.throw_errors
    }

    pub fn set_throw_errors(&mut self, throw_errors: bool) {
        self.config.throw_errors = throw_errors;
    }

    pub fn max_depth(&self) -> usize {
        self.config.max_depth
    }

    /// See [`ParserConfig::max_depth`]. Only affects later calls to [`Document::parse`].
    pub fn set_max_depth(&mut self, max_depth: usize) {
        self.config.max_depth = max_depth;
    }

    /// See [`TagRegistry::register`].
    pub fn register_tag(&mut self, bbcode: BBCode, replace: bool) -> bool {
        self.registry.register(bbcode, replace)
    }

    pub fn register_tags(&mut self, tags: impl IntoIterator<Item = BBCode>, replace: bool) {
        self.registry.register_all(tags, replace)
    }

    pub fn unregister_tag(&mut self, name: &str) -> Option<BBCode> {
        self.registry.unregister(name)
    }

    pub fn tag(&self, name: &str) -> Option<&BBCode> {
        self.registry.get(name)
    }

    /// Registered tag names, sorted.
    pub fn list_tags(&self) -> Vec<&str> {
        self.registry.names()
    }

    /// See [`TagRegistry::add_emoticon`].
    pub fn add_emoticon(&mut self, key: impl Into<String>, url: impl Into<String>, replace: bool) -> bool {
        self.registry.add_emoticon(key, url, replace)
    }

    pub fn add_emoticons<I, K, U>(&mut self, emoticons: I, replace: bool)
    where
        I: IntoIterator<Item = (K, U)>,
        K: Into<String>,
        U: Into<String>,
    {
        self.registry.add_emoticons(emoticons, replace)
    }

    pub fn remove_emoticon(&mut self, key: &str) -> Option<String> {
        self.registry.remove_emoticon(key)
    }

    pub fn base_uri(&self) -> &str {
        self.registry.base_uri()
    }

    pub fn set_base_uri(&mut self, uri: Option<String>) {
        self.registry.set_base_uri(uri)
    }
}
