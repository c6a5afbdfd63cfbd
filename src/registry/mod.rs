//! Tag definitions, emoticons and the base URI a [`Document`][crate::Document] parses and renders with.
use std::collections::{BTreeMap, BTreeSet};

mod definition;

pub use definition::{AutoDetect, BBCode, Handler, TagHandler, TagKind, CONTENT_PLACEHOLDER, TEXT_NODE};

/// Base URI reported when none has been set.
pub const DEFAULT_BASE_URI: &str = "/";

/// The grammar of a document: tag definitions keyed by name, plus the emoticon table and base URI.
#[derive(Debug, Clone, Default)]
pub struct TagRegistry {
    tags: BTreeMap<String, BBCode>,
    emoticons: BTreeMap<String, String>,
    base_uri: Option<String>,
}

impl TagRegistry {
    /// A registry with no tags.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the given tags. Later duplicates replace earlier ones.
    pub fn with_tags(tags: Vec<BBCode>) -> Self {
        let mut registry = Self::new();
        registry.register_all(tags, true);
        registry
    }

    /// Registers a tag definition. If `replace` is false and the name is taken, nothing changes and false is returned.
    pub fn register(&mut self, bbcode: BBCode, replace: bool) -> bool {
        if !replace && self.tags.contains_key(bbcode.name()) {
            return false;
        }

        self.tags.insert(bbcode.name().to_owned(), bbcode);
        true
    }

    pub fn register_all(&mut self, tags: impl IntoIterator<Item = BBCode>, replace: bool) {
        for tag in tags {
            self.register(tag, replace);
        }
    }

    /// Removes a tag definition, returning it.
    pub fn unregister(&mut self, name: &str) -> Option<BBCode> {
        self.tags.remove(&name.to_ascii_lowercase())
    }

    /// Looks up a tag definition, ignoring ASCII case.
    pub fn get(&self, name: &str) -> Option<&BBCode> {
        match self.tags.get(name) {
            Some(tag) => Some(tag),
            None if name.bytes().any(|b| b.is_ascii_uppercase()) => {
                self.tags.get(&name.to_ascii_lowercase())
            }
            None => None,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Registered tag names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.tags.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BBCode> {
        self.tags.values()
    }

    /// Names of every tag that opts out of any of the `kind` detection passes.
    pub fn excluded_tags(&self, kind: AutoDetect) -> BTreeSet<String> {
        self.tags
            .values()
            .filter(|tag| tag.auto_detect_exclude().intersects(kind))
            .map(|tag| tag.name().to_owned())
            .collect()
    }

    /// Adds an emoticon. If `replace` is false and the key is taken, nothing changes and false is returned.
    pub fn add_emoticon(&mut self, key: impl Into<String>, url: impl Into<String>, replace: bool) -> bool {
        let key = key.into();
        if key.is_empty() || (!replace && self.emoticons.contains_key(&key)) {
            return false;
        }

        self.emoticons.insert(key, url.into());
        true
    }

    pub fn add_emoticons<I, K, U>(&mut self, emoticons: I, replace: bool)
    where
        I: IntoIterator<Item = (K, U)>,
        K: Into<String>,
        U: Into<String>,
    {
        for (key, url) in emoticons {
            self.add_emoticon(key, url, replace);
        }
    }

    /// Removes an emoticon, returning its URL.
    pub fn remove_emoticon(&mut self, key: &str) -> Option<String> {
        self.emoticons.remove(key)
    }

    pub fn emoticon(&self, key: &str) -> Option<&str> {
        self.emoticons.get(key).map(String::as_str)
    }

    /// Emoticons as `(key, url)` pairs, sorted by key.
    pub fn emoticons(&self) -> impl Iterator<Item = (&str, &str)> {
        self.emoticons.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The URI relative links and images are resolved against. Defaults to [`DEFAULT_BASE_URI`].
    pub fn base_uri(&self) -> &str {
        self.base_uri.as_deref().unwrap_or(DEFAULT_BASE_URI)
    }

    pub fn set_base_uri(&mut self, uri: Option<String>) {
        self.base_uri = uri;
    }
}

#[cfg(test)]
mod tests;
