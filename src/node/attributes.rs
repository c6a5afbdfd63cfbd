/// Attribute key that holds the `[tag=value]` shorthand.
pub const DEFAULT_KEY: &str = "default";

/// Ordered attributes of a tag node.
///
/// The `default` attribute always exists, though it may hold no value. Every other key is kept in the order it was
/// first inserted. Values produced by the parser are already HTML escaped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    default: Option<String>,
    named: Vec<(String, String)>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attributes holding only a `default` value.
    pub fn with_default(value: impl Into<String>) -> Self {
        Self {
            default: Some(value.into()),
            named: vec![],
        }
    }

    /// The value given with `[tag=value]`, if any.
    pub fn default_value(&self) -> Option<&str> {
        self.default.as_deref()
    }

    /// Like [`Attributes::default_value`], but treats an empty value as missing.
    pub fn non_empty_default(&self) -> Option<&str> {
        self.default_value().filter(|v| !v.is_empty())
    }

    pub fn set_default(&mut self, value: Option<String>) {
        self.default = value;
    }

    /// Looks up a value by key. `"default"` resolves to the default value.
    pub fn get(&self, key: &str) -> Option<&str> {
        if key == DEFAULT_KEY {
            return self.default_value();
        }

        self.named
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Inserts or replaces a value. Replacing keeps the key's original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();

        if key == DEFAULT_KEY {
            self.default = Some(value);
            return;
        }

        match self.named.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.named.push((key, value)),
        }
    }

    /// Removes a named value, returning it.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        if key == DEFAULT_KEY {
            return self.default.take();
        }

        let idx = self.named.iter().position(|(k, _)| k == key)?;
        Some(self.named.remove(idx).1)
    }

    /// Named entries in insertion order. Does not include `default`.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.named.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of named entries.
    pub fn len(&self) -> usize {
        self.named.len()
    }

    /// True when there is neither a default value nor any named entry.
    pub fn is_empty(&self) -> bool {
        self.default.is_none() && self.named.is_empty()
    }

    /// Writes the attributes back out in BBCode form, e.g. `=red size="2"`.
    /// Values are written as stored (already escaped), keys are escaped here.
    pub(crate) fn write_bbcode(&self, out: &mut String) {
        if let Some(default) = &self.default {
            out.push('=');
            out.push_str(default);
        }

        for (key, value) in self.iter() {
            out.push(' ');
            out.push_str(&html_escape::encode_quoted_attribute(key));
            out.push_str("=\"");
            out.push_str(value);
            out.push('"');
        }
    }
}
