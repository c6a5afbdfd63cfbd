//! Passes that turn plain URLs, email addresses and emoticons found in text nodes into tags.
//!
//! Each pass skips the subtrees of tags that opt out of it through [`BBCode::exclude`][crate::registry::BBCode::exclude].
use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    node::{Attributes, Node, NodeId, Tree},
    registry::AutoDetect,
    Document,
};

const LOG_TARGET: &str = "bbtree.detect";

static LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?:(?:https?|ftp)://|(?:www|ftp)\.)[a-zA-Z0-9\-.]{1,255}\.[a-zA-Z]{1,20}(?::[0-9]{1,5})?(?:/[^\s'"]*)?"#,
    )
    .unwrap()
});

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-zA-Z0-9\-._]+@[a-zA-Z0-9\-.]{1,255}\.[a-zA-Z]{1,20}").unwrap());

/// Characters that end a sentence rather than a link.
const LINK_TRAILERS: &[char] = &[',', ')', '.'];

/// One piece of a rewritten text node.
enum Segment {
    Text(String),
    Tag {
        name: &'static str,
        attributes: Attributes,
        text: String,
    },
}

impl Document {
    /// Wraps URLs found in text in `url` tags.
    pub fn detect_links(&mut self) -> &mut Self {
        let count = self.rewrite_text(AutoDetect::URL, |text| {
            split_matches(text, LINK.find_iter(text).map(|m| trim_link(m.start(), m.as_str())), |link| {
                let href = if link.starts_with("ftp") && !link[3..].starts_with(':') {
                    format!("ftp://{link}")
                } else if link.starts_with('w') {
                    format!("http://{link}")
                } else {
                    link.to_owned()
                };

                Segment::Tag {
                    name: "url",
                    attributes: Attributes::with_default(html_escape::encode_quoted_attribute(&href)),
                    text: link.to_owned(),
                }
            })
        });

        log::debug!(target: LOG_TARGET, "linked {} text nodes", count);
        self
    }

    /// Wraps email addresses found in text in `email` tags.
    pub fn detect_emails(&mut self) -> &mut Self {
        let count = self.rewrite_text(AutoDetect::EMAIL, |text| {
            split_matches(text, EMAIL.find_iter(text).map(|m| (m.start(), m.as_str())), |address| {
                Segment::Tag {
                    name: "email",
                    attributes: Attributes::new(),
                    text: address.to_owned(),
                }
            })
        });

        log::debug!(target: LOG_TARGET, "found emails in {} text nodes", count);
        self
    }

    /// Replaces emoticons found in text with `img` tags. Longer keys win over their prefixes.
    pub fn detect_emoticons(&mut self) -> &mut Self {
        let mut urls: Vec<(String, String)> = self
            .registry()
            .emoticons()
            .map(|(key, url)| (key.to_owned(), url.to_owned()))
            .collect();
        if urls.is_empty() {
            return self;
        }
        urls.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));

        let pattern = urls
            .iter()
            .map(|(key, _)| regex::escape(key))
            .collect::<Vec<_>>()
            .join("|");

        let regex = match Regex::new(&pattern) {
            Ok(regex) => regex,
            Err(err) => {
                log::warn!(target: LOG_TARGET, "skipping emoticons, pattern failed to build: {}", err);
                return self;
            }
        };

        let count = self.rewrite_text(AutoDetect::EMOTICON, |text| {
            split_matches(text, regex.find_iter(text).map(|m| (m.start(), m.as_str())), |key| {
                let url = urls
                    .iter()
                    .find(|(k, _)| k == key)
                    .map(|(_, url)| url.as_str())
                    .unwrap_or_default();

                let mut attributes = Attributes::new();
                attributes.insert("alt", html_escape::encode_quoted_attribute(key));

                Segment::Tag {
                    name: "img",
                    attributes,
                    text: url.to_owned(),
                }
            })
        });

        log::debug!(target: LOG_TARGET, "replaced emoticons in {} text nodes", count);
        self
    }

    /// Runs `split` over every text node outside tags excluded from `kind`, replacing each node it returns segments
    /// for. Returns the number of nodes replaced.
    fn rewrite_text<F>(&mut self, kind: AutoDetect, mut split: F) -> usize
    where
        F: FnMut(&str) -> Option<Vec<Segment>>,
    {
        let (tree, registry) = self.parts_mut();
        let excluded = registry.excluded_tags(kind);

        let mut count = 0;
        for id in collect_text_nodes(tree, NodeId::ROOT, &excluded) {
            let Node::Text(text) = tree.get(id) else {
                continue;
            };
            let Some(segments) = split(text) else {
                continue;
            };
            let Some(parent) = tree.parent(id) else {
                continue;
            };

            let replacements: Vec<NodeId> = segments
                .into_iter()
                .map(|segment| match segment {
                    Segment::Text(text) => tree.create_text(text),
                    Segment::Tag {
                        name,
                        attributes,
                        text,
                    } => {
                        let tag = tree.create_tag(name, attributes);
                        let text = tree.create_text(text);
                        tree.append_new(tag, text);
                        tag
                    }
                })
                .collect();

            if tree.replace_child(parent, id, &replacements) {
                count += 1;
            }
        }

        count
    }
}

/// Text nodes under `id` in document order, not descending into `excluded` tags.
fn collect_text_nodes(tree: &Tree, id: NodeId, excluded: &BTreeSet<String>) -> Vec<NodeId> {
    let mut out = vec![];
    let mut stack: Vec<NodeId> = tree.children(id).iter().rev().copied().collect();

    while let Some(node) = stack.pop() {
        match tree.get(node) {
            Node::Text(_) => out.push(node),
            Node::Tag(tag) if excluded.contains(tag.name()) => {}
            _ => stack.extend(tree.children(node).iter().rev()),
        }
    }

    out
}

/// Drops sentence punctuation from the end of a link match.
fn trim_link(start: usize, link: &str) -> (usize, &str) {
    (start, link.trim_end_matches(LINK_TRAILERS))
}

/// Splits `text` around the non-overlapping `matches` (start offset and matched text), turning each match into a
/// segment with `to_segment`. Returns `None` if there were no matches.
fn split_matches<'t, I, F>(text: &'t str, matches: I, mut to_segment: F) -> Option<Vec<Segment>>
where
    I: Iterator<Item = (usize, &'t str)>,
    F: FnMut(&'t str) -> Segment,
{
    let mut segments = vec![];
    let mut last = 0;

    for (start, matched) in matches {
        if matched.is_empty() {
            continue;
        }
        if start > last {
            segments.push(Segment::Text(text[last..start].to_owned()));
        }
        segments.push(to_segment(matched));
        last = start + matched.len();
    }

    if segments.is_empty() {
        return None;
    }

    if last < text.len() {
        segments.push(Segment::Text(text[last..].to_owned()));
    }

    Some(segments)
}
