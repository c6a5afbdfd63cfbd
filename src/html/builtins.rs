//! Built-in tag definitions for common forum BBCode.
//!
//! [`default_tags`] is plain data; register all of it, or pick and change what you need before registering.
use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    node::{Attributes, NodeRef},
    registry::{AutoDetect, BBCode, TEXT_NODE},
};

static COLOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(#[a-fA-F0-9]{3,6}|[A-Za-z]+)$").unwrap());
static FONT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z,\- ]+$").unwrap());
static DIMENSIONS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([0-9]+)[Xx*]([0-9]+)$").unwrap());
static VIMEO_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^https?://(?:www\.)?vimeo\.com/([0-9]{4,10})").unwrap());
static ANCHOR_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-zA-Z0-9_\-]+").unwrap());
static ANCHOR_TARGET: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-zA-Z0-9_\-#]+").unwrap());

const LIST_CHILDREN: &[&str] = &["*", "li", "ul", "ol", "list"];
const TABLE_CHILDREN: &[&str] = &["table", "th", "h", "tr", "row", "r", "td", "col", "c"];

macro_rules! simple_tags {
    ($($name:literal => $template:literal),* $(,)?) => {
        vec![$(BBCode::new($name, $template)),*]
    };
}

/// Every built-in tag.
///
/// # Included tags
/// - Inline formatting: `b i strong em u s blink sub sup ins del tt big small`
/// - Alignment blocks: `left right center justify`
/// - Editor notes, rendered as nothing: `note hidden`
/// - `abbr acronym font size color h1`..`h6`
/// - Self-closing: `br sp hr`
/// - Lists: `list ul ol li *`
/// - Tables: `table th h tr row r td col c`
/// - Code and quotes: `code pre php quote spoiler`
/// - Unparsed text: `notag nobbc noparse`
/// - Links and media: `anchor goto jumpto img email url google bing wikipedia youtube vimeo`
/// - Messenger profiles: `icq skype`
///
/// Not included: `h7`, which is not an HTML element, and tags that embed third party scripts or plugins
/// (`twitter tweets scribd paypal pastebin gist flash googlemaps pdf`).
pub fn default_tags() -> Vec<BBCode> {
    let mut tags = simple_tags! {
        "b" => "<strong>%content%</strong>",
        "i" => "<em>%content%</em>",
        "strong" => "<strong>%content%</strong>",
        "em" => "<em>%content%</em>",
        "u" => "<span style=\"text-decoration: underline\">%content%</span>",
        "s" => "<span style=\"text-decoration: line-through\">%content%</span>",
        "blink" => "<span style=\"text-decoration: blink\">%content%</span>",
        "sub" => "<sub>%content%</sub>",
        "sup" => "<sup>%content%</sup>",
        "ins" => "<ins>%content%</ins>",
        "del" => "<del>%content%</del>",
        "tt" => "<span style=\"font-family: monospace\">%content%</span>",
        "big" => "<span style=\"font-size: large\">%content%</span>",
        "small" => "<span style=\"font-size: x-small\">%content%</span>",
        "note" => "",
        "hidden" => "",
        "h1" => "<h1>%content%</h1>",
        "h2" => "<h2>%content%</h2>",
        "h3" => "<h3>%content%</h3>",
        "h4" => "<h4>%content%</h4>",
        "h5" => "<h5>%content%</h5>",
        "h6" => "<h6>%content%</h6>",
        "li" => "<li>%content%</li>",
        "th" => "<th>%content%</th>",
        "h" => "<th>%content%</th>",
        "td" => "<td>%content%</td>",
        "col" => "<td>%content%</td>",
        "c" => "<td>%content%</td>",
    };

    for align in ["left", "right", "center", "justify"] {
        tags.push(
            BBCode::new(align, format!("<div style=\"text-align: {align}\">%content%</div>")).block(),
        );
    }

    tags.extend([
        BBCode::new("br", "<br />").self_closing(),
        BBCode::new("sp", "&nbsp;").self_closing(),
        BBCode::new("hr", "<hr />").self_closing(),
        BBCode::with_fn("abbr", |content, attrs, _| titled("abbr", content, attrs)),
        BBCode::with_fn("acronym", |content, attrs, _| titled("acronym", content, attrs)),
        BBCode::with_fn("font", font),
        BBCode::with_fn("size", size),
        BBCode::with_fn("color", color),
        // Lists
        BBCode::with_fn("list", list)
            .block()
            .accepted_children(LIST_CHILDREN),
        BBCode::new("ul", "<ul>%content%</ul>").block(),
        BBCode::new("ol", "<ol>%content%</ol>").block(),
        BBCode::new("*", "<li>%content%</li>")
            .block()
            .closing_tags(["*", "li", "ul", "ol", "/list"]),
        // Tables
        BBCode::new("table", "<table>%content%</table>")
            .block()
            .accepted_children(TABLE_CHILDREN),
    ]);

    for row in ["tr", "row", "r"] {
        tags.push(
            BBCode::new(row, "<tr>%content%</tr>")
                .block()
                .accepted_children(TABLE_CHILDREN),
        );
    }

    tags.extend([
        // Code and quotes
        BBCode::new("code", "<code>%content%</code>")
            .block()
            .accepted_children([TEXT_NODE])
            .exclude(AutoDetect::EMOTICON),
        BBCode::with_fn("pre", pre).block(),
        BBCode::with_fn("php", php)
            .block()
            .accepted_children([TEXT_NODE])
            .exclude(AutoDetect::EMOTICON),
        BBCode::with_fn("quote", quote).block(),
        BBCode::with_fn("spoiler", spoiler).block(),
        // Unparsed text
        verbatim("notag"),
        verbatim("nobbc"),
        verbatim("noparse"),
        // Links and media
        BBCode::with_fn("anchor", anchor),
        BBCode::with_fn("goto", goto),
        BBCode::with_fn("jumpto", goto),
        text_only(BBCode::with_fn("img", img)),
        text_only(BBCode::with_fn("email", email)),
        text_only(BBCode::with_fn("url", url)),
        text_only(BBCode::new("google", "<a href=\"http://www.google.com/search?q=%content%\">%content%</a>")),
        text_only(BBCode::new("bing", "<a href=\"http://www.bing.com/search?q=%content%\">%content%</a>")),
        text_only(BBCode::new("wikipedia", "<a href=\"http://www.wikipedia.org/wiki/%content%\">%content%</a>")),
        // Messenger profiles
        text_only(BBCode::new(
            "icq",
            "<a href=\"http://www.icq.com/people/about_me.php?uin=%content%\">\
             <img src=\"http://status.icq.com/online.gif?icq=%content%&amp;img=5\" /> %content%</a>",
        )),
        text_only(BBCode::new(
            "skype",
            "<a href=\"skype:%content%?call\">\
             <img src=\"http://mystatus.skype.com/bigclassic/%content%\" style=\"border: none;\" width=\"182\" \
             height=\"44\" alt=\"%content%\" /></a>",
        )),
        text_only(BBCode::with_fn("youtube", youtube)).block(),
        text_only(BBCode::with_fn("vimeo", vimeo)).block(),
    ]);

    tags
}

/// A tag that only holds text and is skipped by every detection pass.
fn text_only(tag: BBCode) -> BBCode {
    tag.accepted_children([TEXT_NODE]).exclude(AutoDetect::ALL)
}

fn verbatim(name: &str) -> BBCode {
    text_only(BBCode::new(name, "%content%"))
}

fn is_numeric(value: &str) -> bool {
    value.parse::<f64>().map(f64::is_finite).unwrap_or(false)
}

/// Prefixes `www.` links with `http://` and resolves anything not starting with `http` or `ftp` against the
/// document's base URI.
pub fn resolve_uri(uri: &str, node: NodeRef<'_>) -> String {
    if uri.starts_with("www") {
        format!("http://{uri}")
    } else if uri.starts_with("http") || uri.starts_with("ftp") {
        uri.to_owned()
    } else {
        format!("{}{}", node.root().base_uri(), uri)
    }
}

fn titled(tag: &str, content: &str, attrs: &Attributes) -> String {
    format!(
        "<{tag} title=\"{}\">{content}</{tag}>",
        attrs.default_value().unwrap_or_default()
    )
}

fn font(content: &str, attrs: &Attributes, _: NodeRef<'_>) -> String {
    let family = attrs
        .default_value()
        .filter(|f| FONT.is_match(f))
        .unwrap_or("Arial");
    format!("<span style=\"font-family: {family}\">{content}</span>")
}

fn size(content: &str, attrs: &Attributes, _: NodeRef<'_>) -> String {
    let size = match attrs.default_value() {
        None => "xx-small".to_owned(),
        Some("2") => "small".to_owned(),
        Some("3") => "medium".to_owned(),
        Some("4") => "large".to_owned(),
        Some("5") => "x-large".to_owned(),
        Some("6") => "xx-large".to_owned(),
        Some("7") => "48px".to_owned(),
        Some(percent) if percent.strip_suffix('%').map(is_numeric).unwrap_or(false) => percent.to_owned(),
        Some(px) => {
            let px = px.parse::<f64>().ok().filter(|v| v.is_finite()).unwrap_or(13.0);
            format!("{}px", px.clamp(6.0, 48.0))
        }
    };
    format!("<span style=\"font-size: {size}\">{content}</span>")
}

fn color(content: &str, attrs: &Attributes, _: NodeRef<'_>) -> String {
    let color = attrs
        .default_value()
        .filter(|c| COLOR.is_match(c))
        .unwrap_or("#000");
    format!("<span style=\"color: {color}\">{content}</span>")
}

fn list(content: &str, attrs: &Attributes, _: NodeRef<'_>) -> String {
    let (ty, style) = match attrs.default_value() {
        Some("d") => ("ul", "disc"),
        Some("s") => ("ul", "square"),
        Some("1") => ("ol", "decimal"),
        Some("a") => ("ol", "lower-alpha"),
        Some("A") => ("ol", "upper-alpha"),
        Some("i") => ("ol", "lower-roman"),
        Some("I") => ("ol", "upper-roman"),
        _ => ("ul", "circle"),
    };
    format!("<{ty} style=\"list-style: {style}\">{content}</{ty}>")
}

/// Children rendered without newline conversion.
fn pre(_: &str, _: &Attributes, node: NodeRef<'_>) -> String {
    let content: String = node.children().map(|child| child.html(false)).collect();
    format!("<pre>{content}</pre>")
}

/// The raw source, escaped but otherwise untouched, for client side highlighting.
fn php(_: &str, _: &Attributes, node: NodeRef<'_>) -> String {
    let source = html_escape::encode_text(&node.raw_text()).into_owned();
    format!("<code class=\"php\">{source}</code>")
}

fn quote(content: &str, attrs: &Attributes, node: NodeRef<'_>) -> String {
    let cite = attrs
        .non_empty_default()
        .map(|who| format!("<cite>{who}:</cite>"))
        .unwrap_or_default();
    let class = if node.find_parent_by_tag("quote").is_some() {
        " class=\"nested\""
    } else {
        ""
    };
    format!("<blockquote{class}><p>{cite}{content}</p></blockquote>")
}

fn spoiler(content: &str, attrs: &Attributes, _: NodeRef<'_>) -> String {
    let summary = attrs.non_empty_default().unwrap_or("Spoiler");
    format!("<details class=\"spoiler\"><summary>{summary}</summary>{content}</details>")
}

fn anchor(content: &str, attrs: &Attributes, _: NodeRef<'_>) -> String {
    // [anchor]name[/anchor] uses the content as the name and shows nothing.
    let (name, content) = match attrs.non_empty_default() {
        Some(name) => (name, content),
        None => (content, ""),
    };
    let name = ANCHOR_NAME.replace_all(name, "");
    format!("<a name=\"{name}\">{content}</a>")
}

fn goto(content: &str, attrs: &Attributes, _: NodeRef<'_>) -> String {
    let target = attrs.non_empty_default().unwrap_or(content);
    let target = ANCHOR_TARGET.replace_all(target, "");
    let target = target.trim_start_matches('#');
    format!("<a href=\"#{target}\">{content}</a>")
}

fn img(content: &str, attrs: &Attributes, node: NodeRef<'_>) -> String {
    let mut attrs = attrs.clone();
    let mut html = String::new();

    // [img=100x50] and [img=100] give the size rather than the alt text.
    if let Some(default) = attrs.default_value().map(str::to_owned) {
        if let Some(dims) = DIMENSIONS.captures(&default) {
            attrs.insert("width", &dims[1]);
            attrs.insert("height", &dims[2]);
            attrs.set_default(None);
        } else if is_numeric(&default) {
            attrs.insert("width", default.as_str());
            attrs.insert("height", default.as_str());
            attrs.set_default(None);
        }
    }

    let alt = attrs
        .non_empty_default()
        .or_else(|| attrs.get("alt"))
        .unwrap_or(content);
    html.push_str(&format!("<img alt=\"{alt}\""));

    for dim in ["width", "height"] {
        if let Some(value) = attrs.get(dim).filter(|v| is_numeric(v)) {
            html.push_str(&format!(" {dim}=\"{value}\""));
        }
    }

    html.push_str(&format!(" src=\"{}\" />", resolve_uri(content, node)));
    html
}

fn email(content: &str, attrs: &Attributes, _: NodeRef<'_>) -> String {
    let address = attrs.non_empty_default().unwrap_or(content);
    format!("<a href=\"mailto:{address}\">{content}</a>")
}

fn url(content: &str, attrs: &Attributes, node: NodeRef<'_>) -> String {
    let href = attrs.non_empty_default().unwrap_or(content);
    format!("<a href=\"{}\">{content}</a>", resolve_uri(href, node))
}

fn youtube(content: &str, _: &Attributes, _: NodeRef<'_>) -> String {
    let uri = if content.starts_with("http://www.youtube.com/") || content.starts_with("https://www.youtube.com/") {
        content.to_owned()
    } else {
        format!("https://www.youtube.com/embed/{content}")
    };
    format!("<iframe width=\"480\" height=\"390\" src=\"{uri}\" frameborder=\"0\"></iframe>")
}

fn vimeo(content: &str, _: &Attributes, _: NodeRef<'_>) -> String {
    let uri = if content.starts_with("http://player.vimeo.com/") || content.starts_with("https://player.vimeo.com/") {
        content.to_owned()
    } else {
        let id = VIMEO_ID
            .captures(content)
            .map(|c| c[1].to_owned())
            .unwrap_or_else(|| content.to_owned());
        format!("https://player.vimeo.com/video/{id}?title=0&amp;byline=0&amp;portrait=0")
    };
    format!("<iframe src=\"{uri}\" width=\"400\" height=\"225\" frameborder=\"0\"></iframe>")
}
