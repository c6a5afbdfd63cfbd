use pretty_assertions::assert_eq;

use super::escape_text;
use crate::{node::Attributes, BBCode, Document, ParserConfig, TagRegistry};

#[test]
pub fn text_escaping() {
    assert_eq!(escape_text("h<ello & 'bye'", true), "h&lt;ello &amp; &#x27;bye&#x27;");
    assert_eq!(escape_text("a\nb", true), "a<br />\nb");
    assert_eq!(escape_text("a\nb", false), "a\nb");
    assert_eq!(escape_text("a  b", true), "a &nbsp;b");
    assert_eq!(escape_text("    x", true), " &nbsp; &nbsp;x");
}

#[test]
pub fn template_and_function_handlers() {
    let mut doc = Document::with_tags(vec![
        BBCode::new("b", "<b>%content%</b>"),
        BBCode::with_fn("color", |content, attrs: &Attributes, _| {
            format!("<span style=\"color:{}\">{}</span>", attrs.default_value().unwrap_or("black"), content)
        }),
    ]);

    let html = doc.parse("[color=red][b]x[/b][/color]").unwrap().render();
    assert_eq!(html, "<span style=\"color:red\"><b>x</b></span>");
}

#[test]
pub fn handlers_see_the_node() {
    let mut doc = Document::with_tags(vec![
        BBCode::with_fn("count", |_, _, node| format!("{}", node.children().count())),
        BBCode::with_fn("base", |content, _, node| format!("{}{}", node.root().base_uri(), content)),
        BBCode::new("b", "<b>%content%</b>"),
    ]);
    doc.set_base_uri(Some("https://forum.example/".to_owned()));

    let html = doc.parse("[count]a[b]b[/b]c[/count] [base]x[/base]").unwrap().render();
    assert_eq!(html, "3 https://forum.example/x");
}

#[test]
pub fn unregistered_tags_render_as_text() {
    let mut doc = Document::with_tags(vec![BBCode::new("b", "<b>%content%</b>")]);
    doc.parse("[b=<x>]hi[/b]").unwrap();
    doc.unregister_tag("b");
    assert_eq!(doc.render(), "[b=&lt;x&gt;]hi[/b]");
}

#[test]
pub fn raw_text_is_unescaped() {
    let mut doc = Document::with_tags(vec![BBCode::new("b", "<b>%content%</b>")]);
    doc.parse("[b]<a>[/b] & more").unwrap();
    assert_eq!(doc.raw_text(), "<a> & more");
}

#[test]
pub fn deep_nesting_renders_without_recursion() {
    const DEPTH: usize = 100_000;

    let mut doc = Document::new(
        TagRegistry::with_tags(vec![BBCode::new("q", "%content%")]),
        ParserConfig {
            max_depth: usize::MAX,
            ..ParserConfig::default()
        },
    );
    let input = format!("{}x", "[q]".repeat(DEPTH));
    doc.parse(&input).unwrap();

    let mut node = doc.root();
    let mut depth = 0;
    while let Some(child) = node.children().next().filter(|c| c.tag().is_some()) {
        node = child;
        depth += 1;
    }
    assert_eq!(depth, DEPTH);

    assert_eq!(doc.render(), "x");
    assert_eq!(doc.raw_text(), "x");
}

#[cfg(feature = "builtins")]
#[test]
pub fn hostile_nesting_is_capped() {
    use crate::DEFAULT_MAX_DEPTH;

    let mut doc = Document::default();
    let html = doc.parse(&"[b]".repeat(100_000)).unwrap().render();

    let expected = format!(
        "{}{}{}",
        "<strong>".repeat(DEFAULT_MAX_DEPTH),
        "[b]".repeat(100_000 - DEFAULT_MAX_DEPTH),
        "</strong>".repeat(DEFAULT_MAX_DEPTH)
    );
    assert_eq!(html, expected);
}

#[cfg(feature = "builtins")]
macro_rules! render_tests {
    ($($name:ident: $value:expr;)*) => {
    $(
        #[test]
        fn $name() {
            let mut doc = Document::default();
            let (input, expected) = $value;
            assert_eq!(doc.parse(input).unwrap().render(), expected);
        }
    )*
    }
}

#[cfg(feature = "builtins")]
render_tests! {
    no_alter: ("hello", "hello");
    escape_html: ("<script>alert('x')</script>", "&lt;script&gt;alert(&#x27;x&#x27;)&lt;/script&gt;");
    simple_bold: ("[b]hello[/b]", "<strong>hello</strong>");
    simple_bolditalic: ("[b][i]hello[/i][/b]", "<strong><em>hello</em></strong>");
    nested_bold: ("[b]hey[b]more[/b] less[/b]", "<strong>hey<strong>more</strong> less</strong>");
    unknown_tag: ("[foo]bar[/foo]", "[foo]bar[/foo]");
    misnested: ("[b][i]x[/b][/i]", "<strong><em>x</em></strong><em></em>");
    self_closing: ("a[br]b[hr]", "a<br />b<hr />");
    newline_br: ("a\nb", "a<br />\nb");
    underline: ("[u]u[/u]", "<span style=\"text-decoration: underline\">u</span>");
    center: ("[center]c[/center]", "<div style=\"text-align: center\">c</div>");
    note_hidden: ("a[note]secret[/note]b", "ab");
    list_default: ("[list][*]one[*]two[/list]", "<ul style=\"list-style: circle\"><li>one</li><li>two</li></ul>");
    list_ordered: ("[list=1][*]one[*]two[/list]", "<ol style=\"list-style: decimal\"><li>one</li><li>two</li></ol>");
    list_whitespace: ("[list=a]\n[*]x\n[/list]", "<ol style=\"list-style: lower-alpha\"><li>x<br />\n</li></ol>");
    table: (
        "[table]\n[tr]\n[td]1[/td]\n[td]2[/td]\n[/tr]\n[/table]",
        "<table><tr><td>1</td><td>2</td></tr></table>"
    );
    color_hex: ("[color=#fff]w[/color]", "<span style=\"color: #fff\">w</span>");
    color_invalid: ("[color=\"red wine\"]w[/color]", "<span style=\"color: #000\">w</span>");
    size_named: ("[size=4]big[/size]", "<span style=\"font-size: large\">big</span>");
    size_clamped: ("[size=100]huge[/size]", "<span style=\"font-size: 48px\">huge</span>");
    size_percent: ("[size=150%]x[/size]", "<span style=\"font-size: 150%\">x</span>");
    font_fallback: ("[font=<evil>]x[/font]", "<span style=\"font-family: Arial\">x</span>");
    abbr: ("[abbr=HyperText]HTML[/abbr]", "<abbr title=\"HyperText\">HTML</abbr>");
    url_plain: ("[url]http://example.com[/url]", "<a href=\"http://example.com\">http://example.com</a>");
    url_www: ("[url=www.example.com]site[/url]", "<a href=\"http://www.example.com\">site</a>");
    url_relative: ("[url=page.html]p[/url]", "<a href=\"/page.html\">p</a>");
    url_escape: ("[url=http://x.com/\"onclick]x[/url]", "<a href=\"http://x.com/&quot;onclick\">x</a>");
    url_no_tags: ("[url=http://x.com][b]no[/b][/url]", "<a href=\"http://x.com\">[b]no[/b]</a>");
    email_plain: ("[email]me@example.com[/email]", "<a href=\"mailto:me@example.com\">me@example.com</a>");
    img_plain: ("[img]http://x.com/a.png[/img]", "<img alt=\"http://x.com/a.png\" src=\"http://x.com/a.png\" />");
    img_sized: (
        "[img width=100 height=50]http://x.com/a.png[/img]",
        "<img alt=\"http://x.com/a.png\" width=\"100\" height=\"50\" src=\"http://x.com/a.png\" />"
    );
    img_dimensions: (
        "[img=20x10]http://x.com/a.png[/img]",
        "<img alt=\"http://x.com/a.png\" width=\"20\" height=\"10\" src=\"http://x.com/a.png\" />"
    );
    img_bad_size: (
        "[img width=\"100 onerror\"]http://x.com/a.png[/img]",
        "<img alt=\"http://x.com/a.png\" src=\"http://x.com/a.png\" />"
    );
    quote_cite: ("[quote=Bob]hi[/quote]", "<blockquote><p><cite>Bob:</cite>hi</p></blockquote>");
    quote_nested: (
        "[quote][quote]in[/quote][/quote]",
        "<blockquote><p><blockquote class=\"nested\"><p>in</p></blockquote></p></blockquote>"
    );
    spoiler: ("[spoiler]boo[/spoiler]", "<details class=\"spoiler\"><summary>Spoiler</summary>boo</details>");
    code_keeps_brackets: ("[code][b]x[/b][/code]", "<code>[b]x[/b]</code>");
    pre_keeps_newlines: ("[pre]a\nb[/pre]", "<pre>a\nb</pre>");
    php_raw_source: ("[php]<?php echo 1 && 2;[/php]", "<code class=\"php\">&lt;?php echo 1 &amp;&amp; 2;</code>");
    noparse: ("[noparse][b]x[/b][/noparse]", "[b]x[/b]");
    anchor_content: ("[anchor]top spot[/anchor]", "<a name=\"topspot\"></a>");
    goto: ("[goto=top]Up[/goto]", "<a href=\"#top\">Up</a>");
    youtube: ("[youtube]abc123[/youtube]", "<iframe width=\"480\" height=\"390\" src=\"https://www.youtube.com/embed/abc123\" frameborder=\"0\"></iframe>");
    icq: (
        "[icq]123[/icq]",
        "<a href=\"http://www.icq.com/people/about_me.php?uin=123\">\
         <img src=\"http://status.icq.com/online.gif?icq=123&amp;img=5\" /> 123</a>"
    );
    skype: (
        "[skype]bob[/skype]",
        "<a href=\"skype:bob?call\"><img src=\"http://mystatus.skype.com/bigclassic/bob\" style=\"border: none;\" \
         width=\"182\" height=\"44\" alt=\"bob\" /></a>"
    );
    unclosed_auto: ("[b]foo", "<strong>foo</strong>");
    random_brackets: ("[][[][6][a[ab]c[i]italic[but][][not] 8[]]][", "[][[][6][a[ab]c<em>italic[but][][not] 8[]]][</em>");
}
