use super::{AutoDetect, BBCode, TagRegistry, DEFAULT_BASE_URI, TEXT_NODE};

fn sample() -> TagRegistry {
    TagRegistry::with_tags(vec![
        BBCode::new("b", "<strong>%content%</strong>"),
        BBCode::new("url", "<a>%content%</a>")
            .accepted_children([TEXT_NODE])
            .exclude(AutoDetect::ALL),
        BBCode::new("code", "<code>%content%</code>")
            .block()
            .exclude(AutoDetect::EMOTICON),
    ])
}

#[test]
pub fn register_respects_replace() {
    let mut registry = sample();
    assert!(!registry.register(BBCode::new("b", "<b>%content%</b>"), false));
    assert!(matches!(
        registry.get("b").unwrap().handler(),
        super::Handler::Template(t) if t == "<strong>%content%</strong>"
    ));

    assert!(registry.register(BBCode::new("b", "<b>%content%</b>"), true));
    assert!(matches!(
        registry.get("b").unwrap().handler(),
        super::Handler::Template(t) if t == "<b>%content%</b>"
    ));
}

#[test]
pub fn lookups_ignore_case() {
    let mut registry = sample();
    assert!(registry.contains("B"));
    assert!(registry.contains("Url"));
    assert!(registry.unregister("CODE").is_some());
    assert!(!registry.contains("code"));
}

#[test]
pub fn names_are_sorted() {
    assert_eq!(sample().names(), ["b", "code", "url"]);
}

#[test]
pub fn excluded_tags_by_kind() {
    let registry = sample();
    let urls: Vec<_> = registry.excluded_tags(AutoDetect::URL).into_iter().collect();
    assert_eq!(urls, ["url"]);

    let emoticons: Vec<_> = registry
        .excluded_tags(AutoDetect::EMOTICON)
        .into_iter()
        .collect();
    assert_eq!(emoticons, ["code", "url"]);
}

#[test]
pub fn emoticon_table() {
    let mut registry = TagRegistry::new();
    assert!(registry.add_emoticon(":)", "smile.png", true));
    assert!(!registry.add_emoticon(":)", "grin.png", false));
    assert!(!registry.add_emoticon("", "nothing.png", true));
    registry.add_emoticons([(":(", "sad.png"), (":)", "happy.png")], true);

    assert_eq!(registry.emoticon(":)"), Some("happy.png"));
    assert_eq!(registry.emoticons().count(), 2);
    assert_eq!(registry.remove_emoticon(":("), Some("sad.png".to_owned()));
    assert_eq!(registry.remove_emoticon(":("), None);
}

#[test]
pub fn base_uri_defaults() {
    let mut registry = TagRegistry::new();
    assert_eq!(registry.base_uri(), DEFAULT_BASE_URI);
    registry.set_base_uri(Some("https://forum.example/".to_owned()));
    assert_eq!(registry.base_uri(), "https://forum.example/");
}

#[test]
pub fn definition_rules() {
    let item = BBCode::new("*", "<li>%content%</li>")
        .block()
        .closing_tags(["*", "LI", "/list"]);
    assert!(item.closed_by_open("*"));
    assert!(item.closed_by_open("li"));
    assert!(!item.closed_by_open("list"));
    assert!(item.closed_by_close("list"));
    assert!(item.accepts("b"));
    assert!(item.is_block());

    let list = BBCode::new("List", "<ul>%content%</ul>").accepted_children(["*"]);
    assert_eq!(list.name(), "list");
    assert!(list.accepts("*"));
    assert!(!list.accepts(TEXT_NODE));
}
