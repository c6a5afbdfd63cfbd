use crate::node::Attributes;

const QUOTES: &[char] = &['"', '\''];

/// Parses the part of an open tag after its name, e.g. `=red` or ` width=100 height="50"`.
///
/// Every stored value is HTML escaped.
pub(crate) fn parse_attributes(raw: &str) -> Attributes {
    let mut attrs = Attributes::new();
    let raw = raw.trim();

    if raw.is_empty() {
        return attrs;
    }

    // A single `=` at the front means the whole remainder is the default value.
    if raw.starts_with('=') && raw.rfind('=') == Some(0) {
        let value = raw[1..].trim();
        attrs.set_default(Some(escape(&unquote(value))));
        return attrs;
    }

    let mut rest = raw;

    if let Some(after) = rest.strip_prefix('=') {
        let (value, tail) = take_value(after.trim_start());
        if let Some(value) = value {
            attrs.set_default(Some(escape(&value)));
        }
        rest = tail;
    }

    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            break;
        }

        let key_end = rest
            .find(|c: char| c == '=' || c.is_whitespace())
            .unwrap_or(rest.len());
        let key = &rest[..key_end];
        rest = &rest[key_end..];

        // Bare words without a value are ignored.
        let Some(after) = rest.strip_prefix('=') else {
            continue;
        };

        let (value, tail) = take_value(after);
        rest = tail;

        if let (false, Some(value)) = (key.is_empty(), value) {
            attrs.insert(key, escape(&value));
        }
    }

    attrs
}

/// Takes one value off the front of `s`: a quoted string (where `\` escapes the quote) or a run of characters
/// without whitespace or quotes. Returns the value, if there was one, and the remaining input.
fn take_value(s: &str) -> (Option<String>, &str) {
    let mut chars = s.char_indices();

    match chars.next() {
        Some((_, quote)) if QUOTES.contains(&quote) => {
            let mut value = String::new();
            let mut escaped = false;

            for (idx, ch) in chars {
                if escaped {
                    if ch != quote {
                        value.push('\\');
                    }
                    value.push(ch);
                    escaped = false;
                } else if ch == '\\' {
                    escaped = true;
                } else if ch == quote {
                    return (Some(value), &s[(idx + ch.len_utf8())..]);
                } else {
                    value.push(ch);
                }
            }

            // Unterminated quote, keep everything after it.
            if escaped {
                value.push('\\');
            }
            (Some(value), "")
        }
        _ => {
            let end = s
                .find(|c: char| c.is_whitespace() || QUOTES.contains(&c))
                .unwrap_or(s.len());
            if end == 0 {
                // Nothing usable here, skip a character so the caller makes progress.
                let skip = s.chars().next().map(char::len_utf8).unwrap_or(0);
                (None, &s[skip..])
            } else {
                (Some(s[..end].to_owned()), &s[end..])
            }
        }
    }
}

/// Strips one pair of matching surrounding quotes, unescaping `\q` inside.
fn unquote(value: &str) -> String {
    let mut chars = value.chars();
    match (chars.next(), chars.next_back()) {
        (Some(open), Some(close)) if open == close && QUOTES.contains(&open) && value.len() >= 2 => {
            let inner = &value[1..(value.len() - 1)];
            let mut escaped_quote = String::from('\\');
            escaped_quote.push(open);
            inner.replace(&escaped_quote, &open.to_string())
        }
        _ => value.to_owned(),
    }
}

fn escape(value: &str) -> String {
    html_escape::encode_quoted_attribute(value).into_owned()
}
