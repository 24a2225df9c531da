//! Output sanitization for bookmark text.
//!
//! Stored rows keep whatever the client sent; everything leaving the service passes
//! through [`sanitize_bookmark`]. Titles are plain text and get their angle brackets
//! escaped. Descriptions may carry light formatting, so allowed tags survive with a
//! reduced attribute set and everything else is escaped. Both transforms are idempotent.

use crate::model::Bookmark;

/// Tags kept in descriptions, with the attributes each may carry.
const ALLOWED_TAGS: &[(&str, &[&str])] = &[
    ("a", &["href", "title", "target"]),
    ("b", &[]),
    ("blockquote", &[]),
    ("br", &[]),
    ("code", &[]),
    ("em", &[]),
    ("h1", &[]),
    ("h2", &[]),
    ("h3", &[]),
    ("h4", &[]),
    ("h5", &[]),
    ("h6", &[]),
    ("hr", &[]),
    ("i", &[]),
    ("img", &["src", "alt", "title", "width", "height"]),
    ("li", &[]),
    ("ol", &[]),
    ("p", &[]),
    ("pre", &[]),
    ("s", &[]),
    ("small", &[]),
    ("span", &[]),
    ("strong", &[]),
    ("sub", &[]),
    ("sup", &[]),
    ("u", &[]),
    ("ul", &[]),
];

const URL_ATTRIBUTES: &[&str] = &["href", "src"];
const BLOCKED_SCHEMES: &[&str] = &["javascript:", "vbscript:", "data:"];

pub fn sanitize_bookmark(bookmark: Bookmark) -> Bookmark {
    Bookmark {
        title: escape_text(&bookmark.title),
        description: bookmark.description.as_deref().map(filter_markup),
        ..bookmark
    }
}

/// Escapes `<` and `>` so embedded markup renders as text.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
    out
}

/// Keeps allowed formatting tags, drops every attribute not on the tag's allow-list and
/// escapes all other markup.
pub fn filter_markup(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(start) = rest.find('<') {
        out.push_str(&escape_text(&rest[..start]));
        rest = &rest[start..];

        match parse_tag(rest) {
            Some((tag, consumed)) => {
                match allowed_attributes(&tag.name) {
                    Some(allowed) => out.push_str(&tag.render(allowed)),
                    None => out.push_str(&escape_text(&rest[..consumed])),
                }
                rest = &rest[consumed..];
            }
            None => {
                out.push_str("&lt;");
                rest = &rest[1..];
            }
        }
    }

    out.push_str(&escape_text(rest));
    out
}

fn allowed_attributes(name: &str) -> Option<&'static [&'static str]> {
    ALLOWED_TAGS
        .iter()
        .find(|(tag, _)| *tag == name)
        .map(|(_, attributes)| *attributes)
}

fn is_blocked_url(value: &str) -> bool {
    let normalized: String = decode_char_refs(value)
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();
    if BLOCKED_SCHEMES.iter().any(|scheme| normalized.starts_with(scheme)) {
        return true;
    }
    // a reference left undecoded could still spell out the scheme
    let scheme_end = normalized.find(':').unwrap_or(normalized.len());
    normalized[..scheme_end].contains('&')
}

/// Named references that can hide a scheme separator or whitespace.
const NAMED_REFS: &[(&str, char)] = &[
    ("colon", ':'),
    ("tab", '\t'),
    ("newline", '\n'),
    ("sol", '/'),
    ("lpar", '('),
    ("rpar", ')'),
    ("amp", '&'),
    ("nbsp", '\u{a0}'),
];

/// Decodes numeric (`&#106;`, `&#x6A;`) and a handful of named character references the
/// way a browser does inside attribute values. The trailing `;` is optional for numeric
/// references.
fn decode_char_refs(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp + 1..];

        if let Some(numeric) = rest.strip_prefix('#') {
            let (radix, digits_at) = match numeric.as_bytes().first() {
                Some(b'x' | b'X') => (16, 1),
                _ => (10, 0),
            };
            let digits = &numeric[digits_at..];
            let len = digits.bytes().take_while(|b| (*b as char).is_digit(radix)).count();
            if len > 0 {
                let decoded = u32::from_str_radix(&digits[..len], radix)
                    .ok()
                    .and_then(char::from_u32)
                    .unwrap_or(char::REPLACEMENT_CHARACTER);
                out.push(decoded);
                let consumed = 1 + digits_at + len;
                rest = &rest[consumed..];
                rest = rest.strip_prefix(';').unwrap_or(rest);
                continue;
            }
        } else if let Some(semi) = rest.find(';') {
            let name = rest[..semi].to_ascii_lowercase();
            if let Some((_, c)) = NAMED_REFS.iter().find(|(n, _)| *n == name) {
                out.push(*c);
                rest = &rest[semi + 1..];
                continue;
            }
        }
        out.push('&');
    }

    out.push_str(rest);
    out
}

#[derive(Debug, PartialEq)]
struct Tag {
    name: String,
    closing: bool,
    self_closing: bool,
    attributes: Vec<(String, Option<String>)>,
}

impl Tag {
    fn render(&self, allowed: &[&str]) -> String {
        if self.closing {
            return format!("</{}>", self.name);
        }

        let mut out = format!("<{}", self.name);
        for (name, value) in &self.attributes {
            if !allowed.contains(&name.as_str()) {
                continue;
            }
            match value {
                Some(value) if URL_ATTRIBUTES.contains(&name.as_str()) && is_blocked_url(value) => continue,
                Some(value) => {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&value.replace('"', "&quot;"));
                    out.push('"');
                }
                None => {
                    out.push(' ');
                    out.push_str(name);
                }
            }
        }
        if self.self_closing {
            out.push_str(" /");
        }
        out.push('>');
        out
    }
}

/// Parses one tag at the start of `input` (which begins with `<`). Returns the tag and
/// the number of bytes it spans, or `None` when the text is not a well-formed tag.
fn parse_tag(input: &str) -> Option<(Tag, usize)> {
    let bytes = input.as_bytes();
    let mut pos = 1;

    let closing = bytes.get(pos) == Some(&b'/');
    if closing {
        pos += 1;
    }

    let name_start = pos;
    if !bytes.get(pos)?.is_ascii_alphabetic() {
        return None;
    }
    while pos < bytes.len() && bytes[pos].is_ascii_alphanumeric() {
        pos += 1;
    }
    let name = input[name_start..pos].to_ascii_lowercase();

    let mut attributes = Vec::new();
    let mut self_closing = false;

    loop {
        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        match bytes.get(pos)? {
            b'>' => {
                pos += 1;
                break;
            }
            b'/' => {
                pos += 1;
                let mut lookahead = pos;
                while lookahead < bytes.len() && bytes[lookahead].is_ascii_whitespace() {
                    lookahead += 1;
                }
                if bytes.get(lookahead) == Some(&b'>') {
                    self_closing = true;
                    pos = lookahead + 1;
                    break;
                }
                continue;
            }
            _ => {}
        }

        let attr_start = pos;
        while pos < bytes.len() && !matches!(bytes[pos], b'=' | b'>' | b'/') && !bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        if pos == attr_start {
            // a stray '=' with no name
            pos += 1;
            continue;
        }
        let attr_name = input[attr_start..pos].to_ascii_lowercase();

        let mut lookahead = pos;
        while lookahead < bytes.len() && bytes[lookahead].is_ascii_whitespace() {
            lookahead += 1;
        }
        if bytes.get(lookahead) != Some(&b'=') {
            attributes.push((attr_name, None));
            continue;
        }
        pos = lookahead + 1;
        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }

        let value = match bytes.get(pos)? {
            quote @ (b'"' | b'\'') => {
                let value_start = pos + 1;
                let len = input[value_start..].find(*quote as char)?;
                pos = value_start + len + 1;
                input[value_start..value_start + len].to_string()
            }
            _ => {
                let value_start = pos;
                while pos < bytes.len() && bytes[pos] != b'>' && !bytes[pos].is_ascii_whitespace() {
                    pos += 1;
                }
                input[value_start..pos].to_string()
            }
        };
        attributes.push((attr_name, Some(value)));
    }

    Some((
        Tag {
            name,
            closing,
            self_closing,
            attributes,
        },
        pos,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MALICIOUS_TITLE: &str = r#"This is a malicious bookmark! <script>alert("xss");</script>"#;
    const MALICIOUS_DESCRIPTION: &str = r#"Bad image <img src="https://url.to.file.which/does-not.exist" onerror="alert(document.cookie);">. But not <strong>all</strong> bad."#;

    #[test]
    fn test_escape_title() {
        assert_eq!(
            escape_text(MALICIOUS_TITLE),
            r#"This is a malicious bookmark! &lt;script&gt;alert("xss");&lt;/script&gt;"#
        );
        assert_eq!(escape_text("Tom & Jerry"), "Tom & Jerry");
    }

    #[test]
    fn test_filter_strips_event_handlers_and_keeps_formatting() {
        assert_eq!(
            filter_markup(MALICIOUS_DESCRIPTION),
            r#"Bad image <img src="https://url.to.file.which/does-not.exist">. But not <strong>all</strong> bad."#
        );
    }

    #[test]
    fn test_filter_escapes_disallowed_tags() {
        assert_eq!(
            filter_markup("<script>alert(1)</script> ok"),
            "&lt;script&gt;alert(1)&lt;/script&gt; ok"
        );
        assert_eq!(filter_markup("<!-- hidden -->"), "&lt;!-- hidden --&gt;");
        assert_eq!(filter_markup("1 < 2 and 3 > 2"), "1 &lt; 2 and 3 &gt; 2");
        assert_eq!(filter_markup("<b unterminated"), "&lt;b unterminated");
    }

    #[test]
    fn test_filter_drops_script_urls() {
        assert_eq!(
            filter_markup(r#"<a href=" JavaScript:alert(1)" title='t'>x</a>"#),
            r#"<a title="t">x</a>"#
        );
        assert_eq!(
            filter_markup(r#"<A HREF=https://example.com TARGET=_blank STYLE="x">x</A>"#),
            r#"<a href="https://example.com" target="_blank">x</a>"#
        );
    }

    #[test]
    fn test_filter_drops_entity_encoded_script_urls() {
        for href in [
            "&#106;avascript:alert(1)",
            "&#106avascript:alert(1)",
            "&#x6A;avascript:alert(1)",
            "&#X6a;avascript:alert(1)",
            "javascript&colon;alert(1)",
            "java&Tab;script:alert(1)",
            "java&NewLine;script:alert(1)",
            "&#0000106;avascript:alert(1)",
            "java&unknownref;script:alert(1)",
        ] {
            let html = format!(r#"<a href="{href}" title="t">x</a>"#);
            assert_eq!(filter_markup(&html), r#"<a title="t">x</a>"#, "{href} survived");
        }
        assert_eq!(
            filter_markup(r#"<img src="&#x64;ata:text/html,x" alt="a">"#),
            r#"<img alt="a">"#
        );
    }

    #[test]
    fn test_filter_keeps_urls_with_references_after_the_scheme() {
        assert_eq!(
            filter_markup(r#"<a href="https://example.com/?a=1&amp;b=2">x</a>"#),
            r#"<a href="https://example.com/?a=1&amp;b=2">x</a>"#
        );
        assert_eq!(decode_char_refs("a&#58;b&amp;c&bogus"), "a:b&c&bogus");
    }

    #[test]
    fn test_filter_normalizes_quotes_and_self_closing() {
        assert_eq!(filter_markup("line<br/>next"), "line<br />next");
        assert_eq!(
            filter_markup(r#"<img alt='say "hi"' src=x.png>"#),
            r#"<img alt="say &quot;hi&quot;" src="x.png">"#
        );
        assert_eq!(filter_markup(r#"<p class="lead">text</p>"#), "<p>text</p>");
    }

    #[test]
    fn test_sanitizers_are_idempotent() {
        let inputs = [
            MALICIOUS_TITLE,
            MALICIOUS_DESCRIPTION,
            r#"<a href=" javascript:x" title='a "b"'>x</a>"#,
            r#"<a href="&#106;avascript:alert(1)">x</a>"#,
            r#"<a href="javascript&colon;alert(1)">x</a>"#,
            r#"<a href="&#x6A;avascript:alert(1)">x</a>"#,
            "<br/><BR / ><img src=x onload=y>",
            "a < b > c <<>> <a =x>",
            "plain text",
            "",
        ];
        for input in inputs {
            let once = escape_text(input);
            assert_eq!(escape_text(&once), once);

            let once = filter_markup(input);
            assert_eq!(filter_markup(&once), once, "filter_markup not idempotent for {input:?}");
        }
    }

    #[test]
    fn test_sanitize_bookmark_touches_only_text_fields() {
        let bookmark = Bookmark {
            id: 911,
            title: MALICIOUS_TITLE.to_string(),
            url: "www.maliciousbookmark.com".to_string(),
            description: Some(MALICIOUS_DESCRIPTION.to_string()),
            rating: 1,
        };

        let clean = sanitize_bookmark(bookmark.clone());
        assert_eq!(clean.id, bookmark.id);
        assert_eq!(clean.url, bookmark.url);
        assert_eq!(clean.rating, bookmark.rating);
        assert_eq!(clean.title, escape_text(MALICIOUS_TITLE));
        assert_eq!(clean.description, Some(filter_markup(MALICIOUS_DESCRIPTION)));

        let no_description = Bookmark {
            description: None,
            ..bookmark
        };
        assert_eq!(sanitize_bookmark(no_description).description, None);
    }
}
