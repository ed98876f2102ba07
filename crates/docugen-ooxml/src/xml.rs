//! Small helpers shared by the DOCX and PPTX serializers and readers

use quick_xml::events::BytesStart;

/// XML declaration written at the top of every part
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// Escape text for use in XML content and attribute values
///
/// Control characters that XML 1.0 forbids are dropped; tab, newline and
/// carriage return survive.
pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            '\t' | '\n' | '\r' => escaped.push(c),
            c if c.is_control() => {}
            c => escaped.push(c),
        }
    }
    escaped
}

/// `xml:space="preserve"` when the text has leading or trailing whitespace
pub fn space_attr(text: &str) -> &'static str {
    if text.starts_with(char::is_whitespace) || text.ends_with(char::is_whitespace) {
        r#" xml:space="preserve""#
    } else {
        ""
    }
}

/// Value of an attribute matched by local name (`w:val` and `val` both match `val`)
pub fn local_attr(e: &BytesStart, name: &[u8]) -> Option<String> {
    e.attributes()
        .filter_map(|a| a.ok())
        .find(|a| a.key.local_name().as_ref() == name)
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("R&D <core>"), "R&amp;D &lt;core&gt;");
        assert_eq!(escape_xml(r#"say "hi" it's"#), "say &quot;hi&quot; it&apos;s");
        assert_eq!(escape_xml("a\u{0001}b"), "ab");
        assert_eq!(escape_xml("اردو متن"), "اردو متن");
    }

    #[test]
    fn test_local_attr() {
        let start = BytesStart::from_content(r#"w:jc w:val="both""#, 4);
        assert_eq!(local_attr(&start, b"val"), Some("both".to_string()));
        assert_eq!(local_attr(&start, b"missing"), None);
    }

    #[test]
    fn test_space_attr() {
        assert_eq!(space_attr("plain"), "");
        assert!(space_attr(" padded").contains("preserve"));
    }
}
