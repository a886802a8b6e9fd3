//! Small helpers shared by the XML readers and writers.

use deckgen_core::{Error, Result};
use quick_xml::events::BytesStart;

/// Namespace of DrawingML elements.
pub const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
/// Namespace of relationship references inside parts.
pub const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
/// Namespace of PresentationML elements.
pub const NS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";

/// Standard XML declaration written at the top of every generated part.
pub const XML_DECLARATION: &str =
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// Extract the local name from a potentially namespaced XML element name.
pub fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}

/// Look up an unprefixed attribute, unescaped.
pub fn attr(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes().flatten().find_map(|a| {
        if a.key.as_ref() == key {
            a.unescape_value().ok().map(|v| v.into_owned())
        } else {
            None
        }
    })
}

/// Look up a namespace-prefixed attribute such as `r:id` by its local name.
pub fn rel_attr(e: &BytesStart<'_>, local: &[u8]) -> Option<String> {
    e.attributes().flatten().find_map(|a| {
        let key = a.key.as_ref();
        if key.contains(&b':') && local_name(key) == local {
            a.unescape_value().ok().map(|v| v.into_owned())
        } else {
            None
        }
    })
}

/// Parse an integer attribute, ignoring malformed values.
pub fn attr_i64(e: &BytesStart<'_>, key: &[u8]) -> Option<i64> {
    attr(e, key).and_then(|v| v.trim().parse().ok())
}

/// Whether XML 1.0 allows `c` in a document.
fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r'
            | '\u{20}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}'
    )
}

/// Escape text for element content or attribute values.
///
/// Characters XML 1.0 forbids are written as `_xHHHH_`, the form Office
/// uses for them, so the part stays well-formed.
pub fn escape(text: &str) -> String {
    if text.chars().all(is_xml_char) {
        return quick_xml::escape::escape(text).into_owned();
    }

    let mut cleaned = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        if is_xml_char(c) {
            cleaned.push(c);
        } else {
            cleaned.push_str(&format!("_x{:04X}_", c as u32));
        }
    }
    quick_xml::escape::escape(&cleaned).into_owned()
}

/// Decode a part's bytes as UTF-8.
pub fn part_text(name: &str, bytes: &[u8]) -> Result<String> {
    String::from_utf8(bytes.to_vec())
        .map_err(|e| Error::XmlError(format!("Part '{}' is not UTF-8: {}", name, e)))
}

/// Wrap a quick-xml error with the part it occurred in.
pub fn xml_error(part: &str, e: impl std::fmt::Display) -> Error {
    Error::XmlError(format!("Error parsing '{}': {}", part, e))
}
