//! Serializer half of the envelope codec: nested maps to tags-only XML.

use serde_json::{Map, Value};

/// Escape `&`, `<` and `>` for use as XML text. Only those three; the
/// envelope convention never quotes attributes.
pub fn escape_xml(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Render a nested key→value structure as XML: one element per key, in
/// enumeration order. Object values nest recursively; `null` renders an
/// empty element; every other leaf renders its text escaped. No XML
/// declaration, no attributes.
pub fn obj_to_xml(map: &Map<String, Value>) -> String {
    let mut xml = String::new();
    for (key, value) in map {
        xml.push('<');
        xml.push_str(key);
        xml.push('>');
        match value {
            Value::Object(nested) => xml.push_str(&obj_to_xml(nested)),
            Value::Null => {}
            Value::String(text) => xml.push_str(&escape_xml(text)),
            leaf => xml.push_str(&escape_xml(&leaf.to_string())),
        }
        xml.push_str("</");
        xml.push_str(key);
        xml.push('>');
    }
    xml
}
