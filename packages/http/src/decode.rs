//! Pure response decoding: (raw transport payload, requested format) →
//! decoded value or `None`.
//!
//! Every decode problem folds into `None`; the request core turns that
//! into the single decode-failure error path. The mapping from format to
//! strategy is explicit and total.

use serde_json::Value;

use crate::document::{Document, DocumentParser};
use crate::transport::RawBody;
use crate::types::ResponseFormat;

/// MIME type handed to the document parser, regardless of what the server
/// declared. Server content types for document responses are unreliable.
pub const XML_CONTENT_TYPE: &str = "application/xml";

/// The decoded response payload, one variant per response format family.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedPayload {
    Text(String),
    Json(Value),
    Document(Document),
    Bytes(Vec<u8>),
}

impl DecodedPayload {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            DecodedPayload::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            DecodedPayload::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_document(&self) -> Option<&Document> {
        match self {
            DecodedPayload::Document(document) => Some(document),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            DecodedPayload::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }
}

/// Decode a raw transport payload according to the requested format.
///
/// An absent body decodes to `None` for every format. `Json` tolerates a
/// transport that delivered text instead of a parsed value (legacy engine
/// behavior) and folds malformed text to `None` instead of raising; a
/// parsed JSON `null` folds the same way. `Document` re-parses the raw
/// text through the injected parser with [`XML_CONTENT_TYPE`].
pub fn decode(
    body: Option<RawBody>,
    format: ResponseFormat,
    parser: &dyn DocumentParser,
) -> Option<DecodedPayload> {
    let body = body?;
    match format {
        ResponseFormat::Document => {
            let text = raw_text(body)?;
            parser
                .parse(&text, XML_CONTENT_TYPE)
                .map(DecodedPayload::Document)
        }
        ResponseFormat::Json => match body {
            RawBody::Json(Value::Null) => None,
            RawBody::Json(value) => Some(DecodedPayload::Json(value)),
            RawBody::Text(text) => match serde_json::from_str::<Value>(&text) {
                Ok(Value::Null) | Err(_) => None,
                Ok(value) => Some(DecodedPayload::Json(value)),
            },
            RawBody::Binary(_) => None,
        },
        ResponseFormat::Text => match body {
            RawBody::Text(text) => Some(DecodedPayload::Text(text)),
            RawBody::Json(value) => Some(DecodedPayload::Text(value.to_string())),
            RawBody::Binary(_) => None,
        },
        ResponseFormat::Blob | ResponseFormat::ArrayBuffer => match body {
            RawBody::Binary(bytes) => Some(DecodedPayload::Bytes(bytes)),
            RawBody::Text(text) => Some(DecodedPayload::Bytes(text.into_bytes())),
            RawBody::Json(_) => None,
        },
    }
}

fn raw_text(body: RawBody) -> Option<String> {
    match body {
        RawBody::Text(text) => Some(text),
        RawBody::Binary(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
        RawBody::Json(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::XmlDocumentParser;
    use serde_json::json;

    fn run(body: Option<RawBody>, format: ResponseFormat) -> Option<DecodedPayload> {
        decode(body, format, &XmlDocumentParser)
    }

    #[test]
    fn absent_body_is_none_for_every_format() {
        for format in [
            ResponseFormat::Text,
            ResponseFormat::Json,
            ResponseFormat::Document,
            ResponseFormat::Blob,
            ResponseFormat::ArrayBuffer,
        ] {
            assert_eq!(run(None, format), None);
        }
    }

    #[test]
    fn json_text_is_parsed() {
        let decoded = run(
            Some(RawBody::Text("{\"a\":1}".to_string())),
            ResponseFormat::Json,
        )
        .unwrap();
        assert_eq!(decoded.as_json(), Some(&json!({"a": 1})));
    }

    #[test]
    fn malformed_json_text_folds_to_none() {
        assert_eq!(
            run(Some(RawBody::Text("not json".to_string())), ResponseFormat::Json),
            None
        );
    }

    #[test]
    fn already_parsed_json_passes_through() {
        let decoded = run(Some(RawBody::Json(json!([1, 2]))), ResponseFormat::Json).unwrap();
        assert_eq!(decoded.as_json(), Some(&json!([1, 2])));
    }

    #[test]
    fn json_null_folds_to_none() {
        assert_eq!(run(Some(RawBody::Json(Value::Null)), ResponseFormat::Json), None);
        assert_eq!(
            run(Some(RawBody::Text("null".to_string())), ResponseFormat::Json),
            None
        );
    }

    #[test]
    fn document_parses_raw_text() {
        let decoded = run(
            Some(RawBody::Text("<r><a>x</a></r>".to_string())),
            ResponseFormat::Document,
        )
        .unwrap();
        let document = decoded.as_document().unwrap();
        assert_eq!(document.find("a").unwrap().text(), "x");
    }

    #[test]
    fn empty_document_text_folds_to_none() {
        assert_eq!(
            run(Some(RawBody::Text(String::new())), ResponseFormat::Document),
            None
        );
    }

    #[test]
    fn text_passes_through() {
        let decoded = run(Some(RawBody::Text("plain".to_string())), ResponseFormat::Text).unwrap();
        assert_eq!(decoded.as_text(), Some("plain"));
    }

    #[test]
    fn binary_formats_pass_bytes_through() {
        for format in [ResponseFormat::Blob, ResponseFormat::ArrayBuffer] {
            let decoded = run(Some(RawBody::Binary(vec![1, 2, 3])), format).unwrap();
            assert_eq!(decoded.as_bytes(), Some(&[1u8, 2, 3][..]));
        }
    }
}
