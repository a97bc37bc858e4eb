//! Deserializer half of the envelope codec.
//!
//! A remote-call reply is a document containing a `RestCallResult` element
//! with an integer `Status` child and, on success, an `Output` element.
//! A negative status is the server saying no; it surfaces as
//! [`RequestFailure::RemoteCall`].

use coldcall_http::{Document, Element, RequestFailure};

/// Tag of the envelope element inside a remote-call reply.
pub const RESULT_TAG: &str = "RestCallResult";
/// Tag of the status child.
pub const STATUS_TAG: &str = "Status";
/// Tag of the output child, present on success.
pub const OUTPUT_TAG: &str = "Output";
/// Tag of the optional server-supplied message child.
pub const MESSAGE_TAG: &str = "Message";

/// Unwrapped remote-call reply: non-negative status plus the output
/// element, if the server sent one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestCallResult {
    pub status: i64,
    pub output: Option<Element>,
}

/// Text content of the named element under `root`, absent if the element
/// does not exist. Handy for pulling scalar fields out of `Output`.
pub fn node_text_content<'a>(root: &'a Element, tag: &str) -> Option<&'a str> {
    root.find(tag).map(Element::text)
}

/// Unwrap a remote-call reply document.
///
/// A missing envelope or unreadable status is a decode-style transport
/// failure; a negative status becomes [`RequestFailure::RemoteCall`]
/// carrying the URL and, when supplied, the method label.
pub fn rest_call_result(
    document: &Document,
    url: &str,
    method_label: Option<&str>,
) -> Result<RestCallResult, RequestFailure> {
    let envelope = document.find(RESULT_TAG).ok_or_else(|| {
        RequestFailure::Transport {
            url: url.to_string(),
            status: None,
            message: format!("response document has no {RESULT_TAG} element"),
            reason: None,
        }
    })?;

    let status_text = envelope
        .child(STATUS_TAG)
        .map(Element::text)
        .ok_or_else(|| RequestFailure::Transport {
            url: url.to_string(),
            status: None,
            message: format!("{RESULT_TAG} has no {STATUS_TAG} element"),
            reason: None,
        })?;

    let status: i64 = status_text
        .trim()
        .parse()
        .map_err(|_| RequestFailure::Transport {
            url: url.to_string(),
            status: None,
            message: format!("{STATUS_TAG} is not an integer: {status_text:?}"),
            reason: None,
        })?;

    if status < 0 {
        let server_message = envelope
            .child(MESSAGE_TAG)
            .map(|m| m.text().to_string())
            .filter(|m| !m.is_empty());
        return Err(RequestFailure::remote_call(
            url,
            status,
            method_label.map(str::to_string),
            server_message,
        ));
    }

    Ok(RestCallResult {
        status,
        output: envelope.child(OUTPUT_TAG).cloned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use coldcall_http::{DocumentParser, XmlDocumentParser};

    fn parse(text: &str) -> Document {
        XmlDocumentParser.parse(text, "application/xml").unwrap()
    }

    const URL: &str = "https://example.com/api";

    #[test]
    fn negative_status_raises_remote_call_failure() {
        let doc = parse("<RestCallResult><Status>-3</Status></RestCallResult>");
        let failure = rest_call_result(&doc, URL, Some("GetThing")).unwrap_err();
        match failure {
            RequestFailure::RemoteCall {
                url,
                status,
                method_label,
                ..
            } => {
                assert_eq!(url, URL);
                assert_eq!(status, -3);
                assert_eq!(method_label.as_deref(), Some("GetThing"));
            }
            other => panic!("unexpected failure: {other:?}"),
        }
    }

    #[test]
    fn zero_status_returns_output() {
        let doc = parse(
            "<RestCallResult><Status>0</Status><Output><Id>9</Id></Output></RestCallResult>",
        );
        let result = rest_call_result(&doc, URL, None).unwrap();
        assert_eq!(result.status, 0);
        let output = result.output.unwrap();
        assert_eq!(node_text_content(&output, "Id"), Some("9"));
    }

    #[test]
    fn positive_status_without_output_is_ok() {
        let doc = parse("<RestCallResult><Status>2</Status></RestCallResult>");
        let result = rest_call_result(&doc, URL, None).unwrap();
        assert_eq!(result.status, 2);
        assert!(result.output.is_none());
    }

    #[test]
    fn envelope_nested_below_the_root_is_found() {
        let doc = parse(
            "<Reply><RestCallResult><Status>1</Status></RestCallResult></Reply>",
        );
        assert_eq!(rest_call_result(&doc, URL, None).unwrap().status, 1);
    }

    #[test]
    fn missing_envelope_is_a_transport_failure() {
        let doc = parse("<Reply><Other/></Reply>");
        let failure = rest_call_result(&doc, URL, None).unwrap_err();
        assert!(matches!(failure, RequestFailure::Transport { .. }));
    }

    #[test]
    fn unreadable_status_is_a_transport_failure() {
        let doc = parse("<RestCallResult><Status>soon</Status></RestCallResult>");
        let failure = rest_call_result(&doc, URL, None).unwrap_err();
        assert!(matches!(failure, RequestFailure::Transport { .. }));
    }

    #[test]
    fn server_message_is_carried_on_failure() {
        let doc = parse(
            "<RestCallResult><Status>-1</Status><Message>quota exceeded</Message></RestCallResult>",
        );
        let failure = rest_call_result(&doc, URL, None).unwrap_err();
        match failure {
            RequestFailure::RemoteCall { server_message, .. } => {
                assert_eq!(server_message.as_deref(), Some("quota exceeded"));
            }
            other => panic!("unexpected failure: {other:?}"),
        }
    }

    #[test]
    fn node_text_content_absent_for_missing_tag() {
        let doc = parse("<Output><Id>9</Id></Output>");
        assert_eq!(node_text_content(doc.root(), "Nope"), None);
    }
}
