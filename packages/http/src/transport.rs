//! The network-facing boundary: one trait, one production implementation.
//!
//! A [`Transport`] performs exactly one HTTP exchange per call. Everything
//! above it (decoding, metadata, cancellation bookkeeping) lives in the
//! request core; everything below it is the platform's HTTP stack.
//! Implementations can be swapped for mocks in tests.

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use serde_json::Value;

use crate::types::{Method, RequestBody, RequestSpec, ResponseFormat};

/// The format a transport is told to deliver its payload in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeMode {
    Text,
    Json,
    Binary,
}

impl DecodeMode {
    /// Map a requested response format to the transport decode mode.
    ///
    /// `Document` asks for raw text rather than a parsed document; the text
    /// is re-parsed locally with a fixed XML content type.
    pub fn for_format(format: ResponseFormat) -> Self {
        match format {
            ResponseFormat::Text | ResponseFormat::Document => DecodeMode::Text,
            ResponseFormat::Json => DecodeMode::Json,
            ResponseFormat::Blob | ResponseFormat::ArrayBuffer => DecodeMode::Binary,
        }
    }
}

/// One outgoing exchange, as handed to a [`Transport`].
#[derive(Debug, Clone, PartialEq)]
pub struct TransportCall {
    pub method: Method,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: Option<RequestBody>,
    pub decode: DecodeMode,
}

impl TransportCall {
    /// Build the transport call for a request spec.
    pub fn from_spec(spec: &RequestSpec) -> Self {
        Self {
            method: spec.method.clone(),
            url: spec.url.clone(),
            headers: spec.headers.clone(),
            body: spec.body.clone(),
            decode: DecodeMode::for_format(spec.format),
        }
    }
}

/// Raw payload as delivered by a transport.
///
/// A transport asked for `Json` may still deliver `Text` when it cannot
/// produce a parsed value; the decoder tolerates that.
#[derive(Debug, Clone, PartialEq)]
pub enum RawBody {
    Text(String),
    Json(Value),
    Binary(Vec<u8>),
}

/// The completed exchange: final status, payload and metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportReply {
    pub status: u16,
    pub status_text: String,
    pub body: Option<RawBody>,
    /// Total bytes received, if known.
    pub bytes_received: Option<u64>,
    /// Possibly-redirected URL the reply actually came from.
    pub final_url: String,
    pub headers: HashMap<String, String>,
}

/// Transport-level failure (connect, DNS, TLS, invalid request pieces).
/// Distinct from an HTTP error status, which arrives as a normal reply.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct TransportFault {
    pub message: String,
}

impl TransportFault {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Performs one HTTP exchange.
///
/// Cancellation is dropping the in-flight future; implementations must not
/// leave side effects behind when dropped mid-exchange.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn exchange(&self, call: TransportCall) -> Result<TransportReply, TransportFault>;
}

/// Production transport over a shared `reqwest::Client`.
///
/// No timeout is configured: the request core promises no internal
/// deadline, and callers compose their own via cancellation.
#[derive(Clone, Default)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn exchange(&self, call: TransportCall) -> Result<TransportReply, TransportFault> {
        let method: http::Method = call.method.into();

        let mut headers = HeaderMap::new();
        for (name, value) in &call.headers {
            let header_name = HeaderName::try_from(name.as_str())
                .map_err(|e| TransportFault::new(e.to_string()))?;
            let header_value = HeaderValue::try_from(value.as_str())
                .map_err(|e| TransportFault::new(e.to_string()))?;
            headers.insert(header_name, header_value);
        }

        let mut req_builder = self.client.request(method, &call.url);
        req_builder = req_builder.headers(headers);

        match call.body {
            Some(RequestBody::Text(text)) => {
                req_builder = req_builder.body(text);
            }
            Some(RequestBody::Bytes(bytes)) => {
                req_builder = req_builder.body(bytes);
            }
            None => {}
        }

        let response = req_builder
            .send()
            .await
            .map_err(|e| TransportFault::new(e.to_string()))?;

        let status = response.status().as_u16();
        let status_text = response
            .status()
            .canonical_reason()
            .unwrap_or("Unknown")
            .to_string();
        let final_url = response.url().to_string();

        let mut reply_headers = HashMap::new();
        for (name, value) in response.headers() {
            if let Ok(v) = value.to_str() {
                reply_headers.insert(name.to_string(), v.to_string());
            }
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| TransportFault::new(e.to_string()))?;
        let bytes_received = Some(bytes.len() as u64);

        let body = match call.decode {
            DecodeMode::Text => Some(RawBody::Text(
                String::from_utf8_lossy(&bytes).into_owned(),
            )),
            DecodeMode::Json => match serde_json::from_slice::<Value>(&bytes) {
                Ok(value) => Some(RawBody::Json(value)),
                // Undecodable JSON arrives as raw text; the decoder folds it.
                Err(_) => Some(RawBody::Text(String::from_utf8_lossy(&bytes).into_owned())),
            },
            DecodeMode::Binary => Some(RawBody::Binary(bytes.to_vec())),
        };

        Ok(TransportReply {
            status,
            status_text,
            body,
            bytes_received,
            final_url,
            headers: reply_headers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_mode_document_carve_out() {
        assert_eq!(
            DecodeMode::for_format(ResponseFormat::Document),
            DecodeMode::Text
        );
        assert_eq!(DecodeMode::for_format(ResponseFormat::Text), DecodeMode::Text);
        assert_eq!(DecodeMode::for_format(ResponseFormat::Json), DecodeMode::Json);
        assert_eq!(DecodeMode::for_format(ResponseFormat::Blob), DecodeMode::Binary);
        assert_eq!(
            DecodeMode::for_format(ResponseFormat::ArrayBuffer),
            DecodeMode::Binary
        );
    }

    #[tokio::test]
    async fn invalid_header_name_is_a_transport_fault() {
        let transport = ReqwestTransport::new();
        let call = TransportCall::from_spec(
            &RequestSpec::get("http://example.invalid/").with_header("bad name", "v"),
        );

        // Fails while building the request, before any network activity.
        let fault = transport.exchange(call).await.unwrap_err();
        assert!(!fault.message.is_empty());
    }

    #[tokio::test]
    async fn invalid_header_value_is_a_transport_fault() {
        let transport = ReqwestTransport::new();
        let call = TransportCall::from_spec(
            &RequestSpec::get("http://example.invalid/").with_header("X-Note", "line\nbreak"),
        );

        let fault = transport.exchange(call).await.unwrap_err();
        assert!(!fault.message.is_empty());
    }

    #[test]
    fn call_carries_spec_fields() {
        let spec = RequestSpec::post("https://example.com/api")
            .with_header("X-A", "1")
            .with_body("payload")
            .with_format(ResponseFormat::Document);

        let call = TransportCall::from_spec(&spec);
        assert_eq!(call.method, Method::POST);
        assert_eq!(call.url, "https://example.com/api");
        assert_eq!(call.headers["X-A"], "1");
        assert_eq!(call.body, Some(RequestBody::Text("payload".to_string())));
        assert_eq!(call.decode, DecodeMode::Text);
    }
}
