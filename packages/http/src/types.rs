use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// HTTP method for requests
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    GET,
    POST,
    PUT,
    PATCH,
    DELETE,
    HEAD,
    OPTIONS,
}

impl From<Method> for http::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::GET => http::Method::GET,
            Method::POST => http::Method::POST,
            Method::PUT => http::Method::PUT,
            Method::PATCH => http::Method::PATCH,
            Method::DELETE => http::Method::DELETE,
            Method::HEAD => http::Method::HEAD,
            Method::OPTIONS => http::Method::OPTIONS,
        }
    }
}

impl From<http::Method> for Method {
    fn from(method: http::Method) -> Self {
        match method {
            http::Method::GET => Method::GET,
            http::Method::POST => Method::POST,
            http::Method::PUT => Method::PUT,
            http::Method::PATCH => Method::PATCH,
            http::Method::DELETE => Method::DELETE,
            http::Method::HEAD => Method::HEAD,
            http::Method::OPTIONS => Method::OPTIONS,
            _ => Method::GET, // Default fallback
        }
    }
}

/// How the response body should be decoded.
///
/// `Document` is special-cased: the transport is asked for raw text and the
/// text is re-parsed into an XML document locally, because server-declared
/// content types for document responses are unreliable.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    #[default]
    Text,
    Json,
    Document,
    Blob,
    #[serde(rename = "arraybuffer")]
    ArrayBuffer,
}

impl ResponseFormat {
    /// Label used in diagnostics (e.g. decode-failure messages).
    pub fn label(&self) -> &'static str {
        match self {
            ResponseFormat::Text => "text",
            ResponseFormat::Json => "json",
            ResponseFormat::Document => "document",
            ResponseFormat::Blob => "blob",
            ResponseFormat::ArrayBuffer => "arraybuffer",
        }
    }
}

/// Request body payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum RequestBody {
    Text(String),
    Bytes(Vec<u8>),
}

/// A full HTTP request specification.
///
/// Immutable once handed to a [`RequestFactory`](crate::RequestFactory);
/// derive a new spec instead of mutating one that is already in flight.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RequestSpec {
    /// Target URL.
    pub url: String,

    /// HTTP method (GET, POST, PUT, PATCH, ...)
    #[serde(default)]
    pub method: Method,

    /// Request body, absent for methods with no payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<RequestBody>,

    /// Request headers. Duplicate names overwrite rather than append.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,

    /// Expected response format.
    #[serde(default)]
    pub format: ResponseFormat,

    /// Deliver the full [`ResponseDetails`](crate::ResponseDetails) record
    /// instead of the bare payload.
    #[serde(default)]
    pub include_metadata: bool,

    /// Response header names to capture into the outcome. Capture happens
    /// only when this is supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capture_headers: Option<Vec<String>>,
}

impl RequestSpec {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: Method::GET,
            ..Default::default()
        }
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: Method::POST,
            ..Default::default()
        }
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(RequestBody::Text(body.into()));
        self
    }

    pub fn with_bytes(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(RequestBody::Bytes(body.into()));
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_format(mut self, format: ResponseFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_metadata(mut self) -> Self {
        self.include_metadata = true;
        self
    }

    pub fn capture_header(mut self, name: impl Into<String>) -> Self {
        self.capture_headers
            .get_or_insert_with(Vec::new)
            .push(name.into());
        self
    }
}
