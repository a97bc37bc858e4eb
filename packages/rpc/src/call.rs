//! Remote-call adapter: method-call convention over the request core.
//!
//! A call derives a fresh [`RequestSpec`] (POST, a single
//! `Content-Type: application/xml` header, XML-serialized body inside the
//! fixed envelope root, `Document` response format), delegates dispatch to
//! the request core, and unwraps the reply envelope. Producers stay cold
//! and cancellable exactly like plain requests.

use serde_json::{Map, Value};

use coldcall_http::{
    DecodedPayload, InFlightRequest, RequestFactory, RequestFailure, RequestProducer,
    RequestSpec, ResponseFormat,
};

use crate::envelope::{rest_call_result, RestCallResult};
use crate::xml::obj_to_xml;

/// Root tag wrapping every outgoing call payload.
pub const ENVELOPE_ROOT: &str = "Request";

/// Issues remote calls through a [`RequestFactory`].
#[derive(Clone, Default)]
pub struct RestClient {
    factory: RequestFactory,
}

impl RestClient {
    /// Production wiring (reqwest transport, built-in XML parser).
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an existing factory, e.g. one with an injected transport.
    pub fn with_factory(factory: RequestFactory) -> Self {
        Self { factory }
    }

    /// Build a cold producer for one remote call. `method_label` names the
    /// call in failure diagnostics; it is never sent over the wire.
    pub fn rest_request(
        &self,
        url: impl Into<String>,
        data: &Map<String, Value>,
        method_label: Option<&str>,
    ) -> RestProducer {
        let url = url.into();
        let body = format!(
            "<{ENVELOPE_ROOT}>{}</{ENVELOPE_ROOT}>",
            obj_to_xml(data)
        );
        let spec = RequestSpec::post(url.as_str())
            .with_header("Content-Type", "application/xml")
            .with_body(body)
            .with_format(ResponseFormat::Document);

        RestProducer {
            producer: self.factory.request(spec),
            url,
            method_label: method_label.map(str::to_string),
        }
    }
}

/// Cold producer of one unwrapped remote-call result per subscription.
#[derive(Clone)]
pub struct RestProducer {
    producer: RequestProducer,
    url: String,
    method_label: Option<String>,
}

impl RestProducer {
    /// Dispatch a new exchange. Must be called within a tokio runtime.
    pub fn subscribe(&self) -> RestCall {
        RestCall {
            inner: self.producer.subscribe(),
            url: self.url.clone(),
            method_label: self.method_label.clone(),
        }
    }
}

/// One in-flight remote call; releasable like the request it wraps.
pub struct RestCall {
    inner: InFlightRequest,
    url: String,
    method_label: Option<String>,
}

impl RestCall {
    /// Await the unwrapped envelope: the single terminal notification.
    pub async fn result(self) -> Result<RestCallResult, RequestFailure> {
        let outcome = self.inner.outcome().await?;
        let document = match outcome.into_payload() {
            DecodedPayload::Document(document) => document,
            other => {
                return Err(RequestFailure::Transport {
                    url: self.url,
                    status: None,
                    message: format!("remote call reply was not a document: {other:?}"),
                    reason: None,
                })
            }
        };
        rest_call_result(&document, &self.url, self.method_label.as_deref())
    }

    /// Cancel the underlying request. Idempotent.
    pub fn release(&mut self) {
        self.inner.release();
    }
}
