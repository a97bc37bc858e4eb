//! The request core: cold, cancellable producers of one outcome.
//!
//! A [`RequestFactory`] holds the injected collaborators (transport,
//! document parser). `factory.request(spec)` builds a [`RequestProducer`]
//! without touching the network; every [`RequestProducer::subscribe`]
//! dispatches a brand-new transport exchange and hands back an
//! [`InFlightRequest`] owning that one exchange. The terminal notification
//! travels over a one-shot channel, and cancellation is an idempotent
//! `release` that aborts the exchange if it has not finished.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::decode::{decode, DecodedPayload};
use crate::document::{DocumentParser, XmlDocumentParser};
use crate::error::RequestFailure;
use crate::transport::{ReqwestTransport, Transport, TransportCall};
use crate::types::RequestSpec;

/// Builds request producers around an injected transport and parser.
#[derive(Clone)]
pub struct RequestFactory {
    transport: Arc<dyn Transport>,
    parser: Arc<dyn DocumentParser>,
}

impl Default for RequestFactory {
    fn default() -> Self {
        Self {
            transport: Arc::new(ReqwestTransport::new()),
            parser: Arc::new(XmlDocumentParser),
        }
    }
}

impl RequestFactory {
    /// Production wiring: `ReqwestTransport` + `XmlDocumentParser`.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = transport;
        self
    }

    pub fn with_parser(mut self, parser: Arc<dyn DocumentParser>) -> Self {
        self.parser = parser;
        self
    }

    /// Build a producer for the given spec. Performs no network activity.
    pub fn request(&self, spec: RequestSpec) -> RequestProducer {
        RequestProducer {
            spec,
            transport: self.transport.clone(),
            parser: self.parser.clone(),
        }
    }
}

/// A cold producer: each subscription dispatches its own exchange.
#[derive(Clone)]
pub struct RequestProducer {
    spec: RequestSpec,
    transport: Arc<dyn Transport>,
    parser: Arc<dyn DocumentParser>,
}

impl RequestProducer {
    pub fn spec(&self) -> &RequestSpec {
        &self.spec
    }

    /// Dispatch a new transport exchange and return the handle owning it.
    ///
    /// Must be called from within a tokio runtime.
    pub fn subscribe(&self) -> InFlightRequest {
        let (tx, rx) = oneshot::channel();
        let spec = self.spec.clone();
        let transport = self.transport.clone();
        let parser = self.parser.clone();

        let task = tokio::spawn(async move {
            let result = run_request(spec, transport, parser).await;
            // Receiver gone means the subscriber released first.
            let _ = tx.send(result);
        });

        InFlightRequest {
            url: self.spec.url.clone(),
            rx,
            task,
            released: false,
        }
    }
}

/// One subscription: the spawned exchange plus the one-shot terminal
/// notification. Dropping the handle releases it.
pub struct InFlightRequest {
    url: String,
    rx: oneshot::Receiver<Result<RequestOutcome, RequestFailure>>,
    task: JoinHandle<()>,
    released: bool,
}

impl InFlightRequest {
    /// Await the single terminal notification.
    pub async fn outcome(mut self) -> Result<RequestOutcome, RequestFailure> {
        if self.released {
            return Err(RequestFailure::released(self.url.as_str()));
        }
        match (&mut self.rx).await {
            Ok(result) => result,
            Err(_) => Err(RequestFailure::released(self.url.as_str())),
        }
    }

    /// Cancel the subscription. Idempotent; a no-op once the exchange has
    /// finished or after a previous release.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        if !self.task.is_finished() {
            self.task.abort();
        }
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl Drop for InFlightRequest {
    fn drop(&mut self) {
        self.release();
    }
}

/// The single terminal value of a successful request.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestOutcome {
    /// Decoded payload alone (`include_metadata` false).
    Payload(DecodedPayload),
    /// Payload enriched with response metadata (`include_metadata` true).
    Detailed(ResponseDetails),
}

impl RequestOutcome {
    pub fn payload(&self) -> &DecodedPayload {
        match self {
            RequestOutcome::Payload(payload) => payload,
            RequestOutcome::Detailed(details) => &details.payload,
        }
    }

    pub fn into_payload(self) -> DecodedPayload {
        match self {
            RequestOutcome::Payload(payload) => payload,
            RequestOutcome::Detailed(details) => details.payload,
        }
    }

    pub fn details(&self) -> Option<&ResponseDetails> {
        match self {
            RequestOutcome::Payload(_) => None,
            RequestOutcome::Detailed(details) => Some(details),
        }
    }
}

/// Metadata-enriched outcome record.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseDetails {
    pub payload: DecodedPayload,
    /// Total bytes received, if the transport knew.
    pub byte_size: Option<u64>,
    /// Wall time from dispatch to completion.
    pub duration: Duration,
    /// Captured response headers, present only when capture was requested.
    /// Keyed by the requested names.
    pub response_headers: Option<HashMap<String, String>>,
    /// Possibly-redirected URL the reply came from.
    pub final_url: String,
    pub status: u16,
    pub status_text: String,
}

async fn run_request(
    spec: RequestSpec,
    transport: Arc<dyn Transport>,
    parser: Arc<dyn DocumentParser>,
) -> Result<RequestOutcome, RequestFailure> {
    let call = TransportCall::from_spec(&spec);
    let started = Instant::now();

    let reply = transport
        .exchange(call)
        .await
        .map_err(|fault| RequestFailure::error_event(spec.url.as_str(), fault.message))?;

    if !(200..300).contains(&reply.status) {
        return Err(RequestFailure::http_status(
            spec.url.as_str(),
            reply.status,
            reply.status_text,
        ));
    }

    let duration = started.elapsed();
    let status = reply.status;
    let status_text = reply.status_text;
    let final_url = reply.final_url;
    let byte_size = reply.bytes_received;
    let reply_headers = reply.headers;

    let payload = decode(reply.body, spec.format, parser.as_ref())
        .ok_or_else(|| RequestFailure::decode(spec.url.as_str(), status, spec.format.label()))?;

    if !spec.include_metadata {
        return Ok(RequestOutcome::Payload(payload));
    }

    let response_headers = spec
        .capture_headers
        .as_ref()
        .map(|names| capture_headers(names, &reply_headers));

    Ok(RequestOutcome::Detailed(ResponseDetails {
        payload,
        byte_size,
        duration,
        response_headers,
        final_url,
        status,
        status_text,
    }))
}

/// Pick exactly the requested header names out of the reply headers.
/// Transports normalize names to lowercase; the result is keyed by the
/// names as requested.
fn capture_headers(
    requested: &[String],
    reply_headers: &HashMap<String, String>,
) -> HashMap<String, String> {
    requested
        .iter()
        .filter_map(|name| {
            reply_headers
                .get(name)
                .or_else(|| reply_headers.get(&name.to_ascii_lowercase()))
                .map(|value| (name.clone(), value.clone()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_headers_is_exact() {
        let mut reply = HashMap::new();
        reply.insert("x-total".to_string(), "42".to_string());
        reply.insert("x-other".to_string(), "ignored".to_string());

        let captured = capture_headers(&["X-Total".to_string()], &reply);
        assert_eq!(captured.len(), 1);
        assert_eq!(captured["X-Total"], "42");
    }

    #[test]
    fn capture_headers_skips_missing_names() {
        let reply = HashMap::new();
        let captured = capture_headers(&["X-Total".to_string()], &reply);
        assert!(captured.is_empty());
    }
}
