//! # coldcall-http
//!
//! Cancellable, cold producers of exactly one HTTP response.
//!
//! A request is described by a [`RequestSpec`], turned into a
//! [`RequestProducer`] by a [`RequestFactory`], and dispatched by
//! subscribing. Each subscription owns one transport exchange and delivers
//! exactly one terminal notification: a decoded [`RequestOutcome`] or a
//! [`RequestFailure`]. Releasing the in-flight handle cancels the exchange.
//!
//! ## Example
//!
//! ```ignore
//! use coldcall_http::{RequestFactory, RequestSpec, ResponseFormat};
//!
//! let factory = RequestFactory::new();
//!
//! let producer = factory.request(
//!     RequestSpec::get("https://api.example.com/users/123")
//!         .with_format(ResponseFormat::Json)
//!         .with_metadata(),
//! );
//!
//! // Cold: nothing has been sent yet. Subscribing dispatches.
//! let in_flight = producer.subscribe();
//! let outcome = in_flight.outcome().await?;
//!
//! // Subscribing again dispatches a second, independent exchange.
//! let mut retry = producer.subscribe();
//! retry.release(); // cancels it before (or while) it runs
//! ```
//!
//! The transport and the XML document parser are injected collaborators
//! ([`Transport`], [`DocumentParser`]); production wiring uses `reqwest`
//! and the built-in `quick-xml` parser.

pub mod decode;
pub mod document;
pub mod error;
pub mod request;
pub mod transport;
pub mod types;

// Re-export main types
pub use decode::{decode, DecodedPayload, XML_CONTENT_TYPE};
pub use document::{Document, DocumentParser, Element, XmlDocumentParser};
pub use error::RequestFailure;
pub use request::{
    InFlightRequest, RequestFactory, RequestOutcome, RequestProducer, ResponseDetails,
};
pub use transport::{
    DecodeMode, RawBody, ReqwestTransport, Transport, TransportCall, TransportFault,
    TransportReply,
};
pub use types::{Method, RequestBody, RequestSpec, ResponseFormat};
