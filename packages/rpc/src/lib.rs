//! # coldcall-rpc
//!
//! XML envelope codec and remote-call convention on top of
//! `coldcall-http`.
//!
//! Outgoing calls serialize a nested key→value structure into tags-only
//! XML ([`obj_to_xml`]) wrapped in a fixed envelope root; replies are
//! `Document`-format responses whose `RestCallResult` element carries an
//! integer `Status` and an `Output` element ([`rest_call_result`]). A
//! negative status surfaces as
//! [`RequestFailure::RemoteCall`](coldcall_http::RequestFailure).
//!
//! ## Example
//!
//! ```ignore
//! use coldcall_rpc::{node_text_content, RestClient};
//! use serde_json::json;
//!
//! let client = RestClient::new();
//! let data = json!({"Name": "printer-7"});
//!
//! let producer = client.rest_request(
//!     "https://device.local/api",
//!     data.as_object().unwrap(),
//!     Some("GetStatus"),
//! );
//! let result = producer.subscribe().result().await?;
//!
//! let uptime = result
//!     .output
//!     .as_ref()
//!     .and_then(|output| node_text_content(output, "Uptime"));
//! ```

pub mod call;
pub mod envelope;
pub mod xml;

// Re-export main types
pub use call::{RestCall, RestClient, RestProducer, ENVELOPE_ROOT};
pub use envelope::{node_text_content, rest_call_result, RestCallResult};
pub use xml::{escape_xml, obj_to_xml};
