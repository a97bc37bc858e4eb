/// Terminal failure of a request.
///
/// Exactly one of these is delivered as the error notification of an
/// in-flight request; nothing is retried internally. Every variant keeps
/// its context (URL, codes, labels) as structured fields so catch sites
/// can match instead of parsing messages.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestFailure {
    /// HTTP status outside [200, 300), a transport-level error event, or a
    /// decode failure.
    #[error("transport error for {url}{}: {message}", fmt_status(.status))]
    Transport {
        url: String,
        status: Option<u16>,
        message: String,
        reason: Option<String>,
    },

    /// The remote procedure reported a negative status in its response
    /// envelope.
    #[error("remote call{} to {url} failed with status {status}", fmt_label(.method_label))]
    RemoteCall {
        url: String,
        status: i64,
        method_label: Option<String>,
        server_message: Option<String>,
    },
}

fn fmt_status(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" (status {code})"),
        None => String::new(),
    }
}

fn fmt_label(label: &Option<String>) -> String {
    match label {
        Some(name) => format!(" `{name}`"),
        None => String::new(),
    }
}

impl RequestFailure {
    /// Non-2xx HTTP completion.
    pub fn http_status(url: impl Into<String>, status: u16, status_text: impl Into<String>) -> Self {
        RequestFailure::Transport {
            url: url.into(),
            status: Some(status),
            message: status_text.into(),
            reason: None,
        }
    }

    /// Transport-level error event (connect, DNS, TLS, ...), not an HTTP
    /// status.
    pub fn error_event(url: impl Into<String>, reason: impl Into<String>) -> Self {
        RequestFailure::Transport {
            url: url.into(),
            status: None,
            message: "transport error event".to_string(),
            reason: Some(reason.into()),
        }
    }

    /// The response body decoded to nothing for the requested format.
    pub fn decode(url: impl Into<String>, status: u16, format_label: &str) -> Self {
        RequestFailure::Transport {
            url: url.into(),
            status: Some(status),
            message: format!("response body could not be decoded as {format_label}"),
            reason: None,
        }
    }

    /// The request was released before a terminal notification arrived.
    pub fn released(url: impl Into<String>) -> Self {
        RequestFailure::Transport {
            url: url.into(),
            status: None,
            message: "request was released before completion".to_string(),
            reason: None,
        }
    }

    /// Negative application-level status in a response envelope.
    pub fn remote_call(
        url: impl Into<String>,
        status: i64,
        method_label: Option<String>,
        server_message: Option<String>,
    ) -> Self {
        RequestFailure::RemoteCall {
            url: url.into(),
            status,
            method_label,
            server_message,
        }
    }

    /// The URL the failing request targeted.
    pub fn url(&self) -> &str {
        match self {
            RequestFailure::Transport { url, .. } => url,
            RequestFailure::RemoteCall { url, .. } => url,
        }
    }
}
