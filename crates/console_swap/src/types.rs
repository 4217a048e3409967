use std::fmt;

use thiserror::Error;

/// Result of one fetch against the fragment endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutput {
    pub request_url: String,
    pub final_url: String,
    pub content_type: Option<String>,
    /// Response body verbatim; opaque to this crate.
    pub body: String,
    /// Parsed body when the response declared itself JSON.
    pub json: Option<serde_json::Value>,
}

/// How a triggered swap ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapOutcome {
    /// The target was updated with fresh content.
    Applied,
    /// The current value already matched; no request was even necessary.
    NoChange,
    /// A begin guard cancelled the swap before any network call.
    Vetoed,
    /// A newer request took over; this one's result was discarded.
    Superseded,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
