//! Error types for the E2E API client.

use thiserror::Error;

const NOT_FOUND_MARKER: &str = "not found";

/// Errors raised while talking to the control-plane API.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ApiError {
    /// Raised when the HTTP client cannot be constructed.
    #[error("failed to build HTTP client: {message}")]
    Client {
        /// Message returned by the HTTP stack.
        message: String,
    },
    /// Network-level failure, passed through unchanged.
    #[error("{message}")]
    Transport {
        /// Message returned by the HTTP stack.
        message: String,
    },
    /// Raised when the API answers with an unexpected status code.
    #[error("got a non {expected} status code: {status} - {body}")]
    Status {
        /// Status code the endpoint is expected to return.
        expected: u16,
        /// Status code actually returned.
        status: u16,
        /// Raw response body.
        body: String,
    },
    /// Raised when a response body is not the expected JSON shape.
    #[error("failed to decode {context} response: {message}")]
    Decode {
        /// Endpoint whose response failed to decode.
        context: String,
        /// Parser error message.
        message: String,
    },
    /// Raised when a request payload fails local validation.
    #[error("invalid request payload: {0}")]
    InvalidPayload(String),
}

impl ApiError {
    /// Returns `true` when the error text reports a missing resource.
    ///
    /// The API exposes no stable error code for this case, so the check
    /// matches on the rendered message.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.to_string().contains(NOT_FOUND_MARKER)
    }

    pub(crate) fn transport(err: &reqwest::Error) -> Self {
        Self::Transport {
            message: err.to_string(),
        }
    }

    pub(crate) fn decode(context: &str, err: &serde_json::Error) -> Self {
        Self::Decode {
            context: context.to_owned(),
            message: err.to_string(),
        }
    }
}
