//! `KoficError` - error taxonomy of the KOFIC client.

/// Result alias used throughout the KOFIC client.
pub type Result<T> = std::result::Result<T, KoficError>;

/// Errors returned by the KOFIC client.
#[derive(Debug, thiserror::Error)]
#[allow(clippy::module_name_repetitions)]
pub enum KoficError {
    /// The request could not be sent or its body could not be read.
    #[error("transport error: {context}")]
    Transport {
        /// What was being attempted.
        context: String,
        /// Underlying HTTP client error.
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success HTTP status.
    #[error("KOFIC API error (HTTP {status}): {body}")]
    HttpStatus {
        /// Response status.
        status: reqwest::StatusCode,
        /// Response body text.
        body: String,
    },

    /// The API answered with a `faultInfo` envelope (HTTP 200).
    #[error("KOFIC API fault: code={code}, message={message}")]
    ApiFault {
        /// `faultInfo.errorCode`.
        code: String,
        /// `faultInfo.message`.
        message: String,
    },

    /// A response field is missing or has an unexpected shape.
    #[error("failed to parse KOFIC response: {0}")]
    Parse(String),

    /// Image extraction found no anchor, attribute, or path.
    #[error("image not found: {0}")]
    NotFound(String),

    /// A request URL could not be built.
    #[error("invalid URL: {context}")]
    InvalidUrl {
        /// What was being joined.
        context: String,
        /// Underlying parse error.
        #[source]
        source: url::ParseError,
    },

    /// The client builder is missing a required setting.
    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl KoficError {
    /// Returns `true` for network and HTTP status failures.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::HttpStatus { .. })
    }

    /// Builds a `Parse` error for a missing field.
    pub(crate) fn missing_field(path: &str) -> Self {
        Self::Parse(format!("missing field `{path}`"))
    }
}
