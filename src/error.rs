use std::fmt;

/// Result type for dflow-rs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for dflow-rs
#[derive(Debug)]
pub enum Error {
    /// HTTP transport failed (connection refused, DNS, timeout, ...)
    Http(reqwest::Error),

    /// JSON serialization/deserialization failed outside of a response body
    Json(serde_json::Error),

    /// Invalid configuration
    Config(String),

    /// Invalid parameter, rejected before any network call
    InvalidParameter(String),

    /// API returned a non-2xx status
    ///
    /// `body` is the parsed JSON error body, or the raw text as a JSON string
    /// when the body was not valid JSON.
    Api {
        status: u16,
        message: String,
        body: Option<serde_json::Value>,
    },

    /// API returned a 2xx status but the body could not be decoded
    Decode {
        status: u16,
        body: String,
        source: serde_json::Error,
    },

    /// WebSocket connection error
    WebSocket(String),

    /// WebSocket connection closed
    ConnectionClosed,

    /// Operation requires an open streaming connection
    NotConnected,

    /// Inbound frame carried a channel tag this client does not know
    UnknownChannel(String),

    /// Reconnection failed after multiple attempts
    ReconnectFailed { attempts: u32, last_error: String },

    /// Ledger client reported a failure
    Ledger(String),

    /// Transaction landed but failed on-chain
    TransactionFailed(String),

    /// Operation did not complete in time
    Timeout(String),

    /// Base64 payload could not be decoded
    Base64(base64::DecodeError),
}

impl Error {
    /// HTTP status carried by the error, for both API and decode failures
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } | Error::Decode { status, .. } => Some(*status),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether the default retry policy treats this error as transient
    ///
    /// Rate limiting (429), server errors (>= 500) and transport-level
    /// connect/timeout failures are transient. Decode failures never are.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Api { status, .. } => *status == 429 || *status >= 500,
            Error::Http(e) => e.is_connect() || e.is_timeout(),
            _ => false,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Http(e) => write!(f, "HTTP error: {}", e),
            Error::Json(e) => write!(f, "JSON error: {}", e),
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
            Error::Api {
                status, message, ..
            } => {
                write!(f, "API error (status {}): {}", status, message)
            }
            Error::Decode { status, source, .. } => write!(
                f,
                "Failed to parse response as JSON (status {}): {}",
                status, source
            ),
            Error::WebSocket(msg) => write!(f, "WebSocket error: {}", msg),
            Error::ConnectionClosed => write!(f, "WebSocket connection closed"),
            Error::NotConnected => write!(f, "WebSocket is not connected"),
            Error::UnknownChannel(channel) => write!(f, "Unknown stream channel: {}", channel),
            Error::ReconnectFailed {
                attempts,
                last_error,
            } => write!(
                f,
                "Reconnection failed after {} attempts: {}",
                attempts, last_error
            ),
            Error::Ledger(msg) => write!(f, "Ledger error: {}", msg),
            Error::TransactionFailed(msg) => write!(f, "Transaction failed: {}", msg),
            Error::Timeout(msg) => write!(f, "Timed out: {}", msg),
            Error::Base64(e) => write!(f, "Base64 error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Http(e) => Some(e),
            Error::Json(e) => Some(e),
            Error::Decode { source, .. } => Some(source),
            Error::Base64(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Http(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}

impl From<base64::DecodeError> for Error {
    fn from(err: base64::DecodeError) -> Self {
        Error::Base64(err)
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for Error {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        Error::WebSocket(err.to_string())
    }
}
