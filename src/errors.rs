use std::fmt;

use crate::api_error::RawApiError;

/// Library error types.
#[derive(Debug, Clone)]
pub enum AdsError {
    /// An entity value violates a platform constraint (caller bug, never retried).
    Validation(String),
    /// Too many operations for a single standard mutate call.
    TooManyOperations {
        /// Number of operations passed in.
        count: usize,
        /// Allowed maximum.
        max: usize,
    },
    /// Standard upload without the service owning the operations.
    MissingServiceName,
    /// Conflicting or incomplete date range specification for a report.
    InvalidDateRange(String),
    /// Connection-level failure talking to the API.
    Network(String),
    /// The API asked us to slow down.
    RateLimited(String),
    /// Non-success HTTP status without a structured fault body.
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body, if readable.
        body: String,
    },
    /// Fault returned by the API.
    ///
    /// `detail` is absent when the API did not attach per-operation errors.
    ApiFault {
        /// Fault message.
        message: String,
        /// Per-operation errors, if any.
        detail: Option<Vec<RawApiError>>,
    },
    /// Batch job failed or never reached a terminal state.
    BatchJob(String),
    /// Response could not be decoded.
    Parse(String),
    /// Invalid configuration.
    Config(String),
    /// Error with context chain for better debugging.
    WithContext {
        /// The underlying source of the error.
        source: Box<AdsError>,
        /// Additional context message.
        context: String,
    },
}

impl AdsError {
    /// Whether retrying the failed call may succeed.
    ///
    /// Connection errors, rate limiting and 5xx responses are transient;
    /// everything else is fatal.
    pub fn is_transient(&self) -> bool {
        match self {
            AdsError::Network(_) | AdsError::RateLimited(_) => true,
            AdsError::Http { status, .. } => *status >= 500,
            AdsError::WithContext { source, .. } => source.is_transient(),
            _ => false,
        }
    }

    /// Shorthand used by the entity constructors.
    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        AdsError::Validation(msg.into())
    }
}

impl fmt::Display for AdsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdsError::Validation(msg) => write!(f, "Invalid value: {}", msg),
            AdsError::TooManyOperations { count, max } => write!(
                f,
                "More than {} operations ({}). Please use batch upload.",
                max, count
            ),
            AdsError::MissingServiceName => {
                write!(f, "Please provide the according service of the operations")
            }
            AdsError::InvalidDateRange(msg) => write!(f, "Invalid date range: {}", msg),
            AdsError::Network(msg) => write!(f, "Network error: {}", msg),
            AdsError::RateLimited(msg) => write!(f, "Rate limited: {}", msg),
            AdsError::Http { status, body } => write!(f, "API returned {}: {}", status, body),
            AdsError::ApiFault { message, detail } => match detail {
                Some(errors) => write!(f, "API fault: {} ({} errors)", message, errors.len()),
                None => write!(f, "API fault: {}", message),
            },
            AdsError::BatchJob(msg) => write!(f, "Batch job error: {}", msg),
            AdsError::Parse(msg) => write!(f, "Parse error: {}", msg),
            AdsError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AdsError::WithContext { source, context } => {
                write!(f, "{}: {}", context, source)
            }
        }
    }
}

impl std::error::Error for AdsError {}

impl From<reqwest::Error> for AdsError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() || err.is_request() {
            AdsError::Network(err.to_string())
        } else if err.is_decode() {
            AdsError::Parse(err.to_string())
        } else {
            AdsError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AdsError {
    fn from(err: serde_json::Error) -> Self {
        AdsError::Parse(err.to_string())
    }
}

impl From<csv::Error> for AdsError {
    fn from(err: csv::Error) -> Self {
        AdsError::Parse(format!("invalid report csv: {}", err))
    }
}

/// Extension trait for adding context to errors.
/// Similar to `anyhow::Context` but for our `AdsError` type.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T, AdsError>;

    /// Add context lazily (only evaluated on error).
    fn with_context<F>(self, f: F) -> Result<T, AdsError>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T, AdsError> {
    fn context(self, context: impl Into<String>) -> Result<T, AdsError> {
        self.map_err(|e| AdsError::WithContext {
            source: Box::new(e),
            context: context.into(),
        })
    }

    fn with_context<F>(self, f: F) -> Result<T, AdsError>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AdsError::WithContext {
            source: Box::new(e),
            context: f(),
        })
    }
}
