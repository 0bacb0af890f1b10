use thiserror::Error;

/// Result type for object store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while fetching an object
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("invalid bucket")]
    InvalidBucket,

    #[error("invalid path: {key}")]
    InvalidPath { key: String },

    #[error("invalid range: {range}")]
    InvalidRange { range: String },

    #[error("object not found: {bucket}/{key}")]
    NotFound { bucket: String, key: String },

    #[error("upstream fetch failed: {message}")]
    Upstream {
        message: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("upstream responded with status {status}")]
    UpstreamStatus { status: u16 },

    #[error("configuration error: {message}")]
    Config { message: String },

}

impl StoreError {
    /// Create an upstream error from any error type
    pub fn upstream<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Upstream {
            message: error.to_string(),
            source: Box::new(error),
        }
    }

    /// Create an upstream error with an explicit description
    pub fn upstream_with_message<S, E>(message: S, error: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Upstream {
            message: message.into(),
            source: Box::new(error),
        }
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid path error
    pub fn invalid_path<S: Into<String>>(key: S) -> Self {
        Self::InvalidPath { key: key.into() }
    }

    /// Create an invalid range error
    pub fn invalid_range<S: Into<String>>(range: S) -> Self {
        Self::InvalidRange {
            range: range.into(),
        }
    }

    /// Create a not found error
    pub fn not_found<B: Into<String>, K: Into<String>>(bucket: B, key: K) -> Self {
        Self::NotFound {
            bucket: bucket.into(),
            key: key.into(),
        }
    }
}
