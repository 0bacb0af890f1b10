use bytes::Bytes;
use futures_core::Stream;
use http::HeaderMap;
use std::pin::Pin;

use crate::{StoreError, StoreResult};

/// Stream of bytes for object content
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;

/// Byte range for partial content requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: Option<u64>, // None means "to end of object"
}

impl ByteRange {
    pub fn new(start: u64, end: Option<u64>) -> Self {
        Self { start, end }
    }

    pub fn from_start(start: u64) -> Self {
        Self { start, end: None }
    }

    /// Render as an HTTP `Range` header value
    pub fn to_header(&self) -> String {
        match self.end {
            Some(end) => format!("bytes={}-{}", self.start, end),
            None => format!("bytes={}-", self.start),
        }
    }

    /// Clamp against an object size, returning inclusive bounds
    pub fn resolve(&self, total_size: u64) -> Option<(u64, u64)> {
        if total_size == 0 || self.start >= total_size {
            return None;
        }
        let end = self.end.unwrap_or(total_size - 1).min(total_size - 1);
        if end < self.start {
            return None;
        }
        Some((self.start, end))
    }
}

/// A single-object read request
#[derive(Debug, Clone, Default)]
pub struct FetchRequest {
    pub bucket: String,
    pub key: String,
    /// Raw `Range` header, passed upstream verbatim
    pub range: Option<String>,
    /// Inbound headers, for strategies that forward them
    pub headers: HeaderMap,
}

impl FetchRequest {
    pub fn new<B: Into<String>, K: Into<String>>(bucket: B, key: K) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
            range: None,
            headers: HeaderMap::new(),
        }
    }

    /// Use a raw range header. Empty values mean "no range".
    pub fn with_range_header(mut self, range: Option<&str>) -> Self {
        self.range = range.filter(|r| !r.is_empty()).map(str::to_string);
        self
    }

    pub fn with_range(mut self, range: ByteRange) -> Self {
        self.range = Some(range.to_header());
        self
    }

    pub fn with_forwarded_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Reject requests that can never name an object
    pub fn validate(&self) -> StoreResult<()> {
        if self.bucket.is_empty() {
            return Err(StoreError::InvalidBucket);
        }
        if self.key.ends_with('/') {
            return Err(StoreError::invalid_path(self.key.clone()));
        }
        Ok(())
    }

    pub fn has_range(&self) -> bool {
        self.range.is_some()
    }
}
