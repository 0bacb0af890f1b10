use async_trait::async_trait;
use std::time::Duration;

use crate::{FetchRequest, ObjectDescriptor, StoreResult};

/// Core read operations - must be implemented by all storage backends
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Open an object as a stream, passing the range header upstream if present
    async fn fetch(&self, request: FetchRequest) -> StoreResult<ObjectDescriptor>;

    /// Get object metadata without content
    async fn head(&self, request: FetchRequest) -> StoreResult<ObjectDescriptor>;

    /// Get store capabilities
    fn capabilities(&self) -> StoreCapabilities;
}

/// Presigned URL generation, used by the presign-and-fetch strategy
#[async_trait]
pub trait UrlSigner: Send + Sync {
    /// Sign a GET for the requested object (range included when present)
    async fn sign_get(&self, request: &FetchRequest, expires_in: Duration) -> StoreResult<SignedRequest>;

    /// Sign a HEAD for the requested object
    async fn sign_head(&self, request: &FetchRequest, expires_in: Duration) -> StoreResult<SignedRequest>;
}

/// A signed request: the URL plus headers covered by the signature
#[derive(Debug, Clone)]
pub struct SignedRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
}

impl SignedRequest {
    pub fn new<S: Into<String>>(url: S) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
        }
    }

    pub fn with_header<K: Into<String>, V: Into<String>>(mut self, name: K, value: V) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Store capabilities
#[derive(Debug, Clone, Default)]
pub struct StoreCapabilities {
    pub strategy: &'static str,
    /// Honors `Range` headers
    pub supports_range: bool,
    pub supports_signed_urls: bool,
}

impl StoreCapabilities {
    pub fn basic(strategy: &'static str) -> Self {
        Self {
            strategy,
            supports_range: false,
            supports_signed_urls: false,
        }
    }

    pub fn with_range(mut self) -> Self {
        self.supports_range = true;
        self
    }

    pub fn with_signed_urls(mut self) -> Self {
        self.supports_signed_urls = true;
        self
    }
}
