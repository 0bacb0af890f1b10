use std::collections::HashMap;

use crate::ByteStream;

/// An opened object as returned by an [`ObjectStore`](crate::ObjectStore)
pub struct ObjectDescriptor {
    /// Object content. `None` only for metadata-only (head) responses.
    pub body: Option<ByteStream>,
    pub content_type: Option<String>,
    /// Absent or zero means unknown
    pub content_length: Option<u64>,
    /// `bytes <start>-<end>/<total>` when a range was served
    pub content_range: Option<String>,
    pub etag: Option<String>,
    /// Provider custom metadata (`x-amz-meta-*` without the prefix)
    pub metadata: HashMap<String, String>,
    /// Status the store believes is appropriate
    pub status_code: u16,
}

impl Default for ObjectDescriptor {
    fn default() -> Self {
        Self {
            body: None,
            content_type: None,
            content_length: None,
            content_range: None,
            etag: None,
            metadata: HashMap::new(),
            status_code: 200,
        }
    }
}

impl ObjectDescriptor {
    /// Create a descriptor around an opened body
    pub fn new(body: ByteStream) -> Self {
        Self {
            body: Some(body),
            ..Self::default()
        }
    }

    /// Create a metadata-only descriptor
    pub fn head() -> Self {
        Self::default()
    }

    pub fn with_content_type<S: Into<String>>(mut self, content_type: S) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_content_length(mut self, length: u64) -> Self {
        self.content_length = Some(length);
        self
    }

    pub fn with_content_range<S: Into<String>>(mut self, range: S) -> Self {
        self.content_range = Some(range.into());
        self
    }

    pub fn with_etag<S: Into<String>>(mut self, etag: S) -> Self {
        self.etag = Some(etag.into());
        self
    }

    pub fn with_metadata<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn with_status(mut self, status_code: u16) -> Self {
        self.status_code = status_code;
        self
    }

    /// Check if this is a partial content response
    pub fn is_partial(&self) -> bool {
        self.content_range.as_deref().is_some_and(|r| !r.is_empty())
    }

    /// Take ownership of the body, leaving `None` behind
    pub fn take_body(&mut self) -> Option<ByteStream> {
        self.body.take()
    }
}

impl std::fmt::Debug for ObjectDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectDescriptor")
            .field("body", &self.body.as_ref().map(|_| "<stream>"))
            .field("content_type", &self.content_type)
            .field("content_length", &self.content_length)
            .field("content_range", &self.content_range)
            .field("etag", &self.etag)
            .field("metadata", &self.metadata)
            .field("status_code", &self.status_code)
            .finish()
    }
}
