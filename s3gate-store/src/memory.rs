use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::{ByteRange, FetchRequest, ObjectDescriptor, ObjectStore, StoreCapabilities, StoreError, StoreResult};

const CHUNK_SIZE: usize = 64 * 1024;

/// An object held by [`MemoryStore`]
#[derive(Debug, Clone, Default)]
pub struct MemoryObject {
    pub data: Bytes,
    pub content_type: Option<String>,
    pub etag: Option<String>,
    pub metadata: HashMap<String, String>,
}

impl MemoryObject {
    pub fn new<D: Into<Bytes>>(data: D) -> Self {
        Self {
            data: data.into(),
            ..Self::default()
        }
    }

    pub fn with_content_type<S: Into<String>>(mut self, content_type: S) -> Self {
        self.content_type = Some(content_type.into());
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
}

/// In-memory object store for tests and local runs
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    objects: Arc<RwLock<HashMap<(String, String), MemoryObject>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<B: Into<String>, K: Into<String>>(&self, bucket: B, key: K, object: MemoryObject) {
        self.objects.write().insert((bucket.into(), key.into()), object);
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn with_object<B: Into<String>, K: Into<String>>(self, bucket: B, key: K, object: MemoryObject) -> Self {
        self.insert(bucket, key, object);
        self
    }

    fn lookup(&self, request: &FetchRequest) -> StoreResult<MemoryObject> {
        self.objects
            .read()
            .get(&(request.bucket.clone(), request.key.clone()))
            .cloned()
            .ok_or_else(|| StoreError::not_found(&request.bucket, &request.key))
    }

    fn describe(object: &MemoryObject, length: u64) -> ObjectDescriptor {
        ObjectDescriptor {
            body: None,
            content_type: object.content_type.clone(),
            content_length: Some(length).filter(|len| *len > 0),
            content_range: None,
            etag: object.etag.clone(),
            metadata: object.metadata.clone(),
            status_code: 200,
        }
    }
}

/// Parse a single-range `Range` header against an object size.
///
/// Supports `bytes=a-b`, `bytes=a-` and `bytes=-n`. Returns inclusive bounds.
pub fn parse_range_header(header: &str, total_size: u64) -> StoreResult<(u64, u64)> {
    let invalid = || StoreError::invalid_range(header);

    let ranges = header.trim().strip_prefix("bytes=").ok_or_else(invalid)?;
    if ranges.contains(',') {
        return Err(invalid());
    }
    let (start, end) = ranges.split_once('-').ok_or_else(invalid)?;
    let (start, end) = (start.trim(), end.trim());

    let range = match (start.is_empty(), end.is_empty()) {
        (true, true) => return Err(invalid()),
        (true, false) => {
            let suffix: u64 = end.parse().map_err(|_| invalid())?;
            if suffix == 0 {
                return Err(invalid());
            }
            ByteRange::from_start(total_size.saturating_sub(suffix))
        }
        (false, true) => ByteRange::from_start(start.parse().map_err(|_| invalid())?),
        (false, false) => ByteRange::new(
            start.parse().map_err(|_| invalid())?,
            Some(end.parse().map_err(|_| invalid())?),
        ),
    };

    range.resolve(total_size).ok_or_else(invalid)
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn fetch(&self, request: FetchRequest) -> StoreResult<ObjectDescriptor> {
        request.validate()?;
        let object = self.lookup(&request)?;
        let total = object.data.len() as u64;

        let (data, content_range) = match request.range.as_deref() {
            Some(range) => {
                let (start, end) = parse_range_header(range, total)?;
                let slice = object.data.slice(start as usize..=end as usize);
                (slice, Some(format!("bytes {start}-{end}/{total}")))
            }
            None => (object.data.clone(), None),
        };

        let chunks: Vec<Result<Bytes, std::io::Error>> = data
            .chunks(CHUNK_SIZE)
            .map(|chunk| Ok(data.slice_ref(chunk)))
            .collect();

        let mut descriptor = Self::describe(&object, data.len() as u64);
        descriptor.body = Some(Box::pin(futures::stream::iter(chunks)));
        if let Some(content_range) = content_range {
            descriptor.content_range = Some(content_range);
            descriptor.status_code = 206;
        }

        Ok(descriptor)
    }

    async fn head(&self, request: FetchRequest) -> StoreResult<ObjectDescriptor> {
        request.validate()?;
        let object = self.lookup(&request)?;
        Ok(Self::describe(&object, object.data.len() as u64))
    }

    fn capabilities(&self) -> StoreCapabilities {
        StoreCapabilities::basic("memory").with_range()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    async fn collect(descriptor: ObjectDescriptor) -> Vec<u8> {
        let mut body = descriptor.body.expect("body");
        let mut out = Vec::new();
        while let Some(chunk) = body.next().await {
            out.extend_from_slice(&chunk.unwrap());
        }
        out
    }

    fn store() -> MemoryStore {
        MemoryStore::new().with_object(
            "media",
            "clips/a.txt",
            MemoryObject::new("0123456789")
                .with_content_type("text/plain")
                .with_etag("\"v1\"")
                .with_metadata("owner", "ops"),
        )
    }

    #[test]
    fn parses_supported_range_forms() {
        assert_eq!(parse_range_header("bytes=0-3", 10).unwrap(), (0, 3));
        assert_eq!(parse_range_header("bytes=7-", 10).unwrap(), (7, 9));
        assert_eq!(parse_range_header("bytes=-4", 10).unwrap(), (6, 9));
        assert_eq!(parse_range_header("bytes=-40", 10).unwrap(), (0, 9));
        assert_eq!(parse_range_header("bytes=5-100", 10).unwrap(), (5, 9));
    }

    #[test]
    fn rejects_malformed_or_unsatisfiable_ranges() {
        for header in ["bytes=10-", "bytes=4-2", "bytes=-", "bytes=-0", "items=0-1", "bytes=0-1,3-4", "bytes=a-b"] {
            assert!(
                matches!(parse_range_header(header, 10), Err(StoreError::InvalidRange { .. })),
                "{header} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn fetches_whole_object() {
        let descriptor = store().fetch(FetchRequest::new("media", "clips/a.txt")).await.unwrap();

        assert_eq!(descriptor.status_code, 200);
        assert_eq!(descriptor.content_length, Some(10));
        assert_eq!(descriptor.content_type.as_deref(), Some("text/plain"));
        assert!(descriptor.content_range.is_none());
        assert_eq!(collect(descriptor).await, b"0123456789");
    }

    #[tokio::test]
    async fn fetches_ranges_as_partial_content() {
        let request = FetchRequest::new("media", "clips/a.txt").with_range(ByteRange::new(2, Some(5)));
        let descriptor = store().fetch(request).await.unwrap();

        assert_eq!(descriptor.status_code, 206);
        assert_eq!(descriptor.content_length, Some(4));
        assert_eq!(descriptor.content_range.as_deref(), Some("bytes 2-5/10"));
        assert_eq!(collect(descriptor).await, b"2345");
    }

    #[tokio::test]
    async fn large_objects_stream_in_chunks() {
        let data = vec![7u8; CHUNK_SIZE * 2 + 1];
        let store = MemoryStore::new().with_object("b", "big.bin", MemoryObject::new(data));

        let descriptor = store.fetch(FetchRequest::new("b", "big.bin")).await.unwrap();
        let chunks: Vec<_> = descriptor.body.unwrap().collect().await;

        assert_eq!(chunks.len(), 3);
    }

    #[test]
    fn advertises_range_support_only() {
        let capabilities = store().capabilities();

        assert_eq!(capabilities.strategy, "memory");
        assert!(capabilities.supports_range);
        assert!(!capabilities.supports_signed_urls);
    }

    #[tokio::test]
    async fn head_has_no_body() {
        let descriptor = store().head(FetchRequest::new("media", "clips/a.txt")).await.unwrap();

        assert!(descriptor.body.is_none());
        assert_eq!(descriptor.etag.as_deref(), Some("\"v1\""));
        assert_eq!(descriptor.metadata["owner"], "ops");
    }

    #[tokio::test]
    async fn missing_objects_and_invalid_requests_fail() {
        let store = store();

        let err = store.fetch(FetchRequest::new("media", "nope")).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));

        let err = store.fetch(FetchRequest::new("", "key")).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidBucket));

        let err = store.fetch(FetchRequest::new("media", "clips/")).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidPath { .. }));
    }
}
