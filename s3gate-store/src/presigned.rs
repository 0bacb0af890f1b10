use async_trait::async_trait;
use futures::TryStreamExt;
use http::header::{self, HeaderMap, HeaderName, HeaderValue};
use std::collections::HashMap;
use std::time::Duration;

use crate::{
    FetchRequest, ObjectDescriptor, ObjectStore, SignedRequest, StoreCapabilities, StoreError, StoreResult,
    UrlSigner,
};

const META_PREFIX: &str = "x-amz-meta-";

/// Inbound headers that are never forwarded to a signed URL.
///
/// Conditional headers would let the upstream answer 304, which has no body.
/// Hop-by-hop headers, `host` and `authorization` belong to the inbound
/// connection; the signed URL carries its own credentials.
const DROPPED_HEADERS: [&str; 12] = [
    "if-modified-since",
    "if-none-match",
    "host",
    "authorization",
    "connection",
    "keep-alive",
    "proxy-connection",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
    "content-length",
];

/// Presign-then-fetch: sign a URL for the object and stream it with a plain HTTP client
pub struct PresignedStore<S> {
    signer: S,
    http: reqwest::Client,
    expires_in: Duration,
}

impl<S: UrlSigner> PresignedStore<S> {
    pub fn new(signer: S, expires_in: Duration) -> Self {
        Self {
            signer,
            http: reqwest::Client::new(),
            expires_in,
        }
    }

    /// Build the header set sent to the signed URL
    pub fn outbound_headers(request: &FetchRequest, signed: &SignedRequest) -> HeaderMap {
        let mut headers = HeaderMap::with_capacity(request.headers.len() + signed.headers.len() + 3);

        for (name, value) in &request.headers {
            if DROPPED_HEADERS.contains(&name.as_str()) {
                continue;
            }
            headers.append(name.clone(), value.clone());
        }

        for (name, value) in &signed.headers {
            match (HeaderName::try_from(name.as_str()), HeaderValue::try_from(value.as_str())) {
                (Ok(name), Ok(value)) => {
                    headers.insert(name, value);
                }
                _ => tracing::warn!(header = %name, "skipping unrepresentable signed header"),
            }
        }

        if let Some(range) = request.range.as_deref() {
            if let Ok(value) = HeaderValue::from_str(range) {
                headers.insert(header::RANGE, value);
            }
        }

        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
        headers
    }

    async fn send(&self, method: reqwest::Method, request: &FetchRequest, signed: SignedRequest) -> StoreResult<reqwest::Response> {
        let headers = Self::outbound_headers(request, &signed);

        let response = self
            .http
            .request(method, &signed.url)
            .headers(headers)
            .send()
            .await
            .map_err(StoreError::upstream)?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(
                bucket = %request.bucket,
                key = %request.key,
                status = status.as_u16(),
                "signed url answered with non-success status"
            );
            return Err(StoreError::UpstreamStatus {
                status: status.as_u16(),
            });
        }

        Ok(response)
    }
}

/// Map response headers onto a descriptor without a body
fn describe(status: u16, headers: &HeaderMap) -> ObjectDescriptor {
    let text = |name: HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    let metadata: HashMap<String, String> = headers
        .iter()
        .filter_map(|(name, value)| {
            let key = name.as_str().strip_prefix(META_PREFIX)?;
            let value = value.to_str().ok()?;
            Some((key.to_string(), value.to_string()))
        })
        .collect();

    ObjectDescriptor {
        body: None,
        content_type: text(header::CONTENT_TYPE),
        content_length: text(header::CONTENT_LENGTH)
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|len| *len > 0),
        content_range: text(header::CONTENT_RANGE),
        etag: text(header::ETAG),
        metadata,
        status_code: status,
    }
}

#[async_trait]
impl<S: UrlSigner> ObjectStore for PresignedStore<S> {
    async fn fetch(&self, request: FetchRequest) -> StoreResult<ObjectDescriptor> {
        request.validate()?;

        let signed = self.signer.sign_get(&request, self.expires_in).await?;
        let response = self.send(reqwest::Method::GET, &request, signed).await?;

        let mut descriptor = describe(response.status().as_u16(), response.headers());
        let stream = response.bytes_stream().map_err(std::io::Error::other);
        descriptor.body = Some(Box::pin(stream));

        Ok(descriptor)
    }

    async fn head(&self, request: FetchRequest) -> StoreResult<ObjectDescriptor> {
        request.validate()?;

        let signed = self.signer.sign_head(&request, self.expires_in).await?;
        let response = self.send(reqwest::Method::HEAD, &request, signed).await?;

        Ok(describe(response.status().as_u16(), response.headers()))
    }

    fn capabilities(&self) -> StoreCapabilities {
        StoreCapabilities::basic("presigned").with_range().with_signed_urls()
    }
}
