use axum::body::Body;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, Uri};
use axum::response::Response;
use s3gate_store::FetchRequest;
use tokio_util::sync::CancellationToken;

use crate::path::{self, ResolvedPath};
use crate::translate::{translate, Translation};
use crate::{BodyRelay, GatewayError, GatewayState};

/// Per-request fetch parameters and cancellation signal
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub bucket: String,
    pub key: String,
    pub range_header: Option<String>,
    /// Child of the server shutdown token; cancelled on client disconnect too
    pub cancel: CancellationToken,
}

impl RequestContext {
    pub fn new(resolved: ResolvedPath, headers: &HeaderMap, shutdown: &CancellationToken) -> Self {
        let range_header = headers
            .get(header::RANGE)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(str::to_string);

        Self {
            bucket: resolved.bucket,
            key: resolved.key,
            range_header,
            cancel: shutdown.child_token(),
        }
    }

    pub fn fetch_request(&self, headers: HeaderMap) -> FetchRequest {
        FetchRequest::new(self.bucket.clone(), self.key.clone())
            .with_range_header(self.range_header.as_deref())
            .with_forwarded_headers(headers)
    }
}

/// Serve `GET` and `HEAD` for `/{bucket}/{key...}`
pub async fn serve_object(
    State(state): State<GatewayState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Result<Response, GatewayError> {
    let decoded = path::decode(uri.path());
    let resolved = path::resolve(&decoded, state.config.prefix.as_deref());

    if resolved.is_directory() {
        tracing::debug!(bucket = %resolved.bucket, key = %resolved.key, "refusing directory key");
        return Err(GatewayError::Forbidden { key: resolved.key });
    }

    let ctx = RequestContext::new(resolved, &headers, &state.shutdown);
    let head_only = method == Method::HEAD;

    tracing::debug!(
        bucket = %ctx.bucket,
        key = %ctx.key,
        range = ctx.range_header.as_deref().unwrap_or(""),
        method = %method,
        "fetching object"
    );

    let request = ctx.fetch_request(headers);
    let fetched = if head_only {
        state.store.head(request).await
    } else {
        state.store.fetch(request).await
    };

    let mut descriptor = fetched.map_err(|err| {
        tracing::warn!(bucket = %ctx.bucket, key = %ctx.key, error = %err, "object fetch failed");
        GatewayError::from(err)
    })?;

    let Translation { status, headers } = translate(&descriptor, &state.config.vendor_filter);

    let body = match descriptor.take_body() {
        Some(stream) if !head_only => Body::from_stream(BodyRelay::new(stream, ctx)),
        _ => Body::empty(),
    };

    let mut response = Response::new(body);
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    Ok(response)
}
