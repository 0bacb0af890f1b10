use axum::http::header::{self, HeaderMap, HeaderName, HeaderValue};
use axum::http::StatusCode;
use s3gate_store::ObjectDescriptor;

const META_PREFIX: &str = "x-amz-meta-";

/// Case-insensitive prefix filter for provider-internal metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorFilter {
    tokens: Vec<String>,
}

impl Default for VendorFilter {
    fn default() -> Self {
        Self::new(["wasabi"])
    }
}

impl VendorFilter {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            tokens: tokens
                .into_iter()
                .map(|t| t.as_ref().trim().to_ascii_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }

    /// Filter that lets every entry through
    pub fn none() -> Self {
        Self { tokens: Vec::new() }
    }

    /// Parse a comma-separated token list
    pub fn parse(list: &str) -> Self {
        Self::new(list.split(','))
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// True when the key or value starts with any token
    pub fn is_vendor(&self, key: &str, value: &str) -> bool {
        let key = key.to_ascii_lowercase();
        let value = value.to_ascii_lowercase();
        self.tokens
            .iter()
            .any(|token| key.starts_with(token.as_str()) || value.starts_with(token.as_str()))
    }
}

/// Status line and headers derived from an opened object
#[derive(Debug, Clone)]
pub struct Translation {
    pub status: StatusCode,
    pub headers: HeaderMap,
}

/// Map a descriptor onto the client response status and headers.
///
/// Headers are written in order `Content-Type`, `Content-Length`, `ETag`,
/// `Content-Range`, then metadata. A non-empty content range always yields 206.
pub fn translate(descriptor: &ObjectDescriptor, filter: &VendorFilter) -> Translation {
    let mut headers = HeaderMap::with_capacity(4 + descriptor.metadata.len());

    let mut put = |name: HeaderName, value: Option<&str>| {
        let Some(value) = value.filter(|v| !v.is_empty()) else {
            return;
        };
        match HeaderValue::from_str(value) {
            Ok(value) => {
                headers.insert(name, value);
            }
            Err(_) => tracing::debug!(header = %name, "skipping unrepresentable header value"),
        }
    };

    put(header::CONTENT_TYPE, descriptor.content_type.as_deref());
    put(
        header::CONTENT_LENGTH,
        descriptor
            .content_length
            .filter(|len| *len > 0)
            .map(|len| len.to_string())
            .as_deref(),
    );
    put(header::ETAG, descriptor.etag.as_deref());
    put(header::CONTENT_RANGE, descriptor.content_range.as_deref());

    let mut metadata: Vec<_> = descriptor.metadata.iter().collect();
    metadata.sort();

    for (key, value) in metadata {
        if filter.is_vendor(key, value) {
            continue;
        }
        let name = HeaderName::try_from(format!("{META_PREFIX}{key}"));
        let value = HeaderValue::from_str(value);
        match (name, value) {
            (Ok(name), Ok(value)) => {
                headers.append(name, value);
            }
            _ => tracing::debug!(key = %key, "skipping metadata that is not a valid header"),
        }
    }

    let mut status = StatusCode::from_u16(descriptor.status_code).unwrap_or(StatusCode::OK);
    if descriptor.is_partial() {
        status = StatusCode::PARTIAL_CONTENT;
    }

    Translation { status, headers }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn range_descriptor_is_partial_content() {
        let descriptor = ObjectDescriptor::head()
            .with_content_type("image/jpeg")
            .with_content_length(1024)
            .with_content_range("bytes 0-1023/2048")
            .with_status(206);

        let translation = translate(&descriptor, &VendorFilter::default());

        assert_eq!(translation.status, StatusCode::PARTIAL_CONTENT);
        assert_eq!(translation.headers[header::CONTENT_TYPE], "image/jpeg");
        assert_eq!(translation.headers[header::CONTENT_LENGTH], "1024");
        assert_eq!(translation.headers[header::CONTENT_RANGE], "bytes 0-1023/2048");
        assert!(translation.headers.get(header::ETAG).is_none());
    }

    #[test]
    fn emits_headers_in_order() {
        let descriptor = ObjectDescriptor::head()
            .with_content_type("text/plain")
            .with_content_length(3)
            .with_etag("\"abc\"")
            .with_content_range("bytes 0-2/3")
            .with_metadata("owner", "ops");

        let names: Vec<_> = translate(&descriptor, &VendorFilter::default())
            .headers
            .keys()
            .map(|n| n.as_str().to_string())
            .collect();

        assert_eq!(names, ["content-type", "content-length", "etag", "content-range", "x-amz-meta-owner"]);
    }

    #[test]
    fn wasabi_metadata_is_hidden() {
        let descriptor = ObjectDescriptor::head()
            .with_metadata("wasabi-class", "standard")
            .with_metadata("user-id", "42");

        let translation = translate(&descriptor, &VendorFilter::default());

        assert_eq!(translation.headers["x-amz-meta-user-id"], "42");
        assert!(translation.headers.get("x-amz-meta-wasabi-class").is_none());
        assert_eq!(translation.headers.len(), 1);
    }

    #[test]
    fn vendor_match_covers_values_and_case() {
        let filter = VendorFilter::default();

        assert!(filter.is_vendor("Wasabi-Tier", "x"));
        assert!(filter.is_vendor("tier", "WASABI-hot"));
        assert!(!filter.is_vendor("tier", "hot-wasabi"));
        assert!(!VendorFilter::none().is_vendor("wasabi", "wasabi"));
    }

    #[test]
    fn parses_token_lists() {
        let filter = VendorFilter::parse("Wasabi, minio ,,");
        assert_eq!(filter.tokens(), ["wasabi", "minio"]);
        assert!(filter.is_vendor("minio-release", "x"));
    }

    #[test]
    fn invalid_metadata_is_skipped() {
        let descriptor = ObjectDescriptor::head()
            .with_metadata("bad key", "v")
            .with_metadata("note", "line\nbreak")
            .with_metadata("ok", "yes");

        let translation = translate(&descriptor, &VendorFilter::none());

        assert_eq!(translation.headers.len(), 1);
        assert_eq!(translation.headers["x-amz-meta-ok"], "yes");
    }

    #[test]
    fn empty_and_zero_values_are_omitted() {
        let descriptor = ObjectDescriptor::head()
            .with_content_type("")
            .with_content_length(0)
            .with_content_range("");

        let translation = translate(&descriptor, &VendorFilter::default());

        assert_eq!(translation.status, StatusCode::OK);
        assert!(translation.headers.is_empty());
    }

    #[test]
    fn invalid_status_falls_back_to_ok() {
        let descriptor = ObjectDescriptor::head().with_status(42);
        assert_eq!(translate(&descriptor, &VendorFilter::default()).status, StatusCode::OK);

        let descriptor = ObjectDescriptor::head().with_status(203);
        assert_eq!(translate(&descriptor, &VendorFilter::default()).status.as_u16(), 203);
    }

    proptest! {
        #[test]
        fn content_range_forces_partial(status in 0u16..1000, range in "bytes [0-9]{1,6}-[0-9]{1,6}/[0-9]{1,7}") {
            let descriptor = ObjectDescriptor::head().with_status(status).with_content_range(range);
            prop_assert_eq!(translate(&descriptor, &VendorFilter::default()).status, StatusCode::PARTIAL_CONTENT);
        }

        #[test]
        fn non_vendor_metadata_always_emitted(key in "[a-v][a-z0-9-]{0,15}", value in "[a-v0-9][a-z0-9 ]{0,15}") {
            let descriptor = ObjectDescriptor::head().with_metadata(key.clone(), value.clone());
            let translation = translate(&descriptor, &VendorFilter::default());
            let name = format!("x-amz-meta-{key}");
            prop_assert_eq!(translation.headers.get(name.as_str()).and_then(|v| v.to_str().ok()), Some(value.as_str()));
        }

        #[test]
        fn vendor_metadata_never_emitted(suffix in "[a-z0-9-]{0,15}", value in "[a-z0-9]{0,15}") {
            let descriptor = ObjectDescriptor::head().with_metadata(format!("wasabi{suffix}"), value);
            let translation = translate(&descriptor, &VendorFilter::default());
            prop_assert!(translation.headers.is_empty());
        }
    }
}
