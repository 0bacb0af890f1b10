use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::presigning::{PresignedRequest, PresigningConfig};
use aws_sdk_s3::Client;
use futures::TryStreamExt;
use std::time::Duration;
use tokio_util::io::ReaderStream;

use crate::{
    FetchRequest, ObjectDescriptor, ObjectStore, SignedRequest, StoreCapabilities, StoreConfig, StoreError,
    StoreResult, UrlSigner,
};

/// Direct credentialed access to an S3-compatible service
#[derive(Clone)]
pub struct S3Store {
    client: Client,
}

impl S3Store {
    /// Build a client from configuration. No network I/O happens here.
    pub async fn connect(config: &StoreConfig) -> Self {
        let client = Self::create_client(config).await;
        Self { client }
    }

    /// Wrap an existing SDK client
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    async fn create_client(config: &StoreConfig) -> Client {
        let credentials = Credentials::new(
            config.access_key_id.clone(),
            config.secret_access_key.clone(),
            None,
            None,
            "s3gate",
        );

        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .endpoint_url(config.endpoint_url.clone())
            .load()
            .await;

        Client::from_conf(
            aws_sdk_s3::config::Builder::from(&sdk_config)
                .force_path_style(config.force_path_style)
                .build(),
        )
    }

    fn map_sdk_error<E>(err: E) -> StoreError
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        StoreError::upstream_with_message(DisplayErrorContext(&err).to_string(), err)
    }

    fn presigning_config(expires_in: Duration) -> StoreResult<PresigningConfig> {
        PresigningConfig::expires_in(expires_in).map_err(StoreError::upstream)
    }

    fn signed(request: PresignedRequest) -> SignedRequest {
        request
            .headers()
            .fold(SignedRequest::new(request.uri()), |signed, (name, value)| {
                signed.with_header(name, value)
            })
    }

    /// Empty strings from the SDK mean "absent"
    fn non_empty(value: Option<String>) -> Option<String> {
        value.filter(|v| !v.is_empty())
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn fetch(&self, request: FetchRequest) -> StoreResult<ObjectDescriptor> {
        request.validate()?;

        let output = self
            .client
            .get_object()
            .bucket(&request.bucket)
            .key(&request.key)
            .set_range(request.range.clone())
            .send()
            .await
            .map_err(Self::map_sdk_error)?;

        let stream = ReaderStream::new(output.body.into_async_read()).map_err(|err| {
            tracing::debug!(error = %err, "object body read failed");
            err
        });

        Ok(ObjectDescriptor {
            body: Some(Box::pin(stream)),
            content_type: Self::non_empty(output.content_type),
            content_length: output.content_length.filter(|len| *len > 0).map(|len| len as u64),
            content_range: Self::non_empty(output.content_range),
            etag: Self::non_empty(output.e_tag),
            metadata: output.metadata.unwrap_or_default(),
            status_code: if request.has_range() { 206 } else { 200 },
        })
    }

    async fn head(&self, request: FetchRequest) -> StoreResult<ObjectDescriptor> {
        request.validate()?;

        let output = self
            .client
            .head_object()
            .bucket(&request.bucket)
            .key(&request.key)
            .send()
            .await
            .map_err(Self::map_sdk_error)?;

        Ok(ObjectDescriptor {
            body: None,
            content_type: Self::non_empty(output.content_type),
            content_length: output.content_length.filter(|len| *len > 0).map(|len| len as u64),
            content_range: None,
            etag: Self::non_empty(output.e_tag),
            metadata: output.metadata.unwrap_or_default(),
            status_code: 200,
        })
    }

    fn capabilities(&self) -> StoreCapabilities {
        StoreCapabilities::basic("direct").with_range().with_signed_urls()
    }
}

#[async_trait]
impl UrlSigner for S3Store {
    async fn sign_get(&self, request: &FetchRequest, expires_in: Duration) -> StoreResult<SignedRequest> {
        request.validate()?;

        let presigned = self
            .client
            .get_object()
            .bucket(&request.bucket)
            .key(&request.key)
            .set_range(request.range.clone())
            .presigned(Self::presigning_config(expires_in)?)
            .await
            .map_err(Self::map_sdk_error)?;

        Ok(Self::signed(presigned))
    }

    async fn sign_head(&self, request: &FetchRequest, expires_in: Duration) -> StoreResult<SignedRequest> {
        request.validate()?;

        let presigned = self
            .client
            .head_object()
            .bucket(&request.bucket)
            .key(&request.key)
            .presigned(Self::presigning_config(expires_in)?)
            .await
            .map_err(Self::map_sdk_error)?;

        Ok(Self::signed(presigned))
    }
}
