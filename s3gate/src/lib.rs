use std::sync::Arc;

use s3gate_axum::{GatewayApp, GatewayConfig};
use s3gate_store::{FetchStrategy, ObjectStore, PresignedStore, S3Store, StoreConfig};

/// Pick the store implementation named by `config.strategy`
pub async fn build_store(config: &StoreConfig) -> Arc<dyn ObjectStore> {
    let s3 = S3Store::connect(config).await;

    match config.strategy {
        FetchStrategy::Direct => Arc::new(s3),
        FetchStrategy::Presigned => Arc::new(PresignedStore::new(s3, config.presign_expires)),
    }
}

/// Build the gateway from the process environment
pub async fn build() -> anyhow::Result<GatewayApp> {
    let store_config = StoreConfig::from_env()?;
    let gateway_config = GatewayConfig::from_env()?;
    build_with(&store_config, gateway_config).await
}

pub async fn build_with(store_config: &StoreConfig, gateway_config: GatewayConfig) -> anyhow::Result<GatewayApp> {
    let store = build_store(store_config).await;
    let capabilities = store.capabilities();

    tracing::info!(
        endpoint = %store_config.endpoint_url,
        region = %store_config.region,
        path_style = store_config.force_path_style,
        strategy = capabilities.strategy,
        range = capabilities.supports_range,
        signed_urls = capabilities.supports_signed_urls,
        prefix = gateway_config.prefix.as_deref().unwrap_or(""),
        "object store configured"
    );

    Ok(GatewayApp::new(store, gateway_config))
}
