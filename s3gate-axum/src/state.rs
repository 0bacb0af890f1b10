use std::sync::Arc;

use s3gate_store::ObjectStore;
use tokio_util::sync::CancellationToken;

use crate::GatewayConfig;

/// Shared router state: the store, immutable config, and the shutdown token
#[derive(Clone)]
pub struct GatewayState {
    pub store: Arc<dyn ObjectStore>,
    pub config: Arc<GatewayConfig>,
    pub shutdown: CancellationToken,
}

impl GatewayState {
    pub fn new(store: Arc<dyn ObjectStore>, config: GatewayConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
            shutdown: CancellationToken::new(),
        }
    }
}
