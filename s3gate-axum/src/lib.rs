//! s3gate-axum: HTTP gateway for objects in S3-compatible storage.
//!
//! Every request path is an object path: `GET /{bucket}/{key...}` streams the
//! object, `HEAD` returns its headers. A `Range` header is passed through to
//! the store and answered with `206 Partial Content`.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use s3gate_axum::{GatewayApp, GatewayConfig};
//! use s3gate_store::{MemoryObject, MemoryStore};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let store = MemoryStore::new().with_object("media", "hello.txt", MemoryObject::new("hi"));
//! let config = GatewayConfig::default().with_addr("127.0.0.1", 8080);
//! let addr = config.addr();
//!
//! GatewayApp::new(Arc::new(store), config).listen(addr).await
//! # }
//! ```

pub mod app;
mod config;
mod error;
pub mod gateway;
pub mod path;
mod relay;
mod state;
pub mod translate;

pub use app::{shutdown_signal, GatewayApp};
pub use config::GatewayConfig;
pub use error::GatewayError;
pub use gateway::RequestContext;
pub use path::ResolvedPath;
pub use relay::BodyRelay;
pub use state::GatewayState;
pub use translate::{translate, Translation, VendorFilter};
