//! # s3gate-store: read-only object store clients
//!
//! `s3gate-store` opens single objects in S3-compatible storage and hands them
//! back as an [`ObjectDescriptor`]: response metadata plus a body stream that is
//! never buffered in memory.
//!
//! ## Strategies
//!
//! - [`S3Store`]: direct credentialed `GetObject` through the AWS SDK
//! - [`PresignedStore`]: sign a URL, then fetch it with a plain HTTP client,
//!   suppressing conditional headers so the upstream never answers 304
//! - [`MemoryStore`]: objects held in memory, for tests and local runs
//!
//! All of them implement [`ObjectStore`], so callers depend on the trait only:
//!
//! ```rust
//! use s3gate_store::prelude::*;
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> StoreResult<()> {
//! let store: Arc<dyn ObjectStore> = Arc::new(
//!     MemoryStore::new().with_object("media", "hello.txt", MemoryObject::new("Hello, world!")),
//! );
//!
//! let request = FetchRequest::new("media", "hello.txt").with_range_header(Some("bytes=0-4"));
//! let opened = store.fetch(request).await?;
//!
//! assert_eq!(opened.status_code, 206);
//! assert_eq!(opened.content_range.as_deref(), Some("bytes 0-4/13"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │     Gateway     │  ← HTTP translation and streaming
//! ├─────────────────┤
//! │   ObjectStore   │  ← fetch / head
//! ├─────────────────┤
//! │  SDK / reqwest  │  ← storage service
//! └─────────────────┘
//! ```

mod config;
mod descriptor;
mod error;
pub mod memory;
mod presigned;
mod s3;
pub mod store;
mod types;

pub use config::{FetchStrategy, StoreConfig};
pub use descriptor::ObjectDescriptor;
pub use error::{StoreError, StoreResult};
pub use memory::{MemoryObject, MemoryStore};
pub use presigned::PresignedStore;
pub use s3::S3Store;
pub use store::{ObjectStore, SignedRequest, StoreCapabilities, UrlSigner};
pub use types::{ByteRange, ByteStream, FetchRequest};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        ByteStream, FetchRequest, MemoryObject, MemoryStore, ObjectDescriptor, ObjectStore, StoreError,
        StoreResult,
    };
}
