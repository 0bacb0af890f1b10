use std::str::FromStr;
use std::time::Duration;

use crate::{StoreError, StoreResult};

/// How objects are read from the storage service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchStrategy {
    /// Call the storage API directly with static credentials
    #[default]
    Direct,
    /// Sign a URL, then fetch it with a plain HTTP client
    Presigned,
}

impl FromStr for FetchStrategy {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "direct" => Ok(Self::Direct),
            "presigned" | "presign" => Ok(Self::Presigned),
            other => Err(StoreError::config(format!("unknown fetch strategy: {other}"))),
        }
    }
}

/// Connection settings for an S3-compatible storage service
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub endpoint_url: String,
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,

    /// Address buckets as `endpoint/bucket/key` instead of `bucket.endpoint/key`
    pub force_path_style: bool,

    pub strategy: FetchStrategy,

    /// Lifetime of URLs signed by the presigned strategy
    pub presign_expires: Duration,
}

impl StoreConfig {
    pub const DEFAULT_PRESIGN_EXPIRES_SECS: u64 = 300;

    /// Create a config with default strategy and presign lifetime
    pub fn new<E, R, A, S>(endpoint_url: E, region: R, access_key_id: A, secret_access_key: S) -> Self
    where
        E: Into<String>,
        R: Into<String>,
        A: Into<String>,
        S: Into<String>,
    {
        Self {
            endpoint_url: endpoint_url.into(),
            region: region.into(),
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            force_path_style: false,
            strategy: FetchStrategy::Direct,
            presign_expires: Duration::from_secs(Self::DEFAULT_PRESIGN_EXPIRES_SECS),
        }
    }

    /// Read `ENDPOINT`, `REGION`, `KEY`, `SECRET`, `USE_PATH_STYLE`,
    /// `FETCH_STRATEGY` and `PRESIGN_EXPIRES_SECS` from the process environment
    pub fn from_env() -> StoreResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source
    pub fn from_lookup<F>(lookup: F) -> StoreResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| StoreError::config(format!("{key} environment variable required")))
        };

        let mut config = Self::new(
            required("ENDPOINT")?,
            required("REGION")?,
            required("KEY")?,
            required("SECRET")?,
        );

        config.force_path_style = lookup("USE_PATH_STYLE").is_some_and(|v| v == "true");

        if let Some(strategy) = lookup("FETCH_STRATEGY") {
            config.strategy = strategy.parse()?;
        }

        if let Some(secs) = lookup("PRESIGN_EXPIRES_SECS") {
            let secs: u64 = secs
                .trim()
                .parse()
                .map_err(|_| StoreError::config(format!("PRESIGN_EXPIRES_SECS is not a number: {secs}")))?;
            config.presign_expires = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Enable path-style addressing
    pub fn with_path_style(mut self) -> Self {
        self.force_path_style = true;
        self
    }

    /// Set the fetch strategy
    pub fn with_strategy(mut self, strategy: FetchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set presigned URL lifetime
    pub fn with_presign_expires(mut self, expires: Duration) -> Self {
        self.presign_expires = expires;
        self
    }
}
