use std::net::SocketAddr;
use std::str::FromStr;

use crate::{GatewayError, VendorFilter};

/// HTTP-side settings for the gateway
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Injected in front of every request path before the bucket is parsed
    pub prefix: Option<String>,
    pub vendor_filter: VendorFilter,
    pub host: String,
    pub port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            prefix: None,
            vendor_filter: VendorFilter::default(),
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl GatewayConfig {
    /// Read `PREFIX_PATH`, `VENDOR_FILTER`, `HTTP_HOST` and `HTTP_PORT`
    pub fn from_env() -> Result<Self, GatewayError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, GatewayError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Ok(Self {
            prefix: prefix_from(lookup("PREFIX_PATH")),
            vendor_filter: lookup("VENDOR_FILTER")
                .map(|list| VendorFilter::parse(&list))
                .unwrap_or(defaults.vendor_filter),
            host: lookup("HTTP_HOST").filter(|h| !h.is_empty()).unwrap_or(defaults.host),
            port: var_or(&lookup, "HTTP_PORT", defaults.port)?,
        })
    }

    pub fn with_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn with_vendor_filter(mut self, filter: VendorFilter) -> Self {
        self.vendor_filter = filter;
        self
    }

    pub fn with_addr<S: Into<String>>(mut self, host: S, port: u16) -> Self {
        self.host = host.into();
        self.port = port;
        self
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Parsed listen address, when `host` is an IP literal
    pub fn socket_addr(&self) -> Option<SocketAddr> {
        self.addr().parse().ok()
    }
}

/// A prefix made only of slashes would inject an empty bucket, so it is ignored
fn prefix_from(value: Option<String>) -> Option<String> {
    let value = value.filter(|p| !p.is_empty())?;
    if value.trim_matches('/').is_empty() {
        tracing::warn!(prefix = %value, "ignoring PREFIX_PATH without a bucket segment");
        return None;
    }
    Some(value)
}

fn var_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, GatewayError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key).filter(|v| !v.trim().is_empty()) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| GatewayError::config(format!("{key} has an invalid value: {value}"))),
        None => Ok(default),
    }
}
