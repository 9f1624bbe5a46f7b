//! Proxy descriptors as published by a proxy-list source.

use serde::Deserialize;
use std::fmt;

/// Type code of a plain HTTP proxy. Every other code (SOCKS4, SOCKS5, ...)
/// is treated as unusable.
pub const HTTP_PROXY_TYPE: i64 = 0;

/// A single proxy server entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct ProxyDescriptor {
    /// Host name or IP address of the proxy.
    pub host: String,
    /// TCP port the proxy listens on. Kept as published; entries outside
    /// the TCP port range are never selected.
    pub port: i64,
    /// Proxy type code, `0` for HTTP.
    #[serde(rename = "type")]
    pub kind: i64,
}

impl ProxyDescriptor {
    /// Create a new descriptor.
    pub fn new(host: impl Into<String>, port: u16, kind: i64) -> Self {
        Self {
            host: host.into(),
            port: i64::from(port),
            kind,
        }
    }

    /// Create a descriptor for an HTTP proxy.
    pub fn http(host: impl Into<String>, port: u16) -> Self {
        Self::new(host, port, HTTP_PROXY_TYPE)
    }

    /// Whether the entry advertises itself as an HTTP proxy.
    pub fn is_http(&self) -> bool {
        self.kind == HTTP_PROXY_TYPE
    }

    /// Whether requests can be forwarded through this proxy: an HTTP proxy
    /// on a valid TCP port.
    pub fn is_usable(&self) -> bool {
        self.is_http() && (1..=i64::from(u16::MAX)).contains(&self.port)
    }

    /// The proxy URL, e.g. `http://10.0.0.1:8080`.
    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    /// Convert into a `reqwest::Proxy` that intercepts `http://` targets only.
    pub fn to_reqwest_proxy(&self) -> Result<reqwest::Proxy, reqwest::Error> {
        reqwest::Proxy::http(self.url())
    }
}

impl fmt::Display for ProxyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}
