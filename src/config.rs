//! Configuration for the proxy client.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Proxy list fetched when no source URL is configured.
pub const DEFAULT_PROXY_SOURCE_URL: &str = "http://free-proxy-list.appspot.com/proxy.json";
/// Idle connections kept per host when none is configured.
pub const DEFAULT_MAX_IDLE_PER_HOST: usize = 1024;
/// Overall request timeout when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Delay between two scheduled refreshes of the pool.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(60 * 60);
/// Random draws made per request before giving up on the pool.
pub const DEFAULT_SELECTION_ATTEMPTS: usize = 30;

/// Called with every outgoing request before it is sent.
pub type RequestHook = Arc<dyn Fn(&reqwest::Request) + Send + Sync>;
/// Called with every response before its body is read.
pub type ResponseHook = Arc<dyn Fn(&reqwest::Response) + Send + Sync>;

/// Configuration for the proxy client.
#[derive(Clone)]
pub struct ClientConfig {
    /// URL of the JSON proxy list.
    pub proxy_source_url: String,
    /// Maximum idle connections kept per host.
    pub max_idle_per_host: usize,
    /// Timeout for establishing connections, TLS handshake included.
    /// `None` leaves connection setup bounded by `timeout` only.
    pub tls_handshake_timeout: Option<Duration>,
    /// Overall timeout of a request, body included.
    pub timeout: Duration,
    /// Interval between two scheduled refreshes.
    pub refresh_interval: Duration,
    /// Random draws made per request to find an HTTP proxy.
    pub selection_attempts: usize,
    /// Observes outgoing requests.
    pub on_request: Option<RequestHook>,
    /// Observes incoming responses.
    pub on_response: Option<ResponseHook>,
}

impl ClientConfig {
    /// Create a new configuration builder.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfigBuilder::new().build()
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("proxy_source_url", &self.proxy_source_url)
            .field("max_idle_per_host", &self.max_idle_per_host)
            .field("tls_handshake_timeout", &self.tls_handshake_timeout)
            .field("timeout", &self.timeout)
            .field("refresh_interval", &self.refresh_interval)
            .field("selection_attempts", &self.selection_attempts)
            .field("on_request", &self.on_request.is_some())
            .field("on_response", &self.on_response.is_some())
            .finish()
    }
}

/// Builder for `ClientConfig`.
///
/// Unset, zero or empty values fall back to the defaults when `build` is
/// called.
#[derive(Default)]
pub struct ClientConfigBuilder {
    proxy_source_url: Option<String>,
    max_idle_per_host: Option<usize>,
    tls_handshake_timeout: Option<Duration>,
    timeout: Option<Duration>,
    refresh_interval: Option<Duration>,
    selection_attempts: Option<usize>,
    on_request: Option<RequestHook>,
    on_response: Option<ResponseHook>,
}

impl ClientConfigBuilder {
    /// Create a new builder with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the URL the proxy list is fetched from.
    pub fn proxy_source_url(mut self, url: impl Into<String>) -> Self {
        self.proxy_source_url = Some(url.into());
        self
    }

    /// Set the maximum number of idle connections kept per host.
    pub fn max_idle_per_host(mut self, max: usize) -> Self {
        self.max_idle_per_host = Some(max);
        self
    }

    /// Set the connection and TLS handshake timeout.
    pub fn tls_handshake_timeout(mut self, timeout: Duration) -> Self {
        self.tls_handshake_timeout = Some(timeout);
        self
    }

    /// Set the overall request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the interval between scheduled refreshes.
    pub fn refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = Some(interval);
        self
    }

    /// Set the number of random draws made per request.
    pub fn selection_attempts(mut self, attempts: usize) -> Self {
        self.selection_attempts = Some(attempts);
        self
    }

    /// Observe every outgoing request.
    pub fn on_request<F>(mut self, hook: F) -> Self
    where
        F: Fn(&reqwest::Request) + Send + Sync + 'static,
    {
        self.on_request = Some(Arc::new(hook));
        self
    }

    /// Observe every response.
    pub fn on_response<F>(mut self, hook: F) -> Self
    where
        F: Fn(&reqwest::Response) + Send + Sync + 'static,
    {
        self.on_response = Some(Arc::new(hook));
        self
    }

    /// Build the configuration.
    pub fn build(self) -> ClientConfig {
        ClientConfig {
            proxy_source_url: self
                .proxy_source_url
                .filter(|url| !url.is_empty())
                .unwrap_or_else(|| DEFAULT_PROXY_SOURCE_URL.to_string()),
            max_idle_per_host: self
                .max_idle_per_host
                .filter(|max| *max != 0)
                .unwrap_or(DEFAULT_MAX_IDLE_PER_HOST),
            tls_handshake_timeout: self.tls_handshake_timeout.filter(|t| !t.is_zero()),
            timeout: self
                .timeout
                .filter(|t| !t.is_zero())
                .unwrap_or(DEFAULT_TIMEOUT),
            refresh_interval: self
                .refresh_interval
                .filter(|i| !i.is_zero())
                .unwrap_or(DEFAULT_REFRESH_INTERVAL),
            selection_attempts: self
                .selection_attempts
                .filter(|n| *n != 0)
                .unwrap_or(DEFAULT_SELECTION_ATTEMPTS),
            on_request: self.on_request,
            on_response: self.on_response,
        }
    }
}
