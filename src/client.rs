//! The proxy client: owns the pool, its refresher and the HTTP stack.

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::logger::{Logger, StdoutLogger};
use crate::middleware::ProxyPoolMiddleware;
use crate::pool::ProxyPool;
use crate::refresher::Refresher;
use crate::source::{HttpProxySource, ProxySource};
use crate::transport::Transport;

use log::info;
use parking_lot::Mutex;
use rand::Rng;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::sync::Arc;
use url::Url;

/// Header carrying the spoofed client address.
pub const FORWARDED_FOR: &str = "x-forwarded-for";

/// Per-request options.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Headers added to the request.
    pub headers: HashMap<String, String>,
    /// Query parameters appended to the URL.
    pub params: HashMap<String, String>,
    /// Request body.
    pub body: Vec<u8>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }
}

/// Lifecycle of a [`ProxyClient`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientState {
    /// The pool is refreshed on schedule.
    Running,
    /// The schedule was cancelled; the pool keeps its last contents.
    Stopped,
}

/// HTTP client sending every request through a proxy from a refreshed pool.
pub struct ProxyClient {
    http: ClientWithMiddleware,
    pool: Arc<ProxyPool>,
    refresher: Refresher,
    state: Mutex<ClientState>,
}

impl ProxyClient {
    /// Create a client reporting absorbed errors to standard output.
    ///
    /// Fetches the proxy list once before returning and schedules later
    /// refreshes. Fails only if the schedule cannot be set up; a client
    /// without refreshes is not handed out.
    pub async fn new(config: ClientConfig) -> Result<Self> {
        Self::with_logger(config, Arc::new(StdoutLogger::new())).await
    }

    /// Create a client reporting absorbed errors to `logger`.
    pub async fn with_logger(config: ClientConfig, logger: Arc<dyn Logger>) -> Result<Self> {
        let source = HttpProxySource::new(config.proxy_source_url.clone(), config.timeout)?;
        Self::with_source(config, logger, Arc::new(source)).await
    }

    /// Create a client whose pool is filled from `source` instead of the
    /// configured URL.
    pub async fn with_source(
        config: ClientConfig,
        logger: Arc<dyn Logger>,
        source: Arc<dyn ProxySource>,
    ) -> Result<Self> {
        let pool = Arc::new(ProxyPool::new());
        let transport = Transport::from_config(&config);
        let middleware =
            ProxyPoolMiddleware::new(Arc::clone(&pool), transport.clone(), Arc::clone(&logger), &config);
        let http = ClientBuilder::new(transport.direct()?).with(middleware).build();

        let refresher = Refresher::new(source, Arc::clone(&pool), logger, config.refresh_interval);
        refresher.start().await?;
        info!(
            "Proxy client started with {}/{} usable proxies, refreshing every {:?}",
            pool.usable_count(),
            pool.len(),
            config.refresh_interval
        );

        Ok(Self {
            http,
            pool,
            refresher,
            state: Mutex::new(ClientState::Running),
        })
    }

    /// Send a request through a random proxy and return the response body.
    ///
    /// Non-2xx responses are turned into [`Error::Status`]. When the pool has
    /// no usable proxy the request is sent directly.
    pub async fn do_request(&self, url: &str, method: Method, options: RequestOptions) -> Result<Vec<u8>> {
        if url.is_empty() {
            return Err(Error::EmptyUrl);
        }
        let target = Url::parse(url).map_err(|source| Error::InvalidUrl {
            url: url.to_string(),
            source,
        })?;

        let mut headers = build_headers(&options.headers)?;
        let spoofed = spoofed_ipv4().to_string();
        headers.append(
            HeaderName::from_static(FORWARDED_FOR),
            HeaderValue::from_str(&spoofed).map_err(|_| Error::InvalidHeader(spoofed))?,
        );

        let mut request = self.http.request(method, target).headers(headers).body(options.body);
        if !options.params.is_empty() {
            let mut params: Vec<_> = options.params.iter().collect();
            params.sort();
            request = request.query(&params);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                url: url.to_string(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        Ok(body.to_vec())
    }

    /// Refresh the pool now, outside the schedule. Returns whether the pool
    /// was replaced.
    pub async fn refresh(&self) -> bool {
        self.refresher.refresh_once().await
    }

    /// Cancel scheduled refreshes. Requests in flight are not affected and
    /// later requests keep using the last fetched pool.
    pub fn stop(&self) {
        self.refresher.stop();
        *self.state.lock() = ClientState::Stopped;
    }

    pub fn state(&self) -> ClientState {
        *self.state.lock()
    }

    /// Number of proxies in the pool, usable or not.
    pub fn proxy_count(&self) -> usize {
        self.pool.len()
    }
}

fn build_headers(headers: &HashMap<String, String>) -> Result<HeaderMap> {
    let mut map = HeaderMap::with_capacity(headers.len() + 1);
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| Error::InvalidHeader(name.clone()))?;
        let value = HeaderValue::from_str(value).map_err(|_| Error::InvalidHeader(format!("{}: {}", name, value)))?;
        map.append(name, value);
    }
    Ok(map)
}

/// A random address to present as the request's origin.
fn spoofed_ipv4() -> Ipv4Addr {
    let mut rng = rand::rng();
    Ipv4Addr::new(rng.random(), rng.random(), rng.random(), rng.random())
}
