//! Shared helpers for the integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest_proxy_client::{ClientConfig, Logger, ProxyDescriptor, ProxySource};
use std::fmt;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Keeps every reported error for later inspection.
#[derive(Default)]
pub struct RecordingLogger {
    entries: Mutex<Vec<String>>,
}

impl RecordingLogger {
    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().clone()
    }
}

impl Logger for RecordingLogger {
    fn error(&self, err: &dyn fmt::Display) {
        self.entries.lock().push(err.to_string());
    }
}

/// Serves the same list on every fetch.
#[derive(Default)]
pub struct StaticSource {
    proxies: Vec<ProxyDescriptor>,
    fetches: AtomicUsize,
}

impl StaticSource {
    pub fn new(proxies: Vec<ProxyDescriptor>) -> Self {
        Self {
            proxies,
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProxySource for StaticSource {
    async fn fetch(&self) -> reqwest_proxy_client::Result<Vec<ProxyDescriptor>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.proxies.clone())
    }

    fn describe(&self) -> String {
        "static".to_string()
    }
}

pub fn test_config() -> ClientConfig {
    ClientConfig::builder()
        .timeout(Duration::from_secs(5))
        .tls_handshake_timeout(Duration::from_secs(2))
        .build()
}

/// An HTTP proxy entry pointing at a mock server.
pub fn proxy_for(server: &mockito::Server) -> ProxyDescriptor {
    let addr: SocketAddr = server.host_with_port().parse().unwrap();
    ProxyDescriptor::http(addr.ip().to_string(), addr.port())
}
