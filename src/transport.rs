//! Construction of the underlying reqwest clients.

use crate::config::ClientConfig;
use crate::proxy::ProxyDescriptor;

use parking_lot::Mutex;
use reqwest::{Client, ClientBuilder};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Proxied clients kept alive at most; one is evicted per insert past this.
const MAX_CACHED_CLIENTS: usize = 256;

/// Connection settings shared by the direct and the proxied clients.
///
/// One client is kept per proxy so that idle connections to a proxy are
/// reused by later requests drawing the same proxy.
#[derive(Debug, Clone)]
pub struct Transport {
    max_idle_per_host: usize,
    handshake_timeout: Option<Duration>,
    timeout: Duration,
    clients: Arc<Mutex<HashMap<ProxyDescriptor, Client>>>,
}

impl Transport {
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            max_idle_per_host: config.max_idle_per_host,
            handshake_timeout: config.tls_handshake_timeout,
            timeout: config.timeout,
            clients: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn builder(&self) -> ClientBuilder {
        let builder = Client::builder()
            .pool_max_idle_per_host(self.max_idle_per_host)
            .timeout(self.timeout);
        match self.handshake_timeout {
            Some(timeout) => builder.connect_timeout(timeout),
            None => builder,
        }
    }

    /// A client that talks to targets directly, ignoring proxy environment
    /// variables.
    pub fn direct(&self) -> Result<Client, reqwest::Error> {
        self.builder().no_proxy().build()
    }

    /// A client that forwards `http://` targets through `proxy`.
    ///
    /// The cache lock is only held for lookups and inserts, never while a
    /// client is being built.
    pub fn proxied(&self, proxy: &ProxyDescriptor) -> Result<Client, reqwest::Error> {
        if let Some(client) = self.clients.lock().get(proxy) {
            return Ok(client.clone());
        }

        let client = self.builder().proxy(proxy.to_reqwest_proxy()?).build()?;

        let mut clients = self.clients.lock();
        if !clients.contains_key(proxy) && clients.len() >= MAX_CACHED_CLIENTS {
            if let Some(evicted) = clients.keys().next().cloned() {
                clients.remove(&evicted);
            }
        }
        Ok(clients.entry(proxy.clone()).or_insert(client).clone())
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    #[cfg(test)]
    fn cached_clients(&self) -> usize {
        self.clients.lock().len()
    }
}
