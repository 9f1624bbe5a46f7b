//! Core proxy pool implementation.

use crate::error::NoProxyAvailable;
use crate::proxy::ProxyDescriptor;

use parking_lot::Mutex;
use rand::Rng;

/// The current set of proxies, replaced wholesale on every refresh.
#[derive(Debug, Default)]
pub struct ProxyPool {
    proxies: Mutex<Vec<ProxyDescriptor>>,
}

impl ProxyPool {
    /// Create an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap the stored list for `proxies`. Readers see either the old or the
    /// new list in full.
    pub fn replace(&self, proxies: Vec<ProxyDescriptor>) {
        *self.proxies.lock() = proxies;
    }

    /// Pick a random HTTP proxy, giving up after `max_attempts` draws.
    ///
    /// Each draw picks a uniformly random index and keeps the entry only if it
    /// is an HTTP proxy on a valid port. The list is never filtered up front, so a pool made
    /// mostly of SOCKS entries may miss the few usable ones.
    pub fn select_usable(&self, max_attempts: usize) -> Result<ProxyDescriptor, NoProxyAvailable> {
        let proxies = self.proxies.lock();
        if proxies.is_empty() {
            return Err(NoProxyAvailable);
        }

        let mut rng = rand::rng();
        for _ in 0..max_attempts {
            let candidate = &proxies[rng.random_range(0..proxies.len())];
            if candidate.is_usable() {
                return Ok(candidate.clone());
            }
        }

        Err(NoProxyAvailable)
    }

    /// Number of proxies currently stored.
    pub fn len(&self) -> usize {
        self.proxies.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.proxies.lock().is_empty()
    }

    /// Number of stored proxies that could be selected.
    pub fn usable_count(&self) -> usize {
        self.proxies.lock().iter().filter(|p| p.is_usable()).count()
    }

    /// A copy of the current list.
    pub fn snapshot(&self) -> Vec<ProxyDescriptor> {
        self.proxies.lock().clone()
    }
}
