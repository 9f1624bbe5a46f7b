//! Middleware implementation for reqwest.

use crate::config::{ClientConfig, RequestHook, ResponseHook};
use crate::logger::Logger;
use crate::pool::ProxyPool;
use crate::transport::Transport;

use anyhow::anyhow;
use async_trait::async_trait;
use log::debug;
use reqwest_middleware::{Error, Middleware, Next, Result};
use std::sync::Arc;

/// Middleware that sends each request through a proxy drawn from the pool.
///
/// Only `http://` targets are forwarded through the proxy; other schemes
/// connect directly.
///
/// When no HTTP proxy can be drawn the failure is reported to the logger and
/// the request continues down the chain, i.e. it is sent directly.
#[derive(Clone)]
pub struct ProxyPoolMiddleware {
    pool: Arc<ProxyPool>,
    transport: Transport,
    logger: Arc<dyn Logger>,
    selection_attempts: usize,
    on_request: Option<RequestHook>,
    on_response: Option<ResponseHook>,
}

impl ProxyPoolMiddleware {
    pub fn new(
        pool: Arc<ProxyPool>,
        transport: Transport,
        logger: Arc<dyn Logger>,
        config: &ClientConfig,
    ) -> Self {
        Self {
            pool,
            transport,
            logger,
            selection_attempts: config.selection_attempts,
            on_request: config.on_request.clone(),
            on_response: config.on_response.clone(),
        }
    }
}

#[async_trait]
impl Middleware for ProxyPoolMiddleware {
    async fn handle(
        &self,
        req: reqwest::Request,
        extensions: &mut http::Extensions,
        next: Next<'_>,
    ) -> Result<reqwest::Response> {
        if let Some(hook) = &self.on_request {
            hook(&req);
        }

        let response = match self.pool.select_usable(self.selection_attempts) {
            Ok(proxy) => {
                let client = self.transport.proxied(&proxy).map_err(|e| {
                    Error::Middleware(anyhow!("failed to build client for proxy {}: {}", proxy, e))
                })?;
                if req.url().scheme() == "http" {
                    debug!("Using proxy {} for {} {}", proxy, req.method(), req.url());
                } else {
                    debug!(
                        "Proxy {} bypassed for {} target {} {}",
                        proxy,
                        req.url().scheme(),
                        req.method(),
                        req.url()
                    );
                }
                client.execute(req).await.map_err(Error::Reqwest)?
            }
            Err(e) => {
                self.logger.error(&e);
                debug!("Sending {} {} without proxy", req.method(), req.url());
                next.run(req, extensions).await?
            }
        };

        if let Some(hook) = &self.on_response {
            hook(&response);
        }
        Ok(response)
    }
}
