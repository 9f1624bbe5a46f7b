//! # reqwest-proxy-client
//!
//! An HTTP client that sends every request through a rotating pool of
//! third-party HTTP proxies.
//!
//! The pool is fetched from a JSON proxy list when the client is created and
//! refreshed on a fixed interval afterwards. Each request draws a random HTTP
//! proxy from the pool, carries a spoofed `X-Forwarded-For` address and has
//! its status checked before the body is handed back.
//!
//! ```no_run
//! use reqwest_proxy_client::{ClientConfig, ProxyClient, RequestOptions};
//!
//! # async fn run() -> reqwest_proxy_client::Result<()> {
//! let client = ProxyClient::new(ClientConfig::default()).await?;
//! let body = client
//!     .do_request("http://httpbin.org/ip", reqwest::Method::GET, RequestOptions::default())
//!     .await?;
//! println!("{}", String::from_utf8_lossy(&body));
//! client.stop();
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod logger;
pub mod middleware;
pub mod pool;
pub mod proxy;
pub mod refresher;
pub mod source;
pub mod transport;

pub use client::{ClientState, ProxyClient, RequestOptions};
pub use config::{ClientConfig, ClientConfigBuilder};
pub use error::{Error, NoProxyAvailable, Result};
pub use logger::{Logger, StdoutLogger};
pub use middleware::ProxyPoolMiddleware;
pub use pool::ProxyPool;
pub use proxy::{ProxyDescriptor, HTTP_PROXY_TYPE};
pub use refresher::Refresher;
pub use source::{HttpProxySource, ProxySource};
