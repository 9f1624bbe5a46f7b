//! Simple example of using reqwest-proxy-client.

use reqwest_proxy_client::{ClientConfig, Logger, ProxyClient, RequestOptions};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Forwards absorbed client errors to the `log` facade.
struct EnvLogger;

impl Logger for EnvLogger {
    fn error(&self, err: &dyn fmt::Display) {
        log::error!("{}", err);
    }
}

const MAX_ATTEMPTS: usize = 100;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();

    println!("Initializing proxy client...");

    let config = ClientConfig::builder()
        .timeout(Duration::from_secs(10))
        .tls_handshake_timeout(Duration::from_secs(5))
        .on_request(|req| log::debug!("--> {} {}", req.method(), req.url()))
        .on_response(|resp| log::debug!("<-- {} {}", resp.status(), resp.url()))
        .build();

    let client = ProxyClient::with_logger(config, Arc::new(EnvLogger)).await?;

    // free proxies fail often, retry with a new random proxy each time
    let mut attempt = 0;
    let body = loop {
        attempt += 1;
        match client
            .do_request("http://httpbin.org/ip", reqwest::Method::GET, RequestOptions::default())
            .await
        {
            Ok(body) => break body,
            Err(e) if attempt < MAX_ATTEMPTS => {
                log::warn!("Attempt {} failed: {}", attempt, e);
                tokio::time::sleep(Duration::from_millis(1)).await;
            }
            Err(e) => {
                client.stop();
                return Err(e.into());
            }
        }
    };

    println!("Response: {}", String::from_utf8_lossy(&body));
    client.stop();

    Ok(())
}
