//! Where proxy lists come from.

use crate::error::{Error, Result};
use crate::proxy::ProxyDescriptor;

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// A provider of fresh proxy lists.
#[async_trait]
pub trait ProxySource: Send + Sync {
    /// Fetch the complete current list.
    async fn fetch(&self) -> Result<Vec<ProxyDescriptor>>;

    /// Human readable origin, used in log lines.
    fn describe(&self) -> String;
}

/// Fetches a JSON array of `{host, port, type}` objects with a plain,
/// unproxied GET.
#[derive(Debug, Clone)]
pub struct HttpProxySource {
    url: String,
    client: Client,
}

impl HttpProxySource {
    /// Create a source for `url` whose requests give up after `timeout`.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().no_proxy().timeout(timeout).build()?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ProxySource for HttpProxySource {
    async fn fetch(&self) -> Result<Vec<ProxyDescriptor>> {
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::SourceStatus {
                status: status.as_u16(),
                url: self.url.clone(),
            });
        }

        let body = response.bytes().await?;
        parse_proxy_list(&body)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Decode a proxy-list payload. Anything but an array of complete
/// descriptors is rejected.
pub fn parse_proxy_list(content: &[u8]) -> Result<Vec<ProxyDescriptor>> {
    Ok(serde_json::from_slice(content)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_array_of_descriptors() {
        let proxies =
            parse_proxy_list(br#"[{"host":"1.2.3.4","port":80,"type":0},{"host":"5.6.7.8","port":1080,"type":1}]"#)
                .unwrap();
        assert_eq!(
            proxies,
            vec![ProxyDescriptor::http("1.2.3.4", 80), ProxyDescriptor::new("5.6.7.8", 1080, 1)]
        );
    }

    #[test]
    fn unknown_type_codes_do_not_reject_the_list() {
        let proxies = parse_proxy_list(
            br#"[{"host":"1.2.3.4","port":80,"type":0},{"host":"5.6.7.8","port":1080,"type":-1},{"host":"9.9.9.9","port":1080,"type":256}]"#,
        )
        .unwrap();
        assert_eq!(proxies.len(), 3);

        let pool = crate::pool::ProxyPool::new();
        pool.replace(proxies);
        assert_eq!(pool.usable_count(), 1);
        for _ in 0..20 {
            assert_eq!(pool.select_usable(30).unwrap(), ProxyDescriptor::http("1.2.3.4", 80));
        }
    }

    #[test]
    fn empty_array_is_a_valid_list() {
        assert!(parse_proxy_list(b"[]").unwrap().is_empty());
    }

    #[test]
    fn rejects_other_shapes() {
        let payloads: [&[u8]; 5] = [
            b"not json",
            br#"{"host":"1.2.3.4","port":80,"type":0}"#,
            br#"[{"host":"1.2.3.4","port":"80","type":0}]"#,
            br#"[{"host":1234,"port":80,"type":0}]"#,
            b"",
        ];
        for payload in payloads {
            assert!(matches!(parse_proxy_list(payload), Err(Error::Decode(_))));
        }
    }
}
