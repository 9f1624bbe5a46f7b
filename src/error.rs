//! Error types for the reqwest-proxy-client crate.

use thiserror::Error;

/// Error returned when no usable proxy could be picked from the pool.
#[derive(Debug, Error)]
#[error("No proxy available in pool")]
pub struct NoProxyAvailable;

/// Errors produced by the client, the refresher and proxy sources.
#[derive(Debug, Error)]
pub enum Error {
    /// The caller passed an empty URL.
    #[error("request URL is empty")]
    EmptyUrl,

    /// The URL could not be parsed.
    #[error("invalid request URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// A header name or value could not be encoded.
    #[error("invalid header {0}")]
    InvalidHeader(String),

    /// Connect, DNS, timeout or middleware failure while sending a request.
    #[error(transparent)]
    Transport(#[from] reqwest_middleware::Error),

    /// Failure while building a client or reading a response.
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// The target answered with a non-2xx status.
    #[error("status: {status}; url {url}; response error body: {body}")]
    Status { status: u16, url: String, body: String },

    /// The proxy-list source answered with a non-2xx status.
    #[error("proxy source {url} returned status {status}")]
    SourceStatus { status: u16, url: String },

    /// The proxy-list payload is not a JSON array of proxy descriptors.
    #[error("malformed proxy list: {0}")]
    Decode(#[from] serde_json::Error),

    /// The recurring refresh could not be scheduled.
    #[error("failed to schedule proxy refresh: {0}")]
    Schedule(String),

    #[error(transparent)]
    NoProxy(#[from] NoProxyAvailable),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;
