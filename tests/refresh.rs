mod common;

use common::{init_logging, test_config, RecordingLogger, StaticSource};
use reqwest_proxy_client::{ClientConfig, HttpProxySource, ProxyClient, ProxyDescriptor, ProxySource};
use std::sync::Arc;
use std::time::Duration;
use tokio_test::{assert_err, assert_ok};

const PROXY_LIST: &str = r#"[
    {"host": "10.0.0.1", "port": 8080, "type": 0},
    {"host": "10.0.0.2", "port": 1080, "type": 2}
]"#;

fn config_for(server: &mockito::Server, interval: Duration) -> ClientConfig {
    ClientConfig::builder()
        .proxy_source_url(format!("{}/proxies.json", server.url()))
        .timeout(Duration::from_secs(5))
        .refresh_interval(interval)
        .build()
}

#[tokio::test]
async fn http_source_decodes_list() {
    init_logging();
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/proxies.json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(PROXY_LIST)
        .create_async()
        .await;
    let source = assert_ok!(HttpProxySource::new(
        format!("{}/proxies.json", server.url()),
        Duration::from_secs(5)
    ));

    let proxies = assert_ok!(source.fetch().await);

    assert_eq!(
        proxies,
        vec![
            ProxyDescriptor::http("10.0.0.1", 8080),
            ProxyDescriptor::new("10.0.0.2", 1080, 2)
        ]
    );
}

#[tokio::test]
async fn http_source_rejects_error_status() {
    init_logging();
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/proxies.json")
        .with_status(503)
        .with_body(PROXY_LIST)
        .create_async()
        .await;
    let source = assert_ok!(HttpProxySource::new(
        format!("{}/proxies.json", server.url()),
        Duration::from_secs(5)
    ));

    let err = assert_err!(source.fetch().await);

    assert!(err.to_string().contains("503"), "{err}");
}

#[tokio::test]
async fn client_fills_pool_on_start() {
    init_logging();
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/proxies.json")
        .with_status(200)
        .with_body(PROXY_LIST)
        .expect(1)
        .create_async()
        .await;
    let logger = Arc::new(RecordingLogger::default());

    let client = assert_ok!(
        ProxyClient::with_logger(config_for(&server, Duration::from_secs(3600)), logger.clone()).await
    );

    assert_eq!(client.proxy_count(), 2);
    assert!(logger.entries().is_empty());
    mock.assert_async().await;
    client.stop();
}

#[tokio::test]
async fn malformed_payload_keeps_previous_pool() {
    init_logging();
    let mut server = mockito::Server::new_async().await;
    let good = server
        .mock("GET", "/proxies.json")
        .with_status(200)
        .with_body(PROXY_LIST)
        .create_async()
        .await;
    let logger = Arc::new(RecordingLogger::default());
    let client = assert_ok!(
        ProxyClient::with_logger(config_for(&server, Duration::from_secs(3600)), logger.clone()).await
    );
    assert_eq!(client.proxy_count(), 2);
    good.remove_async().await;

    server
        .mock("GET", "/proxies.json")
        .with_status(200)
        .with_body(r#"{"proxies": "nope"}"#)
        .create_async()
        .await;

    assert!(!client.refresh().await);
    assert_eq!(client.proxy_count(), 2);
    let entries = logger.entries();
    assert_eq!(entries.len(), 1, "{entries:?}");
    assert!(entries[0].starts_with("malformed proxy list"), "{entries:?}");
}

#[tokio::test]
async fn unreachable_source_does_not_fail_construction() {
    init_logging();
    let logger = Arc::new(RecordingLogger::default());
    let config = ClientConfig::builder()
        .proxy_source_url("http://127.0.0.1:1/proxies.json")
        .timeout(Duration::from_secs(2))
        .build();

    let client = assert_ok!(ProxyClient::with_logger(config, logger.clone()).await);

    assert_eq!(client.proxy_count(), 0);
    assert_eq!(logger.entries().len(), 1);
}

#[tokio::test]
async fn refreshes_on_schedule_until_stopped() {
    init_logging();
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/proxies.json")
        .with_status(200)
        .with_body(PROXY_LIST)
        .expect_at_least(3)
        .create_async()
        .await;
    let client = assert_ok!(
        ProxyClient::with_logger(
            config_for(&server, Duration::from_millis(100)),
            Arc::new(RecordingLogger::default())
        )
        .await
    );

    tokio::time::sleep(Duration::from_millis(450)).await;
    client.stop();
    mock.assert_async().await;
}

#[tokio::test]
async fn no_refresh_after_stop() {
    init_logging();
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/proxies.json")
        .with_status(200)
        .with_body(PROXY_LIST)
        .expect(1)
        .create_async()
        .await;
    let client = assert_ok!(
        ProxyClient::with_logger(
            config_for(&server, Duration::from_millis(100)),
            Arc::new(RecordingLogger::default())
        )
        .await
    );

    client.stop();
    tokio::time::sleep(Duration::from_millis(500)).await;

    mock.assert_async().await;
}

#[tokio::test(start_paused = true)]
async fn no_refresh_after_stop_with_paused_clock() {
    init_logging();
    let source = Arc::new(StaticSource::new(vec![ProxyDescriptor::http("10.0.0.1", 8080)]));
    let client = assert_ok!(
        ProxyClient::with_source(test_config(), Arc::new(RecordingLogger::default()), source.clone()).await
    );
    assert_eq!(source.fetches(), 1);

    tokio::time::sleep(Duration::from_secs(3601)).await;
    assert_eq!(source.fetches(), 2);

    client.stop();
    tokio::time::sleep(Duration::from_secs(3600 * 5)).await;
    assert_eq!(source.fetches(), 2);
}

#[tokio::test]
async fn clients_do_not_share_schedules() {
    init_logging();
    let first = Arc::new(StaticSource::new(Vec::new()));
    let second = Arc::new(StaticSource::new(Vec::new()));
    let config = || {
        ClientConfig::builder()
            .refresh_interval(Duration::from_millis(50))
            .build()
    };
    let a = assert_ok!(ProxyClient::with_source(config(), Arc::new(RecordingLogger::default()), first.clone()).await);
    let b = assert_ok!(ProxyClient::with_source(config(), Arc::new(RecordingLogger::default()), second.clone()).await);

    a.stop();
    let stopped_at = first.fetches();
    tokio::time::sleep(Duration::from_millis(300)).await;

    assert_eq!(first.fetches(), stopped_at);
    assert!(second.fetches() > 1);
    b.stop();
}
