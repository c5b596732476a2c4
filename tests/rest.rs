use std::net::SocketAddr;

use dflow_rs::{ClientConfig, DFlowClient, Error, MarketStatus, MarketsParams, TradesParams};
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Serve one canned response and hand back the raw request head
async fn serve_once(status: &'static str, body: String) -> (SocketAddr, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut head = Vec::new();
        let mut buf = [0u8; 1024];
        while !head.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            head.extend_from_slice(&buf[..n]);
        }
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        tx.send(String::from_utf8_lossy(&head).into_owned()).ok();
    });
    (addr, rx)
}

fn client(addr: SocketAddr, api_key: Option<&str>) -> DFlowClient {
    let mut config = ClientConfig::default()
        .with_metadata_url(format!("http://{}/api/v1", addr))
        .with_trade_url(format!("http://{}", addr));
    if let Some(key) = api_key {
        config = config.with_api_key(key);
    }
    DFlowClient::new(config).unwrap()
}

fn request_line(head: &str) -> &str {
    head.lines().next().unwrap_or_default()
}

#[tokio::test]
async fn absent_filters_are_not_serialized() {
    let (addr, head) = serve_once("200 OK", json!({ "cursor": null, "markets": [] }).to_string()).await;
    let params = MarketsParams::new().with_status(MarketStatus::Active);
    let page = client(addr, None).markets().get_markets(&params).await.unwrap();
    assert!(page.markets.is_empty());

    let head = head.await.unwrap();
    assert_eq!(request_line(&head), "GET /api/v1/markets?status=active HTTP/1.1");
    assert!(!head.to_ascii_lowercase().contains("x-api-key"));
}

#[tokio::test]
async fn trades_query_uses_camel_case_names() {
    let (addr, head) = serve_once("200 OK", json!({ "trades": [] }).to_string()).await;
    let params = TradesParams::new().with_ticker("M1").with_time_range(10, 20);
    client(addr, None).trades().get_trades(&params).await.unwrap();

    let head = head.await.unwrap();
    assert_eq!(
        request_line(&head),
        "GET /api/v1/trades?marketTicker=M1&startTimestamp=10&endTimestamp=20 HTTP/1.1"
    );
}

#[tokio::test]
async fn api_key_header_is_sent_when_configured() {
    let (addr, head) = serve_once("200 OK", "[]".to_string()).await;
    let tokens = client(addr, Some("secret")).tokens().get_tokens().await.unwrap();
    assert!(tokens.is_empty());

    let head = head.await.unwrap().to_ascii_lowercase();
    assert!(head.starts_with("get /tokens http/1.1"));
    assert!(head.contains("x-api-key: secret"));
    assert!(head.contains("content-type: application/json"));
}

#[tokio::test]
async fn error_status_carries_parsed_body() {
    let (addr, _head) = serve_once("404 Not Found", json!({ "error": "no such market" }).to_string()).await;
    let err = client(addr, None).markets().get_market("NOPE").await.unwrap_err();
    assert_eq!(err.status_code(), Some(404));
    assert!(!err.is_retryable());
    match err {
        Error::Api { body, .. } => assert_eq!(body, Some(json!({ "error": "no such market" }))),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn undecodable_success_keeps_status() {
    let (addr, _head) = serve_once("200 OK", "not json".to_string()).await;
    let err = client(addr, None).series().get_tags_by_categories().await.unwrap_err();
    assert!(matches!(err, Error::Decode { status: 200, .. }));
}

#[tokio::test]
async fn batch_limit_fails_without_network() {
    // Nothing listens on the discard port; a request would fail with a transport error.
    let config = ClientConfig::default().with_metadata_url("http://127.0.0.1:9/api/v1");
    let client = DFlowClient::new(config).unwrap();
    let tickers: Vec<String> = (0..101).map(|i| format!("T{}", i)).collect();
    let err = client
        .markets()
        .get_markets_batch(&tickers, &[])
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidParameter(_)));
}

#[tokio::test]
async fn verify_address_reads_kyc_status() {
    let (addr, head) = serve_once("200 OK", json!({ "verified": true }).to_string()).await;
    let config = ClientConfig::default().with_proof_url(format!("http://{}", addr));
    let client = DFlowClient::new(config).unwrap();
    let status = client.proof().verify_address("Wallet111").await.unwrap();
    assert!(status.verified);
    assert_eq!(
        request_line(&head.await.unwrap()),
        "GET /verify/Wallet111 HTTP/1.1"
    );

    let (addr, _head) = serve_once(
        "400 Bad Request",
        json!({ "error": "Invalid wallet address" }).to_string(),
    )
    .await;
    let config = ClientConfig::default().with_proof_url(format!("http://{}", addr));
    let err = DFlowClient::new(config)
        .unwrap()
        .proof()
        .verify_address("invalid")
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), Some(400));
}
