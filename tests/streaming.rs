use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use dflow_rs::websocket::{Channel, ConnectionState, StreamClient, StreamConfig};
use dflow_rs::Error;
use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{accept_async, WebSocketStream};

async fn bind() -> (TcpListener, SocketAddr) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    (listener, addr)
}

fn config(addr: SocketAddr) -> StreamConfig {
    StreamConfig::new(format!("ws://{}", addr))
        .with_reconnect_interval(Duration::from_millis(20))
        .with_max_reconnect_attempts(3)
}

async fn eventually<F: Fn() -> bool>(condition: F) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while !condition() {
        assert!(
            tokio::time::Instant::now() < deadline,
            "condition not reached in time"
        );
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

async fn next_text(ws: &mut WebSocketStream<tokio::net::TcpStream>) -> Value {
    loop {
        match ws.next().await {
            Some(Ok(Message::Text(text))) => return serde_json::from_str(&text).unwrap(),
            Some(Ok(_)) => continue,
            other => panic!("connection ended before a text frame: {:?}", other),
        }
    }
}

#[tokio::test]
async fn reconnect_budget_is_bounded() {
    let (listener, addr) = bind().await;
    let accepts: Arc<Mutex<Vec<Instant>>> = Arc::default();
    let record = accepts.clone();
    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                return;
            };
            let first = {
                let mut seen = record.lock().unwrap();
                seen.push(Instant::now());
                seen.len() == 1
            };
            // Only the first connection completes a handshake.
            if first {
                let mut ws = accept_async(stream).await.unwrap();
                ws.close(None).await.ok();
            } else {
                drop(stream);
            }
        }
    });

    let client = StreamClient::new(config(addr));
    let errors: Arc<Mutex<Vec<Error>>> = Arc::default();
    let sink = errors.clone();
    let _on_error = client.on_error(move |err| {
        let kept = match err {
            Error::ReconnectFailed {
                attempts,
                last_error,
            } => Error::ReconnectFailed {
                attempts: *attempts,
                last_error: last_error.clone(),
            },
            other => Error::WebSocket(other.to_string()),
        };
        sink.lock().unwrap().push(kept);
    });
    let closes = Arc::new(AtomicUsize::new(0));
    let close_counter = closes.clone();
    let _on_close = client.on_close(move || {
        close_counter.fetch_add(1, Ordering::SeqCst);
    });

    client.connect().await.unwrap();
    eventually(|| !errors.lock().unwrap().is_empty()).await;

    // No further attempts after the terminal error.
    tokio::time::sleep(Duration::from_millis(100)).await;
    let accepts = accepts.lock().unwrap().clone();
    assert_eq!(accepts.len(), 4);
    // Every attempt waits the configured interval first.
    for pair in accepts.windows(2) {
        let gap = pair[1] - pair[0];
        assert!(gap >= Duration::from_millis(20), "attempts {:?} apart", gap);
    }
    assert_eq!(closes.load(Ordering::SeqCst), 1);
    assert_eq!(client.reconnect_attempts(), 3);
    assert_eq!(client.state(), ConnectionState::Disconnected);

    let errors = errors.lock().unwrap();
    assert_eq!(errors.len(), 1);
    assert!(matches!(
        errors[0],
        Error::ReconnectFailed { attempts: 3, .. }
    ));
}

#[tokio::test]
async fn disposed_listener_is_not_invoked() {
    let (listener, addr) = bind().await;
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(stream).await.unwrap();
        let frame = json!({
            "channel": "prices",
            "ticker": "M1",
            "timestamp": 1_700_000_000,
            "yesPrice": 0.61,
            "noPrice": 0.39
        });
        ws.send(Message::Text(frame.to_string())).await.unwrap();
        // Hold the connection open until the client goes away.
        while ws.next().await.is_some() {}
    });

    let client = StreamClient::new(config(addr));
    let first = Arc::new(AtomicUsize::new(0));
    let second = Arc::new(AtomicUsize::new(0));
    let counter = first.clone();
    let disposer = client.on_price(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    let counter = second.clone();
    let _kept = client.on_price(move |update| {
        assert_eq!(update.ticker, "M1");
        counter.fetch_add(1, Ordering::SeqCst);
    });
    disposer.dispose();
    disposer.dispose();

    client.connect().await.unwrap();
    eventually(|| second.load(Ordering::SeqCst) == 1).await;
    assert_eq!(first.load(Ordering::SeqCst), 0);
    client.disconnect().await;
    assert_eq!(client.state(), ConnectionState::Disconnected);
}

#[tokio::test]
async fn subscribing_requires_a_connection() {
    let client = StreamClient::with_url("ws://127.0.0.1:9");
    let err = client
        .subscribe_prices(vec!["M1".to_string()])
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotConnected));
    assert!(client.subscriptions(Channel::Prices).is_empty());
}

#[tokio::test]
async fn connect_failure_is_returned_to_caller() {
    let (listener, addr) = bind().await;
    drop(listener);
    let client = StreamClient::new(config(addr));
    assert!(client.connect().await.is_err());
    assert_eq!(client.state(), ConnectionState::Disconnected);
}

#[tokio::test]
async fn control_frames_and_subscription_replay() {
    let (listener, addr) = bind().await;
    let (tx, mut rx) = mpsc::unbounded_channel::<(usize, Value)>();
    tokio::spawn(async move {
        // First connection: record two control frames, then drop the client.
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(stream).await.unwrap();
        for _ in 0..2 {
            tx.send((1, next_text(&mut ws).await)).ok();
        }
        ws.close(None).await.ok();

        // Second connection: the client restores its subscriptions.
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(stream).await.unwrap();
        while let Some(Ok(message)) = ws.next().await {
            if let Message::Text(text) = message {
                tx.send((2, serde_json::from_str(&text).unwrap())).ok();
            }
        }
    });

    let client = StreamClient::new(config(addr));
    client.connect().await.unwrap();
    client
        .subscribe_trades(vec!["M1".to_string(), "M2".to_string()])
        .await
        .unwrap();
    client.subscribe_all_orderbook().await.unwrap();

    let (conn, frame) = rx.recv().await.unwrap();
    assert_eq!(conn, 1);
    assert_eq!(
        frame,
        json!({ "type": "subscribe", "channel": "trades", "tickers": ["M1", "M2"] })
    );
    let (_, frame) = rx.recv().await.unwrap();
    assert_eq!(
        frame,
        json!({ "type": "subscribe", "channel": "orderbook", "all": true })
    );

    let mut replayed = Vec::new();
    for _ in 0..2 {
        let (conn, frame) = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(conn, 2);
        replayed.push(frame);
    }
    assert!(replayed.contains(&json!({
        "type": "subscribe", "channel": "trades", "tickers": ["M1", "M2"]
    })));
    assert!(replayed.contains(&json!({
        "type": "subscribe", "channel": "orderbook", "all": true
    })));

    eventually(|| client.is_connected()).await;
    client
        .unsubscribe(Channel::Trades, Some(vec!["M1".to_string()]))
        .await
        .unwrap();
    let (_, frame) = rx.recv().await.unwrap();
    assert_eq!(
        frame,
        json!({ "type": "unsubscribe", "channel": "trades", "tickers": ["M1"] })
    );
    let trades = client.subscriptions(Channel::Trades);
    assert_eq!(trades.tickers.len(), 1);
    assert!(trades.tickers.contains("M2"));

    // An empty ticker list clears the whole channel.
    client
        .unsubscribe(Channel::Orderbook, Some(Vec::new()))
        .await
        .unwrap();
    let (_, frame) = rx.recv().await.unwrap();
    assert_eq!(
        frame,
        json!({ "type": "unsubscribe", "channel": "orderbook", "all": true })
    );
    assert!(client.subscriptions(Channel::Orderbook).is_empty());

    client.disconnect().await;
}

#[tokio::test]
async fn disconnect_during_handshake_wins() {
    let (listener, addr) = bind().await;
    let (closed_tx, closed_rx) = tokio::sync::oneshot::channel();
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        // Hold the handshake open well past the disconnect.
        tokio::time::sleep(Duration::from_millis(200)).await;
        let Ok(mut ws) = accept_async(stream).await else {
            closed_tx.send(()).ok();
            return;
        };
        while let Some(Ok(message)) = ws.next().await {
            if message.is_close() {
                break;
            }
        }
        closed_tx.send(()).ok();
    });

    let client = StreamClient::new(config(addr));
    let connecting = client.clone();
    let handshake = tokio::spawn(async move { connecting.connect().await });

    eventually(|| client.state() == ConnectionState::Connecting).await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    client.disconnect().await;
    assert_eq!(client.state(), ConnectionState::Disconnected);

    assert!(handshake.await.unwrap().is_ok());
    assert_eq!(client.state(), ConnectionState::Disconnected);
    assert!(!client.is_connected());

    // The late connection is closed instead of kept.
    tokio::time::timeout(Duration::from_secs(5), closed_rx)
        .await
        .unwrap()
        .unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(client.state(), ConnectionState::Disconnected);
    assert!(matches!(
        client.subscribe_all_prices().await,
        Err(Error::NotConnected)
    ));
}
