use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, info, warn};

use super::callbacks::{lock, CallbackSet, Disposer};
use super::stream::{decode_message, StreamConfig};
use crate::error::{Error, Result};
use crate::types::{Channel, ControlMessage, OrderbookUpdate, PriceUpdate, StreamUpdate, TradeUpdate};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, Message>;
type WsSource = SplitStream<WsStream>;

/// Connection lifecycle of a [`StreamClient`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Reconnecting,
}

/// Active subscriptions on one channel
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelSubscription {
    pub all: bool,
    pub tickers: BTreeSet<String>,
}

impl ChannelSubscription {
    pub fn is_empty(&self) -> bool {
        !self.all && self.tickers.is_empty()
    }

    fn replay_messages(&self, channel: Channel) -> Vec<ControlMessage> {
        let mut messages = Vec::new();
        if self.all {
            messages.push(ControlMessage::subscribe_all(channel));
        }
        if !self.tickers.is_empty() {
            messages.push(ControlMessage::subscribe(
                channel,
                self.tickers.iter().cloned().collect(),
            ));
        }
        messages
    }
}

#[derive(Default)]
struct Callbacks {
    prices: Arc<CallbackSet<PriceUpdate>>,
    trades: Arc<CallbackSet<TradeUpdate>>,
    orderbook: Arc<CallbackSet<OrderbookUpdate>>,
    errors: Arc<CallbackSet<Error>>,
    close: Arc<CallbackSet<()>>,
}

struct Inner {
    config: StreamConfig,
    state: Mutex<ConnectionState>,
    /// Send lock: every outbound frame goes through this single writer
    writer: tokio::sync::Mutex<Option<WsSink>>,
    listener: Mutex<Option<JoinHandle<()>>>,
    reconnect_enabled: AtomicBool,
    attempts: AtomicU32,
    /// Bumped by every `disconnect`; a handshake started under an older value is discarded
    generation: AtomicU64,
    registry: Mutex<HashMap<Channel, ChannelSubscription>>,
    callbacks: Callbacks,
}

/// Streaming client for live price, trade and orderbook updates
///
/// Holds one connection at a time. Updates are delivered to callbacks
/// registered with `on_*`, in arrival order; connectivity problems are only
/// reported through [`StreamClient::on_error`].
///
/// After the transport drops the client waits `reconnect_interval`, reconnects
/// and replays the active subscriptions, up to `max_reconnect_attempts`
/// consecutive failures.
///
/// # Example
///
/// ```no_run
/// use dflow_rs::websocket::{StreamClient, StreamConfig};
///
/// #[tokio::main]
/// async fn main() -> dflow_rs::Result<()> {
///     let client = StreamClient::new(StreamConfig::default());
///     let _prices = client.on_price(|update| {
///         println!("{} yes={} no={}", update.ticker, update.yes_price, update.no_price);
///     });
///     let _errors = client.on_error(|err| eprintln!("stream error: {}", err));
///
///     client.connect().await?;
///     client.subscribe_all_prices().await?;
///     tokio::signal::ctrl_c().await.ok();
///     client.disconnect().await;
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct StreamClient {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for StreamClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamClient")
            .field("url", &self.inner.config.url)
            .field("state", &self.state())
            .finish()
    }
}

impl StreamClient {
    pub fn new(config: StreamConfig) -> Self {
        let reconnect = config.reconnect;
        Self {
            inner: Arc::new(Inner {
                config,
                state: Mutex::new(ConnectionState::Disconnected),
                writer: tokio::sync::Mutex::new(None),
                listener: Mutex::new(None),
                reconnect_enabled: AtomicBool::new(reconnect),
                attempts: AtomicU32::new(0),
                generation: AtomicU64::new(0),
                registry: Mutex::new(HashMap::new()),
                callbacks: Callbacks::default(),
            }),
        }
    }

    pub fn with_url(url: impl Into<String>) -> Self {
        Self::new(StreamConfig::new(url))
    }

    pub fn config(&self) -> &StreamConfig {
        &self.inner.config
    }

    pub fn state(&self) -> ConnectionState {
        *lock(&self.inner.state)
    }

    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }

    /// Consecutive reconnection attempts since the last successful connect
    pub fn reconnect_attempts(&self) -> u32 {
        self.inner.attempts.load(Ordering::SeqCst)
    }

    pub fn subscriptions(&self, channel: Channel) -> ChannelSubscription {
        lock(&self.inner.registry)
            .get(&channel)
            .cloned()
            .unwrap_or_default()
    }

    /// Open the connection and start listening
    ///
    /// Does nothing while a connection is open or being (re)established. A
    /// failed handshake is returned to the caller and not retried.
    ///
    /// A [`disconnect`](Self::disconnect) issued while the handshake is in
    /// flight wins: the new connection is closed and the client stays
    /// disconnected.
    pub async fn connect(&self) -> Result<()> {
        let generation = {
            let mut state = lock(&self.inner.state);
            if *state != ConnectionState::Disconnected {
                return Ok(());
            }
            *state = ConnectionState::Connecting;
            self.inner.generation.load(Ordering::SeqCst)
        };
        self.inner
            .reconnect_enabled
            .store(self.inner.config.reconnect, Ordering::SeqCst);

        let source = match self.inner.open(generation).await {
            Ok(Some(source)) => source,
            Ok(None) => return Ok(()),
            Err(e) => {
                if self.inner.is_current(generation) {
                    self.inner.set_state(ConnectionState::Disconnected);
                }
                return Err(e);
            }
        };
        info!(url = %self.inner.config.url, "stream connected");

        let handle = tokio::spawn(listen(self.inner.clone(), source));
        if let Some(previous) = lock(&self.inner.listener).replace(handle) {
            previous.abort();
        }
        // A disconnect that ran before the handle was stored did not see it.
        if !self.inner.is_current(generation) {
            if let Some(handle) = lock(&self.inner.listener).take() {
                handle.abort();
            }
        }
        Ok(())
    }

    /// Close the connection and stop reconnecting
    ///
    /// Valid in every state, including while a handshake is in flight.
    pub async fn disconnect(&self) {
        self.inner.reconnect_enabled.store(false, Ordering::SeqCst);
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
        let listener = lock(&self.inner.listener).take();
        if let Some(listener) = listener {
            listener.abort();
        }
        if let Some(mut sink) = self.inner.writer.lock().await.take() {
            if let Err(e) = sink.close().await {
                debug!(error = %e, "error closing stream");
            }
        }
        self.inner.set_state(ConnectionState::Disconnected);
        info!(url = %self.inner.config.url, "stream disconnected");
    }

    pub async fn subscribe(&self, channel: Channel, tickers: Vec<String>) -> Result<()> {
        if tickers.is_empty() {
            return Err(Error::InvalidParameter(
                "at least one ticker is required".to_string(),
            ));
        }
        self.inner
            .send(&ControlMessage::subscribe(channel, tickers.clone()))
            .await?;
        lock(&self.inner.registry)
            .entry(channel)
            .or_default()
            .tickers
            .extend(tickers);
        Ok(())
    }

    pub async fn subscribe_all(&self, channel: Channel) -> Result<()> {
        self.inner
            .send(&ControlMessage::subscribe_all(channel))
            .await?;
        lock(&self.inner.registry).entry(channel).or_default().all = true;
        Ok(())
    }

    /// Unsubscribe the given tickers, or everything on `channel` when `None`
    /// or empty
    pub async fn unsubscribe(&self, channel: Channel, tickers: Option<Vec<String>>) -> Result<()> {
        match tickers.filter(|t| !t.is_empty()) {
            Some(tickers) => {
                self.inner
                    .send(&ControlMessage::unsubscribe(channel, tickers.clone()))
                    .await?;
                let mut registry = lock(&self.inner.registry);
                if let Some(entry) = registry.get_mut(&channel) {
                    for ticker in &tickers {
                        entry.tickers.remove(ticker);
                    }
                    if entry.is_empty() {
                        registry.remove(&channel);
                    }
                }
            }
            None => {
                self.inner
                    .send(&ControlMessage::unsubscribe_all(channel))
                    .await?;
                lock(&self.inner.registry).remove(&channel);
            }
        }
        Ok(())
    }

    pub async fn subscribe_prices(&self, tickers: Vec<String>) -> Result<()> {
        self.subscribe(Channel::Prices, tickers).await
    }

    pub async fn subscribe_all_prices(&self) -> Result<()> {
        self.subscribe_all(Channel::Prices).await
    }

    pub async fn subscribe_trades(&self, tickers: Vec<String>) -> Result<()> {
        self.subscribe(Channel::Trades, tickers).await
    }

    pub async fn subscribe_all_trades(&self) -> Result<()> {
        self.subscribe_all(Channel::Trades).await
    }

    pub async fn subscribe_orderbook(&self, tickers: Vec<String>) -> Result<()> {
        self.subscribe(Channel::Orderbook, tickers).await
    }

    pub async fn subscribe_all_orderbook(&self) -> Result<()> {
        self.subscribe_all(Channel::Orderbook).await
    }

    pub fn on_price<F>(&self, callback: F) -> Disposer
    where
        F: Fn(&PriceUpdate) + Send + Sync + 'static,
    {
        self.inner.callbacks.prices.register(callback)
    }

    pub fn on_trade<F>(&self, callback: F) -> Disposer
    where
        F: Fn(&TradeUpdate) + Send + Sync + 'static,
    {
        self.inner.callbacks.trades.register(callback)
    }

    pub fn on_orderbook<F>(&self, callback: F) -> Disposer
    where
        F: Fn(&OrderbookUpdate) + Send + Sync + 'static,
    {
        self.inner.callbacks.orderbook.register(callback)
    }

    /// Undecodable frames, transport errors and reconnect exhaustion
    pub fn on_error<F>(&self, callback: F) -> Disposer
    where
        F: Fn(&Error) + Send + Sync + 'static,
    {
        self.inner.callbacks.errors.register(callback)
    }

    pub fn on_close<F>(&self, callback: F) -> Disposer
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.inner.callbacks.close.register(move |_: &()| callback())
    }
}

impl Inner {
    fn set_state(&self, state: ConnectionState) {
        *lock(&self.state) = state;
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Handshake, install the writer and mark the connection open
    ///
    /// Returns `None`, after closing the fresh connection, when a disconnect
    /// happened since `generation` was read.
    async fn open(&self, generation: u64) -> Result<Option<WsSource>> {
        let (ws, _) = connect_async(self.config.url.as_str()).await?;
        let (mut sink, source) = ws.split();
        let mut writer = self.writer.lock().await;
        if !self.is_current(generation) {
            drop(writer);
            debug!(url = %self.config.url, "handshake finished after disconnect, closing");
            if let Err(e) = sink.close().await {
                debug!(error = %e, "error closing stream");
            }
            return Ok(None);
        }
        *writer = Some(sink);
        self.attempts.store(0, Ordering::SeqCst);
        self.set_state(ConnectionState::Connected);
        Ok(Some(source))
    }

    async fn send(&self, message: &ControlMessage) -> Result<()> {
        if *lock(&self.state) != ConnectionState::Connected {
            return Err(Error::NotConnected);
        }
        let text = serde_json::to_string(message)?;
        let mut writer = self.writer.lock().await;
        let sink = writer.as_mut().ok_or(Error::NotConnected)?;
        sink.send(Message::Text(text)).await?;
        debug!(channel = message.channel.as_str(), action = ?message.action, "sent control frame");
        Ok(())
    }

    async fn replay_subscriptions(&self) -> Result<()> {
        let messages: Vec<ControlMessage> = lock(&self.registry)
            .iter()
            .flat_map(|(channel, subscription)| subscription.replay_messages(*channel))
            .collect();
        for message in &messages {
            self.send(message).await?;
        }
        Ok(())
    }

    fn dispatch(&self, update: StreamUpdate) {
        match update {
            StreamUpdate::Price(update) => self.callbacks.prices.dispatch(&update),
            StreamUpdate::Trade(update) => self.callbacks.trades.dispatch(&update),
            StreamUpdate::Orderbook(update) => self.callbacks.orderbook.dispatch(&update),
        }
    }

    /// Read until the transport closes; returns the transport error, if any
    async fn read(&self, source: &mut WsSource) -> Option<Error> {
        while let Some(message) = source.next().await {
            match message {
                Ok(Message::Close(frame)) => {
                    debug!(?frame, "close frame received");
                    return None;
                }
                Ok(message) => match decode_message(message) {
                    Ok(Some(update)) => self.dispatch(update),
                    Ok(None) => {}
                    Err(e) => self.callbacks.errors.dispatch(&e),
                },
                Err(e) => return Some(e.into()),
            }
        }
        None
    }

    /// Wait-and-retry loop; `None` once reconnection is disabled or exhausted
    async fn reconnect(&self) -> Option<WsSource> {
        let generation = self.generation.load(Ordering::SeqCst);
        let max_attempts = self.config.max_reconnect_attempts;
        let mut last_error = String::from("connection closed");
        loop {
            if !self.reconnect_enabled.load(Ordering::SeqCst) {
                self.set_state(ConnectionState::Disconnected);
                return None;
            }
            let attempts = self.attempts.load(Ordering::SeqCst);
            if attempts >= max_attempts {
                error!(attempts, url = %self.config.url, "max reconnection attempts reached");
                self.set_state(ConnectionState::Disconnected);
                self.callbacks.errors.dispatch(&Error::ReconnectFailed {
                    attempts,
                    last_error,
                });
                return None;
            }

            self.set_state(ConnectionState::Reconnecting);
            let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
            warn!(
                attempt,
                max_attempts,
                delay_ms = self.config.reconnect_interval.as_millis() as u64,
                "reconnecting stream"
            );
            tokio::time::sleep(self.config.reconnect_interval).await;

            self.set_state(ConnectionState::Connecting);
            match self.open(generation).await {
                Ok(None) => return None,
                Ok(Some(source)) => {
                    info!(attempt, url = %self.config.url, "stream reconnected");
                    if let Err(e) = self.replay_subscriptions().await {
                        warn!(error = %e, "failed to restore subscriptions");
                        self.callbacks.errors.dispatch(&e);
                    }
                    return Some(source);
                }
                Err(e) => {
                    debug!(attempt, error = %e, "reconnection attempt failed");
                    last_error = e.to_string();
                }
            }
        }
    }
}

/// The single background task of a connection: read, then recover
async fn listen(inner: Arc<Inner>, mut source: WsSource) {
    loop {
        match inner.read(&mut source).await {
            None => {
                info!(url = %inner.config.url, "stream closed");
                inner.callbacks.close.dispatch(&());
            }
            Some(e) => {
                warn!(error = %e, "stream transport error");
                inner.callbacks.errors.dispatch(&e);
            }
        }
        inner.writer.lock().await.take();

        match inner.reconnect().await {
            Some(next) => source = next,
            None => return,
        }
    }
}
