//! Real-time streaming of prices, trades and orderbook changes.
//!
//! [`StreamClient`] keeps a single WebSocket connection, fans decoded updates
//! out to registered callbacks and re-establishes the connection after the
//! transport drops, restoring every active subscription.
//!
//! # Connection Management
//!
//! Reconnection uses a fixed interval between attempts (see [`StreamConfig`]).
//! Once `max_reconnect_attempts` consecutive attempts fail the client stays
//! disconnected and reports [`crate::Error::ReconnectFailed`] to error
//! listeners. Call [`StreamClient::connect`] again to start over.

mod callbacks;
mod client;
mod stream;

pub use callbacks::Disposer;
pub use client::{ChannelSubscription, ConnectionState, StreamClient};
pub use stream::StreamConfig;

pub use crate::types::{
    Channel, ControlAction, ControlMessage, OrderbookUpdate, PriceLevel, PriceUpdate,
    StreamUpdate, TradeUpdate,
};
