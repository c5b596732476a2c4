use std::time::Duration;

use tokio_tungstenite::tungstenite::Message;
use tracing::debug;

use crate::config::WEBSOCKET_URL;
use crate::error::{Error, Result};
use crate::types::{Channel, StreamUpdate};

/// Streaming connection and reconnection settings
#[derive(Debug, Clone, PartialEq)]
pub struct StreamConfig {
    pub url: String,
    /// Reconnect automatically after the transport drops
    pub reconnect: bool,
    /// Fixed wait before every reconnection attempt
    pub reconnect_interval: Duration,
    /// Consecutive failed attempts before giving up
    pub max_reconnect_attempts: u32,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            url: WEBSOCKET_URL.to_string(),
            reconnect: true,
            reconnect_interval: Duration::from_secs(5),
            max_reconnect_attempts: 10,
        }
    }
}

impl StreamConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_reconnect(mut self, reconnect: bool) -> Self {
        self.reconnect = reconnect;
        self
    }

    pub fn with_reconnect_interval(mut self, interval: Duration) -> Self {
        self.reconnect_interval = interval;
        self
    }

    pub fn with_max_reconnect_attempts(mut self, attempts: u32) -> Self {
        self.max_reconnect_attempts = attempts;
        self
    }
}

/// Decode one inbound data frame
///
/// Returns `Ok(None)` for frames that carry no update: empty text, text
/// `ping`/`pong` keep-alives and control frames.
pub(crate) fn decode_message(msg: Message) -> Result<Option<StreamUpdate>> {
    match msg {
        Message::Text(text) => decode_text(&text),
        Message::Binary(bytes) => {
            let text = String::from_utf8(bytes)
                .map_err(|e| Error::WebSocket(format!("binary frame is not UTF-8: {}", e)))?;
            decode_text(&text)
        }
        Message::Ping(_) | Message::Pong(_) | Message::Frame(_) | Message::Close(_) => Ok(None),
    }
}

fn decode_text(text: &str) -> Result<Option<StreamUpdate>> {
    let trimmed = text.trim();
    if trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("ping")
        || trimmed.eq_ignore_ascii_case("pong")
    {
        return Ok(None);
    }

    let value: serde_json::Value = serde_json::from_str(trimmed).map_err(|e| {
        debug!(frame = %preview(trimmed), "undecodable stream frame");
        Error::Json(e)
    })?;

    let channel = value
        .get("channel")
        .and_then(serde_json::Value::as_str)
        .unwrap_or_default();
    if Channel::from_wire(channel).is_none() {
        return Err(Error::UnknownChannel(channel.to_string()));
    }

    serde_json::from_value(value).map(Some).map_err(|e| {
        debug!(frame = %preview(trimmed), "stream frame does not match its channel schema");
        Error::Json(e)
    })
}

fn preview(text: &str) -> String {
    text.chars().take(200).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keepalives_are_ignored() {
        for text in ["", "  ", "ping", "PONG"] {
            assert!(decode_message(Message::Text(text.to_string()))
                .unwrap()
                .is_none());
        }
        assert!(decode_message(Message::Ping(vec![1])).unwrap().is_none());
    }

    #[test]
    fn test_price_frame_decodes() {
        let text = r#"{"channel":"prices","ticker":"M1","timestamp":1,"yesPrice":0.6,"noPrice":0.4}"#;
        match decode_message(Message::Text(text.to_string())).unwrap() {
            Some(StreamUpdate::Price(update)) => {
                assert_eq!(update.ticker, "M1");
                assert_eq!(update.yes_price, 0.6);
                assert!(update.yes_bid.is_none());
            }
            other => panic!("unexpected decode: {:?}", other),
        }
    }

    #[test]
    fn test_binary_frame_decodes_as_text() {
        let bytes = br#"{"channel":"trades","ticker":"M1","timestamp":1,"side":"no","price":0.3,"quantity":1,"tradeId":"t"}"#;
        let update = decode_message(Message::Binary(bytes.to_vec()))
            .unwrap()
            .unwrap();
        assert_eq!(update.channel(), Channel::Trades);
    }

    #[test]
    fn test_unknown_or_missing_channel() {
        let err = decode_message(Message::Text(r#"{"channel":"fills"}"#.to_string())).unwrap_err();
        assert!(matches!(err, Error::UnknownChannel(ref c) if c == "fills"));

        let err = decode_message(Message::Text(r#"{"ticker":"M1"}"#.to_string())).unwrap_err();
        assert!(matches!(err, Error::UnknownChannel(ref c) if c.is_empty()));
    }

    #[test]
    fn test_schema_mismatch_is_json_error() {
        let err = decode_message(Message::Text(r#"{"channel":"prices","ticker":"M1"}"#.to_string()))
            .unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }
}
