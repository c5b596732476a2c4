use serde::{Deserialize, Serialize};

/// Token supported by the trade API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub mint: String,
    pub symbol: String,
    pub name: String,
    #[serde(default, alias = "logo_uri")]
    pub logo_uri: Option<String>,
}

/// Token with its decimal precision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenWithDecimals {
    #[serde(flatten)]
    pub token: Token,
    pub decimals: u8,
}

/// Trading venue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Venue {
    pub id: String,
    pub name: String,
    pub label: String,
}
