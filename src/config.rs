//! Endpoints, protocol constants and client configuration.

use std::time::Duration;

use crate::error::{Error, Result};

/// Development metadata API (no API key required)
pub const METADATA_API_BASE_URL: &str = "https://dev-prediction-markets-api.dflow.net/api/v1";

/// Development trade API (no API key required)
pub const TRADE_API_BASE_URL: &str = "https://dev-quote-api.dflow.net";

/// Development streaming endpoint
pub const WEBSOCKET_URL: &str = "wss://dev-prediction-markets-api.dflow.net/api/v1/ws";

/// Production metadata API (API key required)
pub const PROD_METADATA_API_BASE_URL: &str = "https://prediction-markets-api.dflow.net/api/v1";

/// Production trade API (API key required)
pub const PROD_TRADE_API_BASE_URL: &str = "https://quote-api.dflow.net";

/// Production streaming endpoint
pub const PROD_WEBSOCKET_URL: &str = "wss://prediction-markets-api.dflow.net/api/v1/ws";

/// Proof KYC verification API, shared by every environment
pub const PROOF_API_BASE_URL: &str = "https://proof.dflow.net";

/// Page users are sent to for Proof KYC verification
pub const PROOF_DEEP_LINK_BASE_URL: &str = "https://dflow.net/proof";

/// Prefix of the message a wallet signs to prove ownership
pub const PROOF_SIGNATURE_MESSAGE_PREFIX: &str = "Proof KYC verification: ";

/// USDC mint on Solana mainnet, the default settlement currency
pub const USDC_MINT: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";

/// Wrapped SOL mint
pub const SOL_MINT: &str = "So11111111111111111111111111111111111111112";

/// Default slippage tolerance in basis points (0.5%)
pub const DEFAULT_SLIPPAGE_BPS: u32 = 50;

/// Decimal places used by every YES/NO outcome token
pub const OUTCOME_TOKEN_DECIMALS: u8 = 6;

/// Maximum tickers + mints in one batch request
pub const MAX_BATCH_SIZE: usize = 100;

/// Maximum addresses accepted by `filter_outcome_mints`
pub const MAX_FILTER_ADDRESSES: usize = 200;

/// Maximum milestone ids accepted by the live data endpoint
pub const MAX_MILESTONE_IDS: usize = 100;

/// Header carrying the API key
pub const API_KEY_HEADER: &str = "x-api-key";

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn metadata_url(&self) -> &'static str {
        match self {
            Environment::Development => METADATA_API_BASE_URL,
            Environment::Production => PROD_METADATA_API_BASE_URL,
        }
    }

    pub fn trade_url(&self) -> &'static str {
        match self {
            Environment::Development => TRADE_API_BASE_URL,
            Environment::Production => PROD_TRADE_API_BASE_URL,
        }
    }

    pub fn ws_url(&self) -> &'static str {
        match self {
            Environment::Development => WEBSOCKET_URL,
            Environment::Production => PROD_WEBSOCKET_URL,
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(Error::Config(format!("unknown environment: {}", other))),
        }
    }
}

/// Configuration for [`DFlowClient`](crate::DFlowClient)
///
/// Explicit URLs take precedence over the ones derived from `environment`.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub environment: Environment,
    pub api_key: Option<String>,
    pub metadata_base_url: Option<String>,
    pub trade_base_url: Option<String>,
    pub ws_url: Option<String>,
    pub proof_base_url: Option<String>,
    /// Per-request timeout for both REST surfaces
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Development,
            api_key: None,
            metadata_base_url: None,
            trade_base_url: None,
            ws_url: None,
            proof_base_url: None,
            timeout: Duration::from_secs(30),
        }
    }
}

impl ClientConfig {
    /// Production configuration with the given API key
    pub fn production(api_key: impl Into<String>) -> Self {
        Self {
            environment: Environment::Production,
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }

    /// Build a configuration from `DFLOW_*` environment variables
    ///
    /// Recognized: `DFLOW_ENVIRONMENT`, `DFLOW_API_KEY`, `DFLOW_METADATA_URL`,
    /// `DFLOW_TRADE_URL`, `DFLOW_WS_URL`, `DFLOW_PROOF_URL`, `DFLOW_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Some(env) = read_var("DFLOW_ENVIRONMENT") {
            config.environment = env.parse()?;
        }
        config.api_key = read_var("DFLOW_API_KEY");
        config.metadata_base_url = read_var("DFLOW_METADATA_URL");
        config.trade_base_url = read_var("DFLOW_TRADE_URL");
        config.ws_url = read_var("DFLOW_WS_URL");
        config.proof_base_url = read_var("DFLOW_PROOF_URL");
        if let Some(secs) = read_var("DFLOW_TIMEOUT_SECS") {
            let secs: u64 = secs
                .parse()
                .map_err(|_| Error::Config(format!("invalid DFLOW_TIMEOUT_SECS: {}", secs)))?;
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_metadata_url(mut self, url: impl Into<String>) -> Self {
        self.metadata_base_url = Some(url.into());
        self
    }

    pub fn with_trade_url(mut self, url: impl Into<String>) -> Self {
        self.trade_base_url = Some(url.into());
        self
    }

    pub fn with_ws_url(mut self, url: impl Into<String>) -> Self {
        self.ws_url = Some(url.into());
        self
    }

    pub fn with_proof_url(mut self, url: impl Into<String>) -> Self {
        self.proof_base_url = Some(url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn resolved_metadata_url(&self) -> &str {
        self.metadata_base_url
            .as_deref()
            .unwrap_or_else(|| self.environment.metadata_url())
    }

    pub fn resolved_trade_url(&self) -> &str {
        self.trade_base_url
            .as_deref()
            .unwrap_or_else(|| self.environment.trade_url())
    }

    pub fn resolved_ws_url(&self) -> &str {
        self.ws_url
            .as_deref()
            .unwrap_or_else(|| self.environment.ws_url())
    }

    pub fn resolved_proof_url(&self) -> &str {
        self.proof_base_url.as_deref().unwrap_or(PROOF_API_BASE_URL)
    }
}

fn read_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
