//! Ledger boundary: signing, submission, confirmation and position tracking.
//!
//! The crate does not talk to the ledger itself. Callers provide a
//! [`LedgerClient`] (transaction submission and signature status), an
//! [`AccountScanner`] (token balances of a wallet) and a [`TransactionSigner`];
//! the helpers here compose them with the metadata API.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use rust_decimal::Decimal;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::client::MarketsClient;
use crate::config::{MAX_BATCH_SIZE, MAX_FILTER_ADDRESSES};
use crate::error::{Error, Result};
use crate::types::{
    Commitment, Market, MarketResult, PositionKind, RedemptionStatus, SignatureStatus,
    TokenBalance, TransactionConfirmation, UserPosition,
};

/// Scalar outcome percentages are expressed in basis points of this value
const SCALAR_BASIS: u32 = 10_000;

/// Signs serialized transactions for one wallet
pub trait TransactionSigner: Send + Sync {
    fn public_key(&self) -> String;

    /// Sign a serialized transaction and return the signed bytes
    fn sign_transaction(&self, transaction: &[u8]) -> Result<Vec<u8>>;
}

/// Transaction submission and status lookups
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Submit a signed transaction; returns its signature
    async fn send_transaction(&self, signed_transaction: &[u8]) -> Result<String>;

    /// Current status of a signature, `None` while the ledger has not seen it
    async fn signature_status(&self, signature: &str) -> Result<Option<SignatureStatus>>;
}

/// Token holdings of a wallet, across every token program
#[async_trait]
pub trait AccountScanner: Send + Sync {
    async fn token_balances(&self, wallet: &str) -> Result<Vec<TokenBalance>>;
}

/// Outcome mint and market lookups used to enrich positions
///
/// Implemented by [`MarketsClient`].
#[async_trait]
pub trait MarketDirectory: Send + Sync {
    async fn filter_outcome_mints(&self, addresses: &[String]) -> Result<Vec<String>>;

    async fn markets_by_mints(&self, mints: &[String]) -> Result<Vec<Market>>;
}

#[async_trait]
impl MarketDirectory for MarketsClient {
    async fn filter_outcome_mints(&self, addresses: &[String]) -> Result<Vec<String>> {
        MarketsClient::filter_outcome_mints(self, addresses).await
    }

    async fn markets_by_mints(&self, mints: &[String]) -> Result<Vec<Market>> {
        self.get_markets_batch(&[], mints).await
    }
}

/// How long and how often [`wait_for_confirmation`] polls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmOptions {
    pub commitment: Commitment,
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for ConfirmOptions {
    fn default() -> Self {
        Self {
            commitment: Commitment::Confirmed,
            timeout: Duration::from_millis(60_000),
            poll_interval: Duration::from_secs(2),
        }
    }
}

impl ConfirmOptions {
    pub fn with_commitment(mut self, commitment: Commitment) -> Self {
        self.commitment = commitment;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

/// Decode a base64 transaction from an API response, sign it and submit it
pub async fn sign_and_send_transaction<L, S>(
    ledger: &L,
    transaction_base64: &str,
    signer: &S,
) -> Result<String>
where
    L: LedgerClient + ?Sized,
    S: TransactionSigner + ?Sized,
{
    let transaction = STANDARD.decode(transaction_base64.trim())?;
    let signed = signer.sign_transaction(&transaction)?;
    let signature = ledger.send_transaction(&signed).await?;
    info!(signature = %signature, signer = %signer.public_key(), "transaction sent");
    Ok(signature)
}

/// Poll until `signature` reaches `options.commitment`
///
/// An on-chain error fails immediately with [`Error::TransactionFailed`];
/// running out of time fails with [`Error::Timeout`].
pub async fn wait_for_confirmation<L>(
    ledger: &L,
    signature: &str,
    options: &ConfirmOptions,
) -> Result<TransactionConfirmation>
where
    L: LedgerClient + ?Sized,
{
    let start = Instant::now();
    while start.elapsed() < options.timeout {
        if let Some(status) = ledger.signature_status(signature).await? {
            if let Some(err) = status.err {
                return Err(Error::TransactionFailed(err));
            }
            if let Some(observed) = status.confirmation_status {
                if options.commitment.is_satisfied_by(observed) {
                    debug!(signature, slot = status.slot, status = observed.as_str(), "confirmed");
                    return Ok(TransactionConfirmation {
                        signature: signature.to_string(),
                        slot: status.slot,
                        confirmation_status: observed,
                        err: None,
                    });
                }
            }
        }
        tokio::time::sleep(options.poll_interval).await;
    }

    Err(Error::Timeout(format!(
        "transaction confirmation after {}ms",
        options.timeout.as_millis()
    )))
}

/// [`sign_and_send_transaction`] followed by [`wait_for_confirmation`]
pub async fn sign_send_and_confirm<L, S>(
    ledger: &L,
    transaction_base64: &str,
    signer: &S,
    options: &ConfirmOptions,
) -> Result<TransactionConfirmation>
where
    L: LedgerClient + ?Sized,
    S: TransactionSigner + ?Sized,
{
    let signature = sign_and_send_transaction(ledger, transaction_base64, signer).await?;
    wait_for_confirmation(ledger, &signature, options).await
}

/// Prediction market positions held by `wallet`
///
/// Zero balances are dropped. Outcome mints are identified 200 addresses at a
/// time and their markets loaded 100 mints at a time.
pub async fn get_user_positions<A, M>(
    scanner: &A,
    markets: &M,
    wallet: &str,
) -> Result<Vec<UserPosition>>
where
    A: AccountScanner + ?Sized,
    M: MarketDirectory + ?Sized,
{
    let balances: Vec<TokenBalance> = scanner
        .token_balances(wallet)
        .await?
        .into_iter()
        .filter(|b| b.balance > 0.0)
        .collect();
    if balances.is_empty() {
        return Ok(Vec::new());
    }

    let all_mints: Vec<String> = balances.iter().map(|b| b.mint.clone()).collect();
    let mut outcome_mints = Vec::new();
    for chunk in all_mints.chunks(MAX_FILTER_ADDRESSES) {
        outcome_mints.extend(markets.filter_outcome_mints(chunk).await?);
    }
    if outcome_mints.is_empty() {
        return Ok(Vec::new());
    }

    let mut found = Vec::new();
    for chunk in outcome_mints.chunks(MAX_BATCH_SIZE) {
        found.extend(markets.markets_by_mints(chunk).await?);
    }

    let outcome_set: HashSet<&str> = outcome_mints.iter().map(String::as_str).collect();
    let held: Vec<TokenBalance> = balances
        .into_iter()
        .filter(|b| outcome_set.contains(b.mint.as_str()))
        .collect();
    debug!(wallet, positions = held.len(), markets = found.len(), "positions resolved");
    Ok(classify_positions(&held, &found))
}

/// Label each outcome token balance with its side and market
///
/// Balances whose mint belongs to no market, or only to a market ledger, are
/// [`PositionKind::Unknown`].
pub fn classify_positions(balances: &[TokenBalance], markets: &[Market]) -> Vec<UserPosition> {
    let mut by_mint: HashMap<&str, &Market> = HashMap::new();
    for market in markets {
        for mint in market.mints() {
            by_mint.insert(mint, market);
        }
    }

    balances
        .iter()
        .map(|token| {
            let market = by_mint.get(token.mint.as_str()).copied();
            let position = market.map_or(PositionKind::Unknown, |m| side_of(m, &token.mint));
            UserPosition {
                mint: token.mint.clone(),
                balance: token.balance,
                decimals: token.decimals,
                position,
                market: market.cloned(),
            }
        })
        .collect()
}

fn side_of(market: &Market, mint: &str) -> PositionKind {
    if market.accounts.values().any(|a| a.yes_mint == mint) {
        PositionKind::Yes
    } else if market.accounts.values().any(|a| a.no_mint == mint) {
        PositionKind::No
    } else {
        PositionKind::Unknown
    }
}

/// Whether `outcome_mint` can be redeemed now
///
/// Requires a settled market, an open redemption window and either the
/// winning side or a scalar outcome.
pub fn is_redemption_eligible(market: &Market, outcome_mint: &str) -> bool {
    if !market.status.is_settled() {
        return false;
    }
    market
        .accounts
        .values()
        .filter(|a| a.redemption_status == RedemptionStatus::Open)
        .any(|a| match market.result {
            MarketResult::Yes => a.yes_mint == outcome_mint,
            MarketResult::No => a.no_mint == outcome_mint,
            MarketResult::Unresolved => {
                a.scalar_outcome_pct.is_some() && a.holds_mint(outcome_mint)
            }
        })
}

/// Payout of `amount` scalar outcome tokens, in settlement tokens
///
/// YES pays `pct / 10000`, NO pays the complement. Zero when the mint has no
/// scalar outcome; `None` if the product does not fit in a [`Decimal`].
pub fn calculate_scalar_payout(
    market: &Market,
    outcome_mint: &str,
    amount: Decimal,
) -> Option<Decimal> {
    let basis = Decimal::from(SCALAR_BASIS);
    for account in market.accounts.values() {
        let Some(pct) = account.scalar_outcome_pct else {
            continue;
        };
        let pct = pct.min(SCALAR_BASIS);
        let share = if account.yes_mint == outcome_mint {
            Decimal::from(pct)
        } else if account.no_mint == outcome_mint {
            Decimal::from(SCALAR_BASIS - pct)
        } else {
            continue;
        };
        return amount.checked_mul(share.checked_div(basis)?);
    }
    Some(Decimal::ZERO)
}
