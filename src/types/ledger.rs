use serde::{Deserialize, Serialize};

use super::markets::Market;

/// Confirmation level of a transaction, ordered from weakest to strongest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Commitment {
    Processed,
    Confirmed,
    Finalized,
}

impl Commitment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Commitment::Processed => "processed",
            Commitment::Confirmed => "confirmed",
            Commitment::Finalized => "finalized",
        }
    }

    /// Whether an observed level satisfies this requested level
    pub fn is_satisfied_by(&self, observed: Commitment) -> bool {
        observed >= *self
    }
}

/// Status of a submitted signature as reported by the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureStatus {
    pub slot: u64,
    pub confirmation_status: Option<Commitment>,
    /// On-chain error, if the transaction failed
    pub err: Option<String>,
}

/// Transaction that reached the requested confirmation level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionConfirmation {
    pub signature: String,
    pub slot: u64,
    pub confirmation_status: Commitment,
    pub err: Option<String>,
}

/// Fungible token balance held by a wallet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenBalance {
    pub mint: String,
    /// Balance in base units
    pub raw_balance: String,
    /// Balance adjusted for `decimals`
    pub balance: f64,
    pub decimals: u8,
}

/// Which side of a market a token represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PositionKind {
    Yes,
    No,
    Unknown,
}

/// User's holding of one outcome token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPosition {
    pub mint: String,
    pub balance: f64,
    pub decimals: u8,
    pub position: PositionKind,
    pub market: Option<Market>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commitment_ordering() {
        assert!(Commitment::Confirmed.is_satisfied_by(Commitment::Finalized));
        assert!(Commitment::Confirmed.is_satisfied_by(Commitment::Confirmed));
        assert!(!Commitment::Confirmed.is_satisfied_by(Commitment::Processed));
        assert!(Commitment::Processed.is_satisfied_by(Commitment::Processed));
    }
}
