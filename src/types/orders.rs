use serde::{Deserialize, Serialize};

use super::trades::deserialize_unix_time;

/// Whether an order settles in the returned transaction or asynchronously
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    Sync,
    Async,
}

/// Order lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OrderStatus {
    Open,
    Closed,
    Failed,
    PendingClose,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Open => "open",
            OrderStatus::Closed => "closed",
            OrderStatus::Failed => "failed",
            OrderStatus::PendingClose => "pendingClose",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Closed | OrderStatus::Failed)
    }
}

/// Which side of an intent is fixed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntentMode {
    ExactIn,
    ExactOut,
}

impl IntentMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntentMode::ExactIn => "ExactIn",
            IntentMode::ExactOut => "ExactOut",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityFeeType {
    Exact,
    Max,
}

/// Priority fee attached to swap and intent transactions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityFee {
    #[serde(rename = "type")]
    pub fee_type: PriorityFeeType,
    pub amount: u64,
}

/// Order transaction returned by `/order`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub transaction: String,
    pub in_amount: String,
    pub out_amount: String,
    pub execution_mode: ExecutionMode,
    #[serde(default)]
    pub price_impact_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderFill {
    pub input_mint: String,
    pub output_mint: String,
    pub in_amount: String,
    pub out_amount: String,
    pub price: f64,
    #[serde(deserialize_with = "deserialize_unix_time")]
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusResponse {
    pub status: OrderStatus,
    pub signature: String,
    #[serde(default)]
    pub in_amount: Option<String>,
    #[serde(default)]
    pub out_amount: Option<String>,
    #[serde(default)]
    pub fills: Option<Vec<OrderFill>>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapInfo {
    pub amm_key: String,
    pub label: String,
    pub input_mint: String,
    pub output_mint: String,
    pub in_amount: String,
    pub out_amount: String,
    pub fee_amount: String,
    pub fee_mint: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutePlanStep {
    pub swap_info: SwapInfo,
    pub percent: u8,
}

/// Swap quote; sent back verbatim as `quoteResponse` when building a swap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapQuote {
    pub input_mint: String,
    pub output_mint: String,
    pub in_amount: String,
    pub out_amount: String,
    pub price_impact_pct: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_plan: Option<Vec<RoutePlanStep>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapResponse {
    pub swap_transaction: String,
    #[serde(default)]
    pub last_valid_block_height: Option<u64>,
    #[serde(default)]
    pub prioritization_fee_lamports: Option<u64>,
    #[serde(default)]
    pub compute_unit_limit: Option<u64>,
    #[serde(default)]
    pub prioritization_type: Option<String>,
    #[serde(default)]
    pub quote: Option<SwapQuote>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedAccountMeta {
    pub pubkey: String,
    pub is_signer: bool,
    pub is_writable: bool,
}

/// Instruction with base64 data, for composing custom transactions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedInstruction {
    pub program_id: String,
    pub accounts: Vec<SerializedAccountMeta>,
    pub data: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapInstructionsResponse {
    #[serde(default)]
    pub setup_instructions: Vec<SerializedInstruction>,
    pub swap_instruction: SerializedInstruction,
    #[serde(default)]
    pub cleanup_instruction: Option<SerializedInstruction>,
    #[serde(default)]
    pub address_lookup_table_addresses: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentQuote {
    pub input_mint: String,
    pub output_mint: String,
    pub in_amount: String,
    pub out_amount: String,
    pub min_out_amount: String,
    pub max_in_amount: String,
    pub expires_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentResponse {
    pub transaction: String,
    pub intent_id: String,
    pub quote: IntentQuote,
}

/// Transaction creating the YES/NO mints of an uninitialized market
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionMarketInitResponse {
    pub transaction: String,
    pub yes_mint: String,
    pub no_mint: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_decodes_pending_close() {
        let status: OrderStatusResponse = serde_json::from_str(
            r#"{"status":"pendingClose","signature":"sig","fills":[{"inputMint":"A",
                "outputMint":"B","inAmount":"1","outAmount":"2","price":0.5,"timestamp":"17"}]}"#,
        )
        .unwrap();
        assert_eq!(status.status, OrderStatus::PendingClose);
        assert!(!status.status.is_terminal());
        assert_eq!(status.fills.unwrap()[0].timestamp, 17);
    }

    #[test]
    fn test_priority_fee_wire_shape() {
        let fee = PriorityFee {
            fee_type: PriorityFeeType::Max,
            amount: 10_000,
        };
        assert_eq!(
            serde_json::to_value(fee).unwrap(),
            serde_json::json!({ "type": "max", "amount": 10000 })
        );
    }
}
