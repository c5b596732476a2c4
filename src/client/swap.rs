use std::sync::Arc;

use tracing::debug;

use crate::error::Result;
use crate::http::HttpClient;
use crate::request::{IntentParams, QuoteParams, SubmitIntentParams, SwapParams};
use crate::types::{
    IntentQuote, IntentResponse, SwapInstructionsResponse, SwapQuote, SwapResponse,
};

/// Client for imperative swaps: quote, then build a transaction or its instructions
#[derive(Debug, Clone)]
pub struct SwapClient {
    http: Arc<HttpClient>,
}

impl SwapClient {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    pub async fn get_quote(&self, params: &QuoteParams) -> Result<SwapQuote> {
        self.http.get("/quote", &params.to_query_params()).await
    }

    /// Quote `params.quote`, then build the swap transaction for it
    pub async fn create_swap(&self, params: &SwapParams) -> Result<SwapResponse> {
        let quote = self.get_quote(&params.quote).await?;
        debug!(in_amount = %quote.in_amount, out_amount = %quote.out_amount, "swap quoted");
        self.http.post("/swap", &params.body(&quote)).await
    }

    /// Quote `params.quote`, then fetch the individual swap instructions
    pub async fn get_swap_instructions(
        &self,
        params: &SwapParams,
    ) -> Result<SwapInstructionsResponse> {
        let quote = self.get_quote(&params.quote).await?;
        self.http
            .post("/swap-instructions", &params.body(&quote))
            .await
    }
}

/// Client for declarative (intent) swaps
#[derive(Debug, Clone)]
pub struct IntentClient {
    http: Arc<HttpClient>,
}

impl IntentClient {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    pub async fn get_intent_quote(&self, params: &IntentParams) -> Result<IntentQuote> {
        self.http.get("/intent", &params.to_query_params()).await
    }

    /// Quote `params.intent`, then submit it for execution
    pub async fn submit_intent(&self, params: &SubmitIntentParams) -> Result<IntentResponse> {
        let quote = self.get_intent_quote(&params.intent).await?;
        debug!(expires_at = %quote.expires_at, "intent quoted");
        self.http.post("/submit-intent", &params.body(&quote)).await
    }
}
