use std::sync::Arc;

use reqwest::Url;

use crate::config::{PROOF_DEEP_LINK_BASE_URL, PROOF_SIGNATURE_MESSAGE_PREFIX};
use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::types::{DeepLinkParams, VerifyAddressResponse};

/// Client for Proof, DFlow's KYC verification service
///
/// A partner checks a wallet with [`verify_address`](Self::verify_address).
/// If it is not verified, the user signs
/// [`generate_signature_message`](Self::generate_signature_message) and is
/// sent to [`build_deep_link`](Self::build_deep_link).
#[derive(Debug, Clone)]
pub struct ProofClient {
    http: Arc<HttpClient>,
}

impl ProofClient {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Whether `address` has completed KYC verification
    pub async fn verify_address(&self, address: &str) -> Result<VerifyAddressResponse> {
        self.http.get(&format!("/verify/{}", address), &[]).await
    }

    /// Message the wallet signs to prove ownership
    ///
    /// # Arguments
    ///
    /// * `timestamp` - Unix milliseconds; the current time when `None`
    pub fn generate_signature_message(&self, timestamp: Option<i64>) -> String {
        let timestamp = timestamp.unwrap_or_else(|| chrono::Utc::now().timestamp_millis());
        format!("{}{}", PROOF_SIGNATURE_MESSAGE_PREFIX, timestamp)
    }

    /// URL of the verification flow, with every parameter form-encoded
    pub fn build_deep_link(&self, params: &DeepLinkParams) -> Result<String> {
        Url::parse_with_params(PROOF_DEEP_LINK_BASE_URL, params.to_query_params())
            .map(String::from)
            .map_err(|e| Error::InvalidParameter(format!("invalid deep link: {}", e)))
    }
}
