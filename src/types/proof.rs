use serde::{Deserialize, Serialize};

/// KYC status of a wallet address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyAddressResponse {
    pub verified: bool,
}

/// Parameters of a Proof KYC deep link
///
/// `signature` is the base58 signature of
/// [`ProofClient::generate_signature_message`](crate::ProofClient::generate_signature_message)
/// for the same `timestamp` (Unix milliseconds).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeepLinkParams {
    pub wallet: String,
    pub signature: String,
    pub timestamp: i64,
    #[serde(alias = "redirectUri")]
    pub redirect_uri: String,
    #[serde(default, alias = "projectId", skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
}

impl DeepLinkParams {
    pub fn new(
        wallet: impl Into<String>,
        signature: impl Into<String>,
        timestamp: i64,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            wallet: wallet.into(),
            signature: signature.into(),
            timestamp,
            redirect_uri: redirect_uri.into(),
            project_id: None,
        }
    }

    pub fn with_project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    /// Query pairs in link order; an empty project id is left out
    pub fn to_query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("wallet", self.wallet.clone()),
            ("signature", self.signature.clone()),
            ("timestamp", self.timestamp.to_string()),
            ("redirect_uri", self.redirect_uri.clone()),
        ];
        if let Some(project_id) = self.project_id.as_deref().filter(|p| !p.is_empty()) {
            params.push(("projectId", project_id.to_string()));
        }
        params
    }
}
