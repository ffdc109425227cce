use serde_json::json;
use url::Url;

use crate::config::ChainBConfig;
use crate::types::{BurnRecord, ChainBQueryError, SwapQueryResult};

/// Read-only JSON-RPC client for the chain-B swap contract. Never holds a
/// signing key: writes go through [`crate::cli_tool::CliTool`] instead.
#[derive(Debug, Clone)]
pub struct ChainBClient {
    http: reqwest::Client,
    rpc: Url,
    swap_contract_address: String,
    viewing_key: String,
}

impl ChainBClient {
    pub fn new(config: &ChainBConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            rpc: config.rpc.clone(),
            swap_contract_address: config.swap_contract_address.clone(),
            viewing_key: config.viewing_key.inner().clone(),
        }
    }

    /// Query the swap contract for the record minted at `(nonce, token)` on the
    /// A→B pipeline, used by SignerA to validate a lock before countersigning.
    pub async fn query_swap(
        &self,
        nonce: u64,
        token: &str,
    ) -> Result<SwapQueryResult, ChainBQueryError> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": nonce,
            "method": "query_contract",
            "params": {
                "contract": self.swap_contract_address,
                "viewing_key": self.viewing_key,
                "query": { "swap": { "nonce": nonce, "token": token } },
            }
        });
        let response: serde_json::Value = self
            .http
            .post(self.rpc.clone())
            .json(&body)
            .send()
            .await?
            .json()
            .await?;
        if let Some(err) = response.get("error") {
            return Err(ChainBQueryError::QueryFailed(err.to_string()));
        }
        let result = response
            .get("result")
            .ok_or_else(|| ChainBQueryError::Malformed("missing result field".into()))?;
        serde_json::from_value(result.clone())
            .map_err(|e| ChainBQueryError::Malformed(e.to_string()))
    }

    /// Iterate burn events on the B→A pipeline starting at `from_nonce` (inclusive)
    /// up to and including `to_nonce`.
    pub async fn query_burns(
        &self,
        from_nonce: u64,
        to_nonce: u64,
    ) -> Result<Vec<BurnRecord>, ChainBQueryError> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": from_nonce,
            "method": "query_contract",
            "params": {
                "contract": self.swap_contract_address,
                "viewing_key": self.viewing_key,
                "query": { "burns": { "from_nonce": from_nonce, "to_nonce": to_nonce } },
            }
        });
        let response: serde_json::Value = self
            .http
            .post(self.rpc.clone())
            .json(&body)
            .send()
            .await?
            .json()
            .await?;
        if let Some(err) = response.get("error") {
            return Err(ChainBQueryError::QueryFailed(err.to_string()));
        }
        let result = response
            .get("result")
            .ok_or_else(|| ChainBQueryError::Malformed("missing result field".into()))?;
        serde_json::from_value(result.clone())
            .map_err(|e| ChainBQueryError::Malformed(e.to_string()))
    }
}
