//! Shared JSON-RPC plumbing for talking to an Ethereum node.

use std::time::Duration;

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

/// Default timeout for RPC requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Create an HTTP client configured for JSON-RPC requests.
pub fn create_client() -> Result<reqwest::Client, anyhow::Error> {
    reqwest::Client::builder()
        .timeout(DEFAULT_TIMEOUT)
        .build()
        .context("Failed to create HTTP client")
}

/// Make a JSON-RPC call and deserialize the result.
///
/// Returns the deserialized `result` field, or an error if the request
/// failed or the node returned an error response.
pub async fn json_rpc_call<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &Url,
    method: &str,
    params: Vec<Value>,
) -> Result<T, anyhow::Error> {
    let response = client
        .post(url.clone())
        .json(&serde_json::json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": 1
        }))
        .send()
        .await
        .with_context(|| format!("Failed to send {} request", method))?;

    let result: Value = response
        .json()
        .await
        .with_context(|| format!("Failed to parse {} response", method))?;

    if let Some(error) = result.get("error") {
        anyhow::bail!(
            "RPC error: {}",
            error
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("unknown")
        );
    }

    let result_value = result
        .get("result")
        .context("No result in response")?
        .clone();

    serde_json::from_value(result_value)
        .with_context(|| format!("Failed to deserialize {} result", method))
}

/// Verify connectivity to the execution environment.
///
/// Step load must not proceed until this probe has succeeded: a node that is
/// unreachable or not listening surfaces here as a fatal load error rather
/// than a half-initialized wizard step.
pub async fn check_web3(client: &reqwest::Client, url: &Url) -> Result<(), anyhow::Error> {
    let listening: bool = json_rpc_call(client, url, "net_listening", vec![])
        .await
        .with_context(|| format!("No Ethereum node reachable at {}", url))?;

    if !listening {
        anyhow::bail!("Node at {} is not listening for network connections", url);
    }

    Ok(())
}
