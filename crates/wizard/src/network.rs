//! Network status oracle: resolves the connected chain id to a symbolic name.

use std::future::Future;

use anyhow::{Context, Result};
use url::Url;

use crate::rpc;

/// Symbolic names for the networks the wizard recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum EthNetwork {
    Mainnet,
    Morden,
    Ropsten,
    Rinkeby,
    Kovan,
    Sokol,
    Core,
    #[strum(serialize = "{0}")]
    Unknown(u64),
}

impl EthNetwork {
    /// Only the production chain requires the extra deployment confirmation.
    pub fn is_production(self) -> bool {
        self == EthNetwork::Mainnet
    }
}

/// Map a network id to its symbolic name.
pub fn network_name_by_id(network_id: u64) -> EthNetwork {
    match network_id {
        1 => EthNetwork::Mainnet,
        2 => EthNetwork::Morden,
        3 => EthNetwork::Ropsten,
        4 => EthNetwork::Rinkeby,
        42 => EthNetwork::Kovan,
        77 => EthNetwork::Sokol,
        99 => EthNetwork::Core,
        other => EthNetwork::Unknown(other),
    }
}

/// Resolves the live network id. May fail; the submission gate swallows the
/// failure at its boundary.
pub trait NetworkOracle {
    fn network_version(&self) -> impl Future<Output = Result<u64>> + Send;
}

/// Live oracle querying `net_version` over JSON-RPC.
#[derive(Debug, Clone)]
pub struct JsonRpcNetworkOracle {
    client: reqwest::Client,
    url: Url,
}

impl JsonRpcNetworkOracle {
    pub fn new(client: reqwest::Client, url: Url) -> Self {
        Self { client, url }
    }
}

impl NetworkOracle for JsonRpcNetworkOracle {
    async fn network_version(&self) -> Result<u64> {
        let version: String = rpc::json_rpc_call(&self.client, &self.url, "net_version", vec![])
            .await
            .context("Failed to query network version")?;

        version
            .parse()
            .with_context(|| format!("Unexpected net_version response: {}", version))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_name_mapping() {
        assert_eq!(network_name_by_id(1), EthNetwork::Mainnet);
        assert_eq!(network_name_by_id(3), EthNetwork::Ropsten);
        assert_eq!(network_name_by_id(42), EthNetwork::Kovan);
        assert_eq!(network_name_by_id(77), EthNetwork::Sokol);
        assert_eq!(network_name_by_id(99), EthNetwork::Core);
        assert_eq!(network_name_by_id(5777), EthNetwork::Unknown(5777));
    }

    #[test]
    fn test_only_mainnet_is_production() {
        assert!(network_name_by_id(1).is_production());
        assert!(!network_name_by_id(3).is_production());
        assert!(!network_name_by_id(5777).is_production());
    }

    #[test]
    fn test_display_names() {
        assert_eq!(EthNetwork::Mainnet.to_string(), "mainnet");
        assert_eq!(EthNetwork::Unknown(5777).to_string(), "5777");
    }
}
