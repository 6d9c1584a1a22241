use std::str::FromStr;

use alloy_core::primitives::Address;
use chrono::{DateTime, Utc};
use clap::Parser;
use crowdforge_wizard::SaleStrategy;
use tracing::level_filters::LevelFilter;
use url::Url;

/// Default gas price oracle endpoint (ethgasstation-compatible JSON).
const DEFAULT_GAS_ORACLE_URL: &str = "https://ethgasstation.info/json/ethgasAPI.json";

#[derive(Debug, Clone, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum RpcProvider {
    PublicNode,
    #[strum(default)]
    Custom(String),
}

impl RpcProvider {
    pub fn to_rpc_url(&self) -> anyhow::Result<Url> {
        let raw = match self {
            RpcProvider::PublicNode => "https://ethereum-rpc.publicnode.com",
            RpcProvider::Custom(url) => url.as_str(),
        };
        raw.parse()
            .map_err(|e| anyhow::anyhow!("Invalid RPC URL {}: {}", raw, e))
    }
}

/// A tier end-time edit in `<index>=<rfc3339>` form, e.g.
/// `0=2026-09-01T12:00:00Z`.
#[derive(Debug, Clone, PartialEq)]
pub struct EndTimeEdit {
    pub index: usize,
    pub at: DateTime<Utc>,
}

impl FromStr for EndTimeEdit {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (index, at) = s
            .split_once('=')
            .ok_or_else(|| anyhow::anyhow!("Expected <index>=<rfc3339>, got: {}", s))?;
        let index = index
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid tier index {}: {}", index, e))?;
        let at = DateTime::parse_from_rfc3339(at)
            .map_err(|e| anyhow::anyhow!("Invalid RFC 3339 timestamp {}: {}", at, e))?
            .with_timezone(&Utc);
        Ok(Self { index, at })
    }
}

#[derive(Parser)]
#[command(name = "crowdforge")]
#[command(
    author,
    version,
    about = "Configure and deploy a crowdsale contract in a few clicks"
)]
pub struct Cli {
    /// The verbosity level.
    #[arg(short, long, env = "CROWDFORGE_VERBOSITY", default_value_t = LevelFilter::INFO)]
    pub verbosity: LevelFilter,

    /// The Ethereum JSON-RPC endpoint.
    ///
    /// Accepts `public-node` or any custom URL. The connected network is
    /// resolved from this node; deploying through a mainnet node requires an
    /// extra confirmation.
    #[arg(long, alias = "rpc", env = "CROWDFORGE_RPC_URL", default_value_t = RpcProvider::PublicNode)]
    pub rpc_provider: RpcProvider,

    /// The gas price oracle endpoint.
    #[arg(long, env = "CROWDFORGE_GAS_ORACLE", default_value = DEFAULT_GAS_ORACLE_URL)]
    pub gas_oracle: Url,

    /// The wallet address the crowdsale is bound to.
    ///
    /// Required when starting a new configuration; ignored when `--config`
    /// is provided.
    #[arg(short, long, env = "CROWDFORGE_WALLET")]
    pub wallet: Option<Address>,

    /// The sale strategy.
    #[arg(long, env = "CROWDFORGE_STRATEGY", default_value_t = SaleStrategy::TieredSale)]
    pub strategy: SaleStrategy,

    /// Path to an existing Crowdforge.toml configuration file or a directory
    /// containing one.
    #[arg(long, alias = "conf", env = "CROWDFORGE_CONFIG")]
    pub config: Option<String>,

    /// The path to the output data directory where the wizard configuration
    /// and the deployment plan are written.
    #[arg(long, alias = "outdata", env = "CROWDFORGE_OUTDATA", default_value = "data-crowdforge")]
    pub outdata: String,

    /// Edit a tier's end time on the loaded draft, as `<index>=<rfc3339>`.
    ///
    /// May be repeated. Each edit also moves the next tier's start time to
    /// the new end time; the edited draft is committed back before
    /// submission.
    #[arg(long, value_name = "INDEX=RFC3339")]
    pub set_end_time: Vec<EndTimeEdit>,

    /// Answer yes to the mainnet confirmation gate without prompting.
    #[arg(long, env = "CROWDFORGE_ASSUME_YES")]
    pub assume_yes: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_time_edit_parses() {
        let edit: EndTimeEdit = "1=2026-09-01T12:00:00Z".parse().unwrap();
        assert_eq!(edit.index, 1);
        assert_eq!(edit.at.to_rfc3339(), "2026-09-01T12:00:00+00:00");
    }

    #[test]
    fn test_end_time_edit_rejects_malformed_input() {
        assert!("2026-09-01T12:00:00Z".parse::<EndTimeEdit>().is_err());
        assert!("one=2026-09-01T12:00:00Z".parse::<EndTimeEdit>().is_err());
        assert!("1=next-tuesday".parse::<EndTimeEdit>().is_err());
    }
}
