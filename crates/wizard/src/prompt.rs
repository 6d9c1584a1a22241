//! User-facing prompt collaborators.
//!
//! The core only knows about two gates: a non-blocking degraded-gas alert and
//! the blocking mainnet confirmation. Presentation belongs to the host.

use std::future::Future;

use crate::gas::GasPrice;

/// Facts carried by the mainnet confirmation gate.
#[derive(Debug, Clone, PartialEq)]
pub struct MainnetSummary {
    pub tiers_count: usize,
    pub gas_price: GasPrice,
    pub reserved_count: usize,
    /// Number of tiers with a non-empty whitelist, not total addresses.
    pub whitelist_count: usize,
}

/// Alert and confirmation surface supplied by the host environment.
pub trait Prompter {
    /// Non-blocking notice that the step is running without live gas prices.
    fn no_gas_price_available(&self) -> impl Future<Output = ()> + Send;

    /// Blocking decision point before deploying to the production chain.
    /// Resolves to `true` to proceed, `false` to stay on the step.
    fn confirm_mainnet_deploy(&self, summary: &MainnetSummary) -> impl Future<Output = bool> + Send;
}
