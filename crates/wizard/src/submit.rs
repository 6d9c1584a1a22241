//! Submission gate: runs before advancing from the setup step to deployment.
//!
//! The deployment initializer is handed the finalized configuration
//! unconditionally and before any network check, so deployment state always
//! reflects what the user committed regardless of which network they are on.
//! Only a resolved production network raises the confirmation gate.

use anyhow::Result;

use crate::deploy::{DeploymentInitializer, DeploymentPlan};
use crate::network::{network_name_by_id, NetworkOracle};
use crate::prompt::{MainnetSummary, Prompter};
use crate::state::WizardContext;

/// Aggregate facts about the current configuration, derived fresh at each
/// submission attempt and never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionFacts {
    pub tiers_count: usize,
    pub reserved_count: usize,
    pub has_whitelist: bool,
    pub has_min_cap: bool,
    /// Tiers whose whitelist collection is non-empty; counts tiers, not
    /// addresses.
    pub whitelist_count: usize,
}

impl SubmissionFacts {
    pub fn derive(ctx: &WizardContext) -> Self {
        Self {
            tiers_count: ctx.tiers.len(),
            reserved_count: ctx.reserved.len(),
            has_whitelist: ctx.tiers.has_whitelist(),
            has_min_cap: ctx.tiers.has_min_cap(),
            whitelist_count: ctx
                .tiers
                .tiers()
                .iter()
                .filter(|tier| tier.has_whitelist_entries())
                .count(),
        }
    }
}

/// What happened to a submission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// The flow advanced to the deployment step.
    Navigated,
    /// The mainnet confirmation gate was rejected; the user stays on the step.
    Declined,
    /// Network identity could not be resolved; the user stays on the step
    /// and can retry.
    NetworkUnresolved,
}

/// Navigation collaborator: a single idempotent transition to the next step.
pub trait Navigator {
    fn go_next_step(&mut self) -> Result<()>;
}

/// Submit the current configuration.
///
/// Errors from the initializer propagate: deployment state that cannot be
/// recorded is a real failure. Network resolution errors are swallowed here,
/// and navigation failures are logged but never re-raised.
pub async fn submit<D, N, P, V>(
    ctx: &WizardContext,
    initializer: &mut D,
    network_oracle: &N,
    prompter: &P,
    navigator: &mut V,
) -> Result<SubmissionOutcome>
where
    D: DeploymentInitializer,
    N: NetworkOracle + Sync,
    P: Prompter + Sync,
    V: Navigator,
{
    let facts = SubmissionFacts::derive(ctx);

    initializer.initialize(DeploymentPlan {
        has_reserved: facts.reserved_count > 0,
        has_whitelist: facts.has_whitelist,
        is_dutch_auction: ctx.strategy.is_dutch_auction(),
        tiers: ctx.tiers.snapshot(),
        has_min_cap: facts.has_min_cap,
    })?;

    let network = match network_oracle.network_version().await {
        Ok(network_id) => network_name_by_id(network_id),
        Err(error) => {
            tracing::error!(%error, "Failed to resolve network identity, staying on step");
            return Ok(SubmissionOutcome::NetworkUnresolved);
        }
    };

    if network.is_production() {
        let summary = MainnetSummary {
            tiers_count: facts.tiers_count,
            gas_price: ctx.selected_gas_price(),
            reserved_count: facts.reserved_count,
            whitelist_count: facts.whitelist_count,
        };

        if !prompter.confirm_mainnet_deploy(&summary).await {
            tracing::info!("Mainnet deployment not confirmed, staying on step");
            return Ok(SubmissionOutcome::Declined);
        }
    }

    if let Err(error) = navigator.go_next_step() {
        tracing::error!(%error, "Failed to navigate to the next step");
    }

    Ok(SubmissionOutcome::Navigated)
}
