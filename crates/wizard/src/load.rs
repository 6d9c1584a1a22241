//! Step load sequencer for the crowdsale setup step.
//!
//! Runs once when the step becomes active, after the connectivity check has
//! succeeded. Ordering is fixed: gas refresh (success or tolerated failure),
//! then the settling wait, then tier loading. Errors other than the gas
//! refresh propagate so the host can show a load failure.

use anyhow::{Context, Result};

use crate::gas::{GasOracle, GasPrice};
use crate::prompt::Prompter;
use crate::state::WizardContext;
use crate::tier::{SaleStrategy, Tier, Toggle};

/// Ephemeral result of step entry, consumed by the rendered form and
/// discarded on navigation.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadResult {
    /// Step-local value copy of the tier sequence; a singleton under the
    /// Dutch auction strategy.
    pub initial_tiers: Vec<Tier>,
    pub burn_excess: Toggle,
    pub gas_type_selected: GasPrice,
    /// Whether the user is revisiting the step, so destructive edits can be
    /// disabled by the renderer.
    pub reload: bool,
}

/// Enter the crowdsale setup step.
///
/// Precondition: a live connectivity check (`rpc::check_web3`) has already
/// succeeded.
pub async fn enter_step<O, P>(
    ctx: &mut WizardContext,
    gas_oracle: &O,
    prompter: &P,
) -> Result<LoadResult>
where
    O: GasOracle + Sync,
    P: Prompter + Sync,
{
    // The single tolerated failure: stale or default gas prices keep the
    // step usable.
    if let Err(error) = ctx.gas.update_values(gas_oracle).await {
        tracing::warn!(%error, "No gas price available, continuing with current values");
        prompter.no_gas_price_available().await;
    }

    // Let any in-flight crowdsale initialization settle before reading
    // tier state.
    if !ctx.tiers.settled().await {
        tracing::warn!("Tier store still initializing after the settling window, proceeding");
    }

    let reload = if ctx.tiers.is_empty() {
        ctx.tiers.add_crowdsale(ctx.wallet);
        false
    } else {
        true
    };

    let initial_tiers = match ctx.strategy {
        SaleStrategy::DutchAuction => {
            let first = ctx
                .tiers
                .tiers()
                .first()
                .map(Tier::value_copy)
                .context("Tier store is empty after initialization")?;
            vec![first]
        }
        SaleStrategy::TieredSale => ctx.tiers.snapshot(),
    };

    // The only write-through to shared state before submission: seed the gas
    // selection from the first offer if the user never picked one.
    let gas_type_selected = match ctx.general.gas_type_selected().cloned() {
        Some(selected) => selected,
        None => {
            let first = ctx.gas.first_offer();
            ctx.general.set_gas_type_selected(first.clone());
            first
        }
    };

    tracing::info!(
        tiers = initial_tiers.len(),
        reload,
        strategy = %ctx.strategy,
        gas_gwei = gas_type_selected.gwei,
        "Crowdsale setup step loaded"
    );

    Ok(LoadResult {
        initial_tiers,
        burn_excess: ctx.general.burn_excess,
        gas_type_selected,
        reload,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gas::{GasQuote, GasSpeed};
    use crate::prompt::MainnetSummary;
    use crate::tier::TierStore;
    use alloy_core::primitives::Address;
    use chrono::Utc;
    use std::sync::Mutex;

    struct CannedOracle(GasQuote);

    impl GasOracle for CannedOracle {
        async fn fetch(&self) -> Result<GasQuote> {
            Ok(self.0)
        }
    }

    struct DownOracle;

    impl GasOracle for DownOracle {
        async fn fetch(&self) -> Result<GasQuote> {
            anyhow::bail!("oracle unreachable")
        }
    }

    #[derive(Default)]
    struct RecordingPrompter {
        gas_alerts: Mutex<usize>,
    }

    impl Prompter for RecordingPrompter {
        async fn no_gas_price_available(&self) {
            *self.gas_alerts.lock().unwrap() += 1;
        }

        async fn confirm_mainnet_deploy(&self, _summary: &MainnetSummary) -> bool {
            panic!("step load must never raise the confirmation gate");
        }
    }

    fn context(strategy: SaleStrategy) -> WizardContext {
        WizardContext::new(Address::repeat_byte(0x01), strategy)
    }

    fn quote() -> GasQuote {
        GasQuote {
            safe_low: 20.0,
            average: 50.0,
            fast: 100.0,
            fastest: 250.0,
        }
    }

    #[tokio::test]
    async fn test_first_visit_seeds_single_tier() {
        let mut ctx = context(SaleStrategy::TieredSale);
        let prompter = RecordingPrompter::default();

        let result = enter_step(&mut ctx, &CannedOracle(quote()), &prompter)
            .await
            .unwrap();

        assert!(!result.reload);
        assert_eq!(result.initial_tiers.len(), 1);
        assert_eq!(ctx.tiers.len(), 1);
        assert_eq!(ctx.tiers.wallet(), Some(Address::repeat_byte(0x01)));
        assert_eq!(*prompter.gas_alerts.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_revisit_marks_reload() {
        let mut ctx = context(SaleStrategy::TieredSale);
        ctx.tiers = TierStore::with_tiers(vec![
            Tier::seed(0, Utc::now()),
            Tier::seed(1, Utc::now()),
        ]);
        let prompter = RecordingPrompter::default();

        let result = enter_step(&mut ctx, &CannedOracle(quote()), &prompter)
            .await
            .unwrap();

        assert!(result.reload);
        assert_eq!(result.initial_tiers.len(), 2);
    }

    #[tokio::test]
    async fn test_dutch_auction_loads_singleton() {
        let mut ctx = context(SaleStrategy::DutchAuction);
        ctx.tiers = TierStore::with_tiers(vec![
            Tier::seed(0, Utc::now()),
            Tier::seed(1, Utc::now()),
            Tier::seed(2, Utc::now()),
        ]);
        let prompter = RecordingPrompter::default();

        let result = enter_step(&mut ctx, &CannedOracle(quote()), &prompter)
            .await
            .unwrap();

        assert_eq!(result.initial_tiers.len(), 1);
        assert_eq!(result.initial_tiers[0].index, 0);
        // Shared state keeps the full sequence.
        assert_eq!(ctx.tiers.len(), 3);
    }

    #[tokio::test]
    async fn test_gas_refresh_failure_is_tolerated() {
        let mut ctx = context(SaleStrategy::TieredSale);
        let prompter = RecordingPrompter::default();

        let result = enter_step(&mut ctx, &DownOracle, &prompter).await.unwrap();

        assert!(!result.initial_tiers.is_empty());
        assert_eq!(result.gas_type_selected.speed, GasSpeed::Slow);
        assert_eq!(*prompter.gas_alerts.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_gas_selection_seeded_once() {
        let mut ctx = context(SaleStrategy::TieredSale);
        let prompter = RecordingPrompter::default();

        let first = enter_step(&mut ctx, &CannedOracle(quote()), &prompter)
            .await
            .unwrap();
        assert_eq!(first.gas_type_selected.gwei, 2.0);

        // A cheaper oracle answer on reload must not repoint the persisted
        // selection.
        let cheaper = GasQuote {
            safe_low: 5.0,
            ..quote()
        };
        let second = enter_step(&mut ctx, &CannedOracle(cheaper), &prompter)
            .await
            .unwrap();
        assert_eq!(second.gas_type_selected.gwei, 2.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_waits_for_initialization_signal() {
        let mut ctx = context(SaleStrategy::TieredSale);
        ctx.tiers.begin_initialization();

        let signal = ctx.tiers.init_signal();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(200)).await;
            signal.finish();
        });

        let prompter = RecordingPrompter::default();
        let result = enter_step(&mut ctx, &CannedOracle(quote()), &prompter)
            .await
            .unwrap();
        assert_eq!(result.initial_tiers.len(), 1);
    }
}
