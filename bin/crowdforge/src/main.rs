//! crowdforge is a CLI wizard for configuring and deploying a crowdsale
//! contract in a few clicks.

mod cli;
mod term;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use cli::{Cli, EndTimeEdit};
use crowdforge_wizard::{
    CROWDCONF_FILENAME, FieldChange, FieldObserverRegistry, FieldValue, HttpGasOracle,
    JsonRpcNetworkOracle, LoadResult, PlanWriter, SubmissionOutcome, Tier, TierField,
    WizardConfig, enter_step, rpc, submit,
};
use term::{StepNavigator, TermPrompter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize the logger.
    tracing_subscriber::fmt()
        .with_max_level(cli.verbosity)
        .init();

    let client = rpc::create_client()?;
    let rpc_url = cli.rpc_provider.to_rpc_url()?;

    // Connectivity must be verified before the step loads.
    rpc::check_web3(&client, &rpc_url)
        .await
        .context("Connectivity check failed")?;

    // Load an existing configuration or seed a new one from CLI arguments.
    let config = if let Some(config_path) = &cli.config {
        let config_path = PathBuf::from(config_path);
        WizardConfig::load_from_file(&config_path)?
    } else {
        let wallet = cli
            .wallet
            .context("--wallet is required when no config file is provided")?;
        WizardConfig::new(wallet, cli.strategy)
    };

    tracing::info!(
        wallet = %config.wallet,
        strategy = %config.strategy,
        rpc_url = %rpc_url,
        "Entering crowdsale setup step..."
    );

    let mut ctx = config.into_context();
    let gas_oracle = HttpGasOracle::new(client.clone(), cli.gas_oracle.clone());
    let prompter = TermPrompter::new(cli.assume_yes);

    let loaded = enter_step(&mut ctx, &gas_oracle, &prompter).await?;
    print_load_summary(&loaded);

    // Apply end-time edits to the step-local draft and merge the result back
    // through the explicit commit point.
    if !cli.set_end_time.is_empty() {
        let mut draft = loaded.initial_tiers.clone();
        apply_end_time_edits(&mut draft, &cli.set_end_time);
        ctx.tiers.commit(draft)?;
        tracing::info!(edits = cli.set_end_time.len(), "Tier schedule updated");
    }

    let outdata = PathBuf::from(&cli.outdata);
    let mut initializer = PlanWriter::new(&outdata);
    let network_oracle = JsonRpcNetworkOracle::new(client, rpc_url);
    let mut navigator = StepNavigator::default();

    let outcome = submit(
        &ctx,
        &mut initializer,
        &network_oracle,
        &prompter,
        &mut navigator,
    )
    .await?;

    // Persist the wizard state (including the seeded gas selection) so a
    // revisit resumes where the user left off.
    std::fs::create_dir_all(&outdata).context(format!(
        "Failed to create output directory {}",
        outdata.display()
    ))?;
    let config_path = outdata.join(CROWDCONF_FILENAME);
    WizardConfig::from_context(&ctx).save_to_file(&config_path)?;

    match outcome {
        SubmissionOutcome::Navigated => {
            tracing::info!(
                plan = %initializer.plan_path().display(),
                "Crowdsale setup complete, proceeding to deployment"
            );
        }
        SubmissionOutcome::Declined => {
            tracing::info!("Deployment not confirmed; configuration kept for another attempt");
        }
        SubmissionOutcome::NetworkUnresolved => {
            tracing::warn!("Could not resolve network identity; run again to retry submission");
        }
    }

    Ok(())
}

/// Route each edit through the field observer registry so the cross-field
/// rule drags the next tier's start time along with the new end time.
fn apply_end_time_edits(draft: &mut [Tier], edits: &[EndTimeEdit]) {
    let registry = FieldObserverRegistry::default();
    for edit in edits {
        registry.apply(
            draft,
            FieldChange {
                index: edit.index,
                field: TierField::EndTime,
                value: FieldValue::Time(edit.at),
            },
        );
    }
}

fn print_load_summary(loaded: &LoadResult) {
    tracing::info!(
        tiers = loaded.initial_tiers.len(),
        reload = loaded.reload,
        burn_excess = %loaded.burn_excess,
        gas_speed = %loaded.gas_type_selected.speed,
        gas_gwei = loaded.gas_type_selected.gwei,
        "Crowdsale setup step ready"
    );

    for tier in &loaded.initial_tiers {
        tracing::info!(
            tier = tier.index,
            price = tier.price,
            supply = tier.supply,
            start = %tier.start_time,
            end = %tier.end_time,
            whitelist = %tier.whitelist_enabled,
            "Tier"
        );
    }
}
