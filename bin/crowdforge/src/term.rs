//! Terminal implementations of the wizard's prompt and navigation
//! collaborators.

use anyhow::Result;
use comfy_table::Table;
use crowdforge_wizard::{MainnetSummary, Navigator, Prompter};
use tokio::io::{AsyncBufReadExt, BufReader};

/// Prompter backed by stderr notices and an interactive stdin confirmation.
pub struct TermPrompter {
    assume_yes: bool,
}

impl TermPrompter {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl Prompter for TermPrompter {
    async fn no_gas_price_available(&self) {
        eprintln!("No gas price available right now; default gas prices will be offered.");
    }

    async fn confirm_mainnet_deploy(&self, summary: &MainnetSummary) -> bool {
        let mut table = Table::new();
        table.set_header(["Setting", "Value"]);
        table.add_row(["Tiers".to_string(), summary.tiers_count.to_string()]);
        table.add_row([
            "Gas price".to_string(),
            format!("{} ({} gwei)", summary.gas_price.speed, summary.gas_price.gwei),
        ]);
        table.add_row([
            "Reserved token allocations".to_string(),
            summary.reserved_count.to_string(),
        ]);
        table.add_row([
            "Whitelisted tiers".to_string(),
            summary.whitelist_count.to_string(),
        ]);

        println!("You are about to deploy a crowdsale to Ethereum mainnet.");
        println!("{table}");

        if self.assume_yes {
            tracing::info!("Mainnet deployment auto-confirmed (--assume-yes)");
            return true;
        }

        println!("Proceed with deployment? [y/N]");
        let mut line = String::new();
        let mut reader = BufReader::new(tokio::io::stdin());
        match reader.read_line(&mut line).await {
            Ok(_) => matches!(line.trim(), "y" | "Y" | "yes"),
            Err(error) => {
                tracing::error!(%error, "Failed to read confirmation, treating as declined");
                false
            }
        }
    }
}

/// Navigator that advances the wizard to the deployment step. The transition
/// is idempotent: repeated calls after the first are no-ops.
#[derive(Debug, Default)]
pub struct StepNavigator {
    advanced: bool,
}

impl Navigator for StepNavigator {
    fn go_next_step(&mut self) -> Result<()> {
        if self.advanced {
            return Ok(());
        }
        self.advanced = true;
        tracing::info!("Navigating to the deployment step");
        Ok(())
    }
}
