//! Wizard configuration persistence.
//!
//! The in-progress crowdsale configuration is saved as TOML so a user can
//! leave the wizard and come back without losing tier state or their gas
//! selection.

use std::path::PathBuf;

use alloy_core::primitives::Address;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::gas::GasPrice;
use crate::state::{GeneralSettings, ReservedToken, WizardContext};
use crate::tier::{SaleStrategy, Tier, TierStore, Toggle};

/// The default name for the crowdforge configuration file.
pub const CROWDCONF_FILENAME: &str = "Crowdforge.toml";

/// Serializable form of the shared wizard state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WizardConfig {
    /// Wallet the crowdsale is bound to.
    pub wallet: Address,
    pub strategy: SaleStrategy,
    pub burn_excess: Toggle,
    /// Persisted user gas selection, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_type_selected: Option<GasPrice>,
    #[serde(default)]
    pub tiers: Vec<Tier>,
    #[serde(default)]
    pub reserved: Vec<ReservedToken>,
}

impl WizardConfig {
    /// A fresh configuration for a new crowdsale.
    pub fn new(wallet: Address, strategy: SaleStrategy) -> Self {
        Self {
            wallet,
            strategy,
            burn_excess: Toggle::No,
            gas_type_selected: None,
            tiers: Vec::new(),
            reserved: Vec::new(),
        }
    }

    /// Save the configuration to a TOML file.
    pub fn save_to_file(&self, path: &PathBuf) -> Result<()> {
        let content =
            toml::to_string_pretty(self).context("Failed to serialize wizard config to TOML")?;
        std::fs::write(path, content)
            .context(format!("Failed to write config to {}", path.display()))?;
        tracing::info!(path = %path.display(), "Configuration saved");
        Ok(())
    }

    /// Load the configuration from a TOML file or a directory containing one.
    pub fn load_from_file(path: &PathBuf) -> Result<Self> {
        if !path.exists() {
            return Err(anyhow::anyhow!(
                "Configuration file or directory not found: {}",
                path.display()
            ));
        }

        let config_path = if path.is_dir() {
            path.join(CROWDCONF_FILENAME)
        } else {
            path.to_path_buf()
        };

        let content = std::fs::read_to_string(config_path)
            .context(format!("Failed to read config from {}", path.display()))?;
        let config: Self =
            toml::from_str(&content).context("Failed to parse config file as TOML")?;
        tracing::info!(path = %path.display(), "Configuration loaded");
        Ok(config)
    }

    /// Hydrate a live context from this configuration.
    pub fn into_context(self) -> WizardContext {
        let mut general = GeneralSettings::default();
        general.burn_excess = self.burn_excess;
        if let Some(selected) = self.gas_type_selected {
            general.set_gas_type_selected(selected);
        }

        let mut ctx = WizardContext::new(self.wallet, self.strategy);
        ctx.tiers = TierStore::with_tiers(self.tiers);
        ctx.general = general;
        ctx.reserved = self.reserved;
        ctx
    }

    /// Capture the current context for persistence.
    pub fn from_context(ctx: &WizardContext) -> Self {
        Self {
            wallet: ctx.wallet,
            strategy: ctx.strategy,
            burn_excess: ctx.general.burn_excess,
            gas_type_selected: ctx.general.gas_type_selected().cloned(),
            tiers: ctx.tiers.snapshot(),
            reserved: ctx.reserved.clone(),
        }
    }
}
