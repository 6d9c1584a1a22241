//! Explicit wizard context passed into each operation.
//!
//! Everything the step operations touch lives here, instead of in ambient
//! injected singletons: the sequencer and the submission gate are functions
//! of this context plus their collaborators.

use alloy_core::primitives::Address;
use serde::{Deserialize, Serialize};

use crate::gas::{GasPrice, GasPriceBook};
use crate::tier::{SaleStrategy, TierStore, Toggle};

/// How a reserved-token allocation is denominated.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ReservedDim {
    Tokens,
    Percentage,
}

/// Tokens set aside for distribution outside the public sale mechanism.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservedToken {
    pub addr: Address,
    pub dim: ReservedDim,
    pub val: f64,
}

/// Step-spanning settings that are not tier-shaped.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneralSettings {
    pub burn_excess: Toggle,
    gas_type_selected: Option<GasPrice>,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            burn_excess: Toggle::No,
            gas_type_selected: None,
        }
    }
}

impl GeneralSettings {
    pub fn gas_type_selected(&self) -> Option<&GasPrice> {
        self.gas_type_selected.as_ref()
    }

    pub fn set_gas_type_selected(&mut self, price: GasPrice) {
        self.gas_type_selected = Some(price);
    }
}

/// The single writable state shared across wizard steps.
#[derive(Debug)]
pub struct WizardContext {
    pub tiers: TierStore,
    pub gas: GasPriceBook,
    pub general: GeneralSettings,
    pub reserved: Vec<ReservedToken>,
    pub strategy: SaleStrategy,
    pub wallet: Address,
}

impl WizardContext {
    /// A fresh context for a new crowdsale bound to `wallet`.
    pub fn new(wallet: Address, strategy: SaleStrategy) -> Self {
        Self {
            tiers: TierStore::new(),
            gas: GasPriceBook::default(),
            general: GeneralSettings::default(),
            reserved: Vec::new(),
            strategy,
            wallet,
        }
    }

    /// The gas price a deployment would use right now: the persisted user
    /// selection, or the cheapest current offer when none exists.
    pub fn selected_gas_price(&self) -> GasPrice {
        self.general
            .gas_type_selected
            .clone()
            .unwrap_or_else(|| self.gas.first_offer())
    }
}
