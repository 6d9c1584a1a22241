//! crowdforge-wizard - Orchestration core for the crowdsale setup wizard.
//!
//! This crate holds the step-orchestration and validation logic for
//! configuring and deploying a token sale: loading and normalizing shared
//! configuration state when the setup step opens, maintaining cross-tier
//! invariants while the user edits, and gating the handoff to the
//! irreversible deployment sequence.

mod calc;
mod config;
mod deploy;
mod gas;
mod load;
mod network;
mod prompt;
pub mod rpc;
mod state;
mod submit;
mod tier;

pub use calc::{FieldChange, FieldObserverRegistry, FieldValue, TierField, link_end_to_start};
pub use config::{CROWDCONF_FILENAME, WizardConfig};
pub use deploy::{DeploymentInitializer, DeploymentPlan, PLAN_FILENAME, PlanWriter};
pub use gas::{GasOracle, GasPrice, GasPriceBook, GasQuote, GasSpeed, HttpGasOracle};
pub use load::{LoadResult, enter_step};
pub use network::{EthNetwork, JsonRpcNetworkOracle, NetworkOracle, network_name_by_id};
pub use prompt::{MainnetSummary, Prompter};
pub use state::{GeneralSettings, ReservedDim, ReservedToken, WizardContext};
pub use submit::{Navigator, SubmissionFacts, SubmissionOutcome, submit};
pub use tier::{InitSignal, SETTLING_WINDOW, SaleStrategy, Tier, TierStore, Toggle};
