//! Deployment initializer boundary.
//!
//! The gate hands the finalized configuration to this collaborator exactly
//! once per submission attempt, before any network check. Repeated attempts
//! with the same configuration must be safe, so implementations are expected
//! to be re-enterable.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::tier::Tier;

/// The default file name for a persisted deployment plan.
pub const PLAN_FILENAME: &str = "deployment-plan.toml";

/// Finalized configuration handed to the deployment sequence.
///
/// The tier sequence sits last so the TOML form keeps scalar flags ahead of
/// the array of tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentPlan {
    pub has_reserved: bool,
    pub has_whitelist: bool,
    pub is_dutch_auction: bool,
    pub has_min_cap: bool,
    pub tiers: Vec<Tier>,
}

/// Begins the irreversible deployment sequence from a finalized plan.
pub trait DeploymentInitializer {
    fn initialize(&mut self, plan: DeploymentPlan) -> Result<()>;
}

/// File-backed initializer: persists the plan as TOML into the output
/// directory. Rewriting the same plan is a no-op state-wise, which keeps
/// repeated submission attempts safe.
#[derive(Debug, Clone)]
pub struct PlanWriter {
    outdata: PathBuf,
}

impl PlanWriter {
    pub fn new(outdata: impl Into<PathBuf>) -> Self {
        Self {
            outdata: outdata.into(),
        }
    }

    /// Where the plan lands on disk.
    pub fn plan_path(&self) -> PathBuf {
        self.outdata.join(PLAN_FILENAME)
    }

    /// Load a previously persisted plan.
    pub fn load(&self) -> Result<DeploymentPlan> {
        let path = self.plan_path();
        let content = std::fs::read_to_string(&path)
            .context(format!("Failed to read plan from {}", path.display()))?;
        toml::from_str(&content).context("Failed to parse deployment plan as TOML")
    }
}

impl DeploymentInitializer for PlanWriter {
    fn initialize(&mut self, plan: DeploymentPlan) -> Result<()> {
        std::fs::create_dir_all(&self.outdata).context(format!(
            "Failed to create output directory {}",
            self.outdata.display()
        ))?;

        let content =
            toml::to_string_pretty(&plan).context("Failed to serialize deployment plan to TOML")?;
        let path = self.plan_path();
        std::fs::write(&path, content)
            .context(format!("Failed to write plan to {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            tiers = plan.tiers.len(),
            dutch_auction = plan.is_dutch_auction,
            "Deployment plan initialized"
        );
        Ok(())
    }
}
