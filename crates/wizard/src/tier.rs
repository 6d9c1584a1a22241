//! Tier model and the shared tier configuration store.
//!
//! The [`TierStore`] is the single writable source of truth for tiers across
//! wizard steps. Steps never edit it directly while the user is typing: they
//! work on a value copy produced by [`TierStore::snapshot`] and merge edits
//! back only through explicit submission.

use alloy_core::primitives::Address;
use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// Lead time before the first tier opens when seeding a brand-new crowdsale.
const FIRST_TIER_LEAD_MINUTES: i64 = 5;

/// Default duration of a freshly seeded tier.
const DEFAULT_TIER_DURATION_DAYS: i64 = 4;

/// Upper bound on how long step load waits for an in-flight tier store
/// initialization to settle before proceeding anyway.
pub const SETTLING_WINDOW: std::time::Duration = std::time::Duration::from_secs(1);

/// A yes/no toggle as it appears in the wizard form model.
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
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Toggle {
    Yes,
    No,
}

impl Toggle {
    pub fn is_yes(self) -> bool {
        self == Toggle::Yes
    }
}

/// The sale variant being configured.
///
/// A Dutch auction uses a single descending-price tier; it is still modeled
/// as a tier sequence of length one rather than a distinct type.
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
pub enum SaleStrategy {
    TieredSale,
    DutchAuction,
}

impl SaleStrategy {
    pub fn is_dutch_auction(self) -> bool {
        self == SaleStrategy::DutchAuction
    }
}

/// One time-boxed pricing/cap configuration within a crowdsale.
///
/// Within an ordered tier sequence, `tiers[i].end_time == tiers[i + 1].start_time`
/// is the target state maintained by the end-time propagation rule while the
/// user edits. It is advisory and not enforced at load time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    /// Ordinal position within the sale.
    pub index: usize,
    /// Token rate for this tier.
    pub price: f64,
    /// Tokens available in this tier.
    pub supply: f64,
    /// When this tier opens.
    pub start_time: DateTime<Utc>,
    /// When this tier closes.
    pub end_time: DateTime<Utc>,
    /// Minimum contribution cap. Zero disables the cap.
    pub min_cap: f64,
    /// Whether participation in this tier is restricted to an allow-list.
    pub whitelist_enabled: Toggle,
    /// The allow-list itself. May be empty even when the toggle is on.
    pub whitelist: Vec<Address>,
}

impl Tier {
    /// Seed tier for a brand-new crowdsale: opens shortly after `now` and
    /// runs for the default duration, everything else left for the user.
    pub fn seed(index: usize, now: DateTime<Utc>) -> Self {
        let start_time = now + Duration::minutes(FIRST_TIER_LEAD_MINUTES);
        Self {
            index,
            price: 0.0,
            supply: 0.0,
            start_time,
            end_time: start_time + Duration::days(DEFAULT_TIER_DURATION_DAYS),
            min_cap: 0.0,
            whitelist_enabled: Toggle::No,
            whitelist: Vec::new(),
        }
    }

    /// Explicit value copy with defined semantics for nested collections:
    /// the whitelist is cloned element-wise. This replaces cloning through a
    /// serialization round trip, which leaves non-plain values unspecified.
    pub fn value_copy(&self) -> Self {
        Self {
            index: self.index,
            price: self.price,
            supply: self.supply,
            start_time: self.start_time,
            end_time: self.end_time,
            min_cap: self.min_cap,
            whitelist_enabled: self.whitelist_enabled,
            whitelist: self.whitelist.to_vec(),
        }
    }

    /// Whether this tier carries a non-empty allow-list.
    pub fn has_whitelist_entries(&self) -> bool {
        !self.whitelist.is_empty()
    }
}

/// Shared, ordered tier configuration.
///
/// Carries an initialization-complete signal so that step load can wait for
/// an in-flight crowdsale creation to settle instead of sleeping for a fixed
/// delay and hoping.
#[derive(Debug)]
pub struct TierStore {
    tiers: Vec<Tier>,
    wallet: Option<Address>,
    settled_tx: watch::Sender<bool>,
}

impl Default for TierStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TierStore {
    /// An empty, settled store (no initialization in flight).
    pub fn new() -> Self {
        let (settled_tx, _) = watch::channel(true);
        Self {
            tiers: Vec::new(),
            wallet: None,
            settled_tx,
        }
    }

    /// A settled store pre-populated with existing tiers.
    pub fn with_tiers(tiers: Vec<Tier>) -> Self {
        let mut store = Self::new();
        store.tiers = tiers;
        store
    }

    /// Mark the store as having an initialization in flight. Step load will
    /// wait on [`TierStore::settled`] until [`TierStore::finish_initialization`]
    /// is called or the settling window elapses.
    pub fn begin_initialization(&self) {
        self.settled_tx.send_replace(false);
    }

    /// Signal that any in-flight initialization has completed.
    pub fn finish_initialization(&self) {
        self.settled_tx.send_replace(true);
    }

    /// Handle for a task performing asynchronous initialization to signal
    /// completion while the step holds the store itself.
    pub fn init_signal(&self) -> InitSignal {
        InitSignal(self.settled_tx.clone())
    }

    /// Wait until no initialization is in flight, bounded by [`SETTLING_WINDOW`].
    ///
    /// Returns `false` if the window elapsed with the store still
    /// initializing; callers are expected to proceed regardless, since the
    /// wait is deliberate and not a retry loop.
    pub async fn settled(&self) -> bool {
        let mut rx = self.settled_tx.subscribe();
        tokio::time::timeout(SETTLING_WINDOW, rx.wait_for(|settled| *settled))
            .await
            .is_ok()
    }

    /// One-time initialization of a brand-new crowdsale bound to the active
    /// wallet address.
    pub fn add_crowdsale(&mut self, wallet: Address) {
        self.wallet = Some(wallet);
        self.tiers.push(Tier::seed(self.tiers.len(), Utc::now()));
        tracing::info!(wallet = %wallet, "Seeded new crowdsale tier sequence");
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    pub fn wallet(&self) -> Option<Address> {
        self.wallet
    }

    /// Disposable value copy of the tier sequence for step-local editing.
    pub fn snapshot(&self) -> Vec<Tier> {
        self.tiers.iter().map(Tier::value_copy).collect()
    }

    /// Merge an edited tier sequence back into shared state. This is the
    /// explicit commit point at submission; indices are renumbered to keep
    /// the ordinal invariant.
    pub fn commit(&mut self, mut tiers: Vec<Tier>) -> Result<()> {
        if tiers.is_empty() {
            anyhow::bail!("Refusing to commit an empty tier sequence");
        }
        for (index, tier) in tiers.iter_mut().enumerate() {
            tier.index = index;
        }
        self.tiers = tiers;
        Ok(())
    }

    /// Whether any tier enables its allow-list toggle.
    pub fn has_whitelist(&self) -> bool {
        self.tiers
            .iter()
            .any(|tier| tier.whitelist_enabled.is_yes())
    }

    /// Whether any tier sets a nonzero minimum cap.
    pub fn has_min_cap(&self) -> bool {
        self.tiers.iter().any(|tier| tier.min_cap != 0.0)
    }

    /// Total supply across all tiers.
    pub fn max_supply(&self) -> f64 {
        self.tiers.iter().map(|tier| tier.supply).sum()
    }
}

/// Completion handle for an in-flight tier store initialization.
#[derive(Debug, Clone)]
pub struct InitSignal(watch::Sender<bool>);

impl InitSignal {
    pub fn begin(&self) {
        self.0.send_replace(false);
    }

    pub fn finish(&self) {
        self.0.send_replace(true);
    }
}
