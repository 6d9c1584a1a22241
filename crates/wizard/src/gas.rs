//! Gas price source: an asynchronously refreshed set of selectable prices.
//!
//! The book always carries a usable offered set. Until an oracle answers it
//! holds hardcoded defaults, so a failed refresh degrades the step rather
//! than blocking it.

use std::future::Future;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;

/// Named speed bands offered to the user.
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
pub enum GasSpeed {
    Slow,
    Standard,
    Fast,
    Instant,
}

/// A single selectable gas price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GasPrice {
    pub speed: GasSpeed,
    pub gwei: f64,
}

/// Oracle quote, in tenths of gwei as published by ethgasstation-style feeds.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct GasQuote {
    #[serde(rename = "safeLow")]
    pub safe_low: f64,
    pub average: f64,
    pub fast: f64,
    pub fastest: f64,
}

/// Source of fresh gas quotes. Seam for substituting a canned or failing
/// feed in tests.
pub trait GasOracle {
    fn fetch(&self) -> impl Future<Output = Result<GasQuote>> + Send;
}

/// Live oracle reading a JSON gas-price document over HTTP.
#[derive(Debug, Clone)]
pub struct HttpGasOracle {
    client: reqwest::Client,
    url: Url,
}

impl HttpGasOracle {
    pub fn new(client: reqwest::Client, url: Url) -> Self {
        Self { client, url }
    }
}

impl GasOracle for HttpGasOracle {
    async fn fetch(&self) -> Result<GasQuote> {
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .with_context(|| format!("Failed to query gas price oracle at {}", self.url))?;

        response
            .json()
            .await
            .context("Failed to parse gas price oracle response")
    }
}

/// The ordered set of gas prices the user can pick from.
#[derive(Debug, Clone, PartialEq)]
pub struct GasPriceBook {
    prices: Vec<GasPrice>,
}

impl Default for GasPriceBook {
    /// Defaults used until the oracle answers, in gwei.
    fn default() -> Self {
        Self {
            prices: vec![
                GasPrice {
                    speed: GasSpeed::Slow,
                    gwei: 5.0,
                },
                GasPrice {
                    speed: GasSpeed::Standard,
                    gwei: 10.0,
                },
                GasPrice {
                    speed: GasSpeed::Fast,
                    gwei: 20.0,
                },
                GasPrice {
                    speed: GasSpeed::Instant,
                    gwei: 40.0,
                },
            ],
        }
    }
}

impl GasPriceBook {
    /// Refresh the offered set from the oracle. On failure the current set
    /// is left untouched and the error is returned for the caller to treat
    /// as degraded rather than fatal.
    pub async fn update_values<O: GasOracle>(&mut self, oracle: &O) -> Result<()> {
        let quote = oracle.fetch().await?;
        self.prices = vec![
            GasPrice {
                speed: GasSpeed::Slow,
                gwei: quote.safe_low / 10.0,
            },
            GasPrice {
                speed: GasSpeed::Standard,
                gwei: quote.average / 10.0,
            },
            GasPrice {
                speed: GasSpeed::Fast,
                gwei: quote.fast / 10.0,
            },
            GasPrice {
                speed: GasSpeed::Instant,
                gwei: quote.fastest / 10.0,
            },
        ];
        tracing::debug!(prices = ?self.prices, "Gas price book refreshed");
        Ok(())
    }

    /// The offered prices, in gwei, cheapest first.
    pub fn gas_prices_in_gwei(&self) -> &[GasPrice] {
        &self.prices
    }

    /// The default offer when the user has not picked one yet.
    pub fn first_offer(&self) -> GasPrice {
        self.prices.first().cloned().unwrap_or(GasPrice {
            speed: GasSpeed::Slow,
            gwei: 5.0,
        })
    }
}
