//! Market Data Providers
//!
//! Sources of daily closing prices. Whatever goes wrong inside a provider,
//! the report only ever sees an [`Observation`], possibly a missing one.

mod mock;
mod yahoo;

pub use mock::MockMarketData;
pub use yahoo::{YahooChartClient, YahooConfig};

use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::{debug, error, warn};

use crate::error::Result;
use crate::model::{Observation, ObservationSet};

/// Market data provider trait (Strategy pattern)
///
/// Implement this for each data source: Yahoo, a broker API, a fixture, etc.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Recent daily closes for a symbol, oldest first
    async fn daily_closes(&self, symbol: &str) -> Result<Vec<Decimal>>;

    /// Check if the provider is reachable before a run
    async fn health_check(&self) -> bool;

    /// Provider name
    fn name(&self) -> &str;
}

/// Fetch one observation, turning any provider failure into a missing one.
pub async fn fetch_observation(provider: &dyn MarketDataProvider, symbol: &str) -> Observation {
    let observation = provider
        .daily_closes(symbol)
        .await
        .and_then(|closes| Observation::from_history(symbol, &closes));

    match observation {
        Ok(observation) => {
            debug!(
                provider = provider.name(),
                symbol,
                current = ?observation.current(),
                previous = ?observation.previous(),
                change = ?observation.percent_change(),
                "Fetched observation"
            );
            observation
        }
        Err(e) if e.is_unavailable() => {
            warn!(provider = provider.name(), symbol, error = %e, "Observation unavailable");
            Observation::missing(symbol)
        }
        Err(e) => {
            error!(provider = provider.name(), symbol, error = %e, "Provider failed unexpectedly");
            Observation::missing(symbol)
        }
    }
}

/// Fetch every symbol one after another.
pub async fn collect_observations(provider: &dyn MarketDataProvider, symbols: &[String]) -> ObservationSet {
    let mut observations = ObservationSet::new();
    for symbol in symbols {
        observations.insert(fetch_observation(provider, symbol).await);
    }
    observations
}
