//! Mock Market Data
//!
//! For testing and demo runs. Returns realistic static closes for the default
//! watchlists.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::MarketDataProvider;
use crate::error::{MonitorError, Result};

/// Mock provider with static closes
#[derive(Default)]
pub struct MockMarketData {
    /// Closes that replace the built-in ones
    overrides: HashMap<String, Vec<Decimal>>,

    /// Symbols that fail as if the network were down
    failures: HashSet<String>,

    /// Every request fails and the health check reports down
    offline: bool,
}

impl MockMarketData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve these closes (oldest first) for `symbol`.
    pub fn with_closes(mut self, symbol: impl Into<String>, closes: Vec<Decimal>) -> Self {
        self.overrides.insert(symbol.into(), closes);
        self
    }

    /// Serve a two-day window ending at `current`.
    pub fn with_quote(self, symbol: impl Into<String>, previous: Decimal, current: Decimal) -> Self {
        self.with_closes(symbol, vec![previous, current])
    }

    /// Make every request for `symbol` fail.
    pub fn with_failure(mut self, symbol: impl Into<String>) -> Self {
        self.failures.insert(symbol.into());
        self
    }

    /// Simulate a provider that cannot be reached at all.
    pub fn offline(mut self) -> Self {
        self.offline = true;
        self
    }

    fn base_closes(symbol: &str) -> Option<Vec<Decimal>> {
        let closes = match symbol {
            "^GSPC" => vec![dec!(5791.20), dec!(5810.40), dec!(5838.12)],
            "^NDX" => vec![dec!(20655.10), dec!(20800.00), dec!(20712.50)],
            "^VIX" => vec![dec!(17.90), dec!(17.20), dec!(16.85)],
            "^KS11" => vec![dec!(2571.80), dec!(2580.10), dec!(2561.33)],
            "USDKRW=X" => vec![dec!(1466.10), dec!(1462.50), dec!(1458.20)],
            "GC=F" => vec![dec!(4690.00), dec!(4712.30), dec!(4735.80)],
            "BTC-USD" => vec![dec!(95210.00), dec!(96800.00), dec!(97512.45)],
            "GOOGL" => vec![dec!(181.10), dec!(182.40), dec!(185.10)],
            "MU" => vec![dec!(97.35), dec!(98.20), dec!(101.75)],
            "UNH" => vec![dec!(525.00), dec!(520.40), dec!(511.90)],
            "360750.KS" => vec![dec!(21050), dec!(21100), dec!(21235)],
            "133690.KS" => vec![dec!(139100), dec!(139500), dec!(140210)],
            "091160.KS" => vec![dec!(41600), dec!(41200), dec!(40850)],
            _ => return None,
        };
        Some(closes)
    }
}

#[async_trait]
impl MarketDataProvider for MockMarketData {
    async fn daily_closes(&self, symbol: &str) -> Result<Vec<Decimal>> {
        if self.offline || self.failures.contains(symbol) {
            return Err(MonitorError::Provider(format!("simulated outage for {symbol}")));
        }

        self.overrides
            .get(symbol)
            .cloned()
            .or_else(|| Self::base_closes(symbol))
            .ok_or_else(|| MonitorError::PriceUnavailable(symbol.to_string()))
    }

    async fn health_check(&self) -> bool {
        !self.offline
    }

    fn name(&self) -> &str {
        "MockMarketData"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_closes() {
        let provider = MockMarketData::new();

        let closes = provider.daily_closes("^GSPC").await.unwrap();
        assert_eq!(closes.len(), 3);
        assert!(closes.iter().all(|c| *c > Decimal::ZERO));
    }

    #[tokio::test]
    async fn test_unknown_symbol() {
        let provider = MockMarketData::new();
        let result = provider.daily_closes("NOTREAL").await;
        assert!(matches!(result, Err(MonitorError::PriceUnavailable(_))));
    }

    #[tokio::test]
    async fn test_overrides_and_failures() {
        let provider = MockMarketData::new()
            .with_quote("^VIX", dec!(26), dec!(28))
            .with_failure("GC=F");

        assert_eq!(provider.daily_closes("^VIX").await.unwrap(), vec![dec!(26), dec!(28)]);
        assert!(provider.daily_closes("GC=F").await.is_err());
    }
}
