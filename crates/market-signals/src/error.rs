//! Error Types for Market Signals

use rust_decimal::Decimal;
use thiserror::Error;

use crate::model::MetricKind;

pub type Result<T> = std::result::Result<T, MonitorError>;

#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Price unavailable for {0}")]
    PriceUnavailable(String),

    #[error("Insufficient history for {symbol}: {points} close(s)")]
    InsufficientHistory {
        symbol: String,
        points: usize,
    },

    #[error("No band table configured for {0}")]
    MissingBandTable(MetricKind),

    #[error("Invalid band table for {kind}: {reason}")]
    InvalidBandTable {
        kind: MetricKind,
        reason: String,
    },

    #[error("Value {value} falls outside every {kind} band")]
    BandGap {
        kind: MetricKind,
        value: Decimal,
    },

    #[error("Instrument {name} ({symbol}) is not mapped to a metric kind")]
    UnmappedInstrument {
        name: String,
        symbol: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl MonitorError {
    /// Errors caused by the watchlist or threshold configuration rather than
    /// by market data.
    pub fn is_misconfiguration(&self) -> bool {
        matches!(
            self,
            MonitorError::MissingBandTable(_)
                | MonitorError::InvalidBandTable { .. }
                | MonitorError::BandGap { .. }
                | MonitorError::UnmappedInstrument { .. }
                | MonitorError::Config(_)
                | MonitorError::ConfigParse(_)
        )
    }

    /// Errors that mean "this instrument has no data today".
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            MonitorError::Provider(_)
                | MonitorError::PriceUnavailable(_)
                | MonitorError::InsufficientHistory { .. }
                | MonitorError::Network(_)
                | MonitorError::Serialization(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        let missing = MonitorError::MissingBandTable(MetricKind::CryptoPrice);
        assert!(missing.is_misconfiguration());
        assert!(!missing.is_unavailable());

        let history = MonitorError::InsufficientHistory { symbol: "^VIX".into(), points: 1 };
        assert!(history.is_unavailable());
        assert!(!history.is_misconfiguration());
    }
}
