//! Domain Models
//!
//! Core data types for daily market monitoring.
//! Uses `rust_decimal` for every price and percentage.

use std::collections::HashMap;
use std::fmt;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{MonitorError, Result};

/// Snapshot of one instrument for today's run.
///
/// Fields are private so that the absence invariant holds: when either close
/// is missing, the percent change is missing too.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Observation {
    symbol: String,
    current: Option<Decimal>,
    previous: Option<Decimal>,
    percent_change: Option<Decimal>,
}

impl Observation {
    /// Build from the latest close and the close before it.
    pub fn from_closes(symbol: impl Into<String>, current: Decimal, previous: Decimal) -> Self {
        let percent_change = if previous.is_zero() {
            None
        } else {
            Some(((current - previous) / previous * dec!(100)).round_dp(2))
        };

        Self {
            symbol: symbol.into(),
            current: Some(current.round_dp(2)),
            previous: Some(previous.round_dp(2)),
            percent_change,
        }
    }

    /// Build from a window of daily closes, oldest first.
    pub fn from_history(symbol: impl Into<String>, closes: &[Decimal]) -> Result<Self> {
        let symbol = symbol.into();
        match closes {
            [.., previous, current] => Ok(Self::from_closes(symbol, *current, *previous)),
            _ => Err(MonitorError::InsufficientHistory {
                symbol,
                points: closes.len(),
            }),
        }
    }

    /// Explicit "unavailable" marker.
    pub fn missing(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            current: None,
            previous: None,
            percent_change: None,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn current(&self) -> Option<Decimal> {
        self.current
    }

    pub fn previous(&self) -> Option<Decimal> {
        self.previous
    }

    pub fn percent_change(&self) -> Option<Decimal> {
        self.percent_change
    }

    pub fn is_missing(&self) -> bool {
        self.current.is_none()
    }
}

/// Observations for one run, keyed by symbol.
///
/// Looking up a symbol that was never fetched yields a missing observation.
#[derive(Clone, Debug, Default)]
pub struct ObservationSet {
    by_symbol: HashMap<String, Observation>,
}

impl ObservationSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, observation: Observation) {
        self.by_symbol.insert(observation.symbol.clone(), observation);
    }

    pub fn get(&self, symbol: &str) -> Observation {
        self.by_symbol
            .get(symbol)
            .cloned()
            .unwrap_or_else(|| Observation::missing(symbol))
    }

    pub fn len(&self) -> usize {
        self.by_symbol.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_symbol.is_empty()
    }

    /// Number of observations that carry data.
    pub fn available(&self) -> usize {
        self.by_symbol.values().filter(|o| !o.is_missing()).count()
    }
}

impl FromIterator<Observation> for ObservationSet {
    fn from_iter<I: IntoIterator<Item = Observation>>(iter: I) -> Self {
        let mut set = Self::new();
        for observation in iter {
            set.insert(observation);
        }
        set
    }
}

/// Classification rule set applied to an observation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    VolatilityIndex,
    BroadIndexChange,
    CurrencyRate,
    CommodityPrice,
    CryptoPrice,
}

impl MetricKind {
    pub const ALL: [MetricKind; 5] = [
        MetricKind::VolatilityIndex,
        MetricKind::BroadIndexChange,
        MetricKind::CurrencyRate,
        MetricKind::CommodityPrice,
        MetricKind::CryptoPrice,
    ];

    /// The observation field this kind is classified on: the daily percent
    /// change for broad indices, the price level for everything else.
    pub fn input(self, observation: &Observation) -> Option<Decimal> {
        match self {
            MetricKind::BroadIndexChange => observation.percent_change(),
            _ => observation.current(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MetricKind::VolatilityIndex => "volatility_index",
            MetricKind::BroadIndexChange => "broad_index_change",
            MetricKind::CurrencyRate => "currency_rate",
            MetricKind::CommodityPrice => "commodity_price",
            MetricKind::CryptoPrice => "crypto_price",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity label of a signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Safe,
    Normal,
    Caution,
    Warning,
    Severe,
    Bullish,
    Opportunity,
    BuyOpportunity,
    HighPrice,
    DataError,
}

impl Status {
    pub fn marker(self) -> &'static str {
        match self {
            Status::Safe | Status::Normal | Status::Bullish | Status::Opportunity | Status::BuyOpportunity => "🟢",
            Status::Caution => "🟡",
            Status::Warning | Status::HighPrice => "🟠",
            Status::Severe => "🔴",
            Status::DataError => "⚠️",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Status::Safe => "Safe zone",
            Status::Normal => "Normal",
            Status::Caution => "Caution",
            Status::Warning => "Warning",
            Status::Severe => "Severe",
            Status::Bullish => "Bullish",
            Status::Opportunity => "Opportunity",
            Status::BuyOpportunity => "Buy opportunity",
            Status::HighPrice => "High price",
            Status::DataError => "Data error",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.marker(), self.name())
    }
}

/// Classification outcome for one observation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    pub status: Status,
    pub advice: String,
}

impl Signal {
    pub const DATA_ERROR_ADVICE: &'static str = "Data could not be collected";

    pub fn new(status: Status, advice: impl Into<String>) -> Self {
        Self {
            status,
            advice: advice.into(),
        }
    }

    pub fn data_error() -> Self {
        Self::new(Status::DataError, Self::DATA_ERROR_ADVICE)
    }

    pub fn is_data_error(&self) -> bool {
        self.status == Status::DataError
    }
}

/// Rule that produced an action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionRule {
    ReduceGrowthExposure,
    RaiseCashReserve,
    AccumulateCommodity,
    Stable,
}

impl ActionRule {
    pub fn text(self) -> &'static str {
        match self {
            ActionRule::ReduceGrowthExposure => "Reduce growth/technology exposure by 20-30%",
            ActionRule::RaiseCashReserve => "Raise cash reserve to at least 15%",
            ActionRule::AccumulateCommodity => "Increase scheduled commodity purchases",
            ActionRule::Stable => "Stable - continue routine monitoring",
        }
    }
}

/// A recommended portfolio response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// Fixed rank of the rule that fired (report order)
    pub priority: u8,

    pub rule: ActionRule,

    /// Human-readable instruction
    pub text: String,
}

impl Action {
    pub fn new(priority: u8, rule: ActionRule) -> Self {
        Self {
            priority,
            rule,
            text: rule.text().to_string(),
        }
    }
}
