//! Band Tables
//!
//! Ordered interval tables mapping a value to a status/advice pair.
//! One generic lookup replaces per-metric comparison chains.

use std::ops::{Bound, RangeBounds};

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{MonitorError, Result};
use crate::model::{MetricKind, Signal, Status};

/// Which ends of a band include their boundary value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Closed {
    /// `[from, to)`
    #[default]
    Lower,
    /// `(from, to]`
    Upper,
    /// `[from, to]`
    Both,
    /// `(from, to)`
    Neither,
}

impl Closed {
    pub fn includes_lower(self) -> bool {
        matches!(self, Closed::Lower | Closed::Both)
    }

    pub fn includes_upper(self) -> bool {
        matches!(self, Closed::Upper | Closed::Both)
    }
}

/// One row of a band table. A missing `from`/`to` is unbounded on that side.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Band {
    #[serde(default)]
    pub from: Option<Decimal>,

    #[serde(default)]
    pub to: Option<Decimal>,

    #[serde(default)]
    pub closed: Closed,

    pub status: Status,

    pub advice: String,
}

impl Band {
    pub fn new(
        from: Option<Decimal>,
        to: Option<Decimal>,
        closed: Closed,
        status: Status,
        advice: impl Into<String>,
    ) -> Self {
        Self {
            from,
            to,
            closed,
            status,
            advice: advice.into(),
        }
    }

    pub fn bounds(&self) -> (Bound<Decimal>, Bound<Decimal>) {
        let lower = match self.from {
            None => Bound::Unbounded,
            Some(v) if self.closed.includes_lower() => Bound::Included(v),
            Some(v) => Bound::Excluded(v),
        };
        let upper = match self.to {
            None => Bound::Unbounded,
            Some(v) if self.closed.includes_upper() => Bound::Included(v),
            Some(v) => Bound::Excluded(v),
        };
        (lower, upper)
    }

    pub fn contains(&self, value: Decimal) -> bool {
        self.bounds().contains(&value)
    }

    pub fn signal(&self) -> Signal {
        Signal::new(self.status, self.advice.clone())
    }
}

/// Bands for one metric kind, ordered low to high.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandTable {
    pub kind: MetricKind,

    pub rows: Vec<Band>,
}

impl BandTable {
    pub fn new(kind: MetricKind, rows: Vec<Band>) -> Self {
        Self { kind, rows }
    }

    /// Find the band containing `value`.
    pub fn lookup(&self, value: Decimal) -> Option<&Band> {
        self.rows.iter().find(|band| band.contains(value))
    }

    /// Check that the rows cover the whole number line without overlap.
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| MonitorError::InvalidBandTable {
            kind: self.kind,
            reason,
        };

        let (Some(first), Some(last)) = (self.rows.first(), self.rows.last()) else {
            return Err(invalid("table has no rows".into()));
        };
        if first.from.is_some() {
            return Err(invalid("first band must be unbounded below".into()));
        }
        if last.to.is_some() {
            return Err(invalid("last band must be unbounded above".into()));
        }

        for (index, band) in self.rows.iter().enumerate() {
            if index > 0 && band.from.is_none() {
                return Err(invalid(format!("band {index} is unbounded below")));
            }
            if index + 1 < self.rows.len() && band.to.is_none() {
                return Err(invalid(format!("band {index} is unbounded above")));
            }
            if let (Some(from), Some(to)) = (band.from, band.to) {
                let empty = from > to || (from == to && band.closed != Closed::Both);
                if empty {
                    return Err(invalid(format!("band {index} [{from}, {to}] is empty")));
                }
            }
        }

        for (index, pair) in self.rows.windows(2).enumerate() {
            let (below, above) = (&pair[0], &pair[1]);
            if below.to != above.from {
                return Err(invalid(format!(
                    "bands {index} and {} do not share a boundary",
                    index + 1
                )));
            }
            match (below.closed.includes_upper(), above.closed.includes_lower()) {
                (true, true) => {
                    return Err(invalid(format!(
                        "bands {index} and {} both include {}",
                        index + 1,
                        above.from.unwrap_or_default()
                    )));
                }
                (false, false) => {
                    return Err(invalid(format!(
                        "bands {index} and {} both exclude {}",
                        index + 1,
                        above.from.unwrap_or_default()
                    )));
                }
                _ => {}
            }
        }

        Ok(())
    }
}

/// Built-in tables for every metric kind.
pub fn default_tables() -> Vec<BandTable> {
    MetricKind::ALL.iter().map(|kind| default_table(*kind)).collect()
}

pub fn default_table(kind: MetricKind) -> BandTable {
    use Closed::{Both, Lower, Neither, Upper};

    let rows = match kind {
        MetricKind::VolatilityIndex => vec![
            Band::new(None, Some(dec!(12)), Upper, Status::Safe, "Normal range"),
            Band::new(Some(dec!(12)), Some(dec!(20)), Upper, Status::Normal, "Normal volatility"),
            Band::new(Some(dec!(20)), Some(dec!(25)), Upper, Status::Caution, "Slight unease"),
            Band::new(Some(dec!(25)), Some(dec!(30)), Neither, Status::Warning, "Anxiety rising"),
            Band::new(Some(dec!(30)), None, Lower, Status::Severe, "Fear signal"),
        ],
        MetricKind::BroadIndexChange => vec![
            Band::new(None, Some(dec!(-5)), Lower, Status::Severe, "Full bear trend"),
            Band::new(Some(dec!(-5)), Some(dec!(-2)), Lower, Status::Warning, "Weakness signal"),
            Band::new(Some(dec!(-2)), Some(dec!(0)), Lower, Status::Caution, "Minor pullback"),
            Band::new(Some(dec!(0)), None, Lower, Status::Bullish, "Uptrend"),
        ],
        MetricKind::CurrencyRate => vec![
            Band::new(None, Some(dec!(1400)), Lower, Status::Opportunity, "Low rate (dollar buying opportunity)"),
            Band::new(Some(dec!(1400)), Some(dec!(1480)), Both, Status::Normal, "Normal range"),
            Band::new(Some(dec!(1480)), Some(dec!(1500)), Upper, Status::Caution, "Elevated rate"),
            Band::new(Some(dec!(1500)), None, Upper, Status::Severe, "High rate (halt dollar-asset purchases)"),
        ],
        MetricKind::CommodityPrice => vec![
            Band::new(None, Some(dec!(4500)), Upper, Status::Severe, "Stop-loss signal"),
            Band::new(Some(dec!(4500)), Some(dec!(4800)), Upper, Status::Normal, "Fair price"),
            Band::new(Some(dec!(4800)), Some(dec!(5000)), Upper, Status::BuyOpportunity, "Near target price"),
            Band::new(Some(dec!(5000)), None, Upper, Status::HighPrice, "First-half target reached"),
        ],
        MetricKind::CryptoPrice => vec![
            Band::new(None, Some(dec!(100000)), Upper, Status::Severe, "Forced-liquidation signal"),
            Band::new(Some(dec!(100000)), Some(dec!(120000)), Upper, Status::BuyOpportunity, "Technical support level"),
            Band::new(Some(dec!(120000)), Some(dec!(150000)), Upper, Status::Caution, "High-price zone"),
            Band::new(Some(dec!(150000)), None, Upper, Status::HighPrice, "Target reached"),
        ],
    };

    BandTable::new(kind, rows)
}
