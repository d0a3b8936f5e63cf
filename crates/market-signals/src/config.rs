//! Monitor Configuration
//!
//! Watchlists and thresholds passed explicitly into the classifier, planner
//! and report assembler. Every section has built-in defaults; a TOML file
//! overrides whatever it names.

use std::collections::HashSet;
use std::path::Path;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{MonitorError, Result};
use crate::model::MetricKind;
use crate::strategy::bands::{default_tables, BandTable};

/// How an instrument's price is printed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceFormat {
    /// `5830.12`
    #[default]
    Plain,
    /// `$4850.00`
    Dollar,
    /// `$97,500`
    DollarWhole,
}

/// A configured instrument.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    /// Display name (e.g., "S&P500")
    pub name: String,

    /// Provider symbol (e.g., "^GSPC")
    pub symbol: String,

    /// Rule set used to classify it. `None` is a configuration error.
    #[serde(default)]
    pub kind: Option<MetricKind>,

    #[serde(default)]
    pub format: PriceFormat,
}

impl Instrument {
    pub fn new(name: impl Into<String>, symbol: impl Into<String>, kind: MetricKind) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            kind: Some(kind),
            format: PriceFormat::Plain,
        }
    }

    pub fn with_format(mut self, format: PriceFormat) -> Self {
        self.format = format;
        self
    }

    /// Resolve the metric kind or report the instrument as unmapped.
    pub fn metric_kind(&self) -> Result<MetricKind> {
        self.kind.ok_or_else(|| MonitorError::UnmappedInstrument {
            name: self.name.clone(),
            symbol: self.symbol.clone(),
        })
    }
}

/// Named groups of instruments, one per report section.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Watchlists {
    pub global_indices: Vec<Instrument>,
    pub volatility: Instrument,
    pub domestic: Vec<Instrument>,
    pub commodities: Vec<Instrument>,
    pub holdings: Vec<Instrument>,
    pub funds: Vec<Instrument>,
}

impl Default for Watchlists {
    fn default() -> Self {
        use MetricKind::{BroadIndexChange, CommodityPrice, CryptoPrice, CurrencyRate, VolatilityIndex};

        let gold = Instrument::new("Gold", "GC=F", CommodityPrice).with_format(PriceFormat::Dollar);

        Self {
            global_indices: vec![
                Instrument::new("S&P500", "^GSPC", BroadIndexChange),
                Instrument::new("NASDAQ100", "^NDX", BroadIndexChange),
                Instrument::new("VIX", "^VIX", VolatilityIndex),
                gold.clone(),
            ],
            volatility: Instrument::new("VIX", "^VIX", VolatilityIndex),
            domestic: vec![
                Instrument::new("KOSPI", "^KS11", BroadIndexChange),
                Instrument::new("USD/KRW", "USDKRW=X", CurrencyRate),
            ],
            commodities: vec![
                gold,
                Instrument::new("Bitcoin", "BTC-USD", CryptoPrice).with_format(PriceFormat::DollarWhole),
            ],
            holdings: vec![
                Instrument::new("Google", "GOOGL", BroadIndexChange).with_format(PriceFormat::Dollar),
                Instrument::new("Micron", "MU", BroadIndexChange).with_format(PriceFormat::Dollar),
                Instrument::new("UnitedHealth", "UNH", BroadIndexChange).with_format(PriceFormat::Dollar),
            ],
            funds: vec![
                Instrument::new("TIGER S&P500", "360750.KS", BroadIndexChange),
                Instrument::new("TIGER NASDAQ100", "133690.KS", BroadIndexChange),
                Instrument::new("KODEX Semiconductor", "091160.KS", BroadIndexChange),
            ],
        }
    }
}

impl Watchlists {
    /// Every instrument, in report order.
    pub fn instruments(&self) -> impl Iterator<Item = &Instrument> {
        self.global_indices
            .iter()
            .chain(std::iter::once(&self.volatility))
            .chain(&self.domestic)
            .chain(&self.commodities)
            .chain(&self.holdings)
            .chain(&self.funds)
    }
}

/// Volatility levels that unlock extra guidance in the deep-dive section.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolatilityTiers {
    pub elevated: Decimal,
    pub high: Decimal,
    pub extreme: Decimal,
}

impl Default for VolatilityTiers {
    fn default() -> Self {
        Self {
            elevated: dec!(20),
            high: dec!(25),
            extreme: dec!(30),
        }
    }
}

/// Per-holding daily change alerts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoldingAlerts {
    pub stop_loss_below: Decimal,
    pub take_profit_above: Decimal,
}

impl Default for HoldingAlerts {
    fn default() -> Self {
        Self {
            stop_loss_below: dec!(-15),
            take_profit_above: dec!(20),
        }
    }
}

/// Inputs and trigger levels of the action planner.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionRules {
    pub volatility_symbol: String,
    pub volatility_above: Decimal,
    pub broad_index_symbol: String,
    pub broad_index_below: Decimal,
    pub commodity_symbol: String,
    pub commodity_above: Decimal,
}

impl Default for ActionRules {
    fn default() -> Self {
        Self {
            volatility_symbol: "^VIX".into(),
            volatility_above: dec!(25),
            broad_index_symbol: "^GSPC".into(),
            broad_index_below: dec!(-5),
            commodity_symbol: "GC=F".into(),
            commodity_above: dec!(4800),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Replaces the built-in tables wholesale when present
    pub bands: Vec<BandTable>,
    pub volatility_tiers: VolatilityTiers,
    pub holding_alerts: HoldingAlerts,
    pub actions: ActionRules,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            bands: default_tables(),
            volatility_tiers: VolatilityTiers::default(),
            holding_alerts: HoldingAlerts::default(),
            actions: ActionRules::default(),
        }
    }
}

/// Complete configuration of one monitoring run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub watchlists: Watchlists,
    pub thresholds: Thresholds,
}

impl MonitorConfig {
    /// Load from a TOML file, or fall back to defaults when it does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!(path = %path.display(), "Config file not found, using built-in defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        debug!(path = %path.display(), "Loaded monitor config");
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Every symbol the run needs, deduplicated, in first-use order.
    pub fn symbols(&self) -> Vec<String> {
        let actions = &self.thresholds.actions;
        let mut seen = HashSet::new();

        self.watchlists
            .instruments()
            .map(|instrument| instrument.symbol.as_str())
            .chain([
                actions.volatility_symbol.as_str(),
                actions.broad_index_symbol.as_str(),
                actions.commodity_symbol.as_str(),
            ])
            .filter(|symbol| seen.insert(*symbol))
            .map(str::to_string)
            .collect()
    }

    /// All configuration problems found.
    pub fn issues(&self) -> Vec<MonitorError> {
        let mut issues = Vec::new();

        for kind in MetricKind::ALL {
            let count = self.thresholds.bands.iter().filter(|t| t.kind == kind).count();
            match count {
                0 => issues.push(MonitorError::MissingBandTable(kind)),
                1 => {}
                _ => issues.push(MonitorError::InvalidBandTable {
                    kind,
                    reason: format!("{count} tables configured"),
                }),
            }
        }

        issues.extend(
            self.thresholds
                .bands
                .iter()
                .filter_map(|table| table.validate().err()),
        );

        issues.extend(
            self.watchlists
                .instruments()
                .filter_map(|instrument| instrument.metric_kind().err()),
        );

        let tiers = &self.thresholds.volatility_tiers;
        if !(tiers.elevated <= tiers.high && tiers.high <= tiers.extreme) {
            issues.push(MonitorError::Config(format!(
                "volatility tiers must ascend: {} / {} / {}",
                tiers.elevated, tiers.high, tiers.extreme
            )));
        }

        let alerts = &self.thresholds.holding_alerts;
        if alerts.stop_loss_below >= alerts.take_profit_above {
            issues.push(MonitorError::Config(format!(
                "stop-loss level {} must be below take-profit level {}",
                alerts.stop_loss_below, alerts.take_profit_above
            )));
        }

        issues
    }

    /// Fail on the first configuration problem.
    pub fn validate(&self) -> Result<()> {
        match self.issues().into_iter().next() {
            Some(issue) => Err(issue),
            None => Ok(()),
        }
    }
}
