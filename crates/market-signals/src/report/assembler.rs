//! Report Assembler
//!
//! Builds the daily report section by section. Each section is built in
//! isolation: an error degrades that section to an inline error line and
//! the remaining sections are still assembled.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{error, warn};

use super::format::{direction_marker, format_change, format_price};
use super::{Report, Section, SectionKind};
use crate::config::{Instrument, MonitorConfig, VolatilityTiers};
use crate::error::Result;
use crate::model::{Action, ObservationSet};
use crate::strategy::{ActionPlanner, PlannerInput, SignalClassifier};

/// Extra guidance tier of the volatility deep-dive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VolatilityTier {
    Elevated,
    High,
    Extreme,
}

impl VolatilityTier {
    /// Highest tier strictly exceeded by `level`, if any.
    pub fn for_level(level: Decimal, tiers: &VolatilityTiers) -> Option<Self> {
        if level > tiers.extreme {
            Some(VolatilityTier::Extreme)
        } else if level > tiers.high {
            Some(VolatilityTier::High)
        } else if level > tiers.elevated {
            Some(VolatilityTier::Elevated)
        } else {
            None
        }
    }

    pub fn instructions(self) -> &'static [&'static str] {
        match self {
            VolatilityTier::Elevated => &[
                "Review growth positions and tighten daily monitoring",
            ],
            VolatilityTier::High => &[
                "Move 30% of technology holdings to cash",
                "Hold at least 15% cash",
            ],
            VolatilityTier::Extreme => &[
                "Move 50% or more of technology holdings to cash",
                "Hold at least 40% cash",
                "Add to gold positions",
            ],
        }
    }
}

pub struct ReportAssembler {
    config: MonitorConfig,
    classifier: SignalClassifier,
    planner: ActionPlanner,
}

impl ReportAssembler {
    pub fn new(config: &MonitorConfig) -> Self {
        Self {
            config: config.clone(),
            classifier: SignalClassifier::new(&config.thresholds.bands),
            planner: ActionPlanner::new(config.thresholds.actions.clone()),
        }
    }

    /// Build the full report from whatever observations are available.
    pub fn assemble(&self, today: NaiveDate, observations: &ObservationSet) -> Report {
        let actions = self.plan_actions(observations);

        let sections = SectionKind::ORDER
            .iter()
            .map(|&kind| isolated(kind, || self.build_section(kind, today, observations, &actions)))
            .collect();

        Report::new(today, sections, actions)
    }

    fn build_section(
        &self,
        kind: SectionKind,
        today: NaiveDate,
        observations: &ObservationSet,
        actions: &[Action],
    ) -> Result<Vec<String>> {
        let watchlists = &self.config.watchlists;
        match kind {
            SectionKind::Header => Ok(header(today)),
            SectionKind::GlobalIndices => self.instrument_list(&watchlists.global_indices, observations),
            SectionKind::Volatility => self.volatility(observations),
            SectionKind::Domestic => self.instrument_list(&watchlists.domestic, observations),
            SectionKind::CommoditiesCrypto => self.instrument_list(&watchlists.commodities, observations),
            SectionKind::Holdings => self.holdings(observations),
            SectionKind::ActionItems => Ok(action_lines(actions)),
            SectionKind::Disclaimer => Ok(disclaimer()),
        }
    }

    fn plan_actions(&self, observations: &ObservationSet) -> Vec<Action> {
        let rules = &self.config.thresholds.actions;
        let volatility = observations.get(&rules.volatility_symbol);
        let broad_index = observations.get(&rules.broad_index_symbol);
        let commodity = observations.get(&rules.commodity_symbol);

        self.planner.plan(&PlannerInput {
            volatility: &volatility,
            broad_index: &broad_index,
            commodity: &commodity,
        })
    }

    /// Price line, change line and signal lines for one instrument.
    fn instrument_block(&self, instrument: &Instrument, label: &str, observations: &ObservationSet) -> Result<Vec<String>> {
        let kind = instrument.metric_kind()?;
        let observation = observations.get(&instrument.symbol);
        let signal = self.classifier.classify_observation(kind, &observation)?;

        let mut lines = Vec::new();
        match (observation.current(), observation.percent_change()) {
            (Some(price), Some(change)) => {
                lines.push(format!(
                    "{} {label}: {}",
                    direction_marker(change),
                    format_price(price, instrument.format)
                ));
                lines.push(format!("   Change: {}", format_change(change)));
            }
            // No direction without a change
            (Some(price), None) => {
                lines.push(format!("{label}: {}", format_price(price, instrument.format)));
                lines.push("   ⚠️ Change: data error".into());
            }
            (None, _) => lines.push(format!("⚠️ {label}: data error")),
        }
        lines.push(format!("   Status: {}", signal.status));
        lines.push(format!("   Advice: {}", signal.advice));

        Ok(lines)
    }

    fn instrument_list(&self, instruments: &[Instrument], observations: &ObservationSet) -> Result<Vec<String>> {
        let mut lines = Vec::new();
        for (i, instrument) in instruments.iter().enumerate() {
            if i > 0 {
                lines.push(String::new());
            }
            lines.extend(self.instrument_block(instrument, &instrument.name, observations)?);
        }
        Ok(lines)
    }

    fn volatility(&self, observations: &ObservationSet) -> Result<Vec<String>> {
        let instrument = &self.config.watchlists.volatility;
        let kind = instrument.metric_kind()?;
        let observation = observations.get(&instrument.symbol);
        let signal = self.classifier.classify_observation(kind, &observation)?;

        let mut lines = Vec::new();
        match observation.current() {
            Some(level) => lines.push(format!(
                "Current {}: {}",
                instrument.name,
                format_price(level, instrument.format)
            )),
            None => lines.push(format!("⚠️ {}: data error", instrument.name)),
        }
        lines.push(format!("Status: {}", signal.status));
        lines.push(format!("Response: {}", signal.advice));

        let tier = observation
            .current()
            .and_then(|level| VolatilityTier::for_level(level, &self.config.thresholds.volatility_tiers));
        if let Some(tier) = tier {
            lines.push(String::new());
            lines.push("⚠️ Risk signal - recommended response:".into());
            lines.extend(
                tier.instructions()
                    .iter()
                    .enumerate()
                    .map(|(i, step)| format!("  {}. {step}", i + 1)),
            );
        }

        Ok(lines)
    }

    fn holdings(&self, observations: &ObservationSet) -> Result<Vec<String>> {
        let watchlists = &self.config.watchlists;
        let mut lines = Vec::new();

        for (i, instrument) in watchlists.holdings.iter().enumerate() {
            if i > 0 {
                lines.push(String::new());
            }
            lines.extend(self.holding_block(instrument, observations)?);
        }

        if !watchlists.funds.is_empty() {
            if !lines.is_empty() {
                lines.push(String::new());
            }
            lines.push("Funds:".into());
            for (i, instrument) in watchlists.funds.iter().enumerate() {
                if i > 0 {
                    lines.push(String::new());
                }
                lines.extend(self.holding_block(instrument, observations)?);
            }
        }

        Ok(lines)
    }

    /// Instrument block plus the stop-loss / take-profit note.
    fn holding_block(&self, instrument: &Instrument, observations: &ObservationSet) -> Result<Vec<String>> {
        let label = format!("{} ({})", instrument.name, instrument.symbol);
        let mut lines = self.instrument_block(instrument, &label, observations)?;

        let alerts = &self.config.thresholds.holding_alerts;
        if let Some(change) = observations.get(&instrument.symbol).percent_change() {
            if change < alerts.stop_loss_below {
                lines.push("   ⚠️ Consider stop-loss".into());
            } else if change > alerts.take_profit_above {
                lines.push("   🎯 Consider taking profit".into());
            }
        }

        Ok(lines)
    }
}

/// Run one section builder, degrading the section if it fails.
fn isolated(kind: SectionKind, build: impl FnOnce() -> Result<Vec<String>>) -> Section {
    match build() {
        Ok(lines) => Section::new(kind, lines),
        Err(e) if e.is_misconfiguration() => {
            error!(section = ?kind, error = %e, "Section misconfigured");
            Section::degraded(kind, &e)
        }
        Err(e) => {
            warn!(section = ?kind, error = %e, "Section degraded");
            Section::degraded(kind, &e)
        }
    }
}

fn header(today: NaiveDate) -> Vec<String> {
    vec![
        Report::banner(),
        "📊 Daily Market Monitoring Report".into(),
        format!("📅 {}", today.format("%Y-%m-%d (%A)")),
        Report::banner(),
    ]
}

fn action_lines(actions: &[Action]) -> Vec<String> {
    actions
        .iter()
        .map(|action| format!("  • {}. {}", action.priority, action.text))
        .collect()
}

fn disclaimer() -> Vec<String> {
    vec![
        Report::banner(),
        "📌 Note: this report is for reference only.".into(),
        "Seek professional advice before making investment decisions.".into(),
        Report::banner(),
    ]
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::model::{ActionRule, Observation};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 15).unwrap()
    }

    fn quote(symbol: &str, previous: Decimal, current: Decimal) -> Observation {
        Observation::from_closes(symbol, current, previous)
    }

    /// A calm market with every default symbol present.
    fn calm_market() -> Vec<Observation> {
        vec![
            quote("^GSPC", dec!(5810.40), dec!(5838.12)),
            quote("^NDX", dec!(20800), dec!(20712.50)),
            quote("^VIX", dec!(17.20), dec!(16.85)),
            quote("^KS11", dec!(2580.10), dec!(2561.33)),
            quote("USDKRW=X", dec!(1462.50), dec!(1458.20)),
            quote("GC=F", dec!(4712.30), dec!(4735.80)),
            quote("BTC-USD", dec!(96800), dec!(97512.45)),
            quote("GOOGL", dec!(182.40), dec!(185.10)),
            quote("MU", dec!(98.20), dec!(101.75)),
            quote("UNH", dec!(520.40), dec!(511.90)),
            quote("360750.KS", dec!(21100), dec!(21235)),
            quote("133690.KS", dec!(139500), dec!(140210)),
            quote("091160.KS", dec!(41200), dec!(40850)),
        ]
    }

    fn market_with(changes: Vec<Observation>) -> ObservationSet {
        let mut set: ObservationSet = calm_market().into_iter().collect();
        for observation in changes {
            set.insert(observation);
        }
        set
    }

    fn assemble(observations: &ObservationSet) -> Report {
        ReportAssembler::new(&MonitorConfig::default()).assemble(today(), observations)
    }

    #[test]
    fn test_sections_in_fixed_order() {
        let report = assemble(&market_with(Vec::new()));
        let kinds: Vec<SectionKind> = report.sections().iter().map(Section::kind).collect();
        assert_eq!(kinds, SectionKind::ORDER.to_vec());
        assert_eq!(report.degraded_sections().count(), 0);
    }

    #[test]
    fn test_header_is_date_stamped() {
        let report = assemble(&ObservationSet::new());
        let header = report.section(SectionKind::Header).unwrap();
        assert!(header.mentions("2026-10-15 (Thursday)"));
    }

    #[test]
    fn test_calm_market_renders_stable_action() {
        let report = assemble(&market_with(Vec::new()));
        assert_eq!(report.actions().len(), 1);
        assert_eq!(report.actions()[0].rule, ActionRule::Stable);

        let actions = report.section(SectionKind::ActionItems).unwrap();
        assert_eq!(actions.lines(), ["  • 1. Stable - continue routine monitoring"]);
    }

    #[test]
    fn test_vix_28_gets_high_tier_only() {
        let report = assemble(&market_with(vec![quote("^VIX", dec!(24), dec!(28))]));
        let section = report.section(SectionKind::Volatility).unwrap();

        assert!(section.mentions("Current VIX: 28.00"));
        assert!(section.mentions("Status: 🟠 Warning"));
        assert!(section.mentions("Move 30% of technology holdings to cash"));
        assert!(!section.mentions("Move 50% or more"));
        assert!(!section.mentions("Review growth positions"));

        assert!(report.actions().iter().any(|a| a.rule == ActionRule::ReduceGrowthExposure));
    }

    #[test]
    fn test_volatility_tiers() {
        let tiers = VolatilityTiers::default();
        assert_eq!(VolatilityTier::for_level(dec!(20), &tiers), None);
        assert_eq!(VolatilityTier::for_level(dec!(20.5), &tiers), Some(VolatilityTier::Elevated));
        assert_eq!(VolatilityTier::for_level(dec!(25), &tiers), Some(VolatilityTier::Elevated));
        assert_eq!(VolatilityTier::for_level(dec!(28), &tiers), Some(VolatilityTier::High));
        assert_eq!(VolatilityTier::for_level(dec!(30), &tiers), Some(VolatilityTier::High));
        assert_eq!(VolatilityTier::for_level(dec!(31), &tiers), Some(VolatilityTier::Extreme));
        assert_eq!(VolatilityTier::Extreme.instructions().len(), 3);
    }

    #[test]
    fn test_calm_volatility_has_no_guidance() {
        let report = assemble(&market_with(Vec::new()));
        let section = report.section(SectionKind::Volatility).unwrap();
        assert!(!section.mentions("Risk signal"));
    }

    #[test]
    fn test_broad_index_crash() {
        let report = assemble(&market_with(vec![quote("^GSPC", dec!(100), dec!(94))]));

        let indices = report.section(SectionKind::GlobalIndices).unwrap();
        assert!(indices.mentions("📉 S&P500: 94.00"));
        assert!(indices.mentions("Change: -6.00%"));
        assert!(indices.mentions("Status: 🔴 Severe"));

        let rules: Vec<ActionRule> = report.actions().iter().map(|a| a.rule).collect();
        assert_eq!(rules, vec![ActionRule::RaiseCashReserve]);
        let items = report.section(SectionKind::ActionItems).unwrap();
        assert!(items.mentions("2. Raise cash reserve to at least 15%"));
    }

    #[test]
    fn test_currency_high_rate() {
        let report = assemble(&market_with(vec![quote("USDKRW=X", dec!(1495), dec!(1510))]));
        let domestic = report.section(SectionKind::Domestic).unwrap();
        assert!(domestic.mentions("USD/KRW: 1510.00"));
        assert!(domestic.mentions("Status: 🔴 Severe"));
        assert!(domestic.mentions("halt dollar-asset purchases"));
    }

    #[test]
    fn test_holding_stop_loss_note() {
        let report = assemble(&market_with(vec![quote("MU", dec!(100), dec!(82))]));
        let holdings = report.section(SectionKind::Holdings).unwrap();

        assert!(holdings.mentions("📉 Micron (MU): $82.00"));
        assert!(holdings.mentions("Change: -18.00%"));
        assert!(holdings.mentions("Status: 🔴 Severe"));
        assert!(holdings.mentions("Consider stop-loss"));
        assert!(!holdings.mentions("Consider taking profit"));
    }

    #[test]
    fn test_holding_take_profit_note() {
        let report = assemble(&market_with(vec![quote("GOOGL", dec!(100), dec!(125))]));
        let holdings = report.section(SectionKind::Holdings).unwrap();
        assert!(holdings.mentions("Consider taking profit"));
        assert!(!holdings.mentions("Consider stop-loss"));
    }

    #[test]
    fn test_holding_alerts_are_strict() {
        let report = assemble(&market_with(vec![
            quote("MU", dec!(100), dec!(85)),
            quote("GOOGL", dec!(100), dec!(120)),
        ]));
        let holdings = report.section(SectionKind::Holdings).unwrap();

        assert!(holdings.mentions("Change: -15.00%"));
        assert!(holdings.mentions("Change: +20.00%"));
        assert!(!holdings.mentions("Consider stop-loss"));
        assert!(!holdings.mentions("Consider taking profit"));
    }

    #[test]
    fn test_price_without_change_has_no_direction() {
        let report = assemble(&market_with(vec![quote("MU", dec!(0), dec!(82))]));
        let holdings = report.section(SectionKind::Holdings).unwrap();

        assert!(holdings.lines().iter().any(|l| l == "Micron (MU): $82.00"));
        assert!(holdings.mentions("⚠️ Change: data error"));
        assert!(!holdings.mentions("📈 Micron"));
        assert!(!holdings.mentions("📉 Micron"));
        assert!(!holdings.mentions("n/a"));
        assert!(!holdings.is_degraded());
    }

    #[test]
    fn test_funds_follow_holdings() {
        let report = assemble(&market_with(Vec::new()));
        let holdings = report.section(SectionKind::Holdings).unwrap();
        let funds_at = holdings.lines().iter().position(|l| l == "Funds:").unwrap();
        let google_at = holdings.lines().iter().position(|l| l.contains("GOOGL")).unwrap();
        assert!(google_at < funds_at);
        assert!(holdings.mentions("KODEX Semiconductor (091160.KS)"));
    }

    #[test]
    fn test_unavailable_instrument_renders_data_error() {
        let mut set: ObservationSet = calm_market().into_iter().collect();
        set.insert(Observation::missing("USDKRW=X"));
        let report = assemble(&set);

        let domestic = report.section(SectionKind::Domestic).unwrap();
        assert!(!domestic.is_degraded());
        assert!(domestic.mentions("⚠️ USD/KRW: data error"));
        assert!(domestic.mentions("Status: ⚠️ Data error"));
        assert!(domestic.mentions("KOSPI: 2561.33"));

        let commodities = report.section(SectionKind::CommoditiesCrypto).unwrap();
        assert!(commodities.mentions("Bitcoin: $97,512"));
        assert_eq!(report.degraded_sections().count(), 0);
    }

    #[test]
    fn test_empty_observations_still_list_every_instrument() {
        let config = MonitorConfig::default();
        let report = assemble(&ObservationSet::new());
        let rendered = report.render();

        for instrument in config.watchlists.instruments() {
            assert!(rendered.contains(&format!("⚠️ {}", instrument.name)), "{}", instrument.name);
        }
        assert_eq!(report.actions()[0].rule, ActionRule::Stable);
        assert_eq!(report.degraded_sections().count(), 0);
    }

    #[test]
    fn test_misconfigured_section_degrades_alone() {
        let mut config = MonitorConfig::default();
        config.watchlists.holdings[1].kind = None;

        let report = ReportAssembler::new(&config).assemble(today(), &market_with(Vec::new()));

        let holdings = report.section(SectionKind::Holdings).unwrap();
        assert!(holdings.is_degraded());
        assert!(holdings.mentions("Section unavailable"));
        assert!(holdings.mentions("Micron (MU) is not mapped"));

        let degraded: Vec<SectionKind> = report.degraded_sections().map(Section::kind).collect();
        assert_eq!(degraded, vec![SectionKind::Holdings]);
        assert!(report.section(SectionKind::ActionItems).unwrap().mentions("Stable"));
    }

    #[test]
    fn test_missing_band_table_degrades_its_sections() {
        let mut config = MonitorConfig::default();
        config
            .thresholds
            .bands
            .retain(|table| table.kind != crate::model::MetricKind::CryptoPrice);

        let report = ReportAssembler::new(&config).assemble(today(), &market_with(Vec::new()));

        let degraded: Vec<SectionKind> = report.degraded_sections().map(Section::kind).collect();
        assert_eq!(degraded, vec![SectionKind::CommoditiesCrypto]);
        assert!(report.render().contains("No band table configured for crypto_price"));
    }
}
