//! One monitoring run: fetch, assemble, deliver.

use chrono::NaiveDate;
use market_notify::Notifier;
use market_signals::{MarketDataProvider, MonitorConfig, Report, ReportAssembler, collect_observations};
use tracing::{info, warn};

/// Probe the provider before a run. An unreachable provider is logged and
/// the run continues; every instrument then shows a data error.
pub async fn check_provider(provider: &dyn MarketDataProvider) -> bool {
    let healthy = provider.health_check().await;
    if healthy {
        info!(provider = provider.name(), "✓ Market data provider reachable");
    } else {
        warn!(provider = provider.name(), "⚠ Market data provider not reachable - instruments will show data errors");
    }
    healthy
}

/// Fetch every configured symbol and assemble the report for `today`.
pub async fn build_report(provider: &dyn MarketDataProvider, config: &MonitorConfig, today: NaiveDate) -> Report {
    let symbols = config.symbols();
    info!(provider = provider.name(), symbols = symbols.len(), "Collecting market data");

    let observations = collect_observations(provider, &symbols).await;
    let available = observations.available();
    if available < symbols.len() {
        warn!(available, requested = symbols.len(), "Some instruments have no data today");
    }

    let report = ReportAssembler::new(config).assemble(today, &observations);
    info!(date = %report.date(), actions = report.actions().len(), "Report assembled");
    for section in report.degraded_sections() {
        warn!(section = ?section.kind(), "Report section degraded");
    }
    report
}

/// Hand the report to the transport. Returns whether it was accepted.
pub async fn deliver(notifier: &dyn Notifier, report: &Report) -> bool {
    notifier.deliver(&report.subject(), &report.render()).await
}

#[cfg(test)]
mod tests {
    use market_notify::MemoryNotifier;
    use market_signals::{ActionRule, MockMarketData, SectionKind};
    use rust_decimal_macros::dec;

    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 15).unwrap()
    }

    #[tokio::test]
    async fn test_demo_run_is_complete() {
        let report = build_report(&MockMarketData::new(), &MonitorConfig::default(), today()).await;

        assert_eq!(report.sections().len(), SectionKind::ORDER.len());
        assert_eq!(report.degraded_sections().count(), 0);
        assert_eq!(report.actions()[0].rule, ActionRule::Stable);
        assert!(!report.render().contains("data error"));
    }

    #[tokio::test]
    async fn test_check_provider() {
        assert!(check_provider(&MockMarketData::new()).await);
        assert!(!check_provider(&MockMarketData::new().offline()).await);
    }

    #[tokio::test]
    async fn test_unreachable_provider_still_reports() {
        let provider = MockMarketData::new().offline();
        let report = build_report(&provider, &MonitorConfig::default(), today()).await;

        assert_eq!(report.date(), today());
        assert_eq!(report.degraded_sections().count(), 0);
        assert!(report.section(SectionKind::Volatility).unwrap().mentions("⚠️ VIX: data error"));
        assert_eq!(report.actions()[0].rule, ActionRule::Stable);
    }

    #[tokio::test]
    async fn test_outage_keeps_other_sections() {
        let provider = MockMarketData::new().with_failure("USDKRW=X");
        let report = build_report(&provider, &MonitorConfig::default(), today()).await;

        let domestic = report.section(SectionKind::Domestic).unwrap();
        assert!(domestic.mentions("⚠️ USD/KRW: data error"));
        assert!(domestic.mentions("KOSPI"));
        assert!(report.section(SectionKind::GlobalIndices).unwrap().mentions("S&P500: 5838.12"));
        assert_eq!(report.degraded_sections().count(), 0);
    }

    #[tokio::test]
    async fn test_stressed_market() {
        let provider = MockMarketData::new()
            .with_quote("^VIX", dec!(24), dec!(28))
            .with_quote("^GSPC", dec!(100), dec!(94))
            .with_quote("GC=F", dec!(4850), dec!(4900));
        let report = build_report(&provider, &MonitorConfig::default(), today()).await;

        let rules: Vec<ActionRule> = report.actions().iter().map(|a| a.rule).collect();
        assert_eq!(
            rules,
            vec![
                ActionRule::ReduceGrowthExposure,
                ActionRule::RaiseCashReserve,
                ActionRule::AccumulateCommodity,
            ]
        );
        let volatility = report.section(SectionKind::Volatility).unwrap();
        assert!(volatility.mentions("Move 30% of technology holdings to cash"));
    }

    #[tokio::test]
    async fn test_delivery_sends_rendered_report() {
        let report = build_report(&MockMarketData::new(), &MonitorConfig::default(), today()).await;
        let notifier = MemoryNotifier::new();

        assert!(deliver(&notifier, &report).await);

        let sent = notifier.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, "[Market Monitor] 2026-10-15 Daily Report");
        assert_eq!(sent[0].body, report.render());
    }

    #[tokio::test]
    async fn test_delivery_failure_is_a_bool() {
        let report = build_report(&MockMarketData::new(), &MonitorConfig::default(), today()).await;
        assert!(!deliver(&MemoryNotifier::failing(), &report).await);
    }
}
