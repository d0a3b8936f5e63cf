//! market-monitor
//!
//! Builds the daily market report, prints it and mails it.
//! One invocation produces one report; scheduling is left to cron or CI.

mod runner;

use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use market_notify::{SmtpConfig, SmtpNotifier};
use market_signals::{MarketDataProvider, MockMarketData, MonitorConfig, YahooChartClient};

#[derive(Parser, Debug)]
#[command(name = "market-monitor", about = "Daily market monitoring report")]
struct Cli {
    /// Watchlist and threshold file (defaults apply when it does not exist)
    #[arg(long, default_value = "market-monitor.toml")]
    config: PathBuf,

    /// Use static demo prices instead of Yahoo Finance
    #[arg(long)]
    demo: bool,

    /// Print the report without sending it
    #[arg(long)]
    dry_run: bool,

    /// Abort on any configuration problem
    #[arg(long)]
    strict: bool,

    /// Report date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    date: Option<NaiveDate>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load environment
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = MonitorConfig::load(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;

    if cli.strict {
        config.validate().context("configuration rejected")?;
    } else {
        for issue in config.issues() {
            tracing::error!("Configuration problem: {issue}");
        }
    }

    let provider: Box<dyn MarketDataProvider> = if cli.demo {
        tracing::info!("Using demo market data");
        Box::new(MockMarketData::new())
    } else {
        Box::new(YahooChartClient::from_env()?)
    };

    runner::check_provider(provider.as_ref()).await;

    let today = cli.date.unwrap_or_else(|| chrono::Local::now().date_naive());
    let report = runner::build_report(provider.as_ref(), &config, today).await;

    println!("{}", report.render());

    if cli.dry_run {
        tracing::info!("Dry run, report not sent");
        return Ok(());
    }

    let notifier = match SmtpConfig::from_env() {
        Ok(smtp) => SmtpNotifier::new(smtp)?,
        Err(e) => {
            tracing::warn!("⚠ Mail not configured ({e}) - report printed only");
            tracing::warn!("  Set MONITOR_SMTP_USER and MONITOR_SMTP_PASSWORD in .env");
            return Ok(());
        }
    };

    if !runner::deliver(&notifier, &report).await {
        tracing::warn!("Report was not delivered");
    }

    Ok(())
}
