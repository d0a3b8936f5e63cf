//! Yahoo Finance Chart Provider
//!
//! Reads daily closes from the public v8 chart endpoint.

use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::Deserialize;
use tracing::debug;

use super::MarketDataProvider;
use crate::error::{MonitorError, Result};

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) market-monitor/0.1";

/// Yahoo chart client configuration
#[derive(Clone, Debug)]
pub struct YahooConfig {
    /// API base URL
    pub base_url: String,

    /// History window requested per symbol (Yahoo range syntax)
    pub range: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for YahooConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            range: "5d".into(),
            timeout_secs: 10,
        }
    }
}

impl YahooConfig {
    pub fn from_env() -> Self {
        let base_url = std::env::var("MONITOR_YAHOO_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());

        Self {
            base_url,
            ..Default::default()
        }
    }
}

/// Daily-close provider backed by Yahoo Finance
pub struct YahooChartClient {
    client: reqwest::Client,
    config: YahooConfig,
}

impl YahooChartClient {
    pub fn new(config: YahooConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(YahooConfig::from_env())
    }

    fn chart_url(&self, symbol: &str) -> String {
        format!(
            "{}/v8/finance/chart/{}?range={}&interval=1d",
            self.config.base_url.trim_end_matches('/'),
            urlencoding::encode(symbol),
            self.config.range
        )
    }
}

#[async_trait]
impl MarketDataProvider for YahooChartClient {
    async fn daily_closes(&self, symbol: &str) -> Result<Vec<Decimal>> {
        let url = self.chart_url(symbol);
        debug!(symbol, %url, "Requesting chart");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        // Yahoo reports unknown symbols as 404 with a JSON error body
        if !status.is_success() && !status.is_client_error() {
            return Err(MonitorError::Provider(format!("Yahoo returned {status} for {symbol}")));
        }

        parse_closes(symbol, &body)
    }

    async fn health_check(&self) -> bool {
        self.daily_closes("^GSPC").await.is_ok()
    }

    fn name(&self) -> &str {
        "Yahoo"
    }
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Deserialize)]
struct ChartQuote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

/// Extract closes from a chart payload, skipping days without a close.
fn parse_closes(symbol: &str, body: &str) -> Result<Vec<Decimal>> {
    let response: ChartResponse = serde_json::from_str(body)?;

    if let Some(error) = response.chart.error {
        return Err(MonitorError::PriceUnavailable(format!(
            "{symbol}: {} {}",
            error.code, error.description
        )));
    }

    let quote = response
        .chart
        .result
        .unwrap_or_default()
        .into_iter()
        .next()
        .and_then(|result| result.indicators.quote.into_iter().next())
        .ok_or_else(|| MonitorError::PriceUnavailable(format!("{symbol}: empty chart")))?;

    Ok(quote
        .close
        .into_iter()
        .flatten()
        .filter_map(Decimal::from_f64)
        .collect())
}
