//! # market-signals
//!
//! Daily market monitoring: fetch closes, classify each instrument against
//! configurable band tables, plan actions and assemble the daily report.
//!
//! ## Pipeline
//!
//! ```text
//! ┌──────────────────┐   closes    ┌──────────────────┐
//! │ MarketDataProvider│ ──────────► │  ObservationSet  │
//! │ (Yahoo / Mock)    │             │ current, change  │
//! └──────────────────┘             └────────┬─────────┘
//!                                            │
//!                 ┌──────────────────────────┼──────────────────────┐
//!                 ▼                          ▼                      ▼
//!      ┌────────────────────┐   ┌────────────────────┐   ┌──────────────────┐
//!      │  SignalClassifier  │   │   ActionPlanner    │   │  VolatilityTier  │
//!      │  band tables per   │   │  VIX / S&P / Gold  │   │  extra guidance  │
//!      │  MetricKind        │   │  rules             │   │                  │
//!      └─────────┬──────────┘   └─────────┬──────────┘   └────────┬─────────┘
//!                └────────────────────────┼───────────────────────┘
//!                                         ▼
//!                              ┌────────────────────┐
//!                              │  ReportAssembler   │ ──► Report
//!                              │  8 ordered sections│
//!                              └────────────────────┘
//! ```
//!
//! A missing quote never aborts the run: the instrument is shown with a
//! data-error status. A misconfigured section degrades to a single error
//! line while the rest of the report is still built.

pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod report;
pub mod strategy;

pub use config::{Instrument, MonitorConfig, PriceFormat};
pub use error::{MonitorError, Result};
pub use model::{Action, ActionRule, MetricKind, Observation, ObservationSet, Signal, Status};
pub use provider::{MarketDataProvider, MockMarketData, YahooChartClient, YahooConfig, collect_observations, fetch_observation};
pub use report::{Report, ReportAssembler, Section, SectionKind};
pub use strategy::{ActionPlanner, SignalClassifier};
