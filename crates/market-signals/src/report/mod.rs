//! Report
//!
//! The finished, immutable daily document and the assembler that builds it.

mod assembler;
mod format;

pub use assembler::{ReportAssembler, VolatilityTier};
pub use format::{direction_marker, format_change, format_price, group_thousands};

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::MonitorError;
use crate::model::Action;

const RULE_WIDTH: usize = 60;

/// Report sections, in the order they are rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Header,
    GlobalIndices,
    Volatility,
    Domestic,
    CommoditiesCrypto,
    Holdings,
    ActionItems,
    Disclaimer,
}

impl SectionKind {
    pub const ORDER: [SectionKind; 8] = [
        SectionKind::Header,
        SectionKind::GlobalIndices,
        SectionKind::Volatility,
        SectionKind::Domestic,
        SectionKind::CommoditiesCrypto,
        SectionKind::Holdings,
        SectionKind::ActionItems,
        SectionKind::Disclaimer,
    ];

    /// Heading printed above the section; the banner sections have none.
    pub fn title(self) -> Option<&'static str> {
        match self {
            SectionKind::Header | SectionKind::Disclaimer => None,
            SectionKind::GlobalIndices => Some("🌍 [ Global Indices ]"),
            SectionKind::Volatility => Some("🎯 [ Volatility Deep-Dive ]"),
            SectionKind::Domestic => Some("🏠 [ Domestic Market ]"),
            SectionKind::CommoditiesCrypto => Some("💰 [ Commodities & Crypto ]"),
            SectionKind::Holdings => Some("📈 [ Personal Holdings ]"),
            SectionKind::ActionItems => Some("✅ [ Today's Action Items ]"),
        }
    }
}

/// One rendered block of the report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Section {
    kind: SectionKind,
    lines: Vec<String>,
    degraded: bool,
}

impl Section {
    pub(crate) fn new(kind: SectionKind, lines: Vec<String>) -> Self {
        Self {
            kind,
            lines,
            degraded: false,
        }
    }

    /// Stand-in for a section whose builder failed.
    pub(crate) fn degraded(kind: SectionKind, error: &MonitorError) -> Self {
        Self {
            kind,
            lines: vec![format!("⚠️ Section unavailable: {error}")],
            degraded: true,
        }
    }

    pub fn kind(&self) -> SectionKind {
        self.kind
    }

    pub fn title(&self) -> Option<&'static str> {
        self.kind.title()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Whether any line of the section contains `needle`.
    pub fn mentions(&self, needle: &str) -> bool {
        self.lines.iter().any(|line| line.contains(needle))
    }
}

/// Daily report handed to the notification transport.
#[derive(Clone, Debug, Serialize)]
pub struct Report {
    date: NaiveDate,
    sections: Vec<Section>,
    actions: Vec<Action>,
}

impl Report {
    pub(crate) fn new(date: NaiveDate, sections: Vec<Section>, actions: Vec<Action>) -> Self {
        Self {
            date,
            sections,
            actions,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Date-stamped mail subject.
    pub fn subject(&self) -> String {
        format!("[Market Monitor] {} Daily Report", self.date.format("%Y-%m-%d"))
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, kind: SectionKind) -> Option<&Section> {
        self.sections.iter().find(|s| s.kind == kind)
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn degraded_sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter().filter(|s| s.degraded)
    }

    /// Plain-text body.
    pub fn render(&self) -> String {
        let mut out: Vec<String> = Vec::new();

        for section in &self.sections {
            if let Some(title) = section.title() {
                out.push(title.to_string());
                out.push("-".repeat(RULE_WIDTH));
            }
            out.extend(section.lines.iter().cloned());
            if section.kind != SectionKind::Disclaimer {
                out.push(String::new());
            }
        }

        out.join("\n")
    }

    pub(crate) fn banner() -> String {
        "=".repeat(RULE_WIDTH)
    }
}
