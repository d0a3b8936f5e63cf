//! Signal Classifier
//!
//! Maps a metric value (or its absence) to a status and advice.

use std::collections::HashMap;

use rust_decimal::Decimal;

use super::bands::BandTable;
use crate::error::{MonitorError, Result};
use crate::model::{MetricKind, Observation, Signal};

/// Pure classifier over a set of band tables.
#[derive(Clone, Debug)]
pub struct SignalClassifier {
    tables: HashMap<MetricKind, BandTable>,
}

impl SignalClassifier {
    pub fn new(tables: &[BandTable]) -> Self {
        let tables = tables
            .iter()
            .map(|table| (table.kind, table.clone()))
            .collect();
        Self { tables }
    }

    /// Classify a value for `kind`.
    ///
    /// Absence always yields [`Signal::data_error`], whatever the kind. A kind
    /// without a table, or a value outside every band, is a configuration
    /// error and never falls back to a default band.
    pub fn classify(&self, kind: MetricKind, value: Option<Decimal>) -> Result<Signal> {
        let Some(value) = value else {
            return Ok(Signal::data_error());
        };

        let table = self
            .tables
            .get(&kind)
            .ok_or(MonitorError::MissingBandTable(kind))?;

        table
            .lookup(value)
            .map(|band| band.signal())
            .ok_or(MonitorError::BandGap { kind, value })
    }

    /// Classify the field of `observation` that `kind` reads.
    pub fn classify_observation(&self, kind: MetricKind, observation: &Observation) -> Result<Signal> {
        self.classify(kind, kind.input(observation))
    }
}
