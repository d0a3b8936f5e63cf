//! Action Planner
//!
//! Turns today's volatility, broad-index and commodity observations into
//! recommended actions. Rules are independent; every rule that holds fires.

use crate::config::ActionRules;
use crate::model::{Action, ActionRule, Observation};

/// Observations the planner consumes. Any of them may be missing.
#[derive(Clone, Copy, Debug)]
pub struct PlannerInput<'a> {
    pub volatility: &'a Observation,
    pub broad_index: &'a Observation,
    pub commodity: &'a Observation,
}

pub struct ActionPlanner {
    rules: ActionRules,
}

impl ActionPlanner {
    pub fn new(rules: ActionRules) -> Self {
        Self { rules }
    }

    /// Actions in fixed rule order; never empty.
    pub fn plan(&self, input: &PlannerInput<'_>) -> Vec<Action> {
        let rules = &self.rules;
        let mut actions = Vec::new();

        if input.volatility.current().is_some_and(|v| v > rules.volatility_above) {
            actions.push(Action::new(1, ActionRule::ReduceGrowthExposure));
        }

        if input.broad_index.percent_change().is_some_and(|c| c < rules.broad_index_below) {
            actions.push(Action::new(2, ActionRule::RaiseCashReserve));
        }

        if input.commodity.current().is_some_and(|p| p > rules.commodity_above) {
            actions.push(Action::new(3, ActionRule::AccumulateCommodity));
        }

        if actions.is_empty() {
            actions.push(Action::new(1, ActionRule::Stable));
        }

        actions
    }
}
