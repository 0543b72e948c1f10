//! Team rest rule and the per-call tracker the planner threads through a schedule.

use crate::models::TeamId;
use chrono::{Duration, NaiveDate, NaiveTime};
use std::collections::HashMap;

/// Two kick-offs of the same team must be on dates at least two days apart, or on the same
/// date at least `min_gap` apart.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RestRule {
    pub min_gap: Duration,
}

impl RestRule {
    pub fn new(min_gap: Duration) -> Self {
        Self { min_gap }
    }

    pub fn permits(&self, a: (NaiveDate, NaiveTime), b: (NaiveDate, NaiveTime)) -> bool {
        match (a.0 - b.0).num_days().abs() {
            0 => (a.1 - b.1).abs() >= self.min_gap,
            1 => false,
            _ => true,
        }
    }
}

/// Kick-offs committed so far in one scheduling call, per team.
#[derive(Debug)]
pub struct RestTracker {
    rule: RestRule,
    played: HashMap<TeamId, Vec<(NaiveDate, NaiveTime)>>,
}

impl RestTracker {
    pub fn new(rule: RestRule) -> Self {
        Self {
            rule,
            played: HashMap::new(),
        }
    }

    /// Whether `team` may play at `at` given everything recorded so far.
    pub fn is_rested(&self, team: TeamId, at: (NaiveDate, NaiveTime)) -> bool {
        self.played
            .get(&team)
            .map_or(true, |slots| slots.iter().all(|&prev| self.rule.permits(prev, at)))
    }

    pub fn record(&mut self, team: TeamId, at: (NaiveDate, NaiveTime)) {
        self.played.entry(team).or_default().push(at);
    }
}
