//! Scheduler tuning knobs, with environment overrides.

use chrono::{Duration, NaiveTime};
use serde::Deserialize;

pub const DEFAULT_MIN_REST_GAP_MINUTES: i64 = 120;
pub const DEFAULT_MAX_SEARCH_DAYS: u32 = 60;
pub const DEFAULT_MATCHES_PER_DAY: usize = 4;

/// 09:00, 11:00, 14:00, 16:00.
pub fn default_time_slots() -> Vec<NaiveTime> {
    [(9, 0), (11, 0), (14, 0), (16, 0)]
        .into_iter()
        .filter_map(|(h, m)| NaiveTime::from_hms_opt(h, m, 0))
        .collect()
}

fn default_min_rest_gap_minutes() -> i64 {
    DEFAULT_MIN_REST_GAP_MINUTES
}

fn default_max_search_days() -> u32 {
    DEFAULT_MAX_SEARCH_DAYS
}

fn default_matches_per_day() -> usize {
    DEFAULT_MATCHES_PER_DAY
}

#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
pub struct SchedulerConfig {
    /// Same-day gap a team needs between two matches.
    #[serde(default = "default_min_rest_gap_minutes")]
    pub min_rest_gap_minutes: i64,
    /// How many days past the cursor the planner searches before giving up on a match.
    #[serde(default = "default_max_search_days")]
    pub max_search_days: u32,
    /// Used when a generate request omits `matches_per_day`.
    #[serde(default = "default_matches_per_day")]
    pub default_matches_per_day: usize,
    /// Used when a generate request omits `time_slots`, and for playoff kick-off times.
    #[serde(default = "default_time_slots", with = "crate::models::clock::list")]
    pub time_slots: Vec<NaiveTime>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            min_rest_gap_minutes: DEFAULT_MIN_REST_GAP_MINUTES,
            max_search_days: DEFAULT_MAX_SEARCH_DAYS,
            default_matches_per_day: DEFAULT_MATCHES_PER_DAY,
            time_slots: default_time_slots(),
        }
    }
}

impl SchedulerConfig {
    /// Defaults overridden by `MIN_REST_GAP_MINUTES`, `MAX_SEARCH_DAYS` and
    /// `DEFAULT_MATCHES_PER_DAY` when set and parseable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let min_rest_gap_minutes = std::env::var("MIN_REST_GAP_MINUTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.min_rest_gap_minutes);
        let max_search_days = std::env::var("MAX_SEARCH_DAYS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.max_search_days);
        let default_matches_per_day = std::env::var("DEFAULT_MATCHES_PER_DAY")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.default_matches_per_day);
        Self {
            min_rest_gap_minutes,
            max_search_days,
            default_matches_per_day,
            ..defaults
        }
    }

    pub fn min_rest_gap(&self) -> Duration {
        Duration::minutes(self.min_rest_gap_minutes)
    }
}
