//! Scheduling engine: groups, pairings, slot planning, availability, conflicts, bracket.

pub mod availability;
pub mod bracket;
pub mod config;
pub mod conflicts;
pub mod groups;
pub mod planner;
pub mod rest;
pub mod round_robin;
mod schedule;

pub use availability::AvailabilityOracle;
pub use bracket::{build_bracket, knockout_round, BracketMatch};
pub use config::{default_time_slots, SchedulerConfig};
pub use conflicts::{validate_edit, validate_team_rest};
pub use groups::{assign_groups, SeededGroup};
pub use planner::{interleave, Fixture, SlotPlan, SlotPlanner};
pub use rest::{RestRule, RestTracker};
pub use round_robin::RoundRobin;
pub use schedule::{
    create_group_stage_schedule, create_playoff_schedule, update_match, CustomGroupMatch,
    CustomPlayoffMatch, GroupStageRequest, GroupStageSchedule, MatchEdit, PlayoffRequest,
    PlayoffSchedule,
};
