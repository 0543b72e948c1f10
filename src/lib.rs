//! Basketball tournament scheduler: library with models, the scheduling engine and stores.

pub mod logic;
pub mod models;
pub mod store;

pub use logic::{
    assign_groups, build_bracket, create_group_stage_schedule, create_playoff_schedule,
    update_match, validate_team_rest, AvailabilityOracle, CustomGroupMatch, CustomPlayoffMatch,
    GroupStageRequest, GroupStageSchedule, MatchEdit, PlayoffRequest, PlayoffSchedule,
    RoundRobin, SchedulerConfig,
};
pub use models::{
    BracketSlot, ConflictError, GameMatch, Group, GroupId, GroupName, GroupTeam, MatchId,
    MatchStatus, Referee, RefereeBusySlot, RefereeId, ScheduleError, ScheduleResult,
    SchedulingError, Stage, StateError, Team, TeamId, Tournament, TournamentId, TournamentStatus,
    ValidationError, Venue, VenueId,
};
pub use store::{MemoryStore, ScheduleStore, ScheduleTx};
