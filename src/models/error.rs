//! Error taxonomy for scheduling calls. Every error aborts the whole call.

use crate::models::game::{MatchId, Stage};
use crate::models::team::TeamId;
use crate::models::tournament::TournamentId;
use crate::models::venue::{RefereeId, VenueId};
use chrono::NaiveDate;
use thiserror::Error;

/// Input that can never be scheduled as submitted.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ValidationError {
    #[error("max_teams must be 8 or 16 (got {0})")]
    InvalidMaxTeams(u32),

    #[error("expected exactly {expected} approved teams, found {found}")]
    WrongTeamCount { expected: usize, found: usize },

    #[error("matches_per_day must be at least 1")]
    InvalidMatchesPerDay,

    #[error("time slots must be a non-empty, strictly ascending list")]
    InvalidTimeSlots,

    #[error("no available venue in the directory")]
    NoVenues,

    #[error("match {index} has no venue")]
    MissingVenue { index: usize },

    #[error("venue {0} does not exist")]
    UnknownVenue(VenueId),

    #[error("referee {0} does not exist")]
    UnknownReferee(RefereeId),

    #[error("match {index}: team {team} is not in this tournament's groups")]
    UnknownTeam { index: usize, team: TeamId },

    #[error("match {index}: teams {home} and {away} are not in the same group")]
    CrossGroupPairing {
        index: usize,
        home: TeamId,
        away: TeamId,
    },

    #[error("match {index}: a team cannot play itself")]
    SelfPairing { index: usize },

    #[error("match {index}: pairing {home} vs {away} appears more than once")]
    DuplicatePairing {
        index: usize,
        home: TeamId,
        away: TeamId,
    },

    #[error("custom schedule covers {found} pairings, expected {expected}")]
    IncompletePairings { expected: usize, found: usize },

    #[error("match {index}: stage {stage:?} is not allowed here")]
    UnexpectedStage { index: usize, stage: Stage },

    #[error("playoff schedule needs exactly one final (found {0})")]
    FinalCount(usize),

    #[error("final must be played on the tournament end date {expected} (got {found})")]
    FinalDateMismatch { expected: NaiveDate, found: NaiveDate },

    #[error("{earlier:?} matches must be dated strictly before {later:?} matches")]
    StageOrder { earlier: Stage, later: Stage },

    #[error("{date} is outside the tournament dates {start}..{end}")]
    DateOutsideTournament {
        date: NaiveDate,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("tournament {start}..{end} is too short for the playoff calendar")]
    TournamentTooShort { start: NaiveDate, end: NaiveDate },

    #[error("malformed time {0:?} (expected HH:MM)")]
    MalformedTime(String),
}

/// The tournament is not in a state that allows this call.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum StateError {
    #[error("tournament {0} not found")]
    TournamentNotFound(TournamentId),

    #[error("tournament {0} is completed or cancelled")]
    TournamentClosed(TournamentId),

    #[error("a group-stage schedule already exists for tournament {0}")]
    ScheduleExists(TournamentId),

    #[error("group stage missing for tournament {0}: found {1} group(s), need 2")]
    GroupStageMissing(TournamentId, usize),

    #[error("playoff matches already exist for tournament {0}")]
    PlayoffsExist(TournamentId),

    #[error("match {0} not found")]
    MatchNotFound(MatchId),

    #[error("match {0} is completed and can no longer be edited")]
    MatchCompleted(MatchId),
}

/// A venue, referee or team would be double-booked or denied rest.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ConflictError {
    #[error("venue {venue} is already booked on {date}")]
    VenueBooked { venue: VenueId, date: NaiveDate },

    #[error("venue {0} is marked unavailable")]
    VenueClosed(VenueId),

    #[error("referee {referee} registered a busy interval on {date}")]
    RefereeBusy { referee: RefereeId, date: NaiveDate },

    #[error("referee {referee} already officiates a match on {date}")]
    RefereeBooked { referee: RefereeId, date: NaiveDate },

    #[error("referee {referee} needs a rest day around {date}")]
    RefereeResting { referee: RefereeId, date: NaiveDate },

    #[error("matches {first} and {second} both involve team {team} without enough rest")]
    TeamRest {
        first: usize,
        second: usize,
        team: TeamId,
    },

    #[error("team {team} already plays match {other} too close to this one")]
    TeamRestEdit { team: TeamId, other: MatchId },
}

/// The planner could not place a match inside its search window.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum SchedulingError {
    #[error("no free slot for {home} vs {away} within {window_days} days of {from}")]
    NoSlot {
        home: TeamId,
        away: TeamId,
        from: NaiveDate,
        window_days: u32,
    },

    #[error("no free venue on {date} for {stage:?}")]
    NoVenue { date: NaiveDate, stage: Stage },

    #[error("no free referee on {date} for {stage:?}")]
    NoReferee { date: NaiveDate, stage: Stage },

    #[error("not enough time slots on {date} for {needed} {stage:?} match(es)")]
    NoTimeSlot {
        date: NaiveDate,
        stage: Stage,
        needed: usize,
    },
}

/// Any failure of a scheduling call. Nothing is persisted when one is returned.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ScheduleError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    State(#[from] StateError),

    #[error(transparent)]
    Conflict(#[from] ConflictError),

    #[error(transparent)]
    Scheduling(#[from] SchedulingError),

    #[error("storage failure: {0}")]
    Storage(String),
}

impl ScheduleError {
    /// Short category name, stable for API clients.
    pub fn kind(&self) -> &'static str {
        match self {
            ScheduleError::Validation(_) => "validation",
            ScheduleError::State(_) => "state",
            ScheduleError::Conflict(_) => "conflict",
            ScheduleError::Scheduling(_) => "scheduling",
            ScheduleError::Storage(_) => "storage",
        }
    }
}

/// Result type for scheduling operations.
pub type ScheduleResult<T> = Result<T, ScheduleError>;
