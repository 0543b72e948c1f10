//! Data structures for tournament scheduling: tournaments, teams, groups, matches, directories.

pub mod clock;
mod error;
mod game;
mod team;
mod tournament;
mod venue;

pub use error::{
    ConflictError, ScheduleError, ScheduleResult, SchedulingError, StateError, ValidationError,
};
pub use game::{BracketSlot, GameMatch, MatchId, MatchStatus, Stage};
pub use team::{Group, GroupId, GroupName, GroupTeam, Team, TeamId};
pub use tournament::{Tournament, TournamentId, TournamentStatus};
pub use venue::{Referee, RefereeBusySlot, RefereeId, Venue, VenueId};
