//! Persistence seam: what the scheduler reads and writes, and how a call is made atomic.
//!
//! A scheduling call runs inside [`ScheduleStore::transaction`]. The store serializes calls per
//! tournament, every read through [`ScheduleTx`] sees the writes staged earlier in the same
//! call, and staged writes become visible to others only when the closure returns `Ok`.

pub mod import;
mod memory;

pub use memory::MemoryStore;

use crate::models::{
    GameMatch, Group, GroupTeam, Referee, RefereeId, ScheduleResult, Team, Tournament,
    TournamentId, Venue, VenueId,
};
use chrono::NaiveDate;

/// One scheduling transaction, scoped to a single tournament.
pub trait ScheduleTx {
    /// Fails with `StateError::TournamentNotFound` when the tournament is unknown.
    fn tournament(&self) -> ScheduleResult<Tournament>;

    /// Approved teams in registration order.
    fn approved_teams(&self) -> ScheduleResult<Vec<Team>>;

    /// Venue directory in directory order, closed venues included.
    fn venues(&self) -> ScheduleResult<Vec<Venue>>;

    fn referees(&self) -> ScheduleResult<Vec<Referee>>;

    /// True when any busy interval is registered for the referee on `date`.
    fn referee_busy_on(&self, referee_id: RefereeId, date: NaiveDate) -> ScheduleResult<bool>;

    /// Matches of every tournament dated within `from..=to`, staged ones included.
    fn matches_between(&self, from: NaiveDate, to: NaiveDate) -> ScheduleResult<Vec<GameMatch>>;

    /// Matches of this tournament, staged ones included.
    fn tournament_matches(&self) -> ScheduleResult<Vec<GameMatch>>;

    /// Groups of this tournament with their seeded members (seed order).
    fn groups(&self) -> ScheduleResult<Vec<(Group, Vec<GroupTeam>)>>;

    fn insert_group(&mut self, group: Group, members: Vec<GroupTeam>) -> ScheduleResult<()>;

    fn insert_match(&mut self, game: GameMatch) -> ScheduleResult<()>;

    /// Replace an existing match row (matched by id).
    fn update_match(&mut self, game: GameMatch) -> ScheduleResult<()>;

    fn venue(&self, id: VenueId) -> ScheduleResult<Option<Venue>> {
        Ok(self.venues()?.into_iter().find(|v| v.id == id))
    }

    fn referee(&self, id: RefereeId) -> ScheduleResult<Option<Referee>> {
        Ok(self.referees()?.into_iter().find(|r| r.id == id))
    }
}

/// A backend able to run scheduling transactions.
pub trait ScheduleStore: Send + Sync {
    /// Run `f` under an exclusive per-tournament lock. Staged writes commit only if `f`
    /// returns `Ok`; any error rolls the whole call back.
    fn transaction<T, F>(&self, tournament_id: TournamentId, f: F) -> ScheduleResult<T>
    where
        F: FnOnce(&mut dyn ScheduleTx) -> ScheduleResult<T>;

    /// Committed matches of a tournament, ordered by date then time.
    fn matches_for(&self, tournament_id: TournamentId) -> ScheduleResult<Vec<GameMatch>>;
}
