//! In-memory store: directories and match rows behind an `RwLock`, one mutex per tournament.

use crate::models::{
    ConflictError, GameMatch, Group, GroupTeam, MatchId, Referee, RefereeBusySlot, RefereeId,
    ScheduleError, ScheduleResult, StateError, MatchStatus, Team, Tournament, TournamentId,
    Venue,
};
use crate::store::{ScheduleStore, ScheduleTx};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default)]
struct Tables {
    tournaments: HashMap<TournamentId, Tournament>,
    /// Registration order.
    teams: Vec<Team>,
    venues: Vec<Venue>,
    referees: Vec<Referee>,
    busy_slots: Vec<RefereeBusySlot>,
    groups: Vec<Group>,
    group_teams: Vec<GroupTeam>,
    matches: Vec<GameMatch>,
}

/// Reference [`ScheduleStore`] kept entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    locks: Mutex<HashMap<TournamentId, Arc<Mutex<()>>>>,
}

fn poisoned() -> ScheduleError {
    ScheduleError::Storage("lock poisoned".to_string())
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> ScheduleResult<RwLockReadGuard<'_, Tables>> {
        self.tables.read().map_err(|_| poisoned())
    }

    fn write(&self) -> ScheduleResult<RwLockWriteGuard<'_, Tables>> {
        self.tables.write().map_err(|_| poisoned())
    }

    /// Only known tournaments get a mutex; tournaments are never removed.
    fn tournament_lock(&self, id: TournamentId) -> ScheduleResult<Arc<Mutex<()>>> {
        if !self.read()?.tournaments.contains_key(&id) {
            return Err(StateError::TournamentNotFound(id).into());
        }
        let mut locks = self.locks.lock().map_err(|_| poisoned())?;
        Ok(locks.entry(id).or_default().clone())
    }

    pub fn insert_tournament(&self, tournament: Tournament) -> ScheduleResult<()> {
        self.write()?
            .tournaments
            .insert(tournament.id, tournament);
        Ok(())
    }

    /// Append a team; calls order is registration order.
    pub fn register_team(&self, team: Team) -> ScheduleResult<()> {
        self.write()?.teams.push(team);
        Ok(())
    }

    pub fn add_venue(&self, venue: Venue) -> ScheduleResult<()> {
        self.write()?.venues.push(venue);
        Ok(())
    }

    pub fn add_referee(&self, referee: Referee) -> ScheduleResult<()> {
        self.write()?.referees.push(referee);
        Ok(())
    }

    pub fn add_busy_slot(&self, slot: RefereeBusySlot) -> ScheduleResult<()> {
        self.write()?.busy_slots.push(slot);
        Ok(())
    }

    /// Result-submission hook: moves a match to `status` outside any scheduling call.
    pub fn set_match_status(&self, match_id: MatchId, status: MatchStatus) -> ScheduleResult<()> {
        let mut tables = self.write()?;
        let game = tables
            .matches
            .iter_mut()
            .find(|m| m.id == match_id)
            .ok_or(StateError::MatchNotFound(match_id))?;
        game.status = status;
        Ok(())
    }

    /// Number of committed groups of a tournament.
    pub fn group_count(&self, tournament_id: TournamentId) -> ScheduleResult<usize> {
        Ok(self
            .read()?
            .groups
            .iter()
            .filter(|g| g.tournament_id == tournament_id)
            .count())
    }
}

impl ScheduleStore for MemoryStore {
    fn transaction<T, F>(&self, tournament_id: TournamentId, f: F) -> ScheduleResult<T>
    where
        F: FnOnce(&mut dyn ScheduleTx) -> ScheduleResult<T>,
    {
        let lock = self.tournament_lock(tournament_id)?;
        let _guard = lock.lock().map_err(|_| poisoned())?;
        let mut tx = MemoryTx {
            store: self,
            tournament_id,
            groups: Vec::new(),
            inserted: Vec::new(),
            updated: HashMap::new(),
        };
        let value = f(&mut tx)?;
        tx.commit()?;
        Ok(value)
    }

    fn matches_for(&self, tournament_id: TournamentId) -> ScheduleResult<Vec<GameMatch>> {
        let mut matches: Vec<GameMatch> = self
            .read()?
            .matches
            .iter()
            .filter(|m| m.tournament_id == tournament_id)
            .cloned()
            .collect();
        matches.sort_by_key(|m| (m.date, m.time));
        Ok(matches)
    }
}

/// Writes staged by one call; dropped without effect on error.
struct MemoryTx<'a> {
    store: &'a MemoryStore,
    tournament_id: TournamentId,
    groups: Vec<(Group, Vec<GroupTeam>)>,
    inserted: Vec<GameMatch>,
    updated: HashMap<MatchId, GameMatch>,
}

impl MemoryTx<'_> {
    /// Committed rows overlaid with staged updates and inserts.
    fn overlay(&self, keep: impl Fn(&GameMatch) -> bool) -> ScheduleResult<Vec<GameMatch>> {
        let tables = self.store.read()?;
        let committed = tables
            .matches
            .iter()
            .map(|m| self.updated.get(&m.id).unwrap_or(m));
        Ok(committed
            .chain(self.inserted.iter())
            .filter(|m| keep(m))
            .cloned()
            .collect())
    }

    fn staged(&self) -> impl Iterator<Item = &GameMatch> {
        self.inserted.iter().chain(self.updated.values())
    }

    /// Venues and referees are shared with other tournaments, whose calls are not serialized
    /// against this one; refuse to commit over a booking they made meanwhile.
    fn recheck(&self, tables: &Tables) -> ScheduleResult<()> {
        let others: Vec<&GameMatch> = tables
            .matches
            .iter()
            .filter(|m| m.tournament_id != self.tournament_id && m.is_active())
            .collect();
        for game in self.staged().filter(|m| m.is_active()) {
            for other in &others {
                if other.venue_id == game.venue_id && other.date == game.date {
                    return Err(ConflictError::VenueBooked {
                        venue: game.venue_id,
                        date: game.date,
                    }
                    .into());
                }
                let (Some(referee), Some(other_referee)) = (game.referee_id, other.referee_id)
                else {
                    continue;
                };
                if referee != other_referee {
                    continue;
                }
                let gap = (other.date - game.date).num_days().abs();
                if gap == 0 {
                    return Err(ConflictError::RefereeBooked {
                        referee,
                        date: game.date,
                    }
                    .into());
                }
                if gap == 1 {
                    return Err(ConflictError::RefereeResting {
                        referee,
                        date: game.date,
                    }
                    .into());
                }
            }
        }
        Ok(())
    }

    fn commit(self) -> ScheduleResult<()> {
        let mut tables = self.store.write()?;
        self.recheck(&tables)?;
        for (group, members) in self.groups {
            tables.groups.push(group);
            tables.group_teams.extend(members);
        }
        for game in tables.matches.iter_mut() {
            if let Some(updated) = self.updated.get(&game.id) {
                *game = updated.clone();
            }
        }
        tables.matches.extend(self.inserted);
        Ok(())
    }
}

impl ScheduleTx for MemoryTx<'_> {
    fn tournament(&self) -> ScheduleResult<Tournament> {
        self.store
            .read()?
            .tournaments
            .get(&self.tournament_id)
            .cloned()
            .ok_or_else(|| StateError::TournamentNotFound(self.tournament_id).into())
    }

    fn approved_teams(&self) -> ScheduleResult<Vec<Team>> {
        Ok(self
            .store
            .read()?
            .teams
            .iter()
            .filter(|t| t.tournament_id == self.tournament_id && t.approved)
            .cloned()
            .collect())
    }

    fn venues(&self) -> ScheduleResult<Vec<Venue>> {
        Ok(self.store.read()?.venues.clone())
    }

    fn referees(&self) -> ScheduleResult<Vec<Referee>> {
        Ok(self.store.read()?.referees.clone())
    }

    fn referee_busy_on(&self, referee_id: RefereeId, date: NaiveDate) -> ScheduleResult<bool> {
        Ok(self
            .store
            .read()?
            .busy_slots
            .iter()
            .any(|s| s.referee_id == referee_id && s.date == date))
    }

    fn matches_between(&self, from: NaiveDate, to: NaiveDate) -> ScheduleResult<Vec<GameMatch>> {
        self.overlay(|m| m.date >= from && m.date <= to)
    }

    fn tournament_matches(&self) -> ScheduleResult<Vec<GameMatch>> {
        let id = self.tournament_id;
        self.overlay(|m| m.tournament_id == id)
    }

    fn groups(&self) -> ScheduleResult<Vec<(Group, Vec<GroupTeam>)>> {
        let tables = self.store.read()?;
        let mut groups: Vec<(Group, Vec<GroupTeam>)> = tables
            .groups
            .iter()
            .filter(|g| g.tournament_id == self.tournament_id)
            .map(|g| {
                let members = tables
                    .group_teams
                    .iter()
                    .filter(|gt| gt.group_id == g.id)
                    .copied()
                    .collect();
                (g.clone(), members)
            })
            .chain(self.groups.iter().cloned())
            .collect();
        for (_, members) in groups.iter_mut() {
            members.sort_by_key(|gt| gt.seed);
        }
        groups.sort_by_key(|(g, _)| g.name);
        Ok(groups)
    }

    fn insert_group(&mut self, group: Group, members: Vec<GroupTeam>) -> ScheduleResult<()> {
        self.groups.push((group, members));
        Ok(())
    }

    fn insert_match(&mut self, game: GameMatch) -> ScheduleResult<()> {
        self.inserted.push(game);
        Ok(())
    }

    fn update_match(&mut self, game: GameMatch) -> ScheduleResult<()> {
        if let Some(staged) = self.inserted.iter_mut().find(|m| m.id == game.id) {
            *staged = game;
            return Ok(());
        }
        let exists = self.store.read()?.matches.iter().any(|m| m.id == game.id);
        if !exists {
            return Err(StateError::MatchNotFound(game.id).into());
        }
        self.updated.insert(game.id, game);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn lock_count(store: &MemoryStore) -> usize {
        store.locks.lock().unwrap().len()
    }

    #[test]
    fn unknown_tournaments_leave_no_lock_behind() {
        let store = MemoryStore::new();
        for _ in 0..3 {
            let id = Uuid::new_v4();
            let err = store.transaction(id, |tx| tx.tournament()).unwrap_err();
            assert_eq!(err, StateError::TournamentNotFound(id).into());
        }
        assert_eq!(lock_count(&store), 0);

        let date = NaiveDate::from_ymd_opt(2025, 12, 1).unwrap();
        let tournament = Tournament::new("Cup", date, date, 8);
        store.insert_tournament(tournament.clone()).unwrap();
        for _ in 0..2 {
            let found = store.transaction(tournament.id, |tx| tx.tournament()).unwrap();
            assert_eq!(found, tournament);
        }
        assert_eq!(lock_count(&store), 1);
    }
}
