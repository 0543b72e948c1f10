//! Group-stage slot planning: interleave the two groups' pairings and give every match a
//! date, time, venue and referee.
//!
//! The planner keeps a global (day, slot) cursor. Each match first tries the cursor slot;
//! if a team needs rest or no venue/referee is free there, it searches forward slot by slot
//! up to a bounded window and fails with [`SchedulingError::NoSlot`] past it. A match
//! placed at the cursor moves the cursor one slot on; a match found by the search leaves
//! it in place, so later matches can still fill gaps the search skipped over. Either way
//! the cursor never rests on a full day, and the search window counts from the cursor day.

use crate::logic::availability::AvailabilityOracle;
use crate::logic::rest::{RestRule, RestTracker};
use crate::models::{
    GameMatch, GroupId, Referee, ScheduleResult, SchedulingError, Stage, TeamId, Tournament,
    TournamentId, Venue,
};
use crate::store::ScheduleTx;
use chrono::{Days, NaiveDate, NaiveTime};
use std::collections::HashMap;

/// One group-stage pairing waiting for a slot.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Fixture {
    pub group_id: GroupId,
    pub round: u32,
    pub home: TeamId,
    pub away: TeamId,
}

/// Alternates between two sequences (A, B, A, B, ...), then drains whichever is left.
#[derive(Clone, Debug)]
pub struct Interleave<A, B> {
    a: A,
    b: B,
    a_next: bool,
}

pub fn interleave<A, B>(a: A, b: B) -> Interleave<A::IntoIter, B::IntoIter>
where
    A: IntoIterator,
    B: IntoIterator<Item = A::Item>,
{
    Interleave {
        a: a.into_iter(),
        b: b.into_iter(),
        a_next: true,
    }
}

impl<A, B> Iterator for Interleave<A, B>
where
    A: Iterator,
    B: Iterator<Item = A::Item>,
{
    type Item = A::Item;

    fn next(&mut self) -> Option<Self::Item> {
        let from_a = self.a_next;
        self.a_next = !self.a_next;
        if from_a {
            self.a.next().or_else(|| self.b.next())
        } else {
            self.b.next().or_else(|| self.a.next())
        }
    }
}

/// Daily capacity for generated group-stage matches.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SlotPlan {
    pub matches_per_day: usize,
    /// Strictly ascending kick-off times.
    pub time_slots: Vec<NaiveTime>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct Cursor {
    day: u64,
    slot: usize,
}

/// Per-call planner state. Nothing here outlives one scheduling call.
pub struct SlotPlanner {
    tournament_id: TournamentId,
    start: NaiveDate,
    last_date: NaiveDate,
    slots: Vec<NaiveTime>,
    per_day: usize,
    window_days: u64,
    venues: Vec<Venue>,
    referees: Vec<Referee>,
    cursor: Cursor,
    rest: RestTracker,
    /// Slots taken by this call, per day offset.
    taken: HashMap<u64, Vec<usize>>,
}

impl SlotPlanner {
    pub fn new(
        tournament: &Tournament,
        plan: SlotPlan,
        rule: RestRule,
        max_search_days: u32,
        venues: Vec<Venue>,
        referees: Vec<Referee>,
    ) -> Self {
        let per_day = plan.matches_per_day.min(plan.time_slots.len());
        Self {
            tournament_id: tournament.id,
            start: tournament.start_date,
            last_date: tournament.end_date,
            slots: plan.time_slots,
            per_day,
            window_days: u64::from(max_search_days),
            venues,
            referees,
            cursor: Cursor { day: 0, slot: 0 },
            rest: RestTracker::new(rule),
            taken: HashMap::new(),
        }
    }

    fn date_of(&self, day: u64) -> Option<NaiveDate> {
        self.start
            .checked_add_days(Days::new(day))
            .filter(|d| *d <= self.last_date)
    }

    fn day_full(&self, day: u64) -> bool {
        self.taken.get(&day).map_or(0, Vec::len) >= self.per_day
    }

    /// Assign a slot to `fixture`, stage it in `tx` and return the match row.
    pub fn place(
        &mut self,
        tx: &mut dyn ScheduleTx,
        fixture: Fixture,
    ) -> ScheduleResult<GameMatch> {
        let from = self.cursor;
        let last_day = from.day + self.window_days;
        for day in from.day..=last_day {
            if self.date_of(day).is_none() {
                break;
            }
            let first_slot = if day == from.day { from.slot } else { 0 };
            for slot in first_slot..self.slots.len() {
                let at = Cursor { day, slot };
                let Some(game) = self.try_slot(&*tx, &fixture, at)? else {
                    continue;
                };
                tx.insert_match(game.clone())?;
                self.rest.record(fixture.home, (game.date, game.time));
                self.rest.record(fixture.away, (game.date, game.time));
                self.taken.entry(day).or_default().push(slot);
                if at == self.cursor {
                    self.advance();
                } else {
                    log::debug!(
                        "{} vs {} searched forward to {} {}",
                        fixture.home,
                        fixture.away,
                        game.date,
                        game.time
                    );
                }
                self.skip_full_days();
                return Ok(game);
            }
        }
        Err(SchedulingError::NoSlot {
            home: fixture.home,
            away: fixture.away,
            from: self.date_of(from.day).unwrap_or(self.last_date),
            window_days: self.window_days as u32,
        }
        .into())
    }

    fn advance(&mut self) {
        self.cursor.slot += 1;
        if self.cursor.slot >= self.slots.len() || self.day_full(self.cursor.day) {
            self.cursor = Cursor {
                day: self.cursor.day + 1,
                slot: 0,
            };
        }
    }

    fn skip_full_days(&mut self) {
        while self.day_full(self.cursor.day) && self.date_of(self.cursor.day).is_some() {
            self.cursor = Cursor {
                day: self.cursor.day + 1,
                slot: 0,
            };
        }
    }

    /// The match `fixture` would become at `at`, or None when the slot is unusable.
    fn try_slot(
        &self,
        tx: &dyn ScheduleTx,
        fixture: &Fixture,
        at: Cursor,
    ) -> ScheduleResult<Option<GameMatch>> {
        if self.day_full(at.day) || self.taken.get(&at.day).is_some_and(|s| s.contains(&at.slot))
        {
            return Ok(None);
        }
        let (Some(date), Some(&time)) = (self.date_of(at.day), self.slots.get(at.slot)) else {
            return Ok(None);
        };
        if !self.rest.is_rested(fixture.home, (date, time))
            || !self.rest.is_rested(fixture.away, (date, time))
        {
            return Ok(None);
        }

        let oracle = AvailabilityOracle::new(tx);
        let Some(venue_id) = oracle.first_free_venue(&self.venues, date)? else {
            return Ok(None);
        };
        // an empty referee directory means matches go out unassigned
        let referee_id = if self.referees.is_empty() {
            None
        } else {
            match oracle.first_free_referee(&self.referees, date)? {
                Some(id) => Some(id),
                None => return Ok(None),
            }
        };

        Ok(Some(
            GameMatch::new(
                self.tournament_id,
                Stage::GroupStage,
                fixture.round,
                date,
                time,
                venue_id,
                referee_id,
            )
            .with_teams(fixture.home, fixture.away)
            .with_group(fixture.group_id),
        ))
    }

    /// Place every fixture in order; the first failure aborts the call.
    pub fn place_all(
        &mut self,
        tx: &mut dyn ScheduleTx,
        fixtures: impl IntoIterator<Item = Fixture>,
    ) -> ScheduleResult<Vec<GameMatch>> {
        let mut placed = Vec::new();
        for fixture in fixtures {
            placed.push(self.place(tx, fixture)?);
        }
        Ok(placed)
    }
}
