//! Venue and referee availability, read through the current transaction so bookings staged
//! earlier in the same call count.

use crate::models::{ConflictError, MatchId, Referee, RefereeId, ScheduleResult, Venue, VenueId};
use crate::store::ScheduleTx;
use chrono::{Days, NaiveDate};

/// Read-only availability queries over one transaction.
pub struct AvailabilityOracle<'a> {
    tx: &'a dyn ScheduleTx,
}

impl<'a> AvailabilityOracle<'a> {
    pub fn new(tx: &'a dyn ScheduleTx) -> Self {
        Self { tx }
    }

    /// Why `venue_id` cannot host a match on `date`, if it cannot. Only scheduled and
    /// completed matches occupy a venue; `excluding` ignores one match (for edits).
    pub fn venue_conflict(
        &self,
        venue_id: VenueId,
        date: NaiveDate,
        excluding: Option<MatchId>,
    ) -> ScheduleResult<Option<ConflictError>> {
        let booked = self
            .tx
            .matches_between(date, date)?
            .iter()
            .any(|m| m.is_active() && m.venue_id == venue_id && Some(m.id) != excluding);
        Ok(booked.then_some(ConflictError::VenueBooked {
            venue: venue_id,
            date,
        }))
    }

    pub fn venue_available(
        &self,
        venue_id: VenueId,
        date: NaiveDate,
        excluding: Option<MatchId>,
    ) -> ScheduleResult<bool> {
        Ok(self.venue_conflict(venue_id, date, excluding)?.is_none())
    }

    /// Why `referee_id` cannot officiate on `date`, if they cannot: a busy interval that day,
    /// a match that day, or a match the day before or after.
    pub fn referee_conflict(
        &self,
        referee_id: RefereeId,
        date: NaiveDate,
        excluding: Option<MatchId>,
    ) -> ScheduleResult<Option<ConflictError>> {
        if self.tx.referee_busy_on(referee_id, date)? {
            return Ok(Some(ConflictError::RefereeBusy {
                referee: referee_id,
                date,
            }));
        }
        let from = date.checked_sub_days(Days::new(1)).unwrap_or(date);
        let to = date.checked_add_days(Days::new(1)).unwrap_or(date);
        let nearby = self.tx.matches_between(from, to)?;
        let assigned = nearby.iter().filter(|m| {
            m.is_active() && m.referee_id == Some(referee_id) && Some(m.id) != excluding
        });

        let mut resting = false;
        for m in assigned {
            if m.date == date {
                return Ok(Some(ConflictError::RefereeBooked {
                    referee: referee_id,
                    date,
                }));
            }
            resting = true;
        }
        Ok(resting.then_some(ConflictError::RefereeResting {
            referee: referee_id,
            date,
        }))
    }

    pub fn referee_available(
        &self,
        referee_id: RefereeId,
        date: NaiveDate,
        excluding: Option<MatchId>,
    ) -> ScheduleResult<bool> {
        Ok(self.referee_conflict(referee_id, date, excluding)?.is_none())
    }

    /// Fail with the venue's conflict, if any.
    pub fn ensure_venue(
        &self,
        venue_id: VenueId,
        date: NaiveDate,
        excluding: Option<MatchId>,
    ) -> ScheduleResult<()> {
        match self.venue_conflict(venue_id, date, excluding)? {
            Some(conflict) => Err(conflict.into()),
            None => Ok(()),
        }
    }

    /// Fail with the referee's conflict, if any.
    pub fn ensure_referee(
        &self,
        referee_id: RefereeId,
        date: NaiveDate,
        excluding: Option<MatchId>,
    ) -> ScheduleResult<()> {
        match self.referee_conflict(referee_id, date, excluding)? {
            Some(conflict) => Err(conflict.into()),
            None => Ok(()),
        }
    }

    /// First open venue, in directory order, free on `date`.
    pub fn first_free_venue(
        &self,
        venues: &[Venue],
        date: NaiveDate,
    ) -> ScheduleResult<Option<VenueId>> {
        for venue in venues.iter().filter(|v| v.is_available) {
            if self.venue_available(venue.id, date, None)? {
                return Ok(Some(venue.id));
            }
        }
        Ok(None)
    }

    /// First referee, in directory order, free on `date`.
    pub fn first_free_referee(
        &self,
        referees: &[Referee],
        date: NaiveDate,
    ) -> ScheduleResult<Option<RefereeId>> {
        for referee in referees {
            if self.referee_available(referee.id, date, None)? {
                return Ok(Some(referee.id));
            }
        }
        Ok(None)
    }
}
