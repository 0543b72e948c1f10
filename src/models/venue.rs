//! Venue and referee directories.

use crate::models::clock;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a venue.
pub type VenueId = Uuid;

/// Unique identifier for a referee.
pub type RefereeId = Uuid;

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    pub id: VenueId,
    pub name: String,
    /// Closed venues are never booked.
    pub is_available: bool,
}

impl Venue {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            is_available: true,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Referee {
    pub id: RefereeId,
    pub name: String,
}

impl Referee {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }
}

/// A referee-declared busy interval. Any interval blocks the whole date.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RefereeBusySlot {
    pub referee_id: RefereeId,
    pub date: NaiveDate,
    #[serde(with = "clock")]
    pub start_time: NaiveTime,
    #[serde(with = "clock")]
    pub end_time: NaiveTime,
}
