//! Tournament and TournamentStatus.

use crate::models::error::ValidationError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Lifecycle of a tournament as owned by the tournament CRUD subsystem.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    /// Registrations open or closed, not started yet.
    #[default]
    Upcoming,
    Ongoing,
    Completed,
    Cancelled,
}

/// The scheduling view of a tournament: its calendar anchors and size.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub start_date: NaiveDate,
    /// The final is always played on this date.
    pub end_date: NaiveDate,
    /// 8 or 16.
    pub max_teams: u32,
    #[serde(default)]
    pub status: TournamentStatus,
}

impl Tournament {
    /// Create an upcoming tournament with a fresh id.
    pub fn new(
        name: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        max_teams: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            start_date,
            end_date,
            max_teams,
            status: TournamentStatus::Upcoming,
        }
    }

    /// Teams per group, after checking `max_teams` is a supported size.
    pub fn group_size(&self) -> Result<usize, ValidationError> {
        match self.max_teams {
            8 | 16 => Ok(self.max_teams as usize / 2),
            other => Err(ValidationError::InvalidMaxTeams(other)),
        }
    }

    /// Every match date must fall within `start_date..=end_date`.
    pub fn check_date(&self, date: NaiveDate) -> Result<(), ValidationError> {
        if (self.start_date..=self.end_date).contains(&date) {
            Ok(())
        } else {
            Err(ValidationError::DateOutsideTournament {
                date,
                start: self.start_date,
                end: self.end_date,
            })
        }
    }

    /// Completed and cancelled tournaments take no further scheduling.
    pub fn is_closed(&self) -> bool {
        matches!(
            self.status,
            TournamentStatus::Completed | TournamentStatus::Cancelled
        )
    }
}
