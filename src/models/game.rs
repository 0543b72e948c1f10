//! Match (game), Stage and the provisional bracket slot labels.

use crate::models::clock;
use crate::models::team::{GroupId, GroupName, TeamId};
use crate::models::tournament::TournamentId;
use crate::models::venue::{RefereeId, VenueId};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Phase of the tournament this match belongs to, in calendar order.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    GroupStage,
    Quarterfinal,
    Semifinal,
    Final,
}

impl Stage {
    pub fn is_playoff(self) -> bool {
        self != Stage::GroupStage
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Scheduled,
    Completed,
    Cancelled,
}

/// Where a placeholder playoff participant comes from, until standings resolve it.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum BracketSlot {
    /// The team holding `seed` in `group`.
    GroupSeed { group: GroupName, seed: u32 },
    /// The winner of the `index`-th (0-based) match of `stage`.
    WinnerOf { stage: Stage, index: usize },
}

/// A persisted match row.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameMatch {
    pub id: MatchId,
    pub tournament_id: TournamentId,
    /// None for unresolved playoff slots.
    pub home_team_id: Option<TeamId>,
    pub away_team_id: Option<TeamId>,
    pub venue_id: VenueId,
    pub referee_id: Option<RefereeId>,
    pub date: NaiveDate,
    #[serde(with = "clock")]
    pub time: NaiveTime,
    pub stage: Stage,
    pub group_id: Option<GroupId>,
    pub round: u32,
    pub status: MatchStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_slot: Option<BracketSlot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub away_slot: Option<BracketSlot>,
}

impl GameMatch {
    /// A scheduled match with a fresh id and no bracket labels.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        tournament_id: TournamentId,
        stage: Stage,
        round: u32,
        date: NaiveDate,
        time: NaiveTime,
        venue_id: VenueId,
        referee_id: Option<RefereeId>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            tournament_id,
            home_team_id: None,
            away_team_id: None,
            venue_id,
            referee_id,
            date,
            time,
            stage,
            group_id: None,
            round,
            status: MatchStatus::Scheduled,
            home_slot: None,
            away_slot: None,
        }
    }

    /// Set both participants (group stage).
    pub fn with_teams(mut self, home: TeamId, away: TeamId) -> Self {
        self.home_team_id = Some(home);
        self.away_team_id = Some(away);
        self
    }

    pub fn with_group(mut self, group_id: GroupId) -> Self {
        self.group_id = Some(group_id);
        self
    }

    pub fn with_slots(mut self, home: Option<BracketSlot>, away: Option<BracketSlot>) -> Self {
        self.home_slot = home;
        self.away_slot = away;
        self
    }

    /// Known team ids (zero, one or two).
    pub fn teams(&self) -> impl Iterator<Item = TeamId> + '_ {
        self.home_team_id.iter().chain(self.away_team_id.iter()).copied()
    }

    /// Cancelled matches hold no venue, referee or team.
    pub fn is_active(&self) -> bool {
        self.status != MatchStatus::Cancelled
    }
}
