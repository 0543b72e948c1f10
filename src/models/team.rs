//! Teams, groups and seeded group membership.

use crate::models::tournament::TournamentId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a team.
pub type TeamId = Uuid;

/// Unique identifier for a group.
pub type GroupId = Uuid;

/// A registered team. Only approved teams are scheduled.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub tournament_id: TournamentId,
    pub name: String,
    #[serde(default)]
    pub approved: bool,
}

impl Team {
    /// Create an approved team with a fresh id.
    pub fn approved(tournament_id: TournamentId, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            tournament_id,
            name: name.into(),
            approved: true,
        }
    }
}

/// Every tournament has exactly these two groups.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub enum GroupName {
    A,
    B,
}

impl std::fmt::Display for GroupName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GroupName::A => write!(f, "A"),
            GroupName::B => write!(f, "B"),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub tournament_id: TournamentId,
    pub name: GroupName,
}

impl Group {
    pub fn new(tournament_id: TournamentId, name: GroupName) -> Self {
        Self {
            id: Uuid::new_v4(),
            tournament_id,
            name,
        }
    }
}

/// Membership of a team in a group with its seed position (1-based).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GroupTeam {
    pub group_id: GroupId,
    pub team_id: TeamId,
    pub seed: u32,
}
