//! Group assignment: split the approved roster into groups A and B with seed positions.

use crate::models::{Group, GroupName, GroupTeam, Team, TeamId, Tournament, ValidationError};
use serde::Serialize;

/// A group about to be persisted, members in seed order.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct SeededGroup {
    pub group: Group,
    pub members: Vec<GroupTeam>,
}

impl SeededGroup {
    pub fn team_ids(&self) -> Vec<TeamId> {
        self.members.iter().map(|m| m.team_id).collect()
    }
}

/// Split `teams` (registration order) into group A (first half) and group B (second half),
/// seeding each group 1..=n/2 in order.
///
/// Requires exactly `tournament.max_teams` teams.
pub fn assign_groups(
    tournament: &Tournament,
    teams: &[Team],
) -> Result<[SeededGroup; 2], ValidationError> {
    let group_size = tournament.group_size()?;
    let expected = group_size * 2;
    if teams.len() != expected {
        return Err(ValidationError::WrongTeamCount {
            expected,
            found: teams.len(),
        });
    }

    let seed = |name: GroupName, chunk: &[Team]| {
        let group = Group::new(tournament.id, name);
        let members = chunk
            .iter()
            .zip(1..)
            .map(|(team, seed)| GroupTeam {
                group_id: group.id,
                team_id: team.id,
                seed,
            })
            .collect();
        SeededGroup { group, members }
    };

    let (first, second) = teams.split_at(group_size);
    Ok([seed(GroupName::A, first), seed(GroupName::B, second)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn tournament(max_teams: u32) -> Tournament {
        let d = |day| NaiveDate::from_ymd_opt(2025, 12, day).unwrap();
        Tournament::new("Cup", d(1), d(10), max_teams)
    }

    #[test]
    fn first_half_is_group_a() {
        let t = tournament(8);
        let teams: Vec<Team> = (1..=8).map(|i| Team::approved(t.id, format!("T{i}"))).collect();
        let [a, b] = assign_groups(&t, &teams).unwrap();
        assert_eq!(a.group.name, GroupName::A);
        assert_eq!(a.team_ids(), teams[..4].iter().map(|t| t.id).collect::<Vec<_>>());
        assert_eq!(b.team_ids(), teams[4..].iter().map(|t| t.id).collect::<Vec<_>>());
        assert_eq!(b.members.last().map(|m| m.seed), Some(4));
        assert!(b.members.iter().all(|m| m.group_id == b.group.id));
    }

    #[test]
    fn roster_must_match_the_size() {
        let t = tournament(16);
        let teams: Vec<Team> = (1..=15).map(|i| Team::approved(t.id, format!("T{i}"))).collect();
        assert_eq!(
            assign_groups(&t, &teams).err(),
            Some(ValidationError::WrongTeamCount {
                expected: 16,
                found: 15
            })
        );
        assert_eq!(
            assign_groups(&tournament(12), &teams).err(),
            Some(ValidationError::InvalidMaxTeams(12))
        );
    }
}
