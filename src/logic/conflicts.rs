//! Final team-rest check over an assembled schedule.
//!
//! Independent of the planner's tracker: custom schedules never pass through the tracker, so
//! this is what catches a caller-supplied list that overworks a team.

use crate::logic::rest::RestRule;
use crate::models::{ConflictError, GameMatch};

/// Walk `matches` in order and fail on the first pair that shares a team in breach of `rule`.
/// The error names both indices (into `matches`) and the team.
pub fn validate_team_rest(matches: &[GameMatch], rule: RestRule) -> Result<(), ConflictError> {
    for (second, later) in matches.iter().enumerate() {
        if !later.is_active() {
            continue;
        }
        for (first, earlier) in matches[..second].iter().enumerate() {
            if !earlier.is_active() {
                continue;
            }
            let Some(team) = later.teams().find(|t| earlier.teams().any(|e| e == *t)) else {
                continue;
            };
            if !rule.permits((earlier.date, earlier.time), (later.date, later.time)) {
                return Err(ConflictError::TeamRest {
                    first,
                    second,
                    team,
                });
            }
        }
    }
    Ok(())
}

/// Check one edited match against the rest of its tournament.
pub fn validate_edit(
    edited: &GameMatch,
    others: &[GameMatch],
    rule: RestRule,
) -> Result<(), ConflictError> {
    if !edited.is_active() {
        return Ok(());
    }
    for other in others.iter().filter(|m| m.id != edited.id && m.is_active()) {
        let Some(team) = edited.teams().find(|t| other.teams().any(|o| o == *t)) else {
            continue;
        };
        if !rule.permits((other.date, other.time), (edited.date, edited.time)) {
            return Err(ConflictError::TeamRestEdit {
                team,
                other: other.id,
            });
        }
    }
    Ok(())
}
