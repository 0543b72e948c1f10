//! Knockout stage: dates counted back from the tournament end date, provisional seed pairings.
//!
//! 8 teams: one semifinal the day before the end date, the final on it.
//! 16 teams: four quarterfinals on up to two days before the semifinal day, two semifinals the
//! day before the end date, the final on it.
//!
//! Participants stay unknown (null team ids) until group standings are resolved elsewhere; each
//! match records which group seed or earlier winner feeds each side.

use crate::models::{
    BracketSlot, Group, GroupName, GroupTeam, ScheduleResult, SchedulingError, Stage, StateError,
    Tournament, ValidationError,
};
use chrono::{Days, NaiveDate, NaiveTime};

/// A playoff match before a venue and referee are attached.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BracketMatch {
    pub stage: Stage,
    pub round: u32,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub home: BracketSlot,
    pub away: BracketSlot,
}

/// Knockout round number of `stage` for a tournament of `max_teams`, or None when the stage
/// is not part of that format.
pub fn knockout_round(stage: Stage, max_teams: u32) -> Option<u32> {
    match (max_teams, stage) {
        (16, Stage::Quarterfinal) => Some(1),
        (16, Stage::Semifinal) => Some(2),
        (16, Stage::Final) => Some(3),
        (8, Stage::Semifinal) => Some(1),
        (8, Stage::Final) => Some(2),
        _ => None,
    }
}

fn seed(group: GroupName, seed: u32) -> BracketSlot {
    BracketSlot::GroupSeed { group, seed }
}

fn winner(stage: Stage, index: usize) -> BracketSlot {
    BracketSlot::WinnerOf { stage, index }
}

fn days_before(tournament: &Tournament, days: u64) -> Result<NaiveDate, ValidationError> {
    tournament
        .end_date
        .checked_sub_days(Days::new(days))
        .filter(|d| *d >= tournament.start_date)
        .ok_or(ValidationError::TournamentTooShort {
            start: tournament.start_date,
            end: tournament.end_date,
        })
}

/// Attach kick-off times: the k-th match of a day takes the k-th slot.
fn timed(
    stage: Stage,
    round: u32,
    date: NaiveDate,
    pairs: &[(BracketSlot, BracketSlot)],
    time_slots: &[NaiveTime],
) -> ScheduleResult<Vec<BracketMatch>> {
    if pairs.len() > time_slots.len() {
        return Err(SchedulingError::NoTimeSlot {
            date,
            stage,
            needed: pairs.len(),
        }
        .into());
    }
    Ok(pairs
        .iter()
        .zip(time_slots)
        .map(|(&(home, away), &time)| BracketMatch {
            stage,
            round,
            date,
            time,
            home,
            away,
        })
        .collect())
}

/// Lay out the knockout calendar for `tournament`.
///
/// `groups` are the tournament's groups with seeded members; `last_group_date` is the latest
/// group-stage match date, used to keep quarterfinals after the group stage where the
/// calendar allows.
pub fn build_bracket(
    tournament: &Tournament,
    groups: &[(Group, Vec<GroupTeam>)],
    last_group_date: Option<NaiveDate>,
    time_slots: &[NaiveTime],
) -> ScheduleResult<Vec<BracketMatch>> {
    let group_size = tournament.group_size()?;
    let seeded = |name: GroupName| {
        groups
            .iter()
            .find(|(g, _)| g.name == name)
            .map_or(0, |(_, members)| members.len())
    };
    if groups.len() < 2 || seeded(GroupName::A) < group_size || seeded(GroupName::B) < group_size
    {
        return Err(StateError::GroupStageMissing(tournament.id, groups.len()).into());
    }

    let final_day = tournament.end_date;
    let semi_day = days_before(tournament, 1)?;
    use GroupName::{A, B};

    let mut bracket = Vec::new();
    match tournament.max_teams {
        8 => {
            // Provisional: both matches carry the top-seed pairing until standings exist.
            let pairing = [(seed(A, 1), seed(B, 1))];
            bracket.extend(timed(Stage::Semifinal, 1, semi_day, &pairing, time_slots)?);
            bracket.extend(timed(Stage::Final, 2, final_day, &pairing, time_slots)?);
        }
        _ => {
            let quarters = [
                (seed(A, 1), seed(B, 4)),
                (seed(B, 1), seed(A, 4)),
                (seed(A, 2), seed(B, 3)),
                (seed(B, 2), seed(A, 3)),
            ];
            let mut days = vec![days_before(tournament, 3)?, days_before(tournament, 2)?];
            if let Some(last) = last_group_date {
                days.retain(|d| *d > last);
            }
            if days.is_empty() {
                log::warn!(
                    "Group stage of {} runs to {:?}; quarterfinals overlap it",
                    tournament.id,
                    last_group_date
                );
                days = vec![days_before(tournament, 3)?, days_before(tournament, 2)?];
            }
            let per_day = quarters.len().div_ceil(days.len());
            for (chunk, &day) in quarters.chunks(per_day).zip(&days) {
                bracket.extend(timed(Stage::Quarterfinal, 1, day, chunk, time_slots)?);
            }

            let semis = [
                (winner(Stage::Quarterfinal, 0), winner(Stage::Quarterfinal, 3)),
                (winner(Stage::Quarterfinal, 1), winner(Stage::Quarterfinal, 2)),
            ];
            bracket.extend(timed(Stage::Semifinal, 2, semi_day, &semis, time_slots)?);
            let last = [(winner(Stage::Semifinal, 0), winner(Stage::Semifinal, 1))];
            bracket.extend(timed(Stage::Final, 3, final_day, &last, time_slots)?);
        }
    }
    Ok(bracket)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::config::default_time_slots;
    use uuid::Uuid;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, day).unwrap()
    }

    fn groups(tournament: &Tournament, size: u32) -> Vec<(Group, Vec<GroupTeam>)> {
        [GroupName::A, GroupName::B]
            .into_iter()
            .map(|name| {
                let group = Group::new(tournament.id, name);
                let members = (1..=size)
                    .map(|seed| GroupTeam {
                        group_id: group.id,
                        team_id: Uuid::new_v4(),
                        seed,
                    })
                    .collect();
                (group, members)
            })
            .collect()
    }

    #[test]
    fn quarterfinals_fall_back_when_the_group_stage_runs_late() {
        let t = Tournament::new("Cup", d(1), d(20), 16);
        let bracket = build_bracket(&t, &groups(&t, 8), Some(d(17)), &default_time_slots()).unwrap();
        let qf: Vec<_> = bracket
            .iter()
            .filter(|m| m.stage == Stage::Quarterfinal)
            .map(|m| m.date)
            .collect();
        // 01-18 is left after the last group day, so it takes all four
        assert_eq!(qf, vec![d(18); 4]);

        let bracket = build_bracket(&t, &groups(&t, 8), Some(d(19)), &default_time_slots()).unwrap();
        let qf: Vec<_> = bracket
            .iter()
            .filter(|m| m.stage == Stage::Quarterfinal)
            .map(|m| m.date)
            .collect();
        assert_eq!(qf, vec![d(17), d(17), d(18), d(18)]);
    }

    #[test]
    fn calendar_must_fit_the_bracket() {
        let t = Tournament::new("Cup", d(1), d(2), 16);
        assert_eq!(
            build_bracket(&t, &groups(&t, 8), None, &default_time_slots()),
            Err(ValidationError::TournamentTooShort {
                start: d(1),
                end: d(2)
            }
            .into())
        );

        let t = Tournament::new("Cup", d(1), d(2), 8);
        assert_eq!(build_bracket(&t, &groups(&t, 4), None, &default_time_slots()).unwrap().len(), 2);

        let single_slot = [NaiveTime::from_hms_opt(9, 0, 0).unwrap()];
        let t = Tournament::new("Cup", d(1), d(20), 16);
        assert_eq!(
            build_bracket(&t, &groups(&t, 8), None, &single_slot),
            Err(SchedulingError::NoTimeSlot {
                date: d(17),
                stage: Stage::Quarterfinal,
                needed: 2
            }
            .into())
        );
    }

    #[test]
    fn incomplete_groups_are_missing() {
        let t = Tournament::new("Cup", d(1), d(20), 16);
        let short = groups(&t, 4);
        assert_eq!(
            build_bracket(&t, &short, None, &default_time_slots()),
            Err(StateError::GroupStageMissing(t.id, 2).into())
        );
        assert_eq!(knockout_round(Stage::Quarterfinal, 8), None);
        assert_eq!(knockout_round(Stage::Final, 16), Some(3));
    }
}
