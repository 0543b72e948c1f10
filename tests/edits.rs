//! Editing single matches after the calendar exists.

mod common;

use common::{date, time, World};
use court_scheduler::{
    create_group_stage_schedule, create_playoff_schedule, update_match, ConflictError, GameMatch,
    GroupStageRequest, MatchEdit, MatchStatus, PlayoffRequest, ScheduleError, ScheduleResult,
    SchedulerConfig, Stage, StateError, ValidationError,
};

/// 8-team world with the generated group stage:
/// 12-01 T1-T2 (V1, R1) 09:00, T5-T6 (V2, R2) 11:00; 12-03 T1-T3, T5-T7; ...; 12-10 T3-T4, T7-T8.
fn scheduled() -> World {
    let w = World::eight_teams();
    create_group_stage_schedule(
        &w.store,
        w.tournament.id,
        &GroupStageRequest::Generate {
            matches_per_day: Some(2),
            time_slots: None,
        },
        &SchedulerConfig::default(),
    )
    .unwrap();
    w
}

fn find(w: &World, home: usize, away: usize) -> GameMatch {
    w.persisted()
        .into_iter()
        .find(|m| {
            m.home_team_id == Some(w.team_id(home)) && m.away_team_id == Some(w.team_id(away))
        })
        .unwrap()
}

fn edit(w: &World, game: &GameMatch, change: MatchEdit) -> ScheduleResult<GameMatch> {
    update_match(
        &w.store,
        w.tournament.id,
        game.id,
        change,
        &SchedulerConfig::default(),
    )
}

#[test]
fn venue_edit_respects_other_bookings() {
    let w = scheduled();
    let opener = find(&w, 1, 2);
    assert_eq!((opener.date, opener.venue_id), (date(2025, 12, 1), w.venues[0].id));

    let err = edit(&w, &opener, MatchEdit::Venue(w.venues[1].id)).unwrap_err();
    assert_eq!(
        err,
        ConflictError::VenueBooked {
            venue: w.venues[1].id,
            date: date(2025, 12, 1)
        }
        .into()
    );

    let moved = edit(&w, &opener, MatchEdit::Venue(w.venues[2].id)).unwrap();
    assert_eq!(moved.venue_id, w.venues[2].id);
    assert_eq!(find(&w, 1, 2).venue_id, w.venues[2].id);

    let err = edit(&w, &opener, MatchEdit::Venue(uuid::Uuid::new_v4())).unwrap_err();
    assert!(matches!(
        err,
        ScheduleError::Validation(ValidationError::UnknownVenue(_))
    ));
}

#[test]
fn date_edit_checks_team_rest() {
    let w = scheduled();
    let opener = find(&w, 1, 2);
    edit(&w, &opener, MatchEdit::Referee(None)).unwrap();

    // T1 plays T3 on 12-03
    let err = edit(&w, &opener, MatchEdit::Date(date(2025, 12, 2))).unwrap_err();
    assert_eq!(
        err,
        ConflictError::TeamRestEdit {
            team: w.team_id(1),
            other: find(&w, 1, 3).id
        }
        .into()
    );
    assert_eq!(find(&w, 1, 2).date, date(2025, 12, 1));
}

#[test]
fn match_can_move_to_a_free_day() {
    let w = scheduled();
    let closer = find(&w, 3, 4);
    assert_eq!(closer.date, date(2025, 12, 10));

    // V1 and R1 are already in use on 12-01
    let err = edit(&w, &closer, MatchEdit::Date(date(2025, 12, 1))).unwrap_err();
    assert!(matches!(err, ScheduleError::Conflict(_)));

    edit(&w, &closer, MatchEdit::Referee(None)).unwrap();
    edit(&w, &closer, MatchEdit::Venue(w.venues[2].id)).unwrap();
    let moved = edit(&w, &closer, MatchEdit::Date(date(2025, 12, 1))).unwrap();
    assert_eq!(moved.date, date(2025, 12, 1));
    assert_eq!(moved.venue_id, w.venues[2].id);
    assert_eq!(moved.referee_id, None);
    assert_eq!(w.persisted().len(), 12);
}

#[test]
fn time_and_referee_edits() {
    let w = scheduled();
    let opener = find(&w, 1, 2);
    let later = edit(&w, &opener, MatchEdit::Time(time(14, 0))).unwrap();
    assert_eq!(later.time, time(14, 0));

    // R3 works 12-06 only, so 12-01 is open
    let swapped = edit(&w, &opener, MatchEdit::Referee(Some(w.referees[2].id))).unwrap();
    assert_eq!(swapped.referee_id, Some(w.referees[2].id));

    // R2 already officiates T5-T6 that day
    let err = edit(&w, &opener, MatchEdit::Referee(Some(w.referees[1].id))).unwrap_err();
    assert_eq!(
        err,
        ConflictError::RefereeBooked {
            referee: w.referees[1].id,
            date: date(2025, 12, 1)
        }
        .into()
    );
}

#[test]
fn completed_and_unknown_matches_are_rejected() {
    let w = scheduled();
    let opener = find(&w, 1, 2);
    w.store
        .set_match_status(opener.id, MatchStatus::Completed)
        .unwrap();
    let err = edit(&w, &opener, MatchEdit::Time(time(16, 0))).unwrap_err();
    assert_eq!(err, StateError::MatchCompleted(opener.id).into());

    let ghost = GameMatch::new(
        w.tournament.id,
        Stage::GroupStage,
        1,
        date(2025, 12, 2),
        time(9, 0),
        w.venues[0].id,
        None,
    );
    let err = edit(&w, &ghost, MatchEdit::Time(time(16, 0))).unwrap_err();
    assert_eq!(err, StateError::MatchNotFound(ghost.id).into());
}

#[test]
fn final_stays_on_the_last_day() {
    let w = scheduled();
    create_playoff_schedule(
        &w.store,
        w.tournament.id,
        &PlayoffRequest::Generate,
        &SchedulerConfig::default(),
    )
    .unwrap();
    let fin = w
        .persisted()
        .into_iter()
        .find(|m| m.stage == Stage::Final)
        .unwrap();

    let err = edit(&w, &fin, MatchEdit::Date(date(2025, 12, 9))).unwrap_err();
    assert_eq!(
        err,
        ValidationError::FinalDateMismatch {
            expected: date(2025, 12, 10),
            found: date(2025, 12, 9)
        }
        .into()
    );
    let evening = edit(&w, &fin, MatchEdit::Time(time(16, 0))).unwrap();
    assert_eq!((evening.date, evening.time), (date(2025, 12, 10), time(16, 0)));
}

#[test]
fn dates_stay_within_the_tournament() {
    let w = scheduled();
    let opener = find(&w, 1, 2);
    let err = edit(&w, &opener, MatchEdit::Date(date(2025, 11, 30))).unwrap_err();
    assert_eq!(
        err,
        ValidationError::DateOutsideTournament {
            date: date(2025, 11, 30),
            start: date(2025, 12, 1),
            end: date(2025, 12, 10)
        }
        .into()
    );
    assert_eq!(find(&w, 1, 2).date, date(2025, 12, 1));
}

#[test]
fn semifinal_cannot_move_onto_or_past_the_final() {
    let w = scheduled();
    create_playoff_schedule(
        &w.store,
        w.tournament.id,
        &PlayoffRequest::Generate,
        &SchedulerConfig::default(),
    )
    .unwrap();
    let semi = w
        .persisted()
        .into_iter()
        .find(|m| m.stage == Stage::Semifinal)
        .unwrap();
    assert_eq!(semi.date, date(2025, 12, 9));

    let err = edit(&w, &semi, MatchEdit::Date(date(2025, 12, 11))).unwrap_err();
    assert_eq!(
        err,
        ValidationError::DateOutsideTournament {
            date: date(2025, 12, 11),
            start: date(2025, 12, 1),
            end: date(2025, 12, 10)
        }
        .into()
    );

    let err = edit(&w, &semi, MatchEdit::Date(date(2025, 12, 10))).unwrap_err();
    assert_eq!(
        err,
        ValidationError::StageOrder {
            earlier: Stage::Semifinal,
            later: Stage::Final
        }
        .into()
    );

    let persisted = w.persisted();
    let dated = |stage| persisted.iter().find(|m| m.stage == stage).map(|m| m.date);
    assert_eq!(dated(Stage::Semifinal), Some(date(2025, 12, 9)));
    assert_eq!(dated(Stage::Final), Some(date(2025, 12, 10)));
}

#[test]
fn edit_bodies_deserialize_from_json() {
    let parsed: MatchEdit = serde_json::from_str(r#"{"time":"18:30"}"#).unwrap();
    assert_eq!(parsed, MatchEdit::Time(time(18, 30)));
    let parsed: MatchEdit = serde_json::from_str(r#"{"referee":null}"#).unwrap();
    assert_eq!(parsed, MatchEdit::Referee(None));
    let parsed: MatchEdit = serde_json::from_str(r#"{"date":"2025-12-04"}"#).unwrap();
    assert_eq!(parsed, MatchEdit::Date(date(2025, 12, 4)));
}
