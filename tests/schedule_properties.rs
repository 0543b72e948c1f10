//! Property-based tests for generated group stages: whatever the calendar, capacity and
//! referee availability, a call either commits a schedule that keeps every booking rule or
//! fails and commits nothing.

mod common;

use chrono::Days;
use common::{assert_schedule_invariants, date, time, World};
use court_scheduler::{
    create_group_stage_schedule, create_playoff_schedule, GroupStageRequest, PlayoffRequest,
    RefereeBusySlot, SchedulerConfig, Stage,
};
use proptest::prelude::*;
use std::collections::BTreeSet;

#[derive(Clone, Debug)]
struct Setup {
    span_days: u64,
    matches_per_day: usize,
    venues: usize,
    referees: usize,
    /// (referee index, day offset)
    busy: Vec<(usize, u64)>,
}

fn setup_strategy() -> impl Strategy<Value = Setup> {
    (
        3u64..=30,
        1usize..=4,
        1usize..=3,
        0usize..=5,
        prop::collection::vec((0usize..5, 0u64..30), 0..8),
    )
        .prop_map(|(span_days, matches_per_day, venues, referees, busy)| Setup {
            span_days,
            matches_per_day,
            venues,
            referees,
            busy,
        })
}

fn build(setup: &Setup) -> World {
    let start = date(2025, 12, 1);
    let end = start.checked_add_days(Days::new(setup.span_days)).unwrap();
    let w = World::new(8, start, end, setup.venues, setup.referees);
    for &(referee, day) in &setup.busy {
        let Some(r) = w.referees.get(referee) else {
            continue;
        };
        w.store
            .add_busy_slot(RefereeBusySlot {
                referee_id: r.id,
                date: start.checked_add_days(Days::new(day)).unwrap(),
                start_time: time(8, 0),
                end_time: time(10, 0),
            })
            .unwrap();
    }
    w
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn group_stage_is_all_or_nothing(setup in setup_strategy()) {
        let w = build(&setup);
        let request = GroupStageRequest::Generate {
            matches_per_day: Some(setup.matches_per_day),
            time_slots: None,
        };
        let result = create_group_stage_schedule(
            &w.store,
            w.tournament.id,
            &request,
            &SchedulerConfig::default(),
        );
        let persisted = w.persisted();

        match result {
            Ok(schedule) => {
                prop_assert_eq!(schedule.matches.len(), 12);
                prop_assert_eq!(persisted.len(), 12);
                assert_schedule_invariants(&persisted);

                let pairs: BTreeSet<_> = persisted
                    .iter()
                    .filter_map(|m| Some((m.home_team_id?, m.away_team_id?)))
                    .map(|(h, a)| (h.min(a), h.max(a)))
                    .collect();
                prop_assert_eq!(pairs.len(), 12);

                for m in &persisted {
                    prop_assert!(m.date >= w.tournament.start_date);
                    prop_assert!(m.date <= w.tournament.end_date);
                    let same_day = persisted.iter().filter(|o| o.date == m.date).count();
                    prop_assert!(same_day <= setup.matches_per_day);
                    if let Some(referee) = m.referee_id {
                        let busy = setup.busy.iter().any(|&(r, day)| {
                            w.referees.get(r).is_some_and(|r| r.id == referee)
                                && w.tournament.start_date.checked_add_days(Days::new(day))
                                    == Some(m.date)
                        });
                        prop_assert!(!busy, "referee {} booked on a busy day", referee);
                    }
                }
            }
            Err(_) => {
                prop_assert!(persisted.is_empty());
                prop_assert_eq!(w.store.group_count(w.tournament.id).unwrap(), 0);
            }
        }
    }

    #[test]
    fn playoffs_keep_every_booking_rule(setup in setup_strategy()) {
        let w = build(&setup);
        let config = SchedulerConfig::default();
        let request = GroupStageRequest::Generate {
            matches_per_day: Some(setup.matches_per_day),
            time_slots: None,
        };
        prop_assume!(
            create_group_stage_schedule(&w.store, w.tournament.id, &request, &config).is_ok()
        );

        let playoffs =
            create_playoff_schedule(&w.store, w.tournament.id, &PlayoffRequest::Generate, &config);
        match playoffs {
            Ok(playoffs) => {
                prop_assert_eq!(playoffs.matches.len(), 2);
                let fin = playoffs.matches.iter().find(|m| m.stage == Stage::Final);
                prop_assert_eq!(fin.map(|m| m.date), Some(w.tournament.end_date));
                assert_schedule_invariants(&w.persisted());
            }
            Err(_) => {
                prop_assert_eq!(w.persisted().len(), 12);
            }
        }
    }
}
