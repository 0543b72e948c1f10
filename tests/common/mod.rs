//! Shared fixtures: a seeded in-memory store with one tournament.
#![allow(dead_code)]

use chrono::{NaiveDate, NaiveTime};
use court_scheduler::{
    GameMatch, MemoryStore, Referee, ScheduleStore, Team, Tournament, Venue,
};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

pub struct World {
    pub store: MemoryStore,
    pub tournament: Tournament,
    /// Registration order: T1, T2, ...
    pub teams: Vec<Team>,
    pub venues: Vec<Venue>,
    pub referees: Vec<Referee>,
}

impl World {
    pub fn new(
        max_teams: u32,
        start: NaiveDate,
        end: NaiveDate,
        venues: usize,
        referees: usize,
    ) -> Self {
        let store = MemoryStore::new();
        let tournament = Tournament::new("City Cup", start, end, max_teams);
        store.insert_tournament(tournament.clone()).unwrap();
        let teams: Vec<Team> = (1..=max_teams)
            .map(|i| Team::approved(tournament.id, format!("T{i}")))
            .collect();
        for t in &teams {
            store.register_team(t.clone()).unwrap();
        }
        let venues: Vec<Venue> = (1..=venues).map(|i| Venue::new(format!("V{i}"))).collect();
        for v in &venues {
            store.add_venue(v.clone()).unwrap();
        }
        let referees: Vec<Referee> = (1..=referees)
            .map(|i| Referee::new(format!("R{i}")))
            .collect();
        for r in &referees {
            store.add_referee(r.clone()).unwrap();
        }
        Self {
            store,
            tournament,
            teams,
            venues,
            referees,
        }
    }

    /// The 8-team example: T1..T8, 2025-12-01 to 2025-12-10.
    pub fn eight_teams() -> Self {
        Self::new(8, date(2025, 12, 1), date(2025, 12, 10), 3, 4)
    }

    /// 16 teams over January 2026.
    pub fn sixteen_teams() -> Self {
        Self::new(16, date(2026, 1, 1), date(2026, 1, 31), 4, 10)
    }

    pub fn persisted(&self) -> Vec<GameMatch> {
        self.store.matches_for(self.tournament.id).unwrap()
    }

    pub fn team_id(&self, n: usize) -> uuid::Uuid {
        self.teams[n - 1].id
    }
}

/// Assert the venue, referee and team rest invariants over a whole schedule.
pub fn assert_schedule_invariants(matches: &[GameMatch]) {
    for (i, a) in matches.iter().enumerate() {
        for b in &matches[i + 1..] {
            assert!(
                !(a.venue_id == b.venue_id && a.date == b.date),
                "venue {} double-booked on {}",
                a.venue_id,
                a.date
            );
            if let (Some(ra), Some(rb)) = (a.referee_id, b.referee_id) {
                if ra == rb {
                    let gap = (a.date - b.date).num_days().abs();
                    assert!(gap >= 2, "referee {ra} on {} and {}", a.date, b.date);
                }
            }
            let shared = a.teams().any(|t| b.teams().any(|u| u == t));
            if shared {
                let gap = (a.date - b.date).num_days().abs();
                assert_ne!(gap, 1, "team on consecutive dates {} {}", a.date, b.date);
                if gap == 0 {
                    assert!((a.time - b.time).abs() >= chrono::Duration::hours(2));
                }
            }
        }
    }
}
