//! Entry points: create the group-stage schedule, create the playoff schedule, edit a match.
//!
//! Each call runs in one store transaction. Requests come in two tagged shapes, `generate`
//! (the engine picks dates, times, venues and referees) and `custom` (the caller supplies
//! every match verbatim); both end in the same availability and team-rest checks.

use crate::logic::availability::AvailabilityOracle;
use crate::logic::bracket::{build_bracket, knockout_round};
use crate::logic::config::SchedulerConfig;
use crate::logic::conflicts::{validate_edit, validate_team_rest};
use crate::logic::groups::{assign_groups, SeededGroup};
use crate::logic::planner::{interleave, Fixture, SlotPlan, SlotPlanner};
use crate::logic::rest::RestRule;
use crate::logic::round_robin::RoundRobin;
use crate::models::{
    clock, ConflictError, GameMatch, GroupId, MatchId, MatchStatus, RefereeId, ScheduleResult,
    SchedulingError, Stage, StateError, TeamId, Tournament, TournamentId, ValidationError, VenueId,
};
use crate::store::{ScheduleStore, ScheduleTx};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// A caller-specified group-stage match.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct CustomGroupMatch {
    pub home_team_id: TeamId,
    pub away_team_id: TeamId,
    #[serde(default)]
    pub venue_id: Option<VenueId>,
    #[serde(default)]
    pub referee_id: Option<RefereeId>,
    pub date: NaiveDate,
    #[serde(with = "clock")]
    pub time: NaiveTime,
}

/// A caller-specified playoff match. Participants are resolved later.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct CustomPlayoffMatch {
    pub stage: Stage,
    #[serde(default)]
    pub round: Option<u32>,
    #[serde(default)]
    pub venue_id: Option<VenueId>,
    #[serde(default)]
    pub referee_id: Option<RefereeId>,
    pub date: NaiveDate,
    #[serde(with = "clock")]
    pub time: NaiveTime,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum GroupStageRequest {
    /// Round-robin both groups and let the planner place every match.
    Generate {
        /// Falls back to the configured default.
        #[serde(default)]
        matches_per_day: Option<usize>,
        /// Falls back to the configured slots.
        #[serde(default, with = "clock::option_list")]
        time_slots: Option<Vec<NaiveTime>>,
    },
    /// Use these matches as given, in this order.
    Custom { matches: Vec<CustomGroupMatch> },
}

impl Default for GroupStageRequest {
    fn default() -> Self {
        GroupStageRequest::Generate {
            matches_per_day: None,
            time_slots: None,
        }
    }
}

impl GroupStageRequest {
    /// Shape checks that need no stored state.
    pub fn validate(&self, config: &SchedulerConfig) -> Result<(), ValidationError> {
        match self {
            GroupStageRequest::Generate { .. } => {
                self.slot_plan(config)?;
            }
            GroupStageRequest::Custom { matches } => {
                for (index, m) in matches.iter().enumerate() {
                    if m.venue_id.is_none() {
                        return Err(ValidationError::MissingVenue { index });
                    }
                    if m.home_team_id == m.away_team_id {
                        return Err(ValidationError::SelfPairing { index });
                    }
                }
            }
        }
        Ok(())
    }

    fn slot_plan(&self, config: &SchedulerConfig) -> Result<SlotPlan, ValidationError> {
        let GroupStageRequest::Generate {
            matches_per_day,
            time_slots,
        } = self
        else {
            return Err(ValidationError::InvalidMatchesPerDay);
        };
        let matches_per_day = matches_per_day.unwrap_or(config.default_matches_per_day);
        if matches_per_day == 0 {
            return Err(ValidationError::InvalidMatchesPerDay);
        }
        let time_slots = time_slots.clone().unwrap_or_else(|| config.time_slots.clone());
        if time_slots.is_empty() || time_slots.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ValidationError::InvalidTimeSlots);
        }
        Ok(SlotPlan {
            matches_per_day,
            time_slots,
        })
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PlayoffRequest {
    /// Build the standard bracket for the tournament size.
    #[default]
    Generate,
    /// Use these matches as given.
    Custom { matches: Vec<CustomPlayoffMatch> },
}

impl PlayoffRequest {
    /// Shape checks that need no stored state.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let PlayoffRequest::Custom { matches } = self else {
            return Ok(());
        };
        for (index, m) in matches.iter().enumerate() {
            if m.venue_id.is_none() {
                return Err(ValidationError::MissingVenue { index });
            }
            if !m.stage.is_playoff() {
                return Err(ValidationError::UnexpectedStage {
                    index,
                    stage: m.stage,
                });
            }
        }
        let finals = matches.iter().filter(|m| m.stage == Stage::Final).count();
        if finals != 1 {
            return Err(ValidationError::FinalCount(finals));
        }
        let dated: Vec<_> = matches.iter().map(|m| (m.stage, m.date)).collect();
        check_stage_order(&dated)
    }
}

/// Every quarterfinal before every semifinal, every semifinal before the final.
fn check_stage_order(dated: &[(Stage, NaiveDate)]) -> Result<(), ValidationError> {
    let stages = [Stage::Quarterfinal, Stage::Semifinal, Stage::Final];
    for (i, &earlier) in stages.iter().enumerate() {
        for &later in &stages[i + 1..] {
            let dates = |stage: Stage| {
                dated
                    .iter()
                    .filter(move |(s, _)| *s == stage)
                    .map(|&(_, date)| date)
            };
            if let (Some(a), Some(b)) = (dates(earlier).max(), dates(later).min()) {
                if a >= b {
                    return Err(ValidationError::StageOrder { earlier, later });
                }
            }
        }
    }
    Ok(())
}

/// Exactly one field of a scheduled match to change.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchEdit {
    Venue(VenueId),
    Referee(Option<RefereeId>),
    Date(NaiveDate),
    Time(#[serde(with = "clock")] NaiveTime),
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct GroupStageSchedule {
    pub groups: Vec<SeededGroup>,
    /// In scheduling order (A, B, A, B, ... for generated schedules).
    pub matches: Vec<GameMatch>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct PlayoffSchedule {
    pub matches: Vec<GameMatch>,
}

fn open_tournament(tx: &dyn ScheduleTx) -> ScheduleResult<Tournament> {
    let tournament = tx.tournament()?;
    if tournament.is_closed() {
        return Err(StateError::TournamentClosed(tournament.id).into());
    }
    Ok(tournament)
}

/// Venue and referee checks for one match about to be written.
fn check_resources(tx: &dyn ScheduleTx, game: &GameMatch) -> ScheduleResult<()> {
    let venue = tx
        .venue(game.venue_id)?
        .ok_or(ValidationError::UnknownVenue(game.venue_id))?;
    if !venue.is_available {
        return Err(ConflictError::VenueClosed(venue.id).into());
    }
    let oracle = AvailabilityOracle::new(tx);
    oracle.ensure_venue(game.venue_id, game.date, Some(game.id))?;
    if let Some(referee_id) = game.referee_id {
        if tx.referee(referee_id)?.is_none() {
            return Err(ValidationError::UnknownReferee(referee_id).into());
        }
        oracle.ensure_referee(referee_id, game.date, Some(game.id))?;
    }
    Ok(())
}

fn fixtures<'a>(
    group: &'a SeededGroup,
    teams: &'a [TeamId],
) -> impl Iterator<Item = Fixture> + 'a {
    RoundRobin::new(teams)
        .zip(1..)
        .map(move |((home, away), round)| Fixture {
            group_id: group.group.id,
            round,
            home,
            away,
        })
}

fn generate_group_matches(
    tx: &mut dyn ScheduleTx,
    tournament: &Tournament,
    groups: &[SeededGroup; 2],
    plan: SlotPlan,
    config: &SchedulerConfig,
) -> ScheduleResult<Vec<GameMatch>> {
    let venues = tx.venues()?;
    if !venues.iter().any(|v| v.is_available) {
        return Err(ValidationError::NoVenues.into());
    }
    let referees = tx.referees()?;
    let [a, b] = groups;
    let (teams_a, teams_b) = (a.team_ids(), b.team_ids());

    let mut planner = SlotPlanner::new(
        tournament,
        plan,
        RestRule::new(config.min_rest_gap()),
        config.max_search_days,
        venues,
        referees,
    );
    planner.place_all(tx, interleave(fixtures(a, &teams_a), fixtures(b, &teams_b)))
}

fn book_custom_group_matches(
    tx: &mut dyn ScheduleTx,
    tournament: &Tournament,
    groups: &[SeededGroup; 2],
    custom: &[CustomGroupMatch],
) -> ScheduleResult<Vec<GameMatch>> {
    let group_of: HashMap<TeamId, &SeededGroup> = groups
        .iter()
        .flat_map(|g| g.members.iter().map(move |m| (m.team_id, g)))
        .collect();

    let mut seen = HashSet::new();
    let mut rounds: HashMap<GroupId, u32> = HashMap::new();
    let mut matches = Vec::with_capacity(custom.len());
    for (index, m) in custom.iter().enumerate() {
        let (home, away) = (m.home_team_id, m.away_team_id);
        let home_group = group_of
            .get(&home)
            .ok_or(ValidationError::UnknownTeam { index, team: home })?;
        let away_group = group_of
            .get(&away)
            .ok_or(ValidationError::UnknownTeam { index, team: away })?;
        if home_group.group.id != away_group.group.id {
            return Err(ValidationError::CrossGroupPairing { index, home, away }.into());
        }
        if !seen.insert((home.min(away), home.max(away))) {
            return Err(ValidationError::DuplicatePairing { index, home, away }.into());
        }
        let venue_id = m.venue_id.ok_or(ValidationError::MissingVenue { index })?;
        tournament.check_date(m.date)?;
        let round = rounds.entry(home_group.group.id).or_insert(0);
        *round += 1;
        matches.push(
            GameMatch::new(
                tournament.id,
                Stage::GroupStage,
                *round,
                m.date,
                m.time,
                venue_id,
                m.referee_id,
            )
            .with_teams(home, away)
            .with_group(home_group.group.id),
        );
    }

    let expected: usize = groups
        .iter()
        .map(|g| RoundRobin::new(&g.team_ids()).total())
        .sum();
    if seen.len() != expected {
        return Err(ValidationError::IncompletePairings {
            expected,
            found: seen.len(),
        }
        .into());
    }

    for game in &matches {
        check_resources(&*tx, game)?;
        tx.insert_match(game.clone())?;
    }
    Ok(matches)
}

/// Create groups A and B and the complete group-stage calendar for a tournament.
///
/// Fails with `StateError::ScheduleExists` if groups already exist; nothing is written
/// unless every match is placed and passes the team-rest check.
pub fn create_group_stage_schedule<S: ScheduleStore>(
    store: &S,
    tournament_id: TournamentId,
    request: &GroupStageRequest,
    config: &SchedulerConfig,
) -> ScheduleResult<GroupStageSchedule> {
    request.validate(config)?;
    let rule = RestRule::new(config.min_rest_gap());

    store.transaction(tournament_id, |tx| {
        let tournament = open_tournament(&*tx)?;
        let has_group_matches = tx
            .tournament_matches()?
            .iter()
            .any(|m| m.stage == Stage::GroupStage);
        if !tx.groups()?.is_empty() || has_group_matches {
            return Err(StateError::ScheduleExists(tournament.id).into());
        }

        let teams = tx.approved_teams()?;
        let groups = assign_groups(&tournament, &teams)?;
        for g in &groups {
            tx.insert_group(g.group.clone(), g.members.clone())?;
        }

        let matches = match request {
            GroupStageRequest::Generate { .. } => {
                let plan = request.slot_plan(config)?;
                generate_group_matches(tx, &tournament, &groups, plan, config)?
            }
            GroupStageRequest::Custom { matches } => {
                book_custom_group_matches(tx, &tournament, &groups, matches)?
            }
        };
        validate_team_rest(&matches, rule)?;

        log::info!(
            "Scheduled {} group-stage matches for tournament {} ({} to {})",
            matches.len(),
            tournament.id,
            matches.iter().map(|m| m.date).min().unwrap_or(tournament.start_date),
            matches.iter().map(|m| m.date).max().unwrap_or(tournament.start_date),
        );
        Ok(GroupStageSchedule {
            groups: groups.to_vec(),
            matches,
        })
    })
}

fn generate_playoff_matches(
    tx: &mut dyn ScheduleTx,
    tournament: &Tournament,
    last_group_date: Option<NaiveDate>,
    config: &SchedulerConfig,
) -> ScheduleResult<Vec<GameMatch>> {
    let groups = tx.groups()?;
    let bracket = build_bracket(tournament, &groups, last_group_date, &config.time_slots)?;
    let venues = tx.venues()?;
    let referees = tx.referees()?;

    let mut matches = Vec::with_capacity(bracket.len());
    for slot in bracket {
        let oracle = AvailabilityOracle::new(&*tx);
        let venue_id = oracle
            .first_free_venue(&venues, slot.date)?
            .ok_or(SchedulingError::NoVenue {
                date: slot.date,
                stage: slot.stage,
            })?;
        let referee_id = if referees.is_empty() {
            None
        } else {
            Some(oracle.first_free_referee(&referees, slot.date)?.ok_or(
                SchedulingError::NoReferee {
                    date: slot.date,
                    stage: slot.stage,
                },
            )?)
        };
        let game = GameMatch::new(
            tournament.id,
            slot.stage,
            slot.round,
            slot.date,
            slot.time,
            venue_id,
            referee_id,
        )
        .with_slots(Some(slot.home), Some(slot.away));
        tx.insert_match(game.clone())?;
        matches.push(game);
    }
    Ok(matches)
}

fn book_custom_playoff_matches(
    tx: &mut dyn ScheduleTx,
    tournament: &Tournament,
    custom: &[CustomPlayoffMatch],
) -> ScheduleResult<Vec<GameMatch>> {
    let mut matches = Vec::with_capacity(custom.len());
    for (index, m) in custom.iter().enumerate() {
        let default_round = knockout_round(m.stage, tournament.max_teams).ok_or(
            ValidationError::UnexpectedStage {
                index,
                stage: m.stage,
            },
        )?;
        if m.stage == Stage::Final && m.date != tournament.end_date {
            return Err(ValidationError::FinalDateMismatch {
                expected: tournament.end_date,
                found: m.date,
            }
            .into());
        }
        tournament.check_date(m.date)?;
        let venue_id = m.venue_id.ok_or(ValidationError::MissingVenue { index })?;
        matches.push(GameMatch::new(
            tournament.id,
            m.stage,
            m.round.unwrap_or(default_round),
            m.date,
            m.time,
            venue_id,
            m.referee_id,
        ));
    }
    for game in &matches {
        check_resources(&*tx, game)?;
        tx.insert_match(game.clone())?;
    }
    Ok(matches)
}

/// Create the knockout stage of a tournament whose group stage exists.
///
/// Fails with `StateError::GroupStageMissing` without two groups and with
/// `StateError::PlayoffsExist` when playoff matches were already created.
pub fn create_playoff_schedule<S: ScheduleStore>(
    store: &S,
    tournament_id: TournamentId,
    request: &PlayoffRequest,
    config: &SchedulerConfig,
) -> ScheduleResult<PlayoffSchedule> {
    request.validate()?;
    let rule = RestRule::new(config.min_rest_gap());

    store.transaction(tournament_id, |tx| {
        let tournament = open_tournament(&*tx)?;
        tournament.group_size()?;
        let group_count = tx.groups()?.len();
        if group_count < 2 {
            return Err(StateError::GroupStageMissing(tournament.id, group_count).into());
        }
        let existing = tx.tournament_matches()?;
        if existing.iter().any(|m| m.stage.is_playoff()) {
            return Err(StateError::PlayoffsExist(tournament.id).into());
        }
        let last_group_date = existing
            .iter()
            .filter(|m| m.stage == Stage::GroupStage && m.is_active())
            .map(|m| m.date)
            .max();

        let matches = match request {
            PlayoffRequest::Generate => {
                generate_playoff_matches(tx, &tournament, last_group_date, config)?
            }
            PlayoffRequest::Custom { matches } => {
                book_custom_playoff_matches(tx, &tournament, matches)?
            }
        };
        validate_team_rest(&matches, rule)?;

        log::info!(
            "Scheduled {} playoff matches for tournament {}",
            matches.len(),
            tournament.id
        );
        Ok(PlayoffSchedule { matches })
    })
}

/// Change one field of a scheduled match, re-checking availability and team rest.
///
/// The new date must stay within the tournament dates, and a playoff match must keep
/// its place in the knockout order.
pub fn update_match<S: ScheduleStore>(
    store: &S,
    tournament_id: TournamentId,
    match_id: MatchId,
    edit: MatchEdit,
    config: &SchedulerConfig,
) -> ScheduleResult<GameMatch> {
    let rule = RestRule::new(config.min_rest_gap());

    store.transaction(tournament_id, |tx| {
        let tournament = open_tournament(&*tx)?;
        let matches = tx.tournament_matches()?;
        let mut game = matches
            .iter()
            .find(|m| m.id == match_id)
            .cloned()
            .ok_or(StateError::MatchNotFound(match_id))?;
        if game.status == MatchStatus::Completed {
            return Err(StateError::MatchCompleted(match_id).into());
        }

        match edit {
            MatchEdit::Venue(venue_id) => game.venue_id = venue_id,
            MatchEdit::Referee(referee_id) => game.referee_id = referee_id,
            MatchEdit::Date(date) => game.date = date,
            MatchEdit::Time(time) => game.time = time,
        }
        if game.stage == Stage::Final && game.date != tournament.end_date {
            return Err(ValidationError::FinalDateMismatch {
                expected: tournament.end_date,
                found: game.date,
            }
            .into());
        }
        tournament.check_date(game.date)?;
        if game.stage.is_playoff() {
            let dated: Vec<_> = matches
                .iter()
                .filter(|m| m.id != game.id && m.stage.is_playoff() && m.is_active())
                .chain(std::iter::once(&game))
                .map(|m| (m.stage, m.date))
                .collect();
            check_stage_order(&dated)?;
        }

        check_resources(&*tx, &game)?;
        validate_edit(&game, &matches, rule)?;
        tx.update_match(game.clone())?;
        log::info!("Updated match {} ({:?})", match_id, edit);
        Ok(game)
    })
}
