//! Seed a [`MemoryStore`] from CSV exports of the tournament, registration, venue and referee
//! subsystems.
//!
//! Expected files (each optional) in one directory: `tournaments.csv`, `teams.csv`,
//! `venues.csv`, `referees.csv`, `referee_busy.csv`. Headers match the model field names;
//! `teams.csv` rows are registered in file order.

use crate::models::{Referee, RefereeBusySlot, ScheduleError, Team, Tournament, Venue};
use crate::store::MemoryStore;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("cannot open {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Store(#[from] ScheduleError),
}

/// How many rows of each kind were loaded.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ImportSummary {
    pub tournaments: usize,
    pub teams: usize,
    pub venues: usize,
    pub referees: usize,
    pub busy_slots: usize,
}

/// Deserialize every row of a headed CSV stream.
pub fn read_rows<T: DeserializeOwned, R: Read>(reader: R) -> Result<Vec<T>, ImportError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let rows = rdr.deserialize().collect::<Result<Vec<T>, csv::Error>>()?;
    Ok(rows)
}

fn read_file<T: DeserializeOwned>(dir: &Path, name: &str) -> Result<Vec<T>, ImportError> {
    let path = dir.join(name);
    if !path.exists() {
        log::debug!("{} not found, skipping", path.display());
        return Ok(Vec::new());
    }
    let file = File::open(&path).map_err(|source| ImportError::Io {
        path: path.clone(),
        source,
    })?;
    read_rows(file)
}

/// Load every known CSV file in `dir` into `store`.
pub fn seed_from_dir(store: &MemoryStore, dir: &Path) -> Result<ImportSummary, ImportError> {
    let tournaments: Vec<Tournament> = read_file(dir, "tournaments.csv")?;
    let teams: Vec<Team> = read_file(dir, "teams.csv")?;
    let venues: Vec<Venue> = read_file(dir, "venues.csv")?;
    let referees: Vec<Referee> = read_file(dir, "referees.csv")?;
    let busy_slots: Vec<RefereeBusySlot> = read_file(dir, "referee_busy.csv")?;

    let summary = ImportSummary {
        tournaments: tournaments.len(),
        teams: teams.len(),
        venues: venues.len(),
        referees: referees.len(),
        busy_slots: busy_slots.len(),
    };
    for t in tournaments {
        store.insert_tournament(t)?;
    }
    for t in teams {
        store.register_team(t)?;
    }
    for v in venues {
        store.add_venue(v)?;
    }
    for r in referees {
        store.add_referee(r)?;
    }
    for s in busy_slots {
        store.add_busy_slot(s)?;
    }
    log::info!("Seeded store from {}: {:?}", dir.display(), summary);
    Ok(summary)
}
