//! In-memory season store with cached standings snapshots.
//!
//! Every committed mutation bumps the season's revision. Standings are always
//! recomputed in full from a cloned season and swapped in under one write lock;
//! a snapshot computed from an older revision never replaces a newer one.

use crate::config::ScoringRules;
use crate::logic::calculate_standings;
use crate::models::{LeagueError, Season, SeasonId, StandingsSnapshot};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::RwLock;

struct SeasonEntry {
    season: Season,
    revision: u64,
    standings: Option<StandingsSnapshot>,
}

/// Seasons keyed by id. Share it behind `Data`/`Arc`; all methods take `&self`.
#[derive(Default)]
pub struct LeagueStore {
    seasons: RwLock<HashMap<SeasonId, SeasonEntry>>,
}

impl LeagueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert (or replace) a season at revision 0 with no cached standings.
    pub fn insert(&self, season: Season) -> Result<SeasonId, LeagueError> {
        let id = season.id;
        let mut g = self.seasons.write().map_err(|_| LeagueError::StorageUnavailable)?;
        g.insert(
            id,
            SeasonEntry {
                season,
                revision: 0,
                standings: None,
            },
        );
        Ok(id)
    }

    /// Clone of the current season.
    pub fn get(&self, id: SeasonId) -> Result<Season, LeagueError> {
        let g = self.seasons.read().map_err(|_| LeagueError::StorageUnavailable)?;
        g.get(&id)
            .map(|entry| entry.season.clone())
            .ok_or(LeagueError::SeasonNotFound(id))
    }

    /// Clones of every stored season.
    pub fn seasons(&self) -> Result<Vec<Season>, LeagueError> {
        let g = self.seasons.read().map_err(|_| LeagueError::StorageUnavailable)?;
        Ok(g.values().map(|entry| entry.season.clone()).collect())
    }

    pub fn revision(&self, id: SeasonId) -> Result<u64, LeagueError> {
        let g = self.seasons.read().map_err(|_| LeagueError::StorageUnavailable)?;
        g.get(&id)
            .map(|entry| entry.revision)
            .ok_or(LeagueError::SeasonNotFound(id))
    }

    /// Apply `f` to a working copy of the season. On success the copy replaces the
    /// stored season and the revision is bumped; on error nothing changes.
    pub fn update<T, F>(&self, id: SeasonId, f: F) -> Result<(Season, T), LeagueError>
    where
        F: FnOnce(&mut Season) -> Result<T, LeagueError>,
    {
        let mut g = self.seasons.write().map_err(|_| LeagueError::StorageUnavailable)?;
        let entry = g.get_mut(&id).ok_or(LeagueError::SeasonNotFound(id))?;
        let mut working = entry.season.clone();
        let value = f(&mut working)?;
        entry.season = working;
        entry.revision += 1;
        Ok((entry.season.clone(), value))
    }

    /// Recompute the full standings table from the current season and commit it.
    /// Returns whichever snapshot is stored afterwards.
    pub fn refresh_standings(&self, id: SeasonId, rules: &ScoringRules) -> Result<StandingsSnapshot, LeagueError> {
        let (season, revision) = {
            let g = self.seasons.read().map_err(|_| LeagueError::StorageUnavailable)?;
            let entry = g.get(&id).ok_or(LeagueError::SeasonNotFound(id))?;
            (entry.season.clone(), entry.revision)
        };
        let rows = calculate_standings(&season, rules)?;
        let snapshot = StandingsSnapshot {
            season_id: id,
            revision,
            computed_at: Utc::now(),
            rows,
        };
        self.commit_standings(snapshot.clone())?;
        Ok(self.cached_standings(id)?.unwrap_or(snapshot))
    }

    /// Store a snapshot unless the stored one was computed from a newer revision.
    /// Returns whether the snapshot was written.
    pub fn commit_standings(&self, snapshot: StandingsSnapshot) -> Result<bool, LeagueError> {
        let mut g = self.seasons.write().map_err(|_| LeagueError::StorageUnavailable)?;
        let entry = g
            .get_mut(&snapshot.season_id)
            .ok_or(LeagueError::SeasonNotFound(snapshot.season_id))?;
        if let Some(current) = &entry.standings {
            if current.revision > snapshot.revision {
                log::warn!(
                    "Season {}: discarding standings from revision {} (have {})",
                    snapshot.season_id,
                    snapshot.revision,
                    current.revision
                );
                return Ok(false);
            }
        }
        log::debug!(
            "Season {}: standings committed at revision {}",
            snapshot.season_id,
            snapshot.revision
        );
        entry.standings = Some(snapshot);
        Ok(true)
    }

    /// Last committed snapshot, whatever its revision.
    pub fn cached_standings(&self, id: SeasonId) -> Result<Option<StandingsSnapshot>, LeagueError> {
        let g = self.seasons.read().map_err(|_| LeagueError::StorageUnavailable)?;
        g.get(&id)
            .map(|entry| entry.standings.clone())
            .ok_or(LeagueError::SeasonNotFound(id))
    }

    /// Cached snapshot if it matches the current revision, otherwise a fresh one.
    pub fn current_standings(&self, id: SeasonId, rules: &ScoringRules) -> Result<StandingsSnapshot, LeagueError> {
        let revision = self.revision(id)?;
        match self.cached_standings(id)? {
            Some(snapshot) if snapshot.revision == revision => Ok(snapshot),
            _ => self.refresh_standings(id, rules),
        }
    }
}
