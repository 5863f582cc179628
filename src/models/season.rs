//! Season, SeasonState, and the league error type.

use crate::models::fixture::{Fixture, FixtureId, Matchday, ScheduleMode};
use crate::models::participant::{Participant, ParticipantId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Errors that can occur during league operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LeagueError {
    /// Participant list cannot be scheduled (too few, or duplicate ids).
    InvalidScheduleInput(String),
    /// A recorded result contradicts its own fixture.
    CorruptFixtureResult { fixture_id: FixtureId, reason: String },
    /// Season is not in a state that allows this action.
    InvalidState,
    /// Participant not on the season roster.
    ParticipantNotFound(ParticipantId),
    /// Fixture not in any matchday of the season.
    FixtureNotFound(FixtureId),
    /// No season with this id in the store.
    SeasonNotFound(SeasonId),
    /// A participant with this name already exists (names are unique, case-insensitive).
    DuplicateParticipantName,
    /// Participant or season name is empty after trimming.
    InvalidParticipantName,
    /// A matchday deadline falls outside the representable date range.
    DeadlineOutOfRange { matchday: u32 },
    /// Submitted legs do not form a valid result for the league format.
    InvalidResult(String),
    /// The season store lock was poisoned.
    StorageUnavailable,
    /// A CSV file could not be read or written.
    Csv(String),
}

impl std::fmt::Display for LeagueError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeagueError::InvalidScheduleInput(reason) => write!(f, "Cannot build schedule: {}", reason),
            LeagueError::CorruptFixtureResult { fixture_id, reason } => {
                write!(f, "Fixture {} has a corrupt result: {}", fixture_id, reason)
            }
            LeagueError::InvalidState => write!(f, "Invalid state for this action"),
            LeagueError::ParticipantNotFound(_) => write!(f, "Participant not found"),
            LeagueError::FixtureNotFound(_) => write!(f, "Fixture not found"),
            LeagueError::SeasonNotFound(_) => write!(f, "Season not found"),
            LeagueError::DuplicateParticipantName => {
                write!(f, "A participant with this name already exists")
            }
            LeagueError::InvalidParticipantName => write!(f, "Name must not be empty"),
            LeagueError::DeadlineOutOfRange { matchday } => {
                write!(f, "Deadline for matchday {} is out of range", matchday)
            }
            LeagueError::InvalidResult(reason) => write!(f, "Invalid result: {}", reason),
            LeagueError::StorageUnavailable => write!(f, "Season storage unavailable"),
            LeagueError::Csv(reason) => write!(f, "CSV error: {}", reason),
        }
    }
}

impl std::error::Error for LeagueError {}

/// Unique identifier for a season.
pub type SeasonId = Uuid;

/// Current phase of the season.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeasonState {
    /// Entering participants and choosing the mode; no schedule yet.
    #[default]
    Setup,
    /// Schedule generated; results being recorded.
    Active,
    /// Every fixture has a result.
    Completed,
}

/// A league season: roster, schedule, and penalties.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Season {
    pub id: SeasonId,
    pub name: String,
    /// Roster in entry order; this order is the last-resort standings tie-break.
    pub participants: Vec<Participant>,
    pub matchdays: Vec<Matchday>,
    pub mode: ScheduleMode,
    pub state: SeasonState,
    /// Penalty points deducted from a participant's standings total.
    pub penalties: HashMap<ParticipantId, u32>,
}

impl Season {
    /// Create a new season in Setup state with no participants.
    pub fn new(name: impl Into<String>, mode: ScheduleMode) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            participants: Vec::new(),
            matchdays: Vec::new(),
            mode,
            state: SeasonState::Setup,
            penalties: HashMap::new(),
        }
    }

    /// Create a season with an initial roster. Still in Setup until started.
    pub fn with_participants(name: impl Into<String>, participants: Vec<Participant>, mode: ScheduleMode) -> Self {
        Self {
            participants,
            ..Self::new(name, mode)
        }
    }

    pub fn participant(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    pub fn participant_ids(&self) -> Vec<ParticipantId> {
        self.participants.iter().map(|p| p.id).collect()
    }

    /// All fixtures in matchday order.
    pub fn fixtures(&self) -> impl Iterator<Item = &Fixture> {
        self.matchdays.iter().flat_map(|md| md.fixtures.iter())
    }

    pub fn fixture_mut(&mut self, id: FixtureId) -> Option<&mut Fixture> {
        self.matchdays
            .iter_mut()
            .flat_map(|md| md.fixtures.iter_mut())
            .find(|f| f.id == id)
    }

    /// True once a schedule exists and every fixture has a result.
    pub fn all_fixtures_played(&self) -> bool {
        !self.matchdays.is_empty() && self.fixtures().all(Fixture::has_result)
    }

    /// Add a participant (only valid in Setup). Names must be unique (case-insensitive).
    pub fn add_participant(&mut self, name: impl Into<String>) -> Result<ParticipantId, LeagueError> {
        if self.state != SeasonState::Setup {
            return Err(LeagueError::InvalidState);
        }
        let name = name.into();
        let name_trimmed = name.trim();
        if name_trimmed.is_empty() {
            return Err(LeagueError::InvalidParticipantName);
        }
        let is_duplicate = self
            .participants
            .iter()
            .any(|p| p.name.eq_ignore_ascii_case(name_trimmed));
        if is_duplicate {
            return Err(LeagueError::DuplicateParticipantName);
        }
        let participant = Participant::new(name_trimmed);
        let id = participant.id;
        self.participants.push(participant);
        Ok(id)
    }

    /// Remove a participant by id (only valid in Setup).
    pub fn remove_participant(&mut self, participant_id: ParticipantId) -> Result<(), LeagueError> {
        if self.state != SeasonState::Setup {
            return Err(LeagueError::InvalidState);
        }
        let idx = self
            .participants
            .iter()
            .position(|p| p.id == participant_id)
            .ok_or(LeagueError::ParticipantNotFound(participant_id))?;
        self.participants.remove(idx);
        self.penalties.remove(&participant_id);
        Ok(())
    }

    /// Set single or double round (only valid in Setup).
    pub fn set_mode(&mut self, mode: ScheduleMode) -> Result<(), LeagueError> {
        if self.state != SeasonState::Setup {
            return Err(LeagueError::InvalidState);
        }
        self.mode = mode;
        Ok(())
    }

    /// Set a participant's penalty points. Zero removes the penalty.
    pub fn set_penalty(&mut self, participant_id: ParticipantId, points: u32) -> Result<(), LeagueError> {
        if self.participant(participant_id).is_none() {
            return Err(LeagueError::ParticipantNotFound(participant_id));
        }
        if points == 0 {
            self.penalties.remove(&participant_id);
        } else {
            self.penalties.insert(participant_id, points);
        }
        Ok(())
    }

    pub fn penalty_for(&self, participant_id: ParticipantId) -> u32 {
        self.penalties.get(&participant_id).copied().unwrap_or(0)
    }
}
