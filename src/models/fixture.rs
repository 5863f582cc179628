//! Fixture, Matchday, and the round/mode enums for a season schedule.

use crate::models::participant::ParticipantId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a fixture.
pub type FixtureId = Uuid;

/// How many times every pair meets in a season.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleMode {
    /// Every pair meets once.
    #[default]
    SingleRound,
    /// Every pair meets twice, home and away reversed in the return round.
    DoubleRound,
}

/// Which half of the schedule a matchday belongs to.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundKind {
    First,
    Return,
}

/// A single scheduled pairing. Result fields stay `None` until the match is played.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    pub id: FixtureId,
    pub home: ParticipantId,
    pub away: ParticipantId,
    pub home_legs_won: Option<u32>,
    pub away_legs_won: Option<u32>,
    /// None for an unplayed fixture or a drawn one.
    pub winner: Option<ParticipantId>,
    pub home_points: Option<u32>,
    pub away_points: Option<u32>,
}

impl Fixture {
    /// Build an unplayed fixture. The id is derived from the pairing and matchday
    /// number, so regenerating the same schedule yields the same ids.
    pub fn new(home: ParticipantId, away: ParticipantId, matchday: u32) -> Self {
        let name = format!("{matchday}:{away}");
        Self {
            id: Uuid::new_v5(&home, name.as_bytes()),
            home,
            away,
            home_legs_won: None,
            away_legs_won: None,
            winner: None,
            home_points: None,
            away_points: None,
        }
    }

    /// A result counts once both legs fields are recorded.
    pub fn has_result(&self) -> bool {
        self.home_legs_won.is_some() && self.away_legs_won.is_some()
    }

    pub fn involves(&self, id: ParticipantId) -> bool {
        self.home == id || self.away == id
    }

    /// Reset all result fields to the unplayed state.
    pub fn clear_result(&mut self) {
        self.home_legs_won = None;
        self.away_legs_won = None;
        self.winner = None;
        self.home_points = None;
        self.away_points = None;
    }
}

/// One round of the season's schedule.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Matchday {
    /// 1-based, sequential across both rounds.
    pub number: u32,
    pub round: RoundKind,
    pub deadline: Option<DateTime<Utc>>,
    pub fixtures: Vec<Fixture>,
}

impl Matchday {
    pub fn new(number: u32, round: RoundKind, fixtures: Vec<Fixture>) -> Self {
        Self {
            number,
            round,
            deadline: None,
            fixtures,
        }
    }
}
