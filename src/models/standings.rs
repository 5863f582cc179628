//! StandingsRow and the cached standings snapshot.

use crate::models::participant::ParticipantId;
use crate::models::season::SeasonId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One participant's aggregated season record. Always derivable from the fixtures.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct StandingsRow {
    pub participant_id: ParticipantId,
    /// Earned points minus penalty points; may go negative.
    pub points: i32,
    pub matches_played: u32,
    pub matches_won: u32,
    pub matches_lost: u32,
    pub matches_draw: u32,
    pub legs_won: u32,
    pub legs_lost: u32,
    pub penalty_points: u32,
    /// 1-based rank after sorting.
    pub final_position: u32,
}

impl StandingsRow {
    /// Empty row for a participant who has not played yet.
    pub fn new(participant_id: ParticipantId) -> Self {
        Self {
            participant_id,
            ..Self::default()
        }
    }

    pub fn leg_difference(&self) -> i64 {
        i64::from(self.legs_won) - i64::from(self.legs_lost)
    }
}

/// A full standings table computed from one revision of a season.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StandingsSnapshot {
    pub season_id: SeasonId,
    /// Season revision the rows were computed from.
    pub revision: u64,
    pub computed_at: DateTime<Utc>,
    pub rows: Vec<StandingsRow>,
}
