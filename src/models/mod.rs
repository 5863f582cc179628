//! Data structures for the dart league: participants, fixtures, seasons, standings.

mod fixture;
mod participant;
mod season;
mod standings;

pub use fixture::{Fixture, FixtureId, Matchday, RoundKind, ScheduleMode};
pub use participant::{Participant, ParticipantId};
pub use season::{LeagueError, Season, SeasonId, SeasonState};
pub use standings::{StandingsRow, StandingsSnapshot};
