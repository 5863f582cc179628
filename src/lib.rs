//! Dart league web app: library with models, scheduling and standings logic, and storage.

pub mod config;
pub mod csv_io;
pub mod logic;
pub mod models;
pub mod store;

pub use config::{LeagueConfig, ScoringRules};
pub use csv_io::{export_standings, import_participants};
pub use logic::{
    assign_deadlines, calculate_standings, clear_result, generate_fixtures, overdue_fixtures,
    record_result, shuffle_participants, simulate_results, start_season, OverdueFixture,
};
pub use models::{
    Fixture, FixtureId, LeagueError, Matchday, Participant, ParticipantId, RoundKind, ScheduleMode,
    Season, SeasonId, SeasonState, StandingsRow, StandingsSnapshot,
};
pub use store::LeagueStore;
