//! League business logic: schedule generation, deadlines, results, standings.

mod deadlines;
mod results;
mod schedule;
mod standings;

pub use deadlines::{assign_deadlines, overdue_fixtures, OverdueFixture};
pub use results::{clear_result, record_result, simulate_results};
pub use schedule::{generate_fixtures, shuffle_participants, start_season};
pub use standings::calculate_standings;
