//! Matchday deadlines and overdue fixture detection.

use crate::models::{FixtureId, LeagueError, Matchday, ParticipantId, Season};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// An unplayed fixture whose matchday deadline (plus match timeout) has passed.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct OverdueFixture {
    pub matchday: u32,
    pub fixture_id: FixtureId,
    pub home: ParticipantId,
    pub away: ParticipantId,
    pub deadline: DateTime<Utc>,
}

/// Matchday `k` gets deadline `start + k * offset_days`. An offset of 0 clears deadlines.
///
/// Fails with `DeadlineOutOfRange` if any deadline falls outside the representable
/// date range; matchdays are left untouched in that case.
pub fn assign_deadlines(
    matchdays: &mut [Matchday],
    start: DateTime<Utc>,
    offset_days: u32,
) -> Result<(), LeagueError> {
    let mut deadlines = Vec::with_capacity(matchdays.len());
    for md in matchdays.iter() {
        let deadline = if offset_days == 0 {
            None
        } else {
            let days = i64::from(offset_days) * i64::from(md.number);
            let deadline = Duration::try_days(days)
                .and_then(|delta| start.checked_add_signed(delta))
                .ok_or(LeagueError::DeadlineOutOfRange { matchday: md.number })?;
            Some(deadline)
        };
        deadlines.push(deadline);
    }
    for (md, deadline) in matchdays.iter_mut().zip(deadlines) {
        md.deadline = deadline;
    }
    Ok(())
}

/// Unplayed fixtures that are past `deadline + match_timeout_minutes` at `now`, in matchday order.
/// A deadline whose grace period runs past the representable date range is never overdue.
pub fn overdue_fixtures(
    season: &Season,
    now: DateTime<Utc>,
    match_timeout_minutes: u32,
) -> Vec<OverdueFixture> {
    let grace = Duration::try_minutes(i64::from(match_timeout_minutes));
    season
        .matchdays
        .iter()
        .filter_map(|md| md.deadline.map(|deadline| (md, deadline)))
        .filter(|(_, deadline)| {
            grace
                .and_then(|grace| deadline.checked_add_signed(grace))
                .is_some_and(|cutoff| cutoff < now)
        })
        .flat_map(|(md, deadline)| {
            md.fixtures
                .iter()
                .filter(|f| !f.has_result())
                .map(move |f| OverdueFixture {
                    matchday: md.number,
                    fixture_id: f.id,
                    home: f.home,
                    away: f.away,
                    deadline,
                })
        })
        .collect()
}
