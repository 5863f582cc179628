//! Standings calculation: replay every played fixture into a ranked table.

use crate::config::ScoringRules;
use crate::models::{Fixture, LeagueError, ParticipantId, Season, StandingsRow};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Build the full standings table for a season, one row per roster participant.
///
/// Recomputes from zero on every call, so it is safe to run after each result.
/// Ranking order: points, leg difference, legs won, then roster order.
///
/// Fails with `CorruptFixtureResult` when a played fixture's winner is neither side,
/// the winner does not hold more legs, a winnerless result has unequal legs, or a
/// side is missing from the roster.
pub fn calculate_standings(season: &Season, rules: &ScoringRules) -> Result<Vec<StandingsRow>, LeagueError> {
    let mut rows: Vec<StandingsRow> = season
        .participants
        .iter()
        .map(|p| StandingsRow {
            penalty_points: season.penalty_for(p.id),
            ..StandingsRow::new(p.id)
        })
        .collect();
    let index: HashMap<ParticipantId, usize> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| (row.participant_id, i))
        .collect();

    for fixture in season.fixtures().filter(|f| f.has_result()) {
        apply_fixture(&mut rows, &index, fixture, rules)?;
    }

    for row in &mut rows {
        row.points = row.points.saturating_sub(to_points(row.penalty_points));
    }

    // sort_by is stable: full ties keep roster order.
    rows.sort_by(compare_rows);
    for (i, row) in rows.iter_mut().enumerate() {
        row.final_position = u32::try_from(i + 1).unwrap_or(u32::MAX);
    }

    log::debug!(
        "Season {}: standings computed for {} participants",
        season.id,
        rows.len()
    );
    Ok(rows)
}

fn compare_rows(a: &StandingsRow, b: &StandingsRow) -> Ordering {
    b.points
        .cmp(&a.points)
        .then_with(|| b.leg_difference().cmp(&a.leg_difference()))
        .then_with(|| b.legs_won.cmp(&a.legs_won))
}

fn to_points(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

/// Add one played fixture to both participants' rows. Validates before touching any row.
fn apply_fixture(
    rows: &mut [StandingsRow],
    index: &HashMap<ParticipantId, usize>,
    fixture: &Fixture,
    rules: &ScoringRules,
) -> Result<(), LeagueError> {
    let (Some(home_legs), Some(away_legs)) = (fixture.home_legs_won, fixture.away_legs_won) else {
        return Ok(());
    };
    let corrupt = |reason: &str| LeagueError::CorruptFixtureResult {
        fixture_id: fixture.id,
        reason: reason.to_string(),
    };

    let home = *index
        .get(&fixture.home)
        .ok_or_else(|| corrupt("home participant is not on the roster"))?;
    let away = *index
        .get(&fixture.away)
        .ok_or_else(|| corrupt("away participant is not on the roster"))?;
    if home == away {
        return Err(corrupt("participant paired against itself"));
    }

    let (home_points, away_points) = match fixture.winner {
        Some(w) if w == fixture.home => {
            if home_legs <= away_legs {
                return Err(corrupt("recorded winner does not hold more legs"));
            }
            rows[home].matches_won += 1;
            rows[away].matches_lost += 1;
            (rules.win_points, rules.loss_points)
        }
        Some(w) if w == fixture.away => {
            if away_legs <= home_legs {
                return Err(corrupt("recorded winner does not hold more legs"));
            }
            rows[away].matches_won += 1;
            rows[home].matches_lost += 1;
            (rules.loss_points, rules.win_points)
        }
        Some(_) => return Err(corrupt("recorded winner is neither home nor away")),
        None if home_legs == away_legs => {
            rows[home].matches_draw += 1;
            rows[away].matches_draw += 1;
            (rules.draw_points, rules.draw_points)
        }
        None => return Err(corrupt("no winner recorded for unequal legs")),
    };

    let home_row = &mut rows[home];
    home_row.matches_played += 1;
    home_row.points = home_row.points.saturating_add(to_points(home_points));
    home_row.legs_won += home_legs;
    home_row.legs_lost += away_legs;

    let away_row = &mut rows[away];
    away_row.matches_played += 1;
    away_row.points = away_row.points.saturating_add(to_points(away_points));
    away_row.legs_won += away_legs;
    away_row.legs_lost += home_legs;
    Ok(())
}
