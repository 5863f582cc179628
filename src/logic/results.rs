//! Recording, clearing, and simulating fixture results.

use crate::config::ScoringRules;
use crate::models::{FixtureId, LeagueError, Season, SeasonState};
use rand::Rng;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Outcome {
    HomeWin,
    AwayWin,
    Draw,
}

/// Check that the legs form a finished match under the league format.
fn outcome_from_legs(home_legs: u32, away_legs: u32, rules: &ScoringRules) -> Result<Outcome, LeagueError> {
    if home_legs == away_legs {
        if !rules.allow_draws {
            return Err(LeagueError::InvalidResult("draws are not allowed in this league".to_string()));
        }
        if home_legs >= rules.legs_to_win {
            return Err(LeagueError::InvalidResult(format!(
                "a draw must stay below {} legs each",
                rules.legs_to_win
            )));
        }
        return Ok(Outcome::Draw);
    }
    let winning_legs = home_legs.max(away_legs);
    if winning_legs != rules.legs_to_win {
        return Err(LeagueError::InvalidResult(format!(
            "winner must take exactly {} legs, got {}-{}",
            rules.legs_to_win, home_legs, away_legs
        )));
    }
    Ok(if home_legs > away_legs {
        Outcome::HomeWin
    } else {
        Outcome::AwayWin
    })
}

/// Record (or correct) the result of one fixture: legs, winner, and points awarded.
///
/// Season must be Active or Completed. Moves the season to Completed once every
/// fixture has a result.
pub fn record_result(
    season: &mut Season,
    fixture_id: FixtureId,
    home_legs: u32,
    away_legs: u32,
    rules: &ScoringRules,
) -> Result<(), LeagueError> {
    if season.state == SeasonState::Setup {
        return Err(LeagueError::InvalidState);
    }
    let outcome = outcome_from_legs(home_legs, away_legs, rules)?;
    let fixture = season
        .fixture_mut(fixture_id)
        .ok_or(LeagueError::FixtureNotFound(fixture_id))?;

    let (winner, home_points, away_points) = match outcome {
        Outcome::HomeWin => (Some(fixture.home), rules.win_points, rules.loss_points),
        Outcome::AwayWin => (Some(fixture.away), rules.loss_points, rules.win_points),
        Outcome::Draw => (None, rules.draw_points, rules.draw_points),
    };
    fixture.home_legs_won = Some(home_legs);
    fixture.away_legs_won = Some(away_legs);
    fixture.winner = winner;
    fixture.home_points = Some(home_points);
    fixture.away_points = Some(away_points);
    log::info!(
        "Season {}: fixture {} recorded {}-{}",
        season.id,
        fixture_id,
        home_legs,
        away_legs
    );

    if season.all_fixtures_played() {
        season.state = SeasonState::Completed;
        log::info!("Season {} completed", season.id);
    }
    Ok(())
}

/// Reset a fixture to unplayed. A Completed season becomes Active again.
pub fn clear_result(season: &mut Season, fixture_id: FixtureId) -> Result<(), LeagueError> {
    if season.state == SeasonState::Setup {
        return Err(LeagueError::InvalidState);
    }
    season
        .fixture_mut(fixture_id)
        .ok_or(LeagueError::FixtureNotFound(fixture_id))?
        .clear_result();
    season.state = SeasonState::Active;
    Ok(())
}

/// Fill every unplayed fixture with a random best-of-N result. Never produces draws.
/// Returns how many fixtures were filled.
pub fn simulate_results<R: Rng + ?Sized>(
    season: &mut Season,
    rules: &ScoringRules,
    rng: &mut R,
) -> Result<usize, LeagueError> {
    if season.state != SeasonState::Active {
        return Err(LeagueError::InvalidState);
    }
    if rules.legs_to_win == 0 {
        return Err(LeagueError::InvalidResult("legs to win must be at least 1".to_string()));
    }
    let unplayed: Vec<FixtureId> = season
        .fixtures()
        .filter(|f| !f.has_result())
        .map(|f| f.id)
        .collect();
    for &fixture_id in &unplayed {
        let loser_legs = rng.gen_range(0..rules.legs_to_win);
        let (home_legs, away_legs) = if rng.gen_bool(0.5) {
            (rules.legs_to_win, loser_legs)
        } else {
            (loser_legs, rules.legs_to_win)
        };
        record_result(season, fixture_id, home_legs, away_legs, rules)?;
    }
    Ok(unplayed.len())
}
