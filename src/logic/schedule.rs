//! Fixture generation: round-robin pairing across matchdays (circle method).

use crate::config::LeagueConfig;
use crate::logic::deadlines::assign_deadlines;
use crate::models::{
    Fixture, LeagueError, Matchday, ParticipantId, RoundKind, ScheduleMode, Season, SeasonState,
};
use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

/// Generate the full matchday schedule for the given participants.
///
/// 1. Pad an odd roster with one bye slot so the slot count N is even.
/// 2. Keep the first slot fixed and rotate the other N-1 slots one step per round.
/// 3. Pair slots symmetrically around the fixed one; pairings with the bye are dropped.
/// 4. The fixed slot alternates home/away every round; other pairs put the left slot at home.
/// 5. DoubleRound appends the same N-1 rounds again with home/away swapped.
///
/// Output depends only on input order and mode. Shuffle beforehand for a random draw.
pub fn generate_fixtures(
    participants: &[ParticipantId],
    mode: ScheduleMode,
) -> Result<Vec<Matchday>, LeagueError> {
    if participants.len() < 2 {
        return Err(LeagueError::InvalidScheduleInput(format!(
            "need at least 2 participants, got {}",
            participants.len()
        )));
    }
    let mut seen = HashSet::with_capacity(participants.len());
    for id in participants {
        if !seen.insert(*id) {
            return Err(LeagueError::InvalidScheduleInput(format!(
                "participant {} listed more than once",
                id
            )));
        }
    }

    let mut slots: Vec<Option<ParticipantId>> = participants.iter().copied().map(Some).collect();
    if slots.len() % 2 == 1 {
        slots.push(None);
    }
    let n = slots.len();
    let rounds = n - 1;
    let anchor = slots[0];
    let mut ring: Vec<Option<ParticipantId>> = slots[1..].to_vec();

    let mut first_leg: Vec<Vec<(ParticipantId, ParticipantId)>> = Vec::with_capacity(rounds);
    for round in 0..rounds {
        let mut pairings = Vec::with_capacity(n / 2);
        let opponent = ring[n - 2];
        if round % 2 == 0 {
            push_pairing(&mut pairings, anchor, opponent);
        } else {
            push_pairing(&mut pairings, opponent, anchor);
        }
        for i in 0..(n / 2 - 1) {
            push_pairing(&mut pairings, ring[i], ring[n - 3 - i]);
        }
        first_leg.push(pairings);
        ring.rotate_right(1);
    }

    let mut matchdays = Vec::with_capacity(match mode {
        ScheduleMode::SingleRound => rounds,
        ScheduleMode::DoubleRound => rounds * 2,
    });
    let mut number = 0u32;
    for pairings in &first_leg {
        number += 1;
        let fixtures = pairings
            .iter()
            .map(|&(home, away)| Fixture::new(home, away, number))
            .collect();
        matchdays.push(Matchday::new(number, RoundKind::First, fixtures));
    }
    if mode == ScheduleMode::DoubleRound {
        for pairings in &first_leg {
            number += 1;
            let fixtures = pairings
                .iter()
                .map(|&(home, away)| Fixture::new(away, home, number))
                .collect();
            matchdays.push(Matchday::new(number, RoundKind::Return, fixtures));
        }
    }

    log::debug!(
        "Generated {} matchdays for {} participants ({:?})",
        matchdays.len(),
        participants.len(),
        mode
    );
    Ok(matchdays)
}

/// Only real pairings become fixtures; a pairing with the bye slot is skipped.
fn push_pairing(
    pairings: &mut Vec<(ParticipantId, ParticipantId)>,
    home: Option<ParticipantId>,
    away: Option<ParticipantId>,
) {
    if let (Some(home), Some(away)) = (home, away) {
        pairings.push((home, away));
    }
}

/// Randomize the roster order before the schedule is drawn (Setup only).
/// The new order also becomes the last-resort standings tie-break.
pub fn shuffle_participants<R: Rng + ?Sized>(season: &mut Season, rng: &mut R) -> Result<(), LeagueError> {
    if season.state != SeasonState::Setup {
        return Err(LeagueError::InvalidState);
    }
    season.participants.shuffle(rng);
    Ok(())
}

/// Start the season: generate the schedule for the current roster, assign matchday
/// deadlines counted from `start`, and move Setup -> Active.
pub fn start_season(
    season: &mut Season,
    config: &LeagueConfig,
    start: DateTime<Utc>,
) -> Result<(), LeagueError> {
    if season.state != SeasonState::Setup {
        return Err(LeagueError::InvalidState);
    }
    let mut matchdays = generate_fixtures(&season.participant_ids(), season.mode)?;
    assign_deadlines(&mut matchdays, start, config.matchday_offset_days)?;
    season.matchdays = matchdays;
    season.state = SeasonState::Active;
    log::info!(
        "Season {} started: {} participants, {} matchdays",
        season.id,
        season.participants.len(),
        season.matchdays.len()
    );
    Ok(())
}
