//! Integration tests for the standings calculator.

use dart_league_web::{
    calculate_standings, record_result, Fixture, LeagueError, Matchday, Participant, ParticipantId,
    RoundKind, ScheduleMode, ScoringRules, Season, SeasonState, StandingsRow,
};
use uuid::Uuid;

fn season_of(names: &[&str]) -> (Season, Vec<ParticipantId>) {
    let participants: Vec<Participant> = names.iter().map(|n| Participant::new(*n)).collect();
    let ids = participants.iter().map(|p| p.id).collect();
    (
        Season::with_participants("Autumn", participants, ScheduleMode::SingleRound),
        ids,
    )
}

/// A fixture with its result fields filled in directly, bypassing format checks.
fn played(home: ParticipantId, away: ParticipantId, home_legs: u32, away_legs: u32, winner: Option<ParticipantId>) -> Fixture {
    let mut f = Fixture::new(home, away, 1);
    f.home_legs_won = Some(home_legs);
    f.away_legs_won = Some(away_legs);
    f.winner = winner;
    f
}

fn row(rows: &[StandingsRow], id: ParticipantId) -> &StandingsRow {
    rows.iter().find(|r| r.participant_id == id).unwrap()
}

#[test]
fn wins_points_and_leg_difference_decide_the_table() {
    let (mut season, p) = season_of(&["A", "B", "C"]);
    let (a, b, c) = (p[0], p[1], p[2]);
    let ab = Fixture::new(a, b, 1);
    let bc = Fixture::new(b, c, 2);
    let ca = Fixture::new(c, a, 3);
    let (ab_id, bc_id) = (ab.id, bc.id);
    season.matchdays = vec![
        Matchday::new(1, RoundKind::First, vec![ab]),
        Matchday::new(2, RoundKind::First, vec![bc]),
        Matchday::new(3, RoundKind::First, vec![ca]),
    ];
    season.state = SeasonState::Active;
    let rules = ScoringRules::default();
    record_result(&mut season, ab_id, 3, 1, &rules).unwrap();
    record_result(&mut season, bc_id, 3, 0, &rules).unwrap();

    let rows = calculate_standings(&season, &rules).unwrap();

    let ra = row(&rows, a);
    assert_eq!((ra.matches_played, ra.matches_won, ra.matches_lost, ra.points), (1, 1, 0, 3));
    assert_eq!((ra.legs_won, ra.legs_lost), (3, 1));
    let rb = row(&rows, b);
    assert_eq!((rb.matches_played, rb.matches_won, rb.matches_lost, rb.points), (2, 1, 1, 3));
    assert_eq!((rb.legs_won, rb.legs_lost), (4, 3));
    let rc = row(&rows, c);
    assert_eq!((rc.matches_played, rc.matches_won, rc.matches_lost, rc.points), (1, 0, 1, 0));

    assert_eq!(ra.leg_difference(), 2);
    assert_eq!(rb.leg_difference(), 1);
    let order: Vec<_> = rows.iter().map(|r| r.participant_id).collect();
    assert_eq!(order, vec![a, b, c]);
    let positions: Vec<_> = rows.iter().map(|r| r.final_position).collect();
    assert_eq!(positions, vec![1, 2, 3]);
    assert!(rows.iter().all(|r| r.matches_draw == 0));
}

#[test]
fn recalculation_is_idempotent() {
    let (mut season, p) = season_of(&["A", "B", "C", "D"]);
    season.matchdays = vec![Matchday::new(
        1,
        RoundKind::First,
        vec![played(p[0], p[1], 3, 2, Some(p[0])), played(p[2], p[3], 1, 3, Some(p[3]))],
    )];
    let rules = ScoringRules::default();
    let first = calculate_standings(&season, &rules).unwrap();
    let second = calculate_standings(&season, &rules).unwrap();
    assert_eq!(first, second);
    assert_eq!(row(&second, p[0]).matches_played, 1);
}

#[test]
fn unplayed_season_ranks_in_roster_order() {
    let (season, p) = season_of(&["Zed", "Amy", "Kim"]);
    let rows = calculate_standings(&season, &ScoringRules::default()).unwrap();
    let order: Vec<_> = rows.iter().map(|r| r.participant_id).collect();
    assert_eq!(order, p);
    assert!(rows.iter().all(|r| r.points == 0 && r.matches_played == 0));
}

#[test]
fn legs_won_breaks_ties_on_points_and_difference() {
    let (mut season, p) = season_of(&["B", "A", "D", "C"]);
    let (b, a, d, c) = (p[0], p[1], p[2], p[3]);
    season.matchdays = vec![Matchday::new(
        1,
        RoundKind::First,
        vec![played(a, c, 4, 3, Some(a)), played(b, d, 3, 2, Some(b))],
    )];
    let rows = calculate_standings(&season, &ScoringRules::default()).unwrap();
    let order: Vec<_> = rows.iter().map(|r| r.participant_id).collect();
    assert_eq!(order, vec![a, b, c, d]);
}

#[test]
fn penalty_points_are_deducted() {
    let (mut season, p) = season_of(&["A", "B"]);
    season.matchdays = vec![Matchday::new(
        1,
        RoundKind::First,
        vec![played(p[0], p[1], 3, 0, Some(p[0]))],
    )];
    season.set_penalty(p[0], 4).unwrap();
    let rows = calculate_standings(&season, &ScoringRules::default()).unwrap();
    let ra = row(&rows, p[0]);
    assert_eq!(ra.points, -1);
    assert_eq!(ra.penalty_points, 4);
    assert_eq!(rows[0].participant_id, p[1]);
    assert_eq!(ra.final_position, 2);
}

#[test]
fn draws_award_draw_points_to_both_sides() {
    let (mut season, p) = season_of(&["A", "B"]);
    season.matchdays = vec![Matchday::new(1, RoundKind::First, vec![played(p[0], p[1], 2, 2, None)])];
    let rules = ScoringRules {
        allow_draws: true,
        ..ScoringRules::default()
    };
    let rows = calculate_standings(&season, &rules).unwrap();
    for r in &rows {
        assert_eq!((r.matches_played, r.matches_draw, r.points), (1, 1, 1));
        assert_eq!((r.matches_won, r.matches_lost), (0, 0));
    }
}

#[test]
fn unplayed_fixtures_are_ignored() {
    let (mut season, p) = season_of(&["A", "B"]);
    let mut half = Fixture::new(p[0], p[1], 1);
    half.home_legs_won = Some(3);
    season.matchdays = vec![Matchday::new(1, RoundKind::First, vec![half])];
    let rows = calculate_standings(&season, &ScoringRules::default()).unwrap();
    assert!(rows.iter().all(|r| r.matches_played == 0));
}

#[test]
fn winner_outside_the_fixture_is_corrupt() {
    let (mut season, p) = season_of(&["A", "B", "C"]);
    let stranger = Uuid::new_v4();
    season.matchdays = vec![Matchday::new(
        1,
        RoundKind::First,
        vec![played(p[0], p[1], 3, 1, Some(stranger))],
    )];
    let result = calculate_standings(&season, &ScoringRules::default());
    assert!(matches!(result, Err(LeagueError::CorruptFixtureResult { .. })));
}

#[test]
fn winner_with_fewer_legs_is_corrupt() {
    let (mut season, p) = season_of(&["A", "B"]);
    season.matchdays = vec![Matchday::new(
        1,
        RoundKind::First,
        vec![played(p[0], p[1], 1, 3, Some(p[0]))],
    )];
    assert!(matches!(
        calculate_standings(&season, &ScoringRules::default()),
        Err(LeagueError::CorruptFixtureResult { .. })
    ));
}

#[test]
fn missing_winner_on_unequal_legs_is_corrupt() {
    let (mut season, p) = season_of(&["A", "B"]);
    season.matchdays = vec![Matchday::new(1, RoundKind::First, vec![played(p[0], p[1], 3, 1, None)])];
    assert!(matches!(
        calculate_standings(&season, &ScoringRules::default()),
        Err(LeagueError::CorruptFixtureResult { .. })
    ));
}

#[test]
fn fixture_against_unknown_participant_is_corrupt() {
    let (mut season, p) = season_of(&["A", "B"]);
    let ghost = Uuid::new_v4();
    season.matchdays = vec![Matchday::new(1, RoundKind::First, vec![played(p[0], ghost, 3, 0, Some(p[0]))])];
    assert!(matches!(
        calculate_standings(&season, &ScoringRules::default()),
        Err(LeagueError::CorruptFixtureResult { .. })
    ));
}

#[test]
fn huge_point_values_saturate_instead_of_overflowing() {
    let (mut season, p) = season_of(&["A", "B", "C"]);
    let (a, b, c) = (p[0], p[1], p[2]);
    season.matchdays = vec![
        Matchday::new(1, RoundKind::First, vec![played(a, b, 3, 0, Some(a))]),
        Matchday::new(2, RoundKind::First, vec![played(c, a, 0, 3, Some(a))]),
    ];
    season.set_penalty(b, u32::MAX).unwrap();
    let rules = ScoringRules {
        win_points: u32::MAX,
        ..ScoringRules::default()
    };
    let rows = calculate_standings(&season, &rules).unwrap();
    assert_eq!(row(&rows, a).points, i32::MAX);
    assert_eq!(row(&rows, b).points, -i32::MAX);
    assert_eq!(rows[0].participant_id, a);
}
