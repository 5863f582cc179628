//! Integration tests for the season store and standings snapshots.

use chrono::Utc;
use dart_league_web::{
    calculate_standings, record_result, start_season, LeagueConfig, LeagueError, LeagueStore,
    Participant, ScheduleMode, ScoringRules, Season, SeasonId, SeasonState, StandingsSnapshot,
};
use std::sync::Arc;
use std::thread;
use uuid::Uuid;

fn stored_active_season(store: &LeagueStore, n: usize) -> SeasonId {
    let participants: Vec<Participant> = (0..n).map(|i| Participant::new(format!("P{i}"))).collect();
    let season = Season::with_participants("League", participants, ScheduleMode::SingleRound);
    let id = store.insert(season).unwrap();
    store
        .update(id, |s| start_season(s, &LeagueConfig::default(), Utc::now()))
        .unwrap();
    id
}

#[test]
fn missing_season_is_reported() {
    let store = LeagueStore::new();
    let id = Uuid::new_v4();
    assert!(matches!(store.get(id), Err(LeagueError::SeasonNotFound(x)) if x == id));
    assert!(matches!(
        store.refresh_standings(id, &ScoringRules::default()),
        Err(LeagueError::SeasonNotFound(_))
    ));
}

#[test]
fn failed_update_changes_nothing() {
    let store = LeagueStore::new();
    let id = store.insert(Season::new("Empty", ScheduleMode::SingleRound)).unwrap();
    let result = store.update(id, |s| {
        s.add_participant("Alice")?;
        s.add_participant("alice")
    });
    assert!(matches!(result, Err(LeagueError::DuplicateParticipantName)));
    assert!(store.get(id).unwrap().participants.is_empty());
    assert_eq!(store.revision(id).unwrap(), 0);
}

#[test]
fn successful_update_bumps_revision() {
    let store = LeagueStore::new();
    let id = store.insert(Season::new("Empty", ScheduleMode::SingleRound)).unwrap();
    let (season, pid) = store.update(id, |s| s.add_participant("Alice")).unwrap();
    assert_eq!(season.participants[0].id, pid);
    assert_eq!(store.revision(id).unwrap(), 1);
}

#[test]
fn refresh_commits_snapshot_at_current_revision() {
    let store = LeagueStore::new();
    let id = stored_active_season(&store, 4);
    let rules = ScoringRules::default();
    let fixture = store.get(id).unwrap().fixtures().next().unwrap().id;
    store
        .update(id, |s| record_result(s, fixture, 3, 2, &rules))
        .unwrap();

    let snapshot = store.refresh_standings(id, &rules).unwrap();
    assert_eq!(snapshot.revision, store.revision(id).unwrap());
    assert_eq!(store.cached_standings(id).unwrap(), Some(snapshot.clone()));
    assert_eq!(snapshot.rows[0].points, 3);
}

#[test]
fn stale_snapshot_never_replaces_newer_one() {
    let store = LeagueStore::new();
    let id = stored_active_season(&store, 4);
    let rules = ScoringRules::default();
    let fresh = store.refresh_standings(id, &rules).unwrap();
    assert_eq!(fresh.revision, 1);

    let stale = StandingsSnapshot {
        season_id: id,
        revision: 0,
        computed_at: Utc::now(),
        rows: Vec::new(),
    };
    assert!(!store.commit_standings(stale).unwrap());
    assert_eq!(store.cached_standings(id).unwrap(), Some(fresh));
}

#[test]
fn current_standings_recomputes_after_changes() {
    let store = LeagueStore::new();
    let id = stored_active_season(&store, 2);
    let rules = ScoringRules::default();
    let before = store.current_standings(id, &rules).unwrap();
    assert!(before.rows.iter().all(|r| r.points == 0));

    let fixture = store.get(id).unwrap().fixtures().next().unwrap().id;
    store
        .update(id, |s| record_result(s, fixture, 0, 3, &rules))
        .unwrap();
    let after = store.current_standings(id, &rules).unwrap();
    assert!(after.revision > before.revision);
    assert_eq!(after.rows[0].points, 3);
    assert_eq!(store.get(id).unwrap().state, SeasonState::Completed);
}

#[test]
fn concurrent_results_end_with_a_consistent_table() {
    let store = Arc::new(LeagueStore::new());
    let id = stored_active_season(&store, 8);
    let rules = ScoringRules::default();
    let fixtures: Vec<_> = store.get(id).unwrap().fixtures().map(|f| f.id).collect();

    let handles: Vec<_> = fixtures
        .chunks(4)
        .map(|chunk| {
            let store = Arc::clone(&store);
            let chunk = chunk.to_vec();
            thread::spawn(move || {
                for fixture in chunk {
                    store
                        .update(id, |s| record_result(s, fixture, 3, 1, &rules))
                        .unwrap();
                    store.refresh_standings(id, &rules).unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let season = store.get(id).unwrap();
    let expected = calculate_standings(&season, &rules).unwrap();
    let snapshot = store.current_standings(id, &rules).unwrap();
    assert_eq!(snapshot.revision, store.revision(id).unwrap());
    assert_eq!(snapshot.rows, expected);
    let played: u32 = snapshot.rows.iter().map(|r| r.matches_played).sum();
    assert_eq!(played as usize, fixtures.len() * 2);
}

#[test]
fn out_of_range_deadline_leaves_store_usable() {
    let store = LeagueStore::new();
    let participants: Vec<Participant> = (0..4).map(|i| Participant::new(format!("P{i}"))).collect();
    let id = store
        .insert(Season::with_participants("Far", participants, ScheduleMode::SingleRound))
        .unwrap();
    let far = LeagueConfig {
        matchday_offset_days: 100_000_000,
        ..LeagueConfig::default()
    };

    let result = store.update(id, |s| start_season(s, &far, Utc::now()));
    assert!(matches!(result, Err(LeagueError::DeadlineOutOfRange { .. })));

    let season = store.get(id).unwrap();
    assert_eq!(season.state, SeasonState::Setup);
    assert!(season.matchdays.is_empty());
    assert_eq!(store.revision(id).unwrap(), 0);

    store
        .update(id, |s| start_season(s, &LeagueConfig::default(), Utc::now()))
        .unwrap();
    assert_eq!(store.get(id).unwrap().state, SeasonState::Active);
}

#[test]
fn blank_participant_name_is_rejected() {
    let store = LeagueStore::new();
    let id = store.insert(Season::new("Empty", ScheduleMode::SingleRound)).unwrap();
    let result = store.update(id, |s| s.add_participant("   "));
    assert!(matches!(result, Err(LeagueError::InvalidParticipantName)));
    assert_eq!(
        LeagueError::InvalidParticipantName.to_string(),
        "Name must not be empty"
    );
    assert!(store.get(id).unwrap().participants.is_empty());
}
