//! Single binary web server: JSON API for seasons, fixtures, results, and standings.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT, and the
//! league settings read by `LeagueConfig::from_env`.

use actix_web::{
    delete, get, post, put,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use chrono::{DateTime, Utc};
use dart_league_web::{
    clear_result, export_standings, import_participants, overdue_fixtures, record_result,
    shuffle_participants, simulate_results, start_season, FixtureId, LeagueConfig, LeagueError,
    LeagueStore, ParticipantId, ScheduleMode, Season, SeasonId,
};
use serde::Deserialize;
use std::time::Duration;

type AppState = Data<LeagueStore>;
type AppConfig = Data<LeagueConfig>;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateSeasonBody {
    name: String,
    #[serde(default)]
    mode: ScheduleMode,
}

#[derive(Deserialize)]
struct AddParticipantBody {
    name: String,
}

#[derive(Deserialize)]
struct SetModeBody {
    mode: ScheduleMode,
}

#[derive(Deserialize)]
struct SetPenaltyBody {
    points: u32,
}

#[derive(Deserialize, Default)]
struct StartSeasonBody {
    /// Randomize the roster before drawing the schedule.
    #[serde(default)]
    shuffle: bool,
    /// Deadline reference point; defaults to now.
    start: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct RecordResultBody {
    home_legs: u32,
    away_legs: u32,
}

/// Path segment: season id (e.g. /api/seasons/{id})
#[derive(Deserialize)]
struct SeasonPath {
    id: SeasonId,
}

/// Path segments: season id and participant id
#[derive(Deserialize)]
struct SeasonParticipantPath {
    id: SeasonId,
    participant_id: ParticipantId,
}

/// Path segments: season id and fixture id
#[derive(Deserialize)]
struct SeasonFixturePath {
    id: SeasonId,
    fixture_id: FixtureId,
}

fn error_response(e: &LeagueError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        LeagueError::SeasonNotFound(_)
        | LeagueError::ParticipantNotFound(_)
        | LeagueError::FixtureNotFound(_) => HttpResponse::NotFound().json(body),
        LeagueError::StorageUnavailable | LeagueError::CorruptFixtureResult { .. } => {
            log::error!("{}", e);
            HttpResponse::InternalServerError().json(body)
        }
        _ => HttpResponse::BadRequest().json(body),
    }
}

fn season_response(result: Result<(Season, ()), LeagueError>) -> HttpResponse {
    match result {
        Ok((season, ())) => HttpResponse::Ok().json(season),
        Err(e) => error_response(&e),
    }
}

/// Recompute and cache standings after a change that affects them. A failure here
/// does not undo the change, so it is logged rather than returned.
fn refresh_after_change(state: &AppState, config: &AppConfig, id: SeasonId) {
    if let Err(e) = state.refresh_standings(id, &config.scoring) {
        log::error!("Season {}: standings refresh failed: {}", id, e);
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "dart-league-web",
    })
}

/// Create a new season in Setup (returns it with id).
#[post("/api/seasons")]
async fn api_create_season(state: AppState, body: Json<CreateSeasonBody>) -> HttpResponse {
    let name = body.name.trim();
    if name.is_empty() {
        return error_response(&LeagueError::InvalidParticipantName);
    }
    let season = Season::new(name, body.mode);
    match state.insert(season.clone()) {
        Ok(id) => {
            log::info!("Created season {} ({})", id, season.name);
            HttpResponse::Ok().json(season)
        }
        Err(e) => error_response(&e),
    }
}

/// Get a season by id (404 if not found).
#[get("/api/seasons/{id}")]
async fn api_get_season(state: AppState, path: Path<SeasonPath>) -> HttpResponse {
    match state.get(path.id) {
        Ok(season) => HttpResponse::Ok().json(season),
        Err(e) => error_response(&e),
    }
}

/// Add a participant (season must be in Setup).
#[post("/api/seasons/{id}/participants")]
async fn api_add_participant(
    state: AppState,
    path: Path<SeasonPath>,
    body: Json<AddParticipantBody>,
) -> HttpResponse {
    season_response(state.update(path.id, |s| s.add_participant(body.name.trim()).map(|_| ())))
}

/// Add participants from a CSV body with a `name` column (season must be in Setup).
/// All-or-nothing: a duplicate name rejects the whole file.
#[post("/api/seasons/{id}/participants/import")]
async fn api_import_participants(state: AppState, path: Path<SeasonPath>, body: String) -> HttpResponse {
    let names = match import_participants(body.as_bytes()) {
        Ok(names) => names,
        Err(e) => return error_response(&e),
    };
    season_response(state.update(path.id, |s| {
        for name in &names {
            s.add_participant(name.as_str())?;
        }
        Ok(())
    }))
}

/// Remove a participant by id (season must be in Setup).
#[delete("/api/seasons/{id}/participants/{participant_id}")]
async fn api_remove_participant(state: AppState, path: Path<SeasonParticipantPath>) -> HttpResponse {
    season_response(state.update(path.id, |s| s.remove_participant(path.participant_id)))
}

/// Set single or double round (Setup only).
#[put("/api/seasons/{id}/mode")]
async fn api_set_mode(state: AppState, path: Path<SeasonPath>, body: Json<SetModeBody>) -> HttpResponse {
    season_response(state.update(path.id, |s| s.set_mode(body.mode)))
}

/// Set penalty points for a participant; standings are recomputed.
#[put("/api/seasons/{id}/participants/{participant_id}/penalty")]
async fn api_set_penalty(
    state: AppState,
    config: AppConfig,
    path: Path<SeasonParticipantPath>,
    body: Json<SetPenaltyBody>,
) -> HttpResponse {
    let result = state.update(path.id, |s| s.set_penalty(path.participant_id, body.points));
    if result.is_ok() {
        refresh_after_change(&state, &config, path.id);
    }
    season_response(result)
}

/// Start the season: draw the schedule and assign deadlines (Setup -> Active).
#[post("/api/seasons/{id}/start")]
async fn api_start_season(
    state: AppState,
    config: AppConfig,
    path: Path<SeasonPath>,
    body: Option<Json<StartSeasonBody>>,
) -> HttpResponse {
    let body = body.map(Json::into_inner).unwrap_or_default();
    let start = body.start.unwrap_or_else(Utc::now);
    let result = state.update(path.id, |s| {
        if body.shuffle {
            shuffle_participants(s, &mut rand::thread_rng())?;
        }
        start_season(s, &config, start)
    });
    if result.is_ok() {
        refresh_after_change(&state, &config, path.id);
    }
    season_response(result)
}

/// Record a completed match and refresh the standings.
#[put("/api/seasons/{id}/fixtures/{fixture_id}/result")]
async fn api_record_result(
    state: AppState,
    config: AppConfig,
    path: Path<SeasonFixturePath>,
    body: Json<RecordResultBody>,
) -> HttpResponse {
    let result = state.update(path.id, |s| {
        record_result(s, path.fixture_id, body.home_legs, body.away_legs, &config.scoring)
    });
    if result.is_ok() {
        refresh_after_change(&state, &config, path.id);
    }
    season_response(result)
}

/// Reset a fixture to unplayed and refresh the standings.
#[delete("/api/seasons/{id}/fixtures/{fixture_id}/result")]
async fn api_clear_result(state: AppState, config: AppConfig, path: Path<SeasonFixturePath>) -> HttpResponse {
    let result = state.update(path.id, |s| clear_result(s, path.fixture_id));
    if result.is_ok() {
        refresh_after_change(&state, &config, path.id);
    }
    season_response(result)
}

/// Fill all unplayed fixtures with random results (Active only).
#[post("/api/seasons/{id}/simulate")]
async fn api_simulate(state: AppState, config: AppConfig, path: Path<SeasonPath>) -> HttpResponse {
    let result = state.update(path.id, |s| {
        simulate_results(s, &config.scoring, &mut rand::thread_rng())
    });
    match result {
        Ok((season, filled)) => {
            log::info!("Season {}: simulated {} fixture(s)", path.id, filled);
            refresh_after_change(&state, &config, path.id);
            HttpResponse::Ok().json(season)
        }
        Err(e) => error_response(&e),
    }
}

/// Current standings snapshot (recomputed if out of date).
#[get("/api/seasons/{id}/standings")]
async fn api_standings(state: AppState, config: AppConfig, path: Path<SeasonPath>) -> HttpResponse {
    match state.current_standings(path.id, &config.scoring) {
        Ok(snapshot) => HttpResponse::Ok().json(snapshot),
        Err(e) => error_response(&e),
    }
}

/// Current standings as CSV.
#[get("/api/seasons/{id}/standings.csv")]
async fn api_standings_csv(state: AppState, config: AppConfig, path: Path<SeasonPath>) -> HttpResponse {
    let export = state.current_standings(path.id, &config.scoring).and_then(|snapshot| {
        let season = state.get(path.id)?;
        let mut out = Vec::new();
        export_standings(&snapshot.rows, &season, &mut out)?;
        Ok(out)
    });
    match export {
        Ok(out) => HttpResponse::Ok().content_type("text/csv; charset=utf-8").body(out),
        Err(e) => error_response(&e),
    }
}

/// Unplayed fixtures past their matchday deadline plus match timeout.
#[get("/api/seasons/{id}/overdue")]
async fn api_overdue(state: AppState, config: AppConfig, path: Path<SeasonPath>) -> HttpResponse {
    match state.get(path.id) {
        Ok(season) => HttpResponse::Ok().json(overdue_fixtures(
            &season,
            Utc::now(),
            config.match_timeout_minutes,
        )),
        Err(e) => error_response(&e),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = LeagueConfig::from_env();
    let bind = (config.host.clone(), config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);
    log::info!(
        "Scoring: win {} / draw {} / loss {}, first to {} legs",
        config.scoring.win_points,
        config.scoring.draw_points,
        config.scoring.loss_points,
        config.scoring.legs_to_win
    );

    let state = Data::new(LeagueStore::new());
    let config = Data::new(config);

    // Background task: periodically log fixtures that missed their matchday deadline
    let state_sweep = state.clone();
    let config_sweep = config.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(config_sweep.deadline_sweep_secs));
        loop {
            interval.tick().await;
            let seasons = match state_sweep.seasons() {
                Ok(seasons) => seasons,
                Err(e) => {
                    log::error!("Deadline sweep skipped: {}", e);
                    continue;
                }
            };
            let now = Utc::now();
            for season in &seasons {
                let overdue = overdue_fixtures(season, now, config_sweep.match_timeout_minutes);
                if !overdue.is_empty() {
                    log::warn!(
                        "Season {} ({}): {} fixture(s) past deadline",
                        season.id,
                        season.name,
                        overdue.len()
                    );
                }
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(config.clone())
            .service(api_health)
            .service(api_create_season)
            .service(api_get_season)
            .service(api_add_participant)
            .service(api_import_participants)
            .service(api_remove_participant)
            .service(api_set_mode)
            .service(api_set_penalty)
            .service(api_start_season)
            .service(api_record_result)
            .service(api_clear_result)
            .service(api_simulate)
            .service(api_standings_csv)
            .service(api_standings)
            .service(api_overdue)
    })
    .bind(bind)?
    .run()
    .await
}
