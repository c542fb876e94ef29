//! Single binary web server: JSON API over the scheduling library.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default.
//! Override with env: HOST, PORT, INACTIVITY_HOURS (idle sessions are dropped after this long).

use actix_web::{
    delete, get, post, put,
    web::{self, Bytes, Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use beach_doubles_web::{
    build_schedule, PlayerId, PointLog, Roster, RosterError, Schedule, ScheduleConfig,
    ScheduleError, Side, TeamStanding,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};
use thiserror::Error;
use uuid::Uuid;

type SessionId = Uuid;

#[derive(Debug, Error)]
enum SessionError {
    #[error(transparent)]
    Roster(#[from] RosterError),
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
    #[error("No schedule has been generated yet")]
    NoSchedule,
}

/// One organiser's roster and the schedule generated from it.
#[derive(Debug, Serialize)]
struct Session {
    id: SessionId,
    roster: Roster,
    config: ScheduleConfig,
    schedule: Option<Schedule>,
    /// Rally history per match id, for matches scored point by point.
    #[serde(serialize_with = "serialize_point_logs")]
    point_logs: HashMap<String, PointLog>,
    created_at: DateTime<Utc>,
    generated_at: Option<DateTime<Utc>>,
}

impl Session {
    fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            roster: Roster::new(),
            config: ScheduleConfig::default(),
            schedule: None,
            point_logs: HashMap::new(),
            created_at: Utc::now(),
            generated_at: None,
        }
    }

    /// Generate (or regenerate) the schedule. Any previous scores are discarded.
    fn generate(&mut self, config: ScheduleConfig) -> Result<(), SessionError> {
        let schedule = build_schedule(self.roster.players(), &config)?;
        self.config = config;
        self.schedule = Some(schedule);
        self.point_logs.clear();
        self.generated_at = Some(Utc::now());
        Ok(())
    }

    fn schedule_mut(&mut self) -> Result<&mut Schedule, SessionError> {
        self.schedule.as_mut().ok_or(SessionError::NoSchedule)
    }

    fn set_score(&mut self, match_id: &str, team1: u32, team2: u32) -> Result<(), SessionError> {
        self.schedule_mut()?.update_score(match_id, team1, team2)?;
        // Manual scores override any rally history.
        self.point_logs.remove(match_id);
        Ok(())
    }

    /// Apply `edit` to the match's rally log. `edit` returns true when it changed the rallies;
    /// only then is the match rescored from the log, so a manually entered score survives
    /// opening a set or undoing on an empty log.
    fn edit_points<F>(&mut self, match_id: &str, edit: F) -> Result<(), SessionError>
    where
        F: FnOnce(&mut PointLog) -> bool,
    {
        let schedule = self.schedule.as_mut().ok_or(SessionError::NoSchedule)?;
        let current = schedule
            .find_match(match_id)
            .cloned()
            .ok_or_else(|| ScheduleError::MatchNotFound(match_id.to_string()))?;
        let log = self.point_logs.entry(match_id.to_string()).or_default();
        if edit(log) {
            schedule.replace_match(log.apply_to(&current))?;
        }
        Ok(())
    }
}

fn serialize_point_logs<S: Serializer>(
    logs: &HashMap<String, PointLog>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_map(logs.iter().map(|(id, log)| (id, log.summary())))
}

/// Per-session entry: session data + last activity time (for auto-cleanup).
struct SessionEntry {
    session: Session,
    last_activity: Instant,
}

/// In-memory state: many sessions by ID.
type AppState = Data<RwLock<HashMap<SessionId, SessionEntry>>>;

/// Server settings read from the environment.
struct ServerConfig {
    host: String,
    port: u16,
    inactivity_timeout: Duration,
}

impl ServerConfig {
    fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);
        let hours: u64 = std::env::var("INACTIVITY_HOURS")
            .ok()
            .and_then(|h| h.parse().ok())
            .unwrap_or(12);
        Self {
            host,
            port,
            inactivity_timeout: Duration::from_secs(hours * 3600),
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct AddPlayerBody {
    name: String,
}

#[derive(Deserialize)]
struct SetScoreBody {
    team1_score: u32,
    team2_score: u32,
}

#[derive(Deserialize)]
struct AddPointBody {
    side: Side,
}

/// Standings row with the derived win rate alongside the counts.
#[derive(Serialize)]
struct StandingRow<'a> {
    #[serde(flatten)]
    standing: &'a TeamStanding,
    win_rate: f32,
}

#[derive(Deserialize)]
struct SessionPath {
    id: SessionId,
}

#[derive(Deserialize)]
struct SessionPlayerPath {
    id: SessionId,
    player_id: PlayerId,
}

#[derive(Deserialize)]
struct SessionMatchPath {
    id: SessionId,
    match_id: String,
}

fn error_json(e: impl std::fmt::Display) -> serde_json::Value {
    serde_json::json!({ "error": e.to_string() })
}

/// Look up a session, refresh its activity time and run `f` on it; respond with the session
/// on success, 400 with the error otherwise.
fn with_session<F>(state: &AppState, id: SessionId, f: F) -> HttpResponse
where
    F: FnOnce(&mut Session) -> Result<(), SessionError>,
{
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&id) {
        Some(e) => e,
        None => return HttpResponse::NotFound().json(error_json("No session")),
    };
    entry.last_activity = Instant::now();
    match f(&mut entry.session) {
        Ok(()) => HttpResponse::Ok().json(&entry.session),
        Err(e) => HttpResponse::BadRequest().json(error_json(e)),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "beach-doubles-web",
    })
}

/// Create an empty session (client stores the id for subsequent requests).
#[post("/api/sessions")]
async fn api_create_session(state: AppState) -> HttpResponse {
    let session = Session::new();
    let id = session.id;
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = g.entry(id).or_insert(SessionEntry {
        session,
        last_activity: Instant::now(),
    });
    log::info!("Created session {}", id);
    HttpResponse::Ok().json(&entry.session)
}

#[get("/api/sessions/{id}")]
async fn api_get_session(state: AppState, path: Path<SessionPath>) -> HttpResponse {
    with_session(&state, path.id, |_| Ok(()))
}

#[post("/api/sessions/{id}/players")]
async fn api_add_player(
    state: AppState,
    path: Path<SessionPath>,
    body: Json<AddPlayerBody>,
) -> HttpResponse {
    with_session(&state, path.id, |s| {
        s.roster.add_player(&body.name)?;
        Ok(())
    })
}

#[delete("/api/sessions/{id}/players/{player_id}")]
async fn api_remove_player(state: AppState, path: Path<SessionPlayerPath>) -> HttpResponse {
    with_session(&state, path.id, |s| {
        s.roster.remove_player(&path.player_id)?;
        Ok(())
    })
}

/// Replace the roster with players read from a CSV body (`name[,id]` per line).
#[post("/api/sessions/{id}/players/import")]
async fn api_import_players(
    state: AppState,
    path: Path<SessionPath>,
    body: String,
) -> HttpResponse {
    with_session(&state, path.id, |s| {
        s.roster = Roster::from_csv(body.as_bytes())?;
        Ok(())
    })
}

/// Generate the schedule from the current roster. An empty body uses the default config;
/// a body that is not a valid config is rejected.
#[post("/api/sessions/{id}/schedule")]
async fn api_generate_schedule(
    state: AppState,
    path: Path<SessionPath>,
    body: Bytes,
) -> HttpResponse {
    let config = if body.iter().all(u8::is_ascii_whitespace) {
        ScheduleConfig::default()
    } else {
        match serde_json::from_slice::<ScheduleConfig>(&body) {
            Ok(config) => config,
            Err(e) => {
                return HttpResponse::BadRequest().json(error_json(format!("Invalid config: {e}")))
            }
        }
    };
    with_session(&state, path.id, |s| s.generate(config))
}

/// Restart: zero every score, keep the schedule.
#[post("/api/sessions/{id}/schedule/reset")]
async fn api_reset_scores(state: AppState, path: Path<SessionPath>) -> HttpResponse {
    with_session(&state, path.id, |s| {
        s.schedule_mut()?.reset_scores();
        s.point_logs.clear();
        Ok(())
    })
}

#[put("/api/sessions/{id}/matches/{match_id}/score")]
async fn api_set_score(
    state: AppState,
    path: Path<SessionMatchPath>,
    body: Json<SetScoreBody>,
) -> HttpResponse {
    with_session(&state, path.id, |s| {
        s.set_score(&path.match_id, body.team1_score, body.team2_score)
    })
}

/// Record one rally point for a side in the match's current set.
#[post("/api/sessions/{id}/matches/{match_id}/points")]
async fn api_add_point(
    state: AppState,
    path: Path<SessionMatchPath>,
    body: Json<AddPointBody>,
) -> HttpResponse {
    let side = body.side;
    with_session(&state, path.id, |s| {
        s.edit_points(&path.match_id, |log| {
            log.add_point(side);
            true
        })
    })
}

#[delete("/api/sessions/{id}/matches/{match_id}/points/last")]
async fn api_undo_point(state: AppState, path: Path<SessionMatchPath>) -> HttpResponse {
    with_session(&state, path.id, |s| {
        s.edit_points(&path.match_id, |log| log.undo_last_point().is_some())
    })
}

#[post("/api/sessions/{id}/matches/{match_id}/sets")]
async fn api_new_set(state: AppState, path: Path<SessionMatchPath>) -> HttpResponse {
    with_session(&state, path.id, |s| {
        s.edit_points(&path.match_id, |log| {
            log.start_new_set();
            false
        })
    })
}

/// Current standings, recomputed from the schedule on every call.
#[get("/api/sessions/{id}/standings")]
async fn api_standings(state: AppState, path: Path<SessionPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return HttpResponse::NotFound().json(error_json("No session")),
    };
    entry.last_activity = Instant::now();
    match &entry.session.schedule {
        Some(schedule) => {
            let standings = schedule.standings();
            let rows: Vec<StandingRow> = standings
                .iter()
                .map(|standing| StandingRow {
                    standing,
                    win_rate: standing.win_rate(),
                })
                .collect();
            HttpResponse::Ok().json(serde_json::json!({
                "standings": rows,
                "completed_matches": schedule.completed_count(),
                "total_matches": schedule.match_count(),
            }))
        }
        None => HttpResponse::BadRequest().json(error_json(SessionError::NoSchedule)),
    }
}

fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(api_health)
        .service(api_create_session)
        .service(api_get_session)
        .service(api_import_players)
        .service(api_add_player)
        .service(api_remove_player)
        .service(api_generate_schedule)
        .service(api_reset_scores)
        .service(api_set_score)
        .service(api_add_point)
        .service(api_undo_point)
        .service(api_new_set)
        .service(api_standings);
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServerConfig::from_env();
    log::info!("Starting server at http://{}:{}", config.host, config.port);

    let state = Data::new(RwLock::new(HashMap::<SessionId, SessionEntry>::new()));

    // Background task: every 30 minutes, remove sessions idle past the timeout
    let state_cleanup = state.clone();
    let timeout = config.inactivity_timeout;
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let before = g.len();
            g.retain(|_, entry| entry.last_activity.elapsed() < timeout);
            let removed = before - g.len();
            if removed > 0 {
                log::info!("Cleaned up {} inactive session(s)", removed);
            }
        }
    });

    HttpServer::new(move || App::new().app_data(state.clone()).configure(configure))
        .bind((config.host.as_str(), config.port))?
        .run()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test;

    fn new_state() -> AppState {
        Data::new(RwLock::new(HashMap::new()))
    }

    /// State holding one empty session; returns the session id.
    fn state_with_session() -> (AppState, SessionId) {
        let state = new_state();
        let session = Session::new();
        let id = session.id;
        state.write().unwrap().insert(
            id,
            SessionEntry {
                session,
                last_activity: Instant::now(),
            },
        );
        (state, id)
    }

    #[actix_web::test]
    async fn health_is_ok() {
        let app = test::init_service(App::new().app_data(new_state()).configure(configure)).await;
        let req = test::TestRequest::get().uri("/api/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["ok"], true);
    }

    #[actix_web::test]
    async fn generate_score_and_rank() {
        let (state, id) = state_with_session();
        let app = test::init_service(App::new().app_data(state).configure(configure)).await;

        for name in ["Ana", "Ben", "Cleo", "Dev"] {
            let req = test::TestRequest::post()
                .uri(&format!("/api/sessions/{id}/players"))
                .set_json(serde_json::json!({ "name": name }))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert!(resp.status().is_success());
        }

        let req = test::TestRequest::post()
            .uri(&format!("/api/sessions/{id}/schedule"))
            .set_json(serde_json::json!({ "method": { "method": "per_matchup", "load": 1 } }))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        let matchups = body["schedule"]["matchups"].as_array().unwrap();
        assert_eq!(matchups.len(), 3);
        let match_id = matchups[0]["matches"][0]["id"].as_str().unwrap().to_string();

        let req = test::TestRequest::put()
            .uri(&format!("/api/sessions/{id}/matches/{match_id}/score"))
            .set_json(serde_json::json!({ "team1_score": 21, "team2_score": 15 }))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        let m = &body["schedule"]["matchups"][0]["matches"][0];
        assert_eq!(m["is_completed"], true);

        let req = test::TestRequest::get()
            .uri(&format!("/api/sessions/{id}/standings"))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["completed_matches"], 1);
        assert_eq!(body["standings"][0]["wins"], 1);
        assert_eq!(body["standings"][0]["win_rate"], 1.0);
        assert_eq!(body["standings"][0]["team"]["id"], matchups[0]["team1"]["id"]);
    }

    #[actix_web::test]
    async fn generate_rejects_small_roster() {
        let (state, id) = state_with_session();
        let app = test::init_service(App::new().app_data(state).configure(configure)).await;
        let req = test::TestRequest::post()
            .uri(&format!("/api/sessions/{id}/schedule"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn rally_points_drive_the_score() {
        let (state, id) = state_with_session();
        let app = test::init_service(App::new().app_data(state).configure(configure)).await;
        let req = test::TestRequest::post()
            .uri(&format!("/api/sessions/{id}/players/import"))
            .set_payload("name\nAna\nBen\nCleo\nDev\n")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["roster"]["players"].as_array().unwrap().len(), 4);

        let req = test::TestRequest::post()
            .uri(&format!("/api/sessions/{id}/schedule"))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        let match_id = body["schedule"]["matchups"][1]["matches"][0]["id"]
            .as_str()
            .unwrap()
            .to_string();

        for side in ["two", "two", "one"] {
            let req = test::TestRequest::post()
                .uri(&format!("/api/sessions/{id}/matches/{match_id}/points"))
                .set_json(serde_json::json!({ "side": side }))
                .to_request();
            assert!(test::call_service(&app, req).await.status().is_success());
        }
        let req = test::TestRequest::delete()
            .uri(&format!("/api/sessions/{id}/matches/{match_id}/points/last"))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        let m = &body["schedule"]["matchups"][1]["matches"][0];
        assert_eq!(m["team1_score"], 0);
        assert_eq!(m["team2_score"], 2);
        assert_eq!(m["is_completed"], false);

        let log = &body["point_logs"][match_id.as_str()];
        assert_eq!(log["current_set"], 1);
        assert_eq!(log["rallies_played"], 2);
        assert_eq!(log["sets"][0]["team2"], 2);
        assert_eq!(log["sets"][0]["winner"], serde_json::Value::Null);
        assert_eq!(log["team1_sets"], 0);
        assert_eq!(log["team2_sets"], 0);
    }

    #[actix_web::test]
    async fn manual_score_survives_new_set_and_empty_undo() {
        let (state, id) = state_with_session();
        let app = test::init_service(App::new().app_data(state).configure(configure)).await;
        let req = test::TestRequest::post()
            .uri(&format!("/api/sessions/{id}/players/import"))
            .set_payload("name\nAna\nBen\nCleo\nDev\n")
            .to_request();
        assert!(test::call_service(&app, req).await.status().is_success());
        let req = test::TestRequest::post()
            .uri(&format!("/api/sessions/{id}/schedule"))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        let match_id = body["schedule"]["matchups"][0]["matches"][0]["id"]
            .as_str()
            .unwrap()
            .to_string();

        let req = test::TestRequest::put()
            .uri(&format!("/api/sessions/{id}/matches/{match_id}/score"))
            .set_json(serde_json::json!({ "team1_score": 21, "team2_score": 15 }))
            .to_request();
        assert!(test::call_service(&app, req).await.status().is_success());

        let req = test::TestRequest::post()
            .uri(&format!("/api/sessions/{id}/matches/{match_id}/sets"))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["point_logs"][match_id.as_str()]["current_set"], 2);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/sessions/{id}/matches/{match_id}/points/last"))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        let m = &body["schedule"]["matchups"][0]["matches"][0];
        assert_eq!(m["team1_score"], 21);
        assert_eq!(m["team2_score"], 15);
        assert_eq!(m["is_completed"], true);
    }

    #[actix_web::test]
    async fn malformed_config_is_rejected() {
        let (state, id) = state_with_session();
        let app = test::init_service(App::new().app_data(state.clone()).configure(configure)).await;
        let req = test::TestRequest::post()
            .uri(&format!("/api/sessions/{id}/players/import"))
            .set_payload("name\nAna\nBen\nCleo\nDev\n")
            .to_request();
        assert!(test::call_service(&app, req).await.status().is_success());

        let req = test::TestRequest::post()
            .uri(&format!("/api/sessions/{id}/schedule"))
            .set_payload("{\"method\": {\"method\": \"per_player\", \"load\": ")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
        assert!(state.read().unwrap()[&id].session.schedule.is_none());
    }

    #[actix_web::test]
    async fn create_session_returns_id() {
        let state = new_state();
        let app = test::init_service(App::new().app_data(state.clone()).configure(configure)).await;
        let req = test::TestRequest::post().uri("/api/sessions").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        let id: SessionId = body["id"].as_str().unwrap().parse().unwrap();
        assert!(state.read().unwrap().contains_key(&id));
        assert!(body["schedule"].is_null());
    }

    #[actix_web::test]
    async fn unknown_session_is_404() {
        let app = test::init_service(App::new().app_data(new_state()).configure(configure)).await;
        let req = test::TestRequest::get()
            .uri(&format!("/api/sessions/{}", Uuid::new_v4()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);
    }
}
