//! Single binary web server exposing the scheduling engine over a REST API.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT.
//! Set SEED_DIR to a directory of CSV exports to preload tournaments, teams, venues and referees.

use actix_web::{
    get, patch, post,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use court_scheduler::store::import::seed_from_dir;
use court_scheduler::{
    create_group_stage_schedule, create_playoff_schedule, update_match, GroupStageRequest,
    MatchEdit, MatchId, MemoryStore, PlayoffRequest, ScheduleError, ScheduleStore,
    SchedulerConfig, TournamentId,
};
use serde::Deserialize;

type AppState = Data<MemoryStore>;
type AppConfig = Data<SchedulerConfig>;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segments: tournament id and match id (e.g. /api/tournaments/{id}/matches/{match_id})
#[derive(Deserialize)]
struct TournamentMatchPath {
    id: TournamentId,
    match_id: MatchId,
}

fn error_response(e: &ScheduleError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string(), "kind": e.kind() });
    match e {
        ScheduleError::Validation(_) => HttpResponse::BadRequest().json(body),
        ScheduleError::State(court_scheduler::StateError::TournamentNotFound(_))
        | ScheduleError::State(court_scheduler::StateError::MatchNotFound(_)) => {
            HttpResponse::NotFound().json(body)
        }
        ScheduleError::State(_) | ScheduleError::Conflict(_) => HttpResponse::Conflict().json(body),
        ScheduleError::Scheduling(_) => HttpResponse::UnprocessableEntity().json(body),
        ScheduleError::Storage(_) => HttpResponse::InternalServerError().json(body),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "court-scheduler",
    })
}

/// All committed matches of a tournament, by date and time.
#[get("/api/tournaments/{id}/matches")]
async fn api_list_matches(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    match state.matches_for(path.id) {
        Ok(matches) => HttpResponse::Ok().json(matches),
        Err(e) => error_response(&e),
    }
}

/// Create groups and the group-stage calendar (generate or custom).
#[post("/api/tournaments/{id}/schedule/group-stage")]
async fn api_create_group_stage(
    state: AppState,
    config: AppConfig,
    path: Path<TournamentPath>,
    body: Option<Json<GroupStageRequest>>,
) -> HttpResponse {
    let request = body.map(Json::into_inner).unwrap_or_default();
    match create_group_stage_schedule(state.get_ref(), path.id, &request, &config) {
        Ok(schedule) => HttpResponse::Created().json(schedule),
        Err(e) => {
            log::warn!("Group-stage scheduling for {} failed: {}", path.id, e);
            error_response(&e)
        }
    }
}

/// Create the knockout stage (generate or custom).
#[post("/api/tournaments/{id}/schedule/playoffs")]
async fn api_create_playoffs(
    state: AppState,
    config: AppConfig,
    path: Path<TournamentPath>,
    body: Option<Json<PlayoffRequest>>,
) -> HttpResponse {
    let request = body.map(Json::into_inner).unwrap_or_default();
    match create_playoff_schedule(state.get_ref(), path.id, &request, &config) {
        Ok(schedule) => HttpResponse::Created().json(schedule),
        Err(e) => {
            log::warn!("Playoff scheduling for {} failed: {}", path.id, e);
            error_response(&e)
        }
    }
}

/// Change the venue, referee, date or time of one scheduled match.
#[patch("/api/tournaments/{id}/matches/{match_id}")]
async fn api_edit_match(
    state: AppState,
    config: AppConfig,
    path: Path<TournamentMatchPath>,
    body: Json<MatchEdit>,
) -> HttpResponse {
    match update_match(state.get_ref(), path.id, path.match_id, *body, &config) {
        Ok(game) => HttpResponse::Ok().json(game),
        Err(e) => error_response(&e),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let bind = (host.as_str(), port);

    let store = MemoryStore::new();
    if let Ok(dir) = std::env::var("SEED_DIR") {
        if let Err(e) = seed_from_dir(&store, std::path::Path::new(&dir)) {
            log::error!("Seeding from {} failed: {}", dir, e);
            return Err(std::io::Error::other(e.to_string()));
        }
    }
    let config = SchedulerConfig::from_env();
    log::info!("Scheduler config: {:?}", config);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(store);
    let config = Data::new(config);
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(config.clone())
            .service(api_health)
            .service(api_list_matches)
            .service(api_create_group_stage)
            .service(api_create_playoffs)
            .service(api_edit_match)
    })
    .bind(bind)?
    .run()
    .await
}
