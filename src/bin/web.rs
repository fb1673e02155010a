//! Single binary web server: JSON API over the tournament store.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default.
//! Override with env: HOST, PORT, DATA_DIR (JSON files, default "data"), SEED_DEMO (1/true).

use actix_web::{
    delete, get, post, put,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use chrono::{DateTime, Utc};
use padel_tournament_web::{
    standings_csv, FileStorage, MatchId, PlayerId, Store, TeamId, TournamentError, TournamentId,
};
use serde::{Deserialize, Serialize};
use std::sync::{RwLock, RwLockWriteGuard};

/// Shared store; every mutating route flushes before responding.
type AppState = Data<RwLock<Store>>;

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerBody {
    name: Option<String>,
    photo_url: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateTeamBody {
    name: String,
    player_ids: Vec<PlayerId>,
    photo_url: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateTeamBody {
    name: Option<String>,
    photo_url: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TournamentBody {
    name: Option<String>,
    start_date: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddTeamBody {
    team_id: TeamId,
}

#[derive(Deserialize)]
struct GenerateBody {
    #[serde(default)]
    replace: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateMatchBody {
    team_a_id: TeamId,
    team_b_id: TeamId,
    team_a_score: Option<u32>,
    team_b_score: Option<u32>,
    #[serde(default)]
    is_grand_final: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScoreBody {
    team_a_score: u32,
    team_b_score: u32,
}

#[derive(Serialize)]
struct FinalistsResponse {
    first: Option<padel_tournament_web::Team>,
    second: Option<padel_tournament_web::Team>,
}

/// Path segment: entity id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct IdPath<T> {
    id: T,
}

/// Path segments: tournament id and team id (e.g. /api/tournaments/{id}/teams/{team_id})
#[derive(Deserialize)]
struct TournamentTeamPath {
    id: TournamentId,
    team_id: TeamId,
}

fn error_json(message: impl ToString) -> serde_json::Value {
    serde_json::json!({ "error": message.to_string() })
}

fn domain_error(e: TournamentError) -> HttpResponse {
    match e {
        TournamentError::PlayerNotFound(_)
        | TournamentError::TeamNotFound(_)
        | TournamentError::TournamentNotFound(_)
        | TournamentError::MatchNotFound(_) => HttpResponse::NotFound().json(error_json(e)),
        _ => HttpResponse::BadRequest().json(error_json(e)),
    }
}

fn not_found(what: &str) -> HttpResponse {
    HttpResponse::NotFound().json(error_json(format!("No {}", what)))
}

fn lock_error() -> HttpResponse {
    HttpResponse::InternalServerError().body("lock error")
}

/// Flush pending writes, then respond with `body` as JSON.
fn flushed<T: Serialize>(store: &mut RwLockWriteGuard<'_, Store>, body: &T) -> HttpResponse {
    match store.flush() {
        Ok(()) => HttpResponse::Ok().json(body),
        Err(e) => {
            log::error!("Flush failed: {}", e);
            HttpResponse::InternalServerError().json(error_json(e))
        }
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "padel-tournament-web",
    })
}

#[get("/api/players")]
async fn api_list_players(state: AppState) -> HttpResponse {
    match state.read() {
        Ok(store) => HttpResponse::Ok().json(store.players()),
        Err(_) => lock_error(),
    }
}

#[post("/api/players")]
async fn api_create_player(state: AppState, body: Json<PlayerBody>) -> HttpResponse {
    let body = body.into_inner();
    let Some(name) = body.name.filter(|n| !n.trim().is_empty()) else {
        return domain_error(TournamentError::EmptyName);
    };
    let mut store = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let player = store.create_player(name.trim(), body.photo_url);
    flushed(&mut store, &player)
}

#[put("/api/players/{id}")]
async fn api_update_player(state: AppState, path: Path<IdPath<PlayerId>>, body: Json<PlayerBody>) -> HttpResponse {
    let body = body.into_inner();
    let mut store = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match store.update_player(path.id, body.name, body.photo_url) {
        Some(player) => flushed(&mut store, &player),
        None => not_found("player"),
    }
}

#[delete("/api/players/{id}")]
async fn api_delete_player(state: AppState, path: Path<IdPath<PlayerId>>) -> HttpResponse {
    let mut store = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    if !store.delete_player(path.id) {
        return not_found("player");
    }
    flushed(&mut store, &serde_json::json!({ "deleted": true }))
}

#[get("/api/teams")]
async fn api_list_teams(state: AppState) -> HttpResponse {
    match state.read() {
        Ok(store) => HttpResponse::Ok().json(store.teams()),
        Err(_) => lock_error(),
    }
}

#[post("/api/teams")]
async fn api_create_team(state: AppState, body: Json<CreateTeamBody>) -> HttpResponse {
    let body = body.into_inner();
    let mut store = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match store.create_team(&body.name, &body.player_ids, body.photo_url) {
        Ok(team) => flushed(&mut store, &team),
        Err(e) => domain_error(e),
    }
}

#[put("/api/teams/{id}")]
async fn api_update_team(state: AppState, path: Path<IdPath<TeamId>>, body: Json<UpdateTeamBody>) -> HttpResponse {
    let body = body.into_inner();
    let mut store = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match store.update_team(path.id, body.name, body.photo_url) {
        Some(team) => flushed(&mut store, &team),
        None => not_found("team"),
    }
}

#[delete("/api/teams/{id}")]
async fn api_delete_team(state: AppState, path: Path<IdPath<TeamId>>) -> HttpResponse {
    let mut store = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    if !store.delete_team(path.id) {
        return not_found("team");
    }
    flushed(&mut store, &serde_json::json!({ "deleted": true }))
}

#[get("/api/tournaments")]
async fn api_list_tournaments(state: AppState) -> HttpResponse {
    match state.read() {
        Ok(store) => HttpResponse::Ok().json(store.tournaments()),
        Err(_) => lock_error(),
    }
}

/// Current tournament: latest active one, else latest overall.
#[get("/api/tournaments/current")]
async fn api_current_tournament(state: AppState) -> HttpResponse {
    match state.read() {
        Ok(store) => match store.current_tournament() {
            Some(t) => HttpResponse::Ok().json(t),
            None => not_found("tournament"),
        },
        Err(_) => lock_error(),
    }
}

#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState, body: Json<TournamentBody>) -> HttpResponse {
    let body = body.into_inner();
    let Some(name) = body.name.filter(|n| !n.trim().is_empty()) else {
        return domain_error(TournamentError::EmptyName);
    };
    let mut store = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let tournament = store.create_tournament(name.trim(), body.start_date);
    flushed(&mut store, &tournament)
}

#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<IdPath<TournamentId>>) -> HttpResponse {
    match state.read() {
        Ok(store) => match store.tournament(path.id) {
            Some(t) => HttpResponse::Ok().json(t),
            None => not_found("tournament"),
        },
        Err(_) => lock_error(),
    }
}

#[put("/api/tournaments/{id}")]
async fn api_update_tournament(
    state: AppState,
    path: Path<IdPath<TournamentId>>,
    body: Json<TournamentBody>,
) -> HttpResponse {
    let body = body.into_inner();
    let mut store = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match store.update_tournament(path.id, body.name, body.start_date) {
        Some(t) => flushed(&mut store, &t),
        None => not_found("tournament"),
    }
}

/// Delete a tournament together with its matches.
#[delete("/api/tournaments/{id}")]
async fn api_delete_tournament(state: AppState, path: Path<IdPath<TournamentId>>) -> HttpResponse {
    let mut store = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    if !store.delete_tournament(path.id) {
        return not_found("tournament");
    }
    flushed(&mut store, &serde_json::json!({ "deleted": true }))
}

#[post("/api/tournaments/{id}/teams")]
async fn api_add_team(state: AppState, path: Path<IdPath<TournamentId>>, body: Json<AddTeamBody>) -> HttpResponse {
    let mut store = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    if !store.add_team_to_tournament(path.id, body.team_id) {
        return HttpResponse::BadRequest().json(error_json("Team could not be added"));
    }
    let tournament = store.tournament(path.id);
    flushed(&mut store, &tournament)
}

#[delete("/api/tournaments/{id}/teams/{team_id}")]
async fn api_remove_team(state: AppState, path: Path<TournamentTeamPath>) -> HttpResponse {
    let mut store = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    if !store.remove_team_from_tournament(path.id, path.team_id) {
        return not_found("team in tournament");
    }
    let tournament = store.tournament(path.id);
    flushed(&mut store, &tournament)
}

/// Generate the round robin (send `{"replace": true}` to discard existing matches).
#[post("/api/tournaments/{id}/matches/generate")]
async fn api_generate_matches(
    state: AppState,
    path: Path<IdPath<TournamentId>>,
    body: Option<Json<GenerateBody>>,
) -> HttpResponse {
    let replace = body.map(|b| b.replace).unwrap_or(false);
    let mut store = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match store.generate_matches(path.id, replace) {
        Ok(matches) => flushed(&mut store, &matches),
        Err(e) => domain_error(e),
    }
}

#[get("/api/tournaments/{id}/matches")]
async fn api_list_matches(state: AppState, path: Path<IdPath<TournamentId>>) -> HttpResponse {
    match state.read() {
        Ok(store) => HttpResponse::Ok().json(store.matches(Some(path.id))),
        Err(_) => lock_error(),
    }
}

#[post("/api/tournaments/{id}/matches")]
async fn api_create_match(
    state: AppState,
    path: Path<IdPath<TournamentId>>,
    body: Json<CreateMatchBody>,
) -> HttpResponse {
    let score = match (body.team_a_score, body.team_b_score) {
        (Some(a), Some(b)) => Some((a, b)),
        (None, None) => None,
        _ => return HttpResponse::BadRequest().json(error_json("Both scores are required")),
    };
    let mut store = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match store.create_match(path.id, body.team_a_id, body.team_b_id, score, body.is_grand_final) {
        Ok(m) => flushed(&mut store, &m),
        Err(e) => domain_error(e),
    }
}

#[put("/api/matches/{id}/score")]
async fn api_record_score(state: AppState, path: Path<IdPath<MatchId>>, body: Json<ScoreBody>) -> HttpResponse {
    let mut store = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match store.record_match_score(path.id, body.team_a_score, body.team_b_score) {
        Ok(m) => flushed(&mut store, &m),
        Err(e) => domain_error(e),
    }
}

#[delete("/api/matches/{id}")]
async fn api_delete_match(state: AppState, path: Path<IdPath<MatchId>>) -> HttpResponse {
    let mut store = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    if !store.delete_match(path.id) {
        return HttpResponse::BadRequest().json(error_json("Match could not be deleted"));
    }
    flushed(&mut store, &serde_json::json!({ "deleted": true }))
}

#[get("/api/tournaments/{id}/standings")]
async fn api_standings(state: AppState, path: Path<IdPath<TournamentId>>) -> HttpResponse {
    match state.read() {
        Ok(store) => match store.standings(path.id) {
            Some(s) => HttpResponse::Ok().json(s),
            None => not_found("tournament"),
        },
        Err(_) => lock_error(),
    }
}

#[get("/api/tournaments/{id}/standings.csv")]
async fn api_standings_csv(state: AppState, path: Path<IdPath<TournamentId>>) -> HttpResponse {
    let standings = match state.read() {
        Ok(store) => match store.standings(path.id) {
            Some(s) => s,
            None => return not_found("tournament"),
        },
        Err(_) => return lock_error(),
    };
    match standings_csv(&standings) {
        Ok(csv) => HttpResponse::Ok().content_type("text/csv; charset=utf-8").body(csv),
        Err(e) => HttpResponse::InternalServerError().json(error_json(e)),
    }
}

#[get("/api/tournaments/{id}/finalists")]
async fn api_finalists(state: AppState, path: Path<IdPath<TournamentId>>) -> HttpResponse {
    match state.read() {
        Ok(store) => match store.finalists(path.id) {
            Some((first, second)) => HttpResponse::Ok().json(FinalistsResponse { first, second }),
            None => not_found("tournament"),
        },
        Err(_) => lock_error(),
    }
}

/// Record the grand final between the current top two (scoreA belongs to rank 1).
#[post("/api/tournaments/{id}/grand-final")]
async fn api_grand_final(state: AppState, path: Path<IdPath<TournamentId>>, body: Json<ScoreBody>) -> HttpResponse {
    let mut store = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match store.play_grand_final(path.id, body.team_a_score, body.team_b_score) {
        Ok(m) => flushed(&mut store, &m),
        Err(e) => domain_error(e),
    }
}

#[get("/api/tournaments/{id}/champion")]
async fn api_champion(state: AppState, path: Path<IdPath<TournamentId>>) -> HttpResponse {
    match state.read() {
        Ok(store) => match store.champion(path.id) {
            Some(team) => HttpResponse::Ok().json(team),
            None => not_found("champion"),
        },
        Err(_) => lock_error(),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn seed_demo_enabled() -> bool {
    std::env::var("SEED_DEMO")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let data_dir = std::env::var("DATA_DIR").unwrap_or_else(|_| default_data_dir());

    let mut store = Store::init(Box::new(FileStorage::new(&data_dir)))
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    if seed_demo_enabled() {
        match store.load_demo_data() {
            Ok(Some(id)) => log::info!("Seeded demo tournament {}", id),
            Ok(None) => log::info!("Store not empty, demo data skipped"),
            Err(e) => log::warn!("Demo data failed: {}", e),
        }
        store
            .flush()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    }

    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{} (data in {})", bind.0, bind.1, data_dir);

    let state = Data::new(RwLock::new(store));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_list_players)
            .service(api_create_player)
            .service(api_update_player)
            .service(api_delete_player)
            .service(api_list_teams)
            .service(api_create_team)
            .service(api_update_team)
            .service(api_delete_team)
            .service(api_list_tournaments)
            .service(api_current_tournament)
            .service(api_create_tournament)
            .service(api_get_tournament)
            .service(api_update_tournament)
            .service(api_delete_tournament)
            .service(api_add_team)
            .service(api_remove_team)
            .service(api_generate_matches)
            .service(api_list_matches)
            .service(api_create_match)
            .service(api_record_score)
            .service(api_delete_match)
            .service(api_standings)
            .service(api_standings_csv)
            .service(api_finalists)
            .service(api_grand_final)
            .service(api_champion)
    })
    .bind(bind)?
    .run()
    .await
}
