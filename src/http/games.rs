//! Game CRUD endpoints. Representations embed full player objects for
//! `players` and `winner` rather than bare ids.

use actix_web::{delete, get, patch, post, web, HttpRequest, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::Game;
use crate::db::{game_repo, player_repo};
use crate::http::auth::{AdminAuth, JwtAuth};
use crate::http::error::ApiError;
use crate::http::fmt_ts;
use crate::http::pagination::{envelope, PageParams};
use crate::http::players::PlayerResponse;
use crate::validate;

//////////////////////////////////////////////////
// Representations
//////////////////////////////////////////////////

#[derive(Serialize)]
pub struct GameResponse {
    pub id: Uuid,
    pub players: Vec<PlayerResponse>,
    pub winner: Option<PlayerResponse>,
    pub start_timestamp: String,
    pub finish_timestamp: Option<String>,
}

async fn to_response(db: &PgPool, game: Game) -> Result<GameResponse, ApiError> {
    let ids = game_repo::player_ids(db, game.id).await?;
    let players: Vec<PlayerResponse> = player_repo::get_many(db, &ids)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    let winner = match game.winner_id {
        Some(wid) => player_repo::get(db, wid).await?.map(Into::into),
        None => None,
    };
    Ok(GameResponse {
        id: game.id,
        players,
        winner,
        start_timestamp: fmt_ts(game.start_timestamp),
        finish_timestamp: game.finish_timestamp.map(fmt_ts),
    })
}

//////////////////////////////////////////////////
// Requests
//////////////////////////////////////////////////

#[derive(Deserialize)]
pub struct CreateGameRequest {
    #[serde(default)]
    pub players: Vec<Uuid>,
    #[serde(default)]
    pub winner: Option<Uuid>,
}

/// Partial update: absent fields keep their stored value; an explicit
/// `null` clears the nullable ones.
#[derive(Deserialize)]
pub struct UpdateGameRequest {
    pub players: Option<Vec<Uuid>>,
    #[serde(default, with = "serde_with::rust::double_option")]
    pub winner: Option<Option<Uuid>>,
    #[serde(default, with = "serde_with::rust::double_option")]
    pub finish_timestamp: Option<Option<DateTime<Utc>>>,
}

/// All referenced players must exist.
async fn check_players_exist(db: &PgPool, ids: &[Uuid]) -> Result<(), ApiError> {
    let found = player_repo::get_many(db, ids).await?;
    if found.len() != ids.len() {
        return Err(ApiError::validation("players", "Unknown player id."));
    }
    Ok(())
}

//////////////////////////////////////////////////
// Handlers
//////////////////////////////////////////////////

/// GET /api/games
#[get("/games")]
pub async fn list(
    req: HttpRequest,
    web::Query(params): web::Query<PageParams>,
    db: web::Data<PgPool>,
    _auth: JwtAuth,
) -> Result<HttpResponse, ApiError> {
    let page = params.resolve();
    let games = game_repo::list(&db, page.limit(), page.offset()).await?;
    let count = game_repo::count(&db).await?;
    let mut results = Vec::with_capacity(games.len());
    for game in games {
        results.push(to_response(&db, game).await?);
    }
    Ok(HttpResponse::Ok().json(envelope(req.path(), page, count, results)))
}

/// POST /api/games
#[post("/games")]
pub async fn create(
    info: web::Json<CreateGameRequest>,
    db: web::Data<PgPool>,
    _auth: JwtAuth,
) -> Result<HttpResponse, ApiError> {
    validate::winner_in_players(&info.players, info.winner)?;
    check_players_exist(&db, &info.players).await?;

    let game = game_repo::create(&db, &info.players, info.winner).await?;
    let body = to_response(&db, game).await?;
    Ok(HttpResponse::Created().json(body))
}

/// GET /api/games/{id}
#[get("/games/{id}")]
pub async fn detail(
    path: web::Path<Uuid>,
    db: web::Data<PgPool>,
    _auth: JwtAuth,
) -> Result<HttpResponse, ApiError> {
    let game = game_repo::get(&db, path.into_inner())
        .await?
        .ok_or(ApiError::NotFound)?;
    let body = to_response(&db, game).await?;
    Ok(HttpResponse::Ok().json(body))
}

/// PATCH /api/games/{id}
#[patch("/games/{id}")]
pub async fn update(
    path: web::Path<Uuid>,
    info: web::Json<UpdateGameRequest>,
    db: web::Data<PgPool>,
    _auth: JwtAuth,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let game = game_repo::get(&db, id).await?.ok_or(ApiError::NotFound)?;

    let effective_players = match &info.players {
        Some(players) => {
            check_players_exist(&db, players).await?;
            players.clone()
        }
        None => game_repo::player_ids(&db, id).await?,
    };
    let winner = match info.winner {
        Some(change) => change,
        None => game.winner_id,
    };
    validate::winner_in_players(&effective_players, winner)?;

    let finish = match info.finish_timestamp {
        Some(change) => change,
        None => game.finish_timestamp,
    };
    if let Some(finish) = finish {
        validate::finish_after_start(game.start_timestamp, finish)?;
    }

    game_repo::update(&db, id, info.players.as_deref(), winner, finish).await?;

    let game = game_repo::get(&db, id).await?.ok_or(ApiError::NotFound)?;
    let body = to_response(&db, game).await?;
    Ok(HttpResponse::Ok().json(body))
}

/// DELETE /api/games/{id} — admin only; dependent stats cascade away.
#[delete("/games/{id}")]
pub async fn remove(
    path: web::Path<Uuid>,
    db: web::Data<PgPool>,
    _auth: AdminAuth,
) -> Result<HttpResponse, ApiError> {
    let removed = game_repo::delete(&db, path.into_inner()).await?;
    if removed == 0 {
        return Err(ApiError::NotFound);
    }
    Ok(HttpResponse::NoContent().finish())
}

//////////////////////////////////////////////////
// Mount
//////////////////////////////////////////////////
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list)
        .service(create)
        .service(detail)
        .service(update)
        .service(remove);
}
