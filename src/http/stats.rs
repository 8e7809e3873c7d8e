//! Stat CRUD endpoints plus the top-scores ranking report.

use actix_web::{delete, get, patch, post, web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::settings;
use crate::db::models::Stat;
use crate::db::{game_repo, player_repo, stat_repo};
use crate::http::auth::{AdminAuth, JwtAuth};
use crate::http::error::ApiError;
use crate::http::fmt_ts;
use crate::http::pagination::{envelope, PageParams};
use crate::http::players::PlayerResponse;
use crate::report;
use crate::validate;

//////////////////////////////////////////////////
// Representations
//////////////////////////////////////////////////

#[derive(Serialize)]
pub struct StatResponse {
    pub id: Uuid,
    pub player: PlayerResponse,
    pub game: Option<Uuid>,
    pub score: Option<i32>,
    pub creation_date: String,
}

async fn to_response(db: &PgPool, stat: Stat) -> Result<StatResponse, ApiError> {
    let player = player_repo::get(db, stat.player_id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(StatResponse {
        id: stat.id,
        player: player.into(),
        game: stat.game_id,
        score: stat.score,
        creation_date: fmt_ts(stat.created_at),
    })
}

//////////////////////////////////////////////////
// Requests
//////////////////////////////////////////////////

#[derive(Deserialize)]
pub struct CreateStatRequest {
    pub player: Uuid,
    #[serde(default)]
    pub game: Option<Uuid>,
    #[serde(default)]
    pub score: Option<i32>,
}

/// Partial update: absent fields keep their stored value; an explicit
/// `null` detaches the game.
#[derive(Deserialize)]
pub struct UpdateStatRequest {
    pub player: Option<Uuid>,
    #[serde(default, with = "serde_with::rust::double_option")]
    pub game: Option<Option<Uuid>>,
    pub score: Option<i32>,
}

/// Resolves the game's current participants and applies the membership rule.
async fn check_membership(db: &PgPool, game: Option<Uuid>, player: Uuid) -> Result<(), ApiError> {
    if let Some(game_id) = game {
        if game_repo::get(db, game_id).await?.is_none() {
            return Err(ApiError::validation("game", "Unknown game id."));
        }
        let members = game_repo::player_ids(db, game_id).await?;
        validate::stat_player_in_game(&members, player)?;
    }
    Ok(())
}

//////////////////////////////////////////////////
// Handlers
//////////////////////////////////////////////////

/// GET /api/stats
#[get("/stats")]
pub async fn list(
    req: HttpRequest,
    web::Query(params): web::Query<PageParams>,
    db: web::Data<PgPool>,
    _auth: JwtAuth,
) -> Result<HttpResponse, ApiError> {
    let page = params.resolve();
    let stats = stat_repo::list(&db, page.limit(), page.offset()).await?;
    let count = stat_repo::count(&db).await?;
    let mut results = Vec::with_capacity(stats.len());
    for stat in stats {
        results.push(to_response(&db, stat).await?);
    }
    Ok(HttpResponse::Ok().json(envelope(req.path(), page, count, results)))
}

/// POST /api/stats
#[post("/stats")]
pub async fn create(
    info: web::Json<CreateStatRequest>,
    db: web::Data<PgPool>,
    _auth: JwtAuth,
) -> Result<HttpResponse, ApiError> {
    if let Some(score) = info.score {
        validate::score(score)?;
    }
    if player_repo::get(&db, info.player).await?.is_none() {
        return Err(ApiError::validation("player", "Unknown player id."));
    }
    check_membership(&db, info.game, info.player).await?;

    let stat = stat_repo::create(&db, info.player, info.game, info.score).await?;
    let body = to_response(&db, stat).await?;
    Ok(HttpResponse::Created().json(body))
}

//////////////////////////////////////////////////
// GET /api/stats/ranking
//////////////////////////////////////////////////

#[derive(Deserialize)]
pub struct RankingQuery {
    pub format: Option<String>,
}

pub fn negotiated_format(req: &HttpRequest, query: &RankingQuery) -> String {
    if let Some(f) = &query.format {
        return f.to_ascii_lowercase();
    }
    let accept = req
        .headers()
        .get("Accept")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    if accept.contains("text/html") {
        "html".into()
    } else if accept.contains("text/csv") {
        "csv".into()
    } else {
        "json".into()
    }
}

/// Builds the downloadable-attachment response for the CSV encoding.
pub fn csv_response(entries: &[report::RankingEntry]) -> Result<HttpResponse, ApiError> {
    let body = report::to_csv(entries)?;
    Ok(HttpResponse::Ok()
        .content_type("text/csv")
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", report::CSV_FILENAME),
        ))
        .body(body))
}

/// Top scores in JSON, HTML, or CSV, per the `format` query parameter.
#[get("/stats/ranking")]
pub async fn ranking(
    req: HttpRequest,
    web::Query(query): web::Query<RankingQuery>,
    db: web::Data<PgPool>,
    _auth: JwtAuth,
) -> Result<HttpResponse, ApiError> {
    let limit = settings().ranking_limit;
    let rows = stat_repo::top_scores(&db, limit).await?;
    let entries = report::rank(&rows, limit.max(0) as usize);

    match negotiated_format(&req, &query).as_str() {
        "json" => Ok(HttpResponse::Ok().json(entries)),
        "html" => Ok(HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(report::to_html(&entries))),
        "csv" => csv_response(&entries),
        other => Err(ApiError::validation(
            "format",
            format!("Unknown format {other:?}; expected json, html, or csv."),
        )),
    }
}

/// GET /api/stats/{id}
#[get("/stats/{id}")]
pub async fn detail(
    path: web::Path<Uuid>,
    db: web::Data<PgPool>,
    _auth: JwtAuth,
) -> Result<HttpResponse, ApiError> {
    let stat = stat_repo::get(&db, path.into_inner())
        .await?
        .ok_or(ApiError::NotFound)?;
    let body = to_response(&db, stat).await?;
    Ok(HttpResponse::Ok().json(body))
}

/// PATCH /api/stats/{id}
#[patch("/stats/{id}")]
pub async fn update(
    path: web::Path<Uuid>,
    info: web::Json<UpdateStatRequest>,
    db: web::Data<PgPool>,
    _auth: JwtAuth,
) -> Result<HttpResponse, ApiError> {
    let mut stat = stat_repo::get(&db, path.into_inner())
        .await?
        .ok_or(ApiError::NotFound)?;

    if let Some(player) = info.player {
        if player_repo::get(&db, player).await?.is_none() {
            return Err(ApiError::validation("player", "Unknown player id."));
        }
        stat.player_id = player;
    }
    if let Some(change) = info.game {
        stat.game_id = change;
    }
    if let Some(score) = info.score {
        validate::score(score)?;
        stat.score = Some(score);
    }
    check_membership(&db, stat.game_id, stat.player_id).await?;

    stat_repo::update(&db, &stat).await?;
    let body = to_response(&db, stat).await?;
    Ok(HttpResponse::Ok().json(body))
}

/// DELETE /api/stats/{id} — admin only.
#[delete("/stats/{id}")]
pub async fn remove(
    path: web::Path<Uuid>,
    db: web::Data<PgPool>,
    _auth: AdminAuth,
) -> Result<HttpResponse, ApiError> {
    let removed = stat_repo::delete(&db, path.into_inner()).await?;
    if removed == 0 {
        return Err(ApiError::NotFound);
    }
    Ok(HttpResponse::NoContent().finish())
}

//////////////////////////////////////////////////
// Mount
//////////////////////////////////////////////////
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    // `ranking` is registered before `detail` so the literal path wins
    // over the `{id}` match.
    cfg.service(list)
        .service(create)
        .service(ranking)
        .service(detail)
        .service(update)
        .service(remove);
}
