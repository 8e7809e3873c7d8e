//! Player CRUD endpoints.

use actix_web::{delete, get, patch, post, web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::Player;
use crate::db::player_repo;
use crate::http::auth::JwtAuth;
use crate::http::error::ApiError;
use crate::http::fmt_ts;
use crate::http::pagination::{envelope, PageParams};
use crate::validate;

//////////////////////////////////////////////////
// Representations
//////////////////////////////////////////////////

#[derive(Debug, Clone, Serialize)]
pub struct PlayerResponse {
    pub id: Uuid,
    pub nickname: String,
    pub profile_image: Option<String>,
    pub user: Option<Uuid>,
    pub created_at: String,
}

impl From<Player> for PlayerResponse {
    fn from(p: Player) -> Self {
        PlayerResponse {
            id: p.id,
            nickname: p.nickname,
            profile_image: p.profile_image,
            user: p.user_id,
            created_at: fmt_ts(p.created_at),
        }
    }
}

//////////////////////////////////////////////////
// Requests
//////////////////////////////////////////////////

#[derive(Deserialize)]
pub struct CreatePlayerRequest {
    pub nickname: String,
    #[serde(default)]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub user: Option<Uuid>,
}

/// Partial update: absent fields keep their stored value.
#[derive(Deserialize)]
pub struct UpdatePlayerRequest {
    pub nickname: Option<String>,
    pub profile_image: Option<String>,
}

fn validate_player_fields(nickname: &str, profile_image: Option<&str>) -> Result<(), ApiError> {
    validate::nickname(nickname)?;
    if let Some(image) = profile_image {
        validate::profile_image(image)?;
    }
    Ok(())
}

//////////////////////////////////////////////////
// Handlers
//////////////////////////////////////////////////

/// GET /api/players
#[get("/players")]
pub async fn list(
    req: HttpRequest,
    web::Query(params): web::Query<PageParams>,
    db: web::Data<PgPool>,
    _auth: JwtAuth,
) -> Result<HttpResponse, ApiError> {
    let page = params.resolve();
    let players = player_repo::list(&db, page.limit(), page.offset()).await?;
    let count = player_repo::count(&db).await?;
    let results: Vec<PlayerResponse> = players.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(envelope(req.path(), page, count, results)))
}

/// POST /api/players
#[post("/players")]
pub async fn create(
    info: web::Json<CreatePlayerRequest>,
    db: web::Data<PgPool>,
    _auth: JwtAuth,
) -> Result<HttpResponse, ApiError> {
    validate_player_fields(&info.nickname, info.profile_image.as_deref())?;
    let player = player_repo::create(
        &db,
        info.user,
        &info.nickname,
        info.profile_image.as_deref(),
    )
    .await?;
    Ok(HttpResponse::Created().json(PlayerResponse::from(player)))
}

/// GET /api/players/{id}
#[get("/players/{id}")]
pub async fn detail(
    path: web::Path<Uuid>,
    db: web::Data<PgPool>,
    _auth: JwtAuth,
) -> Result<HttpResponse, ApiError> {
    let player = player_repo::get(&db, path.into_inner())
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(HttpResponse::Ok().json(PlayerResponse::from(player)))
}

/// PATCH /api/players/{id}
#[patch("/players/{id}")]
pub async fn update(
    path: web::Path<Uuid>,
    info: web::Json<UpdatePlayerRequest>,
    db: web::Data<PgPool>,
    _auth: JwtAuth,
) -> Result<HttpResponse, ApiError> {
    let mut player = player_repo::get(&db, path.into_inner())
        .await?
        .ok_or(ApiError::NotFound)?;

    if let Some(nickname) = &info.nickname {
        player.nickname = nickname.clone();
    }
    if let Some(image) = &info.profile_image {
        player.profile_image = Some(image.clone());
    }
    validate_player_fields(&player.nickname, player.profile_image.as_deref())?;

    player_repo::update(&db, &player).await?;
    Ok(HttpResponse::Ok().json(PlayerResponse::from(player)))
}

/// DELETE /api/players/{id} — dependent stats cascade away with the row.
#[delete("/players/{id}")]
pub async fn remove(
    path: web::Path<Uuid>,
    db: web::Data<PgPool>,
    _auth: JwtAuth,
) -> Result<HttpResponse, ApiError> {
    let removed = player_repo::delete(&db, path.into_inner()).await?;
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
