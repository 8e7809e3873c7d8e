//! User management. Self-registration lives in `http::auth`; creating
//! users with an explicit admin flag, and deleting users, is admin-only.

use actix_web::{delete, get, patch, post, web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::User;
use crate::db::user_repo;
use crate::http::auth::{self, AdminAuth, JwtAuth};
use crate::http::error::ApiError;
use crate::http::fmt_ts;
use crate::http::pagination::{envelope, PageParams};
use crate::validate;

//////////////////////////////////////////////////
// Representations
//////////////////////////////////////////////////

/// Public user shape; the password hash never leaves the database layer.
#[derive(Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: Option<String>,
    pub is_admin: bool,
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        UserResponse {
            id: u.id,
            username: u.username,
            email: u.email,
            is_admin: u.is_admin,
            created_at: fmt_ts(u.created_at),
        }
    }
}

//////////////////////////////////////////////////
// Requests
//////////////////////////////////////////////////

#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    pub password: String,
    #[serde(default)]
    pub is_admin: bool,
}

/// Partial update: absent fields keep their stored value; an explicit
/// `null` clears the email.
#[derive(Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default, with = "serde_with::rust::double_option")]
    pub email: Option<Option<String>>,
    pub password: Option<String>,
}

//////////////////////////////////////////////////
// Handlers
//////////////////////////////////////////////////

/// GET /api/users
#[get("/users")]
pub async fn list(
    req: HttpRequest,
    web::Query(params): web::Query<PageParams>,
    db: web::Data<PgPool>,
    _auth: JwtAuth,
) -> Result<HttpResponse, ApiError> {
    let page = params.resolve();
    let users = user_repo::list(&db, page.limit(), page.offset()).await?;
    let count = user_repo::count(&db).await?;
    let results: Vec<UserResponse> = users.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(envelope(req.path(), page, count, results)))
}

/// POST /api/users — admin only (use /signup for self-registration).
#[post("/users")]
pub async fn create(
    info: web::Json<CreateUserRequest>,
    db: web::Data<PgPool>,
    _auth: AdminAuth,
) -> Result<HttpResponse, ApiError> {
    validate::username(&info.username)?;
    if info.password.is_empty() {
        return Err(ApiError::validation("password", "Password may not be blank."));
    }

    let hash = auth::hash_password(&info.password)?;
    let user = match user_repo::create(
        &db,
        &info.username,
        info.email.as_deref(),
        &hash,
        info.is_admin,
    )
    .await
    {
        Ok(u) => u,
        Err(sqlx::Error::Database(db_err)) if db_err.code().as_deref() == Some("23505") => {
            return Err(ApiError::validation(
                "username",
                "A user with that username already exists.",
            ))
        }
        Err(e) => return Err(e.into()),
    };

    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// GET /api/users/{id}
#[get("/users/{id}")]
pub async fn detail(
    path: web::Path<Uuid>,
    db: web::Data<PgPool>,
    _auth: JwtAuth,
) -> Result<HttpResponse, ApiError> {
    let user = user_repo::get(&db, path.into_inner())
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

/// PATCH /api/users/{id} — a user may edit themselves; admins anyone.
#[patch("/users/{id}")]
pub async fn update(
    path: web::Path<Uuid>,
    info: web::Json<UpdateUserRequest>,
    db: web::Data<PgPool>,
    caller: JwtAuth,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    if caller.user_id != id && !caller.is_admin {
        return Err(ApiError::Forbidden);
    }

    let mut user = user_repo::get(&db, id).await?.ok_or(ApiError::NotFound)?;
    if let Some(change) = &info.email {
        user.email = change.clone();
    }
    if let Some(password) = &info.password {
        if password.is_empty() {
            return Err(ApiError::validation("password", "Password may not be blank."));
        }
        user.password_hash = auth::hash_password(password)?;
    }

    user_repo::update(&db, &user).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

/// DELETE /api/users/{id} — admin only.
#[delete("/users/{id}")]
pub async fn remove(
    path: web::Path<Uuid>,
    db: web::Data<PgPool>,
    _auth: AdminAuth,
) -> Result<HttpResponse, ApiError> {
    let removed = user_repo::delete(&db, path.into_inner()).await?;
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
