//! Bearer-token authentication: signup, login, and the extractors the
//! resource handlers gate on.

use actix_web::{post, web, HttpResponse};
use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::env;

use crate::config::settings;
use crate::db::models::User;
use crate::db::user_repo;
use crate::http::error::ApiError;
use crate::http::users::UserResponse;
use crate::validate;

//////////////////////////////////////////////////
// Data structs
//////////////////////////////////////////////////

#[derive(Deserialize)]
pub struct SignupRequest {
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String, // user_id
    adm: bool,   // admin flag
    exp: usize,
}

#[derive(Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: i64,
}

//////////////////////////////////////////////////
// Password hashing
//////////////////////////////////////////////////

pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("password hashing failed: {e}")))?;
    Ok(hash.to_string())
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .and_then(|parsed| Argon2::default().verify_password(password.as_bytes(), &parsed))
        .is_ok()
}

//////////////////////////////////////////////////
// Extractors
//////////////////////////////////////////////////

pub mod extractor {
    use super::Claims;
    use actix_web::{dev::Payload, FromRequest, HttpRequest};
    use futures_util::future::{ready, Ready};
    use jsonwebtoken::{decode, DecodingKey, Validation};
    use std::env;
    use uuid::Uuid;

    use crate::http::error::ApiError;

    fn claims_from(req: &HttpRequest) -> Result<Claims, ApiError> {
        let hdr = req
            .headers()
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::Unauthorized("missing Authorization header"))?;

        let token = hdr
            .strip_prefix("Bearer ")
            .ok_or(ApiError::Unauthorized("malformed Authorization header"))?;

        let secret =
            env::var("JWT_SECRET").map_err(|_| ApiError::Unauthorized("server mis-config"))?;
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| ApiError::Unauthorized("invalid / expired token"))?;

        Ok(data.claims)
    }

    /// Extracts and validates a Bearer-JWT, exposing the caller's user id.
    #[derive(Debug, Clone)]
    pub struct JwtAuth {
        pub user_id: Uuid,
        pub is_admin: bool,
    }

    impl FromRequest for JwtAuth {
        type Error = ApiError;
        type Future = Ready<Result<Self, Self::Error>>;

        fn from_request(req: &HttpRequest, _pl: &mut Payload) -> Self::Future {
            let res = claims_from(req).and_then(|claims| {
                let user_id = Uuid::parse_str(&claims.sub)
                    .map_err(|_| ApiError::Unauthorized("bad sub"))?;
                Ok(JwtAuth {
                    user_id,
                    is_admin: claims.adm,
                })
            });
            ready(res)
        }
    }

    /// As [`JwtAuth`], but rejects callers without the admin claim.
    #[derive(Debug, Clone)]
    pub struct AdminAuth {
        pub user_id: Uuid,
    }

    impl FromRequest for AdminAuth {
        type Error = ApiError;
        type Future = Ready<Result<Self, Self::Error>>;

        fn from_request(req: &HttpRequest, _pl: &mut Payload) -> Self::Future {
            let res = claims_from(req).and_then(|claims| {
                if !claims.adm {
                    return Err(ApiError::Forbidden);
                }
                let user_id = Uuid::parse_str(&claims.sub)
                    .map_err(|_| ApiError::Unauthorized("bad sub"))?;
                Ok(AdminAuth { user_id })
            });
            ready(res)
        }
    }
}
pub use extractor::{AdminAuth, JwtAuth};

//////////////////////////////////////////////////
// Token issuing
//////////////////////////////////////////////////

fn issue_token(user: &User) -> Result<TokenResponse, ApiError> {
    let secret = env::var("JWT_SECRET")
        .map_err(|_| ApiError::Internal(anyhow::anyhow!("JWT_SECRET must be set")))?;
    let ttl = settings().token_ttl;
    let exp = Utc::now()
        .checked_add_signed(Duration::seconds(ttl))
        .ok_or_else(|| ApiError::Internal(anyhow::anyhow!("token expiry overflow")))?
        .timestamp() as usize;
    let claims = Claims {
        sub: user.id.to_string(),
        adm: user.is_admin,
        exp,
    };
    let access_token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(anyhow::anyhow!("JWT encode failed: {e}")))?;

    Ok(TokenResponse {
        access_token,
        expires_in: ttl,
    })
}

//////////////////////////////////////////////////
// POST /api/signup
//////////////////////////////////////////////////
#[post("/signup")]
pub async fn signup(
    info: web::Json<SignupRequest>,
    db: web::Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    validate::username(&info.username)?;
    if info.password.is_empty() {
        return Err(ApiError::validation("password", "Password may not be blank."));
    }

    let hash = hash_password(&info.password)?;
    let user = match user_repo::create(&db, &info.username, info.email.as_deref(), &hash, false)
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

//////////////////////////////////////////////////
// POST /api/login
//////////////////////////////////////////////////
#[post("/login")]
pub async fn login(
    info: web::Json<LoginRequest>,
    db: web::Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    let user = user_repo::find_by_username(&db, &info.username)
        .await?
        .ok_or(ApiError::Unauthorized("invalid username or password"))?;

    if !verify_password(&info.password, &user.password_hash) {
        return Err(ApiError::Unauthorized("invalid username or password"));
    }

    Ok(HttpResponse::Ok().json(issue_token(&user)?))
}

//////////////////////////////////////////////////
// Mount
//////////////////////////////////////////////////
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(signup).service(login);
}
