use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: Option<String>,
    pub password_hash: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct Player {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub nickname: String,
    pub profile_image: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct Game {
    pub id: Uuid,
    pub winner_id: Option<Uuid>,
    pub start_timestamp: DateTime<Utc>,
    pub finish_timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, FromRow)]
pub struct Stat {
    pub id: Uuid,
    pub player_id: Uuid,
    pub game_id: Option<Uuid>,
    pub score: Option<i32>,
    pub created_at: DateTime<Utc>,
}
