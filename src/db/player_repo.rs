use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::Player;

pub async fn create(
    db: &PgPool,
    user_id: Option<Uuid>,
    nickname: &str,
    profile_image: Option<&str>,
) -> Result<Player> {
    let player = sqlx::query_as::<_, Player>(
        r#"INSERT INTO players (user_id, nickname, profile_image)
           VALUES ($1, $2, $3)
           RETURNING id, user_id, nickname, profile_image, created_at"#,
    )
    .bind(user_id)
    .bind(nickname)
    .bind(profile_image)
    .fetch_one(db)
    .await?;
    Ok(player)
}

pub async fn get(db: &PgPool, id: Uuid) -> Result<Option<Player>> {
    let player = sqlx::query_as::<_, Player>(
        "SELECT id, user_id, nickname, profile_image, created_at FROM players WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(player)
}

pub async fn list(db: &PgPool, limit: i64, offset: i64) -> Result<Vec<Player>> {
    let players = sqlx::query_as::<_, Player>(
        r#"SELECT id, user_id, nickname, profile_image, created_at
             FROM players
            ORDER BY created_at, id
            LIMIT $1 OFFSET $2"#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await?;
    Ok(players)
}

pub async fn count(db: &PgPool) -> Result<i64> {
    let n = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM players")
        .fetch_one(db)
        .await?;
    Ok(n)
}

/// Stores an already-validated, fully-resolved row.
pub async fn update(db: &PgPool, player: &Player) -> Result<()> {
    sqlx::query(
        r#"UPDATE players
              SET user_id = $2, nickname = $3, profile_image = $4
            WHERE id = $1"#,
    )
    .bind(player.id)
    .bind(player.user_id)
    .bind(&player.nickname)
    .bind(&player.profile_image)
    .execute(db)
    .await?;
    Ok(())
}

/// Returns the number of rows removed (0 when the id is unknown).
/// Dependent stats and game memberships go with the player (schema cascade).
pub async fn delete(db: &PgPool, id: Uuid) -> Result<u64> {
    let done = sqlx::query("DELETE FROM players WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(done.rows_affected())
}

/// Fetches several players preserving the order of `ids`.
pub async fn get_many(db: &PgPool, ids: &[Uuid]) -> Result<Vec<Player>> {
    let rows = sqlx::query_as::<_, Player>(
        r#"SELECT id, user_id, nickname, profile_image, created_at
             FROM players
            WHERE id = ANY($1)"#,
    )
    .bind(ids)
    .fetch_all(db)
    .await?;
    let mut ordered = Vec::with_capacity(ids.len());
    for id in ids {
        if let Some(p) = rows.iter().find(|p| p.id == *id) {
            ordered.push(p.clone());
        }
    }
    Ok(ordered)
}
