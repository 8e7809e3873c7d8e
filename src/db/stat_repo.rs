use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::Stat;
use crate::report::ScoreRow;

pub async fn create(
    db: &PgPool,
    player_id: Uuid,
    game_id: Option<Uuid>,
    score: Option<i32>,
) -> Result<Stat> {
    let stat = sqlx::query_as::<_, Stat>(
        r#"INSERT INTO stats (player_id, game_id, score)
           VALUES ($1, $2, $3)
           RETURNING id, player_id, game_id, score, created_at"#,
    )
    .bind(player_id)
    .bind(game_id)
    .bind(score)
    .fetch_one(db)
    .await?;
    Ok(stat)
}

pub async fn get(db: &PgPool, id: Uuid) -> Result<Option<Stat>> {
    let stat = sqlx::query_as::<_, Stat>(
        "SELECT id, player_id, game_id, score, created_at FROM stats WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(stat)
}

pub async fn list(db: &PgPool, limit: i64, offset: i64) -> Result<Vec<Stat>> {
    let stats = sqlx::query_as::<_, Stat>(
        r#"SELECT id, player_id, game_id, score, created_at
             FROM stats
            ORDER BY created_at, id
            LIMIT $1 OFFSET $2"#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await?;
    Ok(stats)
}

pub async fn count(db: &PgPool) -> Result<i64> {
    let n = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM stats")
        .fetch_one(db)
        .await?;
    Ok(n)
}

/// Stores an already-validated, fully-resolved row.
pub async fn update(db: &PgPool, stat: &Stat) -> Result<()> {
    sqlx::query(
        r#"UPDATE stats
              SET player_id = $2, game_id = $3, score = $4
            WHERE id = $1"#,
    )
    .bind(stat.id)
    .bind(stat.player_id)
    .bind(stat.game_id)
    .bind(stat.score)
    .execute(db)
    .await?;
    Ok(())
}

pub async fn delete(db: &PgPool, id: Uuid) -> Result<u64> {
    let done = sqlx::query("DELETE FROM stats WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(done.rows_affected())
}

/// Highest-scoring stats with the owning player's nickname, best first.
/// Unscored rows are excluded; ties resolve by creation order.
pub async fn top_scores(db: &PgPool, limit: i64) -> Result<Vec<ScoreRow>> {
    let rows = sqlx::query_as::<_, (String, i32)>(
        r#"SELECT p.nickname, s.score
             FROM stats s
             JOIN players p ON p.id = s.player_id
            WHERE s.score IS NOT NULL
            ORDER BY s.score DESC, s.created_at
            LIMIT $1"#,
    )
    .bind(limit)
    .fetch_all(db)
    .await?;
    Ok(rows
        .into_iter()
        .map(|(nickname, score)| ScoreRow { nickname, score })
        .collect())
}
