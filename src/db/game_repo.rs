use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::Game;

pub async fn create(db: &PgPool, players: &[Uuid], winner: Option<Uuid>) -> Result<Game> {
    let mut tx = db.begin().await?;

    let game = sqlx::query_as::<_, Game>(
        r#"INSERT INTO games (winner_id)
           VALUES ($1)
           RETURNING id, winner_id, start_timestamp, finish_timestamp"#,
    )
    .bind(winner)
    .fetch_one(&mut *tx)
    .await?;

    for pid in players {
        sqlx::query(
            "INSERT INTO game_players (game_id, player_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(game.id)
        .bind(pid)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(game)
}

pub async fn get(db: &PgPool, id: Uuid) -> Result<Option<Game>> {
    let game = sqlx::query_as::<_, Game>(
        "SELECT id, winner_id, start_timestamp, finish_timestamp FROM games WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(game)
}

pub async fn list(db: &PgPool, limit: i64, offset: i64) -> Result<Vec<Game>> {
    let games = sqlx::query_as::<_, Game>(
        r#"SELECT id, winner_id, start_timestamp, finish_timestamp
             FROM games
            ORDER BY start_timestamp, id
            LIMIT $1 OFFSET $2"#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await?;
    Ok(games)
}

pub async fn count(db: &PgPool) -> Result<i64> {
    let n = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM games")
        .fetch_one(db)
        .await?;
    Ok(n)
}

/// Participant ids of a game, in join order.
pub async fn player_ids(db: &PgPool, game_id: Uuid) -> Result<Vec<Uuid>> {
    let ids = sqlx::query_scalar::<_, Uuid>(
        "SELECT player_id FROM game_players WHERE game_id = $1",
    )
    .bind(game_id)
    .fetch_all(db)
    .await?;
    Ok(ids)
}

/// Replaces the participant set and stores the updated scalar columns.
pub async fn update(
    db: &PgPool,
    id: Uuid,
    players: Option<&[Uuid]>,
    winner: Option<Uuid>,
    finish_timestamp: Option<DateTime<Utc>>,
) -> Result<()> {
    let mut tx = db.begin().await?;

    if let Some(players) = players {
        sqlx::query("DELETE FROM game_players WHERE game_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        for pid in players {
            sqlx::query(
                "INSERT INTO game_players (game_id, player_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
            )
            .bind(id)
            .bind(pid)
            .execute(&mut *tx)
            .await?;
        }
    }

    sqlx::query("UPDATE games SET winner_id = $2, finish_timestamp = $3 WHERE id = $1")
        .bind(id)
        .bind(winner)
        .bind(finish_timestamp)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}

/// Returns the number of rows removed. Stats referencing the game go
/// with it (schema cascade).
pub async fn delete(db: &PgPool, id: Uuid) -> Result<u64> {
    let done = sqlx::query("DELETE FROM games WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(done.rows_affected())
}
