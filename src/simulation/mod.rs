//! Periodic demo-data seeding: every run fetches random profiles from
//! randomuser.me and inserts players, one game, and one stat inside a
//! single transaction. A failed run rolls back, logs, and waits for the
//! next tick.

use anyhow::{Context, Result};
use rand::Rng;
use serde_json::Value;
use sqlx::PgPool;
use tokio::time::{sleep, Duration};
use tokio_retry::strategy::{jitter, ExponentialBackoff};
use tokio_retry::Retry;
use uuid::Uuid;

use crate::config::settings;

//////////////////////////////////////////////////
// Random-user client
//////////////////////////////////////////////////

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RandomProfile {
    pub nickname: String,
    pub profile_image: String,
}

/// Extracts a profile from a randomuser.me response body.
pub fn parse_profile(body: &Value) -> Result<RandomProfile> {
    let result = body
        .get("results")
        .and_then(|r| r.get(0))
        .context("randomuser payload missing results[0]")?;
    let nickname = result
        .pointer("/login/username")
        .and_then(Value::as_str)
        .context("randomuser payload missing login.username")?;
    let profile_image = result
        .pointer("/picture/large")
        .and_then(Value::as_str)
        .context("randomuser payload missing picture.large")?;
    Ok(RandomProfile {
        nickname: nickname.to_string(),
        profile_image: profile_image.to_string(),
    })
}

pub struct RandomUserClient {
    http: reqwest::Client,
    url: String,
}

impl RandomUserClient {
    pub fn new() -> Self {
        RandomUserClient {
            http: reqwest::Client::new(),
            url: settings().random_user_url.clone(),
        }
    }

    pub async fn fetch_profile(&self) -> Result<RandomProfile> {
        let strategy = ExponentialBackoff::from_millis(200).map(jitter).take(3);
        let body = Retry::spawn(strategy, || async {
            let resp = self.http.get(&self.url).send().await?;
            resp.error_for_status()?.json::<Value>().await
        })
        .await
        .context("randomuser.me request failed")?;
        parse_profile(&body)
    }
}

impl Default for RandomUserClient {
    fn default() -> Self {
        Self::new()
    }
}

//////////////////////////////////////////////////
// Run planning (pure, tested without a database)
//////////////////////////////////////////////////

#[derive(Debug, PartialEq, Eq)]
pub enum StatSubject {
    /// Index into the run's generated players.
    Generated(usize),
    /// Fresh player created just for the stat (zero-player runs).
    Fresh(RandomProfile),
}

#[derive(Debug)]
pub struct RunPlan {
    pub profiles: Vec<RandomProfile>,
    /// Index of the winning player, when any were generated.
    pub winner: Option<usize>,
    pub stat_subject: StatSubject,
    pub stat_score: i32,
    /// The stat references the game only when its player participates.
    pub link_stat_to_game: bool,
}

/// Decides one run from the fetched profiles. `fallback` is used for the
/// stat's player when no players were generated; it is ignored otherwise.
pub fn plan_run<R: Rng + ?Sized>(
    rng: &mut R,
    profiles: Vec<RandomProfile>,
    fallback: RandomProfile,
) -> RunPlan {
    let (winner, stat_subject, link_stat_to_game) = if profiles.is_empty() {
        (None, StatSubject::Fresh(fallback), false)
    } else {
        (
            Some(rng.random_range(0..profiles.len())),
            StatSubject::Generated(rng.random_range(0..profiles.len())),
            true,
        )
    };
    RunPlan {
        profiles,
        winner,
        stat_subject,
        stat_score: rng.random_range(0..=100),
        link_stat_to_game,
    }
}

//////////////////////////////////////////////////
// Execution
//////////////////////////////////////////////////

#[derive(Debug)]
pub struct RunSummary {
    pub players: usize,
    pub game_id: Uuid,
    pub stat_id: Uuid,
}

async fn get_or_create_player(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    profile: &RandomProfile,
) -> Result<Uuid> {
    let existing = sqlx::query_scalar::<_, Uuid>(
        "SELECT id FROM players WHERE nickname = $1 AND profile_image = $2",
    )
    .bind(&profile.nickname)
    .bind(&profile.profile_image)
    .fetch_optional(&mut **tx)
    .await?;
    if let Some(id) = existing {
        return Ok(id);
    }
    let id = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO players (nickname, profile_image) VALUES ($1, $2) RETURNING id",
    )
    .bind(&profile.nickname)
    .bind(&profile.profile_image)
    .fetch_one(&mut **tx)
    .await?;
    Ok(id)
}

/// One all-or-nothing simulation run.
pub async fn run_once(db: &PgPool, client: &RandomUserClient) -> Result<RunSummary> {
    let n = rand::rng().random_range(0..=10usize);

    let mut profiles = Vec::with_capacity(n);
    for _ in 0..n {
        profiles.push(client.fetch_profile().await?);
    }
    let fallback = match profiles.first() {
        Some(p) => p.clone(),
        None => client.fetch_profile().await?,
    };
    let plan = plan_run(&mut rand::rng(), profiles, fallback);

    let mut tx = db.begin().await?;

    let mut player_ids = Vec::with_capacity(plan.profiles.len());
    for profile in &plan.profiles {
        player_ids.push(get_or_create_player(&mut tx, profile).await?);
    }

    let game_id = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO games (winner_id) VALUES ($1) RETURNING id",
    )
    .bind(plan.winner.map(|i| player_ids[i]))
    .fetch_one(&mut *tx)
    .await?;
    for pid in &player_ids {
        sqlx::query(
            "INSERT INTO game_players (game_id, player_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(game_id)
        .bind(pid)
        .execute(&mut *tx)
        .await?;
    }

    let stat_player = match &plan.stat_subject {
        StatSubject::Generated(i) => player_ids[*i],
        StatSubject::Fresh(profile) => get_or_create_player(&mut tx, profile).await?,
    };
    let stat_game = plan.link_stat_to_game.then_some(game_id);
    let stat_id = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO stats (player_id, game_id, score) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(stat_player)
    .bind(stat_game)
    .bind(plan.stat_score)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(RunSummary {
        players: player_ids.len(),
        game_id,
        stat_id,
    })
}

pub async fn run(db: PgPool) {
    let client = RandomUserClient::new();
    loop {
        match run_once(&db, &client).await {
            Ok(summary) => {
                crate::metrics::SIMULATION_RUNS
                    .with_label_values(&["ok"])
                    .inc();
                log::info!(
                    "simulation run complete: {} players, game {}, stat {}",
                    summary.players,
                    summary.game_id,
                    summary.stat_id
                );
            }
            // A failed run rolls back wholesale; the loop keeps ticking.
            Err(e) => {
                crate::metrics::SIMULATION_RUNS
                    .with_label_values(&["error"])
                    .inc();
                log::error!("simulation run failed: {e:#}");
            }
        }
        sleep(Duration::from_secs(settings().simulate_interval)).await;
    }
}

pub fn start(db: PgPool) {
    tokio::spawn(run(db));
}
