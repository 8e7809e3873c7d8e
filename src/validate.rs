//! Field and cross-field validation rules shared by the HTTP layer and
//! the simulation job.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use url::Url;
use uuid::Uuid;

/// A rejected field plus a human-readable reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        ValidationError {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

fn charset_ok(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Nicknames are non-empty ASCII letters, digits, and underscores.
pub fn nickname(value: &str) -> Result<(), ValidationError> {
    if charset_ok(value) {
        Ok(())
    } else {
        Err(ValidationError::new(
            "nickname",
            "Nickname can only contain letters, numbers, and underscores.",
        ))
    }
}

/// Usernames follow the same charset rule as nicknames.
pub fn username(value: &str) -> Result<(), ValidationError> {
    if charset_ok(value) {
        Ok(())
    } else {
        Err(ValidationError::new(
            "username",
            "Username can only contain letters, numbers, and underscores.",
        ))
    }
}

/// Profile images must be absolute URLs when present.
pub fn profile_image(value: &str) -> Result<(), ValidationError> {
    Url::parse(value)
        .map(|_| ())
        .map_err(|_| ValidationError::new("profile_image", "Not a valid URL."))
}

/// A winner, when set, must be among the game's players.
pub fn winner_in_players(players: &[Uuid], winner: Option<Uuid>) -> Result<(), ValidationError> {
    match winner {
        Some(w) if !players.contains(&w) => Err(ValidationError::new(
            "winner",
            "Winner must be included in the players list.",
        )),
        _ => Ok(()),
    }
}

/// A stat attached to a game must belong to one of that game's players.
pub fn stat_player_in_game(game_players: &[Uuid], player: Uuid) -> Result<(), ValidationError> {
    if game_players.contains(&player) {
        Ok(())
    } else {
        Err(ValidationError::new(
            "player",
            "Stat player must be a member of the game's players.",
        ))
    }
}

/// A finish timestamp must come strictly after the start timestamp.
pub fn finish_after_start(
    start: DateTime<Utc>,
    finish: DateTime<Utc>,
) -> Result<(), ValidationError> {
    if finish > start {
        Ok(())
    } else {
        Err(ValidationError::new(
            "finish_timestamp",
            "Finish timestamp must be later than the start timestamp.",
        ))
    }
}

/// Scores are non-negative.
pub fn score(value: i32) -> Result<(), ValidationError> {
    if value >= 0 {
        Ok(())
    } else {
        Err(ValidationError::new("score", "Score must be non-negative."))
    }
}
