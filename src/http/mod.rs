pub mod auth;
pub mod error;
pub mod games;
pub mod health;
pub mod pagination;
pub mod players;
pub mod routes;
pub mod stats;
pub mod users;

use chrono::{DateTime, Utc};

/// Timestamp rendering used across API representations.
pub(crate) fn fmt_ts(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}
