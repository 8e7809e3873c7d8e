//! Runtime configuration for the game-stats server.

use once_cell::sync::Lazy;
use std::env;

#[derive(Debug)]
pub struct Settings {
    /// Default number of items per list page.
    pub page_size: u32,
    /// Hard cap on the `page_size` query parameter.
    pub max_page_size: u32,
    /// Number of entries in the top-scores report.
    pub ranking_limit: i64,
    /// Seconds between simulation runs.
    pub simulate_interval: u64,
    /// Random-user API endpoint queried by the simulation job.
    pub random_user_url: String,
    /// Access-token lifetime (seconds).
    pub token_ttl: i64,
}

impl Settings {
    fn from_env() -> Self {
        let page_size = env::var("PAGE_SIZE")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);

        let max_page_size = env::var("MAX_PAGE_SIZE")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(100);

        let ranking_limit = env::var("RANKING_LIMIT")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(10);

        let simulate_interval = env::var("SIMULATE_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(300); // every 5 min

        let random_user_url =
            env::var("RANDOM_USER_URL").unwrap_or_else(|_| "https://randomuser.me/api/".into());

        let token_ttl = env::var("TOKEN_TTL_SECS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(15 * 60);

        Settings {
            page_size,
            max_page_size,
            ranking_limit,
            simulate_interval,
            random_user_url,
            token_ttl,
        }
    }
}

static SETTINGS: Lazy<Settings> = Lazy::new(Settings::from_env);

pub fn settings() -> &'static Settings {
    &SETTINGS
}
