//! Configuration from environment variables, overridable by CLI flags.

use std::env;

pub const ENV_API_KEY: &str = "CULTUREQUEST_API_KEY";
pub const ENV_LEADERBOARD_URL: &str = "CULTUREQUEST_LEADERBOARD_URL";

#[derive(Debug, Clone, Default)]
pub struct Config {
    /// API key for the geocoding and imagery services.
    pub api_key: String,
    /// Leaderboard endpoint; leaderboard features are off when unset.
    pub leaderboard_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            api_key: get(ENV_API_KEY).unwrap_or_default(),
            leaderboard_url: get(ENV_LEADERBOARD_URL).filter(|s| !s.trim().is_empty()),
        }
    }
}
