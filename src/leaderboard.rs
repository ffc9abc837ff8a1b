//! Remote leaderboard client: submit a score, fetch the top entries.
//!
//! Plain JSON over HTTP against a configurable endpoint. Callers decide
//! whether failures matter; the quiz flow treats submission as
//! fire-and-forget.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

const USER_AGENT: &str = "CultureQuest/0.3 (geography-quiz)";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub player: String,
    pub score: u32,
    /// Epoch milliseconds when the score was recorded.
    #[serde(default)]
    pub recorded_ms: i64,
}

#[derive(Debug)]
pub enum LeaderboardError {
    Network(String),
    InvalidResponse(String),
}

impl fmt::Display for LeaderboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(msg) => write!(f, "Network error: {}", msg),
            Self::InvalidResponse(msg) => write!(f, "Invalid leaderboard response: {}", msg),
        }
    }
}

impl std::error::Error for LeaderboardError {}

pub struct LeaderboardClient {
    base_url: String,
}

impl LeaderboardClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }

    /// POST the score to `<base>/scores`.
    pub fn submit(&self, player: &str, score: u32) -> Result<(), LeaderboardError> {
        let entry = LeaderboardEntry {
            player: player.to_string(),
            score,
            recorded_ms: chrono::Utc::now().timestamp_millis(),
        };

        ureq::post(&format!("{}/scores", self.base_url))
            .set("User-Agent", USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .send_json(entry)
            .map_err(|e| LeaderboardError::Network(e.to_string()))?;

        Ok(())
    }

    /// GET the top `limit` entries, best first.
    pub fn top(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        let url = format!("{}/scores?limit={}", self.base_url, limit);

        let response = ureq::get(&url)
            .set("User-Agent", USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .call()
            .map_err(|e| LeaderboardError::Network(e.to_string()))?;

        response
            .into_json()
            .map_err(|e| LeaderboardError::InvalidResponse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_decoding() {
        let json = r#"[
            {"player": "nina", "score": 80, "recorded_ms": 1700000000000},
            {"player": "omar", "score": 60}
        ]"#;
        let entries: Vec<LeaderboardEntry> = serde_json::from_str(json).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].player, "nina");
        assert_eq!(entries[0].score, 80);
        // Missing timestamp defaults instead of failing the whole listing.
        assert_eq!(entries[1].recorded_ms, 0);
    }

    #[test]
    fn test_entry_encoding_shape() {
        let entry = LeaderboardEntry {
            player: "nina".into(),
            score: 80,
            recorded_ms: 1_700_000_000_000,
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["player"], "nina");
        assert_eq!(value["score"], 80);
        assert_eq!(value["recorded_ms"], 1_700_000_000_000i64);
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = LeaderboardClient::new("https://example.test/api/");
        assert_eq!(client.base_url, "https://example.test/api");
    }
}
