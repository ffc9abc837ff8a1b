//! File-based player stats at ~/.culturequest/score.json.
//!
//! Best-effort persistence: a missing or corrupt file loads as defaults,
//! and write failures are swallowed so the game never dies on disk errors.
//! Missing fields default gracefully, so older files keep loading.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Locally persisted player statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerStats {
    #[serde(default)]
    pub best_score: u32,
    #[serde(default)]
    pub games_played: u32,
    #[serde(default)]
    pub last_score: u32,
    /// Epoch milliseconds of the last update.
    #[serde(default)]
    pub updated_ms: i64,
}

/// The stats store.
pub struct ScoreStore {
    path: PathBuf,
    stats: PlayerStats,
}

impl ScoreStore {
    /// Load from the default location (~/.culturequest/score.json).
    pub fn load() -> Self {
        Self::load_from(Self::default_path())
    }

    /// Load from a specific path (for testing).
    pub fn load_from(path: PathBuf) -> Self {
        let stats = Self::read_file(&path).unwrap_or_default();
        Self { path, stats }
    }

    fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".culturequest")
            .join("score.json")
    }

    fn read_file(path: &PathBuf) -> Option<PlayerStats> {
        let data = fs::read_to_string(path).ok()?;
        serde_json::from_str(&data).ok()
    }

    pub fn stats(&self) -> &PlayerStats {
        &self.stats
    }

    /// Record a finished game and persist. Returns true when the score
    /// beats the previous best.
    pub fn record_game(&mut self, score: u32) -> bool {
        let new_best = score > self.stats.best_score;
        if new_best {
            self.stats.best_score = score;
        }
        self.stats.last_score = score;
        self.stats.games_played += 1;
        self.stats.updated_ms = chrono::Utc::now().timestamp_millis();
        self.persist();
        new_best
    }

    fn persist(&self) {
        if let Some(parent) = self.path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        if let Ok(json) = serde_json::to_string_pretty(&self.stats) {
            let _ = fs::write(&self.path, json);
        }
    }
}
