//! Persisted high-water marks
//!
//! Two scalars survive between runs: the best total score and the best
//! score chained from a single shot.

use serde::{Deserialize, Serialize};

use crate::persistence::{Storage, load_json, save_json};
use crate::sim::PersistRequest;

/// Best results across runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct HighScores {
    /// Best total score
    pub best_score: u64,
    /// Best score accrued from one launched ball
    pub best_max_ball: u64,
}

impl HighScores {
    const STORAGE_KEY: &'static str = "connect_ball_highscores";

    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a persist request. Returns true if a mark went up.
    pub fn apply(&mut self, request: PersistRequest) -> bool {
        match request {
            PersistRequest::HighScore(score) if score > self.best_score => {
                self.best_score = score;
                true
            }
            PersistRequest::BestMaxBall(score) if score > self.best_max_ball => {
                self.best_max_ball = score;
                true
            }
            _ => false,
        }
    }

    /// Load from storage, starting fresh if nothing usable is stored
    pub fn load(storage: &dyn Storage) -> Self {
        match load_json::<HighScores>(storage, Self::STORAGE_KEY) {
            Ok(Some(scores)) => {
                log::info!(
                    "Loaded high scores (best {}, best ball {})",
                    scores.best_score,
                    scores.best_max_ball
                );
                scores
            }
            Ok(None) => {
                log::info!("No high scores found, starting fresh");
                Self::new()
            }
            Err(e) => {
                log::warn!("Ignoring stored high scores: {}", e);
                Self::new()
            }
        }
    }

    pub fn save(&self, storage: &mut dyn Storage) {
        match save_json(storage, Self::STORAGE_KEY, self) {
            Ok(()) => log::debug!("High scores saved"),
            Err(e) => log::warn!("Failed to save high scores: {}", e),
        }
    }
}
