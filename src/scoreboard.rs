//! Scoreboard
//!
//! Ranks every registered player by score. Ties go to the lowest device id,
//! so the winner never depends on join order.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::sim::registry::PlayerRegistry;

/// One player's standing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub device_id: String,
    pub score: i64,
}

impl ScoreEntry {
    /// Ranking order: higher score first, then lower device id
    fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .cmp(&self.score)
            .then_with(|| self.device_id.cmp(&other.device_id))
    }
}

/// Ranked standings, best first
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scoreboard {
    pub entries: Vec<ScoreEntry>,
}

impl Scoreboard {
    /// Rank every ship in the registry
    pub fn from_players(players: &PlayerRegistry) -> Self {
        Self::from_entries(players.iter().map(|ship| ScoreEntry {
            device_id: ship.device_id.clone(),
            score: ship.score,
        }))
    }

    pub fn from_entries(entries: impl IntoIterator<Item = ScoreEntry>) -> Self {
        let mut entries: Vec<ScoreEntry> = entries.into_iter().collect();
        entries.sort_by(ScoreEntry::rank_cmp);
        Self { entries }
    }

    /// Check if the scoreboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn winner(&self) -> Option<&ScoreEntry> {
        self.entries.first()
    }

    /// The best `n` entries
    pub fn top(&self, n: usize) -> &[ScoreEntry] {
        &self.entries[..n.min(self.entries.len())]
    }

    /// 1-indexed rank of a device, if present
    pub fn rank_of(&self, device_id: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.device_id == device_id)
            .map(|i| i + 1)
    }
}
