//! Engine configuration file

use crate::ai::{SearchLimits, DEFAULT_DEPTH};
use crate::eval::Heuristics;
use crate::game::Player;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Which side(s) the engine plays in a controlled game
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiSide {
    #[default]
    Off,
    White,
    Black,
    Both,
}

impl AiSide {
    /// Does the engine move for `player`?
    pub fn plays(self, player: Player) -> bool {
        match self {
            AiSide::Off => false,
            AiSide::Both => true,
            AiSide::White => player == Player::White,
            AiSide::Black => player == Player::Black,
        }
    }
}

/// Search and controller settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub depth: u32,
    pub heuristics: Heuristics,
    /// Node budget per search
    pub max_nodes: Option<u64>,
    /// Wall-clock budget per search
    pub time_limit_ms: Option<u64>,
    /// Search root moves in parallel
    pub parallel: bool,
    pub ai_side: AiSide,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            heuristics: Heuristics::default(),
            max_nodes: None,
            time_limit_ms: None,
            parallel: false,
            ai_side: AiSide::Off,
        }
    }
}

impl EngineConfig {
    pub fn limits(&self) -> SearchLimits {
        SearchLimits {
            max_nodes: self.max_nodes,
            time_limit: self.time_limit_ms.map(Duration::from_millis),
        }
    }

    /// Load from JSON file; missing fields keep their defaults
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save to JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"depth": 3, "ai_side": "black", "time_limit_ms": 250}"#).unwrap();
        assert_eq!(config.depth, 3);
        assert_eq!(config.ai_side, AiSide::Black);
        assert_eq!(config.heuristics, Heuristics::default());
        assert_eq!(config.limits().time_limit, Some(Duration::from_millis(250)));
        assert_eq!(config.limits().max_nodes, None);
    }

    #[test]
    fn test_ai_side() {
        assert!(!AiSide::Off.plays(Player::White));
        assert!(AiSide::Both.plays(Player::Black));
        assert!(AiSide::White.plays(Player::White));
        assert!(!AiSide::White.plays(Player::Black));
    }
}
