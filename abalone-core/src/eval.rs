//! Position evaluation

use crate::game::{GameState, Player};
use serde::{Deserialize, Serialize};

/// Win value (effectively infinite)
pub const WIN_VALUE: f32 = 100000.0;

/// Heuristic weights for position evaluation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Heuristics {
    /// Per ejected opponent piece
    pub capture_weight: f32,
    /// Per piece on the board
    pub material_weight: f32,
    /// Per step of closeness to the center, summed over pieces
    pub center_weight: f32,
    /// Per step of distance from the outer ring, summed over pieces
    pub edge_weight: f32,
}

impl Default for Heuristics {
    fn default() -> Self {
        Self {
            capture_weight: 100.0,
            material_weight: 10.0,
            center_weight: 0.5,
            edge_weight: 2.0,
        }
    }
}

/// Unweighted per-term differentials (mine minus opponent's)
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct EvalTerms {
    pub captures: i32,
    pub material: i32,
    pub centrality: i32,
    pub edge_safety: i32,
}

impl EvalTerms {
    pub fn score(&self, heuristics: &Heuristics) -> f32 {
        heuristics.capture_weight * self.captures as f32
            + heuristics.material_weight * self.material as f32
            + heuristics.center_weight * self.centrality as f32
            + heuristics.edge_weight * self.edge_safety as f32
    }
}

/// Term-by-term differentials from `perspective`'s point of view
pub fn eval_terms(state: &GameState, perspective: Player) -> EvalTerms {
    let radius = state.radius() as i32;
    let mut terms = EvalTerms {
        captures: state.captured(perspective) as i32
            - state.captured(perspective.opponent()) as i32,
        ..EvalTerms::default()
    };

    for (hex, owner) in state.pieces() {
        let sign = if owner == perspective { 1 } else { -1 };
        terms.material += sign;
        terms.centrality += sign * (radius - hex.distance_to_center() as i32);
        terms.edge_safety += sign * hex.distance_to_edge(radius as i8) as i32;
    }

    terms
}

/// Static score of `state` for `perspective`; positive is good for them
pub fn evaluate(state: &GameState, perspective: Player, heuristics: &Heuristics) -> f32 {
    eval_terms(state, perspective).score(heuristics)
}
