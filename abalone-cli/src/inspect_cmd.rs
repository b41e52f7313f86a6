//! Moves and eval commands - inspect a single position

use std::path::PathBuf;

use abalone_core::{eval_terms, legal_children, Player};
use anyhow::Result;
use clap::Args;

#[derive(Args)]
pub struct MovesArgs {
    /// Position JSON file (default: opening layout)
    #[arg(long, value_name = "FILE")]
    pub position: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct EvalArgs {
    /// Position JSON file (default: opening layout)
    #[arg(long, value_name = "FILE")]
    pub position: Option<PathBuf>,

    /// Engine config JSON file, for its heuristic weights
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(serde::Serialize)]
struct JsonMove {
    selection: Vec<abalone_core::Hex>,
    direction: abalone_core::Direction,
    moved: usize,
    pushed: u8,
    ejected: u8,
}

pub fn run_moves(args: MovesArgs) -> Result<()> {
    let state = crate::load_state(args.position.as_deref())?;
    let children = legal_children(&state);

    if args.json {
        let moves: Vec<JsonMove> = children
            .iter()
            .map(|(mv, outcome)| JsonMove {
                selection: mv.selection.to_vec(),
                direction: mv.direction,
                moved: outcome.moved.len(),
                pushed: outcome.pushed,
                ejected: outcome.ejected,
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&moves)?);
        return Ok(());
    }

    println!("{state}\n");
    println!("{} legal moves for {}:", children.len(), state.side_to_move());
    for (mv, outcome) in &children {
        let note = match (outcome.pushed, outcome.ejected) {
            (0, _) => String::new(),
            (p, 0) => format!(" pushes {p}"),
            (p, e) => format!(" pushes {p}, ejects {e}"),
        };
        println!("  {mv} ({} moving){note}", outcome.moved.len());
    }
    Ok(())
}

pub fn run_eval(args: EvalArgs) -> Result<()> {
    let state = crate::load_state(args.position.as_deref())?;
    let config = crate::load_config(args.config.as_deref())?;

    println!("{state}\n");
    println!("Result: {:?}", state.result());
    for player in [Player::White, Player::Black] {
        let terms = eval_terms(&state, player);
        println!(
            "{:<5}: {:>8.1}  (captures {}, material {}, centrality {}, edge safety {})",
            player.to_string(),
            terms.score(&config.heuristics),
            terms.captures,
            terms.material,
            terms.centrality,
            terms.edge_safety
        );
    }
    Ok(())
}
