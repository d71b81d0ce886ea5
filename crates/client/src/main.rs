//! Game client entry point.
//!
//! Reads the setup block once, builds the immutable board context, then
//! loops: parse the turn snapshot, reconcile it into a game state, ask the
//! planner for an action, and print the command. All diagnostics go to
//! stderr; stdout carries nothing but commands.
mod protocol;

use std::io;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use kutulu_core::{Board, GameEnv, Planner, RoutingTable, SnapshotTracker};
use tracing_subscriber::EnvFilter;

/// Wall-clock budget per turn, with margin under the externally imposed
/// deadline (~50 ms).
const TURN_BUDGET: Duration = Duration::from_millis(40);

fn main() -> Result<()> {
    setup_logging();

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let stdout = io::stdout();
    let mut output = stdout.lock();

    let init = protocol::read_init(&mut input)?;
    tracing::info!(
        width = init.width,
        height = init.height,
        "map received, building routing table"
    );

    let board = Board::parse(&init.rows).context("parsing map rows")?;
    let routing = RoutingTable::build(&board);
    let config = init.config;

    let mut tracker = SnapshotTracker::new();
    let mut planner = Planner::new();

    while let Some(snapshot) = protocol::read_snapshot(&mut input)? {
        let turn_start = Instant::now();
        let deadline = turn_start + TURN_BUDGET;

        let controlled = snapshot
            .controlled_id()
            .context("snapshot contains no explorer")?;
        let env = GameEnv::new(&board, &routing, &config, controlled);
        let state = tracker.ingest(&snapshot, &env)?;

        let queued_before = planner.pending();
        let action = planner.next_action(&state, &env, Some(deadline));
        if queued_before == 0 {
            tracing::debug!(queued = planner.pending(), "plan queue refilled");
        }

        tracing::debug!(
            turn = state.turn,
            elapsed_ms = turn_start.elapsed().as_millis() as u64,
            command = %action,
            "turn resolved"
        );
        protocol::write_command(&mut output, action)?;
    }

    tracing::info!("input closed, shutting down");
    Ok(())
}

/// Structured logs on stderr, filtered by `RUST_LOG` (default `info`).
fn setup_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();
}
