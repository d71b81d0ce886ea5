//! Deterministic game logic for a simultaneous-move grid survival game.
//!
//! `kutulu-core` defines the canonical rules: the static board and its
//! precomputed routing table, the per-turn world state, the pure transition
//! function that advances it, the creature state machines, and the planner
//! that searches over candidate action sequences. All state mutation flows
//! through [`engine::step`], and the client crate depends on the types
//! re-exported here.
pub mod action;
pub mod board;
pub mod config;
pub mod engine;
pub mod env;
pub mod planner;
pub mod snapshot;
pub mod state;

pub use action::{Action, TurnOrders};
pub use board::{Board, BoardError, CardinalDirection, RoutingTable};
pub use config::GameConfig;
pub use env::GameEnv;
pub use planner::Planner;
pub use snapshot::{EntityKind, EntityRecord, SnapshotError, SnapshotTracker, TurnSnapshot};
pub use state::{
    CreatureKind, CreaturePhase, CreatureState, EffectKind, EffectState, EntityId, ExplorerState,
    GameState, Position,
};
