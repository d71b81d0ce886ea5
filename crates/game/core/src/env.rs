//! Immutable per-game context.
//!
//! Bundles the board, the routing table, the rule configuration, and the
//! identity of the controlled explorer so every state operation and the
//! planner receive the same read-only references; no process-wide state.

use crate::board::{Board, RoutingTable};
use crate::config::GameConfig;
use crate::state::EntityId;

/// Read-only context handed into every transition and planner call.
///
/// `controlled` is the explorer this process steers; its moves resolve
/// directly while every other explorer's move intent is treated as a
/// routing target (incomplete opponent information).
#[derive(Clone, Copy, Debug)]
pub struct GameEnv<'a> {
    pub board: &'a Board,
    pub routing: &'a RoutingTable,
    pub config: &'a GameConfig,
    pub controlled: EntityId,
}

impl<'a> GameEnv<'a> {
    pub fn new(
        board: &'a Board,
        routing: &'a RoutingTable,
        config: &'a GameConfig,
        controlled: EntityId,
    ) -> Self {
        Self {
            board,
            routing,
            config,
            controlled,
        }
    }
}
