//! Forward search over the controlled explorer's actions.
//!
//! The planner expands candidate turns with [`crate::engine::step`]: the
//! controlled explorer branches over its legal actions while every other
//! explorer follows a fixed heuristic stand-in, and a bounded beam keeps
//! the best states per depth. Plans are cached and drained one action per
//! real turn; the search only reruns when the queue is empty.

use std::collections::VecDeque;
use std::time::Instant;

use arrayvec::ArrayVec;
use beam_search::{BeamSearch, Problem};

use crate::action::{Action, TurnOrders};
use crate::engine;
use crate::env::GameEnv;
use crate::state::{CreatureKind, ExplorerState, GameState};

/// Candidate states retained per searched depth level.
pub const BEAM_WIDTH: usize = 40;
/// Turns of lookahead per planning run.
pub const SEARCH_DEPTH: usize = 4;

/// Maximum legal actions for one explorer: four moves plus one ability.
const MAX_ACTIONS: usize = 5;

/// Caches a planned action sequence and replans when it runs dry.
///
/// A stale plan is tolerated by design: the opponent model is heuristic
/// anyway, and amortizing the search over several real turns keeps every
/// turn inside the time budget.
#[derive(Debug, Default)]
pub struct Planner {
    queue: VecDeque<Action>,
}

impl Planner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queued actions left before the next search.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Returns the action to play this turn, searching first if the cached
    /// plan is exhausted. Never fails: an empty search result degrades to
    /// [`Action::Wait`].
    pub fn next_action(
        &mut self,
        state: &GameState,
        env: &GameEnv<'_>,
        deadline: Option<Instant>,
    ) -> Action {
        if self.queue.is_empty() {
            self.queue = plan(state, env, SEARCH_DEPTH, deadline).into();
        }
        self.queue.pop_front().unwrap_or(Action::Wait)
    }
}

/// Runs one beam search and returns the action sequence, first move first.
///
/// The sequence has exactly `depth` actions unless the deadline cuts the
/// search short, in which case it holds the best plan found so far (and
/// may be empty).
pub fn plan(
    state: &GameState,
    env: &GameEnv<'_>,
    depth: usize,
    deadline: Option<Instant>,
) -> Vec<Action> {
    let problem = TurnProblem { env };
    BeamSearch::new(BEAM_WIDTH, depth)
        .run(&problem, state.clone(), deadline)
        .actions
}

/// Legal actions for the controlled explorer: every adjacent walkable
/// move, plus one aura ability (plan preferred over light) when a charge
/// is held and no effect is active.
pub fn legal_actions(
    explorer: &ExplorerState,
    env: &GameEnv<'_>,
) -> ArrayVec<Action, MAX_ACTIONS> {
    let mut actions: ArrayVec<Action, MAX_ACTIONS> = env
        .board
        .adjacent(explorer.position)
        .into_iter()
        .map(Action::Move)
        .collect();

    if !explorer.has_active_effect {
        if explorer.plans > 0 {
            actions.push(Action::Plan);
        } else if explorer.lights > 0 {
            actions.push(Action::Light);
        }
    }

    actions
}

/// Heuristic stand-in for an opponent's turn: move to the first adjacent
/// walkable cell no creature occupies, or wait.
pub fn opponent_action(state: &GameState, explorer: &ExplorerState, env: &GameEnv<'_>) -> Action {
    env.board
        .adjacent(explorer.position)
        .into_iter()
        .find(|&cell| !state.creature_at(cell))
        .map(Action::Move)
        .unwrap_or(Action::Wait)
}

/// Scores a state from the controlled explorer's viewpoint; lower is
/// better. Death scores a flat 100.
pub fn evaluate(state: &GameState, env: &GameEnv<'_>) -> i64 {
    let Some(me) = state.explorer(env.controlled) else {
        return 100;
    };

    let slashers_in_sight = state
        .creatures
        .iter()
        .filter(|creature| {
            creature.kind == CreatureKind::Slasher
                && env.routing.line_of_sight(creature.position, me.position)
        })
        .count() as i64;

    -2 * scale_sanity(me.sanity) + 15 * slashers_in_sight
}

/// Rescales low sanity so near-death states are penalized
/// disproportionately: x100 under 10, x10 under 40.
fn scale_sanity(sanity: i32) -> i64 {
    let sanity = sanity as i64;
    if sanity < 10 {
        sanity * 100
    } else if sanity < 40 {
        sanity * 10
    } else {
        sanity
    }
}

struct TurnProblem<'a, 'e> {
    env: &'a GameEnv<'e>,
}

impl Problem for TurnProblem<'_, '_> {
    type State = GameState;
    type Action = Action;

    fn successors(&self, state: &GameState) -> Vec<(Action, GameState)> {
        let mut orders = TurnOrders::new();
        for explorer in &state.explorers {
            if explorer.id != self.env.controlled {
                orders.set(explorer.id, opponent_action(state, explorer, self.env));
            }
        }

        let my_actions: ArrayVec<Action, MAX_ACTIONS> = match state.explorer(self.env.controlled)
        {
            Some(me) => legal_actions(me, self.env),
            None => ArrayVec::new(),
        };
        let my_actions = if my_actions.is_empty() {
            // Fallback: a dead or boxed-in explorer still waits.
            ArrayVec::from_iter([Action::Wait])
        } else {
            my_actions
        };

        my_actions
            .into_iter()
            .map(|action| {
                orders.set(self.env.controlled, action);
                (action, engine::step(state, &orders, self.env))
            })
            .collect()
    }

    fn evaluate(&self, state: &GameState) -> i64 {
        evaluate(state, self.env)
    }
}
