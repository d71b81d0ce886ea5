//! Beam search driver.
//!
//! The driver expands a frontier of candidate states depth by depth,
//! truncating each level to the best `width` candidates, and finally walks
//! parent links back from the best leaf to recover the action sequence.

use std::time::Instant;

use crate::Problem;
use crate::topk::TopK;

/// Bounded-width, fixed-depth forward search.
pub struct BeamSearch {
    width: usize,
    depth: usize,
}

/// The plan recovered from a search, first move first.
///
/// `actions` is empty when the root had no successors or the deadline
/// expired before the first level completed; callers must supply their own
/// fallback action in that case.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchOutcome<A> {
    pub actions: Vec<A>,
    pub score: i64,
    pub depth_reached: usize,
}

/// Parent-linked node in the expansion arena.
struct Node<A> {
    action: Option<A>,
    parent: usize,
}

/// A retained frontier entry: score, arena index, and the state itself.
struct FrontierEntry<S> {
    score: i64,
    node: usize,
    state: S,
}

impl BeamSearch {
    /// Creates a driver keeping `width` candidates per level for `depth` levels.
    ///
    /// # Panics
    ///
    /// Panics if `width` or `depth` is zero.
    pub fn new(width: usize, depth: usize) -> Self {
        assert!(width > 0, "beam width must be positive");
        assert!(depth > 0, "search depth must be positive");
        Self { width, depth }
    }

    /// Runs the search from `root`.
    ///
    /// If `deadline` is given and passes mid-search, the level being
    /// expanded is truncated with whatever candidates it already produced
    /// (or abandoned if it produced none) and the best plan found so far is
    /// returned. The outcome's `depth_reached` reports how many levels
    /// contributed to the plan.
    pub fn run<P: Problem>(
        &self,
        problem: &P,
        root: P::State,
        deadline: Option<Instant>,
    ) -> SearchOutcome<P::Action> {
        let mut arena: Vec<Node<P::Action>> = vec![Node {
            action: None,
            parent: 0,
        }];

        let root_score = problem.evaluate(&root);
        let mut frontier = vec![FrontierEntry {
            score: root_score,
            node: 0,
            state: root,
        }];
        let mut depth_reached = 0;

        'levels: for _ in 0..self.depth {
            let mut picks: TopK<(P::Action, usize, P::State)> = TopK::new(self.width);

            for entry in &frontier {
                if expired(deadline) {
                    if picks.is_empty() {
                        // Nothing gained at this level; keep the last
                        // completed frontier as the answer.
                        break 'levels;
                    }
                    break;
                }

                for (action, successor) in problem.successors(&entry.state) {
                    let score = problem.evaluate(&successor);
                    picks.push(score, (action, entry.node, successor));
                }
            }

            if picks.is_empty() {
                // Every frontier state was terminal.
                break;
            }

            frontier = picks
                .into_sorted()
                .into_iter()
                .map(|(score, (action, parent, state))| {
                    arena.push(Node {
                        action: Some(action),
                        parent,
                    });
                    FrontierEntry {
                        score,
                        node: arena.len() - 1,
                        state,
                    }
                })
                .collect();
            depth_reached += 1;
        }

        // The frontier is sorted best-first after every truncation; the
        // initial frontier holds only the root.
        let best = &frontier[0];
        SearchOutcome {
            actions: reconstruct(&arena, best.node),
            score: best.score,
            depth_reached,
        }
    }
}

fn expired(deadline: Option<Instant>) -> bool {
    deadline.is_some_and(|deadline| Instant::now() >= deadline)
}

/// Walks parent links from `leaf` back to the root, returning the actions
/// in first-move-to-last-move order.
fn reconstruct<A: Clone>(arena: &[Node<A>], leaf: usize) -> Vec<A> {
    let mut actions = Vec::new();
    let mut index = leaf;
    while let Some(action) = &arena[index].action {
        actions.push(action.clone());
        index = arena[index].parent;
    }
    actions.reverse();
    actions
}
