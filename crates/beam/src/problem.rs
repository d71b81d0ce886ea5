//! Core search problem trait.
//!
//! This module defines the [`Problem`] trait, the abstraction the search
//! driver expands against. The trait is generic over a state type and an
//! action type, so the same driver can plan over any simultaneous-move
//! turn model.

/// A forward-search problem: how states branch and how good they are.
pub trait Problem {
    /// One snapshot of the world being searched over.
    type State;

    /// The label attached to each branch, recovered as the plan.
    type Action: Clone;

    /// Expand a state into every successor reachable in one turn.
    ///
    /// Each successor carries the action that produced it. An empty vector
    /// marks the state as terminal; the search stops deepening past it.
    fn successors(&self, state: &Self::State) -> Vec<(Self::Action, Self::State)>;

    /// Score a state. **Lower is better.**
    fn evaluate(&self, state: &Self::State) -> i64;
}
