//! Explorer actions and per-turn order books.

use std::fmt;

use arrayvec::ArrayVec;

use crate::config::GameConfig;
use crate::state::{EntityId, Position};

/// One explorer action for one turn.
///
/// `Display` renders the fully-qualified command string expected on the
/// wire (`WAIT`, `MOVE x y`, `PLAN`, `LIGHT`, `YELL`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Action {
    Wait,
    Move(Position),
    /// Start a heal aura (consumes a plan charge).
    Plan,
    /// Start a stealth aura (consumes a light charge).
    Light,
    /// Force adjacent explorers to wait out the next turns.
    Yell,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Wait => write!(f, "WAIT"),
            Action::Move(cell) => write!(f, "MOVE {} {}", cell.x, cell.y),
            Action::Plan => write!(f, "PLAN"),
            Action::Light => write!(f, "LIGHT"),
            Action::Yell => write!(f, "YELL"),
        }
    }
}

/// The set of actions issued this turn, one per explorer.
///
/// Explorers without an entry default to [`Action::Wait`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TurnOrders {
    orders: ArrayVec<(EntityId, Action), { GameConfig::MAX_EXPLORERS }>,
}

impl TurnOrders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `action` for `explorer`, replacing any previous order.
    pub fn set(&mut self, explorer: EntityId, action: Action) {
        if let Some(entry) = self.orders.iter_mut().find(|(id, _)| *id == explorer) {
            entry.1 = action;
        } else {
            self.orders.push((explorer, action));
        }
    }

    /// The action ordered for `explorer`, defaulting to `Wait`.
    pub fn get(&self, explorer: EntityId) -> Action {
        self.orders
            .iter()
            .find(|(id, _)| *id == explorer)
            .map(|(_, action)| *action)
            .unwrap_or(Action::Wait)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_are_fully_qualified() {
        assert_eq!(Action::Wait.to_string(), "WAIT");
        assert_eq!(Action::Move(Position::new(7, 3)).to_string(), "MOVE 7 3");
        assert_eq!(Action::Plan.to_string(), "PLAN");
        assert_eq!(Action::Light.to_string(), "LIGHT");
        assert_eq!(Action::Yell.to_string(), "YELL");
    }

    #[test]
    fn orders_default_to_wait_and_overwrite() {
        let mut orders = TurnOrders::new();
        assert_eq!(orders.get(EntityId(2)), Action::Wait);

        orders.set(EntityId(2), Action::Plan);
        assert_eq!(orders.get(EntityId(2)), Action::Plan);

        orders.set(EntityId(2), Action::Light);
        assert_eq!(orders.get(EntityId(2)), Action::Light);
    }
}
