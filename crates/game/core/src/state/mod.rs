pub mod common;
pub mod creature;
pub mod effect;
pub mod explorer;

use std::collections::HashSet;

use arrayvec::ArrayVec;

use crate::config::GameConfig;

pub use common::{EntityId, Position};
pub use creature::{CreatureKind, CreaturePhase, CreatureState};
pub use effect::{EffectKind, EffectState};
pub use explorer::ExplorerState;

/// Canonical snapshot of the mutable per-turn world.
///
/// The state is created once per game from the authoritative snapshot and
/// thereafter only cloned (for search branching) or advanced by
/// [`crate::engine::step`]. Collections keep insertion order; the snapshot
/// layer inserts entities in wire order, which is ascending id.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameState {
    /// Turn counter, incremented by every transition.
    pub turn: u32,
    pub explorers: ArrayVec<ExplorerState, { GameConfig::MAX_EXPLORERS }>,
    pub creatures: ArrayVec<CreatureState, { GameConfig::MAX_CREATURES }>,
    pub effects: ArrayVec<EffectState, { GameConfig::MAX_EFFECTS }>,
    /// (caster, victim) yell pairings already spent; a pair can only be
    /// yelled once per game.
    pub yelled: HashSet<(EntityId, EntityId)>,
}

impl GameState {
    /// Returns a reference to an explorer by id.
    pub fn explorer(&self, id: EntityId) -> Option<&ExplorerState> {
        self.explorers.iter().find(|explorer| explorer.id == id)
    }

    /// Returns a mutable reference to an explorer by id.
    pub fn explorer_mut(&mut self, id: EntityId) -> Option<&mut ExplorerState> {
        self.explorers.iter_mut().find(|explorer| explorer.id == id)
    }

    pub fn creature(&self, id: EntityId) -> Option<&CreatureState> {
        self.creatures.iter().find(|creature| creature.id == id)
    }

    pub fn creature_mut(&mut self, id: EntityId) -> Option<&mut CreatureState> {
        self.creatures.iter_mut().find(|creature| creature.id == id)
    }

    /// Deletes an explorer from the explorer collection.
    ///
    /// Dangling references held by creatures and effects are scrubbed by
    /// the transition's removal pass, not here.
    pub fn remove_explorer(&mut self, id: EntityId) {
        self.explorers.retain(|explorer| explorer.id != id);
    }

    pub fn remove_creature(&mut self, id: EntityId) {
        self.creatures.retain(|creature| creature.id != id);
    }

    /// Iterates every explorer standing on `position`.
    pub fn explorers_at(&self, position: Position) -> impl Iterator<Item = &ExplorerState> {
        self.explorers
            .iter()
            .filter(move |explorer| explorer.position == position)
    }

    /// True if any creature currently occupies `position`.
    pub fn creature_at(&self, position: Position) -> bool {
        self.creatures
            .iter()
            .any(|creature| creature.position == position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_state() -> GameState {
        let mut state = GameState::default();
        state
            .explorers
            .push(ExplorerState::new(EntityId(0), Position::new(1, 1), 30, 2, 3));
        state
            .explorers
            .push(ExplorerState::new(EntityId(1), Position::new(3, 1), 40, 2, 3));
        state.creatures.push(CreatureState::new(
            EntityId(7),
            CreatureKind::Wanderer,
            Position::new(3, 1),
            CreaturePhase::Wandering,
            10,
        ));
        state
    }

    #[test]
    fn lookup_by_id() {
        let state = sample_state();
        assert_eq!(state.explorer(EntityId(1)).unwrap().sanity, 40);
        assert!(state.explorer(EntityId(9)).is_none());
        assert_eq!(state.creature(EntityId(7)).unwrap().time_left, 10);
    }

    #[test]
    fn removal_deletes_from_collections() {
        let mut state = sample_state();
        state.remove_explorer(EntityId(0));
        assert!(state.explorer(EntityId(0)).is_none());
        assert_eq!(state.explorers.len(), 1);

        state.remove_creature(EntityId(7));
        assert!(state.creatures.is_empty());
    }

    #[test]
    fn occupancy_queries() {
        let state = sample_state();
        assert_eq!(state.explorers_at(Position::new(3, 1)).count(), 1);
        assert!(state.creature_at(Position::new(3, 1)));
        assert!(!state.creature_at(Position::new(0, 0)));
    }
}
