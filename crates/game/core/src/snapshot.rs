//! Typed per-turn snapshots and their reconciliation into [`GameState`].
//!
//! The console layer parses the wire records; everything here is already
//! typed. Ingestion rebuilds the authoritative state each turn and carries
//! the one piece of session memory the wire does not provide: where each
//! slasher last saw its target.

use std::collections::HashMap;

use crate::env::GameEnv;
use crate::state::{
    CreatureKind, CreaturePhase, CreatureState, EffectKind, EffectState, EntityId, ExplorerState,
    GameState, Position,
};

/// Wire entity-kind tokens.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityKind {
    Explorer,
    Wanderer,
    Slasher,
    EffectPlan,
    EffectLight,
    EffectShelter,
    EffectYell,
}

/// One snapshot record: `kind id x y p0 p1 p2`.
///
/// The parameter fields are kind-dependent: sanity/plans/lights for an
/// explorer, countdown/state-code/target-id for a creature, and
/// duration/caster-id/target-id for an effect. `-1` marks an absent id.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityRecord {
    pub kind: EntityKind,
    pub id: i32,
    pub x: i32,
    pub y: i32,
    pub p0: i32,
    pub p1: i32,
    pub p2: i32,
}

/// A full turn snapshot. The first explorer record is the controlled one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnSnapshot {
    pub records: Vec<EntityRecord>,
}

impl TurnSnapshot {
    pub fn new(records: Vec<EntityRecord>) -> Self {
        Self { records }
    }

    /// The controlled explorer's id: the first EXPLORER record.
    pub fn controlled_id(&self) -> Option<EntityId> {
        self.records
            .iter()
            .find(|record| record.kind == EntityKind::Explorer)
            .and_then(|record| entity_id(record.id))
    }
}

/// Errors raised while reconciling a snapshot.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SnapshotError {
    #[error("entity record carries negative id {0}")]
    NegativeId(i32),

    #[error("unknown creature state code {0}")]
    UnknownPhaseCode(i32),

    #[error("snapshot exceeds the explorer capacity")]
    TooManyExplorers,

    #[error("snapshot exceeds the creature capacity")]
    TooManyCreatures,

    #[error("snapshot exceeds the effect capacity")]
    TooManyEffects,
}

/// Rebuilds the game state from each authoritative snapshot, carrying
/// slasher last-seen memory across turns.
#[derive(Clone, Debug, Default)]
pub struct SnapshotTracker {
    turn: u32,
    last_seen: HashMap<EntityId, Position>,
}

impl SnapshotTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Turns completed so far.
    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// Reconciles one snapshot into a fresh [`GameState`].
    ///
    /// Explorers referenced by an active aura are marked effect-locked,
    /// yell victims are marked stuck, and yell effects seed the spent-pair
    /// set. Slasher last-seen positions are refreshed with the
    /// line-of-sight rule (from the second turn on) and injected into the
    /// rebuilt creatures.
    pub fn ingest(
        &mut self,
        snapshot: &TurnSnapshot,
        env: &GameEnv<'_>,
    ) -> Result<GameState, SnapshotError> {
        self.turn += 1;

        let mut state = GameState::default();
        state.turn = self.turn;

        for record in &snapshot.records {
            let position = Position::new(record.x, record.y);
            match record.kind {
                EntityKind::Explorer => {
                    let id = entity_id(record.id).ok_or(SnapshotError::NegativeId(record.id))?;
                    state
                        .explorers
                        .try_push(ExplorerState::new(
                            id, position, record.p0, record.p1, record.p2,
                        ))
                        .map_err(|_| SnapshotError::TooManyExplorers)?;
                }
                EntityKind::Wanderer | EntityKind::Slasher => {
                    let id = entity_id(record.id).ok_or(SnapshotError::NegativeId(record.id))?;
                    let kind = if record.kind == EntityKind::Wanderer {
                        CreatureKind::Wanderer
                    } else {
                        CreatureKind::Slasher
                    };
                    let phase = CreaturePhase::from_code(record.p1)
                        .ok_or(SnapshotError::UnknownPhaseCode(record.p1))?;
                    let mut creature = CreatureState::new(id, kind, position, phase, record.p0);
                    creature.target = entity_id(record.p2);
                    state
                        .creatures
                        .try_push(creature)
                        .map_err(|_| SnapshotError::TooManyCreatures)?;
                }
                EntityKind::EffectPlan
                | EntityKind::EffectLight
                | EntityKind::EffectShelter
                | EntityKind::EffectYell => {
                    let kind = match record.kind {
                        EntityKind::EffectPlan => EffectKind::Plan,
                        EntityKind::EffectLight => EffectKind::Light,
                        EntityKind::EffectShelter => EffectKind::Shelter,
                        _ => EffectKind::Yell,
                    };
                    state
                        .effects
                        .try_push(EffectState::new(
                            kind,
                            position,
                            record.p0,
                            entity_id(record.p1),
                            entity_id(record.p2),
                        ))
                        .map_err(|_| SnapshotError::TooManyEffects)?;
                }
            }
        }

        self.mark_effect_holders(&mut state);
        self.refresh_last_seen(&mut state, env);

        Ok(state)
    }

    /// Auras lock their caster; yell effects pin their victim and spend
    /// the pair.
    fn mark_effect_holders(&self, state: &mut GameState) {
        for index in 0..state.effects.len() {
            let effect = state.effects[index];
            match effect.kind {
                EffectKind::Plan | EffectKind::Light => {
                    if let Some(caster) = effect.caster
                        && let Some(explorer) = state.explorer_mut(caster)
                    {
                        explorer.has_active_effect = true;
                    }
                }
                EffectKind::Yell => {
                    if let Some(victim) = effect.target {
                        if let Some(explorer) = state.explorer_mut(victim) {
                            explorer.stuck = true;
                        }
                        if let Some(caster) = effect.caster {
                            state.yelled.insert((caster, victim));
                        }
                    }
                }
                EffectKind::Shelter => {}
            }
        }
    }

    /// Applies the line-of-sight memory rule to every slasher and injects
    /// the remembered positions.
    fn refresh_last_seen(&mut self, state: &mut GameState, env: &GameEnv<'_>) {
        if self.turn > 1 {
            for creature in &state.creatures {
                if creature.kind != CreatureKind::Slasher {
                    continue;
                }
                let visible: Vec<(EntityId, Position)> = state
                    .explorers
                    .iter()
                    .filter(|explorer| {
                        env.routing.line_of_sight(creature.position, explorer.position)
                    })
                    .map(|explorer| (explorer.id, explorer.position))
                    .collect();

                let kept = creature.target.and_then(|target| {
                    visible
                        .iter()
                        .find(|(id, _)| *id == target)
                        .map(|&(_, position)| position)
                });

                if let Some(position) = kept {
                    self.last_seen.insert(creature.id, position);
                } else if visible.len() == 1 {
                    self.last_seen.insert(creature.id, visible[0].1);
                } else if visible.len() > 1 {
                    self.last_seen.remove(&creature.id);
                }
                // Nobody visible: the remembered position stands.
            }
        }

        // Drop memory for creatures that left the game.
        let present: Vec<EntityId> = state.creatures.iter().map(|creature| creature.id).collect();
        self.last_seen.retain(|id, _| present.contains(id));

        for creature in state.creatures.iter_mut() {
            creature.last_seen = self.last_seen.get(&creature.id).copied();
        }
    }
}

/// Maps a wire id to an [`EntityId`]; negative ids mean "none".
fn entity_id(raw: i32) -> Option<EntityId> {
    (raw >= 0).then(|| EntityId(raw as u32))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board, RoutingTable};
    use crate::config::GameConfig;
    use std::str::FromStr;

    fn record(kind: EntityKind, id: i32, x: i32, y: i32, p0: i32, p1: i32, p2: i32) -> EntityRecord {
        EntityRecord {
            kind,
            id,
            x,
            y,
            p0,
            p1,
            p2,
        }
    }

    struct Fixture {
        board: Board,
        routing: RoutingTable,
        config: GameConfig,
    }

    impl Fixture {
        fn corridor() -> Self {
            let board = Board::parse(&["#######", "#.....#", "#######"]).unwrap();
            let routing = RoutingTable::build(&board);
            Self {
                board,
                routing,
                config: GameConfig::default(),
            }
        }

        fn env(&self, controlled: EntityId) -> GameEnv<'_> {
            GameEnv::new(&self.board, &self.routing, &self.config, controlled)
        }
    }

    #[test]
    fn wire_tokens_round_trip() {
        assert_eq!(EntityKind::Explorer.to_string(), "EXPLORER");
        assert_eq!(EntityKind::EffectPlan.to_string(), "EFFECT_PLAN");
        assert_eq!(
            EntityKind::from_str("SLASHER").unwrap(),
            EntityKind::Slasher
        );
        assert_eq!(
            EntityKind::from_str("EFFECT_SHELTER").unwrap(),
            EntityKind::EffectShelter
        );
        assert!(EntityKind::from_str("GHOST").is_err());
    }

    #[test]
    fn ingest_builds_typed_entities() {
        let fixture = Fixture::corridor();
        let snapshot = TurnSnapshot::new(vec![
            record(EntityKind::Explorer, 0, 1, 1, 42, 2, 3),
            record(EntityKind::Explorer, 1, 3, 1, 30, 1, 0),
            record(EntityKind::Wanderer, 7, 5, 1, 8, 1, -1),
            record(EntityKind::Slasher, 9, 4, 1, 2, 2, 1),
        ]);

        assert_eq!(snapshot.controlled_id(), Some(EntityId(0)));
        let env = fixture.env(EntityId(0));
        let state = SnapshotTracker::new().ingest(&snapshot, &env).unwrap();

        assert_eq!(state.turn, 1);
        let me = state.explorer(EntityId(0)).unwrap();
        assert_eq!((me.sanity, me.plans, me.lights), (42, 2, 3));
        assert!(!me.stuck);

        let wanderer = state.creature(EntityId(7)).unwrap();
        assert_eq!(wanderer.kind, CreatureKind::Wanderer);
        assert_eq!(wanderer.phase, CreaturePhase::Wandering);
        assert_eq!(wanderer.target, None);

        let slasher = state.creature(EntityId(9)).unwrap();
        assert_eq!(slasher.phase, CreaturePhase::Stalking);
        assert_eq!(slasher.target, Some(EntityId(1)));
    }

    #[test]
    fn effects_mark_their_holders() {
        let fixture = Fixture::corridor();
        let snapshot = TurnSnapshot::new(vec![
            record(EntityKind::Explorer, 0, 1, 1, 42, 2, 3),
            record(EntityKind::Explorer, 1, 3, 1, 30, 1, 0),
            record(EntityKind::EffectPlan, 20, 1, 1, 4, 0, -1),
            record(EntityKind::EffectYell, 21, 3, 1, 1, 0, 1),
            record(EntityKind::EffectShelter, 22, 5, 1, 9, -1, -1),
        ]);

        let env = fixture.env(EntityId(0));
        let state = SnapshotTracker::new().ingest(&snapshot, &env).unwrap();

        assert!(state.explorer(EntityId(0)).unwrap().has_active_effect);
        assert!(state.explorer(EntityId(1)).unwrap().stuck);
        assert!(state.yelled.contains(&(EntityId(0), EntityId(1))));

        let shelter = state
            .effects
            .iter()
            .find(|effect| effect.kind == EffectKind::Shelter)
            .unwrap();
        assert_eq!(shelter.caster, None);
        assert_eq!(shelter.time_left, 9);
    }

    #[test]
    fn last_seen_memory_survives_losing_sight() {
        let fixture = Fixture::corridor();
        let env = fixture.env(EntityId(0));
        let mut tracker = SnapshotTracker::new();

        // Turn 1: the slasher has explorer 1 locked; memory only starts on
        // turn 2, so nothing is recorded yet.
        let first = TurnSnapshot::new(vec![
            record(EntityKind::Explorer, 0, 1, 1, 40, 2, 3),
            record(EntityKind::Explorer, 1, 4, 1, 40, 2, 3),
            record(EntityKind::Slasher, 9, 5, 1, 2, 2, 1),
        ]);
        let state = tracker.ingest(&first, &env).unwrap();
        assert_eq!(state.creature(EntityId(9)).unwrap().last_seen, None);

        // Turn 2: target still in sight; its position is remembered.
        let second = TurnSnapshot::new(vec![
            record(EntityKind::Explorer, 0, 1, 1, 39, 2, 3),
            record(EntityKind::Explorer, 1, 3, 1, 39, 2, 3),
            record(EntityKind::Slasher, 9, 5, 1, 1, 2, 1),
        ]);
        let state = tracker.ingest(&second, &env).unwrap();
        assert_eq!(
            state.creature(EntityId(9)).unwrap().last_seen,
            Some(Position::new(3, 1))
        );
    }

    #[test]
    fn malformed_records_are_rejected() {
        let fixture = Fixture::corridor();
        let env = fixture.env(EntityId(0));

        let bad_phase = TurnSnapshot::new(vec![record(EntityKind::Wanderer, 7, 1, 1, 3, 9, -1)]);
        assert_eq!(
            SnapshotTracker::new().ingest(&bad_phase, &env),
            Err(SnapshotError::UnknownPhaseCode(9))
        );

        let bad_id = TurnSnapshot::new(vec![record(EntityKind::Explorer, -2, 1, 1, 30, 1, 1)]);
        assert_eq!(
            SnapshotTracker::new().ingest(&bad_id, &env),
            Err(SnapshotError::NegativeId(-2))
        );
    }
}
