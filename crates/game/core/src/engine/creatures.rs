//! Creature state machines.
//!
//! Both creature kinds advance exactly once per transition, dispatched by
//! tag from a single point. All movement goes through the routing table;
//! a creature with no reachable explorer simply holds its cell.

use arrayvec::ArrayVec;

use crate::config::GameConfig;
use crate::env::GameEnv;
use crate::state::{CreatureKind, CreaturePhase, EntityId, GameState, Position};

/// Advances one creature through its state machine.
pub(super) fn advance(id: EntityId, state: &mut GameState, env: &GameEnv<'_>) {
    match state.creature(id).map(|creature| creature.kind) {
        Some(CreatureKind::Wanderer) => advance_wanderer(id, state, env),
        Some(CreatureKind::Slasher) => advance_slasher(id, state, env),
        None => {}
    }
}

/// Wanderer: `Spawning -> Wandering -> removed`.
///
/// A wandering wanderer steps one hop toward the nearest explorer and
/// consumes itself on contact; otherwise its life time runs down and it
/// expires naturally.
fn advance_wanderer(id: EntityId, state: &mut GameState, env: &GameEnv<'_>) {
    let Some(phase) = state.creature(id).map(|creature| creature.phase) else {
        return;
    };

    match phase {
        CreaturePhase::Spawning => {
            if let Some(creature) = state.creature_mut(id) {
                creature.time_left -= 1;
                if creature.time_left <= 0 {
                    creature.phase = CreaturePhase::Wandering;
                    creature.time_left = env.config.wanderer_life_time;
                }
            }
        }
        _ => {
            step_toward_nearest(id, state, env);
            let Some(landing) = state.creature(id).map(|creature| creature.position) else {
                return;
            };
            if state.explorers_at(landing).next().is_some() {
                scare_explorers(landing, state);
                state.remove_creature(id);
            } else if let Some(creature) = state.creature_mut(id) {
                creature.time_left -= 1;
                if creature.time_left <= 0 {
                    state.remove_creature(id);
                }
            }
        }
    }
}

/// Slasher: `Spawning -> Rushing -> Stunned -> Wandering <-> Stalking`.
fn advance_slasher(id: EntityId, state: &mut GameState, env: &GameEnv<'_>) {
    let Some(phase) = state.creature(id).map(|creature| creature.phase) else {
        return;
    };

    match phase {
        CreaturePhase::Spawning => {
            if let Some(creature) = state.creature_mut(id) {
                creature.time_left -= 1;
                if creature.time_left <= 0 {
                    creature.phase = CreaturePhase::Rushing;
                }
            }
        }
        CreaturePhase::Stalking => {
            if let Some(creature) = state.creature_mut(id) {
                creature.time_left -= 1;
            }
            resolve_target(id, state, env);
            if let Some(creature) = state.creature_mut(id)
                && creature.time_left <= 0
            {
                creature.phase = CreaturePhase::Rushing;
            }
        }
        CreaturePhase::Rushing => {
            // Locked target beats the remembered position; with neither the
            // slasher rushes in place.
            let landing = if resolve_target(id, state, env) {
                state
                    .creature(id)
                    .and_then(|creature| creature.target)
                    .and_then(|target| state.explorer(target))
                    .map(|explorer| explorer.position)
            } else {
                state.creature(id).and_then(|creature| creature.last_seen)
            };

            if let Some(creature) = state.creature_mut(id) {
                if let Some(cell) = landing {
                    creature.position = cell;
                }
                creature.phase = CreaturePhase::Stunned;
                creature.time_left = GameConfig::SLASHER_STUN_DURATION;
            }
            if let Some(cell) = state.creature(id).map(|creature| creature.position) {
                scare_explorers(cell, state);
            }
        }
        CreaturePhase::Stunned => {
            if let Some(creature) = state.creature_mut(id) {
                creature.time_left -= 1;
                if creature.time_left <= 0 {
                    creature.phase = CreaturePhase::Wandering;
                }
            }
        }
        CreaturePhase::Wandering => {
            if resolve_target(id, state, env) {
                if let Some(creature) = state.creature_mut(id) {
                    creature.time_left = GameConfig::SLASHER_STALK_DURATION;
                    creature.phase = CreaturePhase::Stalking;
                }
            } else {
                step_toward_nearest(id, state, env);
            }
        }
    }
}

/// Re-resolves a slasher's target lock. Returns true when a target is held
/// after the update.
///
/// A previous target still in line of sight is kept and its position
/// recorded. Otherwise: no explorer in sight means no target; exactly one
/// is acquired; two or more are indistinguishable and the slasher locks
/// none, forgetting the last-seen position.
fn resolve_target(id: EntityId, state: &mut GameState, env: &GameEnv<'_>) -> bool {
    let Some(creature) = state.creature(id) else {
        return false;
    };
    let origin = creature.position;
    let previous = creature.target;

    let mut in_sight: ArrayVec<(EntityId, Position), { GameConfig::MAX_EXPLORERS }> = state
        .explorers
        .iter()
        .filter(|explorer| env.routing.line_of_sight(origin, explorer.position))
        .map(|explorer| (explorer.id, explorer.position))
        .collect();

    if let Some(target) = previous
        && let Some(&(_, position)) = in_sight.iter().find(|(id, _)| *id == target)
    {
        if let Some(creature) = state.creature_mut(id) {
            creature.last_seen = Some(position);
        }
        return true;
    }

    let Some(creature) = state.creature_mut(id) else {
        return false;
    };
    match in_sight.len() {
        0 => {
            creature.target = None;
            false
        }
        1 => {
            let (target, position) = in_sight.remove(0);
            creature.target = Some(target);
            creature.last_seen = Some(position);
            true
        }
        _ => {
            creature.target = None;
            creature.last_seen = None;
            false
        }
    }
}

/// Moves the creature one routed hop toward the nearest reachable explorer
/// (first-encountered wins distance ties).
fn step_toward_nearest(id: EntityId, state: &mut GameState, env: &GameEnv<'_>) {
    let Some(origin) = state.creature(id).map(|creature| creature.position) else {
        return;
    };

    let mut nearest: Option<(u32, Position)> = None;
    for explorer in &state.explorers {
        if let Some(distance) = env.routing.distance(origin, explorer.position)
            && nearest.is_none_or(|(best, _)| distance < best)
        {
            nearest = Some((distance, explorer.position));
        }
    }

    if let Some((_, goal)) = nearest
        && let Some(hop) = env.routing.next_hop(origin, goal)
        && let Some(creature) = state.creature_mut(id)
    {
        creature.position = hop;
    }
}

/// Every explorer on `cell` takes the contact sanity penalty.
fn scare_explorers(cell: Position, state: &mut GameState) {
    for explorer in state.explorers.iter_mut() {
        if explorer.position == cell {
            explorer.sanity -= GameConfig::CONTACT_SANITY_PENALTY;
        }
    }
}
