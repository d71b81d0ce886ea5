//! The deterministic turn transition.
//!
//! [`step`] is the authoritative reducer for [`GameState`]: it never
//! mutates its input, and applies the turn's combined orders in a fixed
//! phase order so side effects always resolve identically. The creature
//! state machines live in [`creatures`] and are dispatched from here.

mod creatures;

use arrayvec::ArrayVec;

use crate::action::{Action, TurnOrders};
use crate::config::GameConfig;
use crate::env::GameEnv;
use crate::state::{EffectKind, EffectState, EntityId, GameState, Position};

/// Advances `state` by one turn under `orders`.
///
/// Phase order: yell resolution, movement/ability orders, effect
/// application and expiry, creature updates (ascending id), passive sanity
/// drain, removal. With one or zero explorers left the game is effectively
/// over: the order/effect/creature phases are skipped and only the passive
/// drain and the removal pass still run.
pub fn step(state: &GameState, orders: &TurnOrders, env: &GameEnv<'_>) -> GameState {
    let mut next = state.clone();
    next.turn += 1;

    if next.explorers.len() > 1 {
        // Yells override their victims' orders, so the order book is
        // copied and patched before anything moves.
        let mut working = orders.clone();
        resolve_yells(&mut next, orders, &mut working, env);
        apply_orders(&mut next, &working, env);
        apply_effects(&mut next, env);
        update_creatures(&mut next, env);
    }

    drain_sanity(&mut next, env.config);
    remove_dead(&mut next);

    next
}

/// Phase 1: every yelling explorer forces adjacent, non-yelling explorers
/// it has not yelled before into a forced wait.
///
/// Yell detection reads the orders as issued (`issued`); overrides land in
/// `working` so later phases see the patched book.
fn resolve_yells(
    next: &mut GameState,
    issued: &TurnOrders,
    working: &mut TurnOrders,
    env: &GameEnv<'_>,
) {
    let ids: ArrayVec<EntityId, { GameConfig::MAX_EXPLORERS }> =
        next.explorers.iter().map(|explorer| explorer.id).collect();

    for &caster in &ids {
        if issued.get(caster) != Action::Yell {
            continue;
        }
        let Some(origin) = next.explorer(caster).map(|explorer| explorer.position) else {
            continue;
        };
        let reach = env.board.adjacent(origin);

        for &victim in &ids {
            if victim == caster
                || issued.get(victim) == Action::Yell
                || next.yelled.contains(&(caster, victim))
            {
                continue;
            }
            let Some(position) = next.explorer(victim).map(|explorer| explorer.position) else {
                continue;
            };
            if !reach.contains(&position) {
                continue;
            }

            working.set(victim, Action::Wait);
            next.yelled.insert((caster, victim));
            if let Some(explorer) = next.explorer_mut(victim) {
                explorer.stuck = true;
            }
            let _ = next.effects.try_push(EffectState::new(
                EffectKind::Yell,
                position,
                GameConfig::YELL_STUN_DURATION,
                Some(caster),
                Some(victim),
            ));
        }
    }
}

/// Phase 2: movement and ability orders for explorers not forced to wait.
fn apply_orders(next: &mut GameState, orders: &TurnOrders, env: &GameEnv<'_>) {
    let ids: ArrayVec<EntityId, { GameConfig::MAX_EXPLORERS }> =
        next.explorers.iter().map(|explorer| explorer.id).collect();

    for id in ids {
        let Some(explorer) = next.explorer(id) else {
            continue;
        };
        if explorer.stuck {
            continue;
        }
        let origin = explorer.position;

        match orders.get(id) {
            Action::Move(destination) => {
                // The controlled explorer resolves its move directly; other
                // explorers' intents are routing targets, one hop per turn.
                let landing = if id == env.controlled {
                    Some(destination)
                } else {
                    env.routing.next_hop(origin, destination)
                };
                if let Some(cell) = landing
                    && let Some(explorer) = next.explorer_mut(id)
                {
                    explorer.position = cell;
                }
            }
            Action::Plan => {
                start_aura(next, id, EffectKind::Plan, GameConfig::PLAN_DURATION);
            }
            Action::Light => {
                start_aura(next, id, EffectKind::Light, GameConfig::LIGHT_DURATION);
            }
            // Yells resolved in phase 1; waiting explorers do nothing.
            Action::Wait | Action::Yell => {}
        }
    }
}

/// Starts a self-cast aura if the explorer holds a charge and has no
/// active effect running.
fn start_aura(next: &mut GameState, id: EntityId, kind: EffectKind, duration: i32) {
    let Some(explorer) = next.explorer_mut(id) else {
        return;
    };
    if explorer.has_active_effect {
        return;
    }
    let charges = match kind {
        EffectKind::Plan => &mut explorer.plans,
        EffectKind::Light => &mut explorer.lights,
        _ => return,
    };
    if *charges <= 0 {
        return;
    }
    *charges -= 1;
    explorer.has_active_effect = true;
    let position = explorer.position;
    let _ = next
        .effects
        .try_push(EffectState::new(kind, position, duration, Some(id), None));
}

/// Phase 3: apply every active effect, then drop the expired and orphaned.
fn apply_effects(next: &mut GameState, env: &GameEnv<'_>) {
    let mut expired: ArrayVec<usize, { GameConfig::MAX_EFFECTS }> = ArrayVec::new();

    for index in 0..next.effects.len() {
        let effect = next.effects[index];

        // Effects whose caster left the game die with them. Casterless
        // (environmental) effects are exempt.
        if let Some(caster) = effect.caster
            && next.explorer(caster).is_none()
        {
            expired.push(index);
            continue;
        }

        match effect.kind {
            EffectKind::Plan => {
                if let Some(caster) = effect.caster {
                    let center = heal_aura(next, caster, env);
                    next.effects[index].position = center;
                }
            }
            EffectKind::Light => {
                // No state effect beyond occupying the caster's aura slot;
                // the position still follows the caster.
                if let Some(caster) = effect.caster
                    && let Some(explorer) = next.explorer(caster)
                {
                    next.effects[index].position = explorer.position;
                }
            }
            EffectKind::Shelter => {
                let cell = effect.position;
                let mut sheltered = 0;
                for explorer in next.explorers.iter_mut() {
                    if explorer.position == cell {
                        explorer.sanity += GameConfig::SHELTER_HEAL;
                        sheltered += 1;
                    }
                }
                // One energy unit per explorer healed, on top of the
                // per-turn tick below.
                next.effects[index].time_left -= sheltered;
            }
            EffectKind::Yell => {}
        }

        next.effects[index].time_left -= 1;
        if next.effects[index].time_left <= 0 {
            expired.push(index);
            expire_effect(next, &effect);
        }
    }

    for &index in expired.iter().rev() {
        next.effects.remove(index);
    }
}

/// Applies one heal-aura tick centered on the caster, returning the aura's
/// new position.
///
/// Every other explorer inside the radius-2 neighborhood heals by the
/// shared amount; the caster heals by the base amount plus the shared
/// amount per explorer reached.
fn heal_aura(next: &mut GameState, caster: EntityId, env: &GameEnv<'_>) -> Position {
    let Some(center) = next.explorer(caster).map(|explorer| explorer.position) else {
        return Position::ORIGIN;
    };

    let mut reached = 0;
    for explorer in next.explorers.iter_mut() {
        if explorer.id != caster && env.routing.in_neighborhood2(center, explorer.position) {
            explorer.sanity += GameConfig::PLAN_SHARED_HEAL;
            reached += 1;
        }
    }
    if let Some(explorer) = next.explorer_mut(caster) {
        explorer.sanity += GameConfig::PLAN_CASTER_HEAL + reached * GameConfig::PLAN_SHARED_HEAL;
    }

    center
}

/// Side effects of an effect reaching the end of its duration.
fn expire_effect(next: &mut GameState, effect: &EffectState) {
    match effect.kind {
        EffectKind::Plan | EffectKind::Light => {
            if let Some(caster) = effect.caster
                && let Some(explorer) = next.explorer_mut(caster)
            {
                explorer.has_active_effect = false;
            }
        }
        EffectKind::Yell => {
            if let Some(victim) = effect.target
                && let Some(explorer) = next.explorer_mut(victim)
            {
                explorer.stuck = false;
            }
        }
        EffectKind::Shelter => {}
    }
}

/// Phase 4: every creature advances its state machine once, in ascending
/// id order.
fn update_creatures(next: &mut GameState, env: &GameEnv<'_>) {
    let mut ids: ArrayVec<EntityId, { GameConfig::MAX_CREATURES }> =
        next.creatures.iter().map(|creature| creature.id).collect();
    ids.sort_unstable();

    for id in ids {
        creatures::advance(id, next, env);
    }
}

/// Phase 5: passive sanity loss, smaller when grouped with another
/// explorer within Manhattan distance 2.
fn drain_sanity(next: &mut GameState, config: &GameConfig) {
    let positions: ArrayVec<(EntityId, Position), { GameConfig::MAX_EXPLORERS }> = next
        .explorers
        .iter()
        .map(|explorer| (explorer.id, explorer.position))
        .collect();

    for explorer in next.explorers.iter_mut() {
        let grouped = positions.iter().any(|&(id, position)| {
            id != explorer.id && explorer.position.manhattan(position) <= GameConfig::GROUP_RADIUS
        });
        explorer.sanity -= if grouped {
            config.sanity_loss_group
        } else {
            config.sanity_loss_lonely
        };
    }
}

/// Phase 6: delete explorers at sanity 0 or below, then scrub every
/// reference to an explorer that is no longer present. Nothing in the
/// returned state may point at a removed id.
fn remove_dead(next: &mut GameState) {
    next.explorers.retain(|explorer| explorer.is_alive());

    let alive: ArrayVec<EntityId, { GameConfig::MAX_EXPLORERS }> =
        next.explorers.iter().map(|explorer| explorer.id).collect();

    next.effects.retain(|effect| {
        effect.caster.is_none_or(|id| alive.contains(&id))
            && effect.target.is_none_or(|id| alive.contains(&id))
    });
    for creature in next.creatures.iter_mut() {
        if let Some(target) = creature.target
            && !alive.contains(&target)
        {
            creature.target = None;
        }
    }
}
