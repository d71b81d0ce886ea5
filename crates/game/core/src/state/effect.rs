use super::{EntityId, Position};

/// Timed consequences of ability use (and the environmental shelter heal).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectKind {
    /// Heal aura following its caster.
    Plan,
    /// Stealth aura following its caster.
    Light,
    /// Stationary heal on a shelter cell.
    Shelter,
    /// Forced wait pinned on a yelled explorer.
    Yell,
}

/// One active effect.
///
/// `position` tracks the caster every turn for the mobile auras and stays
/// fixed for shelter and yell effects. `caster` is `None` for environmental
/// effects delivered without an owner; such effects are exempt from the
/// orphan-removal rule. `target` is only set for yell effects (the victim).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectState {
    pub kind: EffectKind,
    pub position: Position,
    /// Remaining duration; shelter effects also spend one unit per heal.
    pub time_left: i32,
    pub caster: Option<EntityId>,
    pub target: Option<EntityId>,
}

impl EffectState {
    pub fn new(
        kind: EffectKind,
        position: Position,
        time_left: i32,
        caster: Option<EntityId>,
        target: Option<EntityId>,
    ) -> Self {
        Self {
            kind,
            position,
            time_left,
            caster,
            target,
        }
    }
}
