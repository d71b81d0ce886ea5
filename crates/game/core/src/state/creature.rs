use super::{EntityId, Position};

/// The two hostile creature families, dispatched by tag in the transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CreatureKind {
    /// Chases the nearest explorer and consumes itself on contact.
    Wanderer,
    /// Stalks a line-of-sight target, rushes it, then recovers.
    Slasher,
}

/// Creature state-machine phase. The wire protocol encodes these as the
/// integer codes 0 through 4.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CreaturePhase {
    Spawning,
    Wandering,
    Stalking,
    Rushing,
    Stunned,
}

impl CreaturePhase {
    /// Decodes a wire state code.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(CreaturePhase::Spawning),
            1 => Some(CreaturePhase::Wandering),
            2 => Some(CreaturePhase::Stalking),
            3 => Some(CreaturePhase::Rushing),
            4 => Some(CreaturePhase::Stunned),
            _ => None,
        }
    }

    pub fn code(self) -> i32 {
        match self {
            CreaturePhase::Spawning => 0,
            CreaturePhase::Wandering => 1,
            CreaturePhase::Stalking => 2,
            CreaturePhase::Rushing => 3,
            CreaturePhase::Stunned => 4,
        }
    }
}

/// One hostile creature.
///
/// `time_left` is phase-dependent: spawn countdown while Spawning, life
/// time for a wandering wanderer, stalk countdown while Stalking, stun
/// countdown while Stunned. `target` and `last_seen` are only ever set for
/// slashers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CreatureState {
    pub id: EntityId,
    pub kind: CreatureKind,
    pub position: Position,
    pub phase: CreaturePhase,
    pub time_left: i32,
    /// Explorer currently locked as the rush target.
    pub target: Option<EntityId>,
    /// Where the locked target was last observed in line of sight.
    pub last_seen: Option<Position>,
}

impl CreatureState {
    pub fn new(
        id: EntityId,
        kind: CreatureKind,
        position: Position,
        phase: CreaturePhase,
        time_left: i32,
    ) -> Self {
        Self {
            id,
            kind,
            position,
            phase,
            time_left,
            target: None,
            last_seen: None,
        }
    }
}
