use super::{EntityId, Position};

/// One explorer: position, sanity, remaining ability charges, and the two
/// per-turn condition flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExplorerState {
    pub id: EntityId,
    pub position: Position,
    /// Health-like resource; the explorer is removed once it reaches 0.
    pub sanity: i32,
    /// Remaining heal-aura charges.
    pub plans: i32,
    /// Remaining stealth-aura charges.
    pub lights: i32,
    /// Forced to skip its action (yelled at) until the yell effect expires.
    pub stuck: bool,
    /// A self-cast aura is currently running; a second one cannot stack.
    pub has_active_effect: bool,
}

impl ExplorerState {
    pub fn new(id: EntityId, position: Position, sanity: i32, plans: i32, lights: i32) -> Self {
        Self {
            id,
            position,
            sanity,
            plans,
            lights,
            stuck: false,
            has_active_effect: false,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.sanity > 0
    }
}
