/// Game configuration: the tunables delivered in the setup input plus the
/// fixed rule constants.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameConfig {
    /// Sanity lost per turn with no other explorer nearby.
    pub sanity_loss_lonely: i32,
    /// Sanity lost per turn with at least one other explorer within
    /// Manhattan distance [`GameConfig::GROUP_RADIUS`].
    pub sanity_loss_group: i32,
    /// Turns a wanderer spends spawning before it starts moving.
    pub wanderer_spawn_time: i32,
    /// Turns a wanderer survives after spawning.
    pub wanderer_life_time: i32,
}

impl GameConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum number of explorers in a game.
    pub const MAX_EXPLORERS: usize = 4;
    /// Maximum creatures tracked at once.
    pub const MAX_CREATURES: usize = 48;
    /// Maximum simultaneous ability effects.
    pub const MAX_EFFECTS: usize = 48;

    // ===== fixed rule constants =====
    /// Manhattan radius within which explorers count as grouped.
    pub const GROUP_RADIUS: u32 = 2;
    /// Sanity lost by every explorer on a cell a creature lands on.
    pub const CONTACT_SANITY_PENALTY: i32 = 20;
    /// Turns a heal aura stays active.
    pub const PLAN_DURATION: i32 = 5;
    /// Base self-heal per active heal-aura turn.
    pub const PLAN_CASTER_HEAL: i32 = 2;
    /// Heal granted to (and per) each other explorer inside the aura.
    pub const PLAN_SHARED_HEAL: i32 = 3;
    /// Turns a stealth aura stays active.
    pub const LIGHT_DURATION: i32 = 3;
    /// Turns a yelled explorer is forced to wait.
    pub const YELL_STUN_DURATION: i32 = 2;
    /// Sanity restored per turn to an explorer standing on a shelter effect.
    pub const SHELTER_HEAL: i32 = 5;
    /// Turns a slasher stays stunned after rushing.
    pub const SLASHER_STUN_DURATION: i32 = 6;
    /// Turns a slasher stalks a target before rushing.
    pub const SLASHER_STALK_DURATION: i32 = 2;

    // ===== runtime-tunable defaults (league baseline values) =====
    pub const DEFAULT_SANITY_LOSS_LONELY: i32 = 3;
    pub const DEFAULT_SANITY_LOSS_GROUP: i32 = 1;
    pub const DEFAULT_WANDERER_SPAWN_TIME: i32 = 3;
    pub const DEFAULT_WANDERER_LIFE_TIME: i32 = 40;

    pub fn new(
        sanity_loss_lonely: i32,
        sanity_loss_group: i32,
        wanderer_spawn_time: i32,
        wanderer_life_time: i32,
    ) -> Self {
        Self {
            sanity_loss_lonely,
            sanity_loss_group,
            wanderer_spawn_time,
            wanderer_life_time,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_SANITY_LOSS_LONELY,
            Self::DEFAULT_SANITY_LOSS_GROUP,
            Self::DEFAULT_WANDERER_SPAWN_TIME,
            Self::DEFAULT_WANDERER_LIFE_TIME,
        )
    }
}
