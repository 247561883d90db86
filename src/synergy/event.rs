//! Gameplay events that can trigger synergies

use serde::{Deserialize, Serialize};

/// Ticks per second of game time. Durations and cooldowns are denominated
/// in ticks so they stay deterministic under variable tick rate.
pub const TICKS_PER_SECOND: u64 = 20;

/// Convert whole seconds to ticks.
pub const fn secs(seconds: u64) -> u64 {
    seconds * TICKS_PER_SECOND
}

/// The kinds of gameplay events the host forwards into the engine.
///
/// Each dispatch carries exactly one of these; definitions declare the
/// subset they react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SynergyEvent {
    /// Periodic per-player pulse (once per second of game time)
    Tick,
    /// Player lands a melee/ranged hit
    Attack,
    /// Player lands a falling (critical) hit
    CriticalHit,
    /// Player takes damage from an entity
    Hurt,
    /// Player takes fire/drowning/fall/similar damage
    EnvironmentalDamage,
    /// Player kills an entity
    Kill,
    /// Player dies
    Death,
    /// Player starts sneaking
    Sneak,
    /// Player starts sprinting
    Sprint,
    /// Player blocks an attack
    Block,
    /// Player blocks with perfect timing
    PerfectBlock,
    /// Key-bound manual trigger
    Manual,
    /// Explicit skill activation
    SkillActivate,
    /// Health crossed below the critical fraction
    LowHealth,
}

impl SynergyEvent {
    /// Short name used in log lines.
    pub fn name(&self) -> &'static str {
        match self {
            SynergyEvent::Tick => "tick",
            SynergyEvent::Attack => "attack",
            SynergyEvent::CriticalHit => "critical_hit",
            SynergyEvent::Hurt => "hurt",
            SynergyEvent::EnvironmentalDamage => "environmental_damage",
            SynergyEvent::Kill => "kill",
            SynergyEvent::Death => "death",
            SynergyEvent::Sneak => "sneak",
            SynergyEvent::Sprint => "sprint",
            SynergyEvent::Block => "block",
            SynergyEvent::PerfectBlock => "perfect_block",
            SynergyEvent::Manual => "manual",
            SynergyEvent::SkillActivate => "skill_activate",
            SynergyEvent::LowHealth => "low_health",
        }
    }

    /// Whether this event carries a damage amount worth composing on.
    pub fn carries_damage(&self) -> bool {
        matches!(
            self,
            SynergyEvent::Attack
                | SynergyEvent::CriticalHit
                | SynergyEvent::Hurt
                | SynergyEvent::EnvironmentalDamage
        )
    }
}
