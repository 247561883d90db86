//! Combat components
//!
//! The minimal component set the synergy engine touches. The real host
//! game owns far more; this is the interface-boundary slice.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::synergy::module::ModuleId;

// ============================================================================
// Position & Movement
// ============================================================================

/// Position in the game world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chebyshev distance (allows diagonal)
    pub fn chebyshev_distance(&self, other: &Position) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }
}

// ============================================================================
// Identity
// ============================================================================

/// Name component for entities
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Name(pub String);

impl Name {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

/// Marks an entity as a player and carries its session identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerId(pub Uuid);

/// Marks an entity as hostile to players
#[derive(Debug, Clone, Copy, Default)]
pub struct Hostile;

// ============================================================================
// Vitals & Posture
// ============================================================================

/// Health pool. Fractional values are real: half-heart regen and lifesteal
/// amounts below 1.0 must not round away.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    /// Apply damage, clamped at zero. Returns the amount actually removed.
    pub fn take_damage(&mut self, amount: f32) -> f32 {
        let applied = amount.min(self.current).max(0.0);
        self.current -= applied;
        applied
    }

    /// Heal up to max. Returns the amount actually restored.
    pub fn heal(&mut self, amount: f32) -> f32 {
        let applied = amount.min(self.max - self.current).max(0.0);
        self.current += applied;
        applied
    }

    pub fn fraction(&self) -> f32 {
        if self.max <= 0.0 {
            0.0
        } else {
            self.current / self.max
        }
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0.0
    }
}

/// Player movement posture, toggled by the host's input layer.
#[derive(Debug, Clone, Copy, Default)]
pub struct Posture {
    pub sneaking: bool,
    pub sprinting: bool,
    /// True while airborne and descending; falling hits land critically.
    pub falling: bool,
}

// ============================================================================
// Status Effects
// ============================================================================

/// Potion-like status kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusKind {
    Slow,
    Weakness,
    Speed,
    Invisibility,
    Glowing,
    Regeneration,
    Burning,
}

impl StatusKind {
    pub fn name(&self) -> &'static str {
        match self {
            StatusKind::Slow => "Slow",
            StatusKind::Weakness => "Weakness",
            StatusKind::Speed => "Speed",
            StatusKind::Invisibility => "Invisibility",
            StatusKind::Glowing => "Glowing",
            StatusKind::Regeneration => "Regen",
            StatusKind::Burning => "Burning",
        }
    }

    /// Does this status tick health up or down once per second?
    pub fn is_periodic(&self) -> bool {
        matches!(self, StatusKind::Regeneration | StatusKind::Burning)
    }
}

/// A single active status
#[derive(Debug, Clone, Copy)]
pub struct StatusEffect {
    pub kind: StatusKind,
    /// Remaining duration in ticks
    pub remaining: u32,
    pub amplifier: u32,
}

/// All statuses on one entity
#[derive(Debug, Clone, Default)]
pub struct StatusEffects {
    pub effects: Vec<StatusEffect>,
}

impl StatusEffects {
    /// Add a status: refreshes duration (keeping the longer) and keeps the
    /// higher amplifier rather than stacking.
    pub fn add(&mut self, kind: StatusKind, duration: u32, amplifier: u32) {
        if let Some(existing) = self.effects.iter_mut().find(|e| e.kind == kind) {
            existing.remaining = existing.remaining.max(duration);
            existing.amplifier = existing.amplifier.max(amplifier);
        } else {
            self.effects.push(StatusEffect {
                kind,
                remaining: duration,
                amplifier,
            });
        }
    }

    pub fn has(&self, kind: StatusKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind && e.remaining > 0)
    }

    pub fn remove(&mut self, kind: StatusKind) {
        self.effects.retain(|e| e.kind != kind);
    }
}

// ============================================================================
// Mechanical Core
// ============================================================================

/// One installed upgrade module
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct InstalledModule {
    pub level: u32,
    pub paused: bool,
}

/// The player's mechanical core: installed modules plus the energy pool.
///
/// This component is the in-crate stand-in for the external upgrade
/// subsystem; the engine only ever reads it through the bridge traits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MechanicalCore {
    modules: HashMap<ModuleId, InstalledModule>,
    pub energy: i32,
    pub max_energy: i32,
    /// Energy-status gate: an offline core suspends every module.
    pub online: bool,
}

impl MechanicalCore {
    pub fn new(max_energy: i32) -> Self {
        Self {
            modules: HashMap::new(),
            energy: max_energy,
            max_energy,
            online: true,
        }
    }

    pub fn install(&mut self, id: impl AsRef<str>, level: u32) -> &mut Self {
        self.modules.insert(
            ModuleId::new(id),
            InstalledModule {
                level,
                paused: false,
            },
        );
        self
    }

    pub fn set_paused(&mut self, id: &ModuleId, paused: bool) {
        if let Some(module) = self.modules.get_mut(id) {
            module.paused = paused;
        }
    }

    pub fn level(&self, id: &ModuleId) -> u32 {
        self.modules.get(id).map(|m| m.level).unwrap_or(0)
    }

    /// A module is active when installed above level 0, not paused, and the
    /// core itself is online.
    pub fn is_active(&self, id: &ModuleId) -> bool {
        self.online
            && self
                .modules
                .get(id)
                .map(|m| m.level > 0 && !m.paused)
                .unwrap_or(false)
    }

    pub fn modules(&self) -> impl Iterator<Item = (&ModuleId, &InstalledModule)> {
        self.modules.iter()
    }
}
