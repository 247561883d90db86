//! External interface bridges
//!
//! The engine never touches the upgrade or energy subsystems directly; it
//! goes through these two traits. `CoreBridge` is the default
//! implementation over the in-crate `MechanicalCore` component. Injecting
//! the bridges (instead of reading process-wide statics) is what makes
//! dispatch deterministic under test.

use std::collections::HashMap;

use hecs::Entity;

use crate::synergy::module::ModuleId;
use crate::world::{GameWorld, MechanicalCore};

// ============================================================================
// Module snapshot
// ============================================================================

/// Read-only view of one player's active modules, taken once per dispatch.
///
/// Only active modules appear; an absent id reads as level 0.
#[derive(Debug, Clone, Default)]
pub struct ModuleSnapshot {
    levels: HashMap<ModuleId, u32>,
}

impl ModuleSnapshot {
    pub fn insert(&mut self, id: ModuleId, level: u32) {
        self.levels.insert(id, level);
    }

    pub fn level(&self, id: &ModuleId) -> u32 {
        self.levels.get(id).copied().unwrap_or(0)
    }

    pub fn contains(&self, id: &ModuleId) -> bool {
        self.levels.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

impl FromIterator<(ModuleId, u32)> for ModuleSnapshot {
    fn from_iter<T: IntoIterator<Item = (ModuleId, u32)>>(iter: T) -> Self {
        Self {
            levels: iter.into_iter().collect(),
        }
    }
}

// ============================================================================
// Traits
// ============================================================================

/// Owned by the external upgrade subsystem: who has which modules.
pub trait ModuleProvider: Send + Sync {
    /// Installed level of a module, 0 when absent or inactive-at-level-0.
    fn module_level(&self, world: &GameWorld, player: Entity, id: &ModuleId) -> u32;

    /// Active means installed above level 0, not paused, and not blocked by
    /// the energy-status gate.
    fn is_module_active(&self, world: &GameWorld, player: Entity, id: &ModuleId) -> bool;

    /// Snapshot of every currently active module with its level.
    fn active_modules(&self, world: &GameWorld, player: Entity) -> ModuleSnapshot;
}

/// Owned by the external energy subsystem: the shared energy pool.
pub trait EnergyBridge: Send + Sync {
    fn current_energy(&self, world: &GameWorld, player: Entity) -> i32;

    fn max_energy(&self, world: &GameWorld, player: Entity) -> i32;

    /// Fill fraction in 0.0..=1.0.
    fn energy_percent(&self, world: &GameWorld, player: Entity) -> f32 {
        let max = self.max_energy(world, player);
        if max <= 0 {
            0.0
        } else {
            self.current_energy(world, player) as f32 / max as f32
        }
    }

    fn has_energy(&self, world: &GameWorld, player: Entity, amount: i32) -> bool {
        self.current_energy(world, player) >= amount
    }

    /// Drain up to `amount`; returns what was actually consumed.
    fn consume_energy(&self, world: &mut GameWorld, player: Entity, amount: i32) -> i32;

    fn add_energy(&self, world: &mut GameWorld, player: Entity, amount: i32);
}

// ============================================================================
// Default implementation over MechanicalCore
// ============================================================================

/// Bridge backed by the `MechanicalCore` component on the player entity.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoreBridge;

impl CoreBridge {
    fn with_core<R>(world: &GameWorld, player: Entity, f: impl FnOnce(&MechanicalCore) -> R) -> Option<R> {
        world.ecs().get::<&MechanicalCore>(player).ok().map(|core| f(&core))
    }
}

impl ModuleProvider for CoreBridge {
    fn module_level(&self, world: &GameWorld, player: Entity, id: &ModuleId) -> u32 {
        Self::with_core(world, player, |core| core.level(id)).unwrap_or(0)
    }

    fn is_module_active(&self, world: &GameWorld, player: Entity, id: &ModuleId) -> bool {
        Self::with_core(world, player, |core| core.is_active(id)).unwrap_or(false)
    }

    fn active_modules(&self, world: &GameWorld, player: Entity) -> ModuleSnapshot {
        Self::with_core(world, player, |core| {
            core.modules()
                .filter(|(id, _)| core.is_active(id))
                .map(|(id, module)| (id.clone(), module.level))
                .collect()
        })
        .unwrap_or_default()
    }
}

impl EnergyBridge for CoreBridge {
    fn current_energy(&self, world: &GameWorld, player: Entity) -> i32 {
        Self::with_core(world, player, |core| core.energy).unwrap_or(0)
    }

    fn max_energy(&self, world: &GameWorld, player: Entity) -> i32 {
        Self::with_core(world, player, |core| core.max_energy).unwrap_or(0)
    }

    fn consume_energy(&self, world: &mut GameWorld, player: Entity, amount: i32) -> i32 {
        match world.ecs_mut().get::<&mut MechanicalCore>(player) {
            Ok(mut core) => {
                let drained = amount.clamp(0, core.energy);
                core.energy -= drained;
                drained
            }
            Err(_) => 0,
        }
    }

    fn add_energy(&self, world: &mut GameWorld, player: Entity, amount: i32) {
        if let Ok(mut core) = world.ecs_mut().get::<&mut MechanicalCore>(player) {
            core.energy = (core.energy + amount.max(0)).min(core.max_energy);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::Position;
    use uuid::Uuid;

    fn setup() -> (GameWorld, Entity) {
        let mut world = GameWorld::new();
        let mut core = MechanicalCore::new(5000);
        core.install("damage_boost", 2);
        core.install("thorns", 1);
        core.install("offline_module", 0);
        let player = world.spawn_player("Tester", Uuid::new_v4(), Position::new(0, 0), core);
        (world, player)
    }

    #[test]
    fn test_snapshot_holds_only_active_modules() {
        let (world, player) = setup();
        let snapshot = CoreBridge.active_modules(&world, player);
        assert_eq!(snapshot.level(&ModuleId::new("DAMAGE_BOOST")), 2);
        assert_eq!(snapshot.level(&ModuleId::new("THORNS")), 1);
        assert!(!snapshot.contains(&ModuleId::new("OFFLINE_MODULE")));
        assert_eq!(snapshot.level(&ModuleId::new("NOT_INSTALLED")), 0);
    }

    #[test]
    fn test_consume_energy_reports_actual() {
        let (mut world, player) = setup();
        assert_eq!(CoreBridge.consume_energy(&mut world, player, 3000), 3000);
        assert_eq!(CoreBridge.consume_energy(&mut world, player, 3000), 2000);
        assert_eq!(CoreBridge.current_energy(&world, player), 0);
    }

    #[test]
    fn test_add_energy_capped_at_max() {
        let (mut world, player) = setup();
        CoreBridge.add_energy(&mut world, player, 10_000);
        assert_eq!(CoreBridge.current_energy(&world, player), 5000);
    }

    #[test]
    fn test_energy_percent_exact_boundary() {
        let (mut world, player) = setup();
        CoreBridge.consume_energy(&mut world, player, 1000);
        assert_eq!(CoreBridge.energy_percent(&world, player), 0.8);
    }
}
