//! Dispatch context handed to conditions and effects.

use hecs::Entity;

use crate::bridge::{EnergyBridge, ModuleSnapshot};
use crate::world::GameWorld;

use super::event::SynergyEvent;
use super::module::ModuleId;
use super::state::SynergyPlayerState;

/// Event-specific data attached to a dispatch. Absent fields mean the event
/// does not carry that datum (a `Tick` has no target, a `Sneak` no damage).
#[derive(Debug, Clone, Copy, Default)]
pub struct EventPayload {
    pub target: Option<Entity>,
    pub attacker: Option<Entity>,
    pub damage: Option<f32>,
}

impl EventPayload {
    pub fn target(target: Entity) -> Self {
        Self {
            target: Some(target),
            ..Self::default()
        }
    }

    pub fn damage_to(target: Entity, damage: f32) -> Self {
        Self {
            target: Some(target),
            damage: Some(damage),
            ..Self::default()
        }
    }

    pub fn damage_from(attacker: Option<Entity>, damage: f32) -> Self {
        Self {
            attacker,
            damage: Some(damage),
            ..Self::default()
        }
    }
}

/// Everything a condition or effect can see and touch during one dispatch.
///
/// `original_damage` is frozen at dispatch start; `current_amount` is the
/// running total that damage-modifying effects read and write, so later
/// definitions in priority order compose over earlier ones. The module
/// snapshot is taken once per dispatch and shared by every definition.
pub struct SynergyContext<'a> {
    event: SynergyEvent,
    player: Entity,
    target: Option<Entity>,
    attacker: Option<Entity>,
    original_damage: f32,
    pub current_amount: f32,
    modules: ModuleSnapshot,
    pub world: &'a mut GameWorld,
    pub state: &'a mut SynergyPlayerState,
    energy: &'a dyn EnergyBridge,
}

impl<'a> SynergyContext<'a> {
    pub fn new(
        event: SynergyEvent,
        payload: EventPayload,
        modules: ModuleSnapshot,
        world: &'a mut GameWorld,
        state: &'a mut SynergyPlayerState,
        energy: &'a dyn EnergyBridge,
    ) -> Self {
        let player = state.entity();
        let damage = payload.damage.unwrap_or(0.0);
        Self {
            event,
            player,
            target: payload.target,
            attacker: payload.attacker,
            original_damage: damage,
            current_amount: damage,
            modules,
            world,
            state,
            energy,
        }
    }

    pub fn event(&self) -> SynergyEvent {
        self.event
    }

    pub fn player(&self) -> Entity {
        self.player
    }

    pub fn target(&self) -> Option<Entity> {
        self.target
    }

    pub fn attacker(&self) -> Option<Entity> {
        self.attacker
    }

    /// Damage as it entered the dispatch, untouched by effects.
    pub fn original_damage(&self) -> f32 {
        self.original_damage
    }

    pub fn now(&self) -> u64 {
        self.world.now()
    }

    /// Installed level of a module, 0 when absent or inactive. Total, so
    /// conditions and scaling formulas never branch on missing entries.
    pub fn module_level(&self, id: &ModuleId) -> u32 {
        self.modules.level(id)
    }

    pub fn modules(&self) -> &ModuleSnapshot {
        &self.modules
    }

    // energy passthroughs; the bridge owns the accounting

    pub fn current_energy(&self) -> i32 {
        self.energy.current_energy(self.world, self.player)
    }

    pub fn max_energy(&self) -> i32 {
        self.energy.max_energy(self.world, self.player)
    }

    pub fn energy_percent(&self) -> f32 {
        self.energy.energy_percent(self.world, self.player)
    }

    pub fn has_energy(&self, amount: i32) -> bool {
        self.energy.has_energy(self.world, self.player, amount)
    }

    pub fn consume_energy(&mut self, amount: i32) -> i32 {
        self.energy.consume_energy(self.world, self.player, amount)
    }

    pub fn add_energy(&mut self, amount: i32) {
        self.energy.add_energy(self.world, self.player, amount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::{CoreBridge, ModuleProvider};
    use crate::world::{MechanicalCore, Position};
    use uuid::Uuid;

    #[test]
    fn test_context_freezes_original_damage() {
        let mut world = GameWorld::new();
        let mut core = MechanicalCore::new(1000);
        core.energy = 500;
        let player = world.spawn_player("Tester", Uuid::new_v4(), Position::new(0, 0), core);
        let mut state = SynergyPlayerState::new(Uuid::new_v4(), player, 0);
        let bridge = CoreBridge;
        let modules = bridge.active_modules(&world, player);

        let mut ctx = SynergyContext::new(
            SynergyEvent::Attack,
            EventPayload::damage_to(player, 8.0),
            modules,
            &mut world,
            &mut state,
            &bridge,
        );
        ctx.current_amount *= 1.5;
        assert_eq!(ctx.original_damage(), 8.0);
        assert_eq!(ctx.current_amount, 12.0);

        assert_eq!(ctx.current_energy(), 500);
        assert_eq!(ctx.consume_energy(200), 200);
        assert_eq!(ctx.current_energy(), 300);
    }
}
