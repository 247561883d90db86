//! Game session: the host-side glue between engine events and the synergy
//! dispatcher. A session owns the world, the registered definitions, the
//! per-player states, and the bridge implementations, and translates game
//! happenings (ticks, attacks, damage, posture changes) into dispatches.

use std::collections::HashMap;

use hecs::Entity;
use log::{debug, info};
use uuid::Uuid;

use crate::bridge::{CoreBridge, EnergyBridge, ModuleProvider};
use crate::synergy::{
    DispatchReport, EventPayload, PlayerStates, Result, SynergyContext, SynergyEvent,
    SynergyManager, SynergyError, TICKS_PER_SECOND,
};
use crate::world::{GameWorld, MechanicalCore, Position};

/// Tick-triggered definitions run on this cadence, not every tick.
const TICK_DISPATCH_INTERVAL: u64 = TICKS_PER_SECOND;

/// Health fraction under which a downward crossing fires `LowHealth`.
const LOW_HEALTH_FRACTION: f32 = 0.30;

const CRIT_MULTIPLIER: f32 = 1.5;

pub struct GameSession {
    world: GameWorld,
    manager: SynergyManager,
    states: PlayerStates,
    provider: Box<dyn ModuleProvider>,
    energy: Box<dyn EnergyBridge>,
    players: HashMap<Uuid, Entity>,
}

impl GameSession {
    pub fn new(manager: SynergyManager) -> Self {
        Self::with_bridges(manager, Box::new(CoreBridge), Box::new(CoreBridge))
    }

    /// Plug in host-specific bridge implementations. The default pair reads
    /// the in-crate `MechanicalCore` component.
    pub fn with_bridges(
        manager: SynergyManager,
        provider: Box<dyn ModuleProvider>,
        energy: Box<dyn EnergyBridge>,
    ) -> Self {
        Self {
            world: GameWorld::new(),
            manager,
            states: PlayerStates::new(),
            provider,
            energy,
            players: HashMap::new(),
        }
    }

    pub fn world(&self) -> &GameWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut GameWorld {
        &mut self.world
    }

    pub fn manager(&self) -> &SynergyManager {
        &self.manager
    }

    pub fn states(&self) -> &PlayerStates {
        &self.states
    }

    pub fn player_entity(&self, id: &Uuid) -> Option<Entity> {
        self.players.get(id).copied()
    }

    // ========================================================================
    // Player lifecycle
    // ========================================================================

    pub fn connect(&mut self, name: &str, core: MechanicalCore, pos: Position) -> Uuid {
        let id = Uuid::new_v4();
        let entity = self.world.spawn_player(name, id, pos, core);
        self.states.get_or_create(id, entity, self.world.now());
        self.players.insert(id, entity);
        info!("player '{name}' connected as {id}");
        id
    }

    /// Logout: despawn the entity and drop all synergy state. Nothing
    /// persists across sessions.
    pub fn disconnect(&mut self, id: &Uuid) {
        if let Some(entity) = self.players.remove(id) {
            self.world.despawn(entity);
        }
        self.states.remove(id);
        info!("player {id} disconnected");
    }

    // ========================================================================
    // Tick
    // ========================================================================

    /// Advance the whole session one game tick. Runs periodic status
    /// effects, per-player timers (firing expiry hooks), and the
    /// once-per-second `Tick` dispatch for every connected player.
    pub fn tick(&mut self) -> Result<()> {
        self.world.advance();
        self.states.tick_all(&mut self.world);

        if self.world.now() % TICK_DISPATCH_INTERVAL == 0 {
            let ids: Vec<Uuid> = self.players.keys().copied().collect();
            for id in ids {
                self.dispatch(&id, SynergyEvent::Tick, EventPayload::default())?;
            }
        }
        Ok(())
    }

    // ========================================================================
    // Combat events
    // ========================================================================

    /// Player swings at `target`. A falling attacker lands a critical hit,
    /// which boosts the base damage and dispatches `CriticalHit` instead of
    /// `Attack`. Whatever the definitions leave in `current_amount` is then
    /// applied to the target; a kill dispatches `Kill` before the despawn.
    pub fn attack(&mut self, attacker: &Uuid, target: Entity, base_damage: f32) -> Result<DispatchReport> {
        let falling = self
            .entity_of(attacker)
            .ok()
            .and_then(|e| self.world.posture(e))
            .map(|p| p.falling)
            .unwrap_or(false);
        let (event, damage) = if falling {
            (SynergyEvent::CriticalHit, base_damage * CRIT_MULTIPLIER)
        } else {
            (SynergyEvent::Attack, base_damage)
        };

        if let Some(state) = self.states.get_mut(attacker) {
            state.increment_combo();
        }

        let (report, amount) =
            self.dispatch(attacker, event, EventPayload::damage_to(target, damage))?;
        self.world.damage(target, amount);
        debug!("attack for {amount:.1} ({} synergies fired)", report.fired_count());

        if self.world.is_dead(target) {
            let (kill_report, _) =
                self.dispatch(attacker, SynergyEvent::Kill, EventPayload::target(target))?;
            self.world.despawn(target);
            return Ok(merge(report, kill_report));
        }
        Ok(report)
    }

    /// Player takes a hit. Definitions see the incoming amount and may
    /// reduce or amplify it; the remainder is applied to the player's
    /// health. A downward crossing of the low-health line fires
    /// `LowHealth` once; death fires `Death` and despawns.
    pub fn hurt(&mut self, victim: &Uuid, attacker: Option<Entity>, amount: f32) -> Result<DispatchReport> {
        self.hurt_inner(victim, SynergyEvent::Hurt, attacker, amount)
    }

    /// Damage with no attacking entity (fall, fire, void).
    pub fn environmental_damage(&mut self, victim: &Uuid, amount: f32) -> Result<DispatchReport> {
        self.hurt_inner(victim, SynergyEvent::EnvironmentalDamage, None, amount)
    }

    fn hurt_inner(
        &mut self,
        victim: &Uuid,
        event: SynergyEvent,
        attacker: Option<Entity>,
        amount: f32,
    ) -> Result<DispatchReport> {
        let entity = self.entity_of(victim)?;
        let before = self.world.health(entity).map(|h| h.fraction()).unwrap_or(0.0);

        let (mut report, final_amount) =
            self.dispatch(victim, event, EventPayload::damage_from(attacker, amount))?;
        self.world.damage(entity, final_amount);

        let after = self.world.health(entity).map(|h| h.fraction()).unwrap_or(0.0);
        if before >= LOW_HEALTH_FRACTION && after < LOW_HEALTH_FRACTION && after > 0.0 {
            let (low, _) = self.dispatch(victim, SynergyEvent::LowHealth, EventPayload::default())?;
            report = merge(report, low);
        }

        if self.world.is_dead(entity) {
            let (death, _) = self.dispatch(victim, SynergyEvent::Death, EventPayload::default())?;
            report = merge(report, death);
            self.disconnect(victim);
        }
        Ok(report)
    }

    // ========================================================================
    // Posture and activation events
    // ========================================================================

    pub fn set_sneaking(&mut self, id: &Uuid, sneaking: bool) -> Result<DispatchReport> {
        let entity = self.entity_of(id)?;
        if let Some(mut posture) = self.world.posture(entity) {
            posture.sneaking = sneaking;
            self.world.set_posture(entity, posture);
        }
        if sneaking {
            let (report, _) = self.dispatch(id, SynergyEvent::Sneak, EventPayload::default())?;
            return Ok(report);
        }
        Ok(DispatchReport::default())
    }

    pub fn set_sprinting(&mut self, id: &Uuid, sprinting: bool) -> Result<DispatchReport> {
        let entity = self.entity_of(id)?;
        if let Some(mut posture) = self.world.posture(entity) {
            posture.sprinting = sprinting;
            self.world.set_posture(entity, posture);
        }
        if sprinting {
            let (report, _) = self.dispatch(id, SynergyEvent::Sprint, EventPayload::default())?;
            return Ok(report);
        }
        Ok(DispatchReport::default())
    }

    pub fn set_falling(&mut self, id: &Uuid, falling: bool) -> Result<()> {
        let entity = self.entity_of(id)?;
        if let Some(mut posture) = self.world.posture(entity) {
            posture.falling = falling;
            self.world.set_posture(entity, posture);
        }
        Ok(())
    }

    pub fn block(&mut self, id: &Uuid, perfect: bool) -> Result<DispatchReport> {
        let event = if perfect {
            SynergyEvent::PerfectBlock
        } else {
            SynergyEvent::Block
        };
        let (report, _) = self.dispatch(id, event, EventPayload::default())?;
        Ok(report)
    }

    pub fn activate_skill(&mut self, id: &Uuid) -> Result<DispatchReport> {
        let (report, _) = self.dispatch(id, SynergyEvent::SkillActivate, EventPayload::default())?;
        Ok(report)
    }

    /// Explicit activation, for keybinds and commands.
    pub fn trigger_manual(&mut self, id: &Uuid) -> Result<DispatchReport> {
        let (report, _) = self.dispatch(id, SynergyEvent::Manual, EventPayload::default())?;
        Ok(report)
    }

    // ========================================================================
    // Dispatch plumbing
    // ========================================================================

    fn entity_of(&self, id: &Uuid) -> Result<Entity> {
        self.players
            .get(id)
            .copied()
            .ok_or(SynergyError::UnknownPlayer(*id))
    }

    /// One dispatch: snapshot the player's active modules, build the
    /// context over split borrows of the session, run the manager, and hand
    /// back both the report and the post-dispatch damage amount.
    fn dispatch(
        &mut self,
        id: &Uuid,
        event: SynergyEvent,
        payload: EventPayload,
    ) -> Result<(DispatchReport, f32)> {
        let entity = self.entity_of(id)?;
        let modules = self.provider.active_modules(&self.world, entity);
        let state = self
            .states
            .get_mut(id)
            .ok_or(SynergyError::UnknownPlayer(*id))?;

        let mut ctx = SynergyContext::new(
            event,
            payload,
            modules,
            &mut self.world,
            state,
            self.energy.as_ref(),
        );
        let report = self.manager.dispatch(&mut ctx);
        let amount = ctx.current_amount;
        Ok((report, amount))
    }
}

fn merge(mut a: DispatchReport, b: DispatchReport) -> DispatchReport {
    a.fired.extend(b.fired);
    a.gated.extend(b.gated);
    a
}
