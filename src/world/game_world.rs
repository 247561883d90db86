//! Game world wrapper
//!
//! Wraps the ECS world with the handful of mutations synergy effects are
//! allowed to perform: damage, healing, statuses, knockback, teleports,
//! and player-facing messages. Time is a tick counter owned here.

use hecs::{Entity, World};
use uuid::Uuid;

use super::components::{
    Health, Hostile, MechanicalCore, Name, PlayerId, Position, Posture, StatusEffects, StatusKind,
};
use super::log::{CombatLog, MessageChannel};
use crate::synergy::event::TICKS_PER_SECOND;

pub struct GameWorld {
    ecs: World,
    tick: u64,
    log: CombatLog,
}

impl Default for GameWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl GameWorld {
    pub fn new() -> Self {
        Self {
            ecs: World::new(),
            tick: 0,
            log: CombatLog::default(),
        }
    }

    // ========================================================================
    // Time & access
    // ========================================================================

    /// Current world tick.
    pub fn now(&self) -> u64 {
        self.tick
    }

    pub fn ecs(&self) -> &World {
        &self.ecs
    }

    pub fn ecs_mut(&mut self) -> &mut World {
        &mut self.ecs
    }

    pub fn log(&self) -> &CombatLog {
        &self.log
    }

    /// Advance one tick: bump the clock, run status durations and their
    /// once-per-second periodic damage/healing.
    pub fn advance(&mut self) {
        self.tick += 1;
        let periodic = self.tick % TICKS_PER_SECOND == 0;

        for (_, (statuses, health)) in self.ecs.query_mut::<(&mut StatusEffects, &mut Health)>() {
            if periodic {
                for effect in &statuses.effects {
                    if effect.remaining == 0 {
                        continue;
                    }
                    match effect.kind {
                        StatusKind::Regeneration => {
                            health.heal(1.0 + effect.amplifier as f32);
                        }
                        StatusKind::Burning => {
                            health.take_damage(1.0 + effect.amplifier as f32);
                        }
                        _ => {}
                    }
                }
            }
            for effect in &mut statuses.effects {
                effect.remaining = effect.remaining.saturating_sub(1);
            }
            statuses.effects.retain(|e| e.remaining > 0);
        }
    }

    // ========================================================================
    // Spawning
    // ========================================================================

    pub fn spawn_player(
        &mut self,
        name: impl Into<String>,
        id: Uuid,
        pos: Position,
        core: MechanicalCore,
    ) -> Entity {
        self.ecs.spawn((
            Name::new(name),
            PlayerId(id),
            pos,
            Health::new(20.0),
            Posture::default(),
            StatusEffects::default(),
            core,
        ))
    }

    pub fn spawn_hostile(&mut self, name: impl Into<String>, max_health: f32, pos: Position) -> Entity {
        self.ecs.spawn((
            Name::new(name),
            Hostile,
            pos,
            Health::new(max_health),
            StatusEffects::default(),
        ))
    }

    pub fn despawn(&mut self, entity: Entity) {
        let _ = self.ecs.despawn(entity);
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.ecs.contains(entity)
    }

    // ========================================================================
    // Vitals
    // ========================================================================

    pub fn health(&self, entity: Entity) -> Option<Health> {
        self.ecs.get::<&Health>(entity).map(|h| *h).ok()
    }

    /// Apply damage, returning the amount actually removed.
    pub fn damage(&mut self, entity: Entity, amount: f32) -> f32 {
        match self.ecs.get::<&mut Health>(entity) {
            Ok(mut health) => health.take_damage(amount),
            Err(_) => 0.0,
        }
    }

    /// Heal, returning the amount actually restored.
    pub fn heal(&mut self, entity: Entity, amount: f32) -> f32 {
        match self.ecs.get::<&mut Health>(entity) {
            Ok(mut health) => health.heal(amount),
            Err(_) => 0.0,
        }
    }

    pub fn is_dead(&self, entity: Entity) -> bool {
        self.health(entity).map(|h| h.is_dead()).unwrap_or(true)
    }

    pub fn is_player(&self, entity: Entity) -> bool {
        self.ecs.get::<&PlayerId>(entity).is_ok()
    }

    pub fn name(&self, entity: Entity) -> String {
        self.ecs
            .get::<&Name>(entity)
            .map(|n| n.0.clone())
            .unwrap_or_else(|_| "unknown".to_string())
    }

    // ========================================================================
    // Movement & statuses
    // ========================================================================

    pub fn position(&self, entity: Entity) -> Option<Position> {
        self.ecs.get::<&Position>(entity).map(|p| *p).ok()
    }

    pub fn teleport(&mut self, entity: Entity, pos: Position) {
        if let Ok(mut position) = self.ecs.get::<&mut Position>(entity) {
            *position = pos;
        }
    }

    /// Knockback: displace the entity on the grid.
    pub fn push(&mut self, entity: Entity, dx: i32, dy: i32) {
        if let Ok(mut position) = self.ecs.get::<&mut Position>(entity) {
            position.x += dx;
            position.y += dy;
        }
    }

    pub fn apply_status(&mut self, entity: Entity, kind: StatusKind, duration: u32, amplifier: u32) {
        if let Ok(mut statuses) = self.ecs.get::<&mut StatusEffects>(entity) {
            statuses.add(kind, duration, amplifier);
        }
    }

    pub fn has_status(&self, entity: Entity, kind: StatusKind) -> bool {
        self.ecs
            .get::<&StatusEffects>(entity)
            .map(|s| s.has(kind))
            .unwrap_or(false)
    }

    pub fn posture(&self, entity: Entity) -> Option<Posture> {
        self.ecs.get::<&Posture>(entity).map(|p| *p).ok()
    }

    pub fn set_posture(&mut self, entity: Entity, posture: Posture) {
        if let Ok(mut current) = self.ecs.get::<&mut Posture>(entity) {
            *current = posture;
        }
    }

    /// Living hostiles within a Chebyshev radius of a point.
    pub fn hostiles_within(&self, center: Position, radius: i32) -> Vec<Entity> {
        self.ecs
            .query::<(&Position, &Health)>()
            .with::<&Hostile>()
            .iter()
            .filter(|(_, (pos, health))| {
                !health.is_dead() && pos.chebyshev_distance(&center) <= radius
            })
            .map(|(entity, _)| entity)
            .collect()
    }

    // ========================================================================
    // Messages
    // ========================================================================

    pub fn send_message(&mut self, text: impl Into<String>, channel: MessageChannel) {
        self.log.push(text, channel, self.tick);
    }
}
