//! Per-player synergy state
//!
//! Each connected player gets one `SynergyPlayerState`: named timed states
//! with expiry hooks, tick-stamped cooldowns, reversible stat modifiers,
//! and the movement bookkeeping some conditions read (standing-still,
//! combo, position history). States live in a `PlayerStates` registry
//! keyed by player UUID and are dropped on disconnect.

use std::collections::{HashMap, VecDeque};

use hecs::Entity;
use uuid::Uuid;

use super::event::TICKS_PER_SECOND;
use crate::world::{GameWorld, Position};

/// Callback fired when a timed state expires (or is force-deactivated).
/// Runs on the game-logic thread with both the player state and the world
/// available, so delayed follow-up actions go through here instead of
/// background threads.
pub type ExpiryHook = Box<dyn FnOnce(&mut SynergyPlayerState, &mut GameWorld) + Send + Sync>;

/// Rejection cap; the pool decays toward zero over time.
const MAX_REJECTION: f32 = 100.0;
const REJECTION_DECAY_PER_SECOND: f32 = 0.5;

/// Combo chain resets after this many ticks without a hit.
const COMBO_TIMEOUT_TICKS: u64 = 3 * TICKS_PER_SECOND;

/// Position history depth: 5 seconds at 20 tps.
const MAX_HISTORY: usize = 100;

struct TimedState {
    remaining: u32,
    on_expire: Option<ExpiryHook>,
}

/// Point-in-time record for temporal effects.
#[derive(Debug, Clone, Copy)]
pub struct PositionSnapshot {
    pub position: Position,
    pub health: f32,
    pub tick: u64,
}

pub struct SynergyPlayerState {
    player_id: Uuid,
    entity: Entity,
    /// Mirrors the world tick; refreshed by `tick()`.
    now: u64,
    timed: HashMap<String, TimedState>,
    cooldowns: HashMap<String, u64>,
    max_health_modifier: f32,
    rejection: f32,
    standing_ticks: u32,
    last_position: Option<Position>,
    combo_count: u32,
    last_hit_tick: u64,
    history: VecDeque<PositionSnapshot>,
}

impl SynergyPlayerState {
    pub fn new(player_id: Uuid, entity: Entity, now: u64) -> Self {
        Self {
            player_id,
            entity,
            now,
            timed: HashMap::new(),
            cooldowns: HashMap::new(),
            max_health_modifier: 0.0,
            rejection: 0.0,
            standing_ticks: 0,
            last_position: None,
            combo_count: 0,
            last_hit_tick: 0,
            history: VecDeque::with_capacity(MAX_HISTORY),
        }
    }

    pub fn player_id(&self) -> Uuid {
        self.player_id
    }

    pub fn entity(&self) -> Entity {
        self.entity
    }

    pub fn now(&self) -> u64 {
        self.now
    }

    // ========================================================================
    // Tick
    // ========================================================================

    /// Advance one game tick. Must be called exactly once per world tick by
    /// the host's tick hook. Decrements every running timer; a timer
    /// crossing from >0 to 0 fires its expiry hook exactly once and is
    /// retained at zero so the key can be re-activated later.
    pub fn tick(&mut self, world: &mut GameWorld) {
        self.now = world.now();

        if self.rejection > 0.0 {
            self.rejection = (self.rejection - REJECTION_DECAY_PER_SECOND / TICKS_PER_SECOND as f32).max(0.0);
        }

        self.record_position(world);

        if self.combo_count > 0 && self.now.saturating_sub(self.last_hit_tick) > COMBO_TIMEOUT_TICKS {
            self.combo_count = 0;
        }

        let mut fired: Vec<ExpiryHook> = Vec::new();
        for state in self.timed.values_mut() {
            if state.remaining == 0 {
                continue;
            }
            state.remaining -= 1;
            if state.remaining == 0 {
                if let Some(hook) = state.on_expire.take() {
                    fired.push(hook);
                }
            }
        }
        for hook in fired {
            hook(self, world);
        }
    }

    fn record_position(&mut self, world: &GameWorld) {
        let Some(position) = world.position(self.entity) else {
            return;
        };

        match self.last_position {
            Some(last) if last == position => self.standing_ticks += 1,
            _ => self.standing_ticks = 0,
        }
        self.last_position = Some(position);

        let health = world.health(self.entity).map(|h| h.current).unwrap_or(0.0);
        if self.history.len() == MAX_HISTORY {
            self.history.pop_back();
        }
        self.history.push_front(PositionSnapshot {
            position,
            health,
            tick: self.now,
        });
    }

    // ========================================================================
    // Timed states
    // ========================================================================

    /// (Re)start a named timer. An existing countdown is overwritten, not
    /// stacked, and its pending hook is replaced.
    pub fn activate_state(&mut self, key: impl Into<String>, duration_ticks: u32) {
        self.timed.insert(
            key.into(),
            TimedState {
                remaining: duration_ticks,
                on_expire: None,
            },
        );
    }

    /// Like [`activate_state`](Self::activate_state), with a hook fired once
    /// when the timer runs out.
    pub fn activate_state_with(
        &mut self,
        key: impl Into<String>,
        duration_ticks: u32,
        on_expire: ExpiryHook,
    ) {
        self.timed.insert(
            key.into(),
            TimedState {
                remaining: duration_ticks,
                on_expire: Some(on_expire),
            },
        );
    }

    pub fn has_active_state(&self, key: &str) -> bool {
        self.timed.get(key).map(|s| s.remaining > 0).unwrap_or(false)
    }

    pub fn state_remaining_ticks(&self, key: &str) -> u32 {
        self.timed.get(key).map(|s| s.remaining).unwrap_or(0)
    }

    /// Extend a running timer up to a cap.
    pub fn extend_state(&mut self, key: &str, additional_ticks: u32, max_ticks: u32) {
        if let Some(state) = self.timed.get_mut(key) {
            if state.remaining > 0 {
                state.remaining = (state.remaining + additional_ticks).min(max_ticks);
            }
        }
    }

    /// Force a timer to zero, firing its hook immediately if still pending.
    pub fn deactivate_state(&mut self, key: &str, world: &mut GameWorld) {
        let hook = match self.timed.get_mut(key) {
            Some(state) if state.remaining > 0 => {
                state.remaining = 0;
                state.on_expire.take()
            }
            _ => None,
        };
        if let Some(hook) = hook {
            hook(self, world);
        }
    }

    // ========================================================================
    // Cooldowns
    // ========================================================================

    /// Gate `id` until `duration_ticks` from now. Tick-denominated so the
    /// gate is deterministic regardless of wall-clock tick rate.
    pub fn set_cooldown(&mut self, id: impl Into<String>, duration_ticks: u64) {
        self.cooldowns.insert(id.into(), self.now + duration_ticks);
    }

    pub fn is_on_cooldown(&self, id: &str) -> bool {
        self.cooldowns.get(id).map(|&until| until > self.now).unwrap_or(false)
    }

    pub fn remaining_cooldown(&self, id: &str) -> u64 {
        self.cooldowns
            .get(id)
            .map(|&until| until.saturating_sub(self.now))
            .unwrap_or(0)
    }

    pub fn reduce_cooldown(&mut self, id: &str, reduction_ticks: u64) {
        if let Some(until) = self.cooldowns.get_mut(id) {
            *until = until.saturating_sub(reduction_ticks);
        }
    }

    // ========================================================================
    // Modifiers & rejection
    // ========================================================================

    /// Cumulative additive max-health delta (percent points). Every apply
    /// must be paired with an eventual undo, usually inside the expiry hook
    /// of the state that applied it.
    pub fn add_max_health_modifier(&mut self, delta: f32) {
        self.max_health_modifier += delta;
    }

    pub fn max_health_modifier(&self) -> f32 {
        self.max_health_modifier
    }

    /// Feed the rejection accumulator; clamped to 0..=100, decays in `tick`.
    pub fn add_rejection(&mut self, amount: f32) {
        self.rejection = (self.rejection + amount).clamp(0.0, MAX_REJECTION);
    }

    pub fn rejection(&self) -> f32 {
        self.rejection
    }

    pub fn is_rejection_critical(&self) -> bool {
        self.rejection >= 80.0
    }

    // ========================================================================
    // Movement bookkeeping
    // ========================================================================

    pub fn standing_ticks(&self) -> u32 {
        self.standing_ticks
    }

    pub fn is_standing_still(&self, required_ticks: u32) -> bool {
        self.standing_ticks >= required_ticks
    }

    pub fn combo_count(&self) -> u32 {
        self.combo_count
    }

    pub fn increment_combo(&mut self) {
        self.combo_count += 1;
        self.last_hit_tick = self.now;
    }

    pub fn reset_combo(&mut self) {
        self.combo_count = 0;
    }

    /// Snapshot from `ticks_ago` ticks in the past, if recorded.
    pub fn position_at(&self, ticks_ago: usize) -> Option<PositionSnapshot> {
        self.history.get(ticks_ago).copied()
    }
}

// ============================================================================
// Registry
// ============================================================================

/// All live player states, keyed by player UUID. Created lazily, removed on
/// disconnect; nothing persists across sessions.
#[derive(Default)]
pub struct PlayerStates {
    states: HashMap<Uuid, SynergyPlayerState>,
}

impl PlayerStates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_create(&mut self, id: Uuid, entity: Entity, now: u64) -> &mut SynergyPlayerState {
        self.states
            .entry(id)
            .or_insert_with(|| SynergyPlayerState::new(id, entity, now))
    }

    pub fn get(&self, id: &Uuid) -> Option<&SynergyPlayerState> {
        self.states.get(id)
    }

    pub fn get_mut(&mut self, id: &Uuid) -> Option<&mut SynergyPlayerState> {
        self.states.get_mut(id)
    }

    pub fn remove(&mut self, id: &Uuid) -> bool {
        self.states.remove(id).is_some()
    }

    pub fn tick_all(&mut self, world: &mut GameWorld) {
        for state in self.states.values_mut() {
            state.tick(world);
        }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
