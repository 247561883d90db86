//! Condition predicates
//!
//! Every gate a definition can put in front of its effects. Conditions are
//! read-only over the context and fail closed: an `Err` from `test` is
//! treated as "did not pass" by the dispatcher.

use rand::Rng;

use super::context::SynergyContext;
use super::error::Result;

pub trait SynergyCondition: Send + Sync {
    fn test(&self, ctx: &SynergyContext) -> Result<bool>;

    /// Short human-readable label for logs and tooling.
    fn describe(&self) -> String;
}

// ============================================================================
// Energy
// ============================================================================

/// Gate on the player's energy pool, absolute or relative.
pub struct EnergyThreshold {
    minimum: Option<i32>,
    minimum_percent: Option<f32>,
    below_percent: Option<f32>,
}

impl EnergyThreshold {
    pub fn at_least(amount: i32) -> Self {
        Self {
            minimum: Some(amount),
            minimum_percent: None,
            below_percent: None,
        }
    }

    /// Passes at exactly the threshold: a 400/500 pool passes `at_least_percent(80.0)`.
    pub fn at_least_percent(percent: f32) -> Self {
        Self {
            minimum: None,
            minimum_percent: Some(percent),
            below_percent: None,
        }
    }

    pub fn below_percent(percent: f32) -> Self {
        Self {
            minimum: None,
            minimum_percent: None,
            below_percent: Some(percent),
        }
    }
}

impl SynergyCondition for EnergyThreshold {
    fn test(&self, ctx: &SynergyContext) -> Result<bool> {
        if let Some(minimum) = self.minimum {
            if ctx.current_energy() < minimum {
                return Ok(false);
            }
        }
        if let Some(percent) = self.minimum_percent {
            if ctx.energy_percent() < percent / 100.0 {
                return Ok(false);
            }
        }
        if let Some(percent) = self.below_percent {
            if ctx.energy_percent() >= percent / 100.0 {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn describe(&self) -> String {
        match (self.minimum, self.minimum_percent, self.below_percent) {
            (Some(n), _, _) => format!("energy >= {n}"),
            (_, Some(p), _) => format!("energy >= {p}%"),
            (_, _, Some(p)) => format!("energy < {p}%"),
            _ => "energy (unconstrained)".into(),
        }
    }
}

// ============================================================================
// Cooldowns & timed states
// ============================================================================

pub struct NotOnCooldown(String);

impl NotOnCooldown {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl SynergyCondition for NotOnCooldown {
    fn test(&self, ctx: &SynergyContext) -> Result<bool> {
        Ok(!ctx.state.is_on_cooldown(&self.0))
    }

    fn describe(&self) -> String {
        format!("not on cooldown: {}", self.0)
    }
}

pub struct StateCondition {
    key: String,
    require_active: bool,
}

impl StateCondition {
    pub fn active(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            require_active: true,
        }
    }

    pub fn absent(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            require_active: false,
        }
    }
}

impl SynergyCondition for StateCondition {
    fn test(&self, ctx: &SynergyContext) -> Result<bool> {
        Ok(ctx.state.has_active_state(&self.key) == self.require_active)
    }

    fn describe(&self) -> String {
        if self.require_active {
            format!("state active: {}", self.key)
        } else {
            format!("state absent: {}", self.key)
        }
    }
}

// ============================================================================
// Health
// ============================================================================

/// Player health strictly below a fraction of max.
pub struct HealthBelow(f32);

impl HealthBelow {
    pub fn fraction(fraction: f32) -> Self {
        Self(fraction)
    }

    /// The conventional "low health" line.
    pub fn critical() -> Self {
        Self(0.30)
    }
}

impl SynergyCondition for HealthBelow {
    fn test(&self, ctx: &SynergyContext) -> Result<bool> {
        let health = ctx
            .world
            .health(ctx.player())
            .ok_or(hecs::NoSuchEntity)?;
        Ok(health.fraction() < self.0)
    }

    fn describe(&self) -> String {
        format!("health < {:.0}%", self.0 * 100.0)
    }
}

// ============================================================================
// Target
// ============================================================================

/// Filter on the event's target entity. No target fails both variants.
pub struct TargetFilter {
    want_player: bool,
}

impl TargetFilter {
    pub fn is_player() -> Self {
        Self { want_player: true }
    }

    pub fn is_not_player() -> Self {
        Self { want_player: false }
    }
}

impl SynergyCondition for TargetFilter {
    fn test(&self, ctx: &SynergyContext) -> Result<bool> {
        let Some(target) = ctx.target() else {
            return Ok(false);
        };
        Ok(ctx.world.is_player(target) == self.want_player)
    }

    fn describe(&self) -> String {
        if self.want_player {
            "target is a player".into()
        } else {
            "target is not a player".into()
        }
    }
}

// ============================================================================
// Posture & movement
// ============================================================================

pub struct Sneaking;

impl SynergyCondition for Sneaking {
    fn test(&self, ctx: &SynergyContext) -> Result<bool> {
        Ok(ctx
            .world
            .posture(ctx.player())
            .map(|p| p.sneaking)
            .unwrap_or(false))
    }

    fn describe(&self) -> String {
        "sneaking".into()
    }
}

pub struct Sprinting;

impl SynergyCondition for Sprinting {
    fn test(&self, ctx: &SynergyContext) -> Result<bool> {
        Ok(ctx
            .world
            .posture(ctx.player())
            .map(|p| p.sprinting)
            .unwrap_or(false))
    }

    fn describe(&self) -> String {
        "sprinting".into()
    }
}

pub struct StandingStill(u32);

impl StandingStill {
    pub fn for_ticks(ticks: u32) -> Self {
        Self(ticks)
    }

    pub fn for_seconds(seconds: u32) -> Self {
        Self(seconds * super::event::TICKS_PER_SECOND as u32)
    }
}

impl SynergyCondition for StandingStill {
    fn test(&self, ctx: &SynergyContext) -> Result<bool> {
        Ok(ctx.state.is_standing_still(self.0))
    }

    fn describe(&self) -> String {
        format!("standing still for {} ticks", self.0)
    }
}

pub struct ComboAtLeast(u32);

impl ComboAtLeast {
    pub fn hits(count: u32) -> Self {
        Self(count)
    }
}

impl SynergyCondition for ComboAtLeast {
    fn test(&self, ctx: &SynergyContext) -> Result<bool> {
        Ok(ctx.state.combo_count() >= self.0)
    }

    fn describe(&self) -> String {
        format!("combo >= {}", self.0)
    }
}

// ============================================================================
// Chance
// ============================================================================

pub struct RandomChance(f32);

impl RandomChance {
    pub fn percent(percent: f32) -> Self {
        Self(percent)
    }
}

impl SynergyCondition for RandomChance {
    fn test(&self, _ctx: &SynergyContext) -> Result<bool> {
        Ok(rand::thread_rng().gen_range(0.0..100.0) < self.0)
    }

    fn describe(&self) -> String {
        format!("{}% chance", self.0)
    }
}

// ============================================================================
// Closure adapter
// ============================================================================

struct FnCondition<F> {
    description: String,
    f: F,
}

impl<F> SynergyCondition for FnCondition<F>
where
    F: Fn(&SynergyContext) -> Result<bool> + Send + Sync,
{
    fn test(&self, ctx: &SynergyContext) -> Result<bool> {
        (self.f)(ctx)
    }

    fn describe(&self) -> String {
        self.description.clone()
    }
}

/// Wrap a closure as a condition, for one-off gates not worth a named type.
pub fn condition_fn<F>(description: impl Into<String>, f: F) -> Box<dyn SynergyCondition>
where
    F: Fn(&SynergyContext) -> Result<bool> + Send + Sync + 'static,
{
    Box::new(FnCondition {
        description: description.into(),
        f,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::{CoreBridge, ModuleProvider};
    use crate::synergy::context::EventPayload;
    use crate::synergy::event::SynergyEvent;
    use crate::synergy::state::SynergyPlayerState;
    use crate::world::{GameWorld, MechanicalCore, Position};
    use uuid::Uuid;

    struct Fixture {
        world: GameWorld,
        state: SynergyPlayerState,
    }

    fn fixture(energy: i32, max_energy: i32) -> Fixture {
        let mut world = GameWorld::new();
        let mut core = MechanicalCore::new(max_energy);
        core.energy = energy;
        let player = world.spawn_player("Tester", Uuid::new_v4(), Position::new(0, 0), core);
        let state = SynergyPlayerState::new(Uuid::new_v4(), player, 0);
        Fixture { world, state }
    }

    fn ctx<'a>(fx: &'a mut Fixture, payload: EventPayload) -> SynergyContext<'a> {
        let modules = CoreBridge.active_modules(&fx.world, fx.state.entity());
        SynergyContext::new(
            SynergyEvent::Manual,
            payload,
            modules,
            &mut fx.world,
            &mut fx.state,
            &CoreBridge,
        )
    }

    #[test]
    fn test_energy_percent_is_inclusive_at_boundary() {
        let mut fx = fixture(400, 500);
        let ctx = ctx(&mut fx, EventPayload::default());
        assert!(EnergyThreshold::at_least_percent(80.0).test(&ctx).unwrap());
        assert!(!EnergyThreshold::at_least_percent(81.0).test(&ctx).unwrap());
        assert!(!EnergyThreshold::below_percent(80.0).test(&ctx).unwrap());
        assert!(EnergyThreshold::below_percent(81.0).test(&ctx).unwrap());
    }

    #[test]
    fn test_energy_absolute_threshold() {
        let mut fx = fixture(150, 500);
        let ctx = ctx(&mut fx, EventPayload::default());
        assert!(EnergyThreshold::at_least(150).test(&ctx).unwrap());
        assert!(!EnergyThreshold::at_least(151).test(&ctx).unwrap());
    }

    #[test]
    fn test_cooldown_condition() {
        let mut fx = fixture(0, 500);
        fx.state.set_cooldown("dash", 100);
        let ctx = ctx(&mut fx, EventPayload::default());
        assert!(!NotOnCooldown::new("dash").test(&ctx).unwrap());
        assert!(NotOnCooldown::new("other").test(&ctx).unwrap());
    }

    #[test]
    fn test_health_below_fraction() {
        let mut fx = fixture(0, 500);
        let player = fx.state.entity();
        fx.world.damage(player, 15.0); // 5.0 / 20.0 = 25%
        let ctx = ctx(&mut fx, EventPayload::default());
        assert!(HealthBelow::critical().test(&ctx).unwrap());
        assert!(!HealthBelow::fraction(0.25).test(&ctx).unwrap());
    }

    #[test]
    fn test_target_filter_fails_without_target() {
        let mut fx = fixture(0, 500);
        let ctx = ctx(&mut fx, EventPayload::default());
        assert!(!TargetFilter::is_player().test(&ctx).unwrap());
        assert!(!TargetFilter::is_not_player().test(&ctx).unwrap());
    }

    #[test]
    fn test_target_filter_on_hostile() {
        let mut fx = fixture(0, 500);
        let mob = fx.world.spawn_hostile("ghoul", 10.0, Position::new(1, 1));
        let ctx = ctx(&mut fx, EventPayload::target(mob));
        assert!(TargetFilter::is_not_player().test(&ctx).unwrap());
        assert!(!TargetFilter::is_player().test(&ctx).unwrap());
    }

    #[test]
    fn test_state_condition_both_polarities() {
        let mut fx = fixture(0, 500);
        fx.state.activate_state("shadow_form", 100);
        let ctx = ctx(&mut fx, EventPayload::default());
        assert!(StateCondition::active("shadow_form").test(&ctx).unwrap());
        assert!(!StateCondition::absent("shadow_form").test(&ctx).unwrap());
        assert!(StateCondition::absent("other").test(&ctx).unwrap());
    }

    #[test]
    fn test_condition_fn_adapter() {
        let mut fx = fixture(0, 500);
        let ctx = ctx(&mut fx, EventPayload::default());
        let cond = condition_fn("always", |_| Ok(true));
        assert!(cond.test(&ctx).unwrap());
        assert_eq!(cond.describe(), "always");
    }
}
