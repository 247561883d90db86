//! Effect actions
//!
//! The mutations a definition performs once its conditions pass. Effects
//! run in declaration order; a failing effect is logged by the dispatcher
//! and the rest of the list still runs.

use log::debug;

use crate::world::MessageChannel;

use super::context::SynergyContext;
use super::error::Result;
use super::event::TICKS_PER_SECOND;

pub trait SynergyEffect: Send + Sync {
    fn apply(&self, ctx: &mut SynergyContext) -> Result<()>;

    fn describe(&self) -> String;
}

// ============================================================================
// Messaging
// ============================================================================

pub struct Message {
    text: String,
    channel: MessageChannel,
}

impl Message {
    pub fn chat(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            channel: MessageChannel::Chat,
        }
    }

    pub fn action_bar(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            channel: MessageChannel::ActionBar,
        }
    }
}

impl SynergyEffect for Message {
    fn apply(&self, ctx: &mut SynergyContext) -> Result<()> {
        ctx.world.send_message(self.text.clone(), self.channel);
        Ok(())
    }

    fn describe(&self) -> String {
        format!("message: {}", self.text)
    }
}

// ============================================================================
// Cooldowns
// ============================================================================

pub struct SetCooldown {
    id: String,
    duration_ticks: u64,
}

impl SetCooldown {
    pub fn ticks(id: impl Into<String>, ticks: u64) -> Self {
        Self {
            id: id.into(),
            duration_ticks: ticks,
        }
    }

    pub fn seconds(id: impl Into<String>, seconds: u64) -> Self {
        Self::ticks(id, seconds * TICKS_PER_SECOND)
    }
}

impl SynergyEffect for SetCooldown {
    fn apply(&self, ctx: &mut SynergyContext) -> Result<()> {
        ctx.state.set_cooldown(self.id.clone(), self.duration_ticks);
        Ok(())
    }

    fn describe(&self) -> String {
        format!("cooldown {} for {} ticks", self.id, self.duration_ticks)
    }
}

// ============================================================================
// Energy
// ============================================================================

/// Check-then-consume in one step. When the pool is short the effect is a
/// logged no-op rather than a partial drain, so authors who want a hard gate
/// pair this with an `EnergyThreshold` condition.
pub struct EnergyConsume(i32);

impl EnergyConsume {
    pub fn amount(amount: i32) -> Self {
        Self(amount)
    }
}

impl SynergyEffect for EnergyConsume {
    fn apply(&self, ctx: &mut SynergyContext) -> Result<()> {
        if !ctx.has_energy(self.0) {
            debug!(
                "energy consume of {} skipped, pool at {}",
                self.0,
                ctx.current_energy()
            );
            return Ok(());
        }
        ctx.consume_energy(self.0);
        Ok(())
    }

    fn describe(&self) -> String {
        format!("consume {} energy", self.0)
    }
}

pub struct EnergyAdd(i32);

impl EnergyAdd {
    pub fn amount(amount: i32) -> Self {
        Self(amount)
    }
}

impl SynergyEffect for EnergyAdd {
    fn apply(&self, ctx: &mut SynergyContext) -> Result<()> {
        ctx.add_energy(self.0);
        Ok(())
    }

    fn describe(&self) -> String {
        format!("add {} energy", self.0)
    }
}

// ============================================================================
// Closure adapter
// ============================================================================

struct FnEffect<F> {
    description: String,
    f: F,
}

impl<F> SynergyEffect for FnEffect<F>
where
    F: Fn(&mut SynergyContext) -> Result<()> + Send + Sync,
{
    fn apply(&self, ctx: &mut SynergyContext) -> Result<()> {
        (self.f)(ctx)
    }

    fn describe(&self) -> String {
        self.description.clone()
    }
}

/// Wrap a closure as an effect. Most content-pack behavior is written this
/// way; named types are reserved for the handful of reusable primitives.
pub fn effect_fn<F>(description: impl Into<String>, f: F) -> Box<dyn SynergyEffect>
where
    F: Fn(&mut SynergyContext) -> Result<()> + Send + Sync + 'static,
{
    Box::new(FnEffect {
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

    fn fixture(energy: i32) -> Fixture {
        let mut world = GameWorld::new();
        let mut core = MechanicalCore::new(1000);
        core.energy = energy;
        let player = world.spawn_player("Tester", Uuid::new_v4(), Position::new(0, 0), core);
        let state = SynergyPlayerState::new(Uuid::new_v4(), player, 0);
        Fixture { world, state }
    }

    fn ctx<'a>(fx: &'a mut Fixture) -> SynergyContext<'a> {
        let modules = CoreBridge.active_modules(&fx.world, fx.state.entity());
        SynergyContext::new(
            SynergyEvent::Manual,
            EventPayload::default(),
            modules,
            &mut fx.world,
            &mut fx.state,
            &CoreBridge,
        )
    }

    #[test]
    fn test_consume_is_all_or_nothing() {
        let mut fx = fixture(100);
        let mut ctx = ctx(&mut fx);
        EnergyConsume::amount(150).apply(&mut ctx).unwrap();
        assert_eq!(ctx.current_energy(), 100);
        EnergyConsume::amount(100).apply(&mut ctx).unwrap();
        assert_eq!(ctx.current_energy(), 0);
    }

    #[test]
    fn test_add_caps_at_max() {
        let mut fx = fixture(950);
        let mut ctx = ctx(&mut fx);
        EnergyAdd::amount(100).apply(&mut ctx).unwrap();
        assert_eq!(ctx.current_energy(), 1000);
    }

    #[test]
    fn test_cooldown_effect_sets_timer() {
        let mut fx = fixture(0);
        let mut ctx = ctx(&mut fx);
        SetCooldown::seconds("burst", 15).apply(&mut ctx).unwrap();
        assert!(ctx.state.is_on_cooldown("burst"));
        assert_eq!(ctx.state.remaining_cooldown("burst"), 300);
    }

    #[test]
    fn test_message_lands_in_log() {
        let mut fx = fixture(0);
        let mut ctx = ctx(&mut fx);
        Message::action_bar("Overdrive ready").apply(&mut ctx).unwrap();
        assert!(ctx.world.log().contains("Overdrive ready"));
    }

    #[test]
    fn test_effect_fn_adapter_mutates_damage() {
        let mut fx = fixture(0);
        let modules = CoreBridge.active_modules(&fx.world, fx.state.entity());
        let mut ctx = SynergyContext::new(
            SynergyEvent::Attack,
            EventPayload::damage_from(None, 10.0),
            modules,
            &mut fx.world,
            &mut fx.state,
            &CoreBridge,
        );
        let halve = effect_fn("halve incoming damage", |ctx| {
            ctx.current_amount *= 0.5;
            Ok(())
        });
        halve.apply(&mut ctx).unwrap();
        assert_eq!(ctx.current_amount, 5.0);
        assert_eq!(ctx.original_damage(), 10.0);
    }
}
