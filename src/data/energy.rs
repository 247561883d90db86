//! Energy economy synergies.

use crate::synergy::condition::{NotOnCooldown, RandomChance, TargetFilter};
use crate::synergy::effect::{effect_fn, Message, SetCooldown};
use crate::synergy::{LinkTag, ModuleId, ModuleLink, Result, SynergyDefinition, SynergyEvent};

use super::modules;

pub fn definitions() -> Result<Vec<SynergyDefinition>> {
    Ok(vec![energy_loop()?, phantom_discharge()?])
}

/// Passive trickle: each second there is a 20% chance the siphon feeds
/// energy back, scaled by installed generator levels.
fn energy_loop() -> Result<SynergyDefinition> {
    let generator = ModuleId::new(modules::GENERATOR);

    SynergyDefinition::builder("energy_loop")
        .display_name("Energy Loop")
        .description("The siphon feeds stray charge back into the generators")
        .category("energy")
        .require_modules([modules::GENERATOR, modules::ENERGY_SIPHON])
        .add_link(ModuleLink::new(modules::GENERATOR, modules::ENERGY_SIPHON, LinkTag::Ring))
        .trigger_on(SynergyEvent::Tick)
        .add_condition(RandomChance::percent(20.0))
        .priority(10)
        .add_boxed_effect(effect_fn("siphon refund", move |ctx| {
            let refund = 50 * ctx.module_level(&generator) as i32;
            ctx.add_energy(refund);
            Ok(())
        }))
        .build()
}

/// An attack leaves a charge hanging in the target; ten ticks later the
/// echo detonates for half the original hit. The delay rides a timed-state
/// expiry hook, so the echo lands on the game-logic thread like everything
/// else.
fn phantom_discharge() -> Result<SynergyDefinition> {
    SynergyDefinition::builder("phantom_discharge")
        .display_name("Phantom Discharge")
        .description("A lingering charge detonates moments after the strike")
        .category("energy")
        .require_modules([modules::PHASE_SHIFT, modules::ENERGY_SIPHON])
        .add_link(ModuleLink::new(modules::PHASE_SHIFT, modules::ENERGY_SIPHON, LinkTag::Chain))
        .trigger_on(SynergyEvent::Attack)
        .add_condition(TargetFilter::is_not_player())
        .add_condition(NotOnCooldown::new("phantom_discharge"))
        .priority(50)
        .add_boxed_effect(effect_fn("schedule echo strike", |ctx| {
            let Some(target) = ctx.target() else {
                return Ok(());
            };
            let echo = ctx.current_amount * 0.5;
            ctx.state.activate_state_with(
                "phantom_echo",
                10,
                Box::new(move |_state, world| {
                    if world.contains(target) {
                        world.damage(target, echo);
                        world.send_message(
                            "Phantom Discharge detonates",
                            crate::world::MessageChannel::ActionBar,
                        );
                    }
                }),
            );
            Ok(())
        }))
        .add_effect(SetCooldown::ticks("phantom_discharge", 40))
        .add_effect(Message::action_bar("Charge planted"))
        .build()
}
