//! Mobility synergies.

use crate::synergy::condition::{NotOnCooldown, Sneaking};
use crate::synergy::effect::{effect_fn, EnergyConsume, Message, SetCooldown};
use crate::synergy::{secs, LinkTag, ModuleLink, Result, SynergyDefinition, SynergyEvent};
use crate::world::StatusKind;

use super::modules;

pub fn definitions() -> Result<Vec<SynergyDefinition>> {
    Ok(vec![phantom_step()?, kinetic_barrier()?])
}

/// Sneak into a sprint to slip out of sight for a few seconds.
fn phantom_step() -> Result<SynergyDefinition> {
    SynergyDefinition::builder("phantom_step")
        .display_name("Phantom Step")
        .description("A crouched sprint phases the frame out of view")
        .category("mobility")
        .require_modules([modules::PHASE_SHIFT, modules::KINETIC_DRIVE])
        .add_link(ModuleLink::new(modules::PHASE_SHIFT, modules::KINETIC_DRIVE, LinkTag::Chain))
        .trigger_on(SynergyEvent::Sprint)
        .add_condition(Sneaking)
        .add_condition(NotOnCooldown::new("phantom_step"))
        .priority(10)
        .add_effect(EnergyConsume::amount(2000))
        .add_boxed_effect(effect_fn("phase out", |ctx| {
            let player = ctx.player();
            ctx.world.apply_status(player, StatusKind::Invisibility, secs(3) as u32, 0);
            ctx.world.apply_status(player, StatusKind::Speed, secs(3) as u32, 1);
            Ok(())
        }))
        .add_effect(SetCooldown::seconds("phantom_step", 15))
        .add_effect(Message::action_bar("Phantom Step"))
        .build()
}

/// Shove the attacker back when struck, on a long cooldown.
fn kinetic_barrier() -> Result<SynergyDefinition> {
    SynergyDefinition::builder("kinetic_barrier")
        .display_name("Kinetic Barrier")
        .description("Stored momentum detonates outward on impact")
        .category("mobility")
        .require_modules([modules::KINETIC_DRIVE, modules::ARMOR_PLATING])
        .trigger_on(SynergyEvent::Hurt)
        .add_condition(NotOnCooldown::new("kinetic_barrier"))
        .priority(20)
        .add_boxed_effect(effect_fn("repel attacker", |ctx| {
            let Some(attacker) = ctx.attacker() else {
                return Ok(());
            };
            let player = ctx.player();
            let (Some(own), Some(theirs)) =
                (ctx.world.position(player), ctx.world.position(attacker))
            else {
                return Ok(());
            };
            let dx = (theirs.x - own.x).signum() * 3;
            let dy = (theirs.y - own.y).signum() * 3;
            ctx.world.push(attacker, dx, dy);
            ctx.state.set_cooldown("kinetic_barrier", secs(30));
            Ok(())
        }))
        .add_effect(Message::action_bar("Kinetic Barrier fires"))
        .build()
}
