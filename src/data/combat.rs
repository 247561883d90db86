//! Combat synergies.

use crate::synergy::condition::{
    EnergyThreshold, HealthBelow, NotOnCooldown, StateCondition, TargetFilter,
};
use crate::synergy::effect::{effect_fn, EnergyConsume, Message, SetCooldown};
use crate::synergy::{
    secs, LinkTag, ModuleId, ModuleLink, Result, SynergyDefinition, SynergyEvent,
};

use super::modules;

pub fn definitions() -> Result<Vec<SynergyDefinition>> {
    Ok(vec![ravagers_pact()?, overcharge_charge()?, overcharge_release()?, reactive_armor()?])
}

/// Desperation offense: attacks below 30% health deal bonus true damage
/// scaled by DAMAGE_BOOST and steal life scaled by HEALTH_REGEN.
fn ravagers_pact() -> Result<SynergyDefinition> {
    let boost = ModuleId::new(modules::DAMAGE_BOOST);
    let regen = ModuleId::new(modules::HEALTH_REGEN);

    SynergyDefinition::builder("ravagers_pact")
        .display_name("Ravager's Pact")
        .description("When near death, strikes rend armor and drink the wound")
        .category("combat")
        .require_modules([modules::DAMAGE_BOOST, modules::THORNS, modules::HEALTH_REGEN])
        .add_link(ModuleLink::new(modules::DAMAGE_BOOST, modules::THORNS, LinkTag::Triangle))
        .add_link(ModuleLink::new(modules::THORNS, modules::HEALTH_REGEN, LinkTag::Triangle))
        .add_link(ModuleLink::new(modules::HEALTH_REGEN, modules::DAMAGE_BOOST, LinkTag::Triangle))
        .trigger_on(SynergyEvent::Attack)
        .trigger_on(SynergyEvent::CriticalHit)
        .add_condition(TargetFilter::is_not_player())
        .add_condition(HealthBelow::critical())
        .priority(10)
        .add_boxed_effect(effect_fn("rend and drink", move |ctx| {
            let Some(target) = ctx.target() else {
                return Ok(());
            };
            // True damage bypasses the running total; it lands directly and
            // later definitions never see it.
            let boost_level = ctx.module_level(&boost) as f32;
            let true_damage = ctx.original_damage() * (0.30 + boost_level * 0.05);
            ctx.world.damage(target, true_damage);

            let regen_level = ctx.module_level(&regen) as f32;
            let lifesteal = true_damage * (0.50 + regen_level * 0.05);
            let player = ctx.player();
            ctx.world.heal(player, lifesteal);
            Ok(())
        }))
        .add_effect(Message::action_bar("Ravager's Pact feeds"))
        .build()
}

/// A kill spends stored energy to prime an overcharge for ten seconds.
fn overcharge_charge() -> Result<SynergyDefinition> {
    SynergyDefinition::builder("overcharge_charge")
        .display_name("Overcharge Protocol")
        .description("A kill diverts core energy into the next strike")
        .category("combat")
        .require_modules([modules::OVERCHARGE_COIL, modules::DAMAGE_BOOST])
        .add_link(ModuleLink::new(modules::OVERCHARGE_COIL, modules::DAMAGE_BOOST, LinkTag::Chain))
        .trigger_on(SynergyEvent::Kill)
        .add_condition(EnergyThreshold::at_least(5000))
        .add_condition(StateCondition::absent("overcharged"))
        .priority(20)
        .add_effect(EnergyConsume::amount(5000))
        .add_boxed_effect(effect_fn("prime overcharge", |ctx| {
            ctx.state.activate_state("overcharged", secs(10) as u32);
            Ok(())
        }))
        .add_effect(Message::action_bar("Overcharge primed"))
        .build()
}

/// The primed strike: doubled damage, then the charge is spent.
fn overcharge_release() -> Result<SynergyDefinition> {
    SynergyDefinition::builder("overcharge_release")
        .display_name("Overcharge Release")
        .description("The stored charge detonates on the next hit")
        .category("combat")
        .require_modules([modules::OVERCHARGE_COIL, modules::DAMAGE_BOOST])
        .trigger_on(SynergyEvent::Attack)
        .trigger_on(SynergyEvent::CriticalHit)
        .add_condition(StateCondition::active("overcharged"))
        .priority(30)
        .add_boxed_effect(effect_fn("release overcharge", |ctx| {
            ctx.current_amount *= 2.0;
            ctx.state.deactivate_state("overcharged", ctx.world);
            Ok(())
        }))
        .add_effect(Message::action_bar("Overcharge released"))
        .build()
}

/// Thorns writ large: melee hurt reflects double the incoming damage back
/// at the attacker. Gated by a short cooldown so swarms don't melt on it.
fn reactive_armor() -> Result<SynergyDefinition> {
    SynergyDefinition::builder("reactive_armor")
        .display_name("Reactive Armor")
        .description("Plating discharges into whatever struck it")
        .category("combat")
        .require_modules([modules::THORNS, modules::ARMOR_PLATING])
        .add_link(ModuleLink::new(modules::THORNS, modules::ARMOR_PLATING, LinkTag::Symmetric))
        .trigger_on(SynergyEvent::Hurt)
        .add_condition(NotOnCooldown::new("reactive_armor"))
        .priority(40)
        .add_boxed_effect(effect_fn("reflect damage", |ctx| {
            let Some(attacker) = ctx.attacker() else {
                return Ok(());
            };
            let reflected = ctx.current_amount * 2.0;
            ctx.world.damage(attacker, reflected);
            Ok(())
        }))
        .add_effect(SetCooldown::seconds("reactive_armor", 2))
        .add_effect(Message::action_bar("Reactive Armor discharges"))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameSession;
    use crate::synergy::SynergyManager;
    use crate::world::{MechanicalCore, Position};

    fn session() -> GameSession {
        let mut manager = SynergyManager::new();
        manager.declare_modules(modules::ALL.iter().copied());
        for def in definitions().unwrap() {
            manager.register(def).unwrap();
        }
        GameSession::new(manager)
    }

    #[test]
    fn test_ravagers_pact_scenario_numbers() {
        let mut session = session();
        let mut core = MechanicalCore::new(10_000);
        core.install(modules::DAMAGE_BOOST, 2)
            .install(modules::THORNS, 1)
            .install(modules::HEALTH_REGEN, 1);
        let player = session.connect("Ravager", core, Position::new(0, 0));
        let entity = session.player_entity(&player).unwrap();
        let mob = session.world_mut().spawn_hostile("ghoul", 100.0, Position::new(1, 0));

        // drop to 25% of max (5.0 / 20.0)
        session.world_mut().damage(entity, 15.0);

        session.attack(&player, mob, 10.0).unwrap();
        // base 10.0 plus true damage 10*(0.30+2*0.05)=4.0
        assert_eq!(session.world().health(mob).unwrap().current, 86.0);
        // lifesteal 4.0*(0.50+1*0.05)=2.2 on top of 5.0
        let healed = session.world().health(entity).unwrap().current;
        assert!((healed - 7.2).abs() < 1e-4);
    }

    #[test]
    fn test_ravagers_pact_requires_low_health() {
        let mut session = session();
        let mut core = MechanicalCore::new(10_000);
        core.install(modules::DAMAGE_BOOST, 2)
            .install(modules::THORNS, 1)
            .install(modules::HEALTH_REGEN, 1);
        let player = session.connect("Ravager", core, Position::new(0, 0));
        let mob = session.world_mut().spawn_hostile("ghoul", 100.0, Position::new(1, 0));

        // full health, pact stays quiet
        session.attack(&player, mob, 10.0).unwrap();
        assert_eq!(session.world().health(mob).unwrap().current, 90.0);
    }

    #[test]
    fn test_overcharge_primes_then_releases_once() {
        let mut session = session();
        let mut core = MechanicalCore::new(10_000);
        core.install(modules::OVERCHARGE_COIL, 1)
            .install(modules::DAMAGE_BOOST, 1);
        let player = session.connect("Coil", core, Position::new(0, 0));
        let fodder = session.world_mut().spawn_hostile("rat", 1.0, Position::new(1, 0));
        let mob = session.world_mut().spawn_hostile("ghoul", 100.0, Position::new(2, 0));

        let report = session.attack(&player, fodder, 5.0).unwrap();
        assert!(report.fired.contains(&"overcharge_charge".to_string()));
        let entity = session.player_entity(&player).unwrap();
        assert_eq!(session.world().health(mob).unwrap().current, 100.0);
        let energy = session
            .world()
            .ecs()
            .get::<&MechanicalCore>(entity)
            .unwrap()
            .energy;
        assert_eq!(energy, 5_000);

        // primed strike doubles, second strike is back to normal
        session.attack(&player, mob, 6.0).unwrap();
        assert_eq!(session.world().health(mob).unwrap().current, 88.0);
        session.attack(&player, mob, 6.0).unwrap();
        assert_eq!(session.world().health(mob).unwrap().current, 82.0);
    }

    #[test]
    fn test_reactive_armor_reflects_double() {
        let mut session = session();
        let mut core = MechanicalCore::new(10_000);
        core.install(modules::THORNS, 1).install(modules::ARMOR_PLATING, 1);
        let player = session.connect("Plated", core, Position::new(0, 0));
        let mob = session.world_mut().spawn_hostile("ghoul", 30.0, Position::new(1, 0));

        session.hurt(&player, Some(mob), 4.0).unwrap();
        assert_eq!(session.world().health(mob).unwrap().current, 22.0);
        // on cooldown now, no second reflection
        session.hurt(&player, Some(mob), 4.0).unwrap();
        assert_eq!(session.world().health(mob).unwrap().current, 22.0);
    }
}
