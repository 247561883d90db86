//! Survival synergies.

use crate::synergy::condition::{EnergyThreshold, NotOnCooldown};
use crate::synergy::effect::{effect_fn, EnergyConsume, Message, SetCooldown};
use crate::synergy::{secs, LinkTag, ModuleLink, Result, SynergyDefinition, SynergyEvent};

use super::modules;

pub fn definitions() -> Result<Vec<SynergyDefinition>> {
    Ok(vec![blood_pact()?, survival_shield()?])
}

/// Emergency heal bought with a temporary cut to max health. The cut is
/// undone by the debt state's expiry hook, so the books always balance.
fn blood_pact() -> Result<SynergyDefinition> {
    SynergyDefinition::builder("blood_pact")
        .display_name("Blood Pact")
        .description("Borrow vitality now, pay the frame back later")
        .category("survival")
        .require_modules([modules::BLOOD_RITE, modules::HEALTH_REGEN])
        .add_link(ModuleLink::new(modules::BLOOD_RITE, modules::HEALTH_REGEN, LinkTag::Gear))
        .trigger_on(SynergyEvent::LowHealth)
        .add_condition(NotOnCooldown::new("blood_pact"))
        .priority(10)
        .add_boxed_effect(effect_fn("borrow vitality", |ctx| {
            let player = ctx.player();
            let max = ctx.world.health(player).map(|h| h.max).unwrap_or(0.0);
            ctx.world.heal(player, max * 0.5);

            ctx.state.add_max_health_modifier(-20.0);
            ctx.state.activate_state_with(
                "blood_debt",
                secs(60) as u32,
                Box::new(|state, world| {
                    state.add_max_health_modifier(20.0);
                    world.send_message(
                        "The blood debt is repaid",
                        crate::world::MessageChannel::Chat,
                    );
                }),
            );
            Ok(())
        }))
        .add_effect(SetCooldown::seconds("blood_pact", 90))
        .add_effect(Message::action_bar("Blood Pact sealed"))
        .build()
}

/// Burn energy to shrug off environmental damage entirely.
fn survival_shield() -> Result<SynergyDefinition> {
    SynergyDefinition::builder("survival_shield")
        .display_name("Survival Shield")
        .description("The emitter eats the hazard before it reaches flesh")
        .category("survival")
        .require_modules([modules::SHIELD_EMITTER, modules::ENERGY_SIPHON])
        .trigger_on(SynergyEvent::EnvironmentalDamage)
        .add_condition(EnergyThreshold::at_least(1000))
        .priority(10)
        .add_effect(EnergyConsume::amount(1000))
        .add_boxed_effect(effect_fn("absorb hazard", |ctx| {
            ctx.current_amount = 0.0;
            Ok(())
        }))
        .add_effect(Message::action_bar("Survival Shield absorbs the blow"))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameSession;
    use crate::synergy::{SynergyManager, TICKS_PER_SECOND};
    use crate::world::{MechanicalCore, Position};

    fn session() -> GameSession {
        let mut manager = SynergyManager::new();
        manager.declare_modules(modules::ALL.iter().copied());
        for def in definitions().unwrap() {
            manager.register(def).unwrap();
        }
        GameSession::new(manager)
    }

    fn core_with(installed: &[(&str, u32)]) -> MechanicalCore {
        let mut core = MechanicalCore::new(10_000);
        for (id, level) in installed {
            core.install(id, *level);
        }
        core
    }

    #[test]
    fn test_blood_pact_heals_and_repays_debt() {
        let mut session = session();
        let player = session.connect(
            "Pactbound",
            core_with(&[(modules::BLOOD_RITE, 1), (modules::HEALTH_REGEN, 1)]),
            Position::new(0, 0),
        );
        let entity = session.player_entity(&player).unwrap();

        // 20.0 -> 4.0 crosses the low-health line and triggers the pact
        let report = session.hurt(&player, None, 16.0).unwrap();
        assert!(report.fired.contains(&"blood_pact".to_string()));
        assert_eq!(session.world().health(entity).unwrap().current, 14.0);
        assert_eq!(session.states().get(&player).unwrap().max_health_modifier(), -20.0);

        // debt clears after sixty seconds
        for _ in 0..(60 * TICKS_PER_SECOND) {
            session.tick().unwrap();
        }
        assert_eq!(session.states().get(&player).unwrap().max_health_modifier(), 0.0);
        assert!(session.world().log().contains("blood debt is repaid"));
    }

    #[test]
    fn test_survival_shield_absorbs_environmental_hit() {
        let mut session = session();
        let player = session.connect(
            "Shielded",
            core_with(&[(modules::SHIELD_EMITTER, 1), (modules::ENERGY_SIPHON, 1)]),
            Position::new(0, 0),
        );
        let entity = session.player_entity(&player).unwrap();

        session.environmental_damage(&player, 6.0).unwrap();
        assert_eq!(session.world().health(entity).unwrap().current, 20.0);
        let energy = session
            .world()
            .ecs()
            .get::<&MechanicalCore>(entity)
            .unwrap()
            .energy;
        assert_eq!(energy, 9_000);
    }

    #[test]
    fn test_survival_shield_needs_energy() {
        let mut session = session();
        let mut core = core_with(&[(modules::SHIELD_EMITTER, 1), (modules::ENERGY_SIPHON, 1)]);
        core.energy = 500;
        let player = session.connect("Drained", core, Position::new(0, 0));
        let entity = session.player_entity(&player).unwrap();

        session.environmental_damage(&player, 6.0).unwrap();
        assert_eq!(session.world().health(entity).unwrap().current, 14.0);
    }
}
