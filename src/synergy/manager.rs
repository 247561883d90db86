//! Definition registry and dispatcher.

use std::collections::{HashMap, HashSet};

use log::{debug, info, warn};

use super::context::SynergyContext;
use super::definition::SynergyDefinition;
use super::error::{Result, SynergyError};
use super::module::ModuleId;

/// Outcome of one dispatch, mostly for logs and tests.
#[derive(Debug, Default, Clone)]
pub struct DispatchReport {
    /// Ids that passed every gate and ran their effects, in run order.
    pub fired: Vec<String>,
    /// Ids that matched the event and requirements but failed a condition.
    pub gated: Vec<String>,
}

impl DispatchReport {
    pub fn fired_count(&self) -> usize {
        self.fired.len()
    }
}

/// Owns every registered definition. Registration is startup-time and
/// immutable afterwards; dispatch takes `&self` and scales per player.
#[derive(Default)]
pub struct SynergyManager {
    definitions: Vec<SynergyDefinition>,
    by_id: HashMap<String, usize>,
    /// Module ids the host reported as installable; used only to warn
    /// about likely typos in definitions.
    known_modules: HashSet<ModuleId>,
}

impl SynergyManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tell the manager which module ids exist so registration can flag
    /// definitions referencing unknown ones. Optional; skipping it just
    /// disables the warning.
    pub fn declare_modules<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.known_modules.extend(ids.into_iter().map(ModuleId::new));
    }

    pub fn register(&mut self, definition: SynergyDefinition) -> Result<()> {
        if self.by_id.contains_key(definition.id()) {
            return Err(SynergyError::DuplicateId(definition.id().to_string()));
        }
        if !self.known_modules.is_empty() {
            for module in definition.required_modules() {
                if !self.known_modules.contains(module) {
                    warn!(
                        "synergy '{}' requires unknown module '{}'",
                        definition.id(),
                        module
                    );
                }
            }
        }
        info!(
            "registered synergy '{}' (priority {}, {} required modules)",
            definition.id(),
            definition.priority(),
            definition.required_modules().len()
        );
        self.by_id
            .insert(definition.id().to_string(), self.definitions.len());
        self.definitions.push(definition);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&SynergyDefinition> {
        self.by_id.get(id).map(|&i| &self.definitions[i])
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut SynergyDefinition> {
        self.by_id.get(id).map(|&i| &mut self.definitions[i])
    }

    pub fn definitions(&self) -> impl Iterator<Item = &SynergyDefinition> {
        self.definitions.iter()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Run every eligible definition against the context. Eligibility is
    /// enabled + triggered by the event + requirements met; candidates run
    /// in ascending priority order, registration order breaking ties, each
    /// one re-checking its conditions against the context as mutated by the
    /// definitions before it.
    pub fn dispatch(&self, ctx: &mut SynergyContext) -> DispatchReport {
        let mut candidates: Vec<&SynergyDefinition> = self
            .definitions
            .iter()
            .filter(|d| {
                d.is_enabled() && d.triggered_by(ctx.event()) && d.requirements_met(ctx.modules())
            })
            .collect();
        candidates.sort_by_key(|d| d.priority());

        let mut report = DispatchReport::default();
        for definition in candidates {
            if !definition.conditions_pass(ctx) {
                report.gated.push(definition.id().to_string());
                continue;
            }
            debug!("firing synergy '{}' on {:?}", definition.id(), ctx.event());
            definition.execute(ctx);
            report.fired.push(definition.id().to_string());
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::{CoreBridge, ModuleProvider};
    use crate::synergy::condition::condition_fn;
    use crate::synergy::context::EventPayload;
    use crate::synergy::effect::{effect_fn, Message};
    use crate::synergy::event::SynergyEvent;
    use crate::synergy::state::SynergyPlayerState;
    use crate::world::{GameWorld, MechanicalCore, Position};
    use uuid::Uuid;

    struct Fixture {
        world: GameWorld,
        state: SynergyPlayerState,
    }

    fn fixture(modules: &[(&str, u32)]) -> Fixture {
        let mut world = GameWorld::new();
        let mut core = MechanicalCore::new(1000);
        for (id, level) in modules {
            core.install(id, *level);
        }
        let player = world.spawn_player("Tester", Uuid::new_v4(), Position::new(0, 0), core);
        let state = SynergyPlayerState::new(Uuid::new_v4(), player, 0);
        Fixture { world, state }
    }

    fn dispatch(fx: &mut Fixture, manager: &SynergyManager, event: SynergyEvent, damage: f32) -> (DispatchReport, f32) {
        let modules = CoreBridge.active_modules(&fx.world, fx.state.entity());
        let mut ctx = SynergyContext::new(
            event,
            EventPayload::damage_from(None, damage),
            modules,
            &mut fx.world,
            &mut fx.state,
            &CoreBridge,
        );
        let report = manager.dispatch(&mut ctx);
        let amount = ctx.current_amount;
        (report, amount)
    }

    fn simple(id: &str, module: &str, priority: i32) -> SynergyDefinition {
        SynergyDefinition::builder(id)
            .require_modules([module])
            .trigger_on(SynergyEvent::Hurt)
            .priority(priority)
            .add_effect(Message::chat(id.to_string()))
            .build()
            .unwrap()
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut manager = SynergyManager::new();
        manager.register(simple("a", "power_boost", 0)).unwrap();
        let err = manager.register(simple("a", "power_boost", 0)).unwrap_err();
        assert!(matches!(err, SynergyError::DuplicateId(_)));
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn test_priority_order_with_registration_tiebreak() {
        let mut manager = SynergyManager::new();
        manager.register(simple("low", "power_boost", 1)).unwrap();
        manager.register(simple("high", "power_boost", 10)).unwrap();
        manager.register(simple("tie_first", "power_boost", 5)).unwrap();
        manager.register(simple("tie_second", "power_boost", 5)).unwrap();

        let mut fx = fixture(&[("power_boost", 1)]);
        let (report, _) = dispatch(&mut fx, &manager, SynergyEvent::Hurt, 0.0);
        assert_eq!(report.fired, vec!["low", "tie_first", "tie_second", "high"]);
    }

    #[test]
    fn test_requirements_filter_candidates() {
        let mut manager = SynergyManager::new();
        manager.register(simple("have", "power_boost", 0)).unwrap();
        manager.register(simple("missing", "void_anchor", 0)).unwrap();

        let mut fx = fixture(&[("power_boost", 1)]);
        let (report, _) = dispatch(&mut fx, &manager, SynergyEvent::Hurt, 0.0);
        assert_eq!(report.fired, vec!["have"]);
        assert!(report.gated.is_empty());
    }

    #[test]
    fn test_paused_module_excludes_definition() {
        let mut fx = fixture(&[("power_boost", 1)]);
        {
            let player = fx.state.entity();
            let mut core = fx.world.ecs_mut().get::<&mut MechanicalCore>(player).unwrap();
            core.set_paused(&ModuleId::new("power_boost"), true);
        }
        let mut manager = SynergyManager::new();
        manager.register(simple("a", "power_boost", 0)).unwrap();
        let (report, _) = dispatch(&mut fx, &manager, SynergyEvent::Hurt, 0.0);
        assert!(report.fired.is_empty());
    }

    #[test]
    fn test_failing_condition_gates_definition() {
        let mut manager = SynergyManager::new();
        manager
            .register(
                SynergyDefinition::builder("gated")
                    .require_modules(["power_boost"])
                    .trigger_on(SynergyEvent::Hurt)
                    .add_boxed_condition(condition_fn("never", |_| Ok(false)))
                    .add_effect(Message::chat("should not appear"))
                    .build()
                    .unwrap(),
            )
            .unwrap();

        let mut fx = fixture(&[("power_boost", 1)]);
        let (report, _) = dispatch(&mut fx, &manager, SynergyEvent::Hurt, 0.0);
        assert!(report.fired.is_empty());
        assert_eq!(report.gated, vec!["gated"]);
        assert!(!fx.world.log().contains("should not appear"));
    }

    #[test]
    fn test_condition_error_fails_closed() {
        let mut manager = SynergyManager::new();
        manager
            .register(
                SynergyDefinition::builder("broken")
                    .require_modules(["power_boost"])
                    .trigger_on(SynergyEvent::Hurt)
                    .add_boxed_condition(condition_fn("explode", |_| {
                        Err(crate::synergy::error::SynergyError::Condition("boom".into()))
                    }))
                    .add_effect(Message::chat("should not appear"))
                    .build()
                    .unwrap(),
            )
            .unwrap();

        let mut fx = fixture(&[("power_boost", 1)]);
        let (report, _) = dispatch(&mut fx, &manager, SynergyEvent::Hurt, 0.0);
        assert!(report.fired.is_empty());
        assert_eq!(report.gated, vec!["broken"]);
    }

    #[test]
    fn test_damage_modifiers_compose_in_priority_order() {
        let mut manager = SynergyManager::new();
        manager
            .register(
                SynergyDefinition::builder("halve")
                    .require_modules(["armor_weave"])
                    .trigger_on(SynergyEvent::Hurt)
                    .priority(5)
                    .add_boxed_effect(effect_fn("halve", |ctx| {
                        ctx.current_amount *= 0.5;
                        Ok(())
                    }))
                    .build()
                    .unwrap(),
            )
            .unwrap();
        manager
            .register(
                SynergyDefinition::builder("flat_reduce")
                    .require_modules(["armor_weave"])
                    .trigger_on(SynergyEvent::Hurt)
                    .priority(10)
                    .add_boxed_effect(effect_fn("minus two", |ctx| {
                        ctx.current_amount = (ctx.current_amount - 2.0).max(0.0);
                        Ok(())
                    }))
                    .build()
                    .unwrap(),
            )
            .unwrap();

        let mut fx = fixture(&[("armor_weave", 1)]);
        let (_, amount) = dispatch(&mut fx, &manager, SynergyEvent::Hurt, 10.0);
        // 10.0 halved to 5.0, then minus 2.0
        assert_eq!(amount, 3.0);
    }

    #[test]
    fn test_earlier_priority_effects_visible_to_later_definitions() {
        // the low-priority energy reward must land before the high-priority
        // definition checks its gate
        let mut manager = SynergyManager::new();
        manager
            .register(
                SynergyDefinition::builder("reward")
                    .require_modules(["power_boost"])
                    .trigger_on(SynergyEvent::Kill)
                    .priority(10)
                    .add_boxed_effect(effect_fn("grant energy", |ctx| {
                        ctx.add_energy(400);
                        Ok(())
                    }))
                    .build()
                    .unwrap(),
            )
            .unwrap();
        manager
            .register(
                SynergyDefinition::builder("announce")
                    .require_modules(["power_boost"])
                    .trigger_on(SynergyEvent::Kill)
                    .priority(50)
                    .add_boxed_condition(condition_fn("pool refilled", |ctx| {
                        Ok(ctx.current_energy() >= 1000)
                    }))
                    .add_effect(Message::chat("fully charged"))
                    .build()
                    .unwrap(),
            )
            .unwrap();

        let mut fx = fixture(&[("power_boost", 1)]);
        {
            let player = fx.state.entity();
            let mut core = fx.world.ecs_mut().get::<&mut MechanicalCore>(player).unwrap();
            core.energy = 600;
        }
        let (report, _) = dispatch(&mut fx, &manager, SynergyEvent::Kill, 0.0);
        assert_eq!(report.fired, vec!["reward", "announce"]);
        assert!(fx.world.log().contains("fully charged"));
    }

    #[test]
    fn test_failing_effect_does_not_stop_later_effects() {
        let mut manager = SynergyManager::new();
        manager
            .register(
                SynergyDefinition::builder("half_broken")
                    .require_modules(["power_boost"])
                    .trigger_on(SynergyEvent::Hurt)
                    .add_boxed_effect(effect_fn("explode", |_| {
                        Err(crate::synergy::error::SynergyError::Effect("boom".into()))
                    }))
                    .add_effect(Message::chat("survived the boom"))
                    .build()
                    .unwrap(),
            )
            .unwrap();

        let mut fx = fixture(&[("power_boost", 1)]);
        let (report, _) = dispatch(&mut fx, &manager, SynergyEvent::Hurt, 0.0);
        assert_eq!(report.fired, vec!["half_broken"]);
        assert!(fx.world.log().contains("survived the boom"));
    }

    #[test]
    fn test_disable_suppresses_definition() {
        let mut manager = SynergyManager::new();
        manager.register(simple("a", "power_boost", 0)).unwrap();
        manager.get_mut("a").unwrap().set_enabled(false);

        let mut fx = fixture(&[("power_boost", 1)]);
        let (report, _) = dispatch(&mut fx, &manager, SynergyEvent::Hurt, 0.0);
        assert!(report.fired.is_empty());
    }
}
