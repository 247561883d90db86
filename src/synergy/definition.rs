//! Synergy definitions
//!
//! A definition is the declarative unit of the engine: which modules it
//! needs, which events wake it, the conditions gating it, and the effects
//! it runs. Definitions are immutable after `build()` and are authored
//! through the builder, which is where validation lives.

use log::{debug, error};

use crate::bridge::ModuleSnapshot;

use super::condition::SynergyCondition;
use super::context::SynergyContext;
use super::effect::SynergyEffect;
use super::error::{Result, SynergyError};
use super::event::SynergyEvent;
use super::module::{ModuleId, ModuleLink};

pub struct SynergyDefinition {
    id: String,
    display_name: String,
    description: String,
    category: String,
    required_modules: Vec<ModuleId>,
    links: Vec<ModuleLink>,
    triggers: Vec<SynergyEvent>,
    conditions: Vec<Box<dyn SynergyCondition>>,
    effects: Vec<Box<dyn SynergyEffect>>,
    priority: i32,
    enabled: bool,
}

impl SynergyDefinition {
    pub fn builder(id: impl Into<String>) -> SynergyDefinitionBuilder {
        SynergyDefinitionBuilder::new(id)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn required_modules(&self) -> &[ModuleId] {
        &self.required_modules
    }

    pub fn links(&self) -> &[ModuleLink] {
        &self.links
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// An empty trigger list subscribes to every event.
    pub fn triggered_by(&self, event: SynergyEvent) -> bool {
        self.triggers.is_empty() || self.triggers.contains(&event)
    }

    /// All required modules present and active in the snapshot.
    pub fn requirements_met(&self, modules: &ModuleSnapshot) -> bool {
        self.required_modules.iter().all(|id| modules.contains(id))
    }

    /// Short-circuit over the condition list. A condition error counts as
    /// a failed check so a broken gate can never fire its effects.
    pub fn conditions_pass(&self, ctx: &SynergyContext) -> bool {
        for condition in &self.conditions {
            match condition.test(ctx) {
                Ok(true) => {}
                Ok(false) => return false,
                Err(e) => {
                    debug!(
                        "synergy '{}' condition '{}' errored, treating as failed: {e}",
                        self.id,
                        condition.describe()
                    );
                    return false;
                }
            }
        }
        true
    }

    /// Run every effect in declaration order. A failing effect is logged
    /// and the remaining effects still run; one bad definition must not
    /// poison the dispatch.
    pub fn execute(&self, ctx: &mut SynergyContext) {
        for effect in &self.effects {
            if let Err(e) = effect.apply(ctx) {
                error!(
                    "synergy '{}' effect '{}' failed: {e}",
                    self.id,
                    effect.describe()
                );
            }
        }
    }
}

impl std::fmt::Debug for SynergyDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SynergyDefinition")
            .field("id", &self.id)
            .field("required_modules", &self.required_modules)
            .field("triggers", &self.triggers)
            .field("conditions", &self.conditions.len())
            .field("effects", &self.effects.len())
            .field("priority", &self.priority)
            .field("enabled", &self.enabled)
            .finish()
    }
}

// ============================================================================
// Builder
// ============================================================================

pub struct SynergyDefinitionBuilder {
    id: String,
    display_name: String,
    description: String,
    category: String,
    required_modules: Vec<ModuleId>,
    links: Vec<ModuleLink>,
    triggers: Vec<SynergyEvent>,
    conditions: Vec<Box<dyn SynergyCondition>>,
    effects: Vec<Box<dyn SynergyEffect>>,
    priority: i32,
}

impl SynergyDefinitionBuilder {
    fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            display_name: id.clone(),
            id,
            description: String::new(),
            category: "general".into(),
            required_modules: Vec::new(),
            links: Vec::new(),
            triggers: Vec::new(),
            conditions: Vec::new(),
            effects: Vec::new(),
            priority: 0,
        }
    }

    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = text.into();
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Add required modules; ids are folded to canonical uppercase form.
    pub fn require_modules<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.required_modules
            .extend(ids.into_iter().map(ModuleId::new));
        self
    }

    /// Declare a link between two required modules. Descriptive only, but
    /// validated at build time against the requirement set.
    pub fn add_link(mut self, link: ModuleLink) -> Self {
        self.links.push(link);
        self
    }

    pub fn trigger_on(mut self, event: SynergyEvent) -> Self {
        self.triggers.push(event);
        self
    }

    pub fn add_condition(mut self, condition: impl SynergyCondition + 'static) -> Self {
        self.conditions.push(Box::new(condition));
        self
    }

    pub fn add_boxed_condition(mut self, condition: Box<dyn SynergyCondition>) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn add_effect(mut self, effect: impl SynergyEffect + 'static) -> Self {
        self.effects.push(Box::new(effect));
        self
    }

    pub fn add_boxed_effect(mut self, effect: Box<dyn SynergyEffect>) -> Self {
        self.effects.push(effect);
        self
    }

    /// Lower fires earlier within a dispatch.
    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn build(self) -> Result<SynergyDefinition> {
        if self.required_modules.is_empty() {
            return Err(SynergyError::EmptyRequirements(self.id));
        }
        if self.effects.is_empty() {
            return Err(SynergyError::NoEffects(self.id));
        }
        for link in &self.links {
            for endpoint in [&link.from, &link.to] {
                if !self.required_modules.contains(endpoint) {
                    return Err(SynergyError::DanglingLink {
                        id: self.id,
                        module: endpoint.clone(),
                    });
                }
            }
        }
        Ok(SynergyDefinition {
            id: self.id,
            display_name: self.display_name,
            description: self.description,
            category: self.category,
            required_modules: self.required_modules,
            links: self.links,
            triggers: self.triggers,
            conditions: self.conditions,
            effects: self.effects,
            priority: self.priority,
            enabled: true,
        })
    }
}
