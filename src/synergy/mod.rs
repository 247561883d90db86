//! Synergy engine
//!
//! Declarative per-player rules over the module loadout: a definition names
//! the modules it needs, the events that wake it, condition gates, and the
//! effects it performs. The manager owns the definitions; per-player state
//! (cooldowns, timed states, modifiers) lives in `SynergyPlayerState` and
//! everything a rule can touch during a dispatch goes through
//! `SynergyContext`.

pub mod condition;
pub mod context;
pub mod definition;
pub mod effect;
pub mod error;
pub mod event;
pub mod manager;
pub mod module;
pub mod state;

pub use condition::{condition_fn, SynergyCondition};
pub use context::{EventPayload, SynergyContext};
pub use definition::{SynergyDefinition, SynergyDefinitionBuilder};
pub use effect::{effect_fn, SynergyEffect};
pub use error::{Result, SynergyError};
pub use event::{secs, SynergyEvent, TICKS_PER_SECOND};
pub use manager::{DispatchReport, SynergyManager};
pub use module::{LinkTag, ModuleId, ModuleLink};
pub use state::{ExpiryHook, PlayerStates, PositionSnapshot, SynergyPlayerState};
