//! Coreweave - a declarative synergy engine for modular combat equipment
//!
//! Players wear a mechanical core fitted with leveled modules; synergies
//! are declarative rules that wake on game events, check their module
//! requirements and condition gates, and run effects against the world
//! through a narrow bridge interface.

pub mod bridge;
pub mod data;
pub mod game;
pub mod synergy;
pub mod world;

// Re-export commonly used types
pub use game::GameSession;
pub use synergy::{
    EventPayload, ModuleId, SynergyContext, SynergyDefinition, SynergyEvent, SynergyManager,
};
pub use world::{GameWorld, MechanicalCore};
