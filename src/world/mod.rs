//! World module - host-game boundary slice
//!
//! The minimal world the engine runs against: ECS-backed entities, combat
//! components, and the message log.

pub mod components;
pub mod game_world;
pub mod log;

pub use components::{
    Health, Hostile, InstalledModule, MechanicalCore, Name, PlayerId, Position, Posture,
    StatusEffect, StatusEffects, StatusKind,
};
pub use game_world::GameWorld;
pub use log::{CombatLog, GameMessage, MessageChannel};
