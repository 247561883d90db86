//! Built-in synergy content and external data loading
//!
//! The definitions here are the shipped catalog, grouped by category the
//! way they appear in the tuning docs. Player loadouts come from an
//! external RON file with compiled-in fallbacks.

pub mod combat;
pub mod energy;
pub mod loader;
pub mod mobility;
pub mod survival;

pub use loader::{default_loadouts, Loadout, LoadoutConfig};

use crate::synergy::{Result, SynergyManager};

/// Canonical ids for the modules the shipped catalog references.
pub mod modules {
    pub const DAMAGE_BOOST: &str = "DAMAGE_BOOST";
    pub const THORNS: &str = "THORNS";
    pub const HEALTH_REGEN: &str = "HEALTH_REGEN";
    pub const OVERCHARGE_COIL: &str = "OVERCHARGE_COIL";
    pub const ARMOR_PLATING: &str = "ARMOR_PLATING";
    pub const PHASE_SHIFT: &str = "PHASE_SHIFT";
    pub const KINETIC_DRIVE: &str = "KINETIC_DRIVE";
    pub const GENERATOR: &str = "GENERATOR";
    pub const ENERGY_SIPHON: &str = "ENERGY_SIPHON";
    pub const BLOOD_RITE: &str = "BLOOD_RITE";
    pub const SHIELD_EMITTER: &str = "SHIELD_EMITTER";

    pub const ALL: &[&str] = &[
        DAMAGE_BOOST,
        THORNS,
        HEALTH_REGEN,
        OVERCHARGE_COIL,
        ARMOR_PLATING,
        PHASE_SHIFT,
        KINETIC_DRIVE,
        GENERATOR,
        ENERGY_SIPHON,
        BLOOD_RITE,
        SHIELD_EMITTER,
    ];
}

/// Register the whole shipped catalog into a manager.
pub fn register_defaults(manager: &mut SynergyManager) -> Result<()> {
    manager.declare_modules(modules::ALL.iter().copied());
    let definitions = combat::definitions()?
        .into_iter()
        .chain(mobility::definitions()?)
        .chain(energy::definitions()?)
        .chain(survival::definitions()?);
    for definition in definitions {
        manager.register(definition)?;
    }
    Ok(())
}
