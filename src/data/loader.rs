//! RON loadout loader
//!
//! Demo loadouts live in an external RON file so testers can tweak module
//! mixes without a rebuild, with hardcoded fallbacks when the file is
//! missing or broken.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::world::MechanicalCore;

use super::modules;

/// One named module mix for a demo player.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Loadout {
    pub name: String,
    pub max_energy: i32,
    /// Module id and installed level pairs.
    pub modules: Vec<(String, u32)>,
}

impl Loadout {
    pub fn to_core(&self) -> MechanicalCore {
        let mut core = MechanicalCore::new(self.max_energy);
        for (id, level) in &self.modules {
            core.install(id, *level);
        }
        core
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadoutConfig {
    pub loadouts: Vec<Loadout>,
}

impl LoadoutConfig {
    /// Load from assets/data/loadouts.ron, falling back to the compiled-in
    /// defaults on any failure.
    pub fn load() -> Self {
        Self::load_from(Path::new("assets/data/loadouts.ron"))
    }

    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            match fs::read_to_string(path) {
                Ok(content) => match ron::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => eprintln!("Warning: Failed to parse {}: {}", path.display(), e),
                },
                Err(e) => eprintln!("Warning: Failed to read {}: {}", path.display(), e),
            }
        }
        default_loadouts()
    }

    pub fn find(&self, name: &str) -> Option<&Loadout> {
        self.loadouts.iter().find(|l| l.name == name)
    }
}

impl Default for LoadoutConfig {
    fn default() -> Self {
        default_loadouts()
    }
}

/// The shipped demo loadouts, mirroring assets/data/loadouts.ron.
pub fn default_loadouts() -> LoadoutConfig {
    LoadoutConfig {
        loadouts: vec![
            Loadout {
                name: "ravager".into(),
                max_energy: 10_000,
                modules: vec![
                    (modules::DAMAGE_BOOST.into(), 2),
                    (modules::THORNS.into(), 1),
                    (modules::HEALTH_REGEN.into(), 1),
                ],
            },
            Loadout {
                name: "phantom".into(),
                max_energy: 8_000,
                modules: vec![
                    (modules::PHASE_SHIFT.into(), 1),
                    (modules::KINETIC_DRIVE.into(), 1),
                    (modules::ENERGY_SIPHON.into(), 1),
                ],
            },
            Loadout {
                name: "juggernaut".into(),
                max_energy: 12_000,
                modules: vec![
                    (modules::ARMOR_PLATING.into(), 2),
                    (modules::THORNS.into(), 1),
                    (modules::SHIELD_EMITTER.into(), 1),
                    (modules::ENERGY_SIPHON.into(), 1),
                ],
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synergy::ModuleId;

    #[test]
    fn test_defaults_cover_known_modules() {
        let config = default_loadouts();
        assert_eq!(config.loadouts.len(), 3);
        for loadout in &config.loadouts {
            for (id, level) in &loadout.modules {
                assert!(modules::ALL.contains(&id.as_str()), "unknown module {id}");
                assert!(*level > 0);
            }
        }
    }

    #[test]
    fn test_loadout_builds_core() {
        let config = default_loadouts();
        let core = config.find("ravager").unwrap().to_core();
        assert_eq!(core.level(&ModuleId::new("damage_boost")), 2);
        assert_eq!(core.max_energy, 10_000);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let config = LoadoutConfig::load_from(Path::new("does/not/exist.ron"));
        assert_eq!(config.loadouts.len(), 3);
    }

    #[test]
    fn test_ron_roundtrip() {
        let text = ron::to_string(&default_loadouts()).unwrap();
        let parsed: LoadoutConfig = ron::from_str(&text).unwrap();
        assert_eq!(parsed.loadouts.len(), 3);
    }
}
