//! Coreweave - demo entry point
//!
//! Headless simulation: loads the demo loadouts, registers the shipped
//! synergy catalog, and scripts a short skirmish so the dispatch log can
//! be inspected on stdout.

use anyhow::{anyhow, Result};

use coreweave::data::{self, LoadoutConfig};
use coreweave::game::GameSession;
use coreweave::synergy::{SynergyManager, TICKS_PER_SECOND};
use coreweave::world::Position;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting Coreweave v{}", env!("CARGO_PKG_VERSION"));

    let mut manager = SynergyManager::new();
    data::register_defaults(&mut manager)?;
    log::info!("{} synergies registered", manager.len());

    let loadouts = LoadoutConfig::load();
    let mut session = GameSession::new(manager);

    let ravager = loadouts
        .find("ravager")
        .ok_or_else(|| anyhow!("missing 'ravager' loadout"))?;
    let player = session.connect(&ravager.name, ravager.to_core(), Position::new(0, 0));

    let ghoul = session
        .world_mut()
        .spawn_hostile("ghoul", 60.0, Position::new(1, 0));

    // Soften the player below the desperation threshold, then trade blows
    // for a few seconds.
    session.hurt(&player, Some(ghoul), 15.0)?;
    for second in 0..10 {
        if session.world().contains(ghoul) {
            let report = session.attack(&player, ghoul, 6.0)?;
            log::info!("second {second}: fired {:?}", report.fired);
        }
        for _ in 0..TICKS_PER_SECOND {
            session.tick()?;
        }
    }

    println!("--- combat log ---");
    for message in session.world().log().entries() {
        println!("[tick {:>4}] {}", message.tick, message.text);
    }
    Ok(())
}
