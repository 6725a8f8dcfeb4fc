//! Headless runner: plays a key script against the quest and prints the
//! room each time the player changes room.
//!
//! Usage: mq_sim [config.json5] [script.txt]
//! The save slot path comes from `MQ_SAVE` (default `mq_save.txt`).

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use bevy_math::IVec2;
use mq_engine::StoryEvent;
use mq_engine::room::toolkit;
use mq_quest::GameConfig;
use mq_quest::GameManager;
use tracing::debug;
use tracing::info;
use tracing::warn;
use tracing_subscriber::EnvFilter;

mod scripted_input;

use scripted_input::ScriptedInput;

const DEFAULT_SAVE_SLOT: &str = "mq_save.txt";

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = env::args().skip(1);
    let config = match args.next() {
        Some(path) => load_config(Path::new(&path))?,
        None => GameConfig::default(),
    };
    let script = match args.next() {
        Some(path) => ScriptedInput::from_file(path)?,
        None => ScriptedInput::default(),
    };
    let slot = env::var_os("MQ_SAVE")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SAVE_SLOT));

    let mut manager = GameManager::new(config)?;
    if slot.exists() {
        let text = fs::read_to_string(&slot)
            .with_context(|| format!("reading save slot {}", slot.display()))?;
        if manager.restore(&text) {
            info!("resumed from {}", slot.display());
        }
    }

    info!("running {} scripted ticks", script.len());
    print_room(&manager);
    for input in script {
        manager.advance(input);
        let mut changed = false;
        for event in manager.story().last_events() {
            info!(tick = manager.tick(), "{event:?}");
            changed |= matches!(event, StoryEvent::RoomChange { .. });
        }
        for sound in manager.drain_sounds() {
            let name: &'static str = sound.into();
            debug!(tick = manager.tick(), "sound {name}");
        }
        if let Some(save) = manager.take_save() {
            write_save(&slot, &save)?;
        }
        if changed {
            print_room(&manager);
        }
        if manager.is_finished() {
            info!("quest complete at tick {}", manager.tick());
            break;
        }
    }

    print_room(&manager);
    info!(
        deaths = manager.story().deaths(),
        seconds = manager.tick() / u64::from(manager.config().ticks_per_second.max(1)),
        items = manager.story().items().count(),
        "finished in {}",
        manager.story().current_room().id()
    );
    write_save(&slot, &manager.save_string())
}

fn load_config(path: &Path) -> anyhow::Result<GameConfig> {
    if !path.exists() {
        warn!("no config at {}, using defaults", path.display());
        return Ok(GameConfig::default());
    }
    GameConfig::load(path)
}

fn write_save(slot: &Path, save: &str) -> anyhow::Result<()> {
    fs::write(slot, save).with_context(|| format!("writing save slot {}", slot.display()))
}

fn print_room(manager: &GameManager) {
    let room = manager.story().current_room();
    let extent = toolkit::room_extent(room.zones());
    let mut census = BTreeMap::<&'static str, usize>::new();
    for sprite in manager.story().sprites().list() {
        *census.entry(sprite.kind_name()).or_default() += 1;
    }
    debug!("{} sprites: {census:?}", room.id());
    println!("-- {} --", room.id());
    print!(
        "{}",
        manager
            .draw()
            .ascii_top_down(IVec2::NEG_ONE, extent + IVec2::splat(2))
    );
}
