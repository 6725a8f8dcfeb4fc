use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use serde::Serialize;

/// Game settings, read from a json5 file. Every field is optional.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Room a new game starts in.
    pub start_room: String,
    pub seed: u64,
    /// Ticks between the player dying and re-entering the room.
    pub respawn_delay_ticks: u32,
    pub ticks_per_second: u32,
    /// Request a save on every room change.
    pub autosave: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            start_room: "A01".to_string(),
            seed: 0x6d71,
            respawn_delay_ticks: 45,
            ticks_per_second: 30,
            autosave: true,
        }
    }
}

impl GameConfig {
    pub fn from_json5(text: &str) -> anyhow::Result<Self> {
        Ok(json5::from_str(text)?)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json5(&text).with_context(|| format!("parsing config {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config = GameConfig::from_json5("{ seed: 42, autosave: false }").unwrap();
        assert_eq!(config.seed, 42);
        assert!(!config.autosave);
        assert_eq!(config.start_room, "A01");
        assert_eq!(config.respawn_delay_ticks, 45);
    }

    #[test]
    fn rejects_bad_types() {
        assert!(GameConfig::from_json5("{ seed: 'many' }").is_err());
    }
}
