use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;
use serde::Serialize;

use crate::Direction;

/// Inputs applied to the player for one tick.
#[derive(Default, PartialEq, Eq, Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ActionInput {
    pub north: bool,
    pub south: bool,
    pub east: bool,
    pub west: bool,
    pub attack: bool,
}

impl ActionInput {
    pub fn moving(direction: Direction) -> Self {
        let mut input = Self::default();
        match direction {
            Direction::North => input.north = true,
            Direction::East => input.east = true,
            Direction::South => input.south = true,
            Direction::West => input.west = true,
        }
        input
    }

    pub fn attacking() -> Self {
        Self {
            attack: true,
            ..Default::default()
        }
    }

    /// The single direction requested this tick. Opposing keys cancel
    /// and diagonal input resolves to the vertical axis.
    pub fn direction(&self) -> Option<Direction> {
        match (self.north, self.south) {
            (true, false) => return Some(Direction::North),
            (false, true) => return Some(Direction::South),
            _ => {}
        }
        match (self.east, self.west) {
            (true, false) => Some(Direction::East),
            (false, true) => Some(Direction::West),
            _ => None,
        }
    }
}

/// Sound cues. Playback belongs to the platform layer, the simulation
/// only queues what should be heard this tick.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, strum::IntoStaticStr,
)]
pub enum Sound {
    Step,
    Swing,
    Switch,
    Spikes,
    Splat,
    Chest,
    Flame,
    Shot,
    Door,
    Death,
}

/// Everything the simulation needs from the outside world, passed by
/// reference through every `advance` call.
#[derive(Clone, Debug)]
pub struct Env {
    pub input: ActionInput,
    tick: u64,
    rng: ChaCha8Rng,
    sounds: Vec<Sound>,
}

impl Env {
    pub fn new(seed: u64) -> Self {
        Self {
            input: ActionInput::default(),
            tick: 0,
            rng: ChaCha8Rng::seed_from_u64(seed),
            sounds: Vec::new(),
        }
    }

    /// Start the next tick with fresh input. Sound cues that were never
    /// drained are dropped.
    pub fn begin_tick(&mut self, input: ActionInput) {
        self.tick += 1;
        self.input = input;
        self.sounds.clear();
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn rng(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    pub fn play(&mut self, sound: Sound) {
        self.sounds.push(sound);
    }

    pub fn sounds(&self) -> &[Sound] {
        &self.sounds
    }

    pub fn drain_sounds(&mut self) -> Vec<Sound> {
        std::mem::take(&mut self.sounds)
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposing_keys_cancel() {
        let input = ActionInput {
            north: true,
            south: true,
            east: true,
            ..Default::default()
        };
        assert_eq!(input.direction(), Some(Direction::East));
        let input = ActionInput {
            east: true,
            west: true,
            ..Default::default()
        };
        assert_eq!(input.direction(), None);
    }

    #[test]
    fn begin_tick_clears_sounds() {
        let mut env = Env::new(7);
        env.play(Sound::Step);
        env.begin_tick(ActionInput::default());
        assert!(env.sounds().is_empty());
        assert_eq!(env.tick(), 1);
    }

    #[test]
    fn drained_sounds_are_named() {
        let mut env = Env::new(7);
        env.play(Sound::Door);
        env.play(Sound::Step);
        let names: Vec<&'static str> = env.drain_sounds().into_iter().map(Into::into).collect();
        assert_eq!(names, vec!["Door", "Step"]);
        assert!(env.sounds().is_empty());
    }
}
