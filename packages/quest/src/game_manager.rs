use mq_engine::prelude::*;
use tracing::warn;

use crate::GameConfig;
use crate::QuestStory;
use crate::SaveState;

/// The outermost layer: owns the environment and the story, and turns
/// one frame of input into one tick.
pub struct GameManager {
    config: GameConfig,
    env: Env,
    story: QuestStory,
}

impl GameManager {
    pub fn new(config: GameConfig) -> anyhow::Result<Self> {
        let env = Env::new(config.seed);
        let mut story = QuestStory::new(&config)?;
        story.start();
        Ok(Self { config, env, story })
    }

    pub fn advance(&mut self, input: ActionInput) {
        self.env.begin_tick(input);
        self.story.advance(&mut self.env);
    }

    /// Resume from a save string. On any problem the current game carries
    /// on and false is returned.
    pub fn restore(&mut self, text: &str) -> bool {
        let state = match text.parse::<SaveState>() {
            Ok(state) => state,
            Err(e) => {
                warn!("ignoring save: {e:#}");
                return false;
            }
        };
        if !self.story.restore(&state) {
            warn!("save does not match this quest, keeping the current game");
            return false;
        }
        true
    }

    pub fn save_string(&self) -> String {
        self.story.save_state().to_string()
    }

    /// The save string for the last requested save, if one is pending.
    pub fn take_save(&mut self) -> Option<String> {
        self.story.take_save().map(|state| state.to_string())
    }

    pub fn new_game(&mut self) {
        self.story.start();
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn story(&self) -> &QuestStory {
        &self.story
    }

    pub fn story_mut(&mut self) -> &mut QuestStory {
        &mut self.story
    }

    pub fn env(&self) -> &Env {
        &self.env
    }

    pub fn tick(&self) -> u64 {
        self.env.tick()
    }

    /// Sound cues from the last tick, for the platform layer to play.
    pub fn drain_sounds(&mut self) -> Vec<Sound> {
        self.env.drain_sounds()
    }

    pub fn draw(&self) -> DrawList {
        self.story.sprites().draw()
    }

    pub fn is_finished(&self) -> bool {
        self.story.is_finished()
    }
}
