/// mq_quest is the Mini Quests demo quest built on mq_engine: six rooms,
/// the story that links them, save strings and the game manager that
/// drives a tick.
///
mod config;
mod game_manager;
pub mod rooms;
mod rune;
mod save_state;
mod story;

pub use config::GameConfig;
pub use game_manager::GameManager;
pub use rooms::RoomRegistry;
pub use rune::Rune;
pub use save_state::SAVE_VERSION;
pub use save_state::SaveState;
pub use story::QuestStory;
