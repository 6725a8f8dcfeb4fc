/// mq_engine is the deterministic room and sprite simulation behind
/// Mini Quests. One tick advances every live sprite, then the active room,
/// and the results surface as `StoryEvent`s for the layer above.
///
/// Anatomy of a tick:
///   - sprites: every sprite reads the previous tick's world and writes
///     its own next state (see `SpriteManager::advance`)
///   - commands: sprite spawns and removals queued during the step
///   - room: the active room checks exits, then reacts to story events
///   - story: whatever the room left in the queue is handled one level up
///
mod bit_buffer;
pub mod collision;
mod direction;
mod env;
mod item;
pub mod prelude;
mod render;
pub mod room;
pub mod sprite;
mod sprite_manager;
mod story_event;
mod track;

/// The simulation is single threaded. Static sprites (block arrays,
/// fences) are shared between ticks behind this pointer and only copied
/// when something writes to them.
pub use std::rc::Rc as RefPointer;

pub use bit_buffer::BitBuffer;
pub use direction::Direction;
pub use env::ActionInput;
pub use env::Env;
pub use env::Sound;
pub use item::ItemSet;
pub use render::DrawItem;
pub use render::DrawList;
pub use sprite_manager::SpriteManager;
pub use sprite_manager::TickContext;
pub use story_event::StoryEvent;
pub use story_event::StoryEvents;
pub use track::Track;
pub use track::TrackMode;

/// Sprites are identified by a counter owned by the `SpriteManager`.
/// Zero is never handed out.
pub type SpriteId = u128;

pub mod constants {
    /// Cells along each axis of one zone. Multi-zone rooms tile zones.
    pub const ROOM_SIZE: i32 = 10;
    /// Ticks between player steps while a direction is held.
    pub const WALK_TICKS: u32 = 3;
    /// Ticks per level while falling.
    pub const FALL_TICKS: u32 = 2;
    /// Length of a sword swing.
    pub const ATTACK_TICKS: u32 = 6;
    /// Length of the player's death animation.
    pub const DEATH_TICKS: u32 = 20;
    /// Enemies linger this long between being hit and being removed.
    pub const DYING_TICKS: u32 = 8;
    /// Falling below this level is fatal.
    pub const FALL_DEATH_Z: i32 = -3;
}
